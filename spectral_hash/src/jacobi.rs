// Cyclic Jacobi eigenvalue solver for dense symmetric matrices.
//
// Repeatedly applies plane rotations that zero one off-diagonal entry at a
// time, sweeping all (p, q) pairs until the off-diagonal Frobenius norm
// drops below the tolerance or the sweep budget runs out. The diagonal then
// holds the eigenvalues. Graphs here stay small (tens of nodes), where the
// O(n^3)-per-sweep cost is negligible and the method's unconditional
// stability and determinism matter more than speed.

/// Eigenvalues of the symmetric `n x n` row-major `matrix`, unsorted.
///
/// Only the symmetric part is meaningful; callers must pass a symmetric
/// matrix (a Laplacian, in this crate).
pub fn symmetric_eigenvalues(matrix: &[f64], n: usize, max_sweeps: usize, tolerance: f64) -> Vec<f64> {
    debug_assert_eq!(matrix.len(), n * n, "matrix is not {n}x{n}");
    let mut a = matrix.to_vec();

    let mut sweeps = 0;
    while sweeps < max_sweeps && off_diagonal_norm(&a, n) > tolerance {
        for p in 0..n {
            for q in (p + 1)..n {
                rotate(&mut a, n, p, q);
            }
        }
        sweeps += 1;
    }
    log::trace!("jacobi: n={} converged after {} sweeps", n, sweeps);

    (0..n).map(|i| a[i * n + i]).collect()
}

/// Square root of the sum of squared off-diagonal entries.
pub fn off_diagonal_norm(a: &[f64], n: usize) -> f64 {
    let mut sum = 0.0;
    for i in 0..n {
        for j in 0..n {
            if i != j {
                sum += a[i * n + j] * a[i * n + j];
            }
        }
    }
    sum.sqrt()
}

/// Apply the rotation that annihilates `a[p][q]` (and `a[q][p]`).
fn rotate(a: &mut [f64], n: usize, p: usize, q: usize) {
    let apq = a[p * n + q];
    if apq == 0.0 {
        return;
    }
    let app = a[p * n + p];
    let aqq = a[q * n + q];

    // Smaller root of t^2 + 2*theta*t - 1 = 0 keeps the rotation angle <= pi/4.
    let theta = (aqq - app) / (2.0 * apq);
    let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
    let c = 1.0 / (t * t + 1.0).sqrt();
    let s = t * c;

    // A <- A * J
    for k in 0..n {
        let akp = a[k * n + p];
        let akq = a[k * n + q];
        a[k * n + p] = c * akp - s * akq;
        a[k * n + q] = s * akp + c * akq;
    }
    // A <- J^T * A
    for k in 0..n {
        let apk = a[p * n + k];
        let aqk = a[q * n + k];
        a[p * n + k] = c * apk - s * aqk;
        a[q * n + k] = s * apk + c * aqk;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut v: Vec<f64>) -> Vec<f64> {
        v.sort_by(|a, b| a.total_cmp(b));
        v
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_two_by_two() {
        let ev = symmetric_eigenvalues(&[2.0, 1.0, 1.0, 2.0], 2, 50, 1e-12);
        assert_close(&sorted(ev), &[1.0, 3.0]);
    }

    #[test]
    fn test_diagonal_is_untouched() {
        let ev = symmetric_eigenvalues(&[5.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 2.0], 3, 50, 1e-12);
        assert_eq!(ev, vec![5.0, -1.0, 2.0]);
    }

    #[test]
    fn test_path_graph_laplacian() {
        // P3: eigenvalues 0, 1, 3
        let lap = [1.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 1.0];
        assert_close(&sorted(symmetric_eigenvalues(&lap, 3, 50, 1e-12)), &[0.0, 1.0, 3.0]);
    }

    #[test]
    fn test_complete_graph_laplacian() {
        // K4: eigenvalues 0, 4, 4, 4
        let mut lap = vec![-1.0; 16];
        for i in 0..4 {
            lap[i * 4 + i] = 3.0;
        }
        assert_close(&sorted(symmetric_eigenvalues(&lap, 4, 50, 1e-12)), &[0.0, 4.0, 4.0, 4.0]);
    }

    #[test]
    fn test_trace_is_preserved() {
        let m = [4.0, 1.0, 2.0, 1.0, 3.0, 0.5, 2.0, 0.5, 6.0];
        let ev = symmetric_eigenvalues(&m, 3, 50, 1e-12);
        let trace: f64 = ev.iter().sum();
        assert!((trace - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_matrix() {
        assert!(symmetric_eigenvalues(&[], 0, 10, 1e-12).is_empty());
    }
}
