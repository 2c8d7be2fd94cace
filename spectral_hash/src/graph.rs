// Token co-occurrence graph and its Laplacian.
//
// Nodes are the most frequent distinct token texts (capped at `max_nodes`);
// an undirected edge accumulates weight 1 every time two kept tokens appear
// within `window` positions of each other. Matrices are dense row-major
// `Vec<f64>` of side `n`, indexed `[row * n + col]`.

use rustc_hash::FxHashMap;

use crate::tokenize::Token;

/// Weighted undirected graph over token labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenGraph {
    /// Node labels in node-index order (most frequent first).
    pub labels: Vec<String>,
    /// Symmetric adjacency matrix, row-major, side `labels.len()`.
    pub adjacency: Vec<f64>,
}

impl TokenGraph {
    /// Build the co-occurrence graph for a token stream.
    pub fn from_tokens(tokens: &[Token<'_>], max_nodes: usize, window: usize) -> Self {
        // (count, first position) per distinct text
        let mut stats: FxHashMap<&str, (usize, usize)> = FxHashMap::default();
        for (pos, token) in tokens.iter().enumerate() {
            stats.entry(token.text).or_insert((0, pos)).0 += 1;
        }

        let mut ranked: Vec<(&str, usize, usize)> =
            stats.into_iter().map(|(text, (count, first))| (text, count, first)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked.truncate(max_nodes);

        let index: FxHashMap<&str, usize> =
            ranked.iter().enumerate().map(|(i, &(text, _, _))| (text, i)).collect();
        let n = ranked.len();
        let mut adjacency = vec![0.0; n * n];

        let nodes: Vec<Option<usize>> = tokens.iter().map(|t| index.get(t.text).copied()).collect();
        for (i, a) in nodes.iter().enumerate() {
            let Some(a) = *a else { continue };
            let reach = i.saturating_add(window).min(nodes.len().saturating_sub(1));
            for b in nodes[i + 1..=reach].iter().flatten() {
                if *b != a {
                    adjacency[a * n + b] += 1.0;
                    adjacency[b * n + a] += 1.0;
                }
            }
        }

        TokenGraph {
            labels: ranked.into_iter().map(|(text, _, _)| text.to_string()).collect(),
            adjacency,
        }
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn edge_weight(&self, a: usize, b: usize) -> f64 {
        self.adjacency[a * self.node_count() + b]
    }

    /// Weighted degree of each node.
    pub fn degrees(&self) -> Vec<f64> {
        let n = self.node_count();
        (0..n).map(|i| self.adjacency[i * n..(i + 1) * n].iter().sum::<f64>()).collect()
    }

    /// Combinatorial Laplacian `L = D - A`. Symmetric and positive
    /// semi-definite, so every eigenvalue is real and non-negative.
    pub fn laplacian(&self) -> Vec<f64> {
        let n = self.node_count();
        let mut lap: Vec<f64> = self.adjacency.iter().map(|w| -w).collect();
        for (i, d) in self.degrees().into_iter().enumerate() {
            lap[i * n + i] = d;
        }
        lap
    }
}
