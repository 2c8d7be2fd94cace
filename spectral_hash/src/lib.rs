// Spectral Hash
//
// Produces a small structural fingerprint of arbitrary source text: the
// largest eigenvalues of the Laplacian of a token co-occurrence graph.
// Two snippets with the same token adjacency structure hash to the same
// spectrum regardless of formatting, comments, or string contents.
//
// Architecture:
// - tokenize.rs: language-agnostic lexer (identifiers, numbers, literals, punctuation)
// - graph.rs: co-occurrence graph over the most frequent tokens, Laplacian builder
// - jacobi.rs: cyclic Jacobi eigenvalue solver for symmetric matrices
//
// Output is deterministic for a given input and `HasherConfig`.

pub mod graph;
pub mod jacobi;
pub mod tokenize;

use serde::{Deserialize, Serialize};

use crate::graph::TokenGraph;
use crate::tokenize::tokenize;

/// Rounding noise below this magnitude is treated as an exact zero eigenvalue.
const NEGATIVE_NOISE: f64 = 1e-9;

/// Tunable parameters for spectrum extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HasherConfig {
    /// Number of eigenvalues returned by `top_eigenvalues`.
    pub top_k: usize,
    /// Maximum number of distinct tokens kept as graph nodes.
    pub max_nodes: usize,
    /// Tokens at most this many positions apart are connected.
    pub window: usize,
    /// Jacobi sweep budget.
    pub max_sweeps: usize,
    /// Off-diagonal norm at which the solver stops.
    pub tolerance: f64,
}

impl Default for HasherConfig {
    fn default() -> Self {
        HasherConfig {
            top_k: 4,
            max_nodes: 48,
            window: 2,
            max_sweeps: 64,
            tolerance: 1e-10,
        }
    }
}

/// Graph spectral hasher: source text in, ranked eigenvalues out.
#[derive(Debug, Clone, Default)]
pub struct SpectralHasher {
    config: HasherConfig,
}

impl SpectralHasher {
    pub fn new(config: HasherConfig) -> Self {
        SpectralHasher { config }
    }

    pub fn config(&self) -> &HasherConfig {
        &self.config
    }

    /// Build the co-occurrence graph for `code`.
    pub fn graph(&self, code: &str) -> TokenGraph {
        let tokens = tokenize(code);
        TokenGraph::from_tokens(&tokens, self.config.max_nodes, self.config.window)
    }

    /// Every Laplacian eigenvalue of `code`'s graph, sorted descending.
    pub fn full_spectrum(&self, code: &str) -> Vec<f64> {
        let graph = self.graph(code);
        let n = graph.node_count();
        let mut values = jacobi::symmetric_eigenvalues(
            &graph.laplacian(),
            n,
            self.config.max_sweeps,
            self.config.tolerance,
        );
        for v in values.iter_mut() {
            if *v < 0.0 && *v > -NEGATIVE_NOISE {
                *v = 0.0;
            }
            // Normalize -0.0 so equal spectra compare bit-identical.
            if *v == 0.0 {
                *v = 0.0;
            }
        }
        values.sort_by(|a, b| b.total_cmp(a));
        log::debug!("spectral hash: {} nodes, spectrum head {:?}", n, &values[..n.min(4)]);
        values
    }

    /// The `top_k` largest eigenvalues, descending. Shorter when the graph
    /// has fewer nodes; empty for empty input.
    pub fn top_eigenvalues(&self, code: &str) -> Vec<f64> {
        let mut values = self.full_spectrum(code);
        values.truncate(self.config.top_k);
        values
    }
}
