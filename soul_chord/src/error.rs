// Error type for the chord engine.
//
// Only two things can go wrong inside the pipeline itself: the extractor
// fails, or it hands back an eigenvalue the logarithmic mappings cannot
// accept. A spectrum with fewer than two values is not an error; it yields
// a neutral, tension-free chord. The remaining variants cover config
// loading and the MIDI/WAV writers.

use thiserror::Error;

/// Boxed error returned by an eigenvalue extractor.
pub type ExtractorError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ChordError {
    /// The extractor produced a negative, NaN, or infinite eigenvalue.
    #[error("invalid eigenvalue {value} at position {index}: must be finite and non-negative")]
    InvalidEigenvalue { index: usize, value: f64 },

    /// The extractor itself failed; its error is passed through untouched.
    #[error(transparent)]
    Extractor(ExtractorError),

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Wav(#[from] hound::Error),
}
