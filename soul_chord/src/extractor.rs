// Eigenvalue extractor seam.
//
// The engine never computes spectra itself; it asks an `EigenvalueExtractor`
// for the ranked top eigenvalues of a code string. The production extractor
// is `spectral_hash::SpectralHasher`. `FixedSpectrum` and `FnExtractor`
// exist so callers and tests can drive the engine with known spectra or
// injected failures.
//
// Extractors must be `Send + Sync`: batch chord building fans out across
// rayon worker threads sharing one extractor.

use spectral_hash::SpectralHasher;

use crate::error::ExtractorError;

pub trait EigenvalueExtractor: Send + Sync {
    /// Ranked (descending) eigenvalues for `code`. May be empty.
    fn extract_top_eigenvalues(&self, code: &str) -> Result<Vec<f64>, ExtractorError>;
}

impl EigenvalueExtractor for SpectralHasher {
    fn extract_top_eigenvalues(&self, code: &str) -> Result<Vec<f64>, ExtractorError> {
        Ok(self.top_eigenvalues(code))
    }
}

/// Returns the same spectrum for every input.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSpectrum(pub Vec<f64>);

impl EigenvalueExtractor for FixedSpectrum {
    fn extract_top_eigenvalues(&self, _code: &str) -> Result<Vec<f64>, ExtractorError> {
        Ok(self.0.clone())
    }
}

/// Adapts a closure into an extractor.
pub struct FnExtractor<F>(F);

impl<F> FnExtractor<F>
where
    F: Fn(&str) -> Result<Vec<f64>, ExtractorError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        FnExtractor(f)
    }
}

impl<F> EigenvalueExtractor for FnExtractor<F>
where
    F: Fn(&str) -> Result<Vec<f64>, ExtractorError> + Send + Sync,
{
    fn extract_top_eigenvalues(&self, code: &str) -> Result<Vec<f64>, ExtractorError> {
        (self.0)(code)
    }
}
