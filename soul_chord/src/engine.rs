// Chord engine: code string -> SoulChord, and pairwise comparison.
//
// `ChordEngine` pairs an `EigenvalueExtractor` with an `EngineConfig`. It is
// stateless between calls: the same code and config always produce the same
// chord, so batches are evaluated in parallel with rayon and returned in
// input order, each element its own `Result`.
//
// The free functions `code_to_chord` and `compare_harmony` run a default
// engine (stock `SpectralHasher`, stock config).

use rayon::prelude::*;
use spectral_hash::SpectralHasher;

use crate::chord::SoulChord;
use crate::compare::{ComparisonResult, compare_chords};
use crate::config::EngineConfig;
use crate::error::ChordError;
use crate::extractor::EigenvalueExtractor;

pub struct ChordEngine<E> {
    extractor: E,
    config: EngineConfig,
}

impl<E: EigenvalueExtractor> ChordEngine<E> {
    /// Build an engine, rejecting an invalid config up front.
    pub fn new(extractor: E, config: EngineConfig) -> Result<Self, ChordError> {
        config.validate()?;
        Ok(ChordEngine { extractor, config })
    }

    /// Engine with the stock config.
    pub fn with_extractor(extractor: E) -> Self {
        ChordEngine {
            extractor,
            config: EngineConfig::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Extract the spectrum of `code` and build its chord.
    pub fn code_to_chord(&self, code: &str) -> Result<SoulChord, ChordError> {
        let eigenvalues = self
            .extractor
            .extract_top_eigenvalues(code)
            .map_err(ChordError::Extractor)?;
        log::debug!("extracted {} eigenvalues from {} bytes", eigenvalues.len(), code.len());
        SoulChord::from_spectrum(&eigenvalues, &self.config)
    }

    /// Build both chords and rank them by tension.
    pub fn compare_harmony(&self, first: &str, second: &str) -> Result<ComparisonResult, ChordError> {
        let first = self.code_to_chord(first)?;
        let second = self.code_to_chord(second)?;
        Ok(compare_chords(first, second, &self.config))
    }

    /// Chords for many inputs, computed in parallel, in input order.
    pub fn code_to_chords<S>(&self, codes: &[S]) -> Vec<Result<SoulChord, ChordError>>
    where
        S: AsRef<str> + Sync,
    {
        codes.par_iter().map(|code| self.code_to_chord(code.as_ref())).collect()
    }
}

impl Default for ChordEngine<SpectralHasher> {
    fn default() -> Self {
        ChordEngine::with_extractor(SpectralHasher::default())
    }
}

/// Chord for `code` using the stock hasher and config.
pub fn code_to_chord(code: &str) -> Result<SoulChord, ChordError> {
    ChordEngine::default().code_to_chord(code)
}

/// Compare two code strings using the stock hasher and config.
pub fn compare_harmony(first: &str, second: &str) -> Result<ComparisonResult, ChordError> {
    ChordEngine::default().compare_harmony(first, second)
}
