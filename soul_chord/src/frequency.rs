// Frequency mapper: eigenvalue -> frequency (Hz).
//
// Eigenvalue magnitude maps broadly onto register. Small eigenvalues land in
// fixed low bands (sub-bass, bass, midrange), each pinned to one pitch;
// eigenvalues at or above the upper band's lower bound spread chromatically
// across ascending octaves. Band intervals are half-open, so a value exactly
// on a boundary belongs to the upper band.
//
// frequency = tuning * 2^octave_shift * 2^(semitone_offset / 12)
//
// The mapping is deterministic and lossy; it is not meant to be inverted.

use crate::config::{EngineConfig, SEMITONES, SemitoneOverflow};

/// Where an eigenvalue lands relative to the tuning reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub octave_shift: i32,
    pub semitone_offset: i32,
}

impl Placement {
    /// Frequency of this placement above (or below) `tuning_hz`.
    pub fn frequency(self, tuning_hz: f64) -> f64 {
        let exponent = self.octave_shift as f64 + self.semitone_offset as f64 / SEMITONES as f64;
        tuning_hz * exponent.exp2()
    }
}

/// Locate `eigenvalue` in the configured bands.
///
/// Expects a finite, non-negative eigenvalue (the chord builder rejects
/// anything else before it gets here).
pub fn place_eigenvalue(eigenvalue: f64, config: &EngineConfig) -> Placement {
    let top = &config.upper_band;
    if eigenvalue >= top.lower_bound {
        let octave_shift = (eigenvalue / top.lower_bound).log2().floor() as i32 + 1;
        let raw = ((eigenvalue % top.period) * top.semitone_scale).round() as i32;
        let semitone_offset = match config.semitone_overflow {
            SemitoneOverflow::Wrap => raw.rem_euclid(SEMITONES),
            SemitoneOverflow::Unbounded => raw,
        };
        if raw != semitone_offset {
            log::warn!(
                "eigenvalue {} overflowed to semitone {}, wrapped to {}",
                eigenvalue,
                raw,
                semitone_offset
            );
        }
        return Placement { octave_shift, semitone_offset };
    }

    config
        .bands
        .iter()
        .rev()
        .find(|band| eigenvalue >= band.lower_bound)
        .or(config.bands.first())
        .map(|band| Placement {
            octave_shift: band.octave_shift,
            semitone_offset: band.semitone_offset,
        })
        .unwrap_or(Placement { octave_shift: 0, semitone_offset: 0 })
}

/// Map one eigenvalue onto a frequency in Hz. Always positive for finite input.
pub fn eigenvalue_to_frequency(eigenvalue: f64, config: &EngineConfig) -> f64 {
    place_eigenvalue(eigenvalue, config).frequency(config.tuning_hz)
}
