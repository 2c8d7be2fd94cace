// Data-driven engine configuration.
//
// Every tunable constant of the chord pipeline lives in `EngineConfig`:
// tuning reference, eigenvalue bands, the consonant interval table, the
// near-equality tolerances, quality thresholds, and the color anchors.
// The pipeline functions take a `&EngineConfig` and never read magic
// numbers of their own, so a config file can retune the whole engine
// without recompilation.
//
// Configs load from JSON. The struct is `#[serde(default)]`, so a file only
// needs the fields it overrides; everything else falls back to the stock
// values defined in `Default`.
//
// See also: `frequency.rs` (bands), `harmony.rs` (interval table and
// thresholds), `color.rs` (anchors), `compare.rs` (comparison tolerance).

use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::ChordError;

/// The one near-equality tolerance shared by interval matching and chord
/// comparison.
pub const NEAR_EQUAL_TOLERANCE: f64 = 0.05;

/// Reference tuning: MIDI note 69 sounds at this frequency.
pub const DEFAULT_TUNING_HZ: f64 = 432.0;

/// Semitones per octave.
pub const SEMITONES: i32 = 12;

static DEFAULT_CONFIG: LazyLock<EngineConfig> = LazyLock::new(EngineConfig::default);

// ---------------------------------------------------------------------------
// Eigenvalue bands
// ---------------------------------------------------------------------------

/// A fixed eigenvalue band: every eigenvalue from `lower_bound` up to the
/// next band's lower bound maps to the same pitch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBand {
    /// Inclusive lower edge of the band.
    pub lower_bound: f64,
    /// Octaves above (positive) or below (negative) the tuning reference.
    pub octave_shift: i32,
    /// Semitones above the octave-shifted reference.
    pub semitone_offset: i32,
}

/// The open-ended top band, where pitch spreads chromatically with the
/// eigenvalue's magnitude:
/// `octave = floor(log2(λ / lower_bound)) + 1`,
/// `semitone = round((λ mod period) * semitone_scale)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpperBand {
    pub lower_bound: f64,
    pub period: f64,
    pub semitone_scale: f64,
}

/// What to do when the top band's semitone offset reaches 12 or more.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemitoneOverflow {
    /// Reduce the offset modulo 12 (stays in the computed octave).
    Wrap,
    /// Keep the raw offset, which spills into the next octave.
    Unbounded,
}

/// A named frequency ratio that counts as consonant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsonantInterval {
    pub name: String,
    pub ratio: f64,
}

impl ConsonantInterval {
    pub fn new(name: &str, ratio: f64) -> Self {
        ConsonantInterval { name: name.to_string(), ratio }
    }
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Frequency assigned to `reference_midi`.
    pub tuning_hz: f64,
    /// MIDI number that sounds at `tuning_hz`.
    pub reference_midi: i32,

    /// Fixed bands in ascending `lower_bound` order. The first must start at
    /// or below zero and all must lie below `upper_band.lower_bound`.
    pub bands: Vec<FrequencyBand>,
    pub upper_band: UpperBand,
    pub semitone_overflow: SemitoneOverflow,

    /// Checked in order; the first match wins.
    pub consonant_ratios: Vec<ConsonantInterval>,
    /// Absolute tolerance when matching a ratio against the table.
    pub ratio_tolerance: f64,
    /// Tension difference below which two chords are called equal.
    pub comparison_tolerance: f64,
    /// Tension strictly below this is `Consonant`.
    pub consonant_below: f64,
    /// Tension strictly above this is `Dissonant`.
    pub dissonant_above: f64,

    /// Frequency mapped to the red end of the color ramp (A0).
    pub color_low_hz: f64,
    /// Frequency mapped to the blue end of the color ramp (C8).
    pub color_high_hz: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            tuning_hz: DEFAULT_TUNING_HZ,
            reference_midi: 69,

            bands: vec![
                // near-silent structural noise: sub-bass
                FrequencyBand { lower_bound: 0.0, octave_shift: -2, semitone_offset: 0 },
                // minor structural weight: bass, major third
                FrequencyBand { lower_bound: 0.1, octave_shift: -1, semitone_offset: 4 },
                // dominant structural modes: midrange, fifth
                FrequencyBand { lower_bound: 1.0, octave_shift: 0, semitone_offset: 7 },
            ],
            upper_band: UpperBand { lower_bound: 10.0, period: 10.0, semitone_scale: 1.2 },
            semitone_overflow: SemitoneOverflow::Wrap,

            consonant_ratios: vec![
                ConsonantInterval::new("unison", 1.0),
                ConsonantInterval::new("octave", 2.0),
                ConsonantInterval::new("perfect fifth", 1.5),
                ConsonantInterval::new("perfect fourth", 1.333),
                ConsonantInterval::new("major third", 1.25),
                ConsonantInterval::new("minor third", 1.2),
                ConsonantInterval::new("major sixth", 1.667),
                ConsonantInterval::new("minor sixth", 1.6),
            ],
            ratio_tolerance: NEAR_EQUAL_TOLERANCE,
            comparison_tolerance: NEAR_EQUAL_TOLERANCE,
            consonant_below: 0.3,
            dissonant_above: 0.7,

            color_low_hz: 27.5,
            color_high_hz: 4186.0,
        }
    }
}

impl EngineConfig {
    /// Shared stock configuration, built once.
    pub fn stock() -> &'static EngineConfig {
        &DEFAULT_CONFIG
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ChordError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ChordError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject configs the pipeline cannot evaluate meaningfully.
    pub fn validate(&self) -> Result<(), ChordError> {
        let invalid = |msg: String| Err(ChordError::InvalidConfig(msg));

        if !(self.tuning_hz.is_finite() && self.tuning_hz > 0.0) {
            return invalid(format!("tuning_hz must be positive, got {}", self.tuning_hz));
        }
        if let Some(band) = self.bands.iter().find(|b| !b.lower_bound.is_finite()) {
            return invalid(format!("band lower bounds must be finite, got {}", band.lower_bound));
        }
        match self.bands.first() {
            None => return invalid("at least one fixed band is required".to_string()),
            Some(first) if first.lower_bound > 0.0 => {
                return invalid(format!(
                    "first band must start at or below 0, got {}",
                    first.lower_bound
                ));
            }
            Some(_) => {}
        }
        if self.bands.windows(2).any(|w| w[0].lower_bound >= w[1].lower_bound) {
            return invalid("band lower bounds must be strictly ascending".to_string());
        }
        let top = self.upper_band;
        if let Some(last) = self.bands.last() {
            if last.lower_bound >= top.lower_bound {
                return invalid(format!(
                    "upper band must start above the last fixed band ({} >= {})",
                    last.lower_bound, top.lower_bound
                ));
            }
        }
        if !(top.lower_bound > 0.0 && top.period > 0.0 && top.semitone_scale.is_finite()) {
            return invalid("upper band needs positive lower_bound and period".to_string());
        }
        if self.consonant_ratios.iter().any(|iv| !(iv.ratio.is_finite() && iv.ratio > 0.0)) {
            return invalid("consonant ratios must be positive".to_string());
        }
        if !(self.ratio_tolerance >= 0.0 && self.comparison_tolerance >= 0.0) {
            return invalid("tolerances must be non-negative".to_string());
        }
        if !(0.0..=1.0).contains(&self.consonant_below)
            || !(0.0..=1.0).contains(&self.dissonant_above)
            || self.consonant_below > self.dissonant_above
        {
            return invalid(format!(
                "need 0 <= consonant_below <= dissonant_above <= 1, got {} / {}",
                self.consonant_below, self.dissonant_above
            ));
        }
        if !(self.color_low_hz > 0.0 && self.color_high_hz > self.color_low_hz) {
            return invalid(format!(
                "color anchors must satisfy 0 < low < high, got {} / {}",
                self.color_low_hz, self.color_high_hz
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        EngineConfig::default().validate().unwrap();
        assert_eq!(EngineConfig::stock(), &EngineConfig::default());
    }

    #[test]
    fn test_shared_tolerance() {
        let config = EngineConfig::default();
        assert_eq!(config.ratio_tolerance, NEAR_EQUAL_TOLERANCE);
        assert_eq!(config.comparison_tolerance, NEAR_EQUAL_TOLERANCE);
    }

    #[test]
    fn test_default_config_serializes() {
        let config = EngineConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let restored = EngineConfig::from_json_str(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = EngineConfig::from_json_str(
            r#"{ "tuning_hz": 440.0, "semitone_overflow": "unbounded" }"#,
        )
        .unwrap();
        assert_eq!(config.tuning_hz, 440.0);
        assert_eq!(config.semitone_overflow, SemitoneOverflow::Unbounded);
        assert_eq!(config.consonant_ratios.len(), 8);
    }

    #[test]
    fn test_rejects_bad_tuning() {
        let err = EngineConfig::from_json_str(r#"{ "tuning_hz": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ChordError::InvalidConfig(_)), "got {:?}", err);
    }

    #[test]
    fn test_rejects_unsorted_bands() {
        let mut config = EngineConfig::default();
        config.bands.swap(0, 2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_band_bound() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut config = EngineConfig::default();
            config.bands[1].lower_bound = bad;
            let err = config.validate().unwrap_err();
            assert!(matches!(err, ChordError::InvalidConfig(_)), "{} accepted: {:?}", bad, err);
        }
    }

    #[test]
    fn test_rejects_band_overlapping_upper() {
        let mut config = EngineConfig::default();
        config.upper_band.lower_bound = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let config = EngineConfig { consonant_below: 0.8, dissonant_above: 0.2, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = EngineConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ChordError::Json(_)), "got {:?}", err);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("soul_chord_no_such_config.json");
        let err = EngineConfig::load(&path).unwrap_err();
        assert!(matches!(err, ChordError::Io(_)), "got {:?}", err);
    }
}
