// The soul chord: the engine's single output record.
//
// A `SoulChord` is built from an eigen-spectrum in one pass:
//   eigenvalues -> frequencies (frequency.rs)
//               -> MIDI numbers + note names (pitch.rs)
//               -> quality + tension (harmony.rs)
//               -> color (color.rs)
// All per-note vectors are order-aligned with the input spectrum.
//
// Construction is all-or-nothing: any negative or non-finite eigenvalue
// rejects the whole spectrum before anything is computed, as does one so
// large its frequency overflows. An empty or single-value spectrum is fine
// and yields a neutral, tension-free chord.

use serde::{Deserialize, Serialize};

use crate::color::color_of;
use crate::config::EngineConfig;
use crate::error::ChordError;
use crate::frequency::eigenvalue_to_frequency;
use crate::harmony::{Quality, analyze};
use crate::pitch::{frequency_to_midi, midi_to_note_name};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoulChord {
    /// Hz, one per eigenvalue, in spectrum order.
    pub frequencies: Vec<f64>,
    /// Note names such as `"C#4"`, aligned with `frequencies`.
    pub notes: Vec<String>,
    /// MIDI numbers (may fall outside 0..=127), aligned with `frequencies`.
    pub midi_numbers: Vec<i32>,
    pub quality: Quality,
    /// 0 = fully consonant, 1 = fully dissonant.
    pub tension: f64,
    /// `#rrggbb`
    pub color: String,
}

impl SoulChord {
    /// Build a chord from a ranked eigen-spectrum.
    pub fn from_spectrum(eigenvalues: &[f64], config: &EngineConfig) -> Result<Self, ChordError> {
        validate_spectrum(eigenvalues)?;

        let frequencies: Vec<f64> = eigenvalues
            .iter()
            .map(|&lambda| eigenvalue_to_frequency(lambda, config))
            .collect();
        // Astronomically large eigenvalues overflow the top band's octave
        // arithmetic; the whole spectrum is rejected rather than naming inf.
        if let Some(index) = frequencies.iter().position(|f| !f.is_finite()) {
            return Err(ChordError::InvalidEigenvalue { index, value: eigenvalues[index] });
        }
        let midi_numbers: Vec<i32> =
            frequencies.iter().map(|&f| frequency_to_midi(f, config)).collect();
        let notes = midi_numbers.iter().map(|&m| midi_to_note_name(m)).collect();
        let harmony = analyze(&frequencies, config);
        let color = color_of(&frequencies, config);

        let chord = SoulChord {
            frequencies,
            notes,
            midi_numbers,
            quality: harmony.quality,
            tension: harmony.tension,
            color,
        };
        log::debug!(
            "chord {:?} -> [{}] {} (tension {:.3}, {})",
            eigenvalues,
            chord.notes.join(" "),
            chord.quality,
            chord.tension,
            chord.color
        );
        Ok(chord)
    }

    /// Number of notes in the chord.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Notes joined with spaces, e.g. `"A2 C#4 E5"`.
    pub fn spelling(&self) -> String {
        self.notes.join(" ")
    }
}

/// Reject any eigenvalue the logarithmic mappings cannot accept.
pub fn validate_spectrum(eigenvalues: &[f64]) -> Result<(), ChordError> {
    match eigenvalues
        .iter()
        .enumerate()
        .find(|(_, v)| !(v.is_finite() && **v >= 0.0))
    {
        Some((index, &value)) => Err(ChordError::InvalidEigenvalue { index, value }),
        None => Ok(()),
    }
}
