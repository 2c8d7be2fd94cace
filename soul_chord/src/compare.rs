// Chord comparator: ranks two chords by tension.
//
// harmonic_distance = |tension_1 - tension_2|. The lower-tension chord is
// "more consonant" only if it wins by more than `comparison_tolerance`;
// closer than that the verdict is Equal.

use serde::{Deserialize, Serialize};

use crate::chord::SoulChord;
use crate::config::EngineConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoreConsonant {
    First,
    Second,
    Equal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub first: SoulChord,
    pub second: SoulChord,
    /// In [0, 1].
    pub harmonic_distance: f64,
    pub more_consonant: MoreConsonant,
}

/// Which tension is lower by more than `tolerance`, if either.
pub fn verdict(first_tension: f64, second_tension: f64, tolerance: f64) -> MoreConsonant {
    if first_tension < second_tension - tolerance {
        MoreConsonant::First
    } else if second_tension < first_tension - tolerance {
        MoreConsonant::Second
    } else {
        MoreConsonant::Equal
    }
}

/// Compare two already-built chords.
pub fn compare_chords(first: SoulChord, second: SoulChord, config: &EngineConfig) -> ComparisonResult {
    let harmonic_distance = (first.tension - second.tension).abs();
    let more_consonant = verdict(first.tension, second.tension, config.comparison_tolerance);
    ComparisonResult {
        first,
        second,
        harmonic_distance,
        more_consonant,
    }
}
