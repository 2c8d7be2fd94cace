// Harmony analyzer: frequencies -> {quality, tension}.
//
// Every unordered pair of positions (i < j) contributes one interval. The
// ratio f[j] / f[i] is taken in index order (frequencies are not sorted),
// and the pair counts as consonant when either that ratio or its reciprocal
// lies within `ratio_tolerance` of an entry in the consonant interval table.
// The first matching entry wins; a pair is never counted twice.
//
//   tension = 1 - consonant_pairs / total_pairs
//
// Tension below `consonant_below` is Consonant, above `dissonant_above` is
// Dissonant, anything between is Neutral. With fewer than two frequencies no
// interval exists, so the result is Neutral with zero tension and no
// comparisons are made.

use serde::{Deserialize, Serialize};

use crate::config::{ConsonantInterval, EngineConfig};

/// Categorical summary of a chord's tension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Consonant,
    Dissonant,
    Neutral,
}

impl Quality {
    /// Classify a tension value against the configured thresholds.
    pub fn from_tension(tension: f64, config: &EngineConfig) -> Self {
        if tension < config.consonant_below {
            Quality::Consonant
        } else if tension > config.dissonant_above {
            Quality::Dissonant
        } else {
            Quality::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quality::Consonant => "consonant",
            Quality::Dissonant => "dissonant",
            Quality::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of analyzing one set of frequencies.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HarmonyAnalysis {
    pub quality: Quality,
    /// 0 = every interval consonant, 1 = none consonant.
    pub tension: f64,
    pub consonant_pairs: usize,
    pub total_pairs: usize,
}

impl HarmonyAnalysis {
    /// The defined result for zero or one frequency.
    pub fn degenerate() -> Self {
        HarmonyAnalysis {
            quality: Quality::Neutral,
            tension: 0.0,
            consonant_pairs: 0,
            total_pairs: 0,
        }
    }
}

/// First table entry within tolerance of `upper / lower` or `lower / upper`.
///
/// Both quotients are computed directly (rather than one as the reciprocal of
/// the other) so the check is exactly symmetric in its arguments.
pub fn matching_interval<'c>(
    lower: f64,
    upper: f64,
    config: &'c EngineConfig,
) -> Option<&'c ConsonantInterval> {
    let ratio = upper / lower;
    let reciprocal = lower / upper;
    let tolerance = config.ratio_tolerance;
    config.consonant_ratios.iter().find(|interval| {
        (ratio - interval.ratio).abs() <= tolerance || (reciprocal - interval.ratio).abs() <= tolerance
    })
}

/// Pairwise consonance analysis of a set of frequencies.
pub fn analyze(frequencies: &[f64], config: &EngineConfig) -> HarmonyAnalysis {
    if frequencies.len() < 2 {
        return HarmonyAnalysis::degenerate();
    }

    let mut consonant_pairs = 0;
    let mut total_pairs = 0;
    for (i, &fi) in frequencies.iter().enumerate() {
        for &fj in &frequencies[i + 1..] {
            total_pairs += 1;
            if let Some(interval) = matching_interval(fi, fj, config) {
                log::trace!("{:.2} Hz / {:.2} Hz ~ {}", fj, fi, interval.name);
                consonant_pairs += 1;
            }
        }
    }

    let tension = 1.0 - consonant_pairs as f64 / total_pairs as f64;
    HarmonyAnalysis {
        quality: Quality::from_tension(tension, config),
        tension,
        consonant_pairs,
        total_pairs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(frequencies: &[f64]) -> HarmonyAnalysis {
        analyze(frequencies, EngineConfig::stock())
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(run(&[]), HarmonyAnalysis::degenerate());
        assert_eq!(run(&[440.0]), HarmonyAnalysis::degenerate());
        assert_eq!(run(&[440.0]).quality, Quality::Neutral);
        assert_eq!(run(&[440.0]).tension, 0.0);
    }

    #[test]
    fn test_octave_is_consonant() {
        let a = run(&[220.0, 440.0]);
        assert_eq!(a.tension, 0.0);
        assert_eq!(a.quality, Quality::Consonant);
        assert_eq!((a.consonant_pairs, a.total_pairs), (1, 1));
    }

    #[test]
    fn test_major_triad_like_set() {
        // fifth, octave, fourth: every pair consonant
        let a = run(&[100.0, 150.0, 200.0]);
        assert_eq!(a.consonant_pairs, 3);
        assert_eq!(a.quality, Quality::Consonant);
    }

    #[test]
    fn test_neutral_band() {
        // 1.5 matches; 2.9 and 1.933 do not
        let a = run(&[100.0, 150.0, 290.0]);
        assert_eq!((a.consonant_pairs, a.total_pairs), (1, 3));
        assert!((a.tension - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(a.quality, Quality::Neutral);
    }

    #[test]
    fn test_dissonant_cluster() {
        let a = run(&[100.0, 107.0, 300.0]);
        assert_eq!(a.consonant_pairs, 0);
        assert_eq!(a.tension, 1.0);
        assert_eq!(a.quality, Quality::Dissonant);
    }

    #[test]
    fn test_descending_ratio_uses_reciprocal() {
        // 440 -> 220 is a ratio of 0.5; its reciprocal is the octave
        assert_eq!(run(&[440.0, 220.0]).tension, 0.0);
    }

    #[test]
    fn test_pair_order_symmetry() {
        let pairs = [(100.0, 151.0), (300.0, 200.0), (261.0, 333.0), (108.0, 647.27), (50.0, 52.4)];
        for (f1, f2) in pairs {
            let forward = run(&[f1, f2]);
            let backward = run(&[f2, f1]);
            assert_eq!(forward.quality, backward.quality, "{} / {}", f1, f2);
            assert_eq!(forward.tension, backward.tension, "{} / {}", f1, f2);
        }
    }

    #[test]
    fn test_tolerance_edge() {
        // 1.54 is within 0.05 of the fifth; at 0.01 nothing in the table matches
        assert!(matching_interval(100.0, 154.0, EngineConfig::stock()).is_some());
        let tight = EngineConfig { ratio_tolerance: 0.01, ..Default::default() };
        assert!(matching_interval(100.0, 154.0, &tight).is_none());
    }

    #[test]
    fn test_first_match_wins() {
        // 1.23 is within tolerance of both the major third (1.25) and the
        // minor third (1.2); the major third is listed first.
        let interval = matching_interval(100.0, 123.0, EngineConfig::stock()).unwrap();
        assert_eq!(interval.name, "major third");
    }

    #[test]
    fn test_tension_in_unit_range() {
        let sets: [&[f64]; 4] = [
            &[108.0, 272.14, 647.27],
            &[100.0, 125.0, 150.0, 200.0],
            &[55.0, 61.0, 67.0, 73.0, 79.0],
            &[432.0, 432.0],
        ];
        for set in sets {
            let a = run(set);
            assert!((0.0..=1.0).contains(&a.tension), "{:?} -> {}", set, a.tension);
        }
    }

    #[test]
    fn test_quality_thresholds_are_strict() {
        let config = EngineConfig::stock();
        assert_eq!(Quality::from_tension(0.3, config), Quality::Neutral);
        assert_eq!(Quality::from_tension(0.29, config), Quality::Consonant);
        assert_eq!(Quality::from_tension(0.7, config), Quality::Neutral);
        assert_eq!(Quality::from_tension(0.71, config), Quality::Dissonant);
    }
}
