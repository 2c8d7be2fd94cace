// Soul Chord
//
// Turns a piece of source code into a musical chord. The code's structural
// fingerprint (the top eigenvalues of its token graph, from `spectral_hash`)
// is mapped onto pitches in 432 Hz tuning; the pitches are named, scored for
// consonance, and given a synesthetic color. Two chords can be compared to
// say which snippet is the more harmonious.
//
// Architecture:
// - config.rs: EngineConfig (tuning, bands, interval table, thresholds), JSON loading
// - error.rs: ChordError
// - frequency.rs: eigenvalue -> frequency via fixed bands and the chromatic top band
// - pitch.rs: frequency -> MIDI number -> note name
// - harmony.rs: pairwise interval consonance -> quality + tension
// - color.rs: log-frequency color ramp, averaged to one hex color
// - chord.rs: SoulChord, assembled from a spectrum
// - compare.rs: tension-based chord comparison
// - extractor.rs: EigenvalueExtractor trait and its implementations
// - engine.rs: ChordEngine (code -> chord, comparison, parallel batches)
// - midi.rs: Standard MIDI File output for chords and progressions
// - render.rs: sine-sum WAV rendering
//
// Everything is deterministic for a given input and config.

pub mod chord;
pub mod color;
pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod frequency;
pub mod harmony;
pub mod midi;
pub mod pitch;
pub mod render;

pub use chord::SoulChord;
pub use compare::{ComparisonResult, MoreConsonant};
pub use config::EngineConfig;
pub use engine::{ChordEngine, code_to_chord, compare_harmony};
pub use error::ChordError;
pub use extractor::{EigenvalueExtractor, FixedSpectrum};
pub use harmony::Quality;
