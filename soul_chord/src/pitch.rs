// Pitch namer: frequency -> MIDI number -> note name.
//
// MIDI numbers are computed against the engine's tuning reference, which by
// default assigns MIDI 69 (A4) to 432 Hz rather than concert 440 Hz. Names
// use sharps and scientific octave numbering (C4 = MIDI 60). Negative MIDI
// numbers are valid here; floor division keeps their names well-formed
// (MIDI -1 is B-2, not an out-of-range index).

use crate::config::{EngineConfig, SEMITONES};

/// Chromatic pitch-class names starting at C.
pub const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// Nearest MIDI number for a positive frequency.
pub fn frequency_to_midi(frequency: f64, config: &EngineConfig) -> i32 {
    debug_assert!(frequency > 0.0, "frequency must be positive, got {frequency}");
    let semitones = SEMITONES as f64 * (frequency / config.tuning_hz).log2();
    (config.reference_midi as f64 + semitones).round() as i32
}

/// Pitch class (0 = C .. 11 = B) of a MIDI number, negative numbers included.
pub fn pitch_class(midi: i32) -> usize {
    midi.rem_euclid(SEMITONES) as usize
}

/// Scientific octave number of a MIDI number.
pub fn octave(midi: i32) -> i32 {
    midi.div_euclid(SEMITONES) - 1
}

/// Note name such as `"A4"`, `"C#-1"`, or `"B-2"`.
pub fn midi_to_note_name(midi: i32) -> String {
    format!("{}{}", NOTE_NAMES[pitch_class(midi)], octave(midi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_pitch() {
        let config = EngineConfig::stock();
        assert_eq!(frequency_to_midi(432.0, config), 69);
        assert_eq!(midi_to_note_name(69), "A4");
    }

    #[test]
    fn test_octaves_of_reference() {
        let config = EngineConfig::stock();
        assert_eq!(frequency_to_midi(864.0, config), 81);
        assert_eq!(frequency_to_midi(216.0, config), 57);
        assert_eq!(frequency_to_midi(108.0, config), 45);
        assert_eq!(midi_to_note_name(45), "A2");
    }

    #[test]
    fn test_rounds_to_nearest_semitone() {
        let config = EngineConfig::stock();
        // 0.4 semitones sharp of A4 still rounds down
        let slightly_sharp = 432.0 * 2f64.powf(0.4 / 12.0);
        assert_eq!(frequency_to_midi(slightly_sharp, config), 69);
        let nearly_bb = 432.0 * 2f64.powf(0.6 / 12.0);
        assert_eq!(frequency_to_midi(nearly_bb, config), 70);
    }

    #[test]
    fn test_concert_pitch_differs() {
        // 440 Hz is a third of a semitone sharp of 432-based A4
        assert_eq!(frequency_to_midi(440.0, EngineConfig::stock()), 69);
        let concert = EngineConfig { tuning_hz: 440.0, ..Default::default() };
        assert_eq!(frequency_to_midi(261.6256, &concert), 60);
    }

    #[test]
    fn test_note_names() {
        assert_eq!(midi_to_note_name(60), "C4");
        assert_eq!(midi_to_note_name(61), "C#4");
        assert_eq!(midi_to_note_name(71), "B4");
        assert_eq!(midi_to_note_name(72), "C5");
        assert_eq!(midi_to_note_name(0), "C-1");
        assert_eq!(midi_to_note_name(127), "G9");
    }

    #[test]
    fn test_negative_midi_names() {
        assert_eq!(midi_to_note_name(-1), "B-2");
        assert_eq!(midi_to_note_name(-12), "C-2");
        assert_eq!(midi_to_note_name(-13), "B-3");
        assert_eq!(pitch_class(-1), 11);
    }
}
