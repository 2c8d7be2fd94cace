// MIDI output for chords and chord progressions.
//
// Writes a Standard MIDI File (SMF Format 0, single track) in which each
// chord's notes sound together for `beats_per_chord` quarter notes, chords
// following one another with no gaps. Empty chords become rests of the same
// length.
//
// MIDI numbers outside 0..=127 are octave-folded into range, so the pitch
// class survives even when the register does not. Duplicate keys within a
// chord are sent once. Attack velocity rises with tension, from 40 for a
// fully consonant chord to 110 for a fully dissonant one.
//
// Uses the `midly` crate for MIDI writing.

use std::collections::BTreeSet;
use std::path::Path;

use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};

use crate::chord::SoulChord;
use crate::config::SEMITONES;
use crate::error::ChordError;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u32 = 480;

const MIN_VELOCITY: u8 = 40;
const MAX_VELOCITY: u8 = 110;

/// Slowest tempo whose microseconds-per-quarter still fits in 24 bits.
const MIN_TEMPO_BPM: u16 = 4;

const CHANNEL: u8 = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MidiOptions {
    pub tempo_bpm: u16,
    /// Length of each chord in quarter notes.
    pub beats_per_chord: u16,
    /// General MIDI program (0-based). 52 is choir aahs.
    pub program: u8,
}

impl Default for MidiOptions {
    fn default() -> Self {
        MidiOptions {
            tempo_bpm: 72,
            beats_per_chord: 4,
            program: 52,
        }
    }
}

/// Fold a MIDI number into 0..=127 by whole octaves.
pub fn midi_key(midi_number: i32) -> u8 {
    let folded = if midi_number < 0 {
        midi_number.rem_euclid(SEMITONES)
    } else if midi_number > 127 {
        let top = 120 + midi_number.rem_euclid(SEMITONES);
        if top > 127 { top - SEMITONES } else { top }
    } else {
        midi_number
    };
    folded as u8
}

/// Attack velocity for a chord of the given tension.
pub fn velocity(tension: f64) -> u8 {
    let span = (MAX_VELOCITY - MIN_VELOCITY) as f64;
    let v = MIN_VELOCITY as f64 + (tension * span).round();
    v.clamp(MIN_VELOCITY as f64, MAX_VELOCITY as f64) as u8
}

/// Encode a chord sequence as SMF bytes.
pub fn encode_progression(chords: &[SoulChord], options: &MidiOptions) -> Result<Vec<u8>, ChordError> {
    let smf = progression_to_smf(chords, options);
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    Ok(buf)
}

/// Write a single chord to a MIDI file.
pub fn write_chord(chord: &SoulChord, path: &Path, options: &MidiOptions) -> Result<(), ChordError> {
    write_progression(std::slice::from_ref(chord), path, options)
}

/// Write a chord sequence to a MIDI file.
pub fn write_progression(
    chords: &[SoulChord],
    path: &Path,
    options: &MidiOptions,
) -> Result<(), ChordError> {
    let buf = encode_progression(chords, options)?;
    std::fs::write(path, &buf)?;
    log::debug!("wrote {} chords ({} bytes) to {}", chords.len(), buf.len(), path.display());
    Ok(())
}

fn midi_event(delta: u32, message: MidiMessage) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Midi {
            channel: u4::new(CHANNEL),
            message,
        },
    }
}

/// Convert a chord sequence to an in-memory SMF.
fn progression_to_smf(chords: &[SoulChord], options: &MidiOptions) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER as u16)),
    ));

    let mut track: Track<'static> = Vec::new();
    let tempo_microseconds = 60_000_000 / options.tempo_bpm.max(MIN_TEMPO_BPM) as u32;
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(b"Soul Chord")),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds))),
    });
    track.push(midi_event(
        0,
        MidiMessage::ProgramChange {
            program: u7::new(options.program.min(127)),
        },
    ));

    let chord_ticks = TICKS_PER_QUARTER * options.beats_per_chord as u32;
    // Ticks since the last event, carried across rests.
    let mut pending: u32 = 0;

    for chord in chords {
        let keys: BTreeSet<u8> = chord.midi_numbers.iter().map(|&m| midi_key(m)).collect();
        if keys.is_empty() {
            pending += chord_ticks;
            continue;
        }

        let vel = u7::new(velocity(chord.tension));
        for (i, &key) in keys.iter().enumerate() {
            let delta = if i == 0 { pending } else { 0 };
            track.push(midi_event(delta, MidiMessage::NoteOn { key: u7::new(key), vel }));
        }
        for (i, &key) in keys.iter().enumerate() {
            let delta = if i == 0 { chord_ticks } else { 0 };
            track.push(midi_event(
                delta,
                MidiMessage::NoteOff {
                    key: u7::new(key),
                    vel: u7::new(0),
                },
            ));
        }
        pending = 0;
    }

    track.push(TrackEvent {
        delta: u28::new(pending),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);

    smf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn chord(eigenvalues: &[f64]) -> SoulChord {
        SoulChord::from_spectrum(eigenvalues, EngineConfig::stock()).unwrap()
    }

    /// (key, is_note_on, absolute tick) for every note event.
    fn note_events(bytes: &[u8]) -> Vec<(u8, bool, u32)> {
        let smf = Smf::parse(bytes).unwrap();
        assert_eq!(smf.tracks.len(), 1);
        let mut tick = 0;
        let mut events = Vec::new();
        for event in &smf.tracks[0] {
            tick += event.delta.as_int();
            if let TrackEventKind::Midi { message, .. } = event.kind {
                match message {
                    MidiMessage::NoteOn { key, .. } => events.push((key.as_int(), true, tick)),
                    MidiMessage::NoteOff { key, .. } => events.push((key.as_int(), false, tick)),
                    _ => {}
                }
            }
        }
        events
    }

    #[test]
    fn test_midi_key_folding() {
        assert_eq!(midi_key(60), 60);
        assert_eq!(midi_key(0), 0);
        assert_eq!(midi_key(127), 127);
        assert_eq!(midi_key(-1), 11);
        assert_eq!(midi_key(-12), 0);
        assert_eq!(midi_key(128), 116);
        assert_eq!(midi_key(130), 118);
        assert_eq!(midi_key(140), 116);
        // pitch class is preserved
        for m in [-30, -5, 128, 133, 200] {
            assert_eq!(midi_key(m) as i32 % 12, m.rem_euclid(12), "midi {}", m);
        }
    }

    #[test]
    fn test_velocity_range() {
        assert_eq!(velocity(0.0), 40);
        assert_eq!(velocity(1.0), 110);
        assert_eq!(velocity(0.5), 75);
        assert_eq!(velocity(-3.0), 40);
        assert_eq!(velocity(7.0), 110);
    }

    #[test]
    fn test_single_chord_sounds_together() {
        let bytes = encode_progression(&[chord(&[0.05, 0.5, 5.0])], &MidiOptions::default()).unwrap();
        let events = note_events(&bytes);
        let ons: Vec<_> = events.iter().filter(|e| e.1).collect();
        let offs: Vec<_> = events.iter().filter(|e| !e.1).collect();
        assert_eq!(ons.iter().map(|e| e.0).collect::<Vec<_>>(), vec![45, 61, 76]);
        assert!(ons.iter().all(|e| e.2 == 0));
        assert_eq!(offs.len(), 3);
        assert!(offs.iter().all(|e| e.2 == 4 * TICKS_PER_QUARTER));
    }

    #[test]
    fn test_progression_and_rests() {
        let options = MidiOptions { beats_per_chord: 2, ..Default::default() };
        let chords = [chord(&[5.0]), chord(&[]), chord(&[0.05])];
        let events = note_events(&encode_progression(&chords, &options).unwrap());
        let step = 2 * TICKS_PER_QUARTER;
        assert_eq!(
            events,
            vec![(76, true, 0), (76, false, step), (45, true, 2 * step), (45, false, 3 * step)]
        );
    }

    #[test]
    fn test_duplicate_keys_sent_once() {
        let events = note_events(&encode_progression(&[chord(&[2.0, 3.0])], &MidiOptions::default()).unwrap());
        assert_eq!(events.iter().filter(|e| e.1).count(), 1);
    }

    #[test]
    fn test_header_and_tempo() {
        let bytes = encode_progression(&[chord(&[1.0])], &MidiOptions { tempo_bpm: 120, ..Default::default() })
            .unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.header.format, Format::SingleTrack);
        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(480)));
        let tempo = smf.tracks[0].iter().find_map(|e| match e.kind {
            TrackEventKind::Meta(MetaMessage::Tempo(t)) => Some(t.as_int()),
            _ => None,
        });
        assert_eq!(tempo, Some(500_000));
    }

    #[test]
    fn test_write_chord_to_file() {
        let path = std::env::temp_dir().join(format!("soul_chord_midi_{}.mid", std::process::id()));
        write_chord(&chord(&[0.5, 5.0]), &path, &MidiOptions::default()).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(&bytes[..4], b"MThd");
        assert_eq!(note_events(&bytes).len(), 4);
    }
}
