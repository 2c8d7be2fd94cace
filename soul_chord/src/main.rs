// Soul Chord CLI.
//
// Reads source files, prints their chords, and optionally writes MIDI or WAV.
//
// Usage:
//   soulchord chord <FILE> [--json] [--midi OUT] [--wav OUT]
//   soulchord compare <FILE_A> <FILE_B> [--json]
//   soulchord batch <FILE>... [--json] [--midi OUT]
//
// Global options: --config CFG (EngineConfig JSON), --top-k N, --tempo BPM.
// Set RUST_LOG=debug to trace the pipeline.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use soul_chord::midi::{MidiOptions, write_chord, write_progression};
use soul_chord::render::{RenderConfig, write_wav};
use soul_chord::{ChordEngine, ChordError, ComparisonResult, EngineConfig, MoreConsonant, SoulChord};
use spectral_hash::{HasherConfig, SpectralHasher};

#[derive(Parser, Debug)]
#[command(name = "soulchord")]
#[command(about = "Hear the structure of source code as a chord", long_about = None)]
struct Args {
    /// Engine config (JSON); omitted fields keep their defaults
    #[arg(long, global = true, value_name = "CFG")]
    config: Option<PathBuf>,

    /// Number of eigenvalues (notes) per chord
    #[arg(long, global = true, value_name = "N", default_value_t = 4)]
    top_k: usize,

    /// Tempo for MIDI output
    #[arg(long, global = true, value_name = "BPM", default_value_t = 72)]
    tempo: u16,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the chord of one file
    Chord {
        file: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Write the chord as a MIDI file
        #[arg(long, value_name = "OUT")]
        midi: Option<PathBuf>,
        /// Render the chord to a WAV file
        #[arg(long, value_name = "OUT")]
        wav: Option<PathBuf>,
    },
    /// Compare the harmony of two files
    Compare {
        first: PathBuf,
        second: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Chords for many files, computed in parallel
    Batch {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        json: bool,
        /// Write all chords, in order, as one MIDI progression
        #[arg(long, value_name = "OUT")]
        midi: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), ChordError> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let hasher = SpectralHasher::new(HasherConfig { top_k: args.top_k, ..Default::default() });
    let engine = ChordEngine::new(hasher, config)?;
    let midi_options = MidiOptions { tempo_bpm: args.tempo, ..Default::default() };

    match args.command {
        Command::Chord { file, json, midi, wav } => {
            let chord = engine.code_to_chord(&read_source(&file)?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&chord)?);
            } else {
                print_chord(&file, &chord);
            }
            if let Some(out) = midi {
                write_chord(&chord, &out, &midi_options)?;
                println!("MIDI written to {}", out.display());
            }
            if let Some(out) = wav {
                write_wav(&chord, &out, &RenderConfig::default())?;
                println!("WAV written to {}", out.display());
            }
        }
        Command::Compare { first, second, json } => {
            let result = engine.compare_harmony(&read_source(&first)?, &read_source(&second)?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_comparison(&first, &second, &result);
            }
        }
        Command::Batch { files, json, midi } => {
            let sources = files.iter().map(|f| read_source(f)).collect::<Result<Vec<_>, _>>()?;
            let results = engine.code_to_chords(sources.as_slice());

            let mut chords = Vec::with_capacity(results.len());
            for (file, result) in files.iter().zip(results) {
                match result {
                    Ok(chord) => {
                        if json {
                            println!("{}", serde_json::to_string(&chord)?);
                        } else {
                            println!(
                                "{}: {} ({}, tension {:.3}, {})",
                                file.display(),
                                chord.spelling(),
                                chord.quality,
                                chord.tension,
                                chord.color
                            );
                        }
                        chords.push(chord);
                    }
                    Err(e) => eprintln!("{}: {}", file.display(), e),
                }
            }
            if let Some(out) = midi {
                write_progression(&chords, &out, &midi_options)?;
                println!("MIDI written to {} ({} chords)", out.display(), chords.len());
            }
        }
    }
    Ok(())
}

fn read_source(path: &Path) -> Result<String, ChordError> {
    Ok(std::fs::read_to_string(path)?)
}

fn print_chord(file: &Path, chord: &SoulChord) {
    println!("=== {} ===", file.display());
    if chord.is_empty() {
        println!("(silence: no structure to hear)");
    }
    for ((note, freq), midi) in chord.notes.iter().zip(&chord.frequencies).zip(&chord.midi_numbers) {
        println!("  {:<4} {:>9.2} Hz  (MIDI {})", note, freq, midi);
    }
    println!("Quality: {}", chord.quality);
    println!("Tension: {:.3}", chord.tension);
    println!("Color:   {}", chord.color);
}

fn print_comparison(first: &Path, second: &Path, result: &ComparisonResult) {
    print_chord(first, &result.first);
    println!();
    print_chord(second, &result.second);
    println!();
    println!("Harmonic distance: {:.3}", result.harmonic_distance);
    match result.more_consonant {
        MoreConsonant::First => println!("More consonant: {}", first.display()),
        MoreConsonant::Second => println!("More consonant: {}", second.display()),
        MoreConsonant::Equal => println!("More consonant: neither (equal within tolerance)"),
    }
}
