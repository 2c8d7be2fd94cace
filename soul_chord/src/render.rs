// Offline audio rendering of a chord.
//
// A chord renders as an equal-weighted sum of sine partials, one per
// distinct frequency, divided by the partial count so the mix never exceeds
// `amplitude`. A linear attack and release shape the note. Partials at or
// above Nyquist are dropped; a chord with nothing left renders as silence
// of the requested length.
//
// Output is 32-bit float mono WAV written with `hound`.

use std::f64::consts::TAU;
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chord::SoulChord;
use crate::error::ChordError;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub sample_rate_hz: u32,
    pub duration_secs: f64,
    pub attack_secs: f64,
    pub release_secs: f64,
    /// Peak level of the full mix, in 0..=1.
    pub amplitude: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            sample_rate_hz: 44_100,
            duration_secs: 2.0,
            attack_secs: 0.05,
            release_secs: 0.3,
            amplitude: 0.5,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), ChordError> {
        let invalid = |msg: &str| Err(ChordError::InvalidConfig(msg.to_string()));
        if self.sample_rate_hz == 0 {
            return invalid("sample_rate_hz must be positive");
        }
        if !(self.duration_secs.is_finite() && self.duration_secs >= 0.0) {
            return invalid("duration_secs must be finite and non-negative");
        }
        if !(self.attack_secs >= 0.0 && self.release_secs >= 0.0) {
            return invalid("attack_secs and release_secs must be non-negative");
        }
        if !(0.0..=1.0).contains(&self.amplitude) {
            return invalid("amplitude must lie in 0..=1");
        }
        Ok(())
    }

    pub fn sample_count(&self) -> usize {
        (self.duration_secs * self.sample_rate_hz as f64).round() as usize
    }

    pub fn wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate_hz,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        }
    }

    /// Linear attack/release gain at `t` seconds, in 0..=1.
    fn envelope(&self, t: f64) -> f64 {
        let attack = if self.attack_secs > 0.0 { t / self.attack_secs } else { 1.0 };
        let remaining = self.duration_secs - t;
        let release = if self.release_secs > 0.0 { remaining / self.release_secs } else { 1.0 };
        attack.min(release).clamp(0.0, 1.0)
    }
}

/// Mono samples for a set of frequencies.
pub fn render_frequencies(frequencies: &[f64], config: &RenderConfig) -> Result<Vec<f32>, ChordError> {
    config.validate()?;

    let nyquist = config.sample_rate_hz as f64 / 2.0;
    let mut partials: Vec<f64> = Vec::with_capacity(frequencies.len());
    for &f in frequencies {
        if !(f > 0.0 && f < nyquist) {
            log::debug!("dropping {:.2} Hz partial (nyquist {:.0} Hz)", f, nyquist);
        } else if !partials.contains(&f) {
            partials.push(f);
        }
    }

    let count = config.sample_count();
    if partials.is_empty() {
        return Ok(vec![0.0; count]);
    }

    let rate = config.sample_rate_hz as f64;
    let scale = config.amplitude / partials.len() as f64;
    let samples = (0..count)
        .map(|i| {
            let t = i as f64 / rate;
            let mix: f64 = partials.iter().map(|&f| (TAU * f * t).sin()).sum();
            (mix * scale * config.envelope(t)) as f32
        })
        .collect();
    Ok(samples)
}

/// Mono samples for a chord.
pub fn render_chord(chord: &SoulChord, config: &RenderConfig) -> Result<Vec<f32>, ChordError> {
    render_frequencies(&chord.frequencies, config)
}

/// Render a chord into any seekable writer as a WAV stream.
pub fn write_wav_to<W: Write + Seek>(
    chord: &SoulChord,
    out: W,
    config: &RenderConfig,
) -> Result<(), ChordError> {
    let samples = render_chord(chord, config)?;
    let mut writer = hound::WavWriter::new(out, config.wav_spec())?;
    for sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Render a chord to a WAV file. An invalid config fails before the file
/// is created.
pub fn write_wav(chord: &SoulChord, path: &Path, config: &RenderConfig) -> Result<(), ChordError> {
    config.validate()?;
    let file = BufWriter::new(File::create(path)?);
    write_wav_to(chord, file, config)?;
    log::debug!("wrote {} samples to {}", config.sample_count(), path.display());
    Ok(())
}
