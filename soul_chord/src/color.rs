// Color synesthesia: frequencies -> one RGB hex color.
//
// Each frequency is placed on a logarithmic scale between the low anchor
// (red) and the high anchor (blue):
//
//   t = (log2 f - log2 low) / (log2 high - log2 low)
//
// t is not clamped, so frequencies outside the anchors extrapolate. The
// ramp is piecewise linear over thirds of t: red -> green, green -> blue,
// then solid blue. Contributions are summed per channel, averaged, rounded,
// and only then clamped to 0..=255. An empty chord is black.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// Color of a chord with no frequencies.
pub const SILENCE_HEX: &str = "#000000";

const FULL: f64 = 255.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Logarithmic position of `frequency` between the color anchors.
pub fn log_position(frequency: f64, config: &EngineConfig) -> f64 {
    let low = config.color_low_hz.log2();
    let high = config.color_high_hz.log2();
    (frequency.log2() - low) / (high - low)
}

/// Unclamped channel contributions for one ramp position.
pub fn ramp(t: f64) -> [f64; 3] {
    const THIRD: f64 = 1.0 / 3.0;
    if t < THIRD {
        let u = t * 3.0;
        [FULL * (1.0 - u), FULL * u, 0.0]
    } else if t < 2.0 * THIRD {
        let u = (t - THIRD) * 3.0;
        [0.0, FULL * (1.0 - u), FULL * u]
    } else {
        [0.0, 0.0, FULL]
    }
}

/// Average ramp color of a set of frequencies. Order does not matter.
pub fn blend(frequencies: &[f64], config: &EngineConfig) -> Rgb {
    if frequencies.is_empty() {
        return Rgb::BLACK;
    }

    let mut sum = [0.0f64; 3];
    for &f in frequencies {
        let contribution = ramp(log_position(f, config));
        for (acc, c) in sum.iter_mut().zip(contribution) {
            *acc += c;
        }
    }

    let count = frequencies.len() as f64;
    let channel = |total: f64| (total / count).round().clamp(0.0, FULL) as u8;
    Rgb {
        r: channel(sum[0]),
        g: channel(sum[1]),
        b: channel(sum[2]),
    }
}

/// Hex color for a set of frequencies; `"#000000"` when empty.
pub fn color_of(frequencies: &[f64], config: &EngineConfig) -> String {
    blend(frequencies, config).to_hex()
}
