// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// Distance between two neighbouring channel levels.
const STEP: u8 = 85;

/// A color quantization policy.
///
/// PDC keeps only 2 bits per channel, so every 8-bit channel value
/// has to land on one of `0`, `85`, `170` or `255`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QuantizeMode {
    /// Rounds each channel down to the previous level.
    Truncate,
    /// Rounds each channel to the closest level.
    Nearest,
}

impl Default for QuantizeMode {
    fn default() -> Self {
        Self::Truncate
    }
}

impl std::str::FromStr for QuantizeMode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "truncate" => Ok(QuantizeMode::Truncate),
            "nearest" => Ok(QuantizeMode::Nearest),
            _ => Err("invalid"),
        }
    }
}

/// Quantizes an RGBA color to the 2-bit-per-channel grid.
///
/// Returns `[red, green, blue, alpha]`, each a multiple of 85.
/// A color whose alpha quantizes to zero collapses to `[0, 0, 0, 0]`.
pub fn quantize(red: u8, green: u8, blue: u8, alpha: u8, mode: QuantizeMode) -> [u8; 4] {
    let level = |c: u8| -> u8 {
        match mode {
            QuantizeMode::Truncate => c / STEP * STEP,
            QuantizeMode::Nearest => ((c as u16 + 42) / STEP as u16 * STEP as u16) as u8,
        }
    };

    let alpha = level(alpha);
    if alpha == 0 {
        return [0, 0, 0, 0];
    }

    [level(red), level(green), level(blue), alpha]
}

/// Packs already quantized channels into an ARGB2222 byte.
///
/// Only the two high bits of each channel are kept.
#[inline]
pub fn pack(red: u8, green: u8, blue: u8, alpha: u8) -> u8 {
    (alpha >> 6 << 6) | (red >> 6 << 4) | (green >> 6 << 2) | (blue >> 6)
}

/// Unpacks an ARGB2222 byte into a displayable color.
#[inline]
pub fn unpack(byte: u8) -> DisplayColor {
    Color::from_byte(byte).to_display()
}

/// A color ready to be shown by a renderer.
///
/// Channels are in the `0..=255` range, alpha is in the `0..=1` range.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct DisplayColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f32,
}

/// A packed ARGB2222 color.
///
/// Alpha occupies bits 6-7, red bits 4-5, green bits 2-3 and blue bits 0-1.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct Color(u8);

impl Color {
    /// A fully transparent color. Also the "no paint" value.
    pub const TRANSPARENT: Color = Color(0);

    /// Creates a color from a packed byte.
    #[inline]
    pub const fn from_byte(byte: u8) -> Self {
        Color(byte)
    }

    /// Quantizes and packs an 8-bit RGBA color.
    pub fn from_rgba8(red: u8, green: u8, blue: u8, alpha: u8, mode: QuantizeMode) -> Self {
        let [r, g, b, a] = quantize(red, green, blue, alpha, mode);
        Color(pack(r, g, b, a))
    }

    /// Returns the packed byte.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        self.0
    }

    /// Returns the 2-bit alpha index.
    #[inline]
    pub fn alpha(self) -> u8 {
        self.0 >> 6 & 3
    }

    /// Returns the 2-bit red index.
    #[inline]
    pub fn red(self) -> u8 {
        self.0 >> 4 & 3
    }

    /// Returns the 2-bit green index.
    #[inline]
    pub fn green(self) -> u8 {
        self.0 >> 2 & 3
    }

    /// Returns the 2-bit blue index.
    #[inline]
    pub fn blue(self) -> u8 {
        self.0 & 3
    }

    /// Checks that the alpha index is zero.
    #[inline]
    pub fn is_transparent(self) -> bool {
        self.alpha() == 0
    }

    /// Expands the color into display intensities.
    ///
    /// Each index `v` maps to `v / 3 * 255` for color channels
    /// and to `v / 3` for alpha.
    pub fn to_display(self) -> DisplayColor {
        DisplayColor {
            red: self.red() * STEP,
            green: self.green() * STEP,
            blue: self.blue() * STEP,
            alpha: self.alpha() as f32 / 3.0,
        }
    }
}

impl From<u8> for Color {
    #[inline]
    fn from(byte: u8) -> Self {
        Color(byte)
    }
}

impl From<Color> for u8 {
    #[inline]
    fn from(color: Color) -> Self {
        color.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test {
        ($name:ident, $mode:expr, $input:expr, $result:expr) => (
            #[test]
            fn $name() {
                let (r, g, b, a) = $input;
                assert_eq!(quantize(r, g, b, a, $mode), $result);
            }
        )
    }

    test!(truncate_red, QuantizeMode::Truncate, (140, 0, 0, 255), [85, 0, 0, 255]);
    test!(nearest_red, QuantizeMode::Nearest, (140, 0, 0, 255), [170, 0, 0, 255]);
    test!(truncate_levels, QuantizeMode::Truncate, (84, 85, 254, 255), [0, 85, 170, 255]);
    test!(nearest_levels, QuantizeMode::Nearest, (42, 43, 213, 255), [0, 85, 255, 255]);
    test!(truncate_zero_alpha, QuantizeMode::Truncate, (255, 255, 255, 84), [0, 0, 0, 0]);
    test!(nearest_zero_alpha, QuantizeMode::Nearest, (255, 255, 255, 42), [0, 0, 0, 0]);
    test!(nearest_low_alpha, QuantizeMode::Nearest, (255, 255, 255, 43), [255, 255, 255, 85]);

    #[test]
    fn modes_diverge() {
        let t = Color::from_rgba8(140, 0, 0, 255, QuantizeMode::Truncate);
        let n = Color::from_rgba8(140, 0, 0, 255, QuantizeMode::Nearest);
        assert_eq!(t.red(), 1);
        assert_eq!(n.red(), 2);
        assert_ne!(t, n);
    }

    #[test]
    fn pack_layout() {
        assert_eq!(pack(255, 0, 0, 255), 0b11_11_00_00);
        assert_eq!(pack(0, 170, 0, 85), 0b01_00_10_00);
        assert_eq!(pack(0, 0, 85, 170), 0b10_00_00_01);
        assert_eq!(pack(0, 0, 0, 0), 0);
    }

    #[test]
    fn channel_indices() {
        let c = Color::from_byte(0b10_01_11_00);
        assert_eq!(c.alpha(), 2);
        assert_eq!(c.red(), 1);
        assert_eq!(c.green(), 3);
        assert_eq!(c.blue(), 0);
        assert!(!c.is_transparent());
        assert!(Color::TRANSPARENT.is_transparent());
    }

    #[test]
    fn unpack_intensities() {
        let c = unpack(0b11_10_01_00);
        assert_eq!((c.red, c.green, c.blue), (170, 85, 0));
        assert_eq!(c.alpha, 1.0);

        let c = unpack(0b01_11_11_11);
        assert_eq!((c.red, c.green, c.blue), (255, 255, 255));
        assert!((c.alpha - 1.0 / 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn parse_mode() {
        use std::str::FromStr;
        assert_eq!(QuantizeMode::from_str("nearest"), Ok(QuantizeMode::Nearest));
        assert_eq!(QuantizeMode::from_str("truncate"), Ok(QuantizeMode::Truncate));
        assert!(QuantizeMode::from_str("round").is_err());
    }
}
