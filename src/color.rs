//! RGB color value shared by pixel buffers, engine results and compositors.

use std::fmt;

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uniform grey of the given brightness.
    pub const fn grey(level: u8) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
        }
    }

    /// Build a color from the first three bytes of an interleaved triple.
    pub fn from_triple(triple: &[u8]) -> Self {
        Self {
            r: triple[0],
            g: triple[1],
            b: triple[2],
        }
    }

    /// Lowercase `rrggbb` hex form, without a leading `#`.
    pub fn hex(&self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_is_zero_padded() {
        assert_eq!(Rgb::new(1, 0x2a, 255).hex(), "012aff");
        assert_eq!(format!("{}", Rgb::grey(0x11)), "#111111");
    }

    #[test]
    fn test_from_triple() {
        assert_eq!(Rgb::from_triple(&[9, 8, 7, 6]), Rgb::new(9, 8, 7));
    }
}
