use crate::Scalar;
use std::{fmt, str::FromStr};

/// ARGB color packed as u32 value, `0xAARRGGBB`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Argb(pub u32);

impl Argb {
    pub const BLACK: Argb = Argb(0xff000000);
    pub const TRANSPARENT: Argb = Argb(0);

    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    pub const fn alpha(self) -> u8 {
        ((self.0 >> 24) & 0xff) as u8
    }

    pub const fn red(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub const fn blue(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Alpha channel as a value in `[0, 1]`
    pub fn opacity(self) -> Scalar {
        self.alpha() as Scalar / 255.0
    }

    /// Color without any visible contribution
    pub const fn is_transparent(self) -> bool {
        self.alpha() == 0
    }

    /// `#rrggbb` representation with alpha discarded, as used by SVG paint attributes
    pub fn rgb_hex(self) -> RgbHex {
        RgbHex(self)
    }
}

impl From<u32> for Argb {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Displays color as `#rrggbb`
pub struct RgbHex(Argb);

impl fmt::Display for RgbHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.red(), self.0.green(), self.0.blue())
    }
}

impl fmt::Debug for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Argb({})", self)
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alpha() != 255 {
            write!(f, "#{:02x}", self.alpha())?;
            write!(f, "{:02x}{:02x}{:02x}", self.red(), self.green(), self.blue())
        } else {
            self.rgb_hex().fmt(f)
        }
    }
}

impl FromStr for Argb {
    type Err = ColorError;

    fn from_str(color: &str) -> Result<Self, Self::Err> {
        let Some(hex) = color.strip_prefix('#') else {
            return Err(ColorError::HexExpected);
        };
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorError::HexExpected);
        }
        let digit = |byte| match byte {
            b'A'..=b'F' => Ok(byte - b'A' + 10),
            b'a'..=b'f' => Ok(byte - b'a' + 10),
            b'0'..=b'9' => Ok(byte - b'0'),
            _ => Err(ColorError::HexExpected),
        };
        let mut value: u32 = 0;
        for byte in hex.bytes() {
            value = (value << 4) | digit(byte)? as u32;
        }
        // #rrggbb is opaque, #aarrggbb carries explicit alpha
        if hex.len() == 6 {
            value |= 0xff000000;
        }
        Ok(Argb(value))
    }
}

#[derive(Debug, Clone)]
pub enum ColorError {
    HexExpected,
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::HexExpected => {
                write!(f, "Color expected to be #AARRGGBB or #RRGGBB hex string")
            }
        }
    }
}

impl std::error::Error for ColorError {}
