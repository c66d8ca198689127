mod frame;

pub use frame::{PixelFrame, WireBytes};
use smart_leds::{RGB8, hsv::Hsv as HSV};
pub use smart_leds::hsv::hsv2rgb;

use crate::math8::scale_linear;

pub type Rgb = RGB8;
pub type Hsv = HSV;

/// Color layout of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    /// Three sub-channels per pixel
    Rgb,
    /// Four sub-channels per pixel, the fourth one drives a white die
    Rgbw,
}

impl PixelFormat {
    /// Number of bytes a pixel takes on the wire
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgbw => 4,
        }
    }

    pub const fn has_white(self) -> bool {
        matches!(self, Self::Rgbw)
    }
}

/// Pixel color with an optional white sub-channel
///
/// On RGB channels the white component is ignored and always rendered as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub w: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, w: 0 }
    }

    pub const fn rgbw(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self { r, g, b, w }
    }

    pub const fn is_black(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0 && self.w == 0
    }

    /// Scale every sub-channel by `level / 255`
    #[must_use]
    pub const fn scaled(self, level: u8) -> Self {
        Self {
            r: scale_linear(self.r, level),
            g: scale_linear(self.g, level),
            b: scale_linear(self.b, level),
            w: scale_linear(self.w, level),
        }
    }

    /// Drop sub-channels the format cannot display
    #[must_use]
    pub const fn for_format(self, format: PixelFormat) -> Self {
        match format {
            PixelFormat::Rgb => Self { w: 0, ..self },
            PixelFormat::Rgbw => self,
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::rgb(rgb.r, rgb.g, rgb.b)
    }
}

impl From<Color> for Rgb {
    fn from(color: Color) -> Self {
        Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}

/// Clamp an externally supplied integer to a color/brightness byte
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn clamp_component(value: i32) -> u8 {
    if value < 0 {
        0
    } else if value > 255 {
        255
    } else {
        value as u8
    }
}
