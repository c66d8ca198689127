//! Wire view of a transmit buffer.
//!
//! Addressable pixels (WS2812 / SK6812) expect green first, so bytes are
//! emitted as G, R, B and, for RGBW strips, W.

use super::{Color, PixelFormat};

/// A frame handed to the hardware transmitter
#[derive(Debug, Clone, Copy)]
pub struct PixelFrame<'a> {
    pixels: &'a [Color],
    format: PixelFormat,
}

impl<'a> PixelFrame<'a> {
    pub const fn new(pixels: &'a [Color], format: PixelFormat) -> Self {
        Self { pixels, format }
    }

    pub const fn pixels(&self) -> &'a [Color] {
        self.pixels
    }

    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    /// Total number of bytes on the wire
    pub const fn byte_len(&self) -> usize {
        self.pixels.len() * self.format.bytes_per_pixel()
    }

    /// Iterate over the encoded wire bytes
    pub fn bytes(&self) -> WireBytes<'a> {
        WireBytes {
            pixels: self.pixels,
            format: self.format,
            position: 0,
        }
    }

    /// Encode into `out`, returning the number of bytes written.
    ///
    /// Stops early if `out` is too small.
    pub fn encode_into(&self, out: &mut [u8]) -> usize {
        let mut written = 0;
        for (slot, byte) in out.iter_mut().zip(self.bytes()) {
            *slot = byte;
            written += 1;
        }
        written
    }
}

/// Iterator over the wire bytes of a [`PixelFrame`]
#[derive(Debug, Clone)]
pub struct WireBytes<'a> {
    pixels: &'a [Color],
    format: PixelFormat,
    position: usize,
}

impl Iterator for WireBytes<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let stride = self.format.bytes_per_pixel();
        let pixel = self.pixels.get(self.position / stride)?;
        let byte = match self.position % stride {
            0 => pixel.g,
            1 => pixel.r,
            2 => pixel.b,
            _ => pixel.w,
        };
        self.position += 1;
        Some(byte)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = self.pixels.len() * self.format.bytes_per_pixel();
        let remaining = total.saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for WireBytes<'_> {}
