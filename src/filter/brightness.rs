//! Global brightness multiplier
//!
//! Applied to effects that render at full intensity. Effects that already
//! fold brightness into their own math bypass it.

use super::Filter;
use crate::color::Color;

#[derive(Debug, Clone, Copy)]
pub struct BrightnessFilter {
    level: u8,
}

impl BrightnessFilter {
    pub const fn new(level: u8) -> Self {
        Self { level }
    }

    pub const fn level(&self) -> u8 {
        self.level
    }

    pub fn set(&mut self, level: u8) {
        self.level = level;
    }
}

impl Filter for BrightnessFilter {
    fn apply(&mut self, frame: &mut [Color]) {
        match self.level {
            u8::MAX => {}
            0 => frame.fill(Color::BLACK),
            level => {
                for pixel in frame.iter_mut() {
                    *pixel = pixel.scaled(level);
                }
            }
        }
    }
}
