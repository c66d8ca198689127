//! Rainbow effect
//!
//! Spreads one turn of the hue wheel over the channel and rotates it by one
//! hue unit per step. Value follows the configured brightness.

use embassy_time::Instant;

use super::{Effect, StepClock, step_interval};
use crate::{
    RandomSource,
    color::{Color, Hsv, hsv2rgb},
    state::EffectSettings,
};

#[derive(Debug, Clone, Default)]
pub struct RainbowEffect {
    clock: StepClock,
    offset: u8,
}

impl RainbowEffect {
    pub const fn new() -> Self {
        Self {
            clock: StepClock::new(),
            offset: 0,
        }
    }

    pub const fn offset(&self) -> u8 {
        self.offset
    }

    /// Hue of pixel `index` out of `count` for the current offset
    #[allow(clippy::cast_possible_truncation)]
    pub const fn hue_at(&self, index: usize, count: usize) -> u8 {
        if count == 0 {
            return self.offset;
        }
        let spread = (index * 256 / count) as u8;
        self.offset.wrapping_add(spread)
    }
}

impl Effect for RainbowEffect {
    const APPLIES_BRIGHTNESS: bool = true;

    #[allow(clippy::cast_possible_truncation)]
    fn render<R: RandomSource>(
        &mut self,
        settings: &EffectSettings,
        now: Instant,
        _rng: &mut R,
        leds: &mut [Color],
    ) {
        let steps = self.clock.advance(now, step_interval(settings.speed));
        self.offset = self.offset.wrapping_add((steps % 256) as u8);

        let count = leds.len();
        for (i, led) in leds.iter_mut().enumerate() {
            let hsv = Hsv {
                hue: self.hue_at(i, count),
                sat: 255,
                val: settings.brightness,
            };
            *led = hsv2rgb(hsv).into();
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
