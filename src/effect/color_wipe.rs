//! Color wipe effect
//!
//! Lights pixels one by one in index order. Once the whole channel is lit
//! the next step clears it and the wipe starts over.

use embassy_time::Instant;

use super::{Effect, StepClock, step_interval};
use crate::{RandomSource, color::Color, state::EffectSettings};

#[derive(Debug, Clone, Default)]
pub struct ColorWipeEffect {
    clock: StepClock,
    lit: usize,
}

impl ColorWipeEffect {
    pub const fn new() -> Self {
        Self {
            clock: StepClock::new(),
            lit: 0,
        }
    }

    /// Number of pixels currently lit
    pub const fn lit(&self) -> usize {
        self.lit
    }
}

impl Effect for ColorWipeEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn render<R: RandomSource>(
        &mut self,
        settings: &EffectSettings,
        now: Instant,
        _rng: &mut R,
        leds: &mut [Color],
    ) {
        let count = leds.len();
        let steps = self.clock.advance(now, step_interval(settings.speed));
        // States 0..=count form one cycle
        let states = count + 1;
        self.lit = (self.lit.min(count) + (steps % states as u64) as usize) % states;

        for (i, led) in leds.iter_mut().enumerate() {
            *led = if i < self.lit {
                settings.color
            } else {
                Color::BLACK
            };
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
