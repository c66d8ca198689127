//! Blink effect
//!
//! Alternates the whole channel between the base color and black, toggling
//! once per step interval.

use embassy_time::Instant;

use super::{Effect, StepClock, step_interval};
use crate::{RandomSource, color::Color, state::EffectSettings};

#[derive(Debug, Clone)]
pub struct BlinkEffect {
    clock: StepClock,
    lit: bool,
}

impl BlinkEffect {
    pub const fn new() -> Self {
        Self {
            clock: StepClock::new(),
            lit: true,
        }
    }

    pub const fn is_lit(&self) -> bool {
        self.lit
    }
}

impl Default for BlinkEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for BlinkEffect {
    fn render<R: RandomSource>(
        &mut self,
        settings: &EffectSettings,
        now: Instant,
        _rng: &mut R,
        leds: &mut [Color],
    ) {
        let steps = self.clock.advance(now, step_interval(settings.speed));
        if steps % 2 == 1 {
            self.lit = !self.lit;
        }

        let color = if self.lit {
            settings.color
        } else {
            Color::BLACK
        };
        leds.fill(color);
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
