//! Sparkle effect
//!
//! On every step each pixel is re-rolled independently: lit with the base
//! color with a small fixed probability, dark otherwise. Between steps the
//! previous roll stays on the buffer.

use embassy_time::Instant;

use super::{Effect, StepClock, step_interval};
use crate::{RandomSource, color::Color, state::EffectSettings};

/// Chance of a pixel lighting up on a step, in percent
pub const SPARKLE_CHANCE_PERCENT: u32 = 5;

#[derive(Debug, Clone, Default)]
pub struct SparkleEffect {
    clock: StepClock,
    primed: bool,
}

impl SparkleEffect {
    pub const fn new() -> Self {
        Self {
            clock: StepClock::new(),
            primed: false,
        }
    }
}

impl Effect for SparkleEffect {
    fn render<R: RandomSource>(
        &mut self,
        settings: &EffectSettings,
        now: Instant,
        rng: &mut R,
        leds: &mut [Color],
    ) {
        let steps = self.clock.advance(now, step_interval(settings.speed));
        if steps == 0 && self.primed {
            return;
        }
        self.primed = true;

        for led in leds.iter_mut() {
            *led = if rng.random(100) < SPARKLE_CHANCE_PERCENT {
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
