//! Theater chase effect

use embassy_time::Instant;

use super::{Effect, StepClock, step_interval};
use crate::{RandomSource, color::Color, state::EffectSettings};

const CHASE_SPACING: usize = 3;

/// Every third pixel lit, the pattern marching forward one pixel per step
#[derive(Debug, Clone, Default)]
pub struct TheaterChaseEffect {
    clock: StepClock,
    offset: usize,
}

impl TheaterChaseEffect {
    pub const fn new() -> Self {
        Self {
            clock: StepClock::new(),
            offset: 0,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }
}

impl Effect for TheaterChaseEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn render<R: RandomSource>(
        &mut self,
        settings: &EffectSettings,
        now: Instant,
        _rng: &mut R,
        leds: &mut [Color],
    ) {
        let steps = self.clock.advance(now, step_interval(settings.speed));
        self.offset = (self.offset + (steps % CHASE_SPACING as u64) as usize) % CHASE_SPACING;

        for (i, led) in leds.iter_mut().enumerate() {
            *led = if i % CHASE_SPACING == self.offset {
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
