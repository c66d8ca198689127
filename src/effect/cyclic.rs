//! Cyclic effect
//!
//! A loading-spinner style trail for pixels arranged in a circle. The trail
//! advances one position per step.

use embassy_time::Instant;

use super::{Effect, StepClock, step_interval};
use crate::{RandomSource, color::Color, state::EffectSettings};

/// Number of lit pixels in the trail
pub const CYCLIC_TRAIL: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct CyclicEffect {
    clock: StepClock,
    offset: usize,
}

impl CyclicEffect {
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

impl Effect for CyclicEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn render<R: RandomSource>(
        &mut self,
        settings: &EffectSettings,
        now: Instant,
        _rng: &mut R,
        leds: &mut [Color],
    ) {
        let count = leds.len();
        if count == 0 {
            return;
        }

        let steps = self.clock.advance(now, step_interval(settings.speed));
        self.offset = (self.offset + (steps % count as u64) as usize) % count;

        leds.fill(Color::BLACK);
        for i in 0..CYCLIC_TRAIL.min(count) {
            leds[(i + self.offset) % count] = settings.color;
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
