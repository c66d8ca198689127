//! Breathe effect
//!
//! Ramps a level up and down between 0 and the configured brightness in a
//! triangle wave. The ramp replaces the global brightness multiplier.

use embassy_time::Instant;

use super::{Effect, StepClock, step_interval};
use crate::{RandomSource, color::Color, state::EffectSettings};

/// Level change per step
pub const BREATHE_STEP: u8 = 5;

#[derive(Debug, Clone)]
pub struct BreatheEffect {
    clock: StepClock,
    level: u8,
    rising: bool,
}

impl BreatheEffect {
    pub const fn new() -> Self {
        Self {
            clock: StepClock::new(),
            level: 0,
            rising: true,
        }
    }

    /// Current ramp level (0..=brightness)
    pub const fn level(&self) -> u8 {
        self.level
    }

    fn step(&mut self, ceiling: u8) {
        if self.rising {
            self.level = self.level.saturating_add(BREATHE_STEP).min(ceiling);
            if self.level >= ceiling {
                self.rising = false;
            }
        } else {
            self.level = self.level.saturating_sub(BREATHE_STEP);
            if self.level == 0 {
                self.rising = true;
            }
        }
    }
}

impl Default for BreatheEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for BreatheEffect {
    const APPLIES_BRIGHTNESS: bool = true;

    fn render<R: RandomSource>(
        &mut self,
        settings: &EffectSettings,
        now: Instant,
        _rng: &mut R,
        leds: &mut [Color],
    ) {
        let ceiling = settings.brightness;
        // Brightness may have been lowered below the current level
        self.level = self.level.min(ceiling);

        let steps = self.clock.advance(now, step_interval(settings.speed));
        // One full up-and-down cycle, skip whole cycles after long stalls
        let half = u64::from(ceiling).div_ceil(u64::from(BREATHE_STEP));
        let cycle = (2 * half).max(2);
        for _ in 0..steps % cycle {
            self.step(ceiling);
        }

        leds.fill(settings.color.scaled(self.level));
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
