//! Fade envelope
//!
//! Smoothly ramps a channel's output level towards black (fade out) or back
//! to full (fade in) without touching the stored brightness.

use embassy_time::{Duration, Instant};

use super::Filter;
use crate::color::Color;
use crate::transition::ValueTransition;

#[derive(Debug, Clone)]
pub struct FadeFilter {
    level: ValueTransition<u8>,
    duration: Duration,
}

impl FadeFilter {
    pub const fn new(duration: Duration) -> Self {
        Self {
            level: ValueTransition::new_u8(u8::MAX),
            duration,
        }
    }

    /// Start fading towards `target`
    pub fn set(&mut self, target: u8, now: Instant) {
        self.level.set(target, self.duration, now);
    }

    pub const fn level(&self) -> u8 {
        self.level.current()
    }

    pub const fn is_transitioning(&self) -> bool {
        self.level.is_transitioning()
    }
}

impl Filter for FadeFilter {
    fn apply(&mut self, frame: &mut [Color]) {
        let level = self.level.current();
        if level == u8::MAX {
            return;
        }
        for pixel in frame.iter_mut() {
            *pixel = pixel.scaled(level);
        }
    }

    fn tick(&mut self, now: Instant) {
        self.level.tick(now);
    }
}
