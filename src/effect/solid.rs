//! Solid color fill
//!
//! Every pixel gets the base color already scaled by the configured
//! brightness.

use embassy_time::Instant;

use super::Effect;
use crate::{RandomSource, color::Color, state::EffectSettings};

#[derive(Debug, Clone, Copy, Default)]
pub struct SolidEffect;

impl Effect for SolidEffect {
    const APPLIES_BRIGHTNESS: bool = true;

    fn render<R: RandomSource>(
        &mut self,
        settings: &EffectSettings,
        _now: Instant,
        _rng: &mut R,
        leds: &mut [Color],
    ) {
        leds.fill(settings.color.scaled(settings.brightness));
    }
}
