//! Post-processing applied between the effect stage and the hardware.
//!
//! Order matters and is fixed: brightness, fade, mask, then current
//! limiting (which runs over all channels of a device at once).

use embassy_time::Instant;

use crate::color::Color;

mod brightness;
mod current;
mod fade;
mod mask;

pub use brightness::BrightnessFilter;
pub use current::{
    CURRENT_PER_SUBCHANNEL_MA, Current, CurrentLimit, CurrentModel, SYSTEM_RESERVE_MA, Scale,
};
pub use fade::FadeFilter;
pub use mask::MaskFilter;

pub trait Filter {
    /// Apply the filter to a frame in place
    fn apply(&mut self, frame: &mut [Color]);

    fn tick(&mut self, _now: Instant) {}
}
