//! Current budget scaler
//!
//! Every sub-channel byte is assumed to draw `value / 255 * per_subchannel_ma`.
//! When the estimate for a frame exceeds the budget minus the system
//! reserve, every byte is multiplied by one common factor so hue ratios
//! survive and the estimate lands at or below the ceiling.
//!
//! Internally draw is counted in 1/255 mA units so the estimate is exact
//! integer math.

use core::cell::Cell;

use critical_section::Mutex;

use crate::color::{Color, PixelFormat};

/// Assumed draw of one fully lit sub-channel
pub const CURRENT_PER_SUBCHANNEL_MA: u16 = 20;

/// Current kept aside for the controller and the rest of the board
pub const SYSTEM_RESERVE_MA: u16 = 400;

/// Electrical current budget of a device
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Current {
    /// Scale output so the estimated draw stays within this many milliamps
    /// (minus the system reserve)
    Milliamps(u32),
    /// No limit
    Unlimited,
}

impl Default for Current {
    fn default() -> Self {
        Self::Unlimited
    }
}

/// Current limit shared between the control surface and the render task
pub struct CurrentLimit {
    inner: Mutex<Cell<Current>>,
}

impl CurrentLimit {
    pub const fn new(limit: Current) -> Self {
        Self {
            inner: Mutex::new(Cell::new(limit)),
        }
    }

    pub fn get(&self) -> Current {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }

    pub fn set(&self, limit: Current) {
        critical_section::with(|cs| self.inner.borrow(cs).set(limit));
    }
}

impl Default for CurrentLimit {
    fn default() -> Self {
        Self::new(Current::Unlimited)
    }
}

/// Hardware calibration of the current estimate
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurrentModel {
    /// Draw of one sub-channel at value 255
    pub per_subchannel_ma: u16,
    /// Subtracted from the budget before computing headroom
    pub reserve_ma: u16,
}

impl Default for CurrentModel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl CurrentModel {
    pub const DEFAULT: Self = Self {
        per_subchannel_ma: CURRENT_PER_SUBCHANNEL_MA,
        reserve_ma: SYSTEM_RESERVE_MA,
    };

    /// Estimated draw of a frame in 1/255 mA units
    pub fn estimate_units(&self, frame: &[Color], format: PixelFormat) -> u64 {
        let sum: u64 = frame
            .iter()
            .map(|pixel| {
                let white = if format.has_white() { pixel.w } else { 0 };
                u64::from(pixel.r) + u64::from(pixel.g) + u64::from(pixel.b) + u64::from(white)
            })
            .sum();
        sum * u64::from(self.per_subchannel_ma)
    }

    /// Estimated draw of a frame in milliamps, rounded down
    pub fn estimate_ma(&self, frame: &[Color], format: PixelFormat) -> u64 {
        self.estimate_units(frame, format) / 255
    }

    /// Headroom in 1/255 mA units, `None` when unlimited
    pub fn available_units(&self, limit: Current) -> Option<u64> {
        match limit {
            Current::Unlimited => None,
            Current::Milliamps(ma) => {
                let available = u64::from(ma).saturating_sub(u64::from(self.reserve_ma));
                Some(available * 255)
            }
        }
    }

    /// Factor needed to bring `estimated_units` under the limit
    ///
    /// `None` means the frame is within budget and must pass unchanged.
    pub fn scale_for(&self, limit: Current, estimated_units: u64) -> Option<Scale> {
        let available = self.available_units(limit)?;
        if estimated_units <= available {
            return None;
        }
        Some(Scale {
            numerator: available,
            denominator: estimated_units,
        })
    }

    /// Limit a single frame in place, returning the applied factor
    pub fn limit(&self, limit: Current, frame: &mut [Color], format: PixelFormat) -> Option<Scale> {
        let scale = self.scale_for(limit, self.estimate_units(frame, format))?;
        scale.apply(frame);
        Some(scale)
    }
}

/// Uniform scale factor `numerator / denominator`, always below 1
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Scale {
    numerator: u64,
    denominator: u64,
}

impl Scale {
    /// Scale factor as a fraction; `numerator` is clamped to `denominator`
    pub fn new(numerator: u64, denominator: u64) -> Self {
        let denominator = denominator.max(1);
        Self {
            numerator: numerator.min(denominator),
            denominator,
        }
    }

    /// Scale one byte, rounding down
    #[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
    pub const fn apply_to(&self, value: u8) -> u8 {
        (value as u64 * self.numerator / self.denominator) as u8
    }

    pub fn apply(&self, frame: &mut [Color]) {
        for pixel in frame.iter_mut() {
            *pixel = Color {
                r: self.apply_to(pixel.r),
                g: self.apply_to(pixel.g),
                b: self.apply_to(pixel.b),
                w: self.apply_to(pixel.w),
            };
        }
    }

    /// Factor in thousandths, for logging and diagnostics
    #[allow(clippy::cast_possible_truncation)]
    pub const fn as_permille(&self) -> u16 {
        (self.numerator * 1000 / self.denominator) as u16
    }
}
