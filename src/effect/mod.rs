//! Effect system with compile-time known effect variants
//!
//! All effects are stored in an enum to avoid heap allocations.
//! Each effect implements the `Effect` trait and receives the current time
//! explicitly, so effects can be driven by a synthetic clock in tests.

mod blink;
mod breathe;
mod color_wipe;
mod cyclic;
mod rainbow;
mod solid;
mod sparkle;
mod theater_chase;

use embassy_time::{Duration, Instant};

pub use blink::BlinkEffect;
pub use breathe::{BREATHE_STEP, BreatheEffect};
pub use color_wipe::ColorWipeEffect;
pub use cyclic::{CYCLIC_TRAIL, CyclicEffect};
pub use rainbow::RainbowEffect;
pub use solid::SolidEffect;
pub use sparkle::{SPARKLE_CHANCE_PERCENT, SparkleEffect};
pub use theater_chase::TheaterChaseEffect;

use crate::RandomSource;
use crate::color::Color;
use crate::state::EffectSettings;

const EFFECT_NAME_OFF: &str = "off";
const EFFECT_NAME_SOLID: &str = "solid";
const EFFECT_NAME_BLINK: &str = "blink";
const EFFECT_NAME_BREATHE: &str = "breathe";
const EFFECT_NAME_CYCLIC: &str = "cyclic";
const EFFECT_NAME_RAINBOW: &str = "rainbow";
const EFFECT_NAME_RAW_BUFFER: &str = "raw";
const EFFECT_NAME_COLOR_WIPE: &str = "color_wipe";
const EFFECT_NAME_THEATER_CHASE: &str = "theater_chase";
const EFFECT_NAME_SPARKLE: &str = "sparkle";

// Ids 0..=6 match the layout already stored on deployed clocks.
const EFFECT_ID_OFF: u8 = 0;
const EFFECT_ID_SOLID: u8 = 1;
const EFFECT_ID_BLINK: u8 = 2;
const EFFECT_ID_BREATHE: u8 = 3;
const EFFECT_ID_CYCLIC: u8 = 4;
const EFFECT_ID_RAINBOW: u8 = 5;
const EFFECT_ID_RAW_BUFFER: u8 = 6;
const EFFECT_ID_COLOR_WIPE: u8 = 7;
const EFFECT_ID_THEATER_CHASE: u8 = 8;
const EFFECT_ID_SPARKLE: u8 = 9;

/// Lowest accepted speed
pub const SPEED_MIN: u8 = 1;
/// Highest accepted speed
pub const SPEED_MAX: u8 = 100;

/// Step interval for a given speed: `1000 / speed` milliseconds
pub fn step_interval(speed: u8) -> Duration {
    Duration::from_millis(1000 / u64::from(speed.max(SPEED_MIN)))
}

pub trait Effect {
    /// Set if the effect scales its output by the configured brightness
    /// itself, so the renderer must not apply it a second time.
    const APPLIES_BRIGHTNESS: bool = false;

    /// Render a single frame into the raw buffer
    fn render<R: RandomSource>(
        &mut self,
        settings: &EffectSettings,
        now: Instant,
        rng: &mut R,
        leds: &mut [Color],
    );

    /// Reset effect state
    fn reset(&mut self) {}
}

/// Elapsed-time stepper shared by the animated effects.
///
/// Counts whole step intervals between frames, so animation speed does not
/// depend on how often the scheduler manages to render.
#[derive(Debug, Clone, Default)]
pub struct StepClock {
    last_step: Option<Instant>,
}

impl StepClock {
    pub const fn new() -> Self {
        Self { last_step: None }
    }

    /// Return the number of intervals elapsed since the previous step.
    ///
    /// The first call after creation or reset anchors the clock and
    /// returns 0.
    pub fn advance(&mut self, now: Instant, interval: Duration) -> u64 {
        let Some(last_step) = self.last_step else {
            self.last_step = Some(now);
            return 0;
        };

        let interval_ms = interval.as_millis().max(1);
        let elapsed_ms = now.saturating_duration_since(last_step).as_millis();
        let steps = elapsed_ms / interval_ms;
        if steps > 0 {
            self.last_step = Some(last_step + Duration::from_millis(steps * interval_ms));
        }
        steps
    }

    pub fn reset(&mut self) {
        self.last_step = None;
    }
}

/// Known effect ids that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum EffectId {
    Off = EFFECT_ID_OFF,
    Solid = EFFECT_ID_SOLID,
    Blink = EFFECT_ID_BLINK,
    Breathe = EFFECT_ID_BREATHE,
    Cyclic = EFFECT_ID_CYCLIC,
    Rainbow = EFFECT_ID_RAINBOW,
    RawBuffer = EFFECT_ID_RAW_BUFFER,
    ColorWipe = EFFECT_ID_COLOR_WIPE,
    TheaterChase = EFFECT_ID_THEATER_CHASE,
    Sparkle = EFFECT_ID_SPARKLE,
}

impl EffectId {
    pub const ALL: [Self; 10] = [
        Self::Off,
        Self::Solid,
        Self::Blink,
        Self::Breathe,
        Self::Cyclic,
        Self::Rainbow,
        Self::RawBuffer,
        Self::ColorWipe,
        Self::TheaterChase,
        Self::Sparkle,
    ];

    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_OFF => Self::Off,
            EFFECT_ID_SOLID => Self::Solid,
            EFFECT_ID_BLINK => Self::Blink,
            EFFECT_ID_BREATHE => Self::Breathe,
            EFFECT_ID_CYCLIC => Self::Cyclic,
            EFFECT_ID_RAINBOW => Self::Rainbow,
            EFFECT_ID_RAW_BUFFER => Self::RawBuffer,
            EFFECT_ID_COLOR_WIPE => Self::ColorWipe,
            EFFECT_ID_THEATER_CHASE => Self::TheaterChase,
            EFFECT_ID_SPARKLE => Self::Sparkle,
            _ => return None,
        })
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => EFFECT_NAME_OFF,
            Self::Solid => EFFECT_NAME_SOLID,
            Self::Blink => EFFECT_NAME_BLINK,
            Self::Breathe => EFFECT_NAME_BREATHE,
            Self::Cyclic => EFFECT_NAME_CYCLIC,
            Self::Rainbow => EFFECT_NAME_RAINBOW,
            Self::RawBuffer => EFFECT_NAME_RAW_BUFFER,
            Self::ColorWipe => EFFECT_NAME_COLOR_WIPE,
            Self::TheaterChase => EFFECT_NAME_THEATER_CHASE,
            Self::Sparkle => EFFECT_NAME_SPARKLE,
        }
    }

    /// Look an effect up by name, ignoring ASCII case
    pub fn parse_from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
    }

    pub fn to_slot(self) -> EffectSlot {
        match self {
            Self::Off => EffectSlot::Off,
            Self::Solid => EffectSlot::Solid(SolidEffect),
            Self::Blink => EffectSlot::Blink(BlinkEffect::new()),
            Self::Breathe => EffectSlot::Breathe(BreatheEffect::new()),
            Self::Cyclic => EffectSlot::Cyclic(CyclicEffect::new()),
            Self::Rainbow => EffectSlot::Rainbow(RainbowEffect::new()),
            Self::RawBuffer => EffectSlot::RawBuffer,
            Self::ColorWipe => EffectSlot::ColorWipe(ColorWipeEffect::new()),
            Self::TheaterChase => EffectSlot::TheaterChase(TheaterChaseEffect::new()),
            Self::Sparkle => EffectSlot::Sparkle(SparkleEffect::new()),
        }
    }
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone, Default)]
pub enum EffectSlot {
    /// All pixels dark
    #[default]
    Off,
    /// Uniform color at configured brightness
    Solid(SolidEffect),
    /// Color toggling on and off
    Blink(BlinkEffect),
    /// Triangular brightness ramp
    Breathe(BreatheEffect),
    /// Short trail running around the ring
    Cyclic(CyclicEffect),
    /// Hue wheel spread over the strip
    Rainbow(RainbowEffect),
    /// Pixels staged by an external writer, left untouched
    RawBuffer,
    /// Progressive fill in index order
    ColorWipe(ColorWipeEffect),
    /// Every third pixel, marching
    TheaterChase(TheaterChaseEffect),
    /// Random twinkle
    Sparkle(SparkleEffect),
}

impl EffectSlot {
    /// Returns if the effect already incorporates brightness
    ///
    /// Derived from each effect's `Effect::APPLIES_BRIGHTNESS` constant.
    pub const fn applies_brightness(&self) -> bool {
        match self {
            Self::Off | Self::RawBuffer => false,
            Self::Solid(_) => SolidEffect::APPLIES_BRIGHTNESS,
            Self::Blink(_) => BlinkEffect::APPLIES_BRIGHTNESS,
            Self::Breathe(_) => BreatheEffect::APPLIES_BRIGHTNESS,
            Self::Cyclic(_) => CyclicEffect::APPLIES_BRIGHTNESS,
            Self::Rainbow(_) => RainbowEffect::APPLIES_BRIGHTNESS,
            Self::ColorWipe(_) => ColorWipeEffect::APPLIES_BRIGHTNESS,
            Self::TheaterChase(_) => TheaterChaseEffect::APPLIES_BRIGHTNESS,
            Self::Sparkle(_) => SparkleEffect::APPLIES_BRIGHTNESS,
        }
    }

    /// Render the current effect
    pub fn render<R: RandomSource>(
        &mut self,
        settings: &EffectSettings,
        now: Instant,
        rng: &mut R,
        leds: &mut [Color],
    ) {
        match self {
            Self::Off => leds.fill(Color::BLACK),
            Self::RawBuffer => {}
            Self::Solid(effect) => effect.render(settings, now, rng, leds),
            Self::Blink(effect) => effect.render(settings, now, rng, leds),
            Self::Breathe(effect) => effect.render(settings, now, rng, leds),
            Self::Cyclic(effect) => effect.render(settings, now, rng, leds),
            Self::Rainbow(effect) => effect.render(settings, now, rng, leds),
            Self::ColorWipe(effect) => effect.render(settings, now, rng, leds),
            Self::TheaterChase(effect) => effect.render(settings, now, rng, leds),
            Self::Sparkle(effect) => effect.render(settings, now, rng, leds),
        }
    }

    /// Reset the effect state
    pub fn reset(&mut self) {
        match self {
            Self::Off | Self::RawBuffer => {}
            Self::Solid(effect) => Effect::reset(effect),
            Self::Blink(effect) => Effect::reset(effect),
            Self::Breathe(effect) => Effect::reset(effect),
            Self::Cyclic(effect) => Effect::reset(effect),
            Self::Rainbow(effect) => Effect::reset(effect),
            Self::ColorWipe(effect) => Effect::reset(effect),
            Self::TheaterChase(effect) => Effect::reset(effect),
            Self::Sparkle(effect) => Effect::reset(effect),
        }
    }

    /// Get the effect ID for external observation
    pub const fn id(&self) -> EffectId {
        match self {
            Self::Off => EffectId::Off,
            Self::Solid(_) => EffectId::Solid,
            Self::Blink(_) => EffectId::Blink,
            Self::Breathe(_) => EffectId::Breathe,
            Self::Cyclic(_) => EffectId::Cyclic,
            Self::Rainbow(_) => EffectId::Rainbow,
            Self::RawBuffer => EffectId::RawBuffer,
            Self::ColorWipe(_) => EffectId::ColorWipe,
            Self::TheaterChase(_) => EffectId::TheaterChase,
            Self::Sparkle(_) => EffectId::Sparkle,
        }
    }
}
