//! Channel state shared between the control surface and the render task.
//!
//! All mutable fields live behind a `critical_section::Mutex`. Setters hold
//! the lock only for the assignment itself and the render task only for a
//! copy, so neither side can stall the other.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{Color, PixelFormat, clamp_component};
use crate::effect::{EffectId, SPEED_MAX, SPEED_MIN};
use crate::error::{InputError, TransmitError};
use crate::persistence::{ConfigRecord, DEFAULT_NAMESPACE};

/// Build-time description of a channel
#[derive(Debug, Clone, Copy)]
pub struct ChannelConfig {
    /// Human readable name, e.g. "Backlight"
    pub name: &'static str,
    /// Number of pixels, fixed for the channel's lifetime
    pub pixel_count: usize,
    /// Color layout of the pixels
    pub format: PixelFormat,
    /// Store namespace of the persistent record
    pub storage_namespace: &'static str,
    /// Key the persistent record is stored under
    pub storage_key: &'static str,
    /// Record used when nothing valid is stored
    pub defaults: ConfigRecord,
}

impl ChannelConfig {
    pub const fn new(name: &'static str, pixel_count: usize, format: PixelFormat) -> Self {
        Self {
            name,
            pixel_count,
            format,
            storage_namespace: DEFAULT_NAMESPACE,
            storage_key: name,
            defaults: ConfigRecord::DEFAULT,
        }
    }

    #[must_use]
    pub const fn with_storage(mut self, namespace: &'static str, key: &'static str) -> Self {
        self.storage_namespace = namespace;
        self.storage_key = key;
        self
    }

    #[must_use]
    pub const fn with_defaults(mut self, defaults: ConfigRecord) -> Self {
        self.defaults = defaults;
        self
    }
}

/// Effect configuration as seen by the renderer
///
/// Values are always within range: brightness and color are bytes, speed is
/// within `SPEED_MIN..=SPEED_MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectSettings {
    pub effect: EffectId,
    pub color: Color,
    pub brightness: u8,
    pub speed: u8,
    pub on: bool,
}

impl EffectSettings {
    #[allow(clippy::cast_lossless)]
    pub const fn from_record(record: &ConfigRecord) -> Self {
        Self {
            effect: record.effect,
            color: record.color,
            brightness: record.brightness,
            speed: clamp_speed(record.speed as i32),
            on: record.on,
        }
    }

    pub const fn to_record(&self) -> ConfigRecord {
        ConfigRecord {
            effect: self.effect,
            color: self.color,
            brightness: self.brightness,
            speed: self.speed,
            on: self.on,
        }
    }
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self::from_record(&ConfigRecord::DEFAULT)
    }
}

/// Clamp an externally supplied speed into the accepted range
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn clamp_speed(value: i32) -> u8 {
    if value < SPEED_MIN as i32 {
        SPEED_MIN
    } else if value > SPEED_MAX as i32 {
        SPEED_MAX
    } else {
        value as u8
    }
}

/// Transmission statistics of a channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelHealth {
    /// Frames handed to the hardware successfully
    pub frames_sent: u32,
    /// Frames lost to transmission errors
    pub failed_frames: u32,
    /// Failures since the last successful frame
    pub consecutive_failures: u32,
    pub last_error: Option<TransmitError>,
    /// Set once `consecutive_failures` reaches the stall threshold
    pub stalled: bool,
}

struct Shared<const N: usize> {
    settings: EffectSettings,
    mask: [bool; N],
    mask_revision: u32,
    staged: [Color; N],
    staged_revision: u32,
    fade_target: u8,
    fade_revision: u32,
    health: ChannelHealth,
}

/// Configuration, mask and staged pixels of one output channel
///
/// `N` is the pixel capacity; the configured pixel count must not exceed it.
pub struct ChannelState<const N: usize> {
    config: ChannelConfig,
    shared: Mutex<RefCell<Shared<N>>>,
}

impl<const N: usize> ChannelState<N> {
    /// Create a channel state with the configured default record
    ///
    /// Usable in `static` items; a pixel count above `N` fails at compile
    /// time there.
    pub const fn new(config: ChannelConfig) -> Self {
        assert!(
            config.pixel_count <= N,
            "pixel count exceeds channel capacity"
        );
        Self {
            config,
            shared: Mutex::new(RefCell::new(Shared {
                settings: EffectSettings::from_record(&config.defaults),
                mask: [true; N],
                mask_revision: 0,
                staged: [Color::BLACK; N],
                staged_revision: 0,
                fade_target: u8::MAX,
                fade_revision: 0,
                health: ChannelHealth {
                    frames_sent: 0,
                    failed_frames: 0,
                    consecutive_failures: 0,
                    last_error: None,
                    stalled: false,
                },
            })),
        }
    }

    pub const fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub const fn name(&self) -> &'static str {
        self.config.name
    }

    pub const fn pixel_count(&self) -> usize {
        self.config.pixel_count
    }

    pub const fn format(&self) -> PixelFormat {
        self.config.format
    }

    fn with<R>(&self, f: impl FnOnce(&mut Shared<N>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.shared.borrow(cs).borrow_mut()))
    }

    pub fn set_effect(&self, effect: EffectId) {
        self.with(|shared| shared.settings.effect = effect);
    }

    /// Select an effect by its numeric id
    pub fn set_effect_raw(&self, id: u8) -> Result<EffectId, InputError> {
        let effect = EffectId::from_raw(id).ok_or(InputError::UnknownEffectId(id))?;
        self.set_effect(effect);
        Ok(effect)
    }

    /// Select an effect by name, ignoring ASCII case
    pub fn set_effect_by_name(&self, name: &str) -> Result<EffectId, InputError> {
        let effect = EffectId::parse_from_str(name).ok_or(InputError::UnknownEffectName)?;
        self.set_effect(effect);
        Ok(effect)
    }

    /// Set the base color, clamping each component to 0..=255
    pub fn set_color(&self, r: i32, g: i32, b: i32, w: i32) {
        self.set_color_value(Color::rgbw(
            clamp_component(r),
            clamp_component(g),
            clamp_component(b),
            clamp_component(w),
        ));
    }

    pub fn set_color_value(&self, color: Color) {
        self.with(|shared| shared.settings.color = color);
    }

    /// Set brightness, clamping to 0..=255
    pub fn set_brightness(&self, brightness: i32) {
        let brightness = clamp_component(brightness);
        self.with(|shared| shared.settings.brightness = brightness);
    }

    /// Set animation speed, clamping to `SPEED_MIN..=SPEED_MAX`
    pub fn set_speed(&self, speed: i32) {
        let speed = clamp_speed(speed);
        self.with(|shared| shared.settings.speed = speed);
    }

    pub fn set_on_state(&self, on: bool) {
        self.with(|shared| shared.settings.on = on);
    }

    /// Replace the mask; `false` hides a pixel
    pub fn set_mask(&self, mask: &[bool]) -> Result<(), InputError> {
        self.check_length(mask.len())?;
        self.with(|shared| {
            shared.mask[..mask.len()].copy_from_slice(mask);
            shared.mask_revision = shared.mask_revision.wrapping_add(1);
        });
        Ok(())
    }

    /// Replace the mask from a byte map where any non-zero byte is visible
    pub fn set_mask_bytes(&self, mask: &[u8]) -> Result<(), InputError> {
        self.check_length(mask.len())?;
        self.with(|shared| {
            for (slot, byte) in shared.mask.iter_mut().zip(mask) {
                *slot = *byte != 0;
            }
            shared.mask_revision = shared.mask_revision.wrapping_add(1);
        });
        Ok(())
    }

    /// Make every pixel visible again
    pub fn clear_mask(&self) {
        self.with(|shared| {
            shared.mask.fill(true);
            shared.mask_revision = shared.mask_revision.wrapping_add(1);
        });
    }

    /// Stage a full frame for the `RawBuffer` effect
    pub fn write_raw(&self, pixels: &[Color]) -> Result<(), InputError> {
        self.check_length(pixels.len())?;
        self.with(|shared| {
            shared.staged[..pixels.len()].copy_from_slice(pixels);
            shared.staged_revision = shared.staged_revision.wrapping_add(1);
        });
        Ok(())
    }

    /// Stage a single pixel for the `RawBuffer` effect
    pub fn set_raw_pixel(&self, index: usize, color: Color) -> Result<(), InputError> {
        let count = self.pixel_count();
        if index >= count {
            return Err(InputError::PixelIndex { index, count });
        }
        self.with(|shared| {
            shared.staged[index] = color;
            shared.staged_revision = shared.staged_revision.wrapping_add(1);
        });
        Ok(())
    }

    /// Fade the output level down to black
    pub fn fade_out(&self) {
        self.request_fade(0);
    }

    /// Fade the output level back up to full
    pub fn fade_in(&self) {
        self.request_fade(u8::MAX);
    }

    fn request_fade(&self, target: u8) {
        self.with(|shared| {
            shared.fade_target = target;
            shared.fade_revision = shared.fade_revision.wrapping_add(1);
        });
    }

    pub fn settings(&self) -> EffectSettings {
        self.with(|shared| shared.settings)
    }

    pub fn effect(&self) -> EffectId {
        self.settings().effect
    }

    pub fn color(&self) -> Color {
        self.settings().color
    }

    pub fn brightness(&self) -> u8 {
        self.settings().brightness
    }

    pub fn speed(&self) -> u8 {
        self.settings().speed
    }

    pub fn is_on(&self) -> bool {
        self.settings().on
    }

    /// Copy of the current mask, `pixel_count` entries long
    pub fn mask(&self) -> Vec<bool, N> {
        let count = self.pixel_count();
        self.with(|shared| shared.mask[..count].iter().copied().collect())
    }

    pub fn health(&self) -> ChannelHealth {
        self.with(|shared| shared.health)
    }

    /// The durable subset of the current settings
    pub fn get_persistent_config(&self) -> ConfigRecord {
        self.settings().to_record()
    }

    /// Apply a record in memory, clamping out-of-range values
    pub fn apply_record(&self, record: &ConfigRecord) {
        let settings = EffectSettings::from_record(record);
        self.with(|shared| shared.settings = settings);
    }

    fn check_length(&self, actual: usize) -> Result<(), InputError> {
        let expected = self.pixel_count();
        if actual == expected {
            Ok(())
        } else {
            Err(InputError::Length { expected, actual })
        }
    }

    /// Refresh the render-side copy of the settings, mask and fade request
    pub(crate) fn sync_view(&self, view: &mut StateView<N>) {
        self.with(|shared| {
            view.settings = shared.settings;
            if view.mask_revision != Some(shared.mask_revision) {
                view.mask = shared.mask;
                view.mask_revision = Some(shared.mask_revision);
            }
            if view.fade_revision != Some(shared.fade_revision) {
                view.fade_revision = Some(shared.fade_revision);
                view.pending_fade = Some(shared.fade_target);
            }
        });
    }

    /// Copy staged pixels into `raw` if they changed since the last copy
    pub(crate) fn sync_staged(&self, view: &mut StateView<N>, raw: &mut [Color]) {
        self.with(|shared| {
            if view.staged_revision != Some(shared.staged_revision) {
                let count = raw.len().min(N);
                raw[..count].copy_from_slice(&shared.staged[..count]);
                view.staged_revision = Some(shared.staged_revision);
            }
        });
    }

    /// Record the outcome of one frame's transmission
    pub(crate) fn record_transmit(
        &self,
        result: Result<(), TransmitError>,
        stall_threshold: u32,
    ) -> HealthChange {
        let change = self.with(|shared| {
            let health = &mut shared.health;
            match result {
                Ok(()) => {
                    let recovered = health.stalled;
                    health.frames_sent = health.frames_sent.wrapping_add(1);
                    health.consecutive_failures = 0;
                    health.stalled = false;
                    if recovered {
                        HealthChange::Recovered
                    } else {
                        HealthChange::None
                    }
                }
                Err(error) => {
                    health.failed_frames = health.failed_frames.wrapping_add(1);
                    health.consecutive_failures = health.consecutive_failures.saturating_add(1);
                    health.last_error = Some(error);
                    if !health.stalled && health.consecutive_failures >= stall_threshold {
                        health.stalled = true;
                        HealthChange::Stalled
                    } else {
                        HealthChange::Failed
                    }
                }
            }
        });

        #[cfg(feature = "esp32-log")]
        match change {
            HealthChange::Stalled => println!(
                "[ChannelState.record_transmit] channel {:?} stalled: {:?}",
                self.config.name, result
            ),
            HealthChange::Recovered => println!(
                "[ChannelState.record_transmit] channel {:?} recovered",
                self.config.name
            ),
            HealthChange::Failed => println!(
                "[ChannelState.record_transmit] channel {:?}: frame dropped ({:?})",
                self.config.name, result
            ),
            HealthChange::None => {}
        }

        change
    }
}

/// Outcome of [`ChannelState::record_transmit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HealthChange {
    None,
    Failed,
    Stalled,
    Recovered,
}

/// Render-side copy of a channel's shared state
pub(crate) struct StateView<const N: usize> {
    pub(crate) settings: EffectSettings,
    pub(crate) mask: [bool; N],
    /// Fade target requested since the last frame
    pub(crate) pending_fade: Option<u8>,
    mask_revision: Option<u32>,
    staged_revision: Option<u32>,
    fade_revision: Option<u32>,
}

impl<const N: usize> StateView<N> {
    pub(crate) const fn new(settings: EffectSettings) -> Self {
        Self {
            settings,
            mask: [true; N],
            pending_fade: None,
            mask_revision: None,
            staged_revision: None,
            // The initial fade target is already the renderer's start level
            fade_revision: Some(0),
        }
    }

    /// Force the next `sync_staged` to copy
    pub(crate) fn invalidate_staged(&mut self) {
        self.staged_revision = None;
    }
}
