use embassy_time::{Duration, Instant};
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{Color, PixelFormat, PixelFrame};
use crate::effect::{EffectId, EffectSlot};
use crate::error::{DriverError, TransmitError};
use crate::filter::{
    BrightnessFilter, Current, CurrentLimit, CurrentModel, FadeFilter, Filter, MaskFilter, Scale,
};
use crate::frame_scheduler::DEFAULT_FRAME_DURATION;
use crate::state::{ChannelState, StateView};
use crate::{PixelTransmitter, RandomSource};

/// Default duration of a full fade out or fade in.
pub const DEFAULT_FADE_DURATION: Duration = Duration::from_millis(1_000);

/// Consecutive failed frames before a channel is reported as stalled.
pub const DEFAULT_STALL_THRESHOLD: u32 = 30;

/// Configuration for the pixel driver
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    /// Interval between frames
    pub frame_duration: Duration,
    /// Current estimate calibration
    pub current: CurrentModel,
    /// Duration of `fade_out` / `fade_in`
    pub fade_duration: Duration,
    /// Consecutive failures that mark a channel stalled
    pub stall_threshold: u32,
}

impl DriverConfig {
    pub const DEFAULT: Self = Self {
        frame_duration: DEFAULT_FRAME_DURATION,
        current: CurrentModel::DEFAULT,
        fade_duration: DEFAULT_FADE_DURATION,
        stall_threshold: DEFAULT_STALL_THRESHOLD,
    };

    /// Config with the frame duration derived from a frame rate
    #[must_use]
    pub const fn with_fps(mut self, fps: u64) -> Self {
        let fps = if fps == 0 { 1 } else { fps };
        self.frame_duration = Duration::from_millis(1000 / fps);
        self
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Render pipeline of a single channel
///
/// Owns the channel's raw and transmit buffers and its effect state. The
/// shared [`ChannelState`] is only read through short synchronized copies.
pub struct ChannelRenderer<'a, T: PixelTransmitter, const N: usize> {
    state: &'a ChannelState<N>,
    transmitter: T,
    view: StateView<N>,
    effect: EffectSlot,
    raw: [Color; N],
    frame: [Color; N],
    brightness: BrightnessFilter,
    fade: FadeFilter,
}

impl<'a, T: PixelTransmitter, const N: usize> ChannelRenderer<'a, T, N> {
    pub fn new(state: &'a ChannelState<N>, transmitter: T, fade_duration: Duration) -> Self {
        let settings = state.settings();
        Self {
            state,
            transmitter,
            view: StateView::new(settings),
            effect: settings.effect.to_slot(),
            raw: [Color::BLACK; N],
            frame: [Color::BLACK; N],
            brightness: BrightnessFilter::new(settings.brightness),
            fade: FadeFilter::new(fade_duration),
        }
    }

    pub const fn state(&self) -> &'a ChannelState<N> {
        self.state
    }

    pub const fn format(&self) -> PixelFormat {
        self.state.format()
    }

    pub const fn effect_id(&self) -> EffectId {
        self.effect.id()
    }

    /// Effect output of the last frame
    pub fn raw(&self) -> &[Color] {
        &self.raw[..self.state.pixel_count()]
    }

    /// Final output of the last frame, as handed to the transmitter
    pub fn frame(&self) -> &[Color] {
        &self.frame[..self.state.pixel_count()]
    }

    pub const fn fade_level(&self) -> u8 {
        self.fade.level()
    }

    pub const fn transmitter(&self) -> &T {
        &self.transmitter
    }

    pub fn transmitter_mut(&mut self) -> &mut T {
        &mut self.transmitter
    }

    /// Run effect, brightness, fade and mask into the transmit buffer
    pub fn compose<R: RandomSource>(&mut self, now: Instant, rng: &mut R) {
        self.state.sync_view(&mut self.view);
        if let Some(target) = self.view.pending_fade.take() {
            self.fade.set(target, now);
        }
        self.fade.tick(now);

        let settings = self.view.settings;
        if settings.effect != self.effect.id() {
            self.effect = settings.effect.to_slot();
            self.view.invalidate_staged();
        }

        let count = self.state.pixel_count();
        let format = self.state.format();
        let raw = &mut self.raw[..count];
        if settings.effect == EffectId::RawBuffer {
            self.state.sync_staged(&mut self.view, raw);
        }

        let frame = &mut self.frame[..count];
        if !settings.on {
            frame.fill(Color::BLACK);
            return;
        }

        self.effect.render(&settings, now, rng, raw);
        frame.copy_from_slice(raw);

        if !self.effect.applies_brightness() {
            self.brightness.set(settings.brightness);
            self.brightness.apply(frame);
        }
        self.fade.apply(frame);
        MaskFilter::new(&self.view.mask[..count]).apply(frame);

        for pixel in frame.iter_mut() {
            *pixel = pixel.for_format(format);
        }
    }

    /// Estimated draw of the composed frame in 1/255 mA units
    pub fn estimate_units(&self, model: &CurrentModel) -> u64 {
        model.estimate_units(self.frame(), self.format())
    }

    pub fn apply_scale(&mut self, scale: Scale) {
        let count = self.state.pixel_count();
        scale.apply(&mut self.frame[..count]);
    }

    /// Send the transmit buffer and wait for the hardware to finish
    ///
    /// A failure loses this frame only; it is recorded in the channel
    /// health and the next frame is attempted normally.
    pub fn transmit(&mut self, stall_threshold: u32) -> Result<(), TransmitError> {
        let count = self.state.pixel_count();
        let frame = PixelFrame::new(&self.frame[..count], self.state.format());
        let result = self.transmitter.transmit_and_wait(frame);

        self.state.record_transmit(result, stall_threshold);
        result
    }
}

/// Summary of one rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Estimated draw of all channels before limiting, in milliamps
    pub estimated_ma: u64,
    /// Factor applied by the current limiter, if any
    pub scale: Option<Scale>,
    /// Channels whose transmission failed this frame
    pub failed_channels: usize,
}

/// Device-level owner of all channel pipelines
///
/// All channels share one frame clock, one random source and one current
/// budget: the estimate is summed over every channel and a single factor is
/// applied to all of them.
pub struct PixelDriver<'a, T: PixelTransmitter, R: RandomSource, const N: usize, const CHANNELS: usize>
{
    channels: Vec<ChannelRenderer<'a, T, N>, CHANNELS>,
    rng: R,
    limit: &'a CurrentLimit,
    config: DriverConfig,
}

impl<'a, T: PixelTransmitter, R: RandomSource, const N: usize, const CHANNELS: usize>
    PixelDriver<'a, T, R, N, CHANNELS>
{
    pub fn new(limit: &'a CurrentLimit, rng: R, config: DriverConfig) -> Self {
        Self {
            channels: Vec::new(),
            rng,
            limit,
            config,
        }
    }

    /// Register a channel, returning its id
    pub fn add_channel(
        &mut self,
        state: &'a ChannelState<N>,
        transmitter: T,
    ) -> Result<usize, DriverError> {
        let renderer = ChannelRenderer::new(state, transmitter, self.config.fade_duration);
        self.channels
            .push(renderer)
            .map_err(|_| DriverError::ChannelsFull)?;

        #[cfg(feature = "esp32-log")]
        println!(
            "[PixelDriver.add_channel] {:?}: {} pixels, {:?}",
            state.name(),
            state.pixel_count(),
            state.format()
        );

        Ok(self.channels.len() - 1)
    }

    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Ids of all registered channels
    pub fn channel_ids(&self) -> core::ops::Range<usize> {
        0..self.channels.len()
    }

    pub fn channel(&self, id: usize) -> Option<&ChannelRenderer<'a, T, N>> {
        self.channels.get(id)
    }

    pub fn channel_mut(&mut self, id: usize) -> Option<&mut ChannelRenderer<'a, T, N>> {
        self.channels.get_mut(id)
    }

    /// The first registered channel
    pub fn main_channel(&self) -> Option<&ChannelRenderer<'a, T, N>> {
        self.channels.first()
    }

    pub const fn current_limit(&self) -> &'a CurrentLimit {
        self.limit
    }

    pub fn set_current_limit(&self, limit: Current) {
        self.limit.set(limit);
    }

    /// Render, limit and transmit one frame on every channel
    pub fn render(&mut self, now: Instant) -> FrameReport {
        for channel in &mut self.channels {
            channel.compose(now, &mut self.rng);
        }

        let model = self.config.current;
        let estimated: u64 = self
            .channels
            .iter()
            .map(|channel| channel.estimate_units(&model))
            .sum();
        let scale = model.scale_for(self.limit.get(), estimated);
        if let Some(scale) = scale {
            for channel in &mut self.channels {
                channel.apply_scale(scale);
            }
        }

        let stall_threshold = self.config.stall_threshold;
        let failed_channels = self
            .channels
            .iter_mut()
            .map(|channel| channel.transmit(stall_threshold))
            .filter(Result::is_err)
            .count();

        FrameReport {
            estimated_ma: estimated / 255,
            scale,
            failed_channels,
        }
    }
}
