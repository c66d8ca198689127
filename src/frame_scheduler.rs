//! Frame scheduling and timing utilities.
//!
//! `tick` is portable and takes the current time from the caller, which is
//! what the tests drive. `run` is the async loop used on the device.

use embassy_time::{Duration, Instant, Timer};

use crate::renderer::{FrameReport, PixelDriver};
use crate::{PixelTransmitter, RandomSource};

/// Default target frame rate (60 FPS).
pub const DEFAULT_FPS: u64 = 60;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// What the driver did this frame.
    pub report: FrameReport,
}

/// Fixed-rate frame loop around a [`PixelDriver`].
///
/// This scheduler:
/// - Tracks frame timing with drift correction
/// - Renders and transmits every channel once per frame
/// - Returns timing info so the caller can sleep appropriately
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(driver);
///
/// loop {
///     let result = scheduler.tick(Instant::now());
///     Timer::at(result.next_deadline).await;
/// }
/// ```
pub struct FrameScheduler<
    'a,
    T: PixelTransmitter,
    R: RandomSource,
    const N: usize,
    const CHANNELS: usize,
> {
    driver: PixelDriver<'a, T, R, N, CHANNELS>,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<'a, T: PixelTransmitter, R: RandomSource, const N: usize, const CHANNELS: usize>
    FrameScheduler<'a, T, R, N, CHANNELS>
{
    /// Create a scheduler using the driver's configured frame duration.
    pub fn new(driver: PixelDriver<'a, T, R, N, CHANNELS>) -> Self {
        let frame_duration = driver.config().frame_duration;
        Self::with_frame_duration(driver, frame_duration)
    }

    /// Create a new frame scheduler with custom frame duration.
    pub fn with_frame_duration(
        driver: PixelDriver<'a, T, R, N, CHANNELS>,
        frame_duration: Duration,
    ) -> Self {
        Self {
            driver,
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Process one frame and return timing information.
    ///
    /// The caller is responsible for waiting until `next_deadline` before
    /// calling `tick` again.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        // More than two frames behind: skip the backlog instead of bursting
        let max_drift_ms = self.frame_duration.as_millis() * 2;
        if now.as_millis() > self.next_frame.as_millis() + max_drift_ms {
            self.next_frame = now;
        }

        let report = self.driver.render(now);

        self.next_frame += self.frame_duration;

        let sleep_duration = if self.next_frame.as_millis() > now.as_millis() {
            Duration::from_millis(self.next_frame.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            report,
        }
    }

    /// Render forever at the configured rate.
    pub async fn run(&mut self) -> ! {
        loop {
            let result = self.tick(Instant::now());
            Timer::at(result.next_deadline).await;
        }
    }

    /// Get a reference to the driver.
    pub fn driver(&self) -> &PixelDriver<'a, T, R, N, CHANNELS> {
        &self.driver
    }

    /// Get a mutable reference to the driver.
    pub fn driver_mut(&mut self) -> &mut PixelDriver<'a, T, R, N, CHANNELS> {
        &mut self.driver
    }
}
