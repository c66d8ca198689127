use embassy_time::{Duration, Instant};

use crate::math8::{blend8, progress8};

/// Blends two values of type `T` using a progress value (0-255)
pub type ValueBlender<T> = fn(T, T, u8) -> T;

/// Time-based transition between two values
///
/// Used by the fade envelope to ramp a channel's output level.
#[derive(Debug, Clone)]
pub struct ValueTransition<T: Copy> {
    blend: ValueBlender<T>,
    current: T,
    source: T,
    /// Target value, `None` once settled
    target: Option<T>,
    duration: Duration,
    start_time: Instant,
}

impl<T: Copy> ValueTransition<T> {
    pub const fn new(initial: T, blend: ValueBlender<T>) -> Self {
        Self {
            blend,
            current: initial,
            source: initial,
            target: None,
            duration: Duration::from_millis(0),
            start_time: Instant::from_millis(0),
        }
    }

    pub const fn current(&self) -> T {
        self.current
    }

    pub const fn is_transitioning(&self) -> bool {
        self.target.is_some()
    }

    /// Start moving towards `value`
    ///
    /// A zero duration jumps immediately. A transition already in flight
    /// restarts from the value it has reached so far.
    pub fn set(&mut self, value: T, duration: Duration, start_time: Instant) {
        self.start_time = start_time;
        if duration.as_millis() == 0 {
            self.current = value;
            self.source = value;
            self.target = None;
            self.duration = Duration::from_millis(0);
        } else {
            self.source = self.current;
            self.target = Some(value);
            self.duration = duration;
        }
    }

    /// Advance the transition to `now`
    pub fn tick(&mut self, now: Instant) {
        let Some(target) = self.target else {
            return;
        };

        let elapsed = now.saturating_duration_since(self.start_time);
        if elapsed >= self.duration {
            self.current = target;
            self.source = target;
            self.target = None;
            return;
        }

        let progress = progress8(elapsed, self.duration);
        self.current = (self.blend)(self.source, target, progress);
    }
}

impl ValueTransition<u8> {
    pub const fn new_u8(initial: u8) -> Self {
        Self::new(initial, blend8)
    }
}
