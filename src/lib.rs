#![no_std]

pub mod color;
pub mod effect;
pub mod error;
pub mod filter;
pub mod frame_scheduler;
pub mod math8;
pub mod persistence;
pub mod renderer;
pub mod state;
pub mod transition;

pub use color::{Color, Hsv, PixelFormat, PixelFrame, Rgb};
pub use effect::{EffectId, EffectSlot};
pub use error::{DriverError, InputError, RecordError, StoreError, TransmitError};
pub use filter::{Current, CurrentLimit, CurrentModel, Scale};
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use persistence::{ConfigRecord, KeyValueStore, LoadFallback, LoadOutcome};
pub use renderer::{ChannelRenderer, DriverConfig, FrameReport, PixelDriver};
pub use state::{ChannelConfig, ChannelHealth, ChannelState, EffectSettings};

pub use embassy_time::{Duration, Instant};

/// Abstract pixel transmitter
///
/// Implement this trait to support different hardware platforms (RMT, SPI,
/// bit-banged GPIO). The engine is generic over this trait.
pub trait PixelTransmitter {
    /// Start sending a frame to the strip
    fn transmit(&mut self, frame: PixelFrame<'_>) -> Result<(), TransmitError>;

    /// Block until the last transmission has left the wire
    fn wait_complete(&mut self) -> Result<(), TransmitError>;

    fn transmit_and_wait(&mut self, frame: PixelFrame<'_>) -> Result<(), TransmitError> {
        self.transmit(frame)?;
        self.wait_complete()
    }
}

/// Source of randomness for effects such as Sparkle
pub trait RandomSource {
    /// Uniform value in `0..max`, or 0 if `max` is 0
    fn random(&mut self, max: u32) -> u32;
}

impl<R: rand::RngCore> RandomSource for R {
    fn random(&mut self, max: u32) -> u32 {
        use rand::Rng;

        if max == 0 {
            return 0;
        }
        self.gen_range(0..max)
    }
}
