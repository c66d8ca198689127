//! Error types shared by the engine and its collaborators.

use thiserror::Error;

/// Errors reported by a [`KeyValueStore`](crate::persistence::KeyValueStore)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Namespace or key does not exist
    #[error("key not found")]
    NotFound,
    /// Stored value does not fit into the read buffer
    #[error("stored value too large ({0} bytes)")]
    TooLarge(usize),
    /// Backend could not be opened or is not initialized
    #[error("store unavailable")]
    Unavailable,
    /// Backend rejected the write or commit
    #[error("store write failed")]
    WriteFailed,
}

/// Errors reported by a [`PixelTransmitter`](crate::PixelTransmitter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransmitError {
    /// Peripheral refused to start the transfer
    #[error("transmission could not be started")]
    Rejected,
    /// Transfer did not finish within the hardware bound
    #[error("transmission timed out")]
    Timeout,
    /// Peripheral reported a bus fault
    #[error("transmission bus fault")]
    Bus,
}

/// Reasons a stored configuration blob is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record has {0} bytes")]
    Length(usize),
    #[error("unknown effect id {0}")]
    Effect(u8),
    #[error("invalid on/off byte {0}")]
    OnState(u8),
}

/// Input rejected at the channel state boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown effect id {0}")]
    UnknownEffectId(u8),
    #[error("unknown effect name")]
    UnknownEffectName,
    #[error("expected {expected} pixels, got {actual}")]
    Length { expected: usize, actual: usize },
    #[error("pixel index {index} out of range for {count} pixels")]
    PixelIndex { index: usize, count: usize },
}

/// Errors raised while assembling a [`PixelDriver`](crate::PixelDriver)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DriverError {
    /// All channel slots are taken
    #[error("no free channel slot")]
    ChannelsFull,
}
