//! Configuration persistence
//!
//! The durable part of a channel's settings is stored as a fixed 8-byte
//! blob: `[effect, r, g, b, w, brightness, speed, on]`. Loading never fails
//! from the caller's point of view, it falls back to the channel defaults.
//! Saving is best effort; the in-memory state stays authoritative.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::Color;
use crate::effect::EffectId;
use crate::error::{RecordError, StoreError};
use crate::state::ChannelState;

/// Namespace used when a channel does not configure one
pub const DEFAULT_NAMESPACE: &str = "pixel_cfg";

/// Size of an encoded [`ConfigRecord`]
pub const RECORD_LEN: usize = 8;

/// Minimal key-value store contract (NVS style)
pub trait KeyValueStore {
    /// Read `key` into `buf`, returning the stored length
    ///
    /// Returns `StoreError::NotFound` when the namespace or key is absent.
    fn get(&mut self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StoreError>;

    /// Write `value` under `key`
    fn set(&mut self, namespace: &str, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Make pending writes durable
    fn commit(&mut self) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&mut self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StoreError> {
        (**self).get(namespace, key, buf)
    }

    fn set(&mut self, namespace: &str, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).set(namespace, key, value)
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        (**self).commit()
    }
}

/// Durable subset of a channel's effect configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfigRecord {
    pub effect: EffectId,
    pub color: Color,
    pub brightness: u8,
    pub speed: u8,
    pub on: bool,
}

impl ConfigRecord {
    /// Built-in record: solid white at full brightness
    pub const DEFAULT: Self = Self {
        effect: EffectId::Solid,
        color: Color::rgbw(255, 255, 255, 0),
        brightness: 255,
        speed: 10,
        on: true,
    };

    #[allow(clippy::cast_lossless)]
    pub const fn to_bytes(&self) -> [u8; RECORD_LEN] {
        [
            self.effect.as_raw(),
            self.color.r,
            self.color.g,
            self.color.b,
            self.color.w,
            self.brightness,
            self.speed,
            self.on as u8,
        ]
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        let &[effect, r, g, b, w, brightness, speed, on] = bytes else {
            return Err(RecordError::Length(bytes.len()));
        };
        let effect = EffectId::from_raw(effect).ok_or(RecordError::Effect(effect))?;
        let on = match on {
            0 => false,
            1 => true,
            other => return Err(RecordError::OnState(other)),
        };
        Ok(Self {
            effect,
            color: Color::rgbw(r, g, b, w),
            brightness,
            speed,
            on,
        })
    }
}

impl Default for ConfigRecord {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Why a load fell back to the defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFallback {
    /// Store could not be read
    Store(StoreError),
    /// Stored blob is not a valid record
    Record(RecordError),
}

/// Result of [`ChannelState::load_from_store`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The stored record was applied
    Loaded(ConfigRecord),
    /// The channel defaults were applied instead
    Defaulted(LoadFallback),
}

impl LoadOutcome {
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Read and decode the record of `state` without applying it
pub fn read_record<S: KeyValueStore, const N: usize>(
    store: &mut S,
    state: &ChannelState<N>,
) -> Result<ConfigRecord, LoadFallback> {
    let config = state.config();
    // One spare byte so an oversized blob shows up as a length mismatch
    let mut buf = [0u8; RECORD_LEN + 1];
    let len = store
        .get(config.storage_namespace, config.storage_key, &mut buf)
        .map_err(LoadFallback::Store)?;
    ConfigRecord::from_bytes(&buf[..len.min(buf.len())]).map_err(|err| match err {
        RecordError::Length(_) => LoadFallback::Record(RecordError::Length(len)),
        other => LoadFallback::Record(other),
    })
}

impl<const N: usize> ChannelState<N> {
    /// Load the persisted record, falling back to the channel defaults
    pub fn load_from_store<S: KeyValueStore>(&self, store: &mut S) -> LoadOutcome {
        match read_record(store, self) {
            Ok(record) => {
                self.apply_record(&record);
                LoadOutcome::Loaded(record)
            }
            Err(reason) => {
                #[cfg(feature = "esp32-log")]
                println!(
                    "[ChannelState.load_from_store] {:?}: using defaults ({:?})",
                    self.config().name,
                    reason
                );
                self.apply_record(&self.config().defaults);
                LoadOutcome::Defaulted(reason)
            }
        }
    }

    /// Persist the current record
    ///
    /// Failures are logged and returned; in-memory state is unaffected.
    pub fn save_to_store<S: KeyValueStore>(&self, store: &mut S) -> Result<(), StoreError> {
        let config = self.config();
        let bytes = self.get_persistent_config().to_bytes();
        let result = store
            .set(config.storage_namespace, config.storage_key, &bytes)
            .and_then(|()| store.commit());

        #[cfg(feature = "esp32-log")]
        if let Err(err) = result {
            println!(
                "[ChannelState.save_to_store] {:?}: save failed ({:?})",
                config.name, err
            );
        }

        result
    }

    /// Apply a record and persist it
    pub fn set_persistent_config<S: KeyValueStore>(
        &self,
        record: &ConfigRecord,
        store: &mut S,
    ) -> Result<(), StoreError> {
        self.apply_record(record);
        self.save_to_store(store)
    }
}
