//! # Since Values
//!
//! The time lock carried by the spent authority input: an 8-bit flag in the
//! top byte and a 56-bit value below it. Only absolute timestamps and
//! absolute block numbers are used here.

use super::errors::EncodingError;
use crate::constants::{SINCE_FLAG_BLOCK_NUMBER, SINCE_FLAG_TIMESTAMP, SINCE_VALUE_MASK};
use serde::{Deserialize, Serialize};

/// Raw since value as stored on the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SinceValue(pub u64);

impl SinceValue {
    /// Absolute timestamp lock.
    pub fn absolute_timestamp(value: u64) -> Self {
        Self(((SINCE_FLAG_TIMESTAMP as u64) << 56) | (value & SINCE_VALUE_MASK))
    }

    /// Absolute block number lock.
    pub fn absolute_block_number(value: u64) -> Self {
        Self(((SINCE_FLAG_BLOCK_NUMBER as u64) << 56) | (value & SINCE_VALUE_MASK))
    }

    /// Lock matching the configured round metric.
    pub fn for_metric(wall_clock: bool, value: u64) -> Self {
        if wall_clock {
            Self::absolute_timestamp(value)
        } else {
            Self::absolute_block_number(value)
        }
    }

    /// Top byte.
    pub fn flag(&self) -> u8 {
        (self.0 >> 56) as u8
    }

    /// 56-bit value.
    pub fn value(&self) -> u64 {
        self.0 & SINCE_VALUE_MASK
    }

    /// The time value, provided the flag matches the configured metric.
    pub fn metric_value(&self, wall_clock: bool) -> Result<u64, EncodingError> {
        let expected = if wall_clock {
            SINCE_FLAG_TIMESTAMP
        } else {
            SINCE_FLAG_BLOCK_NUMBER
        };
        if self.flag() != expected {
            return Err(EncodingError::SinceFlagMismatch {
                expected,
                actual: self.flag(),
            });
        }
        Ok(self.value())
    }
}
