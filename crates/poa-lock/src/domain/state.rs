//! # Round State
//!
//! The 22-byte authority state record:
//! `round_start_time[8] | subtime[8] | subblock_index[4] | aggregator_index[2]`,
//! little-endian.

use super::config::read_u32;
use super::errors::EncodingError;
use crate::constants::ROUND_STATE_SIZE;
use serde::{Deserialize, Serialize};

/// Coordinates of the most recent subblock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    /// Time at which the current leader's window began.
    pub round_start_time: u64,
    /// Time of this subblock.
    pub subtime: u64,
    /// 0-based position of this subblock within the window.
    pub subblock_index: u32,
    /// Index of the issuing leader.
    pub aggregator_index: u16,
}

impl RoundState {
    /// Decode a state cell. The buffer must be exactly 22 bytes.
    pub fn parse(data: &[u8]) -> Result<Self, EncodingError> {
        if data.len() != ROUND_STATE_SIZE {
            return Err(EncodingError::InvalidStateLength(data.len()));
        }
        Ok(Self {
            round_start_time: read_u64(&data[0..8]),
            subtime: read_u64(&data[8..16]),
            subblock_index: read_u32(&data[16..20]),
            aggregator_index: u16::from_le_bytes([data[20], data[21]]),
        })
    }

    /// Encode as state cell data.
    pub fn to_bytes(&self) -> [u8; ROUND_STATE_SIZE] {
        let mut data = [0u8; ROUND_STATE_SIZE];
        data[0..8].copy_from_slice(&self.round_start_time.to_le_bytes());
        data[8..16].copy_from_slice(&self.subtime.to_le_bytes());
        data[16..20].copy_from_slice(&self.subblock_index.to_le_bytes());
        data[20..22].copy_from_slice(&self.aggregator_index.to_le_bytes());
        data
    }

    /// Genesis state: aggregator 0 opens the first round at `time`.
    pub fn genesis(time: u64) -> Self {
        Self {
            round_start_time: time,
            subtime: time,
            subblock_index: 0,
            aggregator_index: 0,
        }
    }
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}
