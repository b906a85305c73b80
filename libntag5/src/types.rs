// libntag5/src/types.rs

use crate::Error;
use std::convert::TryFrom;

/// UID - Newtype Pattern (8 バイト, MSB first)
///
/// Vicinity cards send the UID least significant byte first; decoders
/// reverse it once so the stored order is the printed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Uid([u8; 8]);

impl Uid {
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// Build from the on-air (LSB first) representation.
    pub fn from_wire(wire: &[u8]) -> Result<Self, Error> {
        let mut uid = Self::try_from(wire)?;
        uid.0.reverse();
        Ok(uid)
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(self.as_bytes())
    }
}

impl TryFrom<&[u8]> for Uid {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != 8 {
            return Err(Error::InvalidLength {
                expected: 8,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }
}

/// ConfigPage (4 バイト). Configuration memory is only ever read and
/// written in whole pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConfigPage([u8; 4]);

impl ConfigPage {
    pub const LEN: usize = 4;

    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn byte(&self, index: usize) -> u8 {
        self.0[index % Self::LEN]
    }

    /// Copy of this page with one byte replaced.
    pub fn with_byte(mut self, index: usize, value: u8) -> Self {
        self.0[index % Self::LEN] = value;
        self
    }
}

impl TryFrom<&[u8]> for ConfigPage {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() < Self::LEN {
            return Err(Error::InvalidLength {
                expected: Self::LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 4];
        arr.copy_from_slice(&bytes[..Self::LEN]);
        Ok(Self(arr))
    }
}

/// One user-memory block together with its security status.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Block {
    pub data: Vec<u8>,
    pub locked: bool,
}

impl Block {
    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex_spaced(&self.data)
    }
}

/// Outcome of a sensor read that may legitimately have nothing to report
/// yet. Hard failures travel in the surrounding `Result`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Reading<T> {
    Ready(T),
    NotReady,
}

impl<T> Reading<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Reading::Ready(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Reading::Ready(v) => Some(v),
            Reading::NotReady => None,
        }
    }
}
