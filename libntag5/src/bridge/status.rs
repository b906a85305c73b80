// libntag5/src/bridge/status.rs

use thiserror::Error;

use crate::{Error, Result};

/// Failure reported by the reader in the error status data object (C0)
/// of a pseudo APDU response. `object` is the index of the data object the
/// reader complained about.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeError {
    #[error("data object {object}: requested information not available")]
    InformationUnavailable { object: u8 },

    #[error("data object {object}: no information")]
    NoInformation { object: u8 },

    #[error("data object {object}: execution stopped due to failure in other data object")]
    FailureInOtherObject { object: u8 },

    #[error("data object {object} not supported")]
    UnsupportedObject { object: u8 },

    #[error("data object {object} with unexpected length")]
    UnexpectedLength { object: u8 },

    #[error("data object {object} with unexpected value")]
    UnexpectedValue { object: u8 },

    #[error("data object {object}: execution error, no response from reader")]
    NoResponseFromReader { object: u8 },

    #[error("data object {object}: execution error, no response from card")]
    NoResponseFromCard { object: u8 },

    #[error("data object {object} failed, no precise diagnosis")]
    ObjectFailed { object: u8 },

    #[error("data object {object}: unknown status {sw1:02x}{sw2:02x}")]
    Unknown { object: u8, sw1: u8, sw2: u8 },
}

impl BridgeError {
    /// Map an error status triple. Returns `None` for success (`00 90 00`).
    pub fn from_status(object: u8, sw1: u8, sw2: u8) -> Option<Self> {
        let err = match (sw1, sw2) {
            (0x90, 0x00) if object == 0 => return None,
            (0x62, 0x82) => BridgeError::InformationUnavailable { object },
            (0x63, 0x00) => BridgeError::NoInformation { object },
            (0x63, 0x01) => BridgeError::FailureInOtherObject { object },
            (0x6A, 0x81) => BridgeError::UnsupportedObject { object },
            (0x67, 0x00) => BridgeError::UnexpectedLength { object },
            (0x6A, 0x80) => BridgeError::UnexpectedValue { object },
            (0x64, 0x00) => BridgeError::NoResponseFromReader { object },
            (0x64, 0x01) => BridgeError::NoResponseFromCard { object },
            (0x6F, 0x00) => BridgeError::ObjectFailed { object },
            _ => BridgeError::Unknown { object, sw1, sw2 },
        };
        Some(err)
    }

    pub fn object(&self) -> u8 {
        match *self {
            BridgeError::InformationUnavailable { object }
            | BridgeError::NoInformation { object }
            | BridgeError::FailureInOtherObject { object }
            | BridgeError::UnsupportedObject { object }
            | BridgeError::UnexpectedLength { object }
            | BridgeError::UnexpectedValue { object }
            | BridgeError::NoResponseFromReader { object }
            | BridgeError::NoResponseFromCard { object }
            | BridgeError::ObjectFailed { object }
            | BridgeError::Unknown { object, .. } => object,
        }
    }
}

/// Validate the value of an error status record.
pub fn check_error_status(value: &[u8]) -> Result<()> {
    if value.len() != 3 {
        return Err(Error::InvalidLength {
            expected: 3,
            actual: value.len(),
        });
    }
    match BridgeError::from_status(value[0], value[1], value[2]) {
        None => Ok(()),
        Some(e) => Err(e.into()),
    }
}
