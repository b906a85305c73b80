// libntag5/src/protocol/error_code.rs

use thiserror::Error;

/// ISO/IEC 15693 response error codes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iso15693Error {
    #[error("the command is not supported")]
    UnsupportedCommand,
    #[error("the command is not recognized (format error)")]
    UnrecognizedCommand,
    #[error("the option is not supported")]
    UnsupportedOption,
    #[error("unknown error")]
    Unknown,
    #[error("the specified block is not available")]
    BlockUnavailable,
    #[error("the specified block is already locked")]
    BlockAlreadyLocked,
    #[error("the specified block is locked and cannot be changed")]
    BlockLocked,
    #[error("the specified block was not successfully programmed")]
    ProgrammingFailed,
    #[error("the specified block was not successfully locked")]
    LockingFailed,
    #[error("custom command error code {0:#04x}")]
    Custom(u8),
    #[error("reserved error code {0:#04x}")]
    Rfu(u8),
}

impl Iso15693Error {
    pub fn from_code(code: u8) -> Self {
        match code {
            0x01 => Self::UnsupportedCommand,
            0x02 => Self::UnrecognizedCommand,
            0x03 => Self::UnsupportedOption,
            0x0F => Self::Unknown,
            0x10 => Self::BlockUnavailable,
            0x11 => Self::BlockAlreadyLocked,
            0x12 => Self::BlockLocked,
            0x13 => Self::ProgrammingFailed,
            0x14 => Self::LockingFailed,
            0xA0..=0xDF => Self::Custom(code),
            other => Self::Rfu(other),
        }
    }

    pub fn code(&self) -> u8 {
        match *self {
            Self::UnsupportedCommand => 0x01,
            Self::UnrecognizedCommand => 0x02,
            Self::UnsupportedOption => 0x03,
            Self::Unknown => 0x0F,
            Self::BlockUnavailable => 0x10,
            Self::BlockAlreadyLocked => 0x11,
            Self::BlockLocked => 0x12,
            Self::ProgrammingFailed => 0x13,
            Self::LockingFailed => 0x14,
            Self::Custom(c) | Self::Rfu(c) => c,
        }
    }
}
