// libntag5/src/error.rs

use thiserror::Error;

use crate::bridge::BridgeError;
use crate::protocol::{Iso15693Error, RfError};
use crate::sensor::si1143::Si114xError;
use crate::tag::I2cResult;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("reader not found")]
    ReaderNotFound,

    #[error("no card present on the reader")]
    CardAbsent,

    // USB 実装を後から有効化できるように optional dependency にしている
    #[cfg(feature = "usb")]
    #[error("usb error: {0}")]
    Usb(#[from] rusb::Error),

    #[error("ccid error: {0}")]
    Ccid(String),

    #[error("reader status word {sw1:#04x} {sw2:#04x}")]
    ReaderStatus { sw1: u8, sw2: u8 },

    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("bridge response is missing record {tag:#06x}")]
    MissingRecord { tag: u16 },

    #[error("tagged record format error: {0}")]
    RecordFormat(String),

    #[error("rf error: {0}")]
    Rf(#[from] RfError),

    #[error("vicinity error: {0}")]
    Iso15693(#[from] Iso15693Error),

    #[error("invalid packet length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported response: {0}")]
    Unsupported(String),

    #[error("i2c transaction not acknowledged: {0}")]
    NotAcknowledged(I2cResult),

    #[error("i2c watchdog expired during the last transaction")]
    I2cWatchdogExpired,

    #[error("eeprom change not confirmed after reset: wrote {expected:#06x}, read back {actual:#06x}")]
    EepromNotConfirmed { expected: u16, actual: u16 },

    #[error("{what} still pending after {attempts} polls")]
    PollLimitExceeded { what: &'static str, attempts: u32 },

    #[error("sensor command {command:#04x} got no response after {attempts} polls")]
    CommandTimeout { command: u8, attempts: u32 },

    #[error("sensor error: {0}")]
    Si114x(#[from] Si114xError),

    #[error("operation timed out")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, Error>;
