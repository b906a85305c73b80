// libntag5/src/tag/i2c.rs

use derive_more::Display;

/// Outcome of the last I2C transaction started by the tag as bus master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum I2cResult {
    #[display(fmt = "no transaction since reset")]
    Reset,
    #[display(fmt = "address not acknowledged")]
    AddressNak,
    #[display(fmt = "data not acknowledged")]
    DataNak,
    #[display(fmt = "success")]
    Success,
}

impl From<u8> for I2cResult {
    fn from(bits: u8) -> Self {
        match bits & 0x03 {
            0 => I2cResult::Reset,
            1 => I2cResult::AddressNak,
            2 => I2cResult::DataNak,
            _ => I2cResult::Success,
        }
    }
}

/// I2C master status session register, byte 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct I2cStatus {
    pub busy: bool,
    pub result: I2cResult,
    pub watchdog_expired: bool,
}

impl I2cStatus {
    pub fn decode(v: u8) -> Self {
        Self {
            busy: v & 0x01 != 0,
            result: I2cResult::from((v >> 1) & 0x03),
            watchdog_expired: v & 0x08 != 0,
        }
    }

    pub fn encode(&self) -> u8 {
        (self.busy as u8) | ((self.result as u8) << 1) | ((self.watchdog_expired as u8) << 3)
    }

    /// Idle, acknowledged and no watchdog.
    pub fn is_ok(&self) -> bool {
        !self.busy && !self.watchdog_expired && self.result == I2cResult::Success
    }
}
