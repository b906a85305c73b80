// libntag5/src/tag/commands.rs

use crate::constants::MANUFACTURER_CODE_NXP;
use crate::protocol::commands::FLAG_DATA_RATE;
use crate::types::ConfigPage;
use crate::{Error, Result};

pub const CMD_READ_NXP_SYSTEM_INFO: u8 = 0xAB;
pub const CMD_READ_CONFIG: u8 = 0xC0;
pub const CMD_WRITE_CONFIG: u8 = 0xC1;
pub const CMD_WRITE_I2C: u8 = 0xD4;
pub const CMD_READ_I2C: u8 = 0xD5;
pub const CMD_READ_SRAM: u8 = 0xD2;

/// Counts travel as (n - 1) in a single byte.
pub const MAX_TRANSFER: u16 = 256;

/// I2C parameter bit 7: omit the stop condition.
pub const I2C_NO_STOP: u8 = 0x80;

/// NXP custom commands. Every frame is
/// `[flags, command, manufacturer code, parameters...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorCommand {
    ReadSystemInfo,
    ReadConfig { address: u8, pages: u16 },
    WriteConfig { address: u8, page: ConfigPage },
    ReadSram { address: u8, pages: u16 },
    ReadI2c { address: u8, len: u16, stop: bool },
    WriteI2c { address: u8, data: Vec<u8>, stop: bool },
}

fn count_minus_one(n: u16, what: &str) -> Result<u8> {
    if n == 0 {
        return Err(Error::InvalidArgument(format!("must {what} at least one")));
    }
    if n > MAX_TRANSFER {
        return Err(Error::InvalidArgument(format!(
            "cannot {what} more than {MAX_TRANSFER} at once, got {n}"
        )));
    }
    Ok((n - 1) as u8)
}

/// 7-bit target address with the stop flag folded into bit 7.
pub fn i2c_param(address: u8, stop: bool) -> u8 {
    (address & 0x7F) | if stop { 0x00 } else { I2C_NO_STOP }
}

impl VendorCommand {
    pub fn command_code(&self) -> u8 {
        match self {
            Self::ReadSystemInfo => CMD_READ_NXP_SYSTEM_INFO,
            Self::ReadConfig { .. } => CMD_READ_CONFIG,
            Self::WriteConfig { .. } => CMD_WRITE_CONFIG,
            Self::ReadSram { .. } => CMD_READ_SRAM,
            Self::ReadI2c { .. } => CMD_READ_I2C,
            Self::WriteI2c { .. } => CMD_WRITE_I2C,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut f = vec![FLAG_DATA_RATE, self.command_code(), MANUFACTURER_CODE_NXP];
        match self {
            Self::ReadSystemInfo => {}
            Self::ReadConfig { address, pages } => {
                f.push(*address);
                f.push(count_minus_one(*pages, "read a config page")?);
            }
            Self::WriteConfig { address, page } => {
                f.push(*address);
                f.extend_from_slice(page.as_bytes());
            }
            Self::ReadSram { address, pages } => {
                f.push(*address);
                f.push(count_minus_one(*pages, "read a buffer page")?);
            }
            Self::ReadI2c { address, len, stop } => {
                f.push(i2c_param(*address, *stop));
                f.push(count_minus_one(*len, "read a byte")?);
            }
            Self::WriteI2c {
                address,
                data,
                stop,
            } => {
                let n = u16::try_from(data.len()).unwrap_or(u16::MAX);
                let len = count_minus_one(n, "write a byte")?;
                f.push(i2c_param(*address, *stop));
                f.push(len);
                f.extend_from_slice(data);
            }
        }
        Ok(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_config_frame() {
        let f = VendorCommand::ReadConfig {
            address: 0x37,
            pages: 1,
        }
        .encode()
        .unwrap();
        assert_eq!(f, vec![0x02, 0xC0, 0x04, 0x37, 0x00]);
    }

    #[test]
    fn write_config_frame() {
        let f = VendorCommand::WriteConfig {
            address: 0x3D,
            page: ConfigPage::from_bytes([0x01, 0x00, 0x02, 0x00]),
        }
        .encode()
        .unwrap();
        assert_eq!(f, vec![0x02, 0xC1, 0x04, 0x3D, 0x01, 0x00, 0x02, 0x00]);
    }

    #[test]
    fn i2c_frames() {
        let w = VendorCommand::WriteI2c {
            address: 0x48,
            data: vec![0x01, 0x02, 0x20],
            stop: true,
        }
        .encode()
        .unwrap();
        assert_eq!(w, vec![0x02, 0xD4, 0x04, 0x48, 0x02, 0x01, 0x02, 0x20]);

        let r = VendorCommand::ReadI2c {
            address: 0xC8,
            len: 2,
            stop: false,
        }
        .encode()
        .unwrap();
        assert_eq!(r, vec![0x02, 0xD5, 0x04, 0xC8, 0x01]);
    }

    #[test]
    fn zero_counts_rejected() {
        assert!(VendorCommand::ReadSram {
            address: 0,
            pages: 0
        }
        .encode()
        .is_err());
        assert!(VendorCommand::WriteI2c {
            address: 0x48,
            data: vec![],
            stop: true
        }
        .encode()
        .is_err());
        assert!(VendorCommand::ReadI2c {
            address: 0x48,
            len: 257,
            stop: true
        }
        .encode()
        .is_err());
    }
}
