// libntag5/src/protocol/status.rs

//! Air-interface checks applied to every response before its payload is
//! trusted.

use thiserror::Error;

use crate::bridge::RfResponse;
use crate::protocol::error_code::Iso15693Error;
use crate::protocol::parser::byte_at;
use crate::Result;

pub const RF_STATUS_CRC: u8 = 1 << 0;
pub const RF_STATUS_COLLISION: u8 = 1 << 1;
pub const RF_STATUS_PARITY: u8 = 1 << 2;
pub const RF_STATUS_FRAMING: u8 = 1 << 3;
pub const RF_STATUS_RFU_MASK: u8 = 0xF0;

/// Number of valid bits in the last received byte. Zero means all eight.
pub const FRAMING_VALID_BITS_MASK: u8 = 0x07;

/// Response flag: error, the next byte carries the error code.
pub const RESPONSE_FLAG_ERROR: u8 = 1 << 0;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfError {
    #[error("CRC check failed")]
    Crc,
    #[error("collision detected")]
    Collision,
    #[error("parity error detected")]
    Parity,
    #[error("framing error detected")]
    Framing,
    #[error("reserved status bits set ({0:#04x})")]
    Rfu(u8),
    #[error("last byte incomplete, framing {0:#04x}")]
    IncompleteByte(u8),
}

/// Check the response status byte. Bits are tested in order so the most
/// specific cause is reported.
pub fn check_rf_status(status: u8) -> std::result::Result<(), RfError> {
    if status & RF_STATUS_CRC != 0 {
        return Err(RfError::Crc);
    }
    if status & RF_STATUS_COLLISION != 0 {
        return Err(RfError::Collision);
    }
    if status & RF_STATUS_PARITY != 0 {
        return Err(RfError::Parity);
    }
    if status & RF_STATUS_FRAMING != 0 {
        return Err(RfError::Framing);
    }
    if status & RF_STATUS_RFU_MASK != 0 {
        return Err(RfError::Rfu(status));
    }
    Ok(())
}

pub fn check_framing(framing: u8) -> std::result::Result<(), RfError> {
    if framing & FRAMING_VALID_BITS_MASK != 0 {
        return Err(RfError::IncompleteByte(framing));
    }
    Ok(())
}

/// Run every check on a raw exchange result and return the payload with
/// the flags byte stripped.
pub fn validate(resp: RfResponse) -> Result<Vec<u8>> {
    check_rf_status(resp.status)?;
    check_framing(resp.framing)?;

    let flags = byte_at(&resp.data, 0)?;
    if flags & RESPONSE_FLAG_ERROR != 0 {
        let code = byte_at(&resp.data, 1)?;
        return Err(Iso15693Error::from_code(code).into());
    }
    let mut data = resp.data;
    data.remove(0);
    Ok(data)
}
