// libntag5/src/transport/ccid.rs

//! CCID bulk message codec.
//!
//! Only the handful of messages a contactless reader slot needs: power on,
//! power off, slot status and block transfer. Every message starts with a
//! 10 byte header; the four byte length is little endian and counts the
//! payload only.

use crate::{Error, Result};

pub const HEADER_LEN: usize = 10;

pub const PC_TO_RDR_ICC_POWER_ON: u8 = 0x62;
pub const PC_TO_RDR_ICC_POWER_OFF: u8 = 0x63;
pub const PC_TO_RDR_GET_SLOT_STATUS: u8 = 0x65;
pub const PC_TO_RDR_XFR_BLOCK: u8 = 0x6F;

pub const RDR_TO_PC_DATA_BLOCK: u8 = 0x80;
pub const RDR_TO_PC_SLOT_STATUS: u8 = 0x81;

/// Reader-side error code reported when no card answers.
pub const ICC_MUTE: u8 = 0xFE;

/// ICC presence as reported in bits 0-1 of bStatus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IccStatus {
    Active,
    Inactive,
    Absent,
    Rfu,
}

impl IccStatus {
    fn from_bits(v: u8) -> Self {
        match v & 0x03 {
            0 => IccStatus::Active,
            1 => IccStatus::Inactive,
            2 => IccStatus::Absent,
            _ => IccStatus::Rfu,
        }
    }
}

/// Command outcome as reported in bits 6-7 of bStatus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Processed,
    Failed,
    TimeExtension,
    Rfu,
}

impl CommandStatus {
    fn from_bits(v: u8) -> Self {
        match (v >> 6) & 0x03 {
            0 => CommandStatus::Processed,
            1 => CommandStatus::Failed,
            2 => CommandStatus::TimeExtension,
            _ => CommandStatus::Rfu,
        }
    }
}

/// Build a PC_to_RDR message. `params` fills the three message specific
/// header bytes.
pub fn encode_message(kind: u8, slot: u8, seq: u8, params: [u8; 3], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.push(kind);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.push(slot);
    out.push(seq);
    out.extend_from_slice(&params);
    out.extend_from_slice(payload);
    out
}

pub fn power_on(slot: u8, seq: u8) -> Vec<u8> {
    // bPowerSelect 0 = automatic voltage selection
    encode_message(PC_TO_RDR_ICC_POWER_ON, slot, seq, [0x00, 0x00, 0x00], &[])
}

pub fn power_off(slot: u8, seq: u8) -> Vec<u8> {
    encode_message(PC_TO_RDR_ICC_POWER_OFF, slot, seq, [0x00; 3], &[])
}

pub fn get_slot_status(slot: u8, seq: u8) -> Vec<u8> {
    encode_message(PC_TO_RDR_GET_SLOT_STATUS, slot, seq, [0x00; 3], &[])
}

pub fn xfr_block(slot: u8, seq: u8, apdu: &[u8]) -> Vec<u8> {
    encode_message(PC_TO_RDR_XFR_BLOCK, slot, seq, [0x00; 3], apdu)
}

/// Decoded RDR_to_PC message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderMessage {
    pub kind: u8,
    pub slot: u8,
    pub seq: u8,
    pub icc: IccStatus,
    pub command: CommandStatus,
    pub error: u8,
    pub payload: Vec<u8>,
}

impl ReaderMessage {
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_LEN {
            return Err(Error::InvalidLength {
                expected: HEADER_LEN,
                actual: buf.len(),
            });
        }
        let len = u32::from_le_bytes([buf[1], buf[2], buf[3], buf[4]]) as usize;
        let end = HEADER_LEN + len;
        if buf.len() < end {
            return Err(Error::InvalidLength {
                expected: end,
                actual: buf.len(),
            });
        }
        let status = buf[7];
        Ok(Self {
            kind: buf[0],
            slot: buf[5],
            seq: buf[6],
            icc: IccStatus::from_bits(status),
            command: CommandStatus::from_bits(status),
            error: buf[8],
            payload: buf[HEADER_LEN..end].to_vec(),
        })
    }

    pub fn is_time_extension(&self) -> bool {
        self.command == CommandStatus::TimeExtension
    }

    /// Check that this message answers `seq` with the expected kind and
    /// did not fail. Time extensions must be filtered by the caller first.
    pub fn expect(self, kind: u8, seq: u8) -> Result<Self> {
        if self.kind != kind || self.seq != seq {
            return Err(Error::Ccid(format!(
                "unexpected message {:#04x} seq {} (wanted {:#04x} seq {})",
                self.kind, self.seq, kind, seq
            )));
        }
        if self.command == CommandStatus::Failed {
            if self.error == ICC_MUTE || self.icc == IccStatus::Absent {
                return Err(Error::CardAbsent);
            }
            return Err(Error::Ccid(format!(
                "slot error {:#04x}",
                self.error
            )));
        }
        Ok(self)
    }
}
