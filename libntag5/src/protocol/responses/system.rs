// libntag5/src/protocol/responses/system.rs

use crate::protocol::parser::Cursor;
use crate::types::Uid;
use crate::Result;

pub const INFO_FLAG_DSFID: u8 = 1 << 0;
pub const INFO_FLAG_AFI: u8 = 1 << 1;
pub const INFO_FLAG_MEMORY_SIZE: u8 = 1 << 2;
pub const INFO_FLAG_IC_REFERENCE: u8 = 1 << 3;

/// Block size lives in the low five bits, the rest is RFU.
pub const BLOCK_SIZE_MASK: u8 = 0x1F;

/// Application family identifier split into its two nibbles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Afi {
    pub family: u8,
    pub sub_family: u8,
}

impl From<u8> for Afi {
    fn from(raw: u8) -> Self {
        Self {
            family: raw >> 4,
            sub_family: raw & 0x0F,
        }
    }
}

/// User memory layout. Both counts are sent minus one on the wire and are
/// stored here as real values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MemoryGeometry {
    pub num_blocks: u32,
    pub block_size: u8,
    pub total_bytes: u32,
}

impl MemoryGeometry {
    pub fn new(num_blocks_raw: u16, block_size_raw: u8) -> Self {
        let num_blocks = num_blocks_raw as u32 + 1;
        let block_size = (block_size_raw & BLOCK_SIZE_MASK) + 1;
        Self {
            num_blocks,
            block_size,
            total_bytes: num_blocks * block_size as u32,
        }
    }
}

/// Get System Information result. Optional fields are present only when
/// the card set the matching info flag.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SystemInfo {
    pub uid: Uid,
    pub dsfid: Option<u8>,
    pub afi: Option<Afi>,
    pub memory: Option<MemoryGeometry>,
    pub ic_reference: Option<u8>,
}

/// Walk the fields shared by both info responses. `wide_block_count`
/// selects the two-byte block count of the extended form.
pub(crate) fn decode_common(c: &mut Cursor<'_>, flags: u8, wide_block_count: bool) -> Result<SystemInfo> {
    let uid = c.uid()?;
    let dsfid = if flags & INFO_FLAG_DSFID != 0 {
        Some(c.u8()?)
    } else {
        None
    };
    let afi = if flags & INFO_FLAG_AFI != 0 {
        Some(Afi::from(c.u8()?))
    } else {
        None
    };
    let memory = if flags & INFO_FLAG_MEMORY_SIZE != 0 {
        let blocks = if wide_block_count {
            c.le_u16()?
        } else {
            c.u8()? as u16
        };
        Some(MemoryGeometry::new(blocks, c.u8()?))
    } else {
        None
    };
    let ic_reference = if flags & INFO_FLAG_IC_REFERENCE != 0 {
        Some(c.u8()?)
    } else {
        None
    };
    Ok(SystemInfo {
        uid,
        dsfid,
        afi,
        memory,
        ic_reference,
    })
}

/// Decode a Get System Information payload (response flags stripped).
pub fn decode_system_info(data: &[u8]) -> Result<SystemInfo> {
    let mut c = Cursor::new(data);
    let flags = c.u8()?;
    decode_common(&mut c, flags, false)
}
