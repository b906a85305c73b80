// libntag5/src/protocol/commands/mod.rs

pub mod read;
pub mod system;

pub use read::{encode_fast_extended_read, encode_read_multiple_blocks, encode_read_single_block};
pub use system::{EXTENDED_INFO_REQUEST_ALL, encode_get_extended_system_info, encode_get_system_info};

use crate::Result;

// Request flags (bits 1-4 common, 5-8 when the inventory flag is clear)
pub const FLAG_SUB_CARRIER: u8 = 1 << 0;
pub const FLAG_DATA_RATE: u8 = 1 << 1;
pub const FLAG_INVENTORY: u8 = 1 << 2;
pub const FLAG_PROTOCOL_EXTENSION: u8 = 1 << 3;
pub const FLAG_SELECT: u8 = 1 << 4;
pub const FLAG_ADDRESS: u8 = 1 << 5;
pub const FLAG_OPTION: u8 = 1 << 6;

pub const CMD_READ_SINGLE_BLOCK: u8 = 0x20;
pub const CMD_READ_MULTIPLE_BLOCKS: u8 = 0x23;
pub const CMD_GET_SYSTEM_INFO: u8 = 0x2B;
pub const CMD_GET_EXTENDED_SYSTEM_INFO: u8 = 0x3B;
pub const CMD_FAST_EXTENDED_READ_MULTIPLE_BLOCKS: u8 = 0x3D;

/// Standard commands understood by every vicinity card this crate talks to.
/// Per-command encoders live in `protocol::commands::<name>.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GetSystemInfo,
    GetExtendedSystemInfo { request: u8 },
    ReadSingleBlock { block: u8 },
    ReadMultipleBlocks { start: u8, count: u16 },
    FastExtendedReadMultipleBlocks { start: u16, count: u16 },
}

impl Command {
    pub fn command_code(&self) -> u8 {
        match self {
            Self::GetSystemInfo => CMD_GET_SYSTEM_INFO,
            Self::GetExtendedSystemInfo { .. } => CMD_GET_EXTENDED_SYSTEM_INFO,
            Self::ReadSingleBlock { .. } => CMD_READ_SINGLE_BLOCK,
            Self::ReadMultipleBlocks { .. } => CMD_READ_MULTIPLE_BLOCKS,
            Self::FastExtendedReadMultipleBlocks { .. } => CMD_FAST_EXTENDED_READ_MULTIPLE_BLOCKS,
        }
    }

    /// Encode flags, command code and parameters. Invalid block counts are
    /// rejected here, before anything reaches the reader.
    pub fn encode(&self) -> Result<Vec<u8>> {
        match *self {
            Self::GetSystemInfo => Ok(encode_get_system_info()),
            Self::GetExtendedSystemInfo { request } => Ok(encode_get_extended_system_info(request)),
            Self::ReadSingleBlock { block } => Ok(encode_read_single_block(block)),
            Self::ReadMultipleBlocks { start, count } => encode_read_multiple_blocks(start, count),
            Self::FastExtendedReadMultipleBlocks { start, count } => {
                encode_fast_extended_read(start, count)
            }
        }
    }
}
