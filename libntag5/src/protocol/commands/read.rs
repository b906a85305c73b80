// libntag5/src/protocol/commands/read.rs

use crate::protocol::commands::{
    CMD_FAST_EXTENDED_READ_MULTIPLE_BLOCKS, CMD_READ_MULTIPLE_BLOCKS, CMD_READ_SINGLE_BLOCK,
    FLAG_DATA_RATE, FLAG_OPTION,
};
use crate::{Error, Result};

/// Largest block count a one-byte (count - 1) parameter can carry.
pub const MAX_BLOCKS_SHORT: u16 = 256;

fn check_count(count: u16) -> Result<()> {
    if count == 0 {
        return Err(Error::InvalidArgument(
            "must read at least one block".to_string(),
        ));
    }
    Ok(())
}

/// Read one block. The option flag asks for the block security status.
pub fn encode_read_single_block(block: u8) -> Vec<u8> {
    vec![FLAG_DATA_RATE | FLAG_OPTION, CMD_READ_SINGLE_BLOCK, block]
}

/// Read `count` blocks with one-byte addressing.
pub fn encode_read_multiple_blocks(start: u8, count: u16) -> Result<Vec<u8>> {
    check_count(count)?;
    if count > MAX_BLOCKS_SHORT || start as u16 + count > MAX_BLOCKS_SHORT {
        return Err(Error::InvalidArgument(format!(
            "blocks {start}..{} out of the one-byte address range",
            start as u16 + count
        )));
    }
    Ok(vec![
        FLAG_DATA_RATE | FLAG_OPTION,
        CMD_READ_MULTIPLE_BLOCKS,
        start,
        (count - 1) as u8,
    ])
}

/// Read `count` blocks with two-byte addressing. Block number and count
/// are sent least significant byte first.
pub fn encode_fast_extended_read(start: u16, count: u16) -> Result<Vec<u8>> {
    check_count(count)?;
    let mut v = Vec::with_capacity(6);
    v.push(FLAG_DATA_RATE | FLAG_OPTION);
    v.push(CMD_FAST_EXTENDED_READ_MULTIPLE_BLOCKS);
    v.extend_from_slice(&start.to_le_bytes());
    v.extend_from_slice(&(count - 1).to_le_bytes());
    Ok(v)
}
