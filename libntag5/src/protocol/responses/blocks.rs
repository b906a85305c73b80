// libntag5/src/protocol/responses/blocks.rs

use crate::protocol::parser::ensure_len;
use crate::types::Block;
use crate::{Error, Result};

/// Block security status: bit 0 set means the block is locked.
pub const SECURITY_STATUS_LOCKED: u8 = 1 << 0;

fn block_from(chunk: &[u8]) -> Block {
    Block {
        locked: chunk[0] & SECURITY_STATUS_LOCKED != 0,
        data: chunk[1..].to_vec(),
    }
}

/// Decode a single block read with the option flag set:
/// `[security status, data...]`.
pub fn decode_single_block(data: &[u8]) -> Result<Block> {
    ensure_len(data, 2)?;
    Ok(block_from(data))
}

/// Split a multi-block response into `count` equally sized blocks, each
/// prefixed with its security status byte.
pub fn decode_blocks(data: &[u8], count: u16) -> Result<Vec<Block>> {
    let count = count as usize;
    if count == 0 {
        return Err(Error::InvalidArgument(
            "must read at least one block".to_string(),
        ));
    }
    ensure_len(data, count * 2)?;
    if data.len() % count != 0 {
        return Err(Error::Unsupported(format!(
            "{} bytes do not split into {count} blocks",
            data.len()
        )));
    }
    let stride = data.len() / count;
    Ok(data.chunks_exact(stride).map(block_from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_four_blocks() {
        let data = [
            0x00, 1, 2, 3, 4, //
            0x01, 5, 6, 7, 8, //
            0x00, 9, 10, 11, 12, //
            0x00, 13, 14, 15, 16,
        ];
        let blocks = decode_blocks(&data, 4).unwrap();
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[1].data, vec![5, 6, 7, 8]);
        assert!(blocks[1].locked);
        assert!(!blocks[2].locked);
    }

    #[test]
    fn uneven_payload_rejected() {
        let data = [0x00, 1, 2, 3, 4, 0x00, 5, 6, 7];
        assert!(matches!(decode_blocks(&data, 2), Err(Error::Unsupported(_))));
    }

    #[test]
    fn short_payload_rejected() {
        assert!(matches!(
            decode_blocks(&[0x00, 0x01, 0x02], 2),
            Err(Error::InvalidLength { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn single_block() {
        let b = decode_single_block(&[0x01, 0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        assert!(b.locked);
        assert_eq!(b.to_hex(), "de ad be ef");
    }
}
