// libntag5/src/protocol/commands/system.rs

use crate::protocol::commands::{
    CMD_GET_EXTENDED_SYSTEM_INFO, CMD_GET_SYSTEM_INFO, FLAG_DATA_RATE,
};

/// Request every optional field except the long info-flags form.
pub const EXTENDED_INFO_REQUEST_ALL: u8 = 0x7F;

pub fn encode_get_system_info() -> Vec<u8> {
    vec![FLAG_DATA_RATE, CMD_GET_SYSTEM_INFO]
}

/// `request` selects which optional fields the card should return. Bit 7
/// (long info-flags form) is not supported by the decoder.
pub fn encode_get_extended_system_info(request: u8) -> Vec<u8> {
    vec![FLAG_DATA_RATE, CMD_GET_EXTENDED_SYSTEM_INFO, request & 0x7F]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_info_frames() {
        assert_eq!(encode_get_system_info(), vec![0x02, 0x2B]);
        assert_eq!(
            encode_get_extended_system_info(EXTENDED_INFO_REQUEST_ALL),
            vec![0x02, 0x3B, 0x7F]
        );
        assert_eq!(encode_get_extended_system_info(0xFF), vec![0x02, 0x3B, 0x7F]);
    }
}
