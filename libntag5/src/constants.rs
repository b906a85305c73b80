// libntag5/src/constants.rs
//! Common wire constants used across the crate

/// Reader status word for a successful APDU: 0x90 0x00
pub const SW_SUCCESS: [u8; 2] = [0x90, 0x00];

/// Pseudo-APDU class byte understood by the reader itself
pub const PSEUDO_APDU_CLA: u8 = 0xFF;

/// Transparent exchange instruction
pub const PSEUDO_APDU_INS_TRANSPARENT: u8 = 0xC2;

/// Transparent function selectors (P2)
pub const TRANSPARENT_FN_MANAGE: u8 = 0x00;
pub const TRANSPARENT_FN_EXCHANGE: u8 = 0x01;
pub const TRANSPARENT_FN_SWITCH_PROTOCOL: u8 = 0x02;

/// Session management data objects
pub const MANAGE_BEGIN_SESSION: [u8; 2] = [0x81, 0x00];
pub const MANAGE_END_SESSION: [u8; 2] = [0x82, 0x00];

/// Switch the air interface to ISO/IEC 15693 layer 3
pub const SWITCH_PROTOCOL_ISO15693_L3: [u8; 4] = [0x8F, 0x02, 0x02, 0x03];

/// Tagged record tags used by the transparent exchange
pub const TAG_ERROR_STATUS: u16 = 0xC0;
pub const TAG_CMD_DATA: u16 = 0x95;
pub const TAG_CMD_TIMEOUT: u16 = 0x5F46;
pub const TAG_CMD_FWTI: u16 = 0xFF6E;
pub const TAG_RESP_STATUS: u16 = 0x96;
pub const TAG_RESP_FRAMING: u16 = 0x92;
pub const TAG_RESP_DATA: u16 = 0x97;

/// Prefix of the frame-wait-time record value, followed by the FWTI byte
pub const FWTI_PREFIX: [u8; 2] = [0x03, 0x01];

/// NXP IC manufacturer code carried by every custom command
pub const MANUFACTURER_CODE_NXP: u8 = 0x04;

/// Largest command data object a short APDU can carry
pub const MAX_APDU_DATA_LEN: usize = 255;
