// libntag5/src/tag/info.rs

use derive_more::Display;

use crate::protocol::parser::{byte_at, slice_at};
use crate::Result;

/// Interface pads wired on this chip variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum InterfaceType {
    #[display(fmt = "only_nfc")]
    NfcOnly,
    #[display(fmt = "gpio")]
    Gpio,
    #[display(fmt = "rfu")]
    Rfu,
    #[display(fmt = "gpio_i2c")]
    GpioI2c,
}

impl From<u8> for InterfaceType {
    fn from(bits: u8) -> Self {
        match bits & 0x03 {
            0 => InterfaceType::NfcOnly,
            1 => InterfaceType::Gpio,
            2 => InterfaceType::Rfu,
            _ => InterfaceType::GpioI2c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProtectionCondition {
    pub read_protect_page_0l: bool,
    pub write_protect_page_0l: bool,
    pub read_protect_page_0h: bool,
    pub write_protect_page_0h: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LockBits {
    pub eas: bool,
    pub dsfid: bool,
    pub nfc_pp_area_0h: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FeatureFlags {
    // byte 0
    pub user_memory_protection: bool,
    pub counter: bool,
    pub eas_id: bool,
    pub eas_protection: bool,
    pub afi_protection: bool,
    pub inventory_read_extended: bool,
    pub eas_ir: bool,
    pub cid: bool,
    // byte 1
    pub persistent_quiet: bool,
    pub privacy: bool,
    pub destroy: bool,
    pub write_cid: bool,
    pub high_bitrates: bool,
    // byte 2
    pub originality_signature: bool,
    // byte 3
    pub key_count: u8,
    pub interface: InterfaceType,
    pub extended_flags_present: bool,
}

impl FeatureFlags {
    pub fn decode(b: [u8; 4]) -> Self {
        let bit = |byte: u8, n: u8| byte & (1 << n) != 0;
        Self {
            user_memory_protection: bit(b[0], 0),
            counter: bit(b[0], 1),
            eas_id: bit(b[0], 2),
            eas_protection: bit(b[0], 3),
            afi_protection: bit(b[0], 4),
            inventory_read_extended: bit(b[0], 5),
            eas_ir: bit(b[0], 6),
            cid: bit(b[0], 7),
            persistent_quiet: bit(b[1], 2),
            privacy: bit(b[1], 4),
            destroy: bit(b[1], 5),
            write_cid: bit(b[1], 6),
            high_bitrates: bit(b[1], 7),
            originality_signature: bit(b[2], 0),
            key_count: b[3] & 0x0F,
            interface: InterfaceType::from((b[3] & 0x60) >> 5),
            extended_flags_present: bit(b[3], 7),
        }
    }
}

/// READ NXP SYSTEM INFO result.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NxpInfo {
    pub pp_pointer: u8,
    pub pp_condition: ProtectionCondition,
    pub lock_bits: LockBits,
    pub features: FeatureFlags,
    /// Raw extended feature flags, present when the card announces them.
    pub extended_flags: Option<[u8; 4]>,
}

/// Decode the payload of READ NXP SYSTEM INFO (response flags stripped).
pub fn decode_nxp_info(data: &[u8]) -> Result<NxpInfo> {
    let pp_pointer = byte_at(data, 0)?;
    let ppc = byte_at(data, 1)?;
    let lock = byte_at(data, 2)?;
    let mut fb = [0u8; 4];
    fb.copy_from_slice(slice_at(data, 3, 4)?);
    let features = FeatureFlags::decode(fb);

    let extended_flags = if features.extended_flags_present {
        let mut ext = [0u8; 4];
        ext.copy_from_slice(slice_at(data, 7, 4)?);
        Some(ext)
    } else {
        None
    };

    Ok(NxpInfo {
        pp_pointer,
        pp_condition: ProtectionCondition {
            read_protect_page_0l: ppc & 0x01 != 0,
            write_protect_page_0l: ppc & 0x02 != 0,
            read_protect_page_0h: ppc & 0x10 != 0,
            write_protect_page_0h: ppc & 0x20 != 0,
        },
        lock_bits: LockBits {
            eas: lock & 0x02 != 0,
            dsfid: lock & 0x04 != 0,
            nfc_pp_area_0h: lock & 0x08 != 0,
        },
        features,
        extended_flags,
    })
}
