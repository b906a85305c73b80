// libntag5/src/protocol/responses/extended.rs

use derive_more::Display;

use crate::protocol::parser::Cursor;
use crate::protocol::responses::system::{decode_common, Afi, MemoryGeometry};
use crate::types::Uid;
use crate::{Error, Result};

pub const INFO_FLAG_MOI: u8 = 1 << 4;
pub const INFO_FLAG_COMMAND_LIST: u8 = 1 << 5;
pub const INFO_FLAG_CSI: u8 = 1 << 6;
/// Long info-flags form. Not supported.
pub const INFO_FLAG_LENGTH: u8 = 1 << 7;

/// Memory organisation indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AddressingMode {
    #[display(fmt = "one-byte addressing")]
    OneByte,
    #[display(fmt = "two-byte addressing")]
    TwoByte,
}

impl From<u8> for AddressingMode {
    fn from(raw: u8) -> Self {
        if raw & 0x01 == 0 {
            AddressingMode::OneByte
        } else {
            AddressingMode::TwoByte
        }
    }
}

/// Optional commands a card can announce in its command list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Capability {
    #[display(fmt = "read_single_block")]
    ReadSingleBlock,
    #[display(fmt = "write_single_block")]
    WriteSingleBlock,
    #[display(fmt = "lock_single_block")]
    LockSingleBlock,
    #[display(fmt = "read_multiple_blocks")]
    ReadMultipleBlocks,
    #[display(fmt = "write_multiple_blocks")]
    WriteMultipleBlocks,
    #[display(fmt = "select")]
    Select,
    #[display(fmt = "reset_to_ready")]
    ResetToReady,
    #[display(fmt = "get_multiple_block_security_status")]
    GetMultipleBlockSecurityStatus,
    #[display(fmt = "write_afi")]
    WriteAfi,
    #[display(fmt = "lock_afi")]
    LockAfi,
    #[display(fmt = "write_dsfid")]
    WriteDsfid,
    #[display(fmt = "lock_dsfid")]
    LockDsfid,
    #[display(fmt = "get_system_information")]
    GetSystemInformation,
    #[display(fmt = "custom_commands")]
    CustomCommands,
    #[display(fmt = "fast_read_multiple_blocks")]
    FastReadMultipleBlocks,
    #[display(fmt = "extended_read_single_block")]
    ExtendedReadSingleBlock,
    #[display(fmt = "extended_write_single_block")]
    ExtendedWriteSingleBlock,
    #[display(fmt = "extended_lock_single_block")]
    ExtendedLockSingleBlock,
    #[display(fmt = "extended_read_multiple_blocks")]
    ExtendedReadMultipleBlocks,
    #[display(fmt = "extended_write_multiple_blocks")]
    ExtendedWriteMultipleBlocks,
    #[display(fmt = "extended_get_multiple_block_security_status")]
    ExtendedGetMultipleBlockSecurityStatus,
    #[display(fmt = "fast_extended_read_multiple_blocks")]
    FastExtendedReadMultipleBlocks,
    #[display(fmt = "read_buffer")]
    ReadBuffer,
    #[display(fmt = "selected_secure_state")]
    SelectedSecureState,
    #[display(fmt = "final_response_always_includes_crypto_result")]
    FinalResponseIncludesCryptoResult,
    #[display(fmt = "auth_comm_crypto_format_supported")]
    AuthCommCryptoFormat,
    #[display(fmt = "secure_comm_crypto_format_supported")]
    SecureCommCryptoFormat,
    #[display(fmt = "key_update_supported")]
    KeyUpdate,
    #[display(fmt = "challenge_supported")]
    Challenge,
    #[display(fmt = "further_byte_transmission")]
    FurtherByteTransmission,
}

impl Capability {
    pub const ALL: [Capability; 30] = [
        Capability::ReadSingleBlock,
        Capability::WriteSingleBlock,
        Capability::LockSingleBlock,
        Capability::ReadMultipleBlocks,
        Capability::WriteMultipleBlocks,
        Capability::Select,
        Capability::ResetToReady,
        Capability::GetMultipleBlockSecurityStatus,
        Capability::WriteAfi,
        Capability::LockAfi,
        Capability::WriteDsfid,
        Capability::LockDsfid,
        Capability::GetSystemInformation,
        Capability::CustomCommands,
        Capability::FastReadMultipleBlocks,
        Capability::ExtendedReadSingleBlock,
        Capability::ExtendedWriteSingleBlock,
        Capability::ExtendedLockSingleBlock,
        Capability::ExtendedReadMultipleBlocks,
        Capability::ExtendedWriteMultipleBlocks,
        Capability::ExtendedGetMultipleBlockSecurityStatus,
        Capability::FastExtendedReadMultipleBlocks,
        Capability::ReadBuffer,
        Capability::SelectedSecureState,
        Capability::FinalResponseIncludesCryptoResult,
        Capability::AuthCommCryptoFormat,
        Capability::SecureCommCryptoFormat,
        Capability::KeyUpdate,
        Capability::Challenge,
        Capability::FurtherByteTransmission,
    ];

    /// (byte index in the command list, bit mask)
    pub fn position(self) -> (usize, u8) {
        use Capability::*;
        match self {
            ReadSingleBlock => (0, 0x01),
            WriteSingleBlock => (0, 0x02),
            LockSingleBlock => (0, 0x04),
            ReadMultipleBlocks => (0, 0x08),
            WriteMultipleBlocks => (0, 0x10),
            Select => (0, 0x20),
            ResetToReady => (0, 0x40),
            GetMultipleBlockSecurityStatus => (0, 0x80),
            WriteAfi => (1, 0x01),
            LockAfi => (1, 0x02),
            WriteDsfid => (1, 0x04),
            LockDsfid => (1, 0x08),
            GetSystemInformation => (1, 0x10),
            CustomCommands => (1, 0x20),
            FastReadMultipleBlocks => (1, 0x40),
            ExtendedReadSingleBlock => (2, 0x01),
            ExtendedWriteSingleBlock => (2, 0x02),
            ExtendedLockSingleBlock => (2, 0x04),
            ExtendedReadMultipleBlocks => (2, 0x08),
            ExtendedWriteMultipleBlocks => (2, 0x10),
            ExtendedGetMultipleBlockSecurityStatus => (2, 0x20),
            FastExtendedReadMultipleBlocks => (2, 0x40),
            ReadBuffer => (3, 0x01),
            SelectedSecureState => (3, 0x02),
            FinalResponseIncludesCryptoResult => (3, 0x04),
            AuthCommCryptoFormat => (3, 0x08),
            SecureCommCryptoFormat => (3, 0x10),
            KeyUpdate => (3, 0x20),
            Challenge => (3, 0x40),
            FurtherByteTransmission => (3, 0x80),
        }
    }
}

/// Raw four-byte command list with named lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SupportedCommands(pub [u8; 4]);

impl SupportedCommands {
    pub fn supports(&self, cap: Capability) -> bool {
        let (byte, mask) = cap.position();
        self.0[byte] & mask != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(move |c| self.supports(*c))
    }
}

/// ISO/IEC 29167 crypto suites, numbered by their part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Iso29167Suite {
    #[display(fmt = "29167-10 AES-128")]
    Aes128,
    #[display(fmt = "29167-11 PRESENT-80")]
    Present80,
    #[display(fmt = "29167-12 ECC-DH")]
    EccDh,
    #[display(fmt = "29167-13 GRAIN-128A")]
    Grain128a,
    #[display(fmt = "29167-14 AES-OFB")]
    AesOfb,
    #[display(fmt = "29167-15 XOR")]
    Xor,
    #[display(fmt = "29167-16 ECDSA-ECDH")]
    EcdsaEcdh,
    #[display(fmt = "29167-17 CRYPTO-GPS")]
    CryptoGps,
    #[display(fmt = "29167-18 HUMMINGBIRD2")]
    Hummingbird2,
    #[display(fmt = "29167-19 RAMON")]
    Ramon,
    #[display(fmt = "29167-20 ALGEBRAIC-ERASER")]
    AlgebraicEraser,
    #[display(fmt = "29167-21 SIMON")]
    Simon,
    #[display(fmt = "29167-22 SPECK")]
    Speck,
    /// Carries the part number.
    #[display(fmt = "29167-{} UNKNOWN", _0)]
    Unknown(u8),
}

impl Iso29167Suite {
    fn from_index(index: u8) -> Self {
        use Iso29167Suite::*;
        match index {
            0x00 => Aes128,
            0x01 => Present80,
            0x02 => EccDh,
            0x03 => Grain128a,
            0x04 => AesOfb,
            0x05 => Xor,
            0x06 => EcdsaEcdh,
            0x07 => CryptoGps,
            0x08 => Hummingbird2,
            0x09 => Ramon,
            0x0A => AlgebraicEraser,
            0x0B => Simon,
            0x0C => Speck,
            other => Unknown(other + 10),
        }
    }
}

/// One crypto suite identifier, classified by its high bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CryptoSuite {
    #[display(fmt = "ISO {}", _0)]
    Iso29167(Iso29167Suite),
    #[display(fmt = "tag manufacturer {:#x}", _0)]
    Manufacturer(u8),
    #[display(fmt = "GS1 network {:#x}", _0)]
    Gs1(u8),
    #[display(fmt = "RFU {:#04x}", _0)]
    Rfu(u8),
}

impl From<u8> for CryptoSuite {
    fn from(raw: u8) -> Self {
        if raw & 0xC0 == 0x00 {
            CryptoSuite::Iso29167(Iso29167Suite::from_index(raw & 0x3F))
        } else if raw & 0xF0 == 0xD0 {
            CryptoSuite::Manufacturer(raw & 0x0F)
        } else if raw & 0xF0 == 0xE0 {
            CryptoSuite::Gs1(raw & 0x0F)
        } else {
            CryptoSuite::Rfu(raw)
        }
    }
}

/// Get Extended System Information result.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExtendedSystemInfo {
    pub uid: Uid,
    pub dsfid: Option<u8>,
    pub afi: Option<Afi>,
    pub memory: Option<MemoryGeometry>,
    pub ic_reference: Option<u8>,
    pub addressing: Option<AddressingMode>,
    pub commands: Option<SupportedCommands>,
    pub crypto_suites: Option<Vec<CryptoSuite>>,
}

// A single-entry CSI list comes without its length byte. A zero where the
// length should be is taken as that single entry.
fn decode_csi_list(c: &mut Cursor<'_>) -> Result<Vec<CryptoSuite>> {
    let count = match c.peek_u8()? {
        0 => 1,
        n => {
            c.u8()?;
            n as usize
        }
    };
    Ok(c.bytes(count)?.iter().map(|&b| CryptoSuite::from(b)).collect())
}

/// Decode a Get Extended System Information payload (response flags
/// stripped).
pub fn decode_extended_system_info(data: &[u8]) -> Result<ExtendedSystemInfo> {
    let mut c = Cursor::new(data);
    let flags = c.u8()?;
    if flags & INFO_FLAG_LENGTH != 0 {
        return Err(Error::Unsupported(
            "extended system info with long info flags".to_string(),
        ));
    }
    let base = decode_common(&mut c, flags, true)?;

    let addressing = if flags & INFO_FLAG_MOI != 0 {
        Some(AddressingMode::from(c.u8()?))
    } else {
        None
    };
    let commands = if flags & INFO_FLAG_COMMAND_LIST != 0 {
        Some(SupportedCommands(c.array::<4>()?))
    } else {
        None
    };
    let crypto_suites = if flags & INFO_FLAG_CSI != 0 {
        Some(decode_csi_list(&mut c)?)
    } else {
        None
    };

    Ok(ExtendedSystemInfo {
        uid: base.uid,
        dsfid: base.dsfid,
        afi: base.afi,
        memory: base.memory,
        ic_reference: base.ic_reference,
        addressing,
        commands,
        crypto_suites,
    })
}
