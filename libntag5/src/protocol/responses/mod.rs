// libntag5/src/protocol/responses/mod.rs

pub mod blocks;
pub mod extended;
pub mod system;

pub use blocks::{decode_blocks, decode_single_block};
pub use extended::{
    decode_extended_system_info, AddressingMode, Capability, CryptoSuite, ExtendedSystemInfo,
    Iso29167Suite, SupportedCommands,
};
pub use system::{decode_system_info, Afi, MemoryGeometry, SystemInfo};
