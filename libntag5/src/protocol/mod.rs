// libntag5/src/protocol/mod.rs

//! ISO/IEC 15693 (vicinity card) command layer.

pub mod commands;
pub mod error_code;
pub mod parser;
pub mod responses;
pub mod status;

pub use commands::*;
pub use error_code::Iso15693Error;
pub use responses::*;
pub use status::RfError;

use log::debug;

use crate::bridge::{Bridge, Closed, Open};
use crate::types::Block;
use crate::Result;

/// Vicinity card reached through an open transparent session.
pub struct Iso15693 {
    bridge: Bridge<Open>,
}

impl Iso15693 {
    pub fn new(bridge: Bridge<Open>) -> Self {
        Self { bridge }
    }

    pub fn bridge(&self) -> &Bridge<Open> {
        &self.bridge
    }

    /// End the session and hand the closed bridge back.
    pub fn close(self) -> Result<Bridge<Closed>> {
        self.bridge.close()
    }

    /// Send a complete request frame (flags first) and return the response
    /// payload after every status check, flags byte stripped.
    pub fn transceive(&mut self, frame: &[u8]) -> Result<Vec<u8>> {
        let resp = self.bridge.exchange(frame)?;
        status::validate(resp)
    }

    pub fn execute(&mut self, cmd: Command) -> Result<Vec<u8>> {
        let frame = cmd.encode()?;
        debug!("iso15693 command {:#04x}", cmd.command_code());
        self.transceive(&frame)
    }

    pub fn system_info(&mut self) -> Result<SystemInfo> {
        let data = self.execute(Command::GetSystemInfo)?;
        decode_system_info(&data)
    }

    pub fn extended_system_info(&mut self) -> Result<ExtendedSystemInfo> {
        let data = self.execute(Command::GetExtendedSystemInfo {
            request: EXTENDED_INFO_REQUEST_ALL,
        })?;
        decode_extended_system_info(&data)
    }

    pub fn read_single_block(&mut self, block: u8) -> Result<Block> {
        let data = self.execute(Command::ReadSingleBlock { block })?;
        decode_single_block(&data)
    }

    /// One-byte addressed multi block read (0x23).
    pub fn read_multiple_blocks(&mut self, start: u8, count: u16) -> Result<Vec<Block>> {
        let data = self.execute(Command::ReadMultipleBlocks { start, count })?;
        decode_blocks(&data, count)
    }

    /// Fast extended multi block read (0x3D). `count` must be at least 1.
    pub fn read_blocks(&mut self, start: u16, count: u16) -> Result<Vec<Block>> {
        let data = self.execute(Command::FastExtendedReadMultipleBlocks { start, count })?;
        decode_blocks(&data, count)
    }
}
