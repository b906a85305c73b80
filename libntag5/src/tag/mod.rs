// libntag5/src/tag/mod.rs

//! NTAG 5 Link custom commands.
//!
//! These are ordinary vicinity frames carrying the NXP manufacturer code,
//! so they travel through [`Iso15693::transceive`] and get the same status
//! checks as the standard commands.

pub mod commands;
pub mod config;
pub mod energy;
pub mod i2c;
pub mod info;

pub use commands::VendorCommand;
pub use config::*;
pub use energy::EhSession;
pub use i2c::{I2cResult, I2cStatus};
pub use info::{decode_nxp_info, FeatureFlags, InterfaceType, LockBits, NxpInfo, ProtectionCondition};

use log::debug;

use crate::bridge::{Bridge, Closed};
use crate::protocol::Iso15693;
use crate::types::ConfigPage;
use crate::{Error, Result};

/// SRAM mailbox: I2C reads land here, four bytes per page.
pub const SRAM_START: u8 = 0x00;

/// NTAG 5 Link reached through an open vicinity session.
pub struct Ntag5Link {
    iso: Iso15693,
}

impl Ntag5Link {
    pub fn new(iso: Iso15693) -> Self {
        Self { iso }
    }

    /// Open a session on `bridge` and wrap it.
    pub fn open(bridge: Bridge<Closed>) -> Result<Self> {
        Ok(Self::new(Iso15693::new(bridge.open()?)))
    }

    /// Standard vicinity commands on the same card.
    pub fn vicinity(&mut self) -> &mut Iso15693 {
        &mut self.iso
    }

    pub fn close(self) -> Result<Bridge<Closed>> {
        self.iso.close()
    }

    fn vendor(&mut self, cmd: VendorCommand) -> Result<Vec<u8>> {
        let frame = cmd.encode()?;
        debug!("ntag5 command {:#04x}", cmd.command_code());
        self.iso.transceive(&frame)
    }

    pub fn nxp_info(&mut self) -> Result<NxpInfo> {
        let data = self.vendor(VendorCommand::ReadSystemInfo)?;
        decode_nxp_info(&data)
    }

    pub fn read_config_pages(&mut self, address: u8, count: u16) -> Result<Vec<ConfigPage>> {
        let data = self.vendor(VendorCommand::ReadConfig {
            address,
            pages: count,
        })?;
        let expected = usize::from(count) * ConfigPage::LEN;
        if data.len() < expected {
            return Err(Error::InvalidLength {
                expected,
                actual: data.len(),
            });
        }
        data[..expected]
            .chunks_exact(ConfigPage::LEN)
            .map(ConfigPage::try_from)
            .collect()
    }

    pub fn read_config(&mut self, address: u8) -> Result<ConfigPage> {
        let mut pages = self.read_config_pages(address, 1)?;
        pages
            .pop()
            .ok_or(Error::InvalidLength {
                expected: ConfigPage::LEN,
                actual: 0,
            })
    }

    /// Write one whole page. Callers changing single bits go through the
    /// typed writers below, which read the page first.
    pub fn write_config(&mut self, address: u8, page: ConfigPage) -> Result<()> {
        debug!("write config {address:#04x}: {}", crate::utils::bytes_to_hex(page.as_bytes()));
        self.vendor(VendorCommand::WriteConfig { address, page })?;
        Ok(())
    }

    /// Read `pages` four-byte pages of the SRAM mailbox.
    pub fn read_buffer(&mut self, address: u8, pages: u16) -> Result<Vec<u8>> {
        self.vendor(VendorCommand::ReadSram { address, pages })
    }

    /// Start an I2C read of `len` bytes. The data is fetched afterwards
    /// from the SRAM mailbox with [`read_buffer`](Self::read_buffer).
    pub fn i2c_read(&mut self, address: u8, len: u16, stop: bool) -> Result<()> {
        self.vendor(VendorCommand::ReadI2c { address, len, stop })?;
        Ok(())
    }

    pub fn i2c_write(&mut self, address: u8, data: &[u8], stop: bool) -> Result<()> {
        self.vendor(VendorCommand::WriteI2c {
            address,
            data: data.to_vec(),
            stop,
        })?;
        Ok(())
    }

    pub fn i2c_status(&mut self) -> Result<I2cStatus> {
        let page = self.read_config(ADDR_I2C_MASTER_STATUS)?;
        Ok(I2cStatus::decode(page.byte(0)))
    }

    pub fn i2c_busy(&mut self) -> Result<bool> {
        Ok(self.i2c_status()?.busy)
    }

    pub fn i2c_last_result(&mut self) -> Result<I2cResult> {
        Ok(self.i2c_status()?.result)
    }

    pub fn config_info(&mut self) -> Result<ConfigInfo> {
        let page = self.read_config(ADDR_CONFIG)?;
        Ok(ConfigInfo::decode(&page))
    }

    fn modify_config<F>(&mut self, address: u8, f: F) -> Result<()>
    where
        F: FnOnce(ConfigPage) -> ConfigPage,
    {
        let current = self.read_config(address)?;
        let updated = f(current);
        if updated == current {
            debug!("config {address:#04x} unchanged, skipping write");
            return Ok(());
        }
        self.write_config(address, updated)
    }

    pub fn write_config0(&mut self, config: &Config0) -> Result<()> {
        self.modify_config(ADDR_CONFIG, |p| p.with_byte(0, config.encode()))
    }

    pub fn write_config1(&mut self, config: &Config1) -> Result<()> {
        self.modify_config(ADDR_CONFIG, |p| p.with_byte(1, config.encode()))
    }

    pub fn write_config2(&mut self, config: &Config2) -> Result<()> {
        self.modify_config(ADDR_CONFIG, |p| p.with_byte(2, config.encode()))
    }

    pub fn energy_config(&mut self) -> Result<EnergyConfig> {
        let page = self.read_config(ADDR_EH_CONFIG)?;
        Ok(EnergyConfig::decode(&page))
    }

    pub fn write_energy_config(&mut self, config: &EnergyConfig) -> Result<()> {
        self.modify_config(ADDR_EH_CONFIG, |p| config.apply(p))
    }
}
