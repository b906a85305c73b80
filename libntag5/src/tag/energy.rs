// libntag5/src/tag/energy.rs

use log::info;

use super::config::ADDR_EH_SESSION;
use super::Ntag5Link;
use crate::types::ConfigPage;
use crate::utils::{poll_until, PollPolicy};
use crate::Result;

const EH_ENABLE: u8 = 0x01;
const EH_TRIGGER: u8 = 0x08;
const EH_LOAD_OK: u8 = 0x80;

/// Energy harvesting session register, byte 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EhSession {
    pub enable: bool,
    pub trigger: bool,
    pub load_ok: bool,
}

impl EhSession {
    pub fn decode(v: u8) -> Self {
        Self {
            enable: v & EH_ENABLE != 0,
            trigger: v & EH_TRIGGER != 0,
            load_ok: v & EH_LOAD_OK != 0,
        }
    }
}

/// Set the trigger bit and the enable bit to `enable`, leaving every other
/// bit of the page as it was read.
pub(crate) fn trigger_page(page: ConfigPage, enable: bool) -> ConfigPage {
    let mut b0 = page.byte(0) | EH_TRIGGER;
    if enable {
        b0 |= EH_ENABLE;
    } else {
        b0 &= !EH_ENABLE;
    }
    page.with_byte(0, b0)
}

impl Ntag5Link {
    pub fn energy_session(&mut self) -> Result<EhSession> {
        let page = self.read_config(ADDR_EH_SESSION)?;
        Ok(EhSession::decode(page.byte(0)))
    }

    pub fn trigger_energy_harvesting(&mut self, enable: bool) -> Result<()> {
        let page = self.read_config(ADDR_EH_SESSION)?;
        self.write_config(ADDR_EH_SESSION, trigger_page(page, enable))
    }

    pub fn energy_harvesting_load_stable(&mut self) -> Result<bool> {
        Ok(self.energy_session()?.load_ok)
    }

    /// Trigger with the output off, wait for the load to settle, then
    /// trigger again with the output on.
    pub fn start_energy_harvesting(&mut self, poll: &PollPolicy) -> Result<()> {
        self.trigger_energy_harvesting(false)?;
        poll_until(poll, "energy harvesting load", || {
            self.energy_harvesting_load_stable()
        })?;
        self.trigger_energy_harvesting(true)?;
        info!("energy harvesting output enabled");
        Ok(())
    }
}
