// libntag5/src/sensor/tmp112.rs

//! TI TMP112 temperature sensor.

use derive_more::Display;

use crate::tunnel::{I2cMaster, RegisterTunnel};
use crate::types::Reading;
use crate::utils::PollPolicy;
use crate::Result;

pub const DEFAULT_ADDRESS: u8 = 0x48;

pub const REG_TEMP_RESULT: u8 = 0x00;
pub const REG_CONFIG: u8 = 0x01;
pub const REG_TLOW_LIMIT: u8 = 0x02;
pub const REG_THIGH_LIMIT: u8 = 0x03;

pub const CONFIG_EXTENDED_MODE: u16 = 1 << 4;
pub const CONFIG_ALERT: u16 = 1 << 5;
pub const CONFIG_CONV_RATE_MASK: u16 = 0x3 << 6;
pub const CONFIG_SHUTDOWN: u16 = 1 << 8;
pub const CONFIG_THERMOSTAT: u16 = 1 << 9;
pub const CONFIG_ALERT_POLARITY: u16 = 1 << 10;
pub const CONFIG_FAULT_QUEUE_MASK: u16 = 0x3 << 11;
pub const CONFIG_RESOLUTION_MASK: u16 = 0x3 << 13;
pub const CONFIG_ONE_SHOT: u16 = 1 << 15;

pub const LSB_CELSIUS: f32 = 0.0625;

/// Left aligned two's complement: 12 bits, or 13 in extended mode.
pub fn raw_to_celsius(raw: u16, extended: bool) -> f32 {
    let shift = if extended { 3 } else { 4 };
    ((raw as i16) >> shift) as f32 * LSB_CELSIUS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ConversionRate {
    #[display(fmt = "0.25 Hz")]
    Hz0_25,
    #[display(fmt = "1 Hz")]
    Hz1,
    #[display(fmt = "4 Hz")]
    Hz4,
    #[display(fmt = "8 Hz")]
    Hz8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Resolution {
    #[display(fmt = "12 Bit")]
    Bits12,
    #[display(fmt = "unknown ({})", _0)]
    Unknown(u8),
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Tmp112Config {
    /// Only known after reading the limit registers; `None` from
    /// [`decode`](Self::decode).
    pub tlow_limit: Option<f32>,
    pub thigh_limit: Option<f32>,
    pub shutdown: bool,
    pub thermostat_mode: bool,
    pub alert_polarity_high: bool,
    pub one_shot: bool,
    pub extended_mode: bool,
    pub alert: bool,
    /// Consecutive faults before the alert fires.
    pub fault_queue: u8,
    pub resolution: Resolution,
    pub conversion_rate: ConversionRate,
}

impl Tmp112Config {
    /// Decode the configuration register. The limits live in their own
    /// registers and are left as `None`.
    pub fn decode(raw: u16) -> Self {
        let fault_queue = [1, 2, 4, 6][((raw & CONFIG_FAULT_QUEUE_MASK) >> 11) as usize];
        let resolution = match ((raw & CONFIG_RESOLUTION_MASK) >> 13) as u8 {
            3 => Resolution::Bits12,
            other => Resolution::Unknown(other),
        };
        let conversion_rate = match (raw & CONFIG_CONV_RATE_MASK) >> 6 {
            0 => ConversionRate::Hz0_25,
            1 => ConversionRate::Hz1,
            2 => ConversionRate::Hz4,
            _ => ConversionRate::Hz8,
        };
        Self {
            tlow_limit: None,
            thigh_limit: None,
            shutdown: raw & CONFIG_SHUTDOWN != 0,
            thermostat_mode: raw & CONFIG_THERMOSTAT != 0,
            alert_polarity_high: raw & CONFIG_ALERT_POLARITY != 0,
            one_shot: raw & CONFIG_ONE_SHOT != 0,
            extended_mode: raw & CONFIG_EXTENDED_MODE != 0,
            alert: raw & CONFIG_ALERT != 0,
            fault_queue,
            resolution,
            conversion_rate,
        }
    }
}

/// Writable mode bits; `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeUpdate {
    pub shutdown: Option<bool>,
    pub one_shot: Option<bool>,
}

impl ModeUpdate {
    pub fn apply(&self, mut raw: u16) -> u16 {
        let set = |raw: u16, bit: u16, on: bool| if on { raw | bit } else { raw & !bit };
        if let Some(sd) = self.shutdown {
            raw = set(raw, CONFIG_SHUTDOWN, sd);
        }
        if let Some(os) = self.one_shot {
            raw = set(raw, CONFIG_ONE_SHOT, os);
        }
        raw
    }
}

pub struct Tmp112<M> {
    tunnel: RegisterTunnel<M>,
}

impl<M: I2cMaster> Tmp112<M> {
    pub fn new(master: M, address: u8) -> Self {
        Self {
            tunnel: RegisterTunnel::new(master, address),
        }
    }

    pub fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.tunnel = self.tunnel.with_poll(poll);
        self
    }

    pub fn release(self) -> M {
        self.tunnel.release()
    }

    pub fn config_info(&mut self) -> Result<Tmp112Config> {
        let raw = self.tunnel.read_u16_be(REG_CONFIG)?;
        let mut config = Tmp112Config::decode(raw);
        let extended = config.extended_mode;
        let tlow = self.tunnel.read_u16_be(REG_TLOW_LIMIT)?;
        let thigh = self.tunnel.read_u16_be(REG_THIGH_LIMIT)?;
        config.tlow_limit = Some(raw_to_celsius(tlow, extended));
        config.thigh_limit = Some(raw_to_celsius(thigh, extended));
        Ok(config)
    }

    /// Read-modify-write the mode bits of the configuration register.
    pub fn write_config(&mut self, update: &ModeUpdate) -> Result<()> {
        let raw = self.tunnel.read_u16_be(REG_CONFIG)?;
        self.tunnel.write_u16_be(REG_CONFIG, update.apply(raw))
    }

    /// Start a single conversion from shutdown mode.
    pub fn trigger_one_shot(&mut self) -> Result<()> {
        self.write_config(&ModeUpdate {
            shutdown: Some(true),
            one_shot: Some(true),
        })
    }

    /// In shutdown mode the one-shot bit reads 0 while a conversion is
    /// running, which is reported as `NotReady`.
    pub fn read_temperature(&mut self) -> Result<Reading<f32>> {
        let raw = self.tunnel.read_u16_be(REG_CONFIG)?;
        if raw & CONFIG_SHUTDOWN != 0 && raw & CONFIG_ONE_SHOT == 0 {
            return Ok(Reading::NotReady);
        }
        let extended = raw & CONFIG_EXTENDED_MODE != 0;
        let t = self.tunnel.read_u16_be(REG_TEMP_RESULT)?;
        Ok(Reading::Ready(raw_to_celsius(t, extended)))
    }
}
