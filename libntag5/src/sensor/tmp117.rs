// libntag5/src/sensor/tmp117.rs

//! TI TMP117 precision temperature sensor.

use derive_more::Display;
use log::info;

use crate::tunnel::{I2cMaster, RegisterTunnel};
use crate::types::Reading;
use crate::utils::{poll_until, PollPolicy};
use crate::{Error, Result};

pub const DEFAULT_ADDRESS: u8 = 0x48;

pub const REG_TEMP_RESULT: u8 = 0x00;
pub const REG_CONFIG: u8 = 0x01;
pub const REG_THIGH_LIMIT: u8 = 0x02;
pub const REG_TLOW_LIMIT: u8 = 0x03;
pub const REG_EEPROM_UL: u8 = 0x04;
pub const REG_EEPROM1: u8 = 0x05;
pub const REG_EEPROM2: u8 = 0x06;
pub const REG_TEMP_OFFSET: u8 = 0x07;
pub const REG_EEPROM3: u8 = 0x08;
pub const REG_DEVICE_ID: u8 = 0x0F;

pub const CONFIG_SOFT_RESET: u16 = 1 << 1;
pub const CONFIG_ALERT_SELECT: u16 = 1 << 2;
pub const CONFIG_ALERT_POLARITY: u16 = 1 << 3;
pub const CONFIG_THERM_MODE: u16 = 1 << 4;
pub const CONFIG_AVG_MASK: u16 = 0x3 << 5;
pub const CONFIG_CONV_MASK: u16 = 0x7 << 7;
pub const CONFIG_MODE_MASK: u16 = 0x3 << 10;
pub const CONFIG_EEPROM_BUSY: u16 = 1 << 12;
pub const CONFIG_DATA_READY: u16 = 1 << 13;
pub const CONFIG_LOW_ALERT: u16 = 1 << 14;
pub const CONFIG_HIGH_ALERT: u16 = 1 << 15;

/// Bits that survive a reset when stored in EEPROM. Status flags and the
/// self-clearing soft reset bit are excluded from the comparison.
pub const CONFIG_PERSISTENT_MASK: u16 = 0x0FFC;

pub const EEPROM_UNLOCK: u16 = 1 << 15;
pub const EEPROM_BUSY: u16 = 1 << 14;

pub const DEVICE_ID_MASK: u16 = 0x0FFF;

/// One LSB in millidegrees Celsius.
pub const RESOLUTION_MILLI_C: f32 = 7.8125;

pub fn raw_to_celsius(raw: u16) -> f32 {
    (raw as i16) as f32 * RESOLUTION_MILLI_C / 1000.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ConversionMode {
    #[display(fmt = "continuous")]
    Continuous,
    #[display(fmt = "shutdown")]
    Shutdown,
    #[display(fmt = "one_shot")]
    OneShot,
}

impl ConversionMode {
    fn from_bits(v: u16) -> Self {
        match v & 0x3 {
            1 => ConversionMode::Shutdown,
            3 => ConversionMode::OneShot,
            // 00 and 10 both select continuous conversion
            _ => ConversionMode::Continuous,
        }
    }

    fn bits(self) -> u16 {
        match self {
            ConversionMode::Continuous => 0,
            ConversionMode::Shutdown => 1,
            ConversionMode::OneShot => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Averaging {
    #[display(fmt = "none")]
    None,
    #[display(fmt = "8")]
    X8,
    #[display(fmt = "32")]
    X32,
    #[display(fmt = "64")]
    X64,
}

impl Averaging {
    fn from_bits(v: u16) -> Self {
        match v & 0x3 {
            0 => Averaging::None,
            1 => Averaging::X8,
            2 => Averaging::X32,
            _ => Averaging::X64,
        }
    }
}

/// Effective conversion cycle in milliseconds.
///
/// Cycle codes 0..=3 are stretched by the averaging time, so they only
/// reach their nominal value with 64 samples. 4 is one second, 5..=7
/// double from there.
pub fn conversion_cycle_ms(cycle: u8, averaging: Averaging) -> f32 {
    use Averaging as A;
    match (cycle & 0x7, averaging) {
        (0, A::None) => 15.5,
        (0, A::X8) | (1, A::None) | (1, A::X8) => 125.0,
        (2, A::None) | (2, A::X8) => 250.0,
        (0..=3, A::X32) | (3, A::None) | (3, A::X8) => 500.0,
        (5, _) => 4000.0,
        (6, _) => 8000.0,
        (7, _) => 16000.0,
        _ => 1000.0,
    }
}

/// Decoded configuration register.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Tmp117Config {
    pub high_alert: bool,
    pub low_alert: bool,
    pub data_ready: bool,
    pub eeprom_busy: bool,
    pub mode: ConversionMode,
    pub averaging: Averaging,
    pub conversion_cycle: u8,
    pub conversion_cycle_ms: f32,
    pub therm_mode: bool,
    pub alert_polarity_high: bool,
    pub alert_select_data_ready: bool,
    pub soft_reset: bool,
}

impl Tmp117Config {
    pub fn decode(raw: u16) -> Self {
        let averaging = Averaging::from_bits(raw >> 5);
        let cycle = ((raw & CONFIG_CONV_MASK) >> 7) as u8;
        Self {
            high_alert: raw & CONFIG_HIGH_ALERT != 0,
            low_alert: raw & CONFIG_LOW_ALERT != 0,
            data_ready: raw & CONFIG_DATA_READY != 0,
            eeprom_busy: raw & CONFIG_EEPROM_BUSY != 0,
            mode: ConversionMode::from_bits(raw >> 10),
            averaging,
            conversion_cycle: cycle,
            conversion_cycle_ms: conversion_cycle_ms(cycle, averaging),
            therm_mode: raw & CONFIG_THERM_MODE != 0,
            alert_polarity_high: raw & CONFIG_ALERT_POLARITY != 0,
            alert_select_data_ready: raw & CONFIG_ALERT_SELECT != 0,
            soft_reset: raw & CONFIG_SOFT_RESET != 0,
        }
    }
}

/// Fields to change in the configuration register; `None` keeps the
/// current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub mode: Option<ConversionMode>,
    pub cycle: Option<u8>,
    pub averaging: Option<Averaging>,
}

impl ConfigUpdate {
    pub fn apply(&self, mut raw: u16) -> u16 {
        if let Some(mode) = self.mode {
            raw = (raw & !CONFIG_MODE_MASK) | (mode.bits() << 10);
        }
        if let Some(cycle) = self.cycle {
            raw = (raw & !CONFIG_CONV_MASK) | ((u16::from(cycle) << 7) & CONFIG_CONV_MASK);
        }
        if let Some(avg) = self.averaging {
            raw = (raw & !CONFIG_AVG_MASK) | ((avg as u16) << 5);
        }
        raw
    }
}

/// Limits, user words and identification kept in EEPROM.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EepromInfo {
    pub thigh_limit: f32,
    pub tlow_limit: f32,
    pub eeprom1: u16,
    pub eeprom2: u16,
    pub eeprom3: u16,
    pub temperature_offset: f32,
    pub device_id: u16,
    pub revision: u8,
}

pub struct Tmp117<M> {
    tunnel: RegisterTunnel<M>,
    eeprom_poll: PollPolicy,
}

impl<M: I2cMaster> Tmp117<M> {
    pub fn new(master: M, address: u8) -> Self {
        Self {
            tunnel: RegisterTunnel::new(master, address),
            eeprom_poll: PollPolicy::default(),
        }
    }

    /// Use `poll` for both the bus-busy and the EEPROM-busy waits.
    pub fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.tunnel = self.tunnel.with_poll(poll);
        self.eeprom_poll = poll;
        self
    }

    pub fn tunnel(&mut self) -> &mut RegisterTunnel<M> {
        &mut self.tunnel
    }

    pub fn release(self) -> M {
        self.tunnel.release()
    }

    pub fn raw_config(&mut self) -> Result<u16> {
        self.tunnel.read_u16_be(REG_CONFIG)
    }

    pub fn config_info(&mut self) -> Result<Tmp117Config> {
        Ok(Tmp117Config::decode(self.raw_config()?))
    }

    pub fn eeprom_info(&mut self) -> Result<EepromInfo> {
        let t = &mut self.tunnel;
        let thigh_limit = raw_to_celsius(t.read_u16_be(REG_THIGH_LIMIT)?);
        let tlow_limit = raw_to_celsius(t.read_u16_be(REG_TLOW_LIMIT)?);
        let eeprom1 = t.read_u16_be(REG_EEPROM1)?;
        let eeprom2 = t.read_u16_be(REG_EEPROM2)?;
        let eeprom3 = t.read_u16_be(REG_EEPROM3)?;
        let temperature_offset = raw_to_celsius(t.read_u16_be(REG_TEMP_OFFSET)?);
        let id = t.read_u16_be(REG_DEVICE_ID)?;
        Ok(EepromInfo {
            thigh_limit,
            tlow_limit,
            eeprom1,
            eeprom2,
            eeprom3,
            temperature_offset,
            device_id: id & DEVICE_ID_MASK,
            revision: (id >> 12) as u8,
        })
    }

    /// Read-modify-write the configuration register. With `persistent`
    /// the value is also programmed into EEPROM and confirmed after a
    /// general call reset.
    pub fn write_config(&mut self, update: &ConfigUpdate, persistent: bool) -> Result<()> {
        let config = update.apply(self.raw_config()?);
        if !persistent {
            return self.tunnel.write_u16_be(REG_CONFIG, config);
        }

        self.tunnel.write_u16_be(REG_EEPROM_UL, EEPROM_UNLOCK)?;
        self.tunnel.write_u16_be(REG_CONFIG, config)?;

        let tunnel = &mut self.tunnel;
        poll_until(&self.eeprom_poll, "eeprom write", || {
            Ok(tunnel.read_u16_be(REG_EEPROM_UL)? & EEPROM_BUSY == 0)
        })?;
        info!("EEPROM writing completed");

        self.tunnel.general_reset()?;
        let actual = self.raw_config()?;
        // alert, data ready and EEPROM busy flags plus soft reset are not stored
        if actual & CONFIG_PERSISTENT_MASK != config & CONFIG_PERSISTENT_MASK {
            return Err(Error::EepromNotConfirmed {
                expected: config,
                actual,
            });
        }
        Ok(())
    }

    /// Temperature in degrees Celsius, or `NotReady` while the data ready
    /// flag is clear.
    pub fn read_temperature(&mut self) -> Result<Reading<f32>> {
        let config = self.raw_config()?;
        if config & CONFIG_DATA_READY == 0 {
            return Ok(Reading::NotReady);
        }
        let raw = self.tunnel.read_u16_be(REG_TEMP_RESULT)?;
        Ok(Reading::Ready(raw_to_celsius(raw)))
    }
}
