// libntag5/src/sensor/si1143/mod.rs

//! Silicon Labs Si1141/2/3 ambient light and proximity sensor.
//!
//! Besides plain registers the chip has a command interface: parameters
//! go through PARAM_WR / PARAM_RD and every command is acknowledged by
//! the RESPONSE register changing.

pub mod command;
pub mod rate;

pub use command::{Command, Si114xError, RESPONSE_ERROR};

use std::time::Duration;

use derive_more::Display;
use log::debug;

use crate::tunnel::{I2cMaster, RegisterTunnel};
use crate::utils::{poll_until, PollPolicy};
use crate::{Error, Result};

pub const DEFAULT_ADDRESS: u8 = 0x5A;

pub const REG_PART_ID: u8 = 0x00;
pub const REG_REV_ID: u8 = 0x01;
pub const REG_SEQ_ID: u8 = 0x02;
pub const REG_INT_CFG: u8 = 0x03;
pub const REG_IRQ_ENABLE: u8 = 0x04;
pub const REG_HW_KEY: u8 = 0x07;
pub const REG_MEAS_RATE: u8 = 0x08;
pub const REG_ALS_RATE: u8 = 0x09;
pub const REG_PS_RATE: u8 = 0x0A;
pub const REG_PS_LED21: u8 = 0x0F;
pub const REG_PS_LED3: u8 = 0x10;
pub const REG_PARAM_WR: u8 = 0x17;
pub const REG_COMMAND: u8 = 0x18;
pub const REG_RESPONSE: u8 = 0x20;
pub const REG_IRQ_STATUS: u8 = 0x21;
pub const REG_ALS_VIS_DATA0: u8 = 0x22;
pub const REG_ALS_IR_DATA0: u8 = 0x24;
pub const REG_PS1_DATA0: u8 = 0x26;
pub const REG_PS2_DATA0: u8 = 0x28;
pub const REG_PS3_DATA0: u8 = 0x2A;
pub const REG_AUX_DATA0: u8 = 0x2C;
pub const REG_PARAM_RD: u8 = 0x2E;
pub const REG_CHIP_STAT: u8 = 0x30;

/// Value that moves the chip out of bootup into standby.
pub const HW_KEY: u8 = 0x17;

/// Parameter RAM addresses.
pub const PARAM_I2C_ADDR: u8 = 0x00;
pub const PARAM_CHLIST: u8 = 0x01;
pub const PARAM_PSLED12_SELECT: u8 = 0x02;
pub const PARAM_PSLED3_SELECT: u8 = 0x03;
pub const PARAM_PS_ENCODING: u8 = 0x05;
pub const PARAM_ALS_ENCODING: u8 = 0x06;

/// CHLIST channel enables.
pub const CHLIST_PS1: u8 = 0x01;
pub const CHLIST_PS2: u8 = 0x02;
pub const CHLIST_PS3: u8 = 0x04;
pub const CHLIST_ALS_VIS: u8 = 0x10;
pub const CHLIST_ALS_IR: u8 = 0x20;
pub const CHLIST_AUX: u8 = 0x40;

/// Five response checks, 10 ms apart.
pub const HANDSHAKE_POLL: PollPolicy = PollPolicy::bounded(Duration::from_millis(10), 5);

const SAMPLE_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PartId {
    #[display(fmt = "Si1141")]
    Si1141,
    #[display(fmt = "Si1142")]
    Si1142,
    #[display(fmt = "Si1143")]
    Si1143,
    #[display(fmt = "Unknown")]
    Unknown(u8),
}

impl From<u8> for PartId {
    fn from(v: u8) -> Self {
        match v {
            0x41 => PartId::Si1141,
            0x42 => PartId::Si1142,
            0x43 => PartId::Si1143,
            other => PartId::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SequencerId {
    #[display(fmt = "Si114x-A01")]
    A01,
    #[display(fmt = "Si114x-A02")]
    A02,
    #[display(fmt = "Si114x-A03")]
    A03,
    #[display(fmt = "Si114x-A10")]
    A10,
    #[display(fmt = "Si114x-A11")]
    A11,
    #[display(fmt = "Unknown")]
    Unknown(u8),
}

impl From<u8> for SequencerId {
    fn from(v: u8) -> Self {
        match v {
            0x01 => SequencerId::A01,
            0x02 => SequencerId::A02,
            0x03 => SequencerId::A03,
            0x08 => SequencerId::A10,
            0x09 => SequencerId::A11,
            other => SequencerId::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Si114xInfo {
    pub part_id: PartId,
    pub revision: u8,
    pub sequencer: SequencerId,
}

/// One set of measurement results, raw ADC counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Sample {
    pub als_visible: u16,
    pub als_ir: u16,
    pub ps1: u16,
    pub ps2: u16,
    pub ps3: u16,
    pub aux: u16,
}

impl Sample {
    /// Decode the twelve data registers starting at ALS_VIS_DATA0.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < SAMPLE_LEN {
            return Err(Error::InvalidLength {
                expected: SAMPLE_LEN,
                actual: data.len(),
            });
        }
        let word = |i: usize| u16::from_le_bytes([data[i], data[i + 1]]);
        Ok(Self {
            als_visible: word(0),
            als_ir: word(2),
            ps1: word(4),
            ps2: word(6),
            ps3: word(8),
            aux: word(10),
        })
    }
}

pub struct Si1143<M> {
    tunnel: RegisterTunnel<M>,
    handshake: PollPolicy,
}

impl<M: I2cMaster> Si1143<M> {
    pub fn new(master: M) -> Self {
        Self::with_address(master, DEFAULT_ADDRESS)
    }

    pub fn with_address(master: M, address: u8) -> Self {
        Self {
            tunnel: RegisterTunnel::new(master, address),
            handshake: HANDSHAKE_POLL,
        }
    }

    /// Bus-busy polling for the underlying tunnel.
    pub fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.tunnel = self.tunnel.with_poll(poll);
        self
    }

    /// Response polling for the command interface.
    pub fn with_handshake(mut self, poll: PollPolicy) -> Self {
        self.handshake = poll;
        self
    }

    pub fn release(self) -> M {
        self.tunnel.release()
    }

    /// Write the hardware key. Required once after power up before any
    /// other register is touched.
    pub fn initialize(&mut self) -> Result<()> {
        self.tunnel.write_u8(REG_HW_KEY, HW_KEY)
    }

    pub fn info(&mut self) -> Result<Si114xInfo> {
        let part_id = PartId::from(self.tunnel.read_u8(REG_PART_ID)?);
        let revision = self.tunnel.read_u8(REG_REV_ID)?;
        let sequencer = SequencerId::from(self.tunnel.read_u8(REG_SEQ_ID)?);
        Ok(Si114xInfo {
            part_id,
            revision,
            sequencer,
        })
    }

    /// Run `cmd` and return the response register after it advanced.
    pub fn command(&mut self, cmd: Command) -> Result<u8> {
        let opcode = cmd.opcode();
        if !cmd.has_response() {
            self.tunnel.write_u8(REG_COMMAND, opcode)?;
            return Ok(0);
        }

        let mut last = self.tunnel.read_u8(REG_RESPONSE)?;
        if last & RESPONSE_ERROR != 0 {
            debug!("si114x response {last:#04x} left over, clearing");
            self.tunnel.write_u8(REG_COMMAND, Command::Nop.opcode())?;
            last = self.tunnel.read_u8(REG_RESPONSE)?;
        }

        self.tunnel.write_u8(REG_COMMAND, opcode)?;

        let tunnel = &mut self.tunnel;
        let mut response = last;
        poll_until(&self.handshake, "si114x response", || {
            response = tunnel.read_u8(REG_RESPONSE)?;
            Ok(response != last)
        })
        .map_err(|e| match e {
            Error::PollLimitExceeded { attempts, .. } => Error::CommandTimeout {
                command: opcode,
                attempts,
            },
            other => other,
        })?;

        if response & RESPONSE_ERROR != 0 {
            return Err(Si114xError::from_response(response).into());
        }
        debug!("si114x command {opcode:#04x} -> {response:#04x}");
        Ok(response)
    }

    pub fn nop(&mut self) -> Result<()> {
        self.command(Command::Nop).map(|_| ())
    }

    /// Software reset. The hardware key has to be written again afterwards.
    pub fn reset(&mut self) -> Result<()> {
        self.command(Command::Reset).map(|_| ())
    }

    pub fn param_query(&mut self, param: u8) -> Result<u8> {
        self.command(Command::ParamQuery(param))?;
        self.tunnel.read_u8(REG_PARAM_RD)
    }

    /// Store `value` in parameter RAM and return what the chip read back.
    pub fn param_set(&mut self, param: u8, value: u8) -> Result<u8> {
        self.tunnel.write_u8(REG_PARAM_WR, value)?;
        self.command(Command::ParamSet(param))?;
        self.tunnel.read_u8(REG_PARAM_RD)
    }

    /// Select which channels a measurement covers (CHLIST_* bits).
    pub fn set_channels(&mut self, chlist: u8) -> Result<()> {
        self.param_set(PARAM_CHLIST, chlist).map(|_| ())
    }

    /// Measurement rate in 31.25 µs ticks, stored compressed.
    pub fn set_measurement_rate(&mut self, ticks: u16) -> Result<()> {
        self.tunnel.write_u8(REG_MEAS_RATE, rate::compress(ticks))
    }

    pub fn measurement_rate(&mut self) -> Result<u16> {
        Ok(rate::uncompress(self.tunnel.read_u8(REG_MEAS_RATE)?))
    }

    pub fn force_measurement(&mut self) -> Result<()> {
        self.command(Command::PsAlsForce).map(|_| ())
    }

    pub fn start_autonomous(&mut self) -> Result<()> {
        self.command(Command::PsAlsAuto).map(|_| ())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.command(Command::PsAlsPause).map(|_| ())
    }

    pub fn read_sample(&mut self) -> Result<Sample> {
        let data = self.tunnel.read_register(REG_ALS_VIS_DATA0, SAMPLE_LEN)?;
        Sample::decode(&data)
    }

    /// Raw PS1 count, the periodic sample fed to pulse estimation.
    pub fn read_ps1(&mut self) -> Result<u16> {
        let b = self.tunnel.read_register(REG_PS1_DATA0, 2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }
}
