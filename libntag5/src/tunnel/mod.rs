// libntag5/src/tunnel/mod.rs

//! Register access to a peripheral behind the tag's I2C master.
//!
//! Every transaction runs the same sequence: wait for the bus to go idle,
//! write the register address (and data), wait again and require an
//! acknowledged result, then for reads collect the bytes from the SRAM
//! mailbox.

pub mod master;

pub use master::I2cMaster;

use log::{debug, info};

use crate::tag::{I2cResult, I2cStatus, SRAM_START};
use crate::utils::{bytes_to_hex, poll_until, PollPolicy};
use crate::{Error, Result};

/// General call address.
pub const GENERAL_CALL_ADDRESS: u8 = 0x00;
/// General call reset opcode.
pub const GENERAL_CALL_RESET: u8 = 0x06;

const PAGE: usize = 4;

/// One peripheral on the tunnelled bus.
pub struct RegisterTunnel<M> {
    master: M,
    address: u8,
    poll: PollPolicy,
}

impl<M: I2cMaster> RegisterTunnel<M> {
    pub fn new(master: M, address: u8) -> Self {
        Self {
            master,
            address,
            poll: PollPolicy::default(),
        }
    }

    /// Bound the bus-busy wait.
    pub fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.poll
    }

    pub fn master_mut(&mut self) -> &mut M {
        &mut self.master
    }

    /// Give the bus master back.
    pub fn release(self) -> M {
        self.master
    }

    /// Block until the master reports an idle bus and return that status.
    pub fn wait_idle(&mut self) -> Result<I2cStatus> {
        let mut last = None;
        let master = &mut self.master;
        poll_until(&self.poll, "i2c bus", || {
            let status = master.i2c_status()?;
            last = Some(status);
            Ok(!status.busy)
        })?;
        last.ok_or(Error::Timeout)
    }

    fn check_ack(&mut self) -> Result<()> {
        let status = self.wait_idle()?;
        if status.watchdog_expired {
            return Err(Error::I2cWatchdogExpired);
        }
        match status.result {
            I2cResult::Success => Ok(()),
            other => Err(Error::NotAcknowledged(other)),
        }
    }

    fn write_to(&mut self, address: u8, bytes: &[u8]) -> Result<()> {
        self.wait_idle()?;
        debug!("i2c {address:#04x} << {}", bytes_to_hex(bytes));
        self.master.i2c_write(address, bytes, true)?;
        self.check_ack()
    }

    /// Write `data` starting at register `reg`.
    pub fn write_register(&mut self, reg: u8, data: &[u8]) -> Result<()> {
        let mut bytes = Vec::with_capacity(data.len() + 1);
        bytes.push(reg);
        bytes.extend_from_slice(data);
        self.write_to(self.address, &bytes)
    }

    /// Read `len` bytes starting at register `reg`.
    pub fn read_register(&mut self, reg: u8, len: usize) -> Result<Vec<u8>> {
        if len == 0 {
            return Err(Error::InvalidArgument("must read at least one byte".into()));
        }
        let n = u16::try_from(len)
            .map_err(|_| Error::InvalidArgument(format!("register read too long: {len}")))?;
        self.write_to(self.address, &[reg])?;
        self.master.i2c_read(self.address, n, true)?;
        self.check_ack()?;

        let pages = len.div_ceil(PAGE) as u16;
        let mut data = self.master.read_buffer(SRAM_START, pages)?;
        if data.len() < len {
            return Err(Error::InvalidLength {
                expected: len,
                actual: data.len(),
            });
        }
        data.truncate(len);
        debug!("i2c {:#04x} reg {reg:#04x} >> {}", self.address, bytes_to_hex(&data));
        Ok(data)
    }

    pub fn read_u8(&mut self, reg: u8) -> Result<u8> {
        Ok(self.read_register(reg, 1)?[0])
    }

    pub fn write_u8(&mut self, reg: u8, value: u8) -> Result<()> {
        self.write_register(reg, &[value])
    }

    /// 16-bit register, most significant byte first.
    pub fn read_u16_be(&mut self, reg: u8) -> Result<u16> {
        let b = self.read_register(reg, 2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn write_u16_be(&mut self, reg: u8, value: u16) -> Result<()> {
        self.write_register(reg, &value.to_be_bytes())
    }

    /// Broadcast a general call reset. Every device on the bus that
    /// honours it reloads its power-on state.
    pub fn general_reset(&mut self) -> Result<()> {
        self.write_to(GENERAL_CALL_ADDRESS, &[GENERAL_CALL_RESET])?;
        info!("general call reset sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{BusEvent, MockI2cBus};
    use std::time::Duration;

    const DEV: u8 = 0x48;

    fn tunnel(bus: &mut MockI2cBus) -> RegisterTunnel<&mut MockI2cBus> {
        RegisterTunnel::new(bus, DEV).with_poll(PollPolicy::bounded(Duration::ZERO, 10))
    }

    #[test]
    fn write_waits_for_idle_first() {
        let mut bus = MockI2cBus::new(DEV);
        bus.set_busy_polls(2);
        tunnel(&mut bus).write_register(0x01, &[0x02, 0x20]).unwrap();

        let events = bus.events();
        let first_write = events
            .iter()
            .position(|e| matches!(e, BusEvent::Write { .. }))
            .unwrap();
        let busy_before = events[..first_write]
            .iter()
            .filter(|e| matches!(e, BusEvent::Status { busy: true }))
            .count();
        assert_eq!(busy_before, 2);
        assert!(matches!(events[first_write - 1], BusEvent::Status { busy: false }));
        assert_eq!(bus.register(0x01), Some(0x0220));
    }

    #[test]
    fn nak_fails_without_reading() {
        let mut bus = MockI2cBus::new(DEV);
        bus.force_result(I2cResult::AddressNak);
        let err = tunnel(&mut bus).read_register(0x00, 2).unwrap_err();
        assert!(matches!(err, Error::NotAcknowledged(I2cResult::AddressNak)));
        assert!(!bus
            .events()
            .iter()
            .any(|e| matches!(e, BusEvent::Read { .. } | BusEvent::Buffer { .. })));
    }

    #[test]
    fn data_nak_reported() {
        let mut bus = MockI2cBus::new(DEV);
        bus.force_result(I2cResult::DataNak);
        assert!(matches!(
            tunnel(&mut bus).write_register(0x01, &[0, 0]),
            Err(Error::NotAcknowledged(I2cResult::DataNak))
        ));
    }

    #[test]
    fn watchdog_reported() {
        let mut bus = MockI2cBus::new(DEV);
        bus.force_watchdog();
        assert!(matches!(
            tunnel(&mut bus).write_u8(0x01, 0),
            Err(Error::I2cWatchdogExpired)
        ));
    }

    #[test]
    fn read_uses_whole_pages_and_truncates() {
        let mut bus = MockI2cBus::new(DEV);
        bus.set_register(0x0F, 0x2117);
        let mut t = tunnel(&mut bus);
        assert_eq!(t.read_u16_be(0x0F).unwrap(), 0x2117);
        drop(t);
        assert!(bus
            .events()
            .iter()
            .any(|e| matches!(e, BusEvent::Buffer { pages: 1 })));
    }

    #[test]
    fn busy_bus_poll_is_bounded() {
        let mut bus = MockI2cBus::new(DEV);
        bus.set_busy_polls(u32::MAX);
        let mut t = RegisterTunnel::new(&mut bus, DEV)
            .with_poll(PollPolicy::bounded(Duration::ZERO, 3));
        assert!(matches!(
            t.write_u8(0x01, 0),
            Err(Error::PollLimitExceeded { what: "i2c bus", attempts: 3 })
        ));
    }

    #[test]
    fn general_reset_targets_broadcast_address() {
        let mut bus = MockI2cBus::new(DEV);
        tunnel(&mut bus).general_reset().unwrap();
        assert!(bus.events().iter().any(|e| matches!(
            e,
            BusEvent::Write { address: 0x00, bytes } if bytes == &vec![0x06]
        )));
        assert_eq!(bus.resets(), 1);
    }

    #[test]
    fn zero_length_read_rejected() {
        let mut bus = MockI2cBus::new(DEV);
        assert!(tunnel(&mut bus).read_register(0x00, 0).is_err());
        assert!(bus.events().is_empty());
    }
}
