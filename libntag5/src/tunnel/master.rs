// libntag5/src/tunnel/master.rs

use crate::tag::{I2cStatus, Ntag5Link};
use crate::Result;

/// I2C bus master primitives a register tunnel is built on.
///
/// [`Ntag5Link`] provides them through its pass-through commands; tests
/// substitute a simulated bus.
pub trait I2cMaster {
    fn i2c_write(&mut self, address: u8, data: &[u8], stop: bool) -> Result<()>;

    /// Start a read. The bytes are collected afterwards with
    /// [`read_buffer`](Self::read_buffer).
    fn i2c_read(&mut self, address: u8, len: u16, stop: bool) -> Result<()>;

    fn read_buffer(&mut self, address: u8, pages: u16) -> Result<Vec<u8>>;

    fn i2c_status(&mut self) -> Result<I2cStatus>;
}

impl I2cMaster for Ntag5Link {
    fn i2c_write(&mut self, address: u8, data: &[u8], stop: bool) -> Result<()> {
        Ntag5Link::i2c_write(self, address, data, stop)
    }

    fn i2c_read(&mut self, address: u8, len: u16, stop: bool) -> Result<()> {
        Ntag5Link::i2c_read(self, address, len, stop)
    }

    fn read_buffer(&mut self, address: u8, pages: u16) -> Result<Vec<u8>> {
        Ntag5Link::read_buffer(self, address, pages)
    }

    fn i2c_status(&mut self) -> Result<I2cStatus> {
        Ntag5Link::i2c_status(self)
    }
}

impl<M: I2cMaster + ?Sized> I2cMaster for &mut M {
    fn i2c_write(&mut self, address: u8, data: &[u8], stop: bool) -> Result<()> {
        (**self).i2c_write(address, data, stop)
    }

    fn i2c_read(&mut self, address: u8, len: u16, stop: bool) -> Result<()> {
        (**self).i2c_read(address, len, stop)
    }

    fn read_buffer(&mut self, address: u8, pages: u16) -> Result<Vec<u8>> {
        (**self).read_buffer(address, pages)
    }

    fn i2c_status(&mut self) -> Result<I2cStatus> {
        (**self).i2c_status()
    }
}
