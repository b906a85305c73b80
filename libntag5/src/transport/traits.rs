// libntag5/src/transport/traits.rs

use crate::constants::SW_SUCCESS;
use crate::{Error, Result};

/// Response APDU split into its data field and status word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseApdu {
    pub data: Vec<u8>,
    pub sw1: u8,
    pub sw2: u8,
}

impl ResponseApdu {
    /// Split a raw reader response. The last two bytes are the status word.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        if raw.len() < 2 {
            return Err(Error::InvalidLength {
                expected: 2,
                actual: raw.len(),
            });
        }
        let (data, sw) = raw.split_at(raw.len() - 2);
        Ok(Self {
            data: data.to_vec(),
            sw1: sw[0],
            sw2: sw[1],
        })
    }

    pub fn is_success(&self) -> bool {
        [self.sw1, self.sw2] == SW_SUCCESS
    }

    /// Return the data field, or `ReaderStatus` for any status word other
    /// than 90 00.
    pub fn into_data(self) -> Result<Vec<u8>> {
        if !self.is_success() {
            return Err(Error::ReaderStatus {
                sw1: self.sw1,
                sw2: self.sw2,
            });
        }
        Ok(self.data)
    }
}

/// Transport trait abstracts the reader link away from protocol logic.
///
/// One transport owns one physical reader slot; callers never share it.
pub trait Transport {
    /// Power up the card in the reader slot and return its ATR.
    fn connect(&mut self) -> Result<Vec<u8>>;

    /// Power down the card.
    fn disconnect(&mut self) -> Result<()>;

    /// Send a command APDU and return the raw response including the
    /// trailing two-byte status word.
    fn transmit(&mut self, apdu: &[u8]) -> Result<Vec<u8>>;

    /// Send a command APDU and return its data field, treating any status
    /// word other than 90 00 as a hard failure.
    fn transmit_checked(&mut self, apdu: &[u8]) -> Result<Vec<u8>> {
        let raw = self.transmit(apdu)?;
        ResponseApdu::parse(&raw)?.into_data()
    }

    /// Human readable reader name for logs.
    fn name(&self) -> String {
        String::from("unnamed reader")
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&mut self) -> Result<Vec<u8>> {
        (**self).connect()
    }

    fn disconnect(&mut self) -> Result<()> {
        (**self).disconnect()
    }

    fn transmit(&mut self, apdu: &[u8]) -> Result<Vec<u8>> {
        (**self).transmit(apdu)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}
