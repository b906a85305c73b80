//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize the bridge responses a reader would send, the
//! MockTransport session setup, and a simulated I2C bus so tests across the
//! crate and tests/ directory can reuse the same logic.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::bridge::{Bridge, TaggedRecord, tlv};
use crate::constants::*;
use crate::protocol::Iso15693;
use crate::tag::{I2cResult, I2cStatus, Ntag5Link};
use crate::transport::MockTransport;
use crate::tunnel::{GENERAL_CALL_ADDRESS, GENERAL_CALL_RESET, I2cMaster};
use crate::Result;

fn with_sw(mut body: Vec<u8>) -> Vec<u8> {
    body.extend_from_slice(&SW_SUCCESS);
    body
}

/// Bridge answer that only carries a successful error-status record.
#[doc(hidden)]
pub fn bridge_ok() -> Vec<u8> {
    bridge_status(0x00, 0x90, 0x00)
}

/// Bridge answer whose error-status record names `object` and status
/// `sw1 sw2`.
#[doc(hidden)]
pub fn bridge_status(object: u8, sw1: u8, sw2: u8) -> Vec<u8> {
    let mut out = Vec::new();
    // encoding three bytes cannot fail
    let _ = TaggedRecord::new(TAG_ERROR_STATUS, vec![object, sw1, sw2]).encode_into(&mut out);
    with_sw(out)
}

/// Exchange answer with explicit status and framing bytes.
#[doc(hidden)]
pub fn rf_response(status: u8, framing: u8, data: &[u8]) -> Vec<u8> {
    let records = [
        TaggedRecord::new(TAG_ERROR_STATUS, vec![0x00, 0x90, 0x00]),
        TaggedRecord::new(TAG_RESP_STATUS, vec![status, 0x00]),
        TaggedRecord::new(TAG_RESP_FRAMING, vec![framing]),
        TaggedRecord::new(TAG_RESP_DATA, data.to_vec()),
    ];
    with_sw(tlv::encode(&records).unwrap_or_default())
}

/// Clean exchange answer carrying `data` (response flags byte included).
#[doc(hidden)]
pub fn rf_ok(data: &[u8]) -> Vec<u8> {
    rf_response(0x00, 0x00, data)
}

/// Open a vicinity session over a fresh MockTransport. The returned mock
/// shares state with the one inside the session.
#[doc(hidden)]
pub fn open_mock_session() -> (Iso15693, MockTransport) {
    let mut mock = MockTransport::new();
    mock.push_responses([bridge_ok(), bridge_ok()]);
    let bridge = Bridge::new(Box::new(mock.clone()));
    match bridge.open() {
        Ok(open) => (Iso15693::new(open), mock),
        Err(e) => panic!("mock session failed to open: {e}"),
    }
}

#[doc(hidden)]
pub fn open_mock_tag() -> (Ntag5Link, MockTransport) {
    let (iso, mock) = open_mock_session();
    (Ntag5Link::new(iso), mock)
}

/// Something the simulated bus saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    Status { busy: bool },
    Write { address: u8, bytes: Vec<u8> },
    Read { address: u8, len: u16 },
    Buffer { pages: u16 },
    Reset,
}

/// How the simulated peripheral lays out its registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterLayout {
    /// 16-bit registers, MSB first, no auto increment (TMP1xx style).
    Word,
    /// Byte memory with pointer auto increment (Si114x style).
    Byte,
}

/// Simulated peripheral behind the tag's I2C master.
///
/// Transactions complete instantly. Busy polls, forced results, scripted
/// register reads and reset values let tests drive the unhappy paths.
#[derive(Debug)]
pub struct MockI2cBus {
    device: u8,
    layout: RegisterLayout,
    words: BTreeMap<u8, u16>,
    bytes: [u8; 256],
    reset_values: BTreeMap<u8, u16>,
    scripted: HashMap<u8, VecDeque<Vec<u8>>>,
    pointer: u8,
    buffer: Vec<u8>,
    busy_polls: u32,
    result: I2cResult,
    forced: Option<I2cResult>,
    watchdog: bool,
    resets: usize,
    events: Vec<BusEvent>,
}

impl MockI2cBus {
    /// Word-register peripheral at `device`.
    pub fn new(device: u8) -> Self {
        Self::with_layout(device, RegisterLayout::Word)
    }

    pub fn with_layout(device: u8, layout: RegisterLayout) -> Self {
        Self {
            device,
            layout,
            words: BTreeMap::new(),
            bytes: [0u8; 256],
            reset_values: BTreeMap::new(),
            scripted: HashMap::new(),
            pointer: 0,
            buffer: Vec::new(),
            busy_polls: 0,
            result: I2cResult::Reset,
            forced: None,
            watchdog: false,
            resets: 0,
            events: Vec::new(),
        }
    }

    /// Report busy for the next `n` status reads. `u32::MAX` never clears.
    pub fn set_busy_polls(&mut self, n: u32) {
        self.busy_polls = n;
    }

    /// Every following transaction ends with `result`.
    pub fn force_result(&mut self, result: I2cResult) {
        self.forced = Some(result);
    }

    pub fn force_watchdog(&mut self) {
        self.watchdog = true;
    }

    pub fn set_register(&mut self, reg: u8, value: u16) {
        self.words.insert(reg, value);
    }

    pub fn register(&self, reg: u8) -> Option<u16> {
        self.words.get(&reg).copied()
    }

    pub fn set_byte(&mut self, reg: u8, value: u8) {
        self.bytes[reg as usize] = value;
    }

    pub fn byte(&self, reg: u8) -> u8 {
        self.bytes[reg as usize]
    }

    /// Value a word register falls back to on general call reset.
    pub fn set_reset_value(&mut self, reg: u8, value: u16) {
        self.reset_values.insert(reg, value);
    }

    /// Queue raw bytes returned by the next read starting at `reg`, ahead
    /// of the stored register contents.
    pub fn push_read(&mut self, reg: u8, bytes: &[u8]) {
        self.scripted.entry(reg).or_default().push_back(bytes.to_vec());
    }

    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    /// Payloads written to the peripheral, general calls excluded.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                BusEvent::Write { address, bytes } if *address == self.device => {
                    Some(bytes.clone())
                }
                _ => None,
            })
            .collect()
    }

    pub fn resets(&self) -> usize {
        self.resets
    }

    fn finish(&mut self, acked: bool) {
        self.result = match self.forced {
            Some(r) => r,
            None if acked => I2cResult::Success,
            None => I2cResult::AddressNak,
        };
    }

    fn acked(&self) -> bool {
        matches!(self.forced, None | Some(I2cResult::Success))
    }

    fn store(&mut self, bytes: &[u8]) {
        let Some((&reg, data)) = bytes.split_first() else {
            return;
        };
        self.pointer = reg;
        match self.layout {
            RegisterLayout::Word => {
                for (i, pair) in data.chunks_exact(2).enumerate() {
                    let r = reg.wrapping_add(i as u8);
                    self.words.insert(r, u16::from_be_bytes([pair[0], pair[1]]));
                }
            }
            RegisterLayout::Byte => {
                for (i, b) in data.iter().enumerate() {
                    self.bytes[reg.wrapping_add(i as u8) as usize] = *b;
                }
            }
        }
    }

    fn load(&mut self, len: usize) -> Vec<u8> {
        let reg = self.pointer;
        if let Some(bytes) = self.scripted.get_mut(&reg).and_then(VecDeque::pop_front) {
            let mut bytes = bytes;
            bytes.resize(len, 0);
            return bytes;
        }
        let mut out = Vec::with_capacity(len);
        match self.layout {
            RegisterLayout::Word => {
                let mut r = reg;
                while out.len() < len {
                    let v = self.words.get(&r).copied().unwrap_or(0);
                    out.extend_from_slice(&v.to_be_bytes());
                    r = r.wrapping_add(1);
                }
                out.truncate(len);
            }
            RegisterLayout::Byte => {
                for i in 0..len {
                    out.push(self.bytes[reg.wrapping_add(i as u8) as usize]);
                }
            }
        }
        out
    }

    fn general_call(&mut self) {
        self.resets += 1;
        self.events.push(BusEvent::Reset);
        let values: Vec<(u8, u16)> = self.reset_values.iter().map(|(k, v)| (*k, *v)).collect();
        for (reg, value) in values {
            self.words.insert(reg, value);
        }
    }
}

impl I2cMaster for MockI2cBus {
    fn i2c_write(&mut self, address: u8, data: &[u8], _stop: bool) -> Result<()> {
        self.events.push(BusEvent::Write {
            address,
            bytes: data.to_vec(),
        });
        let acked = self.acked();
        if address == GENERAL_CALL_ADDRESS && data == [GENERAL_CALL_RESET] {
            if acked {
                self.general_call();
            }
            self.finish(acked);
        } else if address == self.device {
            if acked {
                self.store(data);
            }
            self.finish(acked);
        } else {
            self.finish(false);
        }
        Ok(())
    }

    fn i2c_read(&mut self, address: u8, len: u16, _stop: bool) -> Result<()> {
        self.events.push(BusEvent::Read { address, len });
        let acked = address == self.device && self.acked();
        self.buffer = if acked { self.load(len as usize) } else { Vec::new() };
        self.finish(acked);
        Ok(())
    }

    fn read_buffer(&mut self, _address: u8, pages: u16) -> Result<Vec<u8>> {
        self.events.push(BusEvent::Buffer { pages });
        let mut out = self.buffer.clone();
        out.resize(pages as usize * 4, 0);
        Ok(out)
    }

    fn i2c_status(&mut self) -> Result<I2cStatus> {
        let busy = if self.busy_polls > 0 {
            // u32::MAX means "forever"
            if self.busy_polls != u32::MAX {
                self.busy_polls -= 1;
            }
            true
        } else {
            false
        };
        self.events.push(BusEvent::Status { busy });
        Ok(I2cStatus {
            busy,
            result: self.result,
            watchdog_expired: self.watchdog,
        })
    }
}
