// libntag5/src/transport/mock.rs

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::transport::traits::Transport;
use crate::{Error, Result};

#[derive(Debug, Default)]
struct MockState {
    sent: Vec<Vec<u8>>,
    responses: VecDeque<Vec<u8>>,
    atr: Vec<u8>,
    connected: bool,
    connects: usize,
    disconnects: usize,
}

/// Mock transport for unit tests. It records sent APDUs and returns queued
/// raw responses (status word included).
///
/// Clones share the same state, so a test can keep one clone as a probe
/// after boxing the other into a bridge.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Rc<RefCell<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        let mock = Self::default();
        mock.state.borrow_mut().atr = vec![0x3B, 0x8F, 0x80, 0x01];
        mock
    }

    pub fn push_response(&mut self, resp: Vec<u8>) {
        self.state.borrow_mut().responses.push_back(resp);
    }

    /// Queue several responses in order.
    pub fn push_responses<I: IntoIterator<Item = Vec<u8>>>(&mut self, responses: I) {
        let mut state = self.state.borrow_mut();
        state.responses.extend(responses);
    }

    /// Every APDU transmitted so far, oldest first.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.state.borrow().sent.clone()
    }

    pub fn last_sent(&self) -> Option<Vec<u8>> {
        self.state.borrow().sent.last().cloned()
    }

    pub fn pending_responses(&self) -> usize {
        self.state.borrow().responses.len()
    }

    pub fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    /// (connect count, disconnect count)
    pub fn lifecycle_counts(&self) -> (usize, usize) {
        let s = self.state.borrow();
        (s.connects, s.disconnects)
    }
}

impl Transport for MockTransport {
    fn connect(&mut self) -> Result<Vec<u8>> {
        let mut s = self.state.borrow_mut();
        s.connected = true;
        s.connects += 1;
        Ok(s.atr.clone())
    }

    fn disconnect(&mut self) -> Result<()> {
        let mut s = self.state.borrow_mut();
        s.connected = false;
        s.disconnects += 1;
        Ok(())
    }

    fn transmit(&mut self, apdu: &[u8]) -> Result<Vec<u8>> {
        let mut s = self.state.borrow_mut();
        if !s.connected {
            return Err(Error::CardAbsent);
        }
        s.sent.push(apdu.to_vec());
        s.responses.pop_front().ok_or(Error::Timeout)
    }

    fn name(&self) -> String {
        String::from("mock reader")
    }
}
