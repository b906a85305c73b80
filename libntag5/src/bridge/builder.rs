// libntag5/src/bridge/builder.rs

use std::time::Duration;

use crate::bridge::{Bridge, Closed};
use crate::transport::Transport;
use crate::{Error, Result};

/// Largest frame waiting time integer the reader accepts.
pub const MAX_FWTI: u8 = 15;

/// Parameters attached to every transparent exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeConfig {
    /// Reader-side timeout in microseconds.
    pub timeout_us: u32,
    /// Frame waiting time integer. FWT = 302.07 µs × 2^FWTI.
    pub fwti: u8,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            timeout_us: 1_000_000,
            fwti: MAX_FWTI,
        }
    }
}

impl ExchangeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.fwti > MAX_FWTI {
            return Err(Error::InvalidArgument(format!(
                "fwti must be 0..={MAX_FWTI}, got {}",
                self.fwti
            )));
        }
        Ok(())
    }
}

/// Helper to construct a Bridge with optional configuration.
#[derive(Default)]
pub struct BridgeBuilder {
    transport: Option<Box<dyn Transport>>,
    config: ExchangeConfig,
}

impl BridgeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide an already-created transport instance (e.g. MockTransport)
    pub fn with_transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Reader-side exchange timeout. Saturates at u32::MAX microseconds.
    pub fn exchange_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_us = u32::try_from(timeout.as_micros()).unwrap_or(u32::MAX);
        self
    }

    pub fn fwti(mut self, fwti: u8) -> Self {
        self.config.fwti = fwti;
        self
    }

    /// Consume the builder and return a closed Bridge.
    /// Requires a transport to be provided; otherwise returns ReaderNotFound.
    pub fn build(self) -> Result<Bridge<Closed>> {
        self.config.validate()?;
        match self.transport {
            Some(t) => Ok(Bridge::with_config(t, self.config)),
            None => Err(Error::ReaderNotFound),
        }
    }
}
