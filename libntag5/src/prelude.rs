// libntag5/src/prelude.rs

pub use crate::bridge::{Bridge, BridgeBuilder, Closed, ExchangeConfig, Open};
pub use crate::protocol::{ExtendedSystemInfo, Iso15693, SystemInfo};
pub use crate::sensor::{Si1143, Tmp112, Tmp117};
pub use crate::tag::{ConfigInfo, EnergyConfig, I2cResult, I2cStatus, Ntag5Link, NxpInfo};
pub use crate::transport::Transport;
pub use crate::tunnel::{I2cMaster, RegisterTunnel};
pub use crate::{Block, ConfigPage, Error, Reading, Result, Uid};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced, ms, PollPolicy};
