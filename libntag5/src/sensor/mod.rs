// libntag5/src/sensor/mod.rs

//! Drivers for the peripherals wired to the tag's I2C master.
//!
//! Each driver owns a [`RegisterTunnel`](crate::tunnel::RegisterTunnel)
//! and only adds its register map and decode tables on top.

pub mod si1143;
pub mod tmp112;
pub mod tmp117;

pub use si1143::Si1143;
pub use tmp112::Tmp112;
pub use tmp117::Tmp117;
