// libntag5/src/lib.rs

//! libntag5
//!
//! Pure Rust access to NXP NTAG 5 Link tags through a transparent-session
//! contactless reader, and to the I2C sensors wired behind the tag.
//!
//! Layers, bottom up: [`transport`] (reader APDUs), [`bridge`] (transparent
//! exchange records), [`protocol`] (ISO/IEC 15693), [`tag`] (NXP custom
//! commands), [`tunnel`] (I2C register access) and [`sensor`].

pub mod bridge;
pub mod constants;
pub mod error;
pub mod prelude;
pub mod protocol;
pub mod sensor;
pub mod tag;
#[doc(hidden)]
pub mod test_support;
pub mod transport;
pub mod tunnel;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
