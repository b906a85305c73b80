//! Utilities for libntag5: small helpers shared by every layer.
//!
//! Hex formatting for frame traces, and the busy-wait polling policy used
//! wherever the tag or a peripheral asks us to come back later.

pub mod hex;
pub mod poll;

pub use hex::*;
pub use poll::*;
