// libntag5/src/transport/mod.rs

pub mod ccid;
pub mod mock;
pub mod traits;
#[cfg(feature = "usb")]
pub mod usb;

pub use mock::MockTransport;
pub use traits::{ResponseApdu, Transport};
#[cfg(feature = "usb")]
pub use usb::{list_readers, ReaderInfo, UsbTransport};
