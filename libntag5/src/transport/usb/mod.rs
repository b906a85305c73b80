// libntag5/src/transport/usb/mod.rs

#![cfg(feature = "usb")]

use std::time::Duration;

use log::{debug, info, warn};
use rusb::{Context, Device, DeviceHandle, UsbContext};

use crate::transport::ccid::{self, ReaderMessage};
use crate::transport::traits::Transport;
use crate::utils::trace_frame;
use crate::{Error, Result};

mod descriptor;
use descriptor::{find_ccid_endpoints, CcidEndpoints};

/// Advanced Card Systems vendor id.
pub const ACS_VENDOR_ID: u16 = 0x072F;

const DEFAULT_TIMEOUT_MS: u64 = 2000;
/// Upper bound on consecutive time-extension requests for one exchange.
const MAX_TIME_EXTENSIONS: usize = 64;
const MAX_MESSAGE_LEN: usize = ccid::HEADER_LEN + 65_538;

/// Reader visible on the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderInfo {
    pub bus: u8,
    pub address: u8,
    pub product_id: u16,
    pub name: String,
}

/// List every ACS reader exposing a CCID interface.
pub fn list_readers() -> Result<Vec<ReaderInfo>> {
    let ctx = Context::new()?;
    let mut out = Vec::new();
    for device in ctx.devices()?.iter() {
        let dd = device.device_descriptor()?;
        if dd.vendor_id() != ACS_VENDOR_ID || find_ccid_endpoints(&device).is_none() {
            continue;
        }
        let name = device
            .open()
            .and_then(|h| h.read_product_string_ascii(&dd))
            .unwrap_or_else(|_| format!("ACS reader {:04x}", dd.product_id()));
        out.push(ReaderInfo {
            bus: device.bus_number(),
            address: device.address(),
            product_id: dd.product_id(),
            name,
        });
    }
    Ok(out)
}

/// CCID reader reached directly over USB bulk endpoints.
pub struct UsbTransport {
    handle: DeviceHandle<Context>,
    endpoints: CcidEndpoints,
    name: String,
    slot: u8,
    seq: u8,
    timeout: Duration,
}

impl UsbTransport {
    /// Open the first ACS CCID reader found on the bus.
    pub fn open() -> Result<Self> {
        let ctx = Context::new()?;
        for device in ctx.devices()?.iter() {
            let dd = device.device_descriptor()?;
            if dd.vendor_id() != ACS_VENDOR_ID {
                continue;
            }
            if let Some(endpoints) = find_ccid_endpoints(&device) {
                let name = format!("ACS {:04x} ({}:{})", dd.product_id(), device.bus_number(), device.address());
                return Self::claim(device, endpoints, name);
            }
        }
        Err(Error::ReaderNotFound)
    }

    fn claim(device: Device<Context>, endpoints: CcidEndpoints, name: String) -> Result<Self> {
        let mut handle = device.open()?;
        // pcscd or the kernel may own the interface already
        if let Ok(true) = handle.kernel_driver_active(endpoints.interface) {
            let _ = handle.detach_kernel_driver(endpoints.interface);
        }
        handle.claim_interface(endpoints.interface)?;
        info!("opened {name}");
        Ok(Self {
            handle,
            endpoints,
            name,
            slot: 0,
            seq: 0,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn next_seq(&mut self) -> u8 {
        let s = self.seq;
        self.seq = self.seq.wrapping_add(1);
        s
    }

    fn write_message(&mut self, msg: &[u8]) -> Result<()> {
        trace_frame("ccid", ">>", msg);
        let n = self
            .handle
            .write_bulk(self.endpoints.bulk_out, msg, self.timeout)?;
        if n != msg.len() {
            return Err(Error::Ccid(format!("short write: {n} of {}", msg.len())));
        }
        Ok(())
    }

    fn read_message(&mut self) -> Result<ReaderMessage> {
        let mut buf = vec![0u8; MAX_MESSAGE_LEN];
        let n = self
            .handle
            .read_bulk(self.endpoints.bulk_in, &mut buf, self.timeout)?;
        buf.truncate(n);
        trace_frame("ccid", "<<", &buf);
        ReaderMessage::decode(&buf)
    }

    /// Send one message and wait for its answer, skipping time-extension
    /// notifications from the reader.
    fn roundtrip(&mut self, msg: Vec<u8>, seq: u8, reply: u8) -> Result<ReaderMessage> {
        self.write_message(&msg)?;
        for _ in 0..MAX_TIME_EXTENSIONS {
            let m = self.read_message()?;
            if m.is_time_extension() {
                debug!("reader requested time extension (bwi {})", m.error);
                continue;
            }
            return m.expect(reply, seq);
        }
        warn!("{}: too many time extensions", self.name);
        Err(Error::Timeout)
    }
}

impl Transport for UsbTransport {
    fn connect(&mut self) -> Result<Vec<u8>> {
        let seq = self.next_seq();
        let msg = ccid::power_on(self.slot, seq);
        let resp = self.roundtrip(msg, seq, ccid::RDR_TO_PC_DATA_BLOCK)?;
        Ok(resp.payload)
    }

    fn disconnect(&mut self) -> Result<()> {
        let seq = self.next_seq();
        let msg = ccid::power_off(self.slot, seq);
        self.roundtrip(msg, seq, ccid::RDR_TO_PC_SLOT_STATUS)?;
        Ok(())
    }

    fn transmit(&mut self, apdu: &[u8]) -> Result<Vec<u8>> {
        let seq = self.next_seq();
        let msg = ccid::xfr_block(self.slot, seq, apdu);
        let resp = self.roundtrip(msg, seq, ccid::RDR_TO_PC_DATA_BLOCK)?;
        Ok(resp.payload)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

impl UsbTransport {
    /// Query whether a card is in the field without powering it.
    pub fn card_present(&mut self) -> Result<bool> {
        let seq = self.next_seq();
        let msg = ccid::get_slot_status(self.slot, seq);
        self.write_message(&msg)?;
        let m = self.read_message()?;
        Ok(m.icc != ccid::IccStatus::Absent)
    }
}

impl Drop for UsbTransport {
    fn drop(&mut self) {
        let _ = self.handle.release_interface(self.endpoints.interface);
    }
}
