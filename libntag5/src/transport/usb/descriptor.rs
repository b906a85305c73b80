// libntag5/src/transport/usb/descriptor.rs

use rusb::{Device, Direction, TransferType};

/// USB interface class for smart card readers (CCID).
pub const CLASS_SMART_CARD: u8 = 0x0B;

/// Bulk endpoints of the first smart-card class interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CcidEndpoints {
    pub interface: u8,
    pub bulk_in: u8,
    pub bulk_out: u8,
}

/// Inspect the active configuration and return the bulk pair of the first
/// CCID interface, if the device has one.
pub fn find_ccid_endpoints<C: rusb::UsbContext>(device: &Device<C>) -> Option<CcidEndpoints> {
    let config = device.active_config_descriptor().ok()?;

    for interface in config.interfaces() {
        for desc in interface.descriptors() {
            if desc.class_code() != CLASS_SMART_CARD {
                continue;
            }
            let mut bulk_in = None;
            let mut bulk_out = None;
            for ep in desc.endpoint_descriptors() {
                if ep.transfer_type() != TransferType::Bulk {
                    continue;
                }
                match ep.direction() {
                    Direction::In if bulk_in.is_none() => bulk_in = Some(ep.address()),
                    Direction::Out if bulk_out.is_none() => bulk_out = Some(ep.address()),
                    _ => {}
                }
            }
            if let (Some(bulk_in), Some(bulk_out)) = (bulk_in, bulk_out) {
                return Some(CcidEndpoints {
                    interface: desc.interface_number(),
                    bulk_in,
                    bulk_out,
                });
            }
        }
    }
    None
}
