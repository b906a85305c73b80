// fixtures.rs — provides commonly used card payloads and frame helpers

use libntag5::bridge::tlv;
use libntag5::constants::TAG_CMD_DATA;
use libntag5::test_support::rf_ok;

/// UID as it travels over the air (least significant byte first).
pub fn sample_uid_wire() -> [u8; 8] {
    [0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x04, 0xE0]
}

/// Get System Information response, flags byte included: 16 blocks of
/// 4 bytes, DSFID 1, AFI 0, IC reference 2.
pub fn system_info_response() -> Vec<u8> {
    let mut v = vec![0x00, 0x0F];
    v.extend_from_slice(&sample_uid_wire());
    v.extend_from_slice(&[0x01, 0x00, 0x0F, 0x03, 0x02]);
    v
}

/// I2C master status page: idle, last transaction acknowledged.
pub fn i2c_idle() -> Vec<u8> {
    rf_ok(&[0x00, 0x06, 0x00, 0x00, 0x00])
}

pub fn i2c_busy() -> Vec<u8> {
    rf_ok(&[0x00, 0x07, 0x00, 0x00, 0x00])
}

pub fn i2c_address_nak() -> Vec<u8> {
    rf_ok(&[0x00, 0x02, 0x00, 0x00, 0x00])
}

/// Plain success without payload.
pub fn vendor_ok() -> Vec<u8> {
    rf_ok(&[0x00])
}

/// Reader answers for one tunnelled register read that returns `bytes`.
pub fn register_read(bytes: &[u8]) -> Vec<Vec<u8>> {
    let mut sram = vec![0x00];
    sram.extend_from_slice(bytes);
    while (sram.len() - 1) % 4 != 0 {
        sram.push(0x00);
    }
    vec![
        i2c_idle(),   // bus idle
        vendor_ok(),  // WRITE I2C (register address)
        i2c_idle(),   // acknowledged
        vendor_ok(),  // READ I2C
        i2c_idle(),   // acknowledged
        rf_ok(&sram), // READ SRAM
    ]
}

/// Reader answers for one tunnelled register write.
pub fn register_write() -> Vec<Vec<u8>> {
    vec![i2c_idle(), vendor_ok(), i2c_idle()]
}

/// Pull the over-the-air frame out of a transparent exchange APDU.
/// Returns `None` for session management APDUs.
pub fn exchange_frame(apdu: &[u8]) -> Option<Vec<u8>> {
    if apdu.len() < 6 || apdu[3] != 0x01 {
        return None;
    }
    let records = tlv::decode(&apdu[5..apdu.len() - 1]).ok()?;
    tlv::find(&records, TAG_CMD_DATA).map(|r| r.value.clone())
}

/// Every over-the-air frame sent so far, in order.
pub fn frames(sent: &[Vec<u8>]) -> Vec<Vec<u8>> {
    sent.iter().filter_map(|a| exchange_frame(a)).collect()
}
