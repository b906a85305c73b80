use std::time::Duration;

use libntag5::sensor::tmp117::{self, Tmp117};
use libntag5::tag::I2cResult;
use libntag5::test_support::open_mock_tag;
use libntag5::utils::PollPolicy;
use libntag5::{Error, Reading};

use crate::common::fixtures::{
    frames, i2c_address_nak, i2c_busy, i2c_idle, register_read, register_write, vendor_ok,
};

const STATUS: [u8; 5] = [0x02, 0xC0, 0x04, 0xAD, 0x00];

fn poll() -> PollPolicy {
    PollPolicy::bounded(Duration::ZERO, 4)
}

#[test]
fn temperature_read_end_to_end() {
    let (tag, mut mock) = open_mock_tag();
    mock.push_responses(register_read(&[0x22, 0x20])); // data ready
    mock.push_responses(register_read(&[0x0C, 0x80]));
    let before = frames(&mock.sent()).len();

    let mut sensor = Tmp117::new(tag, tmp117::DEFAULT_ADDRESS).with_poll(poll());
    assert_eq!(sensor.read_temperature().unwrap(), Reading::Ready(25.0));

    let sent = frames(&mock.sent())[before..].to_vec();
    let expected_config = vec![
        STATUS.to_vec(),
        vec![0x02, 0xD4, 0x04, 0x48, 0x00, 0x01],
        STATUS.to_vec(),
        vec![0x02, 0xD5, 0x04, 0x48, 0x01],
        STATUS.to_vec(),
        vec![0x02, 0xD2, 0x04, 0x00, 0x00],
    ];
    assert_eq!(&sent[..6], &expected_config[..]);
    assert_eq!(sent[7], vec![0x02, 0xD4, 0x04, 0x48, 0x00, 0x00]);
    assert_eq!(sent.len(), 12);
    assert_eq!(mock.pending_responses(), 0);
}

#[test]
fn data_not_ready_skips_result_register() {
    let (tag, mut mock) = open_mock_tag();
    mock.push_responses(register_read(&[0x02, 0x20]));
    let mut sensor = Tmp117::new(tag, tmp117::DEFAULT_ADDRESS).with_poll(poll());
    assert_eq!(sensor.read_temperature().unwrap(), Reading::NotReady);
    assert_eq!(mock.pending_responses(), 0);
}

#[test]
fn busy_bus_is_polled() {
    let (tag, mut mock) = open_mock_tag();
    let mut script = vec![i2c_busy(), i2c_busy()];
    script.extend(register_read(&[0x02, 0x20]));
    mock.push_responses(script);

    let mut sensor = Tmp117::new(tag, tmp117::DEFAULT_ADDRESS).with_poll(poll());
    assert_eq!(sensor.raw_config().unwrap(), 0x0220);
    let sent = frames(&mock.sent());
    let statuses = sent.iter().filter(|f| f.as_slice() == STATUS).count();
    assert_eq!(statuses, 5);
}

#[test]
fn address_nak_stops_before_read() {
    let (tag, mut mock) = open_mock_tag();
    mock.push_responses([i2c_idle(), vendor_ok(), i2c_address_nak()]);
    let mut sensor = Tmp117::new(tag, 0x49).with_poll(poll());

    match sensor.raw_config() {
        Err(Error::NotAcknowledged(I2cResult::AddressNak)) => {}
        other => panic!("expected address NAK, got {:?}", other),
    }
    assert!(frames(&mock.sent()).iter().all(|f| f[1] != 0xD5));
}

#[test]
fn register_write_frame() {
    let (tag, mut mock) = open_mock_tag();
    mock.push_responses(register_write());
    let mut sensor = Tmp117::new(tag, tmp117::DEFAULT_ADDRESS).with_poll(poll());
    sensor.tunnel().write_u16_be(tmp117::REG_CONFIG, 0x0C20).unwrap();

    let sent = frames(&mock.sent());
    assert_eq!(
        sent[sent.len() - 2],
        vec![0x02, 0xD4, 0x04, 0x48, 0x02, 0x01, 0x0C, 0x20]
    );
}
