use std::time::Duration;

use libntag5::tag::{EhVoltage, I2cResult, ADDR_EH_CONFIG, ADDR_EH_SESSION};
use libntag5::test_support::{open_mock_tag, rf_ok};
use libntag5::utils::PollPolicy;
use libntag5::Error;

use crate::common::fixtures::{frames, i2c_address_nak, i2c_busy, vendor_ok};

fn page(bytes: [u8; 4]) -> Vec<u8> {
    let mut v = vec![0x00];
    v.extend_from_slice(&bytes);
    rf_ok(&v)
}

#[test]
fn nxp_info_frame_and_decode() {
    let (mut tag, mut mock) = open_mock_tag();
    mock.push_response(rf_ok(&[0x00, 0x10, 0x00, 0x00, 0x01, 0x00, 0x00, 0x03]));
    let info = tag.nxp_info().unwrap();
    assert_eq!(info.pp_pointer, 0x10);
    assert!(info.features.user_memory_protection);
    assert_eq!(frames(&mock.sent()), vec![vec![0x02, 0xAB, 0x04]]);
}

#[test]
fn status_register_decoded() {
    let (mut tag, mut mock) = open_mock_tag();
    mock.push_response(i2c_busy());
    assert!(tag.i2c_busy().unwrap());
    mock.push_response(i2c_address_nak());
    assert_eq!(tag.i2c_last_result().unwrap(), I2cResult::AddressNak);
    assert_eq!(
        frames(&mock.sent()).last().unwrap(),
        &vec![0x02, 0xC0, 0x04, 0xAD, 0x00]
    );
}

#[test]
fn energy_harvesting_start_sequence() {
    let (mut tag, mut mock) = open_mock_tag();
    mock.push_responses([
        page([0x00, 0x00, 0x00, 0x00]), // session before the first trigger
        vendor_ok(),
        page([0x08, 0x00, 0x00, 0x00]), // load not settled yet
        page([0x88, 0x00, 0x00, 0x00]), // load ok
        page([0x88, 0x00, 0x00, 0x00]),
        vendor_ok(),
    ]);
    tag.start_energy_harvesting(&PollPolicy::bounded(Duration::ZERO, 5))
        .unwrap();

    let sent = frames(&mock.sent());
    let read = vec![0x02, 0xC0, 0x04, ADDR_EH_SESSION, 0x00];
    assert_eq!(
        sent,
        vec![
            read.clone(),
            vec![0x02, 0xC1, 0x04, ADDR_EH_SESSION, 0x08, 0x00, 0x00, 0x00],
            read.clone(),
            read.clone(),
            read,
            vec![0x02, 0xC1, 0x04, ADDR_EH_SESSION, 0x89, 0x00, 0x00, 0x00],
        ]
    );
}

#[test]
fn energy_harvesting_gives_up_when_bounded() {
    let (mut tag, mut mock) = open_mock_tag();
    mock.push_responses([
        page([0x00, 0x00, 0x00, 0x00]),
        vendor_ok(),
        page([0x08, 0x00, 0x00, 0x00]),
        page([0x08, 0x00, 0x00, 0x00]),
    ]);
    match tag.start_energy_harvesting(&PollPolicy::bounded(Duration::ZERO, 2)) {
        Err(Error::PollLimitExceeded { attempts: 2, .. }) => {}
        other => panic!("expected PollLimitExceeded, got {:?}", other),
    }
}

#[test]
fn energy_config_read_modify_write() {
    let (mut tag, mut mock) = open_mock_tag();
    mock.push_response(page([0x00, 0x5A, 0x00, 0xA5]));
    let mut config = tag.energy_config().unwrap();
    assert_eq!(config.voltage, EhVoltage::V1_8);

    config.voltage = EhVoltage::V3_0;
    mock.push_responses([page([0x00, 0x5A, 0x00, 0xA5]), vendor_ok()]);
    tag.write_energy_config(&config).unwrap();
    assert_eq!(
        frames(&mock.sent()).last().unwrap(),
        &vec![0x02, 0xC1, 0x04, ADDR_EH_CONFIG, 0x04, 0x5A, 0x00, 0xA5]
    );
}

#[test]
fn unchanged_energy_config_not_written() {
    let (mut tag, mut mock) = open_mock_tag();
    mock.push_response(page([0x04, 0x00, 0x00, 0x00]));
    let config = tag.energy_config().unwrap();
    mock.push_response(page([0x04, 0x00, 0x00, 0x00]));
    tag.write_energy_config(&config).unwrap();

    let sent = frames(&mock.sent());
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|f| f[1] == 0xC0));
}
