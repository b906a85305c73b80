use std::time::Duration;

use libntag5::bridge::{tlv, BridgeBuilder, BridgeError};
use libntag5::constants::{TAG_CMD_FWTI, TAG_CMD_TIMEOUT};
use libntag5::test_support::{bridge_ok, bridge_status, rf_ok};
use libntag5::transport::MockTransport;
use libntag5::Error;
use serial_test::serial;

fn open_with(mock: &MockTransport) -> libntag5::Bridge<libntag5::Open> {
    let mut m = mock.clone();
    m.push_responses([bridge_ok(), bridge_ok()]);
    BridgeBuilder::new()
        .with_transport(Box::new(m))
        .exchange_timeout(Duration::from_millis(250))
        .fwti(4)
        .build()
        .unwrap()
        .open()
        .unwrap()
}

#[test]
fn exchange_carries_configured_timing() {
    let mut mock = MockTransport::new();
    let mut bridge = open_with(&mock);
    mock.push_response(rf_ok(&[0x00]));
    bridge.exchange(&[0x02, 0x2B]).unwrap();

    let apdu = mock.last_sent().unwrap();
    assert_eq!(&apdu[..4], &[0xFF, 0xC2, 0x00, 0x01]);
    let records = tlv::decode(&apdu[5..apdu.len() - 1]).unwrap();
    assert_eq!(
        tlv::require(&records, TAG_CMD_TIMEOUT).unwrap(),
        &hex::decode("0003d090").unwrap()[..]
    );
    assert_eq!(
        tlv::require(&records, TAG_CMD_FWTI).unwrap(),
        &[0x03, 0x01, 0x04]
    );
    assert_eq!(crate::common::fixtures::exchange_frame(&apdu), Some(vec![0x02, 0x2B]));
}

#[test]
fn bridge_status_errors_are_distinct() {
    let mut mock = MockTransport::new();
    let mut bridge = open_with(&mock);
    mock.push_response(bridge_status(0x01, 0x64, 0x01));
    match bridge.exchange(&[0x02, 0x2B]) {
        Err(Error::Bridge(BridgeError::NoResponseFromCard { object: 1 })) => {}
        other => panic!("expected NoResponseFromCard, got {:?}", other),
    }

    mock.push_response(bridge_status(0x02, 0x6A, 0x81));
    assert!(matches!(
        bridge.exchange(&[0x02, 0x2B]),
        Err(Error::Bridge(BridgeError::UnsupportedObject { object: 2 }))
    ));
}

#[test]
fn reader_status_word_failure() {
    let mut mock = MockTransport::new();
    let mut bridge = open_with(&mock);
    mock.push_response(vec![0x6A, 0x81]);
    assert!(matches!(
        bridge.exchange(&[0x02, 0x2B]),
        Err(Error::ReaderStatus { sw1: 0x6A, sw2: 0x81 })
    ));
}

#[test]
fn missing_data_record_rejected() {
    let mut mock = MockTransport::new();
    let mut bridge = open_with(&mock);
    // status and framing records but no data record
    let mut resp = hex::decode("c00300900096020000920100").unwrap();
    resp.extend_from_slice(&[0x90, 0x00]);
    mock.push_response(resp);
    assert!(matches!(
        bridge.exchange(&[0x02, 0x2B]),
        Err(Error::MissingRecord { tag: 0x97 })
    ));
}

#[test]
#[serial]
fn session_lifecycle() {
    let mut mock = MockTransport::new();
    let bridge = open_with(&mock);
    assert!(mock.is_connected());

    mock.push_response(bridge_ok());
    let closed = bridge.close().unwrap();
    assert!(!mock.is_connected());
    assert_eq!(mock.lifecycle_counts(), (1, 1));
    assert_eq!(
        mock.last_sent().unwrap(),
        vec![0xFF, 0xC2, 0x00, 0x00, 0x02, 0x82, 0x00, 0x00]
    );

    // the same reader can start a new session
    mock.push_responses([bridge_ok(), bridge_ok()]);
    let reopened = closed.open().unwrap();
    assert_eq!(reopened.config().fwti, 4);
}

#[test]
fn fwti_out_of_range_rejected() {
    let err = BridgeBuilder::new()
        .with_transport(Box::new(MockTransport::new()))
        .fwti(16)
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, Error::InvalidArgument(_)));
}
