use libntag5::protocol::{Capability, CryptoSuite, Iso15693Error, Iso29167Suite, RfError};
use libntag5::test_support::{open_mock_session, rf_ok, rf_response};
use libntag5::Error;

use crate::common::fixtures::{exchange_frame, frames, system_info_response};

#[test]
fn system_info_reference_payload() {
    let (mut iso, mut mock) = open_mock_session();
    mock.push_response(rf_ok(&system_info_response()));
    let info = iso.system_info().unwrap();

    assert_eq!(info.uid.to_hex(), "e004030405060708");
    let mem = info.memory.unwrap();
    assert_eq!(mem.num_blocks, 16);
    assert_eq!(mem.block_size, 4);
    assert_eq!(mem.total_bytes, 64);
    assert_eq!(info.dsfid, Some(1));
    assert_eq!(info.ic_reference, Some(2));
    assert_eq!(exchange_frame(&mock.last_sent().unwrap()), Some(vec![0x02, 0x2B]));
}

#[test]
fn read_blocks_encodes_count_minus_one() {
    let (mut iso, mut mock) = open_mock_session();
    let mut resp = vec![0x00];
    for i in 0..4u8 {
        resp.push(0x00);
        resp.extend_from_slice(&[i; 4]);
    }
    mock.push_response(rf_ok(&resp));
    let blocks = iso.read_blocks(0, 4).unwrap();
    assert_eq!(blocks.len(), 4);
    assert_eq!(blocks[3].data, vec![3, 3, 3, 3]);

    let frame = exchange_frame(&mock.last_sent().unwrap()).unwrap();
    assert_eq!(frame, vec![0x42, 0x3D, 0x00, 0x00, 0x03, 0x00]);
}

#[test]
fn read_blocks_zero_count_never_transmits() {
    let (mut iso, mock) = open_mock_session();
    let before = frames(&mock.sent()).len();
    let err = iso.read_blocks(0, 0).unwrap_err();
    assert!(err.to_string().contains("must read at least one block"));
    assert_eq!(frames(&mock.sent()).len(), before);
}

#[test]
fn rf_status_checked_before_payload() {
    let (mut iso, mut mock) = open_mock_session();
    // CRC bit set; the payload would otherwise decode fine
    mock.push_response(rf_response(0x01, 0x00, &system_info_response()));
    assert!(matches!(iso.system_info(), Err(Error::Rf(RfError::Crc))));

    mock.push_response(rf_response(0x00, 0x05, &system_info_response()));
    assert!(matches!(
        iso.system_info(),
        Err(Error::Rf(RfError::IncompleteByte(0x05)))
    ));
}

#[test]
fn error_flag_maps_codes() {
    let (mut iso, mut mock) = open_mock_session();
    mock.push_response(rf_ok(&[0x01, 0x12]));
    assert!(matches!(
        iso.read_single_block(3),
        Err(Error::Iso15693(Iso15693Error::BlockLocked))
    ));
    mock.push_response(rf_ok(&[0x01, 0xB3]));
    assert!(matches!(
        iso.read_single_block(3),
        Err(Error::Iso15693(Iso15693Error::Custom(0xB3)))
    ));
}

#[test]
fn single_block_requests_security_status() {
    let (mut iso, mut mock) = open_mock_session();
    mock.push_response(rf_ok(&[0x00, 0x01, 0xDE, 0xAD, 0xBE, 0xEF]));
    let block = iso.read_single_block(7).unwrap();
    assert!(block.locked);
    assert_eq!(block.to_hex(), "de ad be ef");
    let frame = exchange_frame(&mock.last_sent().unwrap()).unwrap();
    assert_eq!(frame, vec![0x42, 0x20, 0x07]);
}

#[test]
fn extended_info_single_crypto_suite() {
    let (mut iso, mut mock) = open_mock_session();
    let mut payload = vec![0x00, 0x60];
    payload.extend_from_slice(&[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x04, 0xE0]);
    payload.extend_from_slice(&[0x09, 0x00, 0x00, 0x00]);
    payload.push(0x00);
    mock.push_response(rf_ok(&payload));

    let info = iso.extended_system_info().unwrap();
    assert!(info.memory.is_none());
    assert!(info.commands.unwrap().supports(Capability::ReadSingleBlock));
    // length byte omitted for a single entry
    assert_eq!(
        info.crypto_suites.unwrap(),
        vec![CryptoSuite::Iso29167(Iso29167Suite::Aes128)]
    );
}
