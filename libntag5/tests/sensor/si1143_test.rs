use std::time::Duration;

use libntag5::sensor::si1143::*;
use libntag5::tag::I2cResult;
use libntag5::test_support::{BusEvent, MockI2cBus, RegisterLayout};
use libntag5::utils::PollPolicy;
use libntag5::Error;

fn bus() -> MockI2cBus {
    MockI2cBus::with_layout(DEFAULT_ADDRESS, RegisterLayout::Byte)
}

fn sensor(bus: &mut MockI2cBus) -> Si1143<&mut MockI2cBus> {
    Si1143::new(bus)
        .with_poll(PollPolicy::bounded(Duration::ZERO, 3))
        .with_handshake(PollPolicy::bounded(Duration::ZERO, 3))
}

fn command_writes(bus: &MockI2cBus) -> Vec<u8> {
    bus.writes()
        .into_iter()
        .filter(|w| w.len() == 2 && w[0] == REG_COMMAND)
        .map(|w| w[1])
        .collect()
}

#[test]
fn channel_list_through_param_set() {
    let mut b = bus();
    b.push_read(REG_RESPONSE, &[0x03]);
    b.push_read(REG_RESPONSE, &[0x04]);
    b.set_byte(REG_PARAM_RD, CHLIST_PS1 | CHLIST_ALS_VIS);
    sensor(&mut b)
        .set_channels(CHLIST_PS1 | CHLIST_ALS_VIS)
        .unwrap();

    assert_eq!(b.byte(REG_PARAM_WR), 0x11);
    assert_eq!(command_writes(&b), vec![0xA0 | PARAM_CHLIST]);
}

#[test]
fn reset_is_not_polled() {
    let mut b = bus();
    sensor(&mut b).reset().unwrap();
    assert_eq!(command_writes(&b), vec![0x01]);
    assert!(!b
        .events()
        .iter()
        .any(|e| matches!(e, BusEvent::Read { .. })));
}

#[test]
fn invalid_setting_reported() {
    let mut b = bus();
    b.push_read(REG_RESPONSE, &[0x00]);
    b.push_read(REG_RESPONSE, &[0x80]);
    match sensor(&mut b).start_autonomous() {
        Err(Error::Si114x(Si114xError::InvalidSetting)) => {}
        other => panic!("expected InvalidSetting, got {:?}", other),
    }
    assert_eq!(command_writes(&b), vec![0x0F]);
}

#[test]
fn pause_and_force_opcodes() {
    let mut b = bus();
    for r in [0x00, 0x01, 0x01, 0x02] {
        b.push_read(REG_RESPONSE, &[r]);
    }
    let mut s = sensor(&mut b);
    s.pause().unwrap();
    s.force_measurement().unwrap();
    drop(s);
    assert_eq!(command_writes(&b), vec![0x0B, 0x07]);
}

#[test]
fn missing_device_is_not_acknowledged() {
    let mut b = bus();
    b.force_result(I2cResult::AddressNak);
    assert!(matches!(
        sensor(&mut b).info(),
        Err(Error::NotAcknowledged(I2cResult::AddressNak))
    ));
}
