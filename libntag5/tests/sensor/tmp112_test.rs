use std::time::Duration;

use libntag5::sensor::tmp112::*;
use libntag5::test_support::MockI2cBus;
use libntag5::utils::PollPolicy;
use libntag5::Reading;

fn sensor(bus: &mut MockI2cBus) -> Tmp112<&mut MockI2cBus> {
    Tmp112::new(bus, DEFAULT_ADDRESS).with_poll(PollPolicy::bounded(Duration::ZERO, 3))
}

#[test]
fn one_shot_from_power_on_config() {
    let mut bus = MockI2cBus::new(DEFAULT_ADDRESS);
    bus.set_register(REG_CONFIG, 0x60A0);
    sensor(&mut bus).trigger_one_shot().unwrap();
    assert_eq!(bus.register(REG_CONFIG), Some(0xE1A0));
}

#[test]
fn conversion_in_progress_not_ready() {
    let mut bus = MockI2cBus::new(DEFAULT_ADDRESS);
    bus.set_register(REG_CONFIG, 0x61A0);
    bus.set_register(REG_TEMP_RESULT, 0x1900);
    assert_eq!(sensor(&mut bus).read_temperature().unwrap(), Reading::NotReady);

    bus.set_register(REG_CONFIG, 0xE1A0);
    assert_eq!(sensor(&mut bus).read_temperature().unwrap(), Reading::Ready(25.0));
}

#[test]
fn extended_mode_scaling() {
    let mut bus = MockI2cBus::new(DEFAULT_ADDRESS);
    bus.set_register(REG_CONFIG, 0x60B0);
    bus.set_register(REG_TEMP_RESULT, 0x4B00);
    assert_eq!(sensor(&mut bus).read_temperature().unwrap(), Reading::Ready(150.0));
}

#[test]
fn config_info_fills_limits() {
    let mut bus = MockI2cBus::new(DEFAULT_ADDRESS);
    bus.set_register(REG_CONFIG, 0x60A0);
    bus.set_register(REG_TLOW_LIMIT, 0x4B00);
    bus.set_register(REG_THIGH_LIMIT, 0x5000);
    let info = sensor(&mut bus).config_info().unwrap();
    assert_eq!(info.tlow_limit, Some(75.0));
    assert_eq!(info.thigh_limit, Some(80.0));
    assert_eq!(info.resolution, Resolution::Bits12);
    assert_eq!(info.conversion_rate, ConversionRate::Hz4);
    assert_eq!(info.fault_queue, 1);
    assert!(info.alert);
    assert!(!info.shutdown);
}
