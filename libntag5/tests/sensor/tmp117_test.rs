use std::time::Duration;

use libntag5::sensor::tmp117::*;
use libntag5::test_support::{BusEvent, MockI2cBus};
use libntag5::utils::PollPolicy;
use libntag5::{Error, Reading};

fn bounded() -> PollPolicy {
    PollPolicy::bounded(Duration::ZERO, 3)
}

#[test]
fn volatile_config_write_skips_eeprom() {
    let mut bus = MockI2cBus::new(DEFAULT_ADDRESS);
    bus.set_register(REG_CONFIG, 0x0220);
    let update = ConfigUpdate {
        cycle: Some(7),
        ..Default::default()
    };
    Tmp117::new(&mut bus, DEFAULT_ADDRESS)
        .with_poll(bounded())
        .write_config(&update, false)
        .unwrap();

    assert_eq!(bus.register(REG_CONFIG), Some(0x03A0));
    assert_eq!(bus.resets(), 0);
    assert_eq!(bus.writes(), vec![vec![REG_CONFIG], vec![REG_CONFIG, 0x03, 0xA0]]);
}

#[test]
fn negative_temperature() {
    let mut bus = MockI2cBus::new(DEFAULT_ADDRESS);
    bus.set_register(REG_CONFIG, 0x2220);
    bus.set_register(REG_TEMP_RESULT, 0xFF80);
    let mut sensor = Tmp117::new(&mut bus, DEFAULT_ADDRESS).with_poll(bounded());
    assert_eq!(sensor.read_temperature().unwrap(), Reading::Ready(-1.0));
}

#[test]
fn config_info_reports_mode() {
    let mut bus = MockI2cBus::new(DEFAULT_ADDRESS);
    bus.set_register(REG_CONFIG, 0x0C20);
    let info = Tmp117::new(&mut bus, DEFAULT_ADDRESS)
        .with_poll(bounded())
        .config_info()
        .unwrap();
    assert_eq!(info.mode, ConversionMode::OneShot);
    assert_eq!(info.averaging, Averaging::X8);
}

#[test]
fn watchdog_reported() {
    let mut bus = MockI2cBus::new(DEFAULT_ADDRESS);
    bus.force_watchdog();
    let err = Tmp117::new(&mut bus, DEFAULT_ADDRESS)
        .with_poll(bounded())
        .read_temperature()
        .unwrap_err();
    assert!(matches!(err, Error::I2cWatchdogExpired));
}

#[test]
fn stuck_bus_gives_up() {
    let mut bus = MockI2cBus::new(DEFAULT_ADDRESS);
    bus.set_busy_polls(u32::MAX);
    let err = Tmp117::new(&mut bus, DEFAULT_ADDRESS)
        .with_poll(bounded())
        .raw_config()
        .unwrap_err();
    assert!(matches!(
        err,
        Error::PollLimitExceeded {
            what: "i2c bus",
            attempts: 3
        }
    ));
    // nothing was put on the bus
    assert!(bus
        .events()
        .iter()
        .all(|e| matches!(e, BusEvent::Status { busy: true })));
}
