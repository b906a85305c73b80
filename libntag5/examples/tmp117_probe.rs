#![cfg(feature = "usb")]

//! Read a TMP117 sitting behind an NTAG 5 Link on an ACR1552.
//!
//! The tag powers the sensor from the field, so energy harvesting is
//! started before the first I2C transaction.
//!
//! Usage:
//!   RUST_LOG=debug cargo run -p libntag5 --example tmp117_probe --features usb

use std::time::Duration;

use anyhow::Context;
use libntag5::sensor::tmp117::{self, Tmp117};
use libntag5::transport::UsbTransport;
use libntag5::{BridgeBuilder, Ntag5Link, PollPolicy, Reading};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let transport = UsbTransport::open().context("no ACR1552 found")?;
    let bridge = BridgeBuilder::new()
        .with_transport(Box::new(transport))
        .build()?;
    println!("reader: {}", bridge.reader_name());

    let mut tag = Ntag5Link::open(bridge).context("no tag in the field")?;
    let info = tag.vicinity().system_info()?;
    println!("uid: {}", info.uid.to_hex());

    let config = tag.config_info()?;
    println!("use case: {}", config.config1.use_case);

    let poll = PollPolicy::bounded(Duration::from_millis(100), 50);
    tag.start_energy_harvesting(&poll)?;

    let mut sensor = Tmp117::new(tag, tmp117::DEFAULT_ADDRESS).with_poll(poll);
    let eeprom = sensor.eeprom_info()?;
    println!(
        "device id {:#05x} rev {}, limits {:.2} .. {:.2} °C",
        eeprom.device_id, eeprom.revision, eeprom.tlow_limit, eeprom.thigh_limit
    );

    for _ in 0..10 {
        match sensor.read_temperature()? {
            Reading::Ready(t) => println!("temperature: {:.3} °C", t),
            Reading::NotReady => println!("conversion pending"),
        }
        std::thread::sleep(Duration::from_secs(1));
    }

    sensor.release().close()?;
    Ok(())
}
