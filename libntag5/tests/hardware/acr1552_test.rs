#![cfg(feature = "usb")]

#[path = "common.rs"]
mod common;

use libntag5::{Ntag5Link, Result};
use serial_test::serial;

// These tests need an ACR1552 with an NTAG 5 Link on the antenna. They are
// marked `#[ignore]` so CI does not attempt to run them. Run manually with:
//
// cargo test -p libntag5 --test hardware --features usb -- --ignored
//

#[test]
#[ignore]
#[serial]
fn open_and_close_session() -> Result<()> {
    let Some(bridge) = common::open_reader()? else {
        return Ok(());
    };
    let open = bridge.open()?;
    open.close()?;
    Ok(())
}

#[test]
#[ignore]
#[serial]
fn read_tag_system_info() -> Result<()> {
    let Some(bridge) = common::open_reader()? else {
        return Ok(());
    };
    let mut tag = Ntag5Link::open(bridge)?;
    let info = tag.vicinity().system_info()?;
    log::info!("uid {}", info.uid.to_hex());
    let config = tag.config_info()?;
    log::info!("use case {}", config.config1.use_case);
    tag.close()?;
    Ok(())
}
