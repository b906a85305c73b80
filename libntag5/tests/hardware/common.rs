#![cfg(feature = "usb")]

//! 共通: 実機テスト用ヘルパー
//!
//! リーダーが接続されていない環境（CI 等）では `Ok(None)` を返す。

use libntag5::transport::usb::UsbTransport;
use libntag5::{Bridge, BridgeBuilder, Closed, Error, Result};

/// ACR1552 を開いてセッション前の `Bridge<Closed>` を返す。
///
/// - Ok(Some(bridge)) : リーダーが見つかった
/// - Ok(None) : リーダーが見つからない
/// - Err(e) : その他のエラー
pub fn open_reader() -> Result<Option<Bridge<Closed>>> {
    let _ = env_logger::builder().is_test(true).try_init();
    match UsbTransport::open() {
        Ok(transport) => {
            let bridge = BridgeBuilder::new()
                .with_transport(Box::new(transport))
                .build()?;
            Ok(Some(bridge))
        }
        Err(Error::ReaderNotFound) => Ok(None),
        Err(e) => Err(e),
    }
}
