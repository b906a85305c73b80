// libntag5/src/bridge/mod.rs

//! Transparent session on top of a PC/SC-style reader.
//!
//! Every call is a pseudo APDU `FF C2 00 <function> Lc <records> 00`. The
//! reader answers with tagged records and always includes an error status
//! record (C0) which is checked before anything else is looked at.

pub mod builder;
pub mod status;
pub mod tlv;

use std::marker::PhantomData;

use log::{debug, info, warn};

use crate::constants::*;
use crate::transport::Transport;
use crate::utils::trace_frame;
use crate::{Error, Result};

pub use builder::{BridgeBuilder, ExchangeConfig};
pub use status::BridgeError;
pub use tlv::TaggedRecord;

/// Type-state markers
pub struct Closed;
pub struct Open;

/// Raw result of one over-the-air exchange, before any vicinity level
/// checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfResponse {
    /// Byte 0 of the response status record.
    pub status: u8,
    /// Byte 0 of the response framing record.
    pub framing: u8,
    /// Card response frame, flags byte included.
    pub data: Vec<u8>,
}

/// Reader handle that enforces the session state at compile time.
pub struct Bridge<State = Closed> {
    transport: Box<dyn Transport>,
    config: ExchangeConfig,
    atr: Vec<u8>,
    _state: PhantomData<State>,
}

impl<S> Bridge<S> {
    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    pub fn reader_name(&self) -> String {
        self.transport.name()
    }

    fn into_state<T>(self) -> Bridge<T> {
        Bridge {
            transport: self.transport,
            config: self.config,
            atr: self.atr,
            _state: PhantomData,
        }
    }

    fn transmit_pseudo(&mut self, function: u8, data: &[u8]) -> Result<Vec<TaggedRecord>> {
        if data.len() > MAX_APDU_DATA_LEN {
            return Err(Error::InvalidArgument(format!(
                "pseudo apdu data too long: {} bytes",
                data.len()
            )));
        }
        let mut apdu = Vec::with_capacity(data.len() + 6);
        apdu.extend_from_slice(&[
            PSEUDO_APDU_CLA,
            PSEUDO_APDU_INS_TRANSPARENT,
            0x00,
            function,
            data.len() as u8,
        ]);
        apdu.extend_from_slice(data);
        apdu.push(0x00);

        trace_frame("bridge", ">>", &apdu);
        let resp = self.transport.transmit_checked(&apdu)?;
        trace_frame("bridge", "<<", &resp);

        let records = tlv::decode(&resp)?;
        status::check_error_status(tlv::require(&records, TAG_ERROR_STATUS)?)?;
        Ok(records)
    }
}

impl Bridge<Closed> {
    /// Wrap a transport with the default exchange parameters.
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self::with_config(transport, ExchangeConfig::default())
    }

    pub(crate) fn with_config(transport: Box<dyn Transport>, config: ExchangeConfig) -> Self {
        Self {
            transport,
            config,
            atr: Vec::new(),
            _state: PhantomData,
        }
    }

    /// Power the card, begin a transparent session and switch the air
    /// interface to ISO/IEC 15693.
    pub fn open(mut self) -> Result<Bridge<Open>> {
        self.atr = self.transport.connect()?;
        info!(
            "{}: card present, atr {}",
            self.transport.name(),
            crate::utils::bytes_to_hex(&self.atr)
        );
        self.transmit_pseudo(TRANSPARENT_FN_MANAGE, &MANAGE_BEGIN_SESSION)?;
        self.transmit_pseudo(TRANSPARENT_FN_SWITCH_PROTOCOL, &SWITCH_PROTOCOL_ISO15693_L3)?;
        info!("transparent session started (iso15693)");
        Ok(self.into_state())
    }
}

impl Bridge<Open> {
    pub fn atr(&self) -> &[u8] {
        &self.atr
    }

    /// End the transparent session and power the card down.
    ///
    /// The card is powered down even when ending the session fails; the
    /// first error is returned.
    pub fn close(mut self) -> Result<Bridge<Closed>> {
        let ended = self.transmit_pseudo(TRANSPARENT_FN_MANAGE, &MANAGE_END_SESSION);
        if let Err(e) = &ended {
            warn!("{}: end session failed: {e}", self.transport.name());
        }
        let disconnected = self.transport.disconnect();
        ended?;
        disconnected?;
        info!("transparent session ended");
        self.atr.clear();
        Ok(self.into_state())
    }

    /// Send `payload` over the air unmodified and return what came back.
    pub fn exchange(&mut self, payload: &[u8]) -> Result<RfResponse> {
        let mut fwti = Vec::with_capacity(3);
        fwti.extend_from_slice(&FWTI_PREFIX);
        fwti.push(self.config.fwti);

        let request = tlv::encode(&[
            TaggedRecord::new(TAG_CMD_TIMEOUT, self.config.timeout_us.to_be_bytes()),
            TaggedRecord::new(TAG_CMD_FWTI, fwti),
            TaggedRecord::new(TAG_CMD_DATA, payload),
        ])?;
        trace_frame("rf", ">>", payload);

        let records = self.transmit_pseudo(TRANSPARENT_FN_EXCHANGE, &request)?;

        let status = first_byte(&records, TAG_RESP_STATUS)?;
        let framing = first_byte(&records, TAG_RESP_FRAMING)?;
        let data = tlv::require(&records, TAG_RESP_DATA)?.to_vec();
        trace_frame("rf", "<<", &data);
        debug!("rf status {status:#04x} framing {framing:#04x}");

        Ok(RfResponse {
            status,
            framing,
            data,
        })
    }
}

fn first_byte(records: &[TaggedRecord], tag: u16) -> Result<u8> {
    tlv::require(records, tag)?
        .first()
        .copied()
        .ok_or_else(|| Error::RecordFormat(format!("record {tag:#06x} is empty")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bridge_ok, bridge_status, rf_ok};
    use crate::transport::MockTransport;

    fn open_bridge(mock: &MockTransport) -> Bridge<Open> {
        let mut m = mock.clone();
        m.push_response(bridge_ok());
        m.push_response(bridge_ok());
        Bridge::new(Box::new(m)).open().unwrap()
    }

    #[test]
    fn open_sends_begin_then_switch() {
        let mock = MockTransport::new();
        let bridge = open_bridge(&mock);
        let sent = mock.sent();
        assert_eq!(sent[0], vec![0xFF, 0xC2, 0x00, 0x00, 0x02, 0x81, 0x00, 0x00]);
        assert_eq!(
            sent[1],
            vec![0xFF, 0xC2, 0x00, 0x02, 0x04, 0x8F, 0x02, 0x02, 0x03, 0x00]
        );
        assert!(!bridge.atr().is_empty());
    }

    #[test]
    fn exchange_wraps_payload() {
        let mut mock = MockTransport::new();
        let mut bridge = open_bridge(&mock);
        mock.push_response(rf_ok(&[0x00, 0xAA]));
        let r = bridge.exchange(&[0x02, 0x2B]).unwrap();
        assert_eq!(r.data, vec![0x00, 0xAA]);
        assert_eq!(r.status, 0);

        let apdu = mock.last_sent().unwrap();
        assert_eq!(
            hex::encode(&apdu),
            "ffc20001115f4604000f4240ff6e0303010f9502022b00"
        );
    }

    #[test]
    fn exchange_surfaces_bridge_error() {
        let mut mock = MockTransport::new();
        let mut bridge = open_bridge(&mock);
        mock.push_response(bridge_status(0x03, 0x64, 0x01));
        match bridge.exchange(&[0x02, 0x2B]) {
            Err(Error::Bridge(BridgeError::NoResponseFromCard { object: 3 })) => {}
            other => panic!("expected bridge error, got {:?}", other),
        }
    }

    #[test]
    fn exchange_requires_data_record() {
        let mut mock = MockTransport::new();
        let mut bridge = open_bridge(&mock);
        // status and framing but no data object
        mock.push_response(hex::decode("c003009000960200009201009000").unwrap());
        assert!(matches!(
            bridge.exchange(&[0x02, 0x2B]),
            Err(Error::MissingRecord { tag: 0x97 })
        ));
    }

    #[test]
    fn reader_status_word_is_fatal() {
        let mut mock = MockTransport::new();
        mock.push_response(vec![0x6A, 0x81]);
        let r = Bridge::new(Box::new(mock.clone())).open();
        assert!(matches!(
            r.err(),
            Some(Error::ReaderStatus { sw1: 0x6A, sw2: 0x81 })
        ));
    }

    #[test]
    fn close_ends_session_and_disconnects() {
        let mut mock = MockTransport::new();
        let bridge = open_bridge(&mock);
        mock.push_response(bridge_ok());
        let _closed = bridge.close().unwrap();
        assert_eq!(
            mock.last_sent().unwrap(),
            vec![0xFF, 0xC2, 0x00, 0x00, 0x02, 0x82, 0x00, 0x00]
        );
        assert!(!mock.is_connected());
        assert_eq!(mock.lifecycle_counts(), (1, 1));
    }

    #[test]
    fn failed_end_session_still_disconnects() {
        let mut mock = MockTransport::new();
        let bridge = open_bridge(&mock);
        mock.push_response(bridge_status(0x01, 0x6F, 0x00));
        match bridge.close() {
            Err(Error::Bridge(BridgeError::ObjectFailed { object: 1 })) => {}
            Err(other) => panic!("expected ObjectFailed, got {:?}", other),
            Ok(_) => panic!("expected ObjectFailed, got Ok"),
        }
        assert!(!mock.is_connected());
        assert_eq!(mock.lifecycle_counts(), (1, 1));
    }
}
