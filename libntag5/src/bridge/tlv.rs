// libntag5/src/bridge/tlv.rs

//! BER-TLV records used inside transparent-exchange pseudo APDUs.
//!
//! Tags are one byte unless the low five bits of the first byte are all
//! set, in which case a second byte follows. Lengths use the short form
//! below 0x80 and the 0x81 / 0x82 long forms above.

use crate::{Error, Result};

/// One (tag, value) data object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedRecord {
    pub tag: u16,
    pub value: Vec<u8>,
}

impl TaggedRecord {
    pub fn new(tag: u16, value: impl Into<Vec<u8>>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    /// Append the encoded record to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        if self.tag > 0xFF {
            out.extend_from_slice(&self.tag.to_be_bytes());
        } else {
            out.push(self.tag as u8);
        }
        let len = self.value.len();
        match len {
            0..=0x7F => out.push(len as u8),
            0x80..=0xFF => out.extend_from_slice(&[0x81, len as u8]),
            0x100..=0xFFFF => {
                out.push(0x82);
                out.extend_from_slice(&(len as u16).to_be_bytes());
            }
            _ => {
                return Err(Error::RecordFormat(format!(
                    "value of tag {:#06x} too long ({len} bytes)",
                    self.tag
                )));
            }
        }
        out.extend_from_slice(&self.value);
        Ok(())
    }
}

/// Encode records in the given order.
pub fn encode(records: &[TaggedRecord]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for r in records {
        r.encode_into(&mut out)?;
    }
    Ok(out)
}

fn take(data: &[u8], pos: &mut usize, n: usize) -> Result<usize> {
    let start = *pos;
    let end = start.checked_add(n).ok_or_else(|| Error::RecordFormat("length overflow".into()))?;
    if end > data.len() {
        return Err(Error::InvalidLength {
            expected: end,
            actual: data.len(),
        });
    }
    *pos = end;
    Ok(start)
}

/// Decode a complete sequence of records. Trailing garbage is an error.
pub fn decode(data: &[u8]) -> Result<Vec<TaggedRecord>> {
    let mut records = Vec::new();
    let mut pos = 0usize;
    while pos < data.len() {
        let i = take(data, &mut pos, 1)?;
        let mut tag = data[i] as u16;
        if data[i] & 0x1F == 0x1F {
            let j = take(data, &mut pos, 1)?;
            if data[j] & 0x80 != 0 {
                return Err(Error::RecordFormat(format!(
                    "tags longer than two bytes are not supported ({:02x}{:02x}..)",
                    data[i], data[j]
                )));
            }
            tag = (tag << 8) | data[j] as u16;
        }

        let l = take(data, &mut pos, 1)?;
        let len = match data[l] {
            n @ 0x00..=0x7F => n as usize,
            0x81 => {
                let k = take(data, &mut pos, 1)?;
                data[k] as usize
            }
            0x82 => {
                let k = take(data, &mut pos, 2)?;
                u16::from_be_bytes([data[k], data[k + 1]]) as usize
            }
            other => {
                return Err(Error::RecordFormat(format!(
                    "unsupported length byte {other:#04x} for tag {tag:#06x}"
                )));
            }
        };

        let v = take(data, &mut pos, len)?;
        records.push(TaggedRecord::new(tag, &data[v..v + len]));
    }
    Ok(records)
}

/// Look a record up by tag. Responses must never be read by position.
pub fn find(records: &[TaggedRecord], tag: u16) -> Option<&TaggedRecord> {
    records.iter().find(|r| r.tag == tag)
}

/// Like [`find`] but missing records are an error.
pub fn require(records: &[TaggedRecord], tag: u16) -> Result<&[u8]> {
    find(records, tag)
        .map(|r| r.value.as_slice())
        .ok_or(Error::MissingRecord { tag })
}
