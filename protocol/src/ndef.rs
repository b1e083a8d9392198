//! NDEF record framing.
//!
//! Only what a payment tag needs: well-known text records inside a single
//! message. Record layout:
//!
//! ```text
//! header:  MB | ME | CF | SR | IL | TNF(3)
//! type length            (1 byte)
//! payload length         (1 byte if SR, else 4 bytes big-endian)
//! id length              (1 byte, only if IL)
//! type | id | payload
//! ```
//!
//! Text record payload: status byte (bit 7 = UTF-16, bits 0-5 = language
//! code length), language code, text.

use crate::ProtocolError;

const FLAG_MB: u8 = 0x80;
const FLAG_ME: u8 = 0x40;
const FLAG_CF: u8 = 0x20;
const FLAG_SR: u8 = 0x10;
const FLAG_IL: u8 = 0x08;
const TNF_MASK: u8 = 0x07;

/// Type name format: empty record.
pub const TNF_EMPTY: u8 = 0x00;
/// Type name format: NFC Forum well-known type.
pub const TNF_WELL_KNOWN: u8 = 0x01;
/// Well-known record type of a text record.
pub const RTD_TEXT: &[u8] = b"T";

const TEXT_UTF16: u8 = 0x80;
const TEXT_LANG_MASK: u8 = 0x3F;

/// A single NDEF record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NdefRecord {
    pub tnf: u8,
    pub record_type: Vec<u8>,
    pub id: Vec<u8>,
    pub payload: Vec<u8>,
}

impl NdefRecord {
    /// Build a UTF-8 text record.
    pub fn text(text: &str, language: &str) -> Result<Self, ProtocolError> {
        let lang = language.as_bytes();
        if lang.len() > TEXT_LANG_MASK as usize {
            return Err(ProtocolError::LanguageCodeTooLong(lang.len()));
        }
        let mut payload = Vec::with_capacity(1 + lang.len() + text.len());
        payload.push(lang.len() as u8);
        payload.extend_from_slice(lang);
        payload.extend_from_slice(text.as_bytes());
        Ok(Self {
            tnf: TNF_WELL_KNOWN,
            record_type: RTD_TEXT.to_vec(),
            id: Vec::new(),
            payload,
        })
    }

    pub fn is_text(&self) -> bool {
        self.tnf == TNF_WELL_KNOWN && self.record_type == RTD_TEXT
    }

    /// Extract the text of a text record.
    pub fn text_content(&self) -> Result<String, ProtocolError> {
        if !self.is_text() {
            return Err(ProtocolError::Malformed("not a text record".into()));
        }
        let (&status, rest) = self
            .payload
            .split_first()
            .ok_or_else(|| ProtocolError::Malformed("empty text payload".into()))?;
        if status & TEXT_UTF16 != 0 {
            return Err(ProtocolError::UnsupportedEncoding);
        }
        let lang_len = (status & TEXT_LANG_MASK) as usize;
        if rest.len() < lang_len {
            return Err(ProtocolError::Malformed(format!(
                "language code length {lang_len} exceeds payload"
            )));
        }
        String::from_utf8(rest[lang_len..].to_vec())
            .map_err(|_| ProtocolError::Malformed("text is not valid UTF-8".into()))
    }
}

/// Serialize records into one NDEF message.
pub fn encode_message(records: &[NdefRecord]) -> Result<Vec<u8>, ProtocolError> {
    let mut out = Vec::new();
    for (i, record) in records.iter().enumerate() {
        if record.record_type.len() > u8::MAX as usize || record.id.len() > u8::MAX as usize {
            return Err(ProtocolError::Malformed("type or id longer than 255 bytes".into()));
        }
        let payload_len = u32::try_from(record.payload.len())
            .map_err(|_| ProtocolError::Malformed("payload longer than 4 GiB".into()))?;

        let mut header = record.tnf & TNF_MASK;
        if i == 0 {
            header |= FLAG_MB;
        }
        if i == records.len() - 1 {
            header |= FLAG_ME;
        }
        let short = payload_len <= u8::MAX as u32;
        if short {
            header |= FLAG_SR;
        }
        if !record.id.is_empty() {
            header |= FLAG_IL;
        }

        out.push(header);
        out.push(record.record_type.len() as u8);
        if short {
            out.push(payload_len as u8);
        } else {
            out.extend_from_slice(&payload_len.to_be_bytes());
        }
        if !record.id.is_empty() {
            out.push(record.id.len() as u8);
        }
        out.extend_from_slice(&record.record_type);
        out.extend_from_slice(&record.id);
        out.extend_from_slice(&record.payload);
    }
    Ok(out)
}

/// Parse an NDEF message. Parsing stops at the record flagged ME.
pub fn parse_message(bytes: &[u8]) -> Result<Vec<NdefRecord>, ProtocolError> {
    let mut reader = Reader { bytes, offset: 0 };
    let mut records = Vec::new();

    while !reader.is_empty() {
        let header = reader.take(1)?[0];
        if header & FLAG_CF != 0 {
            return Err(ProtocolError::Malformed("chunked records are not supported".into()));
        }
        let type_len = reader.take(1)?[0] as usize;
        let payload_len = if header & FLAG_SR != 0 {
            reader.take(1)?[0] as usize
        } else {
            let raw = reader.take(4)?;
            u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize
        };
        let id_len = if header & FLAG_IL != 0 {
            reader.take(1)?[0] as usize
        } else {
            0
        };

        let record_type = reader.take(type_len)?.to_vec();
        let id = reader.take(id_len)?.to_vec();
        let payload = reader.take(payload_len)?.to_vec();
        records.push(NdefRecord {
            tnf: header & TNF_MASK,
            record_type,
            id,
            payload,
        });

        if header & FLAG_ME != 0 {
            break;
        }
    }
    Ok(records)
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn is_empty(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ProtocolError> {
        let end = self.offset.checked_add(len).filter(|&end| end <= self.bytes.len());
        match end {
            Some(end) => {
                let slice = &self.bytes[self.offset..end];
                self.offset = end;
                Ok(slice)
            }
            None => Err(ProtocolError::Truncated {
                offset: self.offset,
                needed: len - (self.bytes.len() - self.offset),
            }),
        }
    }
}
