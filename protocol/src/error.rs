use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("truncated NDEF message: needed {needed} more bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    #[error("malformed NDEF record: {0}")]
    Malformed(String),

    #[error("language code too long: {0} bytes (max 63)")]
    LanguageCodeTooLong(usize),

    #[error("text record is not UTF-8 encoded")]
    UnsupportedEncoding,

    #[error("serialization error: {0}")]
    Serialization(String),
}
