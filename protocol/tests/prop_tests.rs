use proptest::prelude::*;

use tappay_protocol::ndef::{encode_message, parse_message, NdefRecord};
use tappay_protocol::{decode, decode_text, encode_at, DecodeOutcome, PayloadGeneration};
use tappay_types::Timestamp;

proptest! {
    /// Any recipient/amount pair survives a tag round trip unchanged,
    /// including the amount's original formatting.
    #[test]
    fn codec_roundtrip(recipient in "\\PC{1,64}", amount in "\\PC{1,32}", ts in 0u64..u64::MAX / 2) {
        let bytes = encode_at(&recipient, &amount, Timestamp::new(ts)).unwrap();
        let outcome = decode(&bytes);
        prop_assert_eq!(outcome.generation(), Some(PayloadGeneration::Json));
        let req = outcome.into_request().unwrap();
        prop_assert_eq!(req.recipient, recipient);
        prop_assert_eq!(req.amount, amount);
        prop_assert_eq!(req.timestamp, Some(Timestamp::new(ts)));
    }

    /// Legacy payloads with a colon-free recipient decode to the same pair,
    /// including when a tag carries the bare text without NDEF framing.
    #[test]
    fn legacy_roundtrip(recipient in "0x[0-9a-fA-F]{40}", amount in "[0-9]{1,6}\\.[0-9]{1,6}") {
        let text = format!("{recipient}:{amount}");
        prop_assert_eq!(decode(text.as_bytes()), decode_text(&text));
        let outcome = decode_text(&text);
        let req = match outcome {
            DecodeOutcome::Legacy(req) => req,
            other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
        };
        prop_assert_eq!(req.recipient, recipient);
        prop_assert_eq!(req.amount, amount);
        prop_assert_eq!(req.timestamp, None);
    }

    /// Text without a colon that is not JSON never decodes.
    #[test]
    fn colon_free_text_unrecognized(text in "[a-zA-Z ]{0,40}") {
        prop_assert_eq!(decode_text(&text), DecodeOutcome::Unrecognized);
    }

    /// Arbitrary bytes never panic the decoder.
    #[test]
    fn decode_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode(&bytes);
    }

    /// Text records of any length survive NDEF framing.
    #[test]
    fn ndef_text_roundtrip(text in "\\PC{0,400}") {
        let bytes = encode_message(&[NdefRecord::text(&text, "en").unwrap()]).unwrap();
        let records = parse_message(&bytes).unwrap();
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(records[0].text_content().unwrap(), text);
    }
}
