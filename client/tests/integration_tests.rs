//! Integration tests exercising the full payment flow:
//! compose → encode → tag write → tag read → decode → submit.
//!
//! The facade is wired to the nullable radio and the mock gateway, so
//! the real codec and session state machine run end to end.

use std::sync::Arc;
use std::time::Duration;

use tappay_client::{ClientConfig, ClientError, PaymentClient, RadioMode};
use tappay_gateway::{GatewayError, MockGateway};
use tappay_nullables::{NullClock, NullRadio};
use tappay_protocol::ndef::{self, NdefRecord};
use tappay_protocol::PayloadGeneration;
use tappay_transport::{TagTransport, TransportError, TransportState};
use tappay_types::{to_base_units, PaymentRequest, Timestamp, TxHash};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const RECIPIENT: &str = "0x1234567890123456789012345678901234567890";
const NOW_MILLIS: u64 = 1_705_314_600_000;

struct Harness {
    radio: Arc<NullRadio>,
    gateway: Arc<MockGateway>,
    client: PaymentClient,
}

fn harness() -> Harness {
    let radio = Arc::new(NullRadio::new());
    let gateway = Arc::new(MockGateway::instant().with_fixed_hash(TxHash::new([0xab; 32])));
    let client = PaymentClient::new(TagTransport::new(radio.clone()), gateway.clone())
        .with_clock(Arc::new(NullClock::new(NOW_MILLIS)));
    Harness {
        radio,
        gateway,
        client,
    }
}

fn text_tag(text: &str) -> Vec<u8> {
    ndef::encode_message(&[NdefRecord::text(text, "en").unwrap()]).unwrap()
}

// ---------------------------------------------------------------------------
// Flows
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tap_to_pay_end_to_end() {
    let h = harness();

    let written = h.client.compose_and_write(RECIPIENT, "2.5").await.unwrap();
    assert_eq!(written.timestamp, Some(Timestamp::new(NOW_MILLIS)));
    assert_eq!(h.client.transport().state(), TransportState::Ready);

    let receipt = h.client.read_and_submit().await.unwrap();
    assert_eq!(receipt.request, written);
    assert_eq!(receipt.generation, PayloadGeneration::Json);
    assert_eq!(receipt.hash, TxHash::new([0xab; 32]));

    let submissions = h.gateway.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].0.as_str(), RECIPIENT);
    assert_eq!(submissions[0].1, to_base_units("2.5").unwrap());

    let counters = h.radio.counters();
    assert_eq!(counters.starts, 1);
    assert_eq!(counters.requests, 2);
    assert_eq!(counters.releases, 2);
}

#[tokio::test]
async fn legacy_tag_is_still_paid() {
    let h = harness();
    h.radio.set_tag(Some(text_tag(&format!("{RECIPIENT}:0.75"))));

    let receipt = h.client.read_and_submit().await.unwrap();
    assert_eq!(receipt.generation, PayloadGeneration::Legacy);
    assert_eq!(receipt.request, PaymentRequest::new(RECIPIENT, "0.75"));
}

#[tokio::test]
async fn garbage_tag_is_unrecognized_not_submitted() {
    let h = harness();
    h.radio.set_tag(Some(text_tag("garbage")));

    assert_eq!(h.client.read_nfc_data().await.unwrap(), None);
    let err = h.client.read_and_submit().await.unwrap_err();
    assert!(matches!(err, ClientError::UnrecognizedPayload));
    assert!(h.gateway.submissions().is_empty());
    assert_eq!(h.radio.counters().releases, 2);
}

#[tokio::test]
async fn tag_with_bad_recipient_fails_validation_at_submit() {
    let h = harness();
    h.client.write_nfc_data("not-an-address", "1").await.unwrap();

    let request = h.client.read_nfc_data().await.unwrap().unwrap();
    assert_eq!(request.recipient, "not-an-address");

    let err = h.client.read_and_submit().await.unwrap_err();
    assert!(matches!(err, ClientError::Gateway(GatewayError::Validation(_))));
    assert!(err.is_user_correctable());
    assert!(h.gateway.submissions().is_empty());
}

#[tokio::test]
async fn disabled_nfc_blocks_send_flow() {
    let h = harness();
    h.radio.set_enabled(false);

    assert!(!h.client.initialize_nfc().await.unwrap());
    let err = h.client.compose_and_write(RECIPIENT, "1").await.unwrap_err();
    assert!(matches!(err, ClientError::NfcUnavailable));
    assert_eq!(h.radio.counters().writes, 0);
}

#[tokio::test]
async fn write_failure_is_retryable_and_released() {
    let h = harness();
    h.radio.fail_write(true);

    let err = h.client.compose_and_write(RECIPIENT, "1").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(TransportError::Stack(_))));
    assert!(err.is_retryable());
    assert_eq!(h.radio.counters().releases, 1);

    h.radio.fail_write(false);
    h.client.compose_and_write(RECIPIENT, "1").await.unwrap();
}

#[tokio::test]
async fn no_tag_within_timeout() {
    let radio = Arc::new(NullRadio::new());
    radio.set_request_delay(Duration::from_secs(5));
    let transport =
        TagTransport::new(radio.clone()).with_acquire_timeout(Duration::from_millis(30));
    let client = PaymentClient::new(transport, Arc::new(MockGateway::instant()));

    let err = client.read_and_submit().await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Transport(TransportError::AcquireTimeout(_))
    ));
    assert_eq!(radio.counters().releases, 1);
}

#[tokio::test]
async fn cleanup_returns_to_idle() {
    let h = harness();
    assert!(h.client.initialize_nfc().await.unwrap());
    h.client.cleanup_nfc().await;
    assert_eq!(h.client.transport().state(), TransportState::Idle);
    assert_eq!(h.radio.counters().stops, 1);
}

// ---------------------------------------------------------------------------
// Account queries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn balance_and_history() {
    let h = harness();
    assert_eq!(h.client.get_balance(RECIPIENT).await.unwrap(), "10.5");

    let history = h.client.get_transaction_history().await.unwrap();
    assert_eq!(history.len(), 5);
    assert!(history[0].timestamp > history[4].timestamp);
}

#[tokio::test]
async fn direct_send_payment() {
    let h = harness();
    let hash = h.client.send_payment(RECIPIENT, "1.25").await.unwrap();
    assert_eq!(hash, TxHash::new([0xab; 32]));
    assert!(h.client.send_payment(RECIPIENT, "1e3").await.is_err());
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn client_from_default_config_runs_simulated_flow() {
    let config = ClientConfig {
        mock_submit_delay_ms: 0,
        mock_history_delay_ms: 0,
        ..Default::default()
    };
    let client = PaymentClient::from_config(&config).unwrap();
    client.compose_and_write(RECIPIENT, "3").await.unwrap();
    let receipt = client.read_and_submit().await.unwrap();
    assert_eq!(receipt.request.amount, "3");
    assert_eq!(receipt.hash.to_string().len(), 66);
}

#[tokio::test]
async fn unsupported_radio_from_config() {
    let config = ClientConfig {
        radio: RadioMode::Unsupported,
        ..Default::default()
    };
    let client = PaymentClient::from_config(&config).unwrap();
    assert!(!client.initialize_nfc().await.unwrap());
    assert!(matches!(
        client.read_nfc_data().await,
        Err(ClientError::Transport(TransportError::UnsupportedPlatform))
    ));
}
