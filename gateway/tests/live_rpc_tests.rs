//! Live gateway against an in-process fake JSON-RPC node.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tappay_gateway::{
    abi, ChainGateway, GatewayError, LiveGateway, LiveSettings, DEFAULT_GAS_LIMIT,
    DEFAULT_GAS_PRICE_WEI,
};
use tappay_types::{Address, PrivateKey, TxHash};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const CONTRACT: &str = "0x1234567890123456789012345678901234567890";
const TOKEN: &str = "0xf194afdf50b03e69bd7d057c1aa9e10c9954e4c9";
const RECIPIENT: &str = "0x0987654321098765432109876543210987654321";
const NODE_HASH: &str = "0x5555555555555555555555555555555555555555555555555555555555555555";

type Calls = Arc<Mutex<Vec<Value>>>;

/// Serve canned answers keyed by method until the test ends.
async fn fake_node(answers: fn(&str) -> Value) -> (String, Calls) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let calls: Calls = Arc::default();
    let seen = Arc::clone(&calls);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let request = read_request(&mut socket).await;
            let body: Value = serde_json::from_slice(&request).unwrap();
            let method = body["method"].as_str().unwrap_or_default().to_string();
            let mut response = answers(&method);
            response["jsonrpc"] = json!("2.0");
            response["id"] = body["id"].clone();
            seen.lock().unwrap().push(body);

            let payload = response.to_string();
            let reply = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                payload.len(),
                payload
            );
            let _ = socket.write_all(reply.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    (url, calls)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= header_end + 4 + length {
            return buf[header_end + 4..header_end + 4 + length].to_vec();
        }
    }
    buf
}

fn settings(url: String) -> LiveSettings {
    LiveSettings {
        rpc_url: url,
        chain_id: 44787,
        payment_contract: Address::parse(CONTRACT).unwrap(),
        token_contract: Address::parse(TOKEN).unwrap(),
        signer: Some(PrivateKey::from_hex(&"46".repeat(32)).unwrap()),
        gas_limit: DEFAULT_GAS_LIMIT,
        gas_price_wei: DEFAULT_GAS_PRICE_WEI,
    }
}

fn happy_node(method: &str) -> Value {
    match method {
        "eth_getTransactionCount" => json!({ "result": "0x7" }),
        "eth_sendRawTransaction" => json!({ "result": NODE_HASH }),
        // 10.5 tokens
        "eth_call" => json!({
            "result": "0x00000000000000000000000000000000000000000000000091b77e5e5d9a0000"
        }),
        _ => json!({ "error": { "code": -32601, "message": "method not found" } }),
    }
}

fn rejecting_node(method: &str) -> Value {
    match method {
        "eth_getTransactionCount" => json!({ "result": "0x0" }),
        _ => json!({ "error": { "code": -32000, "message": "insufficient funds for gas" } }),
    }
}

#[tokio::test]
async fn submit_signs_and_relays_payment() {
    let (url, calls) = fake_node(happy_node).await;
    let gateway = LiveGateway::new(settings(url)).unwrap();

    let hash = gateway.submit(RECIPIENT, "2.5").await.unwrap();
    assert_eq!(hash, TxHash::from_hex(NODE_HASH).unwrap());

    let calls = calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0]["method"], "eth_getTransactionCount");
    assert_eq!(
        calls[0]["params"],
        json!(["0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f", "pending"])
    );

    assert_eq!(calls[1]["method"], "eth_sendRawTransaction");
    let raw = calls[1]["params"][0].as_str().unwrap();
    let calldata = abi::encode_send_payment(
        &Address::parse(RECIPIENT).unwrap(),
        tappay_types::to_base_units("2.5").unwrap(),
    );
    assert!(raw.starts_with("0xf8"));
    assert!(raw.contains(&hex::encode(calldata)));
    // nonce 7, gas price 1 gwei, gas 200000
    assert!(raw.contains("07843b9aca0083030d40"));
}

#[tokio::test]
async fn node_rejection_is_a_generic_submission_error() {
    let (url, _calls) = fake_node(rejecting_node).await;
    let gateway = LiveGateway::new(settings(url)).unwrap();
    let err = gateway.submit(RECIPIENT, "1").await.unwrap_err();
    assert!(matches!(err, GatewayError::Submission));
}

#[tokio::test]
async fn balance_is_read_from_token_contract() {
    let (url, calls) = fake_node(happy_node).await;
    let gateway = LiveGateway::new(settings(url)).unwrap();

    assert_eq!(gateway.balance_of(RECIPIENT).await.unwrap(), "10.5");

    let calls = calls.lock().unwrap().clone();
    assert_eq!(calls[0]["method"], "eth_call");
    assert_eq!(calls[0]["params"][0]["to"], TOKEN);
    assert_eq!(
        calls[0]["params"][0]["data"],
        "0x70a082310000000000000000000000000987654321098765432109876543210987654321"
    );
    assert_eq!(calls[0]["params"][1], "latest");
}
