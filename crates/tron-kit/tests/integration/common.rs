//! Shared fixtures for the mock-node tests.

use std::sync::Once;
use std::time::Duration;

use mockito::{Mock, ServerGuard};
use serde_json::{Value, json};
use tron_kit::*;

pub const SENDER_KEY: &str = "68596c63d7230acc0916245c0b419978c831051d83ea46f3611a23d91a0c2b34";
pub const SENDER: &str = "TRZar2KkBCxJw3kPHScNUf11bHPV7gj67r";
pub const SENDER_HEX: &str = "41ab0a439b8bf6386546d79e67f14006df7a73047b";
pub const RECEIVER: &str = "TYd8oTYpaE7YJR4sS7HT8tRzAFUG8RqwxD";
pub const RECEIVER_HEX: &str = "41f87f115b6b9f24e849821cac1503fc814368b718";

/// Block 0x01234567, id bytes 00 01 .. 1f.
pub const BLOCK_NUMBER: i64 = 0x0123_4567;
pub const BLOCK_ID: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

static INIT: Once = Once::new();

/// Install a log subscriber once per test binary.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A client with the sender's key pointed at the mock server, no retries.
pub fn client(server: &ServerGuard) -> Tron {
    init_tracing();
    Tron::custom(server.url())
        .private_key(SENDER_KEY)
        .unwrap()
        .retry_config(RetryConfig::none())
        .timeout(Duration::from_secs(5))
        .build()
}

pub fn now_block_json() -> Value {
    json!({
        "blockID": BLOCK_ID,
        "block_header": {
            "raw_data": {
                "number": BLOCK_NUMBER,
                "timestamp": 1_700_000_000_000i64,
                "parentHash": "00000000012345669f2c8f1a4c0e6f3f1f7a6f6a8c1b1f5f0d3c2b1a09080706",
                "witness_address": "41f87f115b6b9f24e849821cac1503fc814368b718",
                "version": 30
            },
            "witness_signature": "00"
        }
    })
}

/// Serve `body` on `POST /wallet/<method>`.
pub async fn mock_json(server: &mut ServerGuard, method: &str, body: &Value) -> Mock {
    server
        .mock("POST", format!("/wallet/{}", method).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

pub async fn mock_now_block(server: &mut ServerGuard) -> Mock {
    mock_json(server, "getnowblock", &now_block_json()).await
}

pub fn broadcast_ok() -> Value {
    json!({ "result": true, "code": "SUCCESS", "txid": BLOCK_ID })
}

/// Transaction info the node returns once the transfer is in a block.
pub fn transaction_info(hash: &str) -> Value {
    json!({
        "id": hash,
        "fee": 1_100_000,
        "blockNumber": BLOCK_NUMBER + 2,
        "blockTimeStamp": 1_700_000_006_000i64,
        "contractResult": [""],
        "receipt": { "net_usage": 268 }
    })
}
