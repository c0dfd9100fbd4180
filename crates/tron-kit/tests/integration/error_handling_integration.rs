//! Transport behavior: retries, in-band node errors and configuration.

use std::time::Duration;

use mockito::Server;
use serde_json::json;
use tron_kit::*;

use crate::common::*;

fn fast_retries(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        initial_delay_ms: 10,
        max_delay_ms: 20,
    }
}

#[tokio::test]
async fn test_api_key_header_is_sent() {
    let mut server = Server::new_async().await;
    let block = server
        .mock("POST", "/wallet/getnowblock")
        .match_header(client::API_KEY_HEADER, "test-api-key")
        .with_status(200)
        .with_body(now_block_json().to_string())
        .expect(1)
        .create_async()
        .await;

    init_tracing();
    let tron = Tron::custom(server.url())
        .api_key("test-api-key")
        .retry_config(RetryConfig::none())
        .build();
    tron.now_block().await.unwrap();
    block.assert_async().await;
}

#[tokio::test]
async fn test_retries_on_service_unavailable() {
    let mut server = Server::new_async().await;
    let unavailable = server
        .mock("POST", "/wallet/getnowblock")
        .with_status(503)
        .with_body("try again")
        .expect(2)
        .create_async()
        .await;
    let ok = server
        .mock("POST", "/wallet/getnowblock")
        .with_status(200)
        .with_body(now_block_json().to_string())
        .expect(1)
        .create_async()
        .await;

    init_tracing();
    let tron = Tron::custom(server.url())
        .retry_config(fast_retries(3))
        .build();
    let block = tron.now_block().await.unwrap();

    unavailable.assert_async().await;
    ok.assert_async().await;
    assert_eq!(block.number(), BLOCK_NUMBER);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mut server = Server::new_async().await;
    let bad_request = server
        .mock("POST", "/wallet/getnowblock")
        .with_status(400)
        .with_body("bad request")
        .expect(1)
        .create_async()
        .await;

    init_tracing();
    let tron = Tron::custom(server.url())
        .retry_config(fast_retries(3))
        .build();
    let err = tron.now_block().await.unwrap_err();

    bad_request.assert_async().await;
    match err {
        Error::Rpc(e) => {
            assert!(!e.is_retryable());
            assert!(matches!(
                e,
                RpcError::Network {
                    status_code: Some(400),
                    ..
                }
            ));
        }
        other => panic!("expected an RPC error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_busy_is_retried_then_surfaced() {
    let mut server = Server::new_async().await;
    let busy = server
        .mock("POST", "/wallet/getaccount")
        .with_status(200)
        .with_body(json!({ "Error": "Server busy" }).to_string())
        .expect(3)
        .create_async()
        .await;

    init_tracing();
    let tron = Tron::custom(server.url())
        .retry_config(fast_retries(2))
        .build();
    let err = tron.account(SENDER).await.unwrap_err();

    busy.assert_async().await;
    assert!(matches!(err, Error::Rpc(RpcError::ServerBusy(_))));
}

#[tokio::test]
async fn test_hex_encoded_node_error_is_decoded() {
    let mut server = Server::new_async().await;
    let _block = mock_json(
        &mut server,
        "getnowblock",
        &json!({ "Error": hex::encode("something went wrong") }),
    )
    .await;

    let tron = client(&server);
    let err = tron.now_block().await.unwrap_err();
    match err {
        Error::Rpc(RpcError::Node { message }) => assert_eq!(message, "something went wrong"),
        other => panic!("expected a node error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_json_is_an_error() {
    let mut server = Server::new_async().await;
    let _block = server
        .mock("POST", "/wallet/getnowblock")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let tron = client(&server);
    let err = tron.now_block().await.unwrap_err();
    assert!(matches!(err, Error::Rpc(RpcError::Json(_))));
}

#[tokio::test]
async fn test_connection_refused_is_a_transport_error() {
    init_tracing();
    let tron = Tron::custom("http://127.0.0.1:9")
        .private_key(SENDER_KEY)
        .unwrap()
        .retry_config(RetryConfig::none())
        .timeout(Duration::from_secs(2))
        .build();

    let err = tron.transfer(RECEIVER, "1 TRX").await.unwrap_err();
    match err {
        Error::Rpc(e) => assert!(e.is_retryable()),
        other => panic!("expected a transport error, got {:?}", other),
    }
}

#[test]
fn test_error_messages() {
    let err = Error::BroadcastRejected {
        code: ResponseCode::ContractValidateError,
        message: "balance is not sufficient".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Bad transaction: CONTRACT_VALIDATE_ERROR: balance is not sufficient"
    );

    let err = Error::ConfirmationTimeout {
        hash: TxHash::ZERO,
        waited_secs: 10,
        last_error: None,
    };
    assert!(err.to_string().contains("after 10 seconds"));
}
