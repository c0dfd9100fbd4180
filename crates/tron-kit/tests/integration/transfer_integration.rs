//! TRX transfers end to end: build, sign, broadcast, confirm.

use std::time::Duration;

use mockito::{Matcher, Server};
use serde_json::json;
use tron_kit::*;

use crate::common::*;

const INFO_ID: &str = "0a14dbd718b2b87147382a92d243f6ed4436223be6536791e3ae04e7a75407c9";

// =============================================================================
// Happy path
// =============================================================================

#[tokio::test]
async fn test_transfer_broadcasts_signed_transaction() {
    let mut server = Server::new_async().await;
    let block = mock_now_block(&mut server).await;
    let broadcast = server
        .mock("POST", "/wallet/broadcasthex")
        .match_body(Matcher::Regex(r#""transaction"\s*:\s*"0a"#.into()))
        .with_status(200)
        .with_body(broadcast_ok().to_string())
        .expect(1)
        .create_async()
        .await;
    let info = server
        .mock("POST", "/wallet/gettransactioninfobyid")
        .expect(0)
        .create_async()
        .await;

    let tron = client(&server);
    let outcome = tron.transfer(RECEIVER, "1 TRX").await.unwrap();

    block.assert_async().await;
    broadcast.assert_async().await;
    info.assert_async().await;

    assert!(outcome.is_broadcast());
    assert!(!outcome.is_confirmed());
    assert_eq!(outcome.hash, outcome.transaction.hash());

    let tx = &outcome.transaction;
    let raw = tx.raw_data();
    assert_eq!(raw.ref_block_bytes, vec![0x45, 0x67]);
    assert_eq!(raw.ref_block_hash, vec![8, 9, 10, 11, 12, 13, 14, 15]);
    assert_eq!(raw.fee_limit, DEFAULT_FEE_LIMIT.as_sun());
    assert_eq!(raw.expiration - raw.timestamp, 600_000);

    let contract = tx.transfer_contract().unwrap();
    assert_eq!(hex::encode(&contract.owner_address), SENDER_HEX);
    assert_eq!(hex::encode(&contract.to_address), RECEIVER_HEX);
    assert_eq!(contract.amount, 1_000_000);

    assert_eq!(tx.signatures().len(), 1);
    let signer = tx.signatures()[0].recover(&tx.hash()).unwrap();
    assert_eq!(signer.address().to_string(), SENDER);
}

#[tokio::test]
async fn test_transfer_waits_for_confirmation() {
    let mut server = Server::new_async().await;
    let _block = mock_now_block(&mut server).await;
    let _broadcast = mock_json(&mut server, "broadcasthex", &broadcast_ok()).await;
    // Not in a block for the first two polls.
    let pending = server
        .mock("POST", "/wallet/gettransactioninfobyid")
        .with_status(200)
        .with_body("{}")
        .expect(2)
        .create_async()
        .await;

    let tron = client(&server);
    let handle = tokio::spawn({
        let tron = tron.clone();
        async move {
            tron.transfer(RECEIVER, Trx::sun(2_500_000))
                .memo("invoice 42")
                .wait_for_confirmation(10)
                .poll_interval(Duration::from_millis(50))
                .await
        }
    });

    // Let the first polls miss, then make the receipt appear.
    tokio::time::sleep(Duration::from_millis(75)).await;
    pending.remove_async().await;
    let _found = mock_json(&mut server, "gettransactioninfobyid", &transaction_info(INFO_ID)).await;

    let outcome = handle.await.unwrap().unwrap();
    assert!(outcome.is_confirmed());
    assert!(outcome.receipt_error().is_none());

    let receipt = outcome.receipt.as_ref().unwrap();
    assert_eq!(receipt.fee, Trx::sun(1_100_000));
    assert_eq!(receipt.block_number, BLOCK_NUMBER + 2);
    assert_eq!(receipt.receipt.net_usage, 268);
    assert_eq!(outcome.transaction.memo(), Some("invoice 42"));
    assert!(outcome.into_result().is_ok());
}

#[tokio::test]
async fn test_dry_run_signs_without_broadcasting() {
    let mut server = Server::new_async().await;
    let _block = mock_now_block(&mut server).await;
    let broadcast = server
        .mock("POST", "/wallet/broadcasthex")
        .expect(0)
        .create_async()
        .await;

    let tron = client(&server);
    let outcome = tron
        .transfer(RECEIVER, "0.5 TRX")
        .dry_run()
        .wait_for_confirmation(5)
        .await
        .unwrap();

    broadcast.assert_async().await;
    assert!(outcome.result.is_none());
    assert!(outcome.receipt.is_none());
    assert!(outcome.transaction.is_signed());
}

#[tokio::test]
async fn test_build_returns_unsigned_transaction() {
    let mut server = Server::new_async().await;
    let _block = mock_now_block(&mut server).await;

    let tron = client(&server);
    let tx = tron
        .transfer(RECEIVER, "3 TRX")
        .fee_limit("5 TRX")
        .expiration(Duration::from_secs(60))
        .build()
        .await
        .unwrap();

    assert!(!tx.is_signed());
    assert_eq!(tx.raw_data().fee_limit, 5_000_000);
    assert_eq!(tx.raw_data().expiration - tx.raw_data().timestamp, 60_000);
    assert_eq!(tx.transfer_contract().unwrap().amount, 3_000_000);
}

#[tokio::test]
async fn test_sign_with_overrides_client_signer() {
    let mut server = Server::new_async().await;
    let _block = mock_now_block(&mut server).await;
    let _broadcast = mock_json(&mut server, "broadcasthex", &broadcast_ok()).await;

    let other = InMemorySigner::from_secret_key(SecretKey::generate());
    let other_address = *other.address();

    let tron = client(&server);
    let outcome = tron.transfer(RECEIVER, "1 TRX").sign_with(other).await.unwrap();

    let tx = &outcome.transaction;
    let contract = tx.transfer_contract().unwrap();
    assert_eq!(contract.owner_address, other_address.to_vec());
    let signer = tx.signatures()[0].recover(&tx.hash()).unwrap();
    assert_eq!(signer.address(), other_address);
}

// =============================================================================
// Failures, in lifecycle order
// =============================================================================

#[tokio::test]
async fn test_broadcast_rejection_is_not_a_transport_error() {
    let mut server = Server::new_async().await;
    let _block = mock_now_block(&mut server).await;
    // "Validate signature error" hex-encoded, as the node sends it.
    let _broadcast = mock_json(
        &mut server,
        "broadcasthex",
        &json!({
            "result": false,
            "code": "SIGERROR",
            "message": hex::encode("Validate signature error"),
        }),
    )
    .await;
    let info = server
        .mock("POST", "/wallet/gettransactioninfobyid")
        .expect(0)
        .create_async()
        .await;

    let tron = client(&server);
    let err = tron
        .transfer(RECEIVER, "1 TRX")
        .wait_for_confirmation(3)
        .await
        .unwrap_err();

    info.assert_async().await;
    match err {
        Error::BroadcastRejected { code, message } => {
            assert_eq!(code, ResponseCode::SigError);
            assert_eq!(code.code(), 1);
            assert_eq!(message, "Validate signature error");
        }
        other => panic!("expected BroadcastRejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_receipt_failure_is_reported_separately() {
    let mut server = Server::new_async().await;
    let _block = mock_now_block(&mut server).await;
    let _broadcast = mock_json(&mut server, "broadcasthex", &broadcast_ok()).await;
    let _info = mock_json(
        &mut server,
        "gettransactioninfobyid",
        &json!({
            "id": INFO_ID,
            "blockNumber": BLOCK_NUMBER + 1,
            "receipt": { "result": "REVERT" },
            "result": "FAILED",
            "resMessage": hex::encode("REVERT opcode executed"),
        }),
    )
    .await;

    let tron = client(&server);
    let outcome = tron
        .transfer(RECEIVER, "1 TRX")
        .wait_for_confirmation(3)
        .poll_interval(Duration::from_millis(10))
        .await
        .unwrap();

    assert!(outcome.is_confirmed());
    let failure = outcome.receipt_error().unwrap();
    assert_eq!(failure.hash, outcome.hash);
    assert_eq!(failure.message, "REVERT opcode executed");

    match outcome.into_result() {
        Err(Error::TransactionFailed(e)) => assert_eq!(e.message, "REVERT opcode executed"),
        other => panic!("expected TransactionFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_confirmation_timeout() {
    let mut server = Server::new_async().await;
    let _block = mock_now_block(&mut server).await;
    let _broadcast = mock_json(&mut server, "broadcasthex", &broadcast_ok()).await;
    let info = server
        .mock("POST", "/wallet/gettransactioninfobyid")
        .with_status(200)
        .with_body("{}")
        .expect(3)
        .create_async()
        .await;

    let tron = client(&server);
    let err = tron
        .transfer(RECEIVER, "1 TRX")
        .wait_for_confirmation(2)
        .poll_interval(Duration::from_millis(10))
        .await
        .unwrap_err();

    info.assert_async().await;
    assert!(matches!(
        err,
        Error::ConfirmationTimeout {
            waited_secs: 2,
            last_error: None,
            ..
        }
    ));
}

#[tokio::test]
async fn test_transport_error_stops_before_broadcast() {
    let mut server = Server::new_async().await;
    let block = server
        .mock("POST", "/wallet/getnowblock")
        .with_status(502)
        .with_body("bad gateway")
        .expect(1)
        .create_async()
        .await;
    let broadcast = server
        .mock("POST", "/wallet/broadcasthex")
        .expect(0)
        .create_async()
        .await;

    let tron = client(&server);
    let err = tron.transfer(RECEIVER, "1 TRX").await.unwrap_err();

    block.assert_async().await;
    broadcast.assert_async().await;
    match err {
        Error::Rpc(RpcError::Network {
            status_code,
            retryable,
            ..
        }) => {
            assert_eq!(status_code, Some(502));
            assert!(retryable);
        }
        other => panic!("expected a network error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_confirmation_polls_through_node_error() {
    let mut server = Server::new_async().await;
    let _block = mock_now_block(&mut server).await;
    let _broadcast = mock_json(&mut server, "broadcasthex", &broadcast_ok()).await;
    // The first lookup fails in-band, the next one finds the receipt.
    let failing = server
        .mock("POST", "/wallet/gettransactioninfobyid")
        .with_status(200)
        .with_body(json!({ "Error": "class java.lang.NullPointerException : null" }).to_string())
        .expect(1)
        .create_async()
        .await;
    let found = server
        .mock("POST", "/wallet/gettransactioninfobyid")
        .with_status(200)
        .with_body(transaction_info(INFO_ID).to_string())
        .expect(1)
        .create_async()
        .await;

    let tron = client(&server);
    let outcome = tron
        .transfer(RECEIVER, "1 TRX")
        .wait_for_confirmation(10)
        .poll_interval(Duration::from_millis(50))
        .await
        .unwrap();

    failing.assert_async().await;
    found.assert_async().await;
    assert!(outcome.is_broadcast());
    assert!(outcome.is_confirmed());
    assert!(outcome.receipt_error().is_none());
}

#[tokio::test]
async fn test_confirmation_timeout_carries_last_lookup_error() {
    let mut server = Server::new_async().await;
    let _block = mock_now_block(&mut server).await;
    let _broadcast = mock_json(&mut server, "broadcasthex", &broadcast_ok()).await;
    let info = server
        .mock("POST", "/wallet/gettransactioninfobyid")
        .with_status(200)
        .with_body(json!({ "Error": "class java.lang.NullPointerException : null" }).to_string())
        .expect(2)
        .create_async()
        .await;

    let tron = client(&server);
    let err = tron
        .transfer(RECEIVER, "1 TRX")
        .wait_for_confirmation(1)
        .poll_interval(Duration::from_millis(10))
        .await
        .unwrap_err();

    info.assert_async().await;
    match err {
        Error::ConfirmationTimeout {
            waited_secs,
            last_error,
            ..
        } => {
            assert_eq!(waited_secs, 1);
            assert!(last_error.unwrap().contains("NullPointerException"));
        }
        other => panic!("expected ConfirmationTimeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_busy_node_rejection_is_transient() {
    let mut server = Server::new_async().await;
    let _block = mock_now_block(&mut server).await;
    let _broadcast = mock_json(
        &mut server,
        "broadcasthex",
        &json!({ "code": "SERVER_BUSY", "message": hex::encode("Server busy") }),
    )
    .await;

    let tron = client(&server);
    let err = tron.transfer(RECEIVER, "1 TRX").await.unwrap_err();
    assert!(matches!(
        err,
        Error::BroadcastRejected {
            code: ResponseCode::ServerBusy,
            ..
        }
    ));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_transfer_without_signer() {
    let server = Server::new_async().await;
    let tron = Tron::custom(server.url()).build();
    let err = tron.transfer(RECEIVER, "1 TRX").await.unwrap_err();
    assert!(matches!(err, Error::NoSigner));
}
