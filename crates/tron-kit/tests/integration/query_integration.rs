//! Read-only queries against the mock node.

use mockito::{Matcher, Server};
use serde_json::json;
use tron_kit::*;

use crate::common::*;

#[tokio::test]
async fn test_account_and_balance() {
    let mut server = Server::new_async().await;
    let account = server
        .mock("POST", "/wallet/getaccount")
        .match_body(Matcher::Json(json!({ "address": SENDER_HEX })))
        .with_status(200)
        .with_body(
            json!({
                "address": SENDER_HEX,
                "balance": 12_345_678,
                "account_name": hex::encode("alice"),
                "create_time": 1_650_000_000_000i64,
                "latest_opration_time": 1_700_000_000_000i64,
                "free_net_usage": 17,
                "assetV2": [{ "key": "1002000", "value": 500 }]
            })
            .to_string(),
        )
        .expect(2)
        .create_async()
        .await;

    let tron = client(&server);
    let view = tron.account(SENDER).await.unwrap();
    assert_eq!(view.address.to_string(), SENDER);
    assert_eq!(view.balance, Trx::sun(12_345_678));
    assert_eq!(view.account_name, "alice");
    assert_eq!(view.latest_operation_time, 1_700_000_000_000);
    assert_eq!(view.asset_v2[0].key, "1002000");

    let balance = tron.balance(SENDER).await.unwrap();
    assert_eq!(balance.to_string(), "12.345678 TRX");
    account.assert_async().await;
}

#[tokio::test]
async fn test_unactivated_account_is_not_found() {
    let mut server = Server::new_async().await;
    let _account = mock_json(&mut server, "getaccount", &json!({})).await;

    let tron = client(&server);
    let err = tron.balance(RECEIVER).await.unwrap_err();
    match err {
        Error::Rpc(e @ RpcError::AccountNotFound(_)) => {
            assert!(e.is_account_not_found());
            if let RpcError::AccountNotFound(address) = e {
                assert_eq!(address.to_string(), RECEIVER);
            }
        }
        other => panic!("expected AccountNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_address_fails_before_request() {
    let mut server = Server::new_async().await;
    let account = server
        .mock("POST", "/wallet/getaccount")
        .expect(0)
        .create_async()
        .await;

    let tron = client(&server);
    let err = tron.account("TNotAnAddress").await.unwrap_err();
    assert!(matches!(err, Error::ParseAddress(_)));
    account.assert_async().await;
}

#[tokio::test]
async fn test_now_block() {
    let mut server = Server::new_async().await;
    let _block = mock_now_block(&mut server).await;

    let tron = client(&server);
    let block = tron.now_block().await.unwrap();
    assert_eq!(block.number(), BLOCK_NUMBER);
    assert_eq!(block.timestamp(), 1_700_000_000_000);
    assert_eq!(block.block_id.to_string(), BLOCK_ID);

    let block_ref = block.block_ref();
    assert_eq!(block_ref.bytes, [0x45, 0x67]);
    assert_eq!(block_ref.hash, [8, 9, 10, 11, 12, 13, 14, 15]);
}

#[tokio::test]
async fn test_block_by_number() {
    let mut server = Server::new_async().await;
    let block = server
        .mock("POST", "/wallet/getblockbynum")
        .match_body(Matcher::Json(json!({ "num": BLOCK_NUMBER })))
        .with_status(200)
        .with_body(now_block_json().to_string())
        .expect(1)
        .create_async()
        .await;

    let tron = client(&server);
    let view = tron.block(BLOCK_NUMBER).await.unwrap();
    block.assert_async().await;
    assert_eq!(view.number(), BLOCK_NUMBER);
    assert_eq!(view.block_ref().bytes, [0x45, 0x67]);
}

#[tokio::test]
async fn test_missing_block_is_invalid_response() {
    let mut server = Server::new_async().await;
    let _block = mock_json(&mut server, "getblockbynum", &json!({})).await;

    let tron = client(&server);
    let err = tron.block(i64::MAX).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Rpc(RpcError::InvalidResponse(ref m)) if m.contains("not found")
    ));
}

#[tokio::test]
async fn test_transaction_info_lookup() {
    let mut server = Server::new_async().await;
    let hash: TxHash = BLOCK_ID.parse().unwrap();
    let _info = server
        .mock("POST", "/wallet/gettransactioninfobyid")
        .match_body(Matcher::Json(json!({ "value": BLOCK_ID })))
        .with_status(200)
        .with_body(transaction_info(BLOCK_ID).to_string())
        .create_async()
        .await;

    let tron = client(&server);
    let info = tron.transaction_info(&hash).await.unwrap();
    assert_eq!(info.id, hash);
    assert!(info.is_success());
    assert_eq!(info.contract_result, vec![Vec::<u8>::new()]);
}

#[tokio::test]
async fn test_unknown_transaction_is_not_found() {
    let mut server = Server::new_async().await;
    let _info = mock_json(&mut server, "gettransactioninfobyid", &json!({})).await;

    let tron = client(&server);
    let err = tron.transaction_info(&TxHash::ZERO).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Rpc(RpcError::TransactionNotFound(hash)) if hash == TxHash::ZERO
    ));
}

#[tokio::test]
async fn test_list_witnesses_and_nodes() {
    let mut server = Server::new_async().await;
    let _witnesses = mock_json(
        &mut server,
        "listwitnesses",
        &json!({
            "witnesses": [{
                "address": RECEIVER_HEX,
                "voteCount": 1000,
                "url": "https://example.org",
                "totalProduced": 42,
                "totalMissed": 1,
                "latestBlockNum": BLOCK_NUMBER,
                "isJobs": true
            }]
        }),
    )
    .await;
    let _nodes = mock_json(
        &mut server,
        "listnodes",
        &json!({
            "nodes": [{ "address": { "host": hex::encode("10.0.0.1"), "port": 18888 } }]
        }),
    )
    .await;

    let tron = client(&server);
    let witnesses = tron.list_witnesses().await.unwrap().witnesses;
    assert_eq!(witnesses.len(), 1);
    assert_eq!(witnesses[0].address.to_string(), RECEIVER);
    assert_eq!(witnesses[0].vote_count, 1000);
    assert!(witnesses[0].is_jobs);

    let nodes = tron.list_nodes().await.unwrap().nodes;
    assert_eq!(nodes[0].address.to_string(), "10.0.0.1:18888");
}

#[tokio::test]
async fn test_empty_lists() {
    let mut server = Server::new_async().await;
    let _witnesses = mock_json(&mut server, "listwitnesses", &json!({})).await;
    let _assets = mock_json(&mut server, "getassetissuebyaccount", &json!({})).await;

    let tron = client(&server);
    assert!(tron.list_witnesses().await.unwrap().witnesses.is_empty());
    assert!(
        tron.asset_issue_by_account(SENDER)
            .await
            .unwrap()
            .asset_issue
            .is_empty()
    );
}

#[tokio::test]
async fn test_asset_issue_by_account() {
    let mut server = Server::new_async().await;
    let _assets = server
        .mock("POST", "/wallet/getassetissuebyaccount")
        .match_body(Matcher::Json(json!({ "address": SENDER_HEX })))
        .with_status(200)
        .with_body(
            json!({
                "assetIssue": [{
                    "id": "1002000",
                    "owner_address": SENDER_HEX,
                    "name": hex::encode("BitTorrent"),
                    "abbr": hex::encode("BTT"),
                    "total_supply": 990_000_000_000i64,
                    "precision": 6,
                    "trx_num": 1,
                    "num": 1,
                    "description": hex::encode("Official token"),
                    "url": hex::encode("www.bittorrent.com")
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let tron = client(&server);
    let assets = tron.asset_issue_by_account(SENDER).await.unwrap().asset_issue;
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].id, "1002000");
    assert_eq!(assets[0].name, "BitTorrent");
    assert_eq!(assets[0].abbr, "BTT");
    assert_eq!(assets[0].precision, 6);
}
