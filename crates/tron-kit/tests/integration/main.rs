//! Integration tests for tron-kit.
//!
//! These tests run the public API against a mock full node served by
//! `mockito`, so they need no network access.
//!
//! Run with: `cargo test --test integration`
//! Add `RUST_LOG=tron_kit=debug` to see the client's logs.

mod common;
mod error_handling_integration;
mod query_integration;
mod transfer_integration;
