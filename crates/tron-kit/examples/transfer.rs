//! Send TRX and wait for the receipt.
//!
//! Run: cargo run --example transfer -- <to-address> <amount>
//!
//! Environment variables:
//!   TRON_NETWORK     - mainnet, shasta, nile or a node URL (default: shasta)
//!   TRON_PRIVATE_KEY - hex private key of the sender
//!   TRON_API_KEY     - optional TronGrid API key
//!   RUST_LOG         - e.g. tron_kit=debug to see every RPC call

use tron_kit::*;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(to), Some(amount)) = (args.next(), args.next()) else {
        eprintln!("usage: transfer <to-address> <amount, e.g. '1.5 TRX'>");
        std::process::exit(2);
    };

    let tron = Tron::from_env()?;
    let Some(from) = tron.address().copied() else {
        eprintln!("TRON_PRIVATE_KEY is not set");
        std::process::exit(2);
    };

    println!("Network: {} ({})", tron.network(), tron.rpc_url());
    println!("Sender:  {} ({})", from, tron.balance(from).await?);

    let outcome = tron.transfer(&to, amount).wait_for_confirmation(30).await?;
    println!("Sent:    {}", outcome.hash);

    match (outcome.receipt.as_ref(), outcome.receipt_error()) {
        (_, Some(failure)) => println!("Failed:  {}", failure.message),
        (Some(receipt), None) => println!(
            "Included in block {} (fee {})",
            receipt.block_number, receipt.fee
        ),
        (None, None) => println!("Broadcast, not confirmed"),
    }

    Ok(())
}
