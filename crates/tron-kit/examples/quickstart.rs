//! Read-only tour of the client: latest block, an account and the witnesses.
//!
//! Run: cargo run --example quickstart

use tron_kit::*;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let tron = Tron::shasta().build();

    let block = tron.now_block().await?;
    println!("Latest block: #{} ({})", block.number(), block.block_id);

    let address = "TRZar2KkBCxJw3kPHScNUf11bHPV7gj67r";
    match tron.account(address).await {
        Ok(account) => println!("{} holds {}", address, account.balance),
        Err(Error::Rpc(RpcError::AccountNotFound(_))) => {
            println!("{} is not activated", address)
        }
        Err(e) => return Err(e),
    }

    let witnesses = tron.list_witnesses().await?.witnesses;
    println!("{} witnesses", witnesses.len());
    for witness in witnesses.iter().take(5) {
        println!("  {} {} votes", witness.address, witness.vote_count);
    }

    Ok(())
}
