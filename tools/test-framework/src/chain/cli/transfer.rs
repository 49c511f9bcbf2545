/*!
   Methods for performing IBC token transfer on a chain.
*/

use crate::chain::cli::query::node_args;
use crate::chain::exec::{exec_with_timeout, TX_TIMEOUT};
use crate::error::Error;

/// Relative packet timeout of ten minutes, in nanoseconds.
pub const PACKET_TIMEOUT_TIMESTAMP: &str = "600000000000";

/**
   Submit an ICS-20 transfer from `sender` on the chain to `recipient` on
   the counterparty, over `src_port`/`src_channel`.

   The packet only carries a timestamp timeout. Gas is simulated and
   adjusted by 1.3, and the command returns as soon as the transaction
   has passed `CheckTx`.
*/
pub fn transfer_from_chain(
    chain_id: &str,
    command_path: &str,
    home_path: Option<&str>,
    rpc_address: &str,
    sender: &str,
    src_port: &str,
    src_channel: &str,
    recipient: &str,
    token: &str,
    keyring_backend: &str,
    gas_prices: &str,
) -> Result<(), Error> {
    let mut args = Vec::new();

    if let Some(home_path) = home_path {
        args.extend(["--home", home_path]);
    }

    args.extend([
        "tx",
        "ibc-transfer",
        "transfer",
        src_port,
        src_channel,
        recipient,
        token,
        "--from",
        sender,
        "--chain-id",
        chain_id,
        "--keyring-backend",
        keyring_backend,
        "--gas",
        "auto",
        "--gas-adjustment",
        "1.3",
        "--broadcast-mode",
        "sync",
        "--yes",
        "--packet-timeout-height",
        "0-0",
        "--packet-timeout-timestamp",
        PACKET_TIMEOUT_TIMESTAMP,
    ]);

    if !gas_prices.is_empty() {
        args.extend(["--gas-prices", gas_prices]);
    }

    args.extend(node_args(rpc_address));

    exec_with_timeout(chain_id, command_path, &args, TX_TIMEOUT)?;

    Ok(())
}
