/*!
   Implementation of [`ChainDriver`].
*/

use crate::chain::cli::query::{
    query_balance, query_channel_client_state, query_channels, query_client_status,
    query_connections,
};
use crate::chain::cli::transfer::transfer_from_chain;
use crate::error::Error;
use crate::ibc::channel::Channel;
use crate::ibc::client::ChannelClientState;
use crate::ibc::connection::Connection;
use crate::ibc::token::Token;
use crate::types::config::ChainConfig;

/**
    A driver for interacting with a running chain full node through its
    command line binary.

    The name `ChainDriver` is inspired by
    [WebDriver](https://developer.mozilla.org/en-US/docs/Web/WebDriver).
    Unlike a test harness that spawns its own chains, the nodes here are
    already running as part of the devnet; the driver only issues
    queries and transactions against them.

    All queries are read-only, so issuing them repeatedly against an
    unchanged chain returns identical results.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainDriver {
    /**
       The filesystem path to the chain CLI, e.g. `lumerad`.
    */
    pub command_path: String,

    pub chain_id: String,

    /**
       The RPC address passed as `--node`. Left empty to use the CLI's
       own client config.
    */
    pub rpc_address: String,

    /**
       The home directory holding the keyring. Left unset to use the
       CLI default.
    */
    pub home_path: Option<String>,

    pub keyring_backend: String,

    pub gas_prices: String,
}

impl ChainDriver {
    pub fn from_config(config: &ChainConfig) -> Self {
        Self {
            command_path: config.command_path.clone(),
            chain_id: config.chain_id.clone(),
            rpc_address: config.rpc_address.clone(),
            home_path: config.home_path.clone(),
            keyring_backend: config.keyring_backend.clone(),
            gas_prices: config.gas_prices.clone(),
        }
    }

    pub fn query_channels(&self) -> Result<Vec<Channel>, Error> {
        query_channels(&self.chain_id, &self.command_path, &self.rpc_address)
    }

    pub fn query_connections(&self) -> Result<Vec<Connection>, Error> {
        query_connections(&self.chain_id, &self.command_path, &self.rpc_address)
    }

    pub fn query_client_status(&self, client_id: &str) -> Result<String, Error> {
        query_client_status(
            &self.chain_id,
            &self.command_path,
            &self.rpc_address,
            client_id,
        )
    }

    pub fn query_channel_client_state(
        &self,
        port_id: &str,
        channel_id: &str,
    ) -> Result<ChannelClientState, Error> {
        query_channel_client_state(
            &self.chain_id,
            &self.command_path,
            &self.rpc_address,
            port_id,
            channel_id,
        )
    }

    /**
       Query for the balance of a wallet address in the given denomination.
    */
    pub fn query_balance(&self, wallet_id: &str, denom: &str) -> Result<u128, Error> {
        query_balance(
            &self.chain_id,
            &self.command_path,
            &self.rpc_address,
            wallet_id,
            denom,
        )
    }

    /**
       Submit an IBC token transfer of `token` from the `sender` key to
       `recipient` on the counterparty chain.
    */
    pub fn ibc_transfer_token(
        &self,
        port_id: &str,
        channel_id: &str,
        sender: &str,
        recipient: &str,
        token: &Token,
    ) -> Result<(), Error> {
        transfer_from_chain(
            &self.chain_id,
            &self.command_path,
            self.home_path.as_deref(),
            &self.rpc_address,
            sender,
            port_id,
            channel_id,
            recipient,
            &token.to_string(),
            &self.keyring_backend,
            &self.gas_prices,
        )
    }
}
