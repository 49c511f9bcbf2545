/*!
   The snapshot of one end of an IBC relay path, and the checks run
   against it.
*/

use alloc::sync::Arc;
use tokio::runtime::Builder as RuntimeBuilder;
use tracing::info;

use crate::chain::driver::ChainDriver;
use crate::chain::rest::RestDriver;
use crate::error::Error;
use crate::ibc::channel::Channel;
use crate::ibc::client::ChannelClientState;
use crate::ibc::connection::Connection;
use crate::ibc::denom::{derive_ibc_denom, Denom};
use crate::ibc::state::is_active_status;
use crate::ibc::token::Token;
use crate::types::channel_info::ChannelInfo;
use crate::types::config::{SuiteSide, TestConfig};
use crate::types::env::{prefix_writer, EnvWriter, ExportEnv};
use crate::util::assert::{assert_eq, assert_gt, assert_true};
use crate::util::retry::{wait_for_balance_increase, RetryPolicy};

/**
   Everything discovered about the relay path before any check runs.

   The context is built once per test session and then only read: each
   check takes `&self` and asserts on the cached state, so checks are
   independent of each other and of the order they run in.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbcPathContext {
    pub config: TestConfig,

    pub driver: ChainDriver,

    pub channel_info: ChannelInfo,

    pub port_id: String,

    /**
       The channel id the path was selected by: the local channel id on
       the Lumera side, the counterparty channel id on the simd side.
    */
    pub target_channel_id: String,

    /// Recipient address on the counterparty chain for the transfer check.
    pub recipient: String,

    pub channels: Vec<Channel>,

    pub channel: Channel,

    pub connections: Vec<Connection>,

    pub connection: Connection,

    pub client_status: String,

    pub client_state: ChannelClientState,
}

/**
   Balances of the transfer recipient around a relayed transfer.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub denom: Denom,
    pub before: u128,
    pub after: u128,
}

impl IbcPathContext {
    pub fn assert_channel_open(&self) -> Result<(), Error> {
        assert_true(
            &format!(
                "channel {}/{} not open: {}",
                self.channel.port_id, self.channel.channel_id, self.channel.state
            ),
            self.channel.is_open(),
        )
    }

    /**
       On the simd side the channel was located through its counterparty;
       check that the counterparty it reports is the Lumera channel. Chains
       that leave the counterparty channel empty are not checked.
    */
    pub fn assert_counterparty_channel(&self) -> Result<(), Error> {
        if self.config.side != SuiteSide::Simd || self.channel.counterparty.channel_id.is_empty() {
            return Ok(());
        }

        assert_eq(
            "counterparty channel mismatch",
            &self.target_channel_id,
            &self.channel.counterparty.channel_id,
        )
    }

    pub fn assert_connection_open(&self) -> Result<(), Error> {
        assert_true(
            &format!(
                "connection {} not open: {}",
                self.connection.id, self.connection.state
            ),
            self.connection.is_open(),
        )
    }

    pub fn assert_client_active(&self) -> Result<(), Error> {
        assert_true(
            &format!(
                "client {} not active: {}",
                self.connection.client_id, self.client_status
            ),
            is_active_status(&self.client_status),
        )
    }

    /**
       The client behind the channel must be the connection's client, and
       must have tracked at least one counterparty height. Chains that do
       not report the client id with the client state skip the first part.
    */
    pub fn assert_channel_client_state(&self) -> Result<(), Error> {
        if !self.client_state.client_id.is_empty() {
            assert_eq(
                "client-state mismatch",
                &self.connection.client_id,
                &self.client_state.client_id,
            )?;
        }

        assert_gt(
            "client-state latest_height not positive",
            &self.client_state.latest_height,
            &0,
        )?;

        info!(
            "client-state height={} type={}",
            self.client_state.latest_height, self.client_state.client_type
        );

        Ok(())
    }

    /**
       The voucher denom the counterparty mints for `denom` sent over this
       channel. Vouchers are prefixed with the receiving end of the
       channel, so the counterparty port and channel are used when the
       chain reports them.
    */
    pub fn voucher_denom(&self, denom: &str) -> Result<Denom, Error> {
        let counterparty = &self.channel.counterparty;

        let (port_id, channel_id) =
            if counterparty.port_id.is_empty() || counterparty.channel_id.is_empty() {
                (self.port_id.as_str(), self.channel.channel_id.as_str())
            } else {
                (counterparty.port_id.as_str(), counterparty.channel_id.as_str())
            };

        derive_ibc_denom(port_id, channel_id, &Denom::base(denom))
    }

    /**
       Send the configured amount to the recipient on the counterparty
       chain and wait for the recipient's voucher balance to increase.
    */
    pub fn assert_transfer_relayed(&self, policy: RetryPolicy) -> Result<TransferOutcome, Error> {
        let token: Token = self.config.transfer_amount.parse()?;
        let denom = self.voucher_denom(&token.denom)?;

        let runtime = Arc::new(RuntimeBuilder::new_current_thread().enable_all().build()?);
        let rest = RestDriver::new(&self.config.counterparty_rest_address, runtime)?;

        let before = rest.query_balance(&self.recipient, denom.as_str())?;

        info!(
            "sending {} from {} over {}/{} to {} (voucher {}, balance {})",
            token,
            self.config.chain.key_name,
            self.port_id,
            self.channel.channel_id,
            self.recipient,
            denom,
            before
        );

        self.driver.ibc_transfer_token(
            &self.port_id,
            &self.channel.channel_id,
            &self.config.chain.key_name,
            &self.recipient,
            &token,
        )?;

        let after = wait_for_balance_increase(
            &self.recipient,
            denom.as_str(),
            before,
            policy,
            || rest.query_balance(&self.recipient, denom.as_str()),
        )?;

        info!("recipient balance increased: {} -> {}", before, after);

        Ok(TransferOutcome {
            denom,
            before,
            after,
        })
    }
}

impl ExportEnv for IbcPathContext {
    fn export_env(&self, writer: &mut impl EnvWriter) {
        self.config.export_env(writer);

        writer.write_env("PORT_ID", &self.port_id);
        writer.write_env("CHANNEL_ID", &self.channel.channel_id);
        writer.write_env("CONNECTION_ID", &self.connection.id);
        writer.write_env("CLIENT_ID", &self.connection.client_id);
        writer.write_env("RECIPIENT", &self.recipient);

        let mut counterparty = prefix_writer("COUNTERPARTY", writer);
        counterparty.write_env("CHAIN_ID", &self.channel_info.counterparty_chain_id);
        counterparty.write_env("CHANNEL_ID", &self.channel.counterparty.channel_id);
        counterparty.write_env("CONNECTION_ID", &self.connection.counterparty.connection_id);
        counterparty.write_env("CLIENT_ID", &self.connection.counterparty.client_id);
    }
}
