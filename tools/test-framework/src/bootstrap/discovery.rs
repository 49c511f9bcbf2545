/*!
   Discover the relay path on a running chain: locate the channel, its
   connection and client, and capture their state into an
   [`IbcPathContext`].
*/

use tracing::info;

use crate::chain::driver::ChainDriver;
use crate::error::Error;
use crate::ibc::channel::{
    find_channel_by_counterparty, find_channel_by_id, first_channel_by_port, Channel,
};
use crate::ibc::connection::{find_connection_by_id, first_open_connection, Connection};
use crate::types::channel_info::ChannelInfo;
use crate::types::config::{SuiteSide, TestConfig, DEFAULT_PORT_ID};
use crate::types::path::IbcPathContext;
use crate::util::file::read_address;

/**
   Query the chain named by `config` and build the path snapshot.

   Every failure here is fatal: a missing channel, hop, connection or
   client id means the relay path cannot be validated at all. Nothing is
   retried, so an unreachable node and a missing channel surface the same
   way apart from the error message.
*/
pub fn bootstrap_ibc_path(config: &TestConfig) -> Result<IbcPathContext, Error> {
    let driver = ChainDriver::from_config(&config.chain);

    let channel_info =
        ChannelInfo::load(&config.channel_info_path)?.with_counterparty_of(&config.chain.chain_id);

    info!(
        "loaded channel info: port={} channel={} counterparty_chain={} a_chain={} b_chain={}",
        channel_info.port_id,
        channel_info.channel_id,
        channel_info.counterparty_chain_id,
        channel_info.a_chain_id,
        channel_info.b_chain_id
    );
    info!("using key name: {}", config.chain.key_name);

    let port_id = resolve_port_id(config, &channel_info);
    let target_channel_id = resolve_channel_id(config, &channel_info)?;

    let recipient = read_address(&config.recipient_address_file)?;

    info!(
        "testing IBC on {} (port={} channel={} rpc={})",
        config.chain.chain_id, port_id, target_channel_id, config.chain.rpc_address
    );

    let channels = driver.query_channels()?;

    info!("discovered {} channels", channels.len());
    for channel in channels.iter() {
        info!(
            "channel: port={} channel={} state={} counterparty_port={} counterparty_channel={} conn_hops={:?}",
            channel.port_id,
            channel.channel_id,
            channel.state,
            channel.counterparty.port_id,
            channel.counterparty.channel_id,
            channel.connection_hops
        );
    }

    let channel = select_channel(config.side, &channels, &port_id, &target_channel_id)?.clone();

    let connection_id = channel
        .connection_id()
        .ok_or_else(|| {
            Error::missing_connection_hop(channel.port_id.clone(), channel.channel_id.clone())
        })?
        .to_string();

    info!(
        "channel located; connection={} counterparty_channel={}",
        connection_id, channel.counterparty.channel_id
    );

    let connections = driver.query_connections()?;

    info!("discovered {} connections", connections.len());
    for connection in connections.iter() {
        info!(
            "connection: id={} state={} client_id={} counterparty_client_id={} counterparty_connection_id={}",
            connection.id,
            connection.state,
            connection.client_id,
            connection.counterparty.client_id,
            connection.counterparty.connection_id
        );
    }

    let connection = select_connection(&connections, &connection_id)?.clone();

    if connection.client_id.is_empty() {
        return Err(Error::missing_client_id(connection.id.clone()));
    }

    let client_status = driver.query_client_status(&connection.client_id)?;

    let client_state = driver.query_channel_client_state(&channel.port_id, &channel.channel_id)?;

    Ok(IbcPathContext {
        config: config.clone(),
        driver,
        channel_info,
        port_id,
        target_channel_id,
        recipient,
        channels,
        channel,
        connections,
        connection,
        client_status,
        client_state,
    })
}

/**
   The port override, else the port recorded in the channel metadata,
   else `transfer`.
*/
pub fn resolve_port_id(config: &TestConfig, channel_info: &ChannelInfo) -> String {
    config
        .port_id
        .clone()
        .or_else(|| Some(channel_info.port_id.clone()).filter(|port| !port.is_empty()))
        .unwrap_or_else(|| DEFAULT_PORT_ID.to_string())
}

pub fn resolve_channel_id(
    config: &TestConfig,
    channel_info: &ChannelInfo,
) -> Result<String, Error> {
    config
        .channel_id
        .clone()
        .or_else(|| Some(channel_info.channel_id.clone()))
        .filter(|channel_id| !channel_id.is_empty())
        .ok_or_else(|| Error::missing_channel_id(config.channel_info_path.display().to_string()))
}

/**
   On the Lumera side the channel is matched by its own id. On the simd
   side it is matched by its counterparty id, falling back to the first
   channel on the port.
*/
pub fn select_channel<'a>(
    side: SuiteSide,
    channels: &'a [Channel],
    port_id: &str,
    channel_id: &str,
) -> Result<&'a Channel, Error> {
    match side {
        SuiteSide::Lumera => find_channel_by_id(channels, port_id, channel_id)
            .ok_or_else(|| Error::channel_not_found(port_id.to_string(), channel_id.to_string())),
        SuiteSide::Simd => {
            if let Some(channel) = find_channel_by_counterparty(channels, port_id, channel_id) {
                return Ok(channel);
            }

            let channel = first_channel_by_port(channels, port_id)
                .ok_or_else(|| Error::no_channel_for_port(port_id.to_string()))?;

            info!(
                "channel with counterparty {} not found; using channel {}",
                channel_id, channel.channel_id
            );

            Ok(channel)
        }
    }
}

pub fn select_connection<'a>(
    connections: &'a [Connection],
    connection_id: &str,
) -> Result<&'a Connection, Error> {
    if let Some(connection) = find_connection_by_id(connections, connection_id) {
        return Ok(connection);
    }

    let connection = first_open_connection(connections)
        .ok_or_else(|| Error::connection_not_found(connection_id.to_string()))?;

    info!(
        "connection {} not found; using open connection {}",
        connection_id, connection.id
    );

    Ok(connection)
}
