use serde_json as json;
use serde_yaml as yaml;

use crate::chain::exec::simple_exec;
use crate::error::{handle_generic_error, Error};
use crate::ibc::channel::{Channel, ChannelsResponse};
use crate::ibc::client::ChannelClientState;
use crate::ibc::connection::{Connection, ConnectionsResponse};
use crate::ibc::token::balance_of;
use crate::util::json::string_at;

/**
   Query all channel ends known to the chain.
*/
pub fn query_channels(
    chain_id: &str,
    command_path: &str,
    rpc_address: &str,
) -> Result<Vec<Channel>, Error> {
    let value = query_json(
        chain_id,
        command_path,
        rpc_address,
        &["q", "ibc", "channel", "channels"],
        "channels",
    )?;

    let response: ChannelsResponse =
        json::from_value(value).map_err(|e| Error::json_parse("channels".to_string(), e))?;

    Ok(response.channels)
}

/**
   Query all connection ends known to the chain.
*/
pub fn query_connections(
    chain_id: &str,
    command_path: &str,
    rpc_address: &str,
) -> Result<Vec<Connection>, Error> {
    let value = query_json(
        chain_id,
        command_path,
        rpc_address,
        &["q", "ibc", "connection", "connections"],
        "connections",
    )?;

    let response: ConnectionsResponse =
        json::from_value(value).map_err(|e| Error::json_parse("connections".to_string(), e))?;

    Ok(response.connections)
}

pub fn query_client_status(
    chain_id: &str,
    command_path: &str,
    rpc_address: &str,
    client_id: &str,
) -> Result<String, Error> {
    let value = query_json(
        chain_id,
        command_path,
        rpc_address,
        &["q", "ibc", "client", "status", client_id],
        "client status",
    )?;

    let status = string_at(&value, &["status"]);
    if status.is_empty() {
        return Err(Error::missing_field(
            "client status".to_string(),
            "status".to_string(),
        ));
    }

    Ok(status)
}

/**
   Query the light client state underlying the given channel.
*/
pub fn query_channel_client_state(
    chain_id: &str,
    command_path: &str,
    rpc_address: &str,
    port_id: &str,
    channel_id: &str,
) -> Result<ChannelClientState, Error> {
    let value = query_json(
        chain_id,
        command_path,
        rpc_address,
        &["q", "ibc", "channel", "client-state", port_id, channel_id],
        "channel client-state",
    )?;

    Ok(ChannelClientState::from_response(&value))
}

pub fn query_balance(
    chain_id: &str,
    command_path: &str,
    rpc_address: &str,
    wallet_id: &str,
    denom: &str,
) -> Result<u128, Error> {
    let value = query_json(
        chain_id,
        command_path,
        rpc_address,
        &["q", "bank", "balances", wallet_id],
        "balance",
    )?;

    Ok(balance_of(&value, denom))
}

/// The `--node` flag, omitted when no RPC address is configured.
pub fn node_args(rpc_address: &str) -> Vec<&str> {
    if rpc_address.is_empty() {
        Vec::new()
    } else {
        vec!["--node", rpc_address]
    }
}

fn query_json(
    chain_id: &str,
    command_path: &str,
    rpc_address: &str,
    query: &[&str],
    context: &str,
) -> Result<json::Value, Error> {
    let mut args = query.to_vec();
    args.extend(["--output", "json"]);
    args.extend(node_args(rpc_address));

    let res = simple_exec(chain_id, command_path, &args)?.stdout;

    tracing::trace!("parsing {} result: {}", context, res);

    parse_cli_output(&res, context)
}

/**
   Parses CLI output as JSON, falling back to YAML for binaries that
   ignore `--output json` on some subcommands.
*/
pub fn parse_cli_output(raw: &str, context: &str) -> Result<json::Value, Error> {
    match json::from_str(raw) {
        Ok(res) => Ok(res),
        Err(e) => match yaml::from_str::<yaml::Value>(raw) {
            Ok(value) if value.is_mapping() => yaml_to_json_value(value),
            _ => Err(Error::json_parse(context.to_string(), e)),
        },
    }
}

// There is no builtin conversion between yaml::Value and json::Value even
// though both are essentially the same, so go through a string.
fn yaml_to_json_value(value: yaml::Value) -> Result<json::Value, Error> {
    let json_str = json::to_string(&value).map_err(handle_generic_error)?;

    let parsed = json::from_str(&json_str).map_err(handle_generic_error)?;

    Ok(parsed)
}
