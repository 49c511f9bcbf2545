/*!
   Definition for the test configuration, resolved from environment
   variables with devnet defaults.
*/

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::types::env::{env_or, non_empty_env, EnvReader, EnvWriter, ExportEnv};

pub const DEFAULT_CHANNEL_INFO_FILE: &str = "/shared/status/hermes/channel_transfer.json";
pub const DEFAULT_PORT_ID: &str = "transfer";
pub const DEFAULT_KEYRING_BACKEND: &str = "test";

pub const DEFAULT_LUMERA_BIN: &str = "lumerad";
pub const DEFAULT_LUMERA_RPC: &str = "http://supernova_validator_1:26657";
pub const DEFAULT_LUMERA_REST: &str = "http://supernova_validator_1:1317";
pub const DEFAULT_LUMERA_CHAIN_ID: &str = "lumera-devnet-1";
pub const DEFAULT_LUMERA_KEY_NAME: &str = "hermes-relayer";
pub const DEFAULT_LUMERA_GAS_PRICES: &str = "0.025ulume";
pub const DEFAULT_LUMERA_DENOM: &str = "ulume";
pub const DEFAULT_LUMERA_ADDR_FILE: &str = "/shared/hermes/lumera-hermes-relayer.address";
pub const DEFAULT_VALIDATORS_FILE: &str = "/shared/config/validators.json";

pub const DEFAULT_SIMD_BIN: &str = "simd";
pub const DEFAULT_SIMD_RPC: &str = "http://127.0.0.1:26657";
pub const DEFAULT_SIMD_REST: &str = "http://hermes:1317";
pub const DEFAULT_SIMD_CHAIN_ID: &str = "hermes-simd-1";
pub const DEFAULT_SIMD_HOME: &str = "/root/.simd";
pub const DEFAULT_SIMD_KEY_NAME: &str = "simd-test";
pub const DEFAULT_SIMD_GAS_PRICES: &str = "0.025stake";
pub const DEFAULT_SIMD_DENOM: &str = "stake";
pub const DEFAULT_SIMD_ADDR_FILE: &str = "/shared/hermes/simd-test.address";

/**
   Which end of the relay path the suite inspects.

   The chain on that end is queried for the channel, connection and
   client, and is the sender of the test transfer. The other end is only
   reached through its REST endpoint to watch the recipient balance.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteSide {
    /// Inspect Lumera; the channel is selected by its own channel id.
    Lumera,
    /// Inspect simd; the channel is selected by its counterparty (Lumera) channel id.
    Simd,
}

/**
   How to reach and sign on the chain under inspection.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub command_path: String,
    pub chain_id: String,
    pub rpc_address: String,
    pub home_path: Option<String>,
    pub key_name: String,
    pub keyring_backend: String,
    pub gas_prices: String,
    pub denom: String,
}

/**
   The test config resolved at the start of a test session.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestConfig {
    pub side: SuiteSide,

    /// Path to the channel metadata written by the relayer setup.
    pub channel_info_path: PathBuf,

    pub chain: ChainConfig,

    /// REST endpoint of the chain receiving the test transfer.
    pub counterparty_rest_address: String,

    /// File holding the recipient address on the counterparty chain.
    pub recipient_address_file: PathBuf,

    /// Port override; the channel metadata is used when unset.
    pub port_id: Option<String>,

    /**
       Channel override; the channel metadata is used when unset.

       On the [`SuiteSide::Simd`] side this is the Lumera channel id,
       which is matched against the counterparty of the simd channels.
    */
    pub channel_id: Option<String>,

    /// Amount sent by the transfer test, e.g. `100ulume`.
    pub transfer_amount: String,
}

impl TestConfig {
    pub fn from_env(side: SuiteSide, env: &impl EnvReader) -> Self {
        match side {
            SuiteSide::Lumera => Self::lumera_side(env),
            SuiteSide::Simd => Self::simd_side(env),
        }
    }

    pub fn lumera_side(env: &impl EnvReader) -> Self {
        let validators_file = env_or(env, "LUMERA_VALIDATORS_FILE", DEFAULT_VALIDATORS_FILE);

        let key_name = resolve_key_name(
            env,
            &[
                KeyNameSource::Env("LUMERA_KEY_NAME".to_string()),
                KeyNameSource::ValidatorsFile(PathBuf::from(validators_file)),
                KeyNameSource::Fixed(DEFAULT_LUMERA_KEY_NAME.to_string()),
            ],
        );

        let denom = env_or(env, "LUMERA_DENOM", DEFAULT_LUMERA_DENOM);

        Self {
            side: SuiteSide::Lumera,
            channel_info_path: env_or(env, "CHANNEL_INFO_FILE", DEFAULT_CHANNEL_INFO_FILE).into(),
            chain: ChainConfig {
                command_path: env_or(env, "LUMERA_BIN", DEFAULT_LUMERA_BIN),
                chain_id: env_or(env, "LUMERA_CHAIN_ID", DEFAULT_LUMERA_CHAIN_ID),
                rpc_address: env_or(env, "LUMERA_RPC_ADDR", DEFAULT_LUMERA_RPC),
                home_path: None,
                key_name,
                keyring_backend: DEFAULT_KEYRING_BACKEND.to_string(),
                gas_prices: env_or(env, "LUMERA_GAS_PRICES", DEFAULT_LUMERA_GAS_PRICES),
                denom: denom.clone(),
            },
            counterparty_rest_address: env_or(env, "SIMD_REST_ADDR", DEFAULT_SIMD_REST),
            recipient_address_file: env_or(env, "SIMD_RECIPIENT_ADDR_FILE", DEFAULT_SIMD_ADDR_FILE)
                .into(),
            port_id: non_empty_env(env, "PORT_ID"),
            channel_id: non_empty_env(env, "CHANNEL_ID"),
            transfer_amount: env_or(env, "LUMERA_IBC_AMOUNT", &format!("100{denom}")),
        }
    }

    pub fn simd_side(env: &impl EnvReader) -> Self {
        let key_name = resolve_key_name(
            env,
            &[
                KeyNameSource::Env("SIMD_KEY_NAME".to_string()),
                KeyNameSource::Fixed(DEFAULT_SIMD_KEY_NAME.to_string()),
            ],
        );

        let denom = env_or(env, "SIMD_DENOM", DEFAULT_SIMD_DENOM);

        Self {
            side: SuiteSide::Simd,
            channel_info_path: env_or(env, "CHANNEL_INFO_FILE", DEFAULT_CHANNEL_INFO_FILE).into(),
            chain: ChainConfig {
                command_path: env_or(env, "SIMD_BIN", DEFAULT_SIMD_BIN),
                chain_id: env_or(env, "SIMD_CHAIN_ID", DEFAULT_SIMD_CHAIN_ID),
                rpc_address: env_or(env, "SIMD_RPC_ADDR", DEFAULT_SIMD_RPC),
                home_path: Some(env_or(env, "SIMD_HOME", DEFAULT_SIMD_HOME)),
                key_name,
                keyring_backend: env_or(env, "SIMD_KEYRING", DEFAULT_KEYRING_BACKEND),
                gas_prices: env_or(env, "SIMD_GAS_PRICES", DEFAULT_SIMD_GAS_PRICES),
                denom: denom.clone(),
            },
            counterparty_rest_address: env_or(env, "LUMERA_REST_ADDR", DEFAULT_LUMERA_REST),
            recipient_address_file: env_or(
                env,
                "LUMERA_RECIPIENT_ADDR_FILE",
                DEFAULT_LUMERA_ADDR_FILE,
            )
            .into(),
            port_id: non_empty_env(env, "PORT_ID"),
            channel_id: non_empty_env(env, "LUMERA_CHANNEL_ID"),
            transfer_amount: env_or(env, "SIMD_IBC_AMOUNT", &format!("100{denom}")),
        }
    }
}

impl ExportEnv for TestConfig {
    fn export_env(&self, writer: &mut impl EnvWriter) {
        writer.write_env("CHANNEL_INFO_FILE", &self.channel_info_path.display().to_string());
        writer.write_env("CMD", &self.chain.command_path);
        writer.write_env("CHAIN_ID", &self.chain.chain_id);
        writer.write_env("RPC_ADDR", &self.chain.rpc_address);
        if let Some(home_path) = &self.chain.home_path {
            writer.write_env("HOME", home_path);
        }
        writer.write_env("KEY_NAME", &self.chain.key_name);
        writer.write_env("DENOM", &self.chain.denom);
        writer.write_env("COUNTERPARTY_REST_ADDR", &self.counterparty_rest_address);
    }
}

/**
   One way of determining the signing key name. Sources are tried in
   order by [`resolve_key_name`] until one produces a non-empty name.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyNameSource {
    /// The named environment variable.
    Env(String),

    /**
       A validators JSON file: the entry flagged `primary` with a
       non-empty `key_name`, else the first entry. An unreadable or
       malformed file yields nothing.
    */
    ValidatorsFile(PathBuf),

    Fixed(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValidatorEntry {
    pub key_name: String,
    pub primary: bool,
}

impl KeyNameSource {
    pub fn resolve(&self, env: &impl EnvReader) -> Option<String> {
        match self {
            KeyNameSource::Env(key) => non_empty_env(env, key),
            KeyNameSource::ValidatorsFile(path) => primary_validator_key(path),
            KeyNameSource::Fixed(name) => Some(name.clone()).filter(|name| !name.is_empty()),
        }
    }
}

pub fn resolve_key_name(env: &impl EnvReader, sources: &[KeyNameSource]) -> String {
    sources
        .iter()
        .find_map(|source| source.resolve(env))
        .unwrap_or_default()
}

pub fn primary_validator_key(path: &Path) -> Option<String> {
    let validators: Vec<ValidatorEntry> = match fs::read(path)
        .map_err(|e| e.to_string())
        .and_then(|data| serde_json::from_slice(&data).map_err(|e| e.to_string()))
    {
        Ok(validators) => validators,
        Err(e) => {
            debug!("skipping validators file {}: {}", path.display(), e);
            return None;
        }
    };

    validators
        .iter()
        .find(|v| v.primary && !v.key_name.is_empty())
        .or_else(|| validators.first())
        .map(|v| v.key_name.clone())
        .filter(|name| !name.is_empty())
}
