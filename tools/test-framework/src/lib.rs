// #![deny(warnings)]
#![allow(clippy::too_many_arguments)]
#![doc = include_str!("../README.md")]

//!
//! ## Overview
//!
//! The framework validates an IBC relay path that is already running as
//! part of a devnet. Nothing is spawned: the chains and the relayer are
//! reached through the chain binary and the REST endpoints named by the
//! environment.
//!
//! ## Example Test
//!
//! ```rust,no_run
//! use lumera_ibc_test_framework::prelude::*;
//!
//! pub struct ChannelOpenTest;
//!
//! impl IbcPathTest for ChannelOpenTest {
//!     fn run(&self, _config: &TestConfig, path: &IbcPathContext) -> Result<(), Error> {
//!         path.assert_channel_open()
//!     }
//! }
//!
//! pub fn channel_open_test() -> Result<(), Error> {
//!     run_lumera_path_test(&ChannelOpenTest)
//! }
//! ```
//!
//! The first test case that runs loads the channel metadata, queries the
//! channels, connections and client of the path, and caches the result
//! for every later test case of the same side. Set `IBC_PATH_ENV_FILE` to
//! have the discovered path written out as a `.env` file:
//!
//! ```bash
//! $ source /tmp/ibc-path.env
//! $ $CMD --node $RPC_ADDR q ibc connection end $CONNECTION_ID
//! ```

extern crate alloc;

pub mod bootstrap;
pub mod chain;
pub mod error;
pub mod framework;
pub mod ibc;
pub mod prelude;
pub mod types;
pub mod util;
