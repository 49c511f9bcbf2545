/*!
   Re-export of common constructs that are used by test cases.
*/

pub use core::time::Duration;
pub use eyre::eyre;
pub use std::thread::sleep;
pub use tracing::{debug, error, info, warn};

pub use crate::bootstrap::discovery::bootstrap_ibc_path;
pub use crate::bootstrap::init::init_test;
pub use crate::chain::driver::ChainDriver;
pub use crate::chain::rest::RestDriver;
pub use crate::error::{handle_generic_error, Error, ErrorDetail};
pub use crate::framework::base::{run_test, PrimitiveTest};
pub use crate::framework::path::{run_lumera_path_test, run_simd_path_test, IbcPathTest};
pub use crate::ibc::denom::{derive_ibc_denom, Denom};
pub use crate::ibc::token::Token;
pub use crate::types::channel_info::ChannelInfo;
pub use crate::types::config::{SuiteSide, TestConfig};
pub use crate::types::path::{IbcPathContext, TransferOutcome};
pub use crate::util::assert::*;
pub use crate::util::retry::RetryPolicy;
