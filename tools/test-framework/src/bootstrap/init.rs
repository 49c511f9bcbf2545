/*!
   Functions for initializing each test at the beginning of a Rust test
   session.
*/

use std::env;
use std::io::{stderr, IsTerminal};
use std::sync::Once;
use tracing::{info, warn};
use tracing_subscriber::{
    self as ts,
    filter::{EnvFilter, LevelFilter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::Error;
use crate::types::config::{SuiteSide, TestConfig};
use crate::types::env::ProcessEnv;

static INIT: Once = Once::new();

/**
   Initialize the test with a global logger and error handlers,
   read the environment variables and return a [`TestConfig`] for the
   given side of the relay path.
*/
pub fn init_test(side: SuiteSide) -> Result<TestConfig, Error> {
    let no_color_log = env::var("NO_COLOR_LOG")
        .ok()
        .map(|val| val == "1")
        .unwrap_or(false);

    INIT.call_once(|| {
        let with_color = stderr().is_terminal() && !no_color_log;

        install_logger(with_color);

        if with_color {
            if let Err(e) = color_eyre::install() {
                warn!("failed to install color-eyre handler: {}", e);
            }
        }
    });

    let config = TestConfig::from_env(side, &ProcessEnv);

    info!("resolved test config: {:?}", config);

    Ok(config)
}

/**
   Install the [`tracing_subscriber`] logger handlers so that logs will
   be displayed during test.
*/
pub fn install_logger(with_color: bool) {
    // Use log level INFO by default if RUST_LOG is not set.
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let layer = ts::fmt::layer().with_ansi(with_color).with_test_writer();

    // Another subscriber may already be installed, e.g. by `test-log`.
    let _ = ts::registry().with(env_filter).with(layer).try_init();
}
