//! Error type used for the tests.

use core::time::Duration;
use eyre::Report;
use flex_error::{define_error, TraceError};
use std::io::{Error as IoError, ErrorKind as IoErrorKind};

define_error! {
    Error {
        Generic
            [ TraceError<Report> ]
            | _ | { "generic error" },

        Assertion
            { message: String }
            | e | { format_args!("assertion failure: {}", e.message) },

        Io
            [ TraceError<IoError> ]
            | _ | { "io error"},

        CommandNotFound
            { command: String }
            [ TraceError<IoError> ]
            | e | { format_args!("failed to execute command: {}. make sure it is available in $PATH", e.command) },

        CommandFailed
            {
                command: String,
                code: Option<i32>,
                message: String,
            }
            | e | {
                format_args!("command {} exited with error status {:?} and message: {}",
                    e.command, e.code, e.message)
            },

        CommandTimeout
            {
                command: String,
                timeout: Duration,
                output: String,
            }
            | e | {
                format_args!("command {} timed out after {:?}: {}",
                    e.command, e.timeout, e.output)
            },

        JsonParse
            { context: String }
            [ TraceError<serde_json::Error> ]
            | e | { format_args!("failed to parse {}", e.context) },

        ChannelInfoRead
            { path: String }
            [ TraceError<IoError> ]
            | e | { format_args!("failed to read channel info from {}", e.path) },

        ChannelInfoParse
            { path: String }
            [ TraceError<serde_json::Error> ]
            | e | { format_args!("failed to parse channel info from {}", e.path) },

        MissingChannelId
            { path: String }
            | e | { format_args!("channel_id missing in {}", e.path) },

        AddressFileRead
            { path: String }
            [ TraceError<IoError> ]
            | e | { format_args!("failed to read address file {}", e.path) },

        EmptyAddressFile
            { path: String }
            | e | { format_args!("address file {} is empty", e.path) },

        MissingField
            {
                context: String,
                field: String,
            }
            | e | { format_args!("{} not found in {} response", e.field, e.context) },

        MissingRestAddress
            | _ | { "rest address is required" },

        Http
            { url: String }
            [ TraceError<reqwest::Error> ]
            | e | { format_args!("http request to {} failed", e.url) },

        HttpStatus
            {
                url: String,
                status: u16,
            }
            | e | { format_args!("http request to {} returned status {}", e.url, e.status) },

        ChannelNotFound
            {
                port_id: String,
                channel_id: String,
            }
            | e | { format_args!("channel {}/{} not found", e.port_id, e.channel_id) },

        NoChannelForPort
            { port_id: String }
            | e | { format_args!("no channel found for port {}", e.port_id) },

        MissingConnectionHop
            {
                port_id: String,
                channel_id: String,
            }
            | e | { format_args!("channel {}/{} missing connection hop", e.port_id, e.channel_id) },

        ConnectionNotFound
            { connection_id: String }
            | e | {
                format_args!("connection {} not found and no open connections",
                    e.connection_id)
            },

        MissingClientId
            { connection_id: String }
            | e | { format_args!("connection {} missing client_id", e.connection_id) },

        BalanceTimeout
            {
                address: String,
                denom: String,
                attempts: u16,
                last_observed: u128,
            }
            | e | {
                format_args!("balance of {} for {} did not increase after {} attempts, last observed {}",
                    e.address, e.denom, e.attempts, e.last_observed)
            },
    }
}

pub fn handle_generic_error(e: impl Into<Report>) -> Error {
    Error::generic(e.into())
}

pub fn handle_exec_error(command: &str) -> impl FnOnce(IoError) -> Error + '_ {
    |e| match e.kind() {
        IoErrorKind::NotFound => Error::command_not_found(command.to_string(), e),
        _ => Error::io(e),
    }
}

impl From<Report> for Error {
    fn from(e: Report) -> Self {
        Error::generic(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::io(e)
    }
}
