/*!
   Reading test configuration from, and exporting test setup information
   into, environment variables.
*/

use core::convert::AsRef;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::env;
use std::fs::write;
use std::path::Path;

use crate::error::Error;

/**
   A source of environment variables.

   The test configuration is resolved through this trait rather than by
   calling [`std::env::var`] directly, so that resolution can be exercised
   with a plain [`BTreeMap`].
*/
pub trait EnvReader {
    /// Read the variable with the given key, if it is set.
    fn read_env(&self, key: &str) -> Option<String>;
}

/// The environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvReader for ProcessEnv {
    fn read_env(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl EnvReader for BTreeMap<String, String> {
    fn read_env(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/**
   Read a variable, treating unset and empty the same.
*/
pub fn non_empty_env(env: &impl EnvReader, key: &str) -> Option<String> {
    env.read_env(key).filter(|value| !value.is_empty())
}

/**
   Read a variable, falling back to `default` when it is unset or empty.
*/
pub fn env_or(env: &impl EnvReader, key: &str, default: &str) -> String {
    non_empty_env(env, key).unwrap_or_else(|| default.to_string())
}

/**
    This trait is implemented by data types that can export the contained
    information as environment variables.

    Using this, the resolved test setup can be exported as a `.env` file,
    which users can then manually `source` in the terminal to re-run the
    chain queries by hand.
*/
pub trait ExportEnv {
    /**
       Export the environment variables using the given [`EnvWriter`].
    */
    fn export_env(&self, writer: &mut impl EnvWriter);
}

/**
   The exported environment variables are stored in a data type that
   implements this trait.
*/
pub trait EnvWriter {
    /**
       Write an environment variable with the given key and value.

       Note that overlapping keys will be overridden with the new value.
    */
    fn write_env(&mut self, key: &str, value: &str);
}

impl EnvWriter for BTreeMap<String, String> {
    fn write_env(&mut self, key: &str, value: &str) {
        self.insert(key.to_string(), value.to_string());
    }
}

/**
   Create an [`EnvWriter`] that adds a prefix to the keys of the
   environment variables. Used to export the counterparty ends of a path
   next to the local ones.
*/
pub fn prefix_writer<'a, Writer: EnvWriter>(
    prefix: &str,
    writer: &'a mut Writer,
) -> impl EnvWriter + 'a {
    PrefixEnvWriter {
        prefix: prefix.to_string(),
        writer,
    }
}

struct PrefixEnvWriter<'a, Writer> {
    writer: &'a mut Writer,
    prefix: String,
}

impl<'a, Writer: EnvWriter> EnvWriter for PrefixEnvWriter<'a, Writer> {
    fn write_env(&mut self, key: &str, value: &str) {
        self.writer
            .write_env(&format!("{}_{}", self.prefix, key), value);
    }
}

/**
   Retrieve the environment variables exported by a type implementing
   `ExportEnv`, and export them as a string containing the variables
   in the form of `KEY=VALUE` on each line.
*/
pub fn format_env(exporter: &impl ExportEnv) -> String {
    let mut envs = BTreeMap::new();
    exporter.export_env(&mut envs);

    envs.iter()
        .map(|(key, value)| format!("{key}={value}"))
        .join("\n")
}

/**
   Retrieve the environment variables exported by a type implementing
   `ExportEnv`, and save them as a `.env` file to the given file path.
*/
pub fn write_env(path: impl AsRef<Path>, exporter: &impl ExportEnv) -> Result<(), Error> {
    write(path, format_env(exporter))?;

    Ok(())
}
