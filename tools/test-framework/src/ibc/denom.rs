/*!
   Helper functions for deriving IBC denom.
*/

use core::fmt::{self, Display};
use sha2::{Digest, Sha256};
use subtle_encoding::hex;

use crate::error::{handle_generic_error, Error};

/**
   A denomination, either native to the chain or received over IBC.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denom {
    Base(String),
    Ibc {
        path: String,
        denom: String,
        hashed: String,
    },
}

impl Denom {
    pub fn base(denom: &str) -> Self {
        Denom::Base(denom.to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Denom::Base(denom) => denom,
            Denom::Ibc { hashed, .. } => hashed,
        }
    }
}

impl Display for Denom {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}

/**
   Derives the voucher denom that the receiving chain mints for `denom`
   when it arrives over `port_id`/`channel_id`.

   Following
   <https://github.com/cosmos/ibc-go/blob/main/docs/architecture/adr-001-coin-source-tracing.md>,
   the voucher is `ibc/` followed by the upper-case hex SHA-256 of the
   full trace path `{port_id}/{channel_id}/{base denom}`.
*/
pub fn derive_ibc_denom(port_id: &str, channel_id: &str, denom: &Denom) -> Result<Denom, Error> {
    let (path, base) = match denom {
        Denom::Base(base) => (format!("{port_id}/{channel_id}"), base),
        Denom::Ibc { path, denom, .. } => (format!("{port_id}/{channel_id}/{path}"), denom),
    };

    let hashed = hash_trace(&format!("{path}/{base}"))?;

    Ok(Denom::Ibc {
        path,
        denom: base.clone(),
        hashed,
    })
}

fn hash_trace(trace: &str) -> Result<String, Error> {
    let mut hasher = Sha256::new();
    hasher.update(trace.as_bytes());

    let denom_bytes = hasher.finalize();
    let denom_hex =
        String::from_utf8(hex::encode_upper(denom_bytes)).map_err(handle_generic_error)?;

    Ok(format!("ibc/{denom_hex}"))
}
