use core::fmt::{self, Display};
use core::str::FromStr;
use eyre::eyre;
use serde_json as json;
use tracing::warn;

use crate::error::{handle_generic_error, Error};
use crate::util::json::string_of;

/**
   An amount of a denomination, in the `100ulume` form accepted by the
   `tx ibc-transfer transfer` command.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub amount: u128,
    pub denom: String,
}

impl Token {
    pub fn new(amount: u128, denom: impl Into<String>) -> Self {
        Self {
            amount,
            denom: denom.into(),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Token {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Error> {
        let raw = raw.trim();
        let split = raw
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| handle_generic_error(eyre!("token {:?} has no denomination", raw)))?;

        let (amount, denom) = raw.split_at(split);

        if amount.is_empty() {
            return Err(handle_generic_error(eyre!(
                "token {:?} has no amount",
                raw
            )));
        }

        let amount = amount.parse().map_err(handle_generic_error)?;

        Ok(Token::new(amount, denom))
    }
}

/**
   Reads the amount of `denom` out of a bank `balances` response, as
   returned both by `q bank balances` and by the
   `/cosmos/bank/v1beta1/balances/{address}` endpoint.

   An account holding none of `denom` is simply absent from the list, so
   absence reads as zero, as does an error payload carrying a `code`.
*/
pub fn balance_of(response: &json::Value, denom: &str) -> u128 {
    if response
        .get("code")
        .map(|code| !string_of(code).is_empty())
        .unwrap_or(false)
    {
        return 0;
    }

    let Some(balances) = response.get("balances").and_then(|b| b.as_array()) else {
        return 0;
    };

    balances
        .iter()
        .find(|coin| coin.get("denom").map(string_of).as_deref() == Some(denom))
        .map(|coin| {
            let raw = coin.get("amount").map(string_of).unwrap_or_default();
            raw.parse().unwrap_or_else(|_| {
                warn!("unparsable balance amount {:?} for {}", raw, denom);
                0
            })
        })
        .unwrap_or(0)
}
