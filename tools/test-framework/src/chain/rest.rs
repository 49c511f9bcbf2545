/*!
   Queries against the REST (gRPC-gateway) endpoint of a chain.
*/

use alloc::sync::Arc;
use core::time::Duration;
use serde_json as json;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::error::{handle_generic_error, Error};
use crate::ibc::token::balance_of;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/**
   A blocking client for the REST endpoint of a chain.

   Requests run on the given tokio runtime, so that the synchronous test
   code can share one runtime across drivers.
*/
#[derive(Debug, Clone)]
pub struct RestDriver {
    pub rest_address: String,
    pub client: reqwest::Client,
    pub runtime: Arc<Runtime>,
}

impl RestDriver {
    pub fn new(rest_address: &str, runtime: Arc<Runtime>) -> Result<Self, Error> {
        if rest_address.trim().is_empty() {
            return Err(Error::missing_rest_address());
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(handle_generic_error)?;

        Ok(Self {
            rest_address: rest_address.trim_end_matches('/').to_string(),
            client,
            runtime,
        })
    }

    pub fn balances_url(&self, address: &str) -> String {
        format!("{}/cosmos/bank/v1beta1/balances/{}", self.rest_address, address)
    }

    /**
       Query the balance of `denom` held by `address`.

       The gateway answers unknown accounts with an error payload rather
       than an empty list, so only transport failures and server errors
       are errors here.
    */
    pub fn query_balance(&self, address: &str, denom: &str) -> Result<u128, Error> {
        let url = self.balances_url(address);

        debug!("querying balance of {} for {} from {}", address, denom, url);

        let payload: json::Value = self.runtime.block_on(async {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| Error::http(url.clone(), e))?;

            if response.status().is_server_error() {
                return Err(Error::http_status(url.clone(), response.status().as_u16()));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| Error::http(url.clone(), e))?;

            json::from_slice(&body)
                .map_err(|e| Error::json_parse("balance response".to_string(), e))
        })?;

        Ok(balance_of(&payload, denom))
    }
}
