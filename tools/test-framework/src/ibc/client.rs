/*!
   Light client information attached to a channel.
*/

use serde_json as json;
use tracing::warn;

use crate::util::json::{object_at, string_at};

/**
   The client state behind a channel, as reported by
   `q ibc channel client-state`.

   `client_id` is empty when the chain does not report it alongside the
   client state.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelClientState {
    pub client_id: String,
    pub latest_height: u64,
    pub client_type: String,
}

impl ChannelClientState {
    /**
       Extracts the client state from a `client-state` query response.

       Both the `identified_client_state` wrapper used by recent SDKs and
       the flattened layout are accepted. An unparsable height reads as `0`
       so that the positivity check reports it.
    */
    pub fn from_response(response: &json::Value) -> Self {
        let mut client_id = string_at(response, &["identified_client_state", "client_id"]);
        if client_id.is_empty() {
            client_id = string_at(response, &["client_id"]);
        }

        let client_state = object_at(response, &["identified_client_state", "client_state"])
            .or_else(|| object_at(response, &["client_state"]));

        let Some(client_state) = client_state else {
            return Self {
                client_id,
                ..Self::default()
            };
        };

        let client_type = string_at(client_state, &["@type"]);
        let raw_height = string_at(client_state, &["latest_height", "revision_height"]);

        let latest_height = raw_height.parse().unwrap_or_else(|_| {
            if !raw_height.is_empty() {
                warn!("unparsable client-state latest height: {}", raw_height);
            }
            0
        });

        Self {
            client_id,
            latest_height,
            client_type,
        }
    }
}
