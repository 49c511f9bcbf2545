/*!
   Channel metadata shared by the relayer setup.
*/

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Error;

/**
   The channel metadata file written once the relayer has created the
   transfer channel, e.g.

   ```json
   {
     "port_id": "transfer",
     "channel_id": "channel-0",
     "a_chain_id": "lumera-devnet-1",
     "b_chain_id": "hermes-simd-1"
   }
   ```

   `channel_id` is the channel end on the Lumera chain.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChannelInfo {
    pub port_id: String,
    pub channel_id: String,
    pub counterparty_chain_id: String,
    pub counterparty_channel_id: String,
    pub a_chain_id: String,
    pub b_chain_id: String,
    pub counterparty_client_id: String,
}

impl ChannelInfo {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();

        let data =
            fs::read(path).map_err(|e| Error::channel_info_read(path.display().to_string(), e))?;

        serde_json::from_slice(&data)
            .map_err(|e| Error::channel_info_parse(path.display().to_string(), e))
    }

    /**
       Fill in `counterparty_chain_id` when the file only names the two
       ends of the path: the counterparty is whichever of `a_chain_id` and
       `b_chain_id` is not `local_chain_id`. Left empty if the local chain
       is neither.
    */
    pub fn with_counterparty_of(mut self, local_chain_id: &str) -> Self {
        if self.counterparty_chain_id.is_empty()
            && !self.a_chain_id.is_empty()
            && !self.b_chain_id.is_empty()
        {
            if local_chain_id == self.a_chain_id {
                self.counterparty_chain_id = self.b_chain_id.clone();
            } else if local_chain_id == self.b_chain_id {
                self.counterparty_chain_id = self.a_chain_id.clone();
            }
        }

        self
    }
}
