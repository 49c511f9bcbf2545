/*!
   Channel ends as reported by `q ibc channel channels`, and the lookups
   used to pick the channel under test out of the full list.
*/

use serde::Deserialize;

use crate::ibc::state::is_open_state;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Channel {
    pub state: String,
    pub port_id: String,
    pub channel_id: String,
    pub connection_hops: Vec<String>,
    pub counterparty: ChannelCounterparty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChannelCounterparty {
    pub port_id: String,
    pub channel_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChannelsResponse {
    pub channels: Vec<Channel>,
}

impl Channel {
    pub fn is_open(&self) -> bool {
        is_open_state(&self.state)
    }

    /// The first connection hop, which is the connection the channel is built on.
    pub fn connection_id(&self) -> Option<&str> {
        self.connection_hops.first().map(String::as_str)
    }
}

/// Returns the first channel matching both `port_id` and `channel_id` exactly.
pub fn find_channel_by_id<'a>(
    channels: &'a [Channel],
    port_id: &str,
    channel_id: &str,
) -> Option<&'a Channel> {
    channels
        .iter()
        .find(|channel| channel.port_id == port_id && channel.channel_id == channel_id)
}

/**
   Returns the first channel bound to `port_id` whose counterparty end is
   `counterparty_channel_id`.

   This is how the counterparty side locates the path, since the channel
   metadata written by the relayer only records the channel id on the
   Lumera side.
*/
pub fn find_channel_by_counterparty<'a>(
    channels: &'a [Channel],
    port_id: &str,
    counterparty_channel_id: &str,
) -> Option<&'a Channel> {
    channels.iter().find(|channel| {
        channel.port_id == port_id && channel.counterparty.channel_id == counterparty_channel_id
    })
}

pub fn first_channel_by_port<'a>(channels: &'a [Channel], port_id: &str) -> Option<&'a Channel> {
    channels.iter().find(|channel| channel.port_id == port_id)
}
