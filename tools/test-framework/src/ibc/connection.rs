/*!
   Connection ends as reported by `q ibc connection connections`.
*/

use serde::Deserialize;

use crate::ibc::state::is_open_state;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Connection {
    pub id: String,
    pub client_id: String,
    pub state: String,
    pub counterparty: ConnectionCounterparty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionCounterparty {
    pub client_id: String,
    pub connection_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConnectionsResponse {
    pub connections: Vec<Connection>,
}

impl Connection {
    pub fn is_open(&self) -> bool {
        is_open_state(&self.state)
    }
}

pub fn find_connection_by_id<'a>(
    connections: &'a [Connection],
    connection_id: &str,
) -> Option<&'a Connection> {
    connections
        .iter()
        .find(|connection| connection.id == connection_id)
}

/**
   Returns the first connection in list order that is open.

   Used as a fallback when the connection hop recorded on the channel is
   not in the listing, e.g. after the relayer re-created the connection.
*/
pub fn first_open_connection(connections: &[Connection]) -> Option<&Connection> {
    connections.iter().find(|connection| connection.is_open())
}
