/*!
   IBC data types as reported by the chain, and the helpers to interpret
   them.
*/

pub mod channel;
pub mod client;
pub mod connection;
pub mod denom;
pub mod state;
pub mod token;
