/*!
   Wrappers around the subcommands of a Cosmos SDK chain binary.
*/

pub mod query;
pub mod transfer;
