/*!
   Definitions of the data types used by the test framework.
*/

pub mod channel_info;
pub mod config;
pub mod env;
pub mod path;
