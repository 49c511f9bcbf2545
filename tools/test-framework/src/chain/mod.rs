/*!
   Functionalities for interacting with the chains under test, through
   their command line binary and their REST endpoint.
*/

pub mod cli;
pub mod driver;
pub mod exec;
pub mod rest;
