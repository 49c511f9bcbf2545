/*!
   Helper functions for setting up test cases in an imperative way.

   Normal test authors should have no need to call functions provided
   by the `bootstrap` module, as they are implicitly called by the
   [`framework`](crate::framework) constructs.

   Advanced test authors with needs for more flexibility can call
   [`bootstrap_ibc_path`](discovery::bootstrap_ibc_path) directly, e.g.
   with a [`TestConfig`](crate::types::config::TestConfig) resolved from
   a custom environment.
*/

pub mod discovery;
pub mod init;
