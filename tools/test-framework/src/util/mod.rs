/*!
   Utility and helper functions used in the tests.
*/

pub mod assert;
pub mod file;
pub mod json;
pub mod random;
pub mod retry;
