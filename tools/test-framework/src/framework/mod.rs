/*!
   Framework code for making it easier to write test cases.

   Test cases implement [`IbcPathTest`](path::IbcPathTest) and are run with
   [`run_lumera_path_test`](path::run_lumera_path_test) or
   [`run_simd_path_test`](path::run_simd_path_test), which discover the relay
   path once before calling the test.
*/

pub mod base;
pub mod path;
