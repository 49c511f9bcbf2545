/*!
   All test cases are placed within this module.

   The checks run against live chains, so each side of the relay path is
   gated behind its own feature. Without any feature only the shared
   test case definitions are compiled.

   We expose the modules as public so that cargo doc
   will pick up the definition by default.
*/
