/*!
   Constructs for running test cases against an already established IBC
   relay path, discovered once per test process and shared between the
   test cases.
*/

use once_cell::sync::OnceCell;
use tracing::info;

use crate::bootstrap::discovery::bootstrap_ibc_path;
use crate::bootstrap::init::init_test;
use crate::error::Error;
use crate::framework::base::{run_test, PrimitiveTest};
use crate::types::config::{SuiteSide, TestConfig};
use crate::types::env::{non_empty_env, write_env, ProcessEnv};
use crate::types::path::IbcPathContext;

static LUMERA_PATH: OnceCell<IbcPathContext> = OnceCell::new();

static SIMD_PATH: OnceCell<IbcPathContext> = OnceCell::new();

/**
   Runs a test case that implements [`IbcPathTest`] against the path as
   seen from the Lumera chain.
*/
pub fn run_lumera_path_test<Test: IbcPathTest>(test: &Test) -> Result<(), Error> {
    run_test(&RunIbcPathTest::new(SuiteSide::Lumera, &LUMERA_PATH, test))
}

/**
   Runs a test case that implements [`IbcPathTest`] against the path as
   seen from the simd chain.
*/
pub fn run_simd_path_test<Test: IbcPathTest>(test: &Test) -> Result<(), Error> {
    run_test(&RunIbcPathTest::new(SuiteSide::Simd, &SIMD_PATH, test))
}

/**
   This trait is implemented for test cases that inspect an existing
   relay path.

   The [`IbcPathContext`] is shared by every test case of the same side,
   so test cases only read from it and can run in any order.
*/
pub trait IbcPathTest {
    /// Test runner
    fn run(&self, config: &TestConfig, path: &IbcPathContext) -> Result<(), Error>;
}

/**
   A wrapper type that lifts a test case that implements [`IbcPathTest`]
   into a test case that implements [`PrimitiveTest`].

   The path is discovered by the first test case that runs, and reused by
   every later one. A failed discovery is not cached, so each test case
   reports the discovery error on its own.
*/
pub struct RunIbcPathTest<'a, Test> {
    pub side: SuiteSide,

    pub snapshot: &'a OnceCell<IbcPathContext>,

    /// Inner test
    pub test: &'a Test,
}

impl<'a, Test> RunIbcPathTest<'a, Test> {
    pub fn new(side: SuiteSide, snapshot: &'a OnceCell<IbcPathContext>, test: &'a Test) -> Self {
        Self {
            side,
            snapshot,
            test,
        }
    }
}

impl<'a, Test: IbcPathTest> PrimitiveTest for RunIbcPathTest<'a, Test> {
    fn run(&self) -> Result<(), Error> {
        let path = self.snapshot.get_or_try_init(|| {
            let config = init_test(self.side)?;

            let path = bootstrap_ibc_path(&config)?;

            if let Some(env_path) = non_empty_env(&ProcessEnv, "IBC_PATH_ENV_FILE") {
                write_env(&env_path, &path)?;

                info!("written path environment to {}", env_path);
            }

            Ok::<_, Error>(path)
        })?;

        self.test.run(&path.config, path)
    }
}
