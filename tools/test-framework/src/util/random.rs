/*!
   Utilities for random value generation.
*/

use rand::Rng;
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::error::Error;

pub fn random_u32() -> u32 {
    let mut rng = rand::thread_rng();
    rng.gen()
}

/**
   Create a fresh directory under the system temp dir, e.g. for fixture
   files. The directory is not cleaned up, so that it can be inspected
   after a failing test.
*/
pub fn scratch_dir(prefix: &str) -> Result<PathBuf, Error> {
    let dir = env::temp_dir().join(format!("lumera-ibc-{}-{}", prefix, random_u32()));

    fs::create_dir_all(&dir)?;

    Ok(dir)
}
