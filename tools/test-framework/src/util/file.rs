/*!
   Filesystem utilities.
*/

use std::fs;
use std::path::Path;

use crate::error::Error;

/**
   Read an account address from a file written by the devnet setup,
   ignoring surrounding whitespace.
*/
pub fn read_address(path: impl AsRef<Path>) -> Result<String, Error> {
    let path = path.as_ref();

    let content = fs::read_to_string(path)
        .map_err(|e| Error::address_file_read(path.display().to_string(), e))?;

    let address = content.trim();
    if address.is_empty() {
        return Err(Error::empty_address_file(path.display().to_string()));
    }

    Ok(address.to_string())
}
