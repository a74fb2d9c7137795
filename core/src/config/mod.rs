pub use grid::ConfigGrid;
pub use shell::{ConfigElectronShell, ConfigShell};

mod grid;
mod shell;

use std::{fs::File, io::BufReader, path::Path};

use serde::de::DeserializeOwned;

use crate::error::ConfigError;

/// Read and deserialize a JSON file.
pub(crate) fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
