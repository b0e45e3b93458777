pub mod amount;
pub mod file;
pub mod policy;
pub mod stdin;

use serde::de::DeserializeOwned;

/// `--input` file first, then piped stdin. `None` when neither was given,
/// so the caller can fall back to individual flags.
pub fn read_input<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_json(path)?));
    }
    stdin::read_stdin()
}
