pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Resolve a command's input: `--input` file first, then piped stdin JSON,
/// then the struct built from flags.
pub fn load_or_build<T, F>(path: Option<&str>, build: F) -> Result<T, Box<dyn std::error::Error>>
where
    T: DeserializeOwned,
    F: FnOnce() -> Result<T, Box<dyn std::error::Error>>,
{
    if let Some(path) = path {
        return file::read_json(path);
    }
    if let Some(data) = stdin::read_stdin()? {
        log::debug!("reading input from stdin");
        return Ok(serde_json::from_value(data)?);
    }
    build()
}
