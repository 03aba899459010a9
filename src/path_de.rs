use serde::de::DeserializeOwned;

use crate::error::ConfigError;

/// Deserialize with JSON-path context in error messages. Anything but
/// whitespace after the document is an error.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, ConfigError> {
    let mut de = serde_json::Deserializer::from_str(src);
    let value = serde_path_to_error::deserialize::<_, T>(&mut de).map_err(|err| ConfigError::Parse {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })?;
    de.end().map_err(|err| ConfigError::Parse {
        path: ".".to_string(),
        message: err.to_string(),
    })?;
    Ok(value)
}
