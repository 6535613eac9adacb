use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenieError {
    #[error("Endpoint not available error: {0}")]
    FileDownloadError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Tch tensor error: {0}")]
    TchError(String),

    #[error("Invalid configuration error: {0}")]
    InvalidConfigurationError(String),

    #[error("Inference backend error: {0}")]
    BackendError(String),

    #[error("Model worker error: {0}")]
    WorkerError(String),
}

#[cfg(feature = "remote")]
impl From<reqwest::Error> for GenieError {
    fn from(error: reqwest::Error) -> Self {
        GenieError::FileDownloadError(error.to_string())
    }
}

impl From<std::io::Error> for GenieError {
    fn from(error: std::io::Error) -> Self {
        GenieError::IOError(error.to_string())
    }
}

impl From<serde_json::Error> for GenieError {
    fn from(error: serde_json::Error) -> Self {
        GenieError::InvalidConfigurationError(error.to_string())
    }
}

#[cfg(feature = "local")]
impl From<tch::TchError> for GenieError {
    fn from(error: tch::TchError) -> Self {
        GenieError::TchError(error.to_string())
    }
}

#[cfg(feature = "local")]
impl From<rust_bert::RustBertError> for GenieError {
    fn from(error: rust_bert::RustBertError) -> Self {
        match error {
            rust_bert::RustBertError::FileDownloadError(message) => {
                GenieError::FileDownloadError(message)
            }
            rust_bert::RustBertError::IOError(message) => GenieError::IOError(message),
            rust_bert::RustBertError::TchError(message) => GenieError::TchError(message),
            other => GenieError::BackendError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_keep_their_message() {
        let error: GenieError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "config.json missing").into();
        assert!(matches!(error, GenieError::IOError(_)));
        assert_eq!(error.to_string(), "IO error: config.json missing");
    }

    #[test]
    fn json_errors_are_configuration_errors() {
        let error: GenieError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(error, GenieError::InvalidConfigurationError(_)));
    }
}
