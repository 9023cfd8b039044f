use dexscreener_core::{DexscreenerError, ErrorKind, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] DexscreenerError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("blocking worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Api(error) => match error.kind() {
                ErrorKind::Validation => 2,
                ErrorKind::RateLimitExceeded => 3,
                ErrorKind::Protocol => 4,
                ErrorKind::Network => 5,
                ErrorKind::Timeout => 6,
            },
            Self::Serialization(_) => 7,
            Self::Io(_) => 10,
            Self::Worker(_) => 1,
        }
    }

    /// Response payload worth echoing next to the error line.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::Api(error) => error.response_data().map(ToString::to_string),
            _ => None,
        }
    }
}
