// Error types shared by both migration binaries.
// Fatal precondition errors carry the remediation text printed before the
// process exits with status 1. Per-image upload failures are not errors
// here; they are folded into `upload::UploadOutcome`.

use std::path::PathBuf;
use thiserror::Error;

/// Exit status used for every fatal precondition failure.
pub const FATAL_EXIT_CODE: u8 = 1;

/// Problems building a configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingToken(&'static str),

    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    /// Guidance lines shown under the error message.
    pub fn remediation(&self) -> Vec<String> {
        match self {
            ConfigError::MissingToken(var) => vec![
                "Please follow these steps:".into(),
                "1. Go to https://vercel.com/dashboard".into(),
                "2. Select your project".into(),
                "3. Go to Settings > Blob".into(),
                "4. Copy your Blob Read-Write Token".into(),
                format!("5. Run: export {var}=\"your-token-here\""),
                "6. Then run this command again".into(),
            ],
            ConfigError::Invalid { name, .. } => {
                vec![format!("Unset {name} or give it a valid value.")]
            }
        }
    }
}

/// Problems with the mapping artifact on disk.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode mapping: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MappingError {
    pub fn remediation(&self) -> Vec<String> {
        match self {
            MappingError::NotFound(_) => vec!["Please run upload-images first".into()],
            _ => Vec::new(),
        }
    }
}

/// A directory could not be listed during a walk. The whole walk fails.
#[derive(Debug, Error)]
#[error("failed to walk {}: {source}", .root.display())]
pub struct WalkError {
    pub root: PathBuf,
    #[source]
    pub source: walkdir::Error,
}

/// Failures talking to the blob store.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status} - {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}
