// Configuration values for the two binaries.
// Nothing in the library reads the environment directly: binaries call
// `from_env()` once and hand the resulting values to each component, which
// keeps tests free to point everything at fixture directories.

use crate::error::ConfigError;
use crate::rewrite::KeyOrder;
use std::path::PathBuf;
use std::time::Duration;

pub const TOKEN_VAR: &str = "BLOB_READ_WRITE_TOKEN";
pub const DEFAULT_API_URL: &str = "https://blob.vercel-storage.com";
pub const DEFAULT_IMAGES_DIR: &str = "./images";
pub const DEFAULT_MAPPING_FILE: &str = "./blob-url-mapping.json";
pub const DEFAULT_UPLOAD_DELAY: Duration = Duration::from_millis(100);

/// Settings for `upload-images`.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub token: String,
    pub api_url: String,
    pub images_dir: PathBuf,
    pub mapping_file: PathBuf,
    pub delay: Duration,
}

/// Settings for `update-image-urls`.
#[derive(Debug, Clone)]
pub struct RewriteConfig {
    pub root: PathBuf,
    pub mapping_file: PathBuf,
    pub key_order: KeyOrder,
}

impl UploadConfig {
    /// Build from process environment. Fails before anything touches disk
    /// when the token is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_VAR)
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken(TOKEN_VAR))?;

        let delay = match lookup("UPLOAD_DELAY_MS") {
            Some(raw) => {
                let ms = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    name: "UPLOAD_DELAY_MS",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                Duration::from_millis(ms)
            }
            None => DEFAULT_UPLOAD_DELAY,
        };

        Ok(UploadConfig {
            token,
            api_url: lookup("BLOB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
            images_dir: lookup("IMAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGES_DIR)),
            mapping_file: mapping_file(&lookup),
            delay,
        })
    }
}

impl RewriteConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key_order = match lookup("REWRITE_KEY_ORDER") {
            Some(raw) => raw.parse::<KeyOrder>().map_err(|reason| ConfigError::Invalid {
                name: "REWRITE_KEY_ORDER",
                value: raw.clone(),
                reason,
            })?,
            None => KeyOrder::default(),
        };

        Ok(RewriteConfig {
            root: lookup("REWRITE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            mapping_file: mapping_file(&lookup),
            key_order,
        })
    }
}

fn mapping_file<F>(lookup: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup("BLOB_MAPPING_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MAPPING_FILE))
}
