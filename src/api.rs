// Blob store client: a small blocking HTTP client that talks to the
// Vercel Blob API. Uploads are strictly one at a time, so there is no
// reason to pull an async runtime into the binaries.

use crate::config::UploadConfig;
use crate::error::ApiError;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

const API_VERSION: &str = "7";

/// Anything that can store a blob under a name and hand back its public URL.
/// The uploader only needs this; tests substitute an in-memory store.
pub trait BlobStore {
    fn put(&self, pathname: &str, body: Vec<u8>, options: &PutOptions) -> Result<PutBlobResult, ApiError>;
}

/// Blob access level. Only public blobs are served without a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    #[default]
    Public,
}

impl Access {
    fn as_str(self) -> &'static str {
        match self {
            Access::Public => "public",
        }
    }
}

/// Options for a single `put`.
#[derive(Debug, Clone, Default)]
pub struct PutOptions {
    pub access: Access,
    pub content_type: Option<String>,
    /// When false the blob keeps exactly the given pathname.
    pub add_random_suffix: bool,
    /// Replace an existing blob with the same pathname.
    pub allow_overwrite: bool,
}

impl PutOptions {
    /// Public, stable-named upload with the given content type.
    pub fn public_stable(content_type: &str) -> Self {
        PutOptions {
            access: Access::Public,
            content_type: Some(content_type.to_string()),
            add_random_suffix: false,
            allow_overwrite: true,
        }
    }
}

/// Response of the put endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PutBlobResult {
    pub url: String,
    #[serde(default)]
    pub download_url: Option<String>,
    pub pathname: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub content_disposition: Option<String>,
}

/// Filters for `list`.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub limit: Option<u32>,
    pub prefix: Option<String>,
    pub cursor: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListBlobEntry {
    pub url: String,
    #[serde(default)]
    pub download_url: Option<String>,
    pub pathname: String,
    pub size: u64,
    pub uploaded_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListBlobResult {
    pub blobs: Vec<ListBlobEntry>,
    #[serde(default)]
    pub cursor: Option<String>,
    pub has_more: bool,
}

/// Blocking client holding the reqwest client, API base URL and the
/// read-write token.
#[derive(Clone)]
pub struct BlobClient {
    client: Client,
    base_url: String,
    token: String,
}

impl BlobClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder().build()?;
        Ok(BlobClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn from_config(config: &UploadConfig) -> Result<Self, ApiError> {
        Self::new(config.api_url.clone(), config.token.clone())
    }

    /// Authorization plus API version, sent on every request.
    fn auth_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))?,
        );
        headers.insert("x-api-version", HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }

    /// List stored blobs, one page at a time.
    pub fn list(&self, options: &ListOptions) -> Result<ListBlobResult, ApiError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = options.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(prefix) = &options.prefix {
            query.push(("prefix", prefix.clone()));
        }
        if let Some(cursor) = &options.cursor {
            query.push(("cursor", cursor.clone()));
        }

        let res = self
            .client
            .get(&self.base_url)
            .headers(self.auth_headers()?)
            .query(&query)
            .send()?;
        Ok(check_status(res)?.json()?)
    }
}

impl BlobStore for BlobClient {
    fn put(&self, pathname: &str, body: Vec<u8>, options: &PutOptions) -> Result<PutBlobResult, ApiError> {
        let mut headers = self.auth_headers()?;
        headers.insert("x-access", HeaderValue::from_static(options.access.as_str()));
        headers.insert(
            "x-add-random-suffix",
            HeaderValue::from_static(if options.add_random_suffix { "1" } else { "0" }),
        );
        if options.allow_overwrite {
            headers.insert("x-allow-overwrite", HeaderValue::from_static("1"));
        }
        if let Some(ct) = &options.content_type {
            headers.insert("x-content-type", HeaderValue::from_str(ct)?);
            headers.insert(CONTENT_TYPE, HeaderValue::from_str(ct)?);
        }

        debug!(pathname, bytes = body.len(), "put blob");
        let res = self
            .client
            .put(format!("{}/", self.base_url))
            .query(&[("pathname", pathname)])
            .headers(headers)
            .body(body)
            .send()?;
        Ok(check_status(res)?.json()?)
    }
}

/// Turn a non-success response into `ApiError::Status` with its body text.
fn check_status(res: Response) -> Result<Response, ApiError> {
    if res.status().is_success() {
        return Ok(res);
    }
    let status = res.status();
    let body = res.text().unwrap_or_default();
    Err(ApiError::Status { status, body })
}
