// The mapping artifact: old image path -> blob URL, persisted as a flat
// JSON object. Key order is preserved on load and save because the
// rewriter can be asked to replace keys in file order.

use crate::error::MappingError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of path spellings recorded for every uploaded image.
pub const SPELLINGS_PER_IMAGE: usize = 3;

/// The relative spellings an image reference may take in markup, in the
/// order they are written to the mapping.
pub fn key_spellings(file_name: &str) -> [String; SPELLINGS_PER_IMAGE] {
    [
        format!("../images/{file_name}"),
        format!("/images/{file_name}"),
        format!("images/{file_name}"),
    ]
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlMapping(IndexMap<String, String>);

impl UrlMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(file_name, url)` pairs, three keys per pair.
    pub fn from_uploads<'a, I>(uploads: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut mapping = UrlMapping::new();
        for (file_name, url) in uploads {
            for key in key_spellings(file_name) {
                mapping.insert(key, url.to_string());
            }
        }
        mapping
    }

    pub fn insert(&mut self, key: impl Into<String>, url: impl Into<String>) {
        self.0.insert(key.into(), url.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Approximate number of images, assuming three spellings each.
    pub fn image_count(&self) -> usize {
        self.0.len() / SPELLINGS_PER_IMAGE
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Read and parse a mapping file. A missing file is reported as
    /// `MappingError::NotFound` so callers can print the right hint.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        if !path.is_file() {
            return Err(MappingError::NotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path).map_err(|source| MappingError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| MappingError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the mapping as 2-space indented JSON, replacing any old file.
    pub fn save(&self, path: &Path) -> Result<(), MappingError> {
        let json = serde_json::to_string_pretty(self).map_err(MappingError::Encode)?;
        std::fs::write(path, json).map_err(|source| MappingError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
