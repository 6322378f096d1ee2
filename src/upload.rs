// Uploader: pushes every image in a flat directory to the blob store, one
// request at a time, and records the resulting URLs in the mapping file.
//
// A failed image never stops the batch. Each image ends up as an
// `UploadOutcome`, and the run as an `UploadSummary` the binary reports.

use crate::api::{BlobStore, PutOptions};
use crate::config::UploadConfig;
use crate::content_type;
use crate::error::WalkError;
use crate::mapping::UrlMapping;
use crate::report::Reporter;
use crate::walker::{self, Walker};
use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// An image discovered in the image directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub path: PathBuf,
    pub file_name: String,
}

/// What happened to one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded { file_name: String, url: String },
    Failed { file_name: String, reason: String },
}

impl UploadOutcome {
    pub fn file_name(&self) -> &str {
        match self {
            UploadOutcome::Uploaded { file_name, .. } | UploadOutcome::Failed { file_name, .. } => {
                file_name.as_str()
            }
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            UploadOutcome::Uploaded { url, .. } => Some(url.as_str()),
            UploadOutcome::Failed { .. } => None,
        }
    }
}

/// Aggregate of a whole batch, in upload order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub outcomes: Vec<UploadOutcome>,
}

impl UploadSummary {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.url().is_some()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    /// Mapping for every successful upload; failures are left out.
    pub fn mapping(&self) -> UrlMapping {
        UrlMapping::from_uploads(
            self.outcomes
                .iter()
                .filter_map(|o| o.url().map(|url| (o.file_name(), url))),
        )
    }
}

/// Pause taken between two consecutive uploads.
pub trait Throttle {
    fn pause(&self);
}

/// Blocking sleep for a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Throttle for FixedDelay {
    fn pause(&self) {
        if !self.0.is_zero() {
            thread::sleep(self.0);
        }
    }
}

/// No pause at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Throttle for NoDelay {
    fn pause(&self) {}
}

/// List the images directly inside `dir` (no recursion).
pub fn discover_images(dir: &Path) -> Result<Vec<ImageRecord>, WalkError> {
    let files = Walker::new(dir).max_depth(1).files(walker::is_image)?;
    Ok(files
        .into_iter()
        .map(|path| {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ImageRecord { path, file_name }
        })
        .collect())
}

/// Serial upload queue: one request in flight, a throttle pause between
/// requests.
pub struct UploadQueue<'a, S: BlobStore + ?Sized, T: Throttle> {
    store: &'a S,
    throttle: T,
    pending: VecDeque<ImageRecord>,
}

impl<'a, S: BlobStore + ?Sized, T: Throttle> UploadQueue<'a, S, T> {
    pub fn new(store: &'a S, throttle: T, images: impl IntoIterator<Item = ImageRecord>) -> Self {
        UploadQueue {
            store,
            throttle,
            pending: images.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drain the queue, returning one outcome per image.
    pub fn run(mut self, reporter: &Reporter) -> UploadSummary {
        let mut summary = UploadSummary::default();
        while let Some(image) = self.pending.pop_front() {
            reporter.set_message(image.file_name.clone());
            reporter.line(format!("Uploading {}...", image.file_name));

            let outcome = upload_one(self.store, &image);
            match &outcome {
                UploadOutcome::Uploaded { file_name, url } => {
                    reporter.success(format!("Uploaded: {file_name} -> {url}"));
                }
                UploadOutcome::Failed { file_name, reason } => {
                    reporter.failure(format!("Failed to upload {file_name}: {reason}"));
                }
            }
            summary.outcomes.push(outcome);
            reporter.inc();

            if !self.pending.is_empty() {
                self.throttle.pause();
            }
        }
        reporter.finish();
        summary
    }
}

/// Read one image and put it under its bare file name.
pub fn upload_one<S: BlobStore + ?Sized>(store: &S, image: &ImageRecord) -> UploadOutcome {
    let failed = |reason: String| {
        warn!(file = %image.file_name, %reason, "upload failed");
        UploadOutcome::Failed {
            file_name: image.file_name.clone(),
            reason,
        }
    };

    let body = match std::fs::read(&image.path) {
        Ok(body) => body,
        Err(e) => return failed(e.to_string()),
    };
    let options = PutOptions::public_stable(content_type::for_path(&image.path));

    match store.put(&image.file_name, body, &options) {
        Ok(blob) => {
            debug!(file = %image.file_name, url = %blob.url, "uploaded");
            UploadOutcome::Uploaded {
                file_name: image.file_name.clone(),
                url: blob.url,
            }
        }
        Err(e) => failed(e.to_string()),
    }
}

/// Result of a full uploader run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRun {
    pub found: usize,
    pub summary: UploadSummary,
    /// Where the mapping was written; `None` when there was nothing to upload.
    pub mapping_file: Option<PathBuf>,
}

/// Discover, upload, and write the mapping file.
pub fn run_upload<S, T>(config: &UploadConfig, store: &S, throttle: T, reporter: &Reporter) -> Result<UploadRun>
where
    S: BlobStore + ?Sized,
    T: Throttle,
{
    let images = discover_images(&config.images_dir)
        .with_context(|| format!("Failed to list images in {}", config.images_dir.display()))?;
    let found = images.len();
    reporter.line(format!("{found} images found"));

    if images.is_empty() {
        reporter.line("No images found to upload.");
        reporter.finish();
        return Ok(UploadRun {
            found,
            summary: UploadSummary::default(),
            mapping_file: None,
        });
    }

    reporter.set_length(found as u64);
    let summary = UploadQueue::new(store, throttle, images).run(reporter);

    summary
        .mapping()
        .save(&config.mapping_file)
        .context("Failed to save url mapping")?;

    Ok(UploadRun {
        found,
        summary,
        mapping_file: Some(config.mapping_file.clone()),
    })
}
