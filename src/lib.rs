// Library root
// -----------
// This crate backs two one-off migration binaries that move site images to
// blob storage:
//
// - `upload-images` pushes every file in the image directory to the blob
//   store and writes a path -> URL mapping file.
// - `update-image-urls` reads that mapping and rewrites image paths inside
//   the HTML files of the current tree.
//
// Module responsibilities:
// - `config`: explicit settings for each binary, built from the environment.
// - `error`: fatal error types and their remediation text.
// - `walker`: recursive file discovery that skips hidden and dependency dirs.
// - `api`: blocking blob store client (`put`, `list`) and the `BlobStore` seam.
// - `content_type`: extension to content-type table.
// - `mapping`: the ordered mapping artifact shared by both binaries.
// - `upload`: serial upload queue with per-image outcomes.
// - `rewrite`: literal path substitution in markup files.
// - `report`: human-readable console output.
pub mod api;
pub mod config;
pub mod content_type;
pub mod error;
pub mod mapping;
pub mod report;
pub mod rewrite;
pub mod upload;
pub mod walker;

use tracing_subscriber::EnvFilter;

/// Install the stderr diagnostics subscriber. `RUST_LOG` overrides the
/// default `warn` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
