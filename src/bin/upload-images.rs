// Entrypoint for the uploader.
// - Reads configuration once; a missing token exits with status 1 before
//   the image directory is read.
// - Per-image failures are reported but still end in a normal exit.

use blob_migrate::api::BlobClient;
use blob_migrate::config::UploadConfig;
use blob_migrate::error::FATAL_EXIT_CODE;
use blob_migrate::report::{self, Reporter};
use blob_migrate::upload::{run_upload, FixedDelay};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    blob_migrate::init_tracing();
    println!("Starting blob storage upload...\n");

    let config = match UploadConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            report::fatal(&e.to_string(), &e.remediation());
            return Ok(ExitCode::from(FATAL_EXIT_CODE));
        }
    };

    let client = BlobClient::from_config(&config)?;
    let reporter = Reporter::with_bar(0);
    let run = run_upload(&config, &client, FixedDelay(config.delay), &reporter)?;

    let Some(mapping_file) = run.mapping_file else {
        return Ok(ExitCode::SUCCESS);
    };

    println!("\nUpload complete!");
    println!(
        "Successfully uploaded {} out of {} images",
        run.summary.succeeded(),
        run.found
    );
    println!("URL mapping saved to {}", mapping_file.display());
    let review = format!("Review {}", mapping_file.display());
    report::next_steps(&[
        review.as_str(),
        "Run update-image-urls to replace image URLs in HTML files",
    ]);
    Ok(ExitCode::SUCCESS)
}
