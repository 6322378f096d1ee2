// Entrypoint for the HTML rewriter.
// - A missing mapping file exits with status 1 and a hint to run the
//   uploader first.
// - Read or write failures on a markup file end the run with an error.

use blob_migrate::config::RewriteConfig;
use blob_migrate::error::{MappingError, FATAL_EXIT_CODE};
use blob_migrate::mapping::UrlMapping;
use blob_migrate::report::{self, Reporter};
use blob_migrate::rewrite::run_rewrite;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    blob_migrate::init_tracing();
    println!("Starting image URL update...\n");

    let config = match RewriteConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            report::fatal(&e.to_string(), &e.remediation());
            return Ok(ExitCode::from(FATAL_EXIT_CODE));
        }
    };

    let mapping = match UrlMapping::load(&config.mapping_file) {
        Ok(mapping) => mapping,
        Err(e @ MappingError::NotFound(_)) => {
            report::fatal(&e.to_string(), &e.remediation());
            return Ok(ExitCode::from(FATAL_EXIT_CODE));
        }
        Err(e) => return Err(e.into()),
    };

    let run = run_rewrite(&config, &mapping, &Reporter::plain())?;

    println!("\nUpdate complete!");
    for file in run.files.iter().filter(|f| f.replacements > 0) {
        println!("  {}: {}", file.path.display(), file.replacements);
    }
    println!(
        "Updated {} image references across {} files",
        run.total(),
        run.files.len()
    );
    report::next_steps(&[
        "Review the changes with: git diff",
        "Test your site locally",
        "Commit and push the rewritten pages",
        "Optional: delete the images directory to save space",
    ]);
    Ok(ExitCode::SUCCESS)
}
