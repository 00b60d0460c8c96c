//! Test command implementation.
//!
//! Responsibilities:
//! - Build a test request from the chosen mapping set and run it through
//!   the preview runner.
//! - Print the sample data next to what the server made of it.
//!
//! Does NOT handle:
//! - Debouncing; a single command issues a single test.

use std::path::PathBuf;

use anyhow::Result;
use tower_client::{PreviewOutcome, PreviewRunner};
use tower_config::Config;
use tower_mapping::TestMappingsRequest;
use tracing::info;

use crate::args::RemoteMappingArgs;
use crate::commands::{build_client, remote_session};
use crate::formatters::{OutputFormat, get_formatter, output_result};

pub async fn run(
    config: Config,
    args: &RemoteMappingArgs,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<()> {
    let client = build_client(&config)?;
    let session = remote_session(&client, args, config.mapping.max_depth).await?;
    session.report_warnings();

    let request = TestMappingsRequest::build(
        &args.connection,
        &args.source_type,
        &args.target_type,
        session.store.mappings(),
        &session.source_fields,
        &session.target_fields,
    )?;
    info!(
        connection = %args.connection,
        mappings = request.mapping_metadata.len(),
        "Testing mappings"
    );

    let runner = PreviewRunner::from_settings(client, &config.mapping);
    let result = match runner.test_now(request).await {
        PreviewOutcome::Updated(result) => result,
        PreviewOutcome::Skipped => {
            eprintln!("No mappings to test.");
            return Ok(());
        }
        PreviewOutcome::Failed(e) => {
            return Err(anyhow::Error::new(e).context("Mapping test failed"));
        }
        other => anyhow::bail!("Mapping test did not run: {:?}", other),
    };

    let format: OutputFormat = output_format.parse()?;
    let output = get_formatter(format).format_test_result(&result)?;
    output_result(&output, format, output_file.as_ref())
}
