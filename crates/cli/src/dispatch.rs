//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the matching command handler.
//! - Hand each handler the part of the configuration it needs.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration loading (see `config_context`).

use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::commands;
use crate::config_context::ConfigCommandContext;

pub(crate) async fn run_command(cli: Cli, config: ConfigCommandContext) -> Result<()> {
    let output = cli.output.as_str();
    let output_file = cli.output_file.clone();

    match cli.command {
        Commands::Fields { file, side } => {
            commands::fields::run(&file, side, config.mapping_settings(), output, output_file)?;
        }
        Commands::Automap {
            source,
            target,
            export,
        } => {
            commands::automap::run(
                &source,
                &target,
                export.as_deref(),
                config.mapping_settings(),
                output,
                output_file,
            )?;
        }
        Commands::Preview {
            source,
            target,
            mappings,
        } => {
            commands::preview::run(
                &source,
                &target,
                mappings.as_deref(),
                config.mapping_settings(),
                output,
                output_file,
            )?;
        }
        Commands::Schema {
            source_type,
            target_type,
        } => {
            commands::schema::run(
                config.into_real_config()?,
                &source_type,
                &target_type,
                output,
                output_file,
            )
            .await?;
        }
        Commands::Test(args) => {
            commands::test_mappings::run(config.into_real_config()?, &args, output, output_file)
                .await?;
        }
        Commands::Save(args) => {
            commands::save::run(config.into_real_config()?, &args, output, output_file).await?;
        }
        Commands::Connections { command } => {
            commands::connections::run(config.into_real_config()?, command, output, output_file)
                .await?;
        }
    }

    Ok(())
}
