//! Config Commands

use anyhow::{bail, Result};
use clap::Subcommand;

use super::Context;
use crate::output::{print_success, OutputFormat};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn execute(cmd: ConfigCommands, ctx: &Context) -> Result<()> {
    match cmd {
        ConfigCommands::Show => match ctx.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ctx.config)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&ctx.config)?),
            _ => print!("{}", toml::to_string_pretty(&ctx.config)?),
        },

        ConfigCommands::Init { force } => {
            if ctx.config_path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    ctx.config_path.display()
                );
            }
            ctx.config.save(&ctx.config_path)?;
            print_success(&format!("Wrote {}", ctx.config_path.display()));
        }
    }
    Ok(())
}
