//! Explain command implementation

use anyhow::{Context, Result};
use clap::Args;

use super::utils::EnvFileArgs;
use cal_config::config::{ProcessEnv, Setting};

#[derive(Args)]
pub struct ExplainArgs {
    #[command(flatten)]
    pub env: EnvFileArgs,
}

pub fn run(args: ExplainArgs) -> Result<()> {
    let resolution =
        args.env.loader().resolve(&mut ProcessEnv).context("Failed to load configuration")?;

    match &resolution.env_file.path {
        Some(path) => {
            println!("Env file: {}", path.display());
            if !resolution.env_file.applied.is_empty() {
                println!("  Applied: {}", resolution.env_file.applied.join(", "));
            }
            if !resolution.env_file.skipped.is_empty() {
                println!("  Skipped (already set): {}", resolution.env_file.skipped.join(", "));
            }
        }
        None => println!("Env file: none"),
    }

    println!("Settings:");
    for setting in Setting::ALL {
        let source = resolution
            .source(setting)
            .map(ToString::to_string)
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "  {}={} ({})",
            setting.key(),
            resolution.settings.display_value(setting),
            source
        );
    }

    Ok(())
}
