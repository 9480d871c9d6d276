//! Show command implementation

use anyhow::{Context, Result};
use clap::Args;

use super::utils::EnvFileArgs;
use cal_config::config::ProcessEnv;

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub env: EnvFileArgs,

    /// Print settings as a JSON object
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ShowArgs) -> Result<()> {
    let settings = if args.env.is_default() {
        cal_config::load()
    } else {
        args.env.loader().load(&mut ProcessEnv).context("Failed to load configuration")?
    };

    if args.json {
        let json = serde_json::to_string_pretty(&settings).context("Failed to render settings")?;
        println!("{}", json);
    } else {
        print!("{}", settings);
    }

    Ok(())
}
