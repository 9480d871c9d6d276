//! Shared CLI utilities.

use clap::Args;
use std::path::PathBuf;

use cal_config::Loader;

/// Env-file selection flags shared by every subcommand.
#[derive(Args)]
pub struct EnvFileArgs {
    /// Ingest this env file instead of discovering `.env` (must exist)
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Do not read any env file
    #[arg(long, conflicts_with = "env_file")]
    pub no_env_file: bool,
}

impl EnvFileArgs {
    /// No flag given: behave exactly like `cal_config::load()`.
    pub fn is_default(&self) -> bool {
        self.env_file.is_none() && !self.no_env_file
    }

    pub fn loader(&self) -> Loader {
        match (&self.env_file, self.no_env_file) {
            (_, true) => Loader::new().skip_env_file(),
            (Some(path), false) => Loader::new().env_file(path),
            (None, false) => Loader::new(),
        }
    }
}
