//! cal-config: inspect the startup configuration a cal backend process resolves

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
