//! SkillSwap Control - CLI for SkillSwap progression and social state

use anyhow::Result;
use clap::Parser;
use skillswap_common::{SkillswapConfig, SkillswapError};
use skillswapctl::cli::Cli;
use skillswapctl::{commands, logging};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<SkillswapError>()
            .map(SkillswapError::code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = SkillswapConfig::load()?;
    logging::init(&config.log_level);
    commands::run(cli, config)
}
