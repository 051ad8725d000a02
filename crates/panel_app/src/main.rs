mod platform;

use anyhow::Result;
use clap::Parser;

use platform::cli::Cli;
use platform::config::PanelConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = PanelConfig::load(cli.config.as_deref())?
        .apply_cli(&cli)
        .resolve()?;

    platform::logging::initialize(settings.log, settings.log_level);
    platform::run_app(settings)
}
