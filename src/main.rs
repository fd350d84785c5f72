use clap::Parser;
use ui_fixture::cli::commands::{cmd_inspect, cmd_run, cmd_validate};
use ui_fixture::cli::config::{Cli, Commands};
use ui_fixture::cli::logging::init_logging;
use ui_fixture::config::settings::load_settings;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Validate { ui } => cmd_validate(&ui)?,
        Commands::Inspect { ui } => cmd_inspect(&ui)?,
        Commands::Run {
            ui,
            script,
            browser_server,
        } => {
            // Settings: CLI > config file > defaults
            let mut settings = load_settings(cli.config.as_deref())?;
            if let Some(server) = browser_server {
                settings.browser_server = server;
            }
            let all_passed = cmd_run(&ui, &script, settings)?;
            if !all_passed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
