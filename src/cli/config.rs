use clap::{Parser, Subcommand};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "ui-fixture",
    version,
    about = "Configuration-driven UI test fixtures"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to settings file (default: ui-fixture.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a UI descriptor and report configuration errors
    Validate {
        /// Path to the UI descriptor XML
        #[arg(long)]
        ui: String,
    },

    /// Print every form and its widget tree
    Inspect {
        /// Path to the UI descriptor XML
        #[arg(long)]
        ui: String,
    },

    /// Run fixture scripts against a live browser
    Run {
        /// Path to the UI descriptor XML
        #[arg(long)]
        ui: String,

        /// Path to a script YAML file or a directory of them
        #[arg(long)]
        script: String,

        /// Browser server script (overrides the settings file)
        #[arg(long)]
        browser_server: Option<String>,
    },
}
