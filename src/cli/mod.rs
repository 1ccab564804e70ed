//! CLI definition.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

pub use commands::Commands;

#[derive(Parser, Debug)]
#[command(
    name = "asg",
    version,
    about = "Agent Safety Guard - secret scanning, path policy, and command risk checks"
)]
pub struct Cli {
    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub robot: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Explicit config file path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Guard home directory (quarantine + audit log live here)
    #[arg(long, global = true, value_name = "DIR")]
    pub guard_root: Option<PathBuf>,

    /// Project root the access policy is scoped to
    #[arg(long, global = true, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl Cli {
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        let env_robot = std::env::var("ASG_ROBOT")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);
        if self.robot || env_robot {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn robot_flag_selects_json() {
        let cli = Cli::parse_from(["asg", "--robot", "check-command", "git status"]);
        assert_eq!(cli.output_format(), OutputFormat::Json);
    }
}
