//! asg - Agent Safety Guard CLI
//!
//! Secret scanning, path policy, and command risk checks for automation
//! tools, with quarantine capture and an append-only audit log.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use asg::Result;
use asg::app::AppContext;
use asg::cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.robot {
                // Robot mode: JSON error output to stdout
                let error_json = serde_json::json!({
                    "error": true,
                    "code": e.code(),
                    "message": e.to_string(),
                });
                println!("{}", serde_json::to_string(&error_json).unwrap_or_default());
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Commands that must not (init) or need not (match-pattern) build a
    // guard instance first.
    match &cli.command {
        Commands::Init(args) => {
            return asg::cli::commands::init::run_without_context(cli, args);
        }
        Commands::MatchPattern(args) => {
            return asg::cli::commands::match_pattern::run(args, cli.output_format());
        }
        _ => {}
    }

    let ctx = AppContext::from_cli(cli)?;
    asg::cli::commands::run(&ctx, &cli.command)
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,asg=info",
        1 => "info,asg=debug",
        2 => "debug,asg=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.robot {
        // JSON logging for robot mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Human-readable logging
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
