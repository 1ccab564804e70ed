//! CLI command implementations.
//!
//! Each subcommand has its own module with an Args struct and a run()
//! function.

use clap::Subcommand;

pub mod audit;
pub mod check_command;
pub mod check_path;
pub mod init;
pub mod match_pattern;
pub mod quarantine;
pub mod scan;

use crate::app::AppContext;
use crate::error::Result;

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Init(args) => init::run(ctx, args),
        Commands::Scan(args) => scan::run(ctx, args),
        Commands::CheckPath(args) => check_path::run(ctx, args),
        Commands::CheckCommand(args) => check_command::run(ctx, args),
        Commands::MatchPattern(args) => match_pattern::run(args, ctx.output_format),
        Commands::Audit(args) => audit::run(ctx, args),
        Commands::Quarantine(args) => quarantine::run(ctx, args),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the guard home (quarantine dir, audit log, config)
    Init(init::InitArgs),

    /// Scan content for secrets; unsafe content is quarantined
    Scan(scan::ScanArgs),

    /// Check whether a filesystem path may be accessed
    CheckPath(check_path::CheckPathArgs),

    /// Check whether a shell command may be executed
    CheckCommand(check_command::CheckCommandArgs),

    /// Match a path against a glob pattern
    MatchPattern(match_pattern::MatchPatternArgs),

    /// Inspect the audit log
    Audit(audit::AuditArgs),

    /// Inspect quarantine records
    Quarantine(quarantine::QuarantineArgs),
}
