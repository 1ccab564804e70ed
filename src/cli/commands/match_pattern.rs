//! asg match-pattern - glob matching without a guard instance.
//!
//! Pure computation: runs before the app context is built, so it neither
//! needs a project root nor adds audit noise.

use clap::Args;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::cli::output::emit_json;
use crate::error::Result;
use crate::security::matches_pattern;

#[derive(Args, Debug)]
pub struct MatchPatternArgs {
    /// Path to test
    pub path: String,

    /// Glob pattern (`**` crosses segments, `*` stays within one)
    pub pattern: String,
}

#[derive(Serialize)]
struct MatchOutput {
    path: String,
    pattern: String,
    matches: bool,
}

pub fn run(args: &MatchPatternArgs, format: OutputFormat) -> Result<()> {
    let matches = matches_pattern(&args.path, &args.pattern);

    if format == OutputFormat::Human {
        println!("{matches}");
        Ok(())
    } else {
        emit_json(&MatchOutput {
            path: args.path.clone(),
            pattern: args.pattern.clone(),
            matches,
        })
    }
}
