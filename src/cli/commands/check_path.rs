//! asg check-path - file access classification.

use clap::Args;
use std::path::PathBuf;

use crate::app::AppContext;
use crate::cli::OutputFormat;
use crate::cli::output::{HumanLayout, decision_badge, emit_human, emit_output};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct CheckPathArgs {
    /// Path to classify
    pub path: PathBuf,
}

pub fn run(ctx: &AppContext, args: &CheckPathArgs) -> Result<()> {
    let decision = ctx.guard.check_file_access(&args.path)?;

    if ctx.output_format == OutputFormat::Human {
        let mut layout = HumanLayout::new();
        layout
            .push_line(decision_badge(
                decision.allowed,
                decision.require_confirmation,
            ))
            .kv("path", &args.path.display().to_string())
            .kv("reason", &decision.reason);
        emit_human(layout);
        Ok(())
    } else {
        emit_output(ctx, &decision)
    }
}
