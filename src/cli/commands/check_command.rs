//! asg check-command - shell command risk classification.

use clap::Args;

use crate::app::AppContext;
use crate::cli::OutputFormat;
use crate::cli::output::{HumanLayout, decision_badge, emit_human, emit_output};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct CheckCommandArgs {
    /// Command string to classify (quote compound commands)
    pub command: String,
}

pub fn run(ctx: &AppContext, args: &CheckCommandArgs) -> Result<()> {
    let decision = ctx.guard.check_command(&args.command)?;

    if ctx.output_format == OutputFormat::Human {
        let mut layout = HumanLayout::new();
        layout
            .push_line(decision_badge(
                decision.allowed,
                decision.require_confirmation,
            ))
            .kv("command", &args.command)
            .kv("reason", &decision.reason);
        emit_human(layout);
        Ok(())
    } else {
        emit_output(ctx, &decision)
    }
}
