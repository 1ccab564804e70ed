//! asg audit - audit log inspection.

use clap::Args;

use crate::app::AppContext;
use crate::cli::OutputFormat;
use crate::cli::output::{HumanLayout, emit_human, emit_output};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Max entries to return (most recent)
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

pub fn run(ctx: &AppContext, args: &AuditArgs) -> Result<()> {
    let entries = ctx.guard.audit().tail(args.limit)?;

    if ctx.output_format == OutputFormat::Human {
        let mut layout = HumanLayout::new();
        for entry in &entries {
            layout.push_line(format!(
                "{}  {:<12} {:<8} {:<8} {}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                entry.event,
                entry.result,
                entry.user,
                entry.resource,
            ));
        }
        emit_human(layout);
        Ok(())
    } else {
        emit_output(ctx, &entries)
    }
}
