//! asg quarantine - quarantine record inspection.

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::OutputFormat;
use crate::cli::output::{HumanLayout, emit_human, emit_output};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct QuarantineArgs {
    #[command(subcommand)]
    pub command: QuarantineCommand,
}

#[derive(Subcommand, Debug)]
pub enum QuarantineCommand {
    /// List recent quarantine records
    List {
        /// Max records to return
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Show a specific quarantine record
    Show {
        /// Quarantine record id
        id: String,
    },
}

/// Listing omits the captured content; `show` returns the full record.
#[derive(Serialize)]
struct QuarantineSummary {
    id: String,
    original_path: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    findings: usize,
}

pub fn run(ctx: &AppContext, args: &QuarantineArgs) -> Result<()> {
    match &args.command {
        QuarantineCommand::List { limit } => {
            let records = ctx.guard.quarantine().list(*limit)?;
            let summaries: Vec<QuarantineSummary> = records
                .into_iter()
                .map(|r| QuarantineSummary {
                    id: r.id,
                    original_path: r.original_path,
                    timestamp: r.timestamp,
                    findings: r.findings.len(),
                })
                .collect();

            if ctx.output_format == OutputFormat::Human {
                let mut layout = HumanLayout::new();
                for s in &summaries {
                    layout.push_line(format!(
                        "{}  {}  ({} finding{})  {}",
                        s.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        s.id,
                        s.findings,
                        if s.findings == 1 { "" } else { "s" },
                        s.original_path,
                    ));
                }
                emit_human(layout);
                Ok(())
            } else {
                emit_output(ctx, &summaries)
            }
        }
        QuarantineCommand::Show { id } => {
            let record = ctx.guard.quarantine().get(id)?;
            emit_output(ctx, &record)
        }
    }
}
