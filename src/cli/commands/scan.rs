//! asg scan - secret scanning with quarantine capture.

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

use crate::app::AppContext;
use crate::cli::OutputFormat;
use crate::cli::output::{HumanLayout, emit_human, emit_output};
use crate::error::{AsgError, Result};
use crate::security::Finding;

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Input text to scan (mutually exclusive with --input-file)
    #[arg(long)]
    pub input: Option<String>,

    /// Read input from file (mutually exclusive with --input)
    #[arg(long)]
    pub input_file: Option<PathBuf>,

    /// Label recorded as the content's origin (defaults to the input
    /// file path, or "inline")
    #[arg(long)]
    pub path: Option<String>,
}

#[derive(Serialize)]
struct ScanOutput {
    safe: bool,
    findings: Vec<Finding>,
    quarantined: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    quarantine_id: Option<String>,
}

pub fn run(ctx: &AppContext, args: &ScanArgs) -> Result<()> {
    let (content, label) = resolve_input(args)?;
    debug!(target: "scan", label = %label, bytes = content.len(), "scanning content");

    let result = ctx.guard.scan_for_secrets(&content, &label)?;

    // The scan's audit entry carries the quarantine id when one was made.
    let quarantine_id = if result.safe {
        None
    } else {
        ctx.guard
            .audit()
            .tail(1)?
            .pop()
            .and_then(|entry| entry.metadata)
            .and_then(|meta| meta["quarantine_id"].as_str().map(String::from))
    };

    let payload = ScanOutput {
        safe: result.safe,
        quarantined: !result.safe,
        quarantine_id,
        findings: result.findings,
    };

    if ctx.output_format == OutputFormat::Human {
        let mut layout = HumanLayout::new();
        layout.kv("safe", &payload.safe.to_string());
        for finding in &payload.findings {
            layout.bullet(&format!(
                "{} (severity {}, offset {})",
                finding.pattern, finding.severity, finding.offset
            ));
        }
        if let Some(id) = &payload.quarantine_id {
            layout.kv("quarantined as", id);
        }
        emit_human(layout);
        Ok(())
    } else {
        emit_output(ctx, &payload)
    }
}

fn resolve_input(args: &ScanArgs) -> Result<(String, String)> {
    match (&args.input, &args.input_file) {
        (Some(_), Some(_)) => Err(AsgError::Config(
            "use --input or --input-file (not both)".to_string(),
        )),
        (Some(input), None) => {
            let label = args.path.clone().unwrap_or_else(|| "inline".to_string());
            Ok((input.clone(), label))
        }
        (None, Some(path)) => {
            let raw = std::fs::read_to_string(path).map_err(|err| {
                AsgError::Config(format!("read input file {}: {err}", path.display()))
            })?;
            let label = args
                .path
                .clone()
                .unwrap_or_else(|| path.display().to_string());
            Ok((raw, label))
        }
        (None, None) => Err(AsgError::Config(
            "missing input (use --input or --input-file)".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_input_rejects_both() {
        let args = ScanArgs {
            input: Some("x".to_string()),
            input_file: Some(PathBuf::from("/tmp/x")),
            path: None,
        };
        assert!(resolve_input(&args).is_err());
    }

    #[test]
    fn resolve_input_rejects_neither() {
        let args = ScanArgs {
            input: None,
            input_file: None,
            path: None,
        };
        assert!(resolve_input(&args).is_err());
    }

    #[test]
    fn inline_input_gets_inline_label() {
        let args = ScanArgs {
            input: Some("text".to_string()),
            input_file: None,
            path: None,
        };
        let (content, label) = resolve_input(&args).unwrap();
        assert_eq!(content, "text");
        assert_eq!(label, "inline");
    }
}
