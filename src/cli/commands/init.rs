//! asg init - create the guard home.
//!
//! Runs before an app context exists: the context cannot be built until
//! the guard locations are writable, which is exactly what init sets up.

use clap::Args;
use serde::Serialize;
use std::path::Path;

use crate::app::{AppContext, build_guard_config, resolve_guard_root};
use crate::cli::output::emit_json;
use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::security::SecurityGuard;
use crate::utils::fs::ensure_dir;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Serialize)]
struct InitOutput {
    guard_root: String,
    project_root: String,
    quarantine_dir: String,
    audit_log: String,
    config_written: bool,
}

pub fn run_without_context(cli: &Cli, args: &InitArgs) -> Result<()> {
    let guard_root = resolve_guard_root(cli.guard_root.as_deref())?;
    ensure_dir(&guard_root)?;

    let config = Config::load(cli.config.as_deref(), &guard_root)?;
    let guard_config = build_guard_config(&config, &guard_root, cli.project_root.as_deref())?;

    // Opening the guard creates the quarantine dir and audit log, probes
    // writability, and appends the init audit entry.
    let guard = SecurityGuard::open(guard_config.clone())?;

    let config_path = guard_root.join("config.toml");
    let config_written = args.force || !config_path.exists();
    if config_written {
        write_config_template(&config_path, &guard_config.project_root)?;
    }

    let payload = InitOutput {
        guard_root: guard_root.display().to_string(),
        project_root: guard.project_root().display().to_string(),
        quarantine_dir: guard_config.quarantine_dir.display().to_string(),
        audit_log: guard_config.audit_log.display().to_string(),
        config_written,
    };

    if cli.output_format() == OutputFormat::Human {
        println!("guard root      {}", payload.guard_root);
        println!("project root    {}", payload.project_root);
        println!("quarantine dir  {}", payload.quarantine_dir);
        println!("audit log       {}", payload.audit_log);
        if payload.config_written {
            println!("wrote           {}", config_path.display());
        }
        Ok(())
    } else {
        emit_json(&payload)
    }
}

/// Reached when init is invoked against an already-working guard home:
/// report the effective locations.
pub fn run(ctx: &AppContext, _args: &InitArgs) -> Result<()> {
    let payload = InitOutput {
        guard_root: ctx.guard_root.display().to_string(),
        project_root: ctx.guard.project_root().display().to_string(),
        quarantine_dir: ctx.guard.quarantine().dir().display().to_string(),
        audit_log: ctx.guard.audit().path().display().to_string(),
        config_written: false,
    };
    emit_json(&payload)
}

fn write_config_template(path: &Path, project_root: &Path) -> Result<()> {
    let template = format!(
        r#"# asg configuration
[paths]
project_root = "{}"
# quarantine_dir and audit_log default to this guard root.

[audit]
# user = "override-identity"
"#,
        project_root.display()
    );
    std::fs::write(path, template)?;
    Ok(())
}
