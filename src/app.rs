use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::{AsgError, Result};
use crate::security::{GuardConfig, SecurityGuard};

pub struct AppContext {
    pub guard_root: PathBuf,
    pub config: Config,
    pub guard: SecurityGuard,
    pub output_format: OutputFormat,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let guard_root = resolve_guard_root(cli.guard_root.as_deref())?;
        let config = Config::load(cli.config.as_deref(), &guard_root)?;
        let guard_config = build_guard_config(&config, &guard_root, cli.project_root.as_deref())?;

        Ok(Self {
            guard_root,
            config,
            guard: SecurityGuard::open(guard_config)?,
            output_format: cli.output_format(),
            verbosity: cli.verbose,
        })
    }
}

/// Resolve the guard root: explicit flag, `ASG_ROOT`, a `.asg` directory
/// found upwards from the cwd, or the user data directory.
pub fn resolve_guard_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }
    if let Ok(root) = std::env::var("ASG_ROOT") {
        return Ok(PathBuf::from(root));
    }
    let cwd = std::env::current_dir()?;
    if let Some(found) = find_upwards(&cwd, ".asg") {
        return Ok(found);
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| AsgError::MissingConfig("data directory not found".to_string()))?;
    Ok(data_dir.join("asg"))
}

/// Resolve guard locations from config, falling back to guard-root
/// defaults. The CLI `--project-root` flag wins over config.
pub fn build_guard_config(
    config: &Config,
    guard_root: &Path,
    project_root_flag: Option<&Path>,
) -> Result<GuardConfig> {
    let project_root = match project_root_flag {
        Some(path) => path.to_path_buf(),
        None => match &config.paths.project_root {
            Some(path) => path.clone(),
            None => std::env::current_dir()?,
        },
    };

    Ok(GuardConfig {
        project_root,
        quarantine_dir: config
            .paths
            .quarantine_dir
            .clone()
            .unwrap_or_else(|| guard_root.join("quarantine")),
        audit_log: config
            .paths
            .audit_log
            .clone()
            .unwrap_or_else(|| guard_root.join("audit.jsonl")),
        user: config.audit.user.clone(),
    })
}

fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(name);
        if candidate.is_dir() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn guard_config_defaults_derive_from_guard_root() {
        let temp = TempDir::new().unwrap();
        let config = Config::default();
        let guard_config =
            build_guard_config(&config, temp.path(), Some(temp.path())).unwrap();

        assert_eq!(guard_config.quarantine_dir, temp.path().join("quarantine"));
        assert_eq!(guard_config.audit_log, temp.path().join("audit.jsonl"));
    }

    #[test]
    fn project_root_flag_wins_over_config() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.project_root = Some(PathBuf::from("/from/config"));

        let flag = temp.path().join("flagged");
        let guard_config = build_guard_config(&config, temp.path(), Some(&flag)).unwrap();
        assert_eq!(guard_config.project_root, flag);
    }
}
