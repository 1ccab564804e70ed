//! Configuration loading.
//!
//! Layered: defaults, then the global config file, then the guard-root
//! config file, then environment overrides. Guard locations are always
//! explicit; the guard never discovers its quarantine or audit paths
//! implicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AsgError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Guard locations. Anything left unset falls back to defaults derived
/// from the guard root at context build time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default)]
    pub project_root: Option<PathBuf>,
    #[serde(default)]
    pub quarantine_dir: Option<PathBuf>,
    #[serde(default)]
    pub audit_log: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Identity recorded in audit entries. Defaults to `$USER`.
    #[serde(default)]
    pub user: Option<String>,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, guard_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("ASG_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(local) = Self::load_patch(&guard_root.join("config.toml"))? {
                config.merge_patch(local);
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("asg/config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| AsgError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| AsgError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(paths) = patch.paths {
            if let Some(value) = paths.project_root {
                self.paths.project_root = Some(value);
            }
            if let Some(value) = paths.quarantine_dir {
                self.paths.quarantine_dir = Some(value);
            }
            if let Some(value) = paths.audit_log {
                self.paths.audit_log = Some(value);
            }
        }
        if let Some(audit) = patch.audit {
            if let Some(value) = audit.user {
                self.audit.user = Some(value);
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Some(value) = env_path("ASG_PROJECT_ROOT") {
            self.paths.project_root = Some(value);
        }
        if let Some(value) = env_path("ASG_QUARANTINE_DIR") {
            self.paths.quarantine_dir = Some(value);
        }
        if let Some(value) = env_path("ASG_AUDIT_LOG") {
            self.paths.audit_log = Some(value);
        }
        if let Ok(value) = std::env::var("ASG_USER") {
            if !value.is_empty() {
                self.audit.user = Some(value);
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub paths: Option<PathsPatch>,
    pub audit: Option<AuditPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PathsPatch {
    pub project_root: Option<PathBuf>,
    pub quarantine_dir: Option<PathBuf>,
    pub audit_log: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct AuditPatch {
    pub user: Option<String>,
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key).ok().filter(|v| !v.is_empty()).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_empty() {
        let config = Config::default();
        assert!(config.paths.project_root.is_none());
        assert!(config.paths.quarantine_dir.is_none());
        assert!(config.audit.user.is_none());
    }

    #[test]
    fn loads_guard_root_config() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("config.toml"),
            r#"
[paths]
project_root = "/srv/project"

[audit]
user = "ci-bot"
"#,
        )
        .unwrap();

        let config = Config::load(None, temp.path()).unwrap();
        assert_eq!(
            config.paths.project_root,
            Some(PathBuf::from("/srv/project"))
        );
        assert_eq!(config.audit.user.as_deref(), Some("ci-bot"));
    }

    #[test]
    fn explicit_path_wins() {
        let temp = TempDir::new().unwrap();
        let explicit = temp.path().join("other.toml");
        std::fs::write(&explicit, "[audit]\nuser = \"explicit\"\n").unwrap();
        std::fs::write(temp.path().join("config.toml"), "[audit]\nuser = \"local\"\n").unwrap();

        let config = Config::load(Some(&explicit), temp.path()).unwrap();
        assert_eq!(config.audit.user.as_deref(), Some("explicit"));
    }

    #[test]
    fn malformed_config_is_a_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        std::fs::write(&path, "paths = not-a-table").unwrap();

        let err = Config::load(Some(&path), temp.path()).unwrap_err();
        assert!(matches!(err, AsgError::Config(_)));
    }

    #[test]
    fn missing_config_is_fine() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(None, temp.path()).unwrap();
        assert!(config.paths.audit_log.is_none());
    }
}
