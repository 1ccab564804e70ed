//! Access policy engine.
//!
//! Classifies filesystem paths into allow/deny/confirm tiers. Paths are
//! canonicalized (symlinks, `.`, `..` resolved) before any comparison so
//! traversal tricks cannot route around the denylist. Rules are ordered
//! data: denied locations, then the project-root boundary, then
//! sensitive-but-legitimate patterns that need confirmation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::security::path_policy::{is_under_root, matches_pattern, to_slash};

/// Decision for a file access request.
///
/// `require_confirmation` implies `allowed`: a flatly denied resource
/// never needs confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDecision {
    pub allowed: bool,
    pub require_confirmation: bool,
    pub reason: String,
}

impl AccessDecision {
    pub(crate) fn allow(reason: impl Into<String>) -> Self {
        Self {
            allowed: true,
            require_confirmation: false,
            reason: reason.into(),
        }
    }

    pub(crate) fn confirm(reason: impl Into<String>) -> Self {
        Self {
            allowed: true,
            require_confirmation: true,
            reason: reason.into(),
        }
    }

    pub(crate) fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            require_confirmation: false,
            reason: reason.into(),
        }
    }

    /// Short label for audit entries.
    #[must_use]
    pub fn result_label(&self) -> &'static str {
        if !self.allowed {
            "deny"
        } else if self.require_confirmation {
            "confirm"
        } else {
            "allow"
        }
    }
}

/// Denied locations: OS/system configuration and credential directories.
/// Matched against the canonical `/`-normalized path.
const DENY_RULES: &[(&str, &str)] = &[
    ("/etc/**", "system configuration path"),
    ("/etc", "system configuration path"),
    ("/sys/**", "kernel interface path"),
    ("/proc/**", "kernel interface path"),
    ("/boot/**", "boot partition path"),
    ("C:/Windows/**", "system configuration path"),
    ("**/.ssh", "SSH credential directory"),
    ("**/.ssh/**", "SSH credential directory"),
    ("**/.aws", "cloud credential directory"),
    ("**/.aws/**", "cloud credential directory"),
    ("**/.gnupg", "GnuPG credential directory"),
    ("**/.gnupg/**", "GnuPG credential directory"),
];

/// Sensitive-but-legitimate patterns inside the project root. Allowed,
/// but only with explicit confirmation.
const CONFIRM_RULES: &[(&str, &str)] = &[
    ("**/.env", "environment file may hold credentials"),
    ("**/.env.*", "environment file may hold credentials"),
    ("**/*.pem", "private key material"),
    ("**/*secrets*", "path name suggests secret content"),
    ("**/*secrets*/**", "path name suggests secret content"),
];

/// Path classification policy scoped to one project root.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    project_root: PathBuf,
}

impl AccessPolicy {
    /// `project_root` must already be canonical; the guard canonicalizes
    /// it at initialization.
    #[must_use]
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Classify a path. Unresolvable paths (missing file, broken symlink)
    /// are denied with a descriptive reason rather than failing.
    #[must_use]
    pub fn evaluate(&self, path: &Path) -> AccessDecision {
        let canonical = match path.canonicalize() {
            Ok(p) => p,
            Err(err) => {
                return AccessDecision::deny(format!(
                    "cannot resolve path {}: {err}",
                    path.display()
                ));
            }
        };

        let slash = to_slash(&canonical);

        for (pattern, reason) in DENY_RULES {
            if matches_pattern(&slash, pattern) {
                return AccessDecision::deny(format!("{reason} ({slash})"));
            }
        }

        if !is_under_root(&canonical, &self.project_root) {
            return AccessDecision::deny(format!(
                "path {slash} is outside the project root {}",
                to_slash(&self.project_root)
            ));
        }

        for (pattern, reason) in CONFIRM_RULES {
            if matches_pattern(&slash, pattern) {
                return AccessDecision::confirm(format!("{reason} ({slash})"));
            }
        }

        AccessDecision::allow("within project root")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn policy_for(root: &Path) -> AccessPolicy {
        AccessPolicy::new(root.canonicalize().unwrap())
    }

    #[test]
    fn decision_invariant_holds() {
        for d in [
            AccessDecision::allow("a"),
            AccessDecision::confirm("c"),
            AccessDecision::deny("d"),
        ] {
            if d.require_confirmation {
                assert!(d.allowed);
            }
        }
    }

    #[test]
    fn denies_system_configuration() {
        let temp = TempDir::new().unwrap();
        let policy = policy_for(temp.path());

        let decision = policy.evaluate(Path::new("/etc/passwd"));
        assert!(!decision.allowed);
        assert!(!decision.require_confirmation);
        assert!(decision.reason.contains("system configuration"));
    }

    #[test]
    fn denies_outside_project_root() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("project");
        fs::create_dir(&project).unwrap();
        let outside = temp.path().join("outside.txt");
        fs::write(&outside, "x").unwrap();

        let policy = policy_for(&project);
        let decision = policy.evaluate(&outside);
        assert!(!decision.allowed);
        assert!(decision.reason.contains("outside the project root"));
    }

    #[test]
    fn denies_unresolvable_path() {
        let temp = TempDir::new().unwrap();
        let policy = policy_for(temp.path());

        let decision = policy.evaluate(&temp.path().join("does-not-exist.txt"));
        assert!(!decision.allowed);
        assert!(decision.reason.contains("cannot resolve path"));
    }

    #[test]
    fn denies_traversal_out_of_root() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("project");
        fs::create_dir(&project).unwrap();
        let secret = temp.path().join("secret.txt");
        fs::write(&secret, "x").unwrap();

        let policy = policy_for(&project);
        let sneaky = project.join("..").join("secret.txt");
        let decision = policy.evaluate(&sneaky);
        assert!(!decision.allowed);
    }

    #[cfg(unix)]
    #[test]
    fn denies_symlink_escape() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("project");
        fs::create_dir(&project).unwrap();
        let outside = temp.path().join("outside.txt");
        fs::write(&outside, "x").unwrap();
        let link = project.join("inside.txt");
        std::os::unix::fs::symlink(&outside, &link).unwrap();

        let policy = policy_for(&project);
        let decision = policy.evaluate(&link);
        assert!(!decision.allowed, "symlink target is outside root");
    }

    #[test]
    fn allows_project_file() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir(&src).unwrap();
        let file = src.join("foo.ts");
        fs::write(&file, "export {}").unwrap();

        let policy = policy_for(temp.path());
        let decision = policy.evaluate(&file);
        assert!(decision.allowed);
        assert!(!decision.require_confirmation);
    }

    #[test]
    fn env_file_requires_confirmation() {
        let temp = TempDir::new().unwrap();
        let env = temp.path().join(".env");
        fs::write(&env, "KEY=value").unwrap();

        let policy = policy_for(temp.path());
        let decision = policy.evaluate(&env);
        assert!(decision.allowed);
        assert!(decision.require_confirmation);
    }

    #[test]
    fn pem_file_requires_confirmation() {
        let temp = TempDir::new().unwrap();
        let pem = temp.path().join("server.pem");
        fs::write(&pem, "---").unwrap();

        let policy = policy_for(temp.path());
        let decision = policy.evaluate(&pem);
        assert!(decision.allowed);
        assert!(decision.require_confirmation);
    }

    #[test]
    fn secrets_name_requires_confirmation() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("prod-secrets.yaml");
        fs::write(&file, "a: b").unwrap();

        let policy = policy_for(temp.path());
        let decision = policy.evaluate(&file);
        assert!(decision.allowed);
        assert!(decision.require_confirmation);
    }

    #[test]
    fn result_labels() {
        assert_eq!(AccessDecision::allow("").result_label(), "allow");
        assert_eq!(AccessDecision::confirm("").result_label(), "confirm");
        assert_eq!(AccessDecision::deny("").result_label(), "deny");
    }
}
