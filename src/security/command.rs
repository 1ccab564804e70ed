//! Command risk classifier.
//!
//! Splits compound shell commands on control operators and classifies
//! each segment into allow/confirm/deny; the overall decision is the most
//! restrictive segment result. Pipe-into-interpreter and fork-bomb shapes
//! are evaluated against the whole command first, because splitting on
//! `|` destroys the evidence.
//!
//! Unrecognized commands default to the confirm tier, never to silent
//! denial of unknown-but-benign tooling.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Decision for a shell command.
///
/// Same invariant as [`crate::security::AccessDecision`]:
/// `require_confirmation` implies `allowed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandDecision {
    pub allowed: bool,
    pub require_confirmation: bool,
    pub reason: String,
}

impl CommandDecision {
    fn allow(reason: impl Into<String>) -> Self {
        Self {
            allowed: true,
            require_confirmation: false,
            reason: reason.into(),
        }
    }

    fn confirm(reason: impl Into<String>) -> Self {
        Self {
            allowed: true,
            require_confirmation: true,
            reason: reason.into(),
        }
    }

    fn deny(reason: impl Into<String>) -> Self {
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

/// Risk tier of a single segment. Ordering matters: deny > confirm > allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    Allow,
    Confirm,
    Deny,
}

struct CommandRule {
    pattern: &'static LazyLock<Regex>,
    reason: &'static str,
}

// ---------------------------------------------------------------------------
// Deny rules: whole command
// ---------------------------------------------------------------------------

static PIPE_TO_SHELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(curl|wget|fetch)\b[^|;&]*\|\s*(sudo\s+)?(ba|z|da|fi)?sh\b").unwrap()
});
static FORK_BOMB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[[:word:]:]+\(\)\s*\{\s*[^}]*\|[^}]*&[^}]*\}\s*;").unwrap()
});

static WHOLE_COMMAND_DENY: &[CommandRule] = &[
    CommandRule {
        pattern: &PIPE_TO_SHELL,
        reason: "network fetch piped into a shell interpreter",
    },
    CommandRule {
        pattern: &FORK_BOMB,
        reason: "self-replicating fork bomb construct",
    },
];

// ---------------------------------------------------------------------------
// Deny rules: per segment
// ---------------------------------------------------------------------------

static RM_FORCE_ROOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\brm\s+(-[a-z]*r[a-z]*\s+(-[a-z]*f[a-z]*\s+)?|-[a-z]*f[a-z]*\s+(-[a-z]*r[a-z]*\s+)?)(/([A-Za-z0-9_.-]+/?)?|~/?|\$HOME/?)\s*$",
    )
    .unwrap()
});
static DD_DEVICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdd\b.*\bof=\s*/dev/(sd[a-z]|nvme|disk|hd[a-z])").unwrap());
static MKFS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(mkfs|mke2fs)\b").unwrap());

static SEGMENT_DENY: &[CommandRule] = &[
    CommandRule {
        pattern: &RM_FORCE_ROOT,
        reason: "recursive forced deletion of a root-level path",
    },
    CommandRule {
        pattern: &DD_DEVICE,
        reason: "dd writing directly to a block device",
    },
    CommandRule {
        pattern: &MKFS,
        reason: "filesystem creation destroys existing data",
    },
];

// ---------------------------------------------------------------------------
// Confirm rules: irreversible but legitimate
// ---------------------------------------------------------------------------

static GIT_PUSH_FORCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bgit\s+push\b.*(\s--force\b|\s-f\b)").unwrap());
static GIT_RESET_HARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bgit\s+reset\s+--hard\b").unwrap());
static GIT_CLEAN_FD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bgit\s+clean\b.*(-[a-z]*f[a-z]*d|-[a-z]*d[a-z]*f)").unwrap()
});
static RM_FORCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\brm\s+(-[a-z]*r[a-z]*f[a-z]*|-[a-z]*f[a-z]*r[a-z]*)\b").unwrap()
});
static CHMOD_WIDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bchmod\s+(-[a-z]*R[a-z]*\s+)?(777|666|000)\b").unwrap());

static SEGMENT_CONFIRM: &[CommandRule] = &[
    CommandRule {
        pattern: &GIT_PUSH_FORCE,
        reason: "force push rewrites remote history",
    },
    CommandRule {
        pattern: &GIT_RESET_HARD,
        reason: "hard reset discards uncommitted changes",
    },
    CommandRule {
        pattern: &GIT_CLEAN_FD,
        reason: "git clean removes untracked files permanently",
    },
    CommandRule {
        pattern: &RM_FORCE,
        reason: "recursive forced deletion inside project scope",
    },
    CommandRule {
        pattern: &CHMOD_WIDE,
        reason: "recursive chmod to wide-open permissions",
    },
];

// ---------------------------------------------------------------------------
// Allow rules: read-only or additive tooling
// ---------------------------------------------------------------------------

static GIT_SAFE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^git\s+(status|log|diff|show|add|commit|fetch|pull|branch|stash\s+list)\b")
        .unwrap()
});
static PKG_SAFE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(npm|pnpm|yarn)\s+(install|ci|ls|list|test|audit)\b|^pip3?\s+(install|list|show|freeze)\b|^cargo\s+(build|check|test|fmt|clippy|add|metadata|tree)\b")
        .unwrap()
});
static BUILD_SAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(make|pytest|tox|mvn\s+test|gradle\s+test)\b").unwrap());
static READ_SAFE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(ls|cat|head|tail|wc|grep|rg|find|echo|pwd|which|env|date)\b").unwrap()
});

static SEGMENT_ALLOW: &[CommandRule] = &[
    CommandRule {
        pattern: &GIT_SAFE,
        reason: "version control read/additive operation",
    },
    CommandRule {
        pattern: &PKG_SAFE,
        reason: "package manager or build tool invocation",
    },
    CommandRule {
        pattern: &BUILD_SAFE,
        reason: "build or test invocation",
    },
    CommandRule {
        pattern: &READ_SAFE,
        reason: "read-only shell utility",
    },
];

/// Split a compound command on shell control operators (`&&`, `||`, `;`,
/// `|`, newline). Quote-aware: operators inside single or double quotes do
/// not split.
fn split_segments(command: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_single = false;
    let mut in_double = false;
    let mut chars = command.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' if !in_double => {
                in_single = !in_single;
                current.push(c);
            }
            '"' if !in_single => {
                in_double = !in_double;
                current.push(c);
            }
            '&' | '|' if !in_single && !in_double => {
                // Consume a doubled operator as one separator.
                if chars.peek() == Some(&c) {
                    chars.next();
                }
                segments.push(current.trim().to_string());
                current.clear();
            }
            ';' | '\n' if !in_single && !in_double => {
                segments.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    segments.push(current.trim().to_string());
    segments.retain(|s| !s.is_empty());
    segments
}

fn classify_segment(segment: &str) -> (Tier, String) {
    for rule in SEGMENT_DENY {
        if rule.pattern.is_match(segment) {
            return (Tier::Deny, rule.reason.to_string());
        }
    }
    for rule in SEGMENT_ALLOW {
        if rule.pattern.is_match(segment) {
            return (Tier::Allow, rule.reason.to_string());
        }
    }
    for rule in SEGMENT_CONFIRM {
        if rule.pattern.is_match(segment) {
            return (Tier::Confirm, rule.reason.to_string());
        }
    }
    (
        Tier::Confirm,
        format!("unrecognized command requires confirmation: {segment}"),
    )
}

/// Classify a shell command string.
///
/// Empty or unparseable input lands in the confirm tier (fail-safe, not
/// fail-open, not fail-closed-forever).
#[must_use]
pub fn classify(command: &str) -> CommandDecision {
    let trimmed = command.trim();
    if trimmed.is_empty() {
        return CommandDecision::confirm("empty command requires confirmation");
    }

    for rule in WHOLE_COMMAND_DENY {
        if rule.pattern.is_match(trimmed) {
            return CommandDecision::deny(rule.reason);
        }
    }

    // No parseable segment (operators only) is as unknown as it gets.
    let mut worst: Option<(Tier, String)> = None;
    for segment in split_segments(trimmed) {
        let (tier, reason) = classify_segment(&segment);
        if worst.as_ref().is_none_or(|(t, _)| tier > *t) {
            worst = Some((tier, reason));
        }
    }
    let (tier, reason) = worst.unwrap_or((
        Tier::Confirm,
        "unparseable command requires confirmation".to_string(),
    ));

    match tier {
        Tier::Deny => CommandDecision::deny(reason),
        Tier::Confirm => CommandDecision::confirm(reason),
        Tier::Allow => CommandDecision::allow(reason),
    }
}
