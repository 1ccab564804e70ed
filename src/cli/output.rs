use console::style;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::OutputFormat;
use crate::error::{AsgError, Result};

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| AsgError::Serialization(format!("serialize output: {err}")))?;
    println!("{payload}");
    Ok(())
}

/// Emit a payload in the context's format. Commands that want a styled
/// human rendering build a [`HumanLayout`] instead of calling this.
pub fn emit_output<T: Serialize>(ctx: &AppContext, payload: &T) -> Result<()> {
    if ctx.output_format != OutputFormat::Human {
        emit_json(payload)
    } else {
        let pretty = serde_json::to_string_pretty(payload)
            .map_err(|err| AsgError::Serialization(format!("serialize output: {err}")))?;
        println!("{pretty}");
        Ok(())
    }
}

pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl HumanLayout {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 18,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push(String::new());
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        let key_style = style(key).dim().to_string();
        self.lines.push(format!(
            "{key_style:width$} {value}",
            width = self.key_width
        ));
        self
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.lines.push(format!("- {text}"));
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

pub fn emit_human(layout: HumanLayout) {
    println!("{}", layout.build());
}

/// Render a decision tier with color for interactive terminals.
#[must_use]
pub fn decision_badge(allowed: bool, require_confirmation: bool) -> String {
    if !allowed {
        style("DENY").red().bold().to_string()
    } else if require_confirmation {
        style("CONFIRM").yellow().bold().to_string()
    } else {
        style("ALLOW").green().bold().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_builds_lines() {
        let mut layout = HumanLayout::new();
        layout.kv("key", "value").bullet("item");
        let rendered = layout.build();
        assert!(rendered.contains("value"));
        assert!(rendered.contains("- item"));
    }

    #[test]
    fn badge_labels() {
        assert!(decision_badge(false, false).contains("DENY"));
        assert!(decision_badge(true, true).contains("CONFIRM"));
        assert!(decision_badge(true, false).contains("ALLOW"));
    }
}
