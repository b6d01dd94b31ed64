//! Output formatting for the executor-config CLI
//!
//! Structured output in JSON, YAML, and a human-readable table format with
//! colored status markers.

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use executor_config_core::{ContractFinding, EffectiveConfig};

use crate::error::CliError;

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table format with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format for configuration output
    Yaml,
}

fn render_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<Option<String>, CliError> {
    match format {
        OutputFormat::Json => Ok(Some(serde_json::to_string_pretty(value)?)),
        OutputFormat::Yaml => Ok(Some(serde_yaml::to_string(value)?)),
        OutputFormat::Table => Ok(None),
    }
}

fn display_opt<T: std::fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".dimmed().to_string(),
    }
}

/// Result of the `workspace` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceOutput {
    /// Absolute workspace path
    pub workspace: String,
    /// Whether the directory was created (or already existed)
    pub created: bool,
    /// Merged configuration the path was derived from
    pub effective: EffectiveConfig,
}

impl WorkspaceOutput {
    /// Render output in the specified format
    pub fn render(&self, format: OutputFormat) -> Result<String, CliError> {
        if let Some(rendered) = render_structured(self, format)? {
            return Ok(rendered);
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", "Workspace".bold());
        let _ = writeln!(out, "  {:<12} {}", "path", self.workspace.green());
        let _ = writeln!(out, "  {:<12} {}", "name", display_opt(&self.effective.name));
        let _ = writeln!(out, "  {:<12} {}", "root", display_opt(&self.effective.workspace));
        let _ = writeln!(out, "  {:<12} {}", "replica_id", display_opt(&self.effective.replica_id));
        let _ = writeln!(out, "  {:<12} {}", "pea_id", display_opt(&self.effective.pea_id));
        if self.created {
            let _ = writeln!(out, "  {:<12} {}", "created", "yes".green());
        }
        Ok(out.trim_end().to_string())
    }
}

/// Contract check result for one manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentReport {
    pub component: String,
    pub manifest: String,
    pub valid: bool,
    pub findings: Vec<ContractFinding>,
}

/// Result of the `check` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutput {
    /// True when every component passed
    pub valid: bool,
    pub components: Vec<ComponentReport>,
    pub summary: String,
}

impl CheckOutput {
    pub fn new(components: Vec<ComponentReport>) -> Self {
        let failed = components.iter().filter(|c| !c.valid).count();
        let summary = if failed == 0 {
            format!("{} component(s) satisfy the calling contract", components.len())
        } else {
            format!(
                "{} of {} component(s) violate the calling contract",
                failed,
                components.len()
            )
        };

        Self {
            valid: failed == 0,
            components,
            summary,
        }
    }

    /// Render output in the specified format
    pub fn render(&self, format: OutputFormat) -> Result<String, CliError> {
        if let Some(rendered) = render_structured(self, format)? {
            return Ok(rendered);
        }

        let mut out = String::new();
        for report in &self.components {
            let status = if report.valid {
                "PASS".green().bold()
            } else {
                "FAIL".red().bold()
            };
            let _ = writeln!(
                out,
                "{} {} ({})",
                status,
                report.component.bold(),
                report.manifest.dimmed()
            );
            for finding in &report.findings {
                let _ = writeln!(
                    out,
                    "    {} {}: {}",
                    format!("[{}]", finding.rule_id).yellow(),
                    finding.target,
                    finding.message
                );
            }
        }
        let _ = writeln!(out);
        let summary = if self.valid {
            self.summary.green()
        } else {
            self.summary.red()
        };
        let _ = writeln!(out, "{}", summary);
        Ok(out.trim_end().to_string())
    }
}
