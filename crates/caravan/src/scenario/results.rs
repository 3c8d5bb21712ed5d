//! Run reports

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::verification::VerificationResult;

/// Report from a scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub scenario_name: String,

    /// RFC 3339 start time
    pub timestamp: String,

    /// Seed breeding ran with
    pub seed: u64,

    /// Every check passed
    pub passed: bool,

    /// Number of steps executed
    pub steps_executed: usize,

    /// Host events delivered to the plugin
    pub events_dispatched: usize,

    /// Events whose default host action was cancelled
    pub events_cancelled: usize,

    /// Number of checks evaluated
    pub checks_run: usize,

    /// Checks that failed, in scenario order
    pub verification_failures: Vec<VerificationResult>,

    /// Runner log, one line per setup action or step
    pub log: Vec<String>,

    /// Wall-clock time (milliseconds)
    pub duration_ms: f64,
}

impl RunReport {
    pub fn new(scenario_name: String, seed: u64) -> Self {
        Self {
            scenario_name,
            timestamp: chrono::Utc::now().to_rfc3339(),
            seed,
            passed: false,
            steps_executed: 0,
            events_dispatched: 0,
            events_cancelled: 0,
            checks_run: 0,
            verification_failures: Vec::new(),
            log: Vec::new(),
            duration_ms: 0.0,
        }
    }

    /// True when no check failed
    pub fn success(&self) -> bool {
        self.verification_failures.is_empty()
    }

    /// One-line summary for the terminal
    pub fn summary(&self) -> String {
        format!(
            "{}: {} | {} steps | {} events ({} cancelled) | {}/{} checks | {:.1}ms",
            self.scenario_name,
            if self.passed { "PASSED" } else { "FAILED" },
            self.steps_executed,
            self.events_dispatched,
            self.events_cancelled,
            self.checks_run - self.verification_failures.len().min(self.checks_run),
            self.checks_run,
            self.duration_ms
        )
    }

    /// Write the report as pretty JSON, creating missing directories
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize run report to JSON")?;

        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create report directory: {}", dir.display()))?,
            _ => {}
        }

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write run report: {}", path.display()))
    }

    /// Read back a report written by `save_json`
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read run report: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Invalid run report JSON: {}", path.display()))
    }
}
