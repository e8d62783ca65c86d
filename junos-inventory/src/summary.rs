use std::fmt::Display;
use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

/// What happened to one device in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// Record written to the output directory.
    Written,
    /// Record printed to stdout.
    Printed,
    /// Another source produced the same canonical name later in the batch.
    Superseded,
    /// Not a configuration any extractor understands.
    Skipped,
    Failed,
}

impl OutcomeStatus {
    fn label(self) -> &'static str {
        match self {
            OutcomeStatus::Written => "OK",
            OutcomeStatus::Printed => "OK",
            OutcomeStatus::Superseded => "DUP",
            OutcomeStatus::Skipped => "SKIP",
            OutcomeStatus::Failed => "FAIL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceOutcome {
    /// Source label: file path or `nso:<device>`.
    pub source: String,
    /// Canonical name, once known.
    pub device: Option<String>,
    pub status: OutcomeStatus,
    pub path: Option<PathBuf>,
    pub error: Option<String>,
}

impl DeviceOutcome {
    pub fn new(source: impl Into<String>, status: OutcomeStatus) -> Self {
        Self {
            source: source.into(),
            device: None,
            status,
            path: None,
            error: None,
        }
    }

    pub fn device(mut self, device: &str) -> Self {
        self.device = Some(device.to_string());
        self
    }

    pub fn path(mut self, path: Option<PathBuf>) -> Self {
        self.path = path;
        self
    }

    pub fn error(mut self, error: &dyn Display) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

/// Per-device outcomes of one run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub devices: Vec<DeviceOutcome>,
}

impl BatchSummary {
    pub fn push(&mut self, outcome: DeviceOutcome) {
        self.devices.push(outcome);
    }

    pub fn count(&self, status: OutcomeStatus) -> usize {
        self.devices.iter().filter(|d| d.status == status).count()
    }

    pub fn failed(&self) -> usize {
        self.count(OutcomeStatus::Failed)
    }

    pub fn emitted(&self) -> usize {
        self.count(OutcomeStatus::Written) + self.count(OutcomeStatus::Printed)
    }
}

/// Render outcomes for terminal output, one line per device plus totals.
pub fn render_text(summary: &BatchSummary) -> String {
    let mut out = Vec::new();
    for outcome in &summary.devices {
        let mut line = format!("{:<4} {}", outcome.status.label(), outcome.source);
        if let Some(device) = &outcome.device {
            line.push_str(&format!(" device={device}"));
        }
        if let Some(path) = &outcome.path {
            line.push_str(&format!(" path={}", path.display()));
        }
        if let Some(error) = &outcome.error {
            line.push_str(&format!(" error={error}"));
        }
        let colored = match outcome.status {
            OutcomeStatus::Written | OutcomeStatus::Printed => line.green().to_string(),
            OutcomeStatus::Superseded | OutcomeStatus::Skipped => line.yellow().to_string(),
            OutcomeStatus::Failed => line.red().to_string(),
        };
        out.push(colored);
    }

    let totals = format!(
        "devices={} emitted={} superseded={} skipped={} failed={}",
        summary.devices.len(),
        summary.emitted(),
        summary.count(OutcomeStatus::Superseded),
        summary.count(OutcomeStatus::Skipped),
        summary.failed()
    );
    out.push(totals.cyan().to_string());
    out.join("\n")
}
