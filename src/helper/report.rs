use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use getset::Getters;
use serde::{Deserialize, Serialize};

use crate::helper::error::PipelineError;

/// Outcome of one stage run: which samples were worked, which were already
/// complete, and which failed. Persisted as JSON under `reports/`.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct StageReport {
    #[getset(get = "pub")]
    stage: String,
    #[getset(get = "pub")]
    started: DateTime<Local>,
    #[getset(get = "pub")]
    finished: DateTime<Local>,
    #[getset(get = "pub")]
    processed: Vec<String>,
    #[getset(get = "pub")]
    skipped: Vec<String>,
    #[getset(get = "pub")]
    failed: Vec<String>,
}

impl StageReport {
    pub fn new(stage: &str) -> Self {
        let now = Local::now();
        StageReport {
            stage: stage.to_string(),
            started: now,
            finished: now,
            processed: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn mark_processed(&mut self, sample: &str) {
        self.processed.push(sample.to_string());
    }

    pub fn mark_skipped(&mut self, sample: &str) {
        self.skipped.push(sample.to_string());
    }

    pub fn mark_failed(&mut self, sample: &str) {
        self.failed.push(sample.to_string());
    }

    pub fn finish(&mut self) {
        self.finished = Local::now();
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{} stage finished: {} processed, {} skipped, {} failed",
            self.stage,
            self.processed.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }

    pub fn write_json(&self, path: &Path) -> Result<(), PipelineError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
