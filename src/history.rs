use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionEntry {
    pub address: String,
    pub strategy: String,
    pub point_count: u32,
    pub success: bool,
    pub elapsed_seconds: f64,
    pub timestamp: DateTime<Utc>,
}

/// Past submissions, persisted as JSON in the home directory and trimmed
/// to a maximum.
pub struct SubmissionHistory {
    entries: Vec<SubmissionEntry>,
    history_file: PathBuf,
    max_entries: usize,
}

impl SubmissionHistory {
    pub fn new(max_entries: usize) -> Result<Self> {
        let history_file = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".epervier_history.json");
        Self::with_file(history_file, max_entries)
    }

    /// Same as `new` with an explicit file location.
    pub fn with_file(history_file: PathBuf, max_entries: usize) -> Result<Self> {
        let mut history = Self {
            entries: Vec::new(),
            history_file,
            max_entries,
        };
        history.load_from_file()?;
        Ok(history)
    }

    pub fn record(&mut self, entry: SubmissionEntry) -> Result<()> {
        self.entries.push(entry);

        // Keep only the newest max_entries
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(0..excess);
        }

        self.save_to_file()
    }

    /// Newest first.
    pub fn get_recent(&self, limit: usize) -> Vec<&SubmissionEntry> {
        self.entries.iter().rev().take(limit).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn load_from_file(&mut self) -> Result<()> {
        if !self.history_file.exists() {
            return Ok(());
        }

        let content = fs::read_to_string(&self.history_file)?;
        if content.trim().is_empty() {
            return Ok(());
        }

        self.entries = serde_json::from_str(&content)?;
        Ok(())
    }

    fn save_to_file(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.history_file, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(address: &str) -> SubmissionEntry {
        SubmissionEntry {
            address: address.to_string(),
            strategy: "vitesse".to_string(),
            point_count: 10,
            success: true,
            elapsed_seconds: 1.5,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn records_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut history = SubmissionHistory::with_file(path.clone(), 100).unwrap();
        history.record(entry("place Bellecour, Lyon")).unwrap();
        history.record(entry("vieux port, Marseille")).unwrap();

        let reloaded = SubmissionHistory::with_file(path, 100).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(
            reloaded.get_recent(1)[0].address,
            "vieux port, Marseille"
        );
    }

    #[test]
    fn oldest_entries_are_trimmed_past_the_maximum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut history = SubmissionHistory::with_file(path, 3).unwrap();
        for i in 0..5 {
            history.record(entry(&format!("address {i}"))).unwrap();
        }

        assert_eq!(history.len(), 3);
        let recent = history.get_recent(3);
        assert_eq!(recent[0].address, "address 4");
        assert_eq!(recent[2].address, "address 2");
    }

    #[test]
    fn a_missing_file_is_an_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let history =
            SubmissionHistory::with_file(dir.path().join("absent.json"), 10).unwrap();
        assert!(history.is_empty());
    }
}
