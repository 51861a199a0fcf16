use crate::api::AnalysisRecord;
use crate::error::{LaneSignalError, LsResult};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Past analyses kept in a single JSON file. A missing file is an empty
/// history; every mutation rewrites the file in full.
pub struct HistoryStore {
    path: PathBuf,
    records: Vec<AnalysisRecord>,
}

impl HistoryStore {
    pub fn open<P: Into<PathBuf>>(path: P) -> LsResult<Self> {
        let path = path.into();
        let records = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    LaneSignalError::Validation(format!(
                        "History file '{}' is corrupt: {}",
                        path.display(),
                        e
                    ))
                })?
            }
        } else {
            Vec::new()
        };
        debug!(
            "History: {} records in {}",
            records.len(),
            path.display()
        );
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn save(&mut self, record: AnalysisRecord) -> LsResult<()> {
        info!("💾 Saving analysis {}", record.id);
        self.save_all(vec![record])
    }

    pub fn save_all(&mut self, records: Vec<AnalysisRecord>) -> LsResult<()> {
        if records.len() > 1 {
            info!("💾 Saving {} analyses", records.len());
        }
        let mut next = self.records.clone();
        next.extend(records);
        self.commit(next)
    }

    /// Newest first, at most `limit` entries.
    pub fn list(&self, limit: usize) -> Vec<&AnalysisRecord> {
        let mut sorted: Vec<&AnalysisRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted.truncate(limit);
        sorted
    }

    pub fn get(&self, id: Uuid) -> Option<&AnalysisRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Returns `false` when no record has `id`.
    pub fn delete(&mut self, id: Uuid) -> LsResult<bool> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let next: Vec<AnalysisRecord> = self
            .records
            .iter()
            .filter(|r| r.id != id)
            .cloned()
            .collect();
        self.commit(next)?;
        info!("🗑️  Deleted analysis {}", id);
        Ok(true)
    }

    // In-memory records only change once the file write has landed.
    fn commit(&mut self, next: Vec<AnalysisRecord>) -> LsResult<()> {
        Self::persist(&self.path, &next)?;
        self.records = next;
        Ok(())
    }

    // Write-then-rename so a crash never leaves a half-written file.
    fn persist(path: &Path, records: &[AnalysisRecord]) -> LsResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(records)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

/// Human age of a record: `Just now`, `5m ago`, `3h ago`, `2d ago`, or the
/// calendar date once a week has passed.
pub fn relative_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(created_at);
    let mins = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();

    if mins < 1 {
        "Just now".to_string()
    } else if mins < 60 {
        format!("{}m ago", mins)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{}d ago", days)
    } else {
        created_at.format("%Y-%m-%d").to_string()
    }
}
