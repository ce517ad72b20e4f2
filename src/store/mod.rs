//! Agent state persistence
//!
//! Architecture: Infrastructure Layer - The store keeps agent snapshots without touching agent logic
//! - One JSON document per agent under the configured state directory
//! - A SHA-256 checksum over the snapshot detects edited or truncated files
//! - Housekeeping (statistics, clear, cleanup) works on whatever files are present

use crate::agents::AgentSnapshot;
use crate::domain::{ShowcaseError, ShowcaseResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

const FORMAT_VERSION: u32 = 1;
const STATE_SUFFIX: &str = "_state.json";

/// A snapshot as written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredState {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    /// Hex SHA-256 of the serialized snapshot
    pub checksum: String,
    pub snapshot: AgentSnapshot,
}

/// Directory-backed store of agent snapshots
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds the snapshot for `agent_id`
    pub fn path_for(&self, agent_id: &str) -> ShowcaseResult<PathBuf> {
        if agent_id.is_empty()
            || agent_id.contains(['/', '\\'])
            || agent_id == "."
            || agent_id == ".."
        {
            return Err(ShowcaseError::store(format!("Invalid agent id for storage: '{agent_id}'")));
        }
        Ok(self.dir.join(format!("{agent_id}{STATE_SUFFIX}")))
    }

    pub fn save(&self, snapshot: &AgentSnapshot) -> ShowcaseResult<PathBuf> {
        self.save_at(snapshot, Utc::now())
    }

    /// Write a snapshot stamped with `saved_at`
    pub fn save_at(&self, snapshot: &AgentSnapshot, saved_at: DateTime<Utc>) -> ShowcaseResult<PathBuf> {
        let path = self.path_for(&snapshot.agent_id)?;

        fs::create_dir_all(&self.dir).map_err(|e| {
            ShowcaseError::store(format!("Failed to create state directory: {}", e))
        })?;

        let stored = StoredState {
            version: FORMAT_VERSION,
            saved_at,
            checksum: checksum(snapshot)?,
            snapshot: snapshot.clone(),
        };
        let content = serde_json::to_string_pretty(&stored)?;

        fs::write(&path, content)
            .map_err(|e| ShowcaseError::store(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::debug!("Saved state for {} to {}", snapshot.agent_id, path.display());
        Ok(path)
    }

    /// Read and verify the snapshot for `agent_id`
    pub fn load(&self, agent_id: &str) -> ShowcaseResult<StoredState> {
        let path = self.path_for(agent_id)?;
        let stored = read_state(&path)?;
        if stored.snapshot.agent_id != agent_id {
            return Err(ShowcaseError::store(format!(
                "{} holds state for '{}'",
                path.display(),
                stored.snapshot.agent_id
            )));
        }
        Ok(stored)
    }

    /// Agent ids with a snapshot on disk, sorted
    pub fn list(&self) -> ShowcaseResult<Vec<String>> {
        let mut ids: Vec<String> = self
            .state_files()?
            .iter()
            .filter_map(|path| path.file_name()?.to_str()?.strip_suffix(STATE_SUFFIX))
            .map(str::to_string)
            .collect();
        ids.sort();
        Ok(ids)
    }

    pub fn statistics(&self) -> ShowcaseResult<StoreStatistics> {
        let mut stats = StoreStatistics::default();

        for path in self.state_files()? {
            let metadata = fs::metadata(&path)?;
            stats.snapshots += 1;
            stats.total_bytes += metadata.len();

            match read_state(&path) {
                Ok(stored) => {
                    stats.oldest = Some(stats.oldest.map_or(stored.saved_at, |t| t.min(stored.saved_at)));
                    stats.newest = Some(stats.newest.map_or(stored.saved_at, |t| t.max(stored.saved_at)));
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable state file {}: {}", path.display(), e);
                    stats.corrupt += 1;
                }
            }
        }

        Ok(stats)
    }

    /// Remove every snapshot; returns how many files were deleted
    pub fn clear(&self) -> ShowcaseResult<usize> {
        let files = self.state_files()?;
        for path in &files {
            remove(path)?;
        }
        Ok(files.len())
    }

    /// Remove snapshots saved more than `max_age` before `now`, plus unreadable ones
    pub fn cleanup(&self, max_age: Duration, now: DateTime<Utc>) -> ShowcaseResult<usize> {
        let cutoff = now.checked_sub_signed(max_age).ok_or_else(|| {
            ShowcaseError::store(format!("Cleanup age of {} days is out of range", max_age.num_days()))
        })?;
        let mut removed = 0;

        for path in self.state_files()? {
            let stale = match read_state(&path) {
                Ok(stored) => stored.saved_at < cutoff,
                Err(_) => true,
            };
            if stale {
                remove(&path)?;
                removed += 1;
            }
        }

        Ok(removed)
    }

    fn state_files(&self) -> ShowcaseResult<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| {
            ShowcaseError::store(format!("Failed to read {}: {}", self.dir.display(), e))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_state = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(STATE_SUFFIX));
            if is_state && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn checksum(snapshot: &AgentSnapshot) -> ShowcaseResult<String> {
    let bytes = serde_json::to_vec(snapshot)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

fn read_state(path: &Path) -> ShowcaseResult<StoredState> {
    let content = fs::read_to_string(path)
        .map_err(|e| ShowcaseError::store(format!("Failed to read {}: {}", path.display(), e)))?;

    let stored: StoredState = serde_json::from_str(&content)
        .map_err(|e| ShowcaseError::store(format!("Failed to parse {}: {}", path.display(), e)))?;

    if stored.version != FORMAT_VERSION {
        return Err(ShowcaseError::store(format!(
            "Unsupported state version {} in {}",
            stored.version,
            path.display()
        )));
    }
    if checksum(&stored.snapshot)? != stored.checksum {
        return Err(ShowcaseError::store(format!("Checksum mismatch in {}", path.display())));
    }

    Ok(stored)
}

fn remove(path: &Path) -> ShowcaseResult<()> {
    fs::remove_file(path)
        .map_err(|e| ShowcaseError::store(format!("Failed to remove {}: {}", path.display(), e)))
}

/// Summary of the files in a state directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStatistics {
    pub snapshots: usize,
    pub total_bytes: u64,
    pub corrupt: usize,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}

impl StoreStatistics {
    pub fn format_display(&self) -> String {
        let mut line = format!("State: {} snapshots, {} bytes", self.snapshots, self.total_bytes);
        if let (Some(oldest), Some(newest)) = (self.oldest, self.newest) {
            line.push_str(&format!(
                " (oldest {}, newest {})",
                oldest.format("%Y-%m-%d %H:%M"),
                newest.format("%Y-%m-%d %H:%M")
            ));
        }
        if self.corrupt > 0 {
            line.push_str(&format!(", {} unreadable", self.corrupt));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AutonomousAgent;
    use crate::domain::AgentGoal;
    use tempfile::TempDir;

    fn snapshot(id: &str) -> AgentSnapshot {
        let mut agent = AutonomousAgent::general(id).with_seed(3);
        agent.initialize(&Default::default(), Utc::now());
        agent
            .set_goal(AgentGoal::new("optimize").with_criterion("tasks_completed", 3))
            .unwrap();
        agent.snapshot()
    }

    #[test]
    fn test_save_and_load() -> ShowcaseResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let store = StateStore::new(temp_dir.path().join("agents"));

        let path = store.save(&snapshot("nias_000"))?;
        assert!(path.ends_with("nias_000_state.json"));

        let stored = store.load("nias_000")?;
        assert_eq!(stored.snapshot.agent_id, "nias_000");
        assert_eq!(stored.snapshot.goals.len(), 1);
        assert_eq!(stored.checksum.len(), 64);
        Ok(())
    }

    #[test]
    fn test_tampered_file_is_rejected() -> ShowcaseResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let store = StateStore::new(temp_dir.path());
        let path = store.save(&snapshot("abas_000"))?;

        let content = fs::read_to_string(&path)?;
        fs::write(&path, content.replace("\"optimize\"", "\"sabotage\""))?;

        assert!(matches!(store.load("abas_000"), Err(ShowcaseError::Store { .. })));
        Ok(())
    }

    #[test]
    fn test_missing_directory_is_empty() -> ShowcaseResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let store = StateStore::new(temp_dir.path().join("nowhere"));
        assert!(store.list()?.is_empty());
        assert_eq!(store.statistics()?.snapshots, 0);
        assert_eq!(store.clear()?, 0);
        Ok(())
    }

    #[test]
    fn test_list_statistics_and_clear() -> ShowcaseResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let store = StateStore::new(temp_dir.path());
        store.save(&snapshot("dast_000"))?;
        store.save(&snapshot("abas_000"))?;
        fs::write(temp_dir.path().join("notes.txt"), "not state")?;

        assert_eq!(store.list()?, vec!["abas_000", "dast_000"]);

        let stats = store.statistics()?;
        assert_eq!(stats.snapshots, 2);
        assert!(stats.total_bytes > 0);
        assert!(stats.oldest <= stats.newest);
        assert!(stats.format_display().starts_with("State: 2 snapshots"));

        assert_eq!(store.clear()?, 2);
        assert!(store.list()?.is_empty());
        assert!(temp_dir.path().join("notes.txt").exists());
        Ok(())
    }

    #[test]
    fn test_cleanup_rejects_age_beyond_calendar() -> ShowcaseResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let store = StateStore::new(temp_dir.path());
        store.save(&snapshot("nias_000"))?;

        let result = store.cleanup(Duration::days(100_000_000), Utc::now());
        assert!(matches!(result, Err(ShowcaseError::Store { .. })));
        assert_eq!(store.list()?, vec!["nias_000"]);
        Ok(())
    }

    #[test]
    fn test_cleanup_removes_old_and_corrupt() -> ShowcaseResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let store = StateStore::new(temp_dir.path());
        let now = Utc::now();

        store.save_at(&snapshot("nias_000"), now - Duration::days(10))?;
        store.save_at(&snapshot("nias_001"), now)?;
        fs::write(temp_dir.path().join("nias_002_state.json"), "{ truncated")?;

        assert_eq!(store.cleanup(Duration::days(7), now)?, 2);
        assert_eq!(store.list()?, vec!["nias_001"]);
        Ok(())
    }

    #[test]
    fn test_path_traversal_is_rejected() {
        let store = StateStore::new("data/agents");
        assert!(store.path_for("../etc").is_err());
        assert!(store.path_for("").is_err());
        assert!(store.path_for("nias_000").is_ok());
    }
}
