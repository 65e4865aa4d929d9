//! Knowledge persistence
//!
//! The store owns the on-disk JSON encoding. A missing or corrupt file is
//! never fatal: loading degrades to default knowledge with a warning, so a
//! bad save can cost history but never an attempt.

use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::knowledge::memory::Knowledge;

pub struct KnowledgeStore {
    path: PathBuf,
}

impl KnowledgeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load knowledge, falling back to defaults on any failure
    pub fn load(&self) -> Knowledge {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "no knowledge file, starting fresh");
            return Knowledge::default();
        }

        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(knowledge) => knowledge,
                Err(err) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        %err,
                        "knowledge file corrupt, starting fresh"
                    );
                    Knowledge::default()
                }
            },
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %err,
                    "knowledge file unreadable, starting fresh"
                );
                Knowledge::default()
            }
        }
    }

    /// Persist knowledge as pretty JSON
    pub fn save(&self, knowledge: &Knowledge) -> Result<()> {
        let json = serde_json::to_string_pretty(knowledge)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DeathCause;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("emberward_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let store = KnowledgeStore::new(temp_path("missing"));
        let knowledge = store.load();
        assert_eq!(knowledge.attempts, 0);
        assert_eq!(knowledge.risk_tolerance, 0.5);
    }

    #[test]
    fn test_round_trip() {
        let path = temp_path("roundtrip");
        let store = KnowledgeStore::new(&path);

        let mut knowledge = Knowledge::default();
        knowledge.record_death(12, DeathCause::Cold);
        knowledge.record_action(12, "build_fire", true);
        store.save(&knowledge).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.attempts, 1);
        assert_eq!(loaded.best_survival_days, 12);
        assert_eq!(loaded.death_causes.get(&DeathCause::Cold), Some(&1));
        assert!(loaded.action_stats.contains_key("build_fire"));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{ this is not json").unwrap();

        let store = KnowledgeStore::new(&path);
        let knowledge = store.load();
        assert_eq!(knowledge.attempts, 0);

        std::fs::remove_file(path).ok();
    }
}
