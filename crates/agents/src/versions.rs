//! Versioned-prompt store.
//!
//! Keyed store mapping agent name to a list of prompt versions. The core
//! only consumes get-latest/get-by-name/create/delete; durability is
//! whatever the backing file happens to hold.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::AgentError;

/// One stored prompt version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptVersion {
    pub version_name: String,
    pub prompt_text: String,
    /// Unix seconds at creation; newest-first ordering key.
    pub timestamp: i64,
    #[serde(default)]
    pub description: String,
}

/// Versioned-prompt collaborator boundary.
pub trait PromptVersionStore: Send + Sync {
    /// All versions for an agent, newest first.
    fn versions(&self, agent_name: &str) -> Result<Vec<PromptVersion>, AgentError>;

    fn latest(&self, agent_name: &str) -> Result<Option<PromptVersion>, AgentError> {
        Ok(self.versions(agent_name)?.into_iter().next())
    }

    fn get(&self, agent_name: &str, version_name: &str) -> Result<PromptVersion, AgentError> {
        self.versions(agent_name)?
            .into_iter()
            .find(|v| v.version_name == version_name)
            .ok_or_else(|| AgentError::VersionNotFound {
                agent: agent_name.to_string(),
                version: version_name.to_string(),
            })
    }

    fn create(
        &self,
        agent_name: &str,
        version_name: &str,
        prompt_text: &str,
        description: &str,
    ) -> Result<PromptVersion, AgentError>;

    fn delete(&self, agent_name: &str, version_name: &str) -> Result<(), AgentError>;
}

type VersionMap = HashMap<String, Vec<PromptVersion>>;

/// JSON-file-backed store, one file for all agents.
pub struct JsonFileVersionStore {
    path: PathBuf,
    // File IO is small and rare; one lock serializes read-modify-write.
    lock: Mutex<()>,
}

impl JsonFileVersionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<VersionMap, AgentError> {
        if !Path::new(&self.path).exists() {
            return Ok(VersionMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| AgentError::Store(format!("read {}: {}", self.path.display(), e)))?;
        if raw.trim().is_empty() {
            return Ok(VersionMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, map: &VersionMap) -> Result<(), AgentError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| AgentError::Store(format!("mkdir {}: {}", parent.display(), e)))?;
            }
        }
        let json = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, json)
            .map_err(|e| AgentError::Store(format!("write {}: {}", self.path.display(), e)))
    }
}

impl PromptVersionStore for JsonFileVersionStore {
    fn versions(&self, agent_name: &str) -> Result<Vec<PromptVersion>, AgentError> {
        let _guard = self.lock.lock();
        let map = self.load()?;
        let mut versions = map.get(agent_name).cloned().unwrap_or_default();
        versions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(versions)
    }

    fn create(
        &self,
        agent_name: &str,
        version_name: &str,
        prompt_text: &str,
        description: &str,
    ) -> Result<PromptVersion, AgentError> {
        let _guard = self.lock.lock();
        let mut map = self.load()?;

        let version = PromptVersion {
            version_name: version_name.to_string(),
            prompt_text: prompt_text.to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            description: description.to_string(),
        };

        map.entry(agent_name.to_string())
            .or_default()
            .push(version.clone());
        self.save(&map)?;

        tracing::info!(agent = %agent_name, version = %version_name, "Created prompt version");
        Ok(version)
    }

    fn delete(&self, agent_name: &str, version_name: &str) -> Result<(), AgentError> {
        let _guard = self.lock.lock();
        let mut map = self.load()?;

        let versions = map
            .get_mut(agent_name)
            .ok_or_else(|| AgentError::NotFound(agent_name.to_string()))?;

        let before = versions.len();
        versions.retain(|v| v.version_name != version_name);
        if versions.len() == before {
            return Err(AgentError::VersionNotFound {
                agent: agent_name.to_string(),
                version: version_name.to_string(),
            });
        }

        self.save(&map)?;
        tracing::info!(agent = %agent_name, version = %version_name, "Deleted prompt version");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, JsonFileVersionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileVersionStore::new(dir.path().join("agent_versions.json"));
        (dir, store)
    }

    #[test]
    fn test_empty_store() {
        let (_dir, store) = store();
        assert!(store.versions("Product Agent").unwrap().is_empty());
        assert!(store.latest("Product Agent").unwrap().is_none());
    }

    #[test]
    fn test_create_and_fetch() {
        let (_dir, store) = store();
        store
            .create("Product Agent", "v1", "prompt one", "first cut")
            .unwrap();
        store
            .create("Product Agent", "v2", "prompt two", "")
            .unwrap();

        let versions = store.versions("Product Agent").unwrap();
        assert_eq!(versions.len(), 2);

        let fetched = store.get("Product Agent", "v1").unwrap();
        assert_eq!(fetched.prompt_text, "prompt one");
    }

    #[test]
    fn test_latest_is_newest() {
        let (_dir, store) = store();
        store.create("A", "old", "p1", "").unwrap();
        store.create("A", "new", "p2", "").unwrap();

        // Same-second timestamps keep insertion order stable enough for a
        // strictly newer stamp; force distinct stamps to assert ordering.
        let mut map: VersionMap = HashMap::new();
        map.insert(
            "A".to_string(),
            vec![
                PromptVersion {
                    version_name: "old".to_string(),
                    prompt_text: "p1".to_string(),
                    timestamp: 100,
                    description: String::new(),
                },
                PromptVersion {
                    version_name: "new".to_string(),
                    prompt_text: "p2".to_string(),
                    timestamp: 200,
                    description: String::new(),
                },
            ],
        );
        store.save(&map).unwrap();

        assert_eq!(store.latest("A").unwrap().unwrap().version_name, "new");
    }

    #[test]
    fn test_delete_missing_version_errors() {
        let (_dir, store) = store();
        store.create("A", "v1", "p", "").unwrap();

        assert!(store.delete("A", "v1").is_ok());
        assert!(matches!(
            store.delete("A", "v1"),
            Err(AgentError::VersionNotFound { .. })
        ));
        assert!(matches!(
            store.delete("Unknown", "v1"),
            Err(AgentError::NotFound(_))
        ));
    }

    #[test]
    fn test_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("versions.json");
        {
            let store = JsonFileVersionStore::new(&path);
            store.create("A", "v1", "p", "").unwrap();
        }
        let store = JsonFileVersionStore::new(&path);
        assert_eq!(store.versions("A").unwrap().len(), 1);
    }
}
