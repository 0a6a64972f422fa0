use tracing::warn;

use crate::config::NavigationConfig;
use crate::project::ActiveProject;
use crate::storage::{KeyValueStore, StoreError};
use crate::view::View;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to serialize cached project: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Last active project and last view, kept across reloads.
///
/// Reads never fail: a missing, unreadable, or malformed entry is simply
/// "nothing cached".
#[derive(Debug, Clone)]
pub struct PersistedCache<S> {
    store: S,
    active_project_key: String,
    last_view_key: String,
}

impl<S: KeyValueStore> PersistedCache<S> {
    #[must_use]
    pub fn new(store: S, config: &NavigationConfig) -> Self {
        Self {
            store,
            active_project_key: config.active_project_key(),
            last_view_key: config.last_view_key(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn read_active_project(&self) -> Option<ActiveProject> {
        let raw = self.read_raw(&self.active_project_key)?;
        match serde_json::from_str::<ActiveProject>(&raw) {
            Ok(project) if project.has_valid_id() => Some(project),
            Ok(_) => {
                warn!(key = %self.active_project_key, "ignoring cached project without id");
                None
            }
            Err(error) => {
                warn!(key = %self.active_project_key, %error, "ignoring malformed cached project");
                None
            }
        }
    }

    pub fn write_active_project(
        &mut self,
        project: Option<&ActiveProject>,
    ) -> Result<(), CacheError> {
        match project {
            Some(project) => {
                let serialized = serde_json::to_string(project)?;
                self.store.set(&self.active_project_key, &serialized)?;
            }
            None => self.store.remove(&self.active_project_key)?,
        }
        Ok(())
    }

    pub fn read_last_view(&self) -> Option<View> {
        let raw = self.read_raw(&self.last_view_key)?;
        View::parse(&raw)
    }

    pub fn write_last_view(&mut self, view: View) -> Result<(), CacheError> {
        self.store.set(&self.last_view_key, view.as_str())?;
        Ok(())
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(error) => {
                warn!(key, %error, "persisted store read failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectKind;
    use crate::storage::MemoryStore;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Read {
                key: key.to_string(),
            })
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Write {
                key: key.to_string(),
            })
        }

        fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    fn cache_with(key: &str, value: &str) -> PersistedCache<MemoryStore> {
        let config = NavigationConfig::default();
        let store = MemoryStore::new().with_entry(key, value);
        PersistedCache::new(store, &config)
    }

    #[test]
    fn writes_then_reads_active_project() {
        let mut cache = PersistedCache::new(MemoryStore::new(), &NavigationConfig::default());
        let project = ActiveProject::new("p1", "Spring campaign", ProjectKind::Copywriting);

        cache
            .write_active_project(Some(&project))
            .expect("write project");
        assert_eq!(cache.read_active_project(), Some(project));

        cache.write_active_project(None).expect("clear project");
        assert_eq!(cache.read_active_project(), None);
        assert!(cache.store().is_empty());
    }

    #[test]
    fn malformed_or_idless_project_reads_as_none() {
        let key = NavigationConfig::default().active_project_key();
        assert_eq!(cache_with(&key, "{not json").read_active_project(), None);
        assert_eq!(cache_with(&key, "[1,2,3]").read_active_project(), None);
        assert_eq!(
            cache_with(&key, r#"{"id":"","name":"x"}"#).read_active_project(),
            None
        );
    }

    #[test]
    fn last_view_round_trips_and_ignores_unknown_values() {
        let mut cache = PersistedCache::new(MemoryStore::new(), &NavigationConfig::default());
        assert_eq!(cache.read_last_view(), None);
        cache.write_last_view(View::Billing).expect("write view");
        assert_eq!(cache.read_last_view(), Some(View::Billing));

        let key = NavigationConfig::default().last_view_key();
        assert_eq!(cache_with(&key, "admin").read_last_view(), None);
    }

    #[test]
    fn store_failures_are_absorbed_on_read_and_reported_on_write() {
        let mut cache = PersistedCache::new(BrokenStore, &NavigationConfig::default());
        assert_eq!(cache.read_active_project(), None);
        assert_eq!(cache.read_last_view(), None);
        assert!(matches!(
            cache.write_last_view(View::Chat),
            Err(CacheError::Store(StoreError::Write { .. }))
        ));
        assert!(matches!(
            cache.write_active_project(None),
            Err(CacheError::Store(StoreError::Unavailable))
        ));
    }
}
