use serde::{Deserialize, Serialize};

pub const DEFAULT_STORAGE_NAMESPACE: &str = "studio.web.nav";
pub const DEFAULT_PROJECT_API_BASE: &str = "/api/projects";
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;
pub const MIN_FETCH_TIMEOUT_MS: u64 = 1_000;
pub const MAX_FETCH_TIMEOUT_MS: u64 = 60_000;

const ACTIVE_PROJECT_KEY_SUFFIX: &str = "active_project.v1";
const LAST_VIEW_KEY_SUFFIX: &str = "last_view.v1";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("navigation config is not valid json: {0}")]
    Json(String),
    #[error("storage namespace must not be empty")]
    EmptyNamespace,
    #[error("project api base must be an absolute path or http(s) url")]
    InvalidApiBase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub storage_namespace: String,
    pub project_api_base: String,
    pub fetch_timeout_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            storage_namespace: DEFAULT_STORAGE_NAMESPACE.to_string(),
            project_api_base: DEFAULT_PROJECT_API_BASE.to_string(),
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}

impl NavigationConfig {
    /// Parses a (possibly partial) JSON config; missing fields take defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|error| ConfigError::Json(error.to_string()))?;
        config.normalized()
    }

    pub fn normalized(self) -> Result<Self, ConfigError> {
        let storage_namespace = self.storage_namespace.trim().trim_end_matches('.').to_string();
        if storage_namespace.is_empty() {
            return Err(ConfigError::EmptyNamespace);
        }

        let project_api_base = self.project_api_base.trim().trim_end_matches('/').to_string();
        let has_scheme = project_api_base
            .split_once("://")
            .is_some_and(|(scheme, rest)| {
                matches!(scheme, "http" | "https") && !rest.is_empty() && !rest.starts_with('/')
            });
        let is_absolute_path =
            project_api_base.starts_with('/') && !project_api_base.starts_with("//");
        if !(has_scheme || is_absolute_path) {
            return Err(ConfigError::InvalidApiBase);
        }

        Ok(Self {
            storage_namespace,
            project_api_base,
            fetch_timeout_ms: self
                .fetch_timeout_ms
                .clamp(MIN_FETCH_TIMEOUT_MS, MAX_FETCH_TIMEOUT_MS),
        })
    }

    #[must_use]
    pub fn active_project_key(&self) -> String {
        format!("{}.{ACTIVE_PROJECT_KEY_SUFFIX}", self.storage_namespace)
    }

    #[must_use]
    pub fn last_view_key(&self) -> String {
        format!("{}.{LAST_VIEW_KEY_SUFFIX}", self.storage_namespace)
    }

    #[must_use]
    pub fn project_url(&self, project_id: &str) -> String {
        format!(
            "{}/{}",
            self.project_api_base,
            urlencoding::encode(project_id)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_takes_defaults() {
        let config = NavigationConfig::from_json(r#"{"fetch_timeout_ms": 2500}"#)
            .expect("valid partial config");
        assert_eq!(config.storage_namespace, DEFAULT_STORAGE_NAMESPACE);
        assert_eq!(config.project_api_base, DEFAULT_PROJECT_API_BASE);
        assert_eq!(config.fetch_timeout_ms, 2_500);
    }

    #[test]
    fn normalizes_namespace_api_base_and_timeout() {
        let config = NavigationConfig {
            storage_namespace: " tenant-a. ".to_string(),
            project_api_base: "https://api.studio.test/v1/projects/".to_string(),
            fetch_timeout_ms: 5,
        }
        .normalized()
        .expect("valid config");
        assert_eq!(config.storage_namespace, "tenant-a");
        assert_eq!(config.project_api_base, "https://api.studio.test/v1/projects");
        assert_eq!(config.fetch_timeout_ms, MIN_FETCH_TIMEOUT_MS);
        assert_eq!(config.active_project_key(), "tenant-a.active_project.v1");
        assert_eq!(config.last_view_key(), "tenant-a.last_view.v1");
    }

    #[test]
    fn rejects_invalid_values() {
        let error = NavigationConfig::from_json(r#"{"storage_namespace": "  "}"#)
            .expect_err("empty namespace");
        assert_eq!(error, ConfigError::EmptyNamespace);

        for base in ["projects", "ftp://host/projects", "https:///projects", "//cdn/projects"] {
            let error = NavigationConfig::from_json(&format!(r#"{{"project_api_base": "{base}"}}"#))
                .expect_err("invalid api base");
            assert_eq!(error, ConfigError::InvalidApiBase, "base={base}");
        }

        assert!(matches!(
            NavigationConfig::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn project_url_escapes_ids() {
        let config = NavigationConfig::default();
        assert_eq!(config.project_url("p 1/x"), "/api/projects/p%201%2Fx");
    }
}
