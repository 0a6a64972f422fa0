use studio_navigation::{ActiveProject, ConfigError, NavigationConfig, View};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ShellInputError {
    #[error("unknown view `{0}`")]
    UnknownView(String),
    #[error("project payload is not valid json: {0}")]
    ProjectJson(String),
    #[error("project payload is missing an id")]
    ProjectWithoutId,
}

pub(crate) fn parse_view(raw: &str) -> Result<View, ShellInputError> {
    View::parse(raw).ok_or_else(|| ShellInputError::UnknownView(raw.trim().to_string()))
}

/// `None`, an empty string, and JSON `null` all mean "no project".
pub(crate) fn parse_project(raw: Option<&str>) -> Result<Option<ActiveProject>, ShellInputError> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    let project: Option<ActiveProject> = serde_json::from_str(raw)
        .map_err(|error| ShellInputError::ProjectJson(error.to_string()))?;
    match project {
        Some(project) if !project.has_valid_id() => Err(ShellInputError::ProjectWithoutId),
        project => Ok(project),
    }
}

/// Resolves the navigation config from the page-provided JSON hint and names
/// where it came from.
pub(crate) fn resolve_config(
    hint: Option<&str>,
) -> (NavigationConfig, Result<&'static str, ConfigError>) {
    let Some(hint) = hint.map(str::trim).filter(|hint| !hint.is_empty()) else {
        return (NavigationConfig::default(), Ok("default"));
    };
    match NavigationConfig::from_json(hint) {
        Ok(config) => (config, Ok("page_hint")),
        Err(error) => (NavigationConfig::default(), Err(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_view_reports_unknown_names() {
        assert_eq!(parse_view("projects"), Ok(View::Projects));
        assert_eq!(
            parse_view(" admin "),
            Err(ShellInputError::UnknownView("admin".to_string()))
        );
    }

    #[test]
    fn parse_project_accepts_null_and_records() {
        assert_eq!(parse_project(None), Ok(None));
        assert_eq!(parse_project(Some("  ")), Ok(None));
        assert_eq!(parse_project(Some("null")), Ok(None));

        let project = parse_project(Some(r#"{"id":"p1","name":"Deck","type":"image"}"#))
            .expect("valid project")
            .expect("project present");
        assert_eq!(project.id, "p1");
    }

    #[test]
    fn parse_project_rejects_bad_payloads() {
        assert!(matches!(
            parse_project(Some("{")),
            Err(ShellInputError::ProjectJson(_))
        ));
        assert_eq!(
            parse_project(Some(r#"{"id":"","name":"x"}"#)),
            Err(ShellInputError::ProjectWithoutId)
        );
    }

    #[test]
    fn resolve_config_falls_back_to_defaults() {
        let (config, source) = resolve_config(None);
        assert_eq!(config, NavigationConfig::default());
        assert_eq!(source, Ok("default"));

        let (config, source) = resolve_config(Some(r#"{"storage_namespace":"tenant-7"}"#));
        assert_eq!(config.storage_namespace, "tenant-7");
        assert_eq!(source, Ok("page_hint"));

        let (config, source) = resolve_config(Some(r#"{"project_api_base":"projects"}"#));
        assert_eq!(config, NavigationConfig::default());
        assert_eq!(source, Err(ConfigError::InvalidApiBase));
    }
}
