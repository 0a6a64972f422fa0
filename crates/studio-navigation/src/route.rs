//! Mapping between shell paths and `(view, project id)` pairs.
//!
//! Both directions are pure and total: unknown or malformed paths decode to a
//! blank chat instead of failing.

use serde::{Deserialize, Serialize};

use crate::view::View;

const CHAT_PREFIX: &str = "/chat/";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NavigationTarget {
    pub view: View,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl NavigationTarget {
    /// Builds a target, dropping ids the URL is not allowed to carry.
    #[must_use]
    pub fn new(view: View, project_id: Option<&str>) -> Self {
        let project_id = project_id
            .filter(|id| view.is_project_scoped() && !id.is_empty())
            .map(ToString::to_string);
        Self { view, project_id }
    }

    #[must_use]
    pub fn path(&self) -> String {
        encode_path(self.view, self.project_id.as_deref())
    }
}

#[must_use]
pub fn decode_path(path: &str) -> NavigationTarget {
    let path = strip_query_and_fragment(path);
    let path = match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    };

    if let Some(raw_id) = path.strip_prefix(CHAT_PREFIX) {
        if raw_id.is_empty() || raw_id.contains('/') {
            return NavigationTarget::default();
        }
        return match urlencoding::decode(raw_id) {
            Ok(id) if !id.is_empty() => NavigationTarget {
                view: View::Chat,
                project_id: Some(id.into_owned()),
            },
            _ => NavigationTarget::default(),
        };
    }

    let Some(segment) = path.strip_prefix('/') else {
        return NavigationTarget::default();
    };
    if segment.is_empty() || segment.contains('/') {
        return NavigationTarget::default();
    }
    // Views are lowercase on the wire; `/Settings` is not a shell route.
    match View::ALL.into_iter().find(|view| view.as_str() == segment) {
        Some(view) => NavigationTarget {
            view,
            project_id: None,
        },
        None => NavigationTarget::default(),
    }
}

#[must_use]
pub fn encode_path(view: View, project_id: Option<&str>) -> String {
    match (view, project_id) {
        (View::Chat, Some(id)) if !id.is_empty() => {
            format!("{CHAT_PREFIX}{}", urlencoding::encode(id))
        }
        (View::Chat, _) => "/".to_string(),
        (view, _) => format!("/{}", view.as_str()),
    }
}

/// True when `path` is exactly a path this codec would produce.
#[must_use]
pub fn is_shell_route(path: &str) -> bool {
    let target = decode_path(path);
    target.path() == strip_query_and_fragment(path)
}

fn strip_query_and_fragment(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}
