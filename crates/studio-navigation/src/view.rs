use serde::{Deserialize, Serialize};

/// Top-level screen shown by the shell. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Chat,
    Projects,
    Settings,
    Billing,
    Business,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Chat,
        View::Projects,
        View::Settings,
        View::Billing,
        View::Business,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Projects => "projects",
            Self::Settings => "settings",
            Self::Billing => "billing",
            Self::Business => "business",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|view| view.as_str() == normalized)
    }

    /// Only the chat view carries a project in its URL.
    #[must_use]
    pub fn is_project_scoped(self) -> bool {
        matches!(self, Self::Chat)
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_wire_names_case_insensitively() {
        assert_eq!(View::parse("chat"), Some(View::Chat));
        assert_eq!(View::parse(" Settings "), Some(View::Settings));
        assert_eq!(View::parse("BUSINESS"), Some(View::Business));
    }

    #[test]
    fn parse_rejects_unknown_views() {
        assert_eq!(View::parse(""), None);
        assert_eq!(View::parse("admin"), None);
        assert_eq!(View::parse("chat/"), None);
    }

    #[test]
    fn serde_uses_wire_names() {
        let encoded = serde_json::to_string(&View::Billing).expect("serialize view");
        assert_eq!(encoded, "\"billing\"");
        let decoded: View = serde_json::from_str("\"projects\"").expect("deserialize view");
        assert_eq!(decoded, View::Projects);
    }

    #[test]
    fn only_chat_is_project_scoped() {
        let scoped = View::ALL
            .into_iter()
            .filter(|view| view.is_project_scoped())
            .collect::<Vec<_>>();
        assert_eq!(scoped, vec![View::Chat]);
    }
}
