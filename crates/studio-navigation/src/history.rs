/// Browser-style session history. Pushing the current path must not add an
/// entry.
pub trait HistoryPort {
    fn current_path(&self) -> String;
    fn push_path(&mut self, path: &str);
    fn replace_path(&mut self, path: &str);
}

/// Deterministic history stack for native hosts and tests.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl MemoryHistory {
    #[must_use]
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            entries: vec![initial_path.into()],
            cursor: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Moves one entry back and returns the new current path, as a popstate
    /// would report it.
    pub fn back(&mut self) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).cloned()
    }

    pub fn forward(&mut self) -> Option<String> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor).cloned()
    }
}

impl HistoryPort for MemoryHistory {
    fn current_path(&self) -> String {
        self.entries
            .get(self.cursor)
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    }

    fn push_path(&mut self, path: &str) {
        if self.current_path() == path {
            return;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(path.to_string());
        self.cursor = self.entries.len() - 1;
    }

    fn replace_path(&mut self, path: &str) {
        match self.entries.get_mut(self.cursor) {
            Some(entry) => *entry = path.to_string(),
            None => self.entries.push(path.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_of_current_path_is_a_no_op() {
        let mut history = MemoryHistory::new("/");
        history.push_path("/settings");
        history.push_path("/settings");
        assert_eq!(history.entries(), ["/", "/settings"]);
    }

    #[test]
    fn push_after_back_drops_forward_entries() {
        let mut history = MemoryHistory::new("/");
        history.push_path("/chat/p1");
        history.push_path("/chat/p2");
        assert_eq!(history.back().as_deref(), Some("/chat/p1"));
        history.push_path("/billing");
        assert_eq!(history.entries(), ["/", "/chat/p1", "/billing"]);
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn back_and_forward_stop_at_the_edges() {
        let mut history = MemoryHistory::new("/projects");
        assert_eq!(history.back(), None);
        history.push_path("/settings");
        assert_eq!(history.back().as_deref(), Some("/projects"));
        assert_eq!(history.forward().as_deref(), Some("/settings"));
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn replace_rewrites_the_current_entry() {
        let mut history = MemoryHistory::new("/");
        history.replace_path("/chat/p1");
        assert_eq!(history.entries(), ["/chat/p1"]);
        assert_eq!(history.current_path(), "/chat/p1");
    }
}
