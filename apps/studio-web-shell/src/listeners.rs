/// Registered change callbacks keyed by the handle returned to the host.
#[derive(Debug)]
pub(crate) struct ListenerSet<T> {
    next_handle: u32,
    entries: Vec<(u32, T)>,
}

impl<T: Clone> ListenerSet<T> {
    pub(crate) const fn new() -> Self {
        Self {
            next_handle: 1,
            entries: Vec::new(),
        }
    }

    /// Handles start at 1 and are never reused while registered.
    pub(crate) fn add(&mut self, listener: T) -> u32 {
        let handle = self.next_handle;
        self.next_handle = self.next_handle.checked_add(1).unwrap_or(1);
        self.entries.push((handle, listener));
        handle
    }

    pub(crate) fn remove(&mut self, handle: u32) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(registered, _)| *registered != handle);
        self.entries.len() != before
    }

    /// Copies the listeners out so callbacks may register or unregister while
    /// being notified.
    pub(crate) fn snapshot(&self) -> Vec<T> {
        self.entries.iter().map(|(_, listener)| listener.clone()).collect()
    }
}
