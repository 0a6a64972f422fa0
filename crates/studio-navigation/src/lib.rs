//! Navigation and active-project state for the Studio shell.
//!
//! Three sources describe "where the user is": the browser URL, a persisted
//! local cache, and the remote project record. [`Synchronizer`] owns the
//! in-memory view of all three and decides which one wins on conflict. The
//! browser bindings live in the web shell; everything here is
//! platform-neutral and runs natively in tests.

pub mod cache;
pub mod config;
pub mod fetcher;
pub mod history;
pub mod project;
pub mod route;
pub mod storage;
pub mod synchronizer;
pub mod view;

pub use cache::{CacheError, PersistedCache};
pub use config::{ConfigError, NavigationConfig};
pub use fetcher::{FetchError, FetchErrorKind, ProjectFetcher};
pub use history::{HistoryPort, MemoryHistory};
pub use project::{ActiveProject, ProjectKind};
pub use route::{NavigationTarget, decode_path, encode_path, is_shell_route};
pub use storage::{KeyValueStore, MemoryStore, StoreError};
pub use synchronizer::{FetchOutcome, FetchTicket, NavigationState, Synchronizer};
pub use view::View;
