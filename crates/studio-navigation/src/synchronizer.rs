//! Keeps the URL, the persisted cache, and the remote project record in
//! agreement about which view and project are active.
//!
//! The synchronizer never performs I/O on its own schedule. Commands
//! (`navigate_to*`, `set_active_project`, `handle_popstate`) mutate state and
//! push history directly; `reconcile` hands the host a [`FetchTicket`] when a
//! URL-named project must be loaded, and `complete_fetch` applies the result
//! if the ticket is still current.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::PersistedCache;
use crate::config::NavigationConfig;
use crate::fetcher::{FetchError, FetchErrorKind, ProjectFetcher};
use crate::history::HistoryPort;
use crate::project::ActiveProject;
use crate::route::{decode_path, encode_path};
use crate::storage::KeyValueStore;
use crate::view::View;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NavigationState {
    pub current_view: View,
    pub active_project: Option<ActiveProject>,
    /// Project id encoded in the URL, whether or not it has been resolved.
    pub url_project_id: Option<String>,
    pub is_loading_project: bool,
}

/// Identifies one project fetch. Only the most recently issued ticket may
/// commit a result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    project_id: String,
    generation: u64,
}

impl FetchTicket {
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Adopted,
    NotFound,
    Failed(FetchErrorKind),
    /// The ticket was superseded or the URL moved on before it resolved.
    Discarded,
}

#[derive(Debug)]
pub struct Synchronizer<S, H> {
    state: NavigationState,
    cache: PersistedCache<S>,
    history: H,
    in_flight: Option<FetchTicket>,
    next_generation: u64,
    // Last URL id that failed to resolve; not retried until the user navigates.
    unresolved_project_id: Option<String>,
}

impl<S: KeyValueStore, H: HistoryPort> Synchronizer<S, H> {
    /// Builds the initial state from the current URL and the persisted cache.
    ///
    /// The URL takes precedence over the cache: a cached project is adopted
    /// without a fetch only when it agrees with the URL, and a disagreeing
    /// cached project is left for reconciliation to replace. At a bare `/`
    /// the cached project is restored and the URL is rewritten in place to
    /// name it.
    pub fn mount(store: S, history: H, config: &NavigationConfig) -> Self {
        let target = decode_path(&history.current_path());
        let mut cache = PersistedCache::new(store, config);
        let cached = cache.read_active_project();

        let hydrated = match (target.project_id.as_deref(), cached) {
            (Some(url_id), Some(project)) if project.id == url_id => Some(project),
            (Some(_), _) => None,
            (None, cached) => cached,
        };

        if let Err(error) = cache.write_last_view(target.view) {
            warn!(%error, "failed to persist initial view");
        }

        let mut synchronizer = Self {
            state: NavigationState {
                current_view: target.view,
                active_project: None,
                url_project_id: target.project_id,
                is_loading_project: false,
            },
            cache,
            history,
            in_flight: None,
            next_generation: 0,
            unresolved_project_id: None,
        };

        if let Some(project) = &hydrated {
            if synchronizer.state.current_view == View::Chat
                && synchronizer.state.url_project_id.is_none()
            {
                synchronizer
                    .history
                    .replace_path(&encode_path(View::Chat, Some(&project.id)));
                synchronizer.state.url_project_id = Some(project.id.clone());
            }
        }
        synchronizer.state.active_project = hydrated;

        let hydrated_project_id = synchronizer
            .state
            .active_project
            .as_ref()
            .map(|project| project.id.as_str());
        info!(
            view = %synchronizer.state.current_view,
            url_project_id = ?synchronizer.state.url_project_id,
            ?hydrated_project_id,
            "navigation mounted"
        );
        synchronizer
    }

    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    #[must_use]
    pub fn current_view(&self) -> View {
        self.state.current_view
    }

    #[must_use]
    pub fn active_project(&self) -> Option<&ActiveProject> {
        self.state.active_project.as_ref()
    }

    #[must_use]
    pub fn url_project_id(&self) -> Option<&str> {
        self.state.url_project_id.as_deref()
    }

    #[must_use]
    pub fn is_loading_project(&self) -> bool {
        self.state.is_loading_project
    }

    #[must_use]
    pub fn current_path(&self) -> String {
        self.history.current_path()
    }

    #[must_use]
    pub fn last_view(&self) -> Option<View> {
        self.cache.read_last_view()
    }

    #[must_use]
    pub fn cache(&self) -> &PersistedCache<S> {
        &self.cache
    }

    #[must_use]
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Host access to the history port, e.g. to drive back/forward before
    /// reporting the resulting path through [`Self::handle_popstate`].
    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Switches view. Chat without a project means "new chat" and clears the
    /// active project; other views leave it untouched.
    pub fn navigate_to(&mut self, view: View) {
        self.unresolved_project_id = None;
        self.commit_view(view);
        self.state.url_project_id = None;
        if view == View::Chat {
            self.commit_active_project(None);
        }
        self.push_path(&encode_path(view, None));
        debug!(view = %view, "navigated");
    }

    /// Switches view with an explicitly chosen project (`None` included).
    pub fn navigate_to_with_project(&mut self, view: View, project: Option<ActiveProject>) {
        if Self::rejects_project(project.as_ref()) {
            return;
        }
        self.unresolved_project_id = None;
        self.commit_view(view);
        self.state.url_project_id = project
            .as_ref()
            .filter(|_| view.is_project_scoped())
            .map(|project| project.id.clone());
        let path = encode_path(view, self.state.url_project_id.as_deref());
        self.commit_active_project(project);
        self.push_path(&path);
        debug!(view = %view, url_project_id = ?self.state.url_project_id, "navigated with project");
    }

    /// Follows an in-app link. Paths naming a project keep the active project
    /// when it matches and otherwise hand back a fetch for the new id.
    pub fn navigate_to_path(&mut self, path: &str) -> Option<FetchTicket> {
        let target = decode_path(path);
        let Some(project_id) = target.project_id else {
            self.navigate_to(target.view);
            return None;
        };

        self.unresolved_project_id = None;
        self.commit_view(View::Chat);
        let keeps_active = self
            .active_project()
            .is_some_and(|project| project.id == project_id);
        if !keeps_active {
            self.commit_active_project(None);
        }
        self.push_path(&encode_path(View::Chat, Some(&project_id)));
        debug!(%project_id, "navigated to project path");
        self.state.url_project_id = Some(project_id);
        self.reconcile()
    }

    /// Replaces the active project without changing view. In chat the URL
    /// follows the project; clearing it returns chat to `/`.
    pub fn set_active_project(&mut self, project: Option<ActiveProject>) {
        if Self::rejects_project(project.as_ref()) {
            return;
        }
        self.unresolved_project_id = None;
        if self.state.current_view == View::Chat {
            self.state.url_project_id = project.as_ref().map(|project| project.id.clone());
            let path = encode_path(View::Chat, self.state.url_project_id.as_deref());
            self.push_path(&path);
        }
        self.commit_active_project(project);
    }

    /// Applies a back/forward navigation to `path` and returns a fetch to
    /// start if the new URL names an unresolved project.
    pub fn handle_popstate(&mut self, path: &str) -> Option<FetchTicket> {
        let target = decode_path(path);
        let previous_view = self.state.current_view;
        self.unresolved_project_id = None;
        self.commit_view(target.view);
        self.state.url_project_id = target.project_id;

        match (target.view, self.state.url_project_id.clone()) {
            (View::Chat, None) if previous_view == View::Chat => {
                debug!("popstate returned to new chat");
                self.commit_active_project(None);
            }
            (View::Chat, None) => {
                if let Some(project_id) = self.active_project().map(|project| project.id.clone()) {
                    self.history
                        .replace_path(&encode_path(View::Chat, Some(&project_id)));
                    self.state.url_project_id = Some(project_id);
                }
            }
            (View::Chat, Some(url_id)) => {
                let matches_url = self
                    .active_project()
                    .is_some_and(|project| project.id == url_id);
                if !matches_url {
                    self.commit_active_project(None);
                }
            }
            _ => {}
        }

        self.reconcile()
    }

    /// Resolves a URL-named project that is not loaded yet.
    ///
    /// Returns `None` when nothing needs fetching: no URL id, project already
    /// active, same id already in flight, id already failed, or a cached
    /// copy matched. A ticket for a new id supersedes any older one.
    pub fn reconcile(&mut self) -> Option<FetchTicket> {
        let project_id = self.state.url_project_id.clone()?;
        if self.state.active_project.is_some() {
            return None;
        }
        if self
            .in_flight
            .as_ref()
            .is_some_and(|ticket| ticket.project_id == project_id)
        {
            debug!(%project_id, "project fetch already in flight");
            return None;
        }
        if self.unresolved_project_id.as_deref() == Some(project_id.as_str()) {
            return None;
        }

        if let Some(cached) = self.cache.read_active_project() {
            if cached.id == project_id {
                debug!(%project_id, "adopting cached project");
                self.cancel_in_flight();
                self.commit_active_project(Some(cached));
                return None;
            }
        }

        self.next_generation += 1;
        let ticket = FetchTicket {
            project_id,
            generation: self.next_generation,
        };
        if let Some(previous) = self.in_flight.replace(ticket.clone()) {
            debug!(
                superseded = %previous.project_id,
                project_id = %ticket.project_id,
                "project fetch superseded"
            );
        }
        self.state.is_loading_project = true;
        debug!(
            project_id = %ticket.project_id,
            generation = ticket.generation,
            "project fetch started"
        );
        Some(ticket)
    }

    /// Applies a fetch result. The loading flag is cleared for the current
    /// ticket on every outcome; results for stale tickets are dropped.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Option<ActiveProject>, FetchError>,
    ) -> FetchOutcome {
        if self.in_flight.as_ref() != Some(ticket) {
            debug!(
                project_id = %ticket.project_id,
                generation = ticket.generation,
                "dropping superseded project fetch"
            );
            return FetchOutcome::Discarded;
        }
        self.cancel_in_flight();

        let still_wanted = self.state.active_project.is_none()
            && self.state.url_project_id.as_deref() == Some(ticket.project_id.as_str());
        if !still_wanted {
            debug!(
                project_id = %ticket.project_id,
                "dropping project fetch for a url that moved on"
            );
            return FetchOutcome::Discarded;
        }

        match result {
            Ok(Some(project)) if project.id == ticket.project_id => {
                info!(project_id = %project.id, "project resolved");
                self.commit_active_project(Some(project));
                FetchOutcome::Adopted
            }
            Ok(Some(project)) => {
                warn!(
                    requested = %ticket.project_id,
                    returned = %project.id,
                    "project fetch returned a different id"
                );
                self.unresolved_project_id = Some(ticket.project_id.clone());
                FetchOutcome::NotFound
            }
            Ok(None) => {
                info!(project_id = %ticket.project_id, "project not found");
                self.unresolved_project_id = Some(ticket.project_id.clone());
                FetchOutcome::NotFound
            }
            Err(error) => {
                warn!(
                    project_id = %ticket.project_id,
                    kind = error.kind().as_str(),
                    retryable = error.is_retryable(),
                    %error,
                    "project fetch failed"
                );
                self.unresolved_project_id = Some(ticket.project_id.clone());
                FetchOutcome::Failed(error.kind())
            }
        }
    }

    /// Runs one reconcile/fetch/complete cycle for hosts that own the
    /// synchronizer across the await.
    pub async fn resolve<F>(&mut self, fetcher: &F) -> Option<FetchOutcome>
    where
        F: ProjectFetcher + ?Sized,
    {
        let ticket = self.reconcile()?;
        let result = fetcher.fetch_project(ticket.project_id()).await;
        Some(self.complete_fetch(&ticket, result))
    }

    fn rejects_project(project: Option<&ActiveProject>) -> bool {
        let rejected = project.is_some_and(|project| !project.has_valid_id());
        if rejected {
            warn!("ignoring navigation command with a project that has no id");
        }
        rejected
    }

    fn cancel_in_flight(&mut self) {
        self.in_flight = None;
        self.state.is_loading_project = false;
    }

    fn commit_active_project(&mut self, project: Option<ActiveProject>) {
        if self.state.active_project == project {
            return;
        }
        if let Err(error) = self.cache.write_active_project(project.as_ref()) {
            warn!(%error, "failed to persist active project");
        }
        self.state.active_project = project;
    }

    fn commit_view(&mut self, view: View) {
        if self.state.current_view == view {
            return;
        }
        if let Err(error) = self.cache.write_last_view(view) {
            warn!(%error, "failed to persist view");
        }
        self.state.current_view = view;
    }

    fn push_path(&mut self, path: &str) {
        if self.history.current_path() == path {
            return;
        }
        self.history.push_path(path);
    }
}
