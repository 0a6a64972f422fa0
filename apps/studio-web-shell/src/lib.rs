#[cfg(any(target_arch = "wasm32", test))]
mod listeners;
#[cfg(any(target_arch = "wasm32", test))]
mod project_response;
#[cfg(target_arch = "wasm32")]
mod shell_constants;
#[cfg(any(target_arch = "wasm32", test))]
mod shell_input;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use async_trait::async_trait;
    use futures_util::{FutureExt, pin_mut, select};
    use gloo_net::http::Request;
    use gloo_timers::future::sleep;
    use studio_navigation::{
        ActiveProject, FetchError, FetchTicket, HistoryPort, KeyValueStore, NavigationConfig,
        ProjectFetcher, StoreError, Synchronizer, is_shell_route,
    };
    use tracing::{debug, info, warn};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;

    use crate::listeners::ListenerSet;
    use crate::project_response::classify_project_response;
    use crate::shell_constants::*;
    use crate::shell_input::{ShellInputError, parse_project, parse_view, resolve_config};

    mod browser;
    mod logging;
    mod network;

    use browser::*;
    use logging::*;
    use network::*;

    type ShellSynchronizer = Synchronizer<LocalStorageStore, BrowserHistory>;

    thread_local! {
        static NAVIGATION: RefCell<Option<ShellSynchronizer>> = const { RefCell::new(None) };
        static PROJECT_FETCHER: RefCell<Option<Rc<HttpProjectFetcher>>> = const { RefCell::new(None) };
        static ROUTE_POPSTATE_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static ROUTE_LINK_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static CHANGE_LISTENERS: RefCell<ListenerSet<js_sys::Function>> = const { RefCell::new(ListenerSet::new()) };
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        install_console_tracing();

        let (config, source) = resolve_config(read_config_hint().as_deref());
        match source {
            Ok(source) => info!(
                source,
                namespace = %config.storage_namespace,
                "navigation config resolved"
            ),
            Err(error) => warn!(%error, "invalid navigation config hint, using defaults"),
        }

        let synchronizer =
            Synchronizer::mount(LocalStorageStore::open(), BrowserHistory, &config);
        NAVIGATION.with(|slot| *slot.borrow_mut() = Some(synchronizer));
        PROJECT_FETCHER
            .with(|slot| *slot.borrow_mut() = Some(Rc::new(HttpProjectFetcher::new(config))));

        install_browser_navigation_handlers();
        schedule_reconcile();
        notify_navigation_listeners();
    }

    #[wasm_bindgen]
    pub fn navigate_to(view: String) -> Result<(), JsValue> {
        let view = parse_view(&view).map_err(input_error)?;
        with_navigation(|navigation| navigation.navigate_to(view));
        after_command();
        Ok(())
    }

    #[wasm_bindgen]
    pub fn navigate_to_project(view: String, project_json: Option<String>) -> Result<(), JsValue> {
        let view = parse_view(&view).map_err(input_error)?;
        let project = parse_project(project_json.as_deref()).map_err(input_error)?;
        with_navigation(|navigation| navigation.navigate_to_with_project(view, project));
        after_command();
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_active_project(project_json: Option<String>) -> Result<(), JsValue> {
        let project = parse_project(project_json.as_deref()).map_err(input_error)?;
        with_navigation(|navigation| navigation.set_active_project(project));
        after_command();
        Ok(())
    }

    #[wasm_bindgen]
    pub fn navigation_state_json() -> String {
        NAVIGATION.with(|slot| {
            slot.borrow()
                .as_ref()
                .and_then(|navigation| serde_json::to_string(navigation.state()).ok())
                .unwrap_or_else(|| "{}".to_string())
        })
    }

    /// Registers a callback invoked with the state JSON after every change.
    /// The returned handle unregisters it through `off_navigation_change`.
    #[wasm_bindgen]
    pub fn on_navigation_change(callback: js_sys::Function) -> u32 {
        CHANGE_LISTENERS.with(|listeners| listeners.borrow_mut().add(callback))
    }

    #[wasm_bindgen]
    pub fn off_navigation_change(handle: u32) -> bool {
        CHANGE_LISTENERS.with(|listeners| listeners.borrow_mut().remove(handle))
    }

    fn with_navigation<T>(apply: impl FnOnce(&mut ShellSynchronizer) -> T) -> Option<T> {
        NAVIGATION.with(|slot| slot.borrow_mut().as_mut().map(apply))
    }

    fn after_command() {
        schedule_reconcile();
        notify_navigation_listeners();
    }

    pub(super) fn schedule_reconcile() {
        if let Some(ticket) = with_navigation(Synchronizer::reconcile).flatten() {
            start_project_fetch(ticket);
        }
    }

    pub(super) fn start_project_fetch(ticket: FetchTicket) {
        let Some(fetcher) = PROJECT_FETCHER.with(|slot| slot.borrow().clone()) else {
            warn!(project_id = ticket.project_id(), "project fetcher is not installed");
            return;
        };
        spawn_local(async move {
            let result = fetcher.fetch_project(ticket.project_id()).await;
            let outcome = with_navigation(|navigation| navigation.complete_fetch(&ticket, result));
            debug!(
                project_id = ticket.project_id(),
                generation = ticket.generation(),
                ?outcome,
                "project fetch settled"
            );
            notify_navigation_listeners();
        });
    }

    pub(super) fn notify_navigation_listeners() {
        let state = JsValue::from_str(&navigation_state_json());
        let listeners = CHANGE_LISTENERS.with(|listeners| listeners.borrow().snapshot());
        for listener in listeners {
            if let Err(error) = listener.call1(&JsValue::NULL, &state) {
                warn!(?error, "navigation change listener threw");
            }
        }
    }

    fn input_error(error: ShellInputError) -> JsValue {
        warn!(%error, "rejected navigation command");
        JsValue::from_str(&error.to_string())
    }
}
