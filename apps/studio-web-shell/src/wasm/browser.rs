use super::*;

    /// `window.localStorage`, or nothing when the browser denies access
    /// (private mode, disabled storage).
    pub(super) struct LocalStorageStore {
        storage: Option<web_sys::Storage>,
    }

    impl LocalStorageStore {
        pub(super) fn open() -> Self {
            let storage =
                web_sys::window().and_then(|window| window.local_storage().ok().flatten());
            if storage.is_none() {
                warn!("local storage is unavailable; navigation cache disabled");
            }
            Self { storage }
        }

        fn storage(&self) -> Result<&web_sys::Storage, StoreError> {
            self.storage.as_ref().ok_or(StoreError::Unavailable)
        }
    }

    impl KeyValueStore for LocalStorageStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.storage()?.get_item(key).map_err(|_| StoreError::Read {
                key: key.to_string(),
            })
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.storage()?.set_item(key, value).map_err(|_| StoreError::Write {
                key: key.to_string(),
            })
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.storage()?.remove_item(key).map_err(|_| StoreError::Remove {
                key: key.to_string(),
            })
        }
    }

    pub(super) struct BrowserHistory;

    impl HistoryPort for BrowserHistory {
        fn current_path(&self) -> String {
            current_pathname()
        }

        fn push_path(&mut self, path: &str) {
            let Some(history) = web_sys::window().and_then(|window| window.history().ok()) else {
                return;
            };
            if current_pathname() == path {
                return;
            }
            if let Err(error) = history.push_state_with_url(&JsValue::NULL, "", Some(path)) {
                warn!(path, ?error, "history push failed");
            }
        }

        fn replace_path(&mut self, path: &str) {
            let Some(history) = web_sys::window().and_then(|window| window.history().ok()) else {
                return;
            };
            if current_pathname() == path {
                return;
            }
            if let Err(error) = history.replace_state_with_url(&JsValue::NULL, "", Some(path)) {
                warn!(path, ?error, "history replace failed");
            }
        }
    }

    pub(super) fn current_pathname() -> String {
        let Some(window) = web_sys::window() else {
            return "/".to_string();
        };
        let Ok(pathname) = window.location().pathname() else {
            return "/".to_string();
        };
        if pathname.trim().is_empty() {
            "/".to_string()
        } else {
            pathname
        }
    }

    pub(super) fn read_config_hint() -> Option<String> {
        let window = web_sys::window()?;
        let value = js_sys::Reflect::get(&window, &JsValue::from_str(NAV_CONFIG_GLOBAL)).ok()?;
        value.as_string()
    }

    pub(super) fn install_browser_navigation_handlers() {
        let Some(window) = web_sys::window() else {
            return;
        };

        ROUTE_POPSTATE_HANDLER.with(|slot| {
            if slot.borrow().is_some() {
                return;
            }
            let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
                apply_browser_popstate();
            }));
            if let Err(error) = window
                .add_event_listener_with_callback(POPSTATE_EVENT, callback.as_ref().unchecked_ref())
            {
                warn!(?error, "failed to install popstate handler");
                return;
            }
            *slot.borrow_mut() = Some(callback);
        });

        let Some(document) = window.document() else {
            return;
        };
        ROUTE_LINK_CLICK_HANDLER.with(|slot| {
            if slot.borrow().is_some() {
                return;
            }
            let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |event| {
                intercept_shell_link_click(&event);
            }));
            if let Err(error) = document.add_event_listener_with_callback_and_bool(
                CLICK_EVENT,
                callback.as_ref().unchecked_ref(),
                true,
            ) {
                warn!(?error, "failed to install link click handler");
                return;
            }
            *slot.borrow_mut() = Some(callback);
        });
    }

    /// Turns plain left clicks on same-origin shell links into navigation
    /// commands instead of full page loads.
    pub(super) fn intercept_shell_link_click(event: &web_sys::Event) {
        if event.default_prevented() {
            return;
        }
        let Some(mouse_event) = event.dyn_ref::<web_sys::MouseEvent>() else {
            return;
        };
        if mouse_event.button() != 0
            || mouse_event.meta_key()
            || mouse_event.ctrl_key()
            || mouse_event.shift_key()
            || mouse_event.alt_key()
        {
            return;
        }

        let Some(anchor) = anchor_from_event(event) else {
            return;
        };
        let href_attribute = anchor.get_attribute("href").unwrap_or_default();
        if href_attribute.trim().is_empty() || href_attribute.starts_with('#') {
            return;
        }
        if anchor.has_attribute("download") {
            return;
        }
        let target = anchor.target();
        if !target.is_empty() && target != "_self" {
            return;
        }

        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(origin) = window.location().origin() else {
            return;
        };
        let href = anchor.href();
        let Some(path) = href.strip_prefix(&origin) else {
            return;
        };
        if !path.starts_with('/') || !is_shell_route(path) {
            return;
        }

        event.prevent_default();
        let ticket = with_navigation(|navigation| navigation.navigate_to_path(path)).flatten();
        debug!(path, fetching = ticket.is_some(), "shell link followed");
        if let Some(ticket) = ticket {
            start_project_fetch(ticket);
        }
        notify_navigation_listeners();
    }

    fn anchor_from_event(event: &web_sys::Event) -> Option<web_sys::HtmlAnchorElement> {
        let composed_path = event.composed_path();
        (0..composed_path.length()).find_map(|index| {
            composed_path
                .get(index)
                .dyn_into::<web_sys::HtmlAnchorElement>()
                .ok()
        })
    }

    pub(super) fn apply_browser_popstate() {
        let path = current_pathname();
        let ticket = with_navigation(|navigation| navigation.handle_popstate(&path)).flatten();
        debug!(%path, fetching = ticket.is_some(), "popstate applied");
        if let Some(ticket) = ticket {
            start_project_fetch(ticket);
        }
        notify_navigation_listeners();
    }
