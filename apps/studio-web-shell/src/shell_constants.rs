pub(crate) const NAV_CONFIG_GLOBAL: &str = "__STUDIO_NAV_CONFIG__";
pub(crate) const POPSTATE_EVENT: &str = "popstate";
pub(crate) const CLICK_EVENT: &str = "click";
