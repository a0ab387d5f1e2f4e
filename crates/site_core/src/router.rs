use shared::domain::{PostId, ViewState};
use tracing::{debug, info};
use url::{form_urlencoded, Url};

use crate::{history::BrowserHistory, scroll::ScrollHandle};

/// Base used to parse relative addresses; only path and query are read.
const ADDRESS_BASE: &str = "http://site.invalid/";

const ROUTES: &[(&str, ViewState)] = &[
    ("/", ViewState::Home),
    ("/about", ViewState::About),
    ("/speaking", ViewState::Speaking),
    ("/supply-chain", ViewState::SupplyChain),
    ("/podcast", ViewState::Podcast),
    ("/zero-to-n", ViewState::Podcast),
    ("/blog", ViewState::Blog),
    ("/admin", ViewState::Admin),
    ("/contact", ViewState::Contact),
    ("/privacy", ViewState::Privacy),
    ("/terms", ViewState::Terms),
];

fn parse_address(address: &str) -> Option<Url> {
    let base = Url::parse(ADDRESS_BASE).ok()?;
    base.join(address.trim()).ok()
}

fn route_matches(route: &str, path: &str) -> bool {
    if route == "/" {
        return path == "/";
    }
    match path.strip_prefix(route) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Maps an address to its view. Query string and fragment are ignored,
/// nested segments fall under their first-level route, and anything
/// unrecognized is `NotFound`.
pub fn resolve_view_from_path(address: &str) -> ViewState {
    let Some(url) = parse_address(address) else {
        return ViewState::NotFound;
    };
    let path = url.path();
    ROUTES
        .iter()
        .find(|(route, _)| route_matches(route, path))
        .map(|(_, view)| *view)
        .unwrap_or(ViewState::NotFound)
}

/// Blog address that deep-links `id`, with the id query-encoded.
pub fn blog_post_address(id: &PostId) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("id", id.as_str())
        .finish();
    format!("/blog?{query}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorScroll {
    /// Target view was already mounted; carries whether the anchor exists.
    Scrolled(bool),
    /// Waiting for the target view to report that it mounted.
    Deferred,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingAnchor {
    view: ViewState,
    anchor: String,
}

pub struct ViewRouter<H: BrowserHistory> {
    history: H,
    scroll: ScrollHandle,
    current_view: ViewState,
    pending_anchor: Option<PendingAnchor>,
}

impl<H: BrowserHistory> ViewRouter<H> {
    pub fn new(history: H, scroll: ScrollHandle) -> Self {
        let current_view = resolve_view_from_path(&history.location());
        debug!(view = %current_view, "router initialized");
        Self {
            history,
            scroll,
            current_view,
            pending_anchor: None,
        }
    }

    pub fn current_view(&self) -> ViewState {
        self.current_view
    }

    pub fn location(&self) -> String {
        self.history.location()
    }

    /// Canonical path of the current view, for active-link highlighting.
    pub fn current_path(&self) -> Option<&'static str> {
        self.current_view.canonical_path()
    }

    pub fn is_active(&self, href: &str) -> bool {
        self.current_path() == Some(href)
    }

    pub fn query_param(&self, name: &str) -> Option<String> {
        let url = parse_address(&self.history.location())?;
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Mutable access for driving back/forward; call
    /// [`ViewRouter::history_navigated`] afterwards.
    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    pub fn scroll_mut(&mut self) -> &mut ScrollHandle {
        &mut self.scroll
    }

    pub fn navigate(&mut self, address: &str) -> ViewState {
        let view = resolve_view_from_path(address);
        self.current_view = view;
        self.pending_anchor = None;
        self.history.push(address);
        self.scroll.reset_to_top();
        info!(address, view = %view, "navigated");
        view
    }

    /// Re-reads the address after a browser back/forward signal.
    pub fn history_navigated(&mut self) -> ViewState {
        let location = self.history.location();
        let view = resolve_view_from_path(&location);
        self.current_view = view;
        self.pending_anchor = None;
        debug!(location = %location, view = %view, "history navigated");
        view
    }

    /// Scrolls to an anchor on the home page, navigating there first when
    /// another view is active. In that case the scroll waits for
    /// [`ViewRouter::view_mounted`] with the home view.
    pub fn navigate_to_anchor(&mut self, anchor: &str) -> AnchorScroll {
        let anchor = anchor.trim_start_matches('#');
        if self.current_view == ViewState::Home {
            return AnchorScroll::Scrolled(self.scroll.scroll_to_anchor(anchor));
        }

        self.navigate("/");
        self.pending_anchor = Some(PendingAnchor {
            view: ViewState::Home,
            anchor: anchor.to_string(),
        });
        debug!(anchor, "anchor scroll deferred until home mounts");
        AnchorScroll::Deferred
    }

    pub fn has_pending_anchor(&self) -> bool {
        self.pending_anchor.is_some()
    }

    /// Mount signal from the page layer. Releases a pending anchor scroll
    /// when the mounted view is the one it targets; stale signals for
    /// views that are no longer current are ignored.
    pub fn view_mounted(&mut self, view: ViewState) -> Option<bool> {
        if view != self.current_view {
            debug!(view = %view, current = %self.current_view, "ignoring stale mount signal");
            return None;
        }
        if !matches!(&self.pending_anchor, Some(pending) if pending.view == view) {
            return None;
        }
        let pending = self.pending_anchor.take()?;
        let found = self.scroll.scroll_to_anchor(&pending.anchor);
        debug!(anchor = %pending.anchor, found, "released pending anchor scroll");
        Some(found)
    }
}

#[cfg(test)]
#[path = "tests/router_tests.rs"]
mod tests;
