use shared::domain::{PostId, ViewState};
use tracing::debug;

use crate::{
    admin::{AdminConsole, SoftGate},
    blog::BlogArchive,
    config::SiteSettings,
    contact::{ContactError, ContactForm, ContactRelay},
    gateway::ContentGateway,
    history::BrowserHistory,
    router::{AnchorScroll, ViewRouter},
};

/// Top-level page host: routes addresses to views and mounts the page
/// state each view needs.
///
/// Page state follows component lifetimes: the admin console and contact
/// form are rebuilt when their view is entered from another one and kept
/// across navigations that stay on it. The blog archive reloads on every
/// navigation so deep links apply.
pub struct SiteShell<H: BrowserHistory> {
    router: ViewRouter<H>,
    gateway: ContentGateway,
    relay: ContactRelay,
    gate: SoftGate,
    blog: BlogArchive,
    admin: Option<AdminConsole>,
    contact: Option<ContactForm>,
}

impl<H: BrowserHistory> SiteShell<H> {
    pub fn new(router: ViewRouter<H>, settings: &SiteSettings) -> Self {
        Self::from_parts(
            router,
            ContentGateway::from_settings(settings),
            ContactRelay::from_settings(settings),
            SoftGate::new(settings.admin_passphrase.clone()),
        )
    }

    pub fn from_parts(
        router: ViewRouter<H>,
        gateway: ContentGateway,
        relay: ContactRelay,
        gate: SoftGate,
    ) -> Self {
        Self {
            blog: BlogArchive::new(gateway.clone()),
            router,
            gateway,
            relay,
            gate,
            admin: None,
            contact: None,
        }
    }

    /// Mounts whatever view the initial address resolves to.
    pub async fn start(&mut self) -> ViewState {
        self.mount().await;
        self.router.current_view()
    }

    pub async fn navigate(&mut self, address: &str) -> ViewState {
        let view = self.router.navigate(address);
        self.mount().await;
        view
    }

    pub async fn history_navigated(&mut self) -> ViewState {
        let view = self.router.history_navigated();
        self.mount().await;
        view
    }

    /// A deferred anchor scroll is released by the mount that follows the
    /// navigation, so callers see its outcome directly.
    pub async fn navigate_to_anchor(&mut self, anchor: &str) -> AnchorScroll {
        match self.router.navigate_to_anchor(anchor) {
            AnchorScroll::Deferred => match self.mount().await {
                Some(found) => AnchorScroll::Scrolled(found),
                None => AnchorScroll::Deferred,
            },
            scrolled => scrolled,
        }
    }

    async fn mount(&mut self) -> Option<bool> {
        let view = self.router.current_view();
        // Admin and contact state live while their view stays current.
        if view != ViewState::Admin {
            self.admin = None;
        }
        if view != ViewState::Contact {
            self.contact = None;
        }
        match view {
            ViewState::Blog => {
                let deep_link = self.router.query_param("id").map(PostId::new);
                self.blog.load(deep_link.as_ref()).await;
            }
            ViewState::Admin => {
                if self.admin.is_none() {
                    self.admin = Some(AdminConsole::new(self.gateway.clone(), self.gate.clone()));
                }
            }
            ViewState::Contact => {
                self.contact.get_or_insert_with(ContactForm::new);
            }
            _ => {}
        }
        debug!(view = %view, "view mounted");
        self.router.view_mounted(view)
    }

    pub fn current_view(&self) -> ViewState {
        self.router.current_view()
    }

    pub fn router(&self) -> &ViewRouter<H> {
        &self.router
    }

    /// For back/forward: move the history, then call
    /// [`SiteShell::history_navigated`].
    pub fn router_mut(&mut self) -> &mut ViewRouter<H> {
        &mut self.router
    }

    pub fn gateway(&self) -> &ContentGateway {
        &self.gateway
    }

    pub fn blog(&self) -> &BlogArchive {
        &self.blog
    }

    pub fn blog_mut(&mut self) -> &mut BlogArchive {
        &mut self.blog
    }

    /// Present only while the admin view is mounted.
    pub fn admin(&self) -> Option<&AdminConsole> {
        self.admin.as_ref()
    }

    pub fn admin_mut(&mut self) -> Option<&mut AdminConsole> {
        self.admin.as_mut()
    }

    /// Present only while the contact view is mounted.
    pub fn contact(&self) -> Option<&ContactForm> {
        self.contact.as_ref()
    }

    pub fn contact_mut(&mut self) -> Option<&mut ContactForm> {
        self.contact.as_mut()
    }

    /// Submits the mounted contact form through the configured relay.
    /// Returns `None` when the contact view is not mounted.
    pub async fn submit_contact(&mut self) -> Option<Result<(), ContactError>> {
        let form = self.contact.as_mut()?;
        Some(form.submit(&self.relay).await)
    }
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
