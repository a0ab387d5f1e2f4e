//! Headless core of the marketing site: routing, blog content access, and
//! the admin, blog and contact page state.

pub mod admin;
pub mod blog;
pub mod config;
pub mod contact;
pub mod editor;
pub mod gateway;
pub mod history;
pub mod hosted;
mod in_flight;
pub mod router;
pub mod scroll;
pub mod shell;
pub mod table;

pub use admin::{AdminConsole, AdminError, SoftGate};
pub use blog::{ArchiveView, BlogArchive};
pub use config::{load_settings, load_settings_from, SiteSettings};
pub use contact::{ContactError, ContactForm, ContactRelay, SubmitStatus};
pub use gateway::ContentGateway;
pub use history::{BrowserHistory, MemoryHistory};
pub use router::{blog_post_address, resolve_view_from_path, AnchorScroll, ViewRouter};
pub use scroll::{ScrollHandle, ScrollSurface};
pub use shell::SiteShell;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
