use shared::{
    domain::{BlogPost, PostId},
    error::GatewayError,
};
use tracing::{debug, info, warn};

use crate::gateway::ContentGateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveView {
    #[default]
    Loading,
    /// "Database link required": the content service is missing or failed.
    LinkRequired,
    Listing,
    Reading,
}

/// Page state of the public blog archive.
pub struct BlogArchive {
    gateway: ContentGateway,
    state: ArchiveView,
    posts: Vec<BlogPost>,
    selected: Option<BlogPost>,
    deep_link: Option<PostId>,
}

impl BlogArchive {
    pub fn new(gateway: ContentGateway) -> Self {
        Self {
            gateway,
            state: ArchiveView::Loading,
            posts: Vec::new(),
            selected: None,
            deep_link: None,
        }
    }

    pub fn state(&self) -> ArchiveView {
        self.state
    }

    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }

    pub fn selected(&self) -> Option<&BlogPost> {
        self.selected.as_ref()
    }

    /// True once a listing loaded with no posts in it.
    pub fn is_empty(&self) -> bool {
        self.state == ArchiveView::Listing && self.posts.is_empty()
    }

    /// Fetches the archive, then opens `deep_link` when given. A deep link
    /// to a post that does not exist falls back to the listing.
    pub async fn load(&mut self, deep_link: Option<&PostId>) {
        self.state = ArchiveView::Loading;
        self.selected = None;
        self.deep_link = deep_link.cloned();

        if !self.gateway.is_configured() {
            debug!("content service not configured; archive needs a database link");
            self.posts.clear();
            self.state = ArchiveView::LinkRequired;
            return;
        }

        match self.gateway.list_posts().await {
            Ok(posts) => self.posts = posts,
            Err(err) => {
                warn!(error = %err, "blog archive fetch failed");
                self.posts.clear();
                self.state = ArchiveView::LinkRequired;
                return;
            }
        }

        let Some(id) = deep_link else {
            self.state = ArchiveView::Listing;
            info!(count = self.posts.len(), "blog archive loaded");
            return;
        };
        match self.gateway.get_post_by_id(id).await {
            Ok(post) => {
                debug!(id = %post.id, "opened deep-linked post");
                self.selected = Some(post);
                self.state = ArchiveView::Reading;
            }
            Err(GatewayError::NotFound(_)) => {
                debug!(id = %id, "deep-linked post not found; showing archive");
                self.state = ArchiveView::Listing;
            }
            Err(err) => {
                warn!(id = %id, error = %err, "deep-linked post fetch failed");
                self.state = ArchiveView::Listing;
            }
        }
    }

    /// Manual "retry sync" from the link-required state.
    pub async fn retry(&mut self) {
        let deep_link = self.deep_link.clone();
        self.load(deep_link.as_ref()).await;
    }

    /// Opens a post from the loaded listing. Returns false when the id is
    /// not among the loaded posts.
    pub fn select_post(&mut self, id: &PostId) -> bool {
        if self.state != ArchiveView::Listing && self.state != ArchiveView::Reading {
            return false;
        }
        match self.posts.iter().find(|post| &post.id == id) {
            Some(post) => {
                self.selected = Some(post.clone());
                self.state = ArchiveView::Reading;
                true
            }
            None => false,
        }
    }

    pub fn back_to_archive(&mut self) {
        if self.state == ArchiveView::Reading {
            self.selected = None;
            self.state = ArchiveView::Listing;
        }
    }
}

#[cfg(test)]
#[path = "tests/blog_tests.rs"]
mod tests;
