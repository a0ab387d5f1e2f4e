use std::sync::Arc;

use shared::{
    domain::{BlogPost, PostDraft, PostId},
    error::GatewayError,
    protocol::PostPayload,
};
use tracing::{info, warn};

use crate::{
    config::SiteSettings,
    hosted::HostedPostTable,
    table::{MissingPostTable, PostTable},
};

/// Blog post access for the Blog and Admin pages.
///
/// Validation and slug derivation happen here so every table
/// implementation receives the same payloads.
#[derive(Clone)]
pub struct ContentGateway {
    table: Arc<dyn PostTable>,
}

impl ContentGateway {
    pub fn new(table: Arc<dyn PostTable>) -> Self {
        Self { table }
    }

    pub fn unconfigured() -> Self {
        Self::new(Arc::new(MissingPostTable))
    }

    pub fn from_settings(settings: &SiteSettings) -> Self {
        if !settings.content_configured() {
            warn!("content service not configured; blog archive disabled");
            return Self::unconfigured();
        }
        match HostedPostTable::new(&settings.content_url, settings.content_api_key.trim()) {
            Ok(table) => Self::new(Arc::new(table)),
            Err(err) => {
                warn!(error = %err, "content service settings rejected; blog archive disabled");
                Self::unconfigured()
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.table.is_configured()
    }

    /// Newest first.
    pub async fn list_posts(&self) -> Result<Vec<BlogPost>, GatewayError> {
        let mut posts = self.table.select_all().await?;
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    pub async fn get_post_by_id(&self, id: &PostId) -> Result<BlogPost, GatewayError> {
        if id.is_blank() {
            return Err(GatewayError::NotFound(id.clone()));
        }
        self.table
            .select_by_id(id)
            .await?
            .ok_or_else(|| GatewayError::NotFound(id.clone()))
    }

    /// Inserts a new draft or updates the record it was opened from. The
    /// slug is always recomputed from the current title.
    pub async fn save_post(&self, draft: &PostDraft) -> Result<BlogPost, GatewayError> {
        draft.validate()?;
        let payload = PostPayload::from(draft);

        let saved = match draft.target_id() {
            None => self.table.insert(&payload).await?,
            Some(id) => self.table.update(id, &payload).await?,
        };
        info!(
            id = %saved.id,
            slug = %saved.slug,
            created = draft.is_new(),
            "saved post"
        );
        Ok(saved)
    }

    /// Permanent; callers confirm with the operator first.
    pub async fn delete_post(&self, id: &PostId) -> Result<(), GatewayError> {
        info!(id = %id, "deleting post");
        self.table.delete(id).await?;
        info!(id = %id, "post deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
