use shared::{
    domain::{BlogPost, PostDraft, PostId},
    error::{ErrorCode, GatewayError},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    editor::{ContentEditor, EditorError},
    gateway::ContentGateway,
    in_flight::InFlight,
};

pub const SAVE_FAILED_ALERT: &str = "Error saving transmission.";

/// Client-side passphrase comparison in front of the admin console.
///
/// The secret ships with the client, so this only keeps casual visitors
/// out of the editing UI. It does not protect the content service.
#[derive(Debug, Clone)]
pub struct SoftGate {
    shared_secret: String,
}

impl SoftGate {
    pub fn new(shared_secret: impl Into<String>) -> Self {
        Self {
            shared_secret: shared_secret.into(),
        }
    }

    pub fn admits(&self, submitted: &str) -> bool {
        submitted == self.shared_secret
    }
}

/// One-shot message shown over the console until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("admin console is locked")]
    Locked,
    #[error("no post is being edited")]
    NoDraft,
    #[error("post {0} is not in the loaded list")]
    UnknownPost(PostId),
    #[error("no delete is awaiting confirmation")]
    NothingToConfirm,
    #[error("delete of post {0} is already in progress")]
    DeleteInFlight(PostId),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub struct AdminConsole {
    gateway: ContentGateway,
    gate: SoftGate,
    authenticated: bool,
    passphrase: String,
    login_error: bool,
    unconfigured: bool,
    posts: Vec<BlogPost>,
    draft: Option<PostDraft>,
    editor: Option<ContentEditor>,
    confirming_delete: Option<PostId>,
    deleting: Option<PostId>,
    alert: Option<Alert>,
}

impl AdminConsole {
    pub fn new(gateway: ContentGateway, gate: SoftGate) -> Self {
        let unconfigured = !gateway.is_configured();
        Self {
            gateway,
            gate,
            authenticated: false,
            passphrase: String::new(),
            login_error: false,
            unconfigured,
            posts: Vec::new(),
            draft: None,
            editor: None,
            confirming_delete: None,
            deleting: None,
            alert: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// "Terminal disconnected": persistent until the page is reloaded.
    pub fn is_unconfigured(&self) -> bool {
        self.unconfigured
    }

    pub fn login_error(&self) -> bool {
        self.login_error
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<&PostDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut PostDraft> {
        self.draft.as_mut()
    }

    pub fn editor_mut(&mut self) -> Option<&mut ContentEditor> {
        self.editor.as_mut()
    }

    pub fn confirming_delete(&self) -> Option<&PostId> {
        self.confirming_delete.as_ref()
    }

    pub fn deleting(&self) -> Option<&PostId> {
        self.deleting.as_ref()
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) -> Option<Alert> {
        self.alert.take()
    }

    /// Typing into the passphrase field clears the error indicator.
    pub fn set_passphrase(&mut self, value: impl Into<String>) {
        self.passphrase = value.into();
        self.login_error = false;
    }

    pub async fn submit_passphrase(&mut self) -> bool {
        if !self.gate.admits(&self.passphrase) {
            warn!("admin passphrase rejected");
            self.login_error = true;
            self.passphrase.clear();
            return false;
        }

        info!("admin console unlocked");
        self.authenticated = true;
        self.login_error = false;
        self.refresh().await;
        true
    }

    pub fn sign_out(&mut self) {
        self.authenticated = false;
        self.passphrase.clear();
        self.posts.clear();
        self.draft = None;
        self.editor = None;
        self.confirming_delete = None;
        self.alert = None;
        self.login_error = false;
        info!("admin console locked");
    }

    /// Refetches the full list. A failure with nothing loaded yet is
    /// treated as a missing database link.
    pub async fn refresh(&mut self) {
        if self.unconfigured || !self.authenticated {
            return;
        }
        match self.gateway.list_posts().await {
            Ok(posts) => self.posts = posts,
            Err(err) => {
                warn!(error = %err, "admin post list refresh failed");
                if self.posts.is_empty() {
                    self.unconfigured = true;
                }
            }
        }
    }

    fn ensure_unlocked(&self) -> Result<(), AdminError> {
        if self.authenticated {
            Ok(())
        } else {
            Err(AdminError::Locked)
        }
    }

    pub fn begin_new(&mut self) -> Result<(), AdminError> {
        self.ensure_unlocked()?;
        self.draft = Some(PostDraft::default());
        self.editor = Some(ContentEditor::new(String::new()));
        Ok(())
    }

    pub fn begin_edit(&mut self, id: &PostId) -> Result<(), AdminError> {
        self.ensure_unlocked()?;
        let post = self
            .posts
            .iter()
            .find(|post| &post.id == id)
            .ok_or_else(|| AdminError::UnknownPost(id.clone()))?;
        let draft = PostDraft::from_post(post);
        self.editor = Some(ContentEditor::new(draft.content.clone()));
        self.draft = Some(draft);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.draft = None;
        self.editor = None;
    }

    /// Flushes the editor into the draft, saves it, then closes the form and
    /// refetches the list. Validation failures leave the form open without
    /// calling the service; service failures also raise an alert.
    pub async fn save(&mut self) -> Result<BlogPost, AdminError> {
        self.ensure_unlocked()?;
        let content = self.editor.as_ref().map(|editor| editor.content().to_string());
        let draft = self.draft.as_mut().ok_or(AdminError::NoDraft)?;
        if let Some(content) = content {
            draft.content = content;
        }
        draft.validate()?;

        match self.gateway.save_post(draft).await {
            Ok(saved) => {
                self.cancel_edit();
                self.refresh().await;
                Ok(saved)
            }
            Err(err) => {
                warn!(error = %err, "post save failed");
                self.alert = Some(Alert {
                    code: err.code(),
                    message: SAVE_FAILED_ALERT.to_string(),
                });
                Err(err.into())
            }
        }
    }

    /// First step of the two-step delete.
    pub fn request_delete(&mut self, id: &PostId) -> Result<(), AdminError> {
        self.ensure_unlocked()?;
        if !self.posts.iter().any(|post| &post.id == id) {
            return Err(AdminError::UnknownPost(id.clone()));
        }
        self.confirming_delete = Some(id.clone());
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        if self.deleting.is_none() {
            self.confirming_delete = None;
        }
    }

    /// Marks the confirmed delete as in flight. Further confirmations are
    /// refused until [`AdminConsole::finish_delete`] runs.
    pub fn begin_delete(&mut self) -> Result<PostId, AdminError> {
        self.ensure_unlocked()?;
        if let Some(id) = &self.deleting {
            return Err(AdminError::DeleteInFlight(id.clone()));
        }
        let id = self
            .confirming_delete
            .clone()
            .ok_or(AdminError::NothingToConfirm)?;
        self.deleting = Some(id.clone());
        Ok(id)
    }

    /// Applies the service's answer. The record leaves the local list only
    /// on success; on failure it stays and the confirmation is re-enabled.
    pub fn finish_delete(
        &mut self,
        id: &PostId,
        result: Result<(), GatewayError>,
    ) -> Result<(), AdminError> {
        self.deleting = None;
        match result {
            Ok(()) => {
                self.posts.retain(|post| &post.id != id);
                self.confirming_delete = None;
                info!(id = %id, remaining = self.posts.len(), "post removed from list");
                Ok(())
            }
            Err(err) => {
                warn!(id = %id, error = %err, "post delete failed");
                self.alert = Some(Alert {
                    code: err.code(),
                    message: format!("PURGE FAILED: {err}"),
                });
                Err(err.into())
            }
        }
    }

    pub async fn confirm_delete(&mut self) -> Result<(), AdminError> {
        let id = self.begin_delete()?;
        let result = {
            let _in_flight = InFlight::mark(&mut self.deleting, Some(id.clone()));
            self.gateway.delete_post(&id).await
        };
        self.finish_delete(&id, result)
    }

    pub fn gateway(&self) -> &ContentGateway {
        &self.gateway
    }
}

#[cfg(test)]
#[path = "tests/admin_tests.rs"]
mod tests;
