use serde::{Deserialize, Serialize};

use crate::domain::PostDraft;

/// Body of insert and update requests against the posts table.
///
/// `id` and `created_at` belong to the service and are never sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPayload {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub image_url: String,
    pub category: String,
    pub read_time: String,
}

impl From<&PostDraft> for PostPayload {
    fn from(draft: &PostDraft) -> Self {
        Self {
            title: draft.title.clone(),
            slug: draft.slug(),
            content: draft.content.clone(),
            excerpt: draft.excerpt.clone(),
            image_url: draft.image_url.clone(),
            category: draft.category.clone(),
            read_time: draft.read_time.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostId;

    #[test]
    fn payload_recomputes_slug_and_omits_server_columns() {
        let draft = PostDraft {
            id: Some(PostId::new("abc")),
            title: "Hello, World!".into(),
            content: "<p>x</p>".into(),
            ..PostDraft::default()
        };
        let value = serde_json::to_value(PostPayload::from(&draft)).expect("json");
        assert_eq!(value["slug"], "hello-world");
        assert!(value.get("id").is_none());
        assert!(value.get("created_at").is_none());
    }
}
