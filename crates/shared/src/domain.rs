use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::GatewayError;

/// Opaque post identifier assigned by the content service.
///
/// The hosted table may use either text (uuid) or integer primary keys, so
/// both JSON shapes are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PostId(pub String);

impl PostId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// First eight characters, as shown on admin cards.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => PostId(text),
            RawId::Number(number) => PostId(number.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewState {
    #[default]
    Home,
    About,
    Speaking,
    SupplyChain,
    Podcast,
    Blog,
    Admin,
    Contact,
    Privacy,
    Terms,
    NotFound,
}

impl ViewState {
    pub const ALL: [ViewState; 11] = [
        ViewState::Home,
        ViewState::About,
        ViewState::Speaking,
        ViewState::SupplyChain,
        ViewState::Podcast,
        ViewState::Blog,
        ViewState::Admin,
        ViewState::Contact,
        ViewState::Privacy,
        ViewState::Terms,
        ViewState::NotFound,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ViewState::Home => "home",
            ViewState::About => "about",
            ViewState::Speaking => "speaking",
            ViewState::SupplyChain => "supply-chain",
            ViewState::Podcast => "podcast",
            ViewState::Blog => "blog",
            ViewState::Admin => "admin",
            ViewState::Contact => "contact",
            ViewState::Privacy => "privacy",
            ViewState::Terms => "terms",
            ViewState::NotFound => "not-found",
        }
    }

    /// Path the navigation bar links to for this view. `NotFound` has none.
    pub fn canonical_path(self) -> Option<&'static str> {
        match self {
            ViewState::Home => Some("/"),
            ViewState::About => Some("/about"),
            ViewState::Speaking => Some("/speaking"),
            ViewState::SupplyChain => Some("/supply-chain"),
            ViewState::Podcast => Some("/podcast"),
            ViewState::Blog => Some("/blog"),
            ViewState::Admin => Some("/admin"),
            ViewState::Contact => Some("/contact"),
            ViewState::Privacy => Some("/privacy"),
            ViewState::Terms => Some("/terms"),
            ViewState::NotFound => None,
        }
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: PostId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub excerpt: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub read_time: String,
    pub created_at: DateTime<Utc>,
}

impl BlogPost {
    /// Content split into display paragraphs, one per source line.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }
}

/// Lowercases, turns spaces into hyphens and drops anything outside
/// `[A-Za-z0-9_-]`.
pub fn derive_slug(title: &str) -> String {
    title
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Author-editable state of a post held by the admin form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub id: Option<PostId>,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub image_url: String,
    pub category: String,
    pub read_time: String,
}

impl PostDraft {
    pub fn from_post(post: &BlogPost) -> Self {
        Self {
            id: Some(post.id.clone()),
            title: post.title.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone(),
            image_url: post.image_url.clone(),
            category: post.category.clone(),
            read_time: post.read_time.clone(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.as_ref().map_or(true, PostId::is_blank)
    }

    /// Id of the record this draft updates, if any.
    pub fn target_id(&self) -> Option<&PostId> {
        self.id.as_ref().filter(|id| !id.is_blank())
    }

    pub fn slug(&self) -> String {
        derive_slug(&self.title)
    }

    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.title.trim().is_empty() {
            return Err(GatewayError::Validation { field: "title" });
        }
        if self.content.trim().is_empty() {
            return Err(GatewayError::Validation { field: "content" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_strips_punctuation_and_hyphenates_spaces() {
        assert_eq!(derive_slug("Hello, World!"), "hello-world");
        assert_eq!(derive_slug("Hello, World!"), derive_slug("Hello, World!"));
        assert_eq!(derive_slug("Supply  Chain_2024"), "supply--chain_2024");
        assert_eq!(derive_slug("Café Résumé"), "caf-rsum");
    }

    #[test]
    fn post_id_accepts_text_and_integer_keys() {
        let text: PostId = serde_json::from_str("\"3f2a9c1e-77aa\"").expect("text id");
        let number: PostId = serde_json::from_str("42").expect("numeric id");
        assert_eq!(text.as_str(), "3f2a9c1e-77aa");
        assert_eq!(number.as_str(), "42");
        assert_eq!(text.short(), "3f2a9c1e");
        assert_eq!(number.short(), "42");
    }

    #[test]
    fn blog_post_tolerates_null_columns() {
        let post: BlogPost = serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "Lead time",
            "slug": "lead-time",
            "content": "one\ntwo",
            "excerpt": null,
            "image_url": null,
            "category": "Ops",
            "read_time": null,
            "created_at": "2024-05-01T10:00:00Z"
        }))
        .expect("row");
        assert_eq!(post.excerpt, "");
        assert_eq!(post.category, "Ops");
        assert_eq!(post.paragraphs().collect::<Vec<_>>(), vec!["one", "two"]);
    }

    #[test]
    fn draft_without_id_is_new() {
        let mut draft = PostDraft::default();
        assert!(draft.is_new());
        draft.id = Some(PostId::new("  "));
        assert!(draft.is_new());
        assert!(draft.target_id().is_none());
        draft.id = Some(PostId::new("abc"));
        assert!(!draft.is_new());
    }

    #[test]
    fn draft_validation_names_first_empty_field() {
        let mut draft = PostDraft {
            content: "<p>body</p>".into(),
            ..PostDraft::default()
        };
        assert!(matches!(
            draft.validate(),
            Err(GatewayError::Validation { field: "title" })
        ));
        draft.title = "Title".into();
        draft.content = "   ".into();
        assert!(matches!(
            draft.validate(),
            Err(GatewayError::Validation { field: "content" })
        ));
        draft.content = "<p>body</p>".into();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn every_routable_view_has_a_distinct_path() {
        let mut paths: Vec<_> = ViewState::ALL
            .iter()
            .filter_map(|view| view.canonical_path())
            .collect();
        assert_eq!(paths.len(), 10);
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 10);
        assert_eq!(ViewState::SupplyChain.to_string(), "supply-chain");
    }
}
