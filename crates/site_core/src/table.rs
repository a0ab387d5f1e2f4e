use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use shared::{
    domain::{BlogPost, PostId},
    error::GatewayError,
    protocol::PostPayload,
};
use tokio::sync::Mutex;
use uuid::Uuid;

/// The hosted `blogs` table as a plain CRUD collaborator.
#[async_trait]
pub trait PostTable: Send + Sync {
    /// Every row, newest `created_at` first.
    async fn select_all(&self) -> Result<Vec<BlogPost>, GatewayError>;
    async fn select_by_id(&self, id: &PostId) -> Result<Option<BlogPost>, GatewayError>;
    async fn insert(&self, payload: &PostPayload) -> Result<BlogPost, GatewayError>;
    async fn update(&self, id: &PostId, payload: &PostPayload) -> Result<BlogPost, GatewayError>;
    async fn delete(&self, id: &PostId) -> Result<(), GatewayError>;

    fn is_configured(&self) -> bool {
        true
    }
}

/// Stand-in used when no service URL/key is configured.
pub struct MissingPostTable;

const NOT_CONFIGURED: &str = "content service URL and API key are not configured";

#[async_trait]
impl PostTable for MissingPostTable {
    async fn select_all(&self) -> Result<Vec<BlogPost>, GatewayError> {
        Err(GatewayError::unavailable(NOT_CONFIGURED))
    }

    async fn select_by_id(&self, _id: &PostId) -> Result<Option<BlogPost>, GatewayError> {
        Err(GatewayError::unavailable(NOT_CONFIGURED))
    }

    async fn insert(&self, _payload: &PostPayload) -> Result<BlogPost, GatewayError> {
        Err(GatewayError::unavailable(NOT_CONFIGURED))
    }

    async fn update(&self, _id: &PostId, _payload: &PostPayload) -> Result<BlogPost, GatewayError> {
        Err(GatewayError::unavailable(NOT_CONFIGURED))
    }

    async fn delete(&self, _id: &PostId) -> Result<(), GatewayError> {
        Err(GatewayError::unavailable(NOT_CONFIGURED))
    }

    fn is_configured(&self) -> bool {
        false
    }
}

#[derive(Default)]
struct MemoryRows {
    rows: Vec<BlogPost>,
    last_created_at: Option<DateTime<Utc>>,
}

impl MemoryRows {
    /// Strictly increasing timestamps so ordering stays total.
    fn next_created_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let created_at = match self.last_created_at {
            Some(last) if last >= now => last + Duration::milliseconds(1),
            _ => now,
        };
        self.last_created_at = Some(created_at);
        created_at
    }
}

/// In-process table with service-assigned ids and timestamps.
#[derive(Default)]
pub struct MemoryPostTable {
    inner: Mutex<MemoryRows>,
}

impl MemoryPostTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(posts: Vec<BlogPost>) -> Self {
        let last_created_at = posts.iter().map(|post| post.created_at).max();
        Self {
            inner: Mutex::new(MemoryRows {
                rows: posts,
                last_created_at,
            }),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.rows.is_empty()
    }
}

fn apply_payload(post: &mut BlogPost, payload: &PostPayload) {
    post.title = payload.title.clone();
    post.slug = payload.slug.clone();
    post.content = payload.content.clone();
    post.excerpt = payload.excerpt.clone();
    post.image_url = payload.image_url.clone();
    post.category = payload.category.clone();
    post.read_time = payload.read_time.clone();
}

#[async_trait]
impl PostTable for MemoryPostTable {
    async fn select_all(&self) -> Result<Vec<BlogPost>, GatewayError> {
        let mut rows = self.inner.lock().await.rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn select_by_id(&self, id: &PostId) -> Result<Option<BlogPost>, GatewayError> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.iter().find(|post| &post.id == id).cloned())
    }

    async fn insert(&self, payload: &PostPayload) -> Result<BlogPost, GatewayError> {
        let mut inner = self.inner.lock().await;
        let mut post = BlogPost {
            id: PostId(Uuid::new_v4().to_string()),
            title: String::new(),
            slug: String::new(),
            content: String::new(),
            excerpt: String::new(),
            image_url: String::new(),
            category: String::new(),
            read_time: String::new(),
            created_at: inner.next_created_at(),
        };
        apply_payload(&mut post, payload);
        inner.rows.push(post.clone());
        Ok(post)
    }

    async fn update(&self, id: &PostId, payload: &PostPayload) -> Result<BlogPost, GatewayError> {
        let mut inner = self.inner.lock().await;
        let post = inner
            .rows
            .iter_mut()
            .find(|post| &post.id == id)
            .ok_or_else(|| GatewayError::NotFound(id.clone()))?;
        apply_payload(post, payload);
        Ok(post.clone())
    }

    async fn delete(&self, id: &PostId) -> Result<(), GatewayError> {
        self.inner.lock().await.rows.retain(|post| &post.id != id);
        Ok(())
    }
}
