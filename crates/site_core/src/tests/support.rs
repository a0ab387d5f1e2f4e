//! Fixtures shared by the unit test modules.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use shared::{
    domain::{BlogPost, PostId},
    error::{GatewayError, Operation},
    protocol::PostPayload,
};

use crate::table::{MemoryPostTable, PostTable};

/// Post created `age_hours` before a fixed reference time.
pub(crate) fn post(id: &str, title: &str, age_hours: i64) -> BlogPost {
    let reference = Utc
        .with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
        .single()
        .expect("reference time");
    BlogPost {
        id: PostId::new(id),
        title: title.to_string(),
        slug: shared::domain::derive_slug(title),
        content: format!("<p>{title}</p>\nsecond line"),
        excerpt: format!("About {title}"),
        image_url: format!("https://images.example/{id}.jpg"),
        category: "Operations".into(),
        read_time: "5 min read".into(),
        created_at: reference - Duration::hours(age_hours),
    }
}

/// Memory table whose reads or writes can be made to fail.
pub(crate) struct ScriptedTable {
    pub inner: MemoryPostTable,
    read_failure: Option<String>,
    write_failure: Mutex<Option<String>>,
    pub write_calls: AtomicUsize,
    stalled: AtomicBool,
}

impl ScriptedTable {
    pub fn new(posts: Vec<BlogPost>) -> Self {
        Self {
            inner: MemoryPostTable::with_posts(posts),
            read_failure: None,
            write_failure: Mutex::new(None),
            write_calls: AtomicUsize::new(0),
            stalled: AtomicBool::new(false),
        }
    }

    pub fn failing_reads(message: &str) -> Self {
        let mut table = Self::new(Vec::new());
        table.read_failure = Some(message.to_string());
        table
    }

    pub fn fail_writes(&self, message: Option<&str>) {
        *self.write_failure.lock().expect("write failure") = message.map(str::to_string);
    }

    /// Deletes never answer while stalled.
    pub fn stall_writes(&self, stalled: bool) {
        self.stalled.store(stalled, Ordering::SeqCst);
    }

    pub fn writes(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    fn check_read(&self) -> Result<(), GatewayError> {
        match &self.read_failure {
            Some(message) => Err(GatewayError::unavailable(message.clone())),
            None => Ok(()),
        }
    }

    fn check_write(&self, operation: Operation) -> Result<(), GatewayError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        match self.write_failure.lock().expect("write failure").as_ref() {
            Some(message) => Err(GatewayError::service(operation, message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PostTable for ScriptedTable {
    async fn select_all(&self) -> Result<Vec<BlogPost>, GatewayError> {
        self.check_read()?;
        self.inner.select_all().await
    }

    async fn select_by_id(&self, id: &PostId) -> Result<Option<BlogPost>, GatewayError> {
        self.check_read()?;
        self.inner.select_by_id(id).await
    }

    async fn insert(&self, payload: &PostPayload) -> Result<BlogPost, GatewayError> {
        self.check_write(Operation::InsertPost)?;
        self.inner.insert(payload).await
    }

    async fn update(&self, id: &PostId, payload: &PostPayload) -> Result<BlogPost, GatewayError> {
        self.check_write(Operation::UpdatePost)?;
        self.inner.update(id, payload).await
    }

    async fn delete(&self, id: &PostId) -> Result<(), GatewayError> {
        self.check_write(Operation::DeletePost)?;
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.inner.delete(id).await
    }
}
