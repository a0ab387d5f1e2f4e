use std::sync::Arc;

use super::*;
use crate::test_support::{post, ScriptedTable};

fn archive(table: ScriptedTable) -> BlogArchive {
    BlogArchive::new(ContentGateway::new(Arc::new(table)))
}

#[tokio::test]
async fn unconfigured_service_requires_database_link() {
    let mut blog = BlogArchive::new(ContentGateway::unconfigured());
    assert_eq!(blog.state(), ArchiveView::Loading);
    blog.load(None).await;
    assert_eq!(blog.state(), ArchiveView::LinkRequired);
    assert!(blog.posts().is_empty());
}

#[tokio::test]
async fn fetch_failure_requires_database_link() {
    let mut blog = archive(ScriptedTable::failing_reads("connection refused"));
    blog.load(None).await;
    assert_eq!(blog.state(), ArchiveView::LinkRequired);
    assert!(!blog.is_empty());
}

#[tokio::test]
async fn listing_is_newest_first() {
    let mut blog = archive(ScriptedTable::new(vec![
        post("old", "Old", 48),
        post("new", "New", 1),
        post("mid", "Mid", 10),
    ]));
    blog.load(None).await;
    assert_eq!(blog.state(), ArchiveView::Listing);
    let ids: Vec<_> = blog.posts().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}

#[tokio::test]
async fn empty_archive_is_a_listing() {
    let mut blog = archive(ScriptedTable::new(Vec::new()));
    blog.load(None).await;
    assert_eq!(blog.state(), ArchiveView::Listing);
    assert!(blog.is_empty());
}

#[tokio::test]
async fn deep_link_opens_post_and_renders_paragraphs() {
    let mut blog = archive(ScriptedTable::new(vec![post("a", "A", 2), post("b", "B", 1)]));
    blog.load(Some(&PostId::new("a"))).await;
    assert_eq!(blog.state(), ArchiveView::Reading);
    let selected = blog.selected().expect("selected");
    assert_eq!(selected.id.as_str(), "a");
    let paragraphs: Vec<_> = selected.paragraphs().collect();
    assert_eq!(paragraphs, vec!["<p>A</p>", "second line"]);

    blog.back_to_archive();
    assert_eq!(blog.state(), ArchiveView::Listing);
    assert!(blog.selected().is_none());
    assert_eq!(blog.posts().len(), 2);
}

#[tokio::test]
async fn unknown_deep_link_silently_shows_listing() {
    let mut blog = archive(ScriptedTable::new(vec![post("a", "A", 1)]));
    blog.load(Some(&PostId::new("missing"))).await;
    assert_eq!(blog.state(), ArchiveView::Listing);
    assert!(blog.selected().is_none());
}

#[tokio::test]
async fn select_post_requires_loaded_listing() {
    let mut blog = archive(ScriptedTable::new(vec![post("a", "A", 1)]));
    assert!(!blog.select_post(&PostId::new("a")));

    blog.load(None).await;
    assert!(!blog.select_post(&PostId::new("zzz")));
    assert!(blog.select_post(&PostId::new("a")));
    assert_eq!(blog.state(), ArchiveView::Reading);
}

#[tokio::test]
async fn retry_reuses_last_deep_link() {
    let table = Arc::new(ScriptedTable::new(vec![post("a", "A", 1)]));
    let mut blog = BlogArchive::new(ContentGateway::new(table));
    blog.load(Some(&PostId::new("a"))).await;
    blog.back_to_archive();

    blog.retry().await;
    assert_eq!(blog.state(), ArchiveView::Reading);
    assert_eq!(blog.selected().map(|p| p.id.as_str()), Some("a"));
}
