use super::*;
use crate::{table::MemoryPostTable, test_support::{post, ScriptedTable}};

fn draft(title: &str, content: &str) -> PostDraft {
    PostDraft {
        title: title.into(),
        content: content.into(),
        excerpt: "short".into(),
        image_url: "https://images.example/cover.jpg".into(),
        category: "Strategy".into(),
        read_time: "4 min read".into(),
        ..PostDraft::default()
    }
}

#[tokio::test]
async fn list_posts_is_newest_first() {
    let gateway = ContentGateway::new(Arc::new(MemoryPostTable::with_posts(vec![
        post("old", "Old", 48),
        post("new", "New", 1),
        post("mid", "Mid", 12),
    ])));

    let ids: Vec<_> = gateway
        .list_posts()
        .await
        .expect("list")
        .into_iter()
        .map(|p| p.id.0)
        .collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}

#[tokio::test]
async fn unconfigured_gateway_reports_service_unavailable() {
    let gateway = ContentGateway::unconfigured();
    assert!(!gateway.is_configured());

    let err = gateway.list_posts().await.expect_err("must fail");
    assert!(matches!(err, GatewayError::ServiceUnavailable(_)));

    let gateway = ContentGateway::from_settings(&SiteSettings::default());
    assert!(!gateway.is_configured());
}

#[tokio::test]
async fn configured_settings_build_a_hosted_gateway() {
    let settings = SiteSettings {
        content_url: "https://abc.supabase.co".into(),
        content_api_key: "anon".into(),
        ..SiteSettings::default()
    };
    assert!(ContentGateway::from_settings(&settings).is_configured());
}

#[tokio::test]
async fn saving_a_new_draft_inserts_exactly_one_record() {
    let gateway = ContentGateway::new(Arc::new(MemoryPostTable::with_posts(vec![post(
        "existing", "Existing", 5,
    )])));
    let draft = draft("Hello, World!", "<p>first</p>");

    let saved = gateway.save_post(&draft).await.expect("save");
    assert!(!saved.id.is_blank());
    assert_eq!(saved.slug, "hello-world");

    let posts = gateway.list_posts().await.expect("list");
    assert_eq!(posts.len(), 2);
    let created: Vec<_> = posts.iter().filter(|p| p.id != PostId::new("existing")).collect();
    assert_eq!(created.len(), 1);
    let created = created[0];
    assert_eq!(created.title, draft.title);
    assert_eq!(created.content, draft.content);
    assert_eq!(created.excerpt, draft.excerpt);
    assert_eq!(created.image_url, draft.image_url);
    assert_eq!(created.category, draft.category);
    assert_eq!(created.read_time, draft.read_time);
    assert_eq!(posts[0].id, saved.id);
}

#[tokio::test]
async fn saving_an_existing_draft_updates_and_recomputes_slug() {
    let original = post("p1", "Original Title", 3);
    let gateway = ContentGateway::new(Arc::new(MemoryPostTable::with_posts(vec![original.clone()])));

    let mut edit = PostDraft::from_post(&original);
    edit.title = "Renamed: Lean Ops".into();
    let saved = gateway.save_post(&edit).await.expect("update");

    assert_eq!(saved.id, original.id);
    assert_eq!(saved.created_at, original.created_at);
    assert_eq!(saved.slug, "renamed-lean-ops");
    assert_eq!(gateway.list_posts().await.expect("list").len(), 1);
}

#[tokio::test]
async fn validation_blocks_the_call_before_the_table() {
    let table = Arc::new(ScriptedTable::new(Vec::new()));
    let gateway = ContentGateway::new(table.clone());

    let err = gateway
        .save_post(&draft("", "<p>body</p>"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, GatewayError::Validation { field: "title" }));

    let err = gateway
        .save_post(&draft("Title", ""))
        .await
        .expect_err("must fail");
    assert!(matches!(err, GatewayError::Validation { field: "content" }));
    assert_eq!(table.writes(), 0);
}

#[tokio::test]
async fn write_failures_surface_as_service_errors() {
    let table = Arc::new(ScriptedTable::new(vec![post("p1", "One", 1)]));
    table.fail_writes(Some("row level security"));
    let gateway = ContentGateway::new(table.clone());

    let err = gateway
        .delete_post(&PostId::new("p1"))
        .await
        .expect_err("must fail");
    assert_eq!(err.to_string(), "delete post failed: row level security");
    assert_eq!(gateway.list_posts().await.expect("list").len(), 1);
}

#[tokio::test]
async fn deleted_post_is_gone_from_next_listing() {
    let gateway = ContentGateway::new(Arc::new(MemoryPostTable::with_posts(vec![
        post("a", "A", 1),
        post("b", "B", 2),
    ])));

    gateway.delete_post(&PostId::new("a")).await.expect("delete");
    let ids: Vec<_> = gateway
        .list_posts()
        .await
        .expect("list")
        .into_iter()
        .map(|p| p.id.0)
        .collect();
    assert_eq!(ids, vec!["b"]);
}

#[tokio::test]
async fn get_post_by_id_distinguishes_missing_records() {
    let gateway = ContentGateway::new(Arc::new(MemoryPostTable::with_posts(vec![post(
        "a", "A", 1,
    )])));

    assert_eq!(
        gateway.get_post_by_id(&PostId::new("a")).await.expect("get").title,
        "A"
    );
    assert!(matches!(
        gateway.get_post_by_id(&PostId::new("zzz")).await,
        Err(GatewayError::NotFound(_))
    ));
    assert!(matches!(
        gateway.get_post_by_id(&PostId::new("")).await,
        Err(GatewayError::NotFound(_))
    ));
}
