//! Drafts carry the edited post's revision across invocations

mod common;

use chrono::Utc;

use common::{TestEnv, authorized, day, new_post};
use quire::draft::{Draft, DraftStore};
use quire::error::ErrorKind;
use quire::publish::{PublishWorkflow, open_for_edit};
use quire::remote::memory::MemoryStore;

#[tokio::test]
async fn test_draft_of_edited_post_updates_it() {
    let env = TestEnv::new();
    let auth = authorized(&env.tokens()).await;
    let store = MemoryStore::default();
    let drafts = DraftStore::new(&env.state);

    PublishWorkflow::new(new_post("Saved", "v1"))
        .submit(&store, &auth, day(), None)
        .await
        .unwrap();

    let form = open_for_edit(&store, "2024-01-15-saved.md").await.unwrap();
    drafts.save(&Draft::from_form(&form, Utc::now())).unwrap();

    let mut form = drafts.load().unwrap().expect("draft saved").into_form();
    assert!(form.is_update());
    form.body = "v2".to_string();

    let published = PublishWorkflow::new(form)
        .submit(&store, &auth, day(), None)
        .await
        .unwrap();
    assert!(!published.created);
    assert_eq!(store.file_count().await, 1);
}

#[tokio::test]
async fn test_draft_goes_stale_after_remote_change() {
    let env = TestEnv::new();
    let auth = authorized(&env.tokens()).await;
    let store = MemoryStore::default();
    let drafts = DraftStore::new(&env.state);
    store.seed("post.md", "---\ntitle: \"Post\"\n---\n\nv1").await;

    let form = open_for_edit(&store, "post.md").await.unwrap();
    drafts.save(&Draft::from_form(&form, Utc::now())).unwrap();

    let mut other = open_for_edit(&store, "post.md").await.unwrap();
    other.body = "changed elsewhere".to_string();
    PublishWorkflow::new(other)
        .submit(&store, &auth, day(), None)
        .await
        .unwrap();

    let form = drafts.load().unwrap().expect("draft saved").into_form();
    let err = PublishWorkflow::new(form)
        .submit(&store, &auth, day(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn test_new_post_draft_has_no_revision() {
    let env = TestEnv::new();
    let drafts = DraftStore::new(&env.state);
    drafts
        .save(&Draft::from_form(&new_post("Fresh", "text"), Utc::now()))
        .unwrap();

    let raw = std::fs::read_to_string(drafts.path()).unwrap();
    assert!(!raw.contains("revision"));

    let draft = drafts.load().unwrap().expect("draft saved");
    assert_eq!(draft.filename, "2024-01-15-fresh.md");
    assert!(!draft.is_update());
}
