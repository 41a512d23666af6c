use reqchain_core::types::{
    HttpMethod, WorkflowAuth, WorkflowDefinition, WorkflowRequest, WorkflowStep,
};
use reqchain_store::{MemoryStore, StoreError, WorkflowPatch, WorkflowStore};
use uuid::Uuid;

fn definition(name: &str) -> WorkflowDefinition {
    WorkflowDefinition::new(name, "https://api.test").with_step(WorkflowStep::new(
        0,
        "ping",
        WorkflowRequest::new(HttpMethod::Get, "/ping"),
    ))
}

#[tokio::test]
async fn create_assigns_id_and_timestamps() {
    let store = MemoryStore::new();

    let doc = store.create_workflow(definition("first")).await.unwrap();

    assert_eq!(doc.name, "first");
    assert_eq!(doc.created_at, doc.updated_at);
    assert_eq!(doc.steps.len(), 1);
    let fetched = store.get_workflow(doc.id).await.unwrap();
    assert_eq!(fetched, Some(doc));
}

#[tokio::test]
async fn every_create_gets_a_new_id() {
    let store = MemoryStore::new();

    let a = store.create_workflow(definition("same")).await.unwrap();
    let b = store.create_workflow(definition("same")).await.unwrap();

    assert_ne!(a.id, b.id);
    let all = store.get_all_workflows().await.unwrap();
    assert_eq!(all.iter().map(|d| d.id).collect::<Vec<_>>(), vec![a.id, b.id]);
}

#[tokio::test]
async fn update_keeps_identity_and_bumps_updated_at() {
    let store = MemoryStore::new();
    let doc = store.create_workflow(definition("before")).await.unwrap();

    let updated = store
        .update_workflow(
            doc.id,
            WorkflowPatch {
                name: Some("after".into()),
                shared_auth: Some(Some(WorkflowAuth::Bearer { token: "t".into() })),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, doc.id);
    assert_eq!(updated.created_at, doc.created_at);
    assert!(updated.updated_at >= doc.updated_at);
    assert_eq!(updated.name, "after");
    assert_eq!(updated.server_url, "https://api.test");
    assert_eq!(updated.steps, doc.steps);
    assert!(updated.shared_auth.is_some());

    let cleared = store
        .update_workflow(
            doc.id,
            WorkflowPatch {
                shared_auth: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.shared_auth, None);
    assert_eq!(cleared.name, "after");
}

#[tokio::test]
async fn missing_workflows_report_not_found() {
    let store = MemoryStore::new();
    let id = Uuid::new_v4();

    assert_eq!(store.get_workflow(id).await.unwrap(), None);
    assert!(matches!(
        store.update_workflow(id, WorkflowPatch::default()).await,
        Err(StoreError::NotFound(missing)) if missing == id
    ));
    assert!(matches!(
        store.delete_workflow(id).await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn delete_removes_the_workflow() {
    let store = MemoryStore::new();
    let keep = store.create_workflow(definition("keep")).await.unwrap();
    let gone = store.create_workflow(definition("gone")).await.unwrap();

    store.delete_workflow(gone.id).await.unwrap();

    assert_eq!(store.get_workflow(gone.id).await.unwrap(), None);
    assert_eq!(store.len().await, 1);
    assert_eq!(store.get_all_workflows().await.unwrap()[0].id, keep.id);
}

#[test]
fn empty_patch_is_detected() {
    assert!(WorkflowPatch::default().is_empty());
    assert!(!WorkflowPatch {
        steps: Some(Vec::new()),
        ..Default::default()
    }
    .is_empty());
}
