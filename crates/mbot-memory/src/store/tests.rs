use super::Store;
use mbot_core::config::MemoryConfig;
use mbot_core::state::{CheckIn, ConversationState};
use mbot_core::traits::StateStore;

fn sample_state() -> ConversationState {
    ConversationState {
        check_ins: vec![
            CheckIn {
                id: 1,
                text: "學號 1\n王小明".to_string(),
            },
            CheckIn {
                id: 12,
                text: "學號 12".to_string(),
            },
        ],
        roster: vec![12, 1, 1],
        format: "姓名：\n學號：".to_string(),
        example: "姓名：王\n學號：1".to_string(),
    }
}

#[tokio::test]
async fn test_missing_conversation_is_none() {
    let store = Store::in_memory().await.unwrap();
    assert!(store.get_state("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_state_round_trip() {
    let store = Store::in_memory().await.unwrap();
    let state = sample_state();
    store.set_state("C1", &state).await.unwrap();

    let loaded = store.get_state("C1").await.unwrap().unwrap();
    assert_eq!(loaded, state);
}

#[tokio::test]
async fn test_set_state_replaces_previous() {
    let store = Store::in_memory().await.unwrap();
    store.set_state("C1", &sample_state()).await.unwrap();
    store
        .set_state("C1", &ConversationState::default())
        .await
        .unwrap();

    let loaded = store.get_state("C1").await.unwrap().unwrap();
    assert_eq!(loaded, ConversationState::default());
    assert_eq!(store.conversation_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_conversations_are_isolated() {
    let store = Store::in_memory().await.unwrap();
    store.set_state("C1", &sample_state()).await.unwrap();

    assert!(store.get_state("C2").await.unwrap().is_none());
    assert_eq!(store.conversation_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_reads_legacy_json_documents() {
    let store = Store::in_memory().await.unwrap();
    sqlx::query("INSERT INTO conversations (id, state) VALUES (?, ?)")
        .bind("G1")
        .bind(r#"{"checkIns":[{"id":3,"message":"學號3"}],"format":"","example":"","ids":[3,4]}"#)
        .execute(store.pool())
        .await
        .unwrap();

    let loaded = store.get_state("G1").await.unwrap().unwrap();
    assert_eq!(loaded.check_ins[0].id, 3);
    assert_eq!(loaded.roster, vec![3, 4]);
}

#[tokio::test]
async fn test_reads_legacy_roster_with_null_ids() {
    let store = Store::in_memory().await.unwrap();
    sqlx::query("INSERT INTO conversations (id, state) VALUES (?, ?)")
        .bind("G1")
        .bind(r#"{"checkIns":[],"format":"","example":"","ids":[1,null,3]}"#)
        .execute(store.pool())
        .await
        .unwrap();

    let loaded = store.get_state("G1").await.unwrap().unwrap();
    assert_eq!(loaded.roster, vec![1, 3]);
}

#[tokio::test]
async fn test_corrupt_document_is_serialization_error() {
    let store = Store::in_memory().await.unwrap();
    sqlx::query("INSERT INTO conversations (id, state) VALUES ('bad', 'not json')")
        .execute(store.pool())
        .await
        .unwrap();

    let err = store.get_state("bad").await.unwrap_err();
    assert!(matches!(err, mbot_core::error::MbotError::Serialization(_)));
}

#[tokio::test]
async fn test_trait_object_access() {
    let store = Store::in_memory().await.unwrap();
    let dyn_store: &dyn StateStore = &store;
    dyn_store.set_state("C1", &sample_state()).await.unwrap();
    assert!(dyn_store.get_state("C1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_on_disk_store_persists_across_reopen() {
    let dir = std::env::temp_dir().join(format!("__mbot_store_test_{}__", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let config = MemoryConfig {
        db_path: dir.join("mbot.db").to_string_lossy().to_string(),
    };

    {
        let store = Store::new(&config).await.unwrap();
        store.set_state("C1", &sample_state()).await.unwrap();
        store.pool().close().await;
    }

    let reopened = Store::new(&config).await.unwrap();
    assert_eq!(
        reopened.get_state("C1").await.unwrap().unwrap(),
        sample_state()
    );
    reopened.pool().close().await;

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let store = Store::in_memory().await.unwrap();
    Store::run_migrations(store.pool()).await.unwrap();
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM _migrations")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 2);
}
