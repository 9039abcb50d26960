use std::sync::Arc;

use rusty_circulation::adapters::json_file::JsonFileSnapshotStore;
use rusty_circulation::adapters::mock::SnapshotStore as MockSnapshotStore;
use rusty_circulation::application::Library;
use rusty_circulation::application::recommendation::RecommenderConfig;
use rusty_circulation::domain::value_objects::{BookId, Genre, NodeId, UserId};
use rusty_circulation::domain::{Book, SNAPSHOT_VERSION, User};
use rusty_circulation::ports::SnapshotStore;

// ============================================================================
// テスト用のセットアップヘルパー
// ============================================================================

/// 貸出・待ち行列・返却履歴が混在した図書館を組み立てる
fn populated_library() -> (Library, BookId, UserId, UserId) {
    let mut library = Library::new();
    let b1 = library.add_book(Book::new(
        BookId::new(),
        "1984",
        "George Orwell",
        Genre::new("fiction"),
        1,
    ));
    let b2 = library.add_book(Book::new(
        BookId::new(),
        "Sapiens",
        "Yuval Noah Harari",
        Genre::new("history"),
        2,
    ));

    let u1 = User::new(UserId::new(), "Alice", [Genre::new("fiction")]);
    let u2 = User::new(UserId::new(), "Bob", [Genre::new("history")]);
    let (u1_id, u2_id) = (u1.id, u2.id);
    library.add_user(u1);
    library.add_user(u2);

    // B1はU1が保持し、U2が待ち行列に並ぶ。B2は借りて返した履歴だけ残る。
    library.borrow_book(u1_id, b1).unwrap();
    library.borrow_book(u2_id, b1).unwrap();
    library.borrow_book(u2_id, b2).unwrap();
    library.return_book(u2_id, b2).unwrap();

    (library, b1, u1_id, u2_id)
}

// ============================================================================
// スナップショットの往復
// ============================================================================

#[test]
fn test_snapshot_roundtrip_preserves_everything() {
    let (library, _, _, _) = populated_library();

    let snapshot = library.snapshot();
    assert_eq!(snapshot.version, SNAPSHOT_VERSION);

    let restored = Library::from_snapshot(snapshot.clone(), RecommenderConfig::default());
    assert_eq!(restored.snapshot(), snapshot);
}

#[test]
fn test_snapshot_survives_json_serialization() {
    let (library, _, _, _) = populated_library();

    let snapshot = library.snapshot();
    let json = serde_json::to_string_pretty(&snapshot).unwrap();
    let parsed = serde_json::from_str(&json).unwrap();
    assert_eq!(snapshot, parsed);
}

#[test]
fn test_restored_library_behaves_like_the_original() {
    let (library, b1, u1, u2) = populated_library();
    let expected_recs = library.recommend(u1, 5);

    let restored = {
        let mut fresh = Library::new();
        fresh.restore(library.snapshot());
        fresh
    };

    // カタログと貸出状態
    assert!(restored.user(u1).unwrap().holds(b1));
    assert_eq!(restored.book(b1).unwrap().available_copies(), 0);
    assert_eq!(restored.pending_requests(b1), 1);
    // グラフの履歴
    assert!(
        restored
            .interaction_graph()
            .has_edge(NodeId::User(u1), NodeId::Book(b1))
    );
    // 推薦も同じ結果になる
    assert_eq!(restored.recommend(u1, 5), expected_recs);

    // 待ち行列の先頭は引き続きU2：返却すると充当される
    let mut restored = restored;
    let outcome = restored.return_book(u1, b1).unwrap();
    assert_eq!(outcome.fulfilled, vec![u2]);
    assert!(restored.user(u2).unwrap().holds(b1));
}

// ============================================================================
// ストアアダプタ
// ============================================================================

#[tokio::test]
async fn test_mock_store_roundtrip() {
    let (library, _, _, _) = populated_library();
    let store: Arc<dyn SnapshotStore> = Arc::new(MockSnapshotStore::new());

    assert!(store.load().await.unwrap().is_none());

    let snapshot = library.snapshot();
    store.save(&snapshot).await.unwrap();
    assert_eq!(store.load().await.unwrap(), Some(snapshot));
}

#[tokio::test]
async fn test_mock_store_preload_seeds_the_initial_state() {
    let (library, _, _, _) = populated_library();
    let snapshot = library.snapshot();

    let store = MockSnapshotStore::new();
    store.preload(snapshot.clone());
    assert_eq!(store.load().await.unwrap(), Some(snapshot));
}

#[tokio::test]
async fn test_json_file_store_roundtrip() {
    let (library, _, _, _) = populated_library();
    let path = std::env::temp_dir()
        .join(format!("rusty-circulation-test-{}", uuid::Uuid::new_v4()))
        .join("library.json");
    let store = JsonFileSnapshotStore::new(&path);

    // ファイルが無ければ「保存済みなし」
    assert!(store.load().await.unwrap().is_none());

    let snapshot = library.snapshot();
    store.save(&snapshot).await.unwrap();
    assert_eq!(store.load().await.unwrap(), Some(snapshot.clone()));

    // 上書き保存しても最後の状態だけが残る
    let empty = Library::new().snapshot();
    store.save(&empty).await.unwrap();
    assert_eq!(store.load().await.unwrap(), Some(empty));

    let _ = tokio::fs::remove_file(&path).await;
}
