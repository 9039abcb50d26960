use rusty_circulation::{
    adapters::json_file::JsonFileSnapshotStore,
    api::{handlers::AppState, router::create_router},
    application::{Library, recommendation::RecommenderConfig},
    domain::{
        Book, User,
        value_objects::{BookId, Genre, UserId},
    },
    ports::SnapshotStore,
};
use std::sync::{Arc, RwLock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_circulation=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 永続化ファイルの場所
    let data_file =
        std::env::var("LIBRARY_DATA_FILE").unwrap_or_else(|_| "data/library.json".into());
    let snapshot_store = Arc::new(JsonFileSnapshotStore::new(&data_file));

    // 保存済みスナップショットがあれば復元、なければデモ用の初期データを投入
    let library = match snapshot_store.load().await {
        Ok(Some(snapshot)) => {
            tracing::info!(path = %data_file, "restoring library state from snapshot");
            Library::from_snapshot(snapshot, RecommenderConfig::default())
        }
        Ok(None) => {
            tracing::info!(path = %data_file, "no snapshot found, seeding demo data");
            seed_library()
        }
        Err(err) => {
            tracing::error!("Failed to load snapshot from {}: {}", data_file, err);
            std::process::exit(1);
        }
    };

    // Create application state
    let app_state = Arc::new(AppState {
        library: RwLock::new(library),
        snapshot_store,
    });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

/// デモ用の蔵書と利用者を投入する
fn seed_library() -> Library {
    let mut library = Library::new();

    let books: [(&str, &str, &str, u32); 5] = [
        ("Clean Code", "Robert C. Martin", "technology", 3),
        ("The Pragmatic Programmer", "Andrew Hunt", "technology", 2),
        ("1984", "George Orwell", "fiction", 2),
        ("To Kill a Mockingbird", "Harper Lee", "fiction", 1),
        ("Sapiens", "Yuval Noah Harari", "history", 2),
    ];
    for (title, author, genre, copies) in books {
        library.add_book(Book::new(
            BookId::new(),
            title,
            author,
            Genre::new(genre),
            copies,
        ));
    }

    library.add_user(User::new(
        UserId::new(),
        "Alice",
        [Genre::new("technology"), Genre::new("history")],
    ));
    library.add_user(User::new(UserId::new(), "Bob", [Genre::new("fiction")]));

    library
}
