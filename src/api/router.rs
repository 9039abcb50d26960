use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, available_books, borrow_book, create_book, create_user, delete_book, delete_user,
    get_book, get_user, list_books, list_genres, load_state, recommendations, return_book,
    save_state, top_books, update_book,
};

/// APIルーターを組み立てる
///
/// カタログ:
/// - POST /books, GET /books（検索）, GET /books/available, /books/genres, /books/top
/// - GET/PATCH/DELETE /books/:id
/// - POST /users, GET/DELETE /users/:id
///
/// 貸出・返却:
/// - POST /loans - 借りる（在庫切れなら待ち行列へ）
/// - POST /returns - 返す（待ち行列へ自動充当）
///
/// 推薦・永続化:
/// - GET /users/:id/recommendations
/// - POST /state/save, POST /state/load
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Catalog
        .route("/books", post(create_book).get(list_books))
        .route("/books/available", get(available_books))
        .route("/books/genres", get(list_genres))
        .route("/books/top", get(top_books))
        .route(
            "/books/:id",
            get(get_book).patch(update_book).delete(delete_book),
        )
        .route("/users", post(create_user))
        .route("/users/:id", get(get_user).delete(delete_user))
        .route("/users/:id/recommendations", get(recommendations))
        // Circulation
        .route("/loans", post(borrow_book))
        .route("/returns", post(return_book))
        // Persistence
        .route("/state/save", post(save_state))
        .route("/state/load", post(load_state))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
