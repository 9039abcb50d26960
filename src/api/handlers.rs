use std::sync::{Arc, RwLock};

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::application::Library;
use crate::application::circulation::BorrowOutcome;
use crate::domain::{
    Book, BookFilter, BookUpdate, User,
    value_objects::{BookId, Genre, UserId},
};
use crate::ports::SnapshotStore;

use super::{
    error::ApiError,
    types::{
        BookResponse, BorrowBookRequest, BorrowBookResponse, CreateBookRequest,
        CreateUserRequest, RecommendQuery, RecommendationsResponse, ReturnBookRequest,
        ReturnBookResponse, SearchBooksQuery, StateResponse, TopBooksQuery, UpdateBookRequest,
        UserResponse,
    },
};

/// 人気上位のデフォルト件数
const DEFAULT_TOP_K: usize = 10;

/// 推薦のデフォルト件数
const DEFAULT_RECOMMEND_LIMIT: usize = 5;

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
///
/// コアは同期・単一アクター前提なので、RwLockで操作を直列化する。
pub struct AppState {
    pub library: RwLock<Library>,
    pub snapshot_store: Arc<dyn SnapshotStore>,
}

// ============================================================================
// Catalog handlers
// ============================================================================

/// POST /books - 書籍を登録
///
/// 同じIDを指定して再登録すると蔵書数がマージされる。
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), QueryError> {
    let id = req.id.map(BookId::from_uuid).unwrap_or_default();
    let book = Book::new(id, req.title, req.author, Genre::new(&req.genre), req.total_copies);

    let mut library = state.library.write().unwrap();
    let id = library.add_book(book);
    let stored = library
        .book(id)
        .ok_or_else(|| QueryError::InternalError(format!("book {} missing after insert", id)))?;

    Ok((StatusCode::CREATED, Json(BookResponse::from(stored))))
}

/// GET /books - 書籍の検索・一覧
///
/// クエリパラメータ（すべてオプション、無指定なら全件）:
/// - title: タイトルの部分一致
/// - author: 著者名の部分一致
/// - genre: ジャンルの完全一致
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchBooksQuery>,
) -> Json<Vec<BookResponse>> {
    let filter = BookFilter {
        title: query.title,
        author: query.author,
        genre: query.genre,
    };

    let library = state.library.read().unwrap();
    let books = library
        .search_books(&filter)
        .into_iter()
        .map(BookResponse::from)
        .collect();
    Json(books)
}

/// GET /books/available - 貸出可能な書籍の一覧
pub async fn available_books(State(state): State<Arc<AppState>>) -> Json<Vec<BookResponse>> {
    let library = state.library.read().unwrap();
    let books = library
        .available_books()
        .into_iter()
        .map(BookResponse::from)
        .collect();
    Json(books)
}

/// GET /books/top - 累計貸出数の上位k冊
pub async fn top_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopBooksQuery>,
) -> Json<Vec<BookResponse>> {
    let k = query.k.unwrap_or(DEFAULT_TOP_K);
    let library = state.library.read().unwrap();
    let books = library
        .top_books(k)
        .into_iter()
        .map(BookResponse::from)
        .collect();
    Json(books)
}

/// GET /books/genres - 蔵書に存在する全ジャンル
pub async fn list_genres(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    let library = state.library.read().unwrap();
    let genres = library
        .genres()
        .into_iter()
        .map(|genre| genre.as_str().to_string())
        .collect();
    Json(genres)
}

/// GET /books/:id - 書籍詳細をIDで取得
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
) -> Result<Json<BookResponse>, QueryError> {
    let book_id = BookId::from_uuid(book_id);
    let library = state.library.read().unwrap();
    match library.book(book_id) {
        Some(book) => Ok(Json(BookResponse::from(book))),
        None => Err(QueryError::NotFound(format!("Book {} not found", book_id))),
    }
}

/// PATCH /books/:id - 書誌情報を更新
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
    Json(req): Json<UpdateBookRequest>,
) -> Result<Json<BookResponse>, QueryError> {
    let book_id = BookId::from_uuid(book_id);
    let update = BookUpdate {
        title: req.title,
        author: req.author,
        genre: req.genre,
    };

    let mut library = state.library.write().unwrap();
    if !library.update_book(book_id, update) {
        return Err(QueryError::NotFound(format!("Book {} not found", book_id)));
    }
    let stored = library
        .book(book_id)
        .ok_or_else(|| QueryError::InternalError(format!("book {} missing after update", book_id)))?;
    Ok(Json(BookResponse::from(stored)))
}

/// DELETE /books/:id - 書籍を削除（貸出待ちの行列も破棄される）
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
) -> Result<StatusCode, QueryError> {
    let book_id = BookId::from_uuid(book_id);
    let mut library = state.library.write().unwrap();
    if library.remove_book(book_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(QueryError::NotFound(format!("Book {} not found", book_id)))
    }
}

/// POST /users - 利用者を登録
///
/// 既存のIDを指定した場合は何も変更せず、登録済みのレコードを返す。
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), QueryError> {
    let id = req.id.map(UserId::from_uuid).unwrap_or_default();
    let interests = req.interests.iter().map(|raw| Genre::new(raw));
    let user = User::new(id, req.name, interests);

    let mut library = state.library.write().unwrap();
    library.add_user(user);
    let stored = library
        .user(id)
        .ok_or_else(|| QueryError::InternalError(format!("user {} missing after insert", id)))?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(stored))))
}

/// GET /users/:id - 利用者詳細をIDで取得
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, QueryError> {
    let user_id = UserId::from_uuid(user_id);
    let library = state.library.read().unwrap();
    match library.user(user_id) {
        Some(user) => Ok(Json(UserResponse::from(user))),
        None => Err(QueryError::NotFound(format!("User {} not found", user_id))),
    }
}

/// DELETE /users/:id - 利用者を削除
///
/// 残った貸出待ちリクエストは返却時の充当処理が遅延的に捨てる。
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, QueryError> {
    let user_id = UserId::from_uuid(user_id);
    let mut library = state.library.write().unwrap();
    if library.remove_user(user_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(QueryError::NotFound(format!("User {} not found", user_id)))
    }
}

// ============================================================================
// Circulation handlers
// ============================================================================

/// POST /loans - 書籍を借りる
///
/// 在庫があれば201で即時貸出、在庫切れなら202で待ち行列入りを返す。
/// 強制されるビジネスルール:
/// - 利用者・書籍が存在すること
/// - 同じ書籍を既に借りていないこと
/// - 同じ書籍の貸出待ちを既に登録していないこと
pub async fn borrow_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BorrowBookRequest>,
) -> Result<(StatusCode, Json<BorrowBookResponse>), ApiError> {
    let user_id = UserId::from_uuid(req.user_id);
    let book_id = BookId::from_uuid(req.book_id);

    let mut library = state.library.write().unwrap();
    let outcome = library.borrow_book(user_id, book_id)?;
    let pending = library.pending_requests(book_id);

    let (status, label) = match outcome {
        BorrowOutcome::Borrowed => (StatusCode::CREATED, "borrowed"),
        BorrowOutcome::Queued => (StatusCode::ACCEPTED, "queued"),
    };
    let response = BorrowBookResponse {
        status: label.to_string(),
        pending_requests: pending,
    };
    Ok((status, Json(response)))
}

/// POST /returns - 書籍を返す
///
/// 返却で空いた在庫は貸出待ちの先頭へ自動で充当され、成立した利用者が
/// レスポンスに含まれる。
pub async fn return_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReturnBookRequest>,
) -> Result<Json<ReturnBookResponse>, ApiError> {
    let user_id = UserId::from_uuid(req.user_id);
    let book_id = BookId::from_uuid(req.book_id);

    let mut library = state.library.write().unwrap();
    let outcome = library.return_book(user_id, book_id)?;

    let response = ReturnBookResponse {
        fulfilled: outcome
            .fulfilled
            .into_iter()
            .map(|user_id| user_id.value())
            .collect(),
    };
    Ok(Json(response))
}

// ============================================================================
// Recommendation handlers
// ============================================================================

/// GET /users/:id/recommendations - 利用者への推薦
///
/// まだ借りたことのない書籍をおすすめ順に最大limit件返す。
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<RecommendQuery>,
) -> Result<Json<RecommendationsResponse>, QueryError> {
    let user_id = UserId::from_uuid(user_id);
    let limit = query.limit.unwrap_or(DEFAULT_RECOMMEND_LIMIT);

    let library = state.library.read().unwrap();
    if library.user(user_id).is_none() {
        return Err(QueryError::NotFound(format!("User {} not found", user_id)));
    }

    let book_ids = library
        .recommend(user_id, limit)
        .into_iter()
        .map(|book_id| book_id.value())
        .collect();
    Ok(Json(RecommendationsResponse { book_ids }))
}

// ============================================================================
// Persistence handlers
// ============================================================================

/// POST /state/save - 現在の状態をスナップショットとして保存
pub async fn save_state(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StateResponse>, QueryError> {
    // ロックをawaitの外で手放すため、先に写しを取る
    let snapshot = {
        let library = state.library.read().unwrap();
        library.snapshot()
    };
    let response = StateResponse {
        books: snapshot.books.len(),
        users: snapshot.users.len(),
    };

    state
        .snapshot_store
        .save(&snapshot)
        .await
        .map_err(|err| QueryError::InternalError(format!("failed to save snapshot: {}", err)))?;

    Ok(Json(response))
}

/// POST /state/load - 保存済みスナップショットから状態を復元
///
/// 現在のメモリ上の状態は置き換えられる。保存済みの状態が無い場合は404。
pub async fn load_state(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StateResponse>, QueryError> {
    let snapshot = state
        .snapshot_store
        .load()
        .await
        .map_err(|err| QueryError::InternalError(format!("failed to load snapshot: {}", err)))?
        .ok_or_else(|| QueryError::NotFound("No snapshot has been saved yet".to_string()))?;

    let response = StateResponse {
        books: snapshot.books.len(),
        users: snapshot.users.len(),
    };

    let mut library = state.library.write().unwrap();
    library.restore(snapshot);

    Ok(Json(response))
}

// ============================================================================
// Error types
// ============================================================================

/// クエリ系・管理系ハンドラー用のエラー型
#[derive(Debug)]
pub enum QueryError {
    NotFound(String),
    InternalError(String),
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            QueryError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            QueryError::InternalError(msg) => {
                // 内部エラーの詳細はログに記録し、クライアントには一般的な
                // メッセージのみを返す
                tracing::error!("Internal error in handler: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(super::types::ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
