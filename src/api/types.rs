use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Book, User};

/// 書籍登録リクエスト（POST /books）
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBookRequest {
    /// 省略時は新規採番。既存のIDを指定すると蔵書数がマージされる。
    pub id: Option<Uuid>,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub total_copies: u32,
}

/// 書誌情報の更新リクエスト（PATCH /books/:id、Noneの項目は変更しない）
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
}

/// 書籍レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub total_copies: u32,
    pub available_copies: u32,
    pub borrow_count: u64,
}

impl From<&Book> for BookResponse {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.value(),
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.as_str().to_string(),
            total_copies: book.total_copies(),
            available_copies: book.available_copies(),
            borrow_count: book.borrow_count(),
        }
    }
}

/// 利用者登録リクエスト（POST /users）
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// 省略時は新規採番
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// 利用者レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub interests: Vec<String>,
    pub borrowed_books: Vec<Uuid>,
    pub history: Vec<Uuid>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.value(),
            name: user.name.clone(),
            interests: user
                .interests()
                .iter()
                .map(|genre| genre.as_str().to_string())
                .collect(),
            borrowed_books: user
                .borrowed_books()
                .iter()
                .map(|book_id| book_id.value())
                .collect(),
            history: user.history().iter().map(|book_id| book_id.value()).collect(),
        }
    }
}

/// 貸出リクエスト（POST /loans）
#[derive(Debug, Serialize, Deserialize)]
pub struct BorrowBookRequest {
    pub user_id: Uuid,
    pub book_id: Uuid,
}

/// 貸出レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BorrowBookResponse {
    /// "borrowed"（即時貸出）または "queued"（待ち行列入り）
    pub status: String,
    /// この書籍の貸出待ち件数（レスポンス時点）
    pub pending_requests: usize,
}

/// 返却リクエスト（POST /returns）
#[derive(Debug, Serialize, Deserialize)]
pub struct ReturnBookRequest {
    pub user_id: Uuid,
    pub book_id: Uuid,
}

/// 返却レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ReturnBookResponse {
    /// 返却で空いた在庫により貸出が成立した待ちリクエストの利用者
    pub fulfilled: Vec<Uuid>,
}

/// 書籍検索のクエリパラメータ（GET /books）
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct SearchBooksQuery {
    /// タイトルの部分一致（大文字小文字は区別しない）
    pub title: Option<String>,
    /// 著者名の部分一致（大文字小文字は区別しない）
    pub author: Option<String>,
    /// ジャンルの完全一致（大文字小文字は区別しない）
    pub genre: Option<String>,
}

/// 人気上位のクエリパラメータ（GET /books/top）
#[derive(Debug, Serialize, Deserialize)]
pub struct TopBooksQuery {
    /// 取得件数（省略時は10）
    pub k: Option<usize>,
}

/// 推薦のクエリパラメータ（GET /users/:id/recommendations）
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendQuery {
    /// 最大件数（省略時は5）
    pub limit: Option<usize>,
}

/// 推薦レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    /// おすすめ順の書籍ID
    pub book_ids: Vec<Uuid>,
}

/// 永続化操作のレスポンス（POST /state/save, /state/load）
#[derive(Debug, Serialize, Deserialize)]
pub struct StateResponse {
    pub books: usize,
    pub users: usize,
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
