use thiserror::Error;

use crate::domain::value_objects::{BookId, UserId};

/// 貸出・返却アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum CirculationError {
    /// 書籍が存在しない
    #[error("Book not found: {0}")]
    BookNotFound(BookId),

    /// 利用者が存在しない
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// その利用者は既に同じ書籍を借りている
    #[error("Book {book_id} is already borrowed by user {user_id}")]
    AlreadyBorrowed { user_id: UserId, book_id: BookId },

    /// その利用者はこの書籍を借りていない
    #[error("Book {book_id} is not borrowed by user {user_id}")]
    NotBorrowed { user_id: UserId, book_id: BookId },

    /// 同じ利用者・同じ書籍の貸出待ちが既に登録されている
    #[error("A borrow request for book {book_id} by user {user_id} is already pending")]
    DuplicateRequest { user_id: UserId, book_id: BookId },

    /// ドメイン層のエラー（蔵書カウンタの不整合）
    #[error("Domain error: {0}")]
    Domain(String),
}

/// 貸出・返却アプリケーション層のResult型
pub type Result<T> = std::result::Result<T, CirculationError>;
