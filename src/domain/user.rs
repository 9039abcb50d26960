use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::value_objects::{BookId, Genre, UserId};

/// 利用者エンティティ
///
/// `borrowed_books` は現在借りている書籍の集合で、CirculationServiceだけが
/// 書き換える。`history` は過去に借りた書籍を順に積む追記専用の履歴。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    interests: BTreeSet<Genre>,
    borrowed_books: BTreeSet<BookId>,
    history: Vec<BookId>,
}

impl User {
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        interests: impl IntoIterator<Item = Genre>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            interests: interests.into_iter().collect(),
            borrowed_books: BTreeSet::new(),
            history: Vec::new(),
        }
    }

    pub fn interests(&self) -> &BTreeSet<Genre> {
        &self.interests
    }

    pub fn borrowed_books(&self) -> &BTreeSet<BookId> {
        &self.borrowed_books
    }

    pub fn history(&self) -> &[BookId] {
        &self.history
    }

    pub fn is_interested_in(&self, genre: &Genre) -> bool {
        self.interests.contains(genre)
    }

    /// 現在この書籍を借りているか
    pub fn holds(&self, book_id: BookId) -> bool {
        self.borrowed_books.contains(&book_id)
    }

    /// 貸出を記録する（保持集合と履歴の両方に積む）
    pub fn record_borrow(&mut self, book_id: BookId) {
        self.borrowed_books.insert(book_id);
        self.history.push(book_id);
    }

    /// 返却を記録する（冪等）
    pub fn record_return(&mut self, book_id: BookId) {
        self.borrowed_books.remove(&book_id);
    }
}
