use serde::{Deserialize, Serialize};

use super::errors::CopyError;
use super::value_objects::{BookId, Genre};

/// 書籍エンティティ
///
/// 蔵書数のカウンタをカプセル化し、`0 <= available <= total` を常に保つ。
/// `available_copies` が減るのは貸出成功時のみ、増えるのは返却時のみ。
/// `borrow_count` は人気度の指標で、貸出成功ごとに単調増加する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: Genre,
    total_copies: u32,
    available_copies: u32,
    borrow_count: u64,
}

impl Book {
    /// 新しい書籍を登録する（全冊が貸出可能な状態から始まる）
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        genre: Genre,
        total_copies: u32,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            genre,
            total_copies,
            available_copies: total_copies,
            borrow_count: 0,
        }
    }

    pub fn total_copies(&self) -> u32 {
        self.total_copies
    }

    pub fn available_copies(&self) -> u32 {
        self.available_copies
    }

    pub fn borrow_count(&self) -> u64 {
        self.borrow_count
    }

    /// 今すぐ1冊借りられるか
    pub fn can_borrow(&self) -> bool {
        self.available_copies > 0
    }

    /// 1冊貸し出す。貸出可能数を減らし、人気度を上げる。
    pub fn borrow_one(&mut self) -> Result<(), CopyError> {
        if self.available_copies == 0 {
            return Err(CopyError::NoCopiesAvailable);
        }
        self.available_copies -= 1;
        self.borrow_count += 1;
        Ok(())
    }

    /// 1冊返却する。貸出可能数を増やす。
    pub fn return_one(&mut self) -> Result<(), CopyError> {
        if self.available_copies >= self.total_copies {
            return Err(CopyError::AllCopiesShelved);
        }
        self.available_copies += 1;
        Ok(())
    }

    /// 同じIDの書籍が再登録されたときの蔵書マージ
    pub fn absorb(&mut self, other: &Book) {
        self.total_copies += other.total_copies;
        self.available_copies += other.available_copies;
    }
}
