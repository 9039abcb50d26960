use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value_objects::{BookId, UserId};

/// コマンド：書籍の貸出待ちリクエスト
///
/// 在庫切れの貸出要求をキューへ積むときに生成される。生成後は不変で、
/// 返却時の在庫補充で消費されるか、要求者が既に消えていた場合に破棄される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowRequest {
    pub user_id: UserId,
    pub book_id: BookId,
    pub requested_at: DateTime<Utc>,
}

impl BorrowRequest {
    pub fn new(user_id: UserId, book_id: BookId) -> Self {
        Self {
            user_id,
            book_id,
            requested_at: Utc::now(),
        }
    }
}
