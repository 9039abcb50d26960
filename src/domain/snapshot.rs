use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::book::Book;
use super::commands::BorrowRequest;
use super::user::User;
use super::value_objects::{BookId, NodeId};

/// スナップショット形式のバージョン
pub const SNAPSHOT_VERSION: u32 = 1;

/// 永続化されるライブラリ全体の状態
///
/// 書籍・利用者のカタログ、書籍ごとの貸出待ちリスト（投入順）、
/// 相互作用グラフの隣接リストを1つの文書にまとめる。プロセス境界では
/// この3つとカタログだけから全体を復元できる。
///
/// マップのキーは順序つきで持ち、保存のたびに同じ内容なら同じJSONに
/// なるようにする。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    pub version: u32,
    pub books: Vec<Book>,
    pub users: Vec<User>,
    pub backlogs: BTreeMap<BookId, Vec<BorrowRequest>>,
    pub graph: BTreeMap<NodeId, Vec<NodeId>>,
}
