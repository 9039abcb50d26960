use crate::domain::{
    Book, BookFilter, BookUpdate, Catalog, InteractionGraph, LibrarySnapshot, SNAPSHOT_VERSION,
    User,
    value_objects::{BookId, Genre, NodeId, UserId},
};

use super::circulation::{BorrowOutcome, CirculationService, Result, ReturnOutcome};
use super::recommendation::{RecommendationEngine, RecommenderConfig};

/// 図書館サービス全体のファサード
///
/// カタログ（レコードストア）、貸出コーディネータ、推薦エンジンを束ね、
/// API層にはこの型だけを見せる。コアは同期・単一アクター前提で、排他は
/// 外側の層が担う。
#[derive(Debug, Default)]
pub struct Library {
    catalog: Catalog,
    circulation: CirculationService,
    recommender: RecommendationEngine,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RecommenderConfig) -> Self {
        Self {
            recommender: RecommendationEngine::new(config),
            ..Self::default()
        }
    }

    // ========================================================================
    // カタログ操作
    // ========================================================================

    /// 書籍を登録する（既存IDなら蔵書マージ）。グラフにもノードを確保する。
    pub fn add_book(&mut self, book: Book) -> BookId {
        let id = self.catalog.add_book(book);
        self.circulation.register_book(id);
        id
    }

    /// 書籍を削除し、その書籍の待ち行列も破棄する
    pub fn remove_book(&mut self, id: BookId) -> bool {
        let removed = self.catalog.remove_book(id);
        if removed {
            self.circulation.drop_backlog(id);
        }
        removed
    }

    /// 書誌情報を更新する
    pub fn update_book(&mut self, id: BookId, update: BookUpdate) -> bool {
        self.catalog.update_book(id, update)
    }

    /// 利用者を登録する。グラフにもノードを確保する。
    pub fn add_user(&mut self, user: User) -> bool {
        let id = user.id;
        let added = self.catalog.add_user(user);
        if added {
            self.circulation.register_user(id);
        }
        added
    }

    /// 利用者を削除する
    ///
    /// 残った貸出待ちリクエストはここでは掃除せず、返却時の充当処理が
    /// 遅延的に捨てる。
    pub fn remove_user(&mut self, id: UserId) -> bool {
        self.catalog.remove_user(id)
    }

    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.catalog.book(id)
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.catalog.user(id)
    }

    pub fn search_books(&self, filter: &BookFilter) -> Vec<&Book> {
        self.catalog.search_books(filter)
    }

    pub fn available_books(&self) -> Vec<&Book> {
        self.catalog.available_books()
    }

    /// 累計貸出数の上位k冊
    pub fn top_books(&self, k: usize) -> Vec<&Book> {
        self.catalog.top_by_borrow_count(k)
    }

    /// 蔵書に存在する全ジャンル
    pub fn genres(&self) -> Vec<Genre> {
        self.catalog.genres()
    }

    // ========================================================================
    // 貸出・返却
    // ========================================================================

    pub fn borrow_book(&mut self, user_id: UserId, book_id: BookId) -> Result<BorrowOutcome> {
        self.circulation.borrow(&mut self.catalog, user_id, book_id)
    }

    pub fn return_book(&mut self, user_id: UserId, book_id: BookId) -> Result<ReturnOutcome> {
        self.circulation.return_book(&mut self.catalog, user_id, book_id)
    }

    /// 指定書籍の貸出待ち件数
    pub fn pending_requests(&self, book_id: BookId) -> usize {
        self.circulation.pending_requests(book_id)
    }

    // ========================================================================
    // 推薦
    // ========================================================================

    pub fn recommend(&self, user_id: UserId, limit: usize) -> Vec<BookId> {
        self.recommender
            .recommend(&self.catalog, self.circulation.graph(), user_id, limit)
    }

    pub fn interaction_graph(&self) -> &InteractionGraph {
        self.circulation.graph()
    }

    // ========================================================================
    // 永続化
    // ========================================================================

    /// 永続化用のスナップショットを写し取る
    pub fn snapshot(&self) -> LibrarySnapshot {
        let mut books: Vec<Book> = self.catalog.books().cloned().collect();
        books.sort_by_key(|book| book.id);
        let mut users: Vec<User> = self.catalog.users().cloned().collect();
        users.sort_by_key(|user| user.id);

        LibrarySnapshot {
            version: SNAPSHOT_VERSION,
            books,
            users,
            backlogs: self.circulation.backlogs(),
            graph: self.circulation.graph().to_adjacency(),
        }
    }

    /// スナップショットで現在の状態を置き換える（推薦設定は引き継ぐ）
    pub fn restore(&mut self, snapshot: LibrarySnapshot) {
        *self = Self::from_snapshot(snapshot, *self.recommender.config());
    }

    /// スナップショットからの完全復元
    pub fn from_snapshot(snapshot: LibrarySnapshot, config: RecommenderConfig) -> Self {
        let mut catalog = Catalog::new();
        for book in snapshot.books {
            catalog.add_book(book);
        }
        for user in snapshot.users {
            catalog.add_user(user);
        }

        let mut graph = InteractionGraph::from_adjacency(snapshot.graph);
        // 辺を持たないレコードのノードも確保しておく
        for book in catalog.books() {
            graph.add_node(NodeId::Book(book.id));
        }
        for user in catalog.users() {
            graph.add_node(NodeId::User(user.id));
        }

        Self {
            catalog,
            circulation: CirculationService::from_parts(snapshot.backlogs, graph),
            recommender: RecommendationEngine::new(config),
        }
    }
}
