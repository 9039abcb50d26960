use std::collections::{BTreeMap, HashMap};

use crate::domain::{
    Book, BorrowRequest, Catalog, CopyError, FifoQueue, InteractionGraph,
    value_objects::{BookId, NodeId, UserId},
};

use super::errors::{CirculationError, Result};

/// 貸出要求の結果
///
/// 待ち行列入りはエラーではなく、即時貸出と区別される正常な結果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowOutcome {
    /// その場で貸し出された
    Borrowed,
    /// 在庫がなく待ち行列に積まれた
    Queued,
}

/// 返却処理の要約
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnOutcome {
    /// 返却で空いた在庫により貸出が成立した待ちリクエストの利用者
    ///
    /// 1回の返却で空く在庫は1冊なので、このモデルでは高々1件になる。
    pub fulfilled: Vec<UserId>,
}

/// 貸出・返却のコーディネータ
///
/// 書籍ごとの貸出待ちキューと相互作用グラフを所有する。カタログ上の
/// レコードについては蔵書カウンタと保持集合だけを書き換え、書誌情報には
/// 触れない。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CirculationService {
    backlogs: HashMap<BookId, FifoQueue<BorrowRequest>>,
    graph: InteractionGraph,
}

impl CirculationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// 永続化された待ち行列とグラフからの復元
    pub fn from_parts(
        backlogs: BTreeMap<BookId, Vec<BorrowRequest>>,
        graph: InteractionGraph,
    ) -> Self {
        Self {
            backlogs: backlogs
                .into_iter()
                .map(|(id, requests)| (id, requests.into_iter().collect()))
                .collect(),
            graph,
        }
    }

    /// カタログ登録時にグラフへ書籍ノードを確保する
    pub fn register_book(&mut self, book_id: BookId) {
        self.graph.add_node(NodeId::Book(book_id));
    }

    /// カタログ登録時にグラフへ利用者ノードを確保する
    pub fn register_user(&mut self, user_id: UserId) {
        self.graph.add_node(NodeId::User(user_id));
    }

    /// 書籍の削除に伴い、その書籍の待ち行列を破棄する
    pub fn drop_backlog(&mut self, book_id: BookId) {
        self.backlogs.remove(&book_id);
    }

    pub fn graph(&self) -> &InteractionGraph {
        &self.graph
    }

    /// 指定書籍の貸出待ち件数
    pub fn pending_requests(&self, book_id: BookId) -> usize {
        self.backlogs.get(&book_id).map_or(0, FifoQueue::len)
    }

    /// 永続化用に、空でない待ち行列を投入順のリストとして写し取る
    pub fn backlogs(&self) -> BTreeMap<BookId, Vec<BorrowRequest>> {
        self.backlogs
            .iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|(id, queue)| (*id, queue.iter().cloned().collect()))
            .collect()
    }

    /// 書籍を貸し出す
    ///
    /// 処理順：
    /// 1. 利用者・書籍の存在確認
    /// 2. 二重貸出の拒否
    /// 3. 在庫があれば即時貸出（カウンタ・保持集合・グラフ辺を更新）
    /// 4. 在庫がなければ待ち行列へ（同一利用者の二重登録は拒否）
    pub fn borrow(
        &mut self,
        catalog: &mut Catalog,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<BorrowOutcome> {
        // 1. 存在確認
        if !catalog.contains_book(book_id) {
            return Err(CirculationError::BookNotFound(book_id));
        }
        let user = catalog
            .user(user_id)
            .ok_or(CirculationError::UserNotFound(user_id))?;

        // 2. 既に借りていないか
        if user.holds(book_id) {
            return Err(CirculationError::AlreadyBorrowed { user_id, book_id });
        }

        let book = catalog
            .book_mut(book_id)
            .ok_or(CirculationError::BookNotFound(book_id))?;

        // 3. 在庫があればその場で貸出
        if book.can_borrow() {
            book.borrow_one().map_err(Self::copy_error)?;
            let user = catalog
                .user_mut(user_id)
                .ok_or(CirculationError::UserNotFound(user_id))?;
            user.record_borrow(book_id);
            self.graph
                .add_edge(NodeId::User(user_id), NodeId::Book(book_id));
            tracing::debug!(%user_id, %book_id, "book borrowed");
            return Ok(BorrowOutcome::Borrowed);
        }

        // 4. 在庫切れ：待ち行列へ（同じ利用者の待ちは1件まで）
        let backlog = self.backlogs.entry(book_id).or_default();
        if backlog.iter().any(|request| request.user_id == user_id) {
            return Err(CirculationError::DuplicateRequest { user_id, book_id });
        }
        backlog.enqueue(BorrowRequest::new(user_id, book_id));
        tracing::debug!(%user_id, %book_id, pending = backlog.len(), "no copies available, request queued");
        Ok(BorrowOutcome::Queued)
    }

    /// 書籍を返却する
    ///
    /// 処理順：
    /// 1. 利用者・書籍の存在確認
    /// 2. 借りていることの確認と保持集合の更新
    /// 3. 在庫を書架に戻す
    /// 4. 空いた在庫を待ち行列の先頭から充当する
    pub fn return_book(
        &mut self,
        catalog: &mut Catalog,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<ReturnOutcome> {
        // 1. 存在確認
        if !catalog.contains_book(book_id) {
            return Err(CirculationError::BookNotFound(book_id));
        }
        let user = catalog
            .user_mut(user_id)
            .ok_or(CirculationError::UserNotFound(user_id))?;

        // 2. 借りているか
        if !user.holds(book_id) {
            return Err(CirculationError::NotBorrowed { user_id, book_id });
        }
        user.record_return(book_id);

        // 3. 在庫を戻す
        let book = catalog
            .book_mut(book_id)
            .ok_or(CirculationError::BookNotFound(book_id))?;
        book.return_one().map_err(Self::copy_error)?;
        tracing::debug!(%user_id, %book_id, "book returned");

        // 4. 待ち行列の充当
        let fulfilled = self.drain_backlog(catalog, book_id)?;
        Ok(ReturnOutcome { fulfilled })
    }

    /// 在庫がある限り待ち行列の先頭から貸出を成立させる
    ///
    /// 充当できないリクエスト（要求後に利用者が削除された等）は捨てて
    /// 次へ進む。返却側の失敗にはしない、ベストエフォートの整合処理。
    fn drain_backlog(&mut self, catalog: &mut Catalog, book_id: BookId) -> Result<Vec<UserId>> {
        let Some(backlog) = self.backlogs.get_mut(&book_id) else {
            return Ok(Vec::new());
        };

        let mut fulfilled = Vec::new();
        while catalog.book(book_id).is_some_and(Book::can_borrow) && !backlog.is_empty() {
            let Ok(request) = backlog.dequeue() else {
                break;
            };

            let Some(user) = catalog.user_mut(request.user_id) else {
                tracing::warn!(
                    user_id = %request.user_id,
                    %book_id,
                    "dropping stale borrow request for deleted user"
                );
                continue;
            };
            if user.holds(book_id) {
                tracing::warn!(
                    user_id = %request.user_id,
                    %book_id,
                    "dropping borrow request, user already holds the book"
                );
                continue;
            }

            user.record_borrow(book_id);
            let book = catalog
                .book_mut(book_id)
                .ok_or(CirculationError::BookNotFound(book_id))?;
            book.borrow_one().map_err(Self::copy_error)?;
            self.graph
                .add_edge(NodeId::User(request.user_id), NodeId::Book(book_id));
            tracing::info!(user_id = %request.user_id, %book_id, "queued borrow request fulfilled");
            fulfilled.push(request.user_id);
        }
        Ok(fulfilled)
    }

    fn copy_error(err: CopyError) -> CirculationError {
        CirculationError::Domain(format!("{err:?}"))
    }
}
