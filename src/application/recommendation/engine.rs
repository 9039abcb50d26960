use std::collections::HashSet;

use crate::domain::{
    Catalog, InteractionGraph,
    value_objects::{BookId, NodeId, UserId},
};

/// 推薦スコアの重み
///
/// `score = proximity * 1/(1+hops) + interest * 興味一致 + popularity * 正規化人気度`
///
/// 隠れた定数ではなく設定として持ち、チューニングとテストの両方で
/// 差し替えられるようにしている。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// グラフ近接（ホップ数が小さいほど高い）への重み
    pub proximity: f64,
    /// ジャンルが利用者の興味に含まれるときの加点への重み
    pub interest: f64,
    /// カタログ最大値で正規化した累計貸出数への重み
    pub popularity: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            proximity: 1.0,
            interest: 0.5,
            popularity: 0.25,
        }
    }
}

/// 推薦エンジンの設定
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommenderConfig {
    /// BFSで辿る最大ホップ数
    pub max_hops: usize,
    pub weights: ScoringWeights,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            max_hops: 3,
            weights: ScoringWeights::default(),
        }
    }
}

/// グラフ近接・興味・人気度を組み合わせた推薦エンジン
///
/// カタログとグラフを読むだけで、自身は設定以外の状態を持たない。
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine {
    config: RecommenderConfig,
}

impl RecommendationEngine {
    pub fn new(config: RecommenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// 利用者への推薦を最大 `limit` 件返す
    ///
    /// 候補は相互作用グラフのBFSで集め、いま借りている書籍と過去に借りた
    /// ことのある書籍（自分との辺が既にある書籍）を除外する。件数が足り
    /// なければ、同じ除外規則のもとで全体の人気上位から補充する。
    ///
    /// 順序はスコア降順 → 累計貸出数降順 → 書籍ID昇順で決定的。未知の
    /// 利用者や空のカタログでも失敗せず、空列を返す。
    pub fn recommend(
        &self,
        catalog: &Catalog,
        graph: &InteractionGraph,
        user_id: UserId,
        limit: usize,
    ) -> Vec<BookId> {
        let Some(user) = catalog.user(user_id) else {
            return Vec::new();
        };
        if limit == 0 {
            return Vec::new();
        }

        let max_borrows = catalog.max_borrow_count();
        let weights = self.config.weights;
        let user_node = NodeId::User(user_id);

        // 1. グラフ由来の候補をスコアリング
        let mut scored: Vec<(BookId, f64, u64)> = Vec::new();
        for (book_id, hops) in graph.books_within(user_id, self.config.max_hops) {
            if user.holds(book_id) || graph.has_edge(user_node, NodeId::Book(book_id)) {
                continue;
            }
            // グラフに履歴だけ残ってカタログから消えた書籍は候補にしない
            let Some(book) = catalog.book(book_id) else {
                continue;
            };

            let proximity = 1.0 / (1.0 + hops as f64);
            let interest = if user.is_interested_in(&book.genre) {
                1.0
            } else {
                0.0
            };
            let popularity = if max_borrows > 0 {
                book.borrow_count() as f64 / max_borrows as f64
            } else {
                0.0
            };
            let score = weights.proximity * proximity
                + weights.interest * interest
                + weights.popularity * popularity;
            scored.push((book_id, score, book.borrow_count()));
        }

        // 2. スコア降順、同点は累計貸出数降順 → ID昇順
        scored.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| b.2.cmp(&a.2))
                .then_with(|| a.0.cmp(&b.0))
        });

        let mut picked: Vec<BookId> = scored.iter().map(|(id, ..)| *id).take(limit).collect();

        // 3. 足りなければ全体の人気上位で補充（除外規則は同じ、重複なし）
        if picked.len() < limit {
            let from_graph: HashSet<BookId> = picked.iter().copied().collect();
            for book in catalog.top_by_borrow_count(catalog.book_count()) {
                if picked.len() == limit {
                    break;
                }
                if from_graph.contains(&book.id)
                    || user.holds(book.id)
                    || graph.has_edge(user_node, NodeId::Book(book.id))
                {
                    continue;
                }
                picked.push(book.id);
            }
        }

        tracing::debug!(%user_id, requested = limit, produced = picked.len(), "recommendations computed");
        picked
    }
}
