use std::collections::HashMap;

use super::book::Book;
use super::user::User;
use super::value_objects::{BookId, Genre, UserId};

/// 書籍・利用者のレコードストア
///
/// IDによる登録・取得・削除と、検索・一覧の読み取りクエリを提供する。
/// 貸出状態の変更はここでは扱わず、CirculationServiceがカウンタと
/// 保持集合だけを書き換える。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    books: HashMap<BookId, Book>,
    users: HashMap<UserId, User>,
}

/// 書籍検索の条件
///
/// title / author は部分一致、genre は完全一致。いずれも大文字小文字を
/// 区別しない。
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
}

/// 書誌情報の更新内容（Noneの項目は変更しない）
#[derive(Debug, Clone, Default)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 書籍を登録する。同じIDが既にあれば蔵書数をマージする。
    pub fn add_book(&mut self, book: Book) -> BookId {
        let id = book.id;
        match self.books.get_mut(&id) {
            Some(existing) => existing.absorb(&book),
            None => {
                self.books.insert(id, book);
            }
        }
        id
    }

    /// 書籍を削除する。存在したかどうかを返す。
    pub fn remove_book(&mut self, id: BookId) -> bool {
        self.books.remove(&id).is_some()
    }

    /// 書誌情報を更新する。存在したかどうかを返す。
    pub fn update_book(&mut self, id: BookId, update: BookUpdate) -> bool {
        let Some(book) = self.books.get_mut(&id) else {
            return false;
        };
        if let Some(title) = update.title {
            book.title = title;
        }
        if let Some(author) = update.author {
            book.author = author;
        }
        if let Some(genre) = update.genre {
            book.genre = Genre::new(&genre);
        }
        true
    }

    /// 利用者を登録する。同じIDが既にあれば何もしない。登録したかを返す。
    pub fn add_user(&mut self, user: User) -> bool {
        if self.users.contains_key(&user.id) {
            return false;
        }
        self.users.insert(user.id, user);
        true
    }

    /// 利用者を削除する。存在したかどうかを返す。
    pub fn remove_user(&mut self, id: UserId) -> bool {
        self.users.remove(&id).is_some()
    }

    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.books.get(&id)
    }

    pub fn book_mut(&mut self, id: BookId) -> Option<&mut Book> {
        self.books.get_mut(&id)
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn user_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.get_mut(&id)
    }

    pub fn contains_book(&self, id: BookId) -> bool {
        self.books.contains_key(&id)
    }

    pub fn contains_user(&self, id: UserId) -> bool {
        self.users.contains_key(&id)
    }

    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// 条件に合う書籍を検索する。結果はタイトル→著者→IDの順で安定。
    pub fn search_books(&self, filter: &BookFilter) -> Vec<&Book> {
        let title = filter.title.as_deref().map(str::to_lowercase);
        let author = filter.author.as_deref().map(str::to_lowercase);
        let genre = filter.genre.as_deref().map(Genre::new);

        let mut hits: Vec<&Book> = self
            .books
            .values()
            .filter(|b| {
                title
                    .as_ref()
                    .is_none_or(|t| b.title.to_lowercase().contains(t))
                    && author
                        .as_ref()
                        .is_none_or(|a| b.author.to_lowercase().contains(a))
                    && genre.as_ref().is_none_or(|g| b.genre == *g)
            })
            .collect();
        Self::sort_by_title(&mut hits);
        hits
    }

    /// 1冊以上貸出可能な書籍の一覧（タイトル→著者の順）
    pub fn available_books(&self) -> Vec<&Book> {
        let mut hits: Vec<&Book> = self.books.values().filter(|b| b.can_borrow()).collect();
        Self::sort_by_title(&mut hits);
        hits
    }

    /// 累計貸出数の多い順に上位k冊を返す
    ///
    /// 同数は書籍IDの昇順で安定させる。kが蔵書数を超える場合は全蔵書を
    /// ソートして返す。
    pub fn top_by_borrow_count(&self, k: usize) -> Vec<&Book> {
        let mut books: Vec<&Book> = self.books.values().collect();
        books.sort_by(|a, b| {
            b.borrow_count()
                .cmp(&a.borrow_count())
                .then_with(|| a.id.cmp(&b.id))
        });
        books.truncate(k);
        books
    }

    /// カタログ中の最大累計貸出数（正規化人気度の分母）
    pub fn max_borrow_count(&self) -> u64 {
        self.books.values().map(Book::borrow_count).max().unwrap_or(0)
    }

    /// 蔵書に存在する全ジャンル（重複なし、名前順）
    pub fn genres(&self) -> Vec<Genre> {
        let mut genres: Vec<Genre> = self
            .books
            .values()
            .map(|book| book.genre.clone())
            .collect();
        genres.sort();
        genres.dedup();
        genres
    }

    fn sort_by_title(books: &mut [&Book]) {
        books.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.author.to_lowercase().cmp(&b.author.to_lowercase()))
                .then_with(|| a.id.cmp(&b.id))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, author: &str, genre: &str, copies: u32) -> Book {
        Book::new(BookId::new(), title, author, Genre::new(genre), copies)
    }

    #[test]
    fn test_add_book_merges_copies_for_same_id() {
        let mut catalog = Catalog::new();
        let first = book("Sapiens", "Harari", "history", 2);
        let id = first.id;
        catalog.add_book(first);

        let refill = Book::new(id, "Sapiens", "Harari", Genre::new("history"), 3);
        catalog.add_book(refill);

        let stored = catalog.book(id).unwrap();
        assert_eq!(stored.total_copies(), 5);
        assert_eq!(stored.available_copies(), 5);
        assert_eq!(catalog.book_count(), 1);
    }

    #[test]
    fn test_add_user_ignores_duplicate_id() {
        let mut catalog = Catalog::new();
        let user = User::new(UserId::new(), "Alice", []);
        let id = user.id;
        assert!(catalog.add_user(user));
        assert!(!catalog.add_user(User::new(id, "Impostor", [])));
        assert_eq!(catalog.user(id).unwrap().name, "Alice");
    }

    #[test]
    fn test_search_by_partial_title_and_exact_genre() {
        let mut catalog = Catalog::new();
        catalog.add_book(book("Clean Code", "Martin", "technology", 1));
        catalog.add_book(book("Clean Architecture", "Martin", "technology", 1));
        catalog.add_book(book("1984", "Orwell", "fiction", 1));

        let hits = catalog.search_books(&BookFilter {
            title: Some("clean".into()),
            ..Default::default()
        });
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Clean Architecture");
        assert_eq!(hits[1].title, "Clean Code");

        let hits = catalog.search_books(&BookFilter {
            genre: Some("Fiction".into()),
            ..Default::default()
        });
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "1984");

        // 部分一致ではないジャンルは対象外
        let hits = catalog.search_books(&BookFilter {
            genre: Some("fict".into()),
            ..Default::default()
        });
        assert!(hits.is_empty());
    }

    #[test]
    fn test_available_books_sorted_by_title_then_author() {
        let mut catalog = Catalog::new();
        catalog.add_book(book("zebra", "Young", "nature", 1));
        catalog.add_book(book("Apples", "Smith", "nature", 1));
        let mut depleted = book("Mid", "Jones", "nature", 1);
        depleted.borrow_one().unwrap();
        catalog.add_book(depleted);

        let titles: Vec<&str> = catalog
            .available_books()
            .iter()
            .map(|b| b.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Apples", "zebra"]);
    }

    #[test]
    fn test_top_by_borrow_count_ordering_and_bounds() {
        let mut catalog = Catalog::new();
        let mut hot = book("Hot", "A", "tech", 5);
        hot.borrow_one().unwrap();
        hot.borrow_one().unwrap();
        let mut warm = book("Warm", "B", "tech", 5);
        warm.borrow_one().unwrap();
        let cold = book("Cold", "C", "tech", 5);

        let (hot_id, warm_id, cold_id) = (hot.id, warm.id, cold.id);
        catalog.add_book(hot);
        catalog.add_book(warm);
        catalog.add_book(cold);

        assert!(catalog.top_by_borrow_count(0).is_empty());

        let top2: Vec<BookId> = catalog
            .top_by_borrow_count(2)
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(top2, vec![hot_id, warm_id]);

        // kが蔵書数を超えるときは全件
        let all = catalog.top_by_borrow_count(10);
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].id, cold_id);
        assert_eq!(catalog.max_borrow_count(), 2);
    }

    #[test]
    fn test_genres_are_deduplicated_and_sorted() {
        let mut catalog = Catalog::new();
        catalog.add_book(book("1984", "Orwell", "fiction", 1));
        catalog.add_book(book("Animal Farm", "Orwell", "Fiction", 1));
        catalog.add_book(book("Clean Code", "Martin", "technology", 1));

        let genres = catalog.genres();
        assert_eq!(genres, vec![Genre::new("fiction"), Genre::new("technology")]);
    }

    #[test]
    fn test_top_by_borrow_count_breaks_ties_by_id() {
        let mut catalog = Catalog::new();
        let a = book("A", "X", "tech", 1);
        let b = book("B", "Y", "tech", 1);
        let mut ids = vec![a.id, b.id];
        ids.sort();
        catalog.add_book(a);
        catalog.add_book(b);

        let top: Vec<BookId> = catalog
            .top_by_borrow_count(2)
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(top, ids);
    }
}
