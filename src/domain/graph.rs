use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use super::value_objects::{BookId, NodeId, UserId};

/// 利用者と書籍の相互作用グラフ（無向）
///
/// 「この利用者はこの書籍を借りたことがある」という事実を辺として記録する。
/// 辺は冪等で、返却されても消えない。現在の貸出状況ではなく履歴を表す。
///
/// 隣接リストは辺の挿入順を保持するため、BFSの兄弟ノードの訪問順は
/// 挿入順で決定的になる。この順序が下流の同点判定の土台になる。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionGraph {
    adjacency: HashMap<NodeId, Vec<NodeId>>,
    edges: HashSet<(NodeId, NodeId)>,
}

impl InteractionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// ノードを登録する（既存なら何もしない）
    pub fn add_node(&mut self, node: NodeId) {
        self.adjacency.entry(node).or_default();
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    /// 無向辺を張る。冪等で、自己ループは張らない。
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        if !self.edges.insert(Self::edge_key(a, b)) {
            return;
        }
        self.adjacency.entry(a).or_default().push(b);
        self.adjacency.entry(b).or_default().push(a);
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edges.contains(&Self::edge_key(a, b))
    }

    /// 隣接ノードを挿入順で返す。未知のノードなら空（エラーにはしない）。
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// 利用者ノードからの幅優先探索で、`max_hops` ホップ以内に到達できる
    /// 書籍ノードを最短ホップ数つきで返す。
    ///
    /// 1ホップ先は自分が借りた書籍、2ホップ先は同じ書籍を借りた利用者、
    /// 3ホップ先はその利用者たちが借りた書籍に届く。
    pub fn books_within(&self, user_id: UserId, max_hops: usize) -> Vec<(BookId, usize)> {
        let start = NodeId::User(user_id);
        if !self.adjacency.contains_key(&start) {
            return Vec::new();
        }

        let mut visited = HashSet::from([start]);
        let mut frontier = VecDeque::from([(start, 0usize)]);
        let mut books = Vec::new();

        while let Some((node, hops)) = frontier.pop_front() {
            if let NodeId::Book(book_id) = node {
                books.push((book_id, hops));
            }
            if hops >= max_hops {
                continue;
            }
            for &next in self.neighbors(node) {
                if visited.insert(next) {
                    frontier.push_back((next, hops + 1));
                }
            }
        }

        books
    }

    /// スナップショット用の隣接リスト（キー順で安定）
    pub fn to_adjacency(&self) -> BTreeMap<NodeId, Vec<NodeId>> {
        self.adjacency
            .iter()
            .map(|(node, next)| (*node, next.clone()))
            .collect()
    }

    /// 保存済みの隣接リストからの復元
    ///
    /// 隣接リストは保存時の並びのまま引き継ぎ、辺インデックスだけ作り直す。
    pub fn from_adjacency(adjacency: BTreeMap<NodeId, Vec<NodeId>>) -> Self {
        let mut edges = HashSet::new();
        for (node, next) in &adjacency {
            for neighbor in next {
                if node != neighbor {
                    edges.insert(Self::edge_key(*node, *neighbor));
                }
            }
        }
        Self {
            adjacency: adjacency.into_iter().collect(),
            edges,
        }
    }

    fn edge_key(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
        if a <= b { (a, b) } else { (b, a) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new()
    }

    fn book() -> BookId {
        BookId::new()
    }

    #[test]
    fn test_add_edge_is_idempotent() {
        let mut graph = InteractionGraph::new();
        let u = NodeId::User(user());
        let b = NodeId::Book(book());
        graph.add_edge(u, b);
        graph.add_edge(u, b);
        graph.add_edge(b, u);
        assert_eq!(graph.neighbors(u), &[b]);
        assert_eq!(graph.neighbors(b), &[u]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.has_edge(u, b));
        assert!(graph.has_edge(b, u));
    }

    #[test]
    fn test_no_self_loops() {
        let mut graph = InteractionGraph::new();
        let u = NodeId::User(user());
        graph.add_edge(u, u);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.neighbors(u).is_empty());
    }

    #[test]
    fn test_neighbors_of_unknown_node_is_empty() {
        let graph = InteractionGraph::new();
        assert!(graph.neighbors(NodeId::User(user())).is_empty());
        assert!(!graph.contains(NodeId::Book(book())));
    }

    #[test]
    fn test_bfs_tags_books_with_hop_distance() {
        // u1 -- b1 -- u2 -- b2 : u1から見て b1 は1ホップ、b2 は3ホップ
        let (u1, u2) = (user(), user());
        let (b1, b2) = (book(), book());
        let mut graph = InteractionGraph::new();
        graph.add_edge(NodeId::User(u1), NodeId::Book(b1));
        graph.add_edge(NodeId::User(u2), NodeId::Book(b1));
        graph.add_edge(NodeId::User(u2), NodeId::Book(b2));

        assert_eq!(graph.books_within(u1, 3), vec![(b1, 1), (b2, 3)]);
        // ホップ上限を下げると共借り先の書籍には届かない
        assert_eq!(graph.books_within(u1, 2), vec![(b1, 1)]);
    }

    #[test]
    fn test_bfs_sibling_order_follows_edge_insertion() {
        let u = user();
        let (b1, b2, b3) = (book(), book(), book());
        let mut graph = InteractionGraph::new();
        graph.add_edge(NodeId::User(u), NodeId::Book(b1));
        graph.add_edge(NodeId::User(u), NodeId::Book(b2));
        graph.add_edge(NodeId::User(u), NodeId::Book(b3));

        assert_eq!(graph.books_within(u, 1), vec![(b1, 1), (b2, 1), (b3, 1)]);
    }

    #[test]
    fn test_bfs_from_unknown_user_is_empty() {
        let graph = InteractionGraph::new();
        assert!(graph.books_within(user(), 3).is_empty());
    }

    #[test]
    fn test_adjacency_roundtrip() {
        let (u1, u2) = (user(), user());
        let (b1, b2) = (book(), book());
        let mut graph = InteractionGraph::new();
        graph.add_node(NodeId::User(u2));
        graph.add_edge(NodeId::User(u1), NodeId::Book(b1));
        graph.add_edge(NodeId::User(u1), NodeId::Book(b2));

        let restored = InteractionGraph::from_adjacency(graph.to_adjacency());
        assert_eq!(restored, graph);
        assert_eq!(
            restored.books_within(u1, 3),
            graph.books_within(u1, 3)
        );
    }
}
