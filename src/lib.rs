//! 図書館の蔵書管理・貸出・推薦サービス
//!
//! 同期的なコア（カタログ、書籍ごとの貸出待ちキュー、利用者と書籍の
//! 相互作用グラフ）を中心に、HTTP APIとJSONスナップショット永続化を
//! 外側の層として持つ。

pub mod adapters;
pub mod api;
pub mod application;
pub mod domain;
pub mod ports;
