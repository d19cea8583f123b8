// Adapters Layer
// データベース接続、カタログ読み取り、バックエンド別クライアントの抽象化

pub mod catalog;
pub mod client;
pub mod database;
