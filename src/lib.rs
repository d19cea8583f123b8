// Hanascopeライブラリのエントリーポイント
//
// モジュール構造:
// - cli: CLIレイヤー（ユーザー入力の受付とコマンドルーティング）
// - core: コアドメインロジック（プロファイル設定、カタログ記述子、変換コンテキスト）
// - adapters: データベース接続とカタログ読み取りの抽象化
// - services: 型マッピング、CDS整形、マスコンバートのオーケストレーション

pub mod cli;
pub mod core;
pub mod adapters;
pub mod services;
