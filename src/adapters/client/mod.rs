// データベースプロファイル抽象化
//
// 1つの共通コントラクト（connect / disconnect / listTables /
// schemaCalculation / adjustWildcard）の背後に4つのバックエンド実装
// （直接HANA、CDS経由HANA、PostgreSQL、SQLite）を配置します。
// バックエンドは実行時にプロファイル名から解決されます。

mod hana;
mod hana_cds;
mod postgres;
mod sqlite;

pub use hana::HanaClient;
pub use hana_cds::HanaCdsClient;
pub use postgres::PostgresClient;
pub use sqlite::SqliteClient;

use crate::core::config::{ClientKind, Profiles, CURRENT_SCHEMA_SENTINEL, DEFAULT_PROFILE};
use crate::core::descriptors::TableSummary;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::AnyPool;

/// データベースクライアントの共通コントラクト
///
/// 各バックエンドはlistTablesの対象カタログ、スキーマ絞り込みの述語、
/// 結果行の共通形状への揃え方だけが異なります。schemaCalculationと
/// adjustWildcardは全バックエンドで共有されるデフォルト実装です。
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// クライアント種別を取得
    fn kind(&self) -> ClientKind;

    /// クレデンシャルに埋め込まれたスキーマを取得
    fn credential_schema(&self) -> Option<&str>;

    /// 接続を確立
    async fn connect(&mut self) -> Result<()>;

    /// 接続を切断
    async fn disconnect(&mut self) -> Result<()>;

    /// 接続プールを取得（未接続の場合はエラー）
    fn pool(&self) -> Result<&AnyPool>;

    /// テーブル一覧を取得
    ///
    /// パターンはSQLのLIKEワイルドカード、件数はlimitで制限されます。
    async fn list_tables(
        &self,
        schema: &str,
        pattern: &str,
        limit: u32,
    ) -> Result<Vec<TableSummary>>;

    /// オブジェクトの生DDL定義を取得
    async fn object_definition(&self, schema: &str, name: &str) -> Result<String>;

    /// 使用するスキーマ名を決定
    ///
    /// 明示的なスキーマ指定がない場合（またはセンチネルが要求された場合）は
    /// クレデンシャルのスキーマ、それもなければ "public"。
    /// ワイルドカード `*` はSQLのLIKEワイルドカード `%` へ変換されます。
    /// それ以外は要求された値をそのまま使用します。
    fn schema_calculation(&self, requested: Option<&str>) -> String {
        match requested {
            None => self
                .credential_schema()
                .unwrap_or("public")
                .to_string(),
            Some(CURRENT_SCHEMA_SENTINEL) => self
                .credential_schema()
                .unwrap_or("public")
                .to_string(),
            Some("*") => "%".to_string(),
            Some(schema) => schema.to_string(),
        }
    }

    /// テーブル名パターンのワイルドカードを調整
    ///
    /// 単独の `*` のみを `%` へ変換します。汎用のグロブ変換ではありません。
    fn adjust_wildcard(&self, pattern: &str) -> String {
        if pattern == "*" {
            "%".to_string()
        } else {
            pattern.to_string()
        }
    }
}

/// プロファイル名からクライアントを解決
///
/// プロファイル未指定時はデフォルトプロファイル（hybrid）を使用し、
/// 直接HANAドライバー実装に解決されます。種別タグは構築時に一度だけ
/// 解決され、以降の分岐はありません。
pub fn new_client(
    profile_name: Option<&str>,
    profiles: &Profiles,
) -> Result<Box<dyn DatabaseClient>> {
    let name = profile_name.unwrap_or(DEFAULT_PROFILE);
    let config = profiles.get(name)?.clone();

    let client: Box<dyn DatabaseClient> = match config.kind {
        ClientKind::Hana => Box::new(HanaClient::new(config)),
        ClientKind::HanaCds => Box::new(HanaCdsClient::new(config)),
        ClientKind::Postgres => Box::new(PostgresClient::new(config)),
        ClientKind::Sqlite => Box::new(SqliteClient::new(config)),
    };

    Ok(client)
}
