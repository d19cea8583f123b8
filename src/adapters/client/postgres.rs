// PostgreSQLクライアント
//
// pg_catalogからテーブル一覧を取得します。スキーマの絞り込みは
// セッションレベルのsearch_path設定とネームスペース述語で行います。

use super::DatabaseClient;
use crate::adapters::database::DatabaseConnectionService;
use crate::core::config::{ClientKind, ProfileConfig};
use crate::core::descriptors::TableSummary;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::{AnyPool, Row};

/// PostgreSQLクライアント
pub struct PostgresClient {
    config: ProfileConfig,
    pool: Option<AnyPool>,
}

impl PostgresClient {
    /// 新しいPostgresClientを作成
    pub fn new(config: ProfileConfig) -> Self {
        Self { config, pool: None }
    }
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    fn kind(&self) -> ClientKind {
        ClientKind::Postgres
    }

    fn credential_schema(&self) -> Option<&str> {
        self.config.schema.as_deref()
    }

    async fn connect(&mut self) -> Result<()> {
        let service = DatabaseConnectionService::new();
        let pool = service.create_pool(&self.config).await?;
        self.pool = Some(pool);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
        }
        Ok(())
    }

    fn pool(&self) -> Result<&AnyPool> {
        self.pool
            .as_ref()
            .ok_or_else(|| anyhow!("Client is not connected"))
    }

    async fn list_tables(
        &self,
        schema: &str,
        pattern: &str,
        limit: u32,
    ) -> Result<Vec<TableSummary>> {
        let pool = self.pool()?;

        // ワイルドカードでない場合はセッションのsearch_pathを合わせる
        if !schema.contains('%') {
            let set_path = format!("SET search_path TO \"{}\"", schema);
            sqlx::query(&set_path).execute(pool).await?;
        }

        let sql = "SELECT n.nspname, c.relname, c.oid::int8, obj_description(c.oid) \
                   FROM pg_class c \
                   JOIN pg_namespace n ON n.oid = c.relnamespace \
                   WHERE c.relkind = 'r' AND n.nspname LIKE $1 AND c.relname LIKE $2 \
                   ORDER BY n.nspname, c.relname LIMIT $3";

        let rows = sqlx::query(sql)
            .bind(schema)
            .bind(pattern)
            .bind(limit as i64)
            .fetch_all(pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| TableSummary {
                schema_name: row.get(0),
                table_name: row.get(1),
                table_oid: row.get(2),
                comments: row.get(3),
            })
            .collect())
    }

    async fn object_definition(&self, _schema: &str, name: &str) -> Result<String> {
        // PostgreSQLにはCREATE文を返す組み込みカタログ関数がない
        Err(anyhow!(
            "Raw object definitions are not supported for the postgres client ({})",
            name
        ))
    }
}
