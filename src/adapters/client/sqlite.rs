// SQLiteクライアント
//
// sqlite_masterからテーブル一覧を取得します。SQLiteにはスキーマの
// 概念（アタッチ名以外）とOID/COMMENTSに相当する情報がないため、
// スキーマ名は "main" 固定、OIDとコメントは欠損になります。

use super::DatabaseClient;
use crate::adapters::database::DatabaseConnectionService;
use crate::core::config::{ClientKind, ProfileConfig};
use crate::core::descriptors::TableSummary;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::{AnyPool, Row};

/// SQLiteクライアント
pub struct SqliteClient {
    config: ProfileConfig,
    pool: Option<AnyPool>,
}

impl SqliteClient {
    /// 新しいSqliteClientを作成
    pub fn new(config: ProfileConfig) -> Self {
        Self { config, pool: None }
    }
}

#[async_trait]
impl DatabaseClient for SqliteClient {
    fn kind(&self) -> ClientKind {
        ClientKind::Sqlite
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
        _schema: &str,
        pattern: &str,
        limit: u32,
    ) -> Result<Vec<TableSummary>> {
        // SQLiteはスキーマ述語を持たないため、スキーマ引数は使用しない
        let sql = "SELECT name FROM sqlite_master \
                   WHERE type = 'table' AND name LIKE ? AND name NOT LIKE 'sqlite_%' \
                   ORDER BY name LIMIT ?";

        let rows = sqlx::query(sql)
            .bind(pattern)
            .bind(limit as i64)
            .fetch_all(self.pool()?)
            .await?;

        Ok(rows
            .iter()
            .map(|row| TableSummary {
                schema_name: "main".to_string(),
                table_name: row.get(0),
                table_oid: None,
                comments: None,
            })
            .collect())
    }

    async fn object_definition(&self, _schema: &str, name: &str) -> Result<String> {
        let row = sqlx::query("SELECT sql FROM sqlite_master WHERE name = ?")
            .bind(name)
            .fetch_one(self.pool()?)
            .await?;

        Ok(row.get(0))
    }
}
