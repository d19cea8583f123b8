// CDS経由HANAクライアント
//
// CDSデプロイメントが管理するスキーマを対象とするHANAクライアント。
// カタログ照会は直接HANAと同じですが、CDSランタイムが生成する
// ドラフトシャドウテーブルを一覧から除外します。

use super::DatabaseClient;
use crate::adapters::database::DatabaseConnectionService;
use crate::core::config::{ClientKind, ProfileConfig};
use crate::core::descriptors::TableSummary;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::{AnyPool, Row};

/// CDS経由HANAクライアント
pub struct HanaCdsClient {
    config: ProfileConfig,
    pool: Option<AnyPool>,
}

impl HanaCdsClient {
    /// 新しいHanaCdsClientを作成
    pub fn new(config: ProfileConfig) -> Self {
        Self { config, pool: None }
    }
}

#[async_trait]
impl DatabaseClient for HanaCdsClient {
    fn kind(&self) -> ClientKind {
        ClientKind::HanaCds
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
        // CDSランタイムのドラフトシャドウテーブルは変換対象にしない
        let sql = "SELECT SCHEMA_NAME, TABLE_NAME, TABLE_OID, COMMENTS FROM TABLES \
                   WHERE SCHEMA_NAME LIKE ? AND TABLE_NAME LIKE ? \
                   AND TABLE_NAME NOT LIKE '%_DRAFTS' \
                   ORDER BY SCHEMA_NAME, TABLE_NAME LIMIT ?";

        let rows = sqlx::query(sql)
            .bind(schema)
            .bind(pattern)
            .bind(limit as i64)
            .fetch_all(self.pool()?)
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

    async fn object_definition(&self, schema: &str, name: &str) -> Result<String> {
        let row = sqlx::query("CALL GET_OBJECT_DEFINITION(?, ?)")
            .bind(schema)
            .bind(name)
            .fetch_one(self.pool()?)
            .await?;

        Ok(row.get(0))
    }
}
