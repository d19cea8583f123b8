// データベース接続アダプター
//
// SQLxを使用したデータベース接続の管理を行います。
// プロファイル設定から接続プールを構築する統一されたインターフェースを
// 提供します。接続URLのスキーム解決はドライバーレイヤーの責務です。

use crate::core::config::ProfileConfig;
use crate::core::error::ClientError;
use sqlx::pool::PoolOptions;
use sqlx::{Any, AnyPool};
use std::time::Duration;

/// データベース接続サービス
///
/// データベース接続プールの初期化と管理を行います。
#[derive(Debug, Clone, Default)]
pub struct DatabaseConnectionService {}

impl DatabaseConnectionService {
    /// 新しいDatabaseConnectionServiceを作成
    pub fn new() -> Self {
        Self {}
    }

    /// データベース接続文字列を構築
    pub fn build_connection_string(&self, profile: &ProfileConfig) -> String {
        profile.to_connection_string()
    }

    /// データベース接続プールを作成
    ///
    /// # Arguments
    ///
    /// * `profile` - プロファイル接続設定
    ///
    /// # Returns
    ///
    /// 接続プールまたはエラー
    pub async fn create_pool(&self, profile: &ProfileConfig) -> Result<AnyPool, ClientError> {
        let connection_string = self.build_connection_string(profile);

        let pool_options = self.create_pool_options_with_timeout(profile.timeout);

        let pool = pool_options
            .connect(&connection_string)
            .await
            .map_err(|e| ClientError::Connection {
                message: format!(
                    "Failed to create database connection pool ({})",
                    profile.kind
                ),
                cause: e.to_string(),
            })?;

        self.test_connection(&pool).await?;
        Ok(pool)
    }

    /// 接続テストを実行
    pub async fn test_connection(&self, pool: &AnyPool) -> Result<(), ClientError> {
        // シンプルなクエリで接続をテスト
        sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .map(|_| ())
            .map_err(|e| ClientError::Connection {
                message: "Database connection test failed".to_string(),
                cause: e.to_string(),
            })
    }

    /// デフォルトのプールオプションを作成
    pub fn create_pool_options(&self) -> PoolOptions<Any> {
        PoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
    }

    /// タイムアウト付きのプールオプションを作成
    pub fn create_pool_options_with_timeout(&self, timeout_secs: Option<u64>) -> PoolOptions<Any> {
        let timeout = timeout_secs.unwrap_or(30);
        PoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(timeout))
    }

    /// 接続プールを閉じる
    pub async fn close_pool(&self, pool: AnyPool) {
        pool.close().await;
    }
}
