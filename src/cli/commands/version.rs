// versionコマンドハンドラー
//
// データベースカタログのバージョンを表示します。

use crate::adapters::catalog::CatalogReader;
use crate::cli::command_context::CommandContext;
use anyhow::Result;
use std::path::PathBuf;

/// versionコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct VersionCommand {
    /// 設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// プロファイル名
    pub profile: Option<String>,
}

/// versionコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct VersionCommandHandler {}

impl VersionCommandHandler {
    /// 新しいVersionCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// versionコマンドを実行
    pub async fn execute(&self, command: &VersionCommand) -> Result<String> {
        let context = CommandContext::load(
            command.config_path.as_deref(),
            command.profile.clone(),
        )?;
        let mut client = context.connect_client().await?;

        let reader = CatalogReader::new(client.pool()?.clone());
        let version = reader.version().await?;

        client.disconnect().await?;

        Ok(format!(
            "Database version: {} (major {})\n",
            version.raw, version.major
        ))
    }
}
