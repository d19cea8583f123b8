// tablesコマンドハンドラー
//
// プロファイルのバックエンドからテーブル一覧を取得して表示します。

use crate::cli::command_context::CommandContext;
use crate::core::descriptors::TableSummary;
use anyhow::Result;
use std::path::PathBuf;

/// tablesコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct TablesCommand {
    /// 設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// プロファイル名
    pub profile: Option<String>,
    /// スキーマ名
    pub schema: Option<String>,
    /// テーブル名パターン
    pub table_pattern: String,
    /// 件数上限
    pub limit: u32,
}

/// tablesコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct TablesCommandHandler {}

impl TablesCommandHandler {
    /// 新しいTablesCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// tablesコマンドを実行
    pub async fn execute(&self, command: &TablesCommand) -> Result<String> {
        let context = CommandContext::load(
            command.config_path.as_deref(),
            command.profile.clone(),
        )?;
        let mut client = context.connect_client().await?;

        let schema = client.schema_calculation(command.schema.as_deref());
        let pattern = client.adjust_wildcard(&command.table_pattern);

        let tables = client.list_tables(&schema, &pattern, command.limit).await?;

        client.disconnect().await?;

        Ok(self.format_table_listing(&tables))
    }

    /// テーブル一覧をフォーマット
    pub fn format_table_listing(&self, tables: &[TableSummary]) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{:<20} {:<40} {:<12} COMMENTS\n",
            "SCHEMA", "TABLE", "OID"
        ));

        for table in tables {
            let oid = table
                .table_oid
                .map(|oid| oid.to_string())
                .unwrap_or_default();
            output.push_str(&format!(
                "{:<20} {:<40} {:<12} {}\n",
                table.schema_name,
                table.table_name,
                oid,
                table.comments.as_deref().unwrap_or("")
            ));
        }

        output.push_str(&format!("\n{} table(s)\n", tables.len()));
        output
    }
}
