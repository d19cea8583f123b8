// inspectFunctionコマンドハンドラー
//
// 関数の記述子とパラメータ一覧を表示します。

use super::inspect_procedure::format_routine_listing;
use crate::adapters::catalog::CatalogReader;
use crate::cli::command_context::CommandContext;
use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// inspectFunctionコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct InspectFunctionCommand {
    /// 設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// プロファイル名
    pub profile: Option<String>,
    /// スキーマ名
    pub schema: Option<String>,
    /// 関数名
    pub function: String,
}

/// inspectFunctionコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct InspectFunctionCommandHandler {}

impl InspectFunctionCommandHandler {
    /// 新しいInspectFunctionCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// inspectFunctionコマンドを実行
    pub async fn execute(&self, command: &InspectFunctionCommand) -> Result<String> {
        let context = CommandContext::load(
            command.config_path.as_deref(),
            command.profile.clone(),
        )?;
        let mut client = context.connect_client().await?;

        let schema = client.schema_calculation(command.schema.as_deref());
        let reader = CatalogReader::new(client.pool()?.clone());

        let descriptors = reader.get_function(&schema, &command.function).await?;
        let object = descriptors
            .first()
            .ok_or_else(|| anyhow!("Empty descriptor set for {}", command.function))?;
        let parameters = reader.get_function_parameters(object.object_oid).await?;

        client.disconnect().await?;

        Ok(format_routine_listing("function", object, &parameters))
    }
}
