// inspectTableコマンドハンドラー
//
// テーブル1件のカタログメタデータを取得してCDSエンティティ定義へ
// 整形し、表示します。

use crate::adapters::catalog::CatalogReader;
use crate::cli::command_context::CommandContext;
use crate::core::context::{ConversionContext, FormatOptions, RenderContext};
use crate::core::descriptors::ObjectKind;
use crate::services::cds_format::CdsFormatter;
use crate::services::sql_options::split_storage_extensions;
use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tracing::debug;

/// inspectTableコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct InspectTableCommand {
    /// 設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// プロファイル名
    pub profile: Option<String>,
    /// スキーマ名
    pub schema: Option<String>,
    /// テーブル名
    pub table: String,
    /// 整形オプション
    pub options: FormatOptions,
}

/// inspectTableコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct InspectTableCommandHandler {}

impl InspectTableCommandHandler {
    /// 新しいInspectTableCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// inspectTableコマンドを実行
    pub async fn execute(&self, command: &InspectTableCommand) -> Result<String> {
        let context = CommandContext::load(
            command.config_path.as_deref(),
            command.profile.clone(),
        )?;
        let mut client = context.connect_client().await?;

        let schema = client.schema_calculation(command.schema.as_deref());
        let reader = CatalogReader::new(client.pool()?.clone());

        let descriptors = reader.get_table(&schema, &command.table).await?;
        let object = descriptors
            .first()
            .ok_or_else(|| anyhow!("Empty descriptor set for {}", command.table))?;

        let fields = reader.get_table_fields(object.object_oid).await?;
        let constraints = reader.get_table_constraints(&schema, &command.table).await?;

        let mut ctx = ConversionContext::new(command.options);
        let formatter = CdsFormatter::new();
        let mut entity = formatter
            .format(
                &reader,
                &mut ctx,
                object,
                &fields,
                Some(constraints.as_slice()),
                ObjectKind::Table,
                RenderContext::Standard,
                None,
            )
            .await?;

        // 生DDLにストレージ拡張句があればパススルーブロックとして付加する。
        // 生DDLを提供しないバックエンドではこの段階をスキップする
        match client.object_definition(&schema, &command.table).await {
            Ok(raw) => entity = split_storage_extensions(&raw, entity),
            Err(e) => debug!("raw definition unavailable, skipping storage extensions: {}", e),
        }

        client.disconnect().await?;

        Ok(entity)
    }
}
