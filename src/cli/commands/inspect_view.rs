// inspectViewコマンドハンドラー
//
// ビュー1件のカタログメタデータを取得してCDSエンティティ定義へ
// 整形します。計算ビューは注釈が付与され、入力パラメータは
// パラメータリストとして出力されます。

use crate::adapters::catalog::CatalogReader;
use crate::cli::command_context::CommandContext;
use crate::core::context::{ConversionContext, FormatOptions, RenderContext};
use crate::core::descriptors::ObjectKind;
use crate::services::cds_format::CdsFormatter;
use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// inspectViewコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct InspectViewCommand {
    /// 設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// プロファイル名
    pub profile: Option<String>,
    /// スキーマ名
    pub schema: Option<String>,
    /// ビュー名
    pub view: String,
    /// 整形オプション
    pub options: FormatOptions,
}

/// inspectViewコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct InspectViewCommandHandler {}

impl InspectViewCommandHandler {
    /// 新しいInspectViewCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// inspectViewコマンドを実行
    pub async fn execute(&self, command: &InspectViewCommand) -> Result<String> {
        let context = CommandContext::load(
            command.config_path.as_deref(),
            command.profile.clone(),
        )?;
        let mut client = context.connect_client().await?;

        let schema = client.schema_calculation(command.schema.as_deref());
        let reader = CatalogReader::new(client.pool()?.clone());

        let descriptors = reader.get_view(&schema, &command.view).await?;
        let object = descriptors
            .first()
            .ok_or_else(|| anyhow!("Empty descriptor set for {}", command.view))?;

        let fields = reader.get_view_fields(object.object_oid).await?;
        let parameters = reader.get_view_parameters(object.object_oid).await?;

        let mut ctx = ConversionContext::new(command.options);
        let formatter = CdsFormatter::new();
        let entity = formatter
            .format(
                &reader,
                &mut ctx,
                object,
                &fields,
                None,
                ObjectKind::View,
                RenderContext::Standard,
                if parameters.is_empty() {
                    None
                } else {
                    Some(parameters.as_slice())
                },
            )
            .await?;

        client.disconnect().await?;

        Ok(entity)
    }
}
