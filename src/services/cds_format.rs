// CDS整形
//
// カタログオブジェクト1件とそのフィールド・制約からCDSエンティティ定義
// テキストを生成します。名前サニタイズ、キー/NULL許可/デフォルト値の
// 注釈付け、コメントからのタイトル注釈、リネーム相互参照とシノニムの
// 記録を行います。

use crate::core::context::{ConversionContext, FormatOptions, RenderContext};
use crate::core::descriptors::{
    ColumnDescriptor, KeyConstraint, ObjectDescriptor, ObjectKind, ParameterDescriptor,
};
use crate::services::type_mapping::{is_geometry_type, map_type};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;

/// 整形時のカタログ側参照
///
/// ジオメトリカラムのSRS解決と計算ビュー判定を抽象化します。
/// テスト時のモック差し替えを可能にするためのトレイトです。
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// ジオメトリカラムのSRS識別子を取得
    ///
    /// (スキーマ, オブジェクト名, カラム名) で一意に1行が存在することを
    /// 前提とします。登録されていないカラムを渡した場合は失敗します。
    async fn srs_id(&self, schema: &str, object: &str, column: &str) -> Result<String>;

    /// ビューが計算ビューかどうか
    ///
    /// 判定不能の場合もエラーにせずfalseを返します。
    async fn is_calculation_view(&self, schema: &str, view: &str) -> bool;
}

/// オブジェクト名をサニタイズ
///
/// 名前空間区切り（::）の変換を先に、ドットの変換を後に適用します。
/// この順序は合成結果に影響するため入れ替えできません。
pub fn sanitize_object_name(name: &str, render: RenderContext, options: &FormatOptions) -> String {
    let name = if render == RenderContext::Preview || options.no_colons {
        name.replace("::", "_")
    } else {
        name.replace("::", ".")
    };

    if options.keep_path {
        name
    } else {
        name.replace('.', "_")
    }
}

/// カラム名をサニタイズ
///
/// ドットをアンダースコアへ置換します。
pub fn sanitize_column_name(name: &str) -> String {
    name.replace('.', "_")
}

/// CDS整形サービス
#[derive(Debug, Clone, Default)]
pub struct CdsFormatter {}

impl CdsFormatter {
    /// 新しいCdsFormatterを作成
    pub fn new() -> Self {
        Self {}
    }

    /// カタログオブジェクト1件をCDSエンティティ定義テキストへ整形
    ///
    /// # Arguments
    /// * `lookup` - SRS解決と計算ビュー判定のカタログ側参照
    /// * `ctx` - 変換コンテキスト（リネーム相互参照とシノニムが記録される）
    /// * `object` - オブジェクト記述子
    /// * `fields` - フィールド行（POSITION順に出力される）
    /// * `constraints` - プライマリキー制約（テーブルのみ、ビューはNone）
    /// * `kind` - オブジェクト種別
    /// * `render` - 呼び出しコンテキスト
    /// * `parameters` - 計算ビューの入力パラメータ
    #[allow(clippy::too_many_arguments)]
    pub async fn format(
        &self,
        lookup: &dyn CatalogLookup,
        ctx: &mut ConversionContext,
        object: &ObjectDescriptor,
        fields: &[ColumnDescriptor],
        constraints: Option<&[KeyConstraint]>,
        kind: ObjectKind,
        render: RenderContext,
        parameters: Option<&[ParameterDescriptor]>,
    ) -> Result<String> {
        let entity_name = sanitize_object_name(&object.object_name, render, &ctx.options);

        let mut output = String::new();

        // 永続化注釈はテーブル/ビューのみ。ビューはさらに計算ビュー判定を行う
        if ctx.options.use_exists && matches!(kind, ObjectKind::Table | ObjectKind::View) {
            output.push_str("@cds.persistence.exists\n");
            if kind == ObjectKind::View
                && lookup
                    .is_calculation_view(&object.schema_name, &object.object_name)
                    .await
            {
                output.push_str("@cds.persistence.calcview\n");
            }
        }

        // エンティティヘッダー
        if ctx.options.use_quoted {
            output.push_str(&format!("entity ![{}]", entity_name));
        } else {
            output.push_str(&format!("entity {}", entity_name));
        }

        // 計算ビューの入力パラメータリスト
        if let Some(parameters) = parameters {
            if !parameters.is_empty() {
                let mut rendered = Vec::with_capacity(parameters.len());
                for parameter in parameters {
                    let cds_type = self
                        .resolve_type(
                            lookup,
                            ctx,
                            object,
                            &parameter.parameter_name,
                            &parameter.data_type_name,
                            parameter.length,
                            parameter.scale,
                            render,
                        )
                        .await?;
                    rendered.push(format!("{} : {}", parameter.parameter_name, cds_type));
                }
                output.push_str(&format!("({})", rendered.join(", ")));
            }
        }
        output.push_str(" {\n");

        // シノニム登録（同名は上書き）
        ctx.register_synonym(&entity_name, &object.object_name, &object.schema_name);

        // 制約のカラム名はフィールド名と同じ規則でサニタイズして結合する
        let key_columns: HashSet<String> = constraints
            .map(|constraints| {
                constraints
                    .iter()
                    .map(|constraint| sanitize_column_name(&constraint.column_name))
                    .collect()
            })
            .unwrap_or_default();

        // POSITION順がそのまま出力カラム順になる
        let mut ordered: Vec<&ColumnDescriptor> = fields.iter().collect();
        ordered.sort_by_key(|field| field.position);

        for field in ordered {
            let sanitized = sanitize_column_name(&field.column_name);
            if sanitized != field.column_name {
                ctx.record_rename(&field.column_name, &sanitized, &field.data_type_name);
            }

            let is_key = match kind {
                ObjectKind::Table => key_columns.contains(&sanitized),
                _ => field.is_key,
            };

            let cds_type = self
                .resolve_type(
                    lookup,
                    ctx,
                    object,
                    &field.column_name,
                    &field.data_type_name,
                    field.length,
                    field.scale,
                    render,
                )
                .await?;

            output.push_str("    ");
            if is_key {
                output.push_str("key ");
            }
            output.push_str(&format!("{} : {}", sanitized, cds_type));

            if let Some(default) = &field.default_value {
                output.push_str(&format_default_clause(&field.data_type_name, default));
            }

            // キーはターゲット言語で暗黙的に非NULLのため二重注釈しない
            if !field.is_nullable && !is_key {
                output.push_str(" not null");
            }

            let title = field.comments.as_deref().unwrap_or(&sanitized);
            output.push_str(&format!(" @title : '{}'", title.replace('\'', "''")));
            output.push_str(";\n");
        }

        output.push_str("}\n");
        Ok(output)
    }

    /// フィールド/パラメータの型を解決
    ///
    /// ジオメトリ型はSRSを先に解決してから型マッピングへ渡します。
    /// Previewコンテキストでは TIMESTAMP を素の String として出力します
    /// （外部レンダラーのタイムスタンプ解釈を回避するため）。
    #[allow(clippy::too_many_arguments)]
    async fn resolve_type(
        &self,
        lookup: &dyn CatalogLookup,
        ctx: &ConversionContext,
        object: &ObjectDescriptor,
        column_name: &str,
        data_type_name: &str,
        length: Option<i64>,
        scale: Option<i64>,
        render: RenderContext,
    ) -> Result<String> {
        if render == RenderContext::Preview && data_type_name == "TIMESTAMP" {
            return Ok("String".to_string());
        }

        let srs_id = if is_geometry_type(data_type_name) {
            Some(
                lookup
                    .srs_id(&object.schema_name, &object.object_name, column_name)
                    .await?,
            )
        } else {
            None
        };

        Ok(map_type(
            data_type_name,
            length,
            scale,
            ctx.options.use_hana_types,
            srs_id.as_deref(),
        ))
    }
}

/// デフォルト値句を整形
///
/// BOOLEAN はエンコード値 '1' のみ true、それ以外はすべて false。
/// 他の型は生の値を単一引用符で囲む（埋め込み引用符はエスケープしない）。
fn format_default_clause(data_type_name: &str, default: &str) -> String {
    if data_type_name == "BOOLEAN" {
        let literal = if default == "1" { "true" } else { "false" };
        format!(" default {}", literal)
    } else {
        format!(" default '{}'", default)
    }
}
