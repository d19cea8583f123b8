// マスコンバート
//
// 対象テーブルの一覧を取得し、テーブルごとにカタログ読み取りとCDS整形
// （または生DDL経路）を適用して、単一のテキストバンドルまたは
// オブジェクトごとのエントリを持つ圧縮アーカイブへ集約します。
// 進捗イベントをシンクへ配信しながら、すべて逐次awaitで実行します。

use crate::adapters::catalog::CatalogReader;
use crate::adapters::client::DatabaseClient;
use crate::core::context::{ConversionContext, RenderContext};
use crate::core::descriptors::{ObjectKind, TableSummary};
use crate::services::cds_format::CdsFormatter;
use crate::services::progress::ProgressSink;
use anyhow::{anyhow, Result};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// 生DDLの固定プレフィックス長（"CREATE COLUMN" の長さ）
const DDL_PREFIX_LEN: usize = 13;

/// マイグレーションテーブル定義のバージョンヘッダー
const MIGRATION_HEADER: &str = "== version = 1\n";

/// 出力種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// 正規化スキーマテキストの単一バンドル（.cds）
    CdsBundle,
    /// 生テーブル定義のアーカイブ（.hdbtable）
    TableArchive,
    /// マイグレーションテーブル定義のアーカイブ（.hdbmigrationtable）
    MigrationArchive,
}

/// マスコンバートのリクエストパラメータ
///
/// CLI/プロンプトレイヤーで解決済みの値を受け取ります。
/// ここでの追加検証は行いません。
#[derive(Debug, Clone)]
pub struct MassConvertRequest {
    /// 対象スキーマ（未指定時はクレデンシャルのスキーマ）
    pub schema: Option<String>,
    /// テーブル名パターン
    pub table_pattern: String,
    /// 対象テーブル数の上限
    pub limit: u32,
    /// 出力種別
    pub output: OutputKind,
    /// 出力先フォルダ
    pub folder: PathBuf,
    /// 出力ファイル名（拡張子なし）
    pub filename: String,
    /// シノニムレジストリをサイドファイルへ保存する
    pub save_synonyms: bool,
}

/// マスコンバートオーケストレーター
pub struct MassConverter {
    request: MassConvertRequest,
}

impl MassConverter {
    /// 新しいMassConverterを作成
    pub fn new(request: MassConvertRequest) -> Self {
        Self { request }
    }

    /// 変換バッチを実行
    ///
    /// テーブル一覧フェーズのエラーはそのまま伝播してバッチ全体を中断
    /// します。反復フェーズの個別オブジェクトのエラーも伝播します
    /// （失敗オブジェクトをスキップして継続はしません）。
    ///
    /// # Returns
    /// 書き込んだ出力ファイルのパス
    pub async fn convert(
        &self,
        client: &dyn DatabaseClient,
        ctx: &mut ConversionContext,
        sink: &dyn ProgressSink,
    ) -> Result<PathBuf> {
        let schema = client.schema_calculation(self.request.schema.as_deref());
        let pattern = client.adjust_wildcard(&self.request.table_pattern);

        let tables = client
            .list_tables(&schema, &pattern, self.request.limit)
            .await?;

        info!(
            "mass convert: {} candidate tables in schema {}",
            tables.len(),
            schema
        );

        let output_path = match self.request.output {
            OutputKind::CdsBundle => self.convert_to_bundle(client, ctx, sink, &tables).await?,
            OutputKind::TableArchive | OutputKind::MigrationArchive => {
                self.convert_to_archive(client, sink, &tables).await?
            }
        };

        sink.broadcast("Conversion complete", Some(100.0));

        if self.request.save_synonyms {
            let synonym_path = self
                .request
                .folder
                .join(format!("{}_synonyms.json", self.request.filename));
            fs::write(&synonym_path, ctx.synonyms_to_json()?)?;
        }

        Ok(output_path)
    }

    /// 正規化スキーマテキストの単一バンドルへ変換
    async fn convert_to_bundle(
        &self,
        client: &dyn DatabaseClient,
        ctx: &mut ConversionContext,
        sink: &dyn ProgressSink,
        tables: &[TableSummary],
    ) -> Result<PathBuf> {
        let reader = CatalogReader::new(client.pool()?.clone());
        let formatter = CdsFormatter::new();
        let total = tables.len();

        let mut bundle = String::new();
        for (index, table) in tables.iter().enumerate() {
            sink.broadcast(&table.table_name, Some(percent(index + 1, total)));

            let descriptors = reader
                .get_table(&table.schema_name, &table.table_name)
                .await?;
            let object = descriptors
                .first()
                .ok_or_else(|| anyhow!("Empty descriptor set for {}", table.table_name))?;
            let fields = reader.get_table_fields(object.object_oid).await?;
            let constraints = reader
                .get_table_constraints(&table.schema_name, &table.table_name)
                .await?;

            let entity = formatter
                .format(
                    &reader,
                    ctx,
                    object,
                    &fields,
                    Some(constraints.as_slice()),
                    ObjectKind::Table,
                    RenderContext::Standard,
                    None,
                )
                .await?;

            bundle.push_str(&entity);
            bundle.push('\n');
        }

        let path = self
            .request
            .folder
            .join(format!("{}.cds", self.request.filename));
        write_output(&self.request.folder, &path, bundle.as_bytes())?;
        Ok(path)
    }

    /// 生DDL経路: オブジェクトごとのエントリを持つ圧縮アーカイブへ変換
    ///
    /// アーカイブはメモリ上で構築し、最後に1回のバイナリ書き込みで
    /// ディスクへ出力します（エントリごとのストリーミングはしない）。
    async fn convert_to_archive(
        &self,
        client: &dyn DatabaseClient,
        sink: &dyn ProgressSink,
        tables: &[TableSummary],
    ) -> Result<PathBuf> {
        let reader = CatalogReader::new(client.pool()?.clone());
        let total = tables.len();

        let mut cursor = Cursor::new(Vec::new());
        let mut writer = ZipWriter::new(&mut cursor);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (index, table) in tables.iter().enumerate() {
            sink.broadcast(&table.table_name, Some(percent(index + 1, total)));

            let raw = client
                .object_definition(&table.schema_name, &table.table_name)
                .await?;
            let rewritten = rewrite_definition(&raw, &table.schema_name);
            let cleaned = reader.remove_cs_types(&rewritten).await;

            let (entry_name, content) = match self.request.output {
                OutputKind::MigrationArchive => (
                    format!("{}.hdbmigrationtable", table.table_name),
                    format!("{}{}", MIGRATION_HEADER, cleaned),
                ),
                _ => (format!("{}.hdbtable", table.table_name), cleaned),
            };

            writer.start_file(entry_name, options)?;
            writer.write_all(content.as_bytes())?;
        }

        let _ = writer.finish()?;

        let path = self
            .request
            .folder
            .join(format!("{}.zip", self.request.filename));
        write_output(&self.request.folder, &path, &cursor.into_inner())?;
        Ok(path)
    }
}

/// 進捗率を計算
fn percent(current: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        current as f64 / total as f64 * 100.0
    }
}

/// 生DDLを配備可能な形へ書き換え
///
/// 固定長の "CREATE COLUMN" プレフィックスを取り除き、
/// スキーマ修飾（"SCHEMA".）を除去します。
fn rewrite_definition(raw: &str, schema: &str) -> String {
    let stripped = if raw.len() > DDL_PREFIX_LEN {
        &raw[DDL_PREFIX_LEN..]
    } else {
        raw
    };
    stripped.replace(&format!("\"{}\".", schema), "")
}

/// 出力先フォルダを作成してファイルを書き込む
fn write_output(folder: &Path, path: &Path, content: &[u8]) -> Result<()> {
    fs::create_dir_all(folder)?;
    fs::write(path, content)?;
    Ok(())
}
