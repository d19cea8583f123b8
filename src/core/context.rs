// 変換コンテキスト
//
// 1回の変換バッチに属する可変状態（整形オプション、リネーム相互参照、
// シノニムレジストリ）をまとめて保持します。バッチごとに新規作成する
// ことで、独立した変換リクエスト間で状態が混ざらないようにします。

use crate::core::descriptors::{RenameEntry, SynonymEntry, SynonymTarget};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// 整形オプション
///
/// CDS整形の挙動を制御するフラグ群。変換バッチの開始前に設定します。
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// HANA固有型ボキャブラリを使用する
    pub use_hana_types: bool,
    /// 名前空間区切り（::）を常にアンダースコアへ置換する
    pub no_colons: bool,
    /// 名前中のドットを保持する
    pub keep_path: bool,
    /// @cds.persistence.exists 注釈を出力する
    pub use_exists: bool,
    /// エンティティ名を引用符付き識別子で出力する
    pub use_quoted: bool,
}

/// 整形の呼び出しコンテキスト
///
/// Preview は外部レンダラー向けの出力で、名前空間区切りの扱いと
/// TIMESTAMPパラメータの型が変わります。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderContext {
    /// 外部レンダラー向けプレビュー出力
    Preview,
    /// 標準出力
    Standard,
}

/// 変換コンテキスト
///
/// リネーム相互参照は追記専用で、整形順にエントリが積まれます。
/// シノニムレジストリは名前衝突時に上書き（last write wins）されます。
#[derive(Debug, Default)]
pub struct ConversionContext {
    /// 整形オプション
    pub options: FormatOptions,
    renames: Vec<RenameEntry>,
    synonyms: BTreeMap<String, SynonymEntry>,
}

impl ConversionContext {
    /// 新しいConversionContextを作成
    pub fn new(options: FormatOptions) -> Self {
        Self {
            options,
            renames: Vec::new(),
            synonyms: BTreeMap::new(),
        }
    }

    /// リネーム相互参照へエントリを追記
    pub fn record_rename(&mut self, before: &str, after: &str, data_type: &str) {
        self.renames.push(RenameEntry {
            before: before.to_string(),
            after: after.to_string(),
            data_type: data_type.to_string(),
        });
    }

    /// リネーム相互参照を取得（整形順）
    pub fn renames(&self) -> &[RenameEntry] {
        &self.renames
    }

    /// サニタイズ前の名前からエントリを検索
    ///
    /// 期待される規模（数十〜低数百カラム）では線形探索で十分です。
    pub fn lookup_rename(&self, before: &str) -> Option<&RenameEntry> {
        self.renames.iter().find(|entry| entry.before == before)
    }

    /// シノニムを登録
    ///
    /// 同名エントリは上書きされます。
    pub fn register_synonym(&mut self, name: &str, object: &str, schema: &str) {
        self.synonyms.insert(
            name.to_string(),
            SynonymEntry {
                target: SynonymTarget {
                    object: object.to_string(),
                    schema: schema.to_string(),
                },
            },
        );
    }

    /// シノニムレジストリを取得（読み取り専用）
    pub fn synonyms(&self) -> &BTreeMap<String, SynonymEntry> {
        &self.synonyms
    }

    /// シノニムレジストリをJSON文字列へシリアライズ
    ///
    /// タブインデントで整形されます。
    pub fn synonyms_to_json(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.synonyms
            .serialize(&mut serializer)
            .with_context(|| "Failed to serialize synonym registry")?;
        String::from_utf8(buffer).with_context(|| "Synonym registry is not valid UTF-8")
    }
}
