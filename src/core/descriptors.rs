// カタログ記述子
//
// データベースカタログから取得したオブジェクトメタデータを保持する構造体群。
// 変換リクエストごとに新規取得され、構築後は変更されません。

use serde::Serialize;

/// カタログオブジェクト種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// テーブル
    Table,
    /// ビュー
    View,
    /// ストアドプロシージャ
    Procedure,
    /// 関数
    Function,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::Table => write!(f, "table"),
            ObjectKind::View => write!(f, "view"),
            ObjectKind::Procedure => write!(f, "procedure"),
            ObjectKind::Function => write!(f, "function"),
        }
    }
}

/// カタログオブジェクト記述子
///
/// 1つのデータベースオブジェクト（テーブル、ビュー、プロシージャ、関数）を
/// 表します。OIDでカラム行・パラメータ行と結合されます。
#[derive(Debug, Clone)]
pub struct ObjectDescriptor {
    /// スキーマ名
    pub schema_name: String,
    /// オブジェクト名
    pub object_name: String,
    /// オブジェクト識別子（カラム/パラメータ行との結合キー）
    pub object_oid: i64,
    /// プライマリキー保有フラグ（テーブルのみ）
    pub has_primary_key: bool,
    /// 有効フラグ（ビュー/プロシージャ/関数）
    pub is_valid: bool,
    /// コメント
    pub comments: Option<String>,
    /// 作成日時（旧バージョンのカタログには存在しない）
    pub create_time: Option<String>,
}

impl ObjectDescriptor {
    /// 作成日時をパース
    ///
    /// カタログのタイムスタンプ文字列（小数秒は任意）を解釈します。
    /// 解釈できない場合はNone。
    pub fn create_time_parsed(&self) -> Option<chrono::NaiveDateTime> {
        self.create_time.as_deref().and_then(|raw| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").ok()
        })
    }
}

/// カラム記述子
///
/// オブジェクトの1フィールドを表します。POSITIONはオブジェクト内で一意で、
/// 出力カラム順を定義します。
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    /// カラム名
    pub column_name: String,
    /// 順序位置
    pub position: i64,
    /// ネイティブ型名（HANAカタログの型文字列）
    pub data_type_name: String,
    /// 長さ
    pub length: Option<i64>,
    /// スケール
    pub scale: Option<i64>,
    /// NULL許可フラグ
    pub is_nullable: bool,
    /// デフォルト値（型依存のエンコーディングのまま保持）
    pub default_value: Option<String>,
    /// コメント
    pub comments: Option<String>,
    /// キーフラグ（ビューはカタログ行で直接付与、テーブルは制約結合で判定）
    pub is_key: bool,
}

/// プライマリキー制約記述子（テーブル専用）
///
/// プライマリキーを構成する1カラムを表します。カラム名の文字列一致で
/// ColumnDescriptorと結合されます。
#[derive(Debug, Clone)]
pub struct KeyConstraint {
    /// 制約対象のカラム名
    pub column_name: String,
}

/// パラメータ記述子
///
/// 計算ビューの入力パラメータ、またはプロシージャ/関数のパラメータを
/// 表します。
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    /// パラメータ名
    pub parameter_name: String,
    /// ネイティブ型名
    pub data_type_name: String,
    /// 長さ
    pub length: Option<i64>,
    /// スケール
    pub scale: Option<i64>,
    /// 順序位置
    pub position: i64,
}

/// テーブル一覧行
///
/// 各バックエンドのlistTables結果を共通形状に揃えたもの。
/// SQLiteにはOID/COMMENTSに相当する情報がないため欠損になります。
#[derive(Debug, Clone)]
pub struct TableSummary {
    /// スキーマ名
    pub schema_name: String,
    /// テーブル名
    pub table_name: String,
    /// テーブルOID
    pub table_oid: Option<i64>,
    /// コメント
    pub comments: Option<String>,
}

/// バージョン情報
///
/// バージョン文字列の先頭1文字からメジャーバージョンを導出します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// カタログから取得した生のバージョン文字列
    pub raw: String,
    /// メジャーバージョン
    pub major: u32,
}

impl VersionInfo {
    /// バージョン文字列からVersionInfoを作成
    ///
    /// 先頭1文字をメジャーバージョンとして解釈します。数字でない場合は0。
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let major = raw
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .unwrap_or(0);
        Self { raw, major }
    }
}

/// リネーム相互参照エントリ
///
/// 整形時にサニタイズされたカラム名の変換記録。クエリ書き換えを行う
/// 外部コンシューマーが、生成スキーマのカラム参照をネイティブ名へ
/// 引き戻すために使用します。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameEntry {
    /// サニタイズ前のカラム名
    pub before: String,
    /// サニタイズ後のカラム名
    pub after: String,
    /// ネイティブ型名
    #[serde(rename = "dataType")]
    pub data_type: String,
}

/// シノニム登録先
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynonymTarget {
    /// ソースオブジェクト名
    pub object: String,
    /// ソーススキーマ名
    pub schema: String,
}

/// シノニムエントリ
///
/// 生成されたエンティティ名からスキーマ修飾付きソースオブジェクトへの
/// 対応付け。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynonymEntry {
    /// 対応付け先
    pub target: SynonymTarget,
}
