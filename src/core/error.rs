// エラー型定義
//
// アプリケーション全体で使用されるカスタムエラー型を提供します。
// thiserrorを使用して、CatalogError と ClientError を定義します。

use thiserror::Error;

/// カタログ読み取りエラー
///
/// データベースカタログからのメタデータ取得時に発生するエラーを表現します。
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// 対象オブジェクトがカタログに存在しない
    #[error("{kind} not found: \"{schema}\".\"{name}\"")]
    NotFound {
        /// オブジェクト種別（table, view, procedure, function）
        kind: String,
        /// スキーマ名
        schema: String,
        /// オブジェクト名
        name: String,
    },

    /// データベースバージョンが判定できない
    #[error("Database version could not be determined (M_DATABASE returned no rows)")]
    VersionUnavailable,
}

impl CatalogError {
    /// NotFoundエラーを作成
    pub fn not_found(kind: impl Into<String>, schema: &str, name: &str) -> Self {
        CatalogError::NotFound {
            kind: kind.into(),
            schema: schema.to_string(),
            name: name.to_string(),
        }
    }

    /// NotFoundエラーかどうか
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

/// データベースクライアントエラー
///
/// プロファイル解決と接続確立時に発生するエラーを表現します。
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// 未対応のクライアント種別が指定された
    #[error("Unsupported database client type: {0}")]
    UnsupportedKind(String),

    /// プロファイルが設定ファイルに存在しない
    #[error("Profile '{0}' not found in configuration")]
    ProfileNotFound(String),

    /// 接続エラー
    #[error("{message}: {cause}")]
    Connection {
        /// エラーメッセージ
        message: String,
        /// 原因
        cause: String,
    },
}

impl ClientError {
    /// 未対応種別エラーかどうか
    pub fn is_unsupported_kind(&self) -> bool {
        matches!(self, ClientError::UnsupportedKind(_))
    }
}
