// コマンド実行コンテキスト
//
// 各コマンドハンドラーで共通となる、プロファイル設定の読み込みと
// クライアントの解決・接続をまとめます。

use crate::adapters::client::{new_client, DatabaseClient};
use crate::core::config::Profiles;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// コマンド実行コンテキスト
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// 読み込んだプロファイルストア
    pub profiles: Profiles,
    /// 使用するプロファイル名（未指定時はデフォルトプロファイル）
    pub profile: Option<String>,
}

impl CommandContext {
    /// 設定ファイルを読み込んでコンテキストを作成
    ///
    /// # Arguments
    /// * `config_path` - 設定ファイルパス（未指定時はカレントディレクトリの既定パス）
    /// * `profile` - プロファイル名
    pub fn load(config_path: Option<&Path>, profile: Option<String>) -> Result<Self> {
        let path: PathBuf = match config_path {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(Profiles::DEFAULT_CONFIG_PATH),
        };

        if !path.exists() {
            anyhow::bail!(
                "Config file not found: {:?}. Please create a profile file first.",
                path
            );
        }

        let profiles =
            Profiles::from_file(&path).with_context(|| "Failed to read config file")?;
        profiles.validate()?;

        Ok(Self { profiles, profile })
    }

    /// クライアントを解決して接続する
    pub async fn connect_client(&self) -> Result<Box<dyn DatabaseClient>> {
        let mut client = new_client(self.profile.as_deref(), &self.profiles)?;
        client
            .connect()
            .await
            .with_context(|| "Failed to connect to database")?;
        Ok(client)
    }
}
