// massConvertコマンドハンドラー
//
// マスコンバートオーケストレーターをプログレスバー付きで実行します。
// バッチ中のエラーはここで一度だけ捕捉し、ログ出力とシンクへの
// エラーメッセージ配信を行ってから呼び出し元へ返します。

use crate::cli::command_context::CommandContext;
use crate::core::context::{ConversionContext, FormatOptions};
use crate::services::mass_convert::{MassConvertRequest, MassConverter};
use crate::services::progress::{ConsoleProgress, ProgressSink};
use anyhow::Result;
use std::path::PathBuf;
use tracing::error;

/// massConvertコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct MassConvertCommand {
    /// 設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// プロファイル名
    pub profile: Option<String>,
    /// 変換リクエスト
    pub request: MassConvertRequest,
    /// 整形オプション
    pub options: FormatOptions,
}

/// massConvertコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct MassConvertCommandHandler {}

impl MassConvertCommandHandler {
    /// 新しいMassConvertCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// massConvertコマンドを実行
    pub async fn execute(&self, command: &MassConvertCommand) -> Result<String> {
        let context = CommandContext::load(
            command.config_path.as_deref(),
            command.profile.clone(),
        )?;
        let mut client = context.connect_client().await?;

        let mut ctx = ConversionContext::new(command.options);
        let converter = MassConverter::new(command.request.clone());
        let sink = ConsoleProgress::new();

        let result = converter.convert(client.as_ref(), &mut ctx, &sink).await;
        sink.finish();

        client.disconnect().await?;

        match result {
            Ok(path) => Ok(format!(
                "=== Mass Convert Complete ===\n\nOutput: {:?}\nRenamed columns: {}\nSynonyms: {}\n",
                path,
                ctx.renames().len(),
                ctx.synonyms().len()
            )),
            Err(e) => {
                // バッチはここで再開しない。エラーはシンクへも配信する
                error!("mass convert aborted: {:#}", e);
                sink.broadcast(&format!("Error: {:#}", e), None);
                Err(e)
            }
        }
    }
}

/// CLIフラグから整形オプションを構築
pub fn format_options(
    hana_types: bool,
    keep_path: bool,
    no_colons: bool,
    use_exists: bool,
    quoted: bool,
) -> FormatOptions {
    FormatOptions {
        use_hana_types: hana_types,
        keep_path,
        no_colons,
        use_exists,
        use_quoted: quoted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_options_mapping() {
        let options = format_options(true, false, true, false, true);
        assert!(options.use_hana_types);
        assert!(!options.keep_path);
        assert!(options.no_colons);
        assert!(!options.use_exists);
        assert!(options.use_quoted);
    }

    #[test]
    fn test_new_handler() {
        let handler = MassConvertCommandHandler::new();
        assert!(format!("{:?}", handler).contains("MassConvertCommandHandler"));
    }
}
