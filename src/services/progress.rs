// 進捗通知
//
// マスコンバートの進捗をリモートオブザーバー（UIなど）へプッシュ配信
// するためのシンク抽象化。配信はfire-and-forgetで、配信失敗が変換を
// 中断することはありません。シンク未指定はすべてno-opになります。

use indicatif::{ProgressBar, ProgressStyle};

/// 進捗シンク
///
/// 確認応答のないプッシュ型ブロードキャスト。実装は送信エラーを
/// 内部で握りつぶす必要があります。
pub trait ProgressSink: Send + Sync {
    /// 進捗メッセージを配信
    ///
    /// # Arguments
    /// * `message` - 処理中のオブジェクト名などの表示テキスト
    /// * `percent` - 進捗率（0〜100）。不明な場合はNone
    fn broadcast(&self, message: &str, percent: Option<f64>);
}

/// 何もしないシンク
///
/// シンクが提供されない呼び出し経路で使用します。
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn broadcast(&self, _message: &str, _percent: Option<f64>) {}
}

/// ターミナル用プログレスバーシンク
///
/// indicatifのプログレスバーへ進捗を反映します。
pub struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    /// 新しいConsoleProgressを作成
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self { bar }
    }

    /// バーを完了状態にする
    pub fn finish(&self) {
        self.bar.finish();
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ConsoleProgress {
    fn broadcast(&self, message: &str, percent: Option<f64>) {
        if let Some(percent) = percent {
            self.bar.set_position(percent.round() as u64);
        }
        self.bar.set_message(message.to_string());
    }
}
