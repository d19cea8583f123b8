// ストレージ拡張句の分離
//
// 生のDDLテキストからストレージエンジン固有の句（アンロード優先度、
// マージポリシー、グルーピング、パーティショニング）をパターンマッチで
// 抽出し、正規化スキーマ言語では表現できない句をエスケープ付き
// パススルーブロックとして出力テキストへ再埋め込みします。

use regex::Regex;
use std::sync::OnceLock;

/// ストレージ拡張句の抽出パターン
fn extension_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"UNLOAD PRIORITY \d+",
            r"(?:NO )?AUTO MERGE",
            r#"GROUP TYPE "?\w+"?"#,
            r#"GROUP SUBTYPE "?\w+"?"#,
            r#"GROUP NAME "?\w+"?"#,
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("invalid extension pattern"))
        .collect()
    })
}

/// パーティション句を抽出
///
/// PARTITION BY の開始位置から次のステートメント終端までを切り出します。
/// 終端がない場合は末尾までを句とみなします。
fn find_partition_clause(raw_definition: &str) -> Option<&str> {
    let start = raw_definition.find("PARTITION BY")?;
    let rest = &raw_definition[start..];
    let clause = match rest.find(';') {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(clause.trim_end())
}

/// ストレージ拡張句を分離してパススルーブロックを付加
///
/// # Arguments
/// * `raw_definition` - オブジェクトの生DDLテキスト
/// * `output` - ここまでに蓄積された正規化スキーマテキスト
///
/// # Returns
/// 拡張句が見つかった場合はパススルーブロックを付加したテキスト、
/// 見つからなければ入力のまま。パーティション句だけが存在する場合は
/// 何も出力しません（マッチした拡張句がある場合にのみブロックを生成）。
pub fn split_storage_extensions(raw_definition: &str, output: String) -> String {
    let extended: Vec<&str> = extension_patterns()
        .iter()
        .filter_map(|pattern| pattern.find(raw_definition).map(|m| m.as_str()))
        .collect();

    let partition = find_partition_clause(raw_definition);

    if extended.is_empty() {
        return output;
    }

    let mut augmented = output;
    augmented.push_str("\n@sql.append: ```sql\n");
    for clause in extended {
        augmented.push_str(clause);
        augmented.push('\n');
    }
    if let Some(clause) = partition {
        augmented.push_str(clause);
        augmented.push('\n');
    }
    augmented.push_str("```\n");
    augmented
}
