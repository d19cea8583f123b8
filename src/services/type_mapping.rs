// 型マッピング
//
// HANAカタログのネイティブ型名をCDS型文字列へ変換します。
// 2つの型ボキャブラリ（標準CDS型とHANA固有型）を提供し、
// ジオメトリカラムはSRS識別子付きのHANA固有型に固定されます。
// 純粋関数であり、I/Oを行いません。

/// 未対応型のセンチネルプレフィックス
///
/// 未知のネイティブ型はエラーにせず、このセンチネル文字列を返します。
/// 1カラムの変換失敗がオブジェクト全体の変換を中断しないためです。
pub const UNSUPPORTED_PREFIX: &str = "**UNSUPPORTED TYPE -";

/// ジオメトリ型かどうか
///
/// SRS識別子の事前解決が必要な型を判定します。
pub fn is_geometry_type(native_type: &str) -> bool {
    matches!(native_type, "ST_POINT" | "ST_GEOMETRY")
}

/// ネイティブ型名をCDS型文字列へ変換
///
/// # Arguments
/// * `native_type` - カタログから取得したネイティブ型名
/// * `length` - 長さ（文字/バイナリ型、DECIMALの精度）
/// * `scale` - スケール（DECIMALの小数点以下桁数）
/// * `hana_types` - HANA固有型ボキャブラリを使用する
/// * `srs_id` - ジオメトリカラムのSRS識別子
///
/// # Returns
/// CDS型文字列。未知の型はセンチネル文字列（エラーにしない）。
pub fn map_type(
    native_type: &str,
    length: Option<i64>,
    scale: Option<i64>,
    hana_types: bool,
    srs_id: Option<&str>,
) -> String {
    // ジオメトリはボキャブラリ設定に関係なく常にHANA固有型で出力する
    if let Some(srs) = srs_id {
        return format!("hana.{}({})", native_type, srs);
    }

    // HANA固有型ボキャブラリは固定のサブセットのみを上書きし、
    // 残りは標準ボキャブラリを共有する
    if hana_types {
        if let Some(mapped) = map_hana_override(native_type, length) {
            return mapped;
        }
    }

    map_default(native_type, length, scale)
}

/// HANA固有型ボキャブラリの上書き対象
///
/// 小整数、小数、固定長文字/バイナリ型のみが対象です。
fn map_hana_override(native_type: &str, length: Option<i64>) -> Option<String> {
    let mapped = match native_type {
        "TINYINT" => "hana.TINYINT".to_string(),
        "SMALLINT" => "hana.SMALLINT".to_string(),
        "SMALLDECIMAL" => "hana.SMALLDECIMAL".to_string(),
        "REAL" => "hana.REAL".to_string(),
        "CHAR" => with_length("hana.CHAR", length),
        "NCHAR" => with_length("hana.NCHAR", length),
        "VARCHAR" => with_length("hana.VARCHAR", length),
        "CLOB" => "hana.CLOB".to_string(),
        "BINARY" => with_length("hana.BINARY", length),
        _ => return None,
    };
    Some(mapped)
}

/// 標準ボキャブラリのマッピング
fn map_default(native_type: &str, length: Option<i64>, scale: Option<i64>) -> String {
    match native_type {
        "NVARCHAR" | "VARCHAR" | "NCHAR" | "CHAR" | "ALPHANUM" | "SHORTTEXT" => {
            with_length("String", length)
        }
        "TINYINT" | "SMALLINT" | "INTEGER" => "Integer".to_string(),
        "BIGINT" => "Integer64".to_string(),
        "DECIMAL" => match (length, scale) {
            (Some(precision), Some(scale)) => format!("Decimal({}, {})", precision, scale),
            (Some(precision), None) => format!("Decimal({})", precision),
            _ => "Decimal".to_string(),
        },
        "SMALLDECIMAL" => "Decimal".to_string(),
        "REAL" | "DOUBLE" => "Double".to_string(),
        "DATE" | "DAYDATE" => "Date".to_string(),
        "TIME" | "SECONDTIME" => "Time".to_string(),
        "TIMESTAMP" | "LONGDATE" => "Timestamp".to_string(),
        "SECONDDATE" => "DateTime".to_string(),
        "BOOLEAN" => "Boolean".to_string(),
        "VARBINARY" | "BINARY" => with_length("Binary", length),
        "BLOB" => "LargeBinary".to_string(),
        "CLOB" | "NCLOB" | "TEXT" | "BINTEXT" => "LargeString".to_string(),
        // SRS未解決のままジオメトリ型が来た場合のフォールバック
        "ST_POINT" | "ST_GEOMETRY" => format!("hana.{}", native_type),
        "REAL_VECTOR" => match length {
            Some(dimension) => format!("Vector({})", dimension),
            None => "Vector".to_string(),
        },
        other => format!("{} {}", UNSUPPORTED_PREFIX, other),
    }
}

/// 長さパラメータ付きの型をレンダリング
fn with_length(base: &str, length: Option<i64>) -> String {
    match length {
        Some(length) => format!("{}({})", base, length),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // 標準ボキャブラリ
    // =========================================================================

    #[test]
    fn test_default_string_types() {
        assert_eq!(map_type("NVARCHAR", Some(100), None, false, None), "String(100)");
        assert_eq!(map_type("VARCHAR", Some(50), None, false, None), "String(50)");
        assert_eq!(map_type("NCHAR", Some(4), None, false, None), "String(4)");
        assert_eq!(map_type("CHAR", Some(2), None, false, None), "String(2)");
        assert_eq!(map_type("ALPHANUM", Some(8), None, false, None), "String(8)");
        assert_eq!(map_type("SHORTTEXT", Some(200), None, false, None), "String(200)");
    }

    #[test]
    fn test_default_integer_types() {
        assert_eq!(map_type("TINYINT", None, None, false, None), "Integer");
        assert_eq!(map_type("SMALLINT", None, None, false, None), "Integer");
        assert_eq!(map_type("INTEGER", None, None, false, None), "Integer");
        assert_eq!(map_type("BIGINT", None, None, false, None), "Integer64");
    }

    #[test]
    fn test_decimal_with_and_without_scale() {
        assert_eq!(map_type("DECIMAL", Some(10), Some(2), false, None), "Decimal(10, 2)");
        assert_eq!(map_type("DECIMAL", Some(10), None, false, None), "Decimal(10)");
        assert_eq!(map_type("DECIMAL", None, None, false, None), "Decimal");
        assert_eq!(map_type("SMALLDECIMAL", None, None, false, None), "Decimal");
    }

    #[test]
    fn test_default_floating_types() {
        assert_eq!(map_type("REAL", None, None, false, None), "Double");
        assert_eq!(map_type("DOUBLE", None, None, false, None), "Double");
    }

    #[test]
    fn test_temporal_types() {
        assert_eq!(map_type("DATE", None, None, false, None), "Date");
        assert_eq!(map_type("DAYDATE", None, None, false, None), "Date");
        assert_eq!(map_type("TIME", None, None, false, None), "Time");
        assert_eq!(map_type("SECONDTIME", None, None, false, None), "Time");
        assert_eq!(map_type("TIMESTAMP", None, None, false, None), "Timestamp");
        assert_eq!(map_type("LONGDATE", None, None, false, None), "Timestamp");
        assert_eq!(map_type("SECONDDATE", None, None, false, None), "DateTime");
    }

    #[test]
    fn test_boolean_binary_lob_types() {
        assert_eq!(map_type("BOOLEAN", None, None, false, None), "Boolean");
        assert_eq!(map_type("VARBINARY", Some(16), None, false, None), "Binary(16)");
        assert_eq!(map_type("BINARY", Some(16), None, false, None), "Binary(16)");
        assert_eq!(map_type("BLOB", None, None, false, None), "LargeBinary");
        assert_eq!(map_type("CLOB", None, None, false, None), "LargeString");
        assert_eq!(map_type("NCLOB", None, None, false, None), "LargeString");
        assert_eq!(map_type("TEXT", None, None, false, None), "LargeString");
        assert_eq!(map_type("BINTEXT", None, None, false, None), "LargeString");
    }

    #[test]
    fn test_vector_type() {
        assert_eq!(map_type("REAL_VECTOR", Some(768), None, false, None), "Vector(768)");
        assert_eq!(map_type("REAL_VECTOR", None, None, false, None), "Vector");
    }

    // =========================================================================
    // HANA固有型ボキャブラリ
    // =========================================================================

    #[test]
    fn test_hana_vocabulary_overrides() {
        assert_eq!(map_type("TINYINT", None, None, true, None), "hana.TINYINT");
        assert_eq!(map_type("SMALLINT", None, None, true, None), "hana.SMALLINT");
        assert_eq!(map_type("SMALLDECIMAL", None, None, true, None), "hana.SMALLDECIMAL");
        assert_eq!(map_type("REAL", None, None, true, None), "hana.REAL");
        assert_eq!(map_type("CHAR", Some(2), None, true, None), "hana.CHAR(2)");
        assert_eq!(map_type("NCHAR", Some(4), None, true, None), "hana.NCHAR(4)");
        assert_eq!(map_type("VARCHAR", Some(50), None, true, None), "hana.VARCHAR(50)");
        assert_eq!(map_type("CLOB", None, None, true, None), "hana.CLOB");
        assert_eq!(map_type("BINARY", Some(16), None, true, None), "hana.BINARY(16)");
    }

    #[test]
    fn test_hana_vocabulary_shares_remaining_mappings() {
        // 上書き対象外の型は標準ボキャブラリと同じマッピングを共有する
        assert_eq!(map_type("NVARCHAR", Some(100), None, true, None), "String(100)");
        assert_eq!(map_type("INTEGER", None, None, true, None), "Integer");
        assert_eq!(map_type("BIGINT", None, None, true, None), "Integer64");
        assert_eq!(map_type("DECIMAL", Some(10), Some(2), true, None), "Decimal(10, 2)");
        assert_eq!(map_type("TIMESTAMP", None, None, true, None), "Timestamp");
        assert_eq!(map_type("BOOLEAN", None, None, true, None), "Boolean");
        assert_eq!(map_type("BLOB", None, None, true, None), "LargeBinary");
        assert_eq!(map_type("REAL_VECTOR", Some(768), None, true, None), "Vector(768)");
    }

    // =========================================================================
    // ジオメトリ
    // =========================================================================

    #[test]
    fn test_geometry_override_ignores_vocabulary() {
        assert_eq!(
            map_type("ST_POINT", None, None, false, Some("4326")),
            "hana.ST_POINT(4326)"
        );
        assert_eq!(
            map_type("ST_POINT", None, None, true, Some("4326")),
            "hana.ST_POINT(4326)"
        );
        assert_eq!(
            map_type("ST_GEOMETRY", None, None, false, Some("0")),
            "hana.ST_GEOMETRY(0)"
        );
    }

    #[test]
    fn test_geometry_without_srs_falls_back() {
        assert_eq!(map_type("ST_POINT", None, None, false, None), "hana.ST_POINT");
        assert_eq!(map_type("ST_GEOMETRY", None, None, true, None), "hana.ST_GEOMETRY");
    }

    #[test]
    fn test_is_geometry_type() {
        assert!(is_geometry_type("ST_POINT"));
        assert!(is_geometry_type("ST_GEOMETRY"));
        assert!(!is_geometry_type("NVARCHAR"));
    }

    // =========================================================================
    // 未対応型と冪等性
    // =========================================================================

    #[test]
    fn test_unsupported_type_sentinel() {
        let mapped = map_type("ARRAY", None, None, false, None);
        assert_eq!(mapped, "**UNSUPPORTED TYPE - ARRAY");
        assert!(mapped.starts_with(UNSUPPORTED_PREFIX));

        // どちらのボキャブラリでもセンチネルを返し、決して失敗しない
        let mapped = map_type("ARRAY", None, None, true, None);
        assert!(mapped.starts_with(UNSUPPORTED_PREFIX));
    }

    #[test]
    fn test_map_type_is_idempotent() {
        let first = map_type("DECIMAL", Some(10), Some(2), true, None);
        let second = map_type("DECIMAL", Some(10), Some(2), true, None);
        assert_eq!(first, second);
    }
}
