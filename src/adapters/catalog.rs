// バージョン対応カタログリーダー
//
// データベースのシステムカタログからオブジェクト記述子・カラム・制約・
// パラメータを取得します。バージョンに依存するカラムの有無は、メジャー
// バージョンから一度だけ導出されるケイパビリティ表で切り替えます。
// カタログビューはパブリックシノニム経由の非修飾名で参照します。

use crate::core::descriptors::{
    ColumnDescriptor, KeyConstraint, ObjectDescriptor, ObjectKind, ParameterDescriptor,
    VersionInfo,
};
use crate::core::error::CatalogError;
use crate::services::cds_format::CatalogLookup;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{AnyPool, Row};
use tokio::sync::OnceCell;
use tracing::debug;

/// バージョン由来のカタログケイパビリティ
///
/// 2系統のSQLテキストを手書きで維持する代わりに、カラムの有無を
/// この表に集約します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCapabilities {
    /// オブジェクトカタログにCREATE_TIMEカラムが存在する
    pub has_create_time: bool,
    /// レポーティングビューカタログ（計算ビュー検出）が利用できる
    pub has_calc_view_catalog: bool,
}

impl CatalogCapabilities {
    /// バージョン情報からケイパビリティを導出
    pub fn from_version(version: &VersionInfo) -> Self {
        let modern = version.major >= 2;
        Self {
            has_create_time: modern,
            has_calc_view_catalog: modern,
        }
    }
}

/// カタログリーダー
///
/// バージョン照会はリーダーの生存期間中1回だけ実行され、キャッシュ
/// されます。リーダーは変換リクエストごとに作成される想定です。
pub struct CatalogReader {
    pool: AnyPool,
    version: OnceCell<VersionInfo>,
}

impl CatalogReader {
    /// 新しいCatalogReaderを作成
    pub fn new(pool: AnyPool) -> Self {
        Self {
            pool,
            version: OnceCell::new(),
        }
    }

    /// 接続プールへの参照を取得
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// データベースバージョンを取得（キャッシュ付き）
    pub async fn version(&self) -> Result<VersionInfo> {
        let version = self
            .version
            .get_or_try_init(|| async {
                let row = sqlx::query("SELECT VERSION FROM M_DATABASE")
                    .fetch_optional(&self.pool)
                    .await?;
                let row = row.ok_or(CatalogError::VersionUnavailable)?;
                let raw: String = row.get(0);
                Ok::<VersionInfo, anyhow::Error>(VersionInfo::from_raw(raw))
            })
            .await?;
        Ok(version.clone())
    }

    /// バージョンキャッシュを破棄して再照会を強制
    pub fn refresh_version(&mut self) {
        let _ = self.version.take();
    }

    /// カタログケイパビリティを取得
    pub async fn capabilities(&self) -> Result<CatalogCapabilities> {
        let version = self.version().await?;
        Ok(CatalogCapabilities::from_version(&version))
    }

    // =========================================================================
    // オブジェクト記述子
    // =========================================================================

    /// テーブル記述子を取得
    ///
    /// 該当するテーブルが存在しない場合はNotFoundエラーになります。
    pub async fn get_table(&self, schema: &str, table: &str) -> Result<Vec<ObjectDescriptor>> {
        let caps = self.capabilities().await?;
        let sql = format!(
            "SELECT SCHEMA_NAME, TABLE_NAME, TABLE_OID, COMMENTS, HAS_PRIMARY_KEY{} \
             FROM TABLES WHERE SCHEMA_NAME = ? AND TABLE_NAME = ?",
            create_time_column(caps)
        );

        let rows = sqlx::query(&sql)
            .bind(schema)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;

        if rows.is_empty() {
            return Err(CatalogError::not_found(ObjectKind::Table.to_string(), schema, table).into());
        }

        let descriptors = rows
            .iter()
            .map(|row| ObjectDescriptor {
                schema_name: row.get(0),
                object_name: row.get(1),
                object_oid: row.get(2),
                comments: row.get(3),
                has_primary_key: row.get::<String, _>(4) == "TRUE",
                is_valid: true,
                create_time: if caps.has_create_time { row.get(5) } else { None },
            })
            .collect();

        Ok(descriptors)
    }

    /// ビュー記述子を取得
    pub async fn get_view(&self, schema: &str, view: &str) -> Result<Vec<ObjectDescriptor>> {
        let caps = self.capabilities().await?;
        let sql = format!(
            "SELECT SCHEMA_NAME, VIEW_NAME, VIEW_OID, COMMENTS, IS_VALID{} \
             FROM VIEWS WHERE SCHEMA_NAME = ? AND VIEW_NAME = ?",
            create_time_column(caps)
        );

        let rows = sqlx::query(&sql)
            .bind(schema)
            .bind(view)
            .fetch_all(&self.pool)
            .await?;

        if rows.is_empty() {
            return Err(CatalogError::not_found(ObjectKind::View.to_string(), schema, view).into());
        }

        let descriptors = rows
            .iter()
            .map(|row| ObjectDescriptor {
                schema_name: row.get(0),
                object_name: row.get(1),
                object_oid: row.get(2),
                comments: row.get(3),
                has_primary_key: false,
                is_valid: row.get::<String, _>(4) == "TRUE",
                create_time: if caps.has_create_time { row.get(5) } else { None },
            })
            .collect();

        Ok(descriptors)
    }

    /// プロシージャ記述子を取得
    pub async fn get_procedure(
        &self,
        schema: &str,
        procedure: &str,
    ) -> Result<Vec<ObjectDescriptor>> {
        let caps = self.capabilities().await?;
        let sql = format!(
            "SELECT SCHEMA_NAME, PROCEDURE_NAME, PROCEDURE_OID, IS_VALID{} \
             FROM PROCEDURES WHERE SCHEMA_NAME = ? AND PROCEDURE_NAME = ?",
            create_time_column(caps)
        );

        let rows = sqlx::query(&sql)
            .bind(schema)
            .bind(procedure)
            .fetch_all(&self.pool)
            .await?;

        if rows.is_empty() {
            return Err(
                CatalogError::not_found(ObjectKind::Procedure.to_string(), schema, procedure)
                    .into(),
            );
        }

        let descriptors = rows
            .iter()
            .map(|row| ObjectDescriptor {
                schema_name: row.get(0),
                object_name: row.get(1),
                object_oid: row.get(2),
                comments: None,
                has_primary_key: false,
                is_valid: row.get::<String, _>(3) == "TRUE",
                create_time: if caps.has_create_time { row.get(4) } else { None },
            })
            .collect();

        Ok(descriptors)
    }

    /// 関数記述子を取得
    pub async fn get_function(&self, schema: &str, function: &str) -> Result<Vec<ObjectDescriptor>> {
        let caps = self.capabilities().await?;
        let sql = format!(
            "SELECT SCHEMA_NAME, FUNCTION_NAME, FUNCTION_OID, IS_VALID{} \
             FROM FUNCTIONS WHERE SCHEMA_NAME = ? AND FUNCTION_NAME = ?",
            create_time_column(caps)
        );

        let rows = sqlx::query(&sql)
            .bind(schema)
            .bind(function)
            .fetch_all(&self.pool)
            .await?;

        if rows.is_empty() {
            return Err(
                CatalogError::not_found(ObjectKind::Function.to_string(), schema, function).into(),
            );
        }

        let descriptors = rows
            .iter()
            .map(|row| ObjectDescriptor {
                schema_name: row.get(0),
                object_name: row.get(1),
                object_oid: row.get(2),
                comments: None,
                has_primary_key: false,
                is_valid: row.get::<String, _>(3) == "TRUE",
                create_time: if caps.has_create_time { row.get(4) } else { None },
            })
            .collect();

        Ok(descriptors)
    }

    // =========================================================================
    // カラムとパラメータ
    // =========================================================================

    /// テーブルのカラムを取得
    ///
    /// カラムが0件でもエラーにしません。
    pub async fn get_table_fields(&self, oid: i64) -> Result<Vec<ColumnDescriptor>> {
        let sql = "SELECT COLUMN_NAME, POSITION, DATA_TYPE_NAME, LENGTH, SCALE, IS_NULLABLE, \
                   DEFAULT_VALUE, COMMENTS \
                   FROM TABLE_COLUMNS WHERE TABLE_OID = ? ORDER BY POSITION";

        let rows = sqlx::query(sql).bind(oid).fetch_all(&self.pool).await?;

        Ok(rows
            .iter()
            .map(|row| ColumnDescriptor {
                column_name: row.get(0),
                position: row.get(1),
                data_type_name: row.get(2),
                length: row.get(3),
                scale: row.get(4),
                is_nullable: row.get::<String, _>(5) == "TRUE",
                default_value: row.get(6),
                comments: row.get(7),
                // テーブルのキー判定は制約結合で行う
                is_key: false,
            })
            .collect())
    }

    /// ビューのカラムを取得
    ///
    /// ビューはキーフラグをカタログ行で直接保持します。
    pub async fn get_view_fields(&self, oid: i64) -> Result<Vec<ColumnDescriptor>> {
        let sql = "SELECT COLUMN_NAME, POSITION, DATA_TYPE_NAME, LENGTH, SCALE, IS_NULLABLE, \
                   DEFAULT_VALUE, COMMENTS, IS_KEY \
                   FROM VIEW_COLUMNS WHERE VIEW_OID = ? ORDER BY POSITION";

        let rows = sqlx::query(sql).bind(oid).fetch_all(&self.pool).await?;

        Ok(rows
            .iter()
            .map(|row| ColumnDescriptor {
                column_name: row.get(0),
                position: row.get(1),
                data_type_name: row.get(2),
                length: row.get(3),
                scale: row.get(4),
                is_nullable: row.get::<String, _>(5) == "TRUE",
                default_value: row.get(6),
                comments: row.get(7),
                is_key: row.get::<Option<String>, _>(8).as_deref() == Some("TRUE"),
            })
            .collect())
    }

    /// テーブルのプライマリキー制約を取得
    pub async fn get_table_constraints(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<KeyConstraint>> {
        let sql = "SELECT COLUMN_NAME FROM CONSTRAINTS \
                   WHERE SCHEMA_NAME = ? AND TABLE_NAME = ? AND IS_PRIMARY_KEY = 'TRUE' \
                   ORDER BY POSITION";

        let rows = sqlx::query(sql)
            .bind(schema)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| KeyConstraint {
                column_name: row.get(0),
            })
            .collect())
    }

    /// ビューの入力パラメータを取得（計算ビュー用）
    pub async fn get_view_parameters(&self, oid: i64) -> Result<Vec<ParameterDescriptor>> {
        self.get_parameters("VIEW_PARAMETERS", "VIEW_OID", oid).await
    }

    /// プロシージャのパラメータを取得
    pub async fn get_procedure_parameters(&self, oid: i64) -> Result<Vec<ParameterDescriptor>> {
        self.get_parameters("PROCEDURE_PARAMETERS", "PROCEDURE_OID", oid)
            .await
    }

    /// 関数のパラメータを取得
    pub async fn get_function_parameters(&self, oid: i64) -> Result<Vec<ParameterDescriptor>> {
        self.get_parameters("FUNCTION_PARAMETERS", "FUNCTION_OID", oid)
            .await
    }

    /// パラメータカタログの共通取得処理
    ///
    /// パラメータが0件でもエラーにしません（パラメータなしのビューは正当）。
    async fn get_parameters(
        &self,
        catalog: &str,
        oid_column: &str,
        oid: i64,
    ) -> Result<Vec<ParameterDescriptor>> {
        let sql = format!(
            "SELECT PARAMETER_NAME, DATA_TYPE_NAME, LENGTH, SCALE, POSITION \
             FROM {} WHERE {} = ? ORDER BY POSITION",
            catalog, oid_column
        );

        let rows = sqlx::query(&sql).bind(oid).fetch_all(&self.pool).await?;

        Ok(rows
            .iter()
            .map(|row| ParameterDescriptor {
                parameter_name: row.get(0),
                data_type_name: row.get(1),
                length: row.get(2),
                scale: row.get(3),
                position: row.get(4),
            })
            .collect())
    }

    // =========================================================================
    // 計算ビュー検出とジオメトリ
    // =========================================================================

    /// ビューが計算ビューかどうか
    ///
    /// レポーティングビューカタログに対する2段階照合（修飾名→素のビュー名）
    /// を行います。判定不能の場合もエラーにせずfalseを返します。
    pub async fn is_calculation_view(&self, schema: &str, view: &str) -> bool {
        let caps = match self.capabilities().await {
            Ok(caps) => caps,
            Err(e) => {
                debug!("calculation view check skipped: {}", e);
                return false;
            }
        };
        if !caps.has_calc_view_catalog {
            return false;
        }

        // 第1段階: 修飾名で照合
        let qualified = format!("{}/{}", schema, view);
        match self.count_cubes("QUALIFIED_NAME", &qualified).await {
            Ok(count) if count > 0 => return true,
            Ok(_) => {}
            Err(e) => {
                debug!("calculation view lookup failed: {}", e);
                return false;
            }
        }

        // 第2段階: 素のビュー名へフォールバック
        match self.count_cubes("CUBE_NAME", view).await {
            Ok(count) => count > 0,
            Err(e) => {
                debug!("calculation view lookup failed: {}", e);
                false
            }
        }
    }

    /// レポーティングビューカタログの照合行数を取得
    async fn count_cubes(&self, column: &str, value: &str) -> Result<usize> {
        let sql = format!("SELECT CUBE_NAME FROM BIMC_ALL_CUBES WHERE {} = ?", column);
        let rows = sqlx::query(&sql).bind(value).fetch_all(&self.pool).await?;
        Ok(rows.len())
    }

    /// ジオメトリカラムのSRS識別子を取得
    ///
    /// (スキーマ, オブジェクト名, カラム名) でちょうど1行が登録されている
    /// ことを前提とします。未登録のカラムではエラーになります。
    pub async fn get_geo_srs_id(&self, schema: &str, object: &str, column: &str) -> Result<String> {
        let sql = "SELECT SRS_ID FROM ST_GEOMETRY_COLUMNS \
                   WHERE SCHEMA_NAME = ? AND TABLE_NAME = ? AND COLUMN_NAME = ?";

        let row = sqlx::query(sql)
            .bind(schema)
            .bind(object)
            .bind(column)
            .fetch_one(&self.pool)
            .await?;

        let srs_id: i64 = row.get(0);
        Ok(srs_id.to_string())
    }

    // =========================================================================
    // ベンダー固有型の除去（ベストエフォート）
    // =========================================================================

    /// 生DDLからカラムストア型トークンを除去
    ///
    /// DATA_TYPESカタログは一部のデプロイメントターゲットに存在しないため、
    /// 照会に失敗した場合は入力をそのまま返します。
    pub async fn remove_cs_types(&self, raw_definition: &str) -> String {
        let rows = match sqlx::query("SELECT TYPE_NAME FROM DATA_TYPES")
            .fetch_all(&self.pool)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                debug!("column store type cleanup skipped: {}", e);
                return raw_definition.to_string();
            }
        };

        let mut cleaned = raw_definition.to_string();
        for row in rows {
            let type_name: String = row.get(0);
            cleaned = cleaned.replace(&format!(" CS_{}", type_name), "");
        }
        cleaned
    }
}

/// ケイパビリティに応じたCREATE_TIMEカラムの選択句
fn create_time_column(caps: CatalogCapabilities) -> &'static str {
    if caps.has_create_time {
        ", CREATE_TIME"
    } else {
        ""
    }
}

#[async_trait]
impl CatalogLookup for CatalogReader {
    async fn srs_id(&self, schema: &str, object: &str, column: &str) -> Result<String> {
        self.get_geo_srs_id(schema, object, column).await
    }

    async fn is_calculation_view(&self, schema: &str, view: &str) -> bool {
        CatalogReader::is_calculation_view(self, schema, view).await
    }
}
