// CDS整形の統合テスト
//
// カタログ側参照をスタブに差し替えて、整形アルゴリズム全体
// （サニタイズ、キー結合、デフォルト値、タイトル注釈、
// リネーム相互参照、シノニム登録）を検証します。

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use hanascope::core::context::{ConversionContext, FormatOptions, RenderContext};
use hanascope::core::descriptors::{
    ColumnDescriptor, KeyConstraint, ObjectDescriptor, ObjectKind, ParameterDescriptor,
};
use hanascope::services::cds_format::{CatalogLookup, CdsFormatter};

/// カタログ側参照のスタブ
struct StubLookup {
    srs_id: Option<String>,
    calc_view: bool,
}

impl StubLookup {
    fn plain() -> Self {
        Self {
            srs_id: None,
            calc_view: false,
        }
    }
}

#[async_trait]
impl CatalogLookup for StubLookup {
    async fn srs_id(&self, _schema: &str, _object: &str, _column: &str) -> Result<String> {
        self.srs_id
            .clone()
            .ok_or_else(|| anyhow!("geometry column is not registered"))
    }

    async fn is_calculation_view(&self, _schema: &str, _view: &str) -> bool {
        self.calc_view
    }
}

fn orders_descriptor() -> ObjectDescriptor {
    ObjectDescriptor {
        schema_name: "APP".to_string(),
        object_name: "ORDERS".to_string(),
        object_oid: 1001,
        has_primary_key: true,
        is_valid: true,
        comments: None,
        create_time: Some("2026-01-15 10:00:00".to_string()),
    }
}

fn column(
    name: &str,
    position: i64,
    data_type: &str,
    length: Option<i64>,
    scale: Option<i64>,
    nullable: bool,
) -> ColumnDescriptor {
    ColumnDescriptor {
        column_name: name.to_string(),
        position,
        data_type_name: data_type.to_string(),
        length,
        scale,
        is_nullable: nullable,
        default_value: None,
        comments: None,
        is_key: false,
    }
}

// =============================================================================
// エンドツーエンドシナリオ
// =============================================================================

#[tokio::test]
async fn test_orders_end_to_end_scenario() {
    let fields = vec![
        column("ORDER.ID", 1, "INTEGER", None, None, false),
        column("AMOUNT", 2, "DECIMAL", Some(10), Some(2), true),
    ];
    let constraints = vec![KeyConstraint {
        column_name: "ORDER.ID".to_string(),
    }];

    let mut ctx = ConversionContext::default();
    let formatter = CdsFormatter::new();
    let entity = formatter
        .format(
            &StubLookup::plain(),
            &mut ctx,
            &orders_descriptor(),
            &fields,
            Some(constraints.as_slice()),
            ObjectKind::Table,
            RenderContext::Standard,
            None,
        )
        .await
        .unwrap();

    // エンティティ名と両フィールド
    assert!(entity.contains("entity ORDERS {"));
    assert!(entity.contains("key ORDER_ID : Integer"));
    assert!(entity.contains("AMOUNT : Decimal(10, 2)"));
    assert!(entity.contains("@title : 'AMOUNT'"));

    // キーカラムには not null を重ねて注釈しない
    let key_line = entity
        .lines()
        .find(|line| line.contains("key ORDER_ID"))
        .unwrap();
    assert!(!key_line.contains("not null"));

    // リネーム相互参照にはドットを含むカラムだけが記録される
    assert_eq!(ctx.renames().len(), 1);
    let entry = &ctx.renames()[0];
    assert_eq!(entry.before, "ORDER.ID");
    assert_eq!(entry.after, "ORDER_ID");
    assert_eq!(entry.data_type, "INTEGER");

    // シノニムが登録される
    let synonym = &ctx.synonyms()["ORDERS"];
    assert_eq!(synonym.target.object, "ORDERS");
    assert_eq!(synonym.target.schema, "APP");
}

#[tokio::test]
async fn test_nullable_non_key_column_annotations() {
    let fields = vec![
        column("ID", 1, "INTEGER", None, None, false),
        column("NOTE", 2, "NVARCHAR", Some(100), None, false),
    ];
    let constraints = vec![KeyConstraint {
        column_name: "ID".to_string(),
    }];

    let mut ctx = ConversionContext::default();
    let entity = CdsFormatter::new()
        .format(
            &StubLookup::plain(),
            &mut ctx,
            &orders_descriptor(),
            &fields,
            Some(constraints.as_slice()),
            ObjectKind::Table,
            RenderContext::Standard,
            None,
        )
        .await
        .unwrap();

    // 非キーの非NULLカラムには not null が付く
    let note_line = entity.lines().find(|l| l.contains("NOTE")).unwrap();
    assert!(note_line.contains("not null"));
    assert!(!note_line.contains("key "));
}

// =============================================================================
// 相互参照の蓄積
// =============================================================================

#[tokio::test]
async fn test_cross_reference_accumulates_across_objects() {
    let formatter = CdsFormatter::new();
    let mut ctx = ConversionContext::default();

    let first_fields = vec![column("A.B", 1, "NVARCHAR", Some(10), None, true)];
    formatter
        .format(
            &StubLookup::plain(),
            &mut ctx,
            &orders_descriptor(),
            &first_fields,
            None,
            ObjectKind::Table,
            RenderContext::Standard,
            None,
        )
        .await
        .unwrap();

    let mut second = orders_descriptor();
    second.object_name = "ITEMS".to_string();
    let second_fields = vec![column("A.B", 1, "INTEGER", None, None, true)];
    formatter
        .format(
            &StubLookup::plain(),
            &mut ctx,
            &second,
            &second_fields,
            None,
            ObjectKind::Table,
            RenderContext::Standard,
            None,
        )
        .await
        .unwrap();

    // 両オブジェクトのエントリが呼び出し順で積まれ、削除されない
    assert_eq!(ctx.renames().len(), 2);
    assert_eq!(ctx.renames()[0].data_type, "NVARCHAR");
    assert_eq!(ctx.renames()[1].data_type, "INTEGER");
}

// =============================================================================
// デフォルト値
// =============================================================================

#[tokio::test]
async fn test_boolean_default_encoding() {
    let mut active = column("ACTIVE", 1, "BOOLEAN", None, None, true);
    active.default_value = Some("1".to_string());
    let mut closed = column("CLOSED", 2, "BOOLEAN", None, None, true);
    closed.default_value = Some("0".to_string());
    let mut flagged = column("FLAGGED", 3, "BOOLEAN", None, None, true);
    flagged.default_value = Some("TRUE".to_string());

    let mut ctx = ConversionContext::default();
    let entity = CdsFormatter::new()
        .format(
            &StubLookup::plain(),
            &mut ctx,
            &orders_descriptor(),
            &[active, closed, flagged],
            None,
            ObjectKind::Table,
            RenderContext::Standard,
            None,
        )
        .await
        .unwrap();

    assert!(entity.contains("ACTIVE : Boolean default true"));
    assert!(entity.contains("CLOSED : Boolean default false"));
    // 0/1 以外のエンコード値も false になる
    assert!(entity.contains("FLAGGED : Boolean default false"));
}

#[tokio::test]
async fn test_string_default_is_quoted() {
    let mut status = column("STATUS", 1, "NVARCHAR", Some(20), None, true);
    status.default_value = Some("pending".to_string());

    let mut ctx = ConversionContext::default();
    let entity = CdsFormatter::new()
        .format(
            &StubLookup::plain(),
            &mut ctx,
            &orders_descriptor(),
            &[status],
            None,
            ObjectKind::Table,
            RenderContext::Standard,
            None,
        )
        .await
        .unwrap();

    assert!(entity.contains("default 'pending'"));
}

// =============================================================================
// タイトル注釈
// =============================================================================

#[tokio::test]
async fn test_title_from_comment_escapes_quotes() {
    let mut amount = column("AMOUNT", 1, "DECIMAL", Some(10), Some(2), true);
    amount.comments = Some("Order's amount".to_string());

    let mut ctx = ConversionContext::default();
    let entity = CdsFormatter::new()
        .format(
            &StubLookup::plain(),
            &mut ctx,
            &orders_descriptor(),
            &[amount],
            None,
            ObjectKind::Table,
            RenderContext::Standard,
            None,
        )
        .await
        .unwrap();

    // 単一引用符は二重化される
    assert!(entity.contains("@title : 'Order''s amount'"));
}

// =============================================================================
// ビュー: キーフラグ、計算ビュー注釈、パラメータ
// =============================================================================

#[tokio::test]
async fn test_view_key_flag_and_calcview_annotation() {
    let mut id = column("ID", 1, "INTEGER", None, None, false);
    id.is_key = true;
    let name = column("NAME", 2, "NVARCHAR", Some(50), None, true);

    let mut descriptor = orders_descriptor();
    descriptor.object_name = "CV_ORDERS".to_string();

    let options = FormatOptions {
        use_exists: true,
        ..Default::default()
    };
    let mut ctx = ConversionContext::new(options);
    let lookup = StubLookup {
        srs_id: None,
        calc_view: true,
    };

    let entity = CdsFormatter::new()
        .format(
            &lookup,
            &mut ctx,
            &descriptor,
            &[id, name],
            None,
            ObjectKind::View,
            RenderContext::Standard,
            None,
        )
        .await
        .unwrap();

    assert!(entity.starts_with("@cds.persistence.exists\n@cds.persistence.calcview\n"));
    assert!(entity.contains("key ID : Integer"));
}

#[tokio::test]
async fn test_table_exists_annotation_without_calcview() {
    let options = FormatOptions {
        use_exists: true,
        ..Default::default()
    };
    let mut ctx = ConversionContext::new(options);

    let entity = CdsFormatter::new()
        .format(
            &StubLookup::plain(),
            &mut ctx,
            &orders_descriptor(),
            &[column("ID", 1, "INTEGER", None, None, false)],
            None,
            ObjectKind::Table,
            RenderContext::Standard,
            None,
        )
        .await
        .unwrap();

    assert!(entity.starts_with("@cds.persistence.exists\n"));
    assert!(!entity.contains("calcview"));
}

#[tokio::test]
async fn test_view_parameters_with_preview_timestamp_override() {
    let parameters = vec![
        ParameterDescriptor {
            parameter_name: "IP_FROM".to_string(),
            data_type_name: "TIMESTAMP".to_string(),
            length: None,
            scale: None,
            position: 1,
        },
        ParameterDescriptor {
            parameter_name: "IP_YEAR".to_string(),
            data_type_name: "INTEGER".to_string(),
            length: None,
            scale: None,
            position: 2,
        },
    ];

    let mut descriptor = orders_descriptor();
    descriptor.object_name = "CV_SALES".to_string();

    // Previewコンテキスト: TIMESTAMPパラメータは素のStringになる
    let mut ctx = ConversionContext::default();
    let entity = CdsFormatter::new()
        .format(
            &StubLookup::plain(),
            &mut ctx,
            &descriptor,
            &[column("ID", 1, "INTEGER", None, None, false)],
            None,
            ObjectKind::View,
            RenderContext::Preview,
            Some(parameters.as_slice()),
        )
        .await
        .unwrap();

    assert!(entity.contains("entity CV_SALES(IP_FROM : String, IP_YEAR : Integer) {"));

    // Standardコンテキストでは通常のTimestampのまま
    let mut ctx = ConversionContext::default();
    let entity = CdsFormatter::new()
        .format(
            &StubLookup::plain(),
            &mut ctx,
            &descriptor,
            &[column("ID", 1, "INTEGER", None, None, false)],
            None,
            ObjectKind::View,
            RenderContext::Standard,
            Some(parameters.as_slice()),
        )
        .await
        .unwrap();

    assert!(entity.contains("IP_FROM : Timestamp"));
}

// =============================================================================
// ジオメトリ
// =============================================================================

#[tokio::test]
async fn test_geometry_column_resolves_srs() {
    let location = column("LOCATION", 1, "ST_POINT", None, None, true);

    let lookup = StubLookup {
        srs_id: Some("4326".to_string()),
        calc_view: false,
    };
    let mut ctx = ConversionContext::default();
    let entity = CdsFormatter::new()
        .format(
            &lookup,
            &mut ctx,
            &orders_descriptor(),
            &[location],
            None,
            ObjectKind::Table,
            RenderContext::Standard,
            None,
        )
        .await
        .unwrap();

    assert!(entity.contains("LOCATION : hana.ST_POINT(4326)"));
}

#[tokio::test]
async fn test_unregistered_geometry_column_fails() {
    let location = column("LOCATION", 1, "ST_GEOMETRY", None, None, true);

    let mut ctx = ConversionContext::default();
    let result = CdsFormatter::new()
        .format(
            &StubLookup::plain(),
            &mut ctx,
            &orders_descriptor(),
            &[location],
            None,
            ObjectKind::Table,
            RenderContext::Standard,
            None,
        )
        .await;

    assert!(result.is_err());
}

// =============================================================================
// 名前サニタイズと引用符
// =============================================================================

#[tokio::test]
async fn test_namespaced_entity_name_sanitization() {
    let mut descriptor = orders_descriptor();
    descriptor.object_name = "app::sales.ORDERS".to_string();

    let mut ctx = ConversionContext::default();
    let entity = CdsFormatter::new()
        .format(
            &StubLookup::plain(),
            &mut ctx,
            &descriptor,
            &[column("ID", 1, "INTEGER", None, None, false)],
            None,
            ObjectKind::Table,
            RenderContext::Preview,
            None,
        )
        .await
        .unwrap();

    assert!(entity.contains("entity app_sales_ORDERS {"));
    // シノニムはサニタイズ後の名前で登録され、元の名前を指す
    let synonym = &ctx.synonyms()["app_sales_ORDERS"];
    assert_eq!(synonym.target.object, "app::sales.ORDERS");
}

#[tokio::test]
async fn test_quoted_entity_header() {
    let options = FormatOptions {
        use_quoted: true,
        ..Default::default()
    };
    let mut ctx = ConversionContext::new(options);
    let entity = CdsFormatter::new()
        .format(
            &StubLookup::plain(),
            &mut ctx,
            &orders_descriptor(),
            &[column("ID", 1, "INTEGER", None, None, false)],
            None,
            ObjectKind::Table,
            RenderContext::Standard,
            None,
        )
        .await
        .unwrap();

    assert!(entity.contains("entity ![ORDERS] {"));
}

// =============================================================================
// 未対応型とカラム順
// =============================================================================

#[tokio::test]
async fn test_unsupported_type_does_not_abort_object() {
    let fields = vec![
        column("ID", 1, "INTEGER", None, None, false),
        column("PAYLOAD", 2, "ARRAY", None, None, true),
    ];

    let mut ctx = ConversionContext::default();
    let entity = CdsFormatter::new()
        .format(
            &StubLookup::plain(),
            &mut ctx,
            &orders_descriptor(),
            &fields,
            None,
            ObjectKind::Table,
            RenderContext::Standard,
            None,
        )
        .await
        .unwrap();

    // 未知の型はセンチネルとして埋め込まれ、他のカラムは変換される
    assert!(entity.contains("PAYLOAD : **UNSUPPORTED TYPE - ARRAY"));
    assert!(entity.contains("ID : Integer"));
}

#[tokio::test]
async fn test_fields_are_emitted_in_position_order() {
    // 入力順に関係なくPOSITIONが出力順を決める
    let fields = vec![
        column("SECOND", 2, "INTEGER", None, None, true),
        column("FIRST", 1, "INTEGER", None, None, true),
    ];

    let mut ctx = ConversionContext::default();
    let entity = CdsFormatter::new()
        .format(
            &StubLookup::plain(),
            &mut ctx,
            &orders_descriptor(),
            &fields,
            None,
            ObjectKind::Table,
            RenderContext::Standard,
            None,
        )
        .await
        .unwrap();

    let first_pos = entity.find("FIRST").unwrap();
    let second_pos = entity.find("SECOND").unwrap();
    assert!(first_pos < second_pos);
}
