// inspectProcedureコマンドハンドラー
//
// ストアドプロシージャの記述子とパラメータ一覧を表示します。

use crate::adapters::catalog::CatalogReader;
use crate::cli::command_context::CommandContext;
use crate::core::descriptors::{ObjectDescriptor, ParameterDescriptor};
use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// inspectProcedureコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct InspectProcedureCommand {
    /// 設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// プロファイル名
    pub profile: Option<String>,
    /// スキーマ名
    pub schema: Option<String>,
    /// プロシージャ名
    pub procedure: String,
}

/// inspectProcedureコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct InspectProcedureCommandHandler {}

impl InspectProcedureCommandHandler {
    /// 新しいInspectProcedureCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// inspectProcedureコマンドを実行
    pub async fn execute(&self, command: &InspectProcedureCommand) -> Result<String> {
        let context = CommandContext::load(
            command.config_path.as_deref(),
            command.profile.clone(),
        )?;
        let mut client = context.connect_client().await?;

        let schema = client.schema_calculation(command.schema.as_deref());
        let reader = CatalogReader::new(client.pool()?.clone());

        let descriptors = reader.get_procedure(&schema, &command.procedure).await?;
        let object = descriptors
            .first()
            .ok_or_else(|| anyhow!("Empty descriptor set for {}", command.procedure))?;
        let parameters = reader.get_procedure_parameters(object.object_oid).await?;

        client.disconnect().await?;

        Ok(format_routine_listing("procedure", object, &parameters))
    }
}

/// プロシージャ/関数の一覧表示をフォーマット
pub fn format_routine_listing(
    kind: &str,
    object: &ObjectDescriptor,
    parameters: &[ParameterDescriptor],
) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} \"{}\".\"{}\" (valid: {})\n",
        kind, object.schema_name, object.object_name, object.is_valid
    ));
    if let Some(parsed) = object.create_time_parsed() {
        output.push_str(&format!("created: {}\n", parsed.format("%Y-%m-%d %H:%M:%S")));
    } else if let Some(raw) = &object.create_time {
        output.push_str(&format!("created: {}\n", raw));
    }

    if parameters.is_empty() {
        output.push_str("no parameters\n");
        return output;
    }

    output.push_str("parameters:\n");
    for parameter in parameters {
        let mut type_text = parameter.data_type_name.clone();
        if let Some(length) = parameter.length {
            match parameter.scale {
                Some(scale) => type_text.push_str(&format!("({}, {})", length, scale)),
                None => type_text.push_str(&format!("({})", length)),
            }
        }
        output.push_str(&format!(
            "  {:<3} {} : {}\n",
            parameter.position, parameter.parameter_name, type_text
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_routine_listing() {
        let object = ObjectDescriptor {
            schema_name: "APP".to_string(),
            object_name: "CALC_TOTALS".to_string(),
            object_oid: 42,
            has_primary_key: false,
            is_valid: true,
            comments: None,
            create_time: Some("2026-01-15 10:00:00".to_string()),
        };
        let parameters = vec![ParameterDescriptor {
            parameter_name: "IV_YEAR".to_string(),
            data_type_name: "INTEGER".to_string(),
            length: None,
            scale: None,
            position: 1,
        }];

        let listing = format_routine_listing("procedure", &object, &parameters);
        assert!(listing.contains("procedure \"APP\".\"CALC_TOTALS\""));
        assert!(listing.contains("valid: true"));
        assert!(listing.contains("IV_YEAR : INTEGER"));
    }

    #[test]
    fn test_format_routine_listing_without_parameters() {
        let object = ObjectDescriptor {
            schema_name: "APP".to_string(),
            object_name: "REFRESH".to_string(),
            object_oid: 7,
            has_primary_key: false,
            is_valid: false,
            comments: None,
            create_time: None,
        };

        let listing = format_routine_listing("procedure", &object, &[]);
        assert!(listing.contains("no parameters"));
        assert!(listing.contains("valid: false"));
    }

    #[test]
    fn test_format_routine_listing_typed_parameter() {
        let object = ObjectDescriptor {
            schema_name: "APP".to_string(),
            object_name: "CONVERT".to_string(),
            object_oid: 8,
            has_primary_key: false,
            is_valid: true,
            comments: None,
            create_time: None,
        };
        let parameters = vec![ParameterDescriptor {
            parameter_name: "IV_AMOUNT".to_string(),
            data_type_name: "DECIMAL".to_string(),
            length: Some(10),
            scale: Some(2),
            position: 1,
        }];

        let listing = format_routine_listing("procedure", &object, &parameters);
        assert!(listing.contains("DECIMAL(10, 2)"));
    }
}
