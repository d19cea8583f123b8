use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use hanascope::cli::commands::inspect_function::{
    InspectFunctionCommand, InspectFunctionCommandHandler,
};
use hanascope::cli::commands::inspect_procedure::{
    InspectProcedureCommand, InspectProcedureCommandHandler,
};
use hanascope::cli::commands::inspect_table::{InspectTableCommand, InspectTableCommandHandler};
use hanascope::cli::commands::inspect_view::{InspectViewCommand, InspectViewCommandHandler};
use hanascope::cli::commands::mass_convert::{
    format_options, MassConvertCommand, MassConvertCommandHandler,
};
use hanascope::cli::commands::tables::{TablesCommand, TablesCommandHandler};
use hanascope::cli::commands::version::{VersionCommand, VersionCommandHandler};
use hanascope::cli::{Cli, Commands};
use hanascope::services::mass_convert::MassConvertRequest;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // CLIをパースして実行
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // SQLxのAnyドライバーを登録
    sqlx::any::install_default_drivers();

    // 非同期ランタイムを作成して実行
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    let result = runtime.block_on(run_command(cli));

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

/// ログ出力を初期化する
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "hanascope=debug" } else { "hanascope=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// コマンドを実行する
async fn run_command(cli: Cli) -> Result<String> {
    let config_path = cli.config.clone();
    let profile = cli.profile.clone();

    match cli.command {
        Commands::Tables {
            schema,
            table,
            limit,
        } => {
            let handler = TablesCommandHandler::new();
            let command = TablesCommand {
                config_path,
                profile,
                schema,
                table_pattern: table,
                limit,
            };
            handler.execute(&command).await
        }

        Commands::InspectTable {
            table,
            schema,
            hana_types,
            keep_path,
            no_colons,
            use_exists,
            quoted,
        } => {
            let handler = InspectTableCommandHandler::new();
            let command = InspectTableCommand {
                config_path,
                profile,
                schema,
                table,
                options: format_options(hana_types, keep_path, no_colons, use_exists, quoted),
            };
            handler.execute(&command).await
        }

        Commands::InspectView {
            view,
            schema,
            hana_types,
            keep_path,
            no_colons,
            use_exists,
            quoted,
        } => {
            let handler = InspectViewCommandHandler::new();
            let command = InspectViewCommand {
                config_path,
                profile,
                schema,
                view,
                options: format_options(hana_types, keep_path, no_colons, use_exists, quoted),
            };
            handler.execute(&command).await
        }

        Commands::InspectProcedure { procedure, schema } => {
            let handler = InspectProcedureCommandHandler::new();
            let command = InspectProcedureCommand {
                config_path,
                profile,
                schema,
                procedure,
            };
            handler.execute(&command).await
        }

        Commands::InspectFunction { function, schema } => {
            let handler = InspectFunctionCommandHandler::new();
            let command = InspectFunctionCommand {
                config_path,
                profile,
                schema,
                function,
            };
            handler.execute(&command).await
        }

        Commands::MassConvert {
            schema,
            table,
            limit,
            output,
            folder,
            filename,
            synonyms,
            hana_types,
            keep_path,
            no_colons,
            use_exists,
            quoted,
        } => {
            let handler = MassConvertCommandHandler::new();
            let command = MassConvertCommand {
                config_path,
                profile,
                request: MassConvertRequest {
                    schema,
                    table_pattern: table,
                    limit,
                    output: output.into(),
                    folder,
                    filename,
                    save_synonyms: synonyms,
                },
                options: format_options(hana_types, keep_path, no_colons, use_exists, quoted),
            };
            handler.execute(&command).await
        }

        Commands::Version {} => {
            let handler = VersionCommandHandler::new();
            let command = VersionCommand {
                config_path,
                profile,
            };
            handler.execute(&command).await
        }
    }
}
