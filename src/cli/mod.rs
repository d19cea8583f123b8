// CLI Layer
// ユーザー入力の受付とコマンドルーティング

pub mod command_context;
pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// マスコンバートの出力種別
#[derive(Clone, Debug, Default, ValueEnum)]
pub enum MassOutputFormat {
    /// Single normalized schema bundle (.cds)
    #[default]
    Cds,
    /// Archive of raw table definitions (.hdbtable)
    Table,
    /// Archive of migration table definitions (.hdbmigrationtable)
    Migration,
}

impl From<MassOutputFormat> for crate::services::mass_convert::OutputKind {
    fn from(format: MassOutputFormat) -> Self {
        use crate::services::mass_convert::OutputKind;
        match format {
            MassOutputFormat::Cds => OutputKind::CdsBundle,
            MassOutputFormat::Table => OutputKind::TableArchive,
            MassOutputFormat::Migration => OutputKind::MigrationArchive,
        }
    }
}

/// Hanascope - SAP HANA Catalog Inspection CLI
///
/// Inspect database catalogs and convert object metadata to CDS.
#[derive(Parser, Debug)]
#[command(name = "hanascope")]
#[command(author = "Hanascope Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "SAP HANA catalog inspection and CDS conversion CLI tool")]
#[command(long_about = "Hanascope - SAP HANA Catalog Inspection CLI

Inspect SAP HANA database catalogs and convert object metadata
to CDS entity definitions.

Hanascope helps you:
  • List tables across HANA, PostgreSQL and SQLite profiles
  • Inspect tables, views, procedures and functions
  • Convert catalog metadata to CDS entity definitions
  • Mass-convert whole schemas to bundles or archives

Supported backends: SAP HANA (direct or via CDS), PostgreSQL, SQLite")]
#[command(propagate_version = true)]
#[command(after_help = "GETTING STARTED:
  1. Create a profile file:          .hanascope.yaml
  2. List tables:                    hanascope tables --schema APP
  3. Inspect one table:              hanascope inspect-table ORDERS
  4. Convert a whole schema:         hanascope mass-convert --schema APP

For detailed help on each command, use: hanascope <command> --help")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Connection profile name
    #[arg(short, long, global = true, value_name = "PROFILE")]
    pub profile: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tables for a schema and name pattern
    ///
    /// EXAMPLES:
    ///   # List all tables of the credential schema
    ///   hanascope tables
    ///
    ///   # List tables matching a pattern in a specific schema
    ///   hanascope tables --schema APP --table "ORDER%"
    Tables {
        /// Schema name (defaults to the credential schema)
        #[arg(short, long, value_name = "SCHEMA")]
        schema: Option<String>,

        /// Table name pattern (* selects everything)
        #[arg(short, long, value_name = "PATTERN", default_value = "*")]
        table: String,

        /// Maximum number of tables to list
        #[arg(short, long, value_name = "LIMIT", default_value_t = 200)]
        limit: u32,
    },

    /// Inspect one table and print its CDS entity definition
    ///
    /// EXAMPLES:
    ///   # Standard CDS output
    ///   hanascope inspect-table ORDERS --schema APP
    ///
    ///   # Use the HANA-specific type vocabulary
    ///   hanascope inspect-table ORDERS --hana-types
    InspectTable {
        /// Table name
        table: String,

        /// Schema name (defaults to the credential schema)
        #[arg(short, long, value_name = "SCHEMA")]
        schema: Option<String>,

        /// Use the HANA-specific type vocabulary
        #[arg(long)]
        hana_types: bool,

        /// Keep dots in entity names
        #[arg(long)]
        keep_path: bool,

        /// Replace namespace separators (::) with underscores
        #[arg(long)]
        no_colons: bool,

        /// Emit @cds.persistence.exists annotations
        #[arg(long)]
        use_exists: bool,

        /// Emit quoted entity identifiers
        #[arg(long)]
        quoted: bool,
    },

    /// Inspect one view and print its CDS entity definition
    ///
    /// Calculation views are detected and annotated, input parameters
    /// are rendered as a parameter list.
    InspectView {
        /// View name
        view: String,

        /// Schema name (defaults to the credential schema)
        #[arg(short, long, value_name = "SCHEMA")]
        schema: Option<String>,

        /// Use the HANA-specific type vocabulary
        #[arg(long)]
        hana_types: bool,

        /// Keep dots in entity names
        #[arg(long)]
        keep_path: bool,

        /// Replace namespace separators (::) with underscores
        #[arg(long)]
        no_colons: bool,

        /// Emit @cds.persistence.exists annotations
        #[arg(long)]
        use_exists: bool,

        /// Emit quoted entity identifiers
        #[arg(long)]
        quoted: bool,
    },

    /// Inspect one stored procedure and list its parameters
    InspectProcedure {
        /// Procedure name
        procedure: String,

        /// Schema name (defaults to the credential schema)
        #[arg(short, long, value_name = "SCHEMA")]
        schema: Option<String>,
    },

    /// Inspect one function and list its parameters
    InspectFunction {
        /// Function name
        function: String,

        /// Schema name (defaults to the credential schema)
        #[arg(short, long, value_name = "SCHEMA")]
        schema: Option<String>,
    },

    /// Convert many tables at once
    ///
    /// Iterates all tables matching the schema and pattern, converts
    /// each one and aggregates the output into a single CDS bundle or
    /// a compressed archive with one entry per table.
    ///
    /// EXAMPLES:
    ///   # Whole schema to one CDS bundle
    ///   hanascope mass-convert --schema APP
    ///
    ///   # Raw table definitions as a zip archive
    ///   hanascope mass-convert --schema APP --output table
    MassConvert {
        /// Schema name (defaults to the credential schema)
        #[arg(short, long, value_name = "SCHEMA")]
        schema: Option<String>,

        /// Table name pattern (* selects everything)
        #[arg(short, long, value_name = "PATTERN", default_value = "*")]
        table: String,

        /// Maximum number of tables to convert
        #[arg(short, long, value_name = "LIMIT", default_value_t = 200)]
        limit: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "cds")]
        output: MassOutputFormat,

        /// Output folder
        #[arg(short, long, value_name = "FOLDER", default_value = ".")]
        folder: PathBuf,

        /// Output file name (without extension)
        #[arg(short = 'n', long, value_name = "NAME", default_value = "model")]
        filename: String,

        /// Persist the synonym registry to a side file
        #[arg(long)]
        synonyms: bool,

        /// Use the HANA-specific type vocabulary
        #[arg(long)]
        hana_types: bool,

        /// Keep dots in entity names
        #[arg(long)]
        keep_path: bool,

        /// Replace namespace separators (::) with underscores
        #[arg(long)]
        no_colons: bool,

        /// Emit @cds.persistence.exists annotations
        #[arg(long)]
        use_exists: bool,

        /// Emit quoted entity identifiers
        #[arg(long)]
        quoted: bool,
    },

    /// Print the database catalog version
    Version {},
}
