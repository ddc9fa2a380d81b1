//! Schema dumping into migration classes.
//!
//! The dumper turns the introspected database schema into a new migration
//! class file in the selected namespace's directory.

use std::path::PathBuf;

use async_trait::async_trait;
use regex::Regex;
use sqlx::sqlite::SqlitePool;
use tracing::info;

use crate::config::Configuration;
use crate::error::{MigrateError, Result};
use crate::introspect::introspect_schema;
use crate::metadata::Version;
use crate::schema::{ColumnSchema, DatabaseSchema, DefaultValue, IndexSchema, TableSchema};

/// Default maximum line length of the generated code.
pub const DEFAULT_LINE_LENGTH: usize = 120;

/// Per-invocation description of a dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpRequest {
    /// Class name of the migration to generate.
    pub class_name: Version,
    /// Keep only tables matching these patterns; empty keeps everything.
    pub table_filters: Vec<String>,
    /// Render one builder call per line.
    pub formatted: bool,
    /// Maximum line length of the generated code.
    pub line_length: usize,
}

impl DumpRequest {
    /// Creates a request with default formatting options.
    #[must_use]
    pub fn new(class_name: Version) -> Self {
        Self {
            class_name,
            table_filters: Vec::new(),
            formatted: false,
            line_length: DEFAULT_LINE_LENGTH,
        }
    }
}

/// Generates a migration class from the current database schema.
#[async_trait]
pub trait SchemaDumper: Send + Sync {
    /// Performs the dump and returns the path of the written class file.
    async fn dump(&self, request: &DumpRequest) -> Result<PathBuf>;
}

/// Schema dumper backed by a live SQLite database.
pub struct SqliteSchemaDumper {
    pool: SqlitePool,
    configuration: Configuration,
}

impl SqliteSchemaDumper {
    /// Creates a dumper reading from the given pool.
    #[must_use]
    pub fn new(pool: SqlitePool, configuration: Configuration) -> Self {
        Self {
            pool,
            configuration,
        }
    }
}

#[async_trait]
impl SchemaDumper for SqliteSchemaDumper {
    async fn dump(&self, request: &DumpRequest) -> Result<PathBuf> {
        let directory = self
            .configuration
            .directory_for(request.class_name.namespace())?;

        let mut schema = introspect_schema(&self.pool).await?;
        let filters = compile_filters(&request.table_filters)?;
        schema.retain_tables(&filters);

        let code = render_migration(
            &request.class_name,
            &schema,
            request.formatted,
            request.line_length,
        );

        std::fs::create_dir_all(directory)?;
        let path = directory.join(format!("{}.rs", request.class_name.name()));
        if path.exists() {
            return Err(MigrateError::MigrationExists(path));
        }
        std::fs::write(&path, code)?;

        info!(
            "Dumped {} tables into {}",
            schema.tables.len(),
            path.display()
        );
        Ok(path)
    }
}

/// Compiles filter patterns, rejecting invalid expressions.
pub fn compile_filters(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| MigrateError::InvalidFilter {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// Renders the migration class source for a schema snapshot.
#[must_use]
pub fn render_migration(
    class_name: &Version,
    schema: &DatabaseSchema,
    formatted: bool,
    line_length: usize,
) -> String {
    let name = class_name.name();
    let mut out = String::new();

    out.push_str(&format!("//! {name}: dump of the database schema.\n\n"));
    out.push_str("use stratum_migrate::prelude::*;\n\n");
    out.push_str(&format!("pub struct {name};\n\n"));
    out.push_str(&format!("impl Migration for {name} {{\n"));
    out.push_str(&format!(
        "    const NAMESPACE: &'static str = {};\n",
        quote(class_name.namespace())
    ));
    out.push_str(&format!("    const NAME: &'static str = {};\n\n", quote(name)));
    out.push_str("    fn tables() -> Vec<TableSchema> {\n");

    if schema.tables.is_empty() {
        out.push_str("        Vec::new()\n");
    } else {
        out.push_str("        vec![\n");
        for table in &schema.tables {
            out.push_str(&render_table(table, formatted, line_length));
        }
        out.push_str("        ]\n");
    }

    out.push_str("    }\n");
    out.push_str("}\n");
    out
}

/// A builder expression: a head constructor plus chained method calls.
struct CallChain {
    head: String,
    calls: Vec<String>,
}

impl CallChain {
    fn compact(&self) -> String {
        let mut out = self.head.clone();
        for call in &self.calls {
            out.push_str(call);
        }
        out
    }

    fn expanded(&self, indent: usize) -> String {
        let pad = " ".repeat(indent);
        let mut out = self.head.clone();
        for call in &self.calls {
            out.push_str(&format!("\n{pad}{call}"));
        }
        out
    }
}

fn render_table(table: &TableSchema, formatted: bool, line_length: usize) -> String {
    let chain = table_chain(table);

    if !formatted {
        return format!("            {},\n", chain.compact());
    }

    // One builder call per line; calls that still exceed the line length get
    // their inner chain broken as well.
    let mut out = format!("            {}", chain.head);
    for call in &chain.calls {
        if 16 + call.len() > line_length {
            out.push_str(&render_long_call(call, table));
        } else {
            out.push_str(&format!("\n                {call}"));
        }
    }
    out.push_str(",\n");
    out
}

/// Re-renders an over-long `.column(...)`/`.index(...)` call with the inner
/// builder expression on its own lines.
fn render_long_call(call: &str, table: &TableSchema) -> String {
    // Recover the inner chain from the table definition instead of parsing
    // the rendered string.
    for column in &table.columns {
        let inner = column_chain(column);
        if call == &format!(".column({})", inner.compact()) {
            return format!(
                "\n                .column(\n                    {},\n                )",
                inner.expanded(24)
            );
        }
    }
    for index in &table.indexes {
        let inner = index_chain(index);
        if call == &format!(".index({})", inner.compact()) {
            return format!(
                "\n                .index(\n                    {},\n                )",
                inner.expanded(24)
            );
        }
    }
    format!("\n                {call}")
}

fn table_chain(table: &TableSchema) -> CallChain {
    let mut calls = Vec::new();
    for column in &table.columns {
        calls.push(format!(".column({})", column_chain(column).compact()));
    }
    for index in &table.indexes {
        calls.push(format!(".index({})", index_chain(index).compact()));
    }
    CallChain {
        head: format!("TableSchema::new({})", quote(&table.name)),
        calls,
    }
}

fn column_chain(column: &ColumnSchema) -> CallChain {
    let mut calls = Vec::new();
    if !column.nullable && !column.primary_key {
        calls.push(".not_null()".to_string());
    }
    if let DefaultValue::Expression(expression) = &column.default {
        calls.push(format!(
            ".default(DefaultValue::Expression({}.into()))",
            quote(expression)
        ));
    }
    if column.primary_key {
        calls.push(".primary_key()".to_string());
    }
    if column.unique {
        calls.push(".unique()".to_string());
    }
    CallChain {
        head: format!(
            "ColumnSchema::new({}, {})",
            quote(&column.name),
            column.sql_type.render()
        ),
        calls,
    }
}

fn index_chain(index: &IndexSchema) -> CallChain {
    let mut calls = Vec::new();
    for column in &index.columns {
        calls.push(format!(".column({})", quote(column)));
    }
    if index.unique {
        calls.push(".unique()".to_string());
    }
    CallChain {
        head: format!("IndexSchema::new({})", quote(&index.name)),
        calls,
    }
}

/// Quotes a string literal for generated code.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
