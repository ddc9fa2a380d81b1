//! The dump-schema command.
//!
//! Orchestration only: the migration source, class name generator and schema
//! dumper do the actual work behind their traits.

use std::io::{BufRead, Write};
use std::sync::Arc;

use tracing::debug;

use crate::config::Configuration;
use crate::console::{select_namespace, Console};
use crate::dumper::{DumpRequest, SchemaDumper, DEFAULT_LINE_LENGTH};
use crate::error::{MigrateError, Result};
use crate::generator::ClassNameGenerator;
use crate::metadata::Version;
use crate::source::MigrationSource;

/// Options accepted by [`DumpSchemaCommand::execute`].
#[derive(Debug, Clone)]
pub struct DumpSchemaOptions {
    /// Keep only tables matching these patterns; empty keeps everything.
    pub filter_tables: Vec<String>,
    /// Maximum line length of the generated code.
    pub line_length: usize,
    /// Render one builder call per line.
    pub formatted: bool,
}

impl Default for DumpSchemaOptions {
    fn default() -> Self {
        Self {
            filter_tables: Vec::new(),
            line_length: DEFAULT_LINE_LENGTH,
            formatted: false,
        }
    }
}

/// Dumps the current database schema into a new migration class.
pub struct DumpSchemaCommand {
    configuration: Configuration,
    source: Arc<dyn MigrationSource>,
    generator: Arc<dyn ClassNameGenerator>,
    dumper: Arc<dyn SchemaDumper>,
}

impl DumpSchemaCommand {
    /// Creates the command from its collaborators.
    pub fn new(
        configuration: Configuration,
        source: Arc<dyn MigrationSource>,
        generator: Arc<dyn ClassNameGenerator>,
        dumper: Arc<dyn SchemaDumper>,
    ) -> Self {
        Self {
            configuration,
            source,
            generator,
            dumper,
        }
    }

    /// Runs the dump and returns the generated version.
    ///
    /// Refuses to dump into a namespace that already contains recorded
    /// migrations: the previous history must be deleted first.
    pub async fn execute<R: BufRead, W: Write>(
        &self,
        options: &DumpSchemaOptions,
        console: &mut Console<R, W>,
    ) -> Result<Version> {
        let migrations = self.source.migrations().await?;
        let namespace = select_namespace(&self.configuration, console)?;

        if migrations.has_namespace(&namespace) {
            return Err(MigrateError::PreviousMigrations(namespace));
        }

        let class_name = self.generator.generate_class_name(&namespace);
        debug!("Generated class name {class_name}");

        let request = DumpRequest {
            class_name: class_name.clone(),
            table_filters: options.filter_tables.clone(),
            formatted: options.formatted,
            line_length: options.line_length,
        };
        let path = self.dumper.dump(&request).await?;

        console.writeln(&format!(
            "Dumped your schema to a new migration class at \"{}\"",
            path.display()
        ))?;
        console.blank_line()?;
        console.writeln(&format!(
            "To run just this migration for testing purposes, you can use migrations:execute --up '{class_name}'"
        ))?;
        console.blank_line()?;
        console.writeln(&format!(
            "To revert the migration you can use migrations:execute --down '{class_name}'"
        ))?;
        console.blank_line()?;
        console.writeln("To use this as a rollup migration you can use the migrations:rollup command.")?;

        Ok(class_name)
    }
}
