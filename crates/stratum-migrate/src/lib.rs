//! Schema dumping for Rust database migrations.
//!
//! `stratum-migrate` turns the current structure of a database into a new
//! migration class, so an existing schema can become the baseline of a
//! migration history:
//!
//! - The command refuses to dump into a namespace that already contains
//!   recorded migrations.
//! - With several configured namespaces, the target is chosen interactively
//!   (defaulting to the first one).
//! - Generated classes are plain Rust and reviewable before committing.
//!
//! # Architecture
//!
//! The dump pipeline consists of several components:
//!
//! - **Configuration** - Ordered namespace to directory mapping
//! - **Migration source** - Supplies the already-recorded migrations
//! - **Class name generator** - Names the new migration class
//! - **Schema dumper** - Introspects the database and writes the class file
//! - **Command** - Orchestrates the above behind a console
//!
//! # Example
//!
//! A generated migration class looks like:
//!
//! ```rust,ignore
//! use stratum_migrate::prelude::*;
//!
//! pub struct Version20240101120000;
//!
//! impl Migration for Version20240101120000 {
//!     const NAMESPACE: &'static str = "App";
//!     const NAME: &'static str = "Version20240101120000";
//!
//!     fn tables() -> Vec<TableSchema> {
//!         vec![
//!             TableSchema::new("users")
//!                 .column(ColumnSchema::new("id", SqlType::Integer).primary_key())
//!                 .column(ColumnSchema::new("username", SqlType::Varchar(255)).not_null()),
//!         ]
//!     }
//! }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Create the recorded-migrations table
//! stratum-migrate init
//!
//! # Dump the schema into a new migration class
//! stratum-migrate dump-schema
//!
//! # Dump only matching tables, formatted
//! stratum-migrate dump-schema --filter-tables '^users$' --formatted
//! ```

pub mod command;
pub mod config;
pub mod console;
pub mod dumper;
pub mod error;
pub mod generator;
pub mod introspect;
pub mod metadata;
pub mod schema;
pub mod source;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::command::{DumpSchemaCommand, DumpSchemaOptions};
    pub use crate::config::{Configuration, MigrationsDirectory};
    pub use crate::console::Console;
    pub use crate::dumper::{DumpRequest, SchemaDumper, SqliteSchemaDumper, DEFAULT_LINE_LENGTH};
    pub use crate::error::{MigrateError, Result};
    pub use crate::generator::{ClassNameGenerator, TimestampClassNameGenerator};
    pub use crate::introspect::introspect_schema;
    pub use crate::metadata::{AvailableMigration, AvailableMigrationsSet, Version};
    pub use crate::schema::{
        ColumnSchema, DatabaseSchema, DefaultValue, IndexSchema, SqlType, TableSchema,
    };
    pub use crate::source::{MigrationSource, SqliteMigrationSource};
    pub use crate::Migration;
}

/// Trait implemented by generated migration classes.
pub trait Migration {
    /// Namespace the migration belongs to.
    const NAMESPACE: &'static str;

    /// Migration class name (e.g. "Version20240101120000").
    const NAME: &'static str;

    /// Returns the tables this migration creates.
    fn tables() -> Vec<schema::TableSchema>;

    /// Returns the namespace-qualified version.
    fn version() -> metadata::Version {
        metadata::Version::new(Self::NAMESPACE, Self::NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    struct TestMigration;

    impl Migration for TestMigration {
        const NAMESPACE: &'static str = "TestNs";
        const NAME: &'static str = "Version0001";

        fn tables() -> Vec<TableSchema> {
            vec![TableSchema::new("test_table")
                .column(ColumnSchema::new("id", SqlType::BigInt).primary_key())]
        }
    }

    #[test]
    fn test_migration_trait() {
        assert_eq!(TestMigration::NAMESPACE, "TestNs");
        assert_eq!(TestMigration::NAME, "Version0001");
        assert_eq!(TestMigration::tables().len(), 1);
    }

    #[test]
    fn test_version() {
        assert_eq!(TestMigration::version().to_string(), "TestNs::Version0001");
    }
}
