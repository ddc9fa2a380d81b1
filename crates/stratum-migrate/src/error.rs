//! Error types for the schema dump tool.

use std::path::PathBuf;

/// Errors that can occur while dumping a schema.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// The selected namespace already contains recorded migrations.
    ///
    /// Hard stop: a dump must never shadow existing history. No file is
    /// written.
    #[error("Delete any previous migrations in the namespace \"{0}\" before dumping your schema.")]
    PreviousMigrations(String),

    /// No migrations directory has been configured.
    #[error("At least one migrations directory must be configured")]
    EmptyConfiguration,

    /// A namespace was requested that has no configured directory.
    #[error("No migrations directory is configured for the namespace \"{0}\"")]
    UnknownNamespace(String),

    /// A migrations directory argument could not be parsed.
    #[error("Invalid migrations directory \"{0}\", expected NAMESPACE=PATH")]
    InvalidDirectorySpec(String),

    /// A table filter is not a valid regular expression.
    #[error("Invalid table filter \"{pattern}\": {source}")]
    InvalidFilter {
        /// The offending pattern.
        pattern: String,
        /// The underlying regex error.
        source: regex::Error,
    },

    /// A migration is not recorded, so it cannot be removed.
    #[error("Migration not recorded: {0}")]
    NotRecorded(String),

    /// Migration file already exists.
    #[error("Migration file already exists: {0}")]
    MigrationExists(PathBuf),

    /// Database error during schema introspection or history access.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (writing the generated migration class, console output).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Configuration(#[from] serde_json::Error),
}

/// Result type for schema dump operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
