//! Schema representation types.
//!
//! These types describe the structure of database tables as read back from a
//! live database. The dump writer renders them into a migration class.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// SQL data types recognized by the dumper.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    /// Integer (32-bit).
    Integer,
    /// Big integer (64-bit).
    BigInt,
    /// Small integer (16-bit).
    SmallInt,
    /// Unbounded text.
    Text,
    /// Variable-length character string.
    Varchar(usize),
    /// Fixed-length character string.
    Char(usize),
    /// Boolean.
    Boolean,
    /// Date and time.
    DateTime,
    /// Date only.
    Date,
    /// Time only.
    Time,
    /// Floating point (single precision).
    Real,
    /// Floating point (double precision).
    Double,
    /// Decimal with precision and scale.
    Numeric(u8, u8),
    /// Binary large object.
    Blob,
    /// JSON data.
    Json,
    /// UUID.
    Uuid,
}

impl SqlType {
    /// Maps a column declaration (as reported by the database) to a type.
    ///
    /// Falls back on SQLite's affinity rules for declarations that don't
    /// match a known type name.
    #[must_use]
    pub fn from_declaration(declaration: &str) -> Self {
        let upper = declaration.trim().to_uppercase();
        let (base, args) = split_declaration(&upper);

        match base {
            "INTEGER" | "INT" | "MEDIUMINT" => Self::Integer,
            "BIGINT" | "INT8" | "UNSIGNED BIG INT" => Self::BigInt,
            "SMALLINT" | "INT2" | "TINYINT" => Self::SmallInt,
            "TEXT" | "CLOB" => Self::Text,
            "VARCHAR" | "NVARCHAR" | "VARYING CHARACTER" => {
                Self::Varchar(args.first().copied().unwrap_or(255) as usize)
            }
            "CHAR" | "CHARACTER" | "NCHAR" => {
                Self::Char(args.first().copied().unwrap_or(1) as usize)
            }
            "BOOLEAN" | "BOOL" => Self::Boolean,
            "DATETIME" | "TIMESTAMP" => Self::DateTime,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "REAL" | "FLOAT" => Self::Real,
            "DOUBLE" | "DOUBLE PRECISION" => Self::Double,
            "NUMERIC" | "DECIMAL" => Self::Numeric(
                args.first().copied().unwrap_or(10) as u8,
                args.get(1).copied().unwrap_or(0) as u8,
            ),
            "BLOB" | "" => Self::Blob,
            "JSON" | "JSONB" => Self::Json,
            "UUID" => Self::Uuid,
            other => {
                // SQLite affinity fallback
                if other.contains("INT") {
                    Self::Integer
                } else if other.contains("CHAR") || other.contains("CLOB") || other.contains("TEXT")
                {
                    Self::Text
                } else if other.contains("BLOB") {
                    Self::Blob
                } else if other.contains("REAL") || other.contains("FLOA") || other.contains("DOUB")
                {
                    Self::Real
                } else {
                    Self::Numeric(10, 0)
                }
            }
        }
    }

    /// Renders the variant as a Rust expression for generated code.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Integer => "SqlType::Integer".to_string(),
            Self::BigInt => "SqlType::BigInt".to_string(),
            Self::SmallInt => "SqlType::SmallInt".to_string(),
            Self::Text => "SqlType::Text".to_string(),
            Self::Varchar(len) => format!("SqlType::Varchar({len})"),
            Self::Char(len) => format!("SqlType::Char({len})"),
            Self::Boolean => "SqlType::Boolean".to_string(),
            Self::DateTime => "SqlType::DateTime".to_string(),
            Self::Date => "SqlType::Date".to_string(),
            Self::Time => "SqlType::Time".to_string(),
            Self::Real => "SqlType::Real".to_string(),
            Self::Double => "SqlType::Double".to_string(),
            Self::Numeric(p, s) => format!("SqlType::Numeric({p}, {s})"),
            Self::Blob => "SqlType::Blob".to_string(),
            Self::Json => "SqlType::Json".to_string(),
            Self::Uuid => "SqlType::Uuid".to_string(),
        }
    }
}

/// Splits `VARCHAR(255)` into its base name and numeric arguments.
fn split_declaration(declaration: &str) -> (&str, Vec<u32>) {
    match declaration.split_once('(') {
        Some((base, rest)) => {
            let args = rest
                .trim_end_matches(')')
                .split(',')
                .filter_map(|arg| arg.trim().parse().ok())
                .collect();
            (base.trim(), args)
        }
        None => (declaration, Vec::new()),
    }
}

/// Default value for a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DefaultValue {
    /// No default value.
    #[default]
    None,
    /// SQL expression, kept verbatim (e.g. `CURRENT_TIMESTAMP` or `'guest'`).
    Expression(String),
}

/// Schema definition for a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name.
    pub name: String,
    /// SQL data type.
    pub sql_type: SqlType,
    /// Whether the column allows NULL values.
    pub nullable: bool,
    /// Default value.
    pub default: DefaultValue,
    /// Whether this column is part of the primary key.
    pub primary_key: bool,
    /// Whether this column has a UNIQUE constraint.
    pub unique: bool,
}

impl ColumnSchema {
    /// Creates a new column schema.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            nullable: true,
            default: DefaultValue::None,
            primary_key: false,
            unique: false,
        }
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: DefaultValue) -> Self {
        self.default = value;
        self
    }

    /// Sets the column as part of the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false; // Primary keys are always NOT NULL
        self
    }

    /// Sets the column as unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Schema definition for an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSchema {
    /// Index name.
    pub name: String,
    /// Columns included in the index.
    pub columns: Vec<String>,
    /// Whether this is a unique index.
    pub unique: bool,
}

impl IndexSchema {
    /// Creates a new index schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            unique: false,
        }
    }

    /// Adds a column to the index.
    #[must_use]
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(name.into());
        self
    }

    /// Marks the index as unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Complete schema definition for a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// Column definitions.
    pub columns: Vec<ColumnSchema>,
    /// Primary key column(s).
    pub primary_key: Vec<String>,
    /// Index definitions.
    pub indexes: Vec<IndexSchema>,
}

impl TableSchema {
    /// Creates a new table schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Adds a column to the table.
    #[must_use]
    pub fn column(mut self, column: ColumnSchema) -> Self {
        if column.primary_key && !self.primary_key.contains(&column.name) {
            self.primary_key.push(column.name.clone());
        }
        self.columns.push(column);
        self
    }

    /// Adds an index.
    #[must_use]
    pub fn index(mut self, index: IndexSchema) -> Self {
        self.indexes.push(index);
        self
    }

    /// Gets a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// The complete database schema (all tables).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSchema {
    /// All tables in the database.
    pub tables: Vec<TableSchema>,
}

impl DatabaseSchema {
    /// Creates a new empty database schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table to the schema.
    #[must_use]
    pub fn table(mut self, table: TableSchema) -> Self {
        self.tables.push(table);
        self
    }

    /// Gets a table by name.
    #[must_use]
    pub fn get_table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Returns table names.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    /// Keeps only tables whose name matches at least one filter.
    ///
    /// An empty filter list keeps every table.
    pub fn retain_tables(&mut self, filters: &[Regex]) {
        if filters.is_empty() {
            return;
        }
        self.tables
            .retain(|t| filters.iter().any(|f| f.is_match(&t.name)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_schema_builder() {
        let col = ColumnSchema::new("id", SqlType::Integer).primary_key();

        assert_eq!(col.name, "id");
        assert!(col.primary_key);
        assert!(!col.nullable); // Primary keys are NOT NULL
    }

    #[test]
    fn test_table_schema_builder() {
        let table = TableSchema::new("users")
            .column(ColumnSchema::new("id", SqlType::BigInt).primary_key())
            .column(ColumnSchema::new("name", SqlType::Varchar(255)).not_null())
            .column(ColumnSchema::new("email", SqlType::Varchar(255)));

        assert_eq!(table.name, "users");
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.primary_key, vec!["id"]);
    }

    #[test]
    fn test_from_declaration() {
        assert_eq!(SqlType::from_declaration("INTEGER"), SqlType::Integer);
        assert_eq!(SqlType::from_declaration("varchar(100)"), SqlType::Varchar(100));
        assert_eq!(SqlType::from_declaration("DECIMAL(8, 2)"), SqlType::Numeric(8, 2));
        assert_eq!(SqlType::from_declaration(""), SqlType::Blob);

        // Affinity fallback for unknown declarations
        assert_eq!(SqlType::from_declaration("LONG INT"), SqlType::Integer);
        assert_eq!(SqlType::from_declaration("NATIVE TEXT"), SqlType::Text);
    }

    #[test]
    fn test_render() {
        assert_eq!(SqlType::Varchar(255).render(), "SqlType::Varchar(255)");
        assert_eq!(SqlType::Numeric(8, 2).render(), "SqlType::Numeric(8, 2)");
        assert_eq!(SqlType::Text.render(), "SqlType::Text");
    }

    #[test]
    fn test_retain_tables() {
        let mut schema = DatabaseSchema::new()
            .table(TableSchema::new("users"))
            .table(TableSchema::new("posts"))
            .table(TableSchema::new("comments"));

        schema.retain_tables(&[]);
        assert_eq!(schema.tables.len(), 3);

        let filters = vec![Regex::new("^users$").unwrap(), Regex::new("^post").unwrap()];
        schema.retain_tables(&filters);
        let names: Vec<_> = schema.table_names().collect();
        assert_eq!(names, vec!["users", "posts"]);
    }
}
