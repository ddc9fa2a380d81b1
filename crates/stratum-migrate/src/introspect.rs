//! SQLite schema introspection.
//!
//! Reads the live database structure back into [`DatabaseSchema`] so the
//! dumper can render it. Read-only: nothing here modifies the database.

use sqlx::sqlite::SqlitePool;
use tracing::debug;

use crate::error::Result;
use crate::schema::{ColumnSchema, DatabaseSchema, DefaultValue, IndexSchema, SqlType, TableSchema};
use crate::source::MIGRATIONS_TABLE;

/// Reads the full database schema.
///
/// SQLite internal tables and the tool's own recorded-migrations table are
/// skipped.
pub async fn introspect_schema(pool: &SqlitePool) -> Result<DatabaseSchema> {
    let names: Vec<(String,)> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    let mut schema = DatabaseSchema::new();
    for (name,) in names {
        if name == MIGRATIONS_TABLE {
            continue;
        }
        debug!("Introspecting table {name}");
        schema = schema.table(introspect_table(pool, &name).await?);
    }

    Ok(schema)
}

async fn introspect_table(pool: &SqlitePool, table: &str) -> Result<TableSchema> {
    // (cid, name, type, notnull, dflt_value, pk)
    let column_rows: Vec<(i64, String, String, i64, Option<String>, i64)> =
        sqlx::query_as(&format!("PRAGMA table_info({})", quote_ident(table)))
            .fetch_all(pool)
            .await?;

    let mut columns = Vec::new();
    let mut primary_key: Vec<(i64, String)> = Vec::new();
    for (_cid, name, declaration, not_null, default, pk) in column_rows {
        let mut column = ColumnSchema::new(&name, SqlType::from_declaration(&declaration));
        if not_null != 0 {
            column = column.not_null();
        }
        if let Some(expression) = default {
            column = column.default(DefaultValue::Expression(expression));
        }
        if pk > 0 {
            column = column.primary_key();
            primary_key.push((pk, name));
        }
        columns.push(column);
    }
    // PRAGMA table_info reports pk as a 1-based position within the key
    primary_key.sort_by_key(|(position, _)| *position);

    let mut table_schema = TableSchema::new(table);
    table_schema.columns = columns;
    table_schema.primary_key = primary_key.into_iter().map(|(_, name)| name).collect();

    introspect_indexes(pool, table, &mut table_schema).await?;

    // TODO: dump foreign keys via PRAGMA foreign_key_list
    Ok(table_schema)
}

async fn introspect_indexes(
    pool: &SqlitePool,
    table: &str,
    table_schema: &mut TableSchema,
) -> Result<()> {
    // (seq, name, unique, origin, partial)
    let index_rows: Vec<(i64, String, i64, String, i64)> =
        sqlx::query_as(&format!("PRAGMA index_list({})", quote_ident(table)))
            .fetch_all(pool)
            .await?;

    for (_seq, name, unique, origin, _partial) in index_rows {
        // (seqno, cid, name) -- expression index columns have no name
        let info_rows: Vec<(i64, i64, Option<String>)> =
            sqlx::query_as(&format!("PRAGMA index_info({})", quote_ident(&name)))
                .fetch_all(pool)
                .await?;
        let column_names: Vec<String> = info_rows
            .into_iter()
            .filter_map(|(_, _, column)| column)
            .collect();

        match origin.as_str() {
            // Autoindex backing a single-column UNIQUE constraint: record it
            // on the column rather than as a standalone index.
            "u" if column_names.len() == 1 => {
                if let Some(column) = table_schema
                    .columns
                    .iter_mut()
                    .find(|c| c.name == column_names[0])
                {
                    column.unique = true;
                }
            }
            "u" | "c" => {
                let mut index = IndexSchema::new(&name);
                for column in column_names {
                    index = index.column(column);
                }
                if unique != 0 {
                    index = index.unique();
                }
                table_schema.indexes.push(index);
            }
            // "pk" autoindexes duplicate the primary key
            _ => {}
        }
    }

    Ok(())
}

/// Quotes an identifier for interpolation into a PRAGMA statement.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .expect("Failed to create in-memory SQLite pool")
    }

    #[tokio::test]
    async fn test_introspect_columns_and_primary_key() {
        let pool = create_test_pool().await;
        sqlx::query(
            "CREATE TABLE users (
                id INTEGER PRIMARY KEY,
                username VARCHAR(255) NOT NULL UNIQUE,
                bio TEXT,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        let schema = introspect_schema(&pool).await.unwrap();
        assert_eq!(schema.tables.len(), 1);

        let users = schema.get_table("users").unwrap();
        assert_eq!(users.primary_key, vec!["id"]);

        let id = users.get_column("id").unwrap();
        assert_eq!(id.sql_type, SqlType::Integer);
        assert!(id.primary_key);

        let username = users.get_column("username").unwrap();
        assert_eq!(username.sql_type, SqlType::Varchar(255));
        assert!(!username.nullable);
        assert!(username.unique);

        let bio = users.get_column("bio").unwrap();
        assert_eq!(bio.sql_type, SqlType::Text);
        assert!(bio.nullable);

        let created_at = users.get_column("created_at").unwrap();
        assert_eq!(
            created_at.default,
            DefaultValue::Expression("CURRENT_TIMESTAMP".to_string())
        );
    }

    #[tokio::test]
    async fn test_introspect_skips_internal_tables() {
        let pool = create_test_pool().await;
        sqlx::query(crate::source::CREATE_MIGRATIONS_TABLE_SQL)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("CREATE TABLE posts (id INTEGER PRIMARY KEY)")
            .execute(&pool)
            .await
            .unwrap();

        let schema = introspect_schema(&pool).await.unwrap();
        let names: Vec<_> = schema.table_names().collect();
        assert_eq!(names, vec!["posts"]);
    }

    #[tokio::test]
    async fn test_introspect_explicit_index() {
        let pool = create_test_pool().await;
        sqlx::query("CREATE TABLE posts (id INTEGER PRIMARY KEY, author TEXT, slug TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("CREATE UNIQUE INDEX idx_posts_slug ON posts (slug)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("CREATE INDEX idx_posts_author ON posts (author)")
            .execute(&pool)
            .await
            .unwrap();

        let schema = introspect_schema(&pool).await.unwrap();
        let posts = schema.get_table("posts").unwrap();

        assert_eq!(posts.indexes.len(), 2);
        let slug_index = posts.indexes.iter().find(|i| i.name == "idx_posts_slug").unwrap();
        assert!(slug_index.unique);
        assert_eq!(slug_index.columns, vec!["slug"]);

        let author_index = posts
            .indexes
            .iter()
            .find(|i| i.name == "idx_posts_author")
            .unwrap();
        assert!(!author_index.unique);
    }
}
