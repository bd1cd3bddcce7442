//! Statement Builder
//!
//! Produces SQL text for a table plus the positional parameters to bind.
//! Instance values only ever travel as parameters; the SQL text contains
//! nothing but quoted identifiers taken from validated metadata and
//! numbered placeholders.

use crate::errors::{Result, RowbindError};
use crate::meta::{quote_ident, TableMeta};
use crate::model::value::Value;

/// SQL text with the values bound to its placeholders, in order
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    fn bare(sql: String) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }
}

pub fn create_table(meta: &TableMeta) -> Statement {
    Statement::bare(meta.ddl())
}

pub fn drop_table(meta: &TableMeta) -> Statement {
    Statement::bare(format!("DROP TABLE IF EXISTS {}", meta.quoted_table()))
}

pub fn truncate(meta: &TableMeta) -> Statement {
    Statement::bare(format!("DELETE FROM {}", meta.quoted_table()))
}

pub fn count(meta: &TableMeta) -> Statement {
    Statement::bare(format!("SELECT COUNT(*) FROM {}", meta.quoted_table()))
}

/// `INSERT INTO t (cols) VALUES (?1, ..., ?n)`
///
/// # Errors
///
/// `Internal` if `values` does not have one entry per field.
pub fn insert(meta: &TableMeta, values: Vec<Value>) -> Result<Statement> {
    check_arity(meta, &values)?;
    Ok(Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            meta.quoted_table(),
            meta.quoted_column_list(),
            placeholders(1, values.len())
        ),
        params: values,
    })
}

/// `UPDATE t SET c1 = ?1, ..., cn = ?n WHERE key = ?n+1`
///
/// Binds every field value, then the key value again for the WHERE clause.
///
/// # Errors
///
/// `NoKey` if the type declares no key.
pub fn update(meta: &TableMeta, values: Vec<Value>) -> Result<Statement> {
    let key = meta.require_key()?;
    check_arity(meta, &values)?;

    let key_value = key_value(meta, key, &values)?;
    let assignments = meta
        .fields()
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = ?{}", quote_ident(&c.name), i + 1))
        .collect::<Vec<_>>()
        .join(", ");

    let mut params = values;
    let key_index = params.len() + 1;
    params.push(key_value);

    Ok(Statement {
        sql: format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            meta.quoted_table(),
            assignments,
            quote_ident(key),
            key_index
        ),
        params,
    })
}

/// `SELECT cols FROM t WHERE key = ?1`
///
/// # Errors
///
/// `NoKey` if the type declares no key.
pub fn select_by_key(meta: &TableMeta, key_value: Value) -> Result<Statement> {
    let key = meta.require_key()?;
    Ok(Statement {
        sql: format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            meta.quoted_column_list(),
            meta.quoted_table(),
            quote_ident(key)
        ),
        params: vec![key_value],
    })
}

/// Native upsert: `INSERT ... ON CONFLICT(key) DO UPDATE SET c = excluded.c, ...`
///
/// A table whose only column is the key re-assigns the key itself, so the
/// statement reports one affected row whether it inserted or matched.
///
/// # Errors
///
/// `NoKey` if the type declares no key.
pub fn upsert(meta: &TableMeta, values: Vec<Value>) -> Result<Statement> {
    let key = meta.require_key()?;
    let mut statement = insert(meta, values)?;

    let mut assigned: Vec<&str> = meta
        .fields()
        .iter()
        .map(|c| c.name.as_str())
        .filter(|name| *name != key)
        .collect();
    if assigned.is_empty() {
        assigned.push(key);
    }
    let assignments = assigned
        .iter()
        .map(|name| {
            let quoted = quote_ident(name);
            format!("{} = excluded.{}", quoted, quoted)
        })
        .collect::<Vec<_>>()
        .join(", ");

    statement.sql = format!(
        "{} ON CONFLICT({}) DO UPDATE SET {}",
        statement.sql,
        quote_ident(key),
        assignments
    );
    Ok(statement)
}

fn placeholders(first: usize, n: usize) -> String {
    (first..first + n)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

fn check_arity(meta: &TableMeta, values: &[Value]) -> Result<()> {
    if values.len() != meta.fields().len() {
        return Err(RowbindError::Internal {
            message: format!(
                "{} expects {} values, got {}",
                meta.table(),
                meta.fields().len(),
                values.len()
            ),
        });
    }
    Ok(())
}

fn key_value(meta: &TableMeta, key: &str, values: &[Value]) -> Result<Value> {
    meta.fields()
        .iter()
        .position(|c| c.name == key)
        .and_then(|i| values.get(i))
        .cloned()
        .ok_or_else(|| RowbindError::Internal {
            message: format!("key '{}' missing from {} values", key, meta.table()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::Declaration;

    fn tag_meta() -> TableMeta {
        TableMeta::derive(
            &Declaration::new("Tag")
                .field("name", "String")
                .field("uses", "i64")
                .key("name"),
        )
        .unwrap()
    }

    fn tag_values() -> Vec<Value> {
        vec![Value::Text("rust".into()), Value::Integer(3)]
    }

    #[test]
    fn test_insert() {
        let st = insert(&tag_meta(), tag_values()).unwrap();
        assert_eq!(st.sql, r#"INSERT INTO "tag" ("name", "uses") VALUES (?1, ?2)"#);
        assert_eq!(st.params, tag_values());
    }

    #[test]
    fn test_update_binds_key_last() {
        let st = update(&tag_meta(), tag_values()).unwrap();
        assert_eq!(
            st.sql,
            r#"UPDATE "tag" SET "name" = ?1, "uses" = ?2 WHERE "name" = ?3"#
        );
        assert_eq!(st.params.len(), 3);
        assert_eq!(st.params[2], Value::Text("rust".into()));
    }

    #[test]
    fn test_key_value_never_interpolated() {
        let hostile = Value::Text("x' OR '1'='1".into());
        let st = select_by_key(&tag_meta(), hostile.clone()).unwrap();
        assert_eq!(st.sql, r#"SELECT "name", "uses" FROM "tag" WHERE "name" = ?1"#);
        assert_eq!(st.params, vec![hostile.clone()]);

        let st = update(&tag_meta(), vec![hostile, Value::Integer(0)]).unwrap();
        assert!(!st.sql.contains("OR"));
    }

    #[test]
    fn test_upsert() {
        let st = upsert(&tag_meta(), tag_values()).unwrap();
        assert_eq!(
            st.sql,
            r#"INSERT INTO "tag" ("name", "uses") VALUES (?1, ?2) ON CONFLICT("name") DO UPDATE SET "uses" = excluded."uses""#
        );
    }

    #[test]
    fn test_upsert_key_only_table() {
        let meta =
            TableMeta::derive(&Declaration::new("Label").field("id", "String").key("id")).unwrap();
        let st = upsert(&meta, vec![Value::Text("a".into())]).unwrap();
        assert!(st.sql.ends_with(r#"ON CONFLICT("id") DO UPDATE SET "id" = excluded."id""#));
    }

    #[test]
    fn test_keyed_statements_require_key() {
        let meta = TableMeta::derive(&Declaration::new("Note").field("body", "String")).unwrap();
        let values = vec![Value::Text("hi".into())];
        assert!(matches!(
            update(&meta, values.clone()),
            Err(RowbindError::NoKey { .. })
        ));
        assert!(matches!(
            upsert(&meta, values),
            Err(RowbindError::NoKey { .. })
        ));
        assert!(matches!(
            select_by_key(&meta, Value::Null),
            Err(RowbindError::NoKey { .. })
        ));
    }

    #[test]
    fn test_keyword_names_quoted_everywhere() {
        let meta = TableMeta::derive(
            &Declaration::new("Order")
                .field("select", "i64")
                .field("group", "String")
                .key("select"),
        )
        .unwrap();
        let values = vec![Value::Integer(1), Value::Text("g".into())];

        let st = update(&meta, values.clone()).unwrap();
        assert_eq!(
            st.sql,
            r#"UPDATE "order" SET "select" = ?1, "group" = ?2 WHERE "select" = ?3"#
        );
        let st = upsert(&meta, values).unwrap();
        assert!(st.sql.contains(r#"ON CONFLICT("select") DO UPDATE SET "group" = excluded."group""#));
        let st = select_by_key(&meta, Value::Integer(1)).unwrap();
        assert_eq!(
            st.sql,
            r#"SELECT "select", "group" FROM "order" WHERE "select" = ?1"#
        );
    }

    #[test]
    fn test_arity_mismatch() {
        let err = insert(&tag_meta(), vec![Value::Null]).unwrap_err();
        assert!(matches!(err, RowbindError::Internal { .. }));
    }

    #[test]
    fn test_table_level_statements() {
        let meta = tag_meta();
        assert_eq!(drop_table(&meta).sql, r#"DROP TABLE IF EXISTS "tag""#);
        assert_eq!(truncate(&meta).sql, r#"DELETE FROM "tag""#);
        assert_eq!(count(&meta).sql, r#"SELECT COUNT(*) FROM "tag""#);
        assert!(create_table(&meta).sql.starts_with(r#"CREATE TABLE IF NOT EXISTS "tag""#));
    }
}
