//! The four-operation data store.
//!
//! Every table access in the application funnels through [`Store`]:
//! `insert`, `read`, `update`, and `delete` over `(table, columns, values)`
//! shaped input. SQL text is assembled from validated identifiers only;
//! every value travels as a bind parameter, so no user-controlled data is
//! ever formatted into query text.
//!
//! Each operation is a single auto-committed statement. No transaction
//! boundary is exposed at this layer.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::StoreError;

/// A bind value for the store's operations.
///
/// Decimals travel as their canonical text form; SQLite has no decimal
/// column type and text keeps the arithmetic exact on the way back out.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
    Decimal(Decimal),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Append this value to a query as a bind parameter.
    fn push_bind(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            Self::Null => qb.push_bind(None::<String>),
            Self::Integer(i) => qb.push_bind(*i),
            Self::Text(s) => qb.push_bind(s.clone()),
            Self::Decimal(d) => qb.push_bind(d.to_string()),
            Self::Date(d) => qb.push_bind(*d),
            Self::Timestamp(t) => qb.push_bind(*t),
        };
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Timestamp(t)
    }
}

impl From<Option<String>> for Value {
    fn from(o: Option<String>) -> Self {
        o.map_or(Self::Null, Self::Text)
    }
}

/// A column/value pair used in filters and update sets.
pub type Pair<'a> = (&'a str, Value);

/// The data store: four parameterized operations over named tables.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Create a store over a connection pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert one row; returns the new rowid.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Shape` if `columns` and `values` differ in
    /// length, either is empty, or an identifier is invalid;
    /// `StoreError::Database` if the statement fails.
    pub async fn insert(
        &self,
        table: &str,
        columns: &[&str],
        values: &[Value],
    ) -> Result<i64, StoreError> {
        if columns.len() != values.len() {
            return Err(StoreError::Shape(format!(
                "insert into {table}: {} columns but {} values",
                columns.len(),
                values.len()
            )));
        }
        if columns.is_empty() {
            return Err(StoreError::Shape(format!(
                "insert into {table}: no columns"
            )));
        }
        check_identifier(table)?;
        for column in columns {
            check_identifier(column)?;
        }

        let mut qb = QueryBuilder::<Sqlite>::new("INSERT INTO ");
        qb.push(table);
        qb.push(" (");
        {
            let mut sep = qb.separated(", ");
            for column in columns {
                sep.push(*column);
            }
        }
        qb.push(") VALUES (");
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            value.push_bind(&mut qb);
        }
        qb.push(")");

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.last_insert_rowid())
    }

    /// Read rows, optionally filtered and projected.
    ///
    /// With no filter every row is returned. A filter matches on equality
    /// of every listed field, AND-conjoined; with `like` set, each field
    /// matches as a `LIKE` pattern instead. A miss is an empty vector,
    /// never an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Shape` on an invalid identifier or an empty
    /// projection list; `StoreError::Database` if the query fails.
    pub async fn read(
        &self,
        table: &str,
        filter: Option<&[Pair<'_>]>,
        columns: Option<&[&str]>,
        like: bool,
    ) -> Result<Vec<SqliteRow>, StoreError> {
        check_identifier(table)?;

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT ");
        match columns {
            None => {
                qb.push("*");
            }
            Some([]) => {
                return Err(StoreError::Shape(format!(
                    "read from {table}: empty projection"
                )));
            }
            Some(names) => {
                for name in names {
                    check_identifier(name)?;
                }
                let mut sep = qb.separated(", ");
                for name in names {
                    sep.push(*name);
                }
            }
        }
        qb.push(" FROM ");
        qb.push(table);

        if let Some(pairs) = filter
            && !pairs.is_empty()
        {
            push_where(&mut qb, pairs, like)?;
        }

        let rows = qb.build().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Update matching rows; returns the number of rows changed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnsafeOperation` if the filter is empty (a
    /// whole-table rewrite is never allowed through this layer),
    /// `StoreError::Shape` on an empty set map or invalid identifier, and
    /// `StoreError::Database` if the statement fails.
    pub async fn update(
        &self,
        table: &str,
        set: &[Pair<'_>],
        filter: &[Pair<'_>],
    ) -> Result<u64, StoreError> {
        if filter.is_empty() {
            return Err(StoreError::UnsafeOperation(format!(
                "update on {table} with no filter"
            )));
        }
        if set.is_empty() {
            return Err(StoreError::Shape(format!("update on {table}: empty set")));
        }
        check_identifier(table)?;

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE ");
        qb.push(table);
        qb.push(" SET ");
        for (i, (column, value)) in set.iter().enumerate() {
            check_identifier(column)?;
            if i > 0 {
                qb.push(", ");
            }
            qb.push(*column);
            qb.push(" = ");
            value.push_bind(&mut qb);
        }
        push_where(&mut qb, filter, false)?;

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Delete matching rows; returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnsafeOperation` if the filter is empty,
    /// `StoreError::Shape` on an invalid identifier, and
    /// `StoreError::Database` if the statement fails.
    pub async fn delete(&self, table: &str, filter: &[Pair<'_>]) -> Result<u64, StoreError> {
        if filter.is_empty() {
            return Err(StoreError::UnsafeOperation(format!(
                "delete on {table} with no filter"
            )));
        }
        check_identifier(table)?;

        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM ");
        qb.push(table);
        push_where(&mut qb, filter, false)?;

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

/// Append an AND-conjoined WHERE clause with bound values.
fn push_where(
    qb: &mut QueryBuilder<'_, Sqlite>,
    pairs: &[Pair<'_>],
    like: bool,
) -> Result<(), StoreError> {
    qb.push(" WHERE ");
    for (i, (column, value)) in pairs.iter().enumerate() {
        check_identifier(column)?;
        if i > 0 {
            qb.push(" AND ");
        }
        qb.push(*column);
        qb.push(if like { " LIKE " } else { " = " });
        value.push_bind(qb);
    }
    Ok(())
}

/// Identifiers (table and column names) are spliced into SQL text, so they
/// are restricted to `[A-Za-z_][A-Za-z0-9_]*`.
fn check_identifier(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(StoreError::Shape(format!("invalid identifier: {name:?}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sqlx::Row;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn test_store() -> Store {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("CREATE TABLE widgets (id INTEGER PRIMARY KEY, name TEXT NOT NULL, qty INTEGER NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();
        Store::new(pool)
    }

    #[tokio::test]
    async fn test_insert_shape_mismatch() {
        let store = test_store().await;
        let err = store
            .insert("widgets", &["name", "qty"], &[Value::from("gauze")])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Shape(_)));

        let err = store.insert("widgets", &[], &[]).await.unwrap_err();
        assert!(matches!(err, StoreError::Shape(_)));
    }

    #[tokio::test]
    async fn test_insert_and_read_roundtrip() {
        let store = test_store().await;
        let id = store
            .insert("widgets", &["name", "qty"], &[Value::from("gauze"), Value::from(4_i64)])
            .await
            .unwrap();
        assert_eq!(id, 1);

        let rows = store
            .read("widgets", Some(&[("name", Value::from("gauze"))]), None, false)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get::<i64, _>("qty"), 4);
    }

    #[tokio::test]
    async fn test_read_empty_table_is_empty_vec() {
        let store = test_store().await;
        let rows = store.read("widgets", None, None, false).await.unwrap();
        assert!(rows.is_empty());

        let rows = store
            .read("widgets", Some(&[("name", Value::from("absent"))]), None, false)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_read_projection_and_like() {
        let store = test_store().await;
        for (name, qty) in [("paracetamol", 10_i64), ("paraffin", 3), ("gauze", 7)] {
            store
                .insert("widgets", &["name", "qty"], &[Value::from(name), Value::from(qty)])
                .await
                .unwrap();
        }

        let rows = store
            .read(
                "widgets",
                Some(&[("name", Value::from("%para%"))]),
                Some(&["name"]),
                true,
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        // Projected rows carry only the requested column.
        assert!(rows[0].try_get::<i64, _>("qty").is_err());
    }

    #[tokio::test]
    async fn test_update_requires_filter() {
        let store = test_store().await;
        store
            .insert("widgets", &["name", "qty"], &[Value::from("gauze"), Value::from(4_i64)])
            .await
            .unwrap();

        let err = store
            .update("widgets", &[("qty", Value::from(0_i64))], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnsafeOperation(_)));

        // And the rejected call left the table untouched.
        let rows = store.read("widgets", None, None, false).await.unwrap();
        assert_eq!(rows[0].get::<i64, _>("qty"), 4);
    }

    #[tokio::test]
    async fn test_delete_requires_filter() {
        let store = test_store().await;
        store
            .insert("widgets", &["name", "qty"], &[Value::from("gauze"), Value::from(4_i64)])
            .await
            .unwrap();

        let err = store.delete("widgets", &[]).await.unwrap_err();
        assert!(matches!(err, StoreError::UnsafeOperation(_)));
        assert_eq!(store.read("widgets", None, None, false).await.unwrap().len(), 1);

        let removed = store
            .delete("widgets", &[("name", Value::from("gauze"))])
            .await
            .unwrap();
        assert_eq!(removed, 1);
    }

    #[tokio::test]
    async fn test_update_changes_matching_rows() {
        let store = test_store().await;
        store
            .insert("widgets", &["name", "qty"], &[Value::from("gauze"), Value::from(4_i64)])
            .await
            .unwrap();

        let changed = store
            .update(
                "widgets",
                &[("qty", Value::from(9_i64))],
                &[("name", Value::from("gauze"))],
            )
            .await
            .unwrap();
        assert_eq!(changed, 1);

        let rows = store.read("widgets", None, None, false).await.unwrap();
        assert_eq!(rows[0].get::<i64, _>("qty"), 9);
    }

    #[tokio::test]
    async fn test_identifier_validation_blocks_injection() {
        let store = test_store().await;
        let err = store
            .read("widgets; DROP TABLE widgets", None, None, false)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Shape(_)));

        let err = store
            .insert(
                "widgets",
                &["name) VALUES ('x'); --", "qty"],
                &[Value::from("x"), Value::from(1_i64)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Shape(_)));
    }

    #[tokio::test]
    async fn test_malicious_value_stays_data() {
        let store = test_store().await;
        let hostile = "'); DROP TABLE widgets; --";
        store
            .insert("widgets", &["name", "qty"], &[Value::from(hostile), Value::from(1_i64)])
            .await
            .unwrap();

        let rows = store
            .read("widgets", Some(&[("name", Value::from(hostile))]), None, false)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get::<String, _>("name"), hostile);
    }
}
