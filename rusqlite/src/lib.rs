//! # quarry-rusqlite
//!
//! The reference [`Adapter`] implementation over `rusqlite` (bundled
//! SQLite). Statements render with `?` markers, which SQLite takes as-is;
//! UUIDs and timestamps bind as text (RFC 3339 for timestamps).

use std::time::Instant;

use quarry_core::{Adapter, Context, Dialect, Error, Result, Row, Rows, Value};

/// Adapter over one `rusqlite` connection.
pub struct SqliteAdapter {
    conn: rusqlite::Connection,
}

impl SqliteAdapter {
    /// Wraps an existing connection.
    pub fn new(conn: rusqlite::Connection) -> Self {
        SqliteAdapter { conn }
    }

    /// Opens an in-memory database, as used by tests.
    pub fn open_in_memory() -> Result<Self> {
        rusqlite::Connection::open_in_memory()
            .map(Self::new)
            .map_err(wrap)
    }

    /// Opens a database file.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        rusqlite::Connection::open(path).map(Self::new).map_err(wrap)
    }

    /// Access to the underlying connection, e.g. for schema setup.
    pub fn connection(&self) -> &rusqlite::Connection {
        &self.conn
    }

    fn check_deadline(ctx: &Context) -> Result<()> {
        match ctx.deadline() {
            Some(deadline) if deadline <= Instant::now() => {
                Err(Error::Execution("deadline exceeded".into()))
            }
            _ => Ok(()),
        }
    }
}

fn wrap(err: rusqlite::Error) -> Error {
    Error::Execution(err.to_string())
}

/// Converts one bound parameter into its SQLite representation.
///
/// Lists never reach an adapter: `in`/`nin` conditions expand to one scalar
/// parameter per element at render time.
fn bind_value(value: &Value) -> Result<rusqlite::types::Value> {
    use rusqlite::types::Value as Sql;
    Ok(match value {
        Value::Null => Sql::Null,
        Value::Bool(b) => Sql::Integer(i64::from(*b)),
        Value::Int(i) => Sql::Integer(*i),
        Value::Float(f) => Sql::Real(*f),
        Value::Text(s) => Sql::Text(s.clone()),
        Value::Uuid(u) => Sql::Text(u.to_string()),
        Value::Timestamp(ts) => Sql::Text(ts.to_rfc3339()),
        Value::List(_) => {
            return Err(Error::Execution(
                "list parameter reached the adapter unexpanded".into(),
            ));
        }
    })
}

fn read_value(value: rusqlite::types::ValueRef<'_>) -> Result<Value> {
    use rusqlite::types::ValueRef;
    Ok(match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(r) => Value::Float(r),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|s| Value::Text(s.to_owned()))
            .map_err(|_| Error::Mapping("non-UTF-8 text column".into()))?,
        ValueRef::Blob(_) => {
            return Err(Error::Mapping("BLOB columns are not supported".into()));
        }
    })
}

/// Result sets are collected eagerly; `rusqlite` cursors borrow their
/// statement, so a streaming handle cannot outlive this call.
struct CollectedRows {
    rows: Vec<Row>,
    pos: Option<usize>,
}

impl Rows for CollectedRows {
    fn advance(&mut self) -> Result<bool> {
        let next = self.pos.map_or(0, |p| p + 1);
        if next < self.rows.len() {
            self.pos = Some(next);
            Ok(true)
        } else {
            self.pos = None;
            Ok(false)
        }
    }

    fn row(&self) -> Result<Row> {
        let pos = self
            .pos
            .ok_or_else(|| Error::Execution("row cursor is not positioned".into()))?;
        Ok(self.rows[pos].clone())
    }
}

impl Adapter for SqliteAdapter {
    fn dialect(&self) -> Dialect {
        Dialect::SQLite
    }

    fn execute(&self, ctx: &Context, sql: &str, params: &[Value]) -> Result<u64> {
        Self::check_deadline(ctx)?;
        let bound = params.iter().map(bind_value).collect::<Result<Vec<_>>>()?;
        let mut stmt = self.conn.prepare(sql).map_err(wrap)?;
        let affected = stmt
            .execute(rusqlite::params_from_iter(bound))
            .map_err(wrap)?;
        Ok(affected as u64)
    }

    fn query<'a>(
        &'a self,
        ctx: &Context,
        sql: &str,
        params: &[Value],
    ) -> Result<Box<dyn Rows + 'a>> {
        Self::check_deadline(ctx)?;
        let bound = params.iter().map(bind_value).collect::<Result<Vec<_>>>()?;
        let mut stmt = self.conn.prepare(sql).map_err(wrap)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_owned)
            .collect();

        let mut cursor = stmt
            .query(rusqlite::params_from_iter(bound))
            .map_err(wrap)?;
        let mut rows = Vec::new();
        while let Some(row) = cursor.next().map_err(wrap)? {
            let mut decoded = Row::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                let value = read_value(row.get_ref(i).map_err(wrap)?)?;
                decoded.push((name.clone(), value));
            }
            rows.push(decoded);
        }
        Ok(Box::new(CollectedRows { rows, pos: None }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_scalars_and_rejects_lists() {
        use rusqlite::types::Value as Sql;
        assert_eq!(bind_value(&Value::Bool(true)).unwrap(), Sql::Integer(1));
        assert_eq!(bind_value(&Value::Int(-3)).unwrap(), Sql::Integer(-3));
        assert_eq!(
            bind_value(&Value::Text("x".into())).unwrap(),
            Sql::Text("x".into())
        );
        assert!(matches!(bind_value(&Value::Null).unwrap(), Sql::Null));
        assert!(bind_value(&Value::List(vec![])).is_err());
    }

    #[test]
    fn deadline_in_the_past_fails_fast() {
        let db = SqliteAdapter::open_in_memory().unwrap();
        let ctx = Context::new().with_deadline(Instant::now());
        assert!(db.execute(&ctx, "SELECT 1", &[]).is_err());
    }
}
