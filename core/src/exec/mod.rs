//! Execution layer: the adapter contract, row decoding and the cached
//! read/write operations.

mod cache;
mod tx;

pub use cache::{CacheStore, Cached};
pub use tx::{Tx, begin, with_tx};

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::column::Columns;
use crate::context::Context;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::query::Statement;
use crate::quarry_trace_query;
use crate::value::{Value, ValueKind};

/// One result row as column name/value pairs, in select order.
pub type Row = Vec<(String, Value)>;

/// Cursor over a result set.
pub trait Rows {
    /// Advances to the next row; returns false once the set is exhausted.
    fn advance(&mut self) -> Result<bool>;

    /// The current row. Only valid after `advance()` returned true.
    fn row(&self) -> Result<Row>;
}

/// The pluggable database adapter contract.
///
/// The core depends on nothing beyond this shape: mutations report affected
/// rows, reads return a row cursor, and transaction primitives default to
/// plain `BEGIN`/`COMMIT`/`ROLLBACK` statements. Cancellation and deadlines
/// ride opaquely in the [`Context`]; adapters may honor them, the core never
/// interprets them.
pub trait Adapter {
    /// The placeholder dialect this adapter's statements are rendered for.
    fn dialect(&self) -> Dialect;

    /// Runs a mutation and reports the number of affected rows.
    fn execute(&self, ctx: &Context, sql: &str, params: &[Value]) -> Result<u64>;

    /// Runs a read and returns a row cursor.
    fn query<'a>(
        &'a self,
        ctx: &Context,
        sql: &str,
        params: &[Value],
    ) -> Result<Box<dyn Rows + 'a>>;

    fn begin(&self, ctx: &Context) -> Result<()> {
        self.execute(ctx, "BEGIN", &[]).map(drop)
    }

    fn commit(&self, ctx: &Context) -> Result<()> {
        self.execute(ctx, "COMMIT", &[]).map(drop)
    }

    fn rollback(&self, ctx: &Context) -> Result<()> {
        self.execute(ctx, "ROLLBACK", &[]).map(drop)
    }
}

// ==================== row decoding ====================

/// Converts a row into the JSON object entities deserialize from, coercing
/// driver-lossy representations (e.g. SQLite booleans arriving as 0/1)
/// using the registered column kinds.
fn row_to_json<E>(columns: &Columns<E>, row: &Row) -> JsonValue {
    let mut map = serde_json::Map::with_capacity(row.len());
    for (name, value) in row {
        let coerced = match columns.lookup(name) {
            Some(col) => coerce(col.kind(), value),
            None => value.to_json(),
        };
        map.insert(name.clone(), coerced);
    }
    JsonValue::Object(map)
}

fn coerce(kind: ValueKind, value: &Value) -> JsonValue {
    match (kind, value) {
        (ValueKind::Bool, Value::Int(i)) => JsonValue::Bool(*i != 0),
        (ValueKind::Float, Value::Int(i)) => JsonValue::from(*i as f64),
        _ => value.to_json(),
    }
}

fn decode<T: DeserializeOwned>(json: JsonValue) -> Result<T> {
    serde_json::from_value(json).map_err(|err| Error::Mapping(err.to_string()))
}

// ==================== cached read operations ====================

/// Runs a single-row read. Probes the request cache first; a miss executes,
/// decodes and populates it. No row at all is [`Error::NotFound`].
pub fn get_one<E: DeserializeOwned>(
    db: &dyn Adapter,
    ctx: &Context,
    columns: &Columns<E>,
    statement: &Statement,
) -> Result<E> {
    let sql = statement.sql_for(db.dialect());
    let key = cache::key(&sql, &statement.params);
    let scope = columns.table();

    if let Some(store) = ctx.cache() {
        if let Some(Cached::One(json)) = store.get(scope, &key) {
            return decode(json);
        }
    }

    quarry_trace_query!(sql, statement.params.len());
    let mut rows = db.query(ctx, &sql, &statement.params)?;
    if !rows.advance()? {
        return Err(Error::NotFound);
    }
    let json = row_to_json(columns, &rows.row()?);
    drop(rows);

    if let Some(store) = ctx.cache() {
        store.put(scope, &key, Cached::One(json.clone()));
    }
    decode(json)
}

/// Runs a list read through the same cache policy as [`get_one`].
pub fn get_multiple<E: DeserializeOwned>(
    db: &dyn Adapter,
    ctx: &Context,
    columns: &Columns<E>,
    statement: &Statement,
) -> Result<Vec<E>> {
    let sql = statement.sql_for(db.dialect());
    let key = cache::key(&sql, &statement.params);
    let scope = columns.table();

    if let Some(store) = ctx.cache() {
        if let Some(Cached::Many(items)) = store.get(scope, &key) {
            return items.into_iter().map(decode).collect();
        }
    }

    quarry_trace_query!(sql, statement.params.len());
    let mut rows = db.query(ctx, &sql, &statement.params)?;
    let mut jsons = Vec::new();
    while rows.advance()? {
        jsons.push(row_to_json(columns, &rows.row()?));
    }
    drop(rows);

    if let Some(store) = ctx.cache() {
        store.put(scope, &key, Cached::Many(jsons.clone()));
    }
    jsons.into_iter().map(decode).collect()
}

/// Runs a count read. An empty result set counts as zero.
pub fn count<E>(
    db: &dyn Adapter,
    ctx: &Context,
    columns: &Columns<E>,
    statement: &Statement,
) -> Result<u64> {
    let sql = statement.sql_for(db.dialect());
    let key = cache::key(&sql, &statement.params);
    let scope = columns.table();

    if let Some(store) = ctx.cache() {
        if let Some(Cached::Count(n)) = store.get(scope, &key) {
            return Ok(n);
        }
    }

    quarry_trace_query!(sql, statement.params.len());
    let mut rows = db.query(ctx, &sql, &statement.params)?;
    let total = if rows.advance()? {
        let row = rows.row()?;
        row.iter()
            .find(|(name, _)| name.as_str() == "count")
            .and_then(|(_, value)| match value {
                Value::Int(n) => Some(*n as u64),
                _ => None,
            })
            .ok_or_else(|| Error::Mapping("count column missing from result".into()))?
    } else {
        0
    };
    drop(rows);

    if let Some(store) = ctx.cache() {
        store.put(scope, &key, Cached::Count(total));
    }
    Ok(total)
}

// ==================== mutations ====================

/// Runs an insert. Affecting zero rows is [`Error::NoRowsAffected`]; on
/// success the entity's cache scope is wiped.
pub fn insert_one<E>(
    db: &dyn Adapter,
    ctx: &Context,
    columns: &Columns<E>,
    statement: &Statement,
) -> Result<()> {
    let affected = run_mutation(db, ctx, columns, statement)?;
    if affected == 0 {
        return Err(Error::NoRowsAffected);
    }
    Ok(())
}

/// Runs an update, reporting affected rows.
pub fn update<E>(
    db: &dyn Adapter,
    ctx: &Context,
    columns: &Columns<E>,
    statement: &Statement,
) -> Result<u64> {
    run_mutation(db, ctx, columns, statement)
}

/// Runs a delete, reporting affected rows. Deletes invalidate the cache
/// scope like every other mutation.
pub fn delete<E>(
    db: &dyn Adapter,
    ctx: &Context,
    columns: &Columns<E>,
    statement: &Statement,
) -> Result<u64> {
    run_mutation(db, ctx, columns, statement)
}

fn run_mutation<E>(
    db: &dyn Adapter,
    ctx: &Context,
    columns: &Columns<E>,
    statement: &Statement,
) -> Result<u64> {
    let sql = statement.sql_for(db.dialect());
    quarry_trace_query!(sql, statement.params.len());
    let affected = db.execute(ctx, &sql, &statement.params)?;
    if affected > 0 {
        if let Some(store) = ctx.cache() {
            store.invalidate(columns.table());
        }
    }
    Ok(affected)
}
