//! # quarry-core
//!
//! A typed query-building and execution layer: entities register typed
//! columns once, callers describe reads and writes through fluent
//! per-operation helpers or a small filter/sort string grammar, and rendered
//! parameterized SQL executes through a pluggable adapter with an optional
//! request-scoped read cache.
//!
//! ```ignore
//! let mut repo = Repository::<User>::builder("users");
//! let id = repo.add(Column::int("id", |u: &User| u.id.into()));
//! let name = repo.add(Column::text("name", |u: &User| u.name.as_str().into()));
//! let repo = repo.build()?;
//!
//! let ctx = Context::new();
//! let adults = repo.get_list(&db, &ctx, |q| {
//!     q.filter().condition(id, Op::Gt, 100i64);
//!     q.sort_str("name+");
//!     q.page(1, 20);
//! })?;
//! ```

pub mod clause;
pub mod column;
pub mod dialect;
pub mod error;
pub mod exec;
pub mod grammar;
pub mod query;
pub mod value;

mod context;
mod field;
mod fragment;
mod repository;
mod trace;

pub use clause::{Direction, GroupClause, JoinClause, OrderClause, Pager, WhereClause};
pub use column::{Action, ActionSet, Column, ColumnSet, Columns, ColumnsBuilder, Op};
pub use context::Context;
pub use dialect::Dialect;
pub use error::{Error, Result};
pub use exec::{Adapter, CacheStore, Row, Rows, Tx, begin, with_tx};
pub use field::Field;
pub use fragment::Fragment;
pub use query::{Count, Delete, GetFirst, GetList, Insert, Statement, Update};
pub use repository::{Repository, RepositoryBuilder};
pub use value::{Value, ValueKind};

/// Commonly used imports.
pub mod prelude {
    pub use crate::clause::Direction;
    pub use crate::column::{Action, Column, Op};
    pub use crate::context::Context;
    pub use crate::dialect::Dialect;
    pub use crate::error::{Error, Result};
    pub use crate::exec::{Adapter, CacheStore};
    pub use crate::field::Field;
    pub use crate::repository::{Repository, RepositoryBuilder};
    pub use crate::value::{Value, ValueKind};
}
