//! # quarry
//!
//! A type-safe SQL query building and execution layer.
//!
//! Entities register typed columns once; reads and writes are described
//! through fluent per-operation helpers or a compact client filter/sort
//! grammar, rendered into parameterized SQL and executed through a
//! pluggable adapter with an optional request-scoped read cache.
//!
//! ```ignore
//! use quarry::prelude::*;
//! use quarry::sqlite::SqliteAdapter;
//!
//! #[derive(serde::Deserialize)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! let mut b = Repository::<User>::builder("users");
//! let id = b.add(Column::int("id", |u: &User| u.id.into()));
//! let name = b.add(Column::text("name", |u: &User| u.name.as_str().into()));
//! let repo = b.build()?;
//!
//! let db = SqliteAdapter::open_in_memory()?;
//! let ctx = Context::new();
//! let users = repo.get_list(&db, &ctx, |q| {
//!     q.filter_str("name:bw:An");
//!     q.sort_str("id-");
//!     q.page(1, 20);
//! })?;
//! ```
//!
//! ## Driver support
//!
//! | Database | Driver   | Feature flag | Member crate      |
//! |----------|----------|--------------|-------------------|
//! | SQLite   | rusqlite | `rusqlite`   | `quarry-rusqlite` |
//!
//! Any other database plugs in by implementing [`Adapter`](quarry_core::Adapter).

pub use quarry_core::*;

#[cfg(feature = "rusqlite")]
pub use quarry_rusqlite as sqlite;
