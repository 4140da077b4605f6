//! Per-operation query helpers.
//!
//! Each helper is configured through a caller closure mutating its clause
//! builders, then consumed by `render()` into an immutable [`Statement`] —
//! the move makes the configuring→rendered transition irreversible.

mod count;
mod delete;
mod get;
mod insert;
mod statement;
mod update;

pub use count::Count;
pub use delete::Delete;
pub use get::{GetFirst, GetList};
pub use insert::Insert;
pub use statement::Statement;
pub use update::Update;

/// Appends `<keyword> <body>` when the body is non-empty.
pub(crate) fn push_clause(sql: &mut String, keyword: &str, body: &str) {
    if !body.is_empty() {
        sql.push(' ');
        if !keyword.is_empty() {
            sql.push_str(keyword);
            sql.push(' ');
        }
        sql.push_str(body);
    }
}
