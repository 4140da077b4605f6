//! Clause builders: stateful accumulators for the pieces of one statement.
//!
//! Builders are created fresh per logical call and are not shared across
//! concurrent operations; none of them synchronize internally.

mod filter;
mod group;
mod insert;
mod join;
mod order;
mod page;
mod select;
mod update;

pub use filter::WhereClause;
pub use group::GroupClause;
pub use join::JoinClause;
pub use order::{Direction, OrderClause};
pub use page::Pager;

pub(crate) use insert::{InsertValues, render_insert};
pub(crate) use select::render_projection;
pub(crate) use update::render_update_set;
