//! GROUP BY clause builder.

use crate::column::{Action, Columns};
use crate::field::Field;

/// Accumulates column references, comma-joined at render time. Columns
/// lacking the group action are silently skipped.
pub struct GroupClause<'c, E> {
    columns: &'c Columns<E>,
    items: Vec<String>,
}

impl<'c, E> GroupClause<'c, E> {
    pub(crate) fn new(columns: &'c Columns<E>) -> Self {
        GroupClause {
            columns,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, field: Field<E>) -> &mut Self {
        if let Some(col) = self.columns.lookup(field.key()) {
            if col.has_action(Action::Group) {
                self.items.push(col.sql_ref(self.columns.table()));
            }
        }
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn sql(&self) -> String {
        self.items.join(", ")
    }
}
