//! ORDER BY clause builder.

use crate::column::{Action, Columns};
use crate::field::Field;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// Accumulates `<column> ASC|DESC` fragments, comma-joined at render time.
/// Columns lacking the sort action are silently skipped.
pub struct OrderClause<'c, E> {
    columns: &'c Columns<E>,
    items: Vec<String>,
}

impl<'c, E> OrderClause<'c, E> {
    pub(crate) fn new(columns: &'c Columns<E>) -> Self {
        OrderClause {
            columns,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, field: Field<E>, direction: Direction) -> &mut Self {
        if let Some(col) = self.columns.lookup(field.key()) {
            if col.has_action(Action::Sort) {
                self.items.push(format!(
                    "{} {}",
                    col.sql_ref(self.columns.table()),
                    direction.as_str()
                ));
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;

    struct Row {
        id: i64,
    }

    #[test]
    fn renders_in_push_order_and_skips_unsortable() {
        let mut b = Columns::builder("t");
        let id = b.add(Column::int("id", |r: &Row| r.id.into()));
        let hidden = b.add(
            Column::int("hidden", |r: &Row| r.id.into()).without_action(Action::Sort),
        );
        let cols = b.build().unwrap();

        let mut order = OrderClause::new(&cols);
        order
            .push(id, Direction::Desc)
            .push(hidden, Direction::Asc)
            .push(id, Direction::Asc);
        assert_eq!(order.sql(), "t.id DESC, t.id ASC");
    }
}
