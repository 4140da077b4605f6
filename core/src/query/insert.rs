//! Insert helper.

use crate::clause::render_insert;
use crate::column::{Action, Columns};
use crate::error::Result;
use crate::field::Field;
use crate::query::Statement;

/// Configures and renders one row insert.
pub struct Insert<'c, E> {
    columns: &'c Columns<E>,
    excluded: Vec<Field<E>>,
    only: Option<Vec<Field<E>>>,
}

impl<'c, E> Insert<'c, E> {
    pub(crate) fn new(columns: &'c Columns<E>) -> Self {
        Insert {
            columns,
            excluded: Vec::new(),
            only: None,
        }
    }

    /// Drops fields from the insert column set.
    pub fn exclude(&mut self, fields: &[Field<E>]) -> &mut Self {
        self.excluded.extend_from_slice(fields);
        self
    }

    /// Narrows the insert column set to the given fields.
    pub fn only(&mut self, fields: &[Field<E>]) -> &mut Self {
        self.only = Some(fields.to_vec());
        self
    }

    pub(crate) fn render(self, entity: &E) -> Result<Statement> {
        let mut set = self.columns.set_for(Action::Insert);
        if let Some(only) = &self.only {
            set.only(only);
        }
        set.exclude(&self.excluded);
        let insert = render_insert(&set, entity)?;
        Ok(Statement {
            sql: format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.columns.table(),
                insert.columns_sql,
                insert.markers
            ),
            params: insert.params,
        })
    }
}
