//! Update helper.

use crate::clause::{WhereClause, render_update_set};
use crate::column::{Action, Columns};
use crate::error::{Error, Result};
use crate::field::Field;
use crate::grammar;
use crate::query::{Statement, push_clause};

/// Configures and renders one update over the filtered set.
pub struct Update<'c, E> {
    columns: &'c Columns<E>,
    filter: WhereClause<'c, E>,
    excluded: Vec<Field<E>>,
    only: Option<Vec<Field<E>>>,
    error: Option<Error>,
}

impl<'c, E> Update<'c, E> {
    pub(crate) fn new(columns: &'c Columns<E>) -> Self {
        Update {
            columns,
            filter: WhereClause::new(columns),
            excluded: Vec::new(),
            only: None,
            error: None,
        }
    }

    pub fn filter(&mut self) -> &mut WhereClause<'c, E> {
        &mut self.filter
    }

    pub fn exclude(&mut self, fields: &[Field<E>]) -> &mut Self {
        self.excluded.extend_from_slice(fields);
        self
    }

    pub fn only(&mut self, fields: &[Field<E>]) -> &mut Self {
        self.only = Some(fields.to_vec());
        self
    }

    pub fn filter_str(&mut self, input: &str) -> &mut Self {
        if self.error.is_none() {
            if let Err(err) = grammar::apply_filters(self.columns, &mut self.filter, input) {
                self.error = Some(err);
            }
        }
        self
    }

    pub(crate) fn render(self, entity: &E) -> Result<Statement> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let mut set = self.columns.set_for(Action::Update);
        if let Some(only) = &self.only {
            set.only(only);
        }
        set.exclude(&self.excluded);
        let assignments = render_update_set(&set, entity)?;

        let mut sql = format!("UPDATE {} SET {}", self.columns.table(), assignments.sql);
        let where_frag = self.filter.finish()?;
        push_clause(&mut sql, "WHERE", &where_frag.sql);

        let mut params = assignments.params.to_vec();
        params.extend(where_frag.params);
        Ok(Statement { sql, params })
    }
}
