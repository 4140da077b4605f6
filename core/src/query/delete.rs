//! Delete helper.

use crate::clause::{JoinClause, WhereClause};
use crate::column::Columns;
use crate::error::{Error, Result};
use crate::grammar;
use crate::query::{Statement, push_clause};

/// Configures and renders one delete over the filtered set.
///
/// Rendering without any WHERE condition is a configuration error: a
/// whole-table delete must never happen implicitly.
pub struct Delete<'c, E> {
    columns: &'c Columns<E>,
    filter: WhereClause<'c, E>,
    joins: JoinClause,
    error: Option<Error>,
}

impl<'c, E> Delete<'c, E> {
    pub(crate) fn new(columns: &'c Columns<E>) -> Self {
        Delete {
            columns,
            filter: WhereClause::new(columns),
            joins: JoinClause::new(),
            error: None,
        }
    }

    pub fn filter(&mut self) -> &mut WhereClause<'c, E> {
        &mut self.filter
    }

    pub fn joins(&mut self) -> &mut JoinClause {
        &mut self.joins
    }

    pub fn filter_str(&mut self, input: &str) -> &mut Self {
        if self.error.is_none() {
            if let Err(err) = grammar::apply_filters(self.columns, &mut self.filter, input) {
                self.error = Some(err);
            }
        }
        self
    }

    pub(crate) fn render(self) -> Result<Statement> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let where_frag = self.filter.finish()?;
        if where_frag.is_empty() {
            return Err(Error::Configuration(
                "refusing to delete without a WHERE clause".into(),
            ));
        }
        let mut sql = format!("DELETE FROM {}", self.columns.table());
        push_clause(&mut sql, "", &self.joins.sql());
        push_clause(&mut sql, "WHERE", &where_frag.sql);
        Ok(Statement {
            sql,
            params: where_frag.params.to_vec(),
        })
    }
}
