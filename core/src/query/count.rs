//! Count read helper.

use crate::clause::{JoinClause, WhereClause};
use crate::column::Columns;
use crate::error::{Error, Result};
use crate::grammar;
use crate::query::{Statement, push_clause};

/// Configures and renders a row count over the filtered set.
pub struct Count<'c, E> {
    columns: &'c Columns<E>,
    filter: WhereClause<'c, E>,
    joins: JoinClause,
    error: Option<Error>,
}

impl<'c, E> Count<'c, E> {
    pub(crate) fn new(columns: &'c Columns<E>) -> Self {
        Count {
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
        let mut sql = format!(
            "SELECT count(*) over() AS count FROM {}",
            self.columns.table()
        );
        push_clause(&mut sql, "", &self.joins.sql());
        let where_frag = self.filter.finish()?;
        push_clause(&mut sql, "WHERE", &where_frag.sql);
        sql.push_str(" LIMIT 1");
        Ok(Statement {
            sql,
            params: where_frag.params.to_vec(),
        })
    }
}
