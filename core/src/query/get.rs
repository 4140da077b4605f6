//! List and single-row read helpers.

use crate::clause::{
    GroupClause, JoinClause, OrderClause, Pager, WhereClause, render_projection,
};
use crate::column::{Action, Columns};
use crate::error::{Error, Result};
use crate::field::Field;
use crate::grammar;
use crate::query::{Statement, push_clause};

/// Configures and renders one list read.
pub struct GetList<'c, E> {
    columns: &'c Columns<E>,
    filter: WhereClause<'c, E>,
    order: OrderClause<'c, E>,
    group: GroupClause<'c, E>,
    joins: JoinClause,
    pager: Pager,
    excluded: Vec<Field<E>>,
    error: Option<Error>,
}

impl<'c, E> GetList<'c, E> {
    pub(crate) fn new(columns: &'c Columns<E>) -> Self {
        GetList {
            columns,
            filter: WhereClause::new(columns),
            order: OrderClause::new(columns),
            group: GroupClause::new(columns),
            joins: JoinClause::new(),
            pager: Pager::new(),
            excluded: Vec::new(),
            error: None,
        }
    }

    /// The WHERE builder.
    pub fn filter(&mut self) -> &mut WhereClause<'c, E> {
        &mut self.filter
    }

    /// The ORDER BY builder.
    pub fn order(&mut self) -> &mut OrderClause<'c, E> {
        &mut self.order
    }

    /// The GROUP BY builder.
    pub fn group(&mut self) -> &mut GroupClause<'c, E> {
        &mut self.group
    }

    /// The JOIN accumulator.
    pub fn joins(&mut self) -> &mut JoinClause {
        &mut self.joins
    }

    /// Sets 1-based pagination.
    pub fn page(&mut self, page: u64, size: u64) -> &mut Self {
        self.pager.set(page, size);
        self
    }

    /// Drops fields from the projection.
    pub fn exclude(&mut self, fields: &[Field<E>]) -> &mut Self {
        self.excluded.extend_from_slice(fields);
        self
    }

    /// Applies a client filter string to the WHERE builder.
    pub fn filter_str(&mut self, input: &str) -> &mut Self {
        if self.error.is_none() {
            if let Err(err) = grammar::apply_filters(self.columns, &mut self.filter, input) {
                self.error = Some(err);
            }
        }
        self
    }

    /// Applies a client sort string to the ORDER BY builder.
    pub fn sort_str(&mut self, input: &str) -> &mut Self {
        grammar::apply_sorts(self.columns, &mut self.order, input);
        self
    }

    pub(crate) fn render(self) -> Result<Statement> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let table = self.columns.table();

        let mut set = self.columns.set_for(Action::Select);
        set.exclude(&self.excluded);
        let projection = render_projection(&set, table)?;

        let mut sql = format!("SELECT {} FROM {}", projection, table);
        push_clause(&mut sql, "", &self.joins.sql());

        let where_frag = self.filter.finish()?;
        push_clause(&mut sql, "WHERE", &where_frag.sql);
        push_clause(&mut sql, "ORDER BY", &self.order.sql());
        push_clause(&mut sql, "GROUP BY", &self.group.sql());
        push_clause(&mut sql, "", &self.pager.sql());

        Ok(Statement {
            sql,
            params: where_frag.params.to_vec(),
        })
    }
}

/// Single-row read: a list read with page and size pinned to 1.
pub struct GetFirst<'c, E> {
    inner: GetList<'c, E>,
}

impl<'c, E> GetFirst<'c, E> {
    pub(crate) fn new(columns: &'c Columns<E>) -> Self {
        GetFirst {
            inner: GetList::new(columns),
        }
    }

    pub fn filter(&mut self) -> &mut WhereClause<'c, E> {
        self.inner.filter()
    }

    pub fn order(&mut self) -> &mut OrderClause<'c, E> {
        self.inner.order()
    }

    pub fn joins(&mut self) -> &mut JoinClause {
        self.inner.joins()
    }

    pub fn exclude(&mut self, fields: &[Field<E>]) -> &mut Self {
        self.inner.exclude(fields);
        self
    }

    pub fn filter_str(&mut self, input: &str) -> &mut Self {
        self.inner.filter_str(input);
        self
    }

    pub fn sort_str(&mut self, input: &str) -> &mut Self {
        self.inner.sort_str(input);
        self
    }

    pub(crate) fn render(mut self) -> Result<Statement> {
        self.inner.pager.set(1, 1);
        self.inner.render()
    }
}
