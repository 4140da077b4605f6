//! Entity repositories: column registration plus the operation surface.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::clause::WhereClause;
use crate::column::{Column, Columns, ColumnsBuilder};
use crate::context::Context;
use crate::error::Result;
use crate::exec::{self, Adapter};
use crate::field::Field;
use crate::grammar;
use crate::query::{Count, Delete, GetFirst, GetList, Insert, Update};

type BaseFilter<E> = Arc<dyn Fn(&mut WhereClause<'_, E>) + Send + Sync>;

/// Configures a [`Repository`]: columns, a persistent filter and persistent
/// exclusions. Configuration mistakes surface at [`build`](Self::build) and
/// are fatal to startup.
pub struct RepositoryBuilder<E> {
    columns: ColumnsBuilder<E>,
    base_filter: Option<BaseFilter<E>>,
    base_exclude: Vec<Field<E>>,
}

impl<E> RepositoryBuilder<E> {
    pub fn new(table: impl Into<String>) -> Self {
        RepositoryBuilder {
            columns: ColumnsBuilder::new(table),
            base_filter: None,
            base_exclude: Vec::new(),
        }
    }

    /// Registers a column, returning its typed field handle.
    pub fn add(&mut self, column: Column<E>) -> Field<E> {
        self.columns.add(column)
    }

    /// Configures a base filter applied to every query (e.g. a soft-delete
    /// predicate). It is rendered inside its own group and combined with
    /// user conditions by the automatic AND, so it can never be OR'd away.
    pub fn persistent_filter(
        &mut self,
        f: impl Fn(&mut WhereClause<'_, E>) + Send + Sync + 'static,
    ) -> &mut Self {
        self.base_filter = Some(Arc::new(f));
        self
    }

    /// Fields excluded from every statement's column sets.
    pub fn exclude_always(&mut self, fields: &[Field<E>]) -> &mut Self {
        self.base_exclude.extend_from_slice(fields);
        self
    }

    pub fn build(self) -> Result<Repository<E>> {
        Ok(Repository {
            columns: self.columns.build()?,
            base_filter: self.base_filter,
            base_exclude: self.base_exclude,
        })
    }
}

/// The per-entity query surface. Immutable once built; create helpers fresh
/// per logical call through the operation methods.
pub struct Repository<E> {
    columns: Columns<E>,
    base_filter: Option<BaseFilter<E>>,
    base_exclude: Vec<Field<E>>,
}

impl<E> Repository<E> {
    pub fn builder(table: impl Into<String>) -> RepositoryBuilder<E> {
        RepositoryBuilder::new(table)
    }

    #[inline]
    pub fn columns(&self) -> &Columns<E> {
        &self.columns
    }

    /// Validates a client filter string without executing anything.
    pub fn validate_filters(&self, input: &str) -> Result<()> {
        grammar::validate_filters(&self.columns, input)
    }

    /// Validates a client sort string without executing anything.
    pub fn validate_sorts(&self, input: &str) -> Result<()> {
        grammar::validate_sorts(&self.columns, input)
    }

    fn apply_base(&self, filter: &mut WhereClause<'_, E>) {
        if let Some(base) = &self.base_filter {
            filter.base_group(base.as_ref());
        }
    }

    /// Counts rows matching the configured filter.
    pub fn count(
        &self,
        db: &dyn Adapter,
        ctx: &Context,
        cfg: impl FnOnce(&mut Count<'_, E>),
    ) -> Result<u64> {
        let mut helper = Count::new(&self.columns);
        self.apply_base(helper.filter());
        cfg(&mut helper);
        let statement = helper.render()?;
        exec::count(db, ctx, &self.columns, &statement)
    }

    /// Reads the first matching row; [`NotFound`](crate::Error::NotFound)
    /// when nothing matches.
    pub fn get_first(
        &self,
        db: &dyn Adapter,
        ctx: &Context,
        cfg: impl FnOnce(&mut GetFirst<'_, E>),
    ) -> Result<E>
    where
        E: DeserializeOwned,
    {
        let mut helper = GetFirst::new(&self.columns);
        self.apply_base(helper.filter());
        helper.exclude(&self.base_exclude);
        cfg(&mut helper);
        let statement = helper.render()?;
        exec::get_one(db, ctx, &self.columns, &statement)
    }

    /// Reads the matching rows.
    pub fn get_list(
        &self,
        db: &dyn Adapter,
        ctx: &Context,
        cfg: impl FnOnce(&mut GetList<'_, E>),
    ) -> Result<Vec<E>>
    where
        E: DeserializeOwned,
    {
        let mut helper = GetList::new(&self.columns);
        self.apply_base(helper.filter());
        helper.exclude(&self.base_exclude);
        cfg(&mut helper);
        let statement = helper.render()?;
        exec::get_multiple(db, ctx, &self.columns, &statement)
    }

    /// Inserts one entity;
    /// [`NoRowsAffected`](crate::Error::NoRowsAffected) when the insert
    /// changed nothing.
    pub fn insert(
        &self,
        db: &dyn Adapter,
        ctx: &Context,
        entity: &E,
        cfg: impl FnOnce(&mut Insert<'_, E>),
    ) -> Result<()> {
        let mut helper = Insert::new(&self.columns);
        helper.exclude(&self.base_exclude);
        cfg(&mut helper);
        let statement = helper.render(entity)?;
        exec::insert_one(db, ctx, &self.columns, &statement)
    }

    /// Updates the matching rows from the entity's values, reporting how
    /// many were affected.
    pub fn update(
        &self,
        db: &dyn Adapter,
        ctx: &Context,
        entity: &E,
        cfg: impl FnOnce(&mut Update<'_, E>),
    ) -> Result<u64> {
        let mut helper = Update::new(&self.columns);
        self.apply_base(helper.filter());
        helper.exclude(&self.base_exclude);
        cfg(&mut helper);
        let statement = helper.render(entity)?;
        exec::update(db, ctx, &self.columns, &statement)
    }

    /// Deletes the matching rows, reporting how many were affected.
    /// Deleting without any filter is refused.
    pub fn delete(
        &self,
        db: &dyn Adapter,
        ctx: &Context,
        cfg: impl FnOnce(&mut Delete<'_, E>),
    ) -> Result<u64> {
        let mut helper = Delete::new(&self.columns);
        self.apply_base(helper.filter());
        cfg(&mut helper);
        let statement = helper.render()?;
        exec::delete(db, ctx, &self.columns, &statement)
    }
}
