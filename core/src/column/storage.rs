//! Column storage: registration-ordered mapping from field identity to
//! column, plus per-statement execution views.

use std::collections::HashMap;

use crate::column::{Action, Column};
use crate::error::{Error, Result};
use crate::field::Field;

/// Registers columns for one entity and hands out typed field handles.
pub struct ColumnsBuilder<E> {
    table: String,
    cols: Vec<Column<E>>,
}

impl<E> ColumnsBuilder<E> {
    pub fn new(table: impl Into<String>) -> Self {
        ColumnsBuilder {
            table: table.into(),
            cols: Vec::new(),
        }
    }

    /// Adds a column and returns its typed handle.
    pub fn add(&mut self, column: Column<E>) -> Field<E> {
        let field = Field::new(column.key());
        self.cols.push(column);
        field
    }

    /// Finalizes the storage. Duplicate keys and invalid column setups are
    /// configuration errors, fatal at build time.
    pub fn build(self) -> Result<Columns<E>> {
        let mut index = HashMap::with_capacity(self.cols.len());
        for (i, col) in self.cols.iter().enumerate() {
            col.validate()?;
            if index.insert(col.key(), i).is_some() {
                return Err(Error::Configuration(format!(
                    "field `{}` is registered twice",
                    col.key()
                )));
            }
        }
        Ok(Columns {
            table: self.table,
            cols: self.cols,
            index,
        })
    }
}

/// Immutable column storage for one entity, keyed by field identity and
/// preserving registration order for deterministic rendering.
pub struct Columns<E> {
    table: String,
    cols: Vec<Column<E>>,
    index: HashMap<&'static str, usize>,
}

impl<E> Columns<E> {
    pub fn builder(table: impl Into<String>) -> ColumnsBuilder<E> {
        ColumnsBuilder::new(table)
    }

    #[inline]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Resolves a typed handle. A miss means the handle came from a
    /// different storage of the same entity type, which is a programmer
    /// error surfaced as a configuration error.
    pub fn get(&self, field: Field<E>) -> Result<&Column<E>> {
        self.lookup(field.key()).ok_or_else(|| {
            Error::Configuration(format!("field `{}` is not registered", field.key()))
        })
    }

    /// Resolves a client-supplied field key, as used by the filter grammar.
    pub fn lookup(&self, key: &str) -> Option<&Column<E>> {
        self.index.get(key).map(|&i| &self.cols[i])
    }

    /// All columns in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Column<E>> {
        self.cols.iter()
    }

    /// Per-statement view over the columns carrying `action`.
    pub fn set_for(&self, action: Action) -> ColumnSet<'_, E> {
        ColumnSet {
            cols: self
                .cols
                .iter()
                .filter(|c| c.has_action(action))
                .collect(),
        }
    }
}

/// Mutable per-statement view over a subset of columns for one action.
/// Built, narrowed with [`exclude`](ColumnSet::exclude) /
/// [`only`](ColumnSet::only), rendered once and discarded.
pub struct ColumnSet<'a, E> {
    cols: Vec<&'a Column<E>>,
}

impl<'a, E> ColumnSet<'a, E> {
    /// Drops the given fields from the view.
    pub fn exclude(&mut self, fields: &[Field<E>]) {
        self.cols
            .retain(|c| !fields.iter().any(|f| f.key() == c.key()));
    }

    /// Narrows the view to the given fields, preserving registration order.
    pub fn only(&mut self, fields: &[Field<E>]) {
        self.cols
            .retain(|c| fields.iter().any(|f| f.key() == c.key()));
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Column<E>> + '_ {
        self.cols.iter().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    struct User {
        id: i64,
        name: String,
    }

    fn storage() -> (Columns<User>, Field<User>, Field<User>) {
        let mut b = Columns::builder("users");
        let id = b.add(Column::int("id", |u: &User| u.id.into()));
        let name = b.add(Column::text("name", |u: &User| u.name.as_str().into()));
        b.add(Column::text("role", |_: &User| Value::Null).protected());
        (b.build().unwrap(), id, name)
    }

    #[test]
    fn duplicate_registration_fails_at_build() {
        let mut b = Columns::<User>::builder("users");
        b.add(Column::int("id", |u: &User| u.id.into()));
        b.add(Column::int("id", |u: &User| u.id.into()));
        assert!(matches!(b.build(), Err(Error::Configuration(_))));
    }

    #[test]
    fn handles_resolve_and_keys_lookup() {
        let (cols, id, _) = storage();
        assert_eq!(cols.get(id).unwrap().key(), "id");
        assert!(cols.lookup("name").is_some());
        assert!(cols.lookup("nope").is_none());
    }

    #[test]
    fn action_views_preserve_registration_order() {
        let (cols, _, _) = storage();
        let set = cols.set_for(Action::Insert);
        let keys: Vec<_> = set.iter().map(|c| c.key()).collect();
        // `role` is protected, so it carries no insert action.
        assert_eq!(keys, ["id", "name"]);
    }

    #[test]
    fn exclude_and_only_narrow_the_view() {
        let (cols, id, name) = storage();

        let mut set = cols.set_for(Action::Select);
        set.exclude(&[name]);
        let keys: Vec<_> = set.iter().map(|c| c.key()).collect();
        assert_eq!(keys, ["id", "role"]);

        let mut set = cols.set_for(Action::Select);
        set.only(&[id]);
        assert_eq!(set.len(), 1);
    }
}
