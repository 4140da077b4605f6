//! INSERT column/value rendering.

use crate::column::ColumnSet;
use crate::error::{Error, Result};
use crate::value::Value;

/// Rendered pieces of an INSERT statement.
pub(crate) struct InsertValues {
    /// `col, col, ...` in registration order.
    pub columns_sql: String,
    /// `?, ?, ...`, one marker per column.
    pub markers: String,
    /// Bound values; `params[i]` belongs to column `i`.
    pub params: Vec<Value>,
}

/// Renders the insert column list and pulls the corresponding values from
/// the entity instance. Order correspondence between columns and values is
/// the invariant everything downstream relies on.
pub(crate) fn render_insert<E>(set: &ColumnSet<'_, E>, entity: &E) -> Result<InsertValues> {
    if set.is_empty() {
        return Err(Error::Configuration(
            "insert has no columns: every insertable column was excluded".into(),
        ));
    }
    let mut names = Vec::with_capacity(set.len());
    let mut params = Vec::with_capacity(set.len());
    for col in set.iter() {
        names.push(col.insert_name().to_owned());
        params.push(col.value_of(entity)?);
    }
    Ok(InsertValues {
        columns_sql: names.join(", "),
        markers: vec!["?"; params.len()].join(", "),
        params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{Action, Column, Columns};

    struct Item {
        id: i64,
        label: String,
    }

    #[test]
    fn values_bind_in_column_order() {
        let mut b = Columns::builder("items");
        b.add(Column::int("id", |i: &Item| i.id.into()));
        b.add(Column::text("label", |i: &Item| i.label.as_str().into()));
        let cols = b.build().unwrap();

        let item = Item {
            id: 7,
            label: "bolt".into(),
        };
        let insert = render_insert(&cols.set_for(Action::Insert), &item).unwrap();
        assert_eq!(insert.columns_sql, "id, label");
        assert_eq!(insert.markers, "?, ?");
        assert_eq!(
            insert.params,
            vec![Value::Int(7), Value::Text("bolt".into())]
        );
    }

    #[test]
    fn excluding_down_to_one_column_keeps_one_value() {
        let mut b = Columns::builder("items");
        let id = b.add(Column::int("id", |i: &Item| i.id.into()));
        b.add(Column::text("label", |i: &Item| i.label.as_str().into()));
        let cols = b.build().unwrap();

        let mut set = cols.set_for(Action::Insert);
        set.only(&[id]);
        let item = Item {
            id: 1,
            label: String::new(),
        };
        let insert = render_insert(&set, &item).unwrap();
        assert_eq!(insert.columns_sql, "id");
        assert_eq!(insert.params, vec![Value::Int(1)]);
    }
}
