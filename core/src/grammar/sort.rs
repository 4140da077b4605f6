//! Sort string validation and application.

use crate::clause::{Direction, OrderClause};
use crate::column::{Action, Columns};
use crate::error::{Error, Result};
use crate::field::Field;

fn parse_token(token: &str) -> Option<(&str, Direction)> {
    if let Some(key) = token.strip_suffix('-') {
        Some((key, Direction::Desc))
    } else if let Some(key) = token.strip_suffix('+') {
        Some((key, Direction::Asc))
    } else {
        Some((token, Direction::Asc))
    }
    .filter(|(key, _)| !key.is_empty())
}

/// Validates a comma-separated sort string (`key+` ascending, `key-`
/// descending, suffix optional). Unknown or unsortable keys are rejected:
/// client input fails fast here.
pub fn validate_sorts<E>(columns: &Columns<E>, input: &str) -> Result<()> {
    if input.is_empty() {
        return Ok(());
    }
    for token in input.split(',') {
        let (key, _) = parse_token(token)
            .ok_or_else(|| Error::Validation(format!("malformed sort token `{}`", token)))?;
        let sortable = columns
            .lookup(key)
            .is_some_and(|col| col.has_action(Action::Sort));
        if !sortable {
            return Err(Error::Validation(format!(
                "`{}` is not an available sort key",
                key
            )));
        }
    }
    Ok(())
}

/// Applies a sort string to an ORDER BY builder, silently skipping unknown
/// keys — defensive application never crashes on stale field names, by
/// contrast with [`validate_sorts`].
pub fn apply_sorts<E>(columns: &Columns<E>, order: &mut OrderClause<'_, E>, input: &str) {
    for token in input.split(',') {
        let Some((key, direction)) = parse_token(token) else {
            continue;
        };
        if let Some(col) = columns.lookup(key) {
            order.push(Field::new(col.key()), direction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;

    struct Person {
        id: i64,
        age: i64,
    }

    fn storage() -> Columns<Person> {
        let mut b = Columns::builder("people");
        b.add(Column::int("id", |p: &Person| p.id.into()));
        b.add(Column::int("age", |p: &Person| p.age.into()));
        b.add(Column::text("notes", |_: &Person| "".into()).without_action(Action::Sort));
        b.build().unwrap()
    }

    #[test]
    fn validation_rejects_unknown_keys() {
        let cols = storage();
        validate_sorts(&cols, "id-,age+").unwrap();
        assert!(matches!(
            validate_sorts(&cols, "id-,age+,unknownfield"),
            Err(Error::Validation(_))
        ));
        // Registered but not sortable.
        assert!(matches!(
            validate_sorts(&cols, "notes+"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn application_skips_unknown_keys() {
        let cols = storage();
        let mut order = OrderClause::new(&cols);
        apply_sorts(&cols, &mut order, "id-,unknownfield,age");
        assert_eq!(order.sql(), "people.id DESC, people.age ASC");
    }
}
