//! SELECT projection rendering.

use crate::column::ColumnSet;
use crate::error::{Error, Result};

/// Renders the projection list over a select-action column view. Excluding
/// every column is a configuration error: a statement with an empty
/// projection cannot be meaningfully executed.
pub(crate) fn render_projection<E>(set: &ColumnSet<'_, E>, table: &str) -> Result<String> {
    if set.is_empty() {
        return Err(Error::Configuration(
            "projection is empty: every selectable column was excluded".into(),
        ));
    }
    Ok(set
        .iter()
        .map(|col| col.select_sql(table))
        .collect::<Vec<_>>()
        .join(", "))
}
