//! UPDATE SET rendering.

use crate::column::ColumnSet;
use crate::error::{Error, Result};
use crate::fragment::Fragment;

/// Renders `col = ?, col = ?, ...` with values pulled from the entity in
/// the same order as the rendered columns.
pub(crate) fn render_update_set<E>(set: &ColumnSet<'_, E>, entity: &E) -> Result<Fragment> {
    if set.is_empty() {
        return Err(Error::Configuration(
            "update has no columns: every updatable column was excluded".into(),
        ));
    }
    let mut assignments = Vec::with_capacity(set.len());
    let mut frag = Fragment::new();
    for col in set.iter() {
        assignments.push(format!("{} = ?", col.insert_name()));
        frag.params.push(col.value_of(entity)?);
    }
    frag.sql = assignments.join(", ");
    Ok(frag)
}
