//! WHERE clause builder with the boolean grouping protocol.

use crate::column::{Columns, Op};
use crate::error::{Error, Result};
use crate::field::Field;
use crate::fragment::Fragment;
use crate::value::Value;

/// Accumulates WHERE conditions into an append-only text buffer and a
/// positional value list.
///
/// Before a new condition or group is appended, the builder inspects the
/// buffer tail: if the buffer is empty, already ends with an explicit
/// `AND `/`OR `, or with a freshly opened `(`, no separator is inserted;
/// otherwise an `AND` is inserted automatically. Independently configured
/// filter sources can therefore be concatenated without managing separators.
///
/// Errors raised while appending (unknown handle, type mismatch) are
/// recorded and surfaced when the clause is finished; later appends are
/// ignored once the builder is poisoned.
pub struct WhereClause<'c, E> {
    columns: &'c Columns<E>,
    buf: String,
    params: Vec<Value>,
    depth: u32,
    error: Option<Error>,
}

impl<'c, E> WhereClause<'c, E> {
    pub(crate) fn new(columns: &'c Columns<E>) -> Self {
        WhereClause {
            columns,
            buf: String::new(),
            params: Vec::new(),
            depth: 0,
            error: None,
        }
    }

    /// True when nothing has been appended yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Appends one `(column, operation, value)` condition.
    pub fn condition(
        &mut self,
        field: Field<E>,
        op: Op,
        value: impl Into<Value>,
    ) -> &mut Self {
        if let Err(err) = self.try_condition(field, op, value.into()) {
            self.poison(err);
        }
        self
    }

    /// Fallible condition append, used by the filter grammar where errors
    /// must propagate instead of poisoning the builder.
    pub(crate) fn try_condition(&mut self, field: Field<E>, op: Op, value: Value) -> Result<()> {
        let column = self.columns.get(field)?;
        let frag = column.render_condition(self.columns.table(), op, &value)?;
        self.auto_and();
        self.buf.push_str(&frag.sql);
        self.params.extend(frag.params);
        Ok(())
    }

    /// Emits an explicit `AND` separator.
    pub fn and(&mut self) -> &mut Self {
        self.separator("AND ");
        self
    }

    /// Emits an explicit `OR` separator.
    pub fn or(&mut self) -> &mut Self {
        self.separator("OR ");
        self
    }

    /// Opens a nested group, auto-separating from what came before.
    pub fn start_group(&mut self) -> &mut Self {
        self.auto_and();
        self.buf.push('(');
        self.depth += 1;
        self
    }

    /// Closes the innermost group.
    pub fn end_group(&mut self) -> &mut Self {
        if self.depth == 0 {
            self.poison(Error::Configuration(
                "unbalanced filter group: close without open".into(),
            ));
            return self;
        }
        self.buf.push(')');
        self.depth -= 1;
        self
    }

    /// Runs `f` inside its own group.
    pub fn grouped(&mut self, f: impl FnOnce(&mut Self)) -> &mut Self {
        self.start_group();
        f(self);
        self.end_group();
        self
    }

    /// Applies a persistent base filter inside its own group, so later
    /// `or()` calls cannot disturb it. A base filter that appends nothing
    /// leaves the buffer untouched.
    pub(crate) fn base_group(&mut self, f: &dyn Fn(&mut WhereClause<'_, E>)) {
        let buf_mark = self.buf.len();
        let params_mark = self.params.len();
        self.start_group();
        let inner_mark = self.buf.len();
        f(self);
        if self.buf.len() == inner_mark {
            self.buf.truncate(buf_mark);
            self.params.truncate(params_mark);
            self.depth -= 1;
        } else {
            self.end_group();
        }
    }

    /// Finishes the clause into a fragment, surfacing any recorded error.
    pub(crate) fn finish(self) -> Result<Fragment> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.depth != 0 {
            return Err(Error::Configuration(
                "unbalanced filter group: open without close".into(),
            ));
        }
        let mut frag = Fragment::raw(self.buf);
        frag.params.extend(self.params);
        Ok(frag)
    }

    // Inserts the automatic AND unless the buffer tail says otherwise.
    fn auto_and(&mut self) {
        if self.buf.is_empty()
            || self.buf.ends_with("AND ")
            || self.buf.ends_with("OR ")
            || self.buf.ends_with('(')
        {
            return;
        }
        self.buf.push_str(" AND ");
    }

    fn separator(&mut self, sep: &str) {
        if !self.buf.is_empty() && !self.buf.ends_with(' ') && !self.buf.ends_with('(') {
            self.buf.push(' ');
        }
        self.buf.push_str(sep);
    }

    fn poison(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}
