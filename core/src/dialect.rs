//! Target dialects and positional placeholder rendering.

use std::borrow::Cow;
use std::fmt::Write;

/// Supported placeholder dialects.
///
/// Builders always emit `?` markers; the dialect decides the final positional
/// syntax at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    SQLite,
    PostgreSQL,
    MySQL,
}

impl Dialect {
    /// Renders a placeholder for this dialect with the given 1-based index.
    ///
    /// Returns `Cow::Borrowed("?")` for SQLite/MySQL (zero allocation),
    /// `Cow::Owned` for PostgreSQL numbered placeholders.
    #[inline]
    pub fn render_placeholder(&self, index: usize) -> Cow<'static, str> {
        match self {
            Dialect::PostgreSQL => Cow::Owned(format!("${}", index)),
            Dialect::SQLite | Dialect::MySQL => Cow::Borrowed("?"),
        }
    }

    /// Rewrites every `?` marker in `sql`, left to right, into this
    /// dialect's positional placeholder syntax.
    pub fn translate(&self, sql: &str) -> String {
        match self {
            Dialect::SQLite | Dialect::MySQL => sql.to_owned(),
            Dialect::PostgreSQL => {
                let mut out = String::with_capacity(sql.len() + 8);
                let mut index = 1usize;
                for ch in sql.chars() {
                    if ch == '?' {
                        let _ = write!(out, "${}", index);
                        index += 1;
                    } else {
                        out.push(ch);
                    }
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_rendering() {
        assert_eq!(Dialect::SQLite.render_placeholder(3), "?");
        assert_eq!(Dialect::MySQL.render_placeholder(1), "?");
        assert_eq!(Dialect::PostgreSQL.render_placeholder(2), "$2");
    }

    #[test]
    fn translation_is_left_to_right() {
        let sql = "SELECT a FROM t WHERE a = ? AND b IN (?, ?)";
        assert_eq!(Dialect::SQLite.translate(sql), sql);
        assert_eq!(
            Dialect::PostgreSQL.translate(sql),
            "SELECT a FROM t WHERE a = $1 AND b IN ($2, $3)"
        );
    }
}
