//! Rendered statements.

use crate::dialect::Dialect;
use crate::value::Value;

/// A fully rendered statement: SQL text with `?` markers plus its
/// positional parameters. Immutable once produced by a helper.
#[derive(Debug, Clone)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    /// The SQL text with markers translated for the target dialect.
    pub fn sql_for(&self, dialect: Dialect) -> String {
        dialect.translate(&self.sql)
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, r#"sql: "{}", params: {:?}"#, self.sql, self.params)
    }
}
