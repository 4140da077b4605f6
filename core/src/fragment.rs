//! SQL fragment accumulation.

use smallvec::SmallVec;

use crate::value::Value;

/// A piece of rendered SQL with its positional parameters.
///
/// Fragments use `?` markers; dialect translation happens once on the final
/// statement. Inline storage covers the typical condition without a heap
/// allocation.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    pub sql: String,
    pub params: SmallVec<[Value; 4]>,
}

impl Fragment {
    /// Creates an empty fragment.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fragment with raw SQL text and no parameters.
    #[inline]
    pub fn raw(sql: impl Into<String>) -> Self {
        Fragment {
            sql: sql.into(),
            params: SmallVec::new(),
        }
    }

    /// Appends one parameter value.
    #[inline]
    pub fn bind(mut self, value: Value) -> Self {
        self.params.push(value);
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

impl std::fmt::Display for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, r#"sql: "{}", params: {:?}"#, self.sql, self.params)
    }
}
