//! JOIN clause accumulation.

/// Caller-supplied join fragments, kept verbatim in registration order.
#[derive(Debug, Default)]
pub struct JoinClause {
    items: Vec<String>,
}

impl JoinClause {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends one join fragment, e.g.
    /// `INNER JOIN orders ON orders.user_id = users.id`.
    pub fn push(&mut self, fragment: impl Into<String>) -> &mut Self {
        self.items.push(fragment.into());
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn sql(&self) -> String {
        self.items.join(" ")
    }
}
