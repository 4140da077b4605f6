//! Column model: binds one entity field to SQL, allowed actions and filter
//! operations.

mod ops;
mod storage;

pub use ops::Op;
pub(crate) use ops::default_ops;
pub use storage::{ColumnSet, Columns, ColumnsBuilder};

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::fragment::Fragment;
use crate::value::{Value, ValueKind};

/// Where a column may legally appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Select,
    Insert,
    Update,
    Sort,
    Group,
}

impl Action {
    const fn bit(self) -> u8 {
        match self {
            Action::Select => 1 << 0,
            Action::Insert => 1 << 1,
            Action::Update => 1 << 2,
            Action::Sort => 1 << 3,
            Action::Group => 1 << 4,
        }
    }
}

/// Small bitset of allowed actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionSet(u8);

impl ActionSet {
    pub const fn empty() -> Self {
        ActionSet(0)
    }

    pub const fn all() -> Self {
        ActionSet(0b1_1111)
    }

    pub const fn with(self, action: Action) -> Self {
        ActionSet(self.0 | action.bit())
    }

    pub const fn without(self, action: Action) -> Self {
        ActionSet(self.0 & !action.bit())
    }

    #[inline]
    pub const fn contains(&self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }
}

/// Three-way SQL branches for a computed boolean equality filter.
#[derive(Debug, Clone)]
pub(crate) struct BoolExpr {
    true_sql: String,
    false_sql: String,
    null_sql: Option<String>,
}

/// One entity field bound to a SQL name, a set of allowed actions and a
/// filter-operation registry.
///
/// Built with chainable constructors and handed to [`ColumnsBuilder::add`],
/// which returns the typed [`Field`](crate::Field) handle:
///
/// ```ignore
/// let mut cols = ColumnsBuilder::<User>::new("users");
/// let id = cols.add(Column::int("id", |u: &User| u.id.into()));
/// let name = cols.add(Column::text("name", |u: &User| u.name.as_str().into()));
/// let cols = cols.build()?;
/// ```
pub struct Column<E> {
    key: &'static str,
    name: Cow<'static, str>,
    table: Option<String>,
    alias: Option<String>,
    kind: ValueKind,
    nullable: bool,
    actions: ActionSet,
    ops: Vec<Op>,
    getter: Option<fn(&E) -> Value>,
    expr: Option<String>,
    bool_expr: Option<BoolExpr>,
}

impl<E> Column<E> {
    fn stored(key: &'static str, kind: ValueKind, getter: fn(&E) -> Value) -> Self {
        Column {
            key,
            name: Cow::Borrowed(key),
            table: None,
            alias: None,
            kind,
            nullable: false,
            actions: ActionSet::all(),
            ops: default_ops(kind).to_vec(),
            getter: Some(getter),
            expr: None,
            bool_expr: None,
        }
    }

    // ==================== constructors ====================

    pub fn bool(key: &'static str, getter: fn(&E) -> Value) -> Self {
        Self::stored(key, ValueKind::Bool, getter)
    }

    pub fn int(key: &'static str, getter: fn(&E) -> Value) -> Self {
        Self::stored(key, ValueKind::Int, getter)
    }

    pub fn float(key: &'static str, getter: fn(&E) -> Value) -> Self {
        Self::stored(key, ValueKind::Float, getter)
    }

    pub fn text(key: &'static str, getter: fn(&E) -> Value) -> Self {
        Self::stored(key, ValueKind::Text, getter)
    }

    pub fn uuid(key: &'static str, getter: fn(&E) -> Value) -> Self {
        Self::stored(key, ValueKind::Uuid, getter)
    }

    pub fn timestamp(key: &'static str, getter: fn(&E) -> Value) -> Self {
        Self::stored(key, ValueKind::Timestamp, getter)
    }

    /// A computed column backed by a SQL expression instead of a stored
    /// table column. Select-only by default, with an empty filter registry.
    pub fn computed(key: &'static str, kind: ValueKind, expr: impl Into<String>) -> Self {
        Column {
            key,
            name: Cow::Borrowed(key),
            table: None,
            alias: None,
            kind,
            nullable: false,
            actions: ActionSet::empty().with(Action::Select),
            ops: Vec::new(),
            getter: None,
            expr: Some(expr.into()),
            bool_expr: None,
        }
    }

    // ==================== chainable configuration ====================

    /// Overrides the SQL column name (defaults to the registration key).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Cow::Owned(name.into());
        self
    }

    /// Qualifies the column with a table alias instead of the table name.
    pub fn aliased(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Declares the column on a table other than the statement's primary
    /// table. Such columns are excluded from INSERT and UPDATE.
    pub fn from_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self.actions = self
            .actions
            .without(Action::Insert)
            .without(Action::Update);
        self
    }

    /// Excludes the column from INSERT and UPDATE.
    pub fn protected(mut self) -> Self {
        self.actions = self
            .actions
            .without(Action::Insert)
            .without(Action::Update);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Registers an extra filter operation beyond the kind's defaults.
    pub fn with_op(mut self, op: Op) -> Self {
        if !self.ops.contains(&op) {
            self.ops.push(op);
        }
        self
    }

    pub fn without_op(mut self, op: Op) -> Self {
        self.ops.retain(|o| *o != op);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions = self.actions.with(action);
        self
    }

    pub fn without_action(mut self, action: Action) -> Self {
        self.actions = self.actions.without(action);
        self
    }

    /// Registers a three-way equality filter on a computed boolean column:
    /// SQL for the true branch, the false branch, and (for nullable columns)
    /// the null branch.
    pub fn bool_expr(
        mut self,
        true_sql: impl Into<String>,
        false_sql: impl Into<String>,
        null_sql: Option<&str>,
    ) -> Self {
        self.bool_expr = Some(BoolExpr {
            true_sql: true_sql.into(),
            false_sql: false_sql.into(),
            null_sql: null_sql.map(str::to_owned),
        });
        if !self.ops.contains(&Op::Eq) {
            self.ops.push(Op::Eq);
        }
        self
    }

    // ==================== accessors ====================

    #[inline]
    pub fn key(&self) -> &'static str {
        self.key
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    #[inline]
    pub fn is_computed(&self) -> bool {
        self.expr.is_some()
    }

    #[inline]
    pub fn has_action(&self, action: Action) -> bool {
        self.actions.contains(action)
    }

    #[inline]
    pub fn supports(&self, op: Op) -> bool {
        self.ops.contains(&op)
    }

    /// Checked at storage build time, so misconfiguration is fatal to
    /// startup rather than surfacing mid-query.
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(be) = &self.bool_expr {
            if self.expr.is_none() {
                return Err(Error::Configuration(format!(
                    "field `{}`: boolean expression filters require a computed column",
                    self.key
                )));
            }
            if self.kind != ValueKind::Bool {
                return Err(Error::Configuration(format!(
                    "field `{}`: boolean expression filter on non-bool column",
                    self.key
                )));
            }
            if self.nullable && be.null_sql.is_none() {
                return Err(Error::Configuration(format!(
                    "field `{}`: nullable boolean expression filter is missing its null branch",
                    self.key
                )));
            }
        }
        if !self.is_computed()
            && self.getter.is_none()
            && (self.has_action(Action::Insert) || self.has_action(Action::Update))
        {
            return Err(Error::Configuration(format!(
                "field `{}`: insert/update column has no value getter",
                self.key
            )));
        }
        Ok(())
    }

    // ==================== rendering ====================

    /// Qualified reference for WHERE/ORDER/GROUP clauses.
    pub(crate) fn sql_ref(&self, default_table: &str) -> String {
        if let Some(expr) = &self.expr {
            return format!("({})", expr);
        }
        let qualifier = self
            .alias
            .as_deref()
            .or(self.table.as_deref())
            .unwrap_or(default_table);
        format!("{}.{}", qualifier, self.name)
    }

    /// Projection entry; re-labels the output column to the registration key
    /// whenever the SQL name differs, so row decoding stays keyed by field.
    pub(crate) fn select_sql(&self, default_table: &str) -> String {
        let base = self.sql_ref(default_table);
        if self.is_computed() || self.name != self.key {
            format!("{} AS {}", base, self.key)
        } else {
            base
        }
    }

    /// Bare column name for INSERT/UPDATE column lists.
    pub(crate) fn insert_name(&self) -> &str {
        &self.name
    }

    /// Pulls the bound value for this column out of an entity instance.
    pub(crate) fn value_of(&self, entity: &E) -> Result<Value> {
        let getter = self.getter.ok_or_else(|| {
            Error::Configuration(format!("field `{}` has no value getter", self.key))
        })?;
        Ok(getter(entity))
    }

    /// Renders one `(column, operation, value)` condition into a SQL
    /// fragment with its bound parameters.
    ///
    /// `eq`/`neq` against NULL render `IS NULL`/`IS NOT NULL` and bind
    /// nothing. An empty `in` list renders the contradiction `1 = 0`, an
    /// empty `nin` list the tautology `1 = 1`; with N elements exactly N
    /// values are bound, in element order.
    pub(crate) fn render_condition(
        &self,
        default_table: &str,
        op: Op,
        value: &Value,
    ) -> Result<Fragment> {
        if !self.supports(op) {
            return Err(Error::Configuration(format!(
                "operation `{}` is not registered for field `{}`",
                op.code(),
                self.key
            )));
        }

        if let Some(be) = &self.bool_expr {
            return match value {
                Value::Bool(true) => Ok(Fragment::raw(be.true_sql.clone())),
                Value::Bool(false) => Ok(Fragment::raw(be.false_sql.clone())),
                Value::Null => be.null_sql.clone().map(Fragment::raw).ok_or_else(|| {
                    Error::Configuration(format!(
                        "field `{}` has no null branch registered",
                        self.key
                    ))
                }),
                other => Err(self.mismatch(other)),
            };
        }

        let col = self.sql_ref(default_table);

        if op.is_list() {
            let Value::List(items) = value else {
                return Err(self.mismatch(value));
            };
            if !value.conforms_to(self.kind) {
                return Err(self.mismatch(value));
            }
            if items.is_empty() {
                // Deliberate short-circuit so callers never special-case
                // empty filter lists.
                return Ok(Fragment::raw(if op == Op::In { "1 = 0" } else { "1 = 1" }));
            }
            let markers = vec!["?"; items.len()].join(", ");
            let keyword = if op == Op::In { "IN" } else { "NOT IN" };
            let mut frag = Fragment::raw(format!("{} {} ({})", col, keyword, markers));
            frag.params.extend(items.iter().cloned());
            return Ok(frag);
        }

        if matches!(value, Value::List(_)) || !value.conforms_to(self.kind) {
            return Err(self.mismatch(value));
        }

        if let Some(cmp) = op.comparator() {
            if value.is_null() {
                return match op {
                    Op::Eq => Ok(Fragment::raw(format!("{} IS NULL", col))),
                    Op::Neq => Ok(Fragment::raw(format!("{} IS NOT NULL", col))),
                    _ => Err(self.mismatch(value)),
                };
            }
            return Ok(Fragment::raw(format!("{} {} ?", col, cmp)).bind(value.clone()));
        }

        if let Some(pat) = op.pattern() {
            let Value::Text(needle) = value else {
                return Err(self.mismatch(value));
            };
            let keyword = if pat.negated { "NOT LIKE" } else { "LIKE" };
            let pattern = pat.shape.wrap(needle);
            return if pat.insensitive {
                Ok(Fragment::raw(format!("LOWER({}) {} ?", col, keyword))
                    .bind(Value::Text(pattern.to_lowercase())))
            } else {
                Ok(Fragment::raw(format!("{} {} ?", col, keyword)).bind(Value::Text(pattern)))
            };
        }

        Err(Error::Configuration(format!(
            "operation `{}` has no renderer",
            op.code()
        )))
    }

    fn mismatch(&self, value: &Value) -> Error {
        Error::TypeMismatch {
            field: self.key,
            value: value.to_string(),
            expected: self.kind.name(),
        }
    }
}

impl<E> std::fmt::Debug for Column<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("computed", &self.is_computed())
            .finish()
    }
}
