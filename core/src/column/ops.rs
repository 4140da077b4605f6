//! Filter operations and their per-kind defaults.

use crate::value::ValueKind;

/// Closed set of filter operations a column can register.
///
/// Codes are the lowercase tokens accepted by the client filter grammar.
/// The `i`-prefixed variants are the case-insensitive forms of the string
/// pattern operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    Nin,
    /// contains
    Ct,
    /// not contains
    Nct,
    /// begins with
    Bw,
    /// not begins with
    Nbw,
    /// ends with
    Ew,
    /// not ends with
    New,
    ICt,
    INct,
    IBw,
    INbw,
    IEw,
    INew,
}

/// Shape of a string pattern match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PatternShape {
    Contains,
    BeginsWith,
    EndsWith,
}

impl PatternShape {
    /// Wraps the raw needle into a LIKE pattern.
    pub(crate) fn wrap(&self, needle: &str) -> String {
        match self {
            PatternShape::Contains => format!("%{}%", needle),
            PatternShape::BeginsWith => format!("{}%", needle),
            PatternShape::EndsWith => format!("%{}", needle),
        }
    }
}

/// A pattern operation decomposed into shape, negation and case handling.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PatternOp {
    pub shape: PatternShape,
    pub negated: bool,
    pub insensitive: bool,
}

impl Op {
    /// The grammar code for this operation.
    pub const fn code(&self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Neq => "neq",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::In => "in",
            Op::Nin => "nin",
            Op::Ct => "ct",
            Op::Nct => "nct",
            Op::Bw => "bw",
            Op::Nbw => "nbw",
            Op::Ew => "ew",
            Op::New => "new",
            Op::ICt => "ict",
            Op::INct => "inct",
            Op::IBw => "ibw",
            Op::INbw => "inbw",
            Op::IEw => "iew",
            Op::INew => "inew",
        }
    }

    /// Resolves a grammar code back to its operation.
    pub fn from_code(code: &str) -> Option<Op> {
        const ALL: [Op; 20] = [
            Op::Eq,
            Op::Neq,
            Op::Lt,
            Op::Lte,
            Op::Gt,
            Op::Gte,
            Op::In,
            Op::Nin,
            Op::Ct,
            Op::Nct,
            Op::Bw,
            Op::Nbw,
            Op::Ew,
            Op::New,
            Op::ICt,
            Op::INct,
            Op::IBw,
            Op::INbw,
            Op::IEw,
            Op::INew,
        ];
        ALL.into_iter().find(|op| op.code() == code)
    }

    /// True for operations taking a list of values.
    #[inline]
    pub const fn is_list(&self) -> bool {
        matches!(self, Op::In | Op::Nin)
    }

    /// The SQL comparator for plain scalar comparisons.
    pub(crate) const fn comparator(&self) -> Option<&'static str> {
        match self {
            Op::Eq => Some("="),
            Op::Neq => Some("<>"),
            Op::Lt => Some("<"),
            Op::Lte => Some("<="),
            Op::Gt => Some(">"),
            Op::Gte => Some(">="),
            _ => None,
        }
    }

    /// Decomposes string pattern operations.
    pub(crate) const fn pattern(&self) -> Option<PatternOp> {
        macro_rules! pat {
            ($shape:ident, $neg:literal, $insensitive:literal) => {
                Some(PatternOp {
                    shape: PatternShape::$shape,
                    negated: $neg,
                    insensitive: $insensitive,
                })
            };
        }
        match self {
            Op::Ct => pat!(Contains, false, false),
            Op::Nct => pat!(Contains, true, false),
            Op::Bw => pat!(BeginsWith, false, false),
            Op::Nbw => pat!(BeginsWith, true, false),
            Op::Ew => pat!(EndsWith, false, false),
            Op::New => pat!(EndsWith, true, false),
            Op::ICt => pat!(Contains, false, true),
            Op::INct => pat!(Contains, true, true),
            Op::IBw => pat!(BeginsWith, false, true),
            Op::INbw => pat!(BeginsWith, true, true),
            Op::IEw => pat!(EndsWith, false, true),
            Op::INew => pat!(EndsWith, true, true),
            _ => None,
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Default operation registry per declared column kind.
pub(crate) fn default_ops(kind: ValueKind) -> &'static [Op] {
    match kind {
        ValueKind::Bool => &[Op::Eq, Op::Neq],
        ValueKind::Text => &[
            Op::Eq,
            Op::Neq,
            Op::In,
            Op::Nin,
            Op::Ct,
            Op::Nct,
            Op::Bw,
            Op::Nbw,
            Op::Ew,
            Op::New,
            Op::ICt,
            Op::INct,
            Op::IBw,
            Op::INbw,
            Op::IEw,
            Op::INew,
        ],
        ValueKind::Int | ValueKind::Float => &[
            Op::Eq,
            Op::Neq,
            Op::Lt,
            Op::Lte,
            Op::Gt,
            Op::Gte,
            Op::In,
            Op::Nin,
        ],
        ValueKind::Timestamp => &[Op::Lt, Op::Lte, Op::Gt, Op::Gte],
        ValueKind::Uuid => &[Op::Eq, Op::Neq, Op::In, Op::Nin],
    }
}
