//! Filter string validation and parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::clause::WhereClause;
use crate::column::{Column, Columns, Op};
use crate::error::{Error, Result};
use crate::field::Field;
use crate::value::Value;

// Shared compiled atom pattern: `field:op:value` where the value runs until
// a structural token or whitespace. Values may contain `:` (timestamps), so
// atom splitting is anchored on the first two separators only.
static ATOM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z_][A-Za-z0-9_]*):([a-z]{2,4}):([^|{}$\s]+)")
        .expect("filter atom pattern compiles")
});

/// How the next element combines with what came before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sep {
    And,
    Or,
}

/// Validates a client filter string against the registered columns without
/// applying it.
///
/// Three phases: (1) every atom must name a known column, an operation
/// registered for it, and a value that casts to the column's kind
/// (element-wise for `in`/`nin`); (2) braces must balance; (3) after
/// removing every recognized atom and structural token the string must be
/// empty — leftovers are reported with their original index, so a malformed
/// token cannot slip through by coincidentally matching elsewhere.
pub fn validate_filters<E>(columns: &Columns<E>, input: &str) -> Result<()> {
    if input.is_empty() {
        return Ok(());
    }

    for caps in ATOM.captures_iter(input) {
        let field = caps.get(1).map_or("", |m| m.as_str());
        let code = caps.get(2).map_or("", |m| m.as_str());
        let raw = caps.get(3).map_or("", |m| m.as_str());
        let (col, op) = resolve(columns, field, code)?;
        cast_for(col, op, raw)?;
    }

    check_balance(input)?;

    let mut covered = vec![false; input.len()];
    for m in ATOM.find_iter(input) {
        covered[m.range()].iter_mut().for_each(|b| *b = true);
    }
    for (i, ch) in input.char_indices() {
        if matches!(ch, '{' | '}' | '|' | '$') {
            covered[i] = true;
        }
    }
    if let Some(start) = covered.iter().position(|b| !b) {
        let mut run = String::new();
        let mut idx = start;
        for ch in input[start..].chars() {
            if covered[idx] {
                break;
            }
            run.push(ch);
            idx += ch.len_utf8();
        }
        return Err(Error::Validation(format!(
            "unexpected input `{}` at index {}",
            run, start
        )));
    }
    Ok(())
}

/// Parses a filter string and appends its conditions to a WHERE builder.
///
/// One character walk: `{` opens a nested group and recurses on the span up
/// to the matching `}`; the single separator following the close decides how
/// the group combines with the remainder (AND when absent). `|`/`$` flush
/// the current atom; a trailing atom is flushed at end of input. Unknown
/// fields, unsupported operations and uncastable values surface as errors,
/// never silent drops.
pub fn apply_filters<E>(
    columns: &Columns<E>,
    clause: &mut WhereClause<'_, E>,
    input: &str,
) -> Result<()> {
    walk(columns, clause, input)
}

fn walk<E>(columns: &Columns<E>, clause: &mut WhereClause<'_, E>, input: &str) -> Result<()> {
    let bytes = input.as_bytes();
    let mut i = 0usize;
    let mut atom_start = 0usize;
    let mut pending = Sep::And;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                if atom_start < i {
                    flush(columns, clause, &input[atom_start..i], pending)?;
                    pending = Sep::And;
                }
                let close = matching_brace(input, i)?;
                if pending == Sep::Or {
                    clause.or();
                }
                clause.start_group();
                walk(columns, clause, &input[i + 1..close])?;
                clause.end_group();

                if close + 1 < bytes.len() && matches!(bytes[close + 1], b'|' | b'$') {
                    pending = if bytes[close + 1] == b'|' {
                        Sep::Or
                    } else {
                        Sep::And
                    };
                    i = close + 2;
                } else {
                    pending = Sep::And;
                    i = close + 1;
                }
                atom_start = i;
            }
            b'|' | b'$' => {
                if atom_start < i {
                    flush(columns, clause, &input[atom_start..i], pending)?;
                }
                pending = if bytes[i] == b'|' { Sep::Or } else { Sep::And };
                i += 1;
                atom_start = i;
            }
            _ => i += 1,
        }
    }

    if atom_start < bytes.len() {
        flush(columns, clause, &input[atom_start..], pending)?;
    }
    Ok(())
}

/// Closes one atom into a condition on the builder.
fn flush<E>(
    columns: &Columns<E>,
    clause: &mut WhereClause<'_, E>,
    atom: &str,
    pending: Sep,
) -> Result<()> {
    let mut parts = atom.splitn(3, ':');
    let (Some(field), Some(code), Some(raw)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::Validation(format!("malformed filter atom `{}`", atom)));
    };
    let (col, op) = resolve(columns, field, code)?;
    let value = cast_for(col, op, raw)?;
    if pending == Sep::Or {
        clause.or();
    }
    clause.try_condition(Field::new(col.key()), op, value)
}

fn resolve<'a, E>(
    columns: &'a Columns<E>,
    field: &str,
    code: &str,
) -> Result<(&'a Column<E>, Op)> {
    let col = columns
        .lookup(field)
        .ok_or_else(|| Error::Validation(format!("unknown filter field `{}`", field)))?;
    let op = Op::from_code(code)
        .ok_or_else(|| Error::Validation(format!("unknown filter operation `{}`", code)))?;
    if !col.supports(op) {
        return Err(Error::Validation(format!(
            "operation `{}` is not supported for field `{}`",
            code, field
        )));
    }
    Ok((col, op))
}

fn cast_for<E>(col: &Column<E>, op: Op, raw: &str) -> Result<Value> {
    if op.is_list() {
        col.kind().cast_list(raw)
    } else {
        col.kind().cast(raw)
    }
}

fn check_balance(input: &str) -> Result<()> {
    let mut depth = 0i32;
    for (i, ch) in input.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return Err(Error::Validation(format!(
                        "unmatched `}}` at index {}",
                        i
                    )));
                }
            }
            _ => {}
        }
    }
    if depth > 0 {
        return Err(Error::Validation("unmatched `{` in filter string".into()));
    }
    Ok(())
}

/// Index of the `}` matching the `{` at `open`.
fn matching_brace(input: &str, open: usize) -> Result<usize> {
    let mut depth = 0usize;
    for (i, ch) in input[open..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(open + i);
                }
            }
            _ => {}
        }
    }
    Err(Error::Validation("unmatched `{` in filter string".into()))
}
