//! Operators on runtime values: arithmetic, comparison and subscripts.

use crate::error::RuntimeError;
use crate::value::Value;
use pysmoke_ast::node::CompareOperator;
use pysmoke_ast::syntax_kind::SyntaxKind;
use pysmoke_core::text::TextSpan;
use std::cmp::Ordering;
use std::rc::Rc;

/// Largest string or list a repetition may build.
const MAX_REPEAT_LEN: usize = 1 << 32;

/// A numeric operand; `bool` counts as `int`.
#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn of(value: &Value<'_>) -> Option<Number> {
        match value {
            Value::Int(i) => Some(Number::Int(*i)),
            Value::Bool(b) => Some(Number::Int(i64::from(*b))),
            Value::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

fn unsupported(op: SyntaxKind, left: &Value<'_>, right: &Value<'_>, span: TextSpan) -> RuntimeError {
    RuntimeError::type_error(
        span,
        format!(
            "unsupported operand type(s) for {}: '{}' and '{}'",
            op.display_text(),
            left.type_name(),
            right.type_name()
        ),
    )
}

fn int_overflow(span: TextSpan) -> RuntimeError {
    RuntimeError::overflow(span, "integer result does not fit in 64 bits")
}

/// Evaluate `left op right` for a binary operator other than `and`/`or`.
pub(crate) fn binary<'a>(
    op: SyntaxKind,
    left: &Value<'a>,
    right: &Value<'a>,
    span: TextSpan,
) -> Result<Value<'a>, RuntimeError> {
    match (op, left, right) {
        (SyntaxKind::PlusToken, Value::Str(a), Value::Str(b)) => {
            let mut text = String::with_capacity(a.len() + b.len());
            text.push_str(a);
            text.push_str(b);
            Ok(Value::Str(Rc::from(text)))
        }
        (SyntaxKind::PlusToken, Value::List(a), Value::List(b)) => {
            let items = a.borrow().iter().chain(b.borrow().iter()).cloned().collect();
            Ok(Value::list(items))
        }
        (SyntaxKind::AsteriskToken, Value::Str(s), n) | (SyntaxKind::AsteriskToken, n, Value::Str(s))
            if n.as_integer().is_some() =>
        {
            let count = repeat_count(s.len(), n, span)?;
            Ok(Value::Str(Rc::from(s.repeat(count))))
        }
        (SyntaxKind::AsteriskToken, Value::List(items), n)
        | (SyntaxKind::AsteriskToken, n, Value::List(items))
            if n.as_integer().is_some() =>
        {
            let items = items.borrow();
            let count = repeat_count(items.len(), n, span)?;
            let mut repeated = Vec::with_capacity(items.len() * count);
            for _ in 0..count {
                repeated.extend(items.iter().cloned());
            }
            Ok(Value::list(repeated))
        }
        (
            SyntaxKind::AmpersandToken | SyntaxKind::BarToken | SyntaxKind::CaretToken,
            Value::Bool(a),
            Value::Bool(b),
        ) => Ok(Value::Bool(match op {
            SyntaxKind::AmpersandToken => a & b,
            SyntaxKind::BarToken => a | b,
            _ => a ^ b,
        })),
        _ => arithmetic(op, left, right, span),
    }
}

fn repeat_count(len: usize, count: &Value<'_>, span: TextSpan) -> Result<usize, RuntimeError> {
    let count = usize::try_from(count.as_integer().unwrap_or(0).max(0)).unwrap_or(usize::MAX);
    match len.checked_mul(count) {
        Some(total) if total <= MAX_REPEAT_LEN => Ok(count),
        _ => Err(RuntimeError::overflow(span, "repeated sequence is too long")),
    }
}

fn arithmetic<'a>(
    op: SyntaxKind,
    left: &Value<'a>,
    right: &Value<'a>,
    span: TextSpan,
) -> Result<Value<'a>, RuntimeError> {
    let (Some(a), Some(b)) = (Number::of(left), Number::of(right)) else {
        return Err(unsupported(op, left, right, span));
    };
    match (a, b) {
        (Number::Int(a), Number::Int(b)) => int_arithmetic(op, a, b, span)
            .unwrap_or_else(|| Err(unsupported(op, left, right, span))),
        (a, b) => float_arithmetic(op, a.as_f64(), b.as_f64(), span)
            .unwrap_or_else(|| Err(unsupported(op, left, right, span))),
    }
}

/// `None` when `op` does not apply to integers.
fn int_arithmetic<'a>(op: SyntaxKind, a: i64, b: i64, span: TextSpan) -> Option<Result<Value<'a>, RuntimeError>> {
    let checked = |result: Option<i64>| result.map(Value::Int).ok_or_else(|| int_overflow(span));
    let result = match op {
        SyntaxKind::PlusToken => checked(a.checked_add(b)),
        SyntaxKind::MinusToken => checked(a.checked_sub(b)),
        SyntaxKind::AsteriskToken => checked(a.checked_mul(b)),
        SyntaxKind::SlashToken => {
            if b == 0 {
                Err(RuntimeError::zero_division(span, "division by zero"))
            } else {
                Ok(Value::Float(a as f64 / b as f64))
            }
        }
        SyntaxKind::SlashSlashToken => {
            if b == 0 {
                Err(RuntimeError::zero_division(span, "integer division or modulo by zero"))
            } else {
                checked(floor_div(a, b))
            }
        }
        SyntaxKind::PercentToken => {
            if b == 0 {
                Err(RuntimeError::zero_division(span, "integer modulo by zero"))
            } else {
                Ok(Value::Int(floor_mod(a, b)))
            }
        }
        SyntaxKind::AsteriskAsteriskToken => int_power(a, b, span),
        SyntaxKind::AmpersandToken => Ok(Value::Int(a & b)),
        SyntaxKind::BarToken => Ok(Value::Int(a | b)),
        SyntaxKind::CaretToken => Ok(Value::Int(a ^ b)),
        SyntaxKind::LessThanLessThanToken => shift_left(a, b, span),
        SyntaxKind::GreaterThanGreaterThanToken => shift_right(a, b, span),
        _ => return None,
    };
    Some(result)
}

/// Division rounding toward negative infinity.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let quotient = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}

/// Remainder with the sign of the divisor.
fn floor_mod(a: i64, b: i64) -> i64 {
    if b == -1 {
        return 0;
    }
    let remainder = a % b;
    if remainder != 0 && ((remainder < 0) != (b < 0)) {
        remainder + b
    } else {
        remainder
    }
}

fn int_power<'a>(base: i64, exponent: i64, span: TextSpan) -> Result<Value<'a>, RuntimeError> {
    if exponent < 0 {
        if base == 0 {
            return Err(RuntimeError::zero_division(
                span,
                "0.0 cannot be raised to a negative power",
            ));
        }
        return Ok(Value::Float((base as f64).powf(exponent as f64)));
    }
    match base {
        0 | 1 => return Ok(Value::Int(if exponent == 0 { 1 } else { base })),
        -1 => return Ok(Value::Int(if exponent % 2 == 0 { 1 } else { -1 })),
        _ => {}
    }
    u32::try_from(exponent)
        .ok()
        .and_then(|exponent| base.checked_pow(exponent))
        .map(Value::Int)
        .ok_or_else(|| int_overflow(span))
}

fn shift_left<'a>(a: i64, count: i64, span: TextSpan) -> Result<Value<'a>, RuntimeError> {
    if count < 0 {
        return Err(RuntimeError::value_error(span, "negative shift count"));
    }
    if a == 0 {
        return Ok(Value::Int(0));
    }
    if count >= 64 {
        return Err(int_overflow(span));
    }
    let shifted = a << count;
    if shifted >> count != a {
        return Err(int_overflow(span));
    }
    Ok(Value::Int(shifted))
}

fn shift_right<'a>(a: i64, count: i64, span: TextSpan) -> Result<Value<'a>, RuntimeError> {
    if count < 0 {
        return Err(RuntimeError::value_error(span, "negative shift count"));
    }
    Ok(Value::Int(if count >= 64 { a >> 63 } else { a >> count }))
}

/// `None` when `op` does not apply to floats.
fn float_arithmetic<'a>(op: SyntaxKind, a: f64, b: f64, span: TextSpan) -> Option<Result<Value<'a>, RuntimeError>> {
    let result = match op {
        SyntaxKind::PlusToken => Ok(a + b),
        SyntaxKind::MinusToken => Ok(a - b),
        SyntaxKind::AsteriskToken => Ok(a * b),
        SyntaxKind::SlashToken if b == 0.0 => Err(RuntimeError::zero_division(span, "float division by zero")),
        SyntaxKind::SlashToken => Ok(a / b),
        SyntaxKind::SlashSlashToken if b == 0.0 => {
            Err(RuntimeError::zero_division(span, "float floor division by zero"))
        }
        SyntaxKind::SlashSlashToken => Ok((a / b).floor()),
        SyntaxKind::PercentToken if b == 0.0 => Err(RuntimeError::zero_division(span, "float modulo")),
        SyntaxKind::PercentToken => {
            let remainder = a % b;
            Ok(if remainder != 0.0 && ((remainder < 0.0) != (b < 0.0)) {
                remainder + b
            } else {
                remainder
            })
        }
        SyntaxKind::AsteriskAsteriskToken => float_power(a, b, span),
        _ => return None,
    };
    Some(result.map(Value::Float))
}

fn float_power(base: f64, exponent: f64, span: TextSpan) -> Result<f64, RuntimeError> {
    if base == 0.0 && exponent < 0.0 {
        return Err(RuntimeError::zero_division(
            span,
            "0.0 cannot be raised to a negative power",
        ));
    }
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(RuntimeError::value_error(
            span,
            "negative number cannot be raised to a fractional power",
        ));
    }
    let result = base.powf(exponent);
    if result.is_infinite() && base.is_finite() && exponent.is_finite() {
        return Err(RuntimeError::overflow(span, "numerical result out of range"));
    }
    Ok(result)
}

/// Unary `-`, `+` and `~`.
pub(crate) fn unary<'a>(op: SyntaxKind, operand: &Value<'a>, span: TextSpan) -> Result<Value<'a>, RuntimeError> {
    let result = match (op, Number::of(operand)) {
        (SyntaxKind::MinusToken, Some(Number::Int(i))) => i.checked_neg().map(Value::Int),
        (SyntaxKind::MinusToken, Some(Number::Float(f))) => Some(Value::Float(-f)),
        (SyntaxKind::PlusToken, Some(Number::Int(i))) => Some(Value::Int(i)),
        (SyntaxKind::PlusToken, Some(Number::Float(f))) => Some(Value::Float(f)),
        (SyntaxKind::TildeToken, Some(Number::Int(i))) => Some(Value::Int(!i)),
        _ => {
            return Err(RuntimeError::type_error(
                span,
                format!(
                    "bad operand type for unary {}: '{}'",
                    op.display_text(),
                    operand.type_name()
                ),
            ))
        }
    };
    result.ok_or_else(|| int_overflow(span))
}

// ============================================================================
// Comparisons
// ============================================================================

/// Python `==`. Numbers compare by value across `int`, `float` and `bool`;
/// other values of different types are never equal.
pub(crate) fn values_equal<'a>(left: &Value<'a>, right: &Value<'a>) -> bool {
    match (left, right) {
        (Value::None, Value::None) => true,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            if Rc::ptr_eq(a, b) {
                return true;
            }
            let (a, b) = (a.borrow(), b.borrow());
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x, y))
        }
        (Value::Range(a), Value::Range(b)) => {
            let len = a.len();
            len == b.len() && (len == 0 || (a.start == b.start && (len == 1 || a.step == b.step)))
        }
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
        (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
        (Value::BoundMethod(a), Value::BoundMethod(b)) => {
            Rc::ptr_eq(&a.function, &b.function) && identical(&a.receiver, &b.receiver)
        }
        (Value::Builtin(a), Value::Builtin(b)) => a == b,
        _ => match (Number::of(left), Number::of(right)) {
            (Some(Number::Int(a)), Some(Number::Int(b))) => a == b,
            (Some(a), Some(b)) => a.as_f64() == b.as_f64(),
            _ => false,
        },
    }
}

/// Python `is`. Immutable scalars compare by value.
pub(crate) fn identical<'a>(left: &Value<'a>, right: &Value<'a>) -> bool {
    match (left, right) {
        (Value::None, Value::None) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
        (Value::Str(a), Value::Str(b)) => Rc::ptr_eq(a, b) || a == b,
        (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
        (Value::Range(a), Value::Range(b)) => a == b,
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
        (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
        (Value::BoundMethod(a), Value::BoundMethod(b)) => Rc::ptr_eq(a, b),
        (Value::Builtin(a), Value::Builtin(b)) => a == b,
        _ => false,
    }
}

/// Order two values for `<`, `<=`, `>` and `>=`. `Ok(None)` means the
/// values are orderable but unordered (a NaN is involved).
fn partial_order<'a>(
    op: CompareOperator,
    left: &Value<'a>,
    right: &Value<'a>,
    span: TextSpan,
) -> Result<Option<Ordering>, RuntimeError> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
        (Value::List(a), Value::List(b)) => {
            let (a, b) = (a.borrow(), b.borrow());
            for (x, y) in a.iter().zip(b.iter()) {
                if !values_equal(x, y) {
                    return partial_order(op, x, y, span);
                }
            }
            Ok(Some(a.len().cmp(&b.len())))
        }
        _ => match (Number::of(left), Number::of(right)) {
            (Some(Number::Int(a)), Some(Number::Int(b))) => Ok(Some(a.cmp(&b))),
            (Some(a), Some(b)) => Ok(a.as_f64().partial_cmp(&b.as_f64())),
            _ => Err(RuntimeError::type_error(
                span,
                format!(
                    "'{}' not supported between instances of '{}' and '{}'",
                    op.text(),
                    left.type_name(),
                    right.type_name()
                ),
            )),
        },
    }
}

fn contains<'a>(container: &Value<'a>, item: &Value<'a>, span: TextSpan) -> Result<bool, RuntimeError> {
    match container {
        Value::Str(haystack) => match item {
            Value::Str(needle) => Ok(haystack.contains(&**needle)),
            other => Err(RuntimeError::type_error(
                span,
                format!("'in <string>' requires string as left operand, not {}", other.type_name()),
            )),
        },
        Value::List(items) => Ok(items.borrow().iter().any(|x| values_equal(x, item))),
        Value::Range(range) => Ok(match Number::of(item) {
            Some(Number::Int(i)) => range.contains(i),
            Some(Number::Float(f)) if f.fract() == 0.0 && f.abs() < 9.2e18 => range.contains(f as i64),
            _ => false,
        }),
        other => Err(RuntimeError::type_error(
            span,
            format!("argument of type '{}' is not iterable", other.type_name()),
        )),
    }
}

/// Evaluate one link of a comparison chain.
pub(crate) fn compare<'a>(
    op: CompareOperator,
    left: &Value<'a>,
    right: &Value<'a>,
    span: TextSpan,
) -> Result<bool, RuntimeError> {
    Ok(match op {
        CompareOperator::Equal => values_equal(left, right),
        CompareOperator::NotEqual => !values_equal(left, right),
        CompareOperator::Is => identical(left, right),
        CompareOperator::IsNot => !identical(left, right),
        CompareOperator::In => contains(right, left, span)?,
        CompareOperator::NotIn => !contains(right, left, span)?,
        CompareOperator::Less => partial_order(op, left, right, span)? == Some(Ordering::Less),
        CompareOperator::Greater => partial_order(op, left, right, span)? == Some(Ordering::Greater),
        CompareOperator::LessEqual => matches!(
            partial_order(op, left, right, span)?,
            Some(Ordering::Less | Ordering::Equal)
        ),
        CompareOperator::GreaterEqual => matches!(
            partial_order(op, left, right, span)?,
            Some(Ordering::Greater | Ordering::Equal)
        ),
    })
}

// ============================================================================
// Subscripts
// ============================================================================

/// Resolve a possibly negative index against a sequence of length `len`.
fn sequence_index(
    what: &str,
    index: &Value<'_>,
    len: usize,
    span: TextSpan,
) -> Result<usize, RuntimeError> {
    let Some(raw) = index.as_integer() else {
        return Err(RuntimeError::type_error(
            span,
            format!("{} indices must be integers, not {}", what, index.type_name()),
        ));
    };
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if raw < 0 { raw + len } else { raw };
    if (0..len).contains(&resolved) {
        Ok(resolved as usize)
    } else {
        Err(RuntimeError::index_error(span, format!("{} index out of range", what)))
    }
}

/// `object[index]`.
pub(crate) fn get_item<'a>(object: &Value<'a>, index: &Value<'a>, span: TextSpan) -> Result<Value<'a>, RuntimeError> {
    match object {
        Value::List(items) => {
            let items = items.borrow();
            let i = sequence_index("list", index, items.len(), span)?;
            Ok(items[i].clone())
        }
        Value::Str(s) => {
            let count = s.chars().count();
            let i = sequence_index("string", index, count, span)?;
            let c = s.chars().nth(i).map(String::from).unwrap_or_default();
            Ok(Value::Str(Rc::from(c)))
        }
        Value::Range(range) => {
            let len = usize::try_from(range.len()).unwrap_or(usize::MAX);
            let i = sequence_index("range object", index, len, span)?;
            range
                .get(i as i64)
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::index_error(span, "range object index out of range"))
        }
        other => Err(RuntimeError::type_error(
            span,
            format!("'{}' object is not subscriptable", other.type_name()),
        )),
    }
}

/// `object[index] = value`.
pub(crate) fn set_item<'a>(
    object: &Value<'a>,
    index: &Value<'a>,
    value: Value<'a>,
    span: TextSpan,
) -> Result<(), RuntimeError> {
    match object {
        Value::List(items) => {
            let mut items = items.borrow_mut();
            let i = sequence_index("list assignment", index, items.len(), span)?;
            items[i] = value;
            Ok(())
        }
        other => Err(RuntimeError::type_error(
            span,
            format!("'{}' object does not support item assignment", other.type_name()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPAN: TextSpan = TextSpan { start: 0, length: 1 };

    fn op<'a>(kind: SyntaxKind, a: Value<'a>, b: Value<'a>) -> Result<Value<'a>, RuntimeError> {
        binary(kind, &a, &b, SPAN)
    }

    #[test]
    fn test_floor_division_and_modulo_round_down() {
        assert_eq!(floor_div(7, 2), Some(3));
        assert_eq!(floor_div(-7, 2), Some(-4));
        assert_eq!(floor_div(7, -2), Some(-4));
        assert_eq!(floor_div(i64::MIN, -1), None);
        assert_eq!(floor_mod(-7, 2), 1);
        assert_eq!(floor_mod(7, -2), -1);
        assert_eq!(floor_mod(6, 3), 0);
        assert_eq!(floor_mod(i64::MIN, -1), 0);
    }

    #[test]
    fn test_true_division_yields_float() {
        assert!(matches!(op(SyntaxKind::SlashToken, Value::Int(6), Value::Int(3)), Ok(Value::Float(f)) if f == 2.0));
    }

    #[test]
    fn test_power() {
        assert!(matches!(op(SyntaxKind::AsteriskAsteriskToken, Value::Int(2), Value::Int(10)), Ok(Value::Int(1024))));
        assert!(matches!(op(SyntaxKind::AsteriskAsteriskToken, Value::Int(2), Value::Int(-1)), Ok(Value::Float(f)) if f == 0.5));
        assert!(matches!(
            op(SyntaxKind::AsteriskAsteriskToken, Value::Int(2), Value::Int(64)),
            Err(RuntimeError::OverflowError { .. })
        ));
        assert!(matches!(op(SyntaxKind::AsteriskAsteriskToken, Value::Int(-1), Value::Int(i64::MAX)), Ok(Value::Int(-1))));
    }

    #[test]
    fn test_overflow_is_reported() {
        assert!(matches!(
            op(SyntaxKind::PlusToken, Value::Int(i64::MAX), Value::Int(1)),
            Err(RuntimeError::OverflowError { .. })
        ));
        assert!(matches!(
            unary(SyntaxKind::MinusToken, &Value::Int(i64::MIN), SPAN),
            Err(RuntimeError::OverflowError { .. })
        ));
        assert!(matches!(
            op(SyntaxKind::LessThanLessThanToken, Value::Int(1), Value::Int(63)),
            Err(RuntimeError::OverflowError { .. })
        ));
    }

    #[test]
    fn test_sequence_operators() {
        let joined = op(SyntaxKind::PlusToken, Value::str("ab"), Value::str("cd")).map(|v| v.to_str());
        assert_eq!(joined.ok().as_deref(), Some("abcd"));
        let repeated = op(SyntaxKind::AsteriskToken, Value::Int(3), Value::str("ab")).map(|v| v.to_str());
        assert_eq!(repeated.ok().as_deref(), Some("ababab"));
        let empty = op(SyntaxKind::AsteriskToken, Value::str("ab"), Value::Int(-2)).map(|v| v.to_str());
        assert_eq!(empty.ok().as_deref(), Some(""));
        let list = op(SyntaxKind::AsteriskToken, Value::list(vec![Value::Int(0)]), Value::Int(3)).map(|v| v.repr());
        assert_eq!(list.ok().as_deref(), Some("[0, 0, 0]"));
    }

    #[test]
    fn test_mixed_type_errors() {
        let err = op(SyntaxKind::PlusToken, Value::str("a"), Value::Int(1)).err();
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("TypeError: unsupported operand type(s) for +: 'str' and 'int'")
        );
        let err = compare(CompareOperator::Less, &Value::str("a"), &Value::Int(1), SPAN).err();
        assert_eq!(
            err.map(|e| e.message()).as_deref(),
            Some("'<' not supported between instances of 'str' and 'int'")
        );
    }

    #[test]
    fn test_equality_across_types() {
        assert!(values_equal(&Value::Int(1), &Value::Float(1.0)));
        assert!(values_equal(&Value::Bool(true), &Value::Int(1)));
        assert!(!values_equal(&Value::Int(1), &Value::str("1")));
        assert!(!values_equal(&Value::None, &Value::Int(0)));
        assert!(values_equal(
            &Value::list(vec![Value::Int(1), Value::str("x")]),
            &Value::list(vec![Value::Float(1.0), Value::str("x")])
        ));
    }

    #[test]
    fn test_ordering() {
        let lt = |a: Value<'static>, b: Value<'static>| compare(CompareOperator::Less, &a, &b, SPAN).ok();
        assert_eq!(lt(Value::Int(1), Value::Float(1.5)), Some(true));
        assert_eq!(lt(Value::str("abc"), Value::str("abd")), Some(true));
        assert_eq!(lt(Value::Float(f64::NAN), Value::Int(1)), Some(false));
        assert_eq!(
            lt(Value::list(vec![Value::Int(1), Value::Int(2)]), Value::list(vec![Value::Int(1), Value::Int(3)])),
            Some(true)
        );
        assert_eq!(lt(Value::list(vec![Value::Int(1)]), Value::list(vec![Value::Int(1), Value::Int(0)])), Some(true));
    }

    #[test]
    fn test_membership() {
        let list = Value::list(vec![Value::Int(1), Value::str("a")]);
        assert_eq!(compare(CompareOperator::In, &Value::str("a"), &list, SPAN).ok(), Some(true));
        assert_eq!(compare(CompareOperator::NotIn, &Value::Int(2), &list, SPAN).ok(), Some(true));
        assert_eq!(compare(CompareOperator::In, &Value::str("ell"), &Value::str("hello"), SPAN).ok(), Some(true));
        assert!(compare(CompareOperator::In, &Value::Int(1), &Value::Int(1), SPAN).is_err());
    }

    #[test]
    fn test_subscripts() {
        let list = Value::list(vec![Value::Int(10), Value::Int(20), Value::Int(30)]);
        assert!(matches!(get_item(&list, &Value::Int(-1), SPAN), Ok(Value::Int(30))));
        assert!(matches!(get_item(&list, &Value::Int(3), SPAN), Err(RuntimeError::IndexError { .. })));
        assert!(matches!(get_item(&list, &Value::str("0"), SPAN), Err(RuntimeError::TypeError { .. })));
        assert_eq!(get_item(&Value::str("héllo"), &Value::Int(1), SPAN).map(|v| v.to_str()).ok().as_deref(), Some("é"));

        assert!(set_item(&list, &Value::Int(0), Value::Int(5), SPAN).is_ok());
        assert!(matches!(get_item(&list, &Value::Int(0), SPAN), Ok(Value::Int(5))));
        assert!(matches!(
            set_item(&Value::str("abc"), &Value::Int(0), Value::str("x"), SPAN),
            Err(RuntimeError::TypeError { .. })
        ));
    }
}
