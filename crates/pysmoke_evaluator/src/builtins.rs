//! Builtin functions.

use crate::error::RuntimeError;
use crate::value::{RangeValue, Value};
use pysmoke_core::text::TextSpan;
use std::io::Write;
use std::num::IntErrorKind;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Print,
    Range,
    Len,
    Str,
    Int,
    Float,
    Abs,
    Bool,
}

impl Builtin {
    pub const ALL: [Builtin; 8] = [
        Builtin::Print,
        Builtin::Range,
        Builtin::Len,
        Builtin::Str,
        Builtin::Int,
        Builtin::Float,
        Builtin::Abs,
        Builtin::Bool,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Range => "range",
            Builtin::Len => "len",
            Builtin::Str => "str",
            Builtin::Int => "int",
            Builtin::Float => "float",
            Builtin::Abs => "abs",
            Builtin::Bool => "bool",
        }
    }

    pub fn from_name(name: &str) -> Option<Builtin> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }
}

/// Call `builtin`. `out` receives whatever `print` writes.
pub(crate) fn call_builtin<'a>(
    builtin: Builtin,
    args: Vec<Value<'a>>,
    keywords: Vec<(&'a str, Value<'a>)>,
    out: &mut impl Write,
    span: TextSpan,
) -> Result<Value<'a>, RuntimeError> {
    if builtin != Builtin::Print && !keywords.is_empty() {
        return Err(RuntimeError::type_error(
            span,
            format!("{}() takes no keyword arguments", builtin.name()),
        ));
    }
    match builtin {
        Builtin::Print => print(args, keywords, out, span),
        Builtin::Range => range(args, span),
        Builtin::Len => {
            let value = exactly_one(builtin, args, span)?;
            len(&value, span)
        }
        Builtin::Abs => {
            let value = exactly_one(builtin, args, span)?;
            abs(&value, span)
        }
        Builtin::Str => Ok(match at_most_one(builtin, args, span)? {
            Some(value) => Value::str(&value.to_str()),
            None => Value::str(""),
        }),
        Builtin::Int => match at_most_one(builtin, args, span)? {
            Some(value) => int(&value, span),
            None => Ok(Value::Int(0)),
        },
        Builtin::Float => match at_most_one(builtin, args, span)? {
            Some(value) => float(&value, span),
            None => Ok(Value::Float(0.0)),
        },
        Builtin::Bool => Ok(Value::Bool(
            at_most_one(builtin, args, span)?.is_some_and(|value| value.is_truthy()),
        )),
    }
}

fn exactly_one<'a>(builtin: Builtin, args: Vec<Value<'a>>, span: TextSpan) -> Result<Value<'a>, RuntimeError> {
    let given = args.len();
    let mut args = args.into_iter();
    match (args.next(), args.next()) {
        (Some(value), None) => Ok(value),
        _ => Err(RuntimeError::type_error(
            span,
            format!("{}() takes exactly one argument ({} given)", builtin.name(), given),
        )),
    }
}

fn at_most_one<'a>(builtin: Builtin, args: Vec<Value<'a>>, span: TextSpan) -> Result<Option<Value<'a>>, RuntimeError> {
    if args.len() > 1 {
        return Err(RuntimeError::type_error(
            span,
            format!("{}() takes at most 1 argument ({} given)", builtin.name(), args.len()),
        ));
    }
    Ok(args.into_iter().next())
}

fn print<'a>(
    args: Vec<Value<'a>>,
    keywords: Vec<(&'a str, Value<'a>)>,
    out: &mut impl Write,
    span: TextSpan,
) -> Result<Value<'a>, RuntimeError> {
    let mut sep = " ".to_string();
    let mut end = "\n".to_string();
    for (name, value) in keywords {
        let slot = match name {
            "sep" => &mut sep,
            "end" => &mut end,
            other => {
                return Err(RuntimeError::type_error(
                    span,
                    format!("'{}' is an invalid keyword argument for print()", other),
                ))
            }
        };
        match value {
            Value::None => {}
            Value::Str(text) => *slot = text.to_string(),
            other => {
                return Err(RuntimeError::type_error(
                    span,
                    format!("{} must be None or a string, not {}", name, other.type_name()),
                ))
            }
        }
    }

    let mut line = String::new();
    for (i, value) in args.iter().enumerate() {
        if i > 0 {
            line.push_str(&sep);
        }
        line.push_str(&value.to_str());
    }
    line.push_str(&end);
    out.write_all(line.as_bytes())?;
    Ok(Value::None)
}

fn integer_argument(value: &Value<'_>, span: TextSpan) -> Result<i64, RuntimeError> {
    value.as_integer().ok_or_else(|| {
        RuntimeError::type_error(
            span,
            format!("'{}' object cannot be interpreted as an integer", value.type_name()),
        )
    })
}

fn range<'a>(args: Vec<Value<'a>>, span: TextSpan) -> Result<Value<'a>, RuntimeError> {
    let numbers = args
        .iter()
        .map(|arg| integer_argument(arg, span))
        .collect::<Result<Vec<_>, _>>()?;
    let (start, stop, step) = match numbers[..] {
        [stop] => (0, stop, 1),
        [start, stop] => (start, stop, 1),
        [start, stop, step] => (start, stop, step),
        [] => {
            return Err(RuntimeError::type_error(span, "range expected at least 1 argument, got 0"))
        }
        _ => {
            return Err(RuntimeError::type_error(
                span,
                format!("range expected at most 3 arguments, got {}", numbers.len()),
            ))
        }
    };
    if step == 0 {
        return Err(RuntimeError::value_error(span, "range() arg 3 must not be zero"));
    }
    Ok(Value::Range(RangeValue { start, stop, step }))
}

fn len<'a>(value: &Value<'a>, span: TextSpan) -> Result<Value<'a>, RuntimeError> {
    let length = match value {
        Value::Str(s) => s.chars().count(),
        Value::List(items) => items.borrow().len(),
        Value::Range(range) => return Ok(Value::Int(range.len())),
        other => {
            return Err(RuntimeError::type_error(
                span,
                format!("object of type '{}' has no len()", other.type_name()),
            ))
        }
    };
    i64::try_from(length)
        .map(Value::Int)
        .map_err(|_| RuntimeError::overflow(span, "length does not fit in 64 bits"))
}

fn abs<'a>(value: &Value<'a>, span: TextSpan) -> Result<Value<'a>, RuntimeError> {
    match value {
        Value::Int(i) => i
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::overflow(span, "integer result does not fit in 64 bits")),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => Err(RuntimeError::type_error(
            span,
            format!("bad operand type for abs(): '{}'", other.type_name()),
        )),
    }
}

fn int<'a>(value: &Value<'a>, span: TextSpan) -> Result<Value<'a>, RuntimeError> {
    match value {
        Value::Int(_) | Value::Bool(_) => Ok(Value::Int(value.as_integer().unwrap_or_default())),
        Value::Float(f) => float_to_int(*f, span).map(Value::Int),
        Value::Str(text) => parse_int(text, span).map(Value::Int),
        other => Err(RuntimeError::type_error(
            span,
            format!(
                "int() argument must be a string, a bytes-like object or a real number, not '{}'",
                other.type_name()
            ),
        )),
    }
}

fn float_to_int(f: f64, span: TextSpan) -> Result<i64, RuntimeError> {
    if f.is_nan() {
        return Err(RuntimeError::value_error(span, "cannot convert float NaN to integer"));
    }
    if f.is_infinite() {
        return Err(RuntimeError::overflow(span, "cannot convert float infinity to integer"));
    }
    let truncated = f.trunc();
    // i64::MAX is not exactly representable; 2^63 is the first float out of range.
    if truncated >= 9_223_372_036_854_775_808.0 || truncated < -9_223_372_036_854_775_808.0 {
        return Err(RuntimeError::overflow(span, "int too large to convert"));
    }
    Ok(truncated as i64)
}

fn parse_int(text: &Rc<str>, span: TextSpan) -> Result<i64, RuntimeError> {
    let trimmed = text.trim();
    let digits: String = if trimmed.starts_with('_') || trimmed.ends_with('_') || trimmed.contains("__") {
        trimmed.to_string()
    } else {
        trimmed.replace('_', "")
    };
    digits.parse::<i64>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            RuntimeError::overflow(span, "int too large to convert")
        }
        _ => RuntimeError::value_error(
            span,
            format!(
                "invalid literal for int() with base 10: {}",
                Value::Str(text.clone()).repr()
            ),
        ),
    })
}

fn float<'a>(value: &Value<'a>, span: TextSpan) -> Result<Value<'a>, RuntimeError> {
    match value {
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
        Value::Float(f) => Ok(Value::Float(*f)),
        Value::Str(text) => text.trim().parse::<f64>().map(Value::Float).map_err(|_| {
            RuntimeError::value_error(
                span,
                format!("could not convert string to float: {}", value.repr()),
            )
        }),
        other => Err(RuntimeError::type_error(
            span,
            format!(
                "float() argument must be a string or a real number, not '{}'",
                other.type_name()
            ),
        )),
    }
}
