//! Runtime values.

use crate::builtins::Builtin;
use crate::environment::Scope;
use pysmoke_ast::node::FunctionDef;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Names bound in a scope, class body or instance. Keys borrow the
/// identifier text from the AST arena.
pub type Namespace<'a> = FxHashMap<&'a str, Value<'a>>;

/// A Python value. Cloning is cheap: compound values are shared through
/// `Rc`, so a cloned list is the same list.
#[derive(Clone)]
pub enum Value<'a> {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    List(Rc<RefCell<Vec<Value<'a>>>>),
    Range(RangeValue),
    Function(Rc<Function<'a>>),
    Class(Rc<Class<'a>>),
    Instance(Rc<Instance<'a>>),
    BoundMethod(Rc<BoundMethod<'a>>),
    Builtin(Builtin),
}

/// `range(start, stop, step)`. `step` is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeValue {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl RangeValue {
    pub fn len(&self) -> i64 {
        let (start, stop, step) = (self.start as i128, self.stop as i128, self.step as i128);
        let count = if step > 0 && start < stop {
            (stop - start + step - 1) / step
        } else if step < 0 && start > stop {
            (start - stop - step - 1) / -step
        } else {
            0
        };
        i64::try_from(count).unwrap_or(i64::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element at `index`, for `0 <= index < len`.
    pub fn get(&self, index: i64) -> Option<i64> {
        if index < 0 || index >= self.len() {
            return None;
        }
        i64::try_from(self.start as i128 + index as i128 * self.step as i128).ok()
    }

    pub fn contains(&self, value: i64) -> bool {
        let offset = value as i128 - self.start as i128;
        let step = self.step as i128;
        let in_bounds = if step > 0 {
            value >= self.start && value < self.stop
        } else {
            value <= self.start && value > self.stop
        };
        in_bounds && offset % step == 0
    }
}

/// A user-defined function. Defaults are evaluated once, when the `def`
/// statement runs.
pub struct Function<'a> {
    pub name: &'a str,
    pub definition: &'a FunctionDef<'a>,
    pub defaults: Vec<Option<Value<'a>>>,
    pub(crate) closure: Option<Rc<Scope<'a>>>,
}

pub struct Class<'a> {
    pub name: &'a str,
    pub bases: Vec<Rc<Class<'a>>>,
    pub attributes: RefCell<Namespace<'a>>,
}

impl<'a> Class<'a> {
    /// Look `name` up on the class, then on its bases depth first.
    pub fn lookup(&self, name: &str) -> Option<Value<'a>> {
        if let Some(value) = self.attributes.borrow().get(name) {
            return Some(value.clone());
        }
        self.bases.iter().find_map(|base| base.lookup(name))
    }
}

pub struct Instance<'a> {
    pub class: Rc<Class<'a>>,
    pub fields: RefCell<Namespace<'a>>,
}

impl<'a> Instance<'a> {
    pub fn new(class: Rc<Class<'a>>) -> Self {
        Self {
            class,
            fields: RefCell::new(Namespace::default()),
        }
    }
}

/// A function looked up through an instance, with the instance bound as
/// its first argument.
pub struct BoundMethod<'a> {
    pub receiver: Value<'a>,
    pub function: Rc<Function<'a>>,
}

impl<'a> Value<'a> {
    pub fn str(text: &str) -> Self {
        Value::Str(Rc::from(text))
    }

    pub fn list(items: Vec<Value<'a>>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    /// The Python type name used in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Range(_) => "range",
            Value::Function(_) => "function",
            Value::Class(_) => "type",
            Value::Instance(instance) => instance.class.name,
            Value::BoundMethod(_) => "method",
            Value::Builtin(_) => "builtin_function_or_method",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Range(range) => !range.is_empty(),
            _ => true,
        }
    }

    /// `int` and `bool` as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// The text `str(value)` produces.
    pub fn to_str(&self) -> String {
        match self {
            Value::Str(s) => s.to_string(),
            other => other.repr(),
        }
    }

    /// The text `repr(value)` produces.
    pub fn repr(&self) -> String {
        let mut out = String::new();
        self.write_repr(&mut out, &mut Vec::new());
        out
    }

    fn write_repr(&self, out: &mut String, open_lists: &mut Vec<*const RefCell<Vec<Value<'a>>>>) {
        match self {
            Value::None => out.push_str("None"),
            Value::Bool(true) => out.push_str("True"),
            Value::Bool(false) => out.push_str("False"),
            Value::Int(i) => out.push_str(&i.to_string()),
            Value::Float(f) => out.push_str(&format_float(*f)),
            Value::Str(s) => write_string_repr(out, s),
            Value::List(items) => {
                let ptr = Rc::as_ptr(items);
                if open_lists.contains(&ptr) {
                    out.push_str("[...]");
                    return;
                }
                open_lists.push(ptr);
                out.push('[');
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write_repr(out, open_lists);
                }
                out.push(']');
                open_lists.pop();
            }
            Value::Range(range) if range.step == 1 => {
                out.push_str(&format!("range({}, {})", range.start, range.stop))
            }
            Value::Range(range) => out.push_str(&format!(
                "range({}, {}, {})",
                range.start, range.stop, range.step
            )),
            Value::Function(function) => out.push_str(&format!("<function {}>", function.name)),
            Value::Class(class) => out.push_str(&format!("<class '__main__.{}'>", class.name)),
            Value::Instance(instance) => {
                out.push_str(&format!("<__main__.{} object>", instance.class.name))
            }
            Value::BoundMethod(method) => {
                out.push_str(&format!("<bound method {} of ", method.function.name));
                method.receiver.write_repr(out, open_lists);
                out.push('>');
            }
            Value::Builtin(builtin) => {
                out.push_str(&format!("<built-in function {}>", builtin.name()))
            }
        }
    }
}

/// Quote a string the way Python's `repr` does: single quotes unless the
/// text contains a single quote and no double quote.
fn write_string_repr(out: &mut String, s: &str) {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
}

/// Format a float the way Python's `repr` does: the shortest text that
/// round-trips, with `.0` on integral values and an exponent outside
/// `1e-4 <= |x| < 1e16`.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let text = format!("{:e}", value);
        return match text.split_once('e') {
            Some((mantissa, exponent)) => {
                let exponent: i32 = exponent.parse().unwrap_or(0);
                let sign = if exponent < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exponent.abs())
            }
            None => text,
        };
    }
    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        text + ".0"
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str())
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}
