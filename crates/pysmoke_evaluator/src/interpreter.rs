//! The tree-walking interpreter.
//!
//! Statements run against a `Frame`: the scope assignments go to and the
//! scope functions defined in it capture. Name lookup tries the frame's
//! scope chain, then module globals, then builtins.

use crate::builtins::{call_builtin, Builtin};
use crate::environment::Scope;
use crate::error::RuntimeError;
use crate::ops;
use crate::value::{BoundMethod, Class, Function, Instance, RangeValue, Value};
use pysmoke_ast::node::*;
use pysmoke_ast::syntax_kind::SyntaxKind;
use pysmoke_core::text::TextSpan;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// Python's default recursion limit.
pub const DEFAULT_MAX_RECURSION_DEPTH: u32 = 1000;

/// How a statement finished.
enum Flow<'a> {
    Normal,
    Break,
    Continue,
    Return(Value<'a>),
}

type ExecResult<'a> = Result<Flow<'a>, RuntimeError>;
type EvalResult<'a> = Result<Value<'a>, RuntimeError>;

struct Frame<'a> {
    locals: Rc<Scope<'a>>,
    /// Captured by functions defined in this frame. Class bodies pass their
    /// enclosing closure through, so methods do not see the class namespace.
    closure: Option<Rc<Scope<'a>>>,
}

/// Iteration state for a `for` loop.
enum Iteration<'a> {
    /// Indexes into the live list, so appends made by the body are seen.
    List { items: Rc<RefCell<Vec<Value<'a>>>>, index: usize },
    Chars(std::vec::IntoIter<char>),
    Range { range: RangeValue, index: i64 },
}

impl<'a> Iterator for Iteration<'a> {
    type Item = Value<'a>;

    fn next(&mut self) -> Option<Value<'a>> {
        match self {
            Iteration::List { items, index } => {
                let item = items.borrow().get(*index).cloned();
                *index += 1;
                item
            }
            Iteration::Chars(chars) => chars.next().map(|c| Value::str(c.encode_utf8(&mut [0; 4]))),
            Iteration::Range { range, index } => {
                let item = range.get(*index).map(Value::Int);
                *index += 1;
                item
            }
        }
    }
}

/// Evaluates a module, writing program output to `out`.
pub struct Interpreter<'a, W: Write> {
    out: W,
    globals: Rc<Scope<'a>>,
    call_depth: u32,
    max_recursion_depth: u32,
}

impl<'a, W: Write> Interpreter<'a, W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            globals: Scope::new(None),
            call_depth: 0,
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
        }
    }

    pub fn with_max_recursion_depth(mut self, depth: u32) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    /// A module-level variable, after `run_module`.
    pub fn global(&self, name: &str) -> Option<Value<'a>> {
        self.globals.get(name)
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Execute every statement of `module`. The first uncaught exception
    /// stops execution and is returned.
    ///
    /// Each Python call nests several native frames; the calling thread
    /// needs a stack large enough for `max_recursion_depth` calls.
    pub fn run_module(&mut self, module: &'a Module<'a>) -> Result<(), RuntimeError> {
        tracing::debug!(file = %module.file_name, "evaluating module");
        let frame = Frame {
            locals: self.globals.clone(),
            closure: None,
        };
        let result = self.exec_block(module.body, &frame);
        self.out.flush()?;
        match result {
            Ok(_) => {
                tracing::debug!("module finished");
                Ok(())
            }
            Err(err) => {
                tracing::debug!(error = %err, "module raised");
                Err(err)
            }
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn exec_block(&mut self, body: &'a [Statement<'a>], frame: &Frame<'a>) -> ExecResult<'a> {
        for stmt in body {
            match self.exec_statement(stmt, frame)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_statement(&mut self, stmt: &'a Statement<'a>, frame: &Frame<'a>) -> ExecResult<'a> {
        match stmt {
            Statement::FunctionDef(def) => {
                self.exec_function_def(def, frame)?;
                Ok(Flow::Normal)
            }
            Statement::ClassDef(def) => {
                self.exec_class_def(def, frame)?;
                Ok(Flow::Normal)
            }
            Statement::Return(ret) => {
                let value = match ret.value {
                    Some(expr) => self.eval(expr, frame)?,
                    None => Value::None,
                };
                Ok(Flow::Return(value))
            }
            Statement::If(node) => {
                if self.eval(node.condition, frame)?.is_truthy() {
                    self.exec_block(node.then_body, frame)
                } else {
                    self.exec_block(node.else_body, frame)
                }
            }
            Statement::While(node) => self.exec_while(node, frame),
            Statement::For(node) => self.exec_for(node, frame),
            Statement::Assign(node) => {
                let value = self.eval(node.value, frame)?;
                self.assign(node.target, value, frame)?;
                Ok(Flow::Normal)
            }
            Statement::AugAssign(node) => {
                self.exec_aug_assign(node, frame)?;
                Ok(Flow::Normal)
            }
            Statement::Expression(node) => {
                self.eval(node.expression, frame)?;
                Ok(Flow::Normal)
            }
            Statement::Break(_) => Ok(Flow::Break),
            Statement::Continue(_) => Ok(Flow::Continue),
            Statement::Pass(_) | Statement::Missing(_) => Ok(Flow::Normal),
        }
    }

    fn exec_function_def(&mut self, def: &'a FunctionDef<'a>, frame: &Frame<'a>) -> Result<(), RuntimeError> {
        let defaults = def
            .parameters
            .iter()
            .map(|param| param.default.map(|expr| self.eval(expr, frame)).transpose())
            .collect::<Result<Vec<_>, _>>()?;
        let function = Function {
            name: def.name.name,
            definition: def,
            defaults,
            closure: frame.closure.clone(),
        };
        frame.locals.set(def.name.name, Value::Function(Rc::new(function)));
        Ok(())
    }

    fn exec_class_def(&mut self, def: &'a ClassDef<'a>, frame: &Frame<'a>) -> Result<(), RuntimeError> {
        let mut bases = Vec::with_capacity(def.bases.len());
        for base in def.bases {
            match self.eval(base, frame)? {
                Value::Class(class) => bases.push(class),
                other => {
                    return Err(RuntimeError::type_error(
                        base.span(),
                        format!("bases must be classes, not '{}'", other.type_name()),
                    ))
                }
            }
        }

        let body = Frame {
            locals: Scope::new(frame.closure.clone()),
            closure: frame.closure.clone(),
        };
        self.exec_block(def.body, &body)?;

        let class = Class {
            name: def.name.name,
            bases,
            attributes: RefCell::new(body.locals.take_vars()),
        };
        frame.locals.set(def.name.name, Value::Class(Rc::new(class)));
        Ok(())
    }

    fn exec_while(&mut self, node: &'a WhileStatement<'a>, frame: &Frame<'a>) -> ExecResult<'a> {
        while self.eval(node.condition, frame)?.is_truthy() {
            match self.exec_block(node.body, frame)? {
                Flow::Break => return Ok(Flow::Normal),
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal | Flow::Continue => {}
            }
        }
        self.exec_block(node.else_body, frame)
    }

    fn exec_for(&mut self, node: &'a ForStatement<'a>, frame: &Frame<'a>) -> ExecResult<'a> {
        let iterable = self.eval(node.iterable, frame)?;
        for item in iterate(&iterable, node.iterable.span())? {
            frame.locals.set(node.target.name, item);
            match self.exec_block(node.body, frame)? {
                Flow::Break => return Ok(Flow::Normal),
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal | Flow::Continue => {}
            }
        }
        self.exec_block(node.else_body, frame)
    }

    fn exec_aug_assign(&mut self, node: &'a AugAssignStatement<'a>, frame: &Frame<'a>) -> Result<(), RuntimeError> {
        let span = node.data.span();
        match node.target {
            Expression::Name(id) => {
                let current = self.lookup(id, frame)?;
                let value = self.eval(node.value, frame)?;
                let result = self.in_place(node.operator, current, &value, span)?;
                frame.locals.set(id.name, result);
            }
            Expression::Attribute(attr) => {
                let object = self.eval(attr.object, frame)?;
                let current = self.get_attribute(&object, &attr.name)?;
                let value = self.eval(node.value, frame)?;
                let result = self.in_place(node.operator, current, &value, span)?;
                set_attribute(&object, &attr.name, result)?;
            }
            Expression::Subscript(sub) => {
                let object = self.eval(sub.object, frame)?;
                let index = self.eval(sub.index, frame)?;
                let current = ops::get_item(&object, &index, sub.data.span())?;
                let value = self.eval(node.value, frame)?;
                let result = self.in_place(node.operator, current, &value, span)?;
                ops::set_item(&object, &index, result, sub.data.span())?;
            }
            other => {
                return Err(RuntimeError::type_error(
                    other.span(),
                    format!("cannot assign to {}", other.describe()),
                ))
            }
        }
        Ok(())
    }

    /// `current op= value`. `+=` extends a list in place.
    fn in_place(&mut self, op: SyntaxKind, current: Value<'a>, value: &Value<'a>, span: TextSpan) -> EvalResult<'a> {
        if let (SyntaxKind::PlusToken, Value::List(items)) = (op, &current) {
            let extra: Vec<_> = iterate(value, span)?.collect();
            items.borrow_mut().extend(extra);
            return Ok(current);
        }
        ops::binary(op, &current, value, span)
    }

    fn assign(&mut self, target: &'a Expression<'a>, value: Value<'a>, frame: &Frame<'a>) -> Result<(), RuntimeError> {
        match target {
            Expression::Name(id) => {
                frame.locals.set(id.name, value);
                Ok(())
            }
            Expression::Attribute(attr) => {
                let object = self.eval(attr.object, frame)?;
                set_attribute(&object, &attr.name, value)
            }
            Expression::Subscript(sub) => {
                let object = self.eval(sub.object, frame)?;
                let index = self.eval(sub.index, frame)?;
                ops::set_item(&object, &index, value, sub.data.span())
            }
            other => Err(RuntimeError::type_error(
                other.span(),
                format!("cannot assign to {}", other.describe()),
            )),
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn eval(&mut self, expr: &'a Expression<'a>, frame: &Frame<'a>) -> EvalResult<'a> {
        match expr {
            Expression::Name(id) => self.lookup(id, frame),
            Expression::Integer(n) => Ok(Value::Int(n.value)),
            Expression::Float(n) => Ok(Value::Float(n.value)),
            Expression::String(s) => Ok(Value::str(s.value)),
            Expression::Boolean(b) => Ok(Value::Bool(b.value)),
            Expression::None(_) => Ok(Value::None),
            Expression::Binary(node) => self.eval_binary(node, frame),
            Expression::Unary(node) => {
                let operand = self.eval(node.operand, frame)?;
                if node.operator == SyntaxKind::NotKeyword {
                    return Ok(Value::Bool(!operand.is_truthy()));
                }
                ops::unary(node.operator, &operand, node.data.span())
            }
            Expression::Compare(node) => self.eval_compare(node, frame),
            Expression::Call(node) => self.eval_call(node, frame),
            Expression::Attribute(node) => {
                let object = self.eval(node.object, frame)?;
                self.get_attribute(&object, &node.name)
            }
            Expression::Subscript(node) => {
                let object = self.eval(node.object, frame)?;
                let index = self.eval(node.index, frame)?;
                ops::get_item(&object, &index, node.data.span())
            }
            Expression::List(node) => {
                let items = node
                    .elements
                    .iter()
                    .map(|element| self.eval(element, frame))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::list(items))
            }
            Expression::Missing(data) => Err(RuntimeError::type_error(data.span(), "missing expression")),
        }
    }

    fn eval_binary(&mut self, node: &'a BinaryExpression<'a>, frame: &Frame<'a>) -> EvalResult<'a> {
        let left = self.eval(node.left, frame)?;
        match node.operator {
            SyntaxKind::AndKeyword if !left.is_truthy() => Ok(left),
            SyntaxKind::OrKeyword if left.is_truthy() => Ok(left),
            SyntaxKind::AndKeyword | SyntaxKind::OrKeyword => self.eval(node.right, frame),
            op => {
                let right = self.eval(node.right, frame)?;
                ops::binary(op, &left, &right, node.data.span())
            }
        }
    }

    fn eval_compare(&mut self, node: &'a CompareExpression<'a>, frame: &Frame<'a>) -> EvalResult<'a> {
        let mut left = self.eval(node.left, frame)?;
        for comparison in node.comparisons {
            let right = self.eval(comparison.right, frame)?;
            if !ops::compare(comparison.operator, &left, &right, node.data.span())? {
                return Ok(Value::Bool(false));
            }
            left = right;
        }
        Ok(Value::Bool(true))
    }

    fn eval_call(&mut self, node: &'a CallExpression<'a>, frame: &Frame<'a>) -> EvalResult<'a> {
        let callee = self.eval(node.callee, frame)?;
        let mut args = Vec::with_capacity(node.arguments.len());
        let mut keywords = Vec::new();
        for arg in node.arguments {
            let value = self.eval(arg.value, frame)?;
            match &arg.name {
                Some(name) => keywords.push((name.name, value)),
                None => args.push(value),
            }
        }
        self.call(callee, args, keywords, node.data.span())
    }

    fn lookup(&self, id: &Identifier<'a>, frame: &Frame<'a>) -> EvalResult<'a> {
        frame
            .locals
            .lookup(id.name)
            .or_else(|| self.globals.get(id.name))
            .or_else(|| Builtin::from_name(id.name).map(Value::Builtin))
            .ok_or_else(|| {
                RuntimeError::name_error(id.data.span(), format!("name '{}' is not defined", id.name))
            })
    }

    fn get_attribute(&self, object: &Value<'a>, name: &Identifier<'a>) -> EvalResult<'a> {
        let span = name.data.span();
        match object {
            Value::Instance(instance) => {
                if let Some(value) = instance.fields.borrow().get(name.name) {
                    return Ok(value.clone());
                }
                match instance.class.lookup(name.name) {
                    Some(Value::Function(function)) => Ok(Value::BoundMethod(Rc::new(BoundMethod {
                        receiver: object.clone(),
                        function,
                    }))),
                    Some(value) => Ok(value),
                    None => Err(RuntimeError::attribute_error(
                        span,
                        format!("'{}' object has no attribute '{}'", instance.class.name, name.name),
                    )),
                }
            }
            Value::Class(class) => class.lookup(name.name).ok_or_else(|| {
                RuntimeError::attribute_error(
                    span,
                    format!("type object '{}' has no attribute '{}'", class.name, name.name),
                )
            }),
            other => Err(RuntimeError::attribute_error(
                span,
                format!("'{}' object has no attribute '{}'", other.type_name(), name.name),
            )),
        }
    }

    // ========================================================================
    // Calls
    // ========================================================================

    fn call(
        &mut self,
        callee: Value<'a>,
        args: Vec<Value<'a>>,
        keywords: Vec<(&'a str, Value<'a>)>,
        span: TextSpan,
    ) -> EvalResult<'a> {
        match callee {
            Value::Function(function) => self.call_function(&function, None, args, keywords, span),
            Value::BoundMethod(method) => {
                let receiver = method.receiver.clone();
                self.call_function(&method.function, Some(receiver), args, keywords, span)
            }
            Value::Class(class) => self.instantiate(class, args, keywords, span),
            Value::Builtin(builtin) => call_builtin(builtin, args, keywords, &mut self.out, span),
            other => Err(RuntimeError::type_error(
                span,
                format!("'{}' object is not callable", other.type_name()),
            )),
        }
    }

    fn call_function(
        &mut self,
        function: &Rc<Function<'a>>,
        receiver: Option<Value<'a>>,
        args: Vec<Value<'a>>,
        keywords: Vec<(&'a str, Value<'a>)>,
        span: TextSpan,
    ) -> EvalResult<'a> {
        if self.call_depth >= self.max_recursion_depth {
            return Err(RuntimeError::recursion(span));
        }
        let locals = Scope::new(function.closure.clone());
        bind_arguments(function, receiver, args, keywords, &locals, span)?;

        self.call_depth += 1;
        tracing::trace!(function = function.name, depth = self.call_depth, "call");
        let frame = Frame {
            locals: locals.clone(),
            closure: Some(locals),
        };
        let result = self.exec_block(function.definition.body, &frame);
        self.call_depth -= 1;

        match result? {
            Flow::Return(value) => Ok(value),
            _ => Ok(Value::None),
        }
    }

    /// Create an instance and run `__init__` on it.
    fn instantiate(
        &mut self,
        class: Rc<Class<'a>>,
        args: Vec<Value<'a>>,
        keywords: Vec<(&'a str, Value<'a>)>,
        span: TextSpan,
    ) -> EvalResult<'a> {
        let instance = Value::Instance(Rc::new(Instance::new(class.clone())));
        match class.lookup("__init__") {
            Some(Value::Function(init)) => {
                let result = self.call_function(&init, Some(instance.clone()), args, keywords, span)?;
                if !matches!(result, Value::None) {
                    return Err(RuntimeError::type_error(
                        span,
                        format!("__init__() should return None, not '{}'", result.type_name()),
                    ));
                }
            }
            Some(other) => {
                return Err(RuntimeError::type_error(
                    span,
                    format!("'{}' object is not callable", other.type_name()),
                ))
            }
            None if !args.is_empty() || !keywords.is_empty() => {
                return Err(RuntimeError::type_error(
                    span,
                    format!("{}() takes no arguments", class.name),
                ))
            }
            None => {}
        }
        Ok(instance)
    }
}

fn set_attribute<'a>(object: &Value<'a>, name: &Identifier<'a>, value: Value<'a>) -> Result<(), RuntimeError> {
    match object {
        Value::Instance(instance) => {
            instance.fields.borrow_mut().insert(name.name, value);
            Ok(())
        }
        Value::Class(class) => {
            class.attributes.borrow_mut().insert(name.name, value);
            Ok(())
        }
        other => Err(RuntimeError::attribute_error(
            name.data.span(),
            format!("'{}' object has no attribute '{}'", other.type_name(), name.name),
        )),
    }
}

fn iterate<'a>(value: &Value<'a>, span: TextSpan) -> Result<Iteration<'a>, RuntimeError> {
    match value {
        Value::List(items) => Ok(Iteration::List {
            items: items.clone(),
            index: 0,
        }),
        Value::Str(s) => Ok(Iteration::Chars(s.chars().collect::<Vec<_>>().into_iter())),
        Value::Range(range) => Ok(Iteration::Range {
            range: *range,
            index: 0,
        }),
        other => Err(RuntimeError::type_error(
            span,
            format!("'{}' object is not iterable", other.type_name()),
        )),
    }
}

/// Bind call arguments to the parameters of `function` in `locals`.
fn bind_arguments<'a>(
    function: &Function<'a>,
    receiver: Option<Value<'a>>,
    args: Vec<Value<'a>>,
    keywords: Vec<(&'a str, Value<'a>)>,
    locals: &Scope<'a>,
    span: TextSpan,
) -> Result<(), RuntimeError> {
    let params = function.definition.parameters;
    let given = args.len() + usize::from(receiver.is_some());
    if given > params.len() {
        return Err(RuntimeError::type_error(
            span,
            format!(
                "{}() takes {} positional argument{} but {} {} given",
                function.name,
                params.len(),
                if params.len() == 1 { "" } else { "s" },
                given,
                if given == 1 { "was" } else { "were" }
            ),
        ));
    }

    let mut slots: Vec<Option<Value<'a>>> = vec![None; params.len()];
    for (slot, value) in slots.iter_mut().zip(receiver.into_iter().chain(args)) {
        *slot = Some(value);
    }
    for (name, value) in keywords {
        match params.iter().position(|param| param.name.name == name) {
            None => {
                return Err(RuntimeError::type_error(
                    span,
                    format!("{}() got an unexpected keyword argument '{}'", function.name, name),
                ))
            }
            Some(i) if slots[i].is_some() => {
                return Err(RuntimeError::type_error(
                    span,
                    format!("{}() got multiple values for argument '{}'", function.name, name),
                ))
            }
            Some(i) => slots[i] = Some(value),
        }
    }

    let mut missing = Vec::new();
    for ((param, slot), default) in params.iter().zip(slots).zip(&function.defaults) {
        match slot.or_else(|| default.clone()) {
            Some(value) => locals.set(param.name.name, value),
            None => missing.push(format!("'{}'", param.name.name)),
        }
    }
    if !missing.is_empty() {
        return Err(RuntimeError::type_error(
            span,
            format!(
                "{}() missing {} required positional argument{}: {}",
                function.name,
                missing.len(),
                if missing.len() == 1 { "" } else { "s" },
                join_names(&missing)
            ),
        ));
    }
    Ok(())
}

/// `'a'`, `'a' and 'b'`, `'a', 'b', and 'c'`.
fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [one] => one.clone(),
        [first, second] => format!("{} and {}", first, second),
        [rest @ .., last] => format!("{}, and {}", rest.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_names() {
        let names = |list: &[&str]| list.iter().map(|s| format!("'{}'", s)).collect::<Vec<_>>();
        assert_eq!(join_names(&names(&["a"])), "'a'");
        assert_eq!(join_names(&names(&["a", "b"])), "'a' and 'b'");
        assert_eq!(join_names(&names(&["a", "b", "c"])), "'a', 'b', and 'c'");
    }
}
