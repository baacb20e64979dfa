//! The binder implementation.
//!
//! Walks the AST and builds the symbol table. Handles:
//! - Symbol creation for functions, methods, classes, parameters and variables
//! - Scope management (module, function and class scopes)
//! - Instance attributes assigned through a method's receiver
//! - Coarse data type inference from the first binding
//! - Resolution of every name use once all declarations are known

use crate::scope::ScopeKind;
use crate::symbol::{DataType, Symbol, SymbolKind, SymbolTable};
use pysmoke_ast::node::*;
use pysmoke_ast::syntax_kind::SyntaxKind;
use pysmoke_ast::types::{NodeFlags, ScopeId, SymbolFlags, SymbolId};
use pysmoke_ast::visitor::AstVisitor;
use pysmoke_core::intern::InternedString;
use pysmoke_core::text::{LineMap, TextSpan};
use pysmoke_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};

/// Names the evaluator provides without a declaration.
pub const BUILTIN_NAMES: &[&str] = &["print", "range", "len", "str", "int", "float", "abs", "bool"];

/// A use of a name, resolved after the whole module is bound so that
/// functions may refer to globals declared later in the file.
struct Reference {
    scope: ScopeId,
    name: InternedString,
    text: String,
    span: TextSpan,
}

/// The method whose body is being bound.
#[derive(Clone, Copy)]
struct MethodContext {
    /// The first parameter (`self`).
    receiver: InternedString,
    /// The class scope that receives `self.x` attributes.
    class_scope: ScopeId,
}

/// The binder creates symbols and links declarations.
pub struct Binder {
    table: SymbolTable,
    current_scope: ScopeId,
    method: Option<MethodContext>,
    references: Vec<Reference>,
    line_map: LineMap,
    file_name: String,
    warn_undefined_names: bool,
    /// Diagnostics from binding.
    diagnostics: DiagnosticCollection,
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

impl Binder {
    pub fn new() -> Self {
        Self {
            table: SymbolTable::new(),
            current_scope: ScopeId::MODULE,
            method: None,
            references: Vec::new(),
            line_map: LineMap::new(""),
            file_name: String::new(),
            warn_undefined_names: true,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    pub fn with_warn_undefined_names(mut self, warn: bool) -> Self {
        self.warn_undefined_names = warn;
        self
    }

    /// Take diagnostics from the binder.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn into_symbol_table(self) -> SymbolTable {
        self.table
    }

    // ========================================================================
    // Module binding
    // ========================================================================

    /// Bind a module, creating symbols for all declarations.
    pub fn bind_module(&mut self, module: &Module<'_>) {
        tracing::debug!(file = %module.file_name, "binding module");
        self.line_map = LineMap::new(&module.text);
        self.file_name = module.file_name.clone();
        self.current_scope = ScopeId::MODULE;
        self.visit_module(module);
        self.resolve_references();
        tracing::debug!(
            symbols = self.table.symbols().len(),
            scopes = self.table.scopes().len(),
            "bound module"
        );
    }

    fn resolve_references(&mut self) {
        for reference in std::mem::take(&mut self.references) {
            match self.table.lookup(reference.scope, reference.name) {
                Some(id) => self.table.symbol_mut(id).flags |= SymbolFlags::REFERENCED,
                None => {
                    if self.warn_undefined_names && !BUILTIN_NAMES.contains(&reference.text.as_str()) {
                        self.report(reference.span, &messages::CANNOT_FIND_NAME, &[&reference.text]);
                    }
                }
            }
        }
    }

    fn report(&mut self, span: TextSpan, msg: &DiagnosticMessage, args: &[&str]) {
        self.diagnostics
            .add(Diagnostic::with_location(&self.file_name, span, msg, args));
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// Declare `id` in `scope`. Returns the new symbol, or `None` when the
    /// name is missing or already declared there (the first declaration is
    /// kept and marked reassigned).
    fn declare(
        &mut self,
        scope: ScopeId,
        id: &Identifier<'_>,
        kind: SymbolKind,
        data_type: DataType,
    ) -> Option<SymbolId> {
        if id.data.flags.contains(NodeFlags::THIS_NODE_HAS_ERROR) {
            return None;
        }
        let location = self.line_map.line_and_column_of(id.data.range.pos);
        let symbol = Symbol::new(id.text, id.name, kind)
            .with_data_type(data_type)
            .with_flags(SymbolFlags::INITIALIZED)
            .at(location.line_number(), location.column_number());
        match self.table.insert(scope, symbol) {
            Ok(symbol) => Some(symbol),
            Err(existing) => {
                self.table.symbol_mut(existing).flags |= SymbolFlags::REASSIGNED;
                None
            }
        }
    }

    fn lookup_symbol(&self, name: InternedString) -> Option<&Symbol> {
        self.table
            .lookup(self.current_scope, name)
            .map(|id| self.table.symbol(id))
    }

    // ========================================================================
    // Data type inference
    // ========================================================================

    fn infer_data_type(&self, expr: &Expression<'_>) -> DataType {
        match expr {
            Expression::Integer(_) => DataType::Integer,
            Expression::Float(_) => DataType::Float,
            Expression::String(_) => DataType::String,
            Expression::Boolean(_) => DataType::Boolean,
            Expression::None(_) => DataType::None,
            Expression::List(_) => DataType::List,
            Expression::Compare(_) => DataType::Boolean,
            Expression::Unary(n) if n.operator == SyntaxKind::NotKeyword => DataType::Boolean,
            Expression::Unary(n) => match self.infer_data_type(n.operand) {
                DataType::Integer | DataType::Boolean => DataType::Integer,
                DataType::Float => DataType::Float,
                _ => DataType::Unknown,
            },
            Expression::Binary(n) => infer_binary(
                n.operator,
                self.infer_data_type(n.left),
                self.infer_data_type(n.right),
            ),
            Expression::Name(id) => match self.lookup_symbol(id.text) {
                Some(symbol)
                    if matches!(
                        symbol.kind,
                        SymbolKind::Variable | SymbolKind::Parameter | SymbolKind::Attribute
                    ) =>
                {
                    symbol.data_type
                }
                _ => DataType::Unknown,
            },
            Expression::Call(call) => self.infer_call(call),
            _ => DataType::Unknown,
        }
    }

    fn infer_call(&self, call: &CallExpression<'_>) -> DataType {
        let Expression::Name(callee) = call.callee else {
            return DataType::Unknown;
        };
        if let Some(symbol) = self.lookup_symbol(callee.text) {
            return if symbol.kind == SymbolKind::Class {
                DataType::Instance
            } else {
                DataType::Unknown
            };
        }
        match callee.name {
            "str" => DataType::String,
            "int" | "len" => DataType::Integer,
            "float" => DataType::Float,
            "bool" => DataType::Boolean,
            "abs" => call
                .arguments
                .first()
                .map_or(DataType::Unknown, |arg| self.infer_data_type(arg.value)),
            _ => DataType::Unknown,
        }
    }

    /// The type of the loop variable when iterating `iterable`.
    fn infer_element_type(&self, iterable: &Expression<'_>) -> DataType {
        match iterable {
            Expression::Call(call) => match call.callee {
                Expression::Name(id) if id.name == "range" && self.lookup_symbol(id.text).is_none() => {
                    DataType::Integer
                }
                _ => DataType::Unknown,
            },
            Expression::String(_) => DataType::String,
            Expression::List(list) => {
                let mut types = list.elements.iter().map(|e| self.infer_data_type(e));
                match types.next() {
                    Some(first) if types.all(|t| t == first) => first,
                    _ => DataType::Unknown,
                }
            }
            _ => DataType::Unknown,
        }
    }
}

fn is_integral(data_type: DataType) -> bool {
    matches!(data_type, DataType::Integer | DataType::Boolean)
}

fn is_number(data_type: DataType) -> bool {
    is_integral(data_type) || data_type == DataType::Float
}

fn infer_binary(operator: SyntaxKind, left: DataType, right: DataType) -> DataType {
    match operator {
        SyntaxKind::AndKeyword | SyntaxKind::OrKeyword => {
            if left == right {
                left
            } else {
                DataType::Unknown
            }
        }
        SyntaxKind::PlusToken if left == right && matches!(left, DataType::String | DataType::List) => left,
        SyntaxKind::AsteriskToken if matches!(left, DataType::String | DataType::List) && is_integral(right) => left,
        SyntaxKind::AsteriskToken if is_integral(left) && matches!(right, DataType::String | DataType::List) => right,
        SyntaxKind::SlashToken if is_number(left) && is_number(right) => DataType::Float,
        _ if is_integral(left) && is_integral(right) => DataType::Integer,
        SyntaxKind::PlusToken
        | SyntaxKind::MinusToken
        | SyntaxKind::AsteriskToken
        | SyntaxKind::SlashSlashToken
        | SyntaxKind::PercentToken
        | SyntaxKind::AsteriskAsteriskToken
            if is_number(left) && is_number(right) =>
        {
            DataType::Float
        }
        _ => DataType::Unknown,
    }
}

impl<'a> AstVisitor<'a> for Binder {
    fn visit_function_def(&mut self, node: &FunctionDef<'a>) {
        // Defaults are evaluated in the enclosing scope.
        for param in node.parameters {
            if let Some(default) = param.default {
                self.visit_expression(default);
            }
        }
        let parameter_types: Vec<DataType> = node
            .parameters
            .iter()
            .map(|p| p.default.map_or(DataType::Unknown, |d| self.infer_data_type(d)))
            .collect();

        let enclosing = self.current_scope;
        let kind = if self.table.scope(enclosing).kind == ScopeKind::Class {
            SymbolKind::Method
        } else {
            SymbolKind::Function
        };
        let function = self.declare(enclosing, &node.name, kind, DataType::None);
        let scope = self.table.add_scope(ScopeKind::Function, node.name.name, enclosing);

        let mut parameters = Vec::with_capacity(node.parameters.len());
        for (param, data_type) in node.parameters.iter().zip(parameter_types) {
            if self.table.lookup_in_scope(scope, param.name.text).is_some() {
                self.report(param.name.data.span(), &messages::DUPLICATE_PARAMETER, &[param.name.name]);
                continue;
            }
            if let Some(id) = self.declare(scope, &param.name, SymbolKind::Parameter, data_type) {
                parameters.push(id);
            }
        }
        if let Some(id) = function {
            let symbol = self.table.symbol_mut(id);
            symbol.parameters = parameters;
            symbol.members = Some(scope);
        }

        let saved_method = self.method.take();
        if kind == SymbolKind::Method {
            match node.parameters.first() {
                Some(first) => {
                    self.method = Some(MethodContext {
                        receiver: first.name.text,
                        class_scope: enclosing,
                    })
                }
                None => self.report(
                    node.name.data.span(),
                    &messages::SELF_EXPECTED_AS_FIRST_PARAMETER,
                    &[node.name.name],
                ),
            }
        }

        self.current_scope = scope;
        self.visit_statements(node.body);
        self.current_scope = enclosing;
        self.method = saved_method;
    }

    fn visit_class_def(&mut self, node: &ClassDef<'a>) {
        for base in node.bases {
            self.visit_expression(base);
        }
        let enclosing = self.current_scope;
        let class = self.declare(enclosing, &node.name, SymbolKind::Class, DataType::Unknown);
        let scope = self.table.add_scope(ScopeKind::Class, node.name.name, enclosing);
        if let Some(id) = class {
            self.table.symbol_mut(id).members = Some(scope);
        }

        let saved_method = self.method.take();
        self.current_scope = scope;
        self.visit_statements(node.body);
        self.current_scope = enclosing;
        self.method = saved_method;
    }

    fn visit_for_statement(&mut self, node: &ForStatement<'a>) {
        self.visit_expression(node.iterable);
        let data_type = self.infer_element_type(node.iterable);
        self.declare(self.current_scope, &node.target, SymbolKind::Variable, data_type);
        self.visit_statements(node.body);
        self.visit_statements(node.else_body);
    }

    fn visit_assign_statement(&mut self, node: &AssignStatement<'a>) {
        self.visit_expression(node.value);
        match node.target {
            Expression::Name(id) => {
                let data_type = self.infer_data_type(node.value);
                self.declare(self.current_scope, id, SymbolKind::Variable, data_type);
            }
            Expression::Attribute(attr) => {
                self.visit_expression(attr.object);
                if let (Some(method), Expression::Name(object)) = (self.method, attr.object) {
                    if object.text == method.receiver {
                        let data_type = self.infer_data_type(node.value);
                        self.declare(method.class_scope, &attr.name, SymbolKind::Attribute, data_type);
                    }
                }
            }
            target => self.visit_expression(target),
        }
    }

    fn visit_name(&mut self, node: &Identifier<'a>) {
        if node.data.flags.contains(NodeFlags::THIS_NODE_HAS_ERROR) {
            return;
        }
        self.references.push(Reference {
            scope: self.current_scope,
            name: node.text,
            text: node.name.to_string(),
            span: node.data.span(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_inference() {
        use DataType::*;
        assert_eq!(infer_binary(SyntaxKind::PlusToken, Integer, Integer), Integer);
        assert_eq!(infer_binary(SyntaxKind::PlusToken, Integer, Boolean), Integer);
        assert_eq!(infer_binary(SyntaxKind::SlashToken, Integer, Integer), Float);
        assert_eq!(infer_binary(SyntaxKind::MinusToken, Float, Integer), Float);
        assert_eq!(infer_binary(SyntaxKind::PlusToken, String, String), String);
        assert_eq!(infer_binary(SyntaxKind::AsteriskToken, Integer, String), String);
        assert_eq!(infer_binary(SyntaxKind::AsteriskToken, List, Integer), List);
        assert_eq!(infer_binary(SyntaxKind::PlusToken, String, Integer), Unknown);
        assert_eq!(infer_binary(SyntaxKind::AmpersandToken, Float, Integer), Unknown);
        assert_eq!(infer_binary(SyntaxKind::OrKeyword, Integer, String), Unknown);
        assert_eq!(infer_binary(SyntaxKind::AndKeyword, Boolean, Boolean), Boolean);
    }
}
