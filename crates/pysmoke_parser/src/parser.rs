//! The parser implementation.
//!
//! A recursive descent parser over the scanner's token stream. Blocks are
//! delimited by the scanner's `IndentToken` / `DedentToken`, statements end
//! at `NewLineToken`. Nodes are allocated in a caller-owned arena.

use bumpalo::collections::Vec as BumpVec;
use bumpalo::Bump;
use pysmoke_ast::node::*;
use pysmoke_ast::syntax_kind::SyntaxKind;
use pysmoke_ast::types::{NodeFlags, TokenFlags};
use pysmoke_core::intern::StringInterner;
use pysmoke_core::text::TextSpan;
use pysmoke_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use pysmoke_scanner::Scanner;
use std::num::IntErrorKind;

use crate::precedence::{compare_operator, get_binary_operator_precedence, OperatorPrecedence};
use crate::utilities::{is_unsupported_statement_keyword, parse_float_literal, parse_integer_literal};

/// Maximum recursion depth to prevent stack overflow on deeply nested input.
pub const DEFAULT_MAX_PARSE_DEPTH: u32 = 200;

type StatementList<'a> = BumpVec<'a, Statement<'a>>;

/// The parser produces a `Module` AST from source text.
pub struct Parser<'a> {
    arena: &'a Bump,
    scanner: Scanner,
    interner: StringInterner,
    file_name: String,
    source_text: String,
    diagnostics: DiagnosticCollection,
    /// Tracks recursion depth to prevent stack overflow on deeply nested input.
    recursion_depth: u32,
    max_depth: u32,
    /// End of the last consumed token that was not a layout token.
    last_end: u32,
    /// Start of the most recent error; a second error at the same place is dropped.
    last_error_pos: Option<u32>,
    /// Enclosing `def` bodies.
    function_depth: u32,
    /// Enclosing loop bodies within the innermost function or class.
    loop_depth: u32,
}

impl<'a> Parser<'a> {
    pub fn new(arena: &'a Bump, file_name: &str, source_text: &str) -> Self {
        Self {
            arena,
            scanner: Scanner::with_file_name(source_text, file_name),
            interner: StringInterner::new(),
            file_name: file_name.to_string(),
            source_text: source_text.to_string(),
            diagnostics: DiagnosticCollection::new(),
            recursion_depth: 0,
            max_depth: DEFAULT_MAX_PARSE_DEPTH,
            last_end: 0,
            last_error_pos: None,
            function_depth: 0,
            loop_depth: 0,
        }
    }

    /// Intern identifiers into `interner` so later phases share the table.
    pub fn with_interner(mut self, interner: StringInterner) -> Self {
        self.interner = interner;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn parse_module(&mut self) -> Module<'a> {
        tracing::debug!(file = %self.file_name, "parsing module");
        self.next_token();

        let mut body = BumpVec::new_in(self.arena);
        while self.current_token() != SyntaxKind::EndOfFileToken {
            match self.current_token() {
                SyntaxKind::IndentToken => {
                    self.error(&messages::UNEXPECTED_INDENT, &[]);
                    self.next_token();
                    self.parse_block_statements(&mut body);
                    self.parse_optional(SyntaxKind::DedentToken);
                }
                SyntaxKind::DedentToken | SyntaxKind::NewLineToken => {
                    self.next_token();
                }
                _ => self.parse_statement(&mut body),
            }
        }

        let end = self.source_text.len() as u32;
        Module {
            data: NodeData::new(SyntaxKind::Module, 0, end),
            body: body.into_bump_slice(),
            file_name: self.file_name.clone(),
            text: self.source_text.clone(),
        }
    }

    /// Scanner and parser diagnostics, in source order.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        let mut diagnostics = self.scanner.take_diagnostics();
        diagnostics.extend(std::mem::take(&mut self.diagnostics));
        diagnostics.sort();
        diagnostics
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    fn current_token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    /// Advance to the next token. Invalid characters were already reported by
    /// the scanner and are skipped here.
    fn next_token(&mut self) -> SyntaxKind {
        let current = self.current_token();
        if !current.is_layout() && current != SyntaxKind::EndOfFileToken {
            self.last_end = self.scanner.token_end() as u32;
        }
        loop {
            let kind = self.scanner.scan();
            if kind != SyntaxKind::Unknown {
                return kind;
            }
        }
    }

    #[inline]
    fn token_pos(&self) -> u32 {
        self.scanner.token_start() as u32
    }

    #[inline]
    fn token_end(&self) -> u32 {
        self.scanner.token_end() as u32
    }

    fn expect_token(&mut self, kind: SyntaxKind) -> bool {
        if self.current_token() == kind {
            self.next_token();
            true
        } else {
            self.error(&messages::_0_EXPECTED, &[kind.display_text()]);
            false
        }
    }

    fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.current_token() == kind {
            self.next_token();
            true
        } else {
            false
        }
    }

    fn error(&mut self, msg: &DiagnosticMessage, args: &[&str]) {
        let span = TextSpan::from_bounds(self.token_pos(), self.token_end());
        self.error_at(span, msg, args);
    }

    fn error_at(&mut self, span: TextSpan, msg: &DiagnosticMessage, args: &[&str]) {
        if self.last_error_pos == Some(span.start) {
            return;
        }
        self.last_error_pos = Some(span.start);
        self.diagnostics
            .add(Diagnostic::with_location(&self.file_name, span, msg, args));
    }

    fn enter(&mut self) -> bool {
        self.recursion_depth += 1;
        if self.recursion_depth > self.max_depth {
            self.recursion_depth -= 1;
            return false;
        }
        true
    }

    #[inline]
    fn leave(&mut self) {
        self.recursion_depth -= 1;
    }

    // ========================================================================
    // Error recovery
    // ========================================================================

    /// Skip to the end of the current logical line without consuming the
    /// `NewLineToken`.
    fn skip_to_line_end(&mut self) {
        while !matches!(
            self.current_token(),
            SyntaxKind::NewLineToken | SyntaxKind::EndOfFileToken
        ) {
            self.next_token();
        }
    }

    /// Skip the rest of the line and any block indented under it.
    fn skip_line_and_block(&mut self) {
        self.skip_to_line_end();
        self.parse_optional(SyntaxKind::NewLineToken);
        if self.current_token() != SyntaxKind::IndentToken {
            return;
        }
        let mut depth = 0u32;
        loop {
            match self.current_token() {
                SyntaxKind::IndentToken => depth += 1,
                SyntaxKind::DedentToken => {
                    depth -= 1;
                    if depth == 0 {
                        self.next_token();
                        return;
                    }
                }
                SyntaxKind::EndOfFileToken => return,
                _ => {}
            }
            self.next_token();
        }
    }

    // ========================================================================
    // Statement parsing
    // ========================================================================

    /// Statements of an indented block, up to (not including) its dedent.
    fn parse_block_statements(&mut self, out: &mut StatementList<'a>) {
        loop {
            match self.current_token() {
                SyntaxKind::DedentToken | SyntaxKind::EndOfFileToken => return,
                SyntaxKind::NewLineToken => {
                    self.next_token();
                }
                SyntaxKind::IndentToken => {
                    self.error(&messages::UNEXPECTED_INDENT, &[]);
                    self.next_token();
                    self.parse_block_statements(out);
                    self.parse_optional(SyntaxKind::DedentToken);
                }
                _ => self.parse_statement(out),
            }
        }
    }

    fn parse_statement(&mut self, out: &mut StatementList<'a>) {
        let statement = match self.current_token() {
            SyntaxKind::DefKeyword => self.parse_function_def(),
            SyntaxKind::ClassKeyword => self.parse_class_def(),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::ElifKeyword | SyntaxKind::ElseKeyword => {
                let pos = self.token_pos();
                self.error(&messages::UNEXPECTED_TOKEN, &[self.current_token().display_text()]);
                self.skip_line_and_block();
                self.missing_statement(pos)
            }
            kind if is_unsupported_statement_keyword(kind) => {
                let pos = self.token_pos();
                self.error(&messages::UNSUPPORTED_STATEMENT, &[kind.display_text()]);
                self.skip_line_and_block();
                self.missing_statement(pos)
            }
            _ => return self.parse_simple_statements(out),
        };
        out.push(statement);
    }

    fn missing_statement(&self, pos: u32) -> Statement<'a> {
        Statement::Missing(
            NodeData::new(SyntaxKind::MissingStatement, pos, self.last_end.max(pos))
                .with_flags(NodeFlags::THIS_NODE_HAS_ERROR),
        )
    }

    /// `simple (';' simple)* [';'] NEWLINE`
    fn parse_simple_statements(&mut self, out: &mut StatementList<'a>) {
        loop {
            let statement = self.parse_simple_statement();
            out.push(statement);
            if !self.parse_optional(SyntaxKind::SemicolonToken) {
                break;
            }
            if matches!(
                self.current_token(),
                SyntaxKind::NewLineToken | SyntaxKind::EndOfFileToken
            ) {
                break;
            }
        }
        self.parse_expected_newline();
    }

    fn parse_expected_newline(&mut self) {
        match self.current_token() {
            SyntaxKind::NewLineToken => {
                self.next_token();
            }
            SyntaxKind::EndOfFileToken => {}
            _ => {
                self.error(&messages::_0_EXPECTED, &[SyntaxKind::NewLineToken.display_text()]);
                self.skip_to_line_end();
                self.parse_optional(SyntaxKind::NewLineToken);
            }
        }
    }

    fn is_end_of_simple_statement(&self) -> bool {
        matches!(
            self.current_token(),
            SyntaxKind::NewLineToken | SyntaxKind::SemicolonToken | SyntaxKind::EndOfFileToken
        )
    }

    fn parse_simple_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        match self.current_token() {
            SyntaxKind::PassKeyword => {
                self.next_token();
                Statement::Pass(NodeData::new(SyntaxKind::PassStatement, pos, self.last_end))
            }
            SyntaxKind::BreakKeyword => {
                if self.loop_depth == 0 {
                    self.error(&messages::_0_OUTSIDE_LOOP, &["break"]);
                }
                self.next_token();
                Statement::Break(NodeData::new(SyntaxKind::BreakStatement, pos, self.last_end))
            }
            SyntaxKind::ContinueKeyword => {
                if self.loop_depth == 0 {
                    self.error(&messages::_0_OUTSIDE_LOOP, &["continue"]);
                }
                self.next_token();
                Statement::Continue(NodeData::new(SyntaxKind::ContinueStatement, pos, self.last_end))
            }
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            kind if is_unsupported_statement_keyword(kind) => {
                self.error(&messages::UNSUPPORTED_STATEMENT, &[kind.display_text()]);
                self.skip_to_line_end();
                self.missing_statement(pos)
            }
            _ => self.parse_expression_or_assignment(),
        }
    }

    fn parse_return_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        if self.function_depth == 0 {
            self.error(&messages::_0_OUTSIDE_FUNCTION, &["return"]);
        }
        self.next_token(); // skip 'return'
        let value = if self.is_end_of_simple_statement() {
            None
        } else {
            Some(self.parse_expression_and_alloc())
        };
        Statement::Return(ReturnStatement {
            data: NodeData::new(SyntaxKind::ReturnStatement, pos, self.last_end),
            value,
        })
    }

    fn parse_expression_or_assignment(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        let target = self.parse_expression();
        let kind = self.current_token();

        if kind == SyntaxKind::EqualsToken {
            self.check_assignment_target(&target);
            self.next_token();
            let value = self.parse_expression_and_alloc();
            return Statement::Assign(AssignStatement {
                data: NodeData::new(SyntaxKind::AssignStatement, pos, self.last_end),
                target: self.arena.alloc(target),
                value,
            });
        }

        if let Some(operator) = kind.augmented_operator() {
            self.check_assignment_target(&target);
            self.next_token();
            let value = self.parse_expression_and_alloc();
            return Statement::AugAssign(AugAssignStatement {
                data: NodeData::new(SyntaxKind::AugAssignStatement, pos, self.last_end),
                target: self.arena.alloc(target),
                operator,
                value,
            });
        }

        Statement::Expression(ExpressionStatement {
            data: NodeData::new(SyntaxKind::ExpressionStatement, pos, self.last_end),
            expression: self.arena.alloc(target),
        })
    }

    fn check_assignment_target(&mut self, target: &Expression<'a>) {
        if !target.is_assignment_target() {
            self.error_at(target.span(), &messages::INVALID_ASSIGNMENT_TARGET, &[target.describe()]);
        }
    }

    /// `':' (NEWLINE INDENT statements DEDENT | simple_statements)`
    ///
    /// Returns the body and `SINGLE_LINE_SUITE` when it shares the header line.
    fn parse_suite(&mut self) -> (&'a [Statement<'a>], NodeFlags) {
        self.expect_token(SyntaxKind::ColonToken);
        let mut body = BumpVec::new_in(self.arena);
        match self.current_token() {
            SyntaxKind::NewLineToken => {
                self.next_token();
                if self.current_token() != SyntaxKind::IndentToken {
                    self.error(&messages::EXPECTED_AN_INDENTED_BLOCK, &[]);
                    return (body.into_bump_slice(), NodeFlags::NONE);
                }
                self.next_token();
                self.parse_block_statements(&mut body);
                self.parse_optional(SyntaxKind::DedentToken);
                (body.into_bump_slice(), NodeFlags::NONE)
            }
            SyntaxKind::EndOfFileToken => {
                self.error(&messages::EXPECTED_AN_INDENTED_BLOCK, &[]);
                (body.into_bump_slice(), NodeFlags::NONE)
            }
            _ => {
                self.parse_simple_statements(&mut body);
                (body.into_bump_slice(), NodeFlags::SINGLE_LINE_SUITE)
            }
        }
    }

    fn parse_function_def(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token(); // skip 'def'
        let name = self.parse_identifier();
        let parameters = self.parse_parameters();
        if self.parse_optional(SyntaxKind::MinusGreaterThanToken) {
            // Return annotations are accepted and ignored.
            self.parse_expression();
        }

        let saved = (self.function_depth, self.loop_depth);
        self.function_depth += 1;
        self.loop_depth = 0;
        let (body, flags) = self.parse_suite();
        (self.function_depth, self.loop_depth) = saved;

        Statement::FunctionDef(FunctionDef {
            data: NodeData::new(SyntaxKind::FunctionDef, pos, self.last_end).with_flags(flags),
            name,
            parameters,
            body,
        })
    }

    fn parse_parameters(&mut self) -> &'a [Parameter<'a>] {
        let mut parameters = BumpVec::new_in(self.arena);
        if !self.expect_token(SyntaxKind::OpenParenToken) {
            return parameters.into_bump_slice();
        }
        let mut seen_default = false;
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseParenToken | SyntaxKind::EndOfFileToken
        ) {
            let pos = self.token_pos();
            let name = self.parse_identifier();
            if self.parse_optional(SyntaxKind::ColonToken) {
                // Parameter annotations are accepted and ignored.
                self.parse_expression();
            }
            let default = if self.parse_optional(SyntaxKind::EqualsToken) {
                seen_default = true;
                Some(self.parse_expression_and_alloc())
            } else {
                if seen_default {
                    self.error_at(name.data.span(), &messages::NON_DEFAULT_PARAMETER_FOLLOWS_DEFAULT, &[]);
                }
                None
            };
            parameters.push(Parameter {
                data: NodeData::new(SyntaxKind::Parameter, pos, self.last_end),
                name,
                default,
            });
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseParenToken);
        parameters.into_bump_slice()
    }

    fn parse_class_def(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token(); // skip 'class'
        let name = self.parse_identifier();
        let mut bases = BumpVec::new_in(self.arena);
        if self.parse_optional(SyntaxKind::OpenParenToken) {
            while !matches!(
                self.current_token(),
                SyntaxKind::CloseParenToken | SyntaxKind::EndOfFileToken
            ) {
                bases.push(self.parse_expression());
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            self.expect_token(SyntaxKind::CloseParenToken);
        }

        let saved = (self.function_depth, self.loop_depth);
        self.function_depth = 0;
        self.loop_depth = 0;
        let (body, flags) = self.parse_suite();
        (self.function_depth, self.loop_depth) = saved;

        Statement::ClassDef(ClassDef {
            data: NodeData::new(SyntaxKind::ClassDef, pos, self.last_end).with_flags(flags),
            name,
            bases: bases.into_bump_slice(),
            body,
        })
    }

    /// Parses `if` and, recursively, each `elif` as a nested `if` in the
    /// else branch.
    fn parse_if_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token(); // skip 'if' or 'elif'
        let condition = self.parse_expression_and_alloc();
        let (then_body, flags) = self.parse_suite();
        let else_body: &'a [Statement<'a>] = match self.current_token() {
            SyntaxKind::ElifKeyword => {
                let nested = self.parse_if_statement();
                let nested: &'a Statement<'a> = self.arena.alloc(nested);
                std::slice::from_ref(nested)
            }
            SyntaxKind::ElseKeyword => {
                self.next_token();
                self.parse_suite().0
            }
            _ => &[],
        };
        Statement::If(IfStatement {
            data: NodeData::new(SyntaxKind::IfStatement, pos, self.last_end).with_flags(flags),
            condition,
            then_body,
            else_body,
        })
    }

    /// The optional `else:` suite of a loop.
    fn parse_loop_else(&mut self) -> &'a [Statement<'a>] {
        if self.parse_optional(SyntaxKind::ElseKeyword) {
            self.parse_suite().0
        } else {
            &[]
        }
    }

    fn parse_while_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token(); // skip 'while'
        let condition = self.parse_expression_and_alloc();
        self.loop_depth += 1;
        let (body, flags) = self.parse_suite();
        self.loop_depth -= 1;
        let else_body = self.parse_loop_else();
        Statement::While(WhileStatement {
            data: NodeData::new(SyntaxKind::WhileStatement, pos, self.last_end).with_flags(flags),
            condition,
            body,
            else_body,
        })
    }

    fn parse_for_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token(); // skip 'for'
        let target = self.parse_identifier();
        self.expect_token(SyntaxKind::InKeyword);
        let iterable = self.parse_expression_and_alloc();
        self.loop_depth += 1;
        let (body, flags) = self.parse_suite();
        self.loop_depth -= 1;
        let else_body = self.parse_loop_else();
        Statement::For(ForStatement {
            data: NodeData::new(SyntaxKind::ForStatement, pos, self.last_end).with_flags(flags),
            target,
            iterable,
            body,
            else_body,
        })
    }

    // ========================================================================
    // Expression parsing
    // ========================================================================

    fn parse_expression_and_alloc(&mut self) -> &'a Expression<'a> {
        let expr = self.parse_expression();
        self.arena.alloc(expr)
    }

    fn parse_expression(&mut self) -> Expression<'a> {
        if !self.enter() {
            return self.nesting_too_deep();
        }
        let expr = self.parse_binary_expression(OperatorPrecedence::Lowest);
        self.leave();
        expr
    }

    /// Report the nesting limit once and abandon the rest of the line.
    fn nesting_too_deep(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        self.error(&messages::MAXIMUM_NESTING_DEPTH_EXCEEDED, &[]);
        self.skip_to_line_end();
        Expression::Missing(
            NodeData::new(SyntaxKind::MissingExpression, pos, pos)
                .with_flags(NodeFlags::THIS_NODE_HAS_ERROR),
        )
    }

    fn current_binary_precedence(&mut self) -> OperatorPrecedence {
        match self.current_token() {
            SyntaxKind::NotKeyword => {
                if self.scanner.look_ahead(|s| s.scan()) == SyntaxKind::InKeyword {
                    OperatorPrecedence::Comparison
                } else {
                    OperatorPrecedence::Invalid
                }
            }
            kind => get_binary_operator_precedence(kind),
        }
    }

    fn parse_binary_expression(&mut self, min_precedence: OperatorPrecedence) -> Expression<'a> {
        let mut left = self.parse_operand();

        loop {
            let precedence = self.current_binary_precedence();
            if precedence == OperatorPrecedence::Invalid || precedence <= min_precedence {
                break;
            }
            if precedence == OperatorPrecedence::Comparison {
                left = self.parse_comparison_chain(left);
                continue;
            }
            let operator = self.current_token();
            self.next_token();
            let right = self.parse_binary_expression(precedence);
            left = self.make_binary(left, operator, right);
        }

        left
    }

    fn make_binary(&self, left: Expression<'a>, operator: SyntaxKind, right: Expression<'a>) -> Expression<'a> {
        let pos = left.data().range.pos;
        Expression::Binary(BinaryExpression {
            data: NodeData::new(SyntaxKind::BinaryExpression, pos, self.last_end),
            left: self.arena.alloc(left),
            operator,
            right: self.arena.alloc(right),
        })
    }

    /// `a < b <= c` becomes one node holding both comparisons.
    fn parse_comparison_chain(&mut self, left: Expression<'a>) -> Expression<'a> {
        let pos = left.data().range.pos;
        let mut comparisons = BumpVec::new_in(self.arena);
        while self.current_binary_precedence() == OperatorPrecedence::Comparison {
            let operator = self.parse_compare_operator();
            let right = self.parse_binary_expression(OperatorPrecedence::Comparison);
            comparisons.push(Comparison {
                operator,
                right: self.arena.alloc(right),
            });
        }
        Expression::Compare(CompareExpression {
            data: NodeData::new(SyntaxKind::CompareExpression, pos, self.last_end),
            left: self.arena.alloc(left),
            comparisons: comparisons.into_bump_slice(),
        })
    }

    fn parse_compare_operator(&mut self) -> CompareOperator {
        let operator = match self.current_token() {
            SyntaxKind::NotKeyword => {
                self.next_token(); // skip 'not', 'in' follows
                CompareOperator::NotIn
            }
            SyntaxKind::IsKeyword => {
                self.next_token();
                if self.current_token() != SyntaxKind::NotKeyword {
                    return CompareOperator::Is;
                }
                CompareOperator::IsNot
            }
            kind => compare_operator(kind).unwrap_or(CompareOperator::Equal),
        };
        self.next_token();
        operator
    }

    /// An operand of a binary operator: `not x` or a unary expression.
    fn parse_operand(&mut self) -> Expression<'a> {
        if self.current_token() != SyntaxKind::NotKeyword {
            return self.parse_unary_expression();
        }
        if !self.enter() {
            return self.nesting_too_deep();
        }
        let pos = self.token_pos();
        self.next_token(); // skip 'not'
        let operand = self.parse_binary_expression(OperatorPrecedence::LogicalNot);
        self.leave();
        Expression::Unary(UnaryExpression {
            data: NodeData::new(SyntaxKind::UnaryExpression, pos, self.last_end),
            operator: SyntaxKind::NotKeyword,
            operand: self.arena.alloc(operand),
        })
    }

    fn parse_unary_expression(&mut self) -> Expression<'a> {
        if !self.enter() {
            return self.nesting_too_deep();
        }
        let expr = match self.current_token() {
            SyntaxKind::MinusToken | SyntaxKind::PlusToken | SyntaxKind::TildeToken => {
                let pos = self.token_pos();
                let operator = self.current_token();
                self.next_token();
                let operand = self.parse_unary_expression();
                Expression::Unary(UnaryExpression {
                    data: NodeData::new(SyntaxKind::UnaryExpression, pos, self.last_end),
                    operator,
                    operand: self.arena.alloc(operand),
                })
            }
            _ => self.parse_power_expression(),
        };
        self.leave();
        expr
    }

    /// `primary ['**' unary]`, so `-2 ** 2` is `-(2 ** 2)` and `2 ** -1` parses.
    fn parse_power_expression(&mut self) -> Expression<'a> {
        let base = self.parse_postfix_expression();
        if self.current_token() != SyntaxKind::AsteriskAsteriskToken {
            return base;
        }
        self.next_token();
        let exponent = self.parse_unary_expression();
        self.make_binary(base, SyntaxKind::AsteriskAsteriskToken, exponent)
    }

    fn parse_postfix_expression(&mut self) -> Expression<'a> {
        let mut expr = self.parse_primary_expression();
        loop {
            let pos = expr.data().range.pos;
            expr = match self.current_token() {
                SyntaxKind::OpenParenToken => self.parse_call_expression(expr),
                SyntaxKind::DotToken => {
                    self.next_token();
                    let name = self.parse_identifier();
                    Expression::Attribute(AttributeExpression {
                        data: NodeData::new(SyntaxKind::AttributeExpression, pos, self.last_end),
                        object: self.arena.alloc(expr),
                        name,
                    })
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token();
                    let index = self.parse_expression_and_alloc();
                    self.expect_token(SyntaxKind::CloseBracketToken);
                    Expression::Subscript(SubscriptExpression {
                        data: NodeData::new(SyntaxKind::SubscriptExpression, pos, self.last_end),
                        object: self.arena.alloc(expr),
                        index,
                    })
                }
                _ => return expr,
            };
        }
    }

    fn parse_call_expression(&mut self, callee: Expression<'a>) -> Expression<'a> {
        let pos = callee.data().range.pos;
        self.next_token(); // skip '('
        let mut arguments = BumpVec::new_in(self.arena);
        let mut seen_keyword = false;
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseParenToken | SyntaxKind::EndOfFileToken
        ) {
            let arg_pos = self.token_pos();
            let name = if self.is_keyword_argument() {
                let name = self.parse_identifier();
                self.next_token(); // skip '='
                seen_keyword = true;
                Some(name)
            } else {
                if seen_keyword {
                    self.error(&messages::POSITIONAL_ARGUMENT_FOLLOWS_KEYWORD, &[]);
                }
                None
            };
            let value = self.parse_expression_and_alloc();
            arguments.push(Argument {
                data: NodeData::new(SyntaxKind::Argument, arg_pos, self.last_end),
                name,
                value,
            });
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseParenToken);
        Expression::Call(CallExpression {
            data: NodeData::new(SyntaxKind::CallExpression, pos, self.last_end),
            callee: self.arena.alloc(callee),
            arguments: arguments.into_bump_slice(),
        })
    }

    /// Look ahead: `name =` inside a call is a keyword argument.
    fn is_keyword_argument(&mut self) -> bool {
        self.current_token() == SyntaxKind::Identifier
            && self.scanner.look_ahead(|s| s.scan()) == SyntaxKind::EqualsToken
    }

    fn parse_primary_expression(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        match self.current_token() {
            SyntaxKind::Identifier => Expression::Name(self.parse_identifier()),
            SyntaxKind::NumericLiteral => self.parse_numeric_literal(),
            SyntaxKind::StringLiteral => self.parse_string_literal(),
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                let kind = self.current_token();
                self.next_token();
                Expression::Boolean(BooleanLiteral {
                    data: NodeData::new(kind, pos, self.last_end),
                    value: kind == SyntaxKind::TrueKeyword,
                })
            }
            SyntaxKind::NoneKeyword => {
                self.next_token();
                Expression::None(NodeData::new(SyntaxKind::NoneKeyword, pos, self.last_end))
            }
            SyntaxKind::OpenParenToken => self.parse_parenthesized_expression(),
            SyntaxKind::OpenBracketToken => self.parse_list_expression(),
            _ => {
                self.error(&messages::EXPRESSION_EXPECTED, &[]);
                Expression::Missing(
                    NodeData::new(SyntaxKind::MissingExpression, pos, pos)
                        .with_flags(NodeFlags::THIS_NODE_HAS_ERROR),
                )
            }
        }
    }

    fn parse_parenthesized_expression(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        self.next_token(); // skip '('
        if self.current_token() == SyntaxKind::CloseParenToken {
            // Tuples are not part of the subset.
            self.error(&messages::EXPRESSION_EXPECTED, &[]);
            self.next_token();
            return Expression::Missing(
                NodeData::new(SyntaxKind::MissingExpression, pos, self.last_end)
                    .with_flags(NodeFlags::THIS_NODE_HAS_ERROR),
            );
        }
        let mut expr = self.parse_expression();
        self.expect_token(SyntaxKind::CloseParenToken);
        expr.data_mut().flags |= NodeFlags::PARENTHESIZED;
        expr
    }

    fn parse_list_expression(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        self.next_token(); // skip '['
        let mut elements = BumpVec::new_in(self.arena);
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseBracketToken | SyntaxKind::EndOfFileToken
        ) {
            elements.push(self.parse_expression());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseBracketToken);
        Expression::List(ListExpression {
            data: NodeData::new(SyntaxKind::ListExpression, pos, self.last_end),
            elements: elements.into_bump_slice(),
        })
    }

    fn parse_numeric_literal(&mut self) -> Expression<'a> {
        let span = TextSpan::from_bounds(self.token_pos(), self.token_end());
        let text = self.scanner.token_value().to_string();
        let is_float = self.scanner.token_flags().contains(TokenFlags::FLOATING_POINT);
        self.next_token();
        let data = NodeData::new(SyntaxKind::NumericLiteral, span.start, span.end());

        if is_float {
            // Malformed exponents were reported by the scanner.
            let value = parse_float_literal(&text).unwrap_or(0.0);
            return Expression::Float(FloatLiteral { data, value });
        }
        match parse_integer_literal(&text) {
            Ok(value) => Expression::Integer(IntegerLiteral { data, value }),
            Err(err) => {
                if *err.kind() == IntErrorKind::PosOverflow {
                    self.error_at(span, &messages::INTEGER_LITERAL_TOO_LARGE, &[&text]);
                }
                Expression::Integer(IntegerLiteral {
                    data: data.with_flags(NodeFlags::THIS_NODE_HAS_ERROR),
                    value: 0,
                })
            }
        }
    }

    /// Adjacent string literals concatenate: `"a" "b"` is `"ab"`.
    fn parse_string_literal(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let mut value = self.scanner.token_value().to_string();
        self.next_token();
        while self.current_token() == SyntaxKind::StringLiteral {
            value.push_str(self.scanner.token_value());
            self.next_token();
        }
        Expression::String(StringLiteral {
            data: NodeData::new(SyntaxKind::StringLiteral, pos, self.last_end),
            value: self.arena.alloc_str(&value),
        })
    }

    fn parse_identifier(&mut self) -> Identifier<'a> {
        let pos = self.token_pos();
        if self.current_token() == SyntaxKind::Identifier {
            let arena = self.arena;
            let name: &'a str = arena.alloc_str(self.scanner.token_value());
            let text = self.interner.intern(name);
            self.next_token();
            return Identifier {
                data: NodeData::new(SyntaxKind::Identifier, pos, self.last_end),
                text,
                name,
            };
        }
        self.error(&messages::IDENTIFIER_EXPECTED, &[]);
        Identifier {
            data: NodeData::new(SyntaxKind::Identifier, pos, pos)
                .with_flags(NodeFlags::THIS_NODE_HAS_ERROR),
            text: self.interner.intern(""),
            name: "",
        }
    }
}
