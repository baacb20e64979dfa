//! pysmoke_compiler: Pipeline orchestration.
//!
//! Creates the program, coordinates scanning, parsing, binding, tree
//! output and evaluation of one source file, and hosts the native Rust
//! rendition of the smoke script in [`demo`].

pub mod demo;

use bumpalo::Bump;
use pysmoke_ast::node::Module;
use pysmoke_binder::{Binder, SymbolTable};
use pysmoke_core::text::LineMap;
use pysmoke_diagnostics::DiagnosticCollection;
use pysmoke_evaluator::{Interpreter, RuntimeError};
use pysmoke_options::RunOptions;
use pysmoke_parser::Parser;
use pysmoke_scanner::{Scanner, TokenInfo, TokenListing};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The bundled smoke script.
pub const SMOKE_SCRIPT: &str = include_str!("../fixtures/smoke.py");
pub const SMOKE_FILE_NAME: &str = "smoke.py";

/// Native stack reserved per allowed Python call, on top of a fixed base.
const STACK_PER_CALL: usize = 512 << 10;
const BASE_STACK_SIZE: usize = 16 << 20;

fn evaluator_stack_size(max_recursion_depth: u32) -> usize {
    (max_recursion_depth as usize)
        .saturating_mul(STACK_PER_CALL)
        .saturating_add(BASE_STACK_SIZE)
}

#[derive(Error, Debug)]
pub enum ProgramError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{errors} error(s) found, not running")]
    Compile { errors: usize },
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("factorial({0}) does not fit in a 64-bit integer")]
    Overflow(i64),
    #[error(transparent)]
    Output(#[from] std::io::Error),
}

/// A parsed and bound module with everything the phases reported.
pub struct Compilation<'a> {
    pub module: Module<'a>,
    pub symbols: SymbolTable,
    /// Scanner, parser and binder diagnostics, in source order.
    pub diagnostics: DiagnosticCollection,
}

impl Compilation<'_> {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// The parse tree as a Graphviz digraph.
    pub fn dot(&self) -> String {
        pysmoke_printer::module_to_dot(&self.module)
    }
}

/// The program represents one source file and the options it runs under.
pub struct Program<'a> {
    pub options: RunOptions,
    arena: &'a Bump,
    file_name: String,
    source_text: String,
}

impl<'a> Program<'a> {
    pub fn new(
        arena: &'a Bump,
        file_name: impl Into<String>,
        source_text: impl Into<String>,
        options: RunOptions,
    ) -> Self {
        Self {
            options,
            arena,
            file_name: file_name.into(),
            source_text: source_text.into(),
        }
    }

    /// The bundled smoke script.
    pub fn smoke(arena: &'a Bump, options: RunOptions) -> Self {
        Self::new(arena, SMOKE_FILE_NAME, SMOKE_SCRIPT, options)
    }

    /// Load a source file from disk.
    pub fn from_file(arena: &'a Bump, path: &Path, options: RunOptions) -> Result<Self, ProgramError> {
        let source_text = std::fs::read_to_string(path).map_err(|source| ProgramError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(arena, path.display().to_string(), source_text, options))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Scan the whole file. Scanner diagnostics resurface from `check`.
    pub fn tokens(&self) -> Vec<TokenInfo> {
        Scanner::with_file_name(&self.source_text, &self.file_name).scan_all()
    }

    /// The `index | kind | value | line:col` listing of every token.
    pub fn token_listing(&self) -> String {
        let tokens = self.tokens();
        let line_map = LineMap::new(&self.source_text);
        TokenListing::new(&tokens, &line_map).to_string()
    }

    /// Parse and bind.
    pub fn check(&self) -> Compilation<'a> {
        let mut parser = Parser::new(self.arena, &self.file_name, &self.source_text)
            .with_max_depth(self.options.max_parse_depth);
        let module = parser.parse_module();
        let mut diagnostics = parser.take_diagnostics();

        let mut binder = Binder::new().with_warn_undefined_names(self.options.warn_undefined_names);
        binder.bind_module(&module);
        diagnostics.extend(binder.take_diagnostics());
        diagnostics.sort();

        tracing::debug!(
            file = %self.file_name,
            diagnostics = diagnostics.len(),
            errors = diagnostics.error_count(),
            "checked"
        );
        Compilation {
            module,
            symbols: binder.into_symbol_table(),
            diagnostics,
        }
    }

    /// Evaluate a checked module, writing what it prints to `out`.
    ///
    /// Output produced before a runtime error stays in `out`. The evaluator
    /// runs on its own thread with a stack sized for the recursion limit, so
    /// deep Python recursion ends in `RecursionError` on any calling thread.
    pub fn run<W: Write + Send>(&self, compilation: &Compilation<'_>, out: &mut W) -> Result<(), ProgramError> {
        if compilation.has_errors() {
            return Err(ProgramError::Compile {
                errors: compilation.diagnostics.error_count(),
            });
        }
        let max_depth = self.options.max_recursion_depth;
        let module = &compilation.module;
        std::thread::scope(|scope| {
            let evaluator = std::thread::Builder::new()
                .name("pysmoke-eval".to_string())
                .stack_size(evaluator_stack_size(max_depth))
                .spawn_scoped(scope, move || {
                    let mut interpreter = Interpreter::new(out).with_max_recursion_depth(max_depth);
                    interpreter.run_module(module)
                })?;
            match evaluator.join() {
                Ok(result) => Ok(result?),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        })
    }

    /// Check, then run.
    pub fn execute<W: Write + Send>(&self, out: &mut W) -> Result<Compilation<'a>, ProgramError> {
        let compilation = self.check();
        self.run(&compilation, out)?;
        Ok(compilation)
    }
}
