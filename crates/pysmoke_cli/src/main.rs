//! pysmoke: run, inspect and check Python-subset scripts.
//!
//! Usage:
//!   pysmoke [options] [FILE]
//!
//! Without a file the bundled smoke script is evaluated.

use clap::Parser as ClapParser;
use miette::{LabeledSpan, MietteDiagnostic, NamedSource, Report, Severity};
use pysmoke_compiler::demo::run_demo;
use pysmoke_compiler::{Program, ProgramError};
use pysmoke_diagnostics::{Diagnostic, DiagnosticCategory};
use pysmoke_evaluator::RuntimeError;
use pysmoke_options::{load_options, RunOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const EXIT_COMPILE_ERROR: u8 = 1;
const EXIT_RUNTIME_ERROR: u8 = 2;

#[derive(ClapParser, Debug)]
#[command(name = "pysmoke", version, about = "pysmoke - a scanner, parser, binder and evaluator for a Python subset")]
struct Cli {
    /// Python file to run. Defaults to the bundled smoke script.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path to pysmoke.json.
    #[arg(short = 'p', long = "project")]
    project: Option<PathBuf>,

    /// Run the native Rust demo instead of evaluating a script.
    #[arg(long, conflicts_with = "file")]
    demo: bool,

    /// Print the token listing before running.
    #[arg(long)]
    tokens: bool,

    /// Print the symbol table before running.
    #[arg(long)]
    symbols: bool,

    /// Write the parse tree as a Graphviz digraph.
    #[arg(long, value_name = "PATH")]
    dot: Option<PathBuf>,

    /// Parse and bind only.
    #[arg(long)]
    check: bool,

    /// Log phase boundaries to stderr.
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    run(&cli)
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

fn run(cli: &Cli) -> ExitCode {
    let options = match resolve_options(cli) {
        Ok(options) => options,
        Err(message) => {
            print_error(&message);
            return ExitCode::from(EXIT_COMPILE_ERROR);
        }
    };

    if cli.demo {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        return match run_demo(&mut out) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                print_error(&err.to_string());
                ExitCode::from(EXIT_RUNTIME_ERROR)
            }
        };
    }

    let arena = bumpalo::Bump::new();
    let program = match &cli.file {
        Some(path) => match Program::from_file(&arena, path, options) {
            Ok(program) => program,
            Err(err) => {
                print_error(&err.to_string());
                return ExitCode::from(EXIT_COMPILE_ERROR);
            }
        },
        None => Program::smoke(&arena, options),
    };
    run_program(&program, cli.check)
}

/// The project file's options with command-line flags layered on top.
fn resolve_options(cli: &Cli) -> Result<RunOptions, String> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut options = load_options(cli.project.as_deref(), &cwd).map_err(|err| err.to_string())?;
    options.print_tokens |= cli.tokens;
    options.print_symbols |= cli.symbols;
    if cli.dot.is_some() {
        options.dot_output = cli.dot.clone();
    }
    tracing::debug!(?options, "resolved options");
    Ok(options)
}

fn run_program(program: &Program<'_>, check_only: bool) -> ExitCode {
    let mut out = io::BufWriter::new(io::stdout());

    if program.options.print_tokens {
        if let Err(err) = write!(out, "{}", program.token_listing()) {
            print_error(&err.to_string());
            return ExitCode::FAILURE;
        }
    }

    let compilation = program.check();
    for diag in compilation.diagnostics.diagnostics() {
        print_diagnostic(diag, program);
    }

    if program.options.print_symbols {
        if let Err(err) = write!(out, "{}", compilation.symbols) {
            print_error(&err.to_string());
            return ExitCode::FAILURE;
        }
    }
    if let Some(path) = &program.options.dot_output {
        if let Err(err) = write_dot(path, &compilation.dot()) {
            print_error(&err);
            return ExitCode::FAILURE;
        }
    }

    if compilation.has_errors() {
        if !flush_output(&mut out) {
            return ExitCode::FAILURE;
        }
        let count = compilation.diagnostics.error_count();
        eprintln!("\nFound {} error{}.", count, if count == 1 { "" } else { "s" });
        return ExitCode::from(EXIT_COMPILE_ERROR);
    }
    if check_only {
        return if flush_output(&mut out) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    let result = program.run(&compilation, &mut out);
    let flushed = flush_output(&mut out);
    match result {
        Ok(()) if flushed => ExitCode::SUCCESS,
        Ok(()) => ExitCode::FAILURE,
        Err(ProgramError::Runtime(err)) => {
            print_runtime_error(&err, program);
            ExitCode::from(EXIT_RUNTIME_ERROR)
        }
        Err(err) => {
            print_error(&err.to_string());
            ExitCode::from(EXIT_RUNTIME_ERROR)
        }
    }
}

/// Flush program output, reporting a failure on stderr.
fn flush_output(out: &mut impl Write) -> bool {
    match out.flush() {
        Ok(()) => true,
        Err(err) => {
            print_error(&format!("cannot write output: {}", err));
            false
        }
    }
}

fn write_dot(path: &Path, dot: &str) -> Result<(), String> {
    std::fs::write(path, dot).map_err(|err| format!("cannot write {}: {}", path.display(), err))?;
    tracing::info!(path = %path.display(), "wrote parse tree");
    Ok(())
}

fn source_of(program: &Program<'_>) -> NamedSource<String> {
    NamedSource::new(program.file_name(), program.source_text().to_string())
}

fn print_diagnostic(diag: &Diagnostic, program: &Program<'_>) {
    let severity = match diag.category {
        DiagnosticCategory::Error => Severity::Error,
        DiagnosticCategory::Warning => Severity::Warning,
        DiagnosticCategory::Message => Severity::Advice,
    };
    let mut report = MietteDiagnostic::new(diag.message_text.clone())
        .with_code(diag.code_text())
        .with_severity(severity);
    if let Some(span) = diag.span {
        report = report.with_label(LabeledSpan::at(span.to_range(), "here"));
    }
    eprintln!("{:?}", Report::new(report).with_source_code(source_of(program)));
}

fn print_runtime_error(err: &RuntimeError, program: &Program<'_>) {
    let mut report = MietteDiagnostic::new(err.to_string()).with_code(err.kind());
    if let Some(span) = err.span() {
        report = report.with_label(LabeledSpan::at(span.to_range(), "raised here"));
    }
    eprintln!("{:?}", Report::new(report).with_source_code(source_of(program)));
}

fn print_error(msg: &str) {
    eprintln!("error: {}", msg);
}
