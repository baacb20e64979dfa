//! pysmoke_options: `pysmoke.json` parsing and run options.
//!
//! Parses the optional project file and provides the `RunOptions` structure
//! every phase reads its limits and switches from. Command-line flags are
//! layered on top by the CLI.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The project file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "pysmoke.json";

/// Run options, matching the `pysmoke.json` schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct RunOptions {
    /// Deepest call nesting the evaluator allows.
    pub max_recursion_depth: u32,
    /// Deepest expression/statement nesting the parser allows.
    pub max_parse_depth: u32,
    /// Report uses of names that are never declared.
    pub warn_undefined_names: bool,
    pub print_tokens: bool,
    pub print_symbols: bool,
    /// Where to write the DOT parse tree, if anywhere.
    pub dot_output: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_recursion_depth: 1000,
            max_parse_depth: 200,
            warn_undefined_names: true,
            print_tokens: false,
            print_symbols: false,
            dot_output: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{field} must be at least 1")]
    ZeroLimit { field: &'static str },
}

impl RunOptions {
    fn validate(self) -> Result<Self, OptionsError> {
        if self.max_recursion_depth == 0 {
            return Err(OptionsError::ZeroLimit { field: "maxRecursionDepth" });
        }
        if self.max_parse_depth == 0 {
            return Err(OptionsError::ZeroLimit { field: "maxParseDepth" });
        }
        Ok(self)
    }
}

/// Parse run options from a string.
pub fn parse_options(content: &str) -> Result<RunOptions, serde_json::Error> {
    serde_json::from_str(content)
}

/// Parse run options from a path.
pub fn parse_options_file(path: &Path) -> Result<RunOptions, OptionsError> {
    let content = std::fs::read_to_string(path).map_err(|source| OptionsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let options = parse_options(&content).map_err(|source| OptionsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    options.validate()
}

/// Load options from `explicit` if given, else from `pysmoke.json` in `dir`
/// if it exists, else the defaults.
pub fn load_options(explicit: Option<&Path>, dir: &Path) -> Result<RunOptions, OptionsError> {
    if let Some(path) = explicit {
        tracing::debug!(path = %path.display(), "loading project file");
        return parse_options_file(path);
    }
    let candidate = dir.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        tracing::debug!(path = %candidate.display(), "found project file");
        return parse_options_file(&candidate);
    }
    Ok(RunOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let options = parse_options(r#"{ "printTokens": true }"#).unwrap();
        assert!(options.print_tokens);
        assert_eq!(options.max_recursion_depth, 1000);
        assert!(options.warn_undefined_names);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(parse_options(r#"{ "maxDepth": 3 }"#).is_err());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let options = RunOptions {
            max_parse_depth: 0,
            ..RunOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(OptionsError::ZeroLimit { field: "maxParseDepth" })
        ));
    }
}
