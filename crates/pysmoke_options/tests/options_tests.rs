//! Project file discovery tests.

use pysmoke_options::{load_options, OptionsError, RunOptions, CONFIG_FILE_NAME};
use std::fs;
use std::path::PathBuf;

#[test]
fn test_defaults_without_project_file() {
    let dir = tempfile::tempdir().unwrap();
    let options = load_options(None, dir.path()).unwrap();
    assert_eq!(options, RunOptions::default());
}

#[test]
fn test_discovers_file_in_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        r#"{
            "maxRecursionDepth": 64,
            "warnUndefinedNames": false,
            "printSymbols": true,
            "dotOutput": "tree.dot"
        }"#,
    )
    .unwrap();

    let options = load_options(None, dir.path()).unwrap();
    assert_eq!(options.max_recursion_depth, 64);
    assert_eq!(options.max_parse_depth, 200);
    assert!(!options.warn_undefined_names);
    assert!(options.print_symbols);
    assert!(!options.print_tokens);
    assert_eq!(options.dot_output, Some(PathBuf::from("tree.dot")));
}

#[test]
fn test_explicit_path_wins() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{ "maxParseDepth": 10 }"#).unwrap();
    let explicit = dir.path().join("other.json");
    fs::write(&explicit, r#"{ "maxParseDepth": 20 }"#).unwrap();

    let options = load_options(Some(&explicit), dir.path()).unwrap();
    assert_eq!(options.max_parse_depth, 20);
}

#[test]
fn test_missing_explicit_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let err = load_options(Some(&missing), dir.path()).unwrap_err();
    assert!(matches!(err, OptionsError::Read { .. }));
    assert!(err.to_string().starts_with("cannot read "));
}

#[test]
fn test_malformed_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "{ maxParseDepth: }").unwrap();

    let err = load_options(None, dir.path()).unwrap_err();
    assert!(matches!(err, OptionsError::Parse { .. }));
    assert!(err.to_string().contains(CONFIG_FILE_NAME));
}

#[test]
fn test_zero_recursion_depth_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{ "maxRecursionDepth": 0 }"#).unwrap();
    let err = load_options(None, dir.path()).unwrap_err();
    assert_eq!(err.to_string(), "maxRecursionDepth must be at least 1");
}
