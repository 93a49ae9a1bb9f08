// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use rstest::rstest;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = HarnessConfig::merge(FileConfig::default(), &Cli::default()).unwrap();
    assert_eq!(config.client, PathBuf::from("sqlcmd"));
    assert_eq!(config.pattern, "*.sql");
    assert_eq!(config.results_dir, PathBuf::from("results"));
    assert_eq!(config.reports_dir, PathBuf::from("reports"));
    assert_eq!(config.timeout, Some(Duration::from_secs(300)));
    assert_eq!(config.normalize, Normalization::TrailingNewline);
    assert_eq!(config.jobs, 1);
    assert_eq!(config.format, ClientFormat::default());
    assert!(!config.fail_on_regression);
}

#[test]
fn test_parse_full_file() {
    let file = FileConfig::parse(
        r#"
server = "db.local"
user = "tester"
password = "hunter2"
database = "sales"
results_dir = "out/results"
reports_dir = "out/reports"
scripts_dir = "queries"
pattern = "*.tsql"
client = "/opt/mssql-tools/bin/sqlcmd"
timeout_secs = 60
delimiter = ","
headers = false
trim_whitespace = false
extra_args = ["-y", "0"]
normalize = "exact"
jobs = 4
fail_on_regression = true
"#,
    )
    .unwrap();

    let config = HarnessConfig::merge(file, &Cli::default()).unwrap();
    assert_eq!(config.connection.server.as_deref(), Some("db.local"));
    assert_eq!(config.connection.database.as_deref(), Some("sales"));
    assert_eq!(config.scripts_dir, PathBuf::from("queries"));
    assert_eq!(config.pattern, "*.tsql");
    assert_eq!(config.timeout, Some(Duration::from_secs(60)));
    assert_eq!(config.format.delimiter, ",");
    assert!(!config.format.headers);
    assert!(!config.format.trim_whitespace);
    assert_eq!(config.format.extra_args, vec!["-y", "0"]);
    assert_eq!(config.normalize, Normalization::Exact);
    assert_eq!(config.jobs, 4);
    assert!(config.fail_on_regression);
}

#[test]
fn test_unknown_key_rejected() {
    assert!(FileConfig::parse("servr = \"typo\"\n").is_err());
}

#[test]
fn test_cli_overrides_file() {
    let file = FileConfig {
        server: Some("file-host".to_string()),
        jobs: Some(2),
        timeout_secs: Some(60),
        ..FileConfig::default()
    };
    let cli = Cli {
        server: Some("cli-host".to_string()),
        timeout_secs: Some(5),
        ..Cli::default()
    };
    let config = HarnessConfig::merge(file, &cli).unwrap();
    assert_eq!(config.connection.server.as_deref(), Some("cli-host"));
    assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    assert_eq!(config.jobs, 2);
}

#[test]
fn test_zero_timeout_disables() {
    let cli = Cli {
        timeout_secs: Some(0),
        ..Cli::default()
    };
    let config = HarnessConfig::merge(FileConfig::default(), &cli).unwrap();
    assert_eq!(config.timeout, None);
}

#[rstest]
#[case::zero_jobs(FileConfig { jobs: Some(0), ..FileConfig::default() })]
#[case::blank_pattern(FileConfig { pattern: Some("  ".to_string()), ..FileConfig::default() })]
#[case::empty_delimiter(FileConfig { delimiter: Some(String::new()), ..FileConfig::default() })]
#[case::shared_dirs(FileConfig {
    results_dir: Some(PathBuf::from("out")),
    reports_dir: Some(PathBuf::from("out")),
    ..FileConfig::default()
})]
fn test_invalid_settings(#[case] file: FileConfig) {
    let err = HarnessConfig::merge(file, &Cli::default()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_discover_default_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "jobs = 3\n").unwrap();
    let file = FileConfig::discover(None, dir.path()).unwrap();
    assert_eq!(file.jobs, Some(3));
}

#[test]
fn test_discover_without_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let file = FileConfig::discover(None, dir.path()).unwrap();
    assert_eq!(file, FileConfig::default());
}

#[test]
fn test_explicit_path_must_exist() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = FileConfig::discover(Some(&missing), dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_resolve_reports_parse_error_with_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "jobs = \"many\"\n").unwrap();
    let cli = Cli {
        config: Some(path.clone()),
        ..Cli::default()
    };
    let err = HarnessConfig::resolve(&cli, dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Toml { .. }));
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn test_connection_debug_redacts_password() {
    let connection = ConnectionConfig {
        password: Some("hunter2".to_string()),
        ..ConnectionConfig::default()
    };
    let debug = format!("{:?}", connection);
    assert!(debug.contains("****"));
    assert!(!debug.contains("hunter2"));
}

#[test]
fn test_rooted_at() {
    let config = HarnessConfig::rooted_at(Path::new("/tmp/run"));
    assert_eq!(config.scripts_dir, PathBuf::from("/tmp/run"));
    assert_eq!(config.results_dir, PathBuf::from("/tmp/run/results"));
    assert_eq!(config.reports_dir, PathBuf::from("/tmp/run/reports"));
}
