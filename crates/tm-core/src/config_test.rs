use super::*;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

fn write_conf(content: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), content).unwrap();
    dir
}

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

#[test]
fn test_load_development_section() {
    let dir = write_conf(
        r#"
development:
  driver: duckdb
  open: ./dev.duckdb
production:
  driver: duckdb
  open: /var/lib/app/prod.duckdb
"#,
    );
    let conf = DbConf::load_with(dir.path(), "development", vars(&[])).unwrap();
    assert_eq!(conf.env, "development");
    assert_eq!(conf.driver, DriverName::DuckDb);
    assert_eq!(conf.open, "./dev.duckdb");
    assert_eq!(conf.migrations_dir, dir.path().join("migrations"));
    assert!(!conf.is_in_memory());
}

#[test]
fn test_load_expands_variables() {
    let dir = write_conf(
        r#"
test:
  driver: $DRIVER
  open: ${DATA_DIR}/test.duckdb
"#,
    );
    let conf = DbConf::load_with(
        dir.path(),
        "test",
        vars(&[("DRIVER", "duckdb"), ("DATA_DIR", "/data")]),
    )
    .unwrap();
    assert_eq!(conf.open, "/data/test.duckdb");
}

#[test]
fn test_load_in_memory() {
    let dir = write_conf("development:\n  driver: duckdb\n  open: \":memory:\"\n");
    let conf = DbConf::load_with(dir.path(), "development", vars(&[])).unwrap();
    assert!(conf.is_in_memory());
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = DbConf::load(dir.path(), "development").unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_unknown_environment_lists_available() {
    let dir = write_conf("development:\n  driver: duckdb\n  open: a.duckdb\n");
    let err = DbConf::load_with(dir.path(), "staging", vars(&[])).unwrap_err();
    match err {
        CoreError::ConfigInvalid { message } => {
            assert!(message.contains("staging"));
            assert!(message.contains("development"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_load_unsupported_driver() {
    let dir = write_conf("development:\n  driver: mysql\n  open: user@/db\n");
    let err = DbConf::load_with(dir.path(), "development", vars(&[])).unwrap_err();
    match err {
        CoreError::ConfigInvalid { message } => assert!(message.contains("mysql")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_load_empty_open_after_expansion() {
    let dir = write_conf("development:\n  driver: duckdb\n  open: $UNSET_PATH\n");
    let err = DbConf::load_with(dir.path(), "development", vars(&[])).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_load_rejects_unknown_fields() {
    let dir = write_conf("development:\n  driver: duckdb\n  open: a.duckdb\n  import: x\n");
    let err = DbConf::load_with(dir.path(), "development", vars(&[])).unwrap_err();
    assert!(matches!(err, CoreError::YamlParse(_)));
}

#[test]
fn test_in_memory_constructor() {
    let conf = DbConf::in_memory("/tmp/migrations");
    assert!(conf.is_in_memory());
    assert_eq!(conf.env, DEFAULT_ENV);
}

#[test]
fn test_expand_vars_edge_cases() {
    let lookup = vars(&[("A", "1"), ("A_B", "2")]);
    assert_eq!(expand_vars("no vars", &lookup), "no vars");
    assert_eq!(expand_vars("$A_B-$A", &lookup), "2-1");
    assert_eq!(expand_vars("cost: $", &lookup), "cost: $");
    assert_eq!(expand_vars("$$A", &lookup), "$1");
    assert_eq!(expand_vars("${A", &lookup), "${A");
    assert_eq!(expand_vars("${}", &lookup), "");
}

#[test]
fn test_driver_name_round_trip() {
    assert_eq!("duckdb".parse::<DriverName>().unwrap(), DriverName::DuckDb);
    assert_eq!(DriverName::DuckDb.to_string(), "duckdb");
}

// These tests modify environment variables and must run serially
use serial_test::serial;

#[test]
#[serial]
fn test_resolve_env_cli_takes_precedence() {
    let original = std::env::var("TM_ENV").ok();
    std::env::set_var("TM_ENV", "staging");
    assert_eq!(DbConf::resolve_env(Some("production")), "production");
    match original {
        Some(v) => std::env::set_var("TM_ENV", v),
        None => std::env::remove_var("TM_ENV"),
    }
}

#[test]
#[serial]
fn test_resolve_env_uses_env_var() {
    let original = std::env::var("TM_ENV").ok();
    std::env::set_var("TM_ENV", "staging");
    assert_eq!(DbConf::resolve_env(None), "staging");
    match original {
        Some(v) => std::env::set_var("TM_ENV", v),
        None => std::env::remove_var("TM_ENV"),
    }
}

#[test]
#[serial]
fn test_resolve_env_defaults_to_development() {
    let original = std::env::var("TM_ENV").ok();
    std::env::remove_var("TM_ENV");
    assert_eq!(DbConf::resolve_env(None), "development");
    if let Some(v) = original {
        std::env::set_var("TM_ENV", v);
    }
}
