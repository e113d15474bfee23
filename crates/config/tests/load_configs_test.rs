//! Tests for dotenv discovery and the registry-wide `load_configs` pass.
//!
//! Invariants:
//! - Tests mutate the process environment through dotenv loading, so every
//!   loaded variable uses a `_APPENV_`-prefixed unique name and the tests
//!   run serially.

use appenv_config::{
    AppConfig, ConfigError, Entry, Environment, ProcessEnvSource, Registry, SourceStack,
};
use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn process_env_sources() -> SourceStack {
    SourceStack::new().with(ProcessEnvSource::new())
}

#[test]
#[serial]
fn load_configs_feeds_the_process_environment() {
    temp_env::with_var("APPENV_ENV", None::<&str>, || {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join(".env.development");
        fs::write(&file, "_APPENV_LOADED_GREETING=hola\n").unwrap();

        let registry = Registry::new();
        let config = AppConfig::builder("LoadHost")
            .entry(Entry::new("_appenv_loaded_greeting"))
            .sources(process_env_sources())
            .environment(Environment::Development)
            .build_in(&registry)
            .unwrap();

        registry
            .load_configs(&[file], true, Some(Environment::Development))
            .unwrap();

        assert_eq!(config.get("_appenv_loaded_greeting").unwrap(), "hola");
    });
}

#[test]
#[serial]
fn load_configs_expands_directories() {
    temp_env::with_var("APPENV_ENV", None::<&str>, || {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("config");
        fs::create_dir(&nested).unwrap();
        fs::write(
            nested.join(".env.development"),
            "_APPENV_NESTED_VALUE=found\n",
        )
        .unwrap();

        let registry = Registry::new();
        let config = AppConfig::builder("LoadHost")
            .entry(Entry::new("_appenv_nested_value"))
            .sources(process_env_sources())
            .environment(Environment::Development)
            .build_in(&registry)
            .unwrap();

        registry
            .load_configs(
                &[temp_dir.path().to_path_buf()],
                false,
                Some(Environment::Development),
            )
            .unwrap();

        assert_eq!(config.get("_appenv_nested_value").unwrap(), "found");
    });
}

#[test]
#[serial]
fn raise_on_missing_lists_every_unresolvable_entry() {
    temp_env::with_var("APPENV_ENV", None::<&str>, || {
        let registry = Registry::new();
        AppConfig::builder("LoadHost")
            .entry(Entry::new("_appenv_absent_one"))
            .entry(Entry::new("_appenv_absent_two"))
            .sources(process_env_sources())
            .environment(Environment::Development)
            .build_in(&registry)
            .unwrap();

        let err = registry
            .load_configs(&[], true, Some(Environment::Development))
            .unwrap_err();

        match err {
            ConfigError::RequiredVarMissing(ids) => assert_eq!(
                ids,
                "LoadHost._appenv_absent_one, LoadHost._appenv_absent_two"
            ),
            other => panic!("expected RequiredVarMissing, got {other}"),
        }
    });
}

#[test]
#[serial]
fn load_configs_swallows_per_entry_errors_without_raise() {
    temp_env::with_var("APPENV_ENV", None::<&str>, || {
        let registry = Registry::new();
        let config = AppConfig::builder("LoadHost")
            .entry(Entry::new("_appenv_absent_three"))
            .sources(process_env_sources())
            .environment(Environment::Development)
            .build_in(&registry)
            .unwrap();

        registry
            .load_configs(&[], false, Some(Environment::Development))
            .unwrap();
        assert!(config.get("_appenv_absent_three").is_err());
    });
}

#[test]
fn unknown_extensions_fail_discovery() {
    let temp_dir = TempDir::new().unwrap();
    let odd = temp_dir.path().join("random_extension.rvm");
    fs::write(&odd, "nope\n").unwrap();

    let registry = Registry::new();
    let err = registry.load_configs(&[odd], false, None).unwrap_err();
    assert!(matches!(err, ConfigError::SourceFileUnsupported { .. }));
}

#[test]
fn missing_paths_fail_discovery() {
    let registry = Registry::new();
    let err = registry
        .load_configs(&[PathBuf::from("/no/such/place/.env")], false, None)
        .unwrap_err();
    assert!(matches!(err, ConfigError::SourceFileUnsupported { .. }));
}

#[test]
#[serial]
fn malformed_dotenv_fails_loading_without_leaking_content() {
    temp_env::with_var("APPENV_ENV", None::<&str>, || {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join(".env.development");
        fs::write(
            &file,
            "_APPENV_MALFORMED_SECRET=topsecret\nNOT A DOTENV LINE\n",
        )
        .unwrap();

        let registry = Registry::new();
        let err = registry.load_configs(&[file], false, None).unwrap_err();

        assert!(matches!(err, ConfigError::DotenvParse { .. }));
        assert!(!err.to_string().contains("topsecret"));
    });
}
