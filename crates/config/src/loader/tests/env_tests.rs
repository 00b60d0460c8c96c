//! Environment variable tests for the configuration loader.

use std::time::Duration;

use secrecy::ExposeSecret;
use serial_test::serial;

use super::env_lock;
use crate::loader::builder::ConfigLoader;
use crate::loader::error::ConfigError;
use crate::types::AuthStrategy;

#[test]
#[serial]
fn test_env_supplies_full_config() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars(
        [
            ("TOWER_BASE_URL", Some("https://tower.example.com/")),
            ("TOWER_API_TOKEN", Some("env-token")),
            ("TOWER_TIMEOUT", Some("45")),
            ("TOWER_MAX_RETRIES", Some("5")),
            ("TOWER_SKIP_VERIFY", Some("true")),
            ("TOWER_CACHE_ENABLED", Some("false")),
            ("TOWER_CACHE_TTL_SECONDS", Some("90")),
            ("TOWER_PREVIEW_DEBOUNCE_MS", Some("250")),
            ("TOWER_MAX_DEPTH", Some("12")),
        ],
        || {
            let config = ConfigLoader::new().from_env().unwrap().build().unwrap();

            assert_eq!(config.connection.base_url, "https://tower.example.com");
            assert_eq!(config.connection.timeout, Duration::from_secs(45));
            assert_eq!(config.connection.max_retries, 5);
            assert!(config.connection.skip_verify);
            assert!(!config.cache.enabled);
            assert_eq!(config.cache.ttl, Duration::from_secs(90));
            assert_eq!(config.mapping.preview_debounce, Duration::from_millis(250));
            assert_eq!(config.mapping.max_depth, 12);
            match config.auth.strategy {
                AuthStrategy::ApiToken { token } => assert_eq!(token.expose_secret(), "env-token"),
                other => panic!("Expected API token auth, got {other:?}"),
            }
        },
    );
}

#[test]
#[serial]
fn test_builder_overrides_env() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars(
        [
            ("TOWER_BASE_URL", Some("https://env.example.com")),
            ("TOWER_API_TOKEN", Some("env-token")),
        ],
        || {
            let config = ConfigLoader::new()
                .from_env()
                .unwrap()
                .with_base_url("https://cli.example.com".to_string())
                .build()
                .unwrap();
            assert_eq!(config.connection.base_url, "https://cli.example.com");
        },
    );
}

#[test]
#[serial]
fn test_empty_env_vars_ignored() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars(
        [
            ("TOWER_API_TOKEN", Some("")),
            ("TOWER_USERNAME", Some("  ")),
            ("TOWER_PASSWORD", Some("")),
        ],
        || {
            let config = ConfigLoader::new()
                .with_base_url("https://localhost:8443".to_string())
                .with_username("ops".to_string())
                .with_password("pw".to_string())
                .from_env()
                .unwrap()
                .build()
                .unwrap();
            assert!(matches!(
                config.auth.strategy,
                AuthStrategy::SessionToken { .. }
            ));
        },
    );
}

#[test]
#[serial]
fn test_invalid_numeric_env_names_variable() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars([("TOWER_PREVIEW_DEBOUNCE_MS", Some("soon"))], || {
        let Err(err) = ConfigLoader::new().from_env() else {
            panic!("Expected invalid value error");
        };
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref var, .. } if var == "TOWER_PREVIEW_DEBOUNCE_MS"
        ));
    });
}

#[test]
#[serial]
fn test_api_token_takes_precedence_over_credentials() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars(
        [
            ("TOWER_BASE_URL", Some("https://tower.example.com")),
            ("TOWER_USERNAME", Some("ops")),
            ("TOWER_PASSWORD", Some("pw")),
            ("TOWER_API_TOKEN", Some("token")),
        ],
        || {
            let config = ConfigLoader::new().from_env().unwrap().build().unwrap();
            assert!(matches!(config.auth.strategy, AuthStrategy::ApiToken { .. }));
        },
    );
}
