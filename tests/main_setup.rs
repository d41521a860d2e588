use marketplace_portal::{AppConfig, config::Env};
use serial_test::serial;
use std::{env, panic};

// --- Setup/Teardown Utilities ---

const CONFIG_VARS: [&str; 6] = [
    "APP_ENV",
    "SESSION_JWT_SECRET",
    "FIREBASE_PROJECT_ID",
    "FIREBASE_API_KEY",
    "DOCUMENT_STORE_URL",
    "BIND_ADDR",
];

/// Utility to run a test function and restore environment variables afterward
fn run_with_env<T, R>(test: T, cleanup_vars: &[&'static str]) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    // Save current environment variables
    let originals: Vec<(String, Option<String>)> = cleanup_vars
        .iter()
        .map(|&var| (var.to_string(), env::var(var).ok()))
        .collect();

    // Run the test
    let result = panic::catch_unwind(test);

    // Restore original environment variables
    for (key, original_value) in originals.into_iter().rev() {
        unsafe {
            if let Some(val) = original_value {
                env::set_var(&key, val);
            } else {
                env::remove_var(&key);
            }
        }
    }

    // Re-panic if the test failed
    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

fn clear_config_vars() {
    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_production_requires_jwt_secret() {
    let result = run_with_env(
        || {
            panic::catch_unwind(|| {
                clear_config_vars();
                unsafe {
                    env::set_var("APP_ENV", "production");
                }
                AppConfig::load()
            })
        },
        &CONFIG_VARS,
    );

    assert!(
        result.is_err(),
        "Production config loading should panic without SESSION_JWT_SECRET"
    );
}

#[test]
#[serial]
fn test_app_config_missing_store_credentials_is_not_fatal() {
    let config = run_with_env(
        || {
            clear_config_vars();
            unsafe {
                env::set_var("APP_ENV", "production");
                env::set_var("SESSION_JWT_SECRET", "prod-secret");
            }
            AppConfig::load()
        },
        &CONFIG_VARS,
    );

    assert_eq!(config.env, Env::Production);
    assert_eq!(
        config.missing_store_settings(),
        vec!["FIREBASE_PROJECT_ID", "FIREBASE_API_KEY"]
    );
}

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    let config = run_with_env(
        || {
            clear_config_vars();
            unsafe {
                env::set_var("FIREBASE_PROJECT_ID", "market-demo");
                env::set_var("FIREBASE_API_KEY", "key-123");
            }
            AppConfig::load()
        },
        &CONFIG_VARS,
    );

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.store_url, "https://firestore.googleapis.com");
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
    assert_eq!(config.project_id, "market-demo");
    assert!(config.missing_store_settings().is_empty());
    assert!(!config.jwt_secret.is_empty());
}
