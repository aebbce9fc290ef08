use std::env;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use lockgate_sim::config::{Config, DEFAULT_LATENCY_MS};
use lockgate_sim::script::AuthMode;

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().expect("lock")
}

fn clear_env() {
    for key in [
        "LOCKGATE_LOCK",
        "LOCKGATE_AUTH",
        "LOCKGATE_AUTH_LATENCY_MS",
        "LOCKGATE_DISSOLVE_MS",
    ] {
        env::remove_var(key);
    }
}

#[test]
fn defaults_lock_with_successful_auth() {
    let _guard = env_lock();
    clear_env();

    let config = Config::from_args_iter(["bin"]);
    assert!(config.lock_enabled);
    assert_eq!(config.auth, AuthMode::Success);
    assert_eq!(config.latency, Duration::from_millis(DEFAULT_LATENCY_MS));
    assert!(config.script.is_none());
}

#[test]
fn no_lock_flag_disables_lock() {
    let _guard = env_lock();
    clear_env();

    let config = Config::from_args_iter(["bin", "--no-lock"]);
    assert!(!config.lock_enabled);
}

#[test]
fn lock_env_override_disables_lock() {
    let _guard = env_lock();
    clear_env();
    env::set_var("LOCKGATE_LOCK", "0");

    let config = Config::from_args_iter(["bin"]);
    assert!(!config.lock_enabled);

    env::remove_var("LOCKGATE_LOCK");
}

#[test]
fn flags_override_env() {
    let _guard = env_lock();
    clear_env();
    env::set_var("LOCKGATE_AUTH", "deny");
    env::set_var("LOCKGATE_AUTH_LATENCY_MS", "40");

    let config = Config::from_args_iter([
        "bin",
        "--auth=hang",
        "--latency-ms",
        "5",
        "--script",
        "races.txt",
        "--gate-name=vault",
    ]);
    assert_eq!(config.auth, AuthMode::Hang);
    assert_eq!(config.latency, Duration::from_millis(5));
    assert_eq!(config.script, Some(PathBuf::from("races.txt")));
    assert_eq!(config.gate_name, "vault");

    clear_env();
}

#[test]
fn invalid_values_fall_back() {
    let _guard = env_lock();
    clear_env();
    env::set_var("LOCKGATE_AUTH", "maybe");

    let config = Config::from_args_iter(["bin", "--latency-ms", "soon"]);
    assert_eq!(config.auth, AuthMode::Success);
    assert_eq!(config.latency, Duration::from_millis(DEFAULT_LATENCY_MS));

    clear_env();
}

#[test]
fn timing_flags_accept_equals_form() {
    let _guard = env_lock();
    clear_env();

    let config = Config::from_args_iter(["bin", "--latency-ms=7", "--dissolve-ms=90"]);
    assert_eq!(config.latency, Duration::from_millis(7));
    assert_eq!(config.dissolve, Duration::from_millis(90));
}
