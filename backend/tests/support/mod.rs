//! Shared helpers for integration tests.

use std::sync::Mutex;

/// Serializes tests that touch process-wide environment variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with the given variables set (`Some`) or removed (`None`), then
/// restore their previous values, even if `f` panics.
///
/// A panic in an earlier test leaves the lock poisoned; the guard is
/// recovered so later tests still run.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _restore = EnvRestore::apply(changes);
    f()
}

/// Previous values of the variables a test changed.
struct EnvRestore(Vec<(String, Option<String>)>);

impl EnvRestore {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let mut previous: Vec<(String, Option<String>)> = Vec::with_capacity(changes.len());
        for (key, value) in changes {
            if !previous.iter().any(|(k, _)| k == key) {
                previous.push((key.to_string(), std::env::var(key).ok()));
            }
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
        Self(previous)
    }
}

impl Drop for EnvRestore {
    fn drop(&mut self) {
        for (key, value) in self.0.drain(..) {
            match value {
                Some(value) => std::env::set_var(&key, value),
                None => std::env::remove_var(&key),
            }
        }
    }
}

#[test]
fn scoped_env_survives_a_panicking_test() {
    let outcome = std::panic::catch_unwind(|| {
        with_scoped_env(&[("SHOPPING_API_SCOPED_ENV", Some("set"))], || {
            panic!("assertion failed inside scoped env");
        })
    });
    assert!(outcome.is_err());

    with_scoped_env(&[], || {
        assert!(std::env::var("SHOPPING_API_SCOPED_ENV").is_err());
    });
}
