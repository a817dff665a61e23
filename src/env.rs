//! Environment variable abstraction for testability.
//!
//! Environment lookups happen exactly once, at process start, to build
//! [`crate::app::AppOptions`]. Production code uses [`Env::real()`] which
//! delegates to [`std::env::var`]; tests use [`Env::mock()`] backed by a
//! `HashMap`, eliminating the need for `unsafe` calls to
//! [`std::env::set_var`] / [`std::env::remove_var`].

use std::collections::HashMap;

/// Environment variable reader.
#[derive(Clone, Debug, Default)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Create an `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed by explicit key-value pairs.
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up an environment variable by name.
    pub fn var(&self, name: &str) -> Result<String, std::env::VarError> {
        match &self.overrides {
            Some(map) => map.get(name).cloned().ok_or(std::env::VarError::NotPresent),
            None => std::env::var(name),
        }
    }

    /// Returns the variable's value, or `None` when unset or empty.
    pub fn get_nonempty(&self, name: &str) -> Option<String> {
        self.var(name).ok().filter(|v| !v.is_empty())
    }
}
