//! Environment variable access behind a trait.
//!
//! Credential lookups, backend overrides and config overrides all go through
//! [`Environment`], so callers can hand the router a synthetic variable set
//! instead of mutating the real process environment.

use std::collections::HashMap;

/// Read-only access to environment-style key/value configuration.
pub trait Environment: Send + Sync {
    /// Get the value of a variable, or `None` if it is not set.
    fn get_var(&self, name: &str) -> Option<String>;

    /// Get the value of a variable, treating an empty (or whitespace-only)
    /// value the same as an unset one.
    fn get_non_empty(&self, name: &str) -> Option<String> {
        self.get_var(name).filter(|v| !v.trim().is_empty())
    }

    /// Return the first non-empty value among `names`, in order.
    fn first_non_empty(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|name| self.get_non_empty(name))
    }
}

/// Environment backed by the real process environment ([`std::env`]).
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn get_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory environment, mostly for tests and embedding.
#[derive(Clone, Debug, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an environment pre-populated with the given variables.
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Builder-style insert.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl Environment for MapEnvironment {
    fn get_var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}
