//! Environment lookup seam.
//!
//! Configuration is read through [`ReadEnv`] so that tests can supply values
//! without touching the process environment.

use std::cell::RefCell;
use std::collections::HashMap;
use std::env::VarError;

/// Read a single environment variable.
///
/// Does **not** require `Send + Sync`; configuration is resolved once on the
/// main task before anything is spawned.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Result<String, VarError>;
}

/// Delegates to `std::env`.
pub struct SystemEnv;

impl ReadEnv for SystemEnv {
    #[inline]
    fn var(&self, key: &str) -> Result<String, VarError> {
        std::env::var(key)
    }
}

/// Map-backed environment for tests and embedding.
#[derive(Default)]
pub struct InMemoryEnv {
    vars: RefCell<HashMap<String, String>>,
}

impl InMemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.borrow_mut().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) {
        self.vars.borrow_mut().remove(key);
    }
}

impl ReadEnv for InMemoryEnv {
    fn var(&self, key: &str) -> Result<String, VarError> {
        self.vars
            .borrow()
            .get(key)
            .cloned()
            .ok_or(VarError::NotPresent)
    }
}
