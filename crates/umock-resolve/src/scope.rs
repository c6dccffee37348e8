//! Scope paths and enclosing-scope chains.
//!
//! A scope path is the list of nominal declarations enclosing a point in the
//! tree, outermost first. Its string key joins the components with `.`; the
//! global scope is the empty key. Alias lookup walks the chain from the
//! innermost scope outward, ending at the global scope.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Key of the global (file) scope.
pub const GLOBAL_SCOPE_KEY: &str = "";

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopePath {
    components: SmallVec<[String; 4]>,
}

impl ScopePath {
    /// The global scope.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_key(key: &str) -> Self {
        if key.is_empty() {
            return Self::root();
        }
        Self {
            components: key.split('.').map(str::to_string).collect(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    pub fn push(&mut self, component: impl Into<String>) {
        self.components.push(component.into());
    }

    pub fn pop(&mut self) {
        self.components.pop();
    }

    /// This path extended by one more component.
    pub fn child(&self, component: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.push(component);
        path
    }

    pub fn key(&self) -> String {
        self.components.join(".")
    }

    /// Scope keys from this scope outward to the global scope, inclusive.
    ///
    /// `A.B.C` yields `A.B.C`, `A.B`, `A`, `` in that order; the global
    /// scope yields only ``.
    pub fn chain(&self) -> impl Iterator<Item = String> + '_ {
        (0..=self.components.len())
            .rev()
            .map(|len| self.components[..len].join("."))
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
