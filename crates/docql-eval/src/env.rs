//! Binding environments.
//!
//! A stack of scopes mapping names to values. Lookup is lexical (innermost
//! scope outward); a `@`-prefixed reference forces the scope-local binding
//! even when an outer scope has the same name.

use docql_value::Value;
use rustc_hash::FxHashMap;

/// Names visible to a query, as provided by the embedder.
pub type Bindings = FxHashMap<String, Value>;

pub struct Environment {
    /// Index 0 is the root (global) scope.
    scopes: Vec<FxHashMap<String, Value>>,
}

impl Environment {
    /// Create an environment with the given root bindings.
    pub fn new(root: Bindings) -> Self {
        Self { scopes: vec![root] }
    }

    /// Push a scope containing the given bindings.
    pub fn push_scope(&mut self, bindings: impl IntoIterator<Item = (String, Value)>) {
        self.scopes.push(bindings.into_iter().collect());
    }

    /// Pop the top scope.
    ///
    /// # Panics
    ///
    /// Panics if only the root scope remains.
    pub fn pop_scope(&mut self) {
        assert!(self.scopes.len() > 1, "cannot pop the root scope");
        self.scopes.pop();
    }

    /// Look up a name, searching from the innermost scope outward.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Look up a name in the innermost scope only (`@name` resolution).
    pub fn lookup_local(&self, name: &str) -> Option<&Value> {
        self.scopes
            .last()
            .expect("scope stack is never empty")
            .get(name)
    }
}
