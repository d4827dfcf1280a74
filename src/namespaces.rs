//! XML namespace handling
//!
//! BattleScribe catalogues carry a default namespace on the root element
//! (`xmlns="http://www.battlescribe.net/schema/catalogueSchema"`) and no
//! prefixed content in practice, but nothing in the dialect forbids either
//! prefixes or re-declared defaults on inner elements. This module provides
//! qualified names and a scope stack that resolves both, so element
//! namespaces are fixed once while the tree is built and the catalogue
//! parsers never touch namespace plumbing again.

use std::collections::HashMap;

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<String>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }
}

/// Namespace declarations attached to one element
#[derive(Debug, Clone, Default)]
pub struct NamespaceScope {
    /// Prefix declarations made on this element
    prefixes: HashMap<String, String>,
    /// Default namespace declared on this element, if any
    default_namespace: Option<String>,
}

impl NamespaceScope {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an `xmlns:prefix` declaration
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Record an `xmlns` declaration
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.default_namespace = Some(namespace.into());
    }

    /// True when this element declared nothing
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.default_namespace.is_none()
    }
}

/// Stack of namespace scopes, innermost last
///
/// Resolution walks from the innermost scope outward, which gives the XML
/// inheritance rules: the nearest declaration wins.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    scopes: Vec<NamespaceScope>,
}

impl ScopeStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter an element's scope
    pub fn push(&mut self, scope: NamespaceScope) {
        self.scopes.push(scope);
    }

    /// Leave the innermost scope
    pub fn pop(&mut self) {
        self.scopes.pop();
    }

    /// Namespace bound to `prefix` at the current position
    pub fn resolve_prefix(&self, prefix: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .find_map(|s| s.prefixes.get(prefix).map(|ns| ns.as_str()))
    }

    /// Default namespace at the current position
    pub fn default_namespace(&self) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .find_map(|s| s.default_namespace.as_deref())
    }

    /// Resolve a raw element name (`local` or `prefix:local`) into a QName
    /// using the declarations in scope. Unprefixed names take the default
    /// namespace; unknown prefixes resolve to no namespace rather than
    /// erroring, matching the tolerant posture of the rest of the parser.
    pub fn resolve_element_name(&self, raw: &str) -> QName {
        if let Some((prefix, local)) = raw.split_once(':') {
            match self.resolve_prefix(prefix) {
                Some(ns) => QName::namespaced(ns, local),
                None => QName::local(local),
            }
        } else {
            match self.default_namespace() {
                Some(ns) => QName::namespaced(ns, raw),
                None => QName::local(raw),
            }
        }
    }
}
