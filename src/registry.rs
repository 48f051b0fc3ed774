//! Per-builder side table of field options (alias, arguments).
//!
//! Options attach to a node *instance*, never to a field name, and the
//! schema itself is never touched. Entries hold weak references only: a
//! registration does not keep its node alive, and entries for dropped
//! nodes are swept on the next registration.
use std::collections::HashMap;
use std::sync::Weak;

use crate::shape::{unwrap_chain, Node, Shape};
use crate::values::Parameters;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOptions {
    /// Selected as `field: alias_for`.
    pub alias_for: Option<String>,
    pub parameters: Option<Parameters>,
}

impl FieldOptions {
    pub fn alias(alias_for: impl Into<String>) -> Self {
        Self { alias_for: Some(alias_for.into()), parameters: None }
    }
    pub fn parameters(parameters: Parameters) -> Self {
        Self { alias_for: None, parameters: Some(parameters) }
    }
    pub fn with_alias(mut self, alias_for: impl Into<String>) -> Self {
        self.alias_for = Some(alias_for.into());
        self
    }
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<crate::values::GraphqlValue>) -> Self {
        self.parameters.get_or_insert_with(Parameters::new).insert(name.into(), value.into());
        self
    }
    pub fn is_empty(&self) -> bool {
        self.alias_for.is_none() && self.parameters.is_none()
    }
}

struct Entry {
    // Keeps the allocation (not the node) alive, so the address key stays unique.
    node: Weak<Shape>,
    options: FieldOptions,
}

#[derive(Default)]
pub struct FieldOptionRegistry {
    entries: HashMap<usize, Entry>,
}

impl FieldOptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever was registered for `node`; returns the node for chaining.
    pub fn register(&mut self, node: Node, options: FieldOptions) -> Node {
        self.sweep();
        self.entries.insert(node.address(), Entry { node: node.downgrade(), options });
        node
    }

    /// Options registered on exactly this node.
    pub fn get(&self, node: &Node) -> Option<&FieldOptions> {
        self.entries
            .get(&node.address())
            .filter(|entry| entry.node.strong_count() > 0)
            .map(|entry| &entry.options)
    }

    /// Options for a field schema: the first non-empty registration found
    /// walking from the outermost wrapper to the unwrapped node. No merging.
    pub fn lookup(&self, node: &Node) -> FieldOptions {
        if self.entries.is_empty() {
            return FieldOptions::default();
        }
        unwrap_chain(node)
            .outermost_first()
            .filter_map(|candidate| self.get(candidate))
            .find(|options| !options.is_empty())
            .cloned()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.values().filter(|entry| entry.node.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sweep(&mut self) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.node.strong_count() > 0);
        let swept = before - self.entries.len();
        if swept > 0 {
            tracing::trace!(swept, "dropped field options of released nodes");
        }
    }
}

impl std::fmt::Debug for FieldOptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldOptionRegistry").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{lazy, object, string};

    fn params(name: &str, value: &str) -> FieldOptions {
        FieldOptions::default().with_parameter(name, value)
    }

    #[test]
    fn lookup_of_unregistered_node_is_empty() {
        let registry = FieldOptionRegistry::new();
        assert_eq!(registry.lookup(&string()), FieldOptions::default());
    }

    #[test]
    fn registration_is_per_instance() {
        let mut registry = FieldOptionRegistry::new();
        let a = registry.register(string(), FieldOptions::alias("x"));
        let b = string();
        assert_eq!(registry.lookup(&a).alias_for.as_deref(), Some("x"));
        assert_eq!(registry.lookup(&a.clone()).alias_for.as_deref(), Some("x"));
        assert!(registry.lookup(&b).is_empty());
    }

    #[test]
    fn re_registration_replaces() {
        let mut registry = FieldOptionRegistry::new();
        let node = registry.register(string(), params("a", "1").with_alias("x"));
        let node = registry.register(node, params("b", "2"));
        let options = registry.lookup(&node);
        assert_eq!(options, params("b", "2"));
    }

    #[test]
    fn outer_registration_shadows_inner() {
        let mut registry = FieldOptionRegistry::new();
        let inner = registry.register(string(), params("bar", "inner").with_parameter("baz", "inner-only"));
        let outer = registry.register(inner.nullable(), params("bar", "outer"));
        assert_eq!(registry.lookup(&outer), params("bar", "outer"));
    }

    #[test]
    fn inner_registration_is_found_through_wrappers() {
        let mut registry = FieldOptionRegistry::new();
        let inner = registry.register(object([("a", string())]), FieldOptions::alias("y"));
        let wrapped = {
            let inner = inner.clone();
            lazy(move || inner.clone()).nullable()
        };
        assert_eq!(registry.lookup(&wrapped).alias_for.as_deref(), Some("y"));
    }

    #[test]
    fn empty_outer_registration_does_not_shadow() {
        let mut registry = FieldOptionRegistry::new();
        let inner = registry.register(string(), FieldOptions::alias("y"));
        let outer = registry.register(inner.nullable(), FieldOptions::default());
        assert_eq!(registry.lookup(&outer).alias_for.as_deref(), Some("y"));
    }

    #[test]
    fn registrations_do_not_keep_nodes_alive() {
        let mut registry = FieldOptionRegistry::new();
        let node = registry.register(string(), FieldOptions::alias("x"));
        let weak = node.downgrade();
        assert_eq!(registry.len(), 1);
        drop(node);
        assert_eq!(weak.strong_count(), 0);
        assert!(registry.is_empty());

        registry.register(string(), FieldOptions::alias("y"));
        assert_eq!(registry.entries.len(), 1);
    }

    #[test]
    fn registries_are_independent() {
        let mut first = FieldOptionRegistry::new();
        let second = FieldOptionRegistry::new();
        let node = first.register(string(), FieldOptions::alias("x"));
        assert!(second.lookup(&node).is_empty());
    }
}
