use crate::inheritance::{InheritanceInfo, InheritanceMap};
use crate::model::{TypeDescriptor, TypeGraph};
use crate::namespace::NamespaceMatcher;
use std::collections::HashSet;

/// State shared by every transformation of one generation.
///
/// Built once, after the inheritance pre-pass, and only read afterwards.
/// `inheritance` is `None` for context-free calls, in which case no type is
/// treated as a polymorphic base. `components` is `None` when every type
/// inside the scan namespaces becomes a component.
#[derive(Debug, Clone)]
pub struct GenerationContext<'g> {
    pub graph: &'g TypeGraph,
    pub namespaces: NamespaceMatcher,
    pub inheritance: Option<InheritanceMap>,
    pub components: Option<HashSet<String>>,
    pub root_types: HashSet<String>,
}

impl<'g> GenerationContext<'g> {
    pub fn new(graph: &'g TypeGraph, namespaces: NamespaceMatcher) -> Self {
        Self {
            graph,
            namespaces,
            inheritance: None,
            components: None,
            root_types: HashSet::new(),
        }
    }

    pub fn with_inheritance(mut self, inheritance: InheritanceMap) -> Self {
        self.inheritance = Some(inheritance);
        self
    }

    /// Restrict components to the given fully-qualified type names
    pub fn with_components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.components = Some(components.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_root_types<I, S>(mut self, root_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.root_types.extend(root_types.into_iter().map(Into::into));
        self
    }

    /// Whether a named type lives inside the scan namespaces
    pub fn is_scanned(&self, name: &str) -> bool {
        self.namespaces.contains_type(name)
    }

    /// Whether a named type is emitted as a component.
    ///
    /// Excluded and filtered types are in the scan namespaces but not
    /// components, so references to them must not be emitted.
    pub fn is_component(&self, name: &str) -> bool {
        self.is_scanned(name)
            && self
                .components
                .as_ref()
                .map_or(true, |components| components.contains(name))
    }

    pub fn is_root_type(&self, name: &str) -> bool {
        self.root_types.contains(name)
    }

    /// Discriminator metadata, if `name` is a polymorphic base
    pub fn polymorphic_base(&self, name: &str) -> Option<&InheritanceInfo> {
        self.inheritance.as_ref().and_then(|map| map.get(name))
    }

    pub fn lookup(&self, name: &str) -> Option<&'g TypeDescriptor> {
        self.graph.get(name)
    }
}
