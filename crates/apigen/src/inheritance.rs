/*!
Inheritance resolution: the pre-pass that collects discriminator metadata.

Every candidate type carrying a `polymorphic` directive becomes one entry,
keyed by the base type's fully-qualified name. The map is complete before any
schema is built, so a field pointing at a base type can be turned into a
`oneOf` at transform time.
*/

use crate::error::{ApiGenError, ApiGenResult};
use crate::model::{simple_name_of, Annotated, TypeDescriptor, TypeGraph};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Discriminator property used when a declaration names none
pub const DEFAULT_DISCRIMINATOR_PROPERTY: &str = "type";

/// Discriminator metadata of one polymorphic base type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritanceInfo {
    pub discriminator_field_name: String,
    /// Subclass fully-qualified name -> discriminator value, in declaration order
    pub discriminator_class_map: IndexMap<String, String>,
}

impl InheritanceInfo {
    /// Discriminator value of a subclass
    pub fn tag_of(&self, subclass: &str) -> Option<&str> {
        self.discriminator_class_map
            .get(subclass)
            .map(String::as_str)
    }

    /// Inverse map: discriminator value -> component name of the subclass
    pub fn mapping(&self) -> IndexMap<String, String> {
        self.discriminator_class_map
            .iter()
            .map(|(subclass, tag)| (tag.clone(), simple_name_of(subclass).to_string()))
            .collect()
    }

    /// Component names of every subclass, in declaration order
    pub fn subclass_components(&self) -> impl Iterator<Item = &str> {
        self.discriminator_class_map
            .keys()
            .map(|subclass| simple_name_of(subclass))
    }
}

/// All polymorphic bases of one generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InheritanceMap {
    bases: IndexMap<String, InheritanceInfo>,
}

impl InheritanceMap {
    pub fn get(&self, base: &str) -> Option<&InheritanceInfo> {
        self.bases.get(base)
    }

    pub fn is_polymorphic_base(&self, name: &str) -> bool {
        self.bases.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InheritanceInfo)> {
        self.bases.iter().map(|(base, info)| (base.as_str(), info))
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

/// Builds the inheritance map from scanned candidate types
pub struct InheritanceResolver<'g> {
    graph: &'g TypeGraph,
}

impl<'g> InheritanceResolver<'g> {
    pub fn new(graph: &'g TypeGraph) -> Self {
        Self { graph }
    }

    /// Resolve every polymorphic declaration among the candidates
    pub fn resolve<'a, I>(&self, candidates: I) -> ApiGenResult<InheritanceMap>
    where
        I: IntoIterator<Item = &'a TypeDescriptor>,
    {
        let candidates: Vec<&TypeDescriptor> = candidates.into_iter().collect();
        let names: HashSet<&str> = candidates.iter().copied().map(|t| t.name.as_str()).collect();
        let mut map = InheritanceMap::default();

        for candidate in candidates {
            if let Some(info) = self.resolve_type(candidate, &names)? {
                tracing::debug!(
                    "Polymorphic base {} with {} subclasses on property '{}'",
                    candidate.name,
                    info.discriminator_class_map.len(),
                    info.discriminator_field_name
                );
                map.bases.insert(candidate.name.clone(), info);
            }
        }

        Ok(map)
    }

    /// Subclasses outside `candidates` are validated but left out of the map
    fn resolve_type(
        &self,
        descriptor: &TypeDescriptor,
        candidates: &HashSet<&str>,
    ) -> ApiGenResult<Option<InheritanceInfo>> {
        let Some((property, subtypes)) = descriptor.polymorphic() else {
            return Ok(None);
        };

        if subtypes.is_empty() {
            return Err(ApiGenError::configuration_error(format!(
                "polymorphic base '{}' declares no subclasses",
                descriptor.name
            )));
        }

        let discriminator_field_name = match property {
            Some(name) if name.trim().is_empty() => {
                return Err(ApiGenError::configuration_error(format!(
                    "polymorphic base '{}' declares an empty discriminator property",
                    descriptor.name
                )))
            }
            Some(name) => name.to_string(),
            None => DEFAULT_DISCRIMINATOR_PROPERTY.to_string(),
        };

        let mut discriminator_class_map = IndexMap::new();
        let mut seen_tags = HashSet::new();
        let mut seen_subclasses = HashSet::new();

        for subtype in subtypes {
            if !self.graph.contains(&subtype.type_name) {
                return Err(ApiGenError::configuration_error(format!(
                    "polymorphic base '{}' names unknown subclass '{}'",
                    descriptor.name, subtype.type_name
                )));
            }

            let tag = subtype
                .tag
                .clone()
                .filter(|tag| !tag.is_empty())
                .unwrap_or_else(|| simple_name_of(&subtype.type_name).to_string());

            if !seen_tags.insert(tag.clone()) {
                return Err(ApiGenError::configuration_error(format!(
                    "polymorphic base '{}' uses discriminator value '{}' more than once",
                    descriptor.name, tag
                )));
            }

            if !seen_subclasses.insert(subtype.type_name.as_str()) {
                return Err(ApiGenError::configuration_error(format!(
                    "polymorphic base '{}' lists subclass '{}' more than once",
                    descriptor.name, subtype.type_name
                )));
            }

            if !candidates.contains(subtype.type_name.as_str()) {
                tracing::info!(
                    "Leaving subclass {} out of the discriminator of {}: it is not a component",
                    subtype.type_name,
                    descriptor.name
                );
                continue;
            }
            discriminator_class_map.insert(subtype.type_name.clone(), tag);
        }

        if discriminator_class_map.is_empty() {
            return Err(ApiGenError::configuration_error(format!(
                "polymorphic base '{}' has no subclass left after exclusion",
                descriptor.name
            )));
        }

        Ok(Some(InheritanceInfo {
            discriminator_field_name,
            discriminator_class_map,
        }))
    }
}
