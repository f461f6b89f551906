/*!
Schema nodes produced by the compiler.

`SchemaNode` is format independent: it is turned into an OpenAPI schema by
`specification`, and a downstream consumer can walk it directly. Reference
targets are component names, not `$ref` strings.
*/

use crate::model::Access;
use indexmap::{IndexMap, IndexSet};

/// A schema with its cross-cutting attributes
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: NodeKind,
    pub description: Option<String>,
    pub deprecated: bool,
    pub access: Option<Access>,
}

/// Shape of a schema node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Primitive(PrimitiveNode),
    String(StringNode),
    Number(NumberNode),
    Boolean,
    Array(ArrayNode),
    Enum(EnumNode),
    Reference(ReferenceNode),
    Composed(ComposedNode),
    Object(ObjectNode),
}

/// JSON data type of a bare primitive node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Object,
    String,
    Integer,
    Number,
    Boolean,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveNode {
    pub data_type: DataType,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringNode {
    pub format: Option<String>,
    pub pattern: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
}

/// `integer` or `number`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericType {
    Integer,
    Number,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberNode {
    pub numeric_type: NumericType,
    pub format: Option<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    pub items: Box<SchemaNode>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumNode {
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceNode {
    /// Component name
    pub target: String,
}

/// `allOf` / `oneOf` composition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposedNode {
    pub all_of: Vec<SchemaNode>,
    pub one_of: Vec<SchemaNode>,
    pub discriminator: Option<Discriminator>,
    /// Tag of the concrete subclass this composition describes
    pub discriminator_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectNode {
    pub properties: IndexMap<String, SchemaNode>,
    pub required: IndexSet<String>,
    pub discriminator: Option<Discriminator>,
    pub additional_properties: Option<Box<SchemaNode>>,
}

/// Discriminator block: property name and tag -> component name
#[derive(Debug, Clone, PartialEq)]
pub struct Discriminator {
    pub property_name: String,
    pub mapping: IndexMap<String, String>,
}

impl SchemaNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            description: None,
            deprecated: false,
            access: None,
        }
    }

    pub fn string() -> Self {
        Self::new(NodeKind::String(StringNode::default()))
    }

    pub fn formatted_string(format: &str) -> Self {
        Self::new(NodeKind::String(StringNode {
            format: Some(format.to_string()),
            ..Default::default()
        }))
    }

    /// `string` / `binary`
    pub fn binary() -> Self {
        Self::formatted_string("binary")
    }

    pub fn integer(format: &str) -> Self {
        Self::number_of(NumericType::Integer, format)
    }

    pub fn number(format: &str) -> Self {
        Self::number_of(NumericType::Number, format)
    }

    fn number_of(numeric_type: NumericType, format: &str) -> Self {
        Self::new(NodeKind::Number(NumberNode {
            numeric_type,
            format: Some(format.to_string()),
            minimum: None,
            maximum: None,
        }))
    }

    pub fn boolean() -> Self {
        Self::new(NodeKind::Boolean)
    }

    /// Untyped object, used for types the compiler does not describe
    pub fn generic_object() -> Self {
        Self::new(NodeKind::Primitive(PrimitiveNode {
            data_type: DataType::Object,
            format: None,
        }))
    }

    pub fn array(items: SchemaNode) -> Self {
        Self::new(NodeKind::Array(ArrayNode {
            items: Box::new(items),
            min_items: None,
            max_items: None,
        }))
    }

    pub fn enumeration(values: Vec<String>) -> Self {
        Self::new(NodeKind::Enum(EnumNode { values }))
    }

    pub fn reference(target: &str) -> Self {
        Self::new(NodeKind::Reference(ReferenceNode {
            target: target.to_string(),
        }))
    }

    pub fn object(object: ObjectNode) -> Self {
        Self::new(NodeKind::Object(object))
    }

    pub fn composed(composed: ComposedNode) -> Self {
        Self::new(NodeKind::Composed(composed))
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn as_object(&self) -> Option<&ObjectNode> {
        match &self.kind {
            NodeKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectNode> {
        match &mut self.kind {
            NodeKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_composed(&self) -> Option<&ComposedNode> {
        match &self.kind {
            NodeKind::Composed(composed) => Some(composed),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayNode> {
        match &self.kind {
            NodeKind::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Target of a reference node
    pub fn reference_target(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Reference(reference) => Some(&reference.target),
            _ => None,
        }
    }

    /// Every reference target reachable from this node, in traversal order
    pub fn references(&self) -> Vec<&str> {
        let mut targets = Vec::new();
        self.collect_references(&mut targets);
        targets
    }

    fn collect_references<'a>(&'a self, targets: &mut Vec<&'a str>) {
        match &self.kind {
            NodeKind::Reference(reference) => targets.push(&reference.target),
            NodeKind::Array(array) => array.items.collect_references(targets),
            NodeKind::Composed(composed) => {
                for node in composed.all_of.iter().chain(composed.one_of.iter()) {
                    node.collect_references(targets);
                }
                if let Some(discriminator) = &composed.discriminator {
                    targets.extend(discriminator.mapping.values().map(String::as_str));
                }
            }
            NodeKind::Object(object) => {
                for property in object.properties.values() {
                    property.collect_references(targets);
                }
                if let Some(additional) = &object.additional_properties {
                    additional.collect_references(targets);
                }
                if let Some(discriminator) = &object.discriminator {
                    targets.extend(discriminator.mapping.values().map(String::as_str));
                }
            }
            NodeKind::Primitive(_)
            | NodeKind::String(_)
            | NodeKind::Number(_)
            | NodeKind::Boolean
            | NodeKind::Enum(_) => {}
        }
    }
}

impl ObjectNode {
    /// Add a property; `required` names are kept unique
    pub fn insert_property(&mut self, name: &str, schema: SchemaNode, required: bool) {
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.insert(name.to_string());
        }
    }
}

impl Discriminator {
    pub fn new(property_name: &str) -> Self {
        Self {
            property_name: property_name.to_string(),
            mapping: IndexMap::new(),
        }
    }
}
