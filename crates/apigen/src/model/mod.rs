/*!
Type descriptor model: a read-only view over the host program's type system.

The host exports its classes, fields, handler methods and their metadata
directives as a `TypeGraph` (built in code, or loaded from YAML/JSON). The
compiler never mutates the graph.
*/

pub mod directive;
pub mod type_ref;

pub use directive::{
    Access, Annotated, Binding, BindingLocation, Description, Directive, HeaderDecl,
    ResponseDecl, Route, SubtypeDecl,
};
pub use type_ref::{PrimitiveKind, TemporalKind, TypeRef};

use crate::error::{ApiGenError, ApiGenResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of a named type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Enum,
}

/// A named type of the host program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Fully-qualified name (`com.example.model.Car`)
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    /// Enum constant names, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
    /// Handler methods; empty for plain data types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodDescriptor>,
}

/// A declared field of a type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    /// Class-level fields never become properties
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
}

/// An endpoint candidate on a handler type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDescriptor>,
    #[serde(default = "void_type")]
    pub returns: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
}

/// A declared parameter of a handler method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
}

fn void_type() -> TypeRef {
    TypeRef::Void
}

/// Namespace part of a fully-qualified name
pub fn namespace_of(name: &str) -> &str {
    name.rsplit_once('.').map(|(ns, _)| ns).unwrap_or("")
}

/// Last segment of a fully-qualified name
pub fn simple_name_of(name: &str) -> &str {
    name.rsplit_once('.').map(|(_, simple)| simple).unwrap_or(name)
}

impl TypeDescriptor {
    /// Create a class descriptor
    pub fn class(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: TypeKind::Class,
            constants: Vec::new(),
            fields: Vec::new(),
            superclass: None,
            directives: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Create an enum descriptor
    pub fn enumeration(name: &str, constants: &[&str]) -> Self {
        Self {
            kind: TypeKind::Enum,
            constants: constants.iter().map(|c| c.to_string()).collect(),
            ..Self::class(name)
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_superclass(mut self, superclass: &str) -> Self {
        self.superclass = Some(superclass.to_string());
        self
    }

    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn namespace(&self) -> &str {
        namespace_of(&self.name)
    }

    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.name)
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    /// Whether the type or any of its methods declares a route
    pub fn declares_routes(&self) -> bool {
        self.route().is_some() || self.methods.iter().any(|m| m.route().is_some())
    }
}

impl FieldDescriptor {
    pub fn new(name: &str, type_ref: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            type_ref,
            is_static: false,
            directives: Vec::new(),
        }
    }

    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

impl MethodDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parameters: Vec::new(),
            returns: TypeRef::Void,
            directives: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_return_type(mut self, returns: TypeRef) -> Self {
        self.returns = returns;
        self
    }

    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }
}

impl ParameterDescriptor {
    pub fn new(name: &str, type_ref: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            type_ref,
            directives: Vec::new(),
        }
    }

    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Shorthand for a parameter carrying one binding directive
    pub fn bound(name: &str, type_ref: TypeRef, binding: Binding) -> Self {
        Self::new(name, type_ref).with_directive(Directive::Binding(binding))
    }
}

impl Annotated for TypeDescriptor {
    fn directives(&self) -> &[Directive] {
        &self.directives
    }
}

impl Annotated for FieldDescriptor {
    fn directives(&self) -> &[Directive] {
        &self.directives
    }
}

impl Annotated for MethodDescriptor {
    fn directives(&self) -> &[Directive] {
        &self.directives
    }
}

impl Annotated for ParameterDescriptor {
    fn directives(&self) -> &[Directive] {
        &self.directives
    }
}

/// On-disk shape of a type graph
#[derive(Debug, Deserialize)]
struct GraphFile {
    #[serde(default)]
    types: Vec<TypeDescriptor>,
}

/// All types exported by the host program, indexed by name
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    types: Vec<TypeDescriptor>,
    index: HashMap<String, usize>,
}

impl TypeGraph {
    /// Build a graph; type names must be unique
    pub fn new(types: Vec<TypeDescriptor>) -> ApiGenResult<Self> {
        let mut index = HashMap::with_capacity(types.len());
        for (position, descriptor) in types.iter().enumerate() {
            if index.insert(descriptor.name.clone(), position).is_some() {
                return Err(ApiGenError::configuration_error(format!(
                    "type '{}' is declared more than once in the type graph",
                    descriptor.name
                )));
            }
        }
        Ok(Self { types, index })
    }

    pub fn from_yaml_str(content: &str) -> ApiGenResult<Self> {
        let file: GraphFile = serde_yaml::from_str(content)?;
        Self::new(file.types)
    }

    pub fn from_json_str(content: &str) -> ApiGenResult<Self> {
        let file: GraphFile = serde_json::from_str(content)?;
        Self::new(file.types)
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.index.get(name).map(|&position| &self.types[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Types in declaration order
    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
