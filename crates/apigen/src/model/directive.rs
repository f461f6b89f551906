/*!
Metadata directives attached to types, fields, handler methods and parameters.

Directives are declarative: the compiler reads them, never writes them. In a
YAML type graph each directive is a map tagged by `kind`:

```yaml
directives:
  - kind: polymorphic
    property: type
    subtypes:
      - { type: com.example.model.Car, tag: car }
  - kind: size
    min: 1
    max: 64
```
*/

use crate::document::HttpMethod;
use crate::model::TypeRef;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single metadata directive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Directive {
    /// Marks a polymorphic base type and lists its subclasses
    Polymorphic {
        #[serde(default)]
        property: Option<String>,
        #[serde(default)]
        subtypes: Vec<SubtypeDecl>,
    },
    /// Leave the element out of the document entirely
    Exclude,
    /// Skip a field when building an object schema
    Ignore,
    NotNull,
    Min {
        value: f64,
    },
    Max {
        value: f64,
    },
    Size {
        #[serde(default)]
        min: Option<u64>,
        #[serde(default)]
        max: Option<u64>,
    },
    Pattern {
        regex: String,
    },
    Describe(Description),
    Deprecated,
    Route(Route),
    Tag {
        name: String,
    },
    Binding(Binding),
    ResponseStatus {
        code: u16,
    },
    Responses {
        entries: Vec<ResponseDecl>,
    },
}

/// One subclass association of a polymorphic base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtypeDecl {
    /// Fully-qualified subclass name
    #[serde(rename = "type")]
    pub type_name: String,
    /// Discriminator value; defaults to the subclass's simple name
    #[serde(default)]
    pub tag: Option<String>,
}

/// Generic descriptive metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub access: Option<Access>,
}

/// Read/write visibility of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    ReadOnly,
    WriteOnly,
}

/// Routing metadata on a handler type (base path) or handler method
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub methods: Vec<HttpMethod>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub consumes: Option<String>,
    #[serde(default)]
    pub produces: Option<String>,
}

/// Where a handler parameter is bound from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingLocation {
    Path,
    Query,
    Header,
    Body,
}

/// Binding directive of a handler parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub location: BindingLocation,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
}

/// One entry of an explicit multi-response declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseDecl {
    pub code: u16,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub body: Option<TypeRef>,
    #[serde(default)]
    pub headers: IndexMap<String, HeaderDecl>,
}

/// A response header declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderDecl {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default = "TypeRef::string")]
    pub type_ref: TypeRef,
}

impl Route {
    pub fn new(path: &str, methods: &[HttpMethod]) -> Self {
        Self {
            paths: vec![path.to_string()],
            methods: methods.to_vec(),
            ..Default::default()
        }
    }

    /// Base path route for a handler type
    pub fn base(path: &str) -> Self {
        Self::new(path, &[])
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

impl Binding {
    pub fn new(location: BindingLocation) -> Self {
        Self {
            location,
            name: None,
            value: None,
            required: None,
        }
    }

    pub fn path() -> Self {
        Self::new(BindingLocation::Path)
    }

    pub fn query() -> Self {
        Self::new(BindingLocation::Query)
    }

    pub fn header() -> Self {
        Self::new(BindingLocation::Header)
    }

    pub fn body() -> Self {
        Self::new(BindingLocation::Body)
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Resolved parameter name: explicit name, then value, then the declared name.
    /// Empty strings count as absent.
    pub fn resolve_name<'a>(&'a self, declared: &'a str) -> &'a str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.value.as_deref().filter(|v| !v.is_empty()))
            .unwrap_or(declared)
    }

    /// Path bindings are always required; the others default to required
    pub fn is_required(&self) -> bool {
        match self.location {
            BindingLocation::Path => true,
            _ => self.required.unwrap_or(true),
        }
    }
}

/// Lookup helpers shared by every element that carries directives
pub trait Annotated {
    fn directives(&self) -> &[Directive];

    fn is_excluded(&self) -> bool {
        self.directives()
            .iter()
            .any(|d| matches!(d, Directive::Exclude))
    }

    fn is_ignored(&self) -> bool {
        self.directives()
            .iter()
            .any(|d| matches!(d, Directive::Ignore))
    }

    fn is_not_null(&self) -> bool {
        self.directives()
            .iter()
            .any(|d| matches!(d, Directive::NotNull))
    }

    fn is_deprecated(&self) -> bool {
        self.directives().iter().any(|d| match d {
            Directive::Deprecated => true,
            Directive::Describe(desc) => desc.deprecated,
            _ => false,
        })
    }

    fn description(&self) -> Option<&Description> {
        self.directives().iter().find_map(|d| match d {
            Directive::Describe(desc) => Some(desc),
            _ => None,
        })
    }

    fn route(&self) -> Option<&Route> {
        self.directives().iter().find_map(|d| match d {
            Directive::Route(route) => Some(route),
            _ => None,
        })
    }

    fn binding(&self) -> Option<&Binding> {
        self.directives().iter().find_map(|d| match d {
            Directive::Binding(binding) => Some(binding),
            _ => None,
        })
    }

    fn tag(&self) -> Option<&str> {
        self.directives().iter().find_map(|d| match d {
            Directive::Tag { name } => Some(name.as_str()),
            _ => None,
        })
    }

    fn response_status(&self) -> Option<u16> {
        self.directives().iter().find_map(|d| match d {
            Directive::ResponseStatus { code } => Some(*code),
            _ => None,
        })
    }

    fn responses(&self) -> Option<&[ResponseDecl]> {
        self.directives().iter().find_map(|d| match d {
            Directive::Responses { entries } => Some(entries.as_slice()),
            _ => None,
        })
    }

    /// `(property, subtypes)` of a polymorphic declaration
    fn polymorphic(&self) -> Option<(Option<&str>, &[SubtypeDecl])> {
        self.directives().iter().find_map(|d| match d {
            Directive::Polymorphic { property, subtypes } => {
                Some((property.as_deref(), subtypes.as_slice()))
            }
            _ => None,
        })
    }
}
