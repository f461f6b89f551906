/*!
Value types of fields, parameters and return values.

A `TypeRef` is written in a compact notation so type graphs stay readable:

| notation            | meaning                                        |
|---------------------|------------------------------------------------|
| `int32` `int64`     | unboxed integers (structurally required)       |
| `float` `double`    | unboxed floating point                         |
| `boolean`           | unboxed boolean                                |
| `int64?`            | boxed/nullable variant of a primitive kind     |
| `string`            | string (always nullable)                       |
| `date` `date-time`  | temporal values                                |
| `uuid` `file` `void`| special leaf kinds                             |
| `list<T>`           | single-level generic container                 |
| `T[]`               | fixed-size array                               |
| `map<T>`            | string keyed map                               |
| `envelope<T>`       | generic wrapper unwrapped on responses         |
| `opaque<x>`         | primitive-like host type with no mapping       |
| anything else       | fully-qualified name of a type in the graph    |
*/

use crate::error::{ApiGenError, ApiGenResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scalar kinds sharing one schema table for boxed and unboxed variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Int32,
    Int64,
    Float,
    Double,
    Boolean,
    String,
}

/// Date and time kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    Date,
    DateTime,
}

/// The type of a value as seen by the compiler
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    Primitive { kind: PrimitiveKind, boxed: bool },
    Temporal(TemporalKind),
    Uuid,
    File,
    Void,
    List(Box<TypeRef>),
    Array(Box<TypeRef>),
    Map(Box<TypeRef>),
    Envelope(Box<TypeRef>),
    Opaque(String),
    Named(String),
}

impl PrimitiveKind {
    fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::String => "string",
        }
    }

    fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "int32" => PrimitiveKind::Int32,
            "int64" => PrimitiveKind::Int64,
            "float" => PrimitiveKind::Float,
            "double" => PrimitiveKind::Double,
            "boolean" => PrimitiveKind::Boolean,
            "string" => PrimitiveKind::String,
            _ => return None,
        })
    }
}

impl TypeRef {
    /// Unboxed primitive of the given kind
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeRef::Primitive {
            kind,
            boxed: kind == PrimitiveKind::String,
        }
    }

    /// Boxed (nullable) primitive of the given kind
    pub fn boxed(kind: PrimitiveKind) -> Self {
        TypeRef::Primitive { kind, boxed: true }
    }

    pub fn string() -> Self {
        TypeRef::boxed(PrimitiveKind::String)
    }

    pub fn named(name: &str) -> Self {
        TypeRef::Named(name.to_string())
    }

    pub fn list(element: TypeRef) -> Self {
        TypeRef::List(Box::new(element))
    }

    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    pub fn envelope(inner: TypeRef) -> Self {
        TypeRef::Envelope(Box::new(inner))
    }

    /// Element type of a list or array
    pub fn element(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::List(element) | TypeRef::Array(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        self.element().is_some()
    }

    /// A file, or a list/array of files
    pub fn is_file_like(&self) -> bool {
        match self {
            TypeRef::File => true,
            TypeRef::List(element) | TypeRef::Array(element) => **element == TypeRef::File,
            _ => false,
        }
    }

    /// Unboxed primitives can never be absent
    pub fn is_structurally_required(&self) -> bool {
        matches!(self, TypeRef::Primitive { boxed: false, .. })
    }

    fn parse_generic(notation: &str) -> ApiGenResult<Option<Self>> {
        let Some(open) = notation.find('<') else {
            return Ok(None);
        };
        if !notation.ends_with('>') {
            return Err(ApiGenError::invalid_type(
                notation,
                "unterminated generic argument",
            ));
        }

        let head = notation[..open].trim();
        let inner = notation[open + 1..notation.len() - 1].trim();
        if inner.is_empty() {
            return Err(ApiGenError::invalid_type(notation, "empty generic argument"));
        }

        let parsed = match head {
            "list" => TypeRef::List(Box::new(inner.parse()?)),
            "map" => TypeRef::Map(Box::new(inner.parse()?)),
            "envelope" => TypeRef::Envelope(Box::new(inner.parse()?)),
            "opaque" => TypeRef::Opaque(inner.to_string()),
            other => {
                return Err(ApiGenError::invalid_type(
                    notation,
                    format!("unknown generic wrapper '{}'", other),
                ))
            }
        };
        Ok(Some(parsed))
    }
}

impl FromStr for TypeRef {
    type Err = ApiGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let notation = s.trim();
        if notation.is_empty() {
            return Err(ApiGenError::invalid_type(s, "empty type"));
        }

        if let Some(element) = notation.strip_suffix("[]") {
            return Ok(TypeRef::Array(Box::new(element.parse()?)));
        }

        if let Some(generic) = TypeRef::parse_generic(notation)? {
            return Ok(generic);
        }

        if let Some(base) = notation.strip_suffix('?') {
            return match PrimitiveKind::from_keyword(base.trim()) {
                Some(kind) => Ok(TypeRef::boxed(kind)),
                None => Err(ApiGenError::invalid_type(
                    s,
                    "only primitive kinds have a boxed variant",
                )),
            };
        }

        if let Some(kind) = PrimitiveKind::from_keyword(notation) {
            return Ok(TypeRef::primitive(kind));
        }

        match notation {
            "date" => Ok(TypeRef::Temporal(TemporalKind::Date)),
            "date-time" => Ok(TypeRef::Temporal(TemporalKind::DateTime)),
            "uuid" => Ok(TypeRef::Uuid),
            "file" => Ok(TypeRef::File),
            "void" => Ok(TypeRef::Void),
            name if name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '$')) =>
            {
                Ok(TypeRef::Named(name.to_string()))
            }
            _ => Err(ApiGenError::invalid_type(s, "not a type name")),
        }
    }
}

impl TryFrom<String> for TypeRef {
    type Error = ApiGenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive { kind, boxed } => {
                if *boxed && *kind != PrimitiveKind::String {
                    write!(f, "{}?", kind.keyword())
                } else {
                    write!(f, "{}", kind.keyword())
                }
            }
            TypeRef::Temporal(TemporalKind::Date) => write!(f, "date"),
            TypeRef::Temporal(TemporalKind::DateTime) => write!(f, "date-time"),
            TypeRef::Uuid => write!(f, "uuid"),
            TypeRef::File => write!(f, "file"),
            TypeRef::Void => write!(f, "void"),
            TypeRef::List(element) => write!(f, "list<{}>", element),
            TypeRef::Array(element) => write!(f, "{}[]", element),
            TypeRef::Map(value) => write!(f, "map<{}>", value),
            TypeRef::Envelope(inner) => write!(f, "envelope<{}>", inner),
            TypeRef::Opaque(name) => write!(f, "opaque<{}>", name),
            TypeRef::Named(name) => write!(f, "{}", name),
        }
    }
}
