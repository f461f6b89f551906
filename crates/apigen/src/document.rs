/*!
The compiled document: components plus operations, before serialization.
*/

use crate::node::SchemaNode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// HTTP verbs, ordered the way path items list them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    #[serde(alias = "get")]
    GET,
    #[serde(alias = "put")]
    PUT,
    #[serde(alias = "post")]
    POST,
    #[serde(alias = "delete")]
    DELETE,
    #[serde(alias = "options")]
    OPTIONS,
    #[serde(alias = "head")]
    HEAD,
    #[serde(alias = "patch")]
    PATCH,
    #[serde(alias = "trace")]
    TRACE,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::GET => write!(f, "GET"),
            HttpMethod::PUT => write!(f, "PUT"),
            HttpMethod::POST => write!(f, "POST"),
            HttpMethod::DELETE => write!(f, "DELETE"),
            HttpMethod::OPTIONS => write!(f, "OPTIONS"),
            HttpMethod::HEAD => write!(f, "HEAD"),
            HttpMethod::PATCH => write!(f, "PATCH"),
            HttpMethod::TRACE => write!(f, "TRACE"),
        }
    }
}

/// Document metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiInfo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
}

/// Parameter location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
        }
    }
}

/// One operation parameter
#[derive(Debug, Clone, PartialEq)]
pub struct OperationParameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: SchemaNode,
    pub description: Option<String>,
    pub deprecated: bool,
}

/// The request body of an operation
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBodyDescriptor {
    pub content_type: String,
    pub schema: SchemaNode,
    pub required: bool,
    pub description: Option<String>,
}

/// A response header
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderDescriptor {
    pub description: Option<String>,
    pub schema: SchemaNode,
}

/// One response of an operation
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDescriptor {
    pub description: String,
    pub content_type: Option<String>,
    pub schema: Option<SchemaNode>,
    pub headers: IndexMap<String, HeaderDescriptor>,
}

/// One HTTP method bound to one path
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDescriptor {
    pub method: HttpMethod,
    pub path: String,
    pub operation_id: String,
    pub tag: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    pub parameters: Vec<OperationParameter>,
    pub request_body: Option<RequestBodyDescriptor>,
    /// Keyed by status code
    pub responses: IndexMap<u16, ResponseDescriptor>,
}

/// Component map plus path map
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub info: ApiInfo,
    pub components: BTreeMap<String, SchemaNode>,
    pub paths: BTreeMap<String, BTreeMap<HttpMethod, OperationDescriptor>>,
}

/// A reference whose target is not a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Where the reference was found (`components.Car`, `GET /cars`)
    pub location: String,
    pub target: String,
}

impl Document {
    pub fn new(info: ApiInfo) -> Self {
        Self {
            info,
            components: BTreeMap::new(),
            paths: BTreeMap::new(),
        }
    }

    /// Look up an operation by path and verb
    pub fn operation(&self, path: &str, method: HttpMethod) -> Option<&OperationDescriptor> {
        self.paths.get(path).and_then(|methods| methods.get(&method))
    }

    /// All operations, ordered by path then verb
    pub fn operations(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.paths.values().flat_map(|methods| methods.values())
    }

    /// Every reference target that is missing from the component map
    pub fn unresolved_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        let mut check = |location: String, schema: &SchemaNode| {
            for target in schema.references() {
                if !self.components.contains_key(target) {
                    dangling.push(DanglingReference {
                        location: location.clone(),
                        target: target.to_string(),
                    });
                }
            }
        };

        for (name, schema) in &self.components {
            check(format!("components.{}", name), schema);
        }

        for operation in self.operations() {
            let location = format!("{} {}", operation.method, operation.path);
            for parameter in &operation.parameters {
                check(location.clone(), &parameter.schema);
            }
            if let Some(body) = &operation.request_body {
                check(location.clone(), &body.schema);
            }
            for response in operation.responses.values() {
                if let Some(schema) = &response.schema {
                    check(location.clone(), schema);
                }
                for header in response.headers.values() {
                    check(location.clone(), &header.schema);
                }
            }
        }

        dangling
    }
}

/// Standard reason phrase for a status code
pub fn reason_phrase(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Response",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> ApiInfo {
        ApiInfo {
            title: "Test API".to_string(),
            description: None,
            version: "1.0.0".to_string(),
        }
    }

    #[test]
    fn test_method_ordering() {
        let mut methods = vec![HttpMethod::POST, HttpMethod::DELETE, HttpMethod::GET, HttpMethod::PUT];
        methods.sort();
        assert_eq!(
            methods,
            vec![HttpMethod::GET, HttpMethod::PUT, HttpMethod::POST, HttpMethod::DELETE]
        );
    }

    #[test]
    fn test_unresolved_references() {
        let mut document = Document::new(info());
        document
            .components
            .insert("Car".to_string(), SchemaNode::reference("Product"));
        document
            .components
            .insert("Product".to_string(), SchemaNode::generic_object());

        let mut responses = IndexMap::new();
        responses.insert(
            200,
            ResponseDescriptor {
                description: "OK".to_string(),
                content_type: Some("application/json".to_string()),
                schema: Some(SchemaNode::array(SchemaNode::reference("Truck"))),
                headers: IndexMap::new(),
            },
        );
        let operation = OperationDescriptor {
            method: HttpMethod::GET,
            path: "/trucks".to_string(),
            operation_id: "listUsingGET".to_string(),
            tag: "truck-controller".to_string(),
            summary: None,
            description: None,
            deprecated: false,
            parameters: Vec::new(),
            request_body: None,
            responses,
        };
        document
            .paths
            .entry("/trucks".to_string())
            .or_default()
            .insert(HttpMethod::GET, operation);

        let dangling = document.unresolved_references();
        assert_eq!(
            dangling,
            vec![DanglingReference {
                location: "GET /trucks".to_string(),
                target: "Truck".to_string(),
            }]
        );
        assert!(document.operation("/trucks", HttpMethod::GET).is_some());
        assert!(document.operation("/trucks", HttpMethod::POST).is_none());
    }

    #[test]
    fn test_reason_phrases() {
        assert_eq!(reason_phrase(201), "Created");
        assert_eq!(reason_phrase(418), "Response");
    }
}
