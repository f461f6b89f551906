use crate::{
    config::ServerConfig,
    document::{
        Document, HttpMethod, OperationDescriptor, OperationParameter, RequestBodyDescriptor,
        ResponseDescriptor,
    },
    model::Access,
    node::{DataType, NodeKind, NumericType, SchemaNode},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// OpenAPI version written by the converter
pub const OPENAPI_VERSION: &str = "3.0.3";

const COMPONENT_PREFIX: &str = "#/components/schemas/";

/// Complete OpenAPI 3.0 specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiSpec {
    /// OpenAPI specification version
    pub openapi: String,

    /// API metadata
    pub info: ApiInfo,

    /// Server URLs
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub servers: Vec<Server>,

    /// API paths and operations
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,

    /// Reusable components
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,

    /// Tags for grouping operations
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<Tag>,
}

/// API metadata information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfo {
    /// API title
    pub title: String,

    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// API version
    pub version: String,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    /// Server URL
    pub url: String,

    /// Server description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Path item containing operations for a specific path
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
}

/// HTTP operation (GET, POST, etc.)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Operation {
    /// Tags for grouping
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,

    /// Short summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Long description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unique operation ID
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    /// Parameters
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parameters: Vec<Parameter>,

    /// Request body
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,

    /// Possible responses
    #[serde(default)]
    pub responses: IndexMap<String, Response>,

    /// Deprecated flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

/// Parameter for operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,

    /// Parameter location (query, header, path)
    #[serde(rename = "in")]
    pub location: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    /// Schema defining the parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// Request body specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Media type content
    pub content: IndexMap<String, MediaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// Response specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub description: String,

    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub headers: IndexMap<String, Header>,

    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub content: IndexMap<String, MediaType>,
}

/// Header specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// Media type specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// Polymorphism discriminator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discriminator {
    #[serde(rename = "propertyName")]
    pub property_name: String,

    /// Discriminator value -> schema reference
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub mapping: IndexMap<String, String>,
}

/// Schema for data types
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Data type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    /// Format specifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Properties for object types
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub properties: IndexMap<String, Schema>,

    /// Required properties
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub required: Vec<String>,

    /// Additional properties schema
    #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<Schema>>,

    /// Items schema for arrays
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    /// Enum values
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty", default)]
    pub enum_values: Vec<serde_json::Value>,

    /// Reference to another schema
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// AllOf composition
    #[serde(rename = "allOf", skip_serializing_if = "Vec::is_empty", default)]
    pub all_of: Vec<Schema>,

    /// OneOf composition
    #[serde(rename = "oneOf", skip_serializing_if = "Vec::is_empty", default)]
    pub one_of: Vec<Schema>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    /// Tag of the concrete subclass an `allOf` composition describes
    #[serde(rename = "x-discriminator-value", skip_serializing_if = "Option::is_none")]
    pub discriminator_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    #[serde(rename = "writeOnly", skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,
}

/// Reusable components
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Components {
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub schemas: BTreeMap<String, Schema>,
}

/// Tag for grouping operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

impl OpenApiSpec {
    /// Convert a compiled document, listing the given servers
    pub fn from_document(document: &Document, servers: &[ServerConfig]) -> Self {
        let mut paths = BTreeMap::new();
        for (path, methods) in &document.paths {
            let mut item = PathItem::default();
            for (method, operation) in methods {
                item.set_operation(*method, convert_operation(operation));
            }
            paths.insert(path.clone(), item);
        }

        let components = (!document.components.is_empty()).then(|| Components {
            schemas: document
                .components
                .iter()
                .map(|(name, node)| (name.clone(), Schema::from(node)))
                .collect(),
        });

        let tags: BTreeSet<&str> = document.operations().map(|op| op.tag.as_str()).collect();

        Self {
            openapi: OPENAPI_VERSION.to_string(),
            info: ApiInfo {
                title: document.info.title.clone(),
                description: document.info.description.clone(),
                version: document.info.version.clone(),
            },
            servers: servers
                .iter()
                .map(|server| Server {
                    url: server.url.clone(),
                    description: server.description.clone(),
                })
                .collect(),
            paths,
            components,
            tags: tags
                .into_iter()
                .map(|name| Tag {
                    name: name.to_string(),
                })
                .collect(),
        }
    }
}

impl From<&Document> for OpenApiSpec {
    fn from(document: &Document) -> Self {
        Self::from_document(document, &[])
    }
}

impl PathItem {
    pub fn set_operation(&mut self, method: HttpMethod, operation: Operation) {
        let slot = match method {
            HttpMethod::GET => &mut self.get,
            HttpMethod::PUT => &mut self.put,
            HttpMethod::POST => &mut self.post,
            HttpMethod::DELETE => &mut self.delete,
            HttpMethod::OPTIONS => &mut self.options,
            HttpMethod::HEAD => &mut self.head,
            HttpMethod::PATCH => &mut self.patch,
            HttpMethod::TRACE => &mut self.trace,
        };
        *slot = Some(operation);
    }

    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::GET => self.get.as_ref(),
            HttpMethod::PUT => self.put.as_ref(),
            HttpMethod::POST => self.post.as_ref(),
            HttpMethod::DELETE => self.delete.as_ref(),
            HttpMethod::OPTIONS => self.options.as_ref(),
            HttpMethod::HEAD => self.head.as_ref(),
            HttpMethod::PATCH => self.patch.as_ref(),
            HttpMethod::TRACE => self.trace.as_ref(),
        }
    }
}

fn convert_operation(operation: &OperationDescriptor) -> Operation {
    Operation {
        tags: vec![operation.tag.clone()],
        summary: operation.summary.clone(),
        description: operation.description.clone(),
        operation_id: Some(operation.operation_id.clone()),
        parameters: operation.parameters.iter().map(convert_parameter).collect(),
        request_body: operation.request_body.as_ref().map(convert_request_body),
        responses: operation
            .responses
            .iter()
            .map(|(code, response)| (code.to_string(), convert_response(response)))
            .collect(),
        deprecated: operation.deprecated.then_some(true),
    }
}

fn convert_parameter(parameter: &OperationParameter) -> Parameter {
    Parameter {
        name: parameter.name.clone(),
        location: parameter.location.as_str().to_string(),
        description: parameter.description.clone(),
        required: Some(parameter.required),
        deprecated: parameter.deprecated.then_some(true),
        schema: Some(Schema::from(&parameter.schema)),
    }
}

fn convert_request_body(body: &RequestBodyDescriptor) -> RequestBody {
    let mut content = IndexMap::new();
    content.insert(
        body.content_type.clone(),
        MediaType {
            schema: Some(Schema::from(&body.schema)),
        },
    );
    RequestBody {
        description: body.description.clone(),
        content,
        required: Some(body.required),
    }
}

fn convert_response(response: &ResponseDescriptor) -> Response {
    let mut content = IndexMap::new();
    if let (Some(content_type), Some(schema)) = (&response.content_type, &response.schema) {
        content.insert(
            content_type.clone(),
            MediaType {
                schema: Some(Schema::from(schema)),
            },
        );
    }

    Response {
        description: response.description.clone(),
        headers: response
            .headers
            .iter()
            .map(|(name, header)| {
                (
                    name.clone(),
                    Header {
                        description: header.description.clone(),
                        schema: Some(Schema::from(&header.schema)),
                    },
                )
            })
            .collect(),
        content,
    }
}

fn component_ref(name: &str) -> String {
    format!("{}{}", COMPONENT_PREFIX, name)
}

fn convert_discriminator(discriminator: &crate::node::Discriminator) -> Discriminator {
    Discriminator {
        property_name: discriminator.property_name.clone(),
        mapping: discriminator
            .mapping
            .iter()
            .map(|(tag, component)| (tag.clone(), component_ref(component)))
            .collect(),
    }
}

impl From<&SchemaNode> for Schema {
    fn from(node: &SchemaNode) -> Self {
        let mut schema = match &node.kind {
            NodeKind::Primitive(primitive) => Schema {
                schema_type: Some(data_type_name(primitive.data_type).to_string()),
                format: primitive.format.clone(),
                ..Default::default()
            },
            NodeKind::String(string) => Schema {
                schema_type: Some("string".to_string()),
                format: string.format.clone(),
                pattern: string.pattern.clone(),
                min_length: string.min_length,
                max_length: string.max_length,
                ..Default::default()
            },
            NodeKind::Number(number) => Schema {
                schema_type: Some(
                    match number.numeric_type {
                        NumericType::Integer => "integer",
                        NumericType::Number => "number",
                    }
                    .to_string(),
                ),
                format: number.format.clone(),
                minimum: number.minimum,
                maximum: number.maximum,
                ..Default::default()
            },
            NodeKind::Boolean => Schema {
                schema_type: Some("boolean".to_string()),
                ..Default::default()
            },
            NodeKind::Array(array) => Schema {
                schema_type: Some("array".to_string()),
                items: Some(Box::new(Schema::from(array.items.as_ref()))),
                min_items: array.min_items,
                max_items: array.max_items,
                ..Default::default()
            },
            NodeKind::Enum(values) => Schema {
                schema_type: Some("string".to_string()),
                enum_values: values
                    .values
                    .iter()
                    .map(|v| serde_json::Value::String(v.clone()))
                    .collect(),
                ..Default::default()
            },
            NodeKind::Reference(reference) => {
                let target = Schema {
                    reference: Some(component_ref(&reference.target)),
                    ..Default::default()
                };
                // $ref siblings are ignored in 3.0
                if node.description.is_none() && !node.deprecated && node.access.is_none() {
                    return target;
                }
                Schema {
                    all_of: vec![target],
                    ..Default::default()
                }
            }
            NodeKind::Composed(composed) => Schema {
                all_of: composed.all_of.iter().map(Schema::from).collect(),
                one_of: composed.one_of.iter().map(Schema::from).collect(),
                discriminator: composed.discriminator.as_ref().map(convert_discriminator),
                discriminator_value: composed.discriminator_value.clone(),
                ..Default::default()
            },
            NodeKind::Object(object) => Schema {
                schema_type: Some("object".to_string()),
                properties: object
                    .properties
                    .iter()
                    .map(|(name, property)| (name.clone(), Schema::from(property)))
                    .collect(),
                required: object.required.iter().cloned().collect(),
                additional_properties: object
                    .additional_properties
                    .as_deref()
                    .map(|additional| Box::new(Schema::from(additional))),
                discriminator: object.discriminator.as_ref().map(convert_discriminator),
                ..Default::default()
            },
        };

        schema.description = node.description.clone();
        schema.deprecated = node.deprecated.then_some(true);
        match node.access {
            Some(Access::ReadOnly) => schema.read_only = Some(true),
            Some(Access::WriteOnly) => schema.write_only = Some(true),
            None => {}
        }
        schema
    }
}

fn data_type_name(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Object => "object",
        DataType::String => "string",
        DataType::Integer => "integer",
        DataType::Number => "number",
        DataType::Boolean => "boolean",
    }
}
