/*!
# apigen

Compiles a host program's type graph and endpoint declarations into an
OpenAPI 3.0 document.

The host exports its classes, fields and handler methods, annotated with
metadata directives, as a [`TypeGraph`]. The generator runs one synchronous
pass over it:

- scan the model namespaces and resolve polymorphic bases
- transform every scanned type into a component schema
- scan the handler namespaces and extract one operation per path and verb
- de-duplicate operation identifiers and assemble the path map

The result is a format-independent [`Document`]; [`OpenApiSpec`] turns it into
the serializable OpenAPI model.

## Usage

```rust,no_run
use apigen::{ApiGenerator, ApiGenUtils, GeneratorConfig, OpenApiSpec, OutputFormat};

let config = GeneratorConfig::new("Shop API", "1.0.0")
    .with_model_namespace("com.example.model")
    .with_handler_namespace("com.example.api");
let graph = ApiGenUtils::load_graph_from_file("types.yaml").unwrap();

let document = ApiGenerator::new(config).generate(&graph).unwrap();
let spec = OpenApiSpec::from(&document);
ApiGenUtils::save_spec_to_file(&spec, "openapi.json", OutputFormat::Json, true).unwrap();
```
*/

// Re-export main types
pub use crate::{
    config::{GeneratorConfig, ServerConfig},
    context::GenerationContext,
    document::{Document, HttpMethod, OperationDescriptor},
    endpoints::OperationExtractor,
    error::{ApiGenError, ApiGenResult},
    generator::ApiGenerator,
    inheritance::{InheritanceInfo, InheritanceMap, InheritanceResolver},
    interceptor::{Pipeline, PropertySchema},
    model::{TypeDescriptor, TypeGraph, TypeRef},
    node::SchemaNode,
    schema::SchemaTransformer,
    specification::OpenApiSpec,
    utils::{ApiGenUtils, OutputFormat},
};

// Core modules
pub mod config;
pub mod error;
pub mod generator;
pub mod specification;

// Type model and compiled document
pub mod document;
pub mod model;
pub mod node;

// Compilation passes
pub mod context;
pub mod endpoints;
pub mod inheritance;
pub mod interceptor;
pub mod namespace;
pub mod schema;

// Utilities
pub mod utils;

// Test utilities
#[cfg(test)]
mod test_utils;
