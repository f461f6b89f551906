/*!
Interceptor and filter pipeline.

Interceptors run after the default node for an entity is fully built, in
registration order, and mutate that node in place. Filters are predicates
consulted before anything is built; an element is kept only when every filter
accepts it. A `Pipeline` is passed explicitly into the generator.

Closures with matching signatures implement every hook trait:

```rust
use apigen::interceptor::Pipeline;
use apigen::document::OperationDescriptor;
use apigen::model::{MethodDescriptor, TypeDescriptor};

let pipeline = Pipeline::new().with_operation_interceptor(
    |_handler: &TypeDescriptor, _method: &MethodDescriptor, op: &mut OperationDescriptor| {
        op.summary = Some(op.operation_id.clone());
    },
);
assert_eq!(pipeline.interceptor_count(), 1);
```
*/

use crate::context::GenerationContext;
use crate::document::{OperationDescriptor, OperationParameter, RequestBodyDescriptor};
use crate::model::{FieldDescriptor, MethodDescriptor, ParameterDescriptor, TypeDescriptor};
use crate::node::SchemaNode;
use std::fmt;

/// A property schema together with its required flag
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    pub schema: SchemaNode,
    pub required: bool,
}

/// Runs on every component schema
pub trait SchemaInterceptor {
    fn intercept(&self, ctx: &GenerationContext<'_>, descriptor: &TypeDescriptor, schema: &mut SchemaNode);
}

/// Runs on every object property
pub trait FieldInterceptor {
    fn intercept(
        &self,
        ctx: &GenerationContext<'_>,
        owner: &TypeDescriptor,
        field: &FieldDescriptor,
        property: &mut PropertySchema,
    );
}

/// Runs on every operation
pub trait OperationInterceptor {
    fn intercept(&self, handler: &TypeDescriptor, method: &MethodDescriptor, operation: &mut OperationDescriptor);
}

/// Runs on every operation parameter
pub trait ParameterInterceptor {
    fn intercept(
        &self,
        method: &MethodDescriptor,
        parameter: &ParameterDescriptor,
        produced: &mut OperationParameter,
    );
}

/// Runs on every request body
pub trait RequestBodyInterceptor {
    fn intercept(
        &self,
        method: &MethodDescriptor,
        parameter: &ParameterDescriptor,
        body: &mut RequestBodyDescriptor,
    );
}

/// Decides whether a scanned data type becomes a component
pub trait TypeFilter {
    fn include(&self, descriptor: &TypeDescriptor) -> bool;
}

/// Decides whether a handler method becomes operations
pub trait OperationFilter {
    fn include(&self, handler: &TypeDescriptor, method: &MethodDescriptor) -> bool;
}

/// Decides whether a handler parameter is documented
pub trait ParameterFilter {
    fn include(&self, method: &MethodDescriptor, parameter: &ParameterDescriptor) -> bool;
}

impl<F> SchemaInterceptor for F
where
    F: Fn(&GenerationContext<'_>, &TypeDescriptor, &mut SchemaNode),
{
    fn intercept(&self, ctx: &GenerationContext<'_>, descriptor: &TypeDescriptor, schema: &mut SchemaNode) {
        self(ctx, descriptor, schema)
    }
}

impl<F> FieldInterceptor for F
where
    F: Fn(&GenerationContext<'_>, &TypeDescriptor, &FieldDescriptor, &mut PropertySchema),
{
    fn intercept(
        &self,
        ctx: &GenerationContext<'_>,
        owner: &TypeDescriptor,
        field: &FieldDescriptor,
        property: &mut PropertySchema,
    ) {
        self(ctx, owner, field, property)
    }
}

impl<F> OperationInterceptor for F
where
    F: Fn(&TypeDescriptor, &MethodDescriptor, &mut OperationDescriptor),
{
    fn intercept(&self, handler: &TypeDescriptor, method: &MethodDescriptor, operation: &mut OperationDescriptor) {
        self(handler, method, operation)
    }
}

impl<F> ParameterInterceptor for F
where
    F: Fn(&MethodDescriptor, &ParameterDescriptor, &mut OperationParameter),
{
    fn intercept(
        &self,
        method: &MethodDescriptor,
        parameter: &ParameterDescriptor,
        produced: &mut OperationParameter,
    ) {
        self(method, parameter, produced)
    }
}

impl<F> RequestBodyInterceptor for F
where
    F: Fn(&MethodDescriptor, &ParameterDescriptor, &mut RequestBodyDescriptor),
{
    fn intercept(
        &self,
        method: &MethodDescriptor,
        parameter: &ParameterDescriptor,
        body: &mut RequestBodyDescriptor,
    ) {
        self(method, parameter, body)
    }
}

impl<F> TypeFilter for F
where
    F: Fn(&TypeDescriptor) -> bool,
{
    fn include(&self, descriptor: &TypeDescriptor) -> bool {
        self(descriptor)
    }
}

impl<F> OperationFilter for F
where
    F: Fn(&TypeDescriptor, &MethodDescriptor) -> bool,
{
    fn include(&self, handler: &TypeDescriptor, method: &MethodDescriptor) -> bool {
        self(handler, method)
    }
}

impl<F> ParameterFilter for F
where
    F: Fn(&MethodDescriptor, &ParameterDescriptor) -> bool,
{
    fn include(&self, method: &MethodDescriptor, parameter: &ParameterDescriptor) -> bool {
        self(method, parameter)
    }
}

/// Ordered hook registrations for one generation
#[derive(Default)]
pub struct Pipeline {
    schema_interceptors: Vec<Box<dyn SchemaInterceptor>>,
    field_interceptors: Vec<Box<dyn FieldInterceptor>>,
    operation_interceptors: Vec<Box<dyn OperationInterceptor>>,
    parameter_interceptors: Vec<Box<dyn ParameterInterceptor>>,
    request_body_interceptors: Vec<Box<dyn RequestBodyInterceptor>>,
    type_filters: Vec<Box<dyn TypeFilter>>,
    operation_filters: Vec<Box<dyn OperationFilter>>,
    parameter_filters: Vec<Box<dyn ParameterFilter>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema_interceptor<I: SchemaInterceptor + 'static>(mut self, interceptor: I) -> Self {
        self.schema_interceptors.push(Box::new(interceptor));
        self
    }

    pub fn with_field_interceptor<I: FieldInterceptor + 'static>(mut self, interceptor: I) -> Self {
        self.field_interceptors.push(Box::new(interceptor));
        self
    }

    pub fn with_operation_interceptor<I: OperationInterceptor + 'static>(mut self, interceptor: I) -> Self {
        self.operation_interceptors.push(Box::new(interceptor));
        self
    }

    pub fn with_parameter_interceptor<I: ParameterInterceptor + 'static>(mut self, interceptor: I) -> Self {
        self.parameter_interceptors.push(Box::new(interceptor));
        self
    }

    pub fn with_request_body_interceptor<I: RequestBodyInterceptor + 'static>(
        mut self,
        interceptor: I,
    ) -> Self {
        self.request_body_interceptors.push(Box::new(interceptor));
        self
    }

    pub fn with_type_filter<F: TypeFilter + 'static>(mut self, filter: F) -> Self {
        self.type_filters.push(Box::new(filter));
        self
    }

    pub fn with_operation_filter<F: OperationFilter + 'static>(mut self, filter: F) -> Self {
        self.operation_filters.push(Box::new(filter));
        self
    }

    pub fn with_parameter_filter<F: ParameterFilter + 'static>(mut self, filter: F) -> Self {
        self.parameter_filters.push(Box::new(filter));
        self
    }

    /// Number of registered interceptors across all categories
    pub fn interceptor_count(&self) -> usize {
        self.schema_interceptors.len()
            + self.field_interceptors.len()
            + self.operation_interceptors.len()
            + self.parameter_interceptors.len()
            + self.request_body_interceptors.len()
    }

    pub(crate) fn include_type(&self, descriptor: &TypeDescriptor) -> bool {
        self.type_filters.iter().all(|f| f.include(descriptor))
    }

    pub(crate) fn include_operation(&self, handler: &TypeDescriptor, method: &MethodDescriptor) -> bool {
        self.operation_filters.iter().all(|f| f.include(handler, method))
    }

    pub(crate) fn include_parameter(&self, method: &MethodDescriptor, parameter: &ParameterDescriptor) -> bool {
        self.parameter_filters.iter().all(|f| f.include(method, parameter))
    }

    pub(crate) fn intercept_schema(
        &self,
        ctx: &GenerationContext<'_>,
        descriptor: &TypeDescriptor,
        schema: &mut SchemaNode,
    ) {
        for interceptor in &self.schema_interceptors {
            interceptor.intercept(ctx, descriptor, schema);
        }
    }

    pub(crate) fn intercept_field(
        &self,
        ctx: &GenerationContext<'_>,
        owner: &TypeDescriptor,
        field: &FieldDescriptor,
        property: &mut PropertySchema,
    ) {
        for interceptor in &self.field_interceptors {
            interceptor.intercept(ctx, owner, field, property);
        }
    }

    pub(crate) fn intercept_operation(
        &self,
        handler: &TypeDescriptor,
        method: &MethodDescriptor,
        operation: &mut OperationDescriptor,
    ) {
        for interceptor in &self.operation_interceptors {
            interceptor.intercept(handler, method, operation);
        }
    }

    pub(crate) fn intercept_parameter(
        &self,
        method: &MethodDescriptor,
        parameter: &ParameterDescriptor,
        produced: &mut OperationParameter,
    ) {
        for interceptor in &self.parameter_interceptors {
            interceptor.intercept(method, parameter, produced);
        }
    }

    pub(crate) fn intercept_request_body(
        &self,
        method: &MethodDescriptor,
        parameter: &ParameterDescriptor,
        body: &mut RequestBodyDescriptor,
    ) {
        for interceptor in &self.request_body_interceptors {
            interceptor.intercept(method, parameter, body);
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("schema_interceptors", &self.schema_interceptors.len())
            .field("field_interceptors", &self.field_interceptors.len())
            .field("operation_interceptors", &self.operation_interceptors.len())
            .field("parameter_interceptors", &self.parameter_interceptors.len())
            .field("request_body_interceptors", &self.request_body_interceptors.len())
            .field("type_filters", &self.type_filters.len())
            .field("operation_filters", &self.operation_filters.len())
            .field("parameter_filters", &self.parameter_filters.len())
            .finish()
    }
}
