//! Shared fixtures for unit tests

use crate::{
    config::GeneratorConfig,
    context::GenerationContext,
    document::HttpMethod,
    inheritance::InheritanceResolver,
    model::{
        Binding, Directive, FieldDescriptor, MethodDescriptor, ParameterDescriptor, PrimitiveKind,
        Route, SubtypeDecl, TypeDescriptor, TypeGraph, TypeRef,
    },
    namespace::NamespaceMatcher,
};

/// Configuration scanning `shop.model` and `shop.api`
pub fn create_test_config() -> GeneratorConfig {
    GeneratorConfig::new("Shop API", "1.0.0")
        .with_description("Test shop")
        .with_model_namespace("shop.model")
        .with_handler_namespace("shop.api")
}

fn subtype(name: &str, tag: &str) -> SubtypeDecl {
    SubtypeDecl {
        type_name: name.to_string(),
        tag: Some(tag.to_string()),
    }
}

/// Product with Car/Laptop subclasses on property `type`, plus a Cart
/// holding a list of products
pub fn product_types() -> Vec<TypeDescriptor> {
    vec![
        TypeDescriptor::class("shop.model.Product")
            .with_directive(Directive::Polymorphic {
                property: None,
                subtypes: vec![
                    subtype("shop.model.Car", "car"),
                    subtype("shop.model.Laptop", "laptop"),
                ],
            })
            .with_field(FieldDescriptor::new("price", TypeRef::primitive(PrimitiveKind::Double)))
            .with_field(FieldDescriptor::new("amount", TypeRef::primitive(PrimitiveKind::Int32))),
        TypeDescriptor::class("shop.model.Car")
            .with_superclass("shop.model.Product")
            .with_field(FieldDescriptor::new("torque", TypeRef::boxed(PrimitiveKind::Int32)))
            .with_field(FieldDescriptor::new("model", TypeRef::string())),
        TypeDescriptor::class("shop.model.Laptop")
            .with_superclass("shop.model.Product")
            .with_field(FieldDescriptor::new("model", TypeRef::string()))
            .with_field(FieldDescriptor::new("hasWifi", TypeRef::primitive(PrimitiveKind::Boolean))),
        TypeDescriptor::class("shop.model.Cart").with_field(FieldDescriptor::new(
            "items",
            TypeRef::list(TypeRef::named("shop.model.Product")),
        )),
    ]
}

pub fn product_graph() -> TypeGraph {
    TypeGraph::new(product_types()).unwrap()
}

/// Handler with `GET /cars/{carId}` and `POST /cars`
pub fn car_controller() -> TypeDescriptor {
    TypeDescriptor::class("shop.api.CarController")
        .with_directive(Directive::Route(Route::base("/cars/")))
        .with_method(
            MethodDescriptor::new("getCar")
                .with_directive(Directive::Route(Route::new("/{carId}", &[HttpMethod::GET])))
                .with_parameter(ParameterDescriptor::bound(
                    "carId",
                    TypeRef::primitive(PrimitiveKind::Int64),
                    Binding::path(),
                ))
                .with_return_type(TypeRef::named("shop.model.Car")),
        )
        .with_method(
            MethodDescriptor::new("addProducts")
                .with_directive(Directive::Route(Route::new("/", &[HttpMethod::POST])))
                .with_directive(Directive::ResponseStatus { code: 201 })
                .with_parameter(ParameterDescriptor::bound(
                    "products",
                    TypeRef::list(TypeRef::named("shop.model.Product")),
                    Binding::body(),
                )),
        )
}

/// Product types plus the car controller
pub fn shop_graph() -> TypeGraph {
    let mut types = product_types();
    types.push(car_controller());
    TypeGraph::new(types).unwrap()
}

/// Context over `namespaces` with the inheritance map already resolved
pub fn context_for<'g>(graph: &'g TypeGraph, namespaces: &[&str]) -> GenerationContext<'g> {
    let patterns: Vec<String> = namespaces.iter().map(|n| n.to_string()).collect();
    let matcher = NamespaceMatcher::new(&patterns).unwrap();
    let inheritance = InheritanceResolver::new(graph)
        .resolve(graph.types().filter(|t| matcher.contains_type(&t.name)))
        .unwrap();

    GenerationContext::new(graph, matcher)
        .with_inheritance(inheritance)
        .with_root_types(GeneratorConfig::default().root_types)
}
