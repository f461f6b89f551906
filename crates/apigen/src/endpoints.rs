/*!
Operation extraction from handler types.

A handler type may carry a base route; each of its methods carrying a route
directive becomes one operation per declared path and verb. Parameters,
request body and responses are resolved once per method and shared by all of
its operations.
*/

use crate::{
    context::GenerationContext,
    document::{
        reason_phrase, HeaderDescriptor, OperationDescriptor, OperationParameter,
        ParameterLocation, RequestBodyDescriptor, ResponseDescriptor,
    },
    error::{ApiGenError, ApiGenResult},
    interceptor::Pipeline,
    model::{
        Annotated, BindingLocation, MethodDescriptor, ParameterDescriptor, Route, TypeDescriptor,
        TypeRef,
    },
    node::{ObjectNode, SchemaNode},
    schema::{apply_field_directives, resolve_type, ReferenceStyle},
};
use indexmap::IndexMap;
use regex::Regex;

const DEFAULT_STATUS: u16 = 200;
const JSON: &str = "application/json";
const OCTET_STREAM: &str = "application/octet-stream";
const MULTIPART: &str = "multipart/form-data";

/// Operation extractor for handler types
pub struct OperationExtractor<'p> {
    pipeline: &'p Pipeline,
    /// Path variable regex
    path_param_regex: Regex,
}

impl<'p> OperationExtractor<'p> {
    /// Create a new operation extractor
    pub fn new(pipeline: &'p Pipeline) -> ApiGenResult<Self> {
        Ok(Self {
            pipeline,
            path_param_regex: Regex::new(r"\{([^}/]+)\}").map_err(|e| {
                ApiGenError::configuration_error(format!("Failed to compile regex: {}", e))
            })?,
        })
    }

    /// Extract every operation declared by a handler type, in declaration order
    pub fn extract(
        &self,
        handler: &TypeDescriptor,
        ctx: &GenerationContext<'_>,
    ) -> ApiGenResult<Vec<OperationDescriptor>> {
        if handler.is_excluded() {
            tracing::info!("Skipping excluded handler {}", handler.name);
            return Ok(Vec::new());
        }

        let base_path = base_path(handler)?;
        let tag = handler
            .tag()
            .map(str::to_string)
            .unwrap_or_else(|| kebab_case(handler.simple_name()));

        let mut operations = Vec::new();
        for method in &handler.methods {
            let Some(route) = method.route() else {
                continue;
            };
            if method.is_excluded() || !self.pipeline.include_operation(handler, method) {
                tracing::info!("Skipping excluded method {}.{}", handler.name, method.name);
                continue;
            }
            operations.extend(self.extract_method(handler, method, route, base_path, &tag, ctx)?);
        }

        Ok(operations)
    }

    fn extract_method(
        &self,
        handler: &TypeDescriptor,
        method: &MethodDescriptor,
        route: &Route,
        base_path: &str,
        tag: &str,
        ctx: &GenerationContext<'_>,
    ) -> ApiGenResult<Vec<OperationDescriptor>> {
        if route.methods.is_empty() {
            return Err(ApiGenError::configuration_error(format!(
                "route on {}.{} declares no HTTP methods",
                handler.name, method.name
            )));
        }

        let body_parameter = self.body_parameter(method)?;
        let parameters = self.parameters(method, body_parameter, ctx)?;
        let request_body = match body_parameter {
            Some(parameter) => self.request_body(method, parameter, route, ctx)?,
            None => None,
        };
        let responses = responses(method, route, ctx)?;

        let description = method.description().and_then(|d| d.description.clone());
        let deprecated = method.is_deprecated() || handler.is_deprecated();

        let method_paths: Vec<&str> = if route.paths.is_empty() {
            vec![""]
        } else {
            route.paths.iter().map(String::as_str).collect()
        };

        let mut operations = Vec::new();
        for method_path in method_paths {
            let path = prepare_url(&[base_path, method_path]);
            self.warn_unbound_variables(&path, &parameters, handler, method);

            for verb in &route.methods {
                let operation_id = route
                    .name
                    .clone()
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| format!("{}Using{}", method.name, verb));

                let mut operation = OperationDescriptor {
                    method: *verb,
                    path: path.clone(),
                    operation_id,
                    tag: tag.to_string(),
                    summary: None,
                    description: description.clone(),
                    deprecated,
                    parameters: parameters.clone(),
                    request_body: request_body.clone(),
                    responses: responses.clone(),
                };
                self.pipeline.intercept_operation(handler, method, &mut operation);

                tracing::debug!(
                    "Extracted {} {} ({}) from {}.{}",
                    operation.method,
                    operation.path,
                    operation.operation_id,
                    handler.name,
                    method.name
                );
                operations.push(operation);
            }
        }

        Ok(operations)
    }

    /// Path, query and header parameters, in declaration order.
    ///
    /// The parameter chosen as request body is never a parameter too.
    fn parameters(
        &self,
        method: &MethodDescriptor,
        body_parameter: Option<&ParameterDescriptor>,
        ctx: &GenerationContext<'_>,
    ) -> ApiGenResult<Vec<OperationParameter>> {
        let mut parameters = Vec::new();

        for parameter in &method.parameters {
            if body_parameter.is_some_and(|body| std::ptr::eq(body, parameter)) {
                continue;
            }
            let Some(binding) = parameter.binding() else {
                continue;
            };
            let location = match binding.location {
                BindingLocation::Path => ParameterLocation::Path,
                BindingLocation::Query => ParameterLocation::Query,
                BindingLocation::Header => ParameterLocation::Header,
                BindingLocation::Body => continue,
            };
            if !self.include_parameter(method, parameter) {
                continue;
            }

            let Some(mut schema) = resolve_type(&parameter.type_ref, ctx, ReferenceStyle::Direct)
                .map_err(|e| in_parameter(e, method, parameter))?
            else {
                tracing::info!(
                    "Skipping parameter {} of {}: type '{}' has no schema mapping",
                    parameter.name,
                    method.name,
                    parameter.type_ref
                );
                continue;
            };
            apply_field_directives(&mut schema, parameter);

            let mut produced = OperationParameter {
                name: binding.resolve_name(&parameter.name).to_string(),
                location,
                required: binding.is_required(),
                description: schema.description.take(),
                deprecated: std::mem::take(&mut schema.deprecated),
                schema,
            };
            self.pipeline.intercept_parameter(method, parameter, &mut produced);
            parameters.push(produced);
        }

        Ok(parameters)
    }

    /// The body-bound parameter, else the first file-like parameter whatever
    /// its binding
    fn body_parameter<'m>(
        &self,
        method: &'m MethodDescriptor,
    ) -> ApiGenResult<Option<&'m ParameterDescriptor>> {
        let bodies: Vec<&ParameterDescriptor> = method
            .parameters
            .iter()
            .filter(|p| matches!(p.binding(), Some(b) if b.location == BindingLocation::Body))
            .filter(|p| self.include_parameter(method, p))
            .collect();

        if bodies.len() > 1 {
            return Err(ApiGenError::unsupported_shape(format!(
                "method {} binds {} parameters to the request body",
                method.name,
                bodies.len()
            )));
        }

        Ok(bodies.first().copied().or_else(|| {
            method
                .parameters
                .iter()
                .filter(|p| p.type_ref.is_file_like())
                .find(|p| self.include_parameter(method, p))
        }))
    }

    fn request_body(
        &self,
        method: &MethodDescriptor,
        parameter: &ParameterDescriptor,
        route: &Route,
        ctx: &GenerationContext<'_>,
    ) -> ApiGenResult<Option<RequestBodyDescriptor>> {
        let (mut schema, default_content_type) = match &parameter.type_ref {
            TypeRef::File => (SchemaNode::binary(), OCTET_STREAM),
            file_container if file_container.is_file_like() => {
                let name = parameter
                    .binding()
                    .map(|b| b.resolve_name(&parameter.name))
                    .unwrap_or(parameter.name.as_str());
                let mut object = ObjectNode::default();
                object.insert_property(name, SchemaNode::array(SchemaNode::binary()), false);
                (SchemaNode::object(object), MULTIPART)
            }
            other => {
                let resolved = resolve_type(other, ctx, ReferenceStyle::Direct)
                    .map_err(|e| in_parameter(e, method, parameter))?;
                let Some(schema) = resolved else {
                    tracing::info!(
                        "Skipping request body of {}: type '{}' has no schema mapping",
                        method.name,
                        other
                    );
                    return Ok(None);
                };
                (schema, JSON)
            }
        };
        apply_field_directives(&mut schema, parameter);

        let mut body = RequestBodyDescriptor {
            content_type: route
                .consumes
                .clone()
                .unwrap_or_else(|| default_content_type.to_string()),
            required: parameter.binding().map(|b| b.is_required()).unwrap_or(true),
            description: schema.description.take(),
            schema,
        };
        self.pipeline.intercept_request_body(method, parameter, &mut body);
        Ok(Some(body))
    }

    fn include_parameter(&self, method: &MethodDescriptor, parameter: &ParameterDescriptor) -> bool {
        if parameter.is_excluded() || !self.pipeline.include_parameter(method, parameter) {
            tracing::info!("Skipping excluded parameter {} of {}", parameter.name, method.name);
            return false;
        }
        true
    }

    fn warn_unbound_variables(
        &self,
        path: &str,
        parameters: &[OperationParameter],
        handler: &TypeDescriptor,
        method: &MethodDescriptor,
    ) {
        for capture in self.path_param_regex.captures_iter(path) {
            let variable = &capture[1];
            let bound = parameters
                .iter()
                .any(|p| p.location == ParameterLocation::Path && p.name == variable);
            if !bound {
                tracing::warn!(
                    "Path variable '{}' of {} has no bound parameter on {}.{}",
                    variable,
                    path,
                    handler.name,
                    method.name
                );
            }
        }
    }
}

/// Responses of a method: the explicit declarations, or one default response
fn responses(
    method: &MethodDescriptor,
    route: &Route,
    ctx: &GenerationContext<'_>,
) -> ApiGenResult<IndexMap<u16, ResponseDescriptor>> {
    let content_type = route.produces.as_deref().unwrap_or(JSON);
    let mut responses = IndexMap::new();

    let Some(entries) = method.responses() else {
        let code = method.response_status().unwrap_or(DEFAULT_STATUS);
        let schema = resolve_type(&method.returns, ctx, ReferenceStyle::Direct)?;
        responses.insert(
            code,
            ResponseDescriptor {
                description: reason_phrase(code).to_string(),
                content_type: schema.as_ref().map(|_| content_type.to_string()),
                schema,
                headers: IndexMap::new(),
            },
        );
        return Ok(responses);
    };

    for entry in entries {
        let schema = match &entry.body {
            Some(body) => resolve_type(body, ctx, ReferenceStyle::Direct)?,
            None => None,
        };

        let mut headers = IndexMap::new();
        for (name, header) in &entry.headers {
            let schema = resolve_type(&header.type_ref, ctx, ReferenceStyle::Direct)?
                .unwrap_or_else(SchemaNode::string);
            headers.insert(
                name.clone(),
                HeaderDescriptor {
                    description: header.description.clone(),
                    schema,
                },
            );
        }

        let response = ResponseDescriptor {
            description: entry
                .description
                .clone()
                .unwrap_or_else(|| reason_phrase(entry.code).to_string()),
            content_type: schema.as_ref().map(|_| content_type.to_string()),
            schema,
            headers,
        };
        if responses.insert(entry.code, response).is_some() {
            return Err(ApiGenError::configuration_error(format!(
                "method {} declares response {} more than once",
                method.name, entry.code
            )));
        }
    }

    Ok(responses)
}

fn base_path(handler: &TypeDescriptor) -> ApiGenResult<&str> {
    let Some(route) = handler.route() else {
        return Ok("");
    };
    match route.paths.as_slice() {
        [] => Ok(""),
        [path] => Ok(path),
        paths => Err(ApiGenError::configuration_error(format!(
            "handler {} declares an ambiguous base path: {:?}",
            handler.name, paths
        ))),
    }
}

fn in_parameter(
    error: ApiGenError,
    method: &MethodDescriptor,
    parameter: &ParameterDescriptor,
) -> ApiGenError {
    match error {
        ApiGenError::UnsupportedShape(message) => ApiGenError::unsupported_shape(format!(
            "parameter {} of {}: {}",
            parameter.name, method.name, message
        )),
        other => other,
    }
}

/// Join path segments into a canonical path.
///
/// Repeated separators collapse, `{name:regex}` becomes `{name}`, characters
/// outside the path-safe set are dropped and a trailing separator is removed.
pub fn prepare_url(segments: &[&str]) -> String {
    let joined = strip_variable_patterns(&segments.join("/"));

    let mut path = String::with_capacity(joined.len() + 1);
    path.push('/');
    for c in joined.chars().filter(|c| is_path_safe(*c)) {
        if c == '/' && path.ends_with('/') {
            continue;
        }
        path.push(c);
    }

    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    path
}

fn is_path_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '{' | '}' | '-' | '_' | '.' | '~')
}

/// `{id:[0-9]{3}}` -> `{id}`
fn strip_variable_patterns(path: &str) -> String {
    let mut stripped = String::with_capacity(path.len());
    let mut depth = 0usize;
    let mut in_pattern = false;

    for c in path.chars() {
        match c {
            '{' => {
                depth += 1;
                if depth == 1 {
                    stripped.push(c);
                }
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    in_pattern = false;
                    stripped.push(c);
                }
            }
            ':' if depth == 1 => in_pattern = true,
            _ if in_pattern || depth > 1 => {}
            _ => stripped.push(c),
        }
    }
    stripped
}

/// `CarController` -> `car-controller`
pub fn kebab_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut kebab = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let previous = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if previous.is_lowercase()
                || previous.is_ascii_digit()
                || (previous.is_uppercase() && next_is_lower)
            {
                kebab.push('-');
            }
        }
        kebab.extend(c.to_lowercase());
    }
    kebab
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HttpMethod;
    use crate::model::{Binding, Description, Directive, HeaderDecl, PrimitiveKind, ResponseDecl, TypeGraph};
    use crate::test_utils::{car_controller, context_for, product_graph};

    fn extract(handler: &TypeDescriptor) -> ApiGenResult<Vec<OperationDescriptor>> {
        let graph = product_graph();
        let ctx = context_for(&graph, &["shop.model"]);
        let pipeline = Pipeline::new();
        OperationExtractor::new(&pipeline)?.extract(handler, &ctx)
    }

    fn handler(method: MethodDescriptor) -> TypeDescriptor {
        TypeDescriptor::class("shop.api.PhotoController")
            .with_directive(Directive::Route(Route::base("/photos")))
            .with_method(method)
    }

    #[test]
    fn test_prepare_url() {
        assert_eq!(prepare_url(&["/cars/", "/", "/{carId}/photos"]), "/cars/{carId}/photos");
        assert_eq!(prepare_url(&["cars", "{carId}"]), "/cars/{carId}");
        assert_eq!(prepare_url(&["", ""]), "/");
        assert_eq!(prepare_url(&["/cars", "/{id:[0-9]{3}}/"]), "/cars/{id}");
        assert_eq!(prepare_url(&["/ca rs?", "/x#y"]), "/cars/xy");

        let once = prepare_url(&["//a//", "//b//"]);
        assert_eq!(prepare_url(&[once.as_str()]), once);
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("CarController"), "car-controller");
        assert_eq!(kebab_case("HTTPClient"), "http-client");
        assert_eq!(kebab_case("V2Api"), "v2-api");
        assert_eq!(kebab_case("cars"), "cars");
    }

    #[test]
    fn test_get_car_by_id() {
        let operations = extract(&car_controller()).unwrap();
        let get = operations
            .iter()
            .find(|op| op.path == "/cars/{carId}" && op.method == HttpMethod::GET)
            .unwrap();

        assert_eq!(get.operation_id, "getCarUsingGET");
        assert_eq!(get.tag, "car-controller");
        assert_eq!(get.parameters.len(), 1);
        assert_eq!(get.parameters[0].name, "carId");
        assert_eq!(get.parameters[0].location, ParameterLocation::Path);
        assert!(get.parameters[0].required);
        assert!(get.request_body.is_none());

        let ok = &get.responses[&200];
        assert_eq!(ok.description, "OK");
        assert_eq!(ok.schema, Some(SchemaNode::reference("Car")));
    }

    #[test]
    fn test_list_body_references_base_component() {
        let operations = extract(&car_controller()).unwrap();
        let post = operations
            .iter()
            .find(|op| op.method == HttpMethod::POST)
            .unwrap();

        let body = post.request_body.as_ref().unwrap();
        assert_eq!(body.content_type, "application/json");
        assert_eq!(body.schema, SchemaNode::array(SchemaNode::reference("Product")));
        assert_eq!(post.responses[&201].description, "Created");
    }

    #[test]
    fn test_multiple_verbs_and_paths() {
        let method = MethodDescriptor::new("save").with_directive(Directive::Route(Route {
            paths: vec!["/a".into(), "/b".into()],
            methods: vec![HttpMethod::PUT, HttpMethod::PATCH],
            ..Default::default()
        }));
        let operations = extract(&handler(method)).unwrap();

        let keys: Vec<(String, HttpMethod)> = operations.iter().map(|op| (op.path.clone(), op.method)).collect();
        assert_eq!(
            keys,
            vec![
                ("/photos/a".to_string(), HttpMethod::PUT),
                ("/photos/a".to_string(), HttpMethod::PATCH),
                ("/photos/b".to_string(), HttpMethod::PUT),
                ("/photos/b".to_string(), HttpMethod::PATCH),
            ]
        );
        assert_eq!(operations[1].operation_id, "saveUsingPATCH");
    }

    #[test]
    fn test_empty_verb_list_is_error() {
        let method = MethodDescriptor::new("noop").with_directive(Directive::Route(Route::new("/x", &[])));
        let err = extract(&handler(method)).unwrap_err();
        assert!(matches!(err, ApiGenError::Configuration(_)));
    }

    #[test]
    fn test_ambiguous_base_path_is_error() {
        let handler = TypeDescriptor::class("shop.api.Bad")
            .with_directive(Directive::Route(Route {
                paths: vec!["/a".into(), "/b".into()],
                ..Default::default()
            }))
            .with_method(MethodDescriptor::new("x").with_directive(Directive::Route(Route::new(
                "/",
                &[HttpMethod::GET],
            ))));
        assert!(matches!(extract(&handler).unwrap_err(), ApiGenError::Configuration(_)));
    }

    #[test]
    fn test_parameter_classification_and_names() {
        let method = MethodDescriptor::new("search")
            .with_directive(Directive::Route(Route::new("/search", &[HttpMethod::GET])))
            .with_parameter(ParameterDescriptor::bound(
                "limit",
                TypeRef::boxed(PrimitiveKind::Int32),
                Binding::query().with_value("max").with_required(false),
            ))
            .with_parameter(ParameterDescriptor::bound(
                "token",
                TypeRef::string(),
                Binding::header().with_name("X-Token").with_value("ignored"),
            ))
            .with_parameter(ParameterDescriptor::new("request", TypeRef::named("javax.Request")))
            .with_parameter(
                ParameterDescriptor::bound("debug", TypeRef::string(), Binding::query())
                    .with_directive(Directive::Exclude),
            );

        let operations = extract(&handler(method)).unwrap();
        let parameters = &operations[0].parameters;
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters[0].name, "max");
        assert_eq!(parameters[0].location, ParameterLocation::Query);
        assert!(!parameters[0].required);
        assert_eq!(parameters[1].name, "X-Token");
        assert_eq!(parameters[1].location, ParameterLocation::Header);
        assert!(parameters[1].required);
    }

    #[test]
    fn test_parameter_description_moves_off_schema() {
        let method = MethodDescriptor::new("find")
            .with_directive(Directive::Route(Route::new("/{id}", &[HttpMethod::GET])))
            .with_parameter(
                ParameterDescriptor::bound("id", TypeRef::primitive(PrimitiveKind::Int64), Binding::path())
                    .with_directive(Directive::Describe(Description {
                        description: Some("Photo id".into()),
                        deprecated: true,
                        access: None,
                    })),
            );

        let operations = extract(&handler(method)).unwrap();
        let parameter = &operations[0].parameters[0];
        assert_eq!(parameter.description.as_deref(), Some("Photo id"));
        assert!(parameter.deprecated);
        assert_eq!(parameter.schema, SchemaNode::integer("int64"));
    }

    #[test]
    fn test_file_bodies() {
        let single = MethodDescriptor::new("upload")
            .with_directive(Directive::Route(Route::new("/", &[HttpMethod::POST])))
            .with_parameter(ParameterDescriptor::new("file", TypeRef::File));
        let operations = extract(&handler(single)).unwrap();
        let body = operations[0].request_body.as_ref().unwrap();
        assert_eq!(body.content_type, "application/octet-stream");
        assert_eq!(body.schema, SchemaNode::binary());

        let many = MethodDescriptor::new("uploadAll")
            .with_directive(Directive::Route(Route::new("/batch", &[HttpMethod::POST])))
            .with_parameter(ParameterDescriptor::new("files", TypeRef::list(TypeRef::File)));
        let operations = extract(&handler(many)).unwrap();
        let body = operations[0].request_body.as_ref().unwrap();
        assert_eq!(body.content_type, "multipart/form-data");
        let object = body.schema.as_object().unwrap();
        assert_eq!(object.properties["files"], SchemaNode::array(SchemaNode::binary()));
    }

    #[test]
    fn test_bound_file_becomes_body() {
        let single = MethodDescriptor::new("upload")
            .with_directive(Directive::Route(Route::new("/", &[HttpMethod::POST])))
            .with_parameter(ParameterDescriptor::bound("file", TypeRef::File, Binding::query()))
            .with_parameter(ParameterDescriptor::bound("album", TypeRef::string(), Binding::query()));
        let operations = extract(&handler(single)).unwrap();
        let operation = &operations[0];

        let body = operation.request_body.as_ref().unwrap();
        assert_eq!(body.content_type, "application/octet-stream");
        assert_eq!(body.schema, SchemaNode::binary());
        let names: Vec<&str> = operation.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["album"]);

        let many = MethodDescriptor::new("uploadAll")
            .with_directive(Directive::Route(Route::new("/batch", &[HttpMethod::POST])))
            .with_parameter(ParameterDescriptor::bound(
                "files",
                TypeRef::list(TypeRef::File),
                Binding::query().with_name("attachments").with_required(false),
            ));
        let operations = extract(&handler(many)).unwrap();
        assert!(operations[0].parameters.is_empty());
        let body = operations[0].request_body.as_ref().unwrap();
        assert_eq!(body.content_type, "multipart/form-data");
        assert!(!body.required);
        let object = body.schema.as_object().unwrap();
        assert_eq!(object.properties["attachments"], SchemaNode::array(SchemaNode::binary()));
    }

    #[test]
    fn test_two_body_bindings_is_error() {
        let method = MethodDescriptor::new("merge")
            .with_directive(Directive::Route(Route::new("/", &[HttpMethod::POST])))
            .with_parameter(ParameterDescriptor::bound("a", TypeRef::string(), Binding::body()))
            .with_parameter(ParameterDescriptor::bound("b", TypeRef::string(), Binding::body()));
        assert!(matches!(
            extract(&handler(method)).unwrap_err(),
            ApiGenError::UnsupportedShape(_)
        ));
    }

    #[test]
    fn test_explicit_responses_and_envelope_unwrap() {
        let mut headers = IndexMap::new();
        headers.insert(
            "Location".to_string(),
            HeaderDecl {
                description: Some("New resource".into()),
                type_ref: TypeRef::string(),
            },
        );
        let declared = MethodDescriptor::new("create")
            .with_directive(Directive::Route(Route::new("/", &[HttpMethod::POST])))
            .with_directive(Directive::Responses {
                entries: vec![
                    ResponseDecl {
                        code: 201,
                        description: None,
                        body: Some(TypeRef::named("shop.model.Car")),
                        headers,
                    },
                    ResponseDecl {
                        code: 404,
                        description: Some("No such photo".into()),
                        body: None,
                        headers: IndexMap::new(),
                    },
                ],
            });
        let operations = extract(&handler(declared)).unwrap();
        let responses = &operations[0].responses;
        assert_eq!(responses.keys().copied().collect::<Vec<_>>(), vec![201, 404]);
        assert_eq!(responses[&201].description, "Created");
        assert_eq!(responses[&201].headers["Location"].schema, SchemaNode::string());
        assert_eq!(responses[&404].description, "No such photo");
        assert!(responses[&404].schema.is_none());
        assert!(responses[&404].content_type.is_none());

        let wrapped = MethodDescriptor::new("all")
            .with_directive(Directive::Route(Route::new("/all", &[HttpMethod::GET])))
            .with_return_type("envelope<list<shop.model.Car>>".parse().unwrap());
        let operations = extract(&handler(wrapped)).unwrap();
        assert_eq!(
            operations[0].responses[&200].schema,
            Some(SchemaNode::array(SchemaNode::reference("Car")))
        );
    }

    #[test]
    fn test_void_return_has_no_content() {
        let method = MethodDescriptor::new("remove")
            .with_directive(Directive::Route(Route::new("/{id}", &[HttpMethod::DELETE])))
            .with_directive(Directive::ResponseStatus { code: 204 })
            .with_parameter(ParameterDescriptor::bound("id", TypeRef::string(), Binding::path()));
        let operations = extract(&handler(method)).unwrap();
        let response = &operations[0].responses[&204];
        assert_eq!(response.description, "No Content");
        assert!(response.schema.is_none());
    }

    #[test]
    fn test_excluded_method_and_filter() {
        let graph = TypeGraph::default();
        let ctx = context_for(&graph, &[]);
        let pipeline = Pipeline::new()
            .with_operation_filter(|_: &TypeDescriptor, m: &MethodDescriptor| m.name != "secret");
        let extractor = OperationExtractor::new(&pipeline).unwrap();

        let handler = TypeDescriptor::class("shop.api.Admin")
            .with_method(
                MethodDescriptor::new("hidden")
                    .with_directive(Directive::Route(Route::new("/hidden", &[HttpMethod::GET])))
                    .with_directive(Directive::Exclude),
            )
            .with_method(
                MethodDescriptor::new("secret")
                    .with_directive(Directive::Route(Route::new("/secret", &[HttpMethod::GET]))),
            )
            .with_method(
                MethodDescriptor::new("visible")
                    .with_directive(Directive::Route(Route::new("/visible", &[HttpMethod::GET]))),
            )
            .with_method(MethodDescriptor::new("helper"));

        let operations = extractor.extract(&handler, &ctx).unwrap();
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].path, "/visible");
        assert_eq!(operations[0].tag, "admin");
    }

    #[test]
    fn test_excluded_handler_yields_nothing() {
        let handler = car_controller().with_directive(Directive::Exclude);
        assert!(extract(&handler).unwrap().is_empty());

        let operations = extract(&car_controller()).unwrap();
        assert_eq!(operations.len(), 2);
    }

    #[test]
    fn test_tag_directive_and_explicit_name() {
        let handler = TypeDescriptor::class("shop.api.Things")
            .with_directive(Directive::Tag { name: "inventory".into() })
            .with_method(MethodDescriptor::new("list").with_directive(Directive::Route(
                Route::new("/things", &[HttpMethod::GET]).with_name("listThings"),
            )));
        let operations = extract(&handler).unwrap();
        assert_eq!(operations[0].tag, "inventory");
        assert_eq!(operations[0].operation_id, "listThings");
    }
}
