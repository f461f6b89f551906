use crate::{
    context::GenerationContext,
    error::{ApiGenError, ApiGenResult},
    interceptor::{Pipeline, PropertySchema},
    model::{Annotated, Directive, FieldDescriptor, PrimitiveKind, TemporalKind, TypeDescriptor, TypeRef},
    node::{ComposedNode, Discriminator, NodeKind, ObjectNode, SchemaNode},
};
use std::collections::HashSet;

/// How references to polymorphic base types are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceStyle {
    /// `oneOf` over the subclasses plus a discriminator (component fields)
    Polymorphic,
    /// Plain reference to the base component (operation payloads)
    Direct,
}

/// Superclass handling resolved for one type
#[derive(Debug, Default)]
struct Ancestry<'g> {
    /// Ancestors whose fields are copied into the object, nearest last
    flattened: Vec<&'g TypeDescriptor>,
    /// Component ancestor the object is composed with
    composed_with: Option<&'g TypeDescriptor>,
}

/// Schema transformer for converting type descriptors to component schemas
pub struct SchemaTransformer<'p> {
    pipeline: &'p Pipeline,
}

impl<'p> SchemaTransformer<'p> {
    /// Create a new schema transformer
    pub fn new(pipeline: &'p Pipeline) -> Self {
        Self { pipeline }
    }

    /// Build the component schema of one type
    pub fn transform(
        &self,
        descriptor: &TypeDescriptor,
        ctx: &GenerationContext<'_>,
    ) -> ApiGenResult<SchemaNode> {
        let mut schema = if descriptor.is_enum() {
            SchemaNode::enumeration(descriptor.constants.clone())
        } else {
            self.transform_class(descriptor, ctx)?
        };

        apply_type_directives(&mut schema, descriptor);
        self.pipeline.intercept_schema(ctx, descriptor, &mut schema);

        tracing::debug!("Transformed {} into component {}", descriptor.name, descriptor.simple_name());
        Ok(schema)
    }

    fn transform_class(
        &self,
        descriptor: &TypeDescriptor,
        ctx: &GenerationContext<'_>,
    ) -> ApiGenResult<SchemaNode> {
        let ancestry = resolve_ancestry(descriptor, ctx)?;
        let mut object = ObjectNode::default();

        for ancestor in ancestry.flattened.iter().rev() {
            tracing::debug!("Flattening fields of {} into {}", ancestor.name, descriptor.name);
            self.add_fields(&mut object, ancestor, ctx)?;
        }
        self.add_fields(&mut object, descriptor, ctx)?;

        if let Some(info) = ctx.polymorphic_base(&descriptor.name) {
            let property = info.discriminator_field_name.as_str();
            if !object.properties.contains_key(property) {
                object.properties.insert(property.to_string(), SchemaNode::string());
            }
            object.required.insert(property.to_string());

            let mut discriminator = Discriminator::new(property);
            discriminator.mapping = info.mapping();
            object.discriminator = Some(discriminator);
        }

        let Some(parent) = ancestry.composed_with else {
            return Ok(SchemaNode::object(object));
        };

        Ok(SchemaNode::composed(ComposedNode {
            all_of: vec![
                SchemaNode::reference(parent.simple_name()),
                SchemaNode::object(object),
            ],
            one_of: Vec::new(),
            discriminator: None,
            discriminator_value: subclass_tag(descriptor, ctx),
        }))
    }

    fn add_fields(
        &self,
        object: &mut ObjectNode,
        owner: &TypeDescriptor,
        ctx: &GenerationContext<'_>,
    ) -> ApiGenResult<()> {
        for field in &owner.fields {
            if field.is_static || field.is_ignored() || field.is_excluded() {
                continue;
            }

            let resolved = resolve_type(&field.type_ref, ctx, ReferenceStyle::Polymorphic)
                .map_err(|e| in_field(e, owner, field))?;

            let Some(mut schema) = resolved else {
                tracing::info!(
                    "Skipping field {}.{}: type '{}' has no schema mapping",
                    owner.name,
                    field.name,
                    field.type_ref
                );
                continue;
            };

            apply_field_directives(&mut schema, field);

            let mut property = PropertySchema {
                schema,
                required: field.type_ref.is_structurally_required() || field.is_not_null(),
            };
            self.pipeline.intercept_field(ctx, owner, field, &mut property);

            object.insert_property(&field.name, property.schema, property.required);
        }
        Ok(())
    }
}

/// Map a value type to a schema.
///
/// Returns `Ok(None)` for types that have no schema mapping (`void`,
/// `opaque<..>`); callers skip the element.
pub fn resolve_type(
    type_ref: &TypeRef,
    ctx: &GenerationContext<'_>,
    style: ReferenceStyle,
) -> ApiGenResult<Option<SchemaNode>> {
    let schema = match type_ref {
        TypeRef::Primitive { kind, .. } => primitive_schema(*kind),
        TypeRef::Temporal(TemporalKind::Date) => SchemaNode::formatted_string("date"),
        TypeRef::Temporal(TemporalKind::DateTime) => SchemaNode::formatted_string("date-time"),
        TypeRef::Uuid => SchemaNode::formatted_string("uuid"),
        TypeRef::File => SchemaNode::binary(),
        TypeRef::Void | TypeRef::Opaque(_) => return Ok(None),
        TypeRef::List(element) | TypeRef::Array(element) => {
            if element.is_container() {
                return Err(ApiGenError::unsupported_shape(format!(
                    "nested containers unsupported: '{}'",
                    type_ref
                )));
            }
            match resolve_type(element, ctx, style)? {
                Some(items) => SchemaNode::array(items),
                None => return Ok(None),
            }
        }
        TypeRef::Map(value) => {
            let Some(value_schema) = resolve_type(value, ctx, style)? else {
                return Ok(None);
            };
            SchemaNode::object(ObjectNode {
                additional_properties: Some(Box::new(value_schema)),
                ..Default::default()
            })
        }
        TypeRef::Envelope(inner) => return resolve_type(inner, ctx, style),
        TypeRef::Named(name) => named_schema(name, ctx, style),
    };
    Ok(Some(schema))
}

/// Fixed table shared by boxed and unboxed variants
fn primitive_schema(kind: PrimitiveKind) -> SchemaNode {
    match kind {
        PrimitiveKind::Int32 => SchemaNode::integer("int32"),
        PrimitiveKind::Int64 => SchemaNode::integer("int64"),
        PrimitiveKind::Float => SchemaNode::number("float"),
        PrimitiveKind::Double => SchemaNode::number("double"),
        PrimitiveKind::Boolean => SchemaNode::boolean(),
        PrimitiveKind::String => SchemaNode::string(),
    }
}

fn named_schema(name: &str, ctx: &GenerationContext<'_>, style: ReferenceStyle) -> SchemaNode {
    let Some(target) = ctx.lookup(name).filter(|_| ctx.is_component(name)) else {
        tracing::debug!("Type {} is not a component, using a generic object", name);
        return SchemaNode::generic_object();
    };

    match (style, ctx.polymorphic_base(name)) {
        (ReferenceStyle::Polymorphic, Some(info)) => {
            let mut discriminator = Discriminator::new(&info.discriminator_field_name);
            discriminator.mapping = info.mapping();
            SchemaNode::composed(ComposedNode {
                all_of: Vec::new(),
                one_of: info.subclass_components().map(SchemaNode::reference).collect(),
                discriminator: Some(discriminator),
                discriminator_value: None,
            })
        }
        _ => SchemaNode::reference(target.simple_name()),
    }
}

/// Walk the superclass chain, stopping at root types, component types and
/// types missing from the graph
fn resolve_ancestry<'g>(
    descriptor: &TypeDescriptor,
    ctx: &GenerationContext<'g>,
) -> ApiGenResult<Ancestry<'g>> {
    let mut ancestry = Ancestry::default();
    let mut visited = HashSet::from([descriptor.name.as_str()]);
    let mut current = descriptor.superclass.as_deref();

    while let Some(name) = current {
        if ctx.is_root_type(name) {
            break;
        }
        if !visited.insert(name) {
            return Err(ApiGenError::configuration_error(format!(
                "superclass cycle through '{}' while resolving '{}'",
                name, descriptor.name
            )));
        }
        let Some(parent) = ctx.lookup(name) else {
            tracing::debug!("Superclass {} of {} is not in the type graph", name, descriptor.name);
            break;
        };
        if ctx.is_component(name) {
            ancestry.composed_with = Some(parent);
            break;
        }
        ancestry.flattened.push(parent);
        current = parent.superclass.as_deref();
    }

    Ok(ancestry)
}

/// Discriminator value of a type under any polymorphic base
fn subclass_tag(descriptor: &TypeDescriptor, ctx: &GenerationContext<'_>) -> Option<String> {
    ctx.inheritance
        .as_ref()?
        .iter()
        .find_map(|(_, info)| info.tag_of(&descriptor.name))
        .map(str::to_string)
}

fn in_field(error: ApiGenError, owner: &TypeDescriptor, field: &FieldDescriptor) -> ApiGenError {
    match error {
        ApiGenError::UnsupportedShape(message) => ApiGenError::unsupported_shape(format!(
            "field {}.{}: {}",
            owner.name, field.name, message
        )),
        other => other,
    }
}

fn apply_type_directives(schema: &mut SchemaNode, descriptor: &TypeDescriptor) {
    if let Some(description) = descriptor.description() {
        if description.description.is_some() {
            schema.description = description.description.clone();
        }
    }
    if descriptor.is_deprecated() {
        schema.deprecated = true;
    }
}

/// Apply bound, pattern and descriptive directives of a field to its schema
pub(crate) fn apply_field_directives<A: Annotated>(schema: &mut SchemaNode, element: &A) {
    for directive in element.directives() {
        match directive {
            Directive::Min { value } => {
                if let NodeKind::Number(number) = &mut schema.kind {
                    number.minimum = Some(*value);
                }
            }
            Directive::Max { value } => {
                if let NodeKind::Number(number) = &mut schema.kind {
                    number.maximum = Some(*value);
                }
            }
            Directive::Size { min, max } => match &mut schema.kind {
                NodeKind::String(string) => {
                    string.min_length = *min;
                    string.max_length = *max;
                }
                NodeKind::Array(array) => {
                    array.min_items = *min;
                    array.max_items = *max;
                }
                _ => {}
            },
            Directive::Pattern { regex } => {
                if let NodeKind::String(string) = &mut schema.kind {
                    string.pattern = Some(regex.clone());
                }
            }
            Directive::Describe(description) => {
                if description.description.is_some() {
                    schema.description = description.description.clone();
                }
                if description.access.is_some() {
                    schema.access = description.access;
                }
                schema.deprecated |= description.deprecated;
            }
            Directive::Deprecated => schema.deprecated = true,
            _ => {}
        }
    }
}
