use crate::{
    config::GeneratorConfig,
    context::GenerationContext,
    document::{Document, OperationDescriptor},
    endpoints::OperationExtractor,
    error::{ApiGenError, ApiGenResult},
    inheritance::{InheritanceMap, InheritanceResolver},
    interceptor::Pipeline,
    model::{Annotated, TypeDescriptor, TypeGraph},
    namespace::NamespaceMatcher,
    schema::SchemaTransformer,
};
use std::collections::{HashMap, HashSet};

/// Main document generator
pub struct ApiGenerator {
    /// Configuration
    config: GeneratorConfig,
    /// Interceptors and filters
    pipeline: Pipeline,
}

impl ApiGenerator {
    /// Create a new generator with an empty pipeline
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            pipeline: Pipeline::new(),
        }
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build the document for a type graph.
    ///
    /// Any error aborts the whole build; no partial document is returned.
    pub fn generate(&self, graph: &TypeGraph) -> ApiGenResult<Document> {
        let models = NamespaceMatcher::new(&self.config.model_namespaces)?;
        let handlers = NamespaceMatcher::new(&self.config.handler_namespaces)?;

        let candidates = self.scan_models(graph, &models);
        let inheritance = InheritanceResolver::new(graph).resolve(candidates.iter().copied())?;
        tracing::debug!(
            "Scanned {} model types, {} polymorphic bases",
            candidates.len(),
            inheritance.len()
        );

        let ctx = GenerationContext::new(graph, models)
            .with_inheritance(inheritance)
            .with_components(candidates.iter().map(|t| t.name.as_str()))
            .with_root_types(&self.config.root_types);

        let mut document = Document::new(self.config.info.clone());
        self.generate_components(&mut document, &candidates, &ctx)?;

        let mut operations = self.extract_operations(graph, &handlers, &ctx)?;
        deduplicate_operation_ids(&mut operations);
        assemble_paths(&mut document, operations)?;

        for dangling in document.unresolved_references() {
            tracing::warn!(
                "Reference to '{}' in {} has no component",
                dangling.target,
                dangling.location
            );
        }

        Ok(document)
    }

    /// Inheritance map of the scanned model types, without building schemas
    pub fn resolve_inheritance(&self, graph: &TypeGraph) -> ApiGenResult<InheritanceMap> {
        let models = NamespaceMatcher::new(&self.config.model_namespaces)?;
        let candidates = self.scan_models(graph, &models);
        InheritanceResolver::new(graph).resolve(candidates)
    }

    /// Data types inside the model namespaces that pass exclusion and filters
    fn scan_models<'g>(&self, graph: &'g TypeGraph, models: &NamespaceMatcher) -> Vec<&'g TypeDescriptor> {
        graph
            .types()
            .filter(|t| models.contains_type(&t.name) && !t.declares_routes())
            .filter(|t| {
                let included = !t.is_excluded() && self.pipeline.include_type(t);
                if !included {
                    tracing::info!("Skipping excluded type {}", t.name);
                }
                included
            })
            .collect()
    }

    fn generate_components(
        &self,
        document: &mut Document,
        candidates: &[&TypeDescriptor],
        ctx: &GenerationContext<'_>,
    ) -> ApiGenResult<()> {
        let transformer = SchemaTransformer::new(&self.pipeline);
        let mut owners: HashMap<&str, &str> = HashMap::new();

        for descriptor in candidates {
            let component = descriptor.simple_name();
            if let Some(previous) = owners.insert(component, descriptor.name.as_str()) {
                return Err(ApiGenError::configuration_error(format!(
                    "types '{}' and '{}' share the component name '{}'",
                    previous, descriptor.name, component
                )));
            }

            let schema = transformer.transform(descriptor, ctx)?;
            document.components.insert(component.to_string(), schema);
        }
        Ok(())
    }

    fn extract_operations(
        &self,
        graph: &TypeGraph,
        handlers: &NamespaceMatcher,
        ctx: &GenerationContext<'_>,
    ) -> ApiGenResult<Vec<OperationDescriptor>> {
        let extractor = OperationExtractor::new(&self.pipeline)?;
        let mut operations = Vec::new();

        for handler in graph
            .types()
            .filter(|t| handlers.contains_type(&t.name) && t.declares_routes())
        {
            operations.extend(extractor.extract(handler, ctx)?);
        }
        Ok(operations)
    }
}

/// Suffix repeated operation identifiers with `_1`, `_2`, ... in discovery
/// order, skipping suffixed values that are already taken
pub fn deduplicate_operation_ids(operations: &mut [OperationDescriptor]) {
    let mut taken: HashSet<String> = operations.iter().map(|op| op.operation_id.clone()).collect();
    let mut seen: HashSet<String> = HashSet::new();

    for operation in operations.iter_mut() {
        if seen.insert(operation.operation_id.clone()) {
            continue;
        }

        let base = operation.operation_id.clone();
        let mut counter = 1;
        let unique = loop {
            let candidate = format!("{}_{}", base, counter);
            if !taken.contains(&candidate) {
                break candidate;
            }
            counter += 1;
        };

        tracing::debug!("Renamed duplicate operation id {} to {}", base, unique);
        taken.insert(unique.clone());
        seen.insert(unique.clone());
        operation.operation_id = unique;
    }
}

fn assemble_paths(document: &mut Document, operations: Vec<OperationDescriptor>) -> ApiGenResult<()> {
    for operation in operations {
        let methods = document.paths.entry(operation.path.clone()).or_default();
        if let Some(existing) = methods.get(&operation.method) {
            return Err(ApiGenError::configuration_error(format!(
                "{} {} is declared by both '{}' and '{}'",
                operation.method, operation.path, existing.operation_id, operation.operation_id
            )));
        }
        methods.insert(operation.method, operation);
    }
    Ok(())
}
