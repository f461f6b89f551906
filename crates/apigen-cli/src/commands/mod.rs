pub mod generate;
pub mod inspect;

use anyhow::Context;
use apigen::{ApiGenUtils, GeneratorConfig, TypeGraph};
use std::path::Path;

/// Load the configuration and type graph shared by every command
pub fn load_inputs(config: &Path, graph: &Path) -> anyhow::Result<(GeneratorConfig, TypeGraph)> {
    let config = GeneratorConfig::from_file(config)
        .with_context(|| format!("Failed to load configuration {}", config.display()))?;
    let graph = ApiGenUtils::load_graph_from_file(graph)
        .with_context(|| format!("Failed to load type graph {}", graph.display()))?;

    tracing::debug!(
        "Loaded {} types; models {:?}, handlers {:?}",
        graph.len(),
        config.model_namespaces,
        config.handler_namespaces
    );
    Ok((config, graph))
}
