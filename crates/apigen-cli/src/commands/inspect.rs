use super::load_inputs;
use anyhow::Context;
use apigen::{ApiGenerator, Document, InheritanceMap};
use serde_json::{json, Value};
use std::path::Path;

/// Print what the generator scanned, for debugging declarations
pub fn run(config_path: &Path, graph_path: &Path, as_json: bool) -> anyhow::Result<()> {
    let (config, graph) = load_inputs(config_path, graph_path)?;
    let generator = ApiGenerator::new(config);

    let inheritance = generator
        .resolve_inheritance(&graph)
        .context("Failed to resolve polymorphic declarations")?;
    let document = generator
        .generate(&graph)
        .context("OpenAPI generation failed")?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report(&document, &inheritance))?);
        return Ok(());
    }

    println!("📦 Components ({}):", document.components.len());
    for name in document.components.keys() {
        println!("   {}", name);
    }

    println!("🧬 Polymorphic bases ({}):", inheritance.len());
    for (base, info) in inheritance.iter() {
        println!("   {} on '{}'", base, info.discriminator_field_name);
        for (subclass, tag) in &info.discriminator_class_map {
            println!("      {} -> {}", tag, subclass);
        }
    }

    println!("🛣️  Operations ({}):", document.operations().count());
    for operation in document.operations() {
        println!(
            "   {:7} {} ({})",
            operation.method.to_string(),
            operation.path,
            operation.operation_id
        );
    }

    Ok(())
}

fn report(document: &Document, inheritance: &InheritanceMap) -> Value {
    let bases: serde_json::Map<String, Value> = inheritance
        .iter()
        .map(|(base, info)| {
            (
                base.to_string(),
                json!({
                    "property": info.discriminator_field_name,
                    "subclasses": info.discriminator_class_map,
                }),
            )
        })
        .collect();

    let operations: Vec<Value> = document
        .operations()
        .map(|operation| {
            json!({
                "method": operation.method.to_string(),
                "path": operation.path,
                "operationId": operation.operation_id,
                "tag": operation.tag,
            })
        })
        .collect();

    json!({
        "components": document.components.keys().collect::<Vec<_>>(),
        "polymorphic": bases,
        "operations": operations,
    })
}
