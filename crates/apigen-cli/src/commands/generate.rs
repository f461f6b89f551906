use super::load_inputs;
use anyhow::Context;
use apigen::{ApiGenError, ApiGenUtils, ApiGenerator, OpenApiSpec, OutputFormat};
use std::path::{Path, PathBuf};

/// Generate the OpenAPI document and write it to disk
pub fn run(
    config_path: &Path,
    graph_path: &Path,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
) -> anyhow::Result<()> {
    println!("🔍 Loading type graph...");
    let (config, graph) = load_inputs(config_path, graph_path)?;

    println!("⚙️  Generating OpenAPI specification...");
    let generator = ApiGenerator::new(config);
    let document = generator
        .generate(&graph)
        .map_err(|e| generation_failure(e, graph_path))?;

    println!(
        "📊 {} components, {} operations",
        document.components.len(),
        document.operations().count()
    );

    let (path, format) = resolve_output(output, format);
    let spec = OpenApiSpec::from_document(&document, &generator.config().servers);
    ApiGenUtils::save_spec_to_file(&spec, &path, format, true)
        .with_context(|| format!("Failed to save specification to {}", path.display()))?;

    let dangling = document.unresolved_references();
    if !dangling.is_empty() {
        println!("⚠️  {} unresolved references:", dangling.len());
        for reference in dangling {
            println!("   {} -> {}", reference.location, reference.target);
        }
    }

    println!("✅ OpenAPI specification generated: {}", path.display());
    Ok(())
}

/// Point at the type graph when its declarations are at fault
fn generation_failure(error: ApiGenError, graph_path: &Path) -> anyhow::Error {
    let message = if error.is_declaration_error() {
        format!("Invalid declarations in {}", graph_path.display())
    } else {
        "OpenAPI generation failed".to_string()
    };
    anyhow::Error::new(error).context(message)
}

/// Output path and format; the format follows the extension unless given
fn resolve_output(output: Option<PathBuf>, format: Option<OutputFormat>) -> (PathBuf, OutputFormat) {
    match (output, format) {
        (Some(path), Some(format)) => (path, format),
        (Some(path), None) => {
            let format = OutputFormat::from_path(&path).unwrap_or(OutputFormat::Json);
            (path, format)
        }
        (None, format) => {
            let format = format.unwrap_or(OutputFormat::Json);
            let default_filename = match format {
                OutputFormat::Json => "target/_openapi.json",
                OutputFormat::Yaml => "target/_openapi.yaml",
            };
            (PathBuf::from(default_filename), format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
model_namespaces = ["shop.model"]
handler_namespaces = ["shop.api"]

[info]
title = "Shop API"
version = "1.0.0"
"#;

    const GRAPH: &str = r#"
types:
  - name: shop.model.Car
    fields:
      - name: model
        type: string
  - name: shop.api.CarController
    directives:
      - kind: route
        paths: ["/cars"]
    methods:
      - name: list
        returns: list<shop.model.Car>
        directives:
          - kind: route
            methods: [GET]
"#;

    #[test]
    fn test_resolve_output() {
        let (path, format) = resolve_output(None, None);
        assert_eq!(path, PathBuf::from("target/_openapi.json"));
        assert_eq!(format, OutputFormat::Json);

        let (_, format) = resolve_output(Some(PathBuf::from("api.yml")), None);
        assert_eq!(format, OutputFormat::Yaml);

        let (path, format) = resolve_output(None, Some(OutputFormat::Yaml));
        assert_eq!(path, PathBuf::from("target/_openapi.yaml"));
        assert_eq!(format, OutputFormat::Yaml);
    }

    #[test]
    fn test_generate_writes_spec() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("apigen.toml");
        let graph = dir.path().join("types.yaml");
        let output = dir.path().join("out/openapi.json");
        fs::write(&config, CONFIG).unwrap();
        fs::write(&graph, GRAPH).unwrap();

        run(&config, &graph, Some(output.clone()), None).unwrap();

        let spec: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(spec["paths"]["/cars"]["get"]["operationId"], "listUsingGET");
        assert_eq!(spec["components"]["schemas"]["Car"]["type"], "object");
    }

    #[test]
    fn test_invalid_declarations_name_the_graph() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("apigen.toml");
        let graph = dir.path().join("types.yaml");
        fs::write(&config, CONFIG).unwrap();
        fs::write(
            &graph,
            r#"
types:
  - name: shop.model.Grid
    fields:
      - name: cells
        type: list<list<int32>>
"#,
        )
        .unwrap();

        let err = run(&config, &graph, Some(dir.path().join("out.json")), None).unwrap_err();
        assert!(err.to_string().starts_with("Invalid declarations in"));
        assert!(err.root_cause().to_string().contains("shop.model.Grid.cells"));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = generation_failure(ApiGenError::from(io), &graph);
        assert_eq!(err.to_string(), "OpenAPI generation failed");
    }

    #[test]
    fn test_missing_config_is_error() {
        let dir = TempDir::new().unwrap();
        let err = run(
            &dir.path().join("missing.toml"),
            &dir.path().join("types.yaml"),
            None,
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to load configuration"));
    }
}
