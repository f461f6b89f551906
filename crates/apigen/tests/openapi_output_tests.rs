use apigen::{ApiGenUtils, ApiGenerator, GeneratorConfig, OpenApiSpec, OutputFormat, TypeGraph};
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

fn shop_spec() -> OpenApiSpec {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shop.yaml");
    let graph: TypeGraph = ApiGenUtils::load_graph_from_file(path).unwrap();
    let config = GeneratorConfig::new("Shop API", "1.0.0")
        .with_description("Cars and laptops")
        .with_model_namespace("shop.model")
        .with_handler_namespace("shop.api")
        .add_server("https://shop.example.com", Some("Production"));

    let document = ApiGenerator::new(config.clone()).generate(&graph).unwrap();
    OpenApiSpec::from_document(&document, &config.servers)
}

fn shop_json() -> Value {
    serde_json::to_value(shop_spec()).unwrap()
}

#[test]
fn test_document_header() {
    let spec = shop_json();
    assert_eq!(spec["openapi"], "3.0.3");
    assert_eq!(spec["info"]["title"], "Shop API");
    assert_eq!(spec["info"]["description"], "Cars and laptops");
    assert_eq!(spec["servers"], json!([{"url": "https://shop.example.com", "description": "Production"}]));
    assert_eq!(spec["tags"], json!([{"name": "car-controller"}, {"name": "laptops"}]));
}

#[test]
fn test_component_schemas() {
    let spec = shop_json();
    let schemas = &spec["components"]["schemas"];

    assert_eq!(
        schemas["Product"]["discriminator"],
        json!({
            "propertyName": "type",
            "mapping": {
                "car": "#/components/schemas/Car",
                "laptop": "#/components/schemas/Laptop"
            }
        })
    );
    assert_eq!(schemas["Product"]["required"], json!(["id", "price", "amount", "type"]));
    assert_eq!(schemas["Product"]["properties"]["price"], json!({"type": "number", "format": "double"}));

    let car = &schemas["Car"];
    assert_eq!(car["allOf"][0], json!({"$ref": "#/components/schemas/Product"}));
    assert_eq!(car["x-discriminator-value"], "car");
    let car_properties = &car["allOf"][1]["properties"];
    assert_eq!(car_properties["model"], json!({"type": "string", "minLength": 1, "maxLength": 64}));
    assert_eq!(
        car_properties["color"],
        json!({"description": "Paint color", "allOf": [{"$ref": "#/components/schemas/Color"}]})
    );

    assert_eq!(schemas["Color"], json!({"type": "string", "enum": ["RED", "GREEN", "BLUE"]}));

    let items = &schemas["Cart"]["properties"]["items"];
    assert_eq!(items["type"], "array");
    assert_eq!(
        items["items"]["oneOf"],
        json!([{"$ref": "#/components/schemas/Car"}, {"$ref": "#/components/schemas/Laptop"}])
    );
    assert_eq!(items["items"]["discriminator"]["propertyName"], "type");
}

#[test]
fn test_path_operations() {
    let spec = shop_json();
    let paths = &spec["paths"];

    let post = &paths["/cars"]["post"];
    assert_eq!(post["operationId"], "addProductsUsingPOST");
    assert_eq!(
        post["requestBody"]["content"]["application/json"]["schema"],
        json!({"type": "array", "items": {"$ref": "#/components/schemas/Product"}})
    );
    assert_eq!(post["requestBody"]["required"], true);
    assert_eq!(post["responses"], json!({"201": {"description": "Created"}}));

    let upload = &paths["/cars/{carId}/photos"]["post"];
    assert_eq!(
        upload["requestBody"]["content"]["application/octet-stream"]["schema"],
        json!({"type": "string", "format": "binary"})
    );

    let search = &paths["/cars/search"]["get"];
    assert_eq!(search["operationId"], "find");
    assert_eq!(
        search["parameters"],
        json!([{"name": "model", "in": "query", "required": false, "schema": {"type": "string"}}])
    );

    let remove = &paths["/laptops/{laptopId}"]["delete"];
    assert_eq!(remove["deprecated"], true);
    assert_eq!(remove["tags"], json!(["laptops"]));
    assert_eq!(paths["/laptops"]["get"]["operationId"], "find_1");
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let spec = shop_spec();

    let yaml_path = dir.path().join("nested/openapi.yaml");
    ApiGenUtils::save_spec_to_file(&spec, &yaml_path, OutputFormat::Yaml, true).unwrap();
    let content = std::fs::read_to_string(&yaml_path).unwrap();
    assert!(content.contains("openapi:"));
    assert!(content.contains("3.0.3"));

    let reloaded = ApiGenUtils::load_spec_from_file(&yaml_path).unwrap();
    assert_eq!(reloaded.paths.len(), spec.paths.len());
    assert_eq!(
        reloaded.components.map(|c| c.schemas.len()),
        spec.components.map(|c| c.schemas.len())
    );
}
