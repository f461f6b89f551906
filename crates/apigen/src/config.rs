use crate::document::ApiInfo;
use crate::error::ApiGenResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for one document generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Document information
    pub info: ApiInfo,

    /// Namespace patterns scanned for data types
    #[serde(default)]
    pub model_namespaces: Vec<String>,

    /// Namespace patterns scanned for handler types
    #[serde(default)]
    pub handler_namespaces: Vec<String>,

    /// Language root types where superclass walking stops
    #[serde(default = "default_root_types")]
    pub root_types: Vec<String>,

    /// Server configurations
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_root_types() -> Vec<String> {
    vec![
        "java.lang.Object".to_string(),
        "java.lang.Record".to_string(),
        "java.lang.Enum".to_string(),
    ]
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            info: ApiInfo {
                title: "API Documentation".to_string(),
                description: Some("Generated API documentation".to_string()),
                version: "1.0.0".to_string(),
            },
            model_namespaces: Vec::new(),
            handler_namespaces: Vec::new(),
            root_types: default_root_types(),
            servers: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    /// Create a new configuration with custom API info
    pub fn new(title: &str, version: &str) -> Self {
        let mut config = Self::default();
        config.info.title = title.to_string();
        config.info.version = version.to_string();
        config
    }

    /// Parse a TOML configuration
    pub fn from_toml_str(content: &str) -> ApiGenResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ApiGenResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.info.description = Some(description.to_string());
        self
    }

    /// Add a namespace pattern to scan for data types
    pub fn with_model_namespace(mut self, pattern: &str) -> Self {
        self.model_namespaces.push(pattern.to_string());
        self
    }

    /// Add a namespace pattern to scan for handler types
    pub fn with_handler_namespace(mut self, pattern: &str) -> Self {
        self.handler_namespaces.push(pattern.to_string());
        self
    }

    /// Add a root type
    pub fn with_root_type(mut self, name: &str) -> Self {
        self.root_types.push(name.to_string());
        self
    }

    /// Add a server configuration
    pub fn add_server(mut self, url: &str, description: Option<&str>) -> Self {
        self.servers.push(ServerConfig {
            url: url.to_string(),
            description: description.map(|s| s.to_string()),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = GeneratorConfig::new("Shop", "2.0.0")
            .with_model_namespace("com.example.model")
            .with_handler_namespace("com.example.api")
            .add_server("http://localhost:8080", None);

        assert_eq!(config.info.title, "Shop");
        assert_eq!(config.info.version, "2.0.0");
        assert_eq!(config.model_namespaces, vec!["com.example.model"]);
        assert_eq!(config.handler_namespaces, vec!["com.example.api"]);
        assert_eq!(config.servers.len(), 1);
        assert!(config.root_types.contains(&"java.lang.Object".to_string()));
    }

    #[test]
    fn test_from_toml() {
        let config = GeneratorConfig::from_toml_str(
            r#"
model_namespaces = ["com.example.model", "com.example.*.dto"]
handler_namespaces = ["com.example.api"]

[info]
title = "Shop API"
version = "1.2.3"

[[servers]]
url = "https://api.example.com"
description = "Production"
"#,
        )
        .unwrap();

        assert_eq!(config.info.title, "Shop API");
        assert!(config.info.description.is_none());
        assert_eq!(config.model_namespaces.len(), 2);
        assert_eq!(config.root_types.len(), 3);
        assert_eq!(config.servers[0].description.as_deref(), Some("Production"));
    }

    #[test]
    fn test_toml_requires_info() {
        assert!(GeneratorConfig::from_toml_str("model_namespaces = []").is_err());
    }
}
