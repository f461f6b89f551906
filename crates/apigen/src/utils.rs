/*!
File helpers: type graph input and specification output.
*/

use crate::{
    error::{ApiGenError, ApiGenResult},
    model::TypeGraph,
    specification::OpenApiSpec,
};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Utility functions for reading graphs and writing specifications
pub struct ApiGenUtils;

impl ApiGenUtils {
    /// Serialize a specification
    pub fn to_string(spec: &OpenApiSpec, format: OutputFormat, pretty: bool) -> ApiGenResult<String> {
        let content = match format {
            OutputFormat::Json => {
                if pretty {
                    serde_json::to_string_pretty(spec)?
                } else {
                    serde_json::to_string(spec)?
                }
            }
            OutputFormat::Yaml => serde_yaml::to_string(spec)?,
        };
        Ok(content)
    }

    /// Save a specification to file
    pub fn save_spec_to_file<P: AsRef<Path>>(
        spec: &OpenApiSpec,
        path: P,
        format: OutputFormat,
        pretty: bool,
    ) -> ApiGenResult<()> {
        let content = Self::to_string(spec, format, pretty)?;

        if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path.as_ref(), content)?;

        Ok(())
    }

    /// Load a specification written by `save_spec_to_file`
    pub fn load_spec_from_file<P: AsRef<Path>>(path: P) -> ApiGenResult<OpenApiSpec> {
        let content = fs::read_to_string(path.as_ref())?;

        match OutputFormat::from_path(path.as_ref()) {
            Some(OutputFormat::Json) => Ok(serde_json::from_str(&content)?),
            Some(OutputFormat::Yaml) => Ok(serde_yaml::from_str(&content)?),
            None if looks_like_json(&content) => Ok(serde_json::from_str(&content)?),
            None => Ok(serde_yaml::from_str(&content)?),
        }
    }

    /// Load a type graph from a JSON or YAML file
    pub fn load_graph_from_file<P: AsRef<Path>>(path: P) -> ApiGenResult<TypeGraph> {
        let content = fs::read_to_string(path.as_ref())?;

        match OutputFormat::from_path(path.as_ref()) {
            Some(OutputFormat::Json) => TypeGraph::from_json_str(&content),
            Some(OutputFormat::Yaml) => TypeGraph::from_yaml_str(&content),
            None if looks_like_json(&content) => TypeGraph::from_json_str(&content),
            None => TypeGraph::from_yaml_str(&content),
        }
    }
}

fn looks_like_json(content: &str) -> bool {
    content.trim_start().starts_with('{')
}

/// Output format for saving specifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    /// Format implied by a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension().and_then(|ext| ext.to_str())?;
        extension.parse().ok()
    }
}

impl FromStr for OutputFormat {
    type Err = ApiGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(ApiGenError::configuration_error(format!(
                "unknown output format '{}'",
                other
            ))),
        }
    }
}
