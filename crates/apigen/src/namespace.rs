/*!
Scan namespace patterns.

A pattern is a dot-separated namespace. It matches that namespace and every
namespace nested below it. A `*` segment stands for exactly one segment, a
`**` segment for one or more.
*/

use crate::error::{ApiGenError, ApiGenResult};
use crate::model::namespace_of;
use regex::Regex;

/// Compiled set of namespace patterns
#[derive(Debug, Clone)]
pub struct NamespaceMatcher {
    patterns: Vec<(String, Regex)>,
}

impl NamespaceMatcher {
    pub fn new(patterns: &[String]) -> ApiGenResult<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| Ok((pattern.clone(), compile_pattern(pattern)?)))
            .collect::<ApiGenResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Whether a namespace is covered by any pattern
    pub fn matches_namespace(&self, namespace: &str) -> bool {
        self.patterns.iter().any(|(_, regex)| regex.is_match(namespace))
    }

    /// Whether the namespace of a fully-qualified type name is covered
    pub fn contains_type(&self, type_name: &str) -> bool {
        self.matches_namespace(namespace_of(type_name))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(pattern, _)| pattern.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn compile_pattern(pattern: &str) -> ApiGenResult<Regex> {
    let mut pieces = Vec::new();
    for segment in pattern.trim().split('.') {
        let piece = match segment {
            "*" => "[^.]+".to_string(),
            "**" => r"[^.]+(?:\.[^.]+)*".to_string(),
            "" => {
                return Err(ApiGenError::configuration_error(format!(
                    "namespace pattern '{}' contains an empty segment",
                    pattern
                )))
            }
            literal if literal.contains('*') => {
                return Err(ApiGenError::configuration_error(format!(
                    "namespace pattern '{}': wildcards must span a whole segment",
                    pattern
                )))
            }
            literal => regex::escape(literal),
        };
        pieces.push(piece);
    }

    let source = format!(r"^{}(?:\..+)?$", pieces.join(r"\."));
    Regex::new(&source).map_err(|e| {
        ApiGenError::configuration_error(format!(
            "namespace pattern '{}' is invalid: {}",
            pattern, e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(patterns: &[&str]) -> NamespaceMatcher {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        NamespaceMatcher::new(&patterns).unwrap()
    }

    #[test]
    fn test_prefix_matching() {
        let m = matcher(&["com.example.model"]);
        assert!(m.matches_namespace("com.example.model"));
        assert!(m.matches_namespace("com.example.model.vehicles"));
        assert!(!m.matches_namespace("com.example.modeler"));
        assert!(!m.matches_namespace("com.example"));
        assert!(m.contains_type("com.example.model.Car"));
        assert!(!m.contains_type("java.lang.Object"));
    }

    #[test]
    fn test_wildcards() {
        let single = matcher(&["com.*.dto"]);
        assert!(single.matches_namespace("com.shop.dto"));
        assert!(!single.matches_namespace("com.shop.web.dto"));

        let deep = matcher(&["com.**.dto"]);
        assert!(deep.matches_namespace("com.shop.web.dto"));
        assert!(deep.matches_namespace("com.shop.dto.inner"));
        assert!(!deep.matches_namespace("com.dto"));
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(NamespaceMatcher::new(&["com..model".to_string()]).is_err());
        assert!(NamespaceMatcher::new(&["com.mod*".to_string()]).is_err());
        assert!(NamespaceMatcher::new(&[String::new()]).is_err());
    }

    #[test]
    fn test_empty_matcher_matches_nothing() {
        let m = matcher(&[]);
        assert!(m.is_empty());
        assert!(!m.matches_namespace("com.example"));
    }
}
