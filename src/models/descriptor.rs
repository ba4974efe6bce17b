use serde::{Deserialize, Serialize};
use std::fmt;

/// The three descriptor families collected into the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorKind {
    Model,
    Component,
    DataFormat,
}

impl DescriptorKind {
    /// Singular name used in log lines and JSON markers
    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptorKind::Model => "model",
            DescriptorKind::Component => "component",
            DescriptorKind::DataFormat => "dataformat",
        }
    }

    /// Companion properties file signalling that a descriptor is expected.
    /// Models come from a dedicated tree and have none.
    pub fn marker_file_name(&self) -> Option<&'static str> {
        match self {
            DescriptorKind::Model => None,
            DescriptorKind::Component => Some("component.properties"),
            DescriptorKind::DataFormat => Some("dataformat.properties"),
        }
    }

    /// Substring a JSON file must contain to count as this kind
    pub fn content_marker(&self) -> Option<&'static str> {
        match self {
            DescriptorKind::Model => None,
            DescriptorKind::Component => Some("\"component\":"),
            DescriptorKind::DataFormat => Some("\"dataformat\":"),
        }
    }

    pub fn index_file_name(&self) -> &'static str {
        match self {
            DescriptorKind::Model => "models.properties",
            DescriptorKind::Component => "components.properties",
            DescriptorKind::DataFormat => "dataformats.properties",
        }
    }

    /// Directory names never descended into while scanning for this kind
    pub fn pruned_directories(&self) -> &'static [&'static str] {
        match self {
            DescriptorKind::Model => &[],
            DescriptorKind::Component | DescriptorKind::DataFormat => &["model"],
        }
    }

    pub fn required_fields(&self) -> &'static [RequiredField] {
        match self {
            DescriptorKind::Component => &[RequiredField::UriPath],
            DescriptorKind::Model | DescriptorKind::DataFormat => &[],
        }
    }

    pub fn report_title(&self) -> &'static str {
        match self {
            DescriptorKind::Model => "Model catalog report",
            DescriptorKind::Component => "Component catalog report",
            DescriptorKind::DataFormat => "Data format catalog report",
        }
    }

    /// Heading for the plural count lines of the report
    pub fn plural_label(&self) -> &'static str {
        match self {
            DescriptorKind::Model => "Models",
            DescriptorKind::Component => "Components",
            DescriptorKind::DataFormat => "DataFormats",
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field a descriptor of some kind is expected to declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    /// A parameter declared with `"kind": "path"`
    UriPath,
}

impl RequiredField {
    /// True when the descriptor text lacks this field
    pub fn is_missing(&self, text: &str) -> bool {
        match self {
            RequiredField::UriPath => !text.contains("\"kind\": \"path\""),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RequiredField::UriPath => "uri path parameter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_markers() {
        assert_eq!(DescriptorKind::Model.marker_file_name(), None);
        assert_eq!(DescriptorKind::Component.marker_file_name(), Some("component.properties"));
        assert_eq!(DescriptorKind::DataFormat.content_marker(), Some("\"dataformat\":"));
        assert!(DescriptorKind::Model.pruned_directories().is_empty());
        assert_eq!(DescriptorKind::Component.pruned_directories(), &["model"]);
    }

    #[test]
    fn test_uri_path_detection() {
        let with_path = r#"{ "properties": { "name": { "kind": "path" } } }"#;
        let without_path = r#"{ "properties": { "name": { "kind": "parameter" } } }"#;
        assert!(!RequiredField::UriPath.is_missing(with_path));
        assert!(RequiredField::UriPath.is_missing(without_path));
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&DescriptorKind::DataFormat).unwrap();
        assert_eq!(json, "\"dataformat\"");
    }
}
