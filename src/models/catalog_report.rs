use crate::models::{DescriptorKind, RequiredField};
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// `"label": "<word and comma chars>"`, exactly one ASCII whitespace after the colon
static LABEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""label":(?-u:\s)"([A-Za-z0-9_,]+)""#).unwrap()
});

/// Label -> sorted descriptor names declaring it
pub type LabelIndex = BTreeMap<String, BTreeSet<String>>;

/// Everything a single pass learned, held until the report prints
#[derive(Debug, Clone, Serialize)]
pub struct CatalogReport {
    pub kind: DescriptorKind,
    pub found: BTreeSet<PathBuf>,
    pub markers_found: usize,
    pub duplicates: BTreeSet<PathBuf>,
    pub missing_labels: BTreeSet<PathBuf>,
    pub missing_fields: BTreeMap<RequiredField, BTreeSet<PathBuf>>,
    pub missing_descriptors: BTreeSet<PathBuf>,
    pub used_labels: LabelIndex,
    pub index_file: PathBuf,
    pub indexed_names: Vec<String>,
}

impl CatalogReport {
    pub fn empty(kind: DescriptorKind) -> Self {
        Self {
            kind,
            found: BTreeSet::new(),
            markers_found: 0,
            duplicates: BTreeSet::new(),
            missing_labels: BTreeSet::new(),
            missing_fields: BTreeMap::new(),
            missing_descriptors: BTreeSet::new(),
            used_labels: LabelIndex::new(),
            index_file: PathBuf::new(),
            indexed_names: Vec::new(),
        }
    }

    /// Record the labels of one descriptor, or flag it when the label is empty.
    pub fn record_labels(&mut self, source: PathBuf, name: &str, text: &str) {
        if text.contains("\"label\": \"\"") {
            self.missing_labels.insert(source);
            return;
        }

        let Some(captures) = LABEL_PATTERN.captures(text) else {
            return;
        };

        for label in captures[1].split(',').filter(|l| !l.is_empty()) {
            self.used_labels
                .entry(label.to_string())
                .or_default()
                .insert(name.to_string());
        }
    }

    /// Run the kind's required-field checks against one descriptor
    pub fn record_missing_fields(&mut self, source: &Path, fields: &[RequiredField], text: &str) {
        for field in fields.iter().filter(|f| f.is_missing(text)) {
            self.missing_fields
                .entry(*field)
                .or_default()
                .insert(source.to_path_buf());
        }
    }

    pub fn warning_count(&self) -> usize {
        self.duplicates.len()
            + self.missing_labels.len()
            + self.missing_fields.values().map(BTreeSet::len).sum::<usize>()
            + self.missing_descriptors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> CatalogReport {
        CatalogReport::empty(DescriptorKind::Component)
    }

    #[test]
    fn test_multiple_labels_index_name_under_each() {
        let mut report = report();
        report.record_labels(PathBuf::from("a/x.json"), "x", r#"{"label": "foo,bar"}"#);
        report.record_labels(PathBuf::from("a/a.json"), "a", r#"{"label": "foo"}"#);

        let foo: Vec<_> = report.used_labels["foo"].iter().cloned().collect();
        assert_eq!(foo, vec!["a", "x"]);
        assert!(report.used_labels["bar"].contains("x"));
        assert!(report.missing_labels.is_empty());
    }

    #[test]
    fn test_empty_label_is_missing() {
        let mut report = report();
        report.record_labels(PathBuf::from("a/x.json"), "x", r#"{"label": ""}"#);

        assert!(report.missing_labels.contains(&PathBuf::from("a/x.json")));
        assert!(report.used_labels.is_empty());
    }

    #[test]
    fn test_unmatched_label_format_is_ignored() {
        let mut report = report();
        report.record_labels(PathBuf::from("a/x.json"), "x", r#"{"label":"tight"}"#);
        report.record_labels(PathBuf::from("a/y.json"), "y", r#"{"label": "has space"}"#);
        report.record_labels(PathBuf::from("a/z.json"), "z", r#"{"title": "none"}"#);

        assert!(report.used_labels.is_empty());
        assert!(report.missing_labels.is_empty());
    }

    #[test]
    fn test_label_separator_must_be_ascii_whitespace() {
        let mut report = report();
        report.record_labels(PathBuf::from("a/x.json"), "x", "{\"label\":\u{00A0}\"nbsp\"}");
        report.record_labels(PathBuf::from("a/y.json"), "y", "{\"label\":\t\"tab\"}");

        assert!(!report.used_labels.contains_key("nbsp"));
        assert!(report.used_labels["tab"].contains("y"));
    }

    #[test]
    fn test_empty_label_tokens_skipped() {
        let mut report = report();
        report.record_labels(PathBuf::from("a/x.json"), "x", r#"{"label": "core,,"}"#);

        assert_eq!(report.used_labels.len(), 1);
        assert!(report.used_labels.contains_key("core"));
    }

    #[test]
    fn test_missing_fields_and_warning_count() {
        let mut report = report();
        let source = PathBuf::from("a/x.json");
        report.record_missing_fields(&source, &[RequiredField::UriPath], r#"{"component": {}}"#);
        report.duplicates.insert(PathBuf::from("out/x.json"));

        assert!(report.missing_fields[&RequiredField::UriPath].contains(&source));
        assert_eq!(report.warning_count(), 2);
    }
}
