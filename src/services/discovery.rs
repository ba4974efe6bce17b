use crate::models::{PassConfig, SourceRoot};
use crate::utils::{matches_extension, DESCRIPTOR_EXTENSION};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Files directly inside these directories are never descriptors or markers
const ROOT_LEVEL_DIRS: &[&str] = &["classes", "META-INF"];

/// What a visited entry means to the pass scanning it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryClass {
    Descriptor,
    Marker,
    Directory,
    Ignore,
}

/// Per-kind entry classifier
pub trait Classify {
    fn classify(&self, path: &Path, is_dir: bool) -> EntryClass;
}

impl<F> Classify for F
where
    F: Fn(&Path, bool) -> EntryClass,
{
    fn classify(&self, path: &Path, is_dir: bool) -> EntryClass {
        self(path, is_dir)
    }
}

/// Name and content rules for one descriptor kind
#[derive(Debug, Clone)]
pub struct DescriptorFilter {
    pub extension: String,
    pub content_marker: Option<String>,
    pub marker_file_name: Option<String>,
    pub pruned_directories: Vec<String>,
}

impl DescriptorFilter {
    pub fn for_pass(config: &PassConfig) -> Self {
        Self {
            extension: DESCRIPTOR_EXTENSION.to_string(),
            content_marker: config.content_marker.clone(),
            marker_file_name: config.marker_file_name.clone(),
            pruned_directories: config
                .kind
                .pruned_directories()
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }

    /// Unreadable files and files without the marker simply do not qualify
    fn has_content_marker(&self, path: &Path) -> bool {
        let Some(marker) = &self.content_marker else {
            return true;
        };

        match fs::read_to_string(path) {
            Ok(text) => text.contains(marker.as_str()),
            Err(e) => {
                debug!("Skipping unreadable candidate {}: {}", path.display(), e);
                false
            }
        }
    }
}

impl Classify for DescriptorFilter {
    fn classify(&self, path: &Path, is_dir: bool) -> EntryClass {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();

        if is_dir {
            return if self.pruned_directories.iter().any(|d| d == name) {
                EntryClass::Ignore
            } else {
                EntryClass::Directory
            };
        }

        if matches_extension(path, &self.extension) && self.has_content_marker(path) {
            EntryClass::Descriptor
        } else if self.marker_file_name.as_deref() == Some(name) {
            EntryClass::Marker
        } else {
            EntryClass::Ignore
        }
    }
}

/// Descriptors and markers found beneath one or more roots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryResult {
    pub descriptors: BTreeSet<PathBuf>,
    pub markers: BTreeSet<PathBuf>,
}

impl DiscoveryResult {
    pub fn merge(&mut self, other: DiscoveryResult) {
        self.descriptors.extend(other.descriptors);
        self.markers.extend(other.markers);
    }
}

fn in_root_level_dir(path: &Path) -> bool {
    path.parent()
        .and_then(|parent| parent.file_name())
        .and_then(|name| name.to_str())
        .map(|name| ROOT_LEVEL_DIRS.contains(&name))
        .unwrap_or(false)
}

/// Recursively classify everything beneath `root`.
/// A missing or unreadable root yields an empty result.
pub fn discover<C: Classify + ?Sized>(root: &Path, classifier: &C) -> DiscoveryResult {
    let mut result = DiscoveryResult::default();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || classifier.classify(entry.path(), true) == EntryClass::Directory
        });

    for entry in walker.filter_map(|entry| entry.ok()) {
        if !entry.file_type().is_file() || in_root_level_dir(entry.path()) {
            continue;
        }

        match classifier.classify(entry.path(), false) {
            EntryClass::Descriptor => {
                result.descriptors.insert(entry.into_path());
            }
            EntryClass::Marker => {
                result.markers.insert(entry.into_path());
            }
            EntryClass::Directory | EntryClass::Ignore => {}
        }
    }

    result
}

/// Discovery across every source root of a pass
#[derive(Debug, Clone, Default)]
pub struct RootScan {
    pub found: DiscoveryResult,
    /// Modules whose scan produced new markers but no new descriptors
    pub missing_descriptors: BTreeSet<PathBuf>,
}

/// Scan each root in turn. When `detect_missing` is set, a module is flagged
/// if its own scan grew the marker set without growing the descriptor set.
pub fn discover_roots<C: Classify + ?Sized>(
    roots: &[SourceRoot],
    classifier: &C,
    detect_missing: bool,
) -> RootScan {
    let mut scan = RootScan::default();

    for root in roots {
        let markers_before = scan.found.markers.len();
        let descriptors_before = scan.found.descriptors.len();

        scan.found.merge(discover(&root.scan_dir, classifier));

        let new_markers = scan.found.markers.len() != markers_before;
        let new_descriptors = scan.found.descriptors.len() != descriptors_before;
        if detect_missing && new_markers && !new_descriptors {
            scan.missing_descriptors.insert(root.module.clone());
        }
    }

    scan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DescriptorKind;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn component_filter() -> DescriptorFilter {
        DescriptorFilter::for_pass(&PassConfig::for_kind(
            DescriptorKind::Component,
            crate::models::SourceRoots::Fixed(Vec::new()),
            "out",
        ))
    }

    #[test]
    fn test_classify_by_name_and_content() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("org/acme");
        write(&pkg.join("foo.json"), r#"{ "component": { "name": "foo" } }"#);
        write(&pkg.join("bar.json"), r#"{ "dataformat": { "name": "bar" } }"#);
        write(&pkg.join("component.properties"), "");

        let filter = component_filter();
        assert_eq!(filter.classify(&pkg.join("foo.json"), false), EntryClass::Descriptor);
        assert_eq!(filter.classify(&pkg.join("bar.json"), false), EntryClass::Ignore);
        assert_eq!(filter.classify(&pkg.join("component.properties"), false), EntryClass::Marker);
        assert_eq!(filter.classify(&pkg.join("absent.json"), false), EntryClass::Ignore);
        assert_eq!(filter.classify(&pkg, true), EntryClass::Directory);
        assert_eq!(filter.classify(&dir.path().join("model"), true), EntryClass::Ignore);
    }

    #[test]
    fn test_discover_skips_root_level_and_model_dirs() {
        let dir = TempDir::new().unwrap();
        let classes = dir.path().join("target/classes");
        let json = r#"{ "component": { "name": "x" } }"#;
        write(&classes.join("top.json"), json);
        write(&classes.join("META-INF/meta.json"), json);
        write(&classes.join("META-INF/component.properties"), "");
        write(&classes.join("org/acme/model/inner.json"), json);
        write(&classes.join("org/acme/foo.json"), json);
        write(&classes.join("org/acme/component.properties"), "");

        let result = discover(&classes, &component_filter());
        let descriptors: Vec<_> = result.descriptors.into_iter().collect();
        assert_eq!(descriptors, vec![classes.join("org/acme/foo.json")]);
        assert_eq!(result.markers.len(), 1);
        assert!(result.markers.contains(&classes.join("org/acme/component.properties")));
    }

    #[test]
    fn test_discover_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let result = discover(&dir.path().join("nowhere"), &component_filter());
        assert_eq!(result, DiscoveryResult::default());
    }

    #[test]
    fn test_closure_classifier() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("a/one.txt"), "");
        write(&dir.path().join("a/two.md"), "");

        let by_extension = |path: &Path, is_dir: bool| {
            if is_dir {
                EntryClass::Directory
            } else if matches_extension(path, ".txt") {
                EntryClass::Descriptor
            } else {
                EntryClass::Ignore
            }
        };
        let result = discover(dir.path(), &by_extension);
        assert_eq!(result.descriptors.len(), 1);
        assert!(result.markers.is_empty());
    }

    #[test]
    fn test_missing_descriptor_flagged_per_root() {
        let dir = TempDir::new().unwrap();
        let good = SourceRoot::for_module(dir.path().join("camel-good"));
        let broken = SourceRoot::for_module(dir.path().join("camel-broken"));
        let empty = SourceRoot::for_module(dir.path().join("camel-empty"));

        write(&good.scan_dir.join("org/good/good.json"), r#"{ "component": {} }"#);
        write(&good.scan_dir.join("org/good/component.properties"), "");
        write(&broken.scan_dir.join("org/broken/component.properties"), "");
        fs::create_dir_all(&empty.scan_dir).unwrap();

        let roots = vec![broken.clone(), good.clone(), empty];
        let scan = discover_roots(&roots, &component_filter(), true);

        assert_eq!(scan.found.descriptors.len(), 1);
        assert_eq!(scan.found.markers.len(), 2);
        let missing: Vec<_> = scan.missing_descriptors.into_iter().collect();
        assert_eq!(missing, vec![broken.module]);
    }

    #[test]
    fn test_missing_detection_disabled() {
        let dir = TempDir::new().unwrap();
        let broken = SourceRoot::for_module(dir.path().join("camel-broken"));
        write(&broken.scan_dir.join("org/broken/component.properties"), "");

        let scan = discover_roots(&[broken], &component_filter(), false);
        assert!(scan.missing_descriptors.is_empty());
        assert_eq!(scan.found.markers.len(), 1);
    }
}
