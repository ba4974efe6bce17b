use crate::models::{DescriptorKind, RequiredField};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Output tree of a single module, relative to the module directory
pub const MODULE_CLASSES_DIR: &str = "target/classes";

/// Build output directory name that never counts as a module
const BUILD_DIR_NAME: &str = "target";

/// Locations the catalog is assembled from and written to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub components_dir: Option<PathBuf>,
    pub core_dir: Option<PathBuf>,
    pub model_tree: PathBuf,
    pub models_out_dir: PathBuf,
    pub components_out_dir: PathBuf,
    pub dataformats_out_dir: PathBuf,
}

impl CatalogConfig {
    pub const DEFAULT_OUTPUT_BASE: &'static str = "target/classes/org/apache/camel/catalog";
    pub const DEFAULT_MODEL_TREE: &'static str = "target/classes/org/apache/camel/model";

    /// Place the three output directories under a common base
    pub fn with_output_base<P: AsRef<Path>>(mut self, base: P) -> Self {
        let base = base.as_ref();
        self.models_out_dir = base.join("models");
        self.components_out_dir = base.join("components");
        self.dataformats_out_dir = base.join("dataformats");
        self
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            components_dir: None,
            core_dir: None,
            model_tree: PathBuf::from(Self::DEFAULT_MODEL_TREE),
            models_out_dir: PathBuf::new(),
            components_out_dir: PathBuf::new(),
            dataformats_out_dir: PathBuf::new(),
        }
        .with_output_base(Self::DEFAULT_OUTPUT_BASE)
    }
}

/// One tree to scan, remembered with the module it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRoot {
    pub module: PathBuf,
    pub scan_dir: PathBuf,
}

impl SourceRoot {
    pub fn for_module<P: AsRef<Path>>(module: P) -> Self {
        let module = module.as_ref().to_path_buf();
        let scan_dir = module.join(MODULE_CLASSES_DIR);
        Self { module, scan_dir }
    }
}

/// Where a pass finds its source roots. Resolved each time a pass runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceRoots {
    Fixed(Vec<SourceRoot>),
    /// The model tree of the core module
    ModelTree {
        core_dir: Option<PathBuf>,
        model_tree: PathBuf,
    },
    /// Every module under the components directory, then the core module
    Modules {
        components_dir: Option<PathBuf>,
        core_dir: Option<PathBuf>,
    },
}

impl SourceRoots {
    fn modules(config: &CatalogConfig) -> Self {
        SourceRoots::Modules {
            components_dir: config.components_dir.clone(),
            core_dir: config.core_dir.clone(),
        }
    }

    /// Current roots on disk; absent directories contribute nothing
    pub fn resolve(&self) -> Vec<SourceRoot> {
        match self {
            SourceRoots::Fixed(roots) => roots.clone(),
            SourceRoots::ModelTree { core_dir, model_tree } => existing_dir(core_dir.as_deref())
                .map(|core| SourceRoot {
                    module: core.to_path_buf(),
                    scan_dir: core.join(model_tree),
                })
                .into_iter()
                .collect(),
            SourceRoots::Modules { components_dir, core_dir } => {
                resolve_module_roots(components_dir.as_deref(), core_dir.as_deref())
            }
        }
    }
}

/// Everything one pass needs, independent of which kind it handles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassConfig {
    pub kind: DescriptorKind,
    pub marker_file_name: Option<String>,
    pub content_marker: Option<String>,
    pub source_roots: SourceRoots,
    pub output_dir: PathBuf,
    pub index_file_name: String,
    pub required_fields: Vec<RequiredField>,
}

impl PassConfig {
    /// Configuration carrying the kind's own markers, index name and checks
    pub fn for_kind<P: AsRef<Path>>(
        kind: DescriptorKind,
        source_roots: SourceRoots,
        output_dir: P,
    ) -> Self {
        Self {
            kind,
            marker_file_name: kind.marker_file_name().map(str::to_string),
            content_marker: kind.content_marker().map(str::to_string),
            source_roots,
            output_dir: output_dir.as_ref().to_path_buf(),
            index_file_name: kind.index_file_name().to_string(),
            required_fields: kind.required_fields().to_vec(),
        }
    }

    /// Models come only from the core module's model tree
    pub fn models(config: &CatalogConfig) -> Self {
        let source_roots = SourceRoots::ModelTree {
            core_dir: config.core_dir.clone(),
            model_tree: config.model_tree.clone(),
        };
        Self::for_kind(DescriptorKind::Model, source_roots, &config.models_out_dir)
    }

    pub fn components(config: &CatalogConfig) -> Self {
        Self::for_kind(
            DescriptorKind::Component,
            SourceRoots::modules(config),
            &config.components_out_dir,
        )
    }

    pub fn data_formats(config: &CatalogConfig) -> Self {
        Self::for_kind(
            DescriptorKind::DataFormat,
            SourceRoots::modules(config),
            &config.dataformats_out_dir,
        )
    }

    /// Index file sits in the directory above the output directory, resolved
    /// by the filesystem so `.` and trailing `..` components land correctly
    pub fn index_file_path(&self) -> PathBuf {
        self.output_dir.join("..").join(&self.index_file_name)
    }

    /// Missing-descriptor detection only makes sense when a marker exists
    pub fn detects_missing_descriptors(&self) -> bool {
        self.marker_file_name.is_some()
    }
}

fn existing_dir(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| p.is_dir())
}

/// One root per module directory under `components_dir`, then the core module.
/// Absent or unreadable directories contribute nothing.
pub fn resolve_module_roots(components_dir: Option<&Path>, core_dir: Option<&Path>) -> Vec<SourceRoot> {
    let mut roots = Vec::new();

    if let Some(dir) = existing_dir(components_dir) {
        if let Ok(entries) = fs::read_dir(dir) {
            let mut modules: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_dir())
                .filter(|path| path.file_name().map_or(true, |n| n != BUILD_DIR_NAME))
                .collect();
            modules.sort();
            roots.extend(modules.into_iter().map(SourceRoot::for_module));
        }
    }

    if let Some(core) = existing_dir(core_dir) {
        roots.push(SourceRoot::for_module(core));
    }

    roots
}
