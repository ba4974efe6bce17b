pub mod catalog_report;
pub mod descriptor;
pub mod pass_config;

pub use catalog_report::{CatalogReport, LabelIndex};
pub use descriptor::{DescriptorKind, RequiredField};
pub use pass_config::{
    resolve_module_roots, CatalogConfig, PassConfig, SourceRoot, SourceRoots,
    MODULE_CLASSES_DIR,
};
