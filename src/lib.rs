pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use error::{CatalogError, CatalogResult};
pub use models::{CatalogConfig, CatalogReport, DescriptorKind, PassConfig, RequiredField, SourceRoot, SourceRoots};
pub use services::{print_report, render_report, run_catalog_pass, write_json_report};

use std::path::PathBuf;

/// Which passes run; all three by default, always in model, component, dataformat order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSelection {
    pub models: bool,
    pub components: bool,
    pub dataformats: bool,
}

impl Default for PassSelection {
    fn default() -> Self {
        Self {
            models: true,
            components: true,
            dataformats: true,
        }
    }
}

impl PassSelection {
    /// Pass configurations for the selected kinds, in execution order
    pub fn pass_configs(&self, catalog: &CatalogConfig) -> Vec<PassConfig> {
        let mut passes = Vec::with_capacity(3);
        if self.models {
            passes.push(PassConfig::models(catalog));
        }
        if self.components {
            passes.push(PassConfig::components(catalog));
        }
        if self.dataformats {
            passes.push(PassConfig::data_formats(catalog));
        }
        passes
    }
}

// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub passes: PassSelection,
    pub report_json: Option<PathBuf>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            passes: PassSelection::default(),
            report_json: None,
            log_level: "info".to_string(),
        }
    }
}

/// Run the selected passes in order, stopping at the first fatal error
pub fn run_passes(config: &AppConfig) -> CatalogResult<Vec<CatalogReport>> {
    config
        .passes
        .pass_configs(&config.catalog)
        .iter()
        .map(|pass| {
            let report = run_catalog_pass(pass)?;
            print_report(&report);
            Ok(report)
        })
        .collect()
}
