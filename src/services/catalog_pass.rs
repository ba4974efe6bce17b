use crate::error::{CatalogError, CatalogResult};
use crate::models::{CatalogReport, PassConfig};
use crate::services::discovery::{discover_roots, DescriptorFilter};
use crate::utils::{copy_file, descriptor_name, list_descriptor_names, write_index_file, DESCRIPTOR_EXTENSION};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Discover, copy, annotate and index the descriptors of one kind.
///
/// Copying is additive: files already in the output directory stay, and a name
/// collision is reported as a duplicate while the later copy overwrites it.
pub fn run_catalog_pass(config: &PassConfig) -> CatalogResult<CatalogReport> {
    let kind = config.kind;
    info!("Copying all {} json descriptors", kind);

    let filter = DescriptorFilter::for_pass(config);
    let roots = config.source_roots.resolve();
    let scan = discover_roots(&roots, &filter, config.detects_missing_descriptors());

    if let Some(marker) = &config.marker_file_name {
        info!("Found {} {} files", scan.found.markers.len(), marker);
    }
    info!("Found {} {} json files", scan.found.descriptors.len(), kind);

    let mut report = CatalogReport::empty(kind);
    report.markers_found = scan.found.markers.len();
    report.missing_descriptors = scan.missing_descriptors;

    fs::create_dir_all(&config.output_dir).map_err(|source| CatalogError::CreateOutputDir {
        path: config.output_dir.clone(),
        source,
    })?;

    for file in &scan.found.descriptors {
        let Some(file_name) = file.file_name() else {
            continue;
        };
        let destination = config.output_dir.join(file_name);

        if destination.exists() {
            warn!("Duplicate {} name detected: {}", kind, destination.display());
            report.duplicates.insert(destination.clone());
        }

        copy_file(file, &destination).map_err(|source| CatalogError::CopyFailed {
            from: file.clone(),
            to: destination.clone(),
            source,
        })?;

        annotate_descriptor(config, file, &mut report);
    }
    report.found = scan.found.descriptors;

    let index_file = config.index_file_path();
    report.indexed_names = write_descriptor_index(&config.output_dir, &index_file)?;
    report.index_file = index_file;

    info!(
        "Catalog pass for {} completed. Found: {}, Indexed: {}, Warnings: {}",
        kind,
        report.found.len(),
        report.indexed_names.len(),
        report.warning_count()
    );

    Ok(report)
}

/// Label and required-field checks on a copied descriptor; read failures are ignored
fn annotate_descriptor(config: &PassConfig, file: &Path, report: &mut CatalogReport) {
    let text = match fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            debug!("Cannot read {} for annotation: {}", file.display(), e);
            return;
        }
    };

    report.record_labels(file.to_path_buf(), &descriptor_name(file), &text);
    report.record_missing_fields(file, &config.required_fields, &text);
}

/// Rewrite the index file from what the output directory now holds
fn write_descriptor_index(output_dir: &Path, index_file: &Path) -> CatalogResult<Vec<String>> {
    let names = list_descriptor_names(output_dir, DESCRIPTOR_EXTENSION).map_err(|source| {
        CatalogError::ListOutputDir {
            path: output_dir.to_path_buf(),
            source,
        }
    })?;

    write_index_file(index_file, &names).map_err(|source| CatalogError::WriteIndex {
        path: index_file.to_path_buf(),
        source,
    })?;

    Ok(names)
}
