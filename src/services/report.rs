use crate::models::CatalogReport;
use crate::utils::descriptor_name;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const BANNER: &str =
    "================================================================================";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Info,
    Warn,
}

/// A single console line of a catalog report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub level: ReportLevel,
    pub text: String,
}

impl ReportLine {
    fn info(text: impl Into<String>) -> Self {
        Self { level: ReportLevel::Info, text: text.into() }
    }

    fn warn(text: impl Into<String>) -> Self {
        Self { level: ReportLevel::Warn, text: text.into() }
    }
}

fn push_section(lines: &mut Vec<ReportLine>, heading: String, files: &BTreeSet<PathBuf>) {
    if files.is_empty() {
        return;
    }
    lines.push(ReportLine::info(""));
    lines.push(ReportLine::warn(format!("\t{}: {}", heading, files.len())));
    lines.extend(files.iter().map(|f| ReportLine::warn(format!("\t\t{}", descriptor_name(f)))));
}

/// Lay out the report of one pass. Empty categories produce no lines at all.
pub fn render_report(report: &CatalogReport) -> Vec<ReportLine> {
    let kind = report.kind;
    let mut lines = vec![
        ReportLine::info(BANNER),
        ReportLine::info(""),
        ReportLine::info(kind.report_title()),
        ReportLine::info(""),
        ReportLine::info(format!("\t{} found: {}", kind.plural_label(), report.found.len())),
    ];
    lines.extend(
        report
            .found
            .iter()
            .map(|f| ReportLine::info(format!("\t\t{}", descriptor_name(f)))),
    );

    push_section(
        &mut lines,
        format!("Duplicate {} detected", kind.plural_label().to_lowercase()),
        &report.duplicates,
    );
    push_section(&mut lines, "Missing labels detected".to_string(), &report.missing_labels);

    if !report.used_labels.is_empty() {
        lines.push(ReportLine::info(""));
        lines.push(ReportLine::info(format!("\tUsed labels: {}", report.used_labels.len())));
        for (label, names) in &report.used_labels {
            lines.push(ReportLine::info(format!("\t\t{}:", label)));
            lines.extend(names.iter().map(|n| ReportLine::info(format!("\t\t\t{}", n))));
        }
    }

    for (field, files) in &report.missing_fields {
        push_section(&mut lines, format!("Missing {} detected", field.description()), files);
    }

    // modules are listed by directory name, not descriptor name
    if !report.missing_descriptors.is_empty() {
        lines.push(ReportLine::info(""));
        lines.push(ReportLine::warn(format!(
            "\tMissing {} descriptors detected: {}",
            kind,
            report.missing_descriptors.len()
        )));
        lines.extend(report.missing_descriptors.iter().map(|module| {
            let name = module.file_name().unwrap_or(module.as_os_str());
            ReportLine::warn(format!("\t\t{}", name.to_string_lossy()))
        }));
    }

    lines.push(ReportLine::info(""));
    lines.push(ReportLine::info(BANNER));
    lines
}

/// Emit the rendered report through the log
pub fn print_report(report: &CatalogReport) {
    for line in render_report(report) {
        match line.level {
            ReportLevel::Info => info!("{}", line.text),
            ReportLevel::Warn => warn!("{}", line.text),
        }
    }
}

#[derive(Debug, Serialize)]
struct ReportExport<'a> {
    generated_at: DateTime<Utc>,
    reports: &'a [CatalogReport],
}

/// Write every pass report as pretty-printed JSON
pub fn write_json_report<P: AsRef<Path>>(path: P, reports: &[CatalogReport]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create report file: {:?}", path))?;

    let export = ReportExport {
        generated_at: Utc::now(),
        reports,
    };
    serde_json::to_writer_pretty(BufWriter::new(file), &export)
        .with_context(|| format!("Failed to write report file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DescriptorKind, RequiredField};
    use tempfile::TempDir;

    fn texts(lines: &[ReportLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_clean_report_omits_empty_sections() {
        let mut report = CatalogReport::empty(DescriptorKind::Model);
        report.found.insert(PathBuf::from("core/model/bean.json"));
        report.found.insert(PathBuf::from("core/model/aggregate.json"));

        let lines = render_report(&report);
        assert_eq!(
            texts(&lines),
            vec![
                BANNER,
                "",
                "Model catalog report",
                "",
                "\tModels found: 2",
                "\t\taggregate",
                "\t\tbean",
                "",
                BANNER,
            ]
        );
        assert!(lines.iter().all(|l| l.level == ReportLevel::Info));
    }

    #[test]
    fn test_component_report_section_order() {
        let mut report = CatalogReport::empty(DescriptorKind::Component);
        report.found.insert(PathBuf::from("a/foo-component.json"));
        report.duplicates.insert(PathBuf::from("out/foo-component.json"));
        report.missing_labels.insert(PathBuf::from("a/foo-component.json"));
        report.record_labels(PathBuf::from("b/bar.json"), "bar", r#""label": "core,http""#);
        report.record_missing_fields(Path::new("a/foo-component.json"), &[RequiredField::UriPath], "{}");
        report.missing_descriptors.insert(PathBuf::from("components/camel-broken"));

        let lines = render_report(&report);
        let text = texts(&lines);
        let position = |needle: &str| text.iter().position(|l| *l == needle).unwrap();

        assert!(position("\tDuplicate components detected: 1") < position("\tMissing labels detected: 1"));
        assert!(position("\tMissing labels detected: 1") < position("\tUsed labels: 2"));
        assert!(position("\t\tcore:") < position("\t\thttp:"));
        assert!(position("\tUsed labels: 2") < position("\tMissing uri path parameter detected: 1"));
        assert!(
            position("\tMissing uri path parameter detected: 1")
                < position("\tMissing component descriptors detected: 1")
        );
        assert_eq!(text[position("\tMissing component descriptors detected: 1") + 1], "\t\tcamel-broken");
        assert_eq!(lines[position("\tDuplicate components detected: 1")].level, ReportLevel::Warn);
    }

    #[test]
    fn test_write_json_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog-report.json");
        let mut report = CatalogReport::empty(DescriptorKind::DataFormat);
        report.indexed_names.push("csv".to_string());

        write_json_report(&path, &[report]).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["reports"][0]["kind"], "dataformat");
        assert_eq!(value["reports"][0]["indexed_names"][0], "csv");
        assert!(value["generated_at"].is_string());
    }
}
