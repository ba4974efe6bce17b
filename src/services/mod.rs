pub mod catalog_pass;
pub mod discovery;
pub mod report;

pub use catalog_pass::run_catalog_pass;
pub use discovery::{discover, discover_roots, Classify, DescriptorFilter, DiscoveryResult, EntryClass, RootScan};
pub use report::{print_report, render_report, write_json_report, ReportLevel, ReportLine};
