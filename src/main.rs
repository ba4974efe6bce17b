use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use descriptor_catalog::{
    run_passes, write_json_report, AppConfig, CatalogConfig, CatalogReport, PassSelection,
};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

const ENV_COMPONENTS_DIR: &str = "CATALOG_COMPONENTS_DIR";
const ENV_CORE_DIR: &str = "CATALOG_CORE_DIR";
const ENV_OUTPUT_DIR: &str = "CATALOG_OUTPUT_DIR";

fn main() -> Result<()> {
    // Parse command line arguments
    let matches = Command::new("Descriptor Catalog")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Collects model, component and data format descriptors into a catalog")
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Set the log level (trace, debug, info, warn, error)")
                .default_value("info"),
        )
        .arg(
            Arg::new("components-dir")
                .long("components-dir")
                .value_name("DIR")
                .help("Directory holding one subdirectory per component module"),
        )
        .arg(
            Arg::new("core-dir")
                .long("core-dir")
                .value_name("DIR")
                .help("Core module directory"),
        )
        .arg(
            Arg::new("model-tree")
                .long("model-tree")
                .value_name("PATH")
                .help("Model descriptor tree, relative to the core module")
                .default_value(CatalogConfig::DEFAULT_MODEL_TREE),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .value_name("DIR")
                .help("Base directory for the models, components and dataformats catalogs"),
        )
        .arg(
            Arg::new("models-out")
                .long("models-out")
                .value_name("DIR")
                .help("Output directory for model descriptors"),
        )
        .arg(
            Arg::new("components-out")
                .long("components-out")
                .value_name("DIR")
                .help("Output directory for component descriptors"),
        )
        .arg(
            Arg::new("dataformats-out")
                .long("dataformats-out")
                .value_name("DIR")
                .help("Output directory for data format descriptors"),
        )
        .arg(
            Arg::new("skip-models")
                .long("skip-models")
                .help("Skip the model pass")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("skip-components")
                .long("skip-components")
                .help("Skip the component pass")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("skip-dataformats")
                .long("skip-dataformats")
                .help("Skip the data format pass")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("report-json")
                .long("report-json")
                .value_name("FILE")
                .help("Also write the reports as JSON to this file"),
        )
        .get_matches();

    let log_level = matches
        .get_one::<String>("log-level")
        .cloned()
        .unwrap_or_else(|| "info".to_string());

    // Load .env first so a RUST_LOG set there reaches the subscriber
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Initialize logging
    initialize_logging(&log_level)?;
    report_environment(dotenv_loaded);

    // Initialize configuration from command line arguments and environment
    let config = create_app_config(&matches, log_level);

    // Run the application
    run_application(config)
}

/// Flag value first, then the environment variable
fn path_setting(matches: &clap::ArgMatches, arg: &str, env_var: &str) -> Option<PathBuf> {
    matches
        .get_one::<String>(arg)
        .cloned()
        .or_else(|| env::var(env_var).ok().filter(|v| !v.is_empty()))
        .map(PathBuf::from)
}

/// Pure function to create application configuration from CLI arguments
fn create_app_config(matches: &clap::ArgMatches, log_level: String) -> AppConfig {
    let mut catalog = CatalogConfig {
        components_dir: path_setting(matches, "components-dir", ENV_COMPONENTS_DIR),
        core_dir: path_setting(matches, "core-dir", ENV_CORE_DIR),
        ..CatalogConfig::default()
    };

    if let Some(tree) = matches.get_one::<String>("model-tree") {
        catalog.model_tree = PathBuf::from(tree);
    }
    if let Some(base) = path_setting(matches, "output-dir", ENV_OUTPUT_DIR) {
        catalog = catalog.with_output_base(base);
    }
    if let Some(dir) = matches.get_one::<String>("models-out") {
        catalog.models_out_dir = PathBuf::from(dir);
    }
    if let Some(dir) = matches.get_one::<String>("components-out") {
        catalog.components_out_dir = PathBuf::from(dir);
    }
    if let Some(dir) = matches.get_one::<String>("dataformats-out") {
        catalog.dataformats_out_dir = PathBuf::from(dir);
    }

    AppConfig {
        catalog,
        passes: PassSelection {
            models: !matches.get_flag("skip-models"),
            components: !matches.get_flag("skip-components"),
            dataformats: !matches.get_flag("skip-dataformats"),
        },
        report_json: matches.get_one::<String>("report-json").map(PathBuf::from),
        log_level,
    }
}

/// RUST_LOG directives plus the requested level
fn build_env_filter(log_level: &str) -> EnvFilter {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    EnvFilter::from_default_env().add_directive(level.into())
}

/// Initialize structured logging with tracing
fn initialize_logging(log_level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(log_level))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

/// Log how the environment was set up; a .env file is optional
fn report_environment(dotenv_loaded: bool) {
    if !dotenv_loaded {
        info!("No .env file found, using system environment variables");
    }

    for var in [ENV_COMPONENTS_DIR, ENV_CORE_DIR, ENV_OUTPUT_DIR] {
        if env::var(var).is_ok_and(|value| !value.is_empty()) {
            info!("Environment variable {} is set", var);
        }
    }
}

fn run_application(config: AppConfig) -> Result<()> {
    info!("Starting descriptor catalog preparation");
    info!("Configuration: {:#?}", config);

    if config.catalog.components_dir.is_none() && config.catalog.core_dir.is_none() {
        warn!("Neither a components directory nor a core directory is configured");
    }

    let reports = run_passes(&config)?;

    if let Some(path) = &config.report_json {
        write_json_report(path, &reports)?;
        info!("Catalog report written to {}", path.display());
    }

    print_final_summary(&reports);

    info!("Catalog preparation completed successfully");
    Ok(())
}

/// Print final application summary
fn print_final_summary(reports: &[CatalogReport]) {
    info!("=== FINAL SUMMARY ===");
    for report in reports {
        info!(
            "{}: {} copied, {} indexed in {}",
            report.kind,
            report.found.len(),
            report.indexed_names.len(),
            report.index_file.display()
        );
    }

    let total_warnings: usize = reports.iter().map(CatalogReport::warning_count).sum();
    info!("Total warnings: {}", total_warnings);
}
