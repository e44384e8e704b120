//! CLI command implementations

pub mod migrate;
pub mod new;
pub mod status;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use migrator_core::config::MigratorConfig;
use migrator_core::MigratorContext;

use crate::GlobalArgs;

/// Install the progress logger
///
/// Progress goes to stdout, or to stderr when stdout carries JSON.
/// `RUST_LOG` wins over the verbosity flags when set.
pub fn init_logging(global: &GlobalArgs, json: bool) {
    let default_level = if global.verbose {
        "debug"
    } else if global.quiet {
        "warn"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("migrator_core={}", default_level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time();

    if json {
        builder.with_writer(std::io::stderr).init();
    } else {
        builder.init();
    }
}

/// Resolve configuration: settings file, then environment, then flags
pub fn load_config(global: &GlobalArgs) -> Result<MigratorConfig> {
    let mut config = MigratorConfig::load(global.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(database) = &global.database {
        config.database = Some(database.clone());
    }
    if let Some(dir) = &global.dir {
        config.directory = dir.clone();
    }
    if let Some(table) = &global.table {
        config.table = table.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Open the configured database
pub fn get_context(global: &GlobalArgs) -> Result<MigratorContext> {
    let config = load_config(global)?;
    let db_path = config.database.clone();

    MigratorContext::new(config).with_context(|| match db_path {
        Some(path) => format!("Failed to open database: {}", path.display()),
        None => "Failed to open database".to_string(),
    })
}
