//! New command - create a timestamped migration file

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{NaiveDateTime, Utc};

use super::load_config;
use crate::output;
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs, name: &str) -> Result<()> {
    let config = load_config(global)?;
    let path = create_migration(&config.directory, name, Utc::now().naive_utc())?;

    output::success(&format!("Created {}", path.display()));
    Ok(())
}

/// Turn a free-form description into a file-name slug
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_matches('_').to_string()
}

fn create_migration(directory: &Path, name: &str, now: NaiveDateTime) -> Result<PathBuf> {
    let slug = slugify(name);
    if slug.is_empty() {
        bail!("Migration name must contain at least one letter or digit");
    }

    fs::create_dir_all(directory).with_context(|| {
        format!("Failed to create migrations directory: {}", directory.display())
    })?;

    let file_name = format!("{}_{}.sql", now.format("%Y%m%d%H%M%S"), slug);
    let path = directory.join(file_name);

    // Stays empty: `migrate` rejects it until statements are added
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    Ok(path)
}
