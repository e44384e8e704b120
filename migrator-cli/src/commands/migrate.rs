//! Migrate command - apply pending migrations

use anyhow::{bail, Result};
use colored::Colorize;

use migrator_core::{MigrationReport, OperationResult};

use super::get_context;
use crate::output;
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs, json: bool) -> Result<()> {
    let mut ctx = get_context(global)?;
    let directory = ctx.config.directory.clone();
    let result = ctx.migration_service()?.migrate();

    if json {
        let (envelope, failure) = json_envelope(result)?;
        println!("{}", envelope);
        if let Some(message) = failure {
            bail!(message);
        }
        return Ok(());
    }

    let report = result?;

    if report.is_empty() {
        output::info(&format!(
            "Database is up to date ({} already applied)",
            output::migrations(report.already_applied)
        ));
        return Ok(());
    }

    for applied in &report.applied {
        println!(
            "  {} {} ({} statement{})",
            "✓".green(),
            applied.name,
            applied.statements,
            if applied.statements == 1 { "" } else { "s" }
        );
    }
    println!();
    output::success(&format!(
        "Applied {} from {}",
        output::migrations(report.applied.len()),
        directory.display()
    ));

    Ok(())
}

/// Render `result` as an `OperationResult` document
///
/// The failure message is returned separately so the caller still exits
/// non-zero after printing the document.
fn json_envelope(
    result: migrator_core::Result<MigrationReport>,
) -> Result<(String, Option<String>)> {
    let failure = result.as_ref().err().map(|e| e.to_string());
    let envelope = serde_json::to_string_pretty(&OperationResult::from(result))?;
    Ok((envelope, failure))
}
