//! Status command - show applied and pending migrations

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color};

use super::get_context;
use crate::output;
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs, pending_only: bool, json: bool) -> Result<()> {
    let mut ctx = get_context(global)?;
    let mut statuses = ctx.migration_service()?.status()?;
    if pending_only {
        statuses.retain(|s| !s.applied);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    if statuses.is_empty() {
        let msg = if pending_only {
            "No pending migrations."
        } else {
            "No migrations found."
        };
        println!("{}", msg);
        return Ok(());
    }

    println!("{}", "Migration Status".bold());
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Migration", "Status", "Applied At"]);

    for status in &statuses {
        let status_cell = match (status.applied, status.file_present) {
            (true, true) => Cell::new("APPLIED").fg(Color::Green),
            (true, false) => Cell::new("MISSING FILE").fg(Color::Yellow),
            (false, _) => Cell::new("PENDING").fg(Color::Cyan),
        };

        table.add_row(vec![
            Cell::new(&status.name),
            status_cell,
            Cell::new(output::format_timestamp(status.applied_at)),
        ]);
    }

    println!("{}", table);
    println!();

    let applied = statuses.iter().filter(|s| s.applied).count();
    let pending = statuses.len() - applied;
    let missing = statuses.iter().filter(|s| !s.file_present).count();

    println!(
        "Summary: {} applied, {} pending",
        applied.to_string().green(),
        pending.to_string().cyan(),
    );
    if missing > 0 {
        output::warning(&format!(
            "{} recorded but no longer in the migrations directory",
            output::migrations(missing)
        ));
    }

    Ok(())
}
