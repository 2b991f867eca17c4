//! Resource listing command.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use crate::state::AppState;

/// List registered resources and whether their files are present.
pub fn list(state: &AppState, json: bool) -> Result<()> {
    let records = state.resources.records();

    if json {
        let rows: Vec<_> = records
            .iter()
            .map(|r| {
                serde_json::json!({
                    "name": r.name,
                    "description": r.description,
                    "url": r.url,
                    "filename": r.filename,
                    "available": state.resources.is_available(&r.name),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if records.is_empty() {
        println!();
        println!(
            "  {} No resources registered. Add [[resources]] entries to {}",
            style("i").blue().bold(),
            style(state.data_dir.join("config.toml").display()).yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Description").fg(Color::White),
        Cell::new("Filename").fg(Color::White),
        Cell::new("Status").fg(Color::White),
    ]);
    for r in &records {
        let status = if state.resources.is_available(&r.name) {
            Cell::new("available").fg(Color::Green)
        } else {
            Cell::new("missing").fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(&r.name),
            Cell::new(&r.description),
            Cell::new(&r.filename),
            status,
        ]);
    }

    println!();
    println!("  Resource folder: {}", style(state.resources.folder().display()).dim());
    println!("{table}");
    let missing: Vec<_> = records
        .iter()
        .filter(|r| !state.resources.is_available(&r.name))
        .collect();
    for r in missing {
        println!(
            "  {} Download {} from {} as '{}'",
            style("!").yellow().bold(),
            style(&r.name).cyan(),
            r.url,
            r.filename
        );
    }
    println!();
    Ok(())
}
