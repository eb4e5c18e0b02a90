pub mod map;
pub mod settings;
pub mod sheets;
pub mod suggest;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use log::info;

use subchassis_mapper::excel::{SheetRef, reader_for_path};
use subchassis_mapper::table::Table;
use subchassis_mapper::ui::prompts;

/// Read one sheet of `path`
///
/// An explicit sheet name wins; a single-sheet workbook needs no choice;
/// otherwise the user picks, or the first sheet is used without a terminal.
pub fn load_table(path: &Path, sheet: Option<&str>, label: &str, prompt: bool) -> Result<Table> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}: {:?}", label, path))?;
    let reader = reader_for_path(path);
    let sheets = reader.list_sheets(&bytes)?;

    let sheet = match sheet {
        Some(name) => SheetRef::from(name),
        None if sheets.len() == 1 => SheetRef::Index(0),
        None if prompt => SheetRef::Name(prompts::select_sheet(label, &sheets)?),
        None => {
            println!(
                "  {} {} has {} sheets, using '{}' (pass a sheet name to choose)",
                "ℹ".bright_blue(),
                label,
                sheets.len(),
                sheets[0]
            );
            SheetRef::Index(0)
        }
    };

    let table = reader.read_sheet(&bytes, &sheet)?;
    info!(
        "Loaded {} from {:?}: sheet '{}', {} rows, {} columns",
        label,
        path,
        table.name(),
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}
