use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use log::info;

use subchassis_mapper::excel::{SheetRef, reader_for_path};

#[derive(Args, Debug)]
pub struct SheetsArgs {
    /// Workbook to inspect (.xlsx or .csv)
    pub file: PathBuf,
    /// Also list the column headers of each sheet
    #[arg(short, long)]
    pub columns: bool,
}

pub fn sheets_command(args: SheetsArgs) -> Result<()> {
    info!("Listing sheets of {:?}", args.file);

    let bytes = fs::read(&args.file).with_context(|| format!("Failed to read workbook: {:?}", args.file))?;
    let reader = reader_for_path(&args.file);
    let sheets = reader.list_sheets(&bytes)?;

    println!("  {}", format!("Sheets in {}:", args.file.display()).bright_white().bold());
    for (idx, name) in sheets.iter().enumerate() {
        println!("  {:>3}  {}", idx, name.bright_cyan());

        if args.columns {
            let table = reader.read_sheet(&bytes, &SheetRef::Index(idx))?;
            println!("       {} rows", table.row_count());
            for column in table.column_names() {
                println!("       • {}", column);
            }
        }
    }

    Ok(())
}
