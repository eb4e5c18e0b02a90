pub mod app;
pub mod commands;

use colored::*;

use subchassis_mapper::MapperError;

pub use app::Cli;

/// Print an error with a hint for the typed mapping errors
pub fn report_error(err: &anyhow::Error) {
    eprintln!("{} {:#}", "Error:".bright_red().bold(), err);

    let hint = match err.downcast_ref::<MapperError>() {
        Some(MapperError::ColumnNotFound { .. }) => {
            Some("Check the header spelling; `subchassis-mapper sheets FILE --columns` lists them.")
        }
        Some(MapperError::EmptyKeySpec) => Some("Pass at least one --key PLANNING=REFERENCE."),
        Some(MapperError::SheetParseFailure { .. }) => {
            Some("Is the file an .xlsx or .csv? `subchassis-mapper sheets FILE` lists its sheets.")
        }
        Some(MapperError::NoMatchingColumns { .. }) => Some(
            "No header looks like this key. Pass --key PLANNING=REFERENCE or run in a terminal to pick columns.",
        ),
        Some(MapperError::WorkbookWrite(_)) => {
            Some("Sheet names are at most 31 characters and cannot contain []:*?/\\.")
        }
        Some(MapperError::DuplicateColumn { .. } | MapperError::ColumnLengthMismatch { .. }) | None => None,
    };

    if let Some(hint) = hint {
        eprintln!("  {} {}", "hint:".bright_yellow(), hint);
    }
}
