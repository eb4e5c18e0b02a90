use super::commands::map::MapArgs;
use super::commands::settings::SettingsCommands;
use super::commands::sheets::SheetsArgs;
use super::commands::suggest::SuggestArgs;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "subchassis-mapper")]
#[command(version)]
#[command(about = "Map LatestSubChassis from a reference workbook onto a planning workbook")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Join the reference attribute onto the planning sheet and write the result
    Map(MapArgs),
    /// List the sheets of a workbook
    Sheets(SheetsArgs),
    /// Suggest which columns hold a key concept
    Suggest(SuggestArgs),
    /// Application settings management
    Settings(SettingsCommands),
}
