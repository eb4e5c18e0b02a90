use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use log::info;

use subchassis_mapper::config::{Config, SETTING_NAMES, Settings};
use subchassis_mapper::ui::{self, prompts};

#[derive(Args)]
pub struct SettingsCommands {
    #[command(subcommand)]
    pub command: SettingsSubcommands,
}

#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Show current settings and key concepts
    Show,
    /// Print the path of the settings file
    Path,
    /// Get the value of a specific setting
    Get {
        /// Setting name
        name: String,
    },
    /// Set the value of a specific setting
    Set {
        /// Setting name
        name: String,
        /// Setting value
        value: String,
    },
    /// Reset a setting to its default value
    Reset {
        /// Setting name
        name: String,
    },
    /// Reset all settings to default values
    ResetAll {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub fn settings_command(args: SettingsCommands) -> Result<()> {
    match args.command {
        SettingsSubcommands::Show => show_command(),
        SettingsSubcommands::Path => {
            println!("{}", Config::get_config_path()?.display());
            Ok(())
        }
        SettingsSubcommands::Get { name } => get_command(&name),
        SettingsSubcommands::Set { name, value } => set_command(&name, &value),
        SettingsSubcommands::Reset { name } => reset_command(&name),
        SettingsSubcommands::ResetAll { force } => reset_all_command(force),
    }
}

fn show_command() -> Result<()> {
    let config = Config::load()?;

    println!("  {}", "Settings:".bright_white().bold());
    for name in SETTING_NAMES {
        println!("    {:<22} {}", name, config.get(name)?.bright_cyan());
    }

    println!();
    println!("  {}", "Key concepts:".bright_white().bold());
    for concept in &config.concepts {
        let marker = if concept.required { " (required)" } else { "" };
        println!(
            "    {}{}: {}",
            concept.name.bright_green().bold(),
            marker,
            concept.synonyms.join(", ")
        );
    }
    Ok(())
}

fn get_command(name: &str) -> Result<()> {
    info!("Getting setting: {}", name);
    let config = Config::load()?;
    println!("{}", config.get(name)?);
    Ok(())
}

fn set_command(name: &str, value: &str) -> Result<()> {
    info!("Setting {} to {}", name, value);
    let mut config = Config::load()?;
    config.set(name, value)?;

    if name == "similarity_threshold" && config.settings.similarity_threshold < 0.4 {
        println!(
            "{} A low threshold suggests loosely related columns; check suggestions before accepting them.",
            "⚠️".bright_yellow().bold()
        );
    }

    config.save()?;
    println!("{} Set {} to {}", "✓".bright_green().bold(), name, config.get(name)?);
    Ok(())
}

fn reset_command(name: &str) -> Result<()> {
    info!("Resetting setting: {}", name);
    let mut config = Config::load()?;
    config.reset(name)?;
    config.save()?;
    println!("Reset {} to {}", name, config.get(name)?);
    Ok(())
}

fn reset_all_command(force: bool) -> Result<()> {
    info!("Resetting all settings to defaults");

    if !force {
        if !ui::is_interactive() {
            anyhow::bail!("Refusing to reset all settings without confirmation (pass --force)");
        }
        if !prompts::prompt_confirmation("Reset all settings to their default values?", false)? {
            println!("Operation cancelled.");
            return Ok(());
        }
    }

    let mut config = Config::load()?;
    config.settings = Settings::default();
    config.save()?;

    println!("All settings have been reset to default values:");
    for name in SETTING_NAMES {
        println!("  {}: {}", name, config.get(name)?);
    }
    Ok(())
}
