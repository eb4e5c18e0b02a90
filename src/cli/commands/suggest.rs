use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::*;
use log::info;
use serde::Serialize;

use subchassis_mapper::config::{Concept, Config};
use subchassis_mapper::mapping::{ColumnSuggester, rank_candidates};

use super::load_table;

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Workbook whose columns are matched (.xlsx or .csv)
    pub file: PathBuf,
    /// Sheet to read (default: the first sheet)
    #[arg(short, long)]
    pub sheet: Option<String>,
    /// Only this configured concept (style, customer, department, season)
    #[arg(short, long, conflicts_with = "names")]
    pub concept: Option<String>,
    /// Match these names instead of a configured concept; repeatable
    #[arg(short, long = "name", value_name = "NAME")]
    pub names: Vec<String>,
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct ConceptSuggestions {
    pub concept: String,
    pub targets: Vec<String>,
    pub best: Option<String>,
    pub score: Option<f64>,
    pub suggestions: Vec<String>,
    /// Every column, likeliest first; used when nothing clears the threshold
    pub ranked: Vec<String>,
}

pub fn suggest_for(suggester: &ColumnSuggester, concept: &Concept, columns: &[String]) -> ConceptSuggestions {
    let best = suggester.best_of(&concept.synonyms, columns);
    ConceptSuggestions {
        concept: concept.name.clone(),
        targets: concept.synonyms.clone(),
        score: best.as_ref().map(|(_, score)| *score),
        best: best.map(|(name, _)| name),
        suggestions: suggester.suggest(&concept.synonyms, columns).into_iter().collect(),
        ranked: rank_candidates(&concept.synonyms, columns),
    }
}

pub fn suggest_command(args: SuggestArgs) -> Result<()> {
    info!("Suggesting columns for {:?}", args.file);
    let config = Config::load()?;
    let table = load_table(&args.file, args.sheet.as_deref(), "the workbook", false)?;
    let columns = table.column_names();

    let concepts: Vec<Concept> = if !args.names.is_empty() {
        vec![Concept {
            name: "custom".to_string(),
            required: false,
            synonyms: args.names.clone(),
        }]
    } else if let Some(name) = &args.concept {
        match config.concept(name) {
            Some(concept) => vec![concept.clone()],
            None => {
                let known: Vec<&str> = config.concepts.iter().map(|c| c.name.as_str()).collect();
                anyhow::bail!("Unknown concept '{}'. Available: {}", name, known.join(", "));
            }
        }
    } else {
        config.concepts.clone()
    };

    let suggester = config.suggester();
    let results: Vec<ConceptSuggestions> = concepts
        .iter()
        .map(|concept| suggest_for(&suggester, concept, &columns))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!(
        "  {} (threshold {})",
        format!("Suggestions for sheet '{}'", table.name()).bright_white().bold(),
        suggester.threshold()
    );
    for result in &results {
        println!();
        println!("  {} {}", "●".bright_cyan(), result.concept.bright_cyan().bold());
        match (&result.best, result.score) {
            (Some(best), Some(score)) => {
                println!("    best:  {} ({:.2})", best.bright_green().bold(), score);
                let others: Vec<&str> = result
                    .suggestions
                    .iter()
                    .filter(|s| *s != best)
                    .map(String::as_str)
                    .collect();
                if !others.is_empty() {
                    println!("    also:  {}", others.join(", "));
                }
            }
            _ => {
                println!("    {}", "no column clears the threshold".bright_yellow());
                let closest: Vec<&str> = result.ranked.iter().take(3).map(String::as_str).collect();
                if !closest.is_empty() {
                    println!("    closest: {}", closest.join(", "));
                }
            }
        }
    }

    Ok(())
}
