use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use log::{debug, info};

use subchassis_mapper::config::{Concept, Config};
use subchassis_mapper::mapping::{ColumnSuggester, KeySpec, columns_containing, rank_candidates};
use subchassis_mapper::report::{FilterSpec, category_key, render_bar_chart};
use subchassis_mapper::table::{ColumnRef, Table};
use subchassis_mapper::ui::{self, prompts};
use subchassis_mapper::{MapperError, MappingSession, SessionOutcome};

use super::load_table;

const CHART_WIDTH: usize = 40;

#[derive(Args, Debug)]
pub struct MapArgs {
    /// Planning workbook to enrich (.xlsx or .csv)
    #[arg(short, long)]
    pub planning: Option<PathBuf>,
    /// Reference workbook holding the attribute (.xlsx or .csv)
    #[arg(short, long)]
    pub reference: Option<PathBuf>,
    /// Sheet of the planning workbook
    #[arg(long)]
    pub planning_sheet: Option<String>,
    /// Sheet of the reference workbook
    #[arg(long)]
    pub reference_sheet: Option<String>,
    /// Key column pair PLANNING=REFERENCE; repeat for a composite key
    #[arg(short, long = "key", value_name = "LEFT=RIGHT", value_parser = parse_key_pair)]
    pub keys: Vec<(String, String)>,
    /// Reference column to carry over; repeatable (default: the configured attribute)
    #[arg(short, long = "attribute", value_name = "COLUMN")]
    pub attributes: Vec<String>,
    /// Keep rows whose COLUMN is one of the values; repeatable. The missing
    /// label (default `missing`) selects blank cells
    #[arg(short, long = "filter", value_name = "COLUMN=V1,V2", value_parser = parse_filter)]
    pub filters: Vec<(String, Vec<String>)>,
    /// Count rows per value of this column
    #[arg(short, long)]
    pub group_by: Option<String>,
    /// Add a summary sheet with statistics and a chart
    #[arg(long)]
    pub summary: bool,
    /// Output workbook (default: the configured output_file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Accept the best suggestions without prompting
    #[arg(short, long)]
    pub yes: bool,
}

/// Parse `LEFT=RIGHT`; a bare `NAME` uses the same column on both sides
pub fn parse_key_pair(s: &str) -> Result<(String, String), String> {
    let (left, right) = match s.split_once('=') {
        Some((left, right)) => (left.trim(), right.trim()),
        None => (s.trim(), s.trim()),
    };
    if left.is_empty() || right.is_empty() {
        return Err(format!("invalid key '{}', expected LEFT=RIGHT", s));
    }
    Ok((left.to_string(), right.to_string()))
}

/// Parse `COLUMN=V1,V2`
pub fn parse_filter(s: &str) -> Result<(String, Vec<String>), String> {
    let Some((column, values)) = s.split_once('=') else {
        return Err(format!("invalid filter '{}', expected COLUMN=V1,V2", s));
    };
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("invalid filter '{}', column name is empty", s));
    }
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    Ok((column.to_string(), values))
}

pub fn map_command(args: MapArgs) -> Result<()> {
    info!("Starting map command");
    let config = Config::load()?;
    let prompt = ui::is_interactive() && !args.yes;
    debug!("Prompting enabled: {}", prompt);

    let planning_path = resolve_path(args.planning.clone(), "Planning file", "--planning", prompt)?;
    let reference_path = resolve_path(args.reference.clone(), "Reference file", "--reference", prompt)?;

    let planning = load_table(&planning_path, args.planning_sheet.as_deref(), "the planning file", prompt)?;
    let reference = load_table(
        &reference_path,
        args.reference_sheet.as_deref(),
        "the reference file",
        prompt,
    )?;
    println!(
        "{} Loaded planning '{}' ({} rows) and reference '{}' ({} rows)",
        "✓".bright_green().bold(),
        planning.name(),
        planning.row_count(),
        reference.name(),
        reference.row_count()
    );

    let mut session = MappingSession::new(planning, reference);

    session.keys = if args.keys.is_empty() {
        choose_keys(&config, &session.planning, &session.reference, prompt)?
    } else {
        args.keys
            .iter()
            .fold(KeySpec::new(), |spec, (left, right)| spec.with_pair(left.as_str(), right.as_str()))
    };
    print_keys(&session.keys);

    session.attributes = if args.attributes.is_empty() {
        vec![choose_attribute(&config, &session.reference, prompt)?]
    } else {
        args.attributes.iter().map(ColumnRef::new).collect()
    };

    let attribute_names: Vec<String> = session
        .attributes
        .iter()
        .map(|a| a.name().to_string())
        .collect();

    session.filters = if args.filters.is_empty() && prompt {
        prompt_filters(&session.planning, &config.settings.missing_label)?
    } else {
        filters_from_args(&args.filters, &config.settings.missing_label)
    };

    session.group_by = match args.group_by {
        Some(column) => Some(ColumnRef::new(column)),
        None if prompt => {
            let mut columns = session.planning.column_names();
            columns.extend(attribute_names.iter().cloned());
            prompts::select_optional_column("Group counts by", &attribute_names, &columns)?.map(ColumnRef::new)
        }
        None => None,
    };

    session.summary = args.summary
        || (prompt
            && session.group_by.is_some()
            && prompts::prompt_confirmation("Add a summary sheet with a chart?", true)?);

    let outcome = session.run(&config)?;
    print_outcome(&outcome);

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.settings.output_file));
    if prompt
        && output.exists()
        && !prompts::prompt_confirmation(&format!("{:?} already exists. Overwrite?", output), false)?
    {
        println!("{} Cancelled, nothing written.", "❌".bright_red().bold());
        return Ok(());
    }

    fs::write(&output, &outcome.workbook)
        .with_context(|| format!("Failed to write output workbook: {:?}", output))?;
    info!("Wrote {} bytes to {:?}", outcome.workbook.len(), output);
    println!(
        "{} Saved {} rows to {}",
        "✓".bright_green().bold(),
        outcome.report.table.row_count(),
        output.display().to_string().bright_white().bold()
    );

    Ok(())
}

fn resolve_path(path: Option<PathBuf>, label: &str, flag: &str, prompt: bool) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None if prompt => Ok(PathBuf::from(prompts::text_input(label, "")?)),
        None => anyhow::bail!("{} is required when not running interactively (pass {})", label, flag),
    }
}

/// Pick a (planning, reference) column pair for every configured concept
fn choose_keys(config: &Config, planning: &Table, reference: &Table, prompt: bool) -> Result<KeySpec> {
    let suggester = config.suggester();
    let planning_columns = planning.column_names();
    let reference_columns = reference.column_names();

    let mut keys = KeySpec::new();
    let mut used_left: HashSet<String> = HashSet::new();
    let mut used_right: HashSet<String> = HashSet::new();

    for concept in &config.concepts {
        let Some(left) = choose_concept_column(&suggester, concept, &planning_columns, "planning", prompt)?
        else {
            continue;
        };
        let Some(right) = choose_concept_column(&suggester, concept, &reference_columns, "reference", prompt)?
        else {
            println!(
                "  {} No reference column for {}, not used as a key",
                "⚠️".bright_yellow().bold(),
                concept.name
            );
            continue;
        };

        if used_left.contains(&left) || used_right.contains(&right) {
            debug!("Skipping {}: '{}' / '{}' already part of the key", concept.name, left, right);
            continue;
        }
        info!("Key {}: '{}' = '{}'", concept.name, left, right);
        used_left.insert(left.clone());
        used_right.insert(right.clone());
        keys.push(left, right);
    }

    Ok(keys)
}

fn choose_concept_column(
    suggester: &ColumnSuggester,
    concept: &Concept,
    columns: &[String],
    table_label: &str,
    prompt: bool,
) -> Result<Option<String>> {
    if !prompt {
        return match suggester.best_of(&concept.synonyms, columns) {
            Some((name, score)) => {
                debug!("{} in {}: '{}' ({:.3})", concept.name, table_label, name, score);
                Ok(Some(name))
            }
            None if concept.required => Err(MapperError::NoMatchingColumns {
                concept: concept.name.clone(),
            }
            .into()),
            None => Ok(None),
        };
    }

    let mut suggestions: Vec<String> = Vec::new();
    if let Some((best, _)) = suggester.best_of(&concept.synonyms, columns) {
        suggestions.push(best);
    }
    let extra = suggester
        .suggest(&concept.synonyms, columns)
        .into_iter()
        .chain(columns_containing(&concept.name, columns));
    for column in extra {
        if !suggestions.contains(&column) {
            suggestions.push(column);
        }
    }

    let ranked = rank_candidates(&concept.synonyms, columns);
    let label = format!("Column for {} in the {} sheet", concept.name, table_label);
    if concept.required {
        prompts::select_column(&label, &suggestions, &ranked).map(Some)
    } else {
        prompts::select_optional_column(&label, &suggestions, &ranked)
    }
}

fn choose_attribute(config: &Config, reference: &Table, prompt: bool) -> Result<ColumnRef> {
    let attribute = &config.settings.attribute_column;
    if reference.has_column(attribute) || !prompt {
        return Ok(ColumnRef::new(attribute.clone()));
    }

    println!(
        "  {} Reference sheet has no '{}' column",
        "⚠️".bright_yellow().bold(),
        attribute
    );
    let columns = reference.column_names();
    let targets = [attribute.as_str()];
    let suggestions: Vec<String> = config.suggester().suggest(&targets, &columns).into_iter().collect();
    let ranked = rank_candidates(&targets, &columns);
    let chosen = prompts::select_column("Column to carry over from the reference sheet", &suggestions, &ranked)?;
    Ok(ColumnRef::new(chosen))
}

/// Build filters from `--filter` values; the missing label stands for blank cells
fn filters_from_args(args: &[(String, Vec<String>)], missing_label: &str) -> FilterSpec {
    let mut filters = FilterSpec::new();
    for (column, values) in args {
        let keys = values
            .iter()
            .map(|v| (v != missing_label).then(|| v.clone()));
        filters.insert_keys(column.as_str(), keys);
    }
    filters
}

fn prompt_filters(planning: &Table, missing_label: &str) -> Result<FilterSpec> {
    let mut filters = FilterSpec::new();
    if !prompts::confirm("Filter the planning rows before writing?", false)? {
        return Ok(filters);
    }

    let columns = planning.column_names();
    loop {
        let column = prompts::select_column("Filter on column", &[], &columns)?;
        let categories = distinct_categories(planning, &column)?;
        let labels: Vec<String> = categories
            .iter()
            .map(|key| match key {
                Some(text) => text.clone(),
                None => format!("<{}>", missing_label),
            })
            .collect();
        let chosen = prompts::select_many(&format!("Keep rows where {} is", column), &labels)?;
        filters.insert_keys(column.as_str(), chosen.into_iter().map(|idx| categories[idx].clone()));

        if !prompts::confirm("Add another filter?", false)? {
            break;
        }
    }
    Ok(filters)
}

/// Categories of `column` in order of first appearance; `None` is blank
fn distinct_categories(table: &Table, column: &str) -> Result<Vec<Option<String>>> {
    let mut seen = HashSet::new();
    let categories = table
        .column(column)?
        .values
        .iter()
        .map(category_key)
        .filter(|key| seen.insert(key.clone()))
        .collect();
    Ok(categories)
}

fn print_keys(keys: &KeySpec) {
    println!("  {}", "Join key:".bright_white().bold());
    for pair in keys.pairs() {
        println!("    {} → {}", pair.left.name().bright_cyan(), pair.right.name().bright_cyan());
    }
}

fn print_outcome(outcome: &SessionOutcome) {
    let join = &outcome.join;
    let stats = &outcome.report.stats;

    println!(
        "{} {} of {} planning rows matched",
        "✓".bright_green().bold(),
        join.matched_count(),
        join.row_count()
    );
    if join.duplicate_reference_rows > 0 {
        println!(
            "  {} {} reference rows repeat an earlier key; the first occurrence was used",
            "⚠️".bright_yellow().bold(),
            join.duplicate_reference_rows
        );
    }

    println!();
    println!("  {}", "Summary".bright_white().bold());
    println!("    Total rows:     {}", stats.total_rows);
    println!("    Distinct keys:  {}", stats.distinct_keys);
    let unmatched = stats.unmatched_rows.to_string();
    if stats.unmatched_rows > 0 {
        println!("    Unmatched rows: {} (highlighted)", unmatched.bright_red().bold());
    } else {
        println!("    Unmatched rows: {}", unmatched.bright_green());
    }

    if let Some(grouped) = outcome.report.grouped.as_ref().filter(|g| g.column_count() >= 2) {
        let category = &grouped.column_at(0).name;
        let count = &grouped.column_at(1).name;
        match render_bar_chart(grouped, category, count, CHART_WIDTH) {
            Ok(chart) => {
                println!();
                println!("  {}", format!("Rows by {}", category).bright_white().bold());
                print!("{}", chart);
            }
            Err(e) => debug!("Chart rendering failed: {}", e),
        }
    }
    println!();
}
