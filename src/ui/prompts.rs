use anyhow::Result;
use dialoguer::{Confirm, FuzzySelect, Input, MultiSelect, Select};

pub const SHOW_ALL: &str = "Show all columns…";
pub const NONE_CHOICE: &str = "<None>";

/// Interactive confirmation prompt using arrow-key navigable selection
///
/// # Arguments
/// * `prompt` - The question to ask the user
/// * `default_yes` - Whether "Yes" should be the default selection (index 0)
///
/// # Returns
/// * `Ok(true)` if user selects "Yes"
/// * `Ok(false)` if user selects "No"
pub fn prompt_confirmation(prompt: &str, default_yes: bool) -> Result<bool> {
    let items = vec!["Yes", "No"];
    let default_index = if default_yes { 0 } else { 1 };

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(default_index)
        .interact()?;

    Ok(selection == 0)
}

pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(default).interact()?)
}

pub fn select_sheet(file_label: &str, sheets: &[String]) -> Result<String> {
    let selection = Select::new()
        .with_prompt(format!("Select the sheet to use from {}", file_label))
        .items(sheets)
        .default(0)
        .interact()?;

    Ok(sheets[selection].clone())
}

/// Pick a column, offering the suggestions first
///
/// With no suggestions the full (ranked) column list is shown straight away as
/// a fuzzy search.
pub fn select_column(prompt: &str, suggestions: &[String], all_columns: &[String]) -> Result<String> {
    if suggestions.is_empty() {
        return fuzzy_select_column(prompt, all_columns);
    }

    let mut items: Vec<&str> = suggestions.iter().map(String::as_str).collect();
    items.push(SHOW_ALL);

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;

    if selection == suggestions.len() {
        fuzzy_select_column(prompt, all_columns)
    } else {
        Ok(suggestions[selection].clone())
    }
}

/// Like [`select_column`], with a `<None>` entry for skipping the column
pub fn select_optional_column(
    prompt: &str,
    suggestions: &[String],
    all_columns: &[String],
) -> Result<Option<String>> {
    let mut items: Vec<&str> = vec![NONE_CHOICE];
    items.extend(suggestions.iter().map(String::as_str));
    items.push(SHOW_ALL);

    let default_index = if suggestions.is_empty() { 0 } else { 1 };
    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(default_index)
        .interact()?;

    match selection {
        0 => Ok(None),
        idx if idx == items.len() - 1 => fuzzy_select_column(prompt, all_columns).map(Some),
        idx => Ok(Some(suggestions[idx - 1].clone())),
    }
}

fn fuzzy_select_column(prompt: &str, columns: &[String]) -> Result<String> {
    let selection = FuzzySelect::new()
        .with_prompt(format!("{} (type to search)", prompt))
        .items(columns)
        .default(0)
        .interact()?;

    Ok(columns[selection].clone())
}

/// Choose any number of items, returning their indices
pub fn select_many(prompt: &str, items: &[String]) -> Result<Vec<usize>> {
    let selected = MultiSelect::new()
        .with_prompt(format!("{} (space to toggle, enter to confirm)", prompt))
        .items(items)
        .interact()?;

    Ok(selected)
}

pub fn text_input(prompt: &str, default: &str) -> Result<String> {
    let value = Input::<String>::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;
    Ok(value)
}
