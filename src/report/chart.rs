//! Plain-text bar chart for grouped counts

use crate::error::Result;
use crate::table::{CellValue, Table};

const BAR: char = '█';

/// Render `category_column` / `count_column` as horizontal bars
///
/// The longest bar is `width` characters; every non-zero count gets at least
/// one.
pub fn render_bar_chart(
    table: &Table,
    category_column: &str,
    count_column: &str,
    width: usize,
) -> Result<String> {
    let categories = &table.column(category_column)?.values;
    let counts: Vec<f64> = table
        .column(count_column)?
        .values
        .iter()
        .map(|v| match v {
            CellValue::Number(n) => *n,
            _ => 0.0,
        })
        .collect();

    let labels: Vec<String> = categories.iter().map(|c| c.to_string()).collect();
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let max = counts.iter().copied().fold(0.0_f64, f64::max);

    let mut out = String::new();
    for (label, count) in labels.iter().zip(&counts) {
        let bar_len = if max > 0.0 && *count > 0.0 {
            ((count / max) * width as f64).round().max(1.0) as usize
        } else {
            0
        };
        out.push_str(&format!(
            "{:<label_width$} │ {} {}\n",
            label,
            BAR.to_string().repeat(bar_len),
            count,
        ));
    }

    Ok(out)
}
