//! The selections made for one run and the pipeline that consumes them

use log::{debug, info};

use crate::config::Config;
use crate::error::{MapperError, Result};
use crate::excel::{HighlightSpec, SummarySheet, XlsxWriter};
use crate::mapping::{JoinReconciler, JoinResult, KeySpec};
use crate::report::{FilterSpec, Report, ReportAssembler};
use crate::table::{ColumnRef, Table};

/// Everything chosen for one mapping run
///
/// The CLI fills this from flags and prompts; [`run`](Self::run) does no I/O.
#[derive(Debug, Clone)]
pub struct MappingSession {
    pub planning: Table,
    pub reference: Table,
    pub keys: KeySpec,
    /// Reference columns to carry over; empty means the configured attribute
    pub attributes: Vec<ColumnRef>,
    pub filters: FilterSpec,
    pub group_by: Option<ColumnRef>,
    pub summary: bool,
}

#[derive(Debug)]
pub struct SessionOutcome {
    pub join: JoinResult,
    pub report: Report,
    pub highlight: HighlightSpec,
    /// Serialized output workbook
    pub workbook: Vec<u8>,
}

impl MappingSession {
    pub fn new(planning: Table, reference: Table) -> Self {
        Self {
            planning,
            reference,
            keys: KeySpec::new(),
            attributes: Vec::new(),
            filters: FilterSpec::new(),
            group_by: None,
            summary: false,
        }
    }

    pub fn attributes_or_default(&self, config: &Config) -> Vec<ColumnRef> {
        if self.attributes.is_empty() {
            vec![ColumnRef::new(config.settings.attribute_column.clone())]
        } else {
            self.attributes.clone()
        }
    }

    pub fn run(&self, config: &Config) -> Result<SessionOutcome> {
        let attributes = self.attributes_or_default(config);
        info!(
            "Mapping '{}' ({} rows) against '{}' ({} rows) on {} key column(s)",
            self.planning.name(),
            self.planning.row_count(),
            self.reference.name(),
            self.reference.row_count(),
            self.keys.len()
        );

        let join = JoinReconciler::new(config.join_options()).join(
            &self.planning,
            &self.reference,
            &self.keys,
            &attributes,
        )?;

        let key_column = self
            .keys
            .pairs()
            .first()
            .map(|pair| pair.left.clone())
            .ok_or(MapperError::EmptyKeySpec)?;
        let attribute_column = join
            .attribute_columns
            .first()
            .cloned()
            .ok_or_else(|| MapperError::column_not_found(&config.settings.attribute_column, self.reference.name()))?;

        let assembler = ReportAssembler::new(key_column, attribute_column)
            .with_missing_label(config.settings.missing_label.clone());
        let report = assembler.filter_and_summarize(&join, &self.filters, self.group_by.as_ref())?;

        let mut highlight = HighlightSpec::new();
        for column in &join.attribute_columns {
            highlight.merge(HighlightSpec::missing_in(&report.table, column)?);
        }
        debug!("{} cells to highlight", highlight.len());

        let writer: XlsxWriter = config.writer();
        let summary = self.summary.then(|| SummarySheet {
            stats: &report.stats,
            grouped: report.grouped.as_ref(),
        });
        let workbook = writer.write_report(
            &report.table,
            &config.settings.output_sheet,
            &highlight,
            summary,
        )?;

        Ok(SessionOutcome {
            join,
            report,
            highlight,
            workbook,
        })
    }
}
