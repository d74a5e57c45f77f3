// src/process/mod.rs
use csv::ReaderBuilder;
use std::io::Read;
use tracing::{debug, instrument};

use crate::config::{ResolverPolicy, SheetLayout};
use crate::error::{Error, Result};

pub mod columns;
pub mod header;
pub mod partition;

pub use columns::{resolve_date_columns, DateColumnMap, DateRowSource};
pub use header::locate_header;
pub use partition::{classify_rows, partition, PartitionResult, RosterEntry};

/// One CSV snapshot of the sheet, exactly as exported.
///
/// Rows keep whatever length the export gave them; nothing is padded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Parse CSV text. A leading byte-order mark is dropped.
    pub fn from_csv_str(text: &str) -> std::result::Result<Self, csv::Error> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        Self::from_csv_reader(text.as_bytes())
    }

    /// Parse CSV from any reader, honouring quotes and allowing ragged records.
    pub fn from_csv_reader<R: Read>(reader: R) -> std::result::Result<Self, csv::Error> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // exports trim trailing empty cells on some rows
            .from_reader(reader);

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A table whose header row and date columns have been found.
///
/// Built once per fetched table; each date selection then only runs the
/// partitioner.
#[derive(Debug)]
pub struct Roster<'a> {
    table: &'a RawTable,
    layout: &'a SheetLayout,
    header_index: usize,
    dates: DateColumnMap,
}

impl<'a> Roster<'a> {
    #[instrument(level = "debug", skip_all, fields(rows = table.len()))]
    pub fn analyze(
        table: &'a RawTable,
        layout: &'a SheetLayout,
        policy: ResolverPolicy,
    ) -> Result<Self> {
        let header_index = locate_header(table, layout).ok_or_else(|| Error::HeaderNotFound {
            markers: layout.name_markers.join(", "),
        })?;

        let dates = resolve_date_columns(table, header_index, policy).ok_or_else(|| {
            Error::DateColumnsNotFound {
                header_index,
                header_row: table
                    .row(header_index)
                    .map(<[String]>::to_vec)
                    .unwrap_or_default(),
            }
        })?;

        debug!(
            header_index,
            date_row = dates.row_index(),
            source = ?dates.source(),
            dates = dates.len(),
            "roster layout resolved"
        );

        Ok(Self {
            table,
            layout,
            header_index,
            dates,
        })
    }

    pub fn header_index(&self) -> usize {
        self.header_index
    }

    pub fn date_columns(&self) -> &DateColumnMap {
        &self.dates
    }

    /// Date labels in column order.
    pub fn dates(&self) -> impl Iterator<Item = &str> + '_ {
        self.dates.labels()
    }

    /// The leftmost date; what a fresh selection starts on.
    pub fn default_date(&self) -> Option<&str> {
        self.dates.labels().next()
    }

    /// Split the roster into attendees and absentees for one date label.
    pub fn attendance(&self, date: &str) -> Result<PartitionResult> {
        let date = date.trim();
        let column = self.dates.get(date).ok_or_else(|| Error::UnknownDate {
            date: date.to_string(),
            available: self.dates.labels().map(str::to_string).collect(),
        })?;
        Ok(partition(self.table, self.header_index, column, self.layout))
    }
}
