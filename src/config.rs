use std::time::Duration;

/// Published CSV export of the cohort's attendance sheet.
pub const DEFAULT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/1XqLy6uLi_S22wgBVM0lOsBGmQboQI_DA67MD7ipiUxw/export?format=csv&gid=663277277";

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Columns A..D hold per-person metadata; dates start at E.
pub const FIRST_DATE_COLUMN: usize = 4;

/// Where to fetch from and how long a fetched table stays good.
#[derive(Debug, Clone)]
pub struct Config {
    pub sheet_url: String,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_url: DEFAULT_SHEET_URL.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Labels the sheet uses to mark its structure.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    /// Either of these in column A marks the header row.
    pub name_markers: Vec<String>,
    /// A column A cell containing all of these is the trailing headcount row.
    pub summary_markers: Vec<String>,
    /// Checkbox cells export as TRUE/FALSE; compared after uppercasing.
    pub true_token: String,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            name_markers: vec!["성함".to_string(), "이름".to_string()],
            summary_markers: vec!["참석".to_string(), "인원".to_string()],
            true_token: "TRUE".to_string(),
        }
    }
}

impl SheetLayout {
    pub fn is_name_label(&self, cell: &str) -> bool {
        let cell = cell.trim();
        self.name_markers.iter().any(|m| cell.contains(m.as_str()))
    }

    pub fn is_summary_label(&self, name: &str) -> bool {
        !self.summary_markers.is_empty()
            && self.summary_markers.iter().all(|m| name.contains(m.as_str()))
    }

    pub fn is_checked(&self, cell: &str) -> bool {
        cell.trim().to_uppercase() == self.true_token
    }
}

/// Which candidate row wins when both yield the same number of date labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    #[default]
    PreferHeaderRow,
    PreferPriorRow,
}

/// Knobs for the date-column heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverPolicy {
    pub tie_break: TieBreak,
    pub first_date_column: usize,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::default(),
            first_date_column: FIRST_DATE_COLUMN,
        }
    }
}
