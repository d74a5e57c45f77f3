use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use super::RawTable;
use crate::config::{ResolverPolicy, TieBreak};

/// Which row the date labels were read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRowSource {
    HeaderRow,
    PriorRow,
}

/// Date label → column index, in column order.
///
/// Labels are trimmed and unique. When two columns carry the same label the
/// later column wins while the label keeps its first position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateColumnMap {
    source: DateRowSource,
    row_index: usize,
    columns: IndexMap<String, usize>,
}

impl DateColumnMap {
    pub fn source(&self) -> DateRowSource {
        self.source
    }

    /// Row the labels came from.
    pub fn row_index(&self) -> usize {
        self.row_index
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.columns.get(label).copied()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.columns.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Non-empty labels at or right of `first_date_column` in one row.
pub fn date_labels_in_row(row: &[String], first_date_column: usize) -> IndexMap<String, usize> {
    let mut labels = IndexMap::new();
    for (idx, cell) in row.iter().enumerate().skip(first_date_column) {
        let label = cell.trim();
        if !label.is_empty() {
            labels.insert(label.to_string(), idx);
        }
    }
    labels
}

/// Pick between the header row's labels and the labels of the row above it.
///
/// The winner has at least one label and at least as many as the other
/// candidate; equal counts go to the side named by `tie_break`. This is a
/// guess about sheet layout, not a rule the sheet promises to follow.
pub fn choose_date_row(header: usize, prior: usize, tie_break: TieBreak) -> Option<DateRowSource> {
    let (preferred, preferred_len, other, other_len) = match tie_break {
        TieBreak::PreferHeaderRow => (DateRowSource::HeaderRow, header, DateRowSource::PriorRow, prior),
        TieBreak::PreferPriorRow => (DateRowSource::PriorRow, prior, DateRowSource::HeaderRow, header),
    };
    if preferred_len > 0 && preferred_len >= other_len {
        Some(preferred)
    } else if other_len > 0 {
        Some(other)
    } else {
        None
    }
}

/// Find the date columns for the header at `header_index`.
///
/// Some layouts put dates on the header row itself, others merge them into
/// the row above; both are tried and [`choose_date_row`] decides.
pub fn resolve_date_columns(
    table: &RawTable,
    header_index: usize,
    policy: ResolverPolicy,
) -> Option<DateColumnMap> {
    let header_labels = table
        .row(header_index)
        .map(|row| date_labels_in_row(row, policy.first_date_column))
        .unwrap_or_default();
    let prior_labels = header_index
        .checked_sub(1)
        .and_then(|i| table.row(i))
        .map(|row| date_labels_in_row(row, policy.first_date_column))
        .unwrap_or_default();

    let source = choose_date_row(header_labels.len(), prior_labels.len(), policy.tie_break);
    debug!(
        header_index,
        header_labels = header_labels.len(),
        prior_labels = prior_labels.len(),
        ?source,
        "date row candidates"
    );

    match source? {
        DateRowSource::HeaderRow => Some(DateColumnMap {
            source: DateRowSource::HeaderRow,
            row_index: header_index,
            columns: header_labels,
        }),
        DateRowSource::PriorRow => Some(DateColumnMap {
            source: DateRowSource::PriorRow,
            row_index: header_index - 1,
            columns: prior_labels,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::tests::table;

    #[test]
    fn test_header_row_labels_from_column_e() {
        let t = table(&[&["성함", "반", "조", "비고", "10/1", " 10/8 ", "", "10/15"]]);
        let map = resolve_date_columns(&t, 0, ResolverPolicy::default()).unwrap();
        assert_eq!(map.source(), DateRowSource::HeaderRow);
        assert_eq!(map.row_index(), 0);
        assert_eq!(
            map.iter().collect::<Vec<_>>(),
            vec![("10/1", 4), ("10/8", 5), ("10/15", 7)]
        );
    }

    #[test]
    fn test_prior_row_used_when_header_has_none() {
        let t = table(&[
            &["문샷 1기"],
            &["", "", "", "", "11/5"],
            &["이름"],
        ]);
        let map = resolve_date_columns(&t, 2, ResolverPolicy::default()).unwrap();
        assert_eq!(map.source(), DateRowSource::PriorRow);
        assert_eq!(map.row_index(), 1);
        assert_eq!(map.get("11/5"), Some(4));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_prior_row_used_when_it_has_more_labels() {
        let t = table(&[
            &["", "", "", "", "10/1", "10/8", "10/15"],
            &["성함", "", "", "", "출석"],
        ]);
        let map = resolve_date_columns(&t, 1, ResolverPolicy::default()).unwrap();
        assert_eq!(map.source(), DateRowSource::PriorRow);
        assert_eq!(map.labels().collect::<Vec<_>>(), vec!["10/1", "10/8", "10/15"]);
    }

    #[test]
    fn test_tie_goes_to_header_row_by_default() {
        let t = table(&[
            &["", "", "", "", "1주차", "2주차"],
            &["성함", "", "", "", "10/1", "10/8"],
        ]);
        let map = resolve_date_columns(&t, 1, ResolverPolicy::default()).unwrap();
        assert_eq!(map.source(), DateRowSource::HeaderRow);
        assert_eq!(map.get("10/1"), Some(4));

        // same input, same answer
        assert_eq!(
            resolve_date_columns(&t, 1, ResolverPolicy::default()),
            Some(map)
        );
    }

    #[test]
    fn test_tie_break_can_prefer_prior_row() {
        let t = table(&[
            &["", "", "", "", "1주차", "2주차"],
            &["성함", "", "", "", "10/1", "10/8"],
        ]);
        let policy = ResolverPolicy {
            tie_break: TieBreak::PreferPriorRow,
            ..ResolverPolicy::default()
        };
        let map = resolve_date_columns(&t, 1, policy).unwrap();
        assert_eq!(map.source(), DateRowSource::PriorRow);
        assert_eq!(map.get("1주차"), Some(4));
    }

    #[test]
    fn test_no_labels_anywhere() {
        let t = table(&[&["", "a", "b", "c"], &["성함", "", "", "", "  "]]);
        assert_eq!(resolve_date_columns(&t, 1, ResolverPolicy::default()), None);

        // header on the first row has no prior candidate
        let t = table(&[&["성함"]]);
        assert_eq!(resolve_date_columns(&t, 0, ResolverPolicy::default()), None);
    }

    #[test]
    fn test_duplicate_label_last_column_wins() {
        let t = table(&[&["성함", "", "", "", "10/1", "10/8", "10/1"]]);
        let map = resolve_date_columns(&t, 0, ResolverPolicy::default()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("10/1"), Some(6));
        assert_eq!(map.labels().collect::<Vec<_>>(), vec!["10/1", "10/8"]);
    }

    #[test]
    fn test_choose_date_row_table() {
        use DateRowSource::*;
        use TieBreak::*;
        assert_eq!(choose_date_row(2, 2, PreferHeaderRow), Some(HeaderRow));
        assert_eq!(choose_date_row(1, 3, PreferHeaderRow), Some(PriorRow));
        assert_eq!(choose_date_row(0, 1, PreferHeaderRow), Some(PriorRow));
        assert_eq!(choose_date_row(3, 0, PreferHeaderRow), Some(HeaderRow));
        assert_eq!(choose_date_row(0, 0, PreferHeaderRow), None);
        assert_eq!(choose_date_row(2, 2, PreferPriorRow), Some(PriorRow));
        assert_eq!(choose_date_row(3, 1, PreferPriorRow), Some(HeaderRow));
        assert_eq!(choose_date_row(0, 0, PreferPriorRow), None);
    }
}
