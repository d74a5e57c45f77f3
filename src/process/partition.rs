use serde::Serialize;
use tracing::debug;

use super::RawTable;
use crate::config::SheetLayout;

/// One person's mark for the selected date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub name: String,
    pub attended: bool,
}

/// Names split by attendance, each list in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartitionResult {
    pub attendees: Vec<String>,
    pub absentees: Vec<String>,
}

impl PartitionResult {
    pub fn attended_count(&self) -> usize {
        self.attendees.len()
    }

    pub fn absent_count(&self) -> usize {
        self.absentees.len()
    }

    pub fn total(&self) -> usize {
        self.attendees.len() + self.absentees.len()
    }
}

impl FromIterator<RosterEntry> for PartitionResult {
    fn from_iter<I: IntoIterator<Item = RosterEntry>>(iter: I) -> Self {
        let mut out = PartitionResult::default();
        for entry in iter {
            if entry.attended {
                out.attendees.push(entry.name);
            } else {
                out.absentees.push(entry.name);
            }
        }
        out
    }
}

/// Walk the roster body below `header_index`, marking each name for `column_index`.
///
/// The walk stops at the first row with an empty name or at the headcount
/// row. Rows without any cells are skipped. A row too short to reach the
/// column counts as absent.
pub fn classify_rows<'a>(
    table: &'a RawTable,
    header_index: usize,
    column_index: usize,
    layout: &'a SheetLayout,
) -> impl Iterator<Item = RosterEntry> + 'a {
    table
        .rows()
        .iter()
        .enumerate()
        .skip(header_index + 1)
        .filter(|(_, row)| !row.is_empty())
        .map_while(move |(idx, row)| {
            let name = row[0].trim();
            if name.is_empty() || layout.is_summary_label(name) {
                debug!(row = idx, name, "roster ends");
                return None;
            }
            let attended = row
                .get(column_index)
                .is_some_and(|cell| layout.is_checked(cell));
            Some(RosterEntry {
                name: name.to_string(),
                attended,
            })
        })
}

pub fn partition(
    table: &RawTable,
    header_index: usize,
    column_index: usize,
    layout: &SheetLayout,
) -> PartitionResult {
    classify_rows(table, header_index, column_index, layout).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::tests::table;

    #[test]
    fn test_stops_at_empty_name() {
        let t = table(&[
            &["성함", "", "", "", "10/1"],
            &["Alice", "x", "x", "x", "TRUE"],
            &["", "", "", "", "TRUE"],
            &["Bob", "", "", "", "TRUE"],
        ]);
        let result = partition(&t, 0, 4, &SheetLayout::default());
        assert_eq!(result.attendees, vec!["Alice"]);
        assert!(result.absentees.is_empty());
    }

    #[test]
    fn test_stops_at_summary_row() {
        let t = table(&[
            &["성함", "", "", "", "10/1"],
            &["Alice", "", "", "", "TRUE"],
            &["참석 인원", "", "", "", "1"],
            &["Bob", "", "", "", "TRUE"],
        ]);
        let result = partition(&t, 0, 4, &SheetLayout::default());
        assert_eq!(result.attendees, vec!["Alice"]);
        assert_eq!(result.total(), 1);
    }

    #[test]
    fn test_one_marker_alone_is_a_name() {
        let t = table(&[&["성함"], &["참석", "", "", "", "TRUE"], &["인원"]]);
        let result = partition(&t, 0, 4, &SheetLayout::default());
        assert_eq!(result.attendees, vec!["참석"]);
        assert_eq!(result.absentees, vec!["인원"]);
    }

    #[test]
    fn test_short_row_is_absent() {
        let t = table(&[&["성함"], &["Carol"]]);
        let result = partition(&t, 0, 4, &SheetLayout::default());
        assert!(result.attendees.is_empty());
        assert_eq!(result.absentees, vec!["Carol"]);
    }

    #[test]
    fn test_cell_values() {
        let values = ["true", "True", " TRUE ", "false", "", "1", "Y"];
        let rows: Vec<Vec<String>> = std::iter::once(vec!["성함".to_string()])
            .chain(values.iter().enumerate().map(|(i, v)| {
                vec![format!("p{i}"), String::new(), String::new(), String::new(), v.to_string()]
            }))
            .collect();
        let t = RawTable::new(rows);
        let result = partition(&t, 0, 4, &SheetLayout::default());
        assert_eq!(result.attendees, vec!["p0", "p1", "p2"]);
        assert_eq!(result.absentees, vec!["p3", "p4", "p5", "p6"]);
    }

    #[test]
    fn test_skips_rows_without_cells_and_keeps_duplicates() {
        let t = table(&[
            &["성함"],
            &["  Alice ", "", "", "", "TRUE"],
            &[],
            &["Alice", "", "", "", "FALSE"],
            &["Dan", "", "", "", "TRUE"],
        ]);
        let entries: Vec<_> = classify_rows(&t, 0, 4, &SheetLayout::default()).collect();
        assert_eq!(
            entries,
            vec![
                RosterEntry { name: "Alice".into(), attended: true },
                RosterEntry { name: "Alice".into(), attended: false },
                RosterEntry { name: "Dan".into(), attended: true },
            ]
        );
        let result: PartitionResult = entries.into_iter().collect();
        assert_eq!(result.attendees, vec!["Alice", "Dan"]);
        assert_eq!(result.absentees, vec!["Alice"]);
        assert_eq!(result.attended_count(), 2);
        assert_eq!(result.absent_count(), 1);
    }

    #[test]
    fn test_header_at_end_yields_nothing() {
        let t = table(&[&["Alice", "", "", "", "TRUE"], &["성함"]]);
        assert_eq!(partition(&t, 1, 4, &SheetLayout::default()), PartitionResult::default());
    }
}
