use tracing::trace;

use super::RawTable;
use crate::config::SheetLayout;

/// Index of the first row whose column A carries a name label.
///
/// Rows with no cells at all are passed over.
pub fn locate_header(table: &RawTable, layout: &SheetLayout) -> Option<usize> {
    let found = table
        .rows()
        .iter()
        .position(|row| row.first().is_some_and(|cell| layout.is_name_label(cell)));
    trace!(?found, rows = table.len(), "header scan done");
    found
}
