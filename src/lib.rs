//! Attendance lookup over a published roster sheet.
//!
//! [`fetch::SheetFetcher`] downloads the CSV export, [`process::Roster`]
//! finds the header and date columns, and [`report::Report`] formats the
//! split for one date.

pub mod config;
pub mod error;
pub mod fetch;
pub mod process;
pub mod report;

pub use config::{Config, ResolverPolicy, SheetLayout, TieBreak};
pub use error::{Error, Result};
pub use fetch::{SheetFetcher, Snapshot};
pub use process::{PartitionResult, RawTable, Roster};
pub use report::Report;
