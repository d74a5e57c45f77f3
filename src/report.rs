use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::process::PartitionResult;

/// What gets shown for one selected date.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub date: String,
    pub attended_count: usize,
    pub absent_count: usize,
    pub attendees: Vec<String>,
    pub absentees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn new(date: impl Into<String>, result: PartitionResult) -> Self {
        Self {
            date: date.into(),
            attended_count: result.attended_count(),
            absent_count: result.absent_count(),
            attendees: result.attendees,
            absentees: result.absentees,
            fetched_at: None,
        }
    }

    pub fn with_fetched_at(mut self, at: DateTime<Utc>) -> Self {
        self.fetched_at = Some(at);
        self
    }

    /// Compact block for pasting into a group chat.
    pub fn to_clipboard_text(&self) -> String {
        format!(
            "[{}] 참석 {}명: {}\n[{}] 불참 {}명: {}",
            self.date,
            self.attended_count,
            join_names(&self.attendees),
            self.date,
            self.absent_count,
            join_names(&self.absentees),
        )
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "날짜: {}", self.date)?;
        if let Some(at) = self.fetched_at {
            writeln!(f, "기준: {}", at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        }
        writeln!(f, "참석자: {}명", self.attended_count)?;
        writeln!(f, "  {}", join_names(&self.attendees))?;
        writeln!(f, "불참자: {}명", self.absent_count)?;
        write!(f, "  {}", join_names(&self.absentees))
    }
}

fn join_names(names: &[String]) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}
