use thiserror::Error;

/// Everything that can stop one attendance lookup.
///
/// None of these are fatal for the process; the next interaction starts over.
#[derive(Error, Debug)]
pub enum Error {
    #[error("could not load sheet from {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("no row has a name column label (looked for {markers})")]
    HeaderNotFound { markers: String },

    #[error("no date columns next to header row {header_index}: {header_row:?}")]
    DateColumnsNotFound {
        header_index: usize,
        header_row: Vec<String>,
    },

    #[error("unknown date '{date}' (available: {})", .available.join(", "))]
    UnknownDate { date: String, available: Vec<String> },
}

impl Error {
    pub(crate) fn fetch(url: &str, reason: impl ToString) -> Self {
        Error::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
