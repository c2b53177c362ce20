use std::io;
use std::path::PathBuf;

/// Errors raised while building a [`FlightTable`](crate::FlightTable).
///
/// Lookups never fail; only table construction can.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read flight table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid flight table JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("flight table contains an entry with an empty flight id")]
    EmptyFlightId,

    /// Two entries normalize to the same key, e.g. `"ba001"` and `"BA001"`.
    #[error("flight {0} appears more than once in the table")]
    DuplicateFlight(String),
}
