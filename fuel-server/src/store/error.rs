//! Station store error types.

use crate::domain::StationId;

/// Errors from the station store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The backing file is not valid station JSON
    #[error("JSON error: {message}")]
    Json { message: String },

    /// A price feed row could not be read
    #[error("CSV error{}: {message}", line.map(|l| format!(" on line {l}")).unwrap_or_default())]
    Csv { line: Option<u64>, message: String },

    /// No station with this id
    #[error("unknown station {0}")]
    UnknownStation(StationId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::UnknownStation(StationId(9));
        assert_eq!(err.to_string(), "unknown station 9");

        let err = StoreError::Csv {
            line: Some(4),
            message: "invalid float literal".into(),
        };
        assert_eq!(err.to_string(), "CSV error on line 4: invalid float literal");

        let err = StoreError::Csv {
            line: None,
            message: "bad header".into(),
        };
        assert_eq!(err.to_string(), "CSV error: bad header");
    }
}
