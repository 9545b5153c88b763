use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the analysis pipeline.
///
/// Load errors (`NotFound`, `Parse`) abort a run; the remaining variants
/// abort only the step that raised them.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input file not found or unreadable: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    #[error("column '{column}' in table '{table}' holds a non-numeric {found} value at row {row}")]
    TypeMismatch {
        table: String,
        column: String,
        row: usize,
        found: &'static str,
    },

    #[error("sentiment scoring failed at row {row}: {source}")]
    Scoring {
        row: usize,
        #[source]
        source: ScoringError,
    },
}

impl PipelineError {
    pub(crate) fn parse(path: &std::path::Path, message: impl std::fmt::Display) -> Self {
        PipelineError::Parse {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Whether the run can continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PipelineError::NotFound { .. } | PipelineError::Parse { .. })
    }
}

/// Failure reported by a polarity scorer for a single text.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{0}")]
pub struct ScoringError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_errors_are_fatal() {
        let err = PipelineError::NotFound {
            path: PathBuf::from("missing.csv"),
        };
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "input file not found or unreadable: missing.csv");

        let err = PipelineError::ColumnNotFound {
            table: "books".into(),
            column: "rating".into(),
        };
        assert!(!err.is_fatal());
    }

    #[test]
    fn scoring_error_keeps_source() {
        let err = PipelineError::Scoring {
            row: 3,
            source: ScoringError("model offline".into()),
        };
        assert_eq!(err.to_string(), "sentiment scoring failed at row 3: model offline");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<PipelineError>();
        assert_sync::<PipelineError>();
    }
}
