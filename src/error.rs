//! Error types for matlook.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a run.
#[derive(Debug, Error)]
pub enum Error {
    /// The named input ("matrix" or "mapping") had no content.
    #[error("{source_name} input is empty, aborting")]
    EmptyInput { source_name: &'static str },

    #[error("malformed matrix: {0}")]
    MalformedMatrix(#[from] MatrixDefect),

    #[error("malformed mapping: {0}")]
    MalformedMapping(#[from] MappingDefect),

    /// Cluster merging was requested but no mapping was supplied.
    #[error("cluster merge requested without a mapping")]
    MissingMapping,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("pixel buffer does not fit a {width}x{height} image")]
    ImageBuffer { width: u32, height: u32 },
}

impl Error {
    pub fn empty_input(source_name: &'static str) -> Self {
        Self::EmptyInput { source_name }
    }
}

/// Which part of a matrix failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixDefect {
    #[error("size header must be two non-negative integers, got {line:?}")]
    Header { line: String },

    #[error("dimensions must be at least 1x1, got {height}x{width}")]
    ZeroDimension { height: usize, width: usize },

    #[error("row {row}, column {column}: {token:?} is not a number")]
    Value {
        row: usize,
        column: usize,
        token: String,
    },

    #[error("row {row} has {actual} values, expected width {expected}")]
    Width {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("found {actual} rows, expected height {expected}")]
    Height { expected: usize, actual: usize },
}

/// Which part of a mapping failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingDefect {
    #[error("size header must be two non-negative integers, got {tokens:?}")]
    Header { tokens: Vec<String> },

    #[error("entry {index}: {token:?} is not an integer")]
    Value { index: usize, token: String },

    #[error("{actual} entries match neither declared height {height} nor width {width}")]
    Length {
        height: usize,
        width: usize,
        actual: usize,
    },

    #[error("{actual} entries for a matrix with {expected} columns")]
    ColumnCount { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failing_dimension() {
        let err = Error::from(MatrixDefect::Width {
            row: 2,
            expected: 3,
            actual: 4,
        });
        assert_eq!(
            err.to_string(),
            "malformed matrix: row 2 has 4 values, expected width 3"
        );

        let err = Error::from(MappingDefect::Length {
            height: 2,
            width: 3,
            actual: 5,
        });
        assert!(err.to_string().contains("height 2"));
        assert!(err.to_string().contains("width 3"));

        assert_eq!(
            Error::empty_input("matrix").to_string(),
            "matrix input is empty, aborting"
        );
    }
}
