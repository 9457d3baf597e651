//! Error types for table construction, data binding, and rendering.
//!
//! All errors are raised synchronously and propagate to the caller; nothing
//! is retried or recovered internally. Binding failures are row-scoped: rows
//! committed earlier in the same append call stay in the table.

use thiserror::Error;

use crate::schema::ColumnType;

/// The error taxonomy for all core table operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    /// Malformed, ambiguous, or empty table description; unknown column
    /// type; or an over-long column specification.
    #[error("schema error: {0}")]
    Schema(String),

    /// The payload shape does not match the expected container at a column.
    #[error("structural mismatch at column '{column}': {message}")]
    StructuralMismatch {
        /// The column being bound when the mismatch was found.
        column: String,
        /// What was expected versus what was found.
        message: String,
    },

    /// A positional payload carries more elements than there are columns
    /// left to fill.
    #[error("too many values: {given} given with only {remaining} columns remaining")]
    Cardinality {
        /// Number of payload elements.
        given: usize,
        /// Number of columns left from the current cursor position.
        remaining: usize,
    },

    /// A cell value is incompatible with its column's declared type.
    /// Raised lazily, at encode time.
    #[error("type mismatch: column type '{expected}' cannot encode a {found} value")]
    TypeMismatch {
        /// The column's declared type.
        expected: ColumnType,
        /// The runtime shape of the offending value.
        found: &'static str,
    },

    /// A column id referenced by a render option or sort key does not
    /// exist in the table.
    #[error("unknown column id '{0}'")]
    UnknownColumn(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = TableError::Schema("empty sequence".to_string());
        assert_eq!(err.to_string(), "schema error: empty sequence");

        let err = TableError::TypeMismatch {
            expected: ColumnType::Number,
            found: "text",
        };
        assert!(err.to_string().contains("number"));
        assert!(err.to_string().contains("text"));

        let err = TableError::Cardinality {
            given: 5,
            remaining: 2,
        };
        assert!(err.to_string().contains('5'));
        assert!(err.to_string().contains('2'));
    }
}
