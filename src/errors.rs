use std::num::ParseIntError;

use thiserror::Error; // Import the `Error` derive macro from the `thiserror` crate

use crate::value::Kind;

/// A malformed path expression, with the 1-based position of the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    pub(crate) fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

// Every way a lookup can fail; the first one hit ends the traversal
#[derive(Debug, Error)]
pub enum PathError {
    // The expression itself could not be parsed
    #[error("syntax error at {0}")]
    Syntax(#[from] SyntaxError),

    // Navigated into an absent value, usually after a missed key
    #[error("property not found: cannot look up {key:?} in an absent value")]
    NotFound { key: String },

    // The current value has no notion of keys (scalars, functions, channels)
    #[error("value not supported: cannot look up {key:?} in a {kind} value")]
    NotSupported { key: String, kind: Kind },

    // A sequence step whose key is not a base-10 integer
    #[error("invalid index {key:?}: {source}")]
    IndexParse {
        key: String,
        #[source]
        source: ParseIntError,
    },

    // A sequence step outside `0..len`
    #[error("invalid index {index}: sequence has {len} element(s)")]
    InvalidIndex { index: i64, len: usize },
}

/// Fieldless discriminant of [`PathError`], for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    NotFound,
    NotSupported,
    IndexParse,
    InvalidIndex,
}

impl PathError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PathError::Syntax(_) => ErrorKind::Syntax,
            PathError::NotFound { .. } => ErrorKind::NotFound,
            PathError::NotSupported { .. } => ErrorKind::NotSupported,
            PathError::IndexParse { .. } => ErrorKind::IndexParse,
            PathError::InvalidIndex { .. } => ErrorKind::InvalidIndex,
        }
    }

    /// The position-carrying syntax error, if this is one.
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            PathError::Syntax(e) => Some(e),
            _ => None,
        }
    }
}

// Type alias for results that use `PathError` as the error type
pub type Result<T> = std::result::Result<T, PathError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn syntax_error_display_carries_position() {
        let e = PathError::from(SyntaxError::new(r#"expected "]", found ".""#, 1, 6));
        assert_eq!(e.to_string(), r#"syntax error at 1:6: expected "]", found ".""#);
        assert_eq!(e.kind(), ErrorKind::Syntax);
        assert_eq!(e.as_syntax().map(|s| s.column), Some(6));
    }

    #[test]
    fn index_parse_keeps_source() {
        let source = "a".parse::<i64>().unwrap_err();
        let e = PathError::IndexParse {
            key: "a".into(),
            source,
        };
        assert!(std::error::Error::source(&e).is_some());
        assert_eq!(e.kind(), ErrorKind::IndexParse);
    }
}
