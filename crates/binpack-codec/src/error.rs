use std::fmt;

use crate::token::Kind;

/// Errors that can occur while packing, unpacking or sizing a format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    /// The format names more fields than there are values to pack.
    #[error("format ({format}) is longer than values ({values}) to pack")]
    FormatLengthMismatch { format: usize, values: usize },

    /// A value's kind does not match the kind its token expects.
    #[error("value {index} is {found} but token '{token}' expects {expected}")]
    TypeMismatch {
        index: usize,
        token: String,
        expected: Kind,
        found: Kind,
    },

    /// A string value does not fit the fixed width declared by its token.
    #[error("string value {index} is {len} bytes, wider than its {width}-byte field")]
    StringTooLong { index: usize, width: usize, len: usize },

    /// A format token is not part of the grammar.
    #[error("unexpected format token {index}: '{token}'")]
    UnknownToken { index: usize, token: String },

    /// The buffer holds fewer bytes than the format describes.
    #[error("buffer too short ({available} bytes, format needs {needed})")]
    BufferTooShort { needed: usize, available: usize },

    /// A fixed-width string field does not hold valid UTF-8.
    #[error("string field {index} is not valid UTF-8")]
    InvalidUtf8 { index: usize },
}

/// Coarse classification of a [`PackError`].
///
/// `StringTooLong` classifies as [`ErrorKind::TypeMismatch`]: the value does not
/// fit the type its token declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FormatLengthMismatch,
    TypeMismatch,
    UnknownToken,
    BufferTooShort,
    InvalidUtf8,
}

impl PackError {
    pub(crate) fn unknown_token(index: usize, token: &str) -> Self {
        PackError::UnknownToken {
            index,
            token: token.to_string(),
        }
    }

    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PackError::FormatLengthMismatch { .. } => ErrorKind::FormatLengthMismatch,
            PackError::TypeMismatch { .. } | PackError::StringTooLong { .. } => {
                ErrorKind::TypeMismatch
            }
            PackError::UnknownToken { .. } => ErrorKind::UnknownToken,
            PackError::BufferTooShort { .. } => ErrorKind::BufferTooShort,
            PackError::InvalidUtf8 { .. } => ErrorKind::InvalidUtf8,
        }
    }

    /// Index of the format token the error refers to, if any.
    pub fn token_index(&self) -> Option<usize> {
        match *self {
            PackError::TypeMismatch { index, .. }
            | PackError::StringTooLong { index, .. }
            | PackError::UnknownToken { index, .. }
            | PackError::InvalidUtf8 { index } => Some(index),
            PackError::FormatLengthMismatch { .. } | PackError::BufferTooShort { .. } => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::FormatLengthMismatch => "format length mismatch",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::UnknownToken => "unknown token",
            ErrorKind::BufferTooShort => "buffer too short",
            ErrorKind::InvalidUtf8 => "invalid utf-8",
        };
        f.write_str(name)
    }
}

pub type Result<T> = std::result::Result<T, PackError>;
