use thiserror::Error;

/// Result type shared across column operations.
pub type ColumnResult<T> = Result<T, ColumnError>;

/// Failures raised by the byte-level reader/writer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The input ended before the requested bytes were available.
    #[error("input truncated: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Bytes requested by the decoder.
        needed: usize,
        /// Bytes left in the input.
        remaining: usize,
    },
    /// The input bytes do not describe a valid value.
    #[error("malformed input: {0}")]
    Malformed(String),
    /// A bounded output buffer has no room for the write.
    #[error("output overflow: needed {needed} bytes, {remaining} remaining")]
    Overflow {
        /// Bytes the encoder tried to write.
        needed: usize,
        /// Room left in the output.
        remaining: usize,
    },
}

/// Errors surfaced by columns and type descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnError {
    /// Element index is past the end of the column.
    #[error("index {index} out of range for column of size {size}")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Column size at the time of the call.
        size: usize,
    },
    /// Slice bounds exceed the column.
    #[error("slice [{offset}, {offset}+{len}) out of range for column of size {size}")]
    SliceOutOfRange {
        /// First row of the slice.
        offset: usize,
        /// Number of rows requested.
        len: usize,
        /// Column size at the time of the call.
        size: usize,
    },
    /// Operand or downcast target does not match the column type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected type name.
        expected: String,
        /// Actual type name.
        actual: String,
    },
    /// Value is longer than the fixed width of the column.
    #[error("value of {actual} bytes does not fit fixed width {width}")]
    InvalidWidth {
        /// Configured width.
        width: usize,
        /// Length of the rejected value.
        actual: usize,
    },
    /// Value cannot be represented by the column.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Column or type constructed with unsupported parameters.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Type name that cannot be parsed or has no column implementation.
    #[error("unknown type: {0}")]
    UnknownType(String),
    /// Codec failure while saving or loading.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

impl ColumnError {
    pub(crate) fn type_mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        ColumnError::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Ensures `index` addresses an element of a column of `size` rows.
pub(crate) fn check_index(index: usize, size: usize) -> ColumnResult<()> {
    if index >= size {
        return Err(ColumnError::OutOfRange { index, size });
    }
    Ok(())
}

/// Ensures `[offset, offset + len)` lies inside a column of `size` rows.
pub(crate) fn check_slice(offset: usize, len: usize, size: usize) -> ColumnResult<()> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(ColumnError::SliceOutOfRange { offset, len, size }),
    }
}
