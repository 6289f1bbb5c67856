//! Error and diagnostic types for metadata parsing.
//!
//! [`DecodeError`] covers byte-level failures and always carries the offset
//! at which the failing read started. [`ParseError`] wraps a `DecodeError`
//! with the section name and entry index, so a failure deep inside a
//! section's entry stream remains diagnosable from the top-level result.
//! [`ParseWarning`] is the non-fatal channel: conditions that do not abort
//! the parse are returned as values next to the document instead of being
//! logged.

use std::fmt;

use serde::Serialize;

/// A byte-level decoding failure.
///
/// The first fatal error aborts the whole parse; partially decoded state is
/// never returned alongside a fatal error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// A read would have advanced past the end of the buffer. The cursor
    /// position is left unchanged by the failed read.
    BufferOverrun {
        /// Offset at which the read started.
        offset: usize,
        /// Bytes the read needed (including any alignment padding).
        requested: usize,
        /// Bytes actually remaining at `offset`.
        available: usize,
    },
    /// Non-zero bytes found where zero padding is mandated.
    MalformedPadding {
        /// Offset of the first non-zero padding byte.
        offset: usize,
    },
    /// A buffer was not consumed exactly: either leftover bytes after the
    /// final record of a stream, or trailing content after a single-record
    /// section.
    TrailingData {
        /// Offset of the first unconsumed byte.
        offset: usize,
        /// Number of unconsumed bytes.
        remaining: usize,
    },
    /// An unsigned LEB128 value does not fit in 32 bits.
    VarintOverflow {
        /// Offset at which the varint started.
        offset: usize,
    },
    /// The module buffer does not begin with the `\0asm` magic.
    BadMagic,
    /// A length-prefixed string holds invalid UTF-8.
    InvalidUtf8 {
        /// Offset at which the string (length prefix included) started.
        offset: usize,
    },
    /// A top-level entry carries a discriminant this schema does not know.
    ///
    /// Treated as forward-compatibility skew, not corruption: the entry
    /// stream keeps what it decoded so far and reports the abandoned tail
    /// as a [`ParseWarning`] instead of failing. See
    /// [`crate::entries::read_entries`].
    UnknownEntryKind {
        /// The unrecognized discriminant.
        kind: i32,
        /// Offset of the entry that carried it.
        offset: usize,
    },
    /// A discriminant nested inside an entry is unknown. Fatal: the record
    /// cannot be sized, so the stream cannot be resynchronized past it.
    UnknownDiscriminant {
        /// What was being decoded (e.g. `"type descriptor"`).
        what: &'static str,
        /// The unrecognized discriminant.
        value: i32,
        /// Offset of the discriminant.
        offset: usize,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferOverrun {
                offset,
                requested,
                available,
            } => write!(
                f,
                "read of {requested} bytes at offset {offset} overruns the buffer ({available} bytes remain)"
            ),
            Self::MalformedPadding { offset } => {
                write!(f, "non-zero alignment padding at offset {offset}")
            }
            Self::TrailingData { offset, remaining } => {
                write!(f, "{remaining} trailing bytes at offset {offset}")
            }
            Self::VarintOverflow { offset } => {
                write!(f, "varint at offset {offset} does not fit in 32 bits")
            }
            Self::BadMagic => write!(f, "missing WASM magic header"),
            Self::InvalidUtf8 { offset } => {
                write!(f, "invalid UTF-8 in string at offset {offset}")
            }
            Self::UnknownEntryKind { kind, offset } => {
                write!(f, "unknown entry kind {kind} at offset {offset}")
            }
            Self::UnknownDiscriminant {
                what,
                value,
                offset,
            } => write!(f, "unknown {what} discriminant {value} at offset {offset}"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// A fatal parse failure with its location in the module.
///
/// `section` is `None` when the failure occurred in the module's own section
/// framing rather than inside a custom section; `entry_index` is `None` when
/// no entry stream was involved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// Name of the custom section being processed, if any.
    pub section: Option<String>,
    /// Index of the entry being decoded within the section, if any.
    pub entry_index: Option<usize>,
    /// The underlying byte-level failure.
    pub source: DecodeError,
}

impl ParseError {
    /// A failure in the module's section framing, outside any section body.
    pub(crate) fn module(source: DecodeError) -> Self {
        Self {
            section: None,
            entry_index: None,
            source,
        }
    }

    /// A failure while decoding entry `index` of some section; the section
    /// name is attached later via [`ParseError::with_section`].
    pub(crate) fn at_entry(index: usize, source: DecodeError) -> Self {
        Self {
            section: None,
            entry_index: Some(index),
            source,
        }
    }

    pub(crate) fn with_section(mut self, name: &str) -> Self {
        self.section = Some(name.to_string());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.section, self.entry_index) {
            (Some(section), Some(index)) => {
                write!(f, "section `{section}` entry {index}: {}", self.source)
            }
            (Some(section), None) => write!(f, "section `{section}`: {}", self.source),
            _ => write!(f, "{}", self.source),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// A non-fatal diagnostic collected during parsing.
///
/// Returned alongside the document rather than printed, so callers decide
/// how (and whether) to surface it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParseWarning {
    /// A section carried an entry kind this schema does not know. The
    /// entries decoded before it are kept; the remainder of that one
    /// section is skipped, since entries are not self-delimiting.
    UnknownEntryKind {
        /// Name of the affected section.
        section: String,
        /// Index of the unrecognized entry within the section.
        entry_index: usize,
        /// The unrecognized discriminant.
        kind: i32,
        /// Bytes abandoned from the unrecognized entry to the section end.
        skipped_bytes: usize,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEntryKind {
                section,
                entry_index,
                kind,
                skipped_bytes,
            } => write!(
                f,
                "section `{section}` entry {entry_index}: unknown entry kind {kind}, \
                 skipped the remaining {skipped_bytes} bytes"
            ),
        }
    }
}
