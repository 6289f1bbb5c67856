//! Entry streams: same-format records packed back-to-back in one buffer.
//!
//! Metadata sections carry an arbitrary number of concatenated XDR entries
//! with no count prefix; exact buffer exhaustion, not a counter, terminates
//! the stream. The decoder is an explicit trait parameter so the stream
//! stays decoupled from any particular schema.

use crate::cursor::XdrCursor;
use crate::error::{DecodeError, ParseError};

/// Decodes one logical record from a positioned cursor, advancing the
/// cursor past it.
pub trait ReadXdr: Sized {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError>;
}

/// Entries drained from one section's content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionEntries<T> {
    pub entries: Vec<T>,
    /// Present when the stream stopped early at an unrecognized entry kind.
    pub skipped: Option<SkippedTail>,
}

/// Description of a section tail abandoned at an unknown entry kind.
///
/// Entries are not self-delimiting, so nothing after the unrecognized
/// discriminant can be reframed; the whole tail is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkippedTail {
    /// Index of the unrecognized entry.
    pub entry_index: usize,
    /// The unrecognized discriminant.
    pub kind: i32,
    /// Bytes from the start of that entry to the end of the section.
    pub remaining: usize,
}

/// Decode entries from a section's content until it is exactly exhausted.
///
/// The decoder is never invoked on an exhausted cursor. Leftover bytes that
/// cannot begin a record (the decoder overran without making any progress)
/// are reported as [`DecodeError::TrailingData`]; an overrun after partial
/// progress inside an entry surfaces as [`DecodeError::BufferOverrun`]. An
/// unknown top-level entry kind ends the stream early, keeping what was
/// decoded; see [`SkippedTail`].
pub fn read_entries<T: ReadXdr>(contents: &[u8]) -> Result<SectionEntries<T>, ParseError> {
    let mut cur = XdrCursor::new(contents);
    let mut entries = Vec::new();
    while !cur.is_exhausted() {
        let start = cur.offset();
        match T::read_xdr(&mut cur) {
            Ok(entry) => entries.push(entry),
            Err(DecodeError::UnknownEntryKind { kind, .. }) => {
                let skipped = SkippedTail {
                    entry_index: entries.len(),
                    kind,
                    remaining: contents.len() - start,
                };
                return Ok(SectionEntries {
                    entries,
                    skipped: Some(skipped),
                });
            }
            Err(DecodeError::BufferOverrun { .. }) if cur.offset() == start => {
                return Err(ParseError::at_entry(
                    entries.len(),
                    DecodeError::TrailingData {
                        offset: start,
                        remaining: contents.len() - start,
                    },
                ));
            }
            Err(source) => return Err(ParseError::at_entry(entries.len(), source)),
        }
    }
    Ok(SectionEntries {
        entries,
        skipped: None,
    })
}
