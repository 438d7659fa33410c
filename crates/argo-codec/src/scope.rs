//! Per-stream state: one buffer and its dictionaries.
//!
//! The top-level message and every block payload each get their own scope,
//! so back-references never cross a block boundary.

use argo_core::{Dictionary, EntryId};
use argo_wire::{BufferError, ByteBuffer, ScalarKind};

#[derive(Debug, Default)]
pub(crate) struct Dictionaries {
    /// `STRING` scalars, self-describing strings and object keys.
    pub strings: Dictionary<String>,
    pub ids: Dictionary<String>,
    pub bytes: Dictionary<Vec<u8>>,
}

impl Dictionaries {
    /// Text dictionary for `STRING` or `ID`.
    pub fn text(&mut self, kind: ScalarKind) -> &mut Dictionary<String> {
        match kind {
            ScalarKind::Id => &mut self.ids,
            _ => &mut self.strings,
        }
    }
}

pub(crate) fn dictionary_name(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Id => "ID",
        ScalarKind::Bytes => "BYTES",
        _ => "STRING",
    }
}

/// Look up a back-reference id read off the wire.
pub(crate) fn resolve_backref<T>(dict: &Dictionary<T>, id: u64) -> Option<&T>
where
    T: Eq + std::hash::Hash + Clone,
{
    let id = u32::try_from(id).ok()?;
    dict.get(EntryId::from_raw(id))
}

#[derive(Debug, Default)]
pub(crate) struct Scope {
    pub buf: ByteBuffer,
    pub dicts: Dictionaries,
}

impl Scope {
    pub fn writer() -> Self {
        Self::default()
    }

    pub fn reader(bytes: &[u8]) -> Self {
        Self {
            buf: ByteBuffer::from_bytes(bytes.to_vec()),
            dicts: Dictionaries::default(),
        }
    }

    /// Compact and take the bytes of a finished block payload.
    pub fn finish(mut self) -> Result<Vec<u8>, BufferError> {
        self.buf.compact()?;
        self.buf.into_bytes()
    }
}
