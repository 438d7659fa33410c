//! Per-call codec settings.

/// Knobs shared by encode and decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodecOptions {
    /// Emit back-references for repeated strings and bytes (default: on).
    pub(crate) deduplicate: bool,
    /// Maximum nesting of records, lists and objects (default: 512).
    pub(crate) max_depth: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            deduplicate: true,
            max_depth: 512,
        }
    }
}

impl CodecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable deduplication on encode.
    ///
    /// Decoders follow the message header, not this setting.
    pub fn deduplicate(mut self, on: bool) -> Self {
        self.deduplicate = on;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn deduplicates(&self) -> bool {
        self.deduplicate
    }

    pub fn depth_limit(&self) -> usize {
        self.max_depth
    }
}
