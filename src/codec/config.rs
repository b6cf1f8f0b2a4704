use crate::codec::buffer::INITIAL_CAPACITY;

/// Default limit on container nesting, for both directions.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Tunables shared by the encoder and decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Deepest container nesting accepted. A top-level array or object is
    /// depth 1; scalars do not count.
    pub max_depth: usize,
    /// Bytes the encode buffer allocates up front.
    pub initial_capacity: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            initial_capacity: INITIAL_CAPACITY,
        }
    }
}

impl CodecConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }
}
