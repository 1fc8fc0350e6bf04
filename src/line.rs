/// A completed line in natural reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledLine {
    /// File offset of the line's first byte.
    pub offset: u64,
    pub text: String,
}

/// Accumulates the bytes of one line while scanning a file backward.
///
/// Bytes are stored in the order they arrive, i.e. last byte of the line
/// first. `emit` reverses them back into reading order.
#[derive(Debug, Default)]
pub struct LineBuffer {
    rev: Vec<u8>,
    start: Option<u64>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_byte(&mut self, offset: u64, byte: u8) {
        self.rev.push(byte);
        self.start = Some(self.start.map_or(offset, |s| s.min(offset)));
    }

    /// Append `bytes` (forward order, first byte at `offset`) last byte first.
    pub fn push_reversed(&mut self, offset: u64, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.rev.extend(bytes.iter().rev());
        self.start = Some(self.start.map_or(offset, |s| s.min(offset)));
    }

    pub fn reset(&mut self) {
        self.rev.clear();
        self.start = None;
    }

    pub fn is_empty(&self) -> bool {
        self.rev.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rev.len()
    }

    pub fn start_offset(&self) -> Option<u64> {
        self.start
    }

    /// The accumulated line, or `None` if there is nothing worth reporting.
    pub fn emit(&self) -> Option<AssembledLine> {
        let offset = self.start?;
        let forward: Vec<u8> = self.rev.iter().rev().copied().collect();
        let text = String::from_utf8_lossy(&forward);
        let text = text.trim_end();
        if text.is_empty() {
            return None;
        }
        Some(AssembledLine {
            offset,
            text: text.to_string(),
        })
    }
}
