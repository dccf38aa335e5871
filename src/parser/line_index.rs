use crate::parser::span::Span;

#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Offset of the start of each line.
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(source: &[u8]) -> Self {
        let mut line_starts = vec![0];
        for (i, &b) in source.iter().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// 1-based line number containing the given byte offset. Offsets past
    /// the end of the source clamp to the last line.
    pub fn line_of(&self, offset: usize) -> usize {
        if offset > self.len {
            return self.line_starts.len();
        }
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(insert_idx) => insert_idx,
        }
    }

    /// 1-based (line, column) for a byte offset.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self.line_of(offset);
        let start = self.line_starts[line - 1];
        (line, offset.saturating_sub(start) + 1)
    }

    /// 1-based start and end lines of a span.
    pub fn line_range(&self, span: Span) -> (usize, usize) {
        (self.line_of(span.start), self.line_of(span.end))
    }
}
