//! Source position tracking for compiled in2 templates.
//!
//! This crate provides the span and line/column types shared by the compiler
//! and the runner, plus the append-only [`ScriptBuilder`] that records which
//! template span produced each generated statement.

use std::ops::Range;

/// A span in a text, representing a half-open byte range [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Start offset (inclusive)
    pub start: u32,
    /// End offset (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span from start and end offsets.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create an empty span at the given offset.
    #[inline]
    pub const fn empty(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Get the length of the span.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Check if the span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span contains an offset.
    #[inline]
    pub const fn contains_offset(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Merge two spans into one that covers both.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Convert to a Range<usize>.
    #[inline]
    pub fn to_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start as u32, range.end as u32)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.to_range()
    }
}

/// A line and column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineCol {
    /// 0-indexed line number.
    pub line: u32,
    /// 0-indexed column (byte offset within line).
    pub col: u32,
}

impl LineCol {
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// Convert to 1-indexed for display.
    #[inline]
    pub const fn to_display(self) -> (u32, u32) {
        (self.line + 1, self.col + 1)
    }
}

/// Byte offsets of line starts, for converting offsets to line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
    len: u32,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| (i + 1) as u32),
        );
        Self {
            line_starts,
            len: text.len() as u32,
        }
    }

    /// Get the 0-indexed line and column of a byte offset.
    pub fn line_col(&self, offset: u32) -> LineCol {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        LineCol {
            line: line as u32,
            col: offset - self.line_starts[line],
        }
    }

    /// Get the byte offset of a line/column position, if it is inside the text.
    pub fn offset(&self, line_col: LineCol) -> Option<u32> {
        let offset = self.line_start(line_col.line)? + line_col.col;
        (offset <= self.len).then_some(offset)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn line_start(&self, line: u32) -> Option<u32> {
        self.line_starts.get(line as usize).copied()
    }
}

/// One generated region and the template region it was compiled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mapping {
    pub generated: Span,
    pub source: Span,
}

/// Mappings from generated script regions back to template regions.
///
/// Mappings are only ever appended, in generated-offset order, so lookups
/// can binary search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceMap {
    mappings: Vec<Mapping>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mapping. Its generated span must start at or after the end
    /// of the previously appended one.
    pub fn push(&mut self, mapping: Mapping) {
        debug_assert!(self
            .mappings
            .last()
            .map_or(true, |last| last.generated.end <= mapping.generated.start));
        self.mappings.push(mapping);
    }

    /// Find the mapping whose generated span contains the offset.
    pub fn find(&self, generated_offset: u32) -> Option<&Mapping> {
        let idx = self
            .mappings
            .partition_point(|m| m.generated.end <= generated_offset);
        self.mappings
            .get(idx)
            .filter(|m| m.generated.contains_offset(generated_offset))
    }

    /// Map a generated offset to the template span that produced it.
    pub fn source_span(&self, generated_offset: u32) -> Option<Span> {
        self.find(generated_offset).map(|m| m.source)
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }
}

/// Append-only builder for a generated script and its source map.
#[derive(Debug, Default)]
pub struct ScriptBuilder {
    code: String,
    source_map: SourceMap,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current offset in the generated code.
    pub fn offset(&self) -> u32 {
        self.code.len() as u32
    }

    /// Append text with no template origin (comments, separators).
    pub fn push_str(&mut self, code: &str) {
        self.code.push_str(code);
    }

    /// Append text compiled from the given template span.
    pub fn push_mapped(&mut self, code: &str, source: Span) {
        let start = self.offset();
        self.code.push_str(code);
        if !code.is_empty() {
            self.source_map.push(Mapping {
                generated: Span::new(start, self.offset()),
                source,
            });
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Consume the builder and return the code and source map.
    pub fn finish(self) -> (String, SourceMap) {
        (self.code, self.source_map)
    }
}
