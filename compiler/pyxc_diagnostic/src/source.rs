//! Source files and line/column lookup.
//!
//! Spans are byte offsets; humans want `line:column`. A [`LineOffsetTable`]
//! is built once per file so that every lookup is a binary search.

use pyxc_ir::{FileId, Span};

/// Byte offset of every line start in a file.
///
/// `\n`, `\r\n` and a lone `\r` all end a line, matching the lexer.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LineOffsetTable {
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    pub fn build(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut offsets = vec![0u32];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => offsets.push(offset_u32(i + 1)),
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    i += 1;
                    offsets.push(offset_u32(i + 1));
                }
                b'\r' => offsets.push(offset_u32(i + 1)),
                _ => {}
            }
            i += 1;
        }
        LineOffsetTable { offsets }
    }

    /// 1-based line containing `offset`.
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        offset_u32(line_idx) + 1
    }

    /// Byte offset where 1-based `line` starts.
    pub fn line_start(&self, line: u32) -> Option<u32> {
        let idx = usize::try_from(line.checked_sub(1)?).ok()?;
        self.offsets.get(idx).copied()
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}

fn offset_u32(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}

/// A resolved `line:column` position with a view of the line it is on.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SourceLocation<'a> {
    pub file: FileId,
    /// 1-based line.
    pub line: u32,
    /// 1-based column, counted in characters.
    pub column: u32,
    /// Text of the line, without its terminator.
    pub line_text: &'a str,
}

/// One input file.
#[derive(Clone, Debug)]
pub struct SourceFile {
    id: FileId,
    name: String,
    text: String,
    lines: LineOffsetTable,
}

impl SourceFile {
    pub fn new(id: FileId, name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = LineOffsetTable::build(&text);
        SourceFile {
            id,
            name: name.into(),
            text,
            lines,
        }
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text of a 1-based line, without its terminator.
    pub fn line_text(&self, line: u32) -> &str {
        let Some(start) = self.lines.line_start(line) else {
            return "";
        };
        let end = self
            .lines
            .line_start(line + 1)
            .unwrap_or_else(|| offset_u32(self.text.len()));
        self.text
            .get(start as usize..end as usize)
            .unwrap_or("")
            .trim_end_matches(['\n', '\r'])
    }

    /// Resolve a byte offset to a location.
    pub fn location(&self, offset: u32) -> SourceLocation<'_> {
        let line = self.lines.line_from_offset(offset);
        let start = self.lines.line_start(line).unwrap_or(0) as usize;
        let end = (offset as usize).min(self.text.len()).max(start);
        let column = self
            .text
            .get(start..end)
            .map_or(0, |prefix| prefix.chars().count());
        SourceLocation {
            file: self.id,
            line,
            column: offset_u32(column) + 1,
            line_text: self.line_text(line),
        }
    }
}

/// All files of a session, indexed by `FileId`.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file and return its id.
    pub fn add(&mut self, name: impl Into<String>, text: impl Into<String>) -> FileId {
        let id = FileId::new(offset_u32(self.files.len()));
        self.files.push(SourceFile::new(id, name, text));
        id
    }

    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    /// Location of the start of a span.
    pub fn location(&self, span: Span) -> Option<SourceLocation<'_>> {
        self.get(span.file).map(|file| file.location(span.start))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }
}
