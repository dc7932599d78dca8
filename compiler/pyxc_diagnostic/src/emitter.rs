//! Diagnostic sinks.
//!
//! The front end never prints on its own; it hands every diagnostic to a
//! [`DiagnosticSink`]. A sink receives flat `(severity, file, line, column,
//! message)` reports. The provided [`DiagnosticSink::emit`] method flattens
//! one structured [`Diagnostic`] into such reports.

use std::io::{self, Write};

use pyxc_ir::FileId;

use crate::{Diagnostic, Severity, SourceMap};

/// Receiver of rendered diagnostics.
pub trait DiagnosticSink {
    /// Report one message at a 1-based `line:column` of `file`.
    fn report(&mut self, severity: Severity, file: FileId, line: u32, column: u32, message: &str);

    /// Flatten a diagnostic: the primary message, then one note per
    /// secondary label (at that label's own location), then notes and
    /// suggestions at the primary location.
    fn emit(&mut self, diag: &Diagnostic, sources: &SourceMap) {
        let primary = diag.primary_span().and_then(|span| sources.location(span));
        let (file, line, column) = primary.map_or((FileId::DUMMY, 0, 0), |loc| {
            (loc.file, loc.line, loc.column)
        });

        self.report(diag.severity, file, line, column, &diag.headline());

        for label in diag.secondary_labels() {
            if let Some(loc) = sources.location(label.span) {
                self.report(Severity::Note, loc.file, loc.line, loc.column, &label.message);
            }
        }
        for note in &diag.notes {
            self.report(Severity::Note, file, line, column, note);
        }
        for suggestion in &diag.suggestions {
            self.report(Severity::Help, file, line, column, suggestion);
        }
    }

    /// Emit a batch of diagnostics in order.
    fn emit_all(&mut self, diags: &[Diagnostic], sources: &SourceMap) {
        for diag in diags {
            self.emit(diag, sources);
        }
    }
}

/// One flattened report, as recorded by [`CollectingSink`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Report {
    pub severity: Severity,
    pub file: FileId,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

/// Sink that records every report in memory.
#[derive(Clone, Debug, Default)]
pub struct CollectingSink {
    pub reports: Vec<Report>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Report> {
        self.reports
            .iter()
            .filter(|r| matches!(r.severity, Severity::Error))
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, severity: Severity, file: FileId, line: u32, column: u32, message: &str) {
        self.reports.push(Report {
            severity,
            file,
            line,
            column,
            message: message.to_string(),
        });
    }
}

/// Whether the terminal emitter uses ANSI colours.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ColorMode {
    /// Colour when the `NO_COLOR` environment variable is unset.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::env::var_os("NO_COLOR").is_none(),
        }
    }
}

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const WARNING: &str = "\x1b[1;33m";
    pub const NOTE: &str = "\x1b[1;36m";
    pub const HELP: &str = "\x1b[1;32m";
    pub const RESET: &str = "\x1b[0m";
}

/// Human-readable emitter: `file:line:col: error: [E2004] message`, followed
/// by the offending source line and a caret.
pub struct TerminalEmitter<'a, W: Write> {
    writer: W,
    sources: &'a SourceMap,
    colors: bool,
    /// First write failure, surfaced by [`TerminalEmitter::finish`].
    error: Option<io::Error>,
}

impl<'a, W: Write> TerminalEmitter<'a, W> {
    pub fn new(writer: W, sources: &'a SourceMap, color: ColorMode) -> Self {
        TerminalEmitter {
            writer,
            sources,
            colors: color.should_use_colors(),
            error: None,
        }
    }

    /// Flush and return the writer, or the first I/O error encountered.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn severity_color(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Note => colors::NOTE,
            Severity::Help => colors::HELP,
        }
    }

    fn write_report(
        &mut self,
        severity: Severity,
        file: FileId,
        line: u32,
        column: u32,
        message: &str,
    ) -> io::Result<()> {
        let source = self.sources.get(file);
        let name = source.map_or("<unknown>", |s| s.name());
        let (open, close) = if self.colors {
            (Self::severity_color(severity), colors::RESET)
        } else {
            ("", "")
        };

        if line == 0 {
            return writeln!(self.writer, "{open}{severity}{close}: {message}");
        }
        writeln!(
            self.writer,
            "{name}:{line}:{column}: {open}{severity}{close}: {message}"
        )?;

        if matches!(severity, Severity::Error | Severity::Warning) {
            if let Some(text) = source.map(|s| s.line_text(line)) {
                let gutter = line.to_string();
                let pad = " ".repeat(gutter.len());
                writeln!(self.writer, "{gutter} | {text}")?;
                let caret_pad = " ".repeat(column.saturating_sub(1) as usize);
                writeln!(self.writer, "{pad} | {caret_pad}{open}^{close}")?;
            }
        }
        Ok(())
    }
}

impl<W: Write> DiagnosticSink for TerminalEmitter<'_, W> {
    fn report(&mut self, severity: Severity, file: FileId, line: u32, column: u32, message: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.write_report(severity, file, line, column, message) {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use pretty_assertions::assert_eq;
    use pyxc_ir::Span;

    fn sources() -> (SourceMap, FileId, FileId) {
        let mut map = SourceMap::new();
        let a = map.add("a.pyx", "extern def add(a: i32, b: i32) -> i32\n");
        let b = map.add("b.pyx", "\ndef add(a: f64, b: i32) -> i32: return a\n");
        (map, a, b)
    }

    #[test]
    fn test_collecting_sink_flattens_labels() {
        let (map, a, b) = sources();
        let diag = Diagnostic::error(ErrorCode::E4001)
            .with_message("conflicting declarations of `add`")
            .with_label(Span::new(b, 5, 8), "conflicting declaration")
            .with_secondary_label(Span::new(a, 11, 14), "first declared here")
            .with_note("parameter 1 differs");

        let mut sink = CollectingSink::new();
        sink.emit(&diag, &map);

        assert_eq!(sink.reports.len(), 3);
        assert_eq!(
            sink.reports[0],
            Report {
                severity: Severity::Error,
                file: b,
                line: 2,
                column: 5,
                message: "[E4001] conflicting declarations of `add`".to_string(),
            }
        );
        assert_eq!((sink.reports[1].file, sink.reports[1].line), (a, 1));
        assert_eq!(sink.reports[2].message, "parameter 1 differs");
        assert_eq!(sink.errors().count(), 1);
    }

    #[test]
    fn test_terminal_emitter_plain_output() {
        let (map, _, b) = sources();
        let diag = Diagnostic::error(ErrorCode::E4001)
            .with_message("conflicting declarations of `add`")
            .with_label(Span::new(b, 5, 8), "here");

        let mut emitter = TerminalEmitter::new(Vec::new(), &map, ColorMode::Never);
        emitter.emit(&diag, &map);
        let out = emitter.finish().unwrap_or_default();
        let text = String::from_utf8(out).unwrap_or_default();

        assert_eq!(
            text,
            "b.pyx:2:5: error: [E4001] conflicting declarations of `add`\n\
             2 | def add(a: f64, b: i32) -> i32: return a\n  |     ^\n"
        );
    }
}
