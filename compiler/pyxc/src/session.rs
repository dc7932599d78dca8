//! The compilation session.
//!
//! A `CompilationSession` owns every table that outlives a single file:
//!
//! ```text
//! interner     names shared by all files (never cleared)
//! operators    builtin + user-declared operators, grows while parsing
//! types        struct and alias tables, resolved types and layouts
//! prototypes   canonical function signatures
//! sources      registered files, for diagnostic locations
//! diagnostics  everything reported since the last reset
//! ```
//!
//! Lexer and parser state is created fresh for every file, so one file can
//! only influence the next through these tables.

use std::io::{self, Write};

use pyxc_diagnostic::{
    Diagnostic, DiagnosticQueue, DiagnosticSink, ErrorCode, ErrorGuaranteed, SourceFile,
    SourceMap, TerminalEmitter,
};
use pyxc_ir::{FileId, SharedInterner, StringInterner, TranslationUnit};
use pyxc_lexer::LexOutput;
use pyxc_parse::OperatorTable;
use pyxc_resolve::{Program, PrototypeTable};
use pyxc_types::TypeRegistry;
use rayon::prelude::*;

use crate::SessionConfig;

#[derive(Debug)]
pub struct CompilationSession {
    config: SessionConfig,
    interner: SharedInterner,
    operators: OperatorTable,
    types: TypeRegistry,
    prototypes: PrototypeTable,
    sources: SourceMap,
    diagnostics: DiagnosticQueue,
}

impl Default for CompilationSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl CompilationSession {
    pub fn new(config: SessionConfig) -> Self {
        let diagnostics = DiagnosticQueue::with_config(config.diagnostics.clone());
        CompilationSession {
            config,
            interner: SharedInterner::new(),
            operators: OperatorTable::with_builtins(),
            types: TypeRegistry::new(),
            prototypes: PrototypeTable::new(),
            sources: SourceMap::new(),
            diagnostics,
        }
    }

    /// A session configured from the environment.
    pub fn from_env() -> Self {
        Self::new(SessionConfig::from_env())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// A handle to the interner that outlives the session.
    pub fn shared_interner(&self) -> SharedInterner {
        self.interner.clone()
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn prototypes(&self) -> &PrototypeTable {
        &self.prototypes
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    pub fn diagnostics(&self) -> &DiagnosticQueue {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Register a file so diagnostics can point into it.
    pub fn add_source(&mut self, name: impl Into<String>, text: impl Into<String>) -> FileId {
        self.sources.add(name, text)
    }

    /// Lex and parse one file with fresh lexer and parser state.
    ///
    /// Operators declared in the file are added to the session's operator
    /// table and stay visible to files parsed afterwards. The returned
    /// diagnostics are also queued on the session.
    #[tracing::instrument(level = "debug", skip_all, fields(file = file.raw()))]
    pub fn parse_translation_unit(
        &mut self,
        source_text: &str,
        file: FileId,
    ) -> (TranslationUnit, Vec<Diagnostic>) {
        let output =
            pyxc_parse::parse_source(source_text, file, &self.interner, &mut self.operators);
        let diagnostics = output.diagnostics();
        self.diagnostics.extend(diagnostics.iter().cloned());
        (output.unit, diagnostics)
    }

    /// Merge `units` into a program against the session tables.
    ///
    /// Declarations accumulate in the session; call [`reset`](Self::reset)
    /// before assembling an unrelated batch.
    #[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
    pub fn assemble(&mut self, units: &[TranslationUnit]) -> Result<Program, ErrorGuaranteed> {
        let errors =
            match pyxc_resolve::assemble(units, &self.interner, &mut self.types, &mut self.prototypes)
            {
                Ok(program) => return Ok(program),
                Err(errors) => errors,
            };

        tracing::debug!(errors = errors.len(), "assembly failed");
        let mut guarantee = None;
        for err in &errors {
            guarantee = Some(self.diagnostics.emit_error(err.to_diagnostic(&self.interner)));
        }
        Err(guarantee.unwrap_or_else(|| {
            self.diagnostics.emit_error(
                Diagnostic::error(ErrorCode::E9001)
                    .with_message("assembly failed without reporting an error"),
            )
        }))
    }

    /// Compile one batch of `(name, text)` sources from scratch.
    ///
    /// The session is reset first. Files are lexed (in parallel when
    /// configured) and then parsed in order, so an operator declared in one
    /// file can be used by every later file. Assembly only runs when no file
    /// had a lexical or syntax error.
    #[tracing::instrument(level = "debug", skip_all, fields(files = sources.len()))]
    pub fn compile_batch<N, T>(&mut self, sources: &[(N, T)]) -> Result<Program, ErrorGuaranteed>
    where
        N: AsRef<str>,
        T: AsRef<str>,
    {
        self.reset();
        let files: Vec<FileId> = sources
            .iter()
            .map(|(name, text)| self.add_source(name.as_ref(), text.as_ref()))
            .collect();

        let lexed = self.lex_files(&files);
        let units: Vec<TranslationUnit> = files
            .iter()
            .zip(lexed)
            .map(|(&file, lexed)| self.parse_lexed(file, lexed))
            .collect();

        if let Some(guarantee) = self.diagnostics.guarantee() {
            tracing::debug!(
                errors = self.diagnostics.error_count(),
                "syntax errors, assembly skipped"
            );
            return Err(guarantee);
        }
        self.assemble(&units)
    }

    fn lex_files(&self, files: &[FileId]) -> Vec<LexOutput> {
        let sources = &self.sources;
        let interner: &StringInterner = &self.interner;
        let lex_one = |&file: &FileId| {
            let text = sources.get(file).map_or("", SourceFile::text);
            pyxc_lexer::lex(text, file, interner)
        };

        if self.config.parallel_lexing {
            files.par_iter().map(lex_one).collect()
        } else {
            files.iter().map(lex_one).collect()
        }
    }

    fn parse_lexed(&mut self, file: FileId, lexed: LexOutput) -> TranslationUnit {
        let mut output =
            pyxc_parse::parse(&lexed.tokens, file, &self.interner, &mut self.operators);
        output.lex_errors = lexed.errors;
        self.diagnostics.extend(output.diagnostics());
        output.unit
    }

    /// Hand every queued diagnostic to `sink`, sorted by file and position.
    pub fn emit(&mut self, sink: &mut dyn DiagnosticSink) {
        let diagnostics = self.diagnostics.flush();
        sink.emit_all(&diagnostics, &self.sources);
    }

    /// Render every queued diagnostic to `writer` using the configured colours.
    pub fn emit_to<W: Write>(&mut self, writer: W) -> io::Result<W> {
        let diagnostics = self.diagnostics.flush();
        let mut emitter = TerminalEmitter::new(writer, &self.sources, self.config.color);
        emitter.emit_all(&diagnostics, &self.sources);
        emitter.finish()
    }

    /// Forget every file, declaration, operator and diagnostic.
    ///
    /// Configuration and interned names are kept.
    pub fn reset(&mut self) {
        self.operators.reset();
        self.types.clear();
        self.prototypes.clear();
        self.sources.clear();
        self.diagnostics.clear();
    }
}
