//! Two-phase assembly of a batch of translation units.
//!
//! Phase 1 visits every declaration of every unit before any body is looked
//! at: struct and alias declarations are registered, then aliases and struct
//! layouts are resolved, then every `extern def` and `def` signature is
//! merged into the prototype table. Phase 2 resolves function bodies and
//! top-level expressions against those complete tables, so calls may refer
//! to functions declared later in the same file or in another file.
//!
//! A linking error in Phase 1 (conflicting signatures, duplicate
//! definitions) means the batch has no single meaning; Phase 2 is skipped.

use pyxc_ir::{
    AliasDecl, Function, Name, Prototype, Span, StringInterner, StructDecl, TopLevelExpr,
    TranslationUnit, TypeExprArena,
};
use pyxc_types::{DeclKind, NameClash, TypeError, TypeRegistry, ValueContext};

use crate::body::BodyResolver;
use crate::{
    Program, PrototypeConflict, PrototypeTable, ResolveError, ResolveErrorKind, ResolvedFunction,
    ResolvedParam, ResolvedPrototype, ResolvedTopLevel,
};

/// Name given to every top-level expression.
pub const ANON_EXPR_NAME: &str = "__anon_expr";

#[derive(Copy, Clone)]
enum TypeDecl<'u> {
    Struct(&'u StructDecl),
    Alias(&'u AliasDecl),
}

impl TypeDecl<'_> {
    fn span(&self) -> Span {
        match self {
            TypeDecl::Struct(decl) => decl.span,
            TypeDecl::Alias(decl) => decl.span,
        }
    }
}

pub struct Assembler<'a> {
    interner: &'a StringInterner,
    registry: &'a mut TypeRegistry,
    prototypes: &'a mut PrototypeTable,
    errors: Vec<ResolveError>,
}

impl<'a> Assembler<'a> {
    pub fn new(
        interner: &'a StringInterner,
        registry: &'a mut TypeRegistry,
        prototypes: &'a mut PrototypeTable,
    ) -> Self {
        Assembler {
            interner,
            registry,
            prototypes,
            errors: Vec::new(),
        }
    }

    /// Run both phases over `units`, in file order.
    ///
    /// Errors accumulate across declarations; the program is returned only
    /// when none were found.
    #[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
    pub fn assemble(mut self, units: &[TranslationUnit]) -> Result<Program, Vec<ResolveError>> {
        self.collect(units);
        if self.errors.iter().any(ResolveError::is_linking_error) {
            tracing::debug!(
                errors = self.errors.len(),
                "conflicting declarations, bodies not resolved"
            );
            return Err(self.errors);
        }

        let program = self.resolve_bodies(units);
        if self.errors.is_empty() {
            Ok(program)
        } else {
            Err(self.errors)
        }
    }

    // === Phase 1: Collect ===

    #[tracing::instrument(level = "debug", skip_all)]
    fn collect(&mut self, units: &[TranslationUnit]) {
        for unit in units {
            self.collect_types(unit);
        }
        let alias_errors = self.registry.resolve_all_aliases();
        let layout_errors = self.registry.resolve_layouts();
        self.errors
            .extend(alias_errors.into_iter().chain(layout_errors).map(ResolveError::from));

        for unit in units {
            self.collect_prototypes(unit);
        }
        tracing::debug!(prototypes = self.prototypes.len(), "declarations collected");
    }

    fn collect_types(&mut self, unit: &TranslationUnit) {
        let mut decls: Vec<TypeDecl<'_>> = unit
            .structs
            .iter()
            .map(TypeDecl::Struct)
            .chain(unit.aliases.iter().map(TypeDecl::Alias))
            .collect();
        decls.sort_by_key(|decl| decl.span().start);

        for decl in decls {
            let span = decl.span();
            let (declared, registered) = match decl {
                TypeDecl::Struct(s) => (DeclKind::Struct, self.registry.register_struct(&unit.types, s)),
                TypeDecl::Alias(a) => (DeclKind::Alias, self.registry.register_alias(&unit.types, a)),
            };
            if let Err(NameClash {
                name,
                existing,
                previous,
            }) = registered
            {
                self.errors.push(ResolveError::new(
                    ResolveErrorKind::DuplicateType {
                        name,
                        declared,
                        existing,
                        previous,
                    },
                    span,
                ));
            }
        }
    }

    fn collect_prototypes(&mut self, unit: &TranslationUnit) {
        let mut decls: Vec<(&Prototype, bool)> = unit
            .externs
            .iter()
            .map(|proto| (proto, false))
            .chain(unit.functions.iter().map(|f| (&f.proto, true)))
            .collect();
        decls.sort_by_key(|(proto, _)| proto.span.start);

        for (proto, has_body) in decls {
            self.declare_prototype(&unit.types, proto, has_body);
        }
    }

    fn declare_prototype(&mut self, types: &TypeExprArena, proto: &Prototype, has_body: bool) {
        let Some(resolved) = self.resolve_prototype(types, proto) else {
            self.prototypes.mark_failed(proto.name);
            return;
        };
        let candidate = resolved.clone();
        let Err(conflict) = self.prototypes.declare(resolved, has_body) else {
            return;
        };

        let kind = match conflict {
            PrototypeConflict::Signature { existing } => ResolveErrorKind::SignatureConflict {
                name: proto.name,
                previous: existing.span,
                existing: existing.signature(self.registry.pool(), self.interner),
                conflicting: candidate.signature(self.registry.pool(), self.interner),
            },
            PrototypeConflict::Redefinition { previous } => ResolveErrorKind::DuplicateDefinition {
                name: proto.name,
                previous,
            },
        };
        self.errors.push(ResolveError::new(kind, proto.span));
    }

    /// Resolve every parameter and the return type, reporting each failure.
    fn resolve_prototype(
        &mut self,
        types: &TypeExprArena,
        proto: &Prototype,
    ) -> Option<ResolvedPrototype> {
        let mut params = Vec::with_capacity(proto.params.len());
        let mut complete = true;
        for param in &proto.params {
            match self
                .registry
                .resolve_value(types, param.ty, ValueContext::Parameter)
            {
                Ok(ty) => params.push(ResolvedParam {
                    name: param.name,
                    ty,
                    span: param.span,
                }),
                Err(err) => {
                    self.type_error(err);
                    complete = false;
                }
            }
        }
        let ret = match self.registry.resolve(types, proto.ret) {
            Ok(ty) => Some(ty),
            Err(err) => {
                self.type_error(err);
                None
            }
        };

        let ret = ret.filter(|_| complete)?;
        Some(ResolvedPrototype {
            name: proto.name,
            params,
            ret,
            role: proto.role,
            span: proto.span,
            definition: None,
        })
    }

    fn type_error(&mut self, err: TypeError) {
        if !err.is_poisoned() {
            self.errors.push(err.into());
        }
    }

    // === Phase 2: Resolve bodies ===

    #[tracing::instrument(level = "debug", skip_all)]
    fn resolve_bodies(&mut self, units: &[TranslationUnit]) -> Program {
        let mut functions = Vec::new();
        for unit in units {
            for function in &unit.functions {
                if let Some(resolved) = self.resolve_function(unit, function) {
                    functions.push(resolved);
                }
            }
        }

        let anon = self.interner.intern(ANON_EXPR_NAME);
        let mut top_level = Vec::new();
        for unit in units {
            for top in &unit.top_level {
                top_level.push(self.resolve_top_level(unit, top, anon));
            }
        }

        Program {
            prototypes: self.prototypes.iter().cloned().collect(),
            types: self.registry.clone(),
            functions,
            top_level,
        }
    }

    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(function = %self.interner.lookup(function.proto.name))
    )]
    fn resolve_function(
        &mut self,
        unit: &TranslationUnit,
        function: &Function,
    ) -> Option<ResolvedFunction> {
        // Signature failures were reported in Phase 1.
        let proto = self.prototypes.get(function.proto.name)?.clone();
        let mut body = BodyResolver::new(
            self.interner,
            self.registry,
            &*self.prototypes,
            &unit.types,
            &mut self.errors,
        )
        .for_function(&proto);
        body.resolve_block(&function.body);
        let locals = body.finish();

        Some(ResolvedFunction {
            proto,
            body: function.body.clone(),
            locals,
            file: unit.file,
        })
    }

    fn resolve_top_level(
        &mut self,
        unit: &TranslationUnit,
        top: &TopLevelExpr,
        name: Name,
    ) -> ResolvedTopLevel {
        let mut body = BodyResolver::new(
            self.interner,
            self.registry,
            &*self.prototypes,
            &unit.types,
            &mut self.errors,
        );
        let ty = body.resolve_expr(&top.expr);

        ResolvedTopLevel {
            name,
            expr: top.expr.clone(),
            ty,
            span: top.span,
            file: unit.file,
        }
    }
}
