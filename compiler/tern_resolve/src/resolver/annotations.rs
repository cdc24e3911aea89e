//! `@Annotation` processing.
//!
//! Annotations are handled once their symbol is initialized, since most of
//! them validate the symbol's kind or type.
//!
//! | Annotation            | Target                                   | Arguments |
//! |-----------------------|------------------------------------------|-----------|
//! | `@EmitAs(name)`       | any declaration                          | 1 string  |
//! | `@NeedsInclude(file)` | any declaration                          | 1 string  |
//! | `@EntryPoint`         | global function, no arguments, void/int  | none      |
//! | `@ExternC`            | function                                 | none      |
//! | `@Operator(token)`    | instance function                        | 1 string  |

use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::{Name, NodeId, NodeKind, Span, SymbolId, TypeId};
use tern_types::{Constant, OverloadKind, SymbolFlags, SymbolKind};

use super::Resolver;
use crate::fold::constant_of;

impl Resolver<'_> {
    pub(crate) fn process_annotations(&mut self, symbol: SymbolId) {
        if self.symbols[symbol].node.is_none() {
            return;
        }
        let annotations: Vec<NodeId> = self
            .fragments_of(symbol)
            .into_iter()
            .filter_map(|fragment| self.nodes.kind(fragment).header())
            .flat_map(|header| header.annotations.clone())
            .collect();
        if annotations.is_empty() {
            return;
        }
        let cx = self.declaration_context(symbol);
        self.with_context(cx, |r| {
            for annotation in annotations {
                r.process_annotation(symbol, annotation);
            }
        });
    }

    fn process_annotation(&mut self, symbol: SymbolId, annotation: NodeId) {
        let NodeKind::Annotation { name, arguments } = self.nodes.kind(annotation).clone() else {
            panic!("annotation list holds a {}", self.nodes.kind(annotation).describe());
        };
        let span = self.span(annotation);
        let Some(strings) = self.annotation_arguments(&arguments) else {
            return;
        };
        self.set_type(annotation, TypeId::VOID);

        if name == self.names.emit_as {
            if let Some(value) = self.single_argument(name, span, &strings) {
                self.symbols[symbol].emit_as = Some(value);
            }
        } else if name == self.names.needs_include {
            if let Some(value) = self.single_argument(name, span, &strings) {
                self.symbols[symbol].includes.push(value);
            }
        } else if name == self.names.entry_point {
            if self.no_arguments(name, span, &strings) {
                self.register_entry_point(symbol, span);
            }
        } else if name == self.names.extern_c {
            if !self.no_arguments(name, span, &strings) {
                return;
            }
            if self.symbols[symbol].kind.is_function() {
                self.symbols[symbol].flags |= SymbolFlags::EXTERN_C;
            } else {
                self.report_bad_target(name, span, "functions");
            }
        } else if name == self.names.operator {
            if let Some(token) = self.single_argument(name, span, &strings) {
                self.register_operator(symbol, span, token);
            }
        } else {
            self.report(
                Diagnostic::error(ErrorCode::E2041)
                    .with_message(format!("unknown annotation `@{}`", self.interner.lookup(name)))
                    .with_label(span, "not a known annotation"),
            );
        }
    }

    /// Resolve and fold annotation arguments, which must be string constants.
    fn annotation_arguments(&mut self, arguments: &[NodeId]) -> Option<Vec<Name>> {
        let mut strings = Vec::with_capacity(arguments.len());
        let mut valid = true;
        for &argument in arguments {
            let ty = self.resolve_value(argument, Some(TypeId::STRING));
            self.fold(argument);
            if ty.is_error() {
                valid = false;
                continue;
            }
            match constant_of(self.nodes, argument) {
                Some(Constant::String(value)) => strings.push(value),
                _ => {
                    self.report(
                        Diagnostic::error(ErrorCode::E2041)
                            .with_message("annotation arguments must be constant strings")
                            .with_label(self.span(argument), "not a constant string"),
                    );
                    valid = false;
                }
            }
        }
        valid.then_some(strings)
    }

    fn single_argument(&mut self, name: Name, span: Span, strings: &[Name]) -> Option<Name> {
        if let [value] = strings {
            return Some(*value);
        }
        self.report_argument_count(name, span, 1, strings.len());
        None
    }

    fn no_arguments(&mut self, name: Name, span: Span, strings: &[Name]) -> bool {
        if strings.is_empty() {
            return true;
        }
        self.report_argument_count(name, span, 0, strings.len());
        false
    }

    fn report_argument_count(&mut self, name: Name, span: Span, expected: usize, found: usize) {
        self.report(
            Diagnostic::error(ErrorCode::E2041)
                .with_message(format!(
                    "`@{}` takes {expected} argument(s), found {found}",
                    self.interner.lookup(name)
                ))
                .with_label(span, "wrong number of arguments"),
        );
    }

    fn report_bad_target(&mut self, name: Name, span: Span, allowed: &str) {
        self.report(
            Diagnostic::error(ErrorCode::E2041)
                .with_message(format!(
                    "`@{}` can only be applied to {allowed}",
                    self.interner.lookup(name)
                ))
                .with_label(span, "invalid target"),
        );
    }

    fn register_entry_point(&mut self, symbol: SymbolId, span: Span) {
        let ty = self.symbols[symbol].ty_or_error();
        let valid = self.symbols[symbol].kind == SymbolKind::GlobalFunction
            && self.types.function_arguments(ty).is_empty()
            && matches!(self.types.function_result(ty), Some(TypeId::VOID | TypeId::INT));
        if !valid {
            if !ty.is_error() {
                self.report_bad_target(
                    self.names.entry_point,
                    span,
                    "global functions taking no arguments and returning `void` or `int`",
                );
            }
            return;
        }
        if let Some(existing) = self.entry_point {
            self.report(
                Diagnostic::error(ErrorCode::E2043)
                    .with_message("more than one entry point")
                    .with_label(self.symbols[symbol].span, "second `@EntryPoint`")
                    .with_secondary_label(self.symbols[existing].span, "first entry point here"),
            );
            return;
        }
        self.symbols[symbol].flags |= SymbolFlags::ENTRY_POINT;
        self.entry_point = Some(symbol);
    }

    /// Register an `@Operator` function on the object that declares it.
    fn register_operator(&mut self, symbol: SymbolId, span: Span, token: Name) {
        let operator = self.names.operator;
        if self.symbols[symbol].kind != SymbolKind::InstanceFunction {
            self.report_bad_target(operator, span, "instance functions");
            return;
        }
        let token = self.interner.lookup(token);
        let Some(kind) = OverloadKind::from_token(token) else {
            self.report(
                Diagnostic::error(ErrorCode::E2041)
                    .with_message(format!("`{token}` is not an overloadable operator"))
                    .with_label(span, "unknown operator"),
            );
            return;
        };
        let ty = self.symbols[symbol].ty_or_error();
        let arguments = self.types.function_arguments(ty).len();
        if !ty.is_error() && arguments != kind.argument_count() {
            self.report(
                Diagnostic::error(ErrorCode::E2041)
                    .with_message(format!(
                        "operator `{token}` takes {} argument(s), but `{}` has {arguments}",
                        kind.argument_count(),
                        self.symbol_name(symbol)
                    ))
                    .with_label(span, "wrong argument count for this operator"),
            );
            return;
        }
        let Some(object) = self.symbols[symbol].enclosing else {
            return;
        };
        self.symbols[object].register_overload(kind, symbol);
        tracing::debug!(
            operator = token,
            function = self.symbol_name(symbol),
            object = self.symbol_name(object),
            "registered operator overload"
        );
    }
}
