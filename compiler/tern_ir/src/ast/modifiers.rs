//! Declaration modifiers and headers.

use std::fmt;

use crate::{Name, NodeId, Span};

/// A modifier keyword written on a declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ModifierKind {
    Public,
    Private,
    Protected,
    Const,
    Final,
    Pure,
    Static,
    Virtual,
    Override,
    Abstract,
    Import,
    Export,
    Inline,
}

impl ModifierKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ModifierKind::Public => "public",
            ModifierKind::Private => "private",
            ModifierKind::Protected => "protected",
            ModifierKind::Const => "const",
            ModifierKind::Final => "final",
            ModifierKind::Pure => "pure",
            ModifierKind::Static => "static",
            ModifierKind::Virtual => "virtual",
            ModifierKind::Override => "override",
            ModifierKind::Abstract => "abstract",
            ModifierKind::Import => "import",
            ModifierKind::Export => "export",
            ModifierKind::Inline => "inline",
        }
    }
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A modifier together with where it was written.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub span: Span,
}

/// Name, modifiers and annotations shared by every declaration node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct DeclHeader {
    pub name: Name,
    pub name_span: Span,
    pub modifiers: Vec<Modifier>,
    /// `Annotation` nodes.
    pub annotations: Vec<NodeId>,
}

impl DeclHeader {
    pub fn new(name: Name, name_span: Span) -> Self {
        DeclHeader {
            name,
            name_span,
            modifiers: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn has_modifier(&self, kind: ModifierKind) -> bool {
        self.modifiers.iter().any(|m| m.kind == kind)
    }

    /// Add a modifier located at the declaration's name.
    #[must_use]
    pub fn with_modifier(mut self, kind: ModifierKind) -> Self {
        self.modifiers.push(Modifier {
            kind,
            span: self.name_span,
        });
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: NodeId) -> Self {
        self.annotations.push(annotation);
        self
    }
}
