//! Symbol kinds.

use std::fmt;

/// What a symbol declares.
///
/// `Forwarded`, `MergedInstanceFunction`, `Ambiguous` and `Unmerged` are only
/// produced by member merging. `Automatic` is the placeholder a symbol holds
/// between the first declaration pass and the pass that assigns final kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SymbolKind {
    Namespace,
    Enum,
    EnumFlags,
    Class,
    Interface,
    GlobalFunction,
    InstanceFunction,
    Constructor,
    LocalFunction,
    GlobalVariable,
    InstanceVariable,
    LocalVariable,
    ArgumentVariable,
    EnumValue,
    TypeParameter,
    Alias,
    Define,
    Forwarded,
    MergedInstanceFunction,
    Ambiguous,
    Unmerged,
    Automatic,
}

impl SymbolKind {
    /// Kinds that name a type when referenced.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            SymbolKind::Namespace
                | SymbolKind::Enum
                | SymbolKind::EnumFlags
                | SymbolKind::Class
                | SymbolKind::Interface
                | SymbolKind::TypeParameter
                | SymbolKind::Alias
        )
    }

    pub fn is_object(self) -> bool {
        matches!(self, SymbolKind::Class | SymbolKind::Interface)
    }

    pub fn is_enum(self) -> bool {
        matches!(self, SymbolKind::Enum | SymbolKind::EnumFlags)
    }

    pub fn is_function(self) -> bool {
        matches!(
            self,
            SymbolKind::GlobalFunction
                | SymbolKind::InstanceFunction
                | SymbolKind::Constructor
                | SymbolKind::LocalFunction
                | SymbolKind::MergedInstanceFunction
        )
    }

    pub fn is_variable(self) -> bool {
        matches!(
            self,
            SymbolKind::GlobalVariable
                | SymbolKind::InstanceVariable
                | SymbolKind::LocalVariable
                | SymbolKind::ArgumentVariable
                | SymbolKind::EnumValue
        )
    }

    /// Members that need an instance to be used.
    pub fn is_instance_member(self) -> bool {
        matches!(
            self,
            SymbolKind::InstanceFunction
                | SymbolKind::InstanceVariable
                | SymbolKind::MergedInstanceFunction
        )
    }

    /// Symbols whose storage lives in a function activation.
    pub fn is_local(self) -> bool {
        matches!(
            self,
            SymbolKind::LocalVariable | SymbolKind::ArgumentVariable | SymbolKind::LocalFunction
        )
    }

    pub fn describe(self) -> &'static str {
        match self {
            SymbolKind::Namespace => "namespace",
            SymbolKind::Enum => "enum",
            SymbolKind::EnumFlags => "flags enum",
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::GlobalFunction => "global function",
            SymbolKind::InstanceFunction => "instance function",
            SymbolKind::Constructor => "constructor",
            SymbolKind::LocalFunction => "local function",
            SymbolKind::GlobalVariable => "global variable",
            SymbolKind::InstanceVariable => "instance variable",
            SymbolKind::LocalVariable => "local variable",
            SymbolKind::ArgumentVariable => "argument",
            SymbolKind::EnumValue => "enum value",
            SymbolKind::TypeParameter => "type parameter",
            SymbolKind::Alias => "alias",
            SymbolKind::Define => "define",
            SymbolKind::Forwarded => "forwarded member",
            SymbolKind::MergedInstanceFunction => "merged instance function",
            SymbolKind::Ambiguous => "ambiguous member",
            SymbolKind::Unmerged => "unmerged member",
            SymbolKind::Automatic => "declaration",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}
