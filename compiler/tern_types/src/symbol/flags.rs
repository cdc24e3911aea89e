//! Symbol flags.

use bitflags::bitflags;

use tern_ir::ModifierKind;

bitflags! {
    /// Properties of a symbol, from its modifiers, annotations and context.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct SymbolFlags: u32 {
        // === Visibility ===
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;

        // === Declaration properties ===
        const CONST = 1 << 3;
        const FINAL = 1 << 4;
        /// No side effects; allowed in constant initializers.
        const PURE = 1 << 5;
        const STATIC = 1 << 6;
        const VIRTUAL = 1 << 7;
        const OVERRIDE = 1 << 8;
        const ABSTRACT = 1 << 9;
        const INLINE = 1 << 10;

        // === Linkage ===
        /// Provided by the host environment; no body is emitted.
        const IMPORT = 1 << 11;
        const EXPORT = 1 << 12;
        const ENTRY_POINT = 1 << 13;
        const EXTERN_C = 1 << 14;

        // === Bookkeeping ===
        /// Created by the resolver rather than written in source.
        const SYNTHESIZED = 1 << 15;
    }
}

impl SymbolFlags {
    /// The flag a source modifier sets.
    pub fn from_modifier(kind: ModifierKind) -> SymbolFlags {
        match kind {
            ModifierKind::Public => SymbolFlags::PUBLIC,
            ModifierKind::Private => SymbolFlags::PRIVATE,
            ModifierKind::Protected => SymbolFlags::PROTECTED,
            ModifierKind::Const => SymbolFlags::CONST,
            ModifierKind::Final => SymbolFlags::FINAL,
            ModifierKind::Pure => SymbolFlags::PURE,
            ModifierKind::Static => SymbolFlags::STATIC,
            ModifierKind::Virtual => SymbolFlags::VIRTUAL,
            ModifierKind::Override => SymbolFlags::OVERRIDE,
            ModifierKind::Abstract => SymbolFlags::ABSTRACT,
            ModifierKind::Import => SymbolFlags::IMPORT,
            ModifierKind::Export => SymbolFlags::EXPORT,
            ModifierKind::Inline => SymbolFlags::INLINE,
        }
    }

    /// Visibility flags only.
    pub fn visibility(self) -> SymbolFlags {
        self & (SymbolFlags::PUBLIC | SymbolFlags::PRIVATE | SymbolFlags::PROTECTED)
    }
}
