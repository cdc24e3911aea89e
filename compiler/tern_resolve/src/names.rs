//! Pre-interned names the resolver compares against.

use tern_ir::{Name, StringInterner};

/// Names looked up by identity instead of string comparison.
pub(crate) struct WellKnownNames {
    pub constructor: Name,
    pub to_string: Name,
    pub void: Name,
    pub math: Name,
    pub pow: Name,

    // Annotations
    pub emit_as: Name,
    pub needs_include: Name,
    pub entry_point: Name,
    pub extern_c: Name,
    pub operator: Name,
}

impl WellKnownNames {
    pub fn new(interner: &StringInterner) -> Self {
        WellKnownNames {
            constructor: interner.intern("new"),
            to_string: interner.intern("toString"),
            void: interner.intern("void"),
            math: interner.intern("math"),
            pow: interner.intern("pow"),
            emit_as: interner.intern("EmitAs"),
            needs_include: interner.intern("NeedsInclude"),
            entry_point: interner.intern("EntryPoint"),
            extern_c: interner.intern("ExternC"),
            operator: interner.intern("Operator"),
        }
    }
}
