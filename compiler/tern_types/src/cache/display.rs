//! Human-readable type names for diagnostics.

use tern_ir::{StringInterner, TypeId};

use super::{TypeCache, TypeKind};
use crate::SymbolTable;

impl TypeCache {
    /// Render `ty` as it would be written in source, e.g. `List<int>` or
    /// `fn(int, double) string`.
    pub fn display(&self, ty: TypeId, symbols: &SymbolTable, interner: &StringInterner) -> String {
        let mut out = String::new();
        self.write_type(&mut out, ty, symbols, interner);
        out
    }

    fn write_type(&self, out: &mut String, ty: TypeId, symbols: &SymbolTable, interner: &StringInterner) {
        let current = self.get(ty);
        match current.kind {
            TypeKind::Error => out.push_str("<error>"),
            TypeKind::Null => out.push_str("null"),
            TypeKind::Void => out.push_str("void"),
            TypeKind::Function => {
                out.push_str("fn(");
                self.write_list(out, &current.relevant_types[1..], symbols, interner);
                out.push_str(") ");
                self.write_type(out, current.relevant_types[0], symbols, interner);
            }
            _ => {
                match current.symbol {
                    Some(symbol) => out.push_str(interner.lookup(symbols[symbol].name)),
                    None => out.push_str(builtin_name(ty)),
                }
                if let Some(substitutions) = &current.substitutions {
                    out.push('<');
                    self.write_list(out, substitutions, symbols, interner);
                    out.push('>');
                }
            }
        }
    }

    fn write_list(&self, out: &mut String, types: &[TypeId], symbols: &SymbolTable, interner: &StringInterner) {
        for (i, &ty) in types.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_type(out, ty, symbols, interner);
        }
    }
}

fn builtin_name(ty: TypeId) -> &'static str {
    match ty {
        TypeId::BOOL => "bool",
        TypeId::INT => "int",
        TypeId::FLOAT => "float",
        TypeId::DOUBLE => "double",
        TypeId::STRING => "string",
        TypeId::LIST => "List",
        TypeId::MAP => "Map",
        _ => "<anonymous>",
    }
}
