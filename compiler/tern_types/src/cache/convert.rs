//! Conversion rules between types.

use tern_ir::TypeId;

use super::{TypeCache, TypeKind};

impl TypeCache {
    #[inline]
    pub fn is_numeric(&self, ty: TypeId) -> bool {
        matches!(ty, TypeId::INT | TypeId::FLOAT | TypeId::DOUBLE)
    }

    #[inline]
    pub fn is_integer(&self, ty: TypeId) -> bool {
        ty == TypeId::INT
    }

    #[inline]
    pub fn is_real(&self, ty: TypeId) -> bool {
        matches!(ty, TypeId::FLOAT | TypeId::DOUBLE)
    }

    pub fn is_enum(&self, ty: TypeId) -> bool {
        self.kind(ty).is_enum()
    }

    pub fn is_flags(&self, ty: TypeId) -> bool {
        self.kind(ty) == TypeKind::EnumFlags
    }

    /// Integers and enum values, which promote to `int`.
    pub fn is_integer_like(&self, ty: TypeId) -> bool {
        self.is_integer(ty) || self.is_enum(ty)
    }

    /// Types `null` converts to. Primitive value classes are excluded;
    /// `string` is a reference.
    pub fn is_reference(&self, ty: TypeId) -> bool {
        if matches!(ty, TypeId::BOOL | TypeId::INT | TypeId::FLOAT | TypeId::DOUBLE) {
            return false;
        }
        matches!(
            self.kind(ty),
            TypeKind::Class | TypeKind::Interface | TypeKind::Function | TypeKind::Parameter
        )
    }

    /// The base class of a class, if it has one.
    pub fn base_class(&self, ty: TypeId) -> Option<TypeId> {
        let current = self.get(ty);
        if current.kind != TypeKind::Class {
            return None;
        }
        current
            .relevant_types
            .first()
            .copied()
            .filter(|&base| self.kind(base) == TypeKind::Class)
    }

    /// Whether `base` is a transitive base type of `ty`.
    pub fn has_base_type(&self, ty: TypeId, base: TypeId) -> bool {
        if !self.kind(ty).is_object() {
            return false;
        }
        self.get(ty)
            .relevant_types
            .iter()
            .any(|&parent| parent == base || self.has_base_type(parent, base))
    }

    pub fn can_implicitly_convert(&self, from: TypeId, to: TypeId) -> bool {
        if from == to || from.is_error() || to.is_error() {
            return true;
        }
        if from == TypeId::NULL {
            return self.is_reference(to);
        }
        // Any integer or real converts to any real, narrowing included.
        if self.is_numeric(from) && self.is_real(to) {
            return true;
        }
        if self.is_enum(from) && matches!(to, TypeId::INT | TypeId::DOUBLE) {
            return true;
        }
        self.has_base_type(from, to)
    }

    pub fn can_explicitly_convert(&self, from: TypeId, to: TypeId) -> bool {
        if self.can_implicitly_convert(from, to) {
            return true;
        }
        let numeric_from = self.is_numeric(from) || self.is_enum(from);
        if numeric_from && self.is_numeric(to) {
            return true;
        }
        if (numeric_from && to == TypeId::BOOL) || (from == TypeId::BOOL && self.is_numeric(to)) {
            return true;
        }
        if from == TypeId::INT && self.is_enum(to) {
            return true;
        }
        self.has_base_type(to, from)
    }

    /// The type both `a` and `b` implicitly convert to.
    ///
    /// Checked in order: identity, a direct implicit conversion (towards `b`
    /// first), numeric promotion where enum types count as integers, and the
    /// nearest common base class.
    pub fn common_implicit_type(&self, a: TypeId, b: TypeId) -> Option<TypeId> {
        if a == b {
            return Some(a);
        }
        if a.is_error() || b.is_error() {
            return Some(TypeId::ERROR);
        }
        if self.can_implicitly_convert(a, b) {
            return Some(b);
        }
        if self.can_implicitly_convert(b, a) {
            return Some(a);
        }

        let numeric = |ty| self.is_numeric(ty) || self.is_enum(ty);
        if numeric(a) && numeric(b) {
            if self.is_integer_like(a) && self.is_integer_like(b) {
                return Some(TypeId::INT);
            }
            if a == TypeId::FLOAT && b == TypeId::FLOAT {
                return Some(TypeId::FLOAT);
            }
            return Some(TypeId::DOUBLE);
        }

        if self.kind(a) == TypeKind::Class && self.kind(b) == TypeKind::Class {
            let mut candidate = self.base_class(a);
            while let Some(base) = candidate {
                if self.has_base_type(b, base) {
                    return Some(base);
                }
                candidate = self.base_class(base);
            }
        }
        None
    }
}
