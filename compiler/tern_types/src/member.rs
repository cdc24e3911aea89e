//! Type members.

use tern_ir::{SymbolId, TypeId};

use crate::MemberId;

/// A symbol as seen through a particular type's member table.
///
/// Members copied from a base type or a generic definition point at the
/// original through `dependency`; their type is computed lazily from it, and
/// `parameterized_type` names the instantiation whose substitutions apply.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Member {
    pub symbol: SymbolId,
    pub ty: Option<TypeId>,
    pub dependency: Option<MemberId>,
    pub parameterized_type: Option<TypeId>,
}

impl Member {
    /// A member declared directly by the owning type or scope.
    pub fn own(symbol: SymbolId) -> Self {
        Member {
            symbol,
            ty: None,
            dependency: None,
            parameterized_type: None,
        }
    }

    /// A copy of `dependency`, substituted through `parameterized_type` if set.
    pub fn dependent(symbol: SymbolId, dependency: MemberId, parameterized_type: Option<TypeId>) -> Self {
        Member {
            symbol,
            ty: None,
            dependency: Some(dependency),
            parameterized_type,
        }
    }

    pub fn is_inherited(&self) -> bool {
        self.dependency.is_some()
    }
}
