//! Tern types - symbols, types, members and scopes.
//!
//! The resolver's data model:
//! - [`Symbol`] and [`SymbolTable`]: declaration identities with lazy
//!   initialization state
//! - [`Type`] and [`TypeCache`]: hash-consed types, generic instantiation and
//!   the conversion rules
//! - [`Member`]: a symbol seen through a type's member table
//! - [`Scope`] and [`ScopeArena`]: lexical name lookup
//!
//! Everything is stored in arenas and cross-referenced by integer handles.

mod cache;
mod ids;
mod member;
mod overload;
mod scope;
mod symbol;

pub use cache::{Type, TypeCache, TypeKey, TypeKind};
pub use ids::{MemberId, ScopeId};
pub use member::Member;
pub use overload::OverloadKind;
pub use scope::{Scope, ScopeArena, ScopeKind};
pub use symbol::{Constant, InitState, Symbol, SymbolFlags, SymbolKind, SymbolTable};
