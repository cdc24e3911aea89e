//! Tern IR - syntax tree and shared handles.
//!
//! This crate holds the data the front end hands to the resolver:
//! - Spans for source locations
//! - Names for interned identifiers
//! - `NodeId`, `SymbolId` and `TypeId` arena handles
//! - The node arena and the sum-typed [`NodeKind`]
//! - [`AstBuilder`] for constructing trees programmatically
//!
//! # Design
//!
//! - **Intern everything**: strings become `Name(u32)`, types `TypeId(u32)`
//! - **Flatten everything**: children are `NodeId` indices, never boxes
//! - **Back-references are handles**: parents, siblings and the resolver's
//!   symbol/type annotations are plain ids into their owning arenas

mod arena;
pub mod ast;
mod builder;
mod ids;
mod interner;
mod name;
mod span;

pub use arena::NodeArena;
pub use ast::{
    BinaryOp, DeclHeader, Modifier, ModifierKind, Node, NodeKind, ObjectKind, UnaryOp,
};
pub use builder::AstBuilder;
pub use ids::{NodeId, SymbolId, TypeId};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use span::{Span, SpanError};
