//! Arena handles shared by the syntax tree, symbol table and type cache.
//!
//! Nodes point at their resolved symbol and type through these handles, so
//! they live here rather than in the crates that own the arenas.

use std::fmt;

macro_rules! define_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            /// Create from an arena length.
            ///
            /// # Panics
            /// Panics if the arena outgrew `u32`.
            #[inline]
            pub fn from_usize(index: usize) -> Self {
                match u32::try_from(index) {
                    Ok(raw) => $name(raw),
                    Err(_) => panic!(concat!(stringify!($name), " arena overflow")),
                }
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

define_index!(
    /// Index into the [`NodeArena`](crate::NodeArena).
    NodeId
);

define_index!(
    /// Index into the symbol table.
    ///
    /// Symbol ids are handed out in creation order and double as the
    /// symbol's unique id for ordering tie-breaks.
    SymbolId
);

define_index!(
    /// Index into the type cache.
    ///
    /// Built-in types are pre-allocated at fixed indices so they can be
    /// compared without a lookup.
    TypeId
);

impl TypeId {
    /// Sentinel for expressions that failed to resolve.
    pub const ERROR: TypeId = TypeId(0);
    /// Type of the `null` literal.
    pub const NULL: TypeId = TypeId(1);
    pub const VOID: TypeId = TypeId(2);
    pub const BOOL: TypeId = TypeId(3);
    pub const INT: TypeId = TypeId(4);
    pub const FLOAT: TypeId = TypeId(5);
    pub const DOUBLE: TypeId = TypeId(6);
    pub const STRING: TypeId = TypeId(7);
    /// Unparameterized `List<T>`.
    pub const LIST: TypeId = TypeId(8);
    /// Unparameterized `Map<K, V>`.
    pub const MAP: TypeId = TypeId(9);

    /// First id handed out for types created during resolution.
    pub const FIRST_DYNAMIC: u32 = 10;

    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }
}
