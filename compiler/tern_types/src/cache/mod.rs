//! Hash-consed types and the type cache.
//!
//! Types are created on demand and live for the whole compilation. Named
//! types (objects, enums, namespaces, type parameters) are one per symbol;
//! parameterized instantiations and anonymous function signatures are
//! interned by structural key so that equal types always share a `TypeId`.
//!
//! Built-in types sit at the fixed ids declared on [`TypeId`]. The prelude's
//! declarations bind their symbols to those ids with [`TypeCache::bind_builtin`].

mod convert;
mod display;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tern_ir::{Name, SymbolId, TypeId};

use crate::{InitState, Member, MemberId, SymbolTable};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeKind {
    Error,
    Null,
    Void,
    /// Anonymous signature; relevant types are `[result, argument…]`.
    Function,
    Namespace,
    Class,
    Interface,
    Enum,
    EnumFlags,
    /// A generic type parameter.
    Parameter,
}

impl TypeKind {
    pub fn is_object(self) -> bool {
        matches!(self, TypeKind::Class | TypeKind::Interface)
    }

    pub fn is_enum(self) -> bool {
        matches!(self, TypeKind::Enum | TypeKind::EnumFlags)
    }
}

/// Structural identity of an interned type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeKey {
    /// A named type, with an empty substitution list for the definition itself.
    Object(SymbolId, Box<[TypeId]>),
    /// `[result, argument…]`
    Function(Box<[TypeId]>),
}

#[derive(Clone, Debug)]
pub struct Type {
    pub kind: TypeKind,
    pub symbol: Option<SymbolId>,
    /// Base types of an object (base class first), or `[result, argument…]`
    /// of a function.
    pub relevant_types: Vec<TypeId>,
    /// Set only on a parameterized instantiation.
    pub substitutions: Option<Box<[TypeId]>>,
    /// The generic definition an instantiation was built from.
    pub generic: Option<TypeId>,
    /// Parameter types of a generic definition.
    pub parameters: Vec<TypeId>,
    pub members: FxHashMap<Name, MemberId>,
    /// Set once the member table and base types are final.
    pub complete: bool,
}

impl Type {
    fn new(kind: TypeKind, symbol: Option<SymbolId>) -> Self {
        Type {
            kind,
            symbol,
            relevant_types: Vec::new(),
            substitutions: None,
            generic: None,
            parameters: Vec::new(),
            members: FxHashMap::default(),
            complete: false,
        }
    }

    pub fn is_parameterized(&self) -> bool {
        self.substitutions.is_some()
    }
}

/// Owns every type and member of a compilation.
#[derive(Clone, Debug)]
pub struct TypeCache {
    types: Vec<Type>,
    members: Vec<Member>,
    interned: FxHashMap<TypeKey, TypeId>,
    /// Instantiations waiting for their generic definition to complete.
    pending: FxHashMap<TypeId, Vec<TypeId>>,
}

impl Default for TypeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeCache {
    /// Create a cache with the built-in types at their fixed ids.
    pub fn new() -> Self {
        let builtins = [
            TypeKind::Error,  // 0 = TypeId::ERROR
            TypeKind::Null,   // 1 = TypeId::NULL
            TypeKind::Void,   // 2 = TypeId::VOID
            TypeKind::Class,  // 3 = TypeId::BOOL
            TypeKind::Class,  // 4 = TypeId::INT
            TypeKind::Class,  // 5 = TypeId::FLOAT
            TypeKind::Class,  // 6 = TypeId::DOUBLE
            TypeKind::Class,  // 7 = TypeId::STRING
            TypeKind::Class,  // 8 = TypeId::LIST
            TypeKind::Class,  // 9 = TypeId::MAP
        ];
        debug_assert_eq!(builtins.len(), TypeId::FIRST_DYNAMIC as usize);

        let mut types: Vec<Type> = builtins.into_iter().map(|kind| Type::new(kind, None)).collect();
        for ty in &mut types[..3] {
            ty.complete = true;
        }
        TypeCache {
            types,
            members: Vec::new(),
            interned: FxHashMap::default(),
            pending: FxHashMap::default(),
        }
    }

    /// Fixed id of the built-in class a prelude declaration named `name` binds to.
    pub fn builtin_for_name(name: &str) -> Option<TypeId> {
        Some(match name {
            "bool" => TypeId::BOOL,
            "int" => TypeId::INT,
            "float" => TypeId::FLOAT,
            "double" => TypeId::DOUBLE,
            "string" => TypeId::STRING,
            "List" => TypeId::LIST,
            "Map" => TypeId::MAP,
            _ => return None,
        })
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    #[inline]
    pub fn get(&self, ty: TypeId) -> &Type {
        &self.types[ty.index()]
    }

    #[inline]
    pub fn kind(&self, ty: TypeId) -> TypeKind {
        self.types[ty.index()].kind
    }

    #[inline]
    pub fn symbol(&self, ty: TypeId) -> Option<SymbolId> {
        self.types[ty.index()].symbol
    }

    fn push(&mut self, ty: Type) -> TypeId {
        let id = TypeId::from_usize(self.types.len());
        self.types.push(ty);
        id
    }

    /// Create the type a named declaration introduces.
    pub fn create_named(&mut self, kind: TypeKind, symbol: SymbolId) -> TypeId {
        let id = self.push(Type::new(kind, Some(symbol)));
        self.interned
            .insert(TypeKey::Object(symbol, Box::default()), id);
        id
    }

    /// Attach a prelude symbol to one of the fixed built-in ids.
    pub fn bind_builtin(&mut self, ty: TypeId, symbol: SymbolId) {
        self.types[ty.index()].symbol = Some(symbol);
        self.interned
            .insert(TypeKey::Object(symbol, Box::default()), ty);
    }

    pub fn set_relevant_types(&mut self, ty: TypeId, relevant: Vec<TypeId>) {
        self.types[ty.index()].relevant_types = relevant;
    }

    pub fn set_parameters(&mut self, ty: TypeId, parameters: Vec<TypeId>) {
        self.types[ty.index()].parameters = parameters;
    }

    /// Mark a definition complete and build every instantiation queued on it.
    pub fn complete(&mut self, ty: TypeId) {
        self.types[ty.index()].complete = true;
        if let Some(waiting) = self.pending.remove(&ty) {
            tracing::trace!(?ty, count = waiting.len(), "instantiating queued types");
            for instance in waiting {
                self.instantiate(instance);
            }
        }
    }

    // Members

    pub fn new_member(&mut self, member: Member) -> MemberId {
        let id = MemberId::from_usize(self.members.len());
        self.members.push(member);
        id
    }

    #[inline]
    pub fn member(&self, id: MemberId) -> &Member {
        &self.members[id.index()]
    }

    #[inline]
    pub fn member_mut(&mut self, id: MemberId) -> &mut Member {
        &mut self.members[id.index()]
    }

    pub fn find_member(&self, ty: TypeId, name: Name) -> Option<MemberId> {
        self.types[ty.index()].members.get(&name).copied()
    }

    /// Add a member under `name`, or return the member already there.
    pub fn insert_member(&mut self, ty: TypeId, name: Name, member: MemberId) -> Result<(), MemberId> {
        let table = &mut self.types[ty.index()].members;
        if let Some(&existing) = table.get(&name) {
            return Err(existing);
        }
        table.insert(name, member);
        Ok(())
    }

    /// Replace the member stored under `name`.
    pub fn set_member(&mut self, ty: TypeId, name: Name, member: MemberId) {
        self.types[ty.index()].members.insert(name, member);
    }

    /// Members of `ty` in creation order.
    pub fn members_of(&self, ty: TypeId) -> Vec<(Name, MemberId)> {
        let mut members: Vec<_> = self.types[ty.index()]
            .members
            .iter()
            .map(|(&name, &id)| (name, id))
            .collect();
        members.sort_by_key(|&(_, id)| id);
        members
    }

    /// Type of a member, following dependencies and substitutions.
    ///
    /// The member's symbol must already be initialized; the result is cached
    /// on the member once it is. Returns the error type for a symbol that
    /// has no type yet.
    pub fn member_type(&mut self, id: MemberId, symbols: &SymbolTable) -> TypeId {
        let member = self.members[id.index()];
        if let Some(ty) = member.ty {
            return ty;
        }
        let base = match member.dependency {
            Some(dependency) => self.member_type(dependency, symbols),
            None => symbols[member.symbol].ty_or_error(),
        };
        let ty = match member.parameterized_type {
            Some(context) => {
                let (parameters, substitutions) = self.substitution_context(context);
                self.substitute(base, &parameters, &substitutions)
            }
            None => base,
        };
        if symbols[member.symbol].state == InitState::Done && !base.is_error() {
            self.members[id.index()].ty = Some(ty);
        }
        ty
    }

    // Interning

    /// The anonymous function type `fn(arguments…) result`.
    pub fn function_type(&mut self, result: TypeId, arguments: &[TypeId]) -> TypeId {
        let mut relevant = Vec::with_capacity(arguments.len() + 1);
        relevant.push(result);
        relevant.extend_from_slice(arguments);
        let key = TypeKey::Function(relevant.clone().into_boxed_slice());
        if let Some(&id) = self.interned.get(&key) {
            return id;
        }
        let mut ty = Type::new(TypeKind::Function, None);
        ty.relevant_types = relevant;
        ty.complete = true;
        let id = self.push(ty);
        self.interned.insert(key, id);
        id
    }

    /// Result type of a function type.
    pub fn function_result(&self, ty: TypeId) -> Option<TypeId> {
        let ty = self.get(ty);
        (ty.kind == TypeKind::Function).then(|| ty.relevant_types[0])
    }

    /// Argument types of a function type.
    pub fn function_arguments(&self, ty: TypeId) -> &[TypeId] {
        let ty = self.get(ty);
        if ty.kind == TypeKind::Function {
            &ty.relevant_types[1..]
        } else {
            &[]
        }
    }

    /// Instantiate a generic definition with `substitutions`.
    ///
    /// Equal requests return the same id. If the definition is not complete
    /// yet the new instantiation is queued and filled in by
    /// [`complete`](TypeCache::complete).
    ///
    /// # Panics
    /// Panics if `generic` is not a named type.
    pub fn parameterize(&mut self, generic: TypeId, substitutions: &[TypeId]) -> TypeId {
        if substitutions.is_empty() {
            return generic;
        }
        let definition = &self.types[generic.index()];
        let Some(symbol) = definition.symbol else {
            panic!("parameterize on anonymous {generic:?}");
        };
        let kind = definition.kind;
        let complete = definition.complete;

        let key = TypeKey::Object(symbol, substitutions.into());
        if let Some(&id) = self.interned.get(&key) {
            return id;
        }
        let mut instance = Type::new(kind, Some(symbol));
        instance.substitutions = Some(substitutions.into());
        instance.generic = Some(generic);
        let id = self.push(instance);
        self.interned.insert(key, id);
        tracing::trace!(?generic, ?id, complete, "new instantiation");

        if complete {
            self.instantiate(id);
        } else {
            self.pending.entry(generic).or_default().push(id);
        }
        id
    }

    /// Build an instantiation's base types and member table from its definition.
    fn instantiate(&mut self, instance: TypeId) {
        let Some(generic) = self.types[instance.index()].generic else {
            return;
        };
        let (parameters, substitutions) = self.substitution_context(instance);
        let relevant = self.types[generic.index()].relevant_types.clone();
        let relevant = relevant
            .into_iter()
            .map(|ty| self.substitute(ty, &parameters, &substitutions))
            .collect();
        self.types[instance.index()].relevant_types = relevant;

        for (name, original) in self.members_of(generic) {
            let symbol = self.members[original.index()].symbol;
            let copy = self.new_member(Member::dependent(symbol, original, Some(instance)));
            self.types[instance.index()].members.insert(name, copy);
        }
        self.types[instance.index()].complete = true;
    }

    /// Parameters and substitutions that apply inside instantiation `instance`.
    pub fn substitution_context(&self, instance: TypeId) -> (SmallVec<[TypeId; 4]>, SmallVec<[TypeId; 4]>) {
        let ty = &self.types[instance.index()];
        match (ty.generic, &ty.substitutions) {
            (Some(generic), Some(substitutions)) => (
                self.types[generic.index()].parameters.iter().copied().collect(),
                substitutions.iter().copied().collect(),
            ),
            _ => (SmallVec::new(), SmallVec::new()),
        }
    }

    /// Replace every occurrence of `parameters[i]` inside `ty` with `substitutions[i]`.
    pub fn substitute(&mut self, ty: TypeId, parameters: &[TypeId], substitutions: &[TypeId]) -> TypeId {
        if parameters.is_empty() {
            return ty;
        }
        if let Some(index) = parameters.iter().position(|&p| p == ty) {
            return substitutions.get(index).copied().unwrap_or(TypeId::ERROR);
        }
        let current = &self.types[ty.index()];
        let kind = current.kind;
        let generic = current.generic;
        let existing = match (kind, &current.substitutions) {
            (TypeKind::Function, _) => current.relevant_types.clone(),
            (_, Some(current)) => current.to_vec(),
            (_, None) => return ty,
        };
        let rewritten = self.substitute_all(&existing, parameters, substitutions);
        if rewritten == existing {
            return ty;
        }
        match (kind, generic) {
            (TypeKind::Function, _) => self.function_type(rewritten[0], &rewritten[1..]),
            (_, Some(generic)) => self.parameterize(generic, &rewritten),
            (_, None) => ty,
        }
    }

    pub fn substitute_all(&mut self, types: &[TypeId], parameters: &[TypeId], substitutions: &[TypeId]) -> Vec<TypeId> {
        types
            .iter()
            .map(|&ty| self.substitute(ty, parameters, substitutions))
            .collect()
    }

    /// Whether `ty` mentions any type parameter.
    pub fn mentions_parameter(&self, ty: TypeId) -> bool {
        let current = &self.types[ty.index()];
        match current.kind {
            TypeKind::Parameter => true,
            TypeKind::Function => current
                .relevant_types
                .iter()
                .any(|&t| self.mentions_parameter(t)),
            _ => current
                .substitutions
                .iter()
                .flat_map(|subs| subs.iter())
                .any(|&t| self.mentions_parameter(t)),
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests unwrap lookups they just set up")]
mod tests;
