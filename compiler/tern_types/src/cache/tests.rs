use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tern_ir::{Span, StringInterner, SymbolId, TypeId};

use super::*;
use crate::{Member, SymbolKind, SymbolTable};

struct Fixture {
    interner: StringInterner,
    symbols: SymbolTable,
    types: TypeCache,
}

impl Fixture {
    fn new() -> Self {
        Fixture {
            interner: StringInterner::new(),
            symbols: SymbolTable::new(),
            types: TypeCache::new(),
        }
    }

    fn symbol(&mut self, name: &str, kind: SymbolKind) -> SymbolId {
        let name = self.interner.intern(name);
        self.symbols.create(name, kind, Span::DUMMY)
    }

    fn named(&mut self, name: &str, kind: TypeKind) -> TypeId {
        let symbol_kind = match kind {
            TypeKind::Class => SymbolKind::Class,
            TypeKind::Interface => SymbolKind::Interface,
            TypeKind::Enum => SymbolKind::Enum,
            TypeKind::EnumFlags => SymbolKind::EnumFlags,
            TypeKind::Parameter => SymbolKind::TypeParameter,
            _ => SymbolKind::Namespace,
        };
        let symbol = self.symbol(name, symbol_kind);
        let ty = self.types.create_named(kind, symbol);
        self.symbols[symbol].ty = Some(ty);
        ty
    }

    /// A generic class with one type parameter and a `get() T` member.
    fn generic_box(&mut self) -> (TypeId, TypeId, SymbolId) {
        let class = self.named("Box", TypeKind::Class);
        let parameter = self.named("T", TypeKind::Parameter);
        self.types.set_parameters(class, vec![parameter]);
        let getter = self.symbol("get", SymbolKind::InstanceFunction);
        let getter_ty = self.types.function_type(parameter, &[]);
        self.symbols[getter].ty = Some(getter_ty);
        self.symbols[getter].begin_initialization();
        self.symbols[getter].finish_initialization();
        let member = self.types.new_member(Member::own(getter));
        let name = self.symbols[getter].name;
        self.types.insert_member(class, name, member).unwrap();
        (class, parameter, getter)
    }

    fn show(&self, ty: TypeId) -> String {
        self.types.display(ty, &self.symbols, &self.interner)
    }
}

#[test]
fn builtins_sit_at_fixed_ids() {
    let types = TypeCache::new();
    assert_eq!(types.len(), TypeId::FIRST_DYNAMIC as usize);
    assert_eq!(types.kind(TypeId::ERROR), TypeKind::Error);
    assert_eq!(types.kind(TypeId::NULL), TypeKind::Null);
    assert_eq!(types.kind(TypeId::VOID), TypeKind::Void);
    assert_eq!(types.kind(TypeId::STRING), TypeKind::Class);
    assert_eq!(TypeCache::builtin_for_name("List"), Some(TypeId::LIST));
    assert_eq!(TypeCache::builtin_for_name("Point"), None);
}

#[test]
fn function_types_are_interned() {
    let mut types = TypeCache::new();
    let a = types.function_type(TypeId::STRING, &[TypeId::INT]);
    let b = types.function_type(TypeId::STRING, &[TypeId::INT]);
    let c = types.function_type(TypeId::STRING, &[TypeId::DOUBLE]);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(types.function_result(a), Some(TypeId::STRING));
    assert_eq!(types.function_arguments(a), &[TypeId::INT]);
}

#[test]
fn parameterize_is_hash_consed() {
    let mut f = Fixture::new();
    let (class, _, _) = f.generic_box();
    f.types.complete(class);
    let a = f.types.parameterize(class, &[TypeId::INT]);
    let b = f.types.parameterize(class, &[TypeId::INT]);
    let c = f.types.parameterize(class, &[TypeId::STRING]);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(f.types.parameterize(class, &[]), class);
    assert_eq!(f.show(a), "Box<int>");
}

#[test]
fn instantiation_substitutes_member_types() {
    let mut f = Fixture::new();
    let (class, _, getter) = f.generic_box();
    f.types.complete(class);
    let instance = f.types.parameterize(class, &[TypeId::STRING]);

    let name = f.symbols[getter].name;
    let member = f.types.find_member(instance, name).unwrap();
    assert_eq!(f.types.member(member).symbol, getter);
    assert!(f.types.member(member).is_inherited());

    let ty = f.types.member_type(member, &f.symbols);
    assert_eq!(f.show(ty), "fn() string");
    assert_eq!(f.types.member(member).ty, Some(ty));
}

#[test]
fn instantiation_waits_for_incomplete_definition() {
    let mut f = Fixture::new();
    let (class, _, getter) = f.generic_box();
    let instance = f.types.parameterize(class, &[TypeId::INT]);
    let name = f.symbols[getter].name;
    assert!(!f.types.get(instance).complete);
    assert_eq!(f.types.find_member(instance, name), None);

    f.types.complete(class);
    assert!(f.types.get(instance).complete);
    assert!(f.types.find_member(instance, name).is_some());
}

#[test]
fn substitute_rewrites_nested_types() {
    let mut f = Fixture::new();
    let (class, parameter, _) = f.generic_box();
    f.types.complete(class);
    let boxed_t = f.types.parameterize(class, &[parameter]);
    let signature = f.types.function_type(boxed_t, &[parameter, TypeId::BOOL]);

    let rewritten = f.types.substitute(signature, &[parameter], &[TypeId::DOUBLE]);
    assert_eq!(f.show(rewritten), "fn(double, bool) Box<double>");
    assert!(f.types.mentions_parameter(signature));
    assert!(!f.types.mentions_parameter(rewritten));

    let untouched = f.types.function_type(TypeId::INT, &[]);
    assert_eq!(
        f.types.substitute(untouched, &[parameter], &[TypeId::DOUBLE]),
        untouched
    );
}

#[test]
fn null_converts_to_references_only() {
    let mut f = Fixture::new();
    let class = f.named("Point", TypeKind::Class);
    let interface = f.named("Shape", TypeKind::Interface);
    let function = f.types.function_type(TypeId::VOID, &[]);
    for target in [class, interface, function, TypeId::STRING] {
        assert!(f.types.can_implicitly_convert(TypeId::NULL, target));
    }
    for target in [TypeId::INT, TypeId::BOOL, TypeId::DOUBLE] {
        assert!(!f.types.can_implicitly_convert(TypeId::NULL, target));
    }
}

#[test]
fn numeric_conversions_target_reals_only() {
    let types = TypeCache::new();
    assert!(types.can_implicitly_convert(TypeId::INT, TypeId::DOUBLE));
    assert!(types.can_implicitly_convert(TypeId::INT, TypeId::FLOAT));
    assert!(types.can_implicitly_convert(TypeId::FLOAT, TypeId::DOUBLE));
    assert!(types.can_implicitly_convert(TypeId::DOUBLE, TypeId::FLOAT));
    assert!(!types.can_implicitly_convert(TypeId::DOUBLE, TypeId::INT));
    assert!(!types.can_implicitly_convert(TypeId::FLOAT, TypeId::INT));
    assert!(types.can_explicitly_convert(TypeId::DOUBLE, TypeId::INT));
    assert!(types.can_explicitly_convert(TypeId::INT, TypeId::BOOL));
    assert!(types.can_explicitly_convert(TypeId::BOOL, TypeId::DOUBLE));
    assert!(!types.can_explicitly_convert(TypeId::STRING, TypeId::INT));
}

#[test]
fn enums_convert_to_int_and_double_but_not_back() {
    let mut f = Fixture::new();
    let color = f.named("Color", TypeKind::Enum);
    assert!(f.types.can_implicitly_convert(color, TypeId::INT));
    assert!(f.types.can_implicitly_convert(color, TypeId::DOUBLE));
    assert!(!f.types.can_implicitly_convert(TypeId::INT, color));
    assert!(!f.types.can_implicitly_convert(TypeId::DOUBLE, color));
    assert!(f.types.can_explicitly_convert(TypeId::INT, color));
}

#[test]
fn subclasses_convert_to_bases_and_downcast_explicitly() {
    let mut f = Fixture::new();
    let shape = f.named("Shape", TypeKind::Interface);
    let base = f.named("Base", TypeKind::Class);
    let derived = f.named("Derived", TypeKind::Class);
    f.types.set_relevant_types(base, vec![shape]);
    f.types.set_relevant_types(derived, vec![base]);

    assert!(f.types.has_base_type(derived, shape));
    assert!(f.types.can_implicitly_convert(derived, base));
    assert!(f.types.can_implicitly_convert(derived, shape));
    assert!(!f.types.can_implicitly_convert(base, derived));
    assert!(f.types.can_explicitly_convert(base, derived));
    assert_eq!(f.types.base_class(derived), Some(base));
    assert_eq!(f.types.base_class(base), None);
}

#[test]
fn common_type_of_siblings_is_nearest_base() {
    let mut f = Fixture::new();
    let root = f.named("Root", TypeKind::Class);
    let middle = f.named("Middle", TypeKind::Class);
    let left = f.named("Left", TypeKind::Class);
    let right = f.named("Right", TypeKind::Class);
    let other = f.named("Other", TypeKind::Class);
    f.types.set_relevant_types(middle, vec![root]);
    f.types.set_relevant_types(left, vec![middle]);
    f.types.set_relevant_types(right, vec![middle]);

    assert_eq!(f.types.common_implicit_type(left, right), Some(middle));
    assert_eq!(f.types.common_implicit_type(left, root), Some(root));
    assert_eq!(f.types.common_implicit_type(left, other), None);
    assert_eq!(f.types.common_implicit_type(left, TypeId::NULL), Some(left));
}

#[test]
fn common_type_numeric_promotion() {
    let types = TypeCache::new();
    assert_eq!(types.common_implicit_type(TypeId::INT, TypeId::DOUBLE), Some(TypeId::DOUBLE));
    assert_eq!(types.common_implicit_type(TypeId::FLOAT, TypeId::INT), Some(TypeId::FLOAT));
    // Both reals convert to each other, so the right-hand side wins.
    assert_eq!(types.common_implicit_type(TypeId::FLOAT, TypeId::DOUBLE), Some(TypeId::DOUBLE));
    assert_eq!(types.common_implicit_type(TypeId::DOUBLE, TypeId::FLOAT), Some(TypeId::FLOAT));
    assert_eq!(types.common_implicit_type(TypeId::ERROR, TypeId::INT), Some(TypeId::ERROR));
    assert_eq!(types.common_implicit_type(TypeId::BOOL, TypeId::INT), None);
}

#[test]
fn common_type_with_flags_enums() {
    let mut f = Fixture::new();
    let flags = f.named("Mode", TypeKind::EnumFlags);
    let other_flags = f.named("Access", TypeKind::EnumFlags);
    let color = f.named("Color", TypeKind::Enum);

    assert_eq!(f.types.common_implicit_type(flags, flags), Some(flags));
    assert_eq!(f.types.common_implicit_type(flags, TypeId::INT), Some(TypeId::INT));
    assert_eq!(f.types.common_implicit_type(TypeId::INT, flags), Some(TypeId::INT));
    assert_eq!(f.types.common_implicit_type(flags, TypeId::DOUBLE), Some(TypeId::DOUBLE));
    assert_eq!(f.types.common_implicit_type(flags, other_flags), Some(TypeId::INT));
    assert_eq!(f.types.common_implicit_type(flags, color), Some(TypeId::INT));
    assert_eq!(f.types.common_implicit_type(flags, TypeId::FLOAT), Some(TypeId::DOUBLE));
}

#[test]
fn display_renders_source_syntax() {
    let mut f = Fixture::new();
    let list = f.symbol("List", SymbolKind::Class);
    f.types.bind_builtin(TypeId::LIST, list);
    let parameter = f.named("T", TypeKind::Parameter);
    f.types.set_parameters(TypeId::LIST, vec![parameter]);
    f.types.complete(TypeId::LIST);
    let ints = f.types.parameterize(TypeId::LIST, &[TypeId::INT]);
    let nested = f.types.parameterize(TypeId::LIST, &[ints]);
    let function = f.types.function_type(TypeId::STRING, &[TypeId::INT, TypeId::DOUBLE]);

    assert_eq!(f.show(nested), "List<List<int>>");
    assert_eq!(f.show(function), "fn(int, double) string");
    assert_eq!(f.show(TypeId::ERROR), "<error>");
    assert_eq!(f.show(TypeId::BOOL), "bool");
}

fn builtin() -> impl Strategy<Value = TypeId> {
    prop::sample::select(vec![
        TypeId::BOOL,
        TypeId::INT,
        TypeId::FLOAT,
        TypeId::DOUBLE,
        TypeId::STRING,
    ])
}

proptest! {
    #[test]
    fn parameterize_returns_one_id_per_key(
        first in prop::collection::vec(builtin(), 1..4),
        second in prop::collection::vec(builtin(), 1..4),
    ) {
        let mut f = Fixture::new();
        let (class, _, _) = f.generic_box();
        f.types.complete(class);
        let a = f.types.parameterize(class, &first);
        let again = f.types.parameterize(class, &first);
        let b = f.types.parameterize(class, &second);
        prop_assert_eq!(a, again);
        prop_assert_eq!(a == b, first == second);
    }

    #[test]
    fn both_sides_convert_to_the_common_type(a in builtin(), b in builtin()) {
        let types = TypeCache::new();
        if let Some(common) = types.common_implicit_type(a, b) {
            prop_assert!(types.can_implicitly_convert(a, common));
            prop_assert!(types.can_implicitly_convert(b, common));
        }
        prop_assert_eq!(
            types.common_implicit_type(a, b).is_some(),
            types.common_implicit_type(b, a).is_some()
        );
    }

    #[test]
    fn implicit_conversion_implies_explicit(a in builtin(), b in builtin()) {
        let types = TypeCache::new();
        if types.can_implicitly_convert(a, b) {
            prop_assert!(types.can_explicitly_convert(a, b));
        }
    }
}
