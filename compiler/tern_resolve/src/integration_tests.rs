//! End-to-end resolution of small programs built with `AstBuilder`.

use pretty_assertions::assert_eq;
use tern_diagnostic::{DiagnosticConfig, ErrorCode};
use tern_ir::{
    AstBuilder, BinaryOp, DeclHeader, ModifierKind, NodeArena, NodeId, NodeKind, Span,
    StringInterner, SymbolId, TypeId,
};
use tern_types::{SymbolFlags, SymbolKind};

use crate::{resolve_program, ResolveOutput, ResolverOptions};

struct Resolved<'a> {
    interner: &'a StringInterner,
    nodes: NodeArena,
    output: ResolveOutput,
}

fn resolve(
    interner: &StringInterner,
    build: impl FnOnce(&mut AstBuilder<'_>) -> Vec<NodeId>,
) -> Resolved<'_> {
    let options = ResolverOptions::default().with_unused_expression_warnings(false);
    resolve_with(interner, &options, build)
}

fn resolve_with<'a>(
    interner: &'a StringInterner,
    options: &ResolverOptions,
    build: impl FnOnce(&mut AstBuilder<'_>) -> Vec<NodeId>,
) -> Resolved<'a> {
    let mut nodes = NodeArena::new();
    let program = {
        let mut b = AstBuilder::new(&mut nodes, interner, 0);
        let declarations = build(&mut b);
        let file = b.file(declarations);
        b.program(vec![file])
    };
    let output = resolve_program(&mut nodes, program, interner, options);
    Resolved {
        interner,
        nodes,
        output,
    }
}

impl Resolved<'_> {
    fn codes(&self) -> Vec<ErrorCode> {
        self.output.diagnostics.peek().map(|d| d.code).collect()
    }

    fn name_of(&self, symbol: SymbolId) -> &str {
        self.interner.lookup(self.output.symbols[symbol].name)
    }

    /// First user symbol called `name`.
    fn symbol(&self, name: &str) -> SymbolId {
        self.output
            .all_symbols
            .iter()
            .copied()
            .find(|&s| !self.output.symbols[s].span.is_prelude() && self.name_of(s) == name)
            .unwrap_or_else(|| panic!("no symbol named `{name}`"))
    }

    /// Symbol called `name` declared directly inside `owner`.
    fn member(&self, owner: &str, name: &str) -> SymbolId {
        let owner = self.symbol(owner);
        self.output
            .all_symbols
            .iter()
            .copied()
            .find(|&s| self.output.symbols[s].enclosing == Some(owner) && self.name_of(s) == name)
            .unwrap_or_else(|| panic!("no member named `{name}`"))
    }

    fn ty(&self, name: &str) -> TypeId {
        self.output.symbols[self.symbol(name)].ty_or_error()
    }

    /// Statements of a function's body.
    fn body(&self, function: SymbolId) -> Vec<NodeId> {
        let Some(node) = self.output.symbols[function].node else {
            panic!("function has no declaration");
        };
        let NodeKind::Function { body: Some(body), .. } = self.nodes.kind(node) else {
            panic!("expected a function with a body");
        };
        let NodeKind::Block { statements } = self.nodes.kind(*body) else {
            panic!("expected a block");
        };
        statements.clone()
    }
}

/// `def name() { statements }`
fn function(b: &mut AstBuilder<'_>, name: &str, statements: Vec<NodeId>) -> NodeId {
    let header = b.header(name);
    b.function(header, Vec::new(), None, Some(statements))
}

fn local(b: &mut AstBuilder<'_>, name: &str, value: NodeId) -> NodeId {
    let header = b.header(name);
    b.variable(header, None, Some(value))
}

fn typed(b: &mut AstBuilder<'_>, name: &str, ty: &str) -> NodeId {
    let header = b.header(name);
    let ty = b.name(ty);
    b.variable(header, Some(ty), None)
}

fn operator_header(b: &mut AstBuilder<'_>, name: &str, token: &str) -> DeclHeader {
    let token = b.string(token);
    let annotation = b.annotation("Operator", vec![token]);
    b.header(name).with_annotation(annotation)
}

/// `def name(<argument>) <class> { return this; }` overloading `token`.
fn operator_method(b: &mut AstBuilder<'_>, class: &str, name: &str, token: &str, argument: &str) -> NodeId {
    let header = operator_header(b, name, token);
    let ty = b.name(argument);
    let argument = b.argument("other", ty);
    let result = b.name(class);
    let this = b.this();
    let ret = b.ret(Some(this));
    b.function(header, vec![argument], Some(result), Some(vec![ret]))
}

fn interface(b: &mut AstBuilder<'_>, name: &str, bases: &[&str], members: Vec<NodeId>) -> NodeId {
    let header = b.header(name);
    let bases = bases.iter().map(|base| b.name(base)).collect();
    b.interface(header, &[], bases, members)
}

/// `def f() int;` or `def f() int { return value; }`
fn int_method(b: &mut AstBuilder<'_>, header: DeclHeader, value: Option<i64>) -> NodeId {
    let result = b.name("int");
    let body = value.map(|value| {
        let value = b.int(value);
        vec![b.ret(Some(value))]
    });
    b.function(header, Vec::new(), Some(result), body)
}

// ========================================
// Expressions
// ========================================

#[test]
fn mixed_arithmetic_promotes_the_int_operand() {
    let interner = StringInterner::new();
    let mut operands = None;
    let resolved = resolve(&interner, |b| {
        let one = b.int(1);
        let half = b.double(2.5);
        let sum = b.binary(BinaryOp::Add, one, half);
        operands = Some((one, sum));
        let x = local(b, "x", sum);
        vec![function(b, "f", vec![x])]
    });
    let Some((one, sum)) = operands else {
        panic!("program not built");
    };

    assert_eq!(resolved.codes(), vec![]);
    assert_eq!(resolved.nodes[sum].ty, Some(TypeId::DOUBLE));
    assert_eq!(resolved.ty("x"), TypeId::DOUBLE);
    let NodeKind::ImplicitCast { value } = *resolved.nodes.kind(one) else {
        panic!("left operand was not converted");
    };
    assert_eq!(resolved.nodes[one].ty, Some(TypeId::DOUBLE));
    assert_eq!(resolved.nodes.kind(value), &NodeKind::Int(1));
    assert_eq!(resolved.nodes[value].ty, Some(TypeId::INT));
}

#[test]
fn string_concatenation_calls_to_string() {
    let interner = StringInterner::new();
    let mut operand = None;
    let resolved = resolve(&interner, |b| {
        let prefix = b.string("n=");
        let one = b.int(1);
        operand = Some(one);
        let joined = b.binary(BinaryOp::Add, prefix, one);
        let s = local(b, "s", joined);
        vec![function(b, "f", vec![s])]
    });
    let Some(operand) = operand else {
        panic!("program not built");
    };

    assert_eq!(resolved.codes(), vec![]);
    assert_eq!(resolved.ty("s"), TypeId::STRING);
    assert_eq!(resolved.nodes[operand].ty, Some(TypeId::STRING));
    let NodeKind::Call { target, arguments } = resolved.nodes.kind(operand).clone() else {
        panic!("operand was not rewritten into a call");
    };
    assert!(arguments.is_empty());
    let NodeKind::Dot { target: Some(inner), .. } = *resolved.nodes.kind(target) else {
        panic!("call target is not a member access");
    };
    assert_eq!(resolved.nodes.kind(inner), &NodeKind::Int(1));
    let Some(callee) = resolved.nodes[target].symbol else {
        panic!("callee not recorded");
    };
    assert_eq!(resolved.name_of(callee), "toString");
}

#[test]
fn power_becomes_math_pow() {
    let interner = StringInterner::new();
    let mut power = None;
    let resolved = resolve(&interner, |b| {
        let two = b.int(2);
        let three = b.int(3);
        let node = b.binary(BinaryOp::Power, two, three);
        power = Some(node);
        let p = local(b, "p", node);
        vec![function(b, "f", vec![p])]
    });
    let Some(power) = power else {
        panic!("program not built");
    };

    assert_eq!(resolved.codes(), vec![]);
    assert_eq!(resolved.ty("p"), TypeId::DOUBLE);
    let NodeKind::Call { target, arguments } = resolved.nodes.kind(power).clone() else {
        panic!("`**` was not lowered");
    };
    let Some(pow) = resolved.nodes[target].symbol else {
        panic!("callee not recorded");
    };
    assert_eq!(resolved.name_of(pow), "pow");
    assert_eq!(arguments.len(), 2);
    for argument in arguments {
        assert_eq!(resolved.nodes[argument].ty, Some(TypeId::DOUBLE));
        assert!(matches!(resolved.nodes.kind(argument), NodeKind::ImplicitCast { .. }));
    }
}

#[test]
fn generic_function_infers_its_type_argument() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let header = b.header("identity");
        let ty = b.name("T");
        let argument = b.argument("value", ty);
        let result = b.name("T");
        let value = b.name("value");
        let ret = b.ret(Some(value));
        let identity = b.generic_function(header, &["T"], vec![argument], Some(result), Some(vec![ret]));

        let callee = b.name("identity");
        let three = b.int(3);
        let call = b.call(callee, vec![three]);
        let n = local(b, "n", call);
        vec![identity, function(b, "f", vec![n])]
    });

    assert_eq!(resolved.codes(), vec![]);
    assert_eq!(resolved.ty("n"), TypeId::INT);
}

#[test]
fn operator_overload_prefers_the_exact_match() {
    let interner = StringInterner::new();
    let mut sums = None;
    let resolved = resolve(&interner, |b| {
        let add_int = operator_method(b, "Vec", "addInt", "+", "int");
        let add_double = operator_method(b, "Vec", "addDouble", "+", "double");
        let header = b.header("Vec");
        let class = b.class(header, &[], Vec::new(), vec![add_int, add_double]);

        let ty = b.name("Vec");
        let v = b.argument("v", ty);
        let left = b.name("v");
        let one = b.int(1);
        let by_int = b.binary(BinaryOp::Add, left, one);
        let left = b.name("v");
        let half = b.double(1.5);
        let by_double = b.binary(BinaryOp::Add, left, half);
        sums = Some((by_int, by_double));
        let a = local(b, "a", by_int);
        let c = local(b, "c", by_double);
        let header = b.header("f");
        let f = b.function(header, vec![v], None, Some(vec![a, c]));
        vec![class, f]
    });
    let Some((by_int, by_double)) = sums else {
        panic!("program not built");
    };

    assert_eq!(resolved.codes(), vec![]);
    let callee = |node: NodeId| {
        let NodeKind::Call { target, .. } = *resolved.nodes.kind(node) else {
            panic!("operator was not rewritten into a call");
        };
        resolved.nodes[target].symbol.map(|s| resolved.name_of(s).to_owned())
    };
    assert_eq!(callee(by_int).as_deref(), Some("addInt"));
    assert_eq!(callee(by_double).as_deref(), Some("addDouble"));
    assert_eq!(resolved.ty("a"), resolved.ty("Vec"));
}

#[test]
fn equally_inexact_overloads_are_ambiguous() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let via_float = operator_method(b, "Num", "viaFloat", "+", "float");
        let via_double = operator_method(b, "Num", "viaDouble", "+", "double");
        let header = b.header("Num");
        let class = b.class(header, &[], Vec::new(), vec![via_float, via_double]);

        let ty = b.name("Num");
        let n = b.argument("n", ty);
        let left = b.name("n");
        let one = b.int(1);
        let sum = b.binary(BinaryOp::Add, left, one);
        let statement = b.expr(sum);
        let header = b.header("f");
        let f = b.function(header, vec![n], None, Some(vec![statement]));
        vec![class, f]
    });

    assert_eq!(resolved.codes(), vec![ErrorCode::E2031]);
}

#[test]
fn pure_function_cannot_call_an_impure_one() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let header = b.header("helper");
        let helper = int_method(b, header, Some(1));
        let header = b.header("calc").with_modifier(ModifierKind::Pure);
        let callee = b.name("helper");
        let call = b.call(callee, Vec::new());
        let ret = b.ret(Some(call));
        let result = b.name("int");
        let calc = b.function(header, Vec::new(), Some(result), Some(vec![ret]));
        vec![helper, calc]
    });

    assert_eq!(resolved.codes(), vec![ErrorCode::E2015]);
}

#[test]
fn strings_compare_relationally() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let a = b.string("a");
        let z = b.string("b");
        let less = b.binary(BinaryOp::Less, a, z);
        let x = local(b, "x", less);
        vec![function(b, "f", vec![x])]
    });

    assert_eq!(resolved.codes(), vec![]);
    assert_eq!(resolved.ty("x"), TypeId::BOOL);
}

#[test]
fn subclass_compares_against_its_base() {
    let interner = StringInterner::new();
    let mut operand = None;
    let resolved = resolve(&interner, |b| {
        let header = b.header("Base");
        let base = b.class(header, &[], Vec::new(), Vec::new());
        let header = b.header("Derived");
        let parent = b.name("Base");
        let derived = b.class(header, &[], vec![parent], Vec::new());

        let ty = b.name("Base");
        let first = b.argument("first", ty);
        let ty = b.name("Derived");
        let second = b.argument("second", ty);
        let left = b.name("first");
        let right = b.name("second");
        operand = Some(right);
        let order = b.binary(BinaryOp::GreaterEqual, left, right);
        let r = local(b, "r", order);
        let header = b.header("f");
        let f = b.function(header, vec![first, second], None, Some(vec![r]));
        vec![base, derived, f]
    });
    let Some(operand) = operand else {
        panic!("program not built");
    };

    assert_eq!(resolved.codes(), vec![]);
    assert_eq!(resolved.ty("r"), TypeId::BOOL);
    assert!(matches!(resolved.nodes.kind(operand), NodeKind::ImplicitCast { .. }));
    assert_eq!(resolved.nodes[operand].ty, Some(resolved.ty("Base")));
}

#[test]
fn unrelated_types_do_not_compare() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let text = b.string("a");
        let one = b.int(1);
        let less = b.binary(BinaryOp::Less, text, one);
        let x = local(b, "x", less);
        vec![function(b, "f", vec![x])]
    });

    assert_eq!(resolved.codes(), vec![ErrorCode::E2032]);
}

#[test]
fn empty_list_branch_takes_the_other_branch_type() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let one = b.int(1);
        let ones = b.list(vec![one]);
        let a = local(b, "a", ones);
        let test = b.boolean(true);
        let empty = b.list(Vec::new());
        let other = b.name("a");
        let hook = b.hook(test, empty, other);
        let h = local(b, "h", hook);
        let test = b.boolean(false);
        let other = b.name("a");
        let empty = b.list(Vec::new());
        let hook = b.hook(test, other, empty);
        let g = local(b, "g", hook);
        vec![function(b, "f", vec![a, h, g])]
    });

    assert_eq!(resolved.codes(), vec![]);
    let ints = resolved.ty("a");
    assert_eq!(
        resolved.output.types.display(ints, &resolved.output.symbols, resolved.interner),
        "List<int>"
    );
    assert_eq!(resolved.ty("h"), ints);
    assert_eq!(resolved.ty("g"), ints);
}

#[test]
fn flags_bitwise_keeps_the_flags_type_only_between_equals() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let read = b.enum_value("Read", None);
        let write = b.enum_value("Write", None);
        let header = b.header("Mode");
        let mode = b.flags(header, vec![read, write]);

        let m = b.name("Mode");
        let left = b.dot(m, "Read");
        let m = b.name("Mode");
        let right = b.dot(m, "Write");
        let both = b.binary(BinaryOp::BitOr, left, right);
        let same = local(b, "same", both);
        let m = b.name("Mode");
        let left = b.dot(m, "Read");
        let four = b.int(4);
        let mixed = b.binary(BinaryOp::BitOr, left, four);
        let with_int = local(b, "withInt", mixed);
        let m = b.name("Mode");
        let left = b.dot(m, "Read");
        let half = b.double(0.5);
        let invalid = b.binary(BinaryOp::BitAnd, left, half);
        let bad = local(b, "bad", invalid);
        let f = function(b, "f", vec![same, with_int, bad]);
        vec![mode, f]
    });

    assert_eq!(resolved.codes(), vec![ErrorCode::E2032]);
    assert_eq!(resolved.ty("same"), resolved.ty("Mode"));
    assert_eq!(resolved.ty("withInt"), TypeId::INT);
}

#[test]
fn hook_over_flags_follows_common_type_rules() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let read = b.enum_value("Read", None);
        let write = b.enum_value("Write", None);
        let header = b.header("Mode");
        let mode = b.flags(header, vec![read, write]);

        let mut branches = Vec::new();
        for (name, other) in [("bothFlags", 0), ("withInt", 1), ("withDouble", 2)] {
            let test = b.boolean(true);
            let m = b.name("Mode");
            let yes = b.dot(m, "Read");
            let no = match other {
                0 => {
                    let m = b.name("Mode");
                    b.dot(m, "Write")
                }
                1 => b.int(2),
                _ => b.double(2.5),
            };
            let hook = b.hook(test, yes, no);
            branches.push(local(b, name, hook));
        }
        let f = function(b, "f", branches);
        vec![mode, f]
    });

    assert_eq!(resolved.codes(), vec![]);
    assert_eq!(resolved.ty("bothFlags"), resolved.ty("Mode"));
    assert_eq!(resolved.ty("withInt"), TypeId::INT);
    assert_eq!(resolved.ty("withDouble"), TypeId::DOUBLE);
}

#[test]
fn equally_exact_overloads_are_ambiguous() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let first = operator_method(b, "Num", "plus", "+", "int");
        let second = operator_method(b, "Num", "add", "+", "int");
        let header = b.header("Num");
        let class = b.class(header, &[], Vec::new(), vec![first, second]);

        let ty = b.name("Num");
        let n = b.argument("n", ty);
        let left = b.name("n");
        let one = b.int(1);
        let sum = b.binary(BinaryOp::Add, left, one);
        let statement = b.expr(sum);
        let header = b.header("f");
        let f = b.function(header, vec![n], None, Some(vec![statement]));
        vec![class, f]
    });

    assert_eq!(resolved.codes(), vec![ErrorCode::E2031]);
}

#[test]
fn private_member_is_hidden_outside_its_class() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let header = b.header("secret").with_modifier(ModifierKind::Private);
        let ty = b.name("int");
        let secret = b.variable(header, Some(ty), None);
        let header = b.header("peek");
        let inside = b.name("secret");
        let ret = b.ret(Some(inside));
        let result = b.name("int");
        let peek = b.function(header, Vec::new(), Some(result), Some(vec![ret]));
        let header = b.header("Safe");
        let class = b.class(header, &[], Vec::new(), vec![secret, peek]);

        let ty = b.name("Safe");
        let safe = b.argument("safe", ty);
        let target = b.name("safe");
        let outside = b.dot(target, "secret");
        let x = local(b, "x", outside);
        let header = b.header("f");
        let f = b.function(header, vec![safe], None, Some(vec![x]));
        vec![class, f]
    });

    assert_eq!(resolved.codes(), vec![ErrorCode::E2016]);
}

#[test]
fn instance_member_needs_an_instance() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let count = typed(b, "count", "int");
        let header = b.header("total").with_modifier(ModifierKind::Static);
        let value = b.name("count");
        let ret = b.ret(Some(value));
        let result = b.name("int");
        let total = b.function(header, Vec::new(), Some(result), Some(vec![ret]));
        let header = b.header("Counter");
        let class = b.class(header, &[], Vec::new(), vec![count, total]);
        vec![class]
    });

    assert_eq!(resolved.codes(), vec![ErrorCode::E2017]);
}

// ========================================
// Statements
// ========================================

#[test]
fn duplicate_enum_case_is_reported_and_default_is_optional() {
    let interner = StringInterner::new();
    let mut marks = None;
    let resolved = resolve(&interner, |b| {
        let red = b.enum_value("Red", None);
        let green = b.enum_value("Green", None);
        let blue = b.enum_value("Blue", None);
        let header = b.header("Color");
        let color = b.enumeration(header, vec![red, green, blue]);

        let ty = b.name("Color");
        let c = b.argument("c", ty);
        let value = b.name("c");
        let red = b.unparented_dot("Red");
        let brk = b.brk();
        let first = b.case(vec![red], vec![brk]);
        let green = b.unparented_dot("Green");
        let again = b.unparented_dot("Red");
        let brk = b.brk();
        let second = b.case(vec![green, again], vec![brk]);
        marks = Some((first, again));
        let switch = b.switch(value, vec![first, second]);
        let header = b.header("f");
        let f = b.function(header, vec![c], None, Some(vec![switch]));
        vec![color, f]
    });
    let Some((first, again)) = marks else {
        panic!("program not built");
    };

    assert_eq!(resolved.codes(), vec![ErrorCode::E2039]);
    let Some(duplicate) = resolved.output.diagnostics.peek().next() else {
        panic!("no diagnostic");
    };
    assert_eq!(duplicate.primary_span(), Some(resolved.nodes.span(again)));
    let secondary: Vec<Span> = duplicate.secondary_spans().collect();
    assert_eq!(secondary, vec![resolved.nodes.span(first)]);
}

#[test]
fn break_outside_a_loop_is_rejected() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let brk = b.brk();
        vec![function(b, "f", vec![brk])]
    });

    assert_eq!(resolved.codes(), vec![ErrorCode::E2038]);
}

// ========================================
// Declarations and Initialization
// ========================================

#[test]
fn const_cycle_reports_every_member() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let header = b.header("a").with_modifier(ModifierKind::Const);
        let value = b.name("b");
        let a = b.variable(header, None, Some(value));
        let header = b.header("b").with_modifier(ModifierKind::Const);
        let value = b.name("a");
        let b_ = b.variable(header, None, Some(value));
        vec![a, b_]
    });

    assert_eq!(resolved.codes(), vec![ErrorCode::E2004, ErrorCode::E2004]);
    assert_eq!(resolved.ty("a"), TypeId::ERROR);
    assert_eq!(resolved.ty("b"), TypeId::ERROR);
}

#[test]
fn repeated_references_initialize_a_symbol_once() {
    let interner = StringInterner::new();
    // Without deduplication a second initialization would report again.
    let options = ResolverOptions::default()
        .with_unused_expression_warnings(false)
        .with_diagnostics(DiagnosticConfig::unlimited());
    let resolved = resolve_with(&interner, &options, |b| {
        let header = b.header("c").with_modifier(ModifierKind::Const);
        let value = b.name("missing");
        let c = b.variable(header, None, Some(value));
        let use_in_f = b.name("c");
        let x = local(b, "x", use_in_f);
        let f = function(b, "f", vec![x]);
        let use_in_g = b.name("c");
        let y = local(b, "y", use_in_g);
        let g = function(b, "g", vec![y]);
        vec![f, g, c]
    });

    let undeclared = resolved.codes().iter().filter(|&&code| code == ErrorCode::E2002).count();
    assert_eq!(undeclared, 1);
    assert_eq!(resolved.codes(), vec![ErrorCode::E2002]);
    assert_eq!(resolved.ty("c"), TypeId::ERROR);
}

#[test]
fn duplicate_declaration_is_reported_once() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let first = function(b, "g", Vec::new());
        let second = function(b, "g", Vec::new());
        vec![first, second]
    });

    assert_eq!(resolved.codes(), vec![ErrorCode::E2003]);
}

#[test]
fn extension_without_declaration_is_reported() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let header = b.header("Ghost");
        vec![b.extension(header, Vec::new())]
    });

    assert_eq!(resolved.codes(), vec![ErrorCode::E2011]);
}

#[test]
fn overriding_without_override_is_reported() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let header = b.header("f").with_modifier(ModifierKind::Virtual);
        let base_f = int_method(b, header, Some(1));
        let header = b.header("Base");
        let base = b.class(header, &[], Vec::new(), vec![base_f]);

        let header = b.header("f");
        let derived_f = int_method(b, header, Some(2));
        let header = b.header("Derived");
        let base_ty = b.name("Base");
        let derived = b.class(header, &[], vec![base_ty], vec![derived_f]);
        vec![base, derived]
    });

    assert_eq!(resolved.codes(), vec![ErrorCode::E2022]);
}

#[test]
fn abstract_class_cannot_be_instantiated() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let header = b.header("Shape").with_modifier(ModifierKind::Abstract);
        let shape = b.class(header, &[], Vec::new(), Vec::new());
        let ty = b.name("Shape");
        let created = b.new_object(ty, Vec::new());
        let s = local(b, "s", created);
        vec![shape, function(b, "f", vec![s])]
    });

    assert_eq!(resolved.codes(), vec![ErrorCode::E2028]);
}

// ========================================
// Member Merging
// ========================================

#[test]
fn diamond_inheritance_forwards_the_shared_member() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let header = b.header("f");
        let f = int_method(b, header, None);
        let root = interface(b, "Root", &[], vec![f]);
        let left = interface(b, "Left", &["Root"], Vec::new());
        let right = interface(b, "Right", &["Root"], Vec::new());
        let both = interface(b, "Both", &["Left", "Right"], Vec::new());
        vec![root, left, right, both]
    });

    assert_eq!(resolved.codes(), vec![]);
    let merged = resolved.member("Both", "f");
    let symbol = &resolved.output.symbols[merged];
    assert_eq!(symbol.kind, SymbolKind::Forwarded);
    assert_eq!(symbol.forwarded_to, Some(resolved.member("Root", "f")));
}

#[test]
fn non_virtual_members_cannot_merge() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let header = b.header("f");
        let f = int_method(b, header, Some(1));
        let left = interface(b, "Left", &[], vec![f]);
        let header = b.header("f");
        let f = int_method(b, header, Some(2));
        let right = interface(b, "Right", &[], vec![f]);
        let both = interface(b, "Both", &["Left", "Right"], Vec::new());
        vec![left, right, both]
    });

    assert_eq!(resolved.codes(), vec![ErrorCode::E2019]);
}

#[test]
fn abstract_members_merge_and_stay_abstract() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let header = b.header("f");
        let f = int_method(b, header, None);
        let left = interface(b, "Left", &[], vec![f]);
        let header = b.header("f");
        let f = int_method(b, header, None);
        let right = interface(b, "Right", &[], vec![f]);
        let both = interface(b, "Both", &["Left", "Right"], Vec::new());
        let header = b.header("Concrete");
        let base = b.name("Both");
        let concrete = b.class(header, &[], vec![base], Vec::new());
        vec![left, right, both, concrete]
    });

    assert_eq!(resolved.codes(), vec![ErrorCode::E2027]);
    let merged = &resolved.output.symbols[resolved.member("Both", "f")];
    assert_eq!(merged.kind, SymbolKind::MergedInstanceFunction);
    assert!(merged.has(SymbolFlags::ABSTRACT | SymbolFlags::VIRTUAL));
}

#[test]
fn static_members_from_two_bases_are_ambiguous_on_use() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let header = b.header("make").with_modifier(ModifierKind::Static);
        let make = int_method(b, header, Some(1));
        let left = interface(b, "Left", &[], vec![make]);
        let header = b.header("make").with_modifier(ModifierKind::Static);
        let make = int_method(b, header, Some(2));
        let right = interface(b, "Right", &[], vec![make]);
        let both = interface(b, "Both", &["Left", "Right"], Vec::new());

        let owner = b.name("Both");
        let callee = b.dot(owner, "make");
        let call = b.call(callee, Vec::new());
        let m = local(b, "m", call);
        let f = function(b, "f", vec![m]);
        vec![left, right, both, f]
    });

    assert_eq!(resolved.codes(), vec![ErrorCode::E2018]);
    let merged = &resolved.output.symbols[resolved.member("Both", "make")];
    assert_eq!(merged.kind, SymbolKind::Ambiguous);
    assert_eq!(merged.ty, Some(TypeId::ERROR));
}

// ========================================
// Synthesized Members
// ========================================

#[test]
fn default_constructor_takes_base_arguments_then_fields() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let id = typed(b, "id", "int");
        let header = b.header("new");
        let ty = b.name("int");
        let argument = b.argument("id", ty);
        let value = b.name("id");
        let initializer = b.member_initializer("id", value);
        let constructor = b.constructor(header, vec![argument], vec![initializer], Vec::new());
        let header = b.header("Base");
        let base = b.class(header, &[], Vec::new(), vec![id, constructor]);

        let x = typed(b, "x", "double");
        let header = b.header("y");
        let ty = b.name("double");
        let zero = b.double(0.0);
        let y = b.variable(header, Some(ty), Some(zero));
        let label = typed(b, "label", "string");
        let header = b.header("Point");
        let base_ty = b.name("Base");
        let point = b.class(header, &[], vec![base_ty], vec![x, y, label]);
        vec![base, point]
    });

    assert_eq!(resolved.codes(), vec![]);
    let constructor = resolved.member("Point", "new");
    let symbol = &resolved.output.symbols[constructor];
    assert_eq!(symbol.kind, SymbolKind::Constructor);
    assert!(symbol.has(SymbolFlags::SYNTHESIZED));
    assert!(!symbol.has(SymbolFlags::PURE));
    let names: Vec<&str> = symbol.arguments.iter().map(|&a| resolved.name_of(a)).collect();
    assert_eq!(names, vec!["id", "x", "label"]);
    assert_eq!(
        resolved.output.types.function_arguments(symbol.ty_or_error()),
        &[TypeId::INT, TypeId::DOUBLE, TypeId::STRING]
    );

    let body = resolved.body(constructor);
    let [statement] = body.as_slice() else {
        panic!("expected a single super call");
    };
    let NodeKind::Expression { value } = *resolved.nodes.kind(*statement) else {
        panic!("expected an expression statement");
    };
    assert!(matches!(resolved.nodes.kind(value), NodeKind::SuperCall { arguments } if arguments.len() == 1));
}

#[test]
fn contiguous_enum_to_string_indexes_a_name_list() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let one = b.int(1);
        let low = b.enum_value("Low", Some(one));
        let mid = b.enum_value("Mid", None);
        let high = b.enum_value("High", None);
        let header = b.header("Level");
        vec![b.enumeration(header, vec![low, mid, high])]
    });

    assert_eq!(resolved.codes(), vec![]);
    let to_string = resolved.member("Level", "toString");
    assert!(resolved.output.symbols[to_string]
        .has(SymbolFlags::SYNTHESIZED | SymbolFlags::INLINE | SymbolFlags::PURE));

    let body = resolved.body(to_string);
    let [statement] = body.as_slice() else {
        panic!("expected a single return");
    };
    let NodeKind::Return { value: Some(value) } = *resolved.nodes.kind(*statement) else {
        panic!("expected a return with a value");
    };
    assert_eq!(resolved.nodes[value].ty, Some(TypeId::STRING));
    // The index was rewritten into the list's `[]` overload.
    let NodeKind::Call { target, arguments } = resolved.nodes.kind(value).clone() else {
        panic!("index was not rewritten into a call");
    };
    let NodeKind::Dot { target: Some(list), .. } = *resolved.nodes.kind(target) else {
        panic!("expected a member access");
    };
    let NodeKind::List { values } = resolved.nodes.kind(list) else {
        panic!("expected the name list");
    };
    assert_eq!(values.len(), 3);
    let [offset] = arguments.as_slice() else {
        panic!("expected one index");
    };
    assert!(matches!(
        resolved.nodes.kind(*offset),
        NodeKind::Binary { op: BinaryOp::Subtract, .. }
    ));
}

#[test]
fn sparse_enum_to_string_switches_over_distinct_values() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let one = b.int(1);
        let a = b.enum_value("A", Some(one));
        let four = b.int(4);
        let b_value = b.enum_value("B", Some(four));
        let four = b.int(4);
        let c = b.enum_value("C", Some(four));
        let header = b.header("Sparse");
        vec![b.enumeration(header, vec![a, b_value, c])]
    });

    assert_eq!(resolved.codes(), vec![]);
    let body = resolved.body(resolved.member("Sparse", "toString"));
    let [statement] = body.as_slice() else {
        panic!("expected a single switch");
    };
    let NodeKind::Switch { cases, .. } = resolved.nodes.kind(*statement) else {
        panic!("expected a switch");
    };
    // 1, 4 and the default.
    assert_eq!(cases.len(), 3);
}

// ========================================
// Annotations
// ========================================

#[test]
fn second_entry_point_is_rejected() {
    let interner = StringInterner::new();
    let resolved = resolve(&interner, |b| {
        let annotation = b.annotation("EntryPoint", Vec::new());
        let header = b.header("main").with_annotation(annotation);
        let main = b.function(header, Vec::new(), None, Some(Vec::new()));
        let annotation = b.annotation("EntryPoint", Vec::new());
        let header = b.header("start").with_annotation(annotation);
        let start = b.function(header, Vec::new(), None, Some(Vec::new()));
        vec![main, start]
    });

    assert_eq!(resolved.codes(), vec![ErrorCode::E2043]);
    assert_eq!(resolved.output.entry_point, Some(resolved.symbol("main")));
    assert!(resolved.output.symbols[resolved.symbol("main")].has(SymbolFlags::ENTRY_POINT));
}

#[test]
fn missing_entry_point_is_reported_when_required() {
    let interner = StringInterner::new();
    let options = ResolverOptions::default().with_entry_point_required(true);
    let resolved = resolve_with(&interner, &options, |_| Vec::new());

    assert_eq!(resolved.codes(), vec![ErrorCode::E2042]);
    assert_eq!(resolved.output.entry_point, None);
}
