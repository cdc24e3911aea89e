//! Built-in declarations every program sees.
//!
//! The prelude is an ordinary file of imported declarations built into the
//! program's arena before resolution. Its classes bind to the fixed built-in
//! type ids, so `int` in user code and `TypeId::INT` are the same type.

use tern_ir::{AstBuilder, ModifierKind, NodeArena, NodeId, Span, StringInterner};

/// Build the prelude file and return its `File` node.
pub(crate) fn build_prelude(nodes: &mut NodeArena, interner: &StringInterner) -> NodeId {
    let mut b = AstBuilder::new(nodes, interner, Span::PRELUDE_FILE);
    let mut declarations = Vec::new();

    for name in ["bool", "int", "float", "double"] {
        let to_string = method(&mut b, "toString", &[], Some("string"));
        declarations.push(imported_class(&mut b, name, &[], vec![to_string]));
    }

    let string_members = vec![
        method(&mut b, "toString", &[], Some("string")),
        method(&mut b, "count", &[], Some("int")),
        operator(&mut b, "[]", "get", &[("index", "int")], Some("string")),
    ];
    declarations.push(imported_class(&mut b, "string", &[], string_members));

    let list_members = vec![
        constructor(&mut b),
        method(&mut b, "push", &[("value", "T")], None),
        method(&mut b, "count", &[], Some("int")),
        operator(&mut b, "[]", "get", &[("index", "int")], Some("T")),
        operator(&mut b, "[]=", "set", &[("index", "int"), ("value", "T")], None),
        operator(&mut b, "in", "contains", &[("value", "T")], Some("bool")),
    ];
    declarations.push(imported_class(&mut b, "List", &["T"], list_members));

    let map_members = vec![
        constructor(&mut b),
        method(&mut b, "count", &[], Some("int")),
        operator(&mut b, "[]", "get", &[("key", "K")], Some("V")),
        operator(&mut b, "[]=", "set", &[("key", "K"), ("value", "V")], None),
        operator(&mut b, "in", "containsKey", &[("key", "K")], Some("bool")),
    ];
    declarations.push(imported_class(&mut b, "Map", &["K", "V"], map_members));

    let pow = {
        let header = b
            .header("pow")
            .with_modifier(ModifierKind::Import)
            .with_modifier(ModifierKind::Pure);
        let arguments = arguments(&mut b, &[("base", "double"), ("exponent", "double")]);
        let result = b.name("double");
        b.function(header, arguments, Some(result), None)
    };
    let math = b.header("math");
    declarations.push(b.namespace(math, vec![pow]));

    b.file(declarations)
}

fn imported_class(b: &mut AstBuilder<'_>, name: &str, parameters: &[&str], members: Vec<NodeId>) -> NodeId {
    let header = b.header(name).with_modifier(ModifierKind::Import);
    b.class(header, parameters, Vec::new(), members)
}

fn arguments(b: &mut AstBuilder<'_>, arguments: &[(&str, &str)]) -> Vec<NodeId> {
    arguments
        .iter()
        .map(|&(name, ty)| {
            let ty = b.name(ty);
            b.argument(name, ty)
        })
        .collect()
}

fn method(b: &mut AstBuilder<'_>, name: &str, args: &[(&str, &str)], result: Option<&str>) -> NodeId {
    let header = b.header(name).with_modifier(ModifierKind::Pure);
    build_method(b, header, args, result)
}

fn operator(
    b: &mut AstBuilder<'_>,
    token: &str,
    name: &str,
    args: &[(&str, &str)],
    result: Option<&str>,
) -> NodeId {
    let token = b.string(token);
    let annotation = b.annotation("Operator", vec![token]);
    let header = b
        .header(name)
        .with_modifier(ModifierKind::Pure)
        .with_annotation(annotation);
    build_method(b, header, args, result)
}

fn build_method(
    b: &mut AstBuilder<'_>,
    header: tern_ir::DeclHeader,
    args: &[(&str, &str)],
    result: Option<&str>,
) -> NodeId {
    let arguments = arguments(b, args);
    let result = result.map(|name| b.name(name));
    b.function(header, arguments, result, None)
}

fn constructor(b: &mut AstBuilder<'_>) -> NodeId {
    let header = b.header("new").with_modifier(ModifierKind::Pure);
    b.function(header, Vec::new(), None, None)
}
