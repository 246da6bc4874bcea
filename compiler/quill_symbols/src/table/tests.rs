use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn args(types: &[Type]) -> Vec<Argument> {
    types
        .iter()
        .enumerate()
        .map(|(i, &ty)| Argument::new(format!("a{i}"), ty, i + 1))
        .collect()
}

#[test]
fn root_is_level_one_with_builtins() {
    let table = SymbolTable::new();
    let root = table.root();
    assert_eq!(table.level(root), 1);
    assert_eq!(table.parent(root), None);
    assert_eq!(table.builtins().count(), BUILTINS.len());
    // Built-ins sit beneath the root scope, not in it.
    assert_eq!(table.scope(root).function_ids().count(), 0);
    assert_eq!(table.scope(root).identifier_ids().count(), 0);

    let println = table.resolve_function(root, "println", 1).unwrap();
    assert!(println.is_builtin);
    assert_eq!(println.return_type, Type::Void);
    assert_eq!(println.arguments[0].position, 1);
    assert!(table.resolve_function(root, "readln", 0).is_some());
    assert!(table.resolve_function(root, "readln", 1).is_none());
}

#[test]
fn child_scopes_nest() {
    let mut table = SymbolTable::new();
    let root = table.root();
    let a = table.create_child(root);
    let b = table.create_child(a);
    let c = table.create_child(root);
    assert_eq!(table.level(b), 3);
    assert_eq!(table.parent(b), Some(a));
    assert_eq!(table.children(root), &[a, c]);
    assert_eq!(table.ancestors(b).collect::<Vec<_>>(), vec![b, a, root]);
}

#[test]
fn declare_then_resolve() {
    let mut table = SymbolTable::new();
    let root = table.root();
    let scope = table.create_child(root);
    assert!(table.declare_identifier(scope, "x", Type::Integer));

    let x = table.resolve_identifier(scope, "x").unwrap();
    assert_eq!(x.ty, Type::Integer);
    assert_eq!(x.level, 2);
    assert_eq!(x.scope, scope);

    let inner = table.create_child(scope);
    assert_eq!(table.resolve_identifier(inner, "x").unwrap().ty, Type::Integer);
    assert!(table.resolve_identifier(root, "x").is_none());
}

#[test]
fn duplicate_identifier_in_same_scope_is_rejected() {
    let mut table = SymbolTable::new();
    let scope = table.create_child(table.root());
    assert!(table.declare_identifier(scope, "x", Type::Integer));
    assert!(!table.declare_identifier(scope, "x", Type::Float));
    let x = table.resolve_identifier(scope, "x").unwrap();
    assert_eq!(x.ty, Type::Integer);
    assert_eq!(table.scope(scope).identifier_ids().collect::<Vec<_>>(), vec![x.id]);
}

#[test]
fn inner_declaration_shadows_outer() {
    let mut table = SymbolTable::new();
    let outer = table.create_child(table.root());
    let inner = table.create_child(outer);
    assert!(table.declare_identifier(outer, "x", Type::Integer));
    assert!(table.declare_identifier(inner, "x", Type::String));
    assert_eq!(table.resolve_identifier(inner, "x").unwrap().ty, Type::String);
    assert_eq!(table.resolve_identifier(outer, "x").unwrap().ty, Type::Integer);
}

#[test]
fn overload_by_arity() {
    let mut table = SymbolTable::new();
    let root = table.root();
    assert!(table.declare_function(root, "f", Type::Integer, args(&[Type::Integer])));
    assert!(table.declare_function(
        root,
        "f",
        Type::Float,
        args(&[Type::Integer, Type::Integer])
    ));
    assert!(!table.declare_function(root, "f", Type::Void, args(&[Type::String])));
    assert_eq!(table.scope(root).function_ids().count(), 2);

    assert_eq!(table.resolve_function(root, "f", 1).unwrap().return_type, Type::Integer);
    assert_eq!(table.resolve_function(root, "f", 2).unwrap().return_type, Type::Float);
    assert!(table.resolve_function(root, "f", 3).is_none());
    assert!(table.has_function_named(root, "f"));
    assert!(!table.has_function_named(root, "g"));
}

#[test]
fn builtin_signature_cannot_be_redeclared() {
    let mut table = SymbolTable::new();
    let root = table.root();
    assert!(!table.declare_function(root, "println", Type::Void, args(&[Type::Integer])));
    // Different arity is a fresh overload.
    assert!(table.declare_function(
        root,
        "println",
        Type::Void,
        args(&[Type::String, Type::String])
    ));
    assert!(!table.resolve_function(root, "println", 2).unwrap().is_builtin);
    assert!(table.resolve_function(root, "println", 1).unwrap().is_builtin);
}

#[test]
fn function_declared_in_enclosing_scope_blocks_redeclaration() {
    let mut table = SymbolTable::new();
    let root = table.root();
    let child = table.create_child(root);
    assert!(table.declare_function(root, "g", Type::Void, Vec::new()));
    assert!(!table.declare_function(child, "g", Type::Integer, Vec::new()));
    assert!(table.declare_function(child, "h", Type::Void, Vec::new()));
    assert!(table.resolve_function(root, "h", 0).is_none());
    assert_eq!(table.resolve_function(child, "h", 0).unwrap().level, 2);
}

#[test]
fn initialization_tracking() {
    let mut table = SymbolTable::new();
    let decl = table.create_child(table.root());
    let block_a = table.create_child(decl);
    let block_b = table.create_child(decl);
    let x = table.try_declare_identifier(decl, "x", Type::Integer).unwrap();

    assert!(!table.is_definitely_initialized(x, block_a));
    table.mark_initialized_in_block(x, block_a);
    assert!(table.is_definitely_initialized(x, block_a));
    assert!(!table.is_definitely_initialized(x, block_b));
    assert!(!table.is_definitely_initialized(x, decl));
    assert_eq!(table.initialized_in_block(block_a), vec![x]);

    table.mark_globally_initialized(x);
    assert!(table.is_definitely_initialized(x, block_b));
    assert!(table.initialized_in_block(block_a).is_empty());
}

#[test]
fn initialization_is_visible_in_nested_blocks() {
    let mut table = SymbolTable::new();
    let decl = table.create_child(table.root());
    let outer = table.create_child(decl);
    let inner = table.create_child(outer);
    let x = table.try_declare_identifier(decl, "x", Type::Integer).unwrap();

    table.mark_assigned(x, outer);
    assert!(table.is_initialized_along(x, inner));
    assert!(!table.is_initialized_along(x, decl));

    table.mark_assigned(x, decl);
    assert!(table.identifier(x).init.is_global());
    assert!(table.is_initialized_along(x, decl));
}

fn names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e]{1,2}", 1..20)
}

proptest! {
    #[test]
    fn declare_succeeds_once_per_scope(names in names()) {
        let mut table = SymbolTable::new();
        let scope = table.create_child(table.root());
        let mut seen = std::collections::HashSet::new();
        for name in &names {
            let fresh = seen.insert(name.clone());
            prop_assert_eq!(table.declare_identifier(scope, name, Type::Integer), fresh);
        }
        for name in &seen {
            prop_assert!(table.resolve_identifier(scope, name).is_some());
        }
    }

    #[test]
    fn nearest_declaration_wins(
        depth in 1usize..8,
        declare_at in prop::collection::vec(any::<bool>(), 8),
    ) {
        let mut table = SymbolTable::new();
        let mut scopes = vec![table.create_child(table.root())];
        for _ in 1..depth {
            let parent = *scopes.last().unwrap();
            scopes.push(table.create_child(parent));
        }
        let mut expected = None;
        for (i, &scope) in scopes.iter().enumerate() {
            if declare_at[i] {
                table.declare_identifier(scope, "v", Type::Integer);
                expected = Some(scope);
            }
        }
        let innermost = *scopes.last().unwrap();
        let found = table.resolve_identifier(innermost, "v").map(|i| i.scope);
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn arity_distinguishes_overloads(arities in prop::collection::vec(0usize..5, 1..12)) {
        let mut table = SymbolTable::new();
        let root = table.root();
        let mut seen = std::collections::HashSet::new();
        for &arity in &arities {
            let fresh = seen.insert(arity);
            let params = args(&vec![Type::Integer; arity]);
            let declared = table.declare_function(root, "f", Type::Void, params);
            prop_assert_eq!(declared, fresh);
        }
        for arity in 0..5 {
            let resolved = table.resolve_function(root, "f", arity).is_some();
            prop_assert_eq!(resolved, seen.contains(&arity));
        }
    }
}
