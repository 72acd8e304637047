//! Property-based round-trip tests with proptest.
//!
//! Generate random source programs, parse them, print the tree, and
//! verify the printed form is stable: `print(parse(print(parse(s))))`
//! equals `print(parse(s))`. Idempotency is checked instead of tree
//! equality because the printer normalises whitespace.

use mq_parser::{ast::print::print, parse_source};
use proptest::prelude::*;

// -- Leaf strategies --

/// Identifier that can never collide with a contextual keyword: no
/// keyword starts with `q`.
fn identifier() -> impl Strategy<Value = String> {
    "q[a-z0-9_]{0,6}".prop_map(|s| s)
}

fn number() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..10_000).prop_map(|n| n.to_string()),
        (0u32..100, 1u32..100).prop_map(|(a, b)| format!("{}.{}", a, b)),
    ]
}

fn string_literal() -> impl Strategy<Value = String> {
    "[a-z ]{0,8}".prop_map(|s| format!("\"{}\"", s))
}

fn symbol() -> impl Strategy<Value = String> {
    identifier().prop_map(|s| format!(":{}", s))
}

fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        number(),
        string_literal(),
        identifier(),
        symbol(),
        Just(String::from("true")),
        Just(String::from("false")),
        Just(String::from("None")),
        Just(String::from("self")),
    ]
}

// -- Compound strategies --

/// A primary expression: valid as a pipe stage, argument, or element.
fn primary(depth: u32) -> BoxedStrategy<String> {
    if depth == 0 {
        return leaf().boxed();
    }
    let inner = primary(depth - 1);
    prop_oneof![
        leaf(),
        // binary operator
        (inner.clone(), prop_oneof![
            Just("+"), Just("-"), Just("*"), Just("/"), Just("%"),
            Just("=="), Just("!="), Just("<"), Just("<="), Just(">"), Just(">="),
            Just("&&"), Just("||"), Just(".."),
        ], inner.clone())
            .prop_map(|(a, op, b)| format!("{} {} {}", a, op, b)),
        // grouping
        inner.clone().prop_map(|e| format!("({})", e)),
        // call
        (identifier(), prop::collection::vec(inner.clone(), 0..=3))
            .prop_map(|(name, args)| format!("{}({})", name, args.join(", "))),
        // qualified call
        (identifier(), identifier(), prop::collection::vec(inner.clone(), 0..=2))
            .prop_map(|(m, n, args)| format!("{}::{}({})", m, n, args.join(", "))),
        // selector chain off the implicit receiver
        prop::collection::vec("[a-z]{1,5}".prop_map(|s| s), 1..=3)
            .prop_map(|props| format!(".{}", props.join("."))),
        // array
        prop::collection::vec(inner.clone(), 0..=3)
            .prop_map(|elements| format!("[{}]", elements.join(", "))),
        // dict
        prop::collection::vec((identifier(), inner.clone()), 0..=3).prop_map(|entries| {
            let body = entries
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{{}}}", body)
        }),
        // interpolation
        inner.prop_map(|e| format!("s\"x${{{}}}y\"", e)),
    ]
    .boxed()
}

/// A full statement.
fn stmt(depth: u32) -> BoxedStrategy<String> {
    let expr = primary(depth);
    prop_oneof![
        expr.clone(),
        // pipeline
        prop::collection::vec(expr.clone(), 2..=4).prop_map(|stages| stages.join(" | ")),
        // bindings
        (identifier(), expr.clone()).prop_map(|(n, e)| format!("let {} = {}", n, e)),
        (identifier(), expr.clone()).prop_map(|(n, e)| format!("var {} = {}", n, e)),
        // single-expression definition
        (
            identifier(),
            prop::collection::vec(identifier(), 0..=3),
            expr.clone()
        )
            .prop_map(|(name, params, body)| {
                if params.is_empty() {
                    format!("def {}: {};", name, body)
                } else {
                    format!("def {}({}): {};", name, params.join(", "), body)
                }
            }),
        // conditional
        (expr.clone(), expr.clone(), expr.clone())
            .prop_map(|(c, t, e)| format!("if {}: {} else: {}", c, t, e)),
        // assignment
        (identifier(), prop_oneof![
            Just("="), Just("|="), Just("+="), Just("-="),
            Just("*="), Just("/="), Just("%="), Just("//="),
        ], expr)
            .prop_map(|(target, op, value)| format!("{} {} {}", target, op, value)),
    ]
    .boxed()
}

/// A keyword-led statement. Statements are juxtaposed with no
/// separator, so anything after the first must not start with a token
/// the previous expression could absorb (`(` would become a call, `[`
/// an index); a leading keyword always starts fresh.
fn tail_stmt(depth: u32) -> BoxedStrategy<String> {
    let expr = primary(depth);
    prop_oneof![
        (identifier(), expr.clone()).prop_map(|(n, e)| format!("let {} = {}", n, e)),
        (identifier(), expr.clone()).prop_map(|(n, e)| format!("var {} = {}", n, e)),
        (identifier(), expr.clone()).prop_map(|(name, body)| format!("def {}: {};", name, body)),
        (expr.clone(), expr.clone(), expr)
            .prop_map(|(c, t, e)| format!("if {}: {} else: {}", c, t, e)),
    ]
    .boxed()
}

fn program() -> impl Strategy<Value = String> {
    (stmt(2), prop::collection::vec(tail_stmt(2), 0..=3))
        .prop_map(|(head, tail)| {
            let mut stmts = vec![head];
            stmts.extend(tail);
            stmts.join("\n")
        })
}

proptest! {
    #[test]
    fn printed_form_is_stable(source in program()) {
        let parsed = parse_source(&source, None).expect("generated source must parse");
        let once = print(&parsed);

        let reparsed = parse_source(&once, None).expect("printed source must parse");
        let twice = print(&reparsed);

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn parsing_arbitrary_input_never_panics(source in "\\PC*") {
        let _ = parse_source(&source, None);
    }

    #[test]
    fn parsing_token_soup_never_panics(
        tokens in prop::collection::vec(prop_oneof![
            Just("|"), Just("("), Just(")"), Just("["), Just("]"),
            Just("{"), Just("}"), Just(":"), Just(";"), Just(","),
            Just(".."), Just("="), Just("def"), Just("end"), Just("match"),
            Just("s\""), Just("\""), Just("${"), Just("1"), Just("x"),
        ], 0..20)
    ) {
        let source = tokens.join(" ");
        let _ = parse_source(&source, None);
    }
}
