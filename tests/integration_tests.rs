//! Integration tests for the full pipeline.
//!
//! These tests drive tokenization and parsing through the public API
//! and check the resulting trees, the canonical printer, and the
//! rendered error reports.

use mq_parser::{
    ast::{
        node::{BinaryOp, NodeKind},
        print::print,
    },
    errors::errors::{ErrorCategory, ErrorKind},
    parse_source, render_error,
};

#[test]
fn test_parse_a_realistic_query() {
    let source = r#"
# pull headings, normalise, report
def normalise(text):
  text | trim()
end
.h1 | normalise() | s"title: ${self}"
"#;
    let program = parse_source(source, Some(String::from("query.mq"))).unwrap();

    assert_eq!(program.roots.len(), 2);
    assert!(matches!(
        program.node(program.roots[0]).kind,
        NodeKind::Def { .. }
    ));
    assert!(matches!(
        program.node(program.roots[1]).kind,
        NodeKind::Pipe { .. }
    ));
}

#[test]
fn test_operator_precedence_end_to_end() {
    let program = parse_source("1 + 2 * 3 == 7 && true", None).unwrap();

    let NodeKind::Binary { op, .. } = &program.node(program.roots[0]).kind else {
        panic!("expected a binary node");
    };
    assert_eq!(*op, BinaryOp::And);
}

#[test]
fn test_parse_module_with_definitions() {
    let source = "module util\n  def upcase_all(): nodes;\n  let sep = \", \"\nend";
    let program = parse_source(source, None).unwrap();

    let NodeKind::Module { name, body } = &program.node(program.roots[0]).kind else {
        panic!("expected a module node");
    };
    assert_eq!(name, "util");
    assert_eq!(body.len(), 2);
}

#[test]
fn test_parse_control_flow_program() {
    let source = r#"
var total = 0
foreach (item, [1, 2, 3]):
  total += item
end
if total > 3: "big" else: "small"
match total:
| 0: "none"
| :number if total > 1: "some"
| _: "other"
end
"#;
    let program = parse_source(source, None).unwrap();
    assert_eq!(program.roots.len(), 4);
}

#[test]
fn test_print_parse_roundtrip_is_stable() {
    let sources = [
        ".h1 | upcase() | trim()",
        "def inc(x, step = 1): x + step;",
        "let xs = [1, 2.5, \"three\", :h1]",
        "x.a[1: 3] |= trim()",
        "s\"hello ${name}$$\"",
        "str::replace(\"a\", \"b\")",
    ];

    for source in sources {
        let once = print(&parse_source(source, None).unwrap());
        let twice = print(&parse_source(&once, None).unwrap());
        assert_eq!(once, twice, "roundtrip of {:?} is not stable", source);
    }
}

#[test]
fn test_lex_error_report() {
    let source = "let x = @";
    let error = parse_source(source, Some(String::from("bad.mq"))).unwrap_err();

    assert_eq!(error.category(), ErrorCategory::Lex);
    let report = render_error(&error, source);
    assert!(report.contains("bad.mq"));
    assert!(report.contains("let x = @"));
    assert!(report.contains('^'));
}

#[test]
fn test_unterminated_def_error() {
    let error = parse_source("def f(): 1 + 2", None).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::MissingTerminator { .. }));
}

#[test]
fn test_unbalanced_delimiter_error_spans_the_failure() {
    let source = "let xs = [1, 2";
    let error = parse_source(source, None).unwrap_err();

    assert!(matches!(
        error.kind(),
        ErrorKind::UnbalancedDelimiter { delimiter: '[' }
    ));
    assert_eq!(error.category(), ErrorCategory::UnbalancedDelimiter);
}

#[test]
fn test_unterminated_interpolation_error() {
    let error = parse_source("s\"a${1 + ", None).unwrap_err();
    assert!(matches!(
        error.kind(),
        ErrorKind::UnterminatedInterpolation
    ));
}

#[test]
fn test_error_positions_are_one_based() {
    let error = parse_source("let x =\n  @", None).unwrap_err();

    let span = error.span();
    assert_eq!(span.start.line, 2);
    assert_eq!(span.start.column, 3);
}

#[test]
fn test_default_file_label() {
    let error = parse_source("@", None).unwrap_err();
    assert_eq!(error.file(), "input");
}
