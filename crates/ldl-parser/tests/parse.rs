use glam::DVec3;

use ldl_core::literal::Literal;
use ldl_parser::{
    Statement, StatementKind,
    error::ErrorCode,
    parse,
    printer::{FormatConfig, format_statements},
};

const LEVEL: &str = r#"
// Two rails and a sign post.
using Rail as game.track.Rail,
      Sign as game.props.Sign

let r1 be Rail(2),
    r2 be Rail(2)
let post be Sign([Welcome
to level one], (0, 0, 1))

position r1 at (0, 1, 2)
position post at (3, 4, 5) from r1

/* Snap the second rail onto the first. */
connect r2.tail to r1.head
"#;

#[test]
fn parses_a_complete_level() {
    let statements = parse(LEVEL).expect("level should parse");

    let kinds: Vec<_> = statements.iter().map(|s| s.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            StatementKind::Alias,
            StatementKind::Alias,
            StatementKind::Declaration,
            StatementKind::Declaration,
            StatementKind::Declaration,
            StatementKind::Position,
            StatementKind::Position,
            StatementKind::Connection,
        ]
    );

    assert_eq!(
        *statements[4].inner(),
        Statement::declaration(
            "post",
            "Sign",
            [
                Literal::String("Welcome\nto level one".into()),
                Literal::Vector(DVec3::new(0.0, 0.0, 1.0)),
            ]
        )
    );
}

#[test]
fn locations_point_at_each_pair() {
    let source = "let a be Box(), b be Box()";
    let statements = parse(source).unwrap();

    let names: Vec<_> = statements
        .iter()
        .map(|s| &source[s.location()..s.location() + 1])
        .collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn canonical_text_round_trips() {
    let statements = parse(LEVEL).unwrap();

    for config in [FormatConfig::default(), FormatConfig::new(false, 0)] {
        let text = format_statements(&statements, &config).unwrap();
        assert_eq!(parse(&text).unwrap(), statements);
    }
}

#[test]
fn lexical_errors_are_all_reported() {
    let huge = "9".repeat(400);
    let source = format!("let a be Box(#)\nlet b be Box({huge})\n/* open");
    let err = parse(&source).unwrap_err();

    let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
    assert_eq!(codes, vec![ErrorCode::E002, ErrorCode::E003, ErrorCode::E004]);
    assert_eq!(err.offset(), Some(13));
    assert!(err.to_string().ends_with("(+2 more)"));
}

#[test]
fn syntax_error_has_offset_and_expectation() {
    let err = parse("let e1 be Box()\nposition e1 at (1, 2)").unwrap_err();

    assert_eq!(err.diagnostics().len(), 1);
    assert_eq!(
        err.to_string(),
        "error[E100]: expected 3D vector, found `)`"
    );
    assert_eq!(err.offset(), Some(36));
}
