//! End-to-end tests running scene text through `reanchor::run`

use pretty_assertions::assert_eq;
use reanchor::graph::DumpStyle;
use reanchor::{run, run_with_config, RunError, SceneConfig, SceneError};

/// A card cell whose content is wrapped in an inset container with a
/// clipping view inside it
const CARD_CELL: &str = r#"
// cell hierarchy
view cell {
    view content {
        view title
        view body
    }
}
guide content.margins [top: 8, left: 8, bottom: 8, right: 8]

constrain title.top = content.margins.top
constrain title.leading = content.leading + 16 [priority: 750]
constrain content.trailing = title.trailing + 16
constrain body.top = title.bottom + 4
constrain body.leading = title.leading
constrain content.bottom >= body.bottom + 8 [active: false]

view container in content
anchor container [top: 5, left: 5, bottom: 5, right: 5]
view clipping in container
fill clipping

migrate content -> clipping
dump cell
"#;

#[test]
fn test_card_cell_migration_dump() {
    let out = run(CARD_CELL).unwrap();
    let expected = "\
cell #0
  content #1
    body.top == title.bottom + 4
    body.leading == title.leading
    container.top == content.top + 5
    container.leading == content.leading + 5
    container.bottom == content.bottom - 5
    container.trailing == content.trailing - 5
    container #4
      clipping.top == container.top
      clipping.leading == container.leading
      clipping.bottom == container.bottom
      clipping.trailing == container.trailing
      clipping #5
        title.top == clipping.top
        title.leading == clipping.leading + 16 @750
        clipping.trailing == title.trailing + 16
        clipping.bottom >= body.bottom + 8 (inactive)
        title #2
        body #3
";
    assert_eq!(out, expected);
}

#[test]
fn test_card_cell_dump_hides_inactive() {
    let config = SceneConfig::new().with_dump_style(DumpStyle {
        indent: "\t".to_string(),
        show_inactive: false,
    });
    let out = run_with_config(CARD_CELL, &config).unwrap();
    assert!(!out.contains("(inactive)"));
    assert!(out.contains("\t\t\ttitle #2\n"));
    assert!(out.contains("\t\t\tclipping.trailing == title.trailing + 16\n"));
}

#[test]
fn test_solve_after_migration() {
    let source = r#"
        view cell {
            view content {
                view title
                view body
            }
        }
        fill content
        constrain title.top = content.top + 8
        constrain title.leading = content.leading + 16
        constrain content.trailing = title.trailing + 16
        constrain title.height = 20
        constrain body.top = title.bottom + 4
        constrain body.leading = title.leading
        constrain body.trailing = title.trailing
        constrain content.bottom = body.bottom + 8

        view clipping in content
        fill clipping
        migrate content -> clipping
        solve cell
    "#;
    let out = run(source).unwrap();
    let expected = "\
cell x=0.0 y=0.0 w=320.0 h=480.0
  content x=0.0 y=0.0 w=320.0 h=480.0
    clipping x=0.0 y=0.0 w=320.0 h=480.0
      title x=16.0 y=8.0 w=288.0 h=20.0
      body x=16.0 y=32.0 w=288.0 h=440.0
";
    assert_eq!(out, expected);
}

#[test]
fn test_reanchoring_clears_every_edge() {
    let out = run(r#"
        view root { view child }
        anchor child [top: 4, left: 4, bottom: 4, right: 4]
        anchor child [top: 10]
        dump root
    "#)
    .unwrap();
    assert_eq!(
        out,
        "\
root #0
  child.top == root.top + 10
  child #1
"
    );
}

#[test]
fn test_constraint_identifier_survives_migration() {
    let out = run(r#"
        view content { view title }
        constrain title.top = content.top + 2 [id: "title-top"]
        view clipping in content
        migrate content -> clipping
        dump clipping
    "#)
    .unwrap();
    assert!(out.contains("title.top == clipping.top + 2 'title-top'"), "{}", out);
}

#[test]
fn test_migrate_to_unrelated_view_fails() {
    let err = run("view a { view x } view b migrate a -> b").unwrap_err();
    match err {
        RunError::Scene(SceneError::Graph(e)) => {
            assert_eq!(e.to_string(), "target 'b' is not a descendant of 'a'");
        }
        other => panic!("expected graph error, got {:?}", other),
    }
}

#[test]
fn test_parse_error_is_reported_with_location() {
    let source = "view a {\n  view b\n";
    let err = run(source).unwrap_err();
    let RunError::Parse(errors) = err else {
        panic!("expected parse error");
    };
    assert!(!errors.is_empty());
    let report = errors[0].format(source, "card.scene");
    assert!(report.contains("card.scene"));
}
