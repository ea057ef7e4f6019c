//! YAML pipeline parsing and validation tests

use gather_planner::{bind, parse_yaml_pipeline, PlanError, SortOrder, Step};

#[test]
fn test_parse_every_step_kind() {
    let yaml = r#"
steps:
  - op: do_nothing
  - op: inspect
    label: before
  - op: map
    expr: "x + 1"
  - op: filter
    expr: "x >= 0"
  - op: flat_map_if
    expr: "x < 10"
    repeat: 2
  - op: take_while_including
    expr: "x != 100"
  - op: limit
    n: 1000
  - op: increasing
  - op: running_average
  - op: sorted
    order: desc
  - op: increasing_sequence
"#;
    let p = parse_yaml_pipeline(yaml).unwrap();
    // do_nothing is optimized away.
    assert_eq!(p.steps.len(), 10);
    assert_eq!(p.steps[0], Step::Inspect { label: Some("before".into()) });
    assert_eq!(
        p.steps[9],
        Step::IncreasingSequence {
            order: SortOrder::Asc
        }
    );
}

#[test]
fn test_parse_window_steps() {
    for yaml in [
        "steps:\n  - op: chunks\n    size: 4\n",
        "steps:\n  - op: sliding_window\n    size: 4\n",
    ] {
        assert!(parse_yaml_pipeline(yaml).is_ok(), "{yaml}");
    }
}

#[test]
fn test_empty_steps_are_invalid() {
    assert!(matches!(
        parse_yaml_pipeline("steps: []\n"),
        Err(PlanError::Invalid(_))
    ));
}

#[test]
fn test_missing_steps_is_a_yaml_error() {
    assert!(matches!(
        parse_yaml_pipeline("config: {}\n"),
        Err(PlanError::Yaml(_))
    ));
}

#[test]
fn test_unknown_config_key_is_rejected() {
    let yaml = "config:\n  spill_dir: /tmp\nsteps:\n  - op: do_nothing\n";
    assert!(matches!(parse_yaml_pipeline(yaml), Err(PlanError::Yaml(_))));
}

#[test]
fn test_zero_limit_is_invalid() {
    let err = parse_yaml_pipeline("steps:\n  - op: limit\n    n: 0\n").unwrap_err();
    assert!(matches!(err, PlanError::Invalid(_)));
    assert!(err.to_string().contains("limit"));
}

#[test]
fn test_negative_size_is_a_yaml_error() {
    let yaml = "steps:\n  - op: chunks\n    size: -1\n";
    assert!(matches!(parse_yaml_pipeline(yaml), Err(PlanError::Yaml(_))));
}

#[test]
fn test_bad_expression_is_an_expr_error() {
    let yaml = "steps:\n  - op: filter\n    expr: \"y > 1\"\n";
    assert!(matches!(
        parse_yaml_pipeline(yaml),
        Err(PlanError::Expr { .. })
    ));
}

#[test]
fn test_grouping_step_in_the_middle_is_invalid() {
    let yaml = "steps:\n  - op: sliding_window\n    size: 2\n  - op: limit\n    n: 1\n";
    let err = parse_yaml_pipeline(yaml).unwrap_err();
    assert!(err.to_string().contains("sliding_window"));
}

#[test]
fn test_explain_bindings_report_characteristics() {
    let p = parse_yaml_pipeline(
        "steps:\n  - op: map\n    expr: x * 2\n  - op: limit\n    n: 5\n  - op: chunks\n    size: 2\n",
    )
    .unwrap();
    let b = bind(&p);
    assert_eq!(b.len(), 3);
    assert!(b[0].characteristics.greedy);
    assert!(!b[1].characteristics.greedy);
    assert!(b[2].characteristics.buffering);
    assert_eq!(b[2].detail, "size=2");
}
