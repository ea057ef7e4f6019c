//! The YAML engine must agree with the generic operators it is built on.

use gather_core::{ExecConfig, Number, Record};
use gather_exec::{drive, Engine, ExecError};
use gather_operators::{
    chunks, filter, flat_map_if, increasing, increasing_sequence, limit, map, sliding_window,
    sorted, take_while_including, Gatherer,
};
use gather_planner::{parse_yaml_pipeline, PipelineConfig};

fn ints(v: &[i64]) -> Vec<Number> {
    v.iter().copied().map(Number::Int).collect()
}

fn run_yaml(yaml: &str, input: Vec<Number>) -> Vec<Record> {
    let p = parse_yaml_pipeline(yaml).unwrap();
    Engine::new(ExecConfig::default())
        .run(&p, input)
        .unwrap()
        .records
}

fn as_records(v: Vec<i64>) -> Vec<Record> {
    v.into_iter().map(|x| Record::Value(Number::Int(x))).collect()
}

fn as_groups(v: Vec<Vec<i64>>) -> Vec<Record> {
    v.into_iter()
        .map(|g| Record::Group(g.into_iter().map(Number::Int).collect()))
        .collect()
}

#[test]
fn test_filter_map_limit_matches_generic_chain() {
    let input: Vec<i64> = (1..50).collect();
    let generic = drive(
        &filter(|x: &i64| x.rem_euclid(2) == 1)
            .and_then(map(|x: i64| x * 10))
            .and_then(limit(4).unwrap()),
        input.clone(),
    );
    let yaml = r#"
steps:
  - op: filter
    expr: "x % 2 == 1"
  - op: map
    expr: "x * 10"
  - op: limit
    n: 4
"#;
    assert_eq!(run_yaml(yaml, ints(&input)), as_records(generic));
}

#[test]
fn test_flat_map_if_and_take_while_match_generic_chain() {
    let input = vec![1i64, 3, 4, 5, 9, 2, 7];
    let generic = drive(
        &flat_map_if(|x: &i64| *x > 4, |x| std::iter::repeat(x).take(3))
            .and_then(take_while_including(|x: &i64| *x != 2)),
        input.clone(),
    );
    let yaml = r#"
steps:
  - op: flat_map_if
    expr: "x > 4"
    repeat: 3
  - op: take_while_including
    expr: "x != 2"
"#;
    assert_eq!(run_yaml(yaml, ints(&input)), as_records(generic));
}

#[test]
fn test_descending_orders_match_generic_operators() {
    let input = vec![5i64, 3, 8, 8, 1, 9, 0, 4];
    let desc = |a: &i64, b: &i64| b.cmp(a);

    let yaml = "steps:\n  - op: sorted\n    order: desc\n";
    assert_eq!(
        run_yaml(yaml, ints(&input)),
        as_records(drive(&sorted(desc), input.clone()))
    );

    let yaml = "steps:\n  - op: increasing\n    order: desc\n";
    assert_eq!(
        run_yaml(yaml, ints(&input)),
        as_records(drive(&increasing(desc), input.clone()))
    );

    let yaml = "steps:\n  - op: increasing_sequence\n    order: desc\n";
    assert_eq!(
        run_yaml(yaml, ints(&input)),
        as_groups(drive(&increasing_sequence(desc), input.clone()))
    );
}

#[test]
fn test_window_steps_match_generic_operators() {
    let input: Vec<i64> = vec![1, 2, 3, 4, 3, 2, 1];
    let yaml = "steps:\n  - op: sliding_window\n    size: 3\n";
    assert_eq!(
        run_yaml(yaml, ints(&input)),
        as_groups(drive(&sliding_window(3).unwrap(), input.clone()))
    );
    let yaml = "steps:\n  - op: chunks\n    size: 3\n";
    assert_eq!(
        run_yaml(yaml, ints(&input)),
        as_groups(drive(&chunks(3).unwrap(), input.clone()))
    );
}

#[test]
fn test_sliding_window_on_empty_input_emits_one_empty_group() {
    let yaml = "steps:\n  - op: sliding_window\n    size: 2\n";
    assert_eq!(run_yaml(yaml, vec![]), vec![Record::Group(vec![])]);
}

#[test]
fn test_mixed_numbers_sort_by_value() {
    let yaml = "steps:\n  - op: sorted\n";
    let input = vec![Number::Float(2.5), Number::Int(1), Number::Int(3), Number::Float(-0.5)];
    let out = run_yaml(yaml, input);
    assert_eq!(
        out,
        vec![
            Record::Value(Number::Float(-0.5)),
            Record::Value(Number::Int(1)),
            Record::Value(Number::Float(2.5)),
            Record::Value(Number::Int(3)),
        ]
    );
}

#[test]
fn test_yaml_config_block_applies_through_pipeline_config() {
    let p = parse_yaml_pipeline("config:\n  max_input_elements: 2\nsteps:\n  - op: running_average\n")
        .unwrap();
    let mut cfg = ExecConfig::default();
    p.config.apply_to(&mut cfg);
    let err = Engine::new(cfg).run(&p, ints(&[1, 2, 3])).unwrap_err();
    assert!(matches!(err, ExecError::InputLimit { limit: 2 }));
    assert_eq!(
        PipelineConfig::default(),
        parse_yaml_pipeline("steps:\n  - op: do_nothing\n").unwrap().config
    );
}

#[test]
fn test_engine_rejects_a_hand_built_invalid_pipeline() {
    let mut p = parse_yaml_pipeline("steps:\n  - op: limit\n    n: 1\n").unwrap();
    p.steps.insert(0, gather_planner::Step::Chunks { size: 2 });
    let err = Engine::new(ExecConfig::default())
        .run(&p, ints(&[1]))
        .unwrap_err();
    assert!(matches!(err, ExecError::Plan(_)));
}

#[test]
fn test_zero_input_cap_is_a_config_error() {
    let p = parse_yaml_pipeline("steps:\n  - op: do_nothing\n").unwrap();
    let cfg = ExecConfig {
        max_input_elements: Some(0),
        trace_elements: false,
    };
    assert!(matches!(
        Engine::new(cfg).run(&p, ints(&[1])),
        Err(ExecError::Config(_))
    ));
}

#[test]
fn test_manifest_counts_and_hashes() {
    let yaml = "steps:\n  - op: take_while_including\n    expr: x < 3\n";
    let p = parse_yaml_pipeline(yaml).unwrap();
    let engine = Engine::new(ExecConfig::default());
    let a = engine.run(&p, ints(&[1, 2, 3, 4, 5])).unwrap().manifest;
    assert_eq!(a.elements_in, 3);
    assert_eq!(a.records_out, 3);
    assert!(a.stopped_early);
    assert!(a.finished_ms >= a.started_ms);
    assert_eq!(a.engine_version, gather_core::VERSION);

    // Elements past the stop are never consumed, so they do not affect digests.
    let b = engine.run(&p, ints(&[1, 2, 3, 99])).unwrap().manifest;
    assert_eq!(a.inputs_digest, b.inputs_digest);
    assert_eq!(a.outputs_digest, b.outputs_digest);
    assert_eq!(a.plan_hash, b.plan_hash);
}
