//! Integration tests for numeric solves against a dataset registry

mod common;

use common::builders::DatasetBuilder;
use common::{assert_float_eq, assert_slice_eq};
use dataplot_rs::analysis::WindowFunction;
use dataplot_rs::{
    Dataset2D, EngineConfig, ExpressionError, ExpressionTree, NamedDatasets, ScalarResultPolicy,
};
use proptest::prelude::*;

fn registry() -> NamedDatasets {
    NamedDatasets::new()
        .with("Ramp", DatasetBuilder::new(5).build_with(|x| x))
        .with("Square", DatasetBuilder::new(5).build_with(|x| x * x))
        .with("Long", DatasetBuilder::new(7).build_with(|_| 1.0))
}

#[test]
fn test_literal_arithmetic() {
    let tree = ExpressionTree::new(None);
    assert_eq!(tree.solve("3+4", 1.0).unwrap().y(), &[7.0]);
    assert_eq!(tree.solve("2^10", 1.0).unwrap().y(), &[1024.0]);
    assert_eq!(tree.solve("((1+2)*3)", 1.0).unwrap().y(), &[9.0]);
}

#[test]
fn test_function_application_broadcasts() {
    let datasets = registry();
    let tree = ExpressionTree::with_datasets(&datasets);

    let zero = tree.solve("sin(0)", 1.0).unwrap();
    assert_eq!(zero.len(), 5);
    assert!(zero.y().iter().all(|v| v.abs() < 1e-12));

    let five = tree.solve("abs(-5)", 1.0).unwrap();
    assert!(five.y().iter().all(|&v| v == 5.0));
}

#[test]
fn test_implicit_multiplication_matches_explicit() {
    let datasets = registry();
    let tree = ExpressionTree::with_datasets(&datasets);
    assert_eq!(
        tree.solve("2s1", 1.0).unwrap(),
        tree.solve("2*s1", 1.0).unwrap()
    );
    assert_eq!(
        tree.solve("s1(s2+1)", 1.0).unwrap(),
        tree.solve("s1*(s2+1)", 1.0).unwrap()
    );
}

#[test]
fn test_mixed_series_expression() {
    let datasets = registry();
    let tree = ExpressionTree::with_datasets(&datasets);
    let result = tree.solve("s2 - s1^2 + sqrt(s2)", 1.0).unwrap();
    assert_slice_eq(result.y(), &[0.0, 1.0, 2.0, 3.0, 4.0], 1e-12);
}

#[test]
fn test_length_mismatch_reports_both_lengths() {
    let datasets = registry();
    let tree = ExpressionTree::with_datasets(&datasets);
    let err = tree.solve("s1 + s3", 1.0).unwrap_err();
    assert_eq!(err, ExpressionError::LengthMismatch { left: 5, right: 7 });
    assert!(err.to_string().contains("5 points vs 7 points"));
}

#[test]
fn test_unknown_dataset() {
    let datasets = registry();
    let tree = ExpressionTree::with_datasets(&datasets);
    let err = tree.solve("s99", 1.0).unwrap_err();
    assert!(matches!(err, ExpressionError::UnknownDataset(_)));
    assert!(err.to_string().contains("s1 to s3"), "{}", err);
}

#[test]
fn test_syntax_errors() {
    let tree = ExpressionTree::new(None);
    for expression in ["(1+2", "1+2)", "", "2*", "*2", "1 */ 2"] {
        assert!(
            matches!(tree.solve(expression, 1.0), Err(ExpressionError::Syntax(_))),
            "expected syntax error for '{}'",
            expression
        );
    }
    assert!(matches!(
        tree.solve("max(1, 2)", 1.0),
        Err(ExpressionError::Lex { .. })
    ));
}

#[test]
fn test_x_axis_factor() {
    let datasets = registry();
    let tree = ExpressionTree::with_datasets(&datasets);
    let result = tree.solve("s1", 0.001).unwrap();
    assert_slice_eq(result.x(), &[0.0, 0.001, 0.002, 0.003, 0.004], 1e-15);
    assert_eq!(result.y(), datasets_y(&datasets, "Ramp"));
}

fn datasets_y<'a>(datasets: &'a NamedDatasets, name: &str) -> &'a [f64] {
    datasets
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, d)| d.y())
        .unwrap()
}

#[test]
fn test_series_transforms() {
    let datasets = registry();
    let tree = ExpressionTree::with_datasets(&datasets);

    // d/dx of x^2 by backward differences
    let slope = tree.solve("diff(s2)", 1.0).unwrap();
    assert_eq!(slope.y(), &[1.0, 1.0, 3.0, 5.0, 7.0]);

    let area = tree.solve("int(s1)", 1.0).unwrap();
    assert_eq!(area.y(), &[0.0, 0.5, 2.0, 4.5, 8.0]);

    let rms = tree.solve("rms(s3)", 1.0).unwrap();
    assert!(rms.y().iter().all(|&v| v == 1.0));

    assert!(matches!(
        tree.solve("fft(2)", 1.0),
        Err(ExpressionError::TypeMismatch(_))
    ));
}

#[test]
fn test_fft_uses_configured_window() {
    let sine = DatasetBuilder::new(200)
        .step(0.01)
        .build_with(|t| 3.0 * (2.0 * std::f64::consts::PI * 10.0 * t).sin());
    let datasets = vec![sine];

    for window in [WindowFunction::Rectangular, WindowFunction::Hann] {
        let config = EngineConfig {
            fft_window: window,
            ..EngineConfig::default()
        };
        let tree = ExpressionTree::with_datasets(&datasets).with_config(config);
        let spectrum = tree.solve("fft(s1)", 1.0).unwrap();

        let (peak, magnitude) = spectrum
            .points()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap();
        assert_float_eq(peak, 10.0, 1e-6);
        assert_float_eq(magnitude, 3.0, 0.05);
    }
}

#[test]
fn test_scalar_policy() {
    let datasets = registry();
    let broadcast = ExpressionTree::with_datasets(&datasets);
    assert_eq!(broadcast.solve("2*3", 1.0).unwrap().len(), 5);

    let reject = ExpressionTree::with_datasets(&datasets)
        .with_config(EngineConfig::default().with_scalar_result(ScalarResultPolicy::Reject));
    assert!(matches!(
        reject.solve("2*3", 1.0),
        Err(ExpressionError::TypeMismatch(_))
    ));
    assert_eq!(reject.solve("s1*0", 1.0).unwrap().y(), &[0.0; 5]);
}

#[test]
fn test_inputs_are_not_modified() {
    let datasets = registry();
    let before = datasets.clone();
    let tree = ExpressionTree::with_datasets(&datasets);
    tree.solve("-s1 * 10 + int(s2)", 2.0).unwrap();

    for ((_, a), (_, b)) in datasets.iter().zip(before.iter()) {
        assert_eq!(a, b);
    }
}

proptest! {
    #[test]
    fn test_series_times_scalar_keeps_x(
        ys in prop::collection::vec(-1e3f64..1e3, 1..50),
        k in -100.0f64..100.0,
        factor in 0.001f64..10.0,
    ) {
        let data = DatasetBuilder::new(ys.len()).build_from(&ys);
        let datasets = vec![data.clone()];
        let tree = ExpressionTree::with_datasets(&datasets);
        let result = tree.solve(&format!("s1*{}", k), factor).unwrap();

        let expected = data.scaled_x(factor);
        prop_assert_eq!(result.x(), expected.x());
        for (r, y) in result.y().iter().zip(data.y()) {
            prop_assert_eq!(*r, y * k);
        }
    }

    #[test]
    fn test_unequal_lengths_always_fail(a in 1usize..30, b in 1usize..30) {
        prop_assume!(a != b);
        let datasets = vec![
            DatasetBuilder::new(a).build_with(|x| x),
            DatasetBuilder::new(b).build_with(|x| x),
        ];
        let tree = ExpressionTree::with_datasets(&datasets);
        let err = tree.solve("s1 / s2", 1.0).unwrap_err();
        prop_assert_eq!(err, ExpressionError::LengthMismatch { left: a, right: b });
    }
}

#[test]
fn test_dataset_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    std::fs::write(
        &path,
        r#"[{"name":"Voltage","x":[0,1,2],"y":[1,2,3]},{"x":[0,1,2],"y":[2,2,2]}]"#,
    )
    .unwrap();

    let datasets = NamedDatasets::load(&path).unwrap();
    let tree = ExpressionTree::with_datasets(&datasets);
    let power = tree.solve("s1*s2", 1.0).unwrap();
    assert_eq!(power, Dataset2D::from_points([(0.0, 2.0), (1.0, 4.0), (2.0, 6.0)]));
}
