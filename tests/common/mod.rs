//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Assert two slices are element-wise approximately equal
pub fn assert_slice_eq(actual: &[f64], expected: &[f64], epsilon: f64) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Length mismatch: {:?} vs {:?}",
        actual,
        expected
    );
    for (a, b) in actual.iter().zip(expected) {
        assert_float_eq(*a, *b, epsilon);
    }
}
