//! Test to verify test infrastructure works correctly

mod common;

use common::builders::DatasetBuilder;

#[test]
fn test_infrastructure_setup() {
    // Test that builders work
    let data = DatasetBuilder::new(4).step(0.25).build_from(&[1.0, 2.0, 3.0, 4.0]);

    assert_eq!(data.len(), 4);
    assert_eq!(data.x(), &[0.0, 0.25, 0.5, 0.75]);
    assert_eq!(data.y(), &[1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_float_comparison() {
    common::assert_float_eq(1.0, 1.0000001, 0.001);
}

#[test]
#[should_panic]
fn test_float_comparison_fails() {
    common::assert_float_eq(1.0, 2.0, 0.001);
}

#[test]
#[should_panic]
fn test_slice_comparison_length_mismatch() {
    common::assert_slice_eq(&[1.0], &[1.0, 2.0], 0.001);
}
