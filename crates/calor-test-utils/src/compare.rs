//! Field comparisons.

use calor_grid::GlobalField;

/// Largest absolute cell difference, or `None` if the dimensions differ.
pub fn max_abs_diff(a: &GlobalField, b: &GlobalField) -> Option<f32> {
    if a.dims() != b.dims() {
        return None;
    }
    Some(
        a.as_slice()
            .iter()
            .zip(b.as_slice())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f32::max),
    )
}

/// First `(x, y)` inside the `rows × cols` top-left corner where the two
/// fields differ bitwise.
pub fn first_mismatch(
    a: &GlobalField,
    b: &GlobalField,
    rows: usize,
    cols: usize,
) -> Option<(usize, usize)> {
    (0..rows)
        .flat_map(|x| (0..cols).map(move |y| (x, y)))
        .find(|&(x, y)| a.get(x, y).map(f32::to_bits) != b.get(x, y).map(f32::to_bits))
}

/// Panic unless `a` and `b` are bitwise identical.
#[track_caller]
pub fn assert_fields_identical(a: &GlobalField, b: &GlobalField) {
    assert_eq!(a.dims(), b.dims(), "field dimensions differ");
    let dims = a.dims();
    if let Some((x, y)) = first_mismatch(a, b, dims.nx, dims.ny) {
        panic!(
            "fields differ at ({x}, {y}): {} vs {}",
            a[(x, y)],
            b[(x, y)]
        );
    }
}

/// Panic unless the `rows × cols` top-left corners are bitwise identical.
#[track_caller]
pub fn assert_region_identical(a: &GlobalField, b: &GlobalField, rows: usize, cols: usize) {
    if let Some((x, y)) = first_mismatch(a, b, rows, cols) {
        panic!(
            "fields differ at ({x}, {y}): {:?} vs {:?}",
            a.get(x, y),
            b.get(x, y)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use calor_core::GridDims;

    #[test]
    fn identical_fields_have_no_mismatch() {
        let a = fixtures::ramp(GridDims::new(3, 3)).unwrap();
        assert_eq!(max_abs_diff(&a, &a), Some(0.0));
        assert_eq!(first_mismatch(&a, &a, 3, 3), None);
    }

    #[test]
    fn mismatch_is_located() {
        let a = fixtures::ramp(GridDims::new(3, 3)).unwrap();
        let mut b = a.clone();
        b[(2, 1)] += 1.0;
        assert_eq!(first_mismatch(&a, &b, 3, 3), Some((2, 1)));
        assert_eq!(first_mismatch(&a, &b, 2, 3), None);
        assert_eq!(max_abs_diff(&a, &b), Some(1.0));
    }
}
