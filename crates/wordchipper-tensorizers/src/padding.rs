//! # Pad and Stack
//!
//! Ragged per-row outputs are right-padded to the batch maximum along each
//! variable dimension, then stacked into one rectangular array.

use ndarray::{Array1, Array2, Array3};

/// Stack scalars into a 1-D array.
pub fn stack<T: Clone>(values: &[T]) -> Array1<T> {
    Array1::from(values.to_vec())
}

/// Pad rows to the longest row and stack into a ``(rows, max_len)`` array.
///
/// ## Arguments
/// * `rows` - the ragged rows.
/// * `pad` - the value written past the end of each row.
pub fn pad_and_stack<T, R>(
    rows: &[R],
    pad: T,
) -> Array2<T>
where
    T: Clone,
    R: AsRef<[T]>,
{
    let max_len = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);

    let mut out = Array2::from_elem((rows.len(), max_len), pad);
    for (i, row) in rows.iter().enumerate() {
        for (j, v) in row.as_ref().iter().enumerate() {
            out[[i, j]] = v.clone();
        }
    }
    out
}

/// Pad doubly-ragged rows in both inner dimensions and stack into a
/// ``(rows, max_outer, max_inner)`` array.
///
/// ## Arguments
/// * `rows` - per row, a list of inner sequences.
/// * `pad` - the value written into every unused slot.
pub fn pad_and_stack_nested<T, R, S>(
    rows: &[R],
    pad: T,
) -> Array3<T>
where
    T: Clone,
    R: AsRef<[S]>,
    S: AsRef<[T]>,
{
    let max_outer = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);
    let max_inner = rows
        .iter()
        .flat_map(|r| r.as_ref().iter().map(|s| s.as_ref().len()))
        .max()
        .unwrap_or(0);

    let mut out = Array3::from_elem((rows.len(), max_outer, max_inner), pad);
    for (i, row) in rows.iter().enumerate() {
        for (j, seq) in row.as_ref().iter().enumerate() {
            for (k, v) in seq.as_ref().iter().enumerate() {
                out[[i, j, k]] = v.clone();
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn test_pad_and_stack() {
        let rows = vec![vec![1, 2], vec![1, 2, 3, 4, 5], vec![7, 8, 9]];
        let out = pad_and_stack(&rows, -1);

        assert_eq!(out.dim(), (3, 5));
        assert_eq!(
            out,
            array![[1, 2, -1, -1, -1], [1, 2, 3, 4, 5], [7, 8, 9, -1, -1]]
        );
    }

    #[test]
    fn test_pad_and_stack_empty() {
        let rows: Vec<Vec<i64>> = vec![];
        assert_eq!(pad_and_stack(&rows, 0).dim(), (0, 0));

        let rows: Vec<Vec<i64>> = vec![vec![], vec![]];
        assert_eq!(pad_and_stack(&rows, 0).dim(), (2, 0));
    }

    #[test]
    fn test_pad_and_stack_nested() {
        let rows = vec![vec![vec![1], vec![2, 3, 4, 5], vec![6, 7]], vec![vec![8, 9]]];
        let out = pad_and_stack_nested(&rows, 0);

        assert_eq!(out.dim(), (2, 3, 4));
        assert_eq!(
            out,
            array![
                [[1, 0, 0, 0], [2, 3, 4, 5], [6, 7, 0, 0]],
                [[8, 9, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            ]
        );
    }

    #[test]
    fn test_stack() {
        assert_eq!(stack(&[0.5f32, 1.0]), array![0.5f32, 1.0]);
    }
}
