use crate::solution::UnsignedInt;
use anyhow::{ensure, Result};

/// Square weight matrix of a complete bipartite graph, stored row major.
///
/// Rows index the left vertex side, columns the right side. Entries are
/// profits or costs depending on the caller's convention; the matrix itself
/// carries no sign convention. Construction rejects ragged and non-finite
/// input, so downstream code can index without further checks.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    order: usize,
    values: Vec<f64>,
}

impl SquareMatrix {
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<SquareMatrix, anyhow::Error> {
        let order = rows.len();
        ensure!(order > 0, "weight matrix must have at least one row");
        let mut values = Vec::with_capacity(order * order);
        for (i, row) in rows.iter().enumerate() {
            ensure!(
                row.len() == order,
                "weight matrix is not square: row {} has {} entries, expected {}",
                i,
                row.len(),
                order
            );
            values.extend_from_slice(row.as_slice());
        }
        SquareMatrix::from_row_major(order, values)
    }

    pub fn from_row_major(order: usize, values: Vec<f64>) -> Result<SquareMatrix, anyhow::Error> {
        ensure!(order > 0, "weight matrix must have at least one row");
        ensure!(
            values.len() == order * order,
            "expected {} weights for a complete bipartite graph on {}+{} vertices, got {}",
            order * order,
            order,
            order,
            values.len()
        );
        ensure!(
            values.iter().all(|value| value.is_finite()),
            "weight matrix entries must be finite"
        );
        Ok(SquareMatrix { order, values })
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        self.values.as_slice()
    }

    #[inline]
    pub fn at(&self, row: usize, column: usize) -> f64 {
        self.values[row * self.order + column]
    }

    /// Largest entry of the matrix.
    pub fn max_value(&self) -> f64 {
        self.values.iter().fold(f64::NEG_INFINITY, |acc, value| acc.max(*value))
    }

    /// Convert a cost matrix into an equivalent profit matrix and vice versa
    /// by subtracting every entry from the matrix maximum.
    ///
    /// Not a true involution: flipping twice reproduces the input only when
    /// the same upper bound is reused, see [`SquareMatrix::flipped_against`].
    pub fn flipped(&self) -> SquareMatrix {
        self.flipped_against(self.max_value())
    }

    /// Flip against a caller-chosen upper bound.
    pub fn flipped_against(&self, upper_bound: f64) -> SquareMatrix {
        SquareMatrix {
            order: self.order,
            values: flip_row_major(self.values.as_slice(), upper_bound),
        }
    }

    /// Total weight of the matched pairs in `mapping`.
    ///
    /// `mapping` assigns a column to each row index, or a row to each column
    /// index when `transpose` is set (for evaluating an inverse mapping
    /// against the original orientation). Sentinel entries (MAX value of the
    /// index type) are skipped, so partial matchings score only their
    /// assigned pairs.
    pub fn score<I>(&self, mapping: &[I], transpose: bool) -> f64
    where
        I: UnsignedInt,
    {
        let mut total = 0.;
        for (i, j_ref) in mapping.iter().enumerate() {
            if *j_ref == I::max_value() {
                continue;
            }
            let j: usize = (*j_ref).as_();
            total += if transpose { self.at(j, i) } else { self.at(i, j) };
        }
        total
    }
}

#[inline]
pub(crate) fn flip_row_major(values: &[f64], upper_bound: f64) -> Vec<f64> {
    values.iter().map(|value| upper_bound - value).collect()
}

#[cfg(test)]
mod tests {
    use super::SquareMatrix;

    #[test]
    fn rejects_ragged_rows() {
        let result = SquareMatrix::from_rows(&[vec![1., 2.], vec![3.]]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(SquareMatrix::from_rows(&[]).is_err());
        assert!(SquareMatrix::from_row_major(0, vec![]).is_err());
    }

    #[test]
    fn rejects_non_finite_entries() {
        assert!(SquareMatrix::from_rows(&[vec![1., f64::NAN], vec![3., 4.]]).is_err());
        assert!(SquareMatrix::from_rows(&[vec![1., 2.], vec![f64::INFINITY, 4.]]).is_err());
    }

    #[test]
    fn flip_subtracts_from_the_maximum() {
        let matrix = SquareMatrix::from_rows(&[vec![1., 2.], vec![3., 4.]]).unwrap();
        let flipped = matrix.flipped();
        assert_eq!(flipped.values(), &[3., 2., 1., 0.][..]);
    }

    #[test]
    fn flip_twice_with_the_same_bound_is_identity() {
        let matrix = SquareMatrix::from_rows(&[vec![11., 7.], vec![13., 21.]]).unwrap();
        let upper_bound = matrix.max_value();
        let round_trip = matrix.flipped_against(upper_bound).flipped_against(upper_bound);
        assert_eq!(round_trip, matrix);
    }

    #[test]
    fn score_relates_cost_and_flipped_profit() {
        let cost = SquareMatrix::from_rows(&[
            vec![5., 9., 3.],
            vec![8., 7., 8.],
            vec![6., 10., 12.],
        ])
        .unwrap();
        let upper_bound = cost.max_value();
        let profit = cost.flipped_against(upper_bound);
        let mapping: Vec<u32> = vec![2, 0, 1];
        let n = cost.order() as f64;
        let cost_total = cost.score(mapping.as_slice(), false);
        let profit_total = profit.score(mapping.as_slice(), false);
        assert!((cost_total - (n * upper_bound - profit_total)).abs() < 1e-9);
    }

    #[test]
    fn score_skips_unassigned_and_handles_transpose() {
        let matrix = SquareMatrix::from_rows(&[vec![1., 2.], vec![3., 4.]]).unwrap();
        let forward: Vec<u32> = vec![1, u32::MAX];
        assert_eq!(matrix.score(forward.as_slice(), false), 2.);

        // inverse mapping scored against the original orientation
        let forward: Vec<u32> = vec![1, 0];
        let inverse: Vec<u32> = vec![1, 0];
        assert_eq!(
            matrix.score(forward.as_slice(), false),
            matrix.score(inverse.as_slice(), true)
        );
    }
}
