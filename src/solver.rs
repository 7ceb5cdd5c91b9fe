use crate::matrix::{flip_row_major, SquareMatrix};
use crate::solution::{MatchingSolution, UnsignedInt};
use anyhow;
use anyhow::{anyhow as anyhow_error, ensure, Result};

/// Strategy interface for dense linear assignment solvers.
///
/// Every implementation computes a maximum-weight perfect matching of a
/// complete bipartite graph given by a square weight matrix; minimization is
/// served by flipping the weights against their maximum so the core only ever
/// maximizes. Implementations are interchangeable and must agree on the total
/// matched weight for the same input (the matchings themselves may differ
/// where several are optimal).
pub trait MatchingSolver<I, S = Self>
where
    I: UnsignedInt,
{
    fn new(vertex_capacity: usize) -> (S, MatchingSolution<I>);

    fn num_vertices(&self) -> I;
    fn num_vertices_mut(&mut self) -> &mut I;
    fn values(&self) -> &Vec<f64>;
    fn values_mut(&mut self) -> &mut Vec<f64>;

    /// Compute a perfect matching of the stored weights and its total value.
    ///
    /// All working state is owned by the solver and reset on entry, so a
    /// `&mut` borrow is the only thing shared between consecutive solves.
    fn solve(
        &mut self,
        solution: &mut MatchingSolution<I>,
        maximize: bool,
    ) -> Result<(), anyhow::Error>;

    /// Prepare the solver for a new weight matrix with `num_vertices` vertices
    /// on each side.
    #[inline]
    fn init(&mut self, num_vertices: I) -> Result<(), anyhow::Error> {
        ensure!(
            num_vertices > I::zero(),
            "expected at least one vertex on each side"
        );
        ensure!(
            num_vertices < I::max_value(),
            "vertex count {} does not fit the index type, MAX marks unmatched vertices",
            num_vertices
        );
        let n: usize = num_vertices.as_();
        let num_of_edges = n
            .checked_mul(n)
            .ok_or_else(|| anyhow_error!("complete bipartite graph on {} vertices overflows", n))?;
        *self.num_vertices_mut() = num_vertices;
        let values = self.values_mut();
        values.clear();
        values.reserve(num_of_edges);
        Ok(())
    }

    /// Append one row of weights; rows must arrive in order.
    #[inline]
    fn push_row(&mut self, row: I, row_values: &[f64]) -> Result<(), anyhow::Error> {
        let n: usize = self.num_vertices().as_();
        ensure!(n > 0, "solver is not initialized, call init first");
        let row_usize: usize = row.as_();
        let current_row = self.values().len() / n;
        ensure!(current_row < n, "weight matrix already has {} rows", n);
        ensure!(
            row_usize == current_row,
            "rows must be pushed in order: got row {}, expected {}",
            row,
            current_row
        );
        ensure!(
            row_values.len() == n,
            "expected one weight per right vertex: got {}, expected {}",
            row_values.len(),
            n
        );
        ensure!(
            row_values.iter().all(|value| value.is_finite()),
            "weights must be finite"
        );
        self.values_mut().extend_from_slice(row_values);
        Ok(())
    }

    /// Bulk-load an already validated weight matrix.
    fn set_matrix(&mut self, matrix: &SquareMatrix) -> Result<(), anyhow::Error> {
        let num_vertices = I::from_usize(matrix.order()).ok_or_else(|| {
            anyhow_error!("matrix order {} does not fit the index type", matrix.order())
        })?;
        self.init(num_vertices)?;
        self.values_mut().extend_from_slice(matrix.values());
        Ok(())
    }

    /// Reject malformed input before any algorithmic work begins.
    fn validate_input(&self) -> Result<(), anyhow::Error> {
        let n: usize = self.num_vertices().as_();
        ensure!(n > 0, "empty assignment problem");
        ensure!(
            self.values().len() == n * n,
            "expected {} weights for a complete bipartite graph on {}+{} vertices, got {}",
            n * n,
            n,
            n,
            self.values().len()
        );
        ensure!(
            self.values().iter().all(|value| value.is_finite()),
            "weights must be finite"
        );
        Ok(())
    }

    fn init_solve(&mut self, solution: &mut MatchingSolution<I>) {
        let n: usize = self.num_vertices().as_();
        solution.left_to_right.clear();
        solution.left_to_right.resize(n, I::max_value());
        solution.right_to_left.clear();
        solution.right_to_left.resize(n, I::max_value());
        solution.num_assigned = I::zero();
        solution.objective = f64::NAN;
    }

    /// Working profit matrix for one solve and the upper bound it was flipped
    /// against (zero when maximizing, where the weights are used as given).
    fn profit_values(&self, maximize: bool) -> (Vec<f64>, f64) {
        if maximize {
            (self.values().clone(), 0.)
        } else {
            let upper_bound = self
                .values()
                .iter()
                .fold(f64::NEG_INFINITY, |acc, value| acc.max(*value));
            (flip_row_major(self.values().as_slice(), upper_bound), upper_bound)
        }
    }

    /// Re-score a solution against the stored weights, independently of the
    /// labeling-based value the solve itself reports.
    fn get_objective(&self, solution: &MatchingSolution<I>) -> f64 {
        let n: usize = self.num_vertices().as_();
        let mut objective = 0.;
        for (u, v_ref) in solution.left_to_right.iter().enumerate() {
            if *v_ref == I::max_value() {
                // skip any unassigned
                continue;
            }
            let v: usize = (*v_ref).as_();
            objective += self.values()[u * n + v];
        }
        objective
    }
}

/// Flip every edge on the alternating path that ends in the free right vertex
/// `end`, walking the tree parent pointers back towards the root.
///
/// Each step reads the previous partner of the parent before overwriting it,
/// which makes this the iterative form of the usual recursive rewiring; the
/// path is at most n edges long.
pub(crate) fn flip_alternating_path<I>(
    tree_parent: &[I],
    end: I,
    solution: &mut MatchingSolution<I>,
) where
    I: UnsignedInt,
{
    let mut v = end;
    loop {
        let v_usize: usize = v.as_();
        let u = tree_parent[v_usize];
        let u_usize: usize = u.as_();
        let previous = solution.left_to_right[u_usize];
        solution.left_to_right[u_usize] = v;
        solution.right_to_left[v_usize] = u;
        if previous == I::max_value() {
            // reached the free root
            return;
        }
        v = previous;
    }
}
