use crate::solution::{MatchingSolution, UnsignedInt};
use crate::solver::{flip_alternating_path, MatchingSolver};
use anyhow;
use anyhow::Result;
use num_iter;
use tracing::trace;

/// Label-improving solver without the incremental slack table.
///
/// Same alternating-tree search as [`crate::labeling::KuhnMunkresSolver`],
/// but the minimum slack is recomputed by scanning all (tree left, outside
/// right) pairs on every tree-growth step, which makes a solve O(n⁴) in the
/// worst case. The code paths are deliberately independent of the slack-table
/// bookkeeping, so the two strategies cross-validate each other: their totals
/// must agree on any input even where the matched pairs differ.
///
/// Ties go to the lowest right index, then the lowest left index.
#[derive(Clone)]
pub struct RescanSolver<I: UnsignedInt> {
    num_vertices: I,
    // row-major weights of the complete bipartite graph
    values: Vec<f64>,

    // working state below is reset by every solve
    lu: Vec<f64>,
    lv: Vec<f64>,
    in_tree: Vec<bool>,
    tree_parent: Vec<I>,

    /// inner tree-growth steps of the last solve
    pub nits: u32,
}

impl<I: UnsignedInt> MatchingSolver<I> for RescanSolver<I> {
    fn new(vertex_capacity: usize) -> (Self, MatchingSolution<I>) {
        (
            Self {
                num_vertices: I::zero(),
                values: Vec::with_capacity(vertex_capacity * vertex_capacity),
                lu: Vec::with_capacity(vertex_capacity),
                lv: Vec::with_capacity(vertex_capacity),
                in_tree: Vec::with_capacity(vertex_capacity),
                tree_parent: Vec::with_capacity(vertex_capacity),
                nits: 0,
            },
            MatchingSolution::<I>::new(vertex_capacity),
        )
    }

    fn num_vertices(&self) -> I {
        self.num_vertices
    }
    fn num_vertices_mut(&mut self) -> &mut I {
        &mut self.num_vertices
    }
    fn values(&self) -> &Vec<f64> {
        &self.values
    }
    fn values_mut(&mut self) -> &mut Vec<f64> {
        &mut self.values
    }

    fn solve(
        &mut self,
        solution: &mut MatchingSolution<I>,
        maximize: bool,
    ) -> Result<(), anyhow::Error> {
        self.validate_input()?;
        self.init_solve(solution);

        let n: usize = self.num_vertices.as_();
        let (profit, upper_bound) = self.profit_values(maximize);

        self.lu.clear();
        self.lu.extend((0..n).map(|u| {
            profit[u * n..(u + 1) * n]
                .iter()
                .fold(f64::NEG_INFINITY, |acc, value| acc.max(*value))
        }));
        self.lv.clear();
        self.lv.resize(n, 0.);
        self.in_tree.clear();
        self.in_tree.resize(n, false);
        self.tree_parent.clear();
        self.tree_parent.resize(n, I::max_value());
        self.nits = 0;

        while solution.num_assigned < self.num_vertices {
            let root = match num_iter::range(I::zero(), self.num_vertices).find(|u_ref| {
                let u: usize = (*u_ref).as_();
                solution.left_to_right[u] == I::max_value()
            }) {
                Some(u) => u,
                None => break,
            };
            trace!("root: {}", root);
            self.grow_tree(root, profit.as_slice(), solution);
            solution.num_assigned += I::one();
        }

        let labeling_total: f64 = self.lu.iter().sum::<f64>() + self.lv.iter().sum::<f64>();
        solution.objective = if maximize {
            labeling_total
        } else {
            (n as f64) * upper_bound - labeling_total
        };
        trace!("left_to_right: {:?}", solution.left_to_right);
        trace!("objective: {}", solution.objective);
        Ok(())
    }
}

impl<I: UnsignedInt> RescanSolver<I> {
    fn grow_tree(&mut self, root: I, profit: &[f64], solution: &mut MatchingSolution<I>) {
        let n: usize = self.num_vertices.as_();
        let root_usize: usize = root.as_();

        self.in_tree.iter_mut().for_each(|flag| *flag = false);
        self.in_tree[root_usize] = true;
        self.tree_parent
            .iter_mut()
            .for_each(|parent| *parent = I::max_value());

        loop {
            self.nits += 1;

            // full rescan: minimum slack over every pair of a tree left
            // vertex and an outside right vertex
            let mut min_slack = f64::INFINITY;
            let mut picked_v = I::max_value();
            let mut picked_u = I::max_value();
            for v in num_iter::range(I::zero(), self.num_vertices) {
                let v_usize: usize = v.as_();
                if self.tree_parent[v_usize] != I::max_value() {
                    continue;
                }
                for u in num_iter::range(I::zero(), self.num_vertices) {
                    let u_usize: usize = u.as_();
                    if !self.in_tree[u_usize] {
                        continue;
                    }
                    let slack = self.lu[u_usize] + self.lv[v_usize] - profit[u_usize * n + v_usize];
                    if slack < min_slack {
                        min_slack = slack;
                        picked_v = v;
                        picked_u = u;
                    }
                }
            }
            debug_assert!(picked_v != I::max_value());
            let picked_v_usize: usize = picked_v.as_();

            if min_slack > 0. {
                for u in 0..n {
                    if self.in_tree[u] {
                        self.lu[u] -= min_slack;
                    }
                }
                for v in 0..n {
                    if self.tree_parent[v] != I::max_value() {
                        self.lv[v] += min_slack;
                    }
                }
            }

            self.tree_parent[picked_v_usize] = picked_u;
            trace!("tight edge ({}, {}), slack was {}", picked_u, picked_v, min_slack);

            let matched = solution.right_to_left[picked_v_usize];
            if matched == I::max_value() {
                flip_alternating_path(self.tree_parent.as_slice(), picked_v, solution);
                return;
            }
            let matched_usize: usize = matched.as_();
            self.in_tree[matched_usize] = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RescanSolver;
    use crate::matrix::SquareMatrix;
    use crate::solver::MatchingSolver;

    #[test]
    fn recovers_the_anti_diagonal() {
        let matrix = SquareMatrix::from_rows(&[
            vec![0., 0., 9.],
            vec![0., 9., 0.],
            vec![9., 0., 0.],
        ])
        .unwrap();
        let (mut solver, mut solution): (RescanSolver<u32>, _) = RescanSolver::new(matrix.order());
        solver.set_matrix(&matrix).unwrap();
        solver.solve(&mut solution, true).unwrap();
        assert_eq!(solution.left_to_right, [2u32, 1, 0]);
        assert!((solution.objective - 27.).abs() < 1e-9);
    }

    #[test]
    fn minimizes_through_the_flip_adapter() {
        let matrix = SquareMatrix::from_rows(&[vec![4., 1.], vec![2., 6.]]).unwrap();
        let (mut solver, mut solution): (RescanSolver<u32>, _) = RescanSolver::new(matrix.order());
        solver.set_matrix(&matrix).unwrap();
        solver.solve(&mut solution, false).unwrap();
        assert_eq!(solution.left_to_right, [1u32, 0]);
        assert!((solution.objective - 3.).abs() < 1e-9);
    }
}
