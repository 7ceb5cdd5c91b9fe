use crate::solution::{MatchingSolution, UnsignedInt};
use crate::solver::{flip_alternating_path, MatchingSolver};
use anyhow;
use anyhow::Result;
use num_iter;
use tracing::trace;

/// Kuhn-Munkres (Hungarian) solver for the dense linear assignment problem.
///
/// Maintains a feasible vertex labeling (`lu[u] + lv[v] >= w[u][v]` for every
/// edge) and repeatedly grows an alternating tree rooted at a free left
/// vertex inside the equality subgraph of tight edges. A per-right-vertex
/// slack table records the minimum gap towards the tree and the left vertex
/// realizing it; adding a left vertex to the tree only ever lowers entries,
/// so one augmentation costs O(n²) and a full solve O(n³).
///
/// When several right vertices share the minimum slack, the lowest index wins
/// (strict `<` scan in ascending order). Any fixed order is correct; this one
/// keeps repeated solves byte-for-byte reproducible.
#[derive(Clone)]
pub struct KuhnMunkresSolver<I: UnsignedInt> {
    num_vertices: I,
    // row-major weights of the complete bipartite graph
    values: Vec<f64>,

    // working state below is reset by every solve
    // vertex labels, feasible throughout
    lu: Vec<f64>,
    lv: Vec<f64>,
    // alternating tree: left membership in S, right parent pointers T
    in_tree: Vec<bool>,
    tree_parent: Vec<I>,
    // minimum slack towards each right vertex outside the tree and the left
    // vertex realizing it
    slack: Vec<f64>,
    slack_arg: Vec<I>,

    /// inner tree-growth steps of the last solve
    pub nits: u32,
}

impl<I: UnsignedInt> MatchingSolver<I> for KuhnMunkresSolver<I> {
    fn new(vertex_capacity: usize) -> (Self, MatchingSolution<I>) {
        (
            Self {
                num_vertices: I::zero(),
                values: Vec::with_capacity(vertex_capacity * vertex_capacity),
                lu: Vec::with_capacity(vertex_capacity),
                lv: Vec::with_capacity(vertex_capacity),
                in_tree: Vec::with_capacity(vertex_capacity),
                tree_parent: Vec::with_capacity(vertex_capacity),
                slack: Vec::with_capacity(vertex_capacity),
                slack_arg: Vec::with_capacity(vertex_capacity),
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
        self.init_labels(profit.as_slice());
        self.nits = 0;

        // each pass grows one alternating tree and matches exactly one more
        // left vertex, so the loop runs n times
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

        // duality: the value of the optimal labeling equals the weight of the
        // optimal matching
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

impl<I: UnsignedInt> KuhnMunkresSolver<I> {
    /// Trivial feasible labeling: row maxima on the left, zero on the right.
    fn init_labels(&mut self, profit: &[f64]) {
        let n: usize = self.num_vertices.as_();
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
        self.slack.clear();
        self.slack.resize(n, f64::INFINITY);
        self.slack_arg.clear();
        self.slack_arg.resize(n, I::max_value());
    }

    /// Grow an alternating tree from the free left vertex `root` until an
    /// augmenting path is found, improving labels along the way, then flip
    /// the path.
    fn grow_tree(&mut self, root: I, profit: &[f64], solution: &mut MatchingSolution<I>) {
        let n: usize = self.num_vertices.as_();
        let root_usize: usize = root.as_();

        // fresh tree and slack table seeded from the root
        self.in_tree.iter_mut().for_each(|flag| *flag = false);
        self.in_tree[root_usize] = true;
        self.tree_parent
            .iter_mut()
            .for_each(|parent| *parent = I::max_value());
        for v in 0..n {
            self.slack[v] = self.lu[root_usize] + self.lv[v] - profit[root_usize * n + v];
            self.slack_arg[v] = root;
        }

        loop {
            self.nits += 1;

            // select the edge (u, v) with u in the tree, v outside it and
            // minimum slack; ties go to the lowest right index
            let mut min_slack = f64::INFINITY;
            let mut picked_v = I::max_value();
            for v in num_iter::range(I::zero(), self.num_vertices) {
                let v_usize: usize = v.as_();
                if self.tree_parent[v_usize] == I::max_value() && self.slack[v_usize] < min_slack {
                    min_slack = self.slack[v_usize];
                    picked_v = v;
                }
            }
            // the matching is partial, so some right vertex is still outside
            debug_assert!(picked_v != I::max_value());
            let picked_v_usize: usize = picked_v.as_();

            if min_slack > 0. {
                self.improve_labels(min_slack);
            }

            // the selected edge is tight now; absorb v into the tree
            let u = self.slack_arg[picked_v_usize];
            self.tree_parent[picked_v_usize] = u;
            trace!("tight edge ({}, {}), slack was {}", u, picked_v, min_slack);

            let matched = solution.right_to_left[picked_v_usize];
            if matched == I::max_value() {
                // v is free: the tree path from the root ends in an
                // augmenting path
                flip_alternating_path(self.tree_parent.as_slice(), picked_v, solution);
                return;
            }

            // v was matched: its partner joins the tree and may lower the
            // slack towards the remaining right vertices
            let matched_usize: usize = matched.as_();
            self.in_tree[matched_usize] = true;
            for v in 0..n {
                if self.tree_parent[v] != I::max_value() {
                    continue;
                }
                let slack = self.lu[matched_usize] + self.lv[v] - profit[matched_usize * n + v];
                if slack < self.slack[v] {
                    self.slack[v] = slack;
                    self.slack_arg[v] = matched;
                }
            }
        }
    }

    /// Lower the labels of tree left vertices and raise those of tree right
    /// vertices by the minimum slack.
    ///
    /// Keeps the labeling feasible, keeps every tree edge tight and makes at
    /// least one new edge towards an outside right vertex tight. Slacks of
    /// outside right vertices shrink by the same amount, no rescan needed.
    fn improve_labels(&mut self, delta: f64) {
        for (u, in_tree) in self.in_tree.iter().enumerate() {
            if *in_tree {
                self.lu[u] -= delta;
            }
        }
        for v in 0..self.lv.len() {
            if self.tree_parent[v] != I::max_value() {
                self.lv[v] += delta;
            } else {
                self.slack[v] -= delta;
            }
        }
    }
}
