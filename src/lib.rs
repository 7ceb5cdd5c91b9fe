//! Solvers for the dense linear assignment problem: maximum-weight perfect
//! matchings of complete bipartite graphs given by square weight matrices.
//!
//! Two interchangeable strategies implement [`MatchingSolver`]: the O(n³)
//! slack-table [`labeling::KuhnMunkresSolver`] and the full-rescan
//! [`rescan::RescanSolver`] kept around to cross-validate it. Minimization is
//! served by the cost/profit flip of [`SquareMatrix`], so the core only ever
//! maximizes.

pub mod matrix;
pub mod solution;
pub mod solver;

#[cfg(feature = "labeling")]
pub mod labeling;
#[cfg(feature = "rescan")]
pub mod rescan;

pub use crate::matrix::SquareMatrix;
pub use crate::solution::{MatchingSolution, UnsignedInt};
pub use crate::solver::MatchingSolver;


#[cfg(all(test, feature = "labeling", feature = "rescan"))]
mod cross_validation {
    use crate::labeling::KuhnMunkresSolver;
    use crate::rescan::RescanSolver;
    use crate::solver::MatchingSolver;
    use crate::SquareMatrix;
    use rand::distributions::{Distribution, Uniform};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// The two strategies may pick different matchings where several are
    /// optimal, but a difference in total weight is a correctness violation.
    #[test]
    fn strategies_agree_on_the_total() {
        let between = Uniform::from(-5.0..15.0);
        for seed in 0..6 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let order = 3 + 2 * (seed as usize);
            let rows: Vec<Vec<f64>> = (0..order)
                .map(|_| (0..order).map(|_| between.sample(&mut rng)).collect())
                .collect();
            let matrix = SquareMatrix::from_rows(rows.as_slice()).unwrap();

            for maximize in [false, true] {
                let (mut labeling, mut labeling_solution) =
                    KuhnMunkresSolver::<u32>::new(matrix.order());
                labeling.set_matrix(&matrix).unwrap();
                labeling.solve(&mut labeling_solution, maximize).unwrap();

                let (mut rescan, mut rescan_solution) = RescanSolver::<u32>::new(matrix.order());
                rescan.set_matrix(&matrix).unwrap();
                rescan.solve(&mut rescan_solution, maximize).unwrap();

                assert!(
                    (labeling_solution.objective - rescan_solution.objective).abs() < 1e-9,
                    "seed {}: totals diverged, {} vs {}",
                    seed,
                    labeling_solution.objective,
                    rescan_solution.objective
                );
            }
        }
    }
}
