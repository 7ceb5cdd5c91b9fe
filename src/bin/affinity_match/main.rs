mod affinity;
mod ring;
mod roster;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use dense_linear_assignment::labeling::KuhnMunkresSolver;
use dense_linear_assignment::rescan::RescanSolver;
use dense_linear_assignment::{MatchingSolution, MatchingSolver, SquareMatrix};
use rand::seq::SliceRandom;
use ring::RingBuffer;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

/// How many diverging-assignment examples benchmark mode prints.
const DIVERGING_EXAMPLES: usize = 10;
const RANDOM_TRIALS: usize = 100;

#[derive(Parser)]
#[command(name = "affinity_match")]
#[command(about = "Optimal assignment between two name lists by toy binding affinity")]
struct Cli {
    #[arg(help = "Newline-separated names for the left side (e.g. proteins)")]
    left: PathBuf,
    #[arg(help = "Newline-separated names for the right side (e.g. drugs)")]
    right: PathBuf,
    #[arg(long, value_enum, default_value = "labeling", help = "Solver strategy")]
    solver: Strategy,
    #[arg(long, help = "Treat affinities as costs and minimize the total")]
    minimize: bool,
    #[arg(
        long,
        help = "Time both strategies, cross-check their totals and compare against random assignments"
    )]
    benchmark: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// O(n³) Kuhn-Munkres with the incremental slack table
    Labeling,
    /// full-rescan variant, kept for cross-validation
    Rescan,
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("error: {:#}", err);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), anyhow::Error> {
    let left = roster::load(cli.left.as_path())?;
    let right = roster::load(cli.right.as_path())?;
    let weights = affinity::affinity_matrix(left.as_slice(), right.as_slice())?;

    if cli.benchmark {
        return benchmark(&weights, left.as_slice(), right.as_slice(), !cli.minimize);
    }

    let solution = match cli.solver {
        Strategy::Labeling => solve_with::<KuhnMunkresSolver<u32>>(&weights, !cli.minimize)?,
        Strategy::Rescan => solve_with::<RescanSolver<u32>>(&weights, !cli.minimize)?,
    };

    println!("> assignment:");
    print_assignment(&solution, left.as_slice(), right.as_slice(), &weights);
    println!("> total affinity: {}", solution.objective);
    Ok(())
}

fn solve_with<S: MatchingSolver<u32, S>>(
    weights: &SquareMatrix,
    maximize: bool,
) -> Result<MatchingSolution<u32>, anyhow::Error> {
    let (mut solver, mut solution) = S::new(weights.order());
    solver.set_matrix(weights)?;
    solver.solve(&mut solution, maximize)?;
    Ok(solution)
}

fn print_assignment(
    solution: &MatchingSolution<u32>,
    left: &[String],
    right: &[String],
    weights: &SquareMatrix,
) {
    for (u, name) in left.iter().enumerate() {
        let v = solution.left_to_right[u] as usize;
        if v < right.len() {
            println!("  {} -> {} | affinity={}", name, right[v], weights.at(u, v));
        } else {
            // matched to a zero-weight padding column
            println!("  {} -> (none)", name);
        }
    }
}

fn benchmark(
    weights: &SquareMatrix,
    left: &[String],
    right: &[String],
    maximize: bool,
) -> Result<(), anyhow::Error> {
    println!("1. timing the solver strategies ...");
    let (labeling, labeling_secs) =
        timed(|| solve_with::<KuhnMunkresSolver<u32>>(weights, maximize))?;
    println!("  + labeling took {:.3} sec, total {}", labeling_secs, labeling.objective);
    let (rescan, rescan_secs) = timed(|| solve_with::<RescanSolver<u32>>(weights, maximize))?;
    println!("  + rescan   took {:.3} sec, total {}", rescan_secs, rescan.objective);

    // matchings may legitimately differ where several are optimal; the totals
    // must not
    let scale = labeling.objective.abs().max(1.);
    if (labeling.objective - rescan.objective).abs() > 1e-6 * scale {
        bail!(
            "solver strategies disagree on the total matched weight: {} vs {}",
            labeling.objective,
            rescan.objective
        );
    }

    println!("2. comparing the two matchings ...");
    let mut diverging = RingBuffer::new(DIVERGING_EXAMPLES);
    let mut num_diverging = 0usize;
    for u in 0..weights.order() {
        let a = labeling.left_to_right[u];
        let b = rescan.left_to_right[u];
        if a != b {
            num_diverging += 1;
            diverging.push(format!("({} -> {}) vs ({} -> {})", u, a, u, b));
        }
    }
    if diverging.is_empty() {
        println!("  + identical assignments");
    } else {
        println!("  + {} diverging pairs of equal total weight, examples:", num_diverging);
        for example in diverging.iter() {
            println!("    ++ {}", example);
        }
    }

    println!("3. comparing optimum against random assignments ...");
    let mut rng = rand::thread_rng();
    let mut totals = Vec::with_capacity(RANDOM_TRIALS);
    for _ in 0..RANDOM_TRIALS {
        let mut targets: Vec<u32> = (0..weights.order() as u32).collect();
        targets.shuffle(&mut rng);
        totals.push(weights.score(targets.as_slice(), false));
    }
    let max = totals.iter().fold(f64::NEG_INFINITY, |acc, v| acc.max(*v));
    let min = totals.iter().fold(f64::INFINITY, |acc, v| acc.min(*v));
    let avg = totals.iter().sum::<f64>() / totals.len() as f64;
    let std = (totals.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / totals.len() as f64).sqrt();
    println!(
        "  + random over {} trials: max {}, min {}, avg {:.3}, std {:.3}",
        RANDOM_TRIALS, max, min, avg, std
    );
    println!("  + optimum:");
    print_assignment(&labeling, left, right, weights);
    println!("    value: {}", labeling.objective);
    Ok(())
}

fn timed<T, F>(f: F) -> Result<(T, f64), anyhow::Error>
where
    F: FnOnce() -> Result<T, anyhow::Error>,
{
    let start = Instant::now();
    let value = f()?;
    Ok((value, start.elapsed().as_secs_f64()))
}
