// Scripted validation run shared with sibling implementations of the same
// solver: identical injections, identical tick count, then the density
// buffers are diffed across implementations.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::sim::Fluid;
use crate::solver::{SolverOpts, TickParams};

/// Density added at each seed cell.
pub const SEED_AMOUNT: f64 = 10.0;

/// Seed cells for density injection, in call order.
pub const DENSITY_SEEDS: [(usize, usize); 3] = [(41, 41), (65, 20), (15, 20)];

/// Single force injection: (x, y, fx, fy).
pub const FORCE_SEED: (usize, usize, f64, f64) = (41, 41, 0.0, 80.0);

/// Tick count of the scripted run.
pub const DEFAULT_TICKS: usize = 51;

/// Apply the scripted injections. The seed coordinates assume a grid at
/// least as large as the default size; on a smaller grid the out-of-range
/// seeds are rejected and logged by the solver.
pub fn seed(fluid: &mut Fluid) {
    for &(x, y) in &DENSITY_SEEDS {
        fluid.increase_density(x, y, SEED_AMOUNT);
    }
    let (x, y, fx, fy) = FORCE_SEED;
    fluid.apply_force(x, y, fx, fy);
}

/// Run the scripted scenario from a quiescent grid: seed once, then tick
/// `ticks` times with fixed parameters and no further injection.
pub fn run(n: usize, opts: SolverOpts, params: TickParams, ticks: usize) -> Fluid {
    let mut fluid = Fluid::new(n, opts);
    seed(&mut fluid);
    for _ in 0..ticks {
        fluid.tick(params.dt, params.visc, params.diff);
    }
    fluid
}

/// Serialize a density buffer as text: first line is the interior size n,
/// then one value per line in `idx` order. f64 display round-trips exactly,
/// so a dump parsed back compares bit-for-bit.
pub fn dump_density(fluid: &Fluid) -> String {
    let mut out = String::with_capacity(fluid.density().len() * 24);
    let _ = writeln!(out, "{}", fluid.size());
    for v in fluid.density() {
        let _ = writeln!(out, "{v}");
    }
    out
}

/// Write the density dump to a file.
pub fn write_density(fluid: &Fluid, path: &Path) -> Result<()> {
    fs::write(path, dump_density(fluid))
        .with_context(|| format!("writing density dump to {}", path.display()))
}

/// Parse a density dump produced by `dump_density` (or by a sibling
/// implementation following the same format). Returns (n, buffer).
pub fn parse_density(text: &str) -> Result<(usize, Vec<f64>)> {
    let mut lines = text.lines();
    let n: usize = lines
        .next()
        .context("empty density dump")?
        .trim()
        .parse()
        .context("first line must be the grid size")?;
    let expected = (n + 2) * (n + 2);

    let mut buf = Vec::with_capacity(expected);
    for (lineno, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let v: f64 = line
            .parse()
            .with_context(|| format!("bad value on line {}", lineno + 2))?;
        buf.push(v);
    }
    if buf.len() != expected {
        bail!("density dump holds {} values, expected {expected} for n = {n}", buf.len());
    }
    Ok((n, buf))
}

/// Read and parse a density dump file.
pub fn read_density(path: &Path) -> Result<(usize, Vec<f64>)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading density dump from {}", path.display()))?;
    parse_density(&text)
}

/// Largest elementwise difference between two buffers. Infinite when the
/// lengths disagree (different grid sizes are never "close").
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
