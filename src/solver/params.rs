/// Relaxation iteration counts for the two linear-solver call sites.
/// Fixed counts keep the per-tick work bounded and the output reproducible;
/// raising them trades speed for accuracy without changing the algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverOpts {
    pub diffuse_iter: usize,
    pub project_iter: usize,
}

impl Default for SolverOpts {
    fn default() -> Self {
        Self {
            diffuse_iter: 20,
            project_iter: 20,
        }
    }
}

/// Per-tick simulation parameters. Owned by the caller and passed on every
/// tick, never persisted inside the solver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickParams {
    pub dt: f64,
    pub visc: f64,
    pub diff: f64,
}

impl Default for TickParams {
    fn default() -> Self {
        Self {
            dt: 0.01,
            visc: 0.0001,
            diff: 0.0001,
        }
    }
}
