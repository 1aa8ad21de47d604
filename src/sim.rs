use crate::solver::{self, FieldType, SolverOpts};

/// Convert 2D coordinates to a 1D index on a grid with an `n` by `n`
/// interior and a one-cell boundary ring on every side.
/// Valid coordinates are `0 <= x, y <= n + 1`.
#[inline(always)]
pub const fn idx(x: usize, y: usize, n: usize) -> usize {
    x + y * (n + 2)
}

/// A closed-box fluid simulation: an n-by-n interior of density and
/// velocity cells surrounded by a one-cell wall ring.
///
/// The instance exclusively owns its buffers. Injection (`increase_density`,
/// `apply_force`) accumulates into the current buffers and takes effect on
/// the next `tick`; readers use the slice accessors between ticks.
pub struct Fluid {
    n: usize,
    opts: SolverOpts,
    dens: Vec<f64>,
    dens_prev: Vec<f64>,
    vx: Vec<f64>,
    vx_prev: Vec<f64>,
    vy: Vec<f64>,
    vy_prev: Vec<f64>,
}

impl Fluid {
    /// Create a quiescent simulation with an `n` by `n` interior.
    /// Buffers are allocated here once and never resized.
    pub fn new(n: usize, opts: SolverOpts) -> Self {
        assert!(n >= 1, "grid interior must be at least 1x1");
        let size = (n + 2) * (n + 2);
        Self {
            n,
            opts,
            dens: vec![0.0; size],
            dens_prev: vec![0.0; size],
            vx: vec![0.0; size],
            vx_prev: vec![0.0; size],
            vy: vec![0.0; size],
            vy_prev: vec![0.0; size],
        }
    }

    /// Interior size n.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Full storage dimension n + 2 (interior plus the wall ring).
    pub fn dim(&self) -> usize {
        self.n + 2
    }

    /// Linear index for this instance's grid. Valid for `0 <= x, y <= n + 1`.
    #[inline(always)]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        idx(x, y, self.n)
    }

    fn in_bounds(&self, x: usize, y: usize) -> bool {
        x <= self.n + 1 && y <= self.n + 1
    }

    /// Add `amount` of density at cell (x, y). Accumulates across calls and
    /// takes effect on the next `tick`. Coordinates outside `0..=n+1` are
    /// rejected with a logged warning; returns whether the injection landed.
    pub fn increase_density(&mut self, x: usize, y: usize, amount: f64) -> bool {
        if !self.in_bounds(x, y) {
            log::warn!("increase_density outside grid: ({x}, {y}), n = {}", self.n);
            return false;
        }
        let i = self.idx(x, y);
        self.dens[i] += amount;
        true
    }

    /// Add a force (velocity increment) at cell (x, y). Accumulates across
    /// calls and takes effect on the next `tick`. Coordinates outside
    /// `0..=n+1` are rejected with a logged warning.
    pub fn apply_force(&mut self, x: usize, y: usize, fx: f64, fy: f64) -> bool {
        if !self.in_bounds(x, y) {
            log::warn!("apply_force outside grid: ({x}, {y}), n = {}", self.n);
            return false;
        }
        let i = self.idx(x, y);
        self.vx[i] += fx;
        self.vy[i] += fy;
        true
    }

    /// Advance the simulation by one step: velocity pipeline first, then
    /// density. `dt`, `visc` and `diff` are injected per call and never
    /// stored. Runs a fixed amount of work; not reentrant.
    pub fn tick(&mut self, dt: f64, visc: f64, diff: f64) {
        self.velocity_step(dt, visc);
        self.density_step(dt, diff);
    }

    /// Reset to the initial quiescent state. Zeroes every buffer in place.
    pub fn clear(&mut self) {
        for buf in [
            &mut self.dens,
            &mut self.dens_prev,
            &mut self.vx,
            &mut self.vx_prev,
            &mut self.vy,
            &mut self.vy_prev,
        ] {
            buf.fill(0.0);
        }
    }

    /// Current density buffer, length `(n + 2)^2`, indexed by `idx`.
    pub fn density(&self) -> &[f64] {
        &self.dens
    }

    /// Current horizontal velocity buffer.
    pub fn velocity_x(&self) -> &[f64] {
        &self.vx
    }

    /// Current vertical velocity buffer.
    pub fn velocity_y(&self) -> &[f64] {
        &self.vy
    }

    /// Diffuse both components, project, self-advect, project again.
    /// The second projection cleans up the divergence advection introduces.
    fn velocity_step(&mut self, dt: f64, visc: f64) {
        let n = self.n;
        let o = self.opts;

        std::mem::swap(&mut self.vx, &mut self.vx_prev);
        solver::diffuse(FieldType::Vx, &mut self.vx, &self.vx_prev, visc, dt, o.diffuse_iter, n);
        std::mem::swap(&mut self.vy, &mut self.vy_prev);
        solver::diffuse(FieldType::Vy, &mut self.vy, &self.vy_prev, visc, dt, o.diffuse_iter, n);

        // The prev buffers are dead until the next swap; project borrows
        // them as pressure and divergence scratch space.
        solver::project(
            &mut self.vx,
            &mut self.vy,
            &mut self.vx_prev,
            &mut self.vy_prev,
            o.project_iter,
            n,
        );

        std::mem::swap(&mut self.vx, &mut self.vx_prev);
        std::mem::swap(&mut self.vy, &mut self.vy_prev);
        solver::advect(FieldType::Vx, &mut self.vx, &self.vx_prev, &self.vx_prev, &self.vy_prev, dt, n);
        solver::advect(FieldType::Vy, &mut self.vy, &self.vy_prev, &self.vx_prev, &self.vy_prev, dt, n);

        solver::project(
            &mut self.vx,
            &mut self.vy,
            &mut self.vx_prev,
            &mut self.vy_prev,
            o.project_iter,
            n,
        );
    }

    /// Diffuse density, then carry it along the finalized velocity field.
    fn density_step(&mut self, dt: f64, diff: f64) {
        let n = self.n;
        let o = self.opts;

        std::mem::swap(&mut self.dens, &mut self.dens_prev);
        solver::diffuse(FieldType::Scalar, &mut self.dens, &self.dens_prev, diff, dt, o.diffuse_iter, n);

        std::mem::swap(&mut self.dens, &mut self.dens_prev);
        solver::advect(FieldType::Scalar, &mut self.dens, &self.dens_prev, &self.vx, &self.vy, dt, n);
    }
}
