mod boundary;
mod core;
pub mod diagnostics;
mod params;

pub use boundary::{set_bnd, FieldType};
pub use params::{SolverOpts, TickParams};
pub use self::core::{advect, diffuse, lin_solve, project};
