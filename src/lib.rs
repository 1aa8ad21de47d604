pub mod config;
pub mod scenario;
pub mod sim;
pub mod solver;

pub use config::Config;
pub use sim::{idx, Fluid};
pub use solver::{FieldType, SolverOpts, TickParams};
