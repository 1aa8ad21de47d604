use serde::Deserialize;

use crate::solver::{SolverOpts, TickParams};

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub solver: SolverConfig,
    pub scenario: ScenarioConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub size: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub dt: f64,
    pub visc: f64,
    pub diff: f64,
    pub diffuse_iter: usize,
    pub project_iter: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub ticks: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            solver: SolverConfig::default(),
            scenario: ScenarioConfig::default(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { size: 80 }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            visc: 0.0001,
            diff: 0.0001,
            diffuse_iter: 20,
            project_iter: 20,
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self { ticks: 51 }
    }
}

impl Config {
    pub fn solver_opts(&self) -> SolverOpts {
        SolverOpts {
            diffuse_iter: self.solver.diffuse_iter,
            project_iter: self.solver.project_iter,
        }
    }

    pub fn tick_params(&self) -> TickParams {
        TickParams {
            dt: self.solver.dt,
            visc: self.solver.visc,
            diff: self.solver.diff,
        }
    }
}

pub fn load() -> Config {
    let path = std::path::Path::new("fluidbox.yaml");
    if path.exists() {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("Warning: failed to parse fluidbox.yaml: {e}; using defaults");
                    Config::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: failed to read fluidbox.yaml: {e}; using defaults");
                Config::default()
            }
        }
    } else {
        Config::default()
    }
}
