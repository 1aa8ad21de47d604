use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use fluidbox::solver::diagnostics;
use fluidbox::{config, scenario, Config, Fluid};

const USAGE: &str = "usage: fluidbox [--ticks N] [--out FILE] [--compare FILE] [--tolerance X] [--endless]";

/// Default tolerance when diffing against another implementation's dump.
const DEFAULT_TOLERANCE: f64 = 1e-6;

struct Args {
    ticks: Option<usize>,
    out: Option<PathBuf>,
    compare: Option<PathBuf>,
    tolerance: f64,
    endless: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        ticks: None,
        out: None,
        compare: None,
        tolerance: DEFAULT_TOLERANCE,
        endless: false,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--ticks" => {
                let v = it.next().context("--ticks needs a value")?;
                args.ticks = Some(v.parse().context("--ticks must be an integer")?);
            }
            "--out" => {
                args.out = Some(PathBuf::from(it.next().context("--out needs a path")?));
            }
            "--compare" => {
                args.compare = Some(PathBuf::from(it.next().context("--compare needs a path")?));
            }
            "--tolerance" => {
                let v = it.next().context("--tolerance needs a value")?;
                args.tolerance = v.parse().context("--tolerance must be a number")?;
            }
            "--endless" => args.endless = true,
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => bail!("unknown argument {other:?}\n{USAGE}"),
        }
    }
    Ok(args)
}

fn report(fluid: &Fluid) {
    let n = fluid.size();
    println!(
        "mass = {:.6}  kinetic energy = {:.6e}  max divergence = {:.6e}",
        diagnostics::total_density(fluid.density(), n),
        diagnostics::kinetic_energy(fluid.velocity_x(), fluid.velocity_y(), n),
        diagnostics::max_divergence(fluid.velocity_x(), fluid.velocity_y(), n),
    );
}

fn run_scenario(cfg: &Config, args: &Args) -> Result<()> {
    let n = cfg.grid.size;
    let params = cfg.tick_params();
    let ticks = args.ticks.unwrap_or(cfg.scenario.ticks);

    let mut fluid = Fluid::new(n, cfg.solver_opts());
    scenario::seed(&mut fluid);

    let start = Instant::now();
    for _ in 0..ticks {
        fluid.tick(params.dt, params.visc, params.diff);
    }
    let elapsed = start.elapsed();
    let avg_ms = elapsed.as_secs_f64() * 1e3 / ticks.max(1) as f64;
    println!("n = {n}  ticks = {ticks}  elapsed = {elapsed:.2?}  avg = {avg_ms:.3} ms/tick");
    report(&fluid);

    if let Some(out) = &args.out {
        scenario::write_density(&fluid, out)?;
        log::info!("density dump written to {}", out.display());
    }

    if let Some(path) = &args.compare {
        let (ref_n, ref_buf) = scenario::read_density(path)?;
        if ref_n != n {
            bail!("grid size mismatch: ours is {n}, {} holds {ref_n}", path.display());
        }
        let diff = scenario::max_abs_diff(fluid.density(), &ref_buf);
        println!("max abs density diff vs {} = {diff:e}", path.display());
        if diff > args.tolerance {
            bail!("density differs by {diff:e}, above tolerance {:e}", args.tolerance);
        }
        println!("buffers match within {:e}", args.tolerance);
    }

    Ok(())
}

fn run_endless(cfg: &Config) -> Result<()> {
    let n = cfg.grid.size;
    let params = cfg.tick_params();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || r.store(false, Ordering::SeqCst))
        .context("setting Ctrl+C handler")?;

    let mut fluid = Fluid::new(n, cfg.solver_opts());
    scenario::seed(&mut fluid);

    let start = Instant::now();
    let mut count = 0u64;
    while running.load(Ordering::SeqCst) {
        fluid.tick(params.dt, params.visc, params.diff);
        count += 1;
        if count % 100 == 0 {
            log::info!(
                "tick {count}: mass = {:.6}  max divergence = {:.3e}",
                diagnostics::total_density(fluid.density(), n),
                diagnostics::max_divergence(fluid.velocity_x(), fluid.velocity_y(), n),
            );
        }
    }
    let elapsed = start.elapsed();
    println!("stopped after {count} ticks in {elapsed:.2?}");
    report(&fluid);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;
    let cfg = config::load();
    if args.endless {
        run_endless(&cfg)
    } else {
        run_scenario(&cfg, &args)
    }
}
