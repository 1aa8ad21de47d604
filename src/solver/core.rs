use super::boundary::{set_bnd, FieldType};
use crate::sim::idx;

/// Gauss-Seidel iterative linear solver for (I - a*L) x = x0, where L is the
/// 4-neighbor Laplacian stencil. Each interior cell becomes
/// `(x0[i,j] + a * neighbors) / c`, reading neighbor values in place so that
/// already-updated cells feed the same sweep.
///
/// The sweep order (y ascending, then x ascending), the in-place update and
/// the fixed iteration count together make the result reproducible
/// bit-for-bit across runs and implementations; a double-buffered Jacobi
/// sweep converges to different numbers and must not be substituted.
pub fn lin_solve(field: FieldType, x: &mut [f64], x0: &[f64], a: f64, c: f64, iter: usize, n: usize) {
    for _ in 0..iter {
        for j in 1..=n {
            for i in 1..=n {
                let neighbors = x[idx(i - 1, j, n)]
                    + x[idx(i + 1, j, n)]
                    + x[idx(i, j - 1, n)]
                    + x[idx(i, j + 1, n)];
                x[idx(i, j, n)] = (x0[idx(i, j, n)] + a * neighbors) / c;
            }
        }
        set_bnd(field, x, n);
    }
}

/// Diffusion step: spreads the field at rate `k` over the step `dt`.
/// a = dt * k * n^2, c = 1 + 4a; x starts from a copy of x0.
pub fn diffuse(field: FieldType, x: &mut [f64], x0: &[f64], k: f64, dt: f64, iter: usize, n: usize) {
    let a = dt * k * (n * n) as f64;
    x.copy_from_slice(x0);
    lin_solve(field, x, x0, a, 1.0 + 4.0 * a, iter, n);
}

/// Semi-Lagrangian advection: for each interior cell, trace backwards
/// through the velocity field and bilinearly interpolate d0 at the source
/// position. Interpolation only ever samples existing grid values, so the
/// step is stable for any dt and velocity magnitude.
pub fn advect(field: FieldType, d: &mut [f64], d0: &[f64], vx: &[f64], vy: &[f64], dt: f64, n: usize) {
    let dt0 = dt * n as f64;
    let max = n as f64 + 0.5;

    for j in 1..=n {
        for i in 1..=n {
            let ii = idx(i, j, n);
            let mut sx = i as f64 - dt0 * vx[ii];
            let mut sy = j as f64 - dt0 * vy[ii];

            // Keep the source inside the valid interpolation range.
            if sx < 0.5 {
                sx = 0.5;
            }
            if sx > max {
                sx = max;
            }
            if sy < 0.5 {
                sy = 0.5;
            }
            if sy > max {
                sy = max;
            }

            let i0 = sx as usize;
            let i1 = i0 + 1;
            let j0 = sy as usize;
            let j1 = j0 + 1;

            let s1 = sx - i0 as f64;
            let s0 = 1.0 - s1;
            let t1 = sy - j0 as f64;
            let t0 = 1.0 - t1;

            d[ii] = s0 * (t0 * d0[idx(i0, j0, n)] + t1 * d0[idx(i0, j1, n)])
                + s1 * (t0 * d0[idx(i1, j0, n)] + t1 * d0[idx(i1, j1, n)]);
        }
    }
    set_bnd(field, d, n);
}

/// Pressure projection: split off and discard the divergent part of the
/// velocity field, leaving it approximately divergence-free. `p` and `div`
/// are caller-provided scratch buffers of the same size as the fields.
pub fn project(vx: &mut [f64], vy: &mut [f64], p: &mut [f64], div: &mut [f64], iter: usize, n: usize) {
    let h = 1.0 / n as f64;

    for j in 1..=n {
        for i in 1..=n {
            div[idx(i, j, n)] = -0.5
                * h
                * (vx[idx(i + 1, j, n)] - vx[idx(i - 1, j, n)]
                    + vy[idx(i, j + 1, n)] - vy[idx(i, j - 1, n)]);
            p[idx(i, j, n)] = 0.0;
        }
    }
    set_bnd(FieldType::Scalar, div, n);
    set_bnd(FieldType::Scalar, p, n);

    lin_solve(FieldType::Scalar, p, div, 1.0, 4.0, iter, n);

    for j in 1..=n {
        for i in 1..=n {
            vx[idx(i, j, n)] -= 0.5 * (p[idx(i + 1, j, n)] - p[idx(i - 1, j, n)]) / h;
            vy[idx(i, j, n)] -= 0.5 * (p[idx(i, j + 1, n)] - p[idx(i, j - 1, n)]) / h;
        }
    }
    set_bnd(FieldType::Vx, vx, n);
    set_bnd(FieldType::Vy, vy, n);
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 16;
    const SIZE: usize = (N + 2) * (N + 2);

    #[test]
    fn test_lin_solve_spreads_spike() {
        let mut x0 = vec![0.0; SIZE];
        let mid = N / 2;
        x0[idx(mid, mid, N)] = 100.0;
        let mut x = x0.clone();

        lin_solve(FieldType::Scalar, &mut x, &x0, 1.0, 5.0, 20, N);

        let center = x[idx(mid, mid, N)];
        let neighbor = x[idx(mid + 1, mid, N)];
        assert!(center > 0.0, "center should stay positive, got {center}");
        assert!(neighbor > 0.0, "neighbors should pick up value, got {neighbor}");
        assert!(center > neighbor, "center should dominate: {center} vs {neighbor}");
    }

    #[test]
    fn test_lin_solve_zero_rhs_stays_zero() {
        let x0 = vec![0.0; SIZE];
        let mut x = vec![0.0; SIZE];
        lin_solve(FieldType::Scalar, &mut x, &x0, 1.0, 4.0, 20, N);
        assert!(x.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_diffuse_smooths_spike() {
        let mut x0 = vec![0.0; SIZE];
        let mid = N / 2;
        x0[idx(mid, mid, N)] = 100.0;
        let mut x = vec![0.0; SIZE];

        diffuse(FieldType::Scalar, &mut x, &x0, 0.1, 0.1, 20, N);

        let center = x[idx(mid, mid, N)];
        let neighbor = x[idx(mid + 1, mid, N)];
        assert!(center < 100.0, "spike should shrink, got {center}");
        assert!(neighbor > 0.0, "neighbors should gain, got {neighbor}");
    }

    #[test]
    fn test_diffuse_zero_rate_is_identity() {
        let mut x0 = vec![0.0; SIZE];
        for j in 1..=N {
            for i in 1..=N {
                x0[idx(i, j, N)] = (i * j) as f64;
            }
        }
        let mut x = vec![0.0; SIZE];
        diffuse(FieldType::Scalar, &mut x, &x0, 0.0, 0.01, 20, N);
        for j in 1..=N {
            for i in 1..=N {
                assert_eq!(x[idx(i, j, N)], x0[idx(i, j, N)], "cell ({i}, {j})");
            }
        }
    }

    #[test]
    fn test_advect_zero_velocity_preserves_interior() {
        let mut d0 = vec![0.0; SIZE];
        for j in 1..=N {
            for i in 1..=N {
                d0[idx(i, j, N)] = i as f64 / N as f64;
            }
        }
        let mut d = vec![0.0; SIZE];
        let vx = vec![0.0; SIZE];
        let vy = vec![0.0; SIZE];

        advect(FieldType::Scalar, &mut d, &d0, &vx, &vy, 0.1, N);

        for j in 1..=N {
            for i in 1..=N {
                let orig = d0[idx(i, j, N)];
                let moved = d[idx(i, j, N)];
                assert!(
                    (orig - moved).abs() < 1e-12,
                    "zero velocity should preserve ({i}, {j}): {orig} vs {moved}"
                );
            }
        }
    }

    #[test]
    fn test_advect_uniform_field_unchanged() {
        let d0 = vec![5.0; SIZE];
        let mut d = vec![0.0; SIZE];
        let vx = vec![0.3; SIZE];
        let vy = vec![-0.2; SIZE];

        advect(FieldType::Scalar, &mut d, &d0, &vx, &vy, 0.1, N);

        for j in 1..=N {
            for i in 1..=N {
                let v = d[idx(i, j, N)];
                assert!((v - 5.0).abs() < 1e-12, "uniform field drifted to {v} at ({i}, {j})");
            }
        }
    }

    #[test]
    fn test_advect_never_overshoots_source_range() {
        let mut d0 = vec![0.0; SIZE];
        let mut vx = vec![0.0; SIZE];
        let mut vy = vec![0.0; SIZE];
        for j in 0..N + 2 {
            for i in 0..N + 2 {
                let ii = idx(i, j, N);
                d0[ii] = ((i * 7 + j * 13) % 11) as f64;
                vx[ii] = ((i as f64) - (N as f64 / 2.0)) * 3.0;
                vy[ii] = ((j as f64) - (N as f64 / 2.0)) * -3.0;
            }
        }
        let lo = d0.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = d0.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut d = vec![0.0; SIZE];

        // Large dt so most backtraces hit the clamp.
        advect(FieldType::Scalar, &mut d, &d0, &vx, &vy, 2.0, N);

        for j in 1..=N {
            for i in 1..=N {
                let v = d[idx(i, j, N)];
                assert!(
                    v >= lo - 1e-12 && v <= hi + 1e-12,
                    "interpolation overshot source range at ({i}, {j}): {v} not in [{lo}, {hi}]"
                );
            }
        }
    }

    #[test]
    fn test_project_reduces_divergence() {
        let mut vx = vec![0.0; SIZE];
        let mut vy = vec![0.0; SIZE];
        let mut p = vec![0.0; SIZE];
        let mut div = vec![0.0; SIZE];

        // Radially expanding field: strongly divergent.
        let c = (N / 2) as f64;
        for j in 1..=N {
            for i in 1..=N {
                let dx = i as f64 - c;
                let dy = j as f64 - c;
                let r2 = dx * dx + dy * dy;
                let sigma = (N * N) as f64 / 32.0;
                vx[idx(i, j, N)] = dx * 0.01 * (-r2 / sigma).exp();
                vy[idx(i, j, N)] = dy * 0.01 * (-r2 / sigma).exp();
            }
        }

        let total_div = |vx: &[f64], vy: &[f64]| {
            let mut sum = 0.0;
            for j in 2..N {
                for i in 2..N {
                    let d = (vx[idx(i + 1, j, N)] - vx[idx(i - 1, j, N)])
                        + (vy[idx(i, j + 1, N)] - vy[idx(i, j - 1, N)]);
                    sum += d.abs();
                }
            }
            sum
        };

        let before = total_div(&vx, &vy);
        assert!(before > 0.0, "test field should start divergent");

        project(&mut vx, &mut vy, &mut p, &mut div, 40, N);

        let after = total_div(&vx, &vy);
        assert!(after < before, "divergence should drop: before = {before}, after = {after}");
    }

    #[test]
    fn test_project_zero_field_stays_zero() {
        let mut vx = vec![0.0; SIZE];
        let mut vy = vec![0.0; SIZE];
        let mut p = vec![0.0; SIZE];
        let mut div = vec![0.0; SIZE];
        project(&mut vx, &mut vy, &mut p, &mut div, 20, N);
        assert!(vx.iter().all(|&v| v == 0.0));
        assert!(vy.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_project_restores_wall_reflection() {
        let mut vx = vec![0.0; SIZE];
        let mut vy = vec![0.0; SIZE];
        let mut p = vec![0.0; SIZE];
        let mut div = vec![0.0; SIZE];
        vx[idx(N / 2, N / 2, N)] = 3.0;
        vy[idx(N / 2, N / 2, N)] = -4.0;

        project(&mut vx, &mut vy, &mut p, &mut div, 20, N);

        for k in 1..=N {
            assert_eq!(vx[idx(0, k, N)], -vx[idx(1, k, N)], "left wall at y = {k}");
            assert_eq!(vx[idx(N + 1, k, N)], -vx[idx(N, k, N)], "right wall at y = {k}");
            assert_eq!(vy[idx(k, 0, N)], -vy[idx(k, 1, N)], "bottom wall at x = {k}");
            assert_eq!(vy[idx(k, N + 1, N)], -vy[idx(k, N, N)], "top wall at x = {k}");
        }
    }
}
