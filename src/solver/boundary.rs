use crate::sim::idx;

/// Field type for boundary condition dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Scalar,
    Vx,
    Vy,
}

/// Enforce wall conditions on the one-cell boundary ring.
///
/// Scalars get zero-gradient walls (each edge cell copies its interior
/// neighbor, so nothing fluxes through). Velocity components are negated
/// across the wall they are normal to (no penetration) and copied along the
/// walls they are tangential to. Corners average their two edge neighbors.
pub fn set_bnd(field: FieldType, x: &mut [f64], n: usize) {
    for k in 1..=n {
        // Left/right walls: x is the normal direction.
        let (l, r) = match field {
            FieldType::Vx => (-x[idx(1, k, n)], -x[idx(n, k, n)]),
            _ => (x[idx(1, k, n)], x[idx(n, k, n)]),
        };
        x[idx(0, k, n)] = l;
        x[idx(n + 1, k, n)] = r;

        // Bottom/top walls: y is the normal direction.
        let (b, t) = match field {
            FieldType::Vy => (-x[idx(k, 1, n)], -x[idx(k, n, n)]),
            _ => (x[idx(k, 1, n)], x[idx(k, n, n)]),
        };
        x[idx(k, 0, n)] = b;
        x[idx(k, n + 1, n)] = t;
    }

    x[idx(0, 0, n)] = 0.5 * (x[idx(1, 0, n)] + x[idx(0, 1, n)]);
    x[idx(0, n + 1, n)] = 0.5 * (x[idx(1, n + 1, n)] + x[idx(0, n, n)]);
    x[idx(n + 1, 0, n)] = 0.5 * (x[idx(n, 0, n)] + x[idx(n + 1, 1, n)]);
    x[idx(n + 1, n + 1, n)] = 0.5 * (x[idx(n, n + 1, n)] + x[idx(n + 1, n, n)]);
}
