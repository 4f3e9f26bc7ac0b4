//! SIRD rate law. State vector is `[S, I, R]`; death is implicit removal
//! through `delta`.

use super::Params;

pub const DIM: usize = 3;

/// Default initial condition: 1% infected seed, mass sums to 1.
pub const INITIAL: [f64; DIM] = [0.99, 0.01, 0.0];

/// Coupled rates of change. `_t` is a formal argument for integrator-interface
/// uniformity; the system is autonomous.
pub fn deriv(p: &Params, _t: f64, y: &[f64], dy: &mut [f64]) {
    let (s, i, r) = (y[0], y[1], y[2]);
    dy[0] = p.alpha - p.beta * s * i + p.lambda * r;
    dy[1] = p.beta * s * i - p.delta * i - p.rho * i;
    dy[2] = p.rho * i - p.lambda * r;
}
