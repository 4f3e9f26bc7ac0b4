//! SLIRD rate law. State vector is `[S, L, I, R]`: exposure lands in the
//! latent compartment, which feeds the infectious one at rate `gamma`.

use super::Params;

pub const DIM: usize = 4;

/// Default initial condition: 1% infected seed, empty latent pool.
pub const INITIAL: [f64; DIM] = [0.99, 0.0, 0.01, 0.0];

/// Coupled rates of change; `gamma` is passed unwrapped since shape
/// validation has already required it.
pub fn deriv(p: &Params, gamma: f64, _t: f64, y: &[f64], dy: &mut [f64]) {
    let (s, l, i, r) = (y[0], y[1], y[2], y[3]);
    dy[0] = p.alpha - p.beta * s * i + p.lambda * r;
    dy[1] = p.beta * s * i - gamma * l;
    dy[2] = gamma * l - p.delta * i - p.rho * i;
    dy[3] = p.rho * i - p.lambda * r;
}
