pub mod params;
pub mod sird;
pub mod slird;

pub use params::{Params, Variant, PARAM_STEP};

use crate::error::{SimError, SimResult};
use crate::math::ode::integrate_grid;

/// A model variant bound to a validated parameter set. Construction is the
/// validation boundary: an `EpiModel` always holds parameters whose shape
/// matches its variant and whose values are finite.
#[derive(Debug, Clone)]
pub struct EpiModel {
    variant: Variant,
    params: Params,
    // Unwrapped at construction; 0.0 (unused) for SIRD.
    gamma: f64,
}

impl EpiModel {
    pub fn new(variant: Variant, params: Params) -> SimResult<Self> {
        params.check(variant)?;
        let gamma = params.gamma.unwrap_or(0.0);
        Ok(Self {
            variant,
            params,
            gamma,
        })
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Number of compartments in the state vector.
    pub fn dim(&self) -> usize {
        self.variant.dim()
    }

    /// Fixed default initial condition for this variant (population mass
    /// sums to 1, with a 1% infected seed).
    pub fn initial_state(&self) -> Vec<f64> {
        match self.variant {
            Variant::Sird => sird::INITIAL.to_vec(),
            Variant::Slird => slird::INITIAL.to_vec(),
        }
    }

    /// Rates of change at `(t, y)`, written into `dy`. Pure and
    /// deterministic; safe to call any number of times per step.
    pub fn deriv(&self, t: f64, y: &[f64], dy: &mut [f64]) {
        match self.variant {
            Variant::Sird => sird::deriv(&self.params, t, y, dy),
            Variant::Slird => slird::deriv(&self.params, self.gamma, t, y, dy),
        }
    }

    /// Integrate from an arbitrary initial state over an explicit grid,
    /// returning one state per grid point (the first is `y0` verbatim).
    /// Compartment values are not clamped to any physical range.
    pub fn integrate(&self, y0: &[f64], grid: &[f64]) -> SimResult<Vec<Vec<f64>>> {
        if y0.len() != self.dim() {
            return Err(SimError::DimensionMismatch {
                expected: self.dim(),
                got: y0.len(),
            });
        }
        if grid.len() < 2 {
            return Err(SimError::DegenerateGrid {
                reason: "fewer than two sample points",
            });
        }
        if grid.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(SimError::DegenerateGrid {
                reason: "sample points are not strictly increasing",
            });
        }
        Ok(integrate_grid(y0, grid, |t, y, dy| self.deriv(t, y, dy)))
    }
}
