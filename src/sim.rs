//! Simulation driver: validate-then-compute orchestration of one request.
//!
//! The driver owns no state across calls; every run gets its own grid,
//! parameters, and output. Concurrent runs are safe as long as each call
//! receives its own inputs.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::io::chart;
use crate::math::ode::{rk4_step_ws, Rk4Workspace};
use crate::model::{EpiModel, Params, Variant};

/// Sampling grid: `samples` evenly spaced points from `start` to `end`,
/// both inclusive (linspace semantics).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    pub start: f64,
    pub end: f64,
    pub samples: usize,
}

impl Default for TimeGrid {
    /// 160 points over [0, 160], matching the reference dashboards.
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 160.0,
            samples: 160,
        }
    }
}

impl TimeGrid {
    pub fn new(start: f64, end: f64, samples: usize) -> Self {
        Self {
            start,
            end,
            samples,
        }
    }

    pub fn check(&self) -> SimResult<()> {
        if self.samples < 2 {
            return Err(SimError::DegenerateGrid {
                reason: "fewer than two sample points",
            });
        }
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(SimError::DegenerateGrid {
                reason: "non-finite bounds",
            });
        }
        if self.end <= self.start {
            return Err(SimError::DegenerateGrid {
                reason: "end must be greater than start",
            });
        }
        Ok(())
    }

    /// Materialize the sample points. The last point is pinned to `end`
    /// exactly rather than accumulated from the step. Degenerate sample
    /// counts (which `check` rejects) yield a short vector instead of
    /// underflowing.
    pub fn points(&self) -> Vec<f64> {
        let step = (self.end - self.start) / (self.samples.max(2) - 1) as f64;
        (0..self.samples)
            .map(|k| {
                if k == self.samples - 1 {
                    self.end
                } else {
                    self.start + step * k as f64
                }
            })
            .collect()
    }
}

/// One compartment's sampled values, tagged for the charting layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub key: &'static str,
    pub label: &'static str,
    pub color: &'static str,
    pub values: Vec<f64>,
}

/// The time-sampled output of one run. Immutable after construction; the
/// engine keeps no copy once it is handed to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    pub variant: Variant,
    pub params: Params,
    pub t: Vec<f64>,
    /// One entry per compartment, in state-vector order, aligned 1:1 with `t`.
    pub series: Vec<Series>,
    /// Advisory notes (e.g. numerical instability); never fatal.
    pub warnings: Vec<String>,
}

impl Trajectory {
    /// Look up a series by compartment key ("S", "L", "I", "R").
    pub fn compartment(&self, key: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.key == key)
    }
}

/// One-shot simulation driver. All fatal validation happens before any
/// integration work; a run either returns a complete [`Trajectory`] or a
/// [`SimError`].
#[derive(Debug, Clone)]
pub struct Simulation {
    pub grid: TimeGrid,
    /// Clamp compartments at zero after each step. Off by default: the rate
    /// equations are unclamped and reference trajectories may dip below zero.
    pub clamp_non_negative: bool,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            grid: TimeGrid::default(),
            clamp_non_negative: false,
        }
    }
}

impl Simulation {
    pub fn new(grid: TimeGrid) -> Self {
        Self {
            grid,
            clamp_non_negative: false,
        }
    }

    /// Run one simulation for `variant` with `params`.
    pub fn run(&self, variant: Variant, params: Params) -> SimResult<Trajectory> {
        self.run_impl(variant, params, None)
    }

    /// Like [`run`](Self::run), but checks `cancel` between integration
    /// steps and bails out with [`SimError::Cancelled`] once it is set.
    pub fn run_with_cancel(
        &self,
        variant: Variant,
        params: Params,
        cancel: &AtomicBool,
    ) -> SimResult<Trajectory> {
        self.run_impl(variant, params, Some(cancel))
    }

    /// Boundary entry point: a variant tag plus a name -> value mapping, as
    /// supplied by an interactive shell.
    pub fn run_named(
        &self,
        variant_tag: &str,
        named: &BTreeMap<String, f64>,
    ) -> SimResult<Trajectory> {
        let variant = Variant::parse(variant_tag)?;
        let params = Params::from_named(variant, named)?;
        self.run(variant, params)
    }

    fn run_impl(
        &self,
        variant: Variant,
        params: Params,
        cancel: Option<&AtomicBool>,
    ) -> SimResult<Trajectory> {
        self.grid.check()?;
        let model = EpiModel::new(variant, params)?;

        let t = self.grid.points();
        let mut y = model.initial_state();
        let mut states = Vec::with_capacity(t.len());
        states.push(y.clone());

        let mut ws = Rk4Workspace::new(y.len());
        let mut non_finite = false;
        for w in t.windows(2) {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    return Err(SimError::Cancelled);
                }
            }
            rk4_step_ws(&mut y, w[0], w[1] - w[0], &mut ws, |tt, s, dy| {
                model.deriv(tt, s, dy)
            });
            if self.clamp_non_negative {
                for v in y.iter_mut() {
                    if *v < 0.0 {
                        *v = 0.0;
                    }
                }
            }
            if !non_finite && y.iter().any(|v| !v.is_finite()) {
                non_finite = true;
            }
            states.push(y.clone());
        }

        let mut warnings = Vec::new();
        if non_finite {
            warnings.push(
                "non-finite state encountered during integration; \
                 trajectory accuracy is degraded"
                    .to_string(),
            );
        }

        let series = chart::series_for(variant)
            .iter()
            .enumerate()
            .map(|(idx, style)| Series {
                key: style.key,
                label: style.label,
                color: style.color,
                values: states.iter().map(|s| s[idx]).collect(),
            })
            .collect();

        Ok(Trajectory {
            variant,
            params: model.params().clone(),
            t,
            series,
            warnings,
        })
    }
}
