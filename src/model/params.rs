use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Model variant selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// Susceptible / Infected / Recovered, with implicit death via `delta`.
    #[serde(rename = "SIRD")]
    Sird,
    /// SIRD plus a Latent (exposed, not yet infectious) compartment.
    #[serde(rename = "SLIRD")]
    Slird,
}

impl Variant {
    pub fn parse(tag: &str) -> SimResult<Self> {
        match tag {
            "SIRD" => Ok(Variant::Sird),
            "SLIRD" => Ok(Variant::Slird),
            other => Err(SimError::InvalidVariant(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Sird => "SIRD",
            Variant::Slird => "SLIRD",
        }
    }

    /// Number of compartments in the state vector.
    pub fn dim(self) -> usize {
        match self {
            Variant::Sird => 3,
            Variant::Slird => 4,
        }
    }

    /// Compartment keys in state-vector order.
    pub fn compartments(self) -> &'static [&'static str] {
        match self {
            Variant::Sird => &["S", "I", "R"],
            Variant::Slird => &["S", "L", "I", "R"],
        }
    }

    /// Parameter names this variant requires, in canonical order.
    pub fn parameter_names(self) -> &'static [&'static str] {
        match self {
            Variant::Sird => &["beta", "rho", "delta", "alpha", "lambda"],
            Variant::Slird => &["beta", "rho", "delta", "alpha", "lambda", "gamma"],
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Step granularity the interactive parameter inputs are expected to use.
/// The engine itself accepts arbitrary finite reals.
pub const PARAM_STEP: f64 = 0.01;

/// Rate constants governing compartment transitions, per time unit.
///
/// Biologically valid values are non-negative; the engine only requires
/// finiteness and leaves the rest to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Contact (transmission) rate.
    pub beta: f64,
    /// Recovery rate.
    pub rho: f64,
    /// Mortality rate.
    pub delta: f64,
    /// Birth/replenishment inflow into the susceptible pool.
    pub alpha: f64,
    /// Reinfection rate (loss of immunity, R back to S).
    pub lambda: f64,
    /// Latency-to-infectious progression rate. Required iff SLIRD.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
}

impl Params {
    /// Documented defaults (beta 0.3, rho 0.1, delta 0.05, alpha 0.01,
    /// lambda 0.01, gamma 0.1 when the variant has a latent stage).
    pub fn default_for(variant: Variant) -> Self {
        Self {
            beta: 0.3,
            rho: 0.1,
            delta: 0.05,
            alpha: 0.01,
            lambda: 0.01,
            gamma: match variant {
                Variant::Sird => None,
                Variant::Slird => Some(0.1),
            },
        }
    }

    /// Named (name, value) view in canonical order. `gamma` appears only
    /// when set.
    pub fn named(&self) -> Vec<(&'static str, f64)> {
        let mut out = vec![
            ("beta", self.beta),
            ("rho", self.rho),
            ("delta", self.delta),
            ("alpha", self.alpha),
            ("lambda", self.lambda),
        ];
        if let Some(g) = self.gamma {
            out.push(("gamma", g));
        }
        out
    }

    /// Build from a name -> value mapping for `variant`. Missing required
    /// names and unrecognized extras are both rejected with the offending
    /// field name.
    pub fn from_named(variant: Variant, named: &BTreeMap<String, f64>) -> SimResult<Self> {
        let required = variant.parameter_names();
        for key in named.keys() {
            if !required.contains(&key.as_str()) {
                return Err(SimError::UnknownParameter { name: key.clone() });
            }
        }
        let get = |name: &'static str| -> SimResult<f64> {
            named
                .get(name)
                .copied()
                .ok_or(SimError::MissingParameter { name })
        };
        let params = Self {
            beta: get("beta")?,
            rho: get("rho")?,
            delta: get("delta")?,
            alpha: get("alpha")?,
            lambda: get("lambda")?,
            gamma: match variant {
                Variant::Sird => None,
                Variant::Slird => Some(get("gamma")?),
            },
        };
        params.check(variant)?;
        Ok(params)
    }

    /// Validate shape against `variant` and reject non-finite values.
    pub fn check(&self, variant: Variant) -> SimResult<()> {
        match variant {
            Variant::Sird => {
                if self.gamma.is_some() {
                    return Err(SimError::UnknownParameter {
                        name: "gamma".to_string(),
                    });
                }
            }
            Variant::Slird => {
                if self.gamma.is_none() {
                    return Err(SimError::MissingParameter { name: "gamma" });
                }
            }
        }
        for (name, value) in self.named() {
            if !value.is_finite() {
                return Err(SimError::NonFiniteParameter { name, value });
            }
        }
        Ok(())
    }
}
