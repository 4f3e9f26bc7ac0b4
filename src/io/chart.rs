//! Suggested display styling per compartment, for direct consumption by a
//! charting layer. Labels and colors follow the reference dashboards.

use serde::Serialize;

use crate::model::Variant;

/// Display styling for one compartment series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesStyle {
    pub key: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

pub const SIRD_SERIES: [SeriesStyle; 3] = [
    SeriesStyle {
        key: "S",
        label: "Susceptibles",
        color: "#1f77b4",
    },
    SeriesStyle {
        key: "I",
        label: "Infectados",
        color: "#ff7f0e",
    },
    SeriesStyle {
        key: "R",
        label: "Recuperados",
        color: "#2ca02c",
    },
];

pub const SLIRD_SERIES: [SeriesStyle; 4] = [
    SeriesStyle {
        key: "S",
        label: "Susceptibles",
        color: "#1f77b4",
    },
    SeriesStyle {
        key: "L",
        label: "Latentes",
        color: "#ff7f0e",
    },
    SeriesStyle {
        key: "I",
        label: "Infectados",
        color: "#d62728",
    },
    SeriesStyle {
        key: "R",
        label: "Recuperados",
        color: "#2ca02c",
    },
];

/// Styling for `variant`'s compartments, in state-vector order.
pub fn series_for(variant: Variant) -> &'static [SeriesStyle] {
    match variant {
        Variant::Sird => &SIRD_SERIES,
        Variant::Slird => &SLIRD_SERIES,
    }
}
