use crate::error::{AdvisorError, Result};
use crate::network::sample::NetworkSample;
use serde::{Deserialize, Serialize};

/// Energy units per Mbps of uptime-weighted bandwidth.
pub const ENERGY_SCALE: f64 = 0.1;

/// Aggregate energy usage of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyEstimate {
    pub avg_energy_usage: f64,
    pub total_energy_usage: f64,
}

/// Per-row energy usage: `bandwidth * uptime * ENERGY_SCALE`.
pub fn energy_usage(sample: &NetworkSample) -> f64 {
    sample.bandwidth * sample.uptime * ENERGY_SCALE
}

/// Averages and sums [`energy_usage`] over `samples`. No model is involved.
///
/// # Errors
/// [`AdvisorError::EmptyData`] when `samples` is empty.
pub fn analyze_energy_efficiency(samples: &[NetworkSample]) -> Result<EnergyEstimate> {
    if samples.is_empty() {
        return Err(AdvisorError::EmptyData(
            "energy estimate needs at least one row".into(),
        ));
    }
    let total: f64 = samples.iter().map(energy_usage).sum();
    Ok(EnergyEstimate {
        avg_energy_usage: total / samples.len() as f64,
        total_energy_usage: total,
    })
}
