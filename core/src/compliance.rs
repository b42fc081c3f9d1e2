use serde::{Deserialize, Serialize};

use crate::plan::Plan;
use crate::types::Observation;

/// Hvor stor del av økta pulsen lå i planens sone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub in_zone: u32,
    pub samples: u32,
    pub percentage: u32, // 0–100
    pub score: u32,      // prosent * 10
}

/// Score observasjonene mot planens (ikke live) grenser.
pub fn score_compliance(plan: &Plan, observations: &[Observation]) -> ComplianceReport {
    if plan.is_empty() || observations.is_empty() {
        return ComplianceReport::default();
    }
    let in_zone = observations
        .iter()
        .filter(|o| {
            let s = &plan.samples()[plan.index_for_observation(o.elapsed_seconds)];
            let hr = f64::from(o.hr);
            s.lower_bound <= hr && hr <= s.upper_bound
        })
        .count() as u32;
    report(in_zone, observations.len() as u32)
}

pub fn report(in_zone: u32, samples: u32) -> ComplianceReport {
    if samples == 0 {
        return ComplianceReport::default();
    }
    let percentage = (100.0 * f64::from(in_zone) / f64::from(samples)).round() as u32;
    ComplianceReport { in_zone, samples, percentage, score: percentage * 10 }
}
