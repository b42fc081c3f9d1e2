use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use serde::Deserialize;
use serde_json as json;
use serde_path_to_error as spte;

use crate::compliance::score_compliance;
use crate::config::SessionFile;
use crate::phase_clock::PhaseClock;
use crate::plan::generate;
use crate::types::{Observation, UserPhysiology};

// ──────────────────────────────────────────────────────────────────────────────
// JSON-ruter (rene Rust-funksjoner, testbare uten Python)
// ──────────────────────────────────────────────────────────────────────────────

fn plan_from_json(json_in: &str) -> Result<String, String> {
    let file = SessionFile::from_json_str(json_in).map_err(|e| e.to_string())?;
    let phys = file.physiology_or(UserPhysiology::default());
    let cfg = file.workout.resolve();
    let plan = generate(&cfg, &phys).map_err(|e| e.to_string())?;
    json::to_string(&plan).map_err(|e| e.to_string())
}

#[derive(Debug, Deserialize)]
struct ScoreIn {
    #[serde(flatten)]
    session: SessionFile,
    /// Én puls per sekund, fra sekund 1
    hr: Vec<u16>,
}

fn score_from_json(json_in: &str) -> Result<String, String> {
    let mut de = json::Deserializer::from_str(json_in);
    let parsed: ScoreIn = spte::deserialize(&mut de)
        .map_err(|e| format!("parse error (ScoreIn) at {}: {}", e.path(), e.inner()))?;

    let phys = parsed.session.physiology_or(UserPhysiology::default());
    let cfg = parsed.session.workout.resolve();
    let plan = generate(&cfg, &phys).map_err(|e| e.to_string())?;
    let clock = PhaseClock::new(&cfg, &phys).map_err(|e| e.to_string())?;

    let observations: Vec<Observation> = parsed
        .hr
        .iter()
        .enumerate()
        .map_while(|(i, &hr)| {
            let elapsed = i as u32 + 1;
            clock.phase_at(elapsed).map(|(phase, _)| Observation { elapsed_seconds: elapsed, hr, phase })
        })
        .collect();

    json::to_string(&score_compliance(&plan, &observations)).map_err(|e| e.to_string())
}

// ──────────────────────────────────────────────────────────────────────────────
// PyO3-MODUL
// ──────────────────────────────────────────────────────────────────────────────

#[pyfunction]
fn generate_plan_json(json_in: &str) -> PyResult<String> {
    plan_from_json(json_in).map_err(PyValueError::new_err)
}

#[pyfunction]
fn score_compliance_json(json_in: &str) -> PyResult<String> {
    score_from_json(json_in).map_err(PyValueError::new_err)
}

#[pymodule]
fn hr_interval_core(_py: Python, m: &PyModule) -> PyResult<()> {
    // Plan som JSON (samples + segmentering)
    m.add_function(wrap_pyfunction!(generate_plan_json, m)?)?;

    // Compliance for en innspilt pulsserie
    m.add_function(wrap_pyfunction!(score_compliance_json, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_route_emits_samples() {
        let out = plan_from_json(r#"{"workout": {"duration_minutes": 10, "peak_count": 2}}"#).unwrap();
        let v: json::Value = json::from_str(&out).unwrap();
        assert!(v["samples"].as_array().unwrap().len() > 100);
    }

    #[test]
    fn score_route_reports_path_on_bad_input() {
        let err = score_from_json(r#"{"workout": {}, "hr": ["x"]}"#).unwrap_err();
        assert!(err.contains("hr"), "{err}");
    }
}
