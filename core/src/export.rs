// core/src/export.rs
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::plan::Plan;
use crate::session::SessionSummary;
use crate::types::{Phase, UserPhysiology, WorkoutConfig};

/// Resultatfil for gjennomgang i etterkant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutResults {
    pub created_at: DateTime<Utc>,
    pub physiology: UserPhysiology,
    pub config: WorkoutConfig,
    pub avg_hr: Option<f64>,
    pub max_hr: Option<u16>,
    pub min_hr: Option<u16>,
    pub total_elapsed: u32,
    pub compliance_percentage: u32,
    pub score: u32,
    // parallelle serier, én rad per registrert sekund
    pub time: Vec<u32>,
    pub hr: Vec<u16>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub phase: Vec<Phase>,
}

impl WorkoutResults {
    pub fn build(
        created_at: DateTime<Utc>,
        physiology: &UserPhysiology,
        plan: &Plan,
        summary: &SessionSummary,
    ) -> Self {
        let history = &summary.history;
        let bounds: Vec<(f64, f64)> = history
            .iter()
            .map(|o| {
                let s = &plan.samples()[plan.index_for_observation(o.elapsed_seconds)];
                (s.lower_bound, s.upper_bound)
            })
            .collect();

        Self {
            created_at,
            physiology: *physiology,
            config: *plan.config(),
            avg_hr: summary.avg_hr,
            max_hr: summary.max_hr,
            min_hr: summary.min_hr,
            total_elapsed: summary.total_elapsed,
            compliance_percentage: summary.compliance.percentage,
            score: summary.compliance.score,
            time: history.iter().map(|o| o.elapsed_seconds).collect(),
            hr: history.iter().map(|o| o.hr).collect(),
            lower: bounds.iter().map(|b| b.0).collect(),
            upper: bounds.iter().map(|b| b.1).collect(),
            phase: history.iter().map(|o| o.phase).collect(),
        }
    }

    /// `hr-workout-YYYYMMDD-HHMMSS`
    pub fn file_stem(&self) -> String {
        format!("hr-workout-{}", self.created_at.format("%Y%m%d-%H%M%S"))
    }

    pub fn write_json(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let path = dir.as_ref().join(format!("{}.json", self.file_stem()));
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        info!("results written to {}", path.display());
        Ok(path)
    }

    pub fn write_csv(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        #[derive(Serialize)]
        struct Row {
            time: u32,
            hr: u16,
            lower: f64,
            upper: f64,
            phase: Phase,
        }

        let n = self.time.len();
        if [self.hr.len(), self.lower.len(), self.upper.len(), self.phase.len()]
            .iter()
            .any(|&len| len != n)
        {
            return Err(ExportError::SeriesLength {
                time: n,
                hr: self.hr.len(),
                lower: self.lower.len(),
                upper: self.upper.len(),
                phase: self.phase.len(),
            });
        }

        let path = dir.as_ref().join(format!("{}.csv", self.file_stem()));
        let mut wtr = csv::Writer::from_path(&path)?;
        let rows = self.time.iter().zip(&self.hr).zip(&self.lower).zip(&self.upper).zip(&self.phase);
        for ((((&time, &hr), &lower), &upper), &phase) in rows {
            wtr.serialize(Row { time, hr, lower, upper, phase })?;
        }
        wtr.flush()?;
        info!("series written to {}", path.display());
        Ok(path)
    }

    pub fn read_json(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
