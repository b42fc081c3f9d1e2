use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_path_to_error as spte;

use crate::error::ConfigError;
use crate::types::{Level, UserPhysiology, WorkoutConfig};

pub const DEFAULT_PEAK_COUNT: u32 = 3;
pub const DEFAULT_DURATION_MINUTES: u32 = 20;
pub const MAX_PEAK_COUNT: u32 = 20;
pub const MAX_DURATION_MINUTES: u32 = 300;
pub const DEFAULT_PREVIEW_SECONDS: u64 = 5;

/// Hvile vektes 0.75 av en topp.
const REST_WEIGHT: f64 = 0.75;
/// Korteste topp/hvile i sekunder.
const MIN_INTERVAL_SECONDS: u32 = 30;

/// Ønsket økt slik brukeren oppgir den. Alt er valgfritt og klemmes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutRequest {
    #[serde(default, alias = "durationMinutes", alias = "duration")]
    pub duration_minutes: Option<i64>,
    #[serde(default, alias = "peakCount", alias = "peaks")]
    pub peak_count: Option<i64>,
    #[serde(default)]
    pub level: Level,
}

impl WorkoutRequest {
    pub fn new(duration_minutes: i64, peak_count: i64, level: Level) -> Self {
        Self {
            duration_minutes: Some(duration_minutes),
            peak_count: Some(peak_count),
            level,
        }
    }

    /// Klem input til trygge verdier og alloker varigheter.
    pub fn resolve(&self) -> WorkoutConfig {
        let minutes = clamp_or_default(
            "duration_minutes",
            self.duration_minutes,
            DEFAULT_DURATION_MINUTES,
            MAX_DURATION_MINUTES,
        );
        let peaks = clamp_or_default("peak_count", self.peak_count, DEFAULT_PEAK_COUNT, MAX_PEAK_COUNT);
        allocate(minutes * 60, peaks, self.level)
    }
}

fn clamp_or_default(field: &str, value: Option<i64>, default: u32, max: u32) -> u32 {
    match value {
        Some(v) if v >= 1 && v <= i64::from(max) => v as u32,
        Some(v) if v > i64::from(max) => {
            warn!("{field}={v} above limit, clamping to {max}");
            max
        }
        Some(v) => {
            warn!("{field}={v} is invalid, using default {default}");
            default
        }
        None => default,
    }
}

/// Fordel total varighet (sek) på oppvarming, topper, hviler og nedkjøling.
///
/// 20 % går til oppvarming+nedkjøling (delt likt), resten fordeles på
/// `n` topper og `n-1` hviler der en hvile teller 0.75 topp.
pub fn allocate(total_seconds: u32, peak_count: u32, level: Level) -> WorkoutConfig {
    let n = peak_count.max(1);
    let warmup_and_cooldown = total_seconds / 5; // floor(0.20 * T)
    let edge = (warmup_and_cooldown / 2).max(1);
    let peak_and_rest = total_seconds - warmup_and_cooldown;

    let cycle_units = f64::from(n) + f64::from(n - 1) * REST_WEIGHT;
    let peak = ((f64::from(peak_and_rest) / cycle_units).floor() as u32).max(MIN_INTERVAL_SECONDS);
    let rest = (peak * 3 / 4).max(MIN_INTERVAL_SECONDS);

    debug!(
        "allocate T={total_seconds}s n={n}: warmup={edge}s peak={peak}s rest={rest}s cooldown={edge}s"
    );

    WorkoutConfig {
        level,
        peak_count: n,
        warmup_seconds: edge,
        cooldown_seconds: edge,
        peak_duration_seconds: peak,
        rest_duration_seconds: rest,
    }
}

/// Øktfil (JSON) for binæren og Python-bindingen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionFile {
    #[serde(default)]
    pub profile: Option<UserPhysiology>,
    #[serde(default)]
    pub workout: WorkoutRequest,
    #[serde(default)]
    pub preview_seconds: Option<u64>,
}

impl SessionFile {
    pub fn from_json_str(json_in: &str) -> Result<Self, ConfigError> {
        let mut de = serde_json::Deserializer::from_str(json_in);
        spte::deserialize(&mut de).map_err(|e| ConfigError::Parse {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Profil fra fila, eller `fallback` hvis den mangler/er ugyldig.
    pub fn physiology_or(&self, fallback: UserPhysiology) -> UserPhysiology {
        match self.profile {
            Some(p) => match p.validate() {
                Ok(()) => p,
                Err(e) => {
                    warn!("ignoring profile from session file: {e}");
                    fallback
                }
            },
            None => fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_for_twenty_minutes_three_peaks() {
        let cfg = allocate(1200, 3, Level::Medium);
        assert_eq!(cfg.warmup_seconds, 120);
        assert_eq!(cfg.cooldown_seconds, 120);
        // 960 / 4.5 = 213.33
        assert_eq!(cfg.peak_duration_seconds, 213);
        // floor(213 * 0.75) = 159
        assert_eq!(cfg.rest_duration_seconds, 159);
    }

    #[test]
    fn short_workouts_hit_the_minimums() {
        let cfg = allocate(60, 5, Level::Easy);
        assert_eq!(cfg.peak_duration_seconds, 30);
        assert_eq!(cfg.rest_duration_seconds, 30);
        assert_eq!(cfg.warmup_seconds, 6);

        let tiny = allocate(5, 1, Level::Easy);
        assert_eq!(tiny.warmup_seconds, 1);
    }

    #[test]
    fn invalid_request_falls_back_to_defaults() {
        let req = WorkoutRequest {
            duration_minutes: Some(0),
            peak_count: Some(-2),
            level: Level::Hard,
        };
        let cfg = req.resolve();
        assert_eq!(cfg.peak_count, DEFAULT_PEAK_COUNT);
        assert_eq!(cfg, allocate(DEFAULT_DURATION_MINUTES * 60, 3, Level::Hard));

        let empty = WorkoutRequest::default().resolve();
        assert_eq!(empty.level, Level::Medium);
        assert_eq!(empty.peak_count, 3);
    }

    #[test]
    fn oversized_request_is_clamped() {
        let cfg = WorkoutRequest::new(10_000, 500, Level::Easy).resolve();
        assert_eq!(cfg.peak_count, MAX_PEAK_COUNT);
    }

    #[test]
    fn session_file_reports_field_path() {
        let err = SessionFile::from_json_str(r#"{"workout": {"level": "brutal"}}"#).unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path, "workout.level"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn session_file_accepts_camel_case_aliases() {
        let f = SessionFile::from_json_str(
            r#"{"workout": {"durationMinutes": 30, "peakCount": 4, "level": "hard"}, "preview_seconds": 2}"#,
        )
        .unwrap();
        assert_eq!(f.workout.duration_minutes, Some(30));
        assert_eq!(f.workout.peak_count, Some(4));
        assert_eq!(f.workout.level, Level::Hard);
        assert_eq!(f.preview_seconds, Some(2));
        assert_eq!(f.physiology_or(UserPhysiology::default()), UserPhysiology::default());
    }
}
