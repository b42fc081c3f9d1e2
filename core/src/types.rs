use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;

/// Laveste maks-puls vi godtar; gir minst 1 bpm bredde i alle soner.
pub const MIN_MAX_HR: u16 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Warmup,
    Peak,
    Rest,
    Cooldown,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Warmup => "warmup",
            Phase::Peak => "peak",
            Phase::Rest => "rest",
            Phase::Cooldown => "cooldown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl std::str::FromStr for Level {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Level::Easy),
            "medium" => Ok(Level::Medium),
            "hard" => Ok(Level::Hard),
            other => Err(ConfigError::UnknownLevel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

/// Brukerens fysiologi. Låst for hele økta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPhysiology {
    pub max_hr: u16,     // bpm
    pub rest_hr: u16,    // bpm
    pub zone_width: u16, // bpm, symmetrisk margin rundt hver sone
    #[serde(default)]
    pub fitness_level: FitnessLevel,
}

impl Default for UserPhysiology {
    fn default() -> Self {
        Self {
            max_hr: 180,
            rest_hr: 60,
            zone_width: 10,
            fitness_level: FitnessLevel::Intermediate,
        }
    }
}

impl UserPhysiology {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rest_hr == 0 {
            return Err(ConfigError::InvalidPhysiology("rest_hr must be > 0".into()));
        }
        if self.max_hr < MIN_MAX_HR {
            return Err(ConfigError::InvalidPhysiology(format!(
                "max_hr must be >= {MIN_MAX_HR}, got {}",
                self.max_hr
            )));
        }
        if self.rest_hr >= self.max_hr {
            return Err(ConfigError::InvalidPhysiology(format!(
                "rest_hr ({}) must be below max_hr ({})",
                self.rest_hr, self.max_hr
            )));
        }
        Ok(())
    }

    /// Halve sonebredden, lagt utenpå hver beregnet sone.
    #[inline]
    pub fn half_margin(&self) -> f64 {
        f64::from(self.zone_width) / 2.0
    }
}

/// Ferdig allokert øktoppsett (sekunder). Låst når økta starter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutConfig {
    pub level: Level,
    pub peak_count: u32,
    pub warmup_seconds: u32,
    pub cooldown_seconds: u32,
    pub peak_duration_seconds: u32,
    pub rest_duration_seconds: u32, // kun meningsfull når peak_count > 1
}

/// Ett punkt i planen, hvert 5. sekund.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanSample {
    pub offset_seconds: u32,
    pub phase: Phase,
    pub peak_index: u32, // 0 før første topp
    pub target_hr: i32,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Én registrert puls per 1s-tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub elapsed_seconds: u32,
    pub hr: u16,
    pub phase: Phase,
}
