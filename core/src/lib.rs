//! Pulsintervall-kjerne: genererer en tidsindeksert treningsplan (ett punkt
//! per 5 sek), følger fasene live med en faseklokke, og scorer hvor godt
//! pulsen holdt seg i sonen.

pub mod cli;
pub mod compliance;
pub mod config;
pub mod error;
pub mod export;
pub mod hrm;
pub mod metrics;
pub mod phase_clock;
pub mod plan;
pub mod scheduler;
pub mod session;
pub mod simulator;
pub mod smoothing;
pub mod storage;
pub mod types;
pub mod zones;

#[cfg(feature = "python")]
mod py;

pub use compliance::{score_compliance, ComplianceReport};
pub use config::{allocate, SessionFile, WorkoutRequest};
pub use error::{ConfigError, ExportError, HrmError, PlanError, SessionError, StorageError};
pub use export::WorkoutResults;
pub use hrm::{decode_heart_rate, ChannelSource, HeartRateSource, ScriptedSource, SourceEvent};
pub use phase_clock::{ClockReading, PhaseClock, Position};
pub use plan::{format_clock, generate, Plan, Segmentation};
pub use scheduler::{ManualScheduler, Scheduler, SystemScheduler, TimerEvent, TimerHandle};
pub use session::{
    HrSourceStatus, SessionController, SessionEvent, SessionState, SessionStatus, SessionSummary,
    TickFrame, ZoneStatus,
};
pub use simulator::HrSimulator;
pub use storage::{load_or_default, load_profile, save_profile, JsonFileStore, MemoryStore, ProfileStore};
pub use types::{FitnessLevel, Level, Observation, Phase, PlanSample, UserPhysiology, WorkoutConfig};
pub use zones::{compute_zone, Zone};
