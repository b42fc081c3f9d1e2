use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid physiology: {0}")]
    InvalidPhysiology(String),
    #[error("unknown level '{0}' (expected easy, medium or hard)")]
    UnknownLevel(String),
    #[error("parse error at {path}: {message}")]
    Parse { path: String, message: String },
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("peak_count must be >= 1, got {0}")]
    InvalidPeakCount(u32),
    #[error("{0} duration must be > 0")]
    ZeroDuration(&'static str),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HrmError {
    #[error("empty heart-rate packet")]
    EmptyPacket,
    #[error("truncated heart-rate packet (flags={flags:#04x}, len={len})")]
    Truncated { flags: u8, len: usize },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("profile io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("export json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("export csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("series lengths differ (time={time}, hr={hr}, lower={lower}, upper={upper}, phase={phase})")]
    SeriesLength { time: usize, hr: usize, lower: usize, upper: usize, phase: usize },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("metrics registry: {0}")]
    Metrics(#[from] prometheus::Error),
    #[error("session already started")]
    AlreadyStarted,
    #[error("session is not running")]
    NotRunning,
    #[error("session is not paused")]
    NotPaused,
    #[error("session already finished")]
    Finished,
}
