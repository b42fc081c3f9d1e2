//! Øktkontroller: start/pause/fortsett/stopp, 1s-klokketick, 2s pulssimulering
//! og innkommende sensorpakker. Alt kjøres kooperativt fra `pump()`.

use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::compliance::{score_compliance, ComplianceReport};
use crate::error::SessionError;
use crate::hrm::{decode_heart_rate, HeartRateSource, SourceEvent};
use crate::metrics::{self, Metrics};
use crate::phase_clock::{ClockReading, PhaseClock, Position};
use crate::plan::{generate, Plan};
use crate::scheduler::{ManualScheduler, Scheduler, SystemScheduler, TimerEvent, TimerHandle};
use crate::simulator::HrSimulator;
use crate::types::{Observation, Phase, PlanSample, UserPhysiology, WorkoutConfig};
use crate::zones::Zone;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
pub const HR_SIM_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_PREVIEW: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Preview,
    Running,
    Paused,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HrSourceStatus {
    Simulated,
    Device,
}

/// Live veiledning: hvor pulsen ligger i forhold til live-sonen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneStatus {
    Below,
    InZone,
    Above,
}

impl ZoneStatus {
    pub fn classify(hr: u16, zone: Zone) -> Self {
        let hr = f64::from(hr);
        if hr < zone.lower {
            ZoneStatus::Below
        } else if hr > zone.upper {
            ZoneStatus::Above
        } else {
            ZoneStatus::InZone
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            ZoneStatus::Below => "↑",
            ZoneStatus::InZone => "✓",
            ZoneStatus::Above => "↓",
        }
    }
}

/// Muterbar tilstand for én aktiv økt. Fase/sone utledes fra `elapsed_seconds`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub status: SessionStatus,
    pub elapsed_seconds: u32,
    pub current_hr: u16,
    pub source: HrSourceStatus,
    pub history: Vec<Observation>,
}

impl SessionState {
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            SessionStatus::Preview | SessionStatus::Running | SessionStatus::Paused
        )
    }

    pub fn is_paused(&self) -> bool {
        self.status == SessionStatus::Paused
    }
}

/// Det visningen får hvert sekund.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickFrame {
    pub elapsed_seconds: u32,
    pub phase: Phase,
    pub peak_index: u32,
    pub current_hr: u16,
    pub target_lower: f64,
    pub target_upper: f64,
    pub zone_status: ZoneStatus,
    pub plan_window: Vec<PlanSample>,
}

/// Resultat ved slutt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub avg_hr: Option<f64>,
    pub max_hr: Option<u16>,
    pub min_hr: Option<u16>,
    pub total_elapsed: u32,
    pub compliance: ComplianceReport,
    pub history: Vec<Observation>,
}

impl SessionSummary {
    pub fn compliance_percentage(&self) -> u32 {
        self.compliance.percentage
    }

    pub fn score(&self) -> u32 {
        self.compliance.score
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Forhåndsvisningen er ferdig, klokka går
    Live,
    Tick(TickFrame),
    HeartRate(u16),
    SourceChanged(HrSourceStatus),
    Finished(SessionSummary),
}

#[derive(Debug, Default)]
struct Timers {
    tick: Option<TimerHandle>,
    hr_sim: Option<TimerHandle>,
    preview: Option<TimerHandle>,
}

/// Én kontroller per økt; konfig og fysiologi er låst ved konstruksjon.
pub struct SessionController<S: Scheduler = SystemScheduler> {
    physiology: UserPhysiology,
    config: WorkoutConfig,
    plan: Plan,
    clock: PhaseClock,
    scheduler: S,
    simulator: HrSimulator,
    source: Option<Box<dyn HeartRateSource>>,
    state: SessionState,
    timers: Timers,
    metrics: Metrics,
    summary: Option<SessionSummary>,
}

impl<S: Scheduler> SessionController<S> {
    pub fn new(
        physiology: UserPhysiology,
        config: WorkoutConfig,
        scheduler: S,
        simulator: HrSimulator,
    ) -> Result<Self, SessionError> {
        physiology.validate()?;
        let plan = generate(&config, &physiology)?;
        let clock = PhaseClock::new(&config, &physiology)?;
        // simulatoren klemmes alltid til brukerens egne grenser
        let simulator = simulator.with_limits(physiology.rest_hr, physiology.max_hr);
        info!(
            "session ready: {:?} x{} peaks, plan {} samples ({}s)",
            config.level,
            config.peak_count,
            plan.len(),
            plan.total_seconds()
        );
        Ok(Self {
            physiology,
            config,
            plan,
            clock,
            scheduler,
            simulator,
            source: None,
            state: SessionState {
                status: SessionStatus::Idle,
                elapsed_seconds: 0,
                current_hr: physiology.rest_hr,
                source: HrSourceStatus::Simulated,
                history: Vec::new(),
            },
            timers: Timers::default(),
            metrics: Metrics::new()?,
            summary: None,
        })
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn config(&self) -> &WorkoutConfig {
        &self.config
    }

    pub fn physiology(&self) -> &UserPhysiology {
        &self.physiology
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn attach_source(&mut self, source: Box<dyn HeartRateSource>) {
        self.source = Some(source);
    }

    /// Posisjon ved nåværende `elapsed`.
    pub fn position(&self) -> Option<Position> {
        self.clock.read(self.state.elapsed_seconds).position()
    }

    pub fn frame(&self) -> Option<TickFrame> {
        let pos = self.position()?;
        Some(TickFrame {
            elapsed_seconds: self.state.elapsed_seconds,
            phase: pos.phase,
            peak_index: pos.peak_index,
            current_hr: self.state.current_hr,
            target_lower: pos.target.lower,
            target_upper: pos.target.upper,
            zone_status: ZoneStatus::classify(self.state.current_hr, pos.target),
            plan_window: self.plan.window(self.state.elapsed_seconds).to_vec(),
        })
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.state.status = SessionStatus::Running;
        self.start_timers();
        info!("session started");
        Ok(())
    }

    /// Vis planen i `preview` før klokka starter.
    pub fn start_with_preview(&mut self, preview: Duration) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.state.status = SessionStatus::Preview;
        self.timers.preview = Some(self.scheduler.after(preview, TimerEvent::PreviewElapsed));
        info!("session preview for {:?}", preview);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), SessionError> {
        match self.state.status {
            SessionStatus::Running | SessionStatus::Preview => {
                self.cancel_timers();
                self.state.status = SessionStatus::Paused;
                info!("session paused at {}s", self.state.elapsed_seconds);
                Ok(())
            }
            SessionStatus::Finished => Err(SessionError::Finished),
            _ => Err(SessionError::NotRunning),
        }
    }

    pub fn resume(&mut self) -> Result<(), SessionError> {
        match self.state.status {
            SessionStatus::Paused => {
                self.state.status = SessionStatus::Running;
                self.start_timers();
                info!("session resumed at {}s", self.state.elapsed_seconds);
                Ok(())
            }
            SessionStatus::Finished => Err(SessionError::Finished),
            _ => Err(SessionError::NotPaused),
        }
    }

    /// Manuell stopp. Fryser tilstanden og regner ut resultatet.
    pub fn stop(&mut self) -> Result<SessionSummary, SessionError> {
        if self.state.status == SessionStatus::Finished {
            return Err(SessionError::Finished);
        }
        Ok(self.finish())
    }

    /// Kjør alt som er forfalt: sensorhendelser først, så timere.
    pub fn pump(&mut self) -> Vec<SessionEvent> {
        let incoming: Vec<SourceEvent> = match self.source.as_mut() {
            Some(src) => std::iter::from_fn(|| src.poll_event()).collect(),
            None => Vec::new(),
        };
        let mut out: Vec<SessionEvent> =
            incoming.into_iter().filter_map(|e| self.deliver(e)).collect();

        while let Some(event) = self.scheduler.next_due() {
            if let Some(ev) = self.on_timer(event) {
                out.push(ev);
            }
        }
        out
    }

    /// Sensorhendelse. Ekte puls overskriver `current_hr` umiddelbart.
    pub fn deliver(&mut self, event: SourceEvent) -> Option<SessionEvent> {
        if self.state.status == SessionStatus::Finished {
            return None;
        }
        match event {
            SourceEvent::Packet(packet) => match decode_heart_rate(&packet) {
                Ok(hr) => {
                    self.state.current_hr = hr;
                    self.metrics.device_update();
                    if self.state.source != HrSourceStatus::Device {
                        self.state.source = HrSourceStatus::Device;
                        if let Some(h) = self.timers.hr_sim.take() {
                            self.scheduler.cancel(h);
                        }
                        info!("heart-rate device connected, simulation off");
                        return Some(SessionEvent::SourceChanged(HrSourceStatus::Device));
                    }
                    Some(SessionEvent::HeartRate(hr))
                }
                Err(e) => {
                    warn!("dropping heart-rate packet: {e}");
                    None
                }
            },
            SourceEvent::Disconnected => {
                if self.state.source != HrSourceStatus::Device {
                    return None;
                }
                self.state.source = HrSourceStatus::Simulated;
                self.metrics.source_fallbacks_total.inc();
                if self.state.status == SessionStatus::Running && self.timers.hr_sim.is_none() {
                    self.timers.hr_sim = Some(self.scheduler.every(HR_SIM_INTERVAL, TimerEvent::HrSimulation));
                }
                warn!("heart-rate device disconnected, falling back to simulation");
                Some(SessionEvent::SourceChanged(HrSourceStatus::Simulated))
            }
        }
    }

    fn on_timer(&mut self, event: TimerEvent) -> Option<SessionEvent> {
        match event {
            TimerEvent::WorkoutTick => self.on_tick(),
            TimerEvent::HrSimulation => self.on_hr_simulation(),
            TimerEvent::PreviewElapsed => {
                self.timers.preview = None;
                if self.state.status != SessionStatus::Preview {
                    return None;
                }
                self.state.status = SessionStatus::Running;
                self.start_timers();
                info!("preview over, session live");
                Some(SessionEvent::Live)
            }
        }
    }

    /// Øker `elapsed` med 1 så lenge klokka er aktiv; tick-et etter `total` avslutter uten å øke.
    fn on_tick(&mut self) -> Option<SessionEvent> {
        if self.state.status != SessionStatus::Running {
            return None;
        }
        let next = self.state.elapsed_seconds + 1;
        let pos = match self.clock.read(next) {
            ClockReading::Complete => {
                info!("workout complete at {}s", self.state.elapsed_seconds);
                return Some(SessionEvent::Finished(self.finish()));
            }
            ClockReading::Active(pos) => pos,
        };

        self.state.elapsed_seconds = next;
        let hr = self.state.current_hr;
        self.state.history.push(Observation { elapsed_seconds: next, hr, phase: pos.phase });

        self.metrics.ticks_total.inc();
        self.metrics.elapsed_seconds.set(i64::from(next));
        if pos.target.contains(f64::from(hr)) {
            self.metrics.in_zone_ticks_total.inc();
        }
        self.frame().map(SessionEvent::Tick)
    }

    fn on_hr_simulation(&mut self) -> Option<SessionEvent> {
        if self.state.status != SessionStatus::Running || self.state.source != HrSourceStatus::Simulated {
            return None;
        }
        let pos = self.position()?;
        let hr = self.simulator.step(self.state.current_hr, pos.target);
        debug!("simulated hr {} -> {}", self.state.current_hr, hr);
        self.state.current_hr = hr;
        self.metrics.simulated_update();
        Some(SessionEvent::HeartRate(hr))
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        match self.state.status {
            SessionStatus::Idle => Ok(()),
            SessionStatus::Finished => Err(SessionError::Finished),
            _ => Err(SessionError::AlreadyStarted),
        }
    }

    fn start_timers(&mut self) {
        if self.timers.tick.is_none() {
            self.timers.tick = Some(self.scheduler.every(TICK_INTERVAL, TimerEvent::WorkoutTick));
        }
        if self.state.source == HrSourceStatus::Simulated && self.timers.hr_sim.is_none() {
            self.timers.hr_sim = Some(self.scheduler.every(HR_SIM_INTERVAL, TimerEvent::HrSimulation));
        }
    }

    fn cancel_timers(&mut self) {
        for handle in [self.timers.tick.take(), self.timers.hr_sim.take(), self.timers.preview.take()]
            .into_iter()
            .flatten()
        {
            self.scheduler.cancel(handle);
        }
    }

    fn finish(&mut self) -> SessionSummary {
        self.cancel_timers();
        self.state.status = SessionStatus::Finished;

        let history = self.state.history.clone();
        let summary = SessionSummary {
            avg_hr: metrics::avg_hr(&history),
            max_hr: metrics::max_hr(&history),
            min_hr: metrics::min_hr(&history),
            total_elapsed: self.state.elapsed_seconds,
            compliance: score_compliance(&self.plan, &history),
            history,
        };
        info!(
            "session finished: {}s, compliance {}% (score {})",
            summary.total_elapsed,
            summary.compliance.percentage,
            summary.compliance.score
        );
        self.summary = Some(summary.clone());
        summary
    }
}

impl SessionController<ManualScheduler> {
    /// Flytt den manuelle klokka sekund for sekund og kjør alt som forfaller.
    pub fn advance(&mut self, by: Duration) -> Vec<SessionEvent> {
        let mut out = Vec::new();
        let mut left = by;
        while !left.is_zero() {
            let step = left.min(TICK_INTERVAL);
            self.scheduler.advance(step);
            left -= step;
            out.extend(self.pump());
        }
        out
    }

    pub fn advance_secs(&mut self, secs: u64) -> Vec<SessionEvent> {
        self.advance(Duration::from_secs(secs))
    }

    /// Kjør til økta er ferdig (eller `limit` sekunder har gått).
    pub fn run_to_end(&mut self, limit: u64) -> Option<SessionSummary> {
        for _ in 0..limit {
            if self.state.status == SessionStatus::Finished {
                break;
            }
            self.advance(TICK_INTERVAL);
        }
        self.summary.clone()
    }
}
