// core/src/plan.rs
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::smoothing::{Transition, STEP_SECONDS};
use crate::types::{Phase, PlanSample, UserPhysiology, WorkoutConfig};
use crate::zones::{compute_zone, Zone};

/// Rampe inn i topp/hvile (sek).
pub const RAMP_SECONDS: u32 = 30;
/// Antall planpunkter i vinduet rundt nåtid.
pub const PLAN_WINDOW: usize = 24;
/// Nedkjølingen ender her over hvilepuls.
const COOLDOWN_END_ABOVE_REST: f64 = 10.0;

/// Lengden (sek) planen faktisk bruker per segment, på 5s-gitteret.
///
/// Faseklokka regner på de samme lengdene, så fasen ved `offset_seconds`
/// til et planpunkt alltid er fasen planpunktet er merket med.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    pub peak_count: u32,
    pub warmup: u32,
    pub peak: u32,
    pub rest: u32,
    pub cooldown: u32,
}

/// Antall hold-steg etter rampen: 30, 35, … < duration.
#[inline]
fn hold_steps(duration: u32) -> u32 {
    duration.saturating_sub(RAMP_SECONDS).div_ceil(STEP_SECONDS)
}

impl Segmentation {
    pub fn from_config(cfg: &WorkoutConfig) -> Self {
        let grid = |d: u32| d / STEP_SECONDS * STEP_SECONDS;
        let interval = |d: u32| RAMP_SECONDS + hold_steps(d) * STEP_SECONDS;
        Self {
            peak_count: cfg.peak_count,
            warmup: grid(cfg.warmup_seconds),
            peak: interval(cfg.peak_duration_seconds),
            rest: interval(cfg.rest_duration_seconds),
            cooldown: grid(cfg.cooldown_seconds),
        }
    }

    #[inline]
    pub fn cycle(&self) -> u32 {
        self.peak + self.rest
    }

    /// Topper + hviler, uten hvilen etter siste topp.
    #[inline]
    pub fn total_peak_rest(&self) -> u32 {
        self.peak_count * self.cycle() - self.rest
    }

    #[inline]
    pub fn total(&self) -> u32 {
        self.warmup + self.total_peak_rest() + self.cooldown
    }
}

/// Ferdig generert plan. Uforanderlig etter `generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    config: WorkoutConfig,
    segmentation: Segmentation,
    samples: Vec<PlanSample>,
}

impl Plan {
    pub fn samples(&self) -> &[PlanSample] {
        &self.samples
    }

    pub fn config(&self) -> &WorkoutConfig {
        &self.config
    }

    pub fn segmentation(&self) -> Segmentation {
        self.segmentation
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// totalWorkoutSeconds
    pub fn total_seconds(&self) -> u32 {
        self.samples.len() as u32 * STEP_SECONDS
    }

    /// Planindeks for et tidspunkt, klemt til siste punkt.
    pub fn index_at(&self, elapsed: u32) -> usize {
        ((elapsed / STEP_SECONDS) as usize).min(self.samples.len().saturating_sub(1))
    }

    /// Planpunktet en observasjon ved `elapsed` (dekker `(elapsed-1, elapsed]`) scores mot.
    pub fn index_for_observation(&self, elapsed: u32) -> usize {
        self.index_at(elapsed.saturating_sub(1))
    }

    /// 24-punkts vindu sentrert rundt nåtid, klemt i begge ender.
    pub fn window(&self, elapsed: u32) -> &[PlanSample] {
        let len = self.samples.len();
        let current = (elapsed / STEP_SECONDS) as usize;
        let mut start = current.saturating_sub(PLAN_WINDOW / 2);
        let end = (start + PLAN_WINDOW).min(len);
        if end == len {
            start = end.saturating_sub(PLAN_WINDOW);
        }
        &self.samples[start.min(end)..end]
    }

    /// `m:ss`-etiketter for hvert planpunkt.
    pub fn time_labels(&self) -> Vec<String> {
        self.samples.iter().map(|s| format_clock(s.offset_seconds)).collect()
    }
}

/// Sekunder som `m:ss`.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

struct Builder {
    samples: Vec<PlanSample>,
    offset: u32,
    half_margin: f64,
}

impl Builder {
    fn push(&mut self, phase: Phase, peak_index: u32, zone: Zone) {
        let band = zone.widened(self.half_margin);
        self.samples.push(PlanSample {
            offset_seconds: self.offset,
            phase,
            peak_index,
            target_hr: zone.midpoint().round() as i32,
            lower_bound: band.lower,
            upper_bound: band.upper,
        });
        self.offset += STEP_SECONDS;
    }

    fn transition(&mut self, t: Transition, phase: Phase, peak_index: u32) {
        for step in t.iter() {
            self.push(phase, peak_index, step.zone);
        }
    }

    /// Hold sonen fra sekund 30 til `duration`, med liten sinus-variasjon.
    fn hold(&mut self, zone: Zone, duration: u32, phase: Phase, peak_index: u32) {
        for i in (RAMP_SECONDS..duration).step_by(STEP_SECONDS as usize) {
            let variation = (f64::from(i) * 0.1).sin() * 2.0;
            let z = Zone { lower: zone.lower + variation, upper: zone.upper + variation };
            self.push(phase, peak_index, z);
        }
    }
}

pub(crate) fn check(cfg: &WorkoutConfig) -> Result<(), PlanError> {
    if cfg.peak_count < 1 {
        return Err(PlanError::InvalidPeakCount(cfg.peak_count));
    }
    if cfg.warmup_seconds == 0 {
        return Err(PlanError::ZeroDuration("warmup"));
    }
    if cfg.cooldown_seconds == 0 {
        return Err(PlanError::ZeroDuration("cooldown"));
    }
    if cfg.peak_duration_seconds == 0 {
        return Err(PlanError::ZeroDuration("peak"));
    }
    if cfg.peak_count > 1 && cfg.rest_duration_seconds == 0 {
        return Err(PlanError::ZeroDuration("rest"));
    }
    Ok(())
}

/// Bygg hele planen, ett punkt per 5 sek. Deterministisk.
pub fn generate(cfg: &WorkoutConfig, phys: &UserPhysiology) -> Result<Plan, PlanError> {
    check(cfg)?;

    let segmentation = Segmentation::from_config(cfg);
    let zone = |phase| compute_zone(phase, cfg.level, phys.max_hr);
    let warmup_zone = zone(Phase::Warmup);
    let peak_zone = zone(Phase::Peak);
    let rest_zone = zone(Phase::Rest);
    let cooldown_zone = zone(Phase::Cooldown);
    let rest_hr = f64::from(phys.rest_hr);

    let mut b = Builder {
        samples: Vec::with_capacity((segmentation.total() / STEP_SECONDS) as usize),
        offset: 0,
        half_margin: phys.half_margin(),
    };

    // Oppvarming: fra hvilepuls til midten av oppvarmingssonen
    b.transition(
        Transition {
            start_hr: rest_hr,
            end_hr: warmup_zone.midpoint(),
            start: Zone { lower: rest_hr, upper: rest_hr + f64::from(phys.zone_width) },
            end: warmup_zone,
            duration: cfg.warmup_seconds,
        },
        Phase::Warmup,
        0,
    );

    for peak in 0..cfg.peak_count {
        let peak_index = peak + 1;
        let previous = if peak == 0 { warmup_zone } else { rest_zone };

        b.transition(
            Transition {
                start_hr: previous.midpoint(),
                end_hr: peak_zone.midpoint(),
                start: previous,
                end: peak_zone,
                duration: RAMP_SECONDS,
            },
            Phase::Peak,
            peak_index,
        );
        b.hold(peak_zone, cfg.peak_duration_seconds, Phase::Peak, peak_index);

        if peak + 1 < cfg.peak_count {
            b.transition(
                Transition {
                    start_hr: peak_zone.midpoint(),
                    end_hr: rest_zone.midpoint(),
                    start: peak_zone,
                    end: rest_zone,
                    duration: RAMP_SECONDS,
                },
                Phase::Rest,
                peak_index,
            );
            b.hold(rest_zone, cfg.rest_duration_seconds, Phase::Rest, peak_index);
        }
    }

    b.transition(
        Transition {
            start_hr: peak_zone.midpoint(),
            end_hr: rest_hr + COOLDOWN_END_ABOVE_REST,
            start: peak_zone,
            end: cooldown_zone,
            duration: cfg.cooldown_seconds,
        },
        Phase::Cooldown,
        cfg.peak_count,
    );

    debug_assert_eq!(b.offset, segmentation.total());
    debug!(
        "plan generated: {} samples, {} ({:?})",
        b.samples.len(),
        format_clock(b.offset),
        segmentation
    );

    Ok(Plan { config: *cfg, segmentation, samples: b.samples })
}
