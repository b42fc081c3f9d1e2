use serde::Serialize;

use crate::error::PlanError;
use crate::plan::{check, Segmentation};
use crate::types::{Level, Phase, UserPhysiology, WorkoutConfig};
use crate::zones::{compute_zone, Zone};

/// Hvor i økta vi er ved et gitt `elapsed`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub phase: Phase,
    pub peak_index: u32,
    pub target: Zone, // live sone, uten margin
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ClockReading {
    Active(Position),
    Complete,
}

impl ClockReading {
    pub fn position(&self) -> Option<Position> {
        match self {
            ClockReading::Active(p) => Some(*p),
            ClockReading::Complete => None,
        }
    }
}

/// Faseklokke. Holder ingen tilstand utover oppsettet; alt utledes fra `elapsed`.
#[derive(Debug, Clone, Copy)]
pub struct PhaseClock {
    seg: Segmentation,
    level: Level,
    max_hr: u16,
}

impl PhaseClock {
    /// Samme forhåndskrav som planen: minst én topp og ingen nullsegmenter.
    pub fn new(cfg: &WorkoutConfig, phys: &UserPhysiology) -> Result<Self, PlanError> {
        check(cfg)?;
        Ok(Self {
            seg: Segmentation::from_config(cfg),
            level: cfg.level,
            max_hr: phys.max_hr,
        })
    }

    pub fn total_seconds(&self) -> u32 {
        self.seg.total()
    }

    /// Fase og toppnummer. Hver fase dekker `[start, slutt)`; siste sekund
    /// av nedkjølingen (`elapsed == total`) er fortsatt nedkjøling.
    pub fn phase_at(&self, elapsed: u32) -> Option<(Phase, u32)> {
        let s = &self.seg;
        let intervals_end = s.warmup + s.total_peak_rest();

        if elapsed < s.warmup {
            Some((Phase::Warmup, 0))
        } else if elapsed < intervals_end {
            let t = elapsed - s.warmup;
            let cycle = s.cycle();
            let peak_index = t / cycle + 1;
            if t % cycle < s.peak {
                Some((Phase::Peak, peak_index))
            } else {
                Some((Phase::Rest, peak_index))
            }
        } else if elapsed <= s.total() {
            Some((Phase::Cooldown, s.peak_count))
        } else {
            None
        }
    }

    /// Fase + live målsone. Sonen slås opp på nytt hver gang, uavhengig av planen.
    pub fn read(&self, elapsed: u32) -> ClockReading {
        match self.phase_at(elapsed) {
            Some((phase, peak_index)) => ClockReading::Active(Position {
                phase,
                peak_index,
                target: compute_zone(phase, self.level, self.max_hr),
            }),
            None => ClockReading::Complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::allocate;

    fn clock(total: u32, peaks: u32) -> PhaseClock {
        PhaseClock::new(&allocate(total, peaks, Level::Medium), &UserPhysiology::default()).unwrap()
    }

    #[test]
    fn zero_peaks_is_rejected() {
        let mut cfg = allocate(1200, 3, Level::Medium);
        cfg.peak_count = 0;
        let err = PhaseClock::new(&cfg, &UserPhysiology::default()).unwrap_err();
        assert_eq!(err, PlanError::InvalidPeakCount(0));
    }

    #[test]
    fn boundaries_for_twenty_minutes() {
        // warmup 120, peak 215, rest 160, cooldown 120 → total 1205
        let c = clock(1200, 3);
        assert_eq!(c.phase_at(0), Some((Phase::Warmup, 0)));
        assert_eq!(c.phase_at(119), Some((Phase::Warmup, 0)));
        assert_eq!(c.phase_at(120), Some((Phase::Peak, 1)));
        assert_eq!(c.phase_at(334), Some((Phase::Peak, 1)));
        assert_eq!(c.phase_at(335), Some((Phase::Rest, 1)));
        assert_eq!(c.phase_at(495), Some((Phase::Peak, 2)));
        assert_eq!(c.phase_at(870), Some((Phase::Peak, 3)));
        assert_eq!(c.phase_at(1084), Some((Phase::Peak, 3)));
        assert_eq!(c.phase_at(1085), Some((Phase::Cooldown, 3)));
        assert_eq!(c.phase_at(1205), Some((Phase::Cooldown, 3)));
        assert_eq!(c.phase_at(1206), None);
        assert_eq!(c.read(1206), ClockReading::Complete);
    }

    #[test]
    fn single_peak_never_rests() {
        let c = clock(600, 1);
        for e in 0..=c.total_seconds() {
            assert_ne!(c.phase_at(e).map(|p| p.0), Some(Phase::Rest), "rest at {e}");
        }
    }

    #[test]
    fn live_zone_matches_phase() {
        let c = clock(1200, 3);
        let pos = c.read(200).position().unwrap();
        assert_eq!(pos.phase, Phase::Peak);
        assert_eq!(pos.target, Zone { lower: 126.0, upper: 144.0 });

        let cool = c.read(1100).position().unwrap();
        assert_eq!(cool.target, Zone { lower: 72.0, upper: 90.0 });
    }
}
