use serde::{Deserialize, Serialize};

use crate::types::{Level, Phase};

/// Pulssone i bpm (uten margin).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub lower: f64,
    pub upper: f64,
}

impl Zone {
    #[inline]
    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    /// Sonen utvidet med `half` bpm på hver side.
    #[inline]
    pub fn widened(&self, half: f64) -> Zone {
        Zone { lower: self.lower - half, upper: self.upper + half }
    }

    #[inline]
    pub fn contains(&self, hr: f64) -> bool {
        self.lower <= hr && hr <= self.upper
    }
}

/// Andeler av maks-puls per fase/nivå.
fn fractions(phase: Phase, level: Level) -> (f64, f64) {
    match phase {
        Phase::Warmup | Phase::Rest => (0.50, 0.60),
        Phase::Peak => match level {
            Level::Easy => (0.60, 0.70),
            Level::Medium => (0.70, 0.80),
            Level::Hard => (0.80, 0.90),
        },
        Phase::Cooldown => (0.40, 0.50),
    }
}

/// Målsone for en fase. Ren funksjon; margin legges på av kaller.
pub fn compute_zone(phase: Phase, level: Level, max_hr: u16) -> Zone {
    let (lo, hi) = fractions(phase, level);
    let max = f64::from(max_hr);
    Zone {
        lower: (max * lo).round(),
        upper: (max * hi).round(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_zone_follows_level() {
        assert_eq!(compute_zone(Phase::Peak, Level::Easy, 180), Zone { lower: 108.0, upper: 126.0 });
        assert_eq!(compute_zone(Phase::Peak, Level::Medium, 180), Zone { lower: 126.0, upper: 144.0 });
        assert_eq!(compute_zone(Phase::Peak, Level::Hard, 180), Zone { lower: 144.0, upper: 162.0 });
    }

    #[test]
    fn rest_warmup_and_cooldown_ignore_level() {
        for level in [Level::Easy, Level::Medium, Level::Hard] {
            assert_eq!(compute_zone(Phase::Warmup, level, 180), Zone { lower: 90.0, upper: 108.0 });
            assert_eq!(compute_zone(Phase::Rest, level, 180), Zone { lower: 90.0, upper: 108.0 });
            assert_eq!(compute_zone(Phase::Cooldown, level, 180), Zone { lower: 72.0, upper: 90.0 });
        }
    }

    #[test]
    fn bounds_are_rounded() {
        // 187 * 0.7 = 130.9, 187 * 0.8 = 149.6
        let z = compute_zone(Phase::Peak, Level::Medium, 187);
        assert_eq!(z.lower, 131.0);
        assert_eq!(z.upper, 150.0);
        assert_eq!(z.widened(5.0), Zone { lower: 126.0, upper: 155.0 });
    }
}
