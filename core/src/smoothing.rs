use std::f64::consts::PI;

use crate::zones::Zone;

/// Tidssteg i planen (sek).
pub const STEP_SECONDS: u32 = 5;

/// Cosinus ease-in/ease-out: 0→1, monoton, null stigning i begge ender.
#[inline]
pub fn ease(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    0.5 - 0.5 * (p * PI).cos()
}

/// Myk overgang mellom to soner over `duration` sekunder.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub start_hr: f64,
    pub end_hr: f64,
    pub start: Zone,
    pub end: Zone,
    pub duration: u32,
}

/// Ett steg i overgangen. Sonegrensene er avrundet til hele bpm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionStep {
    pub hr: f64,
    pub zone: Zone,
}

impl Transition {
    pub fn steps(&self) -> u32 {
        self.duration / STEP_SECONDS
    }

    /// Steg `i` av `steps()`; progress = i/steps, slik at siste steg aldri
    /// når helt fram (neste segment tar over der).
    pub fn step(&self, i: u32) -> TransitionStep {
        let steps = self.steps().max(1);
        let e = ease(f64::from(i) / f64::from(steps));
        let lerp = |a: f64, b: f64| a + (b - a) * e;
        TransitionStep {
            hr: lerp(self.start_hr, self.end_hr),
            zone: Zone {
                lower: lerp(self.start.lower, self.end.lower).round(),
                upper: lerp(self.start.upper, self.end.upper).round(),
            },
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = TransitionStep> + '_ {
        (0..self.steps()).map(move |i| self.step(i))
    }
}
