use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::zones::Zone;

/// Simulert puls når ingen sensor er koblet til.
#[derive(Debug, Clone)]
pub struct HrSimulator {
    rng: ChaCha8Rng,
    rest_hr: u16,
    max_hr: u16,
}

impl HrSimulator {
    pub fn seeded(seed: u64, rest_hr: u16, max_hr: u16) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed), rest_hr, max_hr }
    }

    pub fn from_entropy(rest_hr: u16, max_hr: u16) -> Self {
        Self::seeded(rand::rng().random(), rest_hr, max_hr)
    }

    /// Samme RNG, nye grenser for klemmingen.
    pub fn with_limits(self, rest_hr: u16, max_hr: u16) -> Self {
        Self { rest_hr, max_hr, ..self }
    }

    /// Neste puls: 1–4 bpm mot midten av sonen (±1 hvis allerede der),
    /// ±1 bpm støy, klemt til [hvile, maks].
    pub fn step(&mut self, current: u16, target: Zone) -> u16 {
        let mid = target.midpoint();
        let cur = f64::from(current);

        let mut next = if cur < mid {
            cur + self.rng.random::<f64>() * 3.0 + 1.0
        } else if cur > mid {
            cur - self.rng.random::<f64>() * 3.0 - 1.0
        } else {
            cur + (self.rng.random::<f64>() - 0.5) * 2.0
        };
        next += (self.rng.random::<f64>() - 0.5) * 2.0;

        next.clamp(f64::from(self.rest_hr), f64::from(self.max_hr)).round() as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONE: Zone = Zone { lower: 126.0, upper: 144.0 };

    #[test]
    fn moves_toward_zone_and_stays_clamped() {
        let mut sim = HrSimulator::seeded(7, 60, 180);
        let mut hr = 60;
        for _ in 0..200 {
            let next = sim.step(hr, ZONE);
            assert!((60..=180).contains(&next));
            if f64::from(hr) < ZONE.midpoint() - 2.0 {
                assert!(next >= hr, "{hr} -> {next}");
            }
            hr = next;
        }
        assert!((ZONE.midpoint() - f64::from(hr)).abs() <= 6.0, "ended at {hr}");
    }

    #[test]
    fn step_size_is_bounded() {
        let mut sim = HrSimulator::seeded(42, 40, 200);
        for _ in 0..500 {
            let next = sim.step(100, ZONE);
            // 1–4 opp + ±1 støy
            assert!((100..=105).contains(&next), "{next}");
        }
    }

    #[test]
    fn jitters_around_midpoint_when_on_target() {
        let mut sim = HrSimulator::seeded(9, 60, 180);
        for _ in 0..500 {
            let next = sim.step(135, ZONE);
            // ±1 jitter + ±1 støy
            assert!((133..=137).contains(&next), "{next}");
        }
    }

    #[test]
    fn limits_follow_with_limits() {
        let mut sim = HrSimulator::seeded(1, 60, 180).with_limits(50, 200);
        let top = Zone { lower: 250.0, upper: 260.0 };
        assert_eq!(sim.step(200, top), 200);
        let bottom = Zone { lower: 10.0, upper: 20.0 };
        assert_eq!(sim.step(50, bottom), 50);
    }

    #[test]
    fn same_seed_same_walk() {
        let mut a = HrSimulator::seeded(3, 60, 180);
        let mut b = HrSimulator::seeded(3, 60, 180);
        let (mut x, mut y) = (70, 70);
        for _ in 0..50 {
            x = a.step(x, ZONE);
            y = b.step(y, ZONE);
            assert_eq!(x, y);
        }
    }
}
