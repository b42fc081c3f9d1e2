use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use crate::types::Observation;

pub fn avg_hr(history: &[Observation]) -> Option<f64> {
    if history.is_empty() {
        return None;
    }
    let sum: f64 = history.iter().map(|o| f64::from(o.hr)).sum();
    Some(sum / history.len() as f64)
}

pub fn max_hr(history: &[Observation]) -> Option<u16> {
    history.iter().map(|o| o.hr).max()
}

pub fn min_hr(history: &[Observation]) -> Option<u16> {
    history.iter().map(|o| o.hr).min()
}

/// Tellere per økt. Eget register, ingen globale singletons.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub ticks_total: IntCounter,
    pub in_zone_ticks_total: IntCounter,
    pub hr_updates_total: IntCounterVec, // label: source = simulated | device
    pub source_fallbacks_total: IntCounter,
    pub elapsed_seconds: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("hr_interval".into()), None)?;

        let ticks_total = IntCounter::new("ticks_total", "1s workout ticks processed")?;
        let in_zone_ticks_total =
            IntCounter::new("in_zone_ticks_total", "ticks with HR inside the live target zone")?;
        let hr_updates_total = IntCounterVec::new(
            Opts::new("hr_updates_total", "heart-rate updates by source"),
            &["source"],
        )?;
        let source_fallbacks_total = IntCounter::new(
            "source_fallbacks_total",
            "times the session fell back to simulated heart rate",
        )?;
        let elapsed_seconds = IntGauge::new("elapsed_seconds", "elapsed workout seconds")?;

        registry.register(Box::new(ticks_total.clone()))?;
        registry.register(Box::new(in_zone_ticks_total.clone()))?;
        registry.register(Box::new(hr_updates_total.clone()))?;
        registry.register(Box::new(source_fallbacks_total.clone()))?;
        registry.register(Box::new(elapsed_seconds.clone()))?;

        Ok(Self {
            registry,
            ticks_total,
            in_zone_ticks_total,
            hr_updates_total,
            source_fallbacks_total,
            elapsed_seconds,
        })
    }

    pub fn simulated_update(&self) {
        self.hr_updates_total.with_label_values(&["simulated"]).inc();
    }

    pub fn device_update(&self) {
        self.hr_updates_total.with_label_values(&["device"]).inc();
    }

    /// Prometheus tekstformat.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("ticks_total", &self.ticks_total.get())
            .field("elapsed_seconds", &self.elapsed_seconds.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phase;

    fn obs(hr: u16) -> Observation {
        Observation { elapsed_seconds: 1, hr, phase: Phase::Warmup }
    }

    #[test]
    fn summary_stats() {
        let h = vec![obs(100), obs(120), obs(110)];
        assert_eq!(avg_hr(&h), Some(110.0));
        assert_eq!(max_hr(&h), Some(120));
        assert_eq!(min_hr(&h), Some(100));
        assert_eq!(avg_hr(&[]), None);
    }

    #[test]
    fn render_contains_prefixed_counters() {
        let m = Metrics::new().unwrap();
        m.ticks_total.inc();
        m.device_update();
        let text = m.render().unwrap();
        assert!(text.contains("hr_interval_ticks_total 1"));
        assert!(text.contains("hr_interval_hr_updates_total{source=\"device\"} 1"));
    }
}
