use hr_interval_core::*;

// Faseklokka og planen skal alltid være enige om fase og toppnummer.
#[test]
fn clock_agrees_with_plan_for_every_sample() {
    let phys = UserPhysiology::default();
    for minutes in [1, 2, 5, 7, 13, 20, 33, 60] {
        for peaks in 1..=8 {
            for level in [Level::Easy, Level::Medium, Level::Hard] {
                let cfg = WorkoutRequest::new(minutes, peaks, level).resolve();
                let plan = generate(&cfg, &phys).unwrap();
                let clock = PhaseClock::new(&cfg, &phys).unwrap();
                assert_eq!(clock.total_seconds(), plan.total_seconds(), "{cfg:?}");

                for s in plan.samples() {
                    assert_eq!(
                        clock.phase_at(s.offset_seconds),
                        Some((s.phase, s.peak_index)),
                        "{cfg:?} at {}s",
                        s.offset_seconds
                    );
                }
                assert!(clock.phase_at(plan.total_seconds()).is_some());
                assert_eq!(clock.read(plan.total_seconds() + 1), ClockReading::Complete);
            }
        }
    }
}

#[test]
fn live_zone_ignores_plan_smoothing() {
    let cfg = WorkoutRequest::new(20, 3, Level::Hard).resolve();
    let phys = UserPhysiology { max_hr: 200, ..Default::default() };
    let clock = PhaseClock::new(&cfg, &phys).unwrap();

    // første sekund av første topp: live sone er allerede toppsonen
    let pos = clock.read(120).position().unwrap();
    assert_eq!(pos.phase, Phase::Peak);
    assert_eq!(pos.peak_index, 1);
    assert_eq!(pos.target, Zone { lower: 160.0, upper: 180.0 });

    let plan = generate(&cfg, &phys).unwrap();
    let sample = plan.samples()[plan.index_at(120)];
    assert!(sample.upper_bound < 180.0);
}
