use hr_interval_core::cli::{frame_line, plan_report, summary_report};
use hr_interval_core::*;

#[test]
fn plan_report_lists_segments() {
    let plan = generate(&WorkoutRequest::new(20, 3, Level::Medium).resolve(), &UserPhysiology::default()).unwrap();
    let text = plan_report(&plan);
    assert!(text.starts_with("--- Workout Plan ---"));
    assert!(text.contains("Peaks: 3  Total: 20:05"), "{text}");
    // oppvarming, 3 topper, 2 hviler, nedkjøling
    let segments = text.lines().filter(|l| l.contains('#')).count();
    assert_eq!(segments, 7);
}

#[test]
fn summary_and_frame_lines() {
    let mut c = SessionController::new(
        UserPhysiology::default(),
        WorkoutRequest::new(20, 2, Level::Hard).resolve(),
        ManualScheduler::new(),
        HrSimulator::seeded(5, 60, 180),
    )
    .unwrap();
    c.start().unwrap();
    c.advance_secs(65);

    let frame = c.frame().unwrap();
    let line = frame_line(&frame);
    assert!(line.starts_with("  1:05 warmup"), "{line}");

    let summary = c.stop().unwrap();
    let text = summary_report(&summary);
    assert!(text.contains("Duration: 1:05"), "{text}");
    assert!(text.contains("Score:"));
}
