use chrono::{TimeZone, Utc};
use hr_interval_core::*;
use std::fs;

fn finished_session() -> (UserPhysiology, Plan, SessionSummary) {
    let phys = UserPhysiology::default();
    let cfg = WorkoutRequest::new(2, 1, Level::Easy).resolve();
    let mut c = SessionController::new(phys, cfg, ManualScheduler::new(), HrSimulator::seeded(11, 60, 180))
        .unwrap();
    c.start().unwrap();
    let summary = c.run_to_end(1000).unwrap();
    (phys, c.plan().clone(), summary)
}

#[test]
fn results_written_as_json_and_csv() {
    let dir = std::env::temp_dir().join(format!("hr_interval_export_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let (phys, plan, summary) = finished_session();
    let created = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let results = WorkoutResults::build(created, &phys, &plan, &summary);

    assert_eq!(results.file_stem(), "hr-workout-20240102-030405");
    assert_eq!(results.time.len(), summary.history.len());
    assert_eq!(results.time[0], 1);
    assert_eq!(results.score, summary.score());
    assert!(results.lower.iter().zip(&results.upper).all(|(l, u)| l < u));

    let json_path = results.write_json(&dir).unwrap();
    let back = WorkoutResults::read_json(&json_path).unwrap();
    assert_eq!(back.created_at, created);
    assert_eq!(back.config, results.config);
    assert_eq!(back.hr, results.hr);
    assert_eq!(back.phase, results.phase);
    assert_eq!(back.compliance_percentage, results.compliance_percentage);
    assert!(back.lower.iter().zip(&results.lower).all(|(a, b)| (a - b).abs() < 1e-9));

    let csv_path = results.write_csv(&dir).unwrap();
    let text = fs::read_to_string(&csv_path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("time,hr,lower,upper,phase"));
    assert_eq!(lines.count(), results.time.len());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn uneven_series_is_an_error_not_a_panic() {
    let dir = std::env::temp_dir().join(format!("hr_interval_uneven_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let (phys, plan, summary) = finished_session();
    let mut results = WorkoutResults::build(Utc::now(), &phys, &plan, &summary);
    results.hr.pop();

    match results.write_csv(&dir) {
        Err(ExportError::SeriesLength { time, hr, .. }) => assert_eq!(hr + 1, time),
        other => panic!("unexpected: {other:?}"),
    }

    fs::remove_dir_all(&dir).ok();
}
