use hr_interval_core::*;
use serde_json::json;

#[test]
fn session_file_drives_plan() {
    let cfg = json!({
        "profile": {"max_hr": 190, "rest_hr": 55, "zone_width": 8, "fitness_level": "advanced"},
        "workout": {"durationMinutes": 30, "peakCount": 4, "level": "hard"},
        "preview_seconds": 3
    });

    let file = SessionFile::from_json_str(&cfg.to_string()).unwrap();
    let phys = file.physiology_or(UserPhysiology::default());
    assert_eq!(phys.max_hr, 190);
    assert_eq!(phys.fitness_level, FitnessLevel::Advanced);
    assert_eq!(file.preview_seconds, Some(3));

    let plan = generate(&file.workout.resolve(), &phys).unwrap();
    assert_eq!(plan.config().peak_count, 4);
    assert_eq!(plan.config().level, Level::Hard);
    // første punkt starter på hvilepuls
    assert_eq!(plan.samples()[0].lower_bound, 51.0);
}

#[test]
fn bad_profile_in_file_falls_back() {
    let cfg = json!({"profile": {"max_hr": 100, "rest_hr": 100, "zone_width": 10}});
    let file = SessionFile::from_json_str(&cfg.to_string()).unwrap();
    assert_eq!(file.physiology_or(UserPhysiology::default()), UserPhysiology::default());
}

#[test]
fn wrong_type_reports_path() {
    let cfg = json!({"workout": {"peak_count": "three"}});
    match SessionFile::from_json_str(&cfg.to_string()) {
        Err(ConfigError::Parse { path, .. }) => assert_eq!(path, "workout.peak_count"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn out_of_range_request_is_clamped() {
    let cfg = json!({"workout": {"duration_minutes": -5, "peak_count": 0}});
    let file = SessionFile::from_json_str(&cfg.to_string()).unwrap();
    let resolved = file.workout.resolve();
    assert_eq!(resolved.peak_count, 3);
    assert_eq!(resolved, allocate(20 * 60, 3, Level::Medium));
}
