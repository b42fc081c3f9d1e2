use std::fmt::Write as _;

use crate::plan::{format_clock, Plan};
use crate::session::{SessionSummary, TickFrame};
use crate::types::Phase;

/// Segmentoversikt: én linje per fasebytte.
pub fn plan_report(plan: &Plan) -> String {
    let cfg = plan.config();
    let mut out = String::new();
    let _ = writeln!(out, "--- Workout Plan ---");
    let _ = writeln!(
        out,
        "Level: {:?}  Peaks: {}  Total: {}",
        cfg.level,
        cfg.peak_count,
        format_clock(plan.total_seconds())
    );
    let _ = writeln!(
        out,
        "Warmup {}s | Peak {}s | Rest {}s | Cooldown {}s",
        cfg.warmup_seconds, cfg.peak_duration_seconds, cfg.rest_duration_seconds, cfg.cooldown_seconds
    );

    let mut current: Option<(Phase, u32)> = None;
    for s in plan.samples() {
        if current != Some((s.phase, s.peak_index)) {
            current = Some((s.phase, s.peak_index));
            let _ = writeln!(
                out,
                "{:>6}  {:<8} #{}  target {:>3}  [{:.1}, {:.1}]",
                format_clock(s.offset_seconds),
                s.phase,
                s.peak_index,
                s.target_hr,
                s.lower_bound,
                s.upper_bound
            );
        }
    }
    out
}

pub fn frame_line(frame: &TickFrame) -> String {
    format!(
        "{:>6} {:<8} #{} HR {:>3} {} [{:.0}-{:.0}]",
        format_clock(frame.elapsed_seconds),
        frame.phase,
        frame.peak_index,
        frame.current_hr,
        frame.zone_status.arrow(),
        frame.target_lower,
        frame.target_upper
    )
}

pub fn summary_report(summary: &SessionSummary) -> String {
    let opt = |v: Option<u16>| v.map_or_else(|| "-".to_string(), |x| x.to_string());
    let mut out = String::new();
    let _ = writeln!(out, "--- Session Results ---");
    let _ = writeln!(out, "Duration: {}", format_clock(summary.total_elapsed));
    let _ = writeln!(
        out,
        "Avg HR: {}",
        summary.avg_hr.map_or_else(|| "-".to_string(), |a| format!("{a:.1}"))
    );
    let _ = writeln!(out, "Max HR: {}  Min HR: {}", opt(summary.max_hr), opt(summary.min_hr));
    let _ = writeln!(
        out,
        "In zone: {}/{} ({}%)  Score: {}",
        summary.compliance.in_zone,
        summary.compliance.samples,
        summary.compliance.percentage,
        summary.compliance.score
    );
    out
}

pub fn print_plan_report(plan: &Plan) {
    print!("{}", plan_report(plan));
}

pub fn print_summary(summary: &SessionSummary) {
    print!("{}", summary_report(summary));
}
