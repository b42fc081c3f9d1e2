use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use log::info;

use hr_interval_core::cli::{frame_line, print_plan_report, print_summary};
use hr_interval_core::config::DEFAULT_PREVIEW_SECONDS;
use hr_interval_core::storage::save_quietly;
use hr_interval_core::{
    generate, load_or_default, HrSimulator, JsonFileStore, Level, ManualScheduler,
    SessionController, SessionEvent, SessionFile, SessionSummary, SystemScheduler,
    UserPhysiology, WorkoutRequest, WorkoutResults,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Heart-rate interval workout planner and session runner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the generated plan
    Plan {
        #[command(flatten)]
        workout: WorkoutArgs,
        /// Emit the plan as JSON instead of a report
        #[arg(long)]
        json: bool,
    },
    /// Run a whole session with simulated heart rate and export the results
    Simulate {
        #[command(flatten)]
        workout: WorkoutArgs,
        /// Seed for the heart-rate simulator
        #[arg(long)]
        seed: Option<u64>,
        /// Directory for the results file
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Also write the time series as CSV
        #[arg(long)]
        csv: bool,
        /// Run against the wall clock instead of fast-forwarding
        #[arg(long)]
        realtime: bool,
        /// Print session counters in Prometheus text format
        #[arg(long)]
        metrics: bool,
    },
}

#[derive(Args, Debug)]
struct WorkoutArgs {
    /// Session file (JSON); flags below override its workout section
    #[arg(long)]
    session: Option<PathBuf>,
    /// Profile store (JSON)
    #[arg(long, default_value = "hr_profile.json")]
    profile: PathBuf,
    #[arg(long)]
    duration_min: Option<i64>,
    #[arg(long)]
    peaks: Option<i64>,
    #[arg(long)]
    level: Option<Level>,
    /// Save the resolved profile back to the profile store
    #[arg(long)]
    save_profile: bool,
}

impl WorkoutArgs {
    fn resolve(&self) -> Result<(UserPhysiology, WorkoutRequest, Option<u64>)> {
        let file = match &self.session {
            Some(path) => SessionFile::load(path)
                .with_context(|| format!("reading session file {}", path.display()))?,
            None => SessionFile::default(),
        };

        let store = JsonFileStore::new(&self.profile);
        let physiology = file.physiology_or(load_or_default(&store));
        if self.save_profile {
            save_quietly(&store, &physiology);
        }

        let mut request = file.workout.clone();
        if self.duration_min.is_some() {
            request.duration_minutes = self.duration_min;
        }
        if self.peaks.is_some() {
            request.peak_count = self.peaks;
        }
        if let Some(level) = self.level {
            request.level = level;
        }
        Ok((physiology, request, file.preview_seconds))
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Plan { workout, json } => {
            let (physiology, request, _) = workout.resolve()?;
            let plan = generate(&request.resolve(), &physiology)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_plan_report(&plan);
            }
        }
        Command::Simulate { workout, seed, out_dir, csv, realtime, metrics } => {
            let (physiology, request, preview) = workout.resolve()?;
            let config = request.resolve();
            let simulator = match seed {
                Some(s) => HrSimulator::seeded(s, physiology.rest_hr, physiology.max_hr),
                None => HrSimulator::from_entropy(physiology.rest_hr, physiology.max_hr),
            };

            let (summary, rendered, plan) = if realtime {
                let preview = Duration::from_secs(preview.unwrap_or(DEFAULT_PREVIEW_SECONDS));
                let mut ctl = SessionController::new(physiology, config, SystemScheduler::new(), simulator)?;
                print_plan_report(ctl.plan());
                ctl.start_with_preview(preview)?;
                let summary = run_realtime(&mut ctl);
                (summary, ctl.metrics().render()?, ctl.plan().clone())
            } else {
                let mut ctl = SessionController::new(physiology, config, ManualScheduler::new(), simulator)?;
                ctl.start()?;
                let limit = u64::from(ctl.plan().total_seconds()) + 10;
                let summary = ctl.run_to_end(limit).context("session did not finish")?;
                (summary, ctl.metrics().render()?, ctl.plan().clone())
            };

            print_summary(&summary);
            if metrics {
                print!("{rendered}");
            }
            let results = WorkoutResults::build(Utc::now(), &physiology, &plan, &summary);
            let path = results.write_json(&out_dir).context("writing results")?;
            println!("Results: {}", path.display());
            if csv {
                let path = results.write_csv(&out_dir).context("writing csv")?;
                println!("Series: {}", path.display());
            }
        }
    }
    Ok(())
}

/// Kooperativ løkke mot veggklokka: sov til neste timer, pump, gjenta.
fn run_realtime(ctl: &mut SessionController<SystemScheduler>) -> SessionSummary {
    loop {
        for event in ctl.pump() {
            match event {
                SessionEvent::Tick(frame) => println!("{}", frame_line(&frame)),
                SessionEvent::Live => info!("go!"),
                SessionEvent::Finished(summary) => return summary,
                SessionEvent::HeartRate(_) | SessionEvent::SourceChanged(_) => {}
            }
        }
        let wait = ctl
            .scheduler()
            .until_next()
            .unwrap_or(Duration::from_millis(100))
            .max(Duration::from_millis(5));
        std::thread::sleep(wait);
    }
}
