//! # Rigcalc CLI Application
//!
//! Terminal front end for `rig_core`: loads a `.rig` plan, solves every truss
//! line, and prints hoist loads and allowable checks as text or JSON.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rig_core::catalog::{HoistCatalog, TrussCatalog};
use rig_core::plan::{solve_plan, PlanReport, RigPlan, TrussOutcome, TrussRig};
use rig_core::rigging::{Fixture, Support};
use rig_core::units::{Meters, Millimeters};
use rig_core::{load_plan, RigError, RigResult};

#[derive(Parser)]
#[command(name = "rig_cli")]
#[command(version)]
#[command(about = "Solve truss rigging plans: hoist loads, moment and deflection checks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Truss catalog JSON file (defaults to the built-in catalog)
    #[arg(long, global = true)]
    trusses: Option<PathBuf>,

    /// Hoist catalog JSON file (defaults to the built-in catalog)
    #[arg(long, global = true)]
    hoists: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve every truss in a rig plan
    Solve {
        /// Path to the .rig plan file
        plan: PathBuf,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Solve a built-in 8 m two-hoist example
    Demo {
        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the active truss and hoist catalogs
    Catalog,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> RigResult<()> {
    let trusses = load_truss_catalog(cli.trusses.as_deref())?;
    let hoists = load_hoist_catalog(cli.hoists.as_deref())?;

    match &cli.command {
        Commands::Solve { plan, json } => {
            let plan = load_plan(plan)?;
            let report = solve_plan(&plan, &trusses, &hoists);
            print_report(&report, *json)
        }
        Commands::Demo { json } => {
            let report = solve_plan(&demo_plan(), &trusses, &hoists);
            print_report(&report, *json)
        }
        Commands::Catalog => {
            print_catalogs(&trusses, &hoists);
            Ok(())
        }
    }
}

fn load_truss_catalog(path: Option<&Path>) -> RigResult<TrussCatalog> {
    match path {
        Some(path) => TrussCatalog::from_json_file(path),
        None => Ok(TrussCatalog::built_in().clone()),
    }
}

fn load_hoist_catalog(path: Option<&Path>) -> RigResult<HoistCatalog> {
    match path {
        Some(path) => HoistCatalog::from_json_file(path),
        None => Ok(HoistCatalog::built_in().clone()),
    }
}

/// 8 m box truss on two hoists, one 40 kg fixture at the centre, DF 1.2
fn demo_plan() -> RigPlan {
    let mut plan = RigPlan::new("Demo", "Rigcalc");
    plan.settings.default_options.dynamic_factor = 1.2;
    plan.add_truss(
        TrussRig::new("Demo truss", "box290-8m")
            .with_fixture(Fixture::new(4.0, 40.0).with_name("Moving head"))
            .with_supports(vec![Support::new(0.8, "SL"), Support::new(7.2, "SR")]),
    );
    plan
}

fn print_report(report: &PlanReport, json: bool) -> RigResult<()> {
    if json {
        let text = serde_json::to_string_pretty(report).map_err(RigError::from)?;
        println!("{}", text);
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  {} @ {}", report.production, report.venue);
    println!("═══════════════════════════════════════");

    for truss in &report.trusses {
        println!();
        println!("{} ({})", truss.label, truss.truss_id);

        match &truss.outcome {
            TrussOutcome::Solved { result, picks } => {
                println!("  Total load: {:.1} kg", result.total_load_kg);
                println!();
                println!("  Supports:");
                for pick in picks {
                    let hoist = match &pick.hoist {
                        Some(h) => h.name.as_str(),
                        None => "NO HOIST LARGE ENOUGH",
                    };
                    let note = if pick.is_uplift() { "  UPLIFT" } else { "" };
                    println!(
                        "    {:<8} x={:>6.2} m  {:>8.1} kg  {}{}",
                        pick.support.label, pick.support.x_m, pick.required_kg, hoist, note
                    );
                }
                println!();
                println!("  Checks:");
                println!(
                    "    Moment:     {:.2} ({:.0} N·m at {:.2} m) {}",
                    result.moment_unity,
                    result.max_moment_nm,
                    result.max_moment_position_m,
                    status_icon(result.ok_against_allowables.moment)
                );
                println!(
                    "    Deflection: {:.2} ({:.1} mm at {:.2} m) {}",
                    result.deflection_unity,
                    mm(result.max_deflection_m),
                    result.max_deflection_position_m,
                    status_icon(result.ok_against_allowables.deflection)
                );
                println!(
                    "  RESULT: {} (governs: {})",
                    result.status(),
                    result.governing_condition()
                );
            }
            TrussOutcome::Failed { error } => {
                println!("  ERROR [{}]: {}", error.error_code(), error);
            }
        }
    }

    println!();
    println!("═══════════════════════════════════════");
    println!(
        "  {} solved, {} failed, {}",
        report.solved_count(),
        report.failed_count(),
        if report.all_ok() { "ALL OK" } else { "ATTENTION REQUIRED" }
    );
    println!("═══════════════════════════════════════");
    Ok(())
}

fn print_catalogs(trusses: &TrussCatalog, hoists: &HoistCatalog) {
    println!("Trusses:");
    println!(
        "  {:<14} {:>6} {:>7} {:>10} {:>9} {:>8}",
        "id", "L (m)", "kg/m", "EI (N·m²)", "M (N·m)", "δ (mm)"
    );
    for t in trusses.models() {
        println!(
            "  {:<14} {:>6.1} {:>7.1} {:>10.3e} {:>9.0} {:>8.1}",
            t.id,
            t.length_m,
            t.mass_per_m_kg,
            t.ei_nm2,
            t.max_moment_nm,
            mm(t.max_deflection_m)
        );
    }
    println!();
    println!("Hoists:");
    for h in hoists.entries() {
        println!("  {:<24} {:>7.0} kg", h.name, h.capacity_kg);
    }
}

fn mm(metres: f64) -> f64 {
    Millimeters::from(Meters(metres)).0
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[FAIL]"
    }
}
