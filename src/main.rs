use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ballistic_sim::dataset::{self, DatasetConfig};
use ballistic_sim::io::{load_scenario, write_json, PredictResponse};
use ballistic_sim::sim::{EventKind, Phase};
use ballistic_sim::{
    preset, presets, simulate_with, IdealTrajectory, ManualInput, Result, SimConfig,
    SimulationParameters, TrajectoryResult,
};

#[derive(Parser)]
#[command(name = "ballistic-sim")]
#[command(version)]
#[command(about = "Projectile and missile trajectory prediction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simple-mode projectile from explicit inputs
    Simulate {
        /// Initial speed (m/s)
        #[arg(short = 'v', long)]
        velocity: f64,

        /// Launch angle from horizontal (degrees, negative for downward)
        #[arg(short = 'a', long, default_value = "45.0")]
        angle: f64,

        /// Lumped drag coefficient
        #[arg(short = 'd', long, default_value = "0.01")]
        drag: f64,

        /// Time step (s)
        #[arg(long, default_value = "0.01")]
        dt: f64,

        /// Release height (m)
        #[arg(long, default_value = "0.0")]
        release_height: f64,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Run a preset by id
    Preset {
        id: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List available presets
    Presets,

    /// Run a YAML scenario file
    Scenario {
        path: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate a labelled training dataset as JSON lines
    Dataset {
        #[arg(short = 'n', long, default_value = "2000")]
        samples: usize,

        #[arg(long, default_value = "42")]
        seed: u64,

        /// Release height range, low end (m)
        #[arg(long, default_value = "0.0")]
        height_min: f64,

        /// Release height range, high end (m)
        #[arg(long, default_value = "0.0")]
        height_max: f64,

        /// Output file (stdout if omitted)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Print the full result as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Hard ceiling on simulated time (s)
    #[arg(long)]
    max_time: Option<f64>,
}

impl OutputArgs {
    fn config(&self, base: SimConfig) -> SimConfig {
        SimConfig {
            max_time: self.max_time.unwrap_or(base.max_time),
            ..base
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            velocity,
            angle,
            drag,
            dt,
            release_height,
            output,
        } => {
            let params = ManualInput::Simple {
                v0: velocity,
                angle,
                drag,
                dt,
                release_height,
            }
            .into_parameters()?;
            run("Manual projectile", &params, &output.config(SimConfig::default()), output.json)
        }
        Commands::Preset { id, output } => {
            let p = preset(&id)?;
            run(p.name, &p.params, &output.config(SimConfig::default()), output.json)
        }
        Commands::Presets => {
            print_presets();
            Ok(())
        }
        Commands::Scenario { path, output } => {
            let scenario = load_scenario(&path)?;
            let (params, config) = scenario.resolve()?;
            let title = scenario.name.clone().unwrap_or_else(|| path.display().to_string());
            run(&title, &params, &output.config(config), output.json)
        }
        Commands::Dataset {
            samples,
            seed,
            height_min,
            height_max,
            output,
        } => {
            let config = DatasetConfig {
                n_samples: samples,
                seed,
                release_height_range: (height_min, height_max),
                ..DatasetConfig::default()
            };
            let rows = dataset::generate(&config)?;
            match output {
                Some(path) => {
                    let mut w = BufWriter::new(File::create(path)?);
                    for row in &rows {
                        write_json(&mut w, row, false)?;
                    }
                }
                None => {
                    let mut w = io::stdout().lock();
                    for row in &rows {
                        write_json(&mut w, row, false)?;
                    }
                }
            }
            Ok(())
        }
    }
}

fn run(title: &str, params: &SimulationParameters, config: &SimConfig, json: bool) -> Result<()> {
    let result = simulate_with(params, config)?;
    if json {
        write_json(&mut io::stdout().lock(), &PredictResponse::from(&result), true)
    } else {
        print_report(title, params, &result);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Table output
// ---------------------------------------------------------------------------

fn print_presets() {
    println!();
    println!("  {:<18} {:<30} {:<10} {:<12} {:>10}", "id", "name", "country", "category", "range");
    println!("  {}", "─".repeat(84));
    for p in presets() {
        println!(
            "  {:<18} {:<30} {:<10} {:<12} {:>10}",
            p.id, p.name, p.country, p.category, p.range
        );
    }
    println!();
}

fn print_report(title: &str, params: &SimulationParameters, result: &TrajectoryResult) {
    let s = &result.summary;

    println!();
    println!("====================================================================");
    println!("  TRAJECTORY PREDICTION: {title}");
    println!("====================================================================");
    println!();
    println!("  Inputs");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Speed:         {:>8.1} m/s   Angle:        {:>8.1} deg",
        params.initial_speed, params.launch_angle_deg
    );
    println!(
        "  Drag coeff:    {:>8.5}       Time step:    {:>8.3} s",
        params.drag_coefficient, params.time_step
    );
    if let Some(st) = params.staged_params() {
        println!(
            "  Launch mass:   {:>8.0} kg    Empty mass:   {:>8.0} kg",
            st.launch_mass, st.empty_mass
        );
        println!(
            "  Payload:       {:>8.0} kg    TWR:          {:>8.2}",
            st.payload_mass, st.thrust_to_weight
        );
        println!(
            "  Isp:           {:>8.0} s     Burn time:    {:>8.1} s",
            st.specific_impulse,
            st.burn_time()
        );
        println!("  Delta-v:       {:>8.0} m/s", st.delta_v());
    }
    println!();

    if !result.events.is_empty() {
        println!("  Flight Events");
        println!("  ──────────────────────────────────────────────────────────────────");
        for e in &result.events {
            let label = match &e.kind {
                EventKind::Burnout => "BURNOUT".to_string(),
                EventKind::Separation => "SEPARATION".to_string(),
                EventKind::Apogee => "APOGEE".to_string(),
                EventKind::Impact => "IMPACT".to_string(),
                EventKind::TimeCeiling => "CEILING".to_string(),
                EventKind::Custom(s) => s.clone(),
            };
            println!(
                "  {:<24} t={:>7.1}s   alt={:>9.0}m   vel={:>7.1}m/s",
                label, e.time, e.altitude, e.speed
            );
        }
        println!();
    }

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Max altitude:  {:>10.1} m   ({:.2} km)",
        s.max_altitude,
        s.max_altitude / 1000.0
    );
    println!(
        "  Impact dist:   {:>10.1} m   ({:.2} km)",
        s.impact_distance,
        s.impact_distance / 1000.0
    );
    println!("  Max speed:     {:>10.1} m/s (Mach {:.2})", s.max_speed, s.max_mach);
    println!("  Impact speed:  {:>10.1} m/s at {:.1} deg", s.impact_speed, s.impact_angle_deg);
    println!("  Flight time:   {:>10.1} s", s.flight_time);
    if let Some(loss) = s.energy_loss_percent {
        println!("  Energy loss:   {:>10.1} %", loss);
    }
    if !s.reached_ground() {
        println!("  (stopped at the time ceiling; trajectory incomplete)");
    }
    if params.staged_params().is_none() && params.release_height == 0.0 {
        let ideal = IdealTrajectory::vacuum(params.initial_speed, params.launch_angle_deg);
        println!(
            "  Vacuum range:  {:>10.1} m   apex {:.1} m, {:.1} s",
            ideal.max_range, ideal.max_height, ideal.flight_time
        );
    }
    println!();

    // -----------------------------------------------------------------------
    // Trajectory table (sampled)
    // -----------------------------------------------------------------------
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>8}  {:>10}  {:>10}  {:>9}  {:>7}  {:>9}",
        "t (s)", "x (m)", "alt (m)", "vel (m/s)", "Mach", "phase"
    );
    println!("  {}", "─".repeat(64));

    let n = result.samples.len();
    let interval = (n / 30).max(1);
    for (i, smp) in result.samples.iter().enumerate() {
        if i % interval != 0 && i != n - 1 {
            continue;
        }
        let phase = match smp.phase {
            Phase::Powered => "BURN",
            Phase::Ballistic if smp.flight_path_angle_deg > 0.0 => "COAST",
            Phase::Ballistic => "DESC",
        };
        println!(
            "  {:>8.2}  {:>10.1}  {:>10.1}  {:>9.1}  {:>7.3}  {:>9}",
            smp.time, smp.downrange, smp.altitude, smp.speed, smp.mach, phase
        );
    }
    println!();
}
