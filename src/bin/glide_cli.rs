use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::error::Error;

use glide_engine::{
    linear_fit, run_density_sweep, run_trials, Scene, SimConfig, Strategy, Weather,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(name = "glide")]
#[command(version = "0.1.0")]
#[command(about = "Monte Carlo glider flight simulator over stochastic thermal fields", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Fixed heading, take whatever lift the path crosses
    Naive,
    /// Re-steer toward the nearest detected thermal
    Seeking,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Naive => Strategy::Naive,
            StrategyArg::Seeking => Strategy::Seeking,
        }
    }
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Field width along x (km)
    #[arg(long, default_value = "10.0")]
    dim_x: f64,

    /// Field width along y (km)
    #[arg(long, default_value = "10.0")]
    dim_y: f64,

    /// Thermal radius (km)
    #[arg(short = 'r', long, default_value = "0.3")]
    radius: f64,

    /// Lift ceiling height (m)
    #[arg(long, default_value = "1600.0")]
    height: f64,

    /// Thermal density (per km²)
    #[arg(short = 'd', long, default_value = "0.5")]
    density: f64,

    /// Lift-to-drag ratio
    #[arg(short = 'l', long, default_value = "30.0")]
    ldr: f64,

    /// Cruise speed (km/h)
    #[arg(short = 's', long, default_value = "98.0")]
    speed: f64,

    /// Initial altitude (m)
    #[arg(short = 'a', long, default_value = "1250.0")]
    altitude: f64,

    /// Time increment per step (s)
    #[arg(short = 'i', long, default_value = "10.0")]
    increment: f64,

    /// Uniform thermal climb rate (m/s)
    #[arg(short = 'c', long, default_value = "2.0")]
    climb_rate: f64,

    /// Steering strategy
    #[arg(long, value_enum, default_value = "naive")]
    strategy: StrategyArg,

    /// Derive per-thermal climb rates from weather: ground temperature (°C)
    #[arg(long)]
    temperature: Option<f64>,

    /// Dew point (°C), used with --temperature
    #[arg(long, default_value = "10.0")]
    dew_point: f64,

    /// Station pressure (hPa), used with --temperature
    #[arg(long, default_value = "1013.25")]
    pressure: f64,

    /// Relative humidity (%), used with --temperature
    #[arg(long, default_value = "50.0")]
    humidity: f64,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

impl ConfigArgs {
    fn to_config(&self) -> SimConfig {
        SimConfig {
            dim_x: self.dim_x,
            dim_y: self.dim_y,
            radius: self.radius,
            height: self.height,
            density: self.density,
            ldr: self.ldr,
            speed: self.speed,
            altitude: self.altitude,
            increment: self.increment,
            climb_rate: self.climb_rate,
            strategy: self.strategy.into(),
            weather: self
                .temperature
                .map(|t| Weather::new(self.pressure, t, self.dew_point, self.humidity)),
            seed: self.seed,
            ..SimConfig::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single flight and report its history summary
    Simulate {
        #[command(flatten)]
        config: ConfigArgs,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
    /// Run a batch of independent trials and report aggregate statistics
    MonteCarlo {
        #[command(flatten)]
        config: ConfigArgs,

        /// Number of trials
        #[arg(short = 'n', long, default_value = "100")]
        num_trials: usize,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
    /// Sweep thermal density and fit aggregate-vs-density
    DensitySweep {
        #[command(flatten)]
        config: ConfigArgs,

        /// Densities to sweep (per km²)
        #[arg(long, value_delimiter = ',', default_value = "0.2,0.4,0.6,0.8")]
        densities: Vec<f64>,

        /// Trials per density
        #[arg(short = 'n', long, default_value = "50")]
        num_trials: usize,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
}

#[derive(Debug, Serialize)]
struct SimulateReport {
    flight_time_s: f64,
    flight_distance_km: f64,
    final_altitude_m: f64,
    thermals_crossed: usize,
    mean_free_path_km: f64,
    truncated: bool,
    free_paths_km: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct SweepReport {
    points: Vec<glide_engine::DensityPoint>,
    rate_constant_km_per_density: Option<f64>,
    intercept_km: Option<f64>,
}

fn run_simulate(config: &SimConfig, output: OutputFormat) -> Result<(), Box<dyn Error>> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut scene = Scene::from_config(config, &mut rng)?;
    let outcome = scene.run()?;
    let mean_free_path = if outcome.free_paths.is_empty() {
        f64::NAN
    } else {
        outcome.free_paths.iter().sum::<f64>() / outcome.free_paths.len() as f64
    };
    let report = SimulateReport {
        flight_time_s: scene.time,
        flight_distance_km: scene.flight_distance(),
        final_altitude_m: scene.glider.altitude.max(0.0),
        thermals_crossed: outcome.free_paths.len(),
        mean_free_path_km: mean_free_path,
        truncated: outcome.truncated,
        free_paths_km: outcome.free_paths,
    };
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            println!("FLIGHT SUMMARY");
            println!("{}", "-".repeat(40));
            println!("Time flown:      {:.0} s", report.flight_time_s);
            println!("Distance:        {:.2} km", report.flight_distance_km);
            println!("Final altitude:  {:.0} m", report.final_altitude_m);
            println!("Thermals crossed: {}", report.thermals_crossed);
            println!("Mean free path:  {:.2} km", report.mean_free_path_km);
            if report.truncated {
                println!("NOTE: trial truncated at the iteration cap");
            }
        }
    }
    Ok(())
}

fn print_stats_row(name: &str, stats: &glide_engine::SummaryStatistics) {
    println!(
        "{name:<18} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>6}",
        stats.mean, stats.std, stats.min, stats.max, stats.count
    );
}

fn run_monte_carlo(
    config: &SimConfig,
    num_trials: usize,
    output: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let batch = run_trials(config, num_trials)?;
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&batch)?),
        OutputFormat::Table => {
            println!("MONTE CARLO RESULTS ({num_trials} trials)");
            println!("{}", "-".repeat(70));
            println!(
                "{:<18} {:>10} {:>10} {:>10} {:>10} {:>6}",
                "field", "mean", "std", "min", "max", "n"
            );
            print_stats_row("free path (km)", &batch.mean_free_path);
            print_stats_row("energy gain (J)", &batch.energy_gained);
            print_stats_row("flight time (s)", &batch.flight_time);
            print_stats_row("distance (km)", &batch.flight_distance);
            println!(
                "failed: {}  truncated: {}",
                batch.failed_trials, batch.truncated_trials
            );
        }
    }
    Ok(())
}

fn run_sweep(
    config: &SimConfig,
    densities: &[f64],
    num_trials: usize,
    output: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let points = run_density_sweep(config, densities, num_trials)?;
    let xs: Vec<f64> = points.iter().map(|p| p.density).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.mean_free_path).collect();
    let fit = linear_fit(&xs, &ys);
    let report = SweepReport {
        points,
        rate_constant_km_per_density: fit.map(|(slope, _)| slope),
        intercept_km: fit.map(|(_, intercept)| intercept),
    };
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            println!("DENSITY SWEEP ({num_trials} trials per point)");
            println!("{}", "-".repeat(48));
            println!(
                "{:>10} {:>16} {:>16}",
                "density", "free path (km)", "time (s)"
            );
            for p in &report.points {
                println!(
                    "{:>10.3} {:>16.3} {:>16.1}",
                    p.density, p.mean_free_path, p.flight_time
                );
            }
            match fit {
                Some((slope, intercept)) => println!(
                    "linear fit: free path = {slope:.3} * density + {intercept:.3}"
                ),
                None => println!("linear fit: not enough finite points"),
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Simulate { config, output } => run_simulate(&config.to_config(), output),
        Commands::MonteCarlo {
            config,
            num_trials,
            output,
        } => run_monte_carlo(&config.to_config(), num_trials, output),
        Commands::DensitySweep {
            config,
            densities,
            num_trials,
            output,
        } => run_sweep(&config.to_config(), &densities, num_trials, output),
    }
}
