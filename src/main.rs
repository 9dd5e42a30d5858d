// Demo driver: trains a network on a simulated sensor and classifies fresh bursts.
// On real hardware the `SampleSource` would wrap an ADC pin instead.

use std::time::Duration;

use burst_nn::{
    train_session, Network, NetworkSpec, Result, SampleSource, StopCondition, SystemClock, TrainConfig,
    TrainingSet,
};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON network spec; a 16-bin, three-material network is used if omitted
    #[arg(long)]
    spec: Option<String>,

    /// Learning rate for every update
    #[arg(long, default_value_t = 0.1)]
    rate: f32,

    /// Stop after this many updates
    #[arg(long, conflicts_with_all = ["seconds", "cost"])]
    iterations: Option<usize>,

    /// Stop after this many seconds
    #[arg(long, conflicts_with = "cost")]
    seconds: Option<u64>,

    /// Stop once every label's cost is at or below this value
    #[arg(long)]
    cost: Option<f32>,

    /// Bursts collected per label
    #[arg(long, default_value_t = 5)]
    sets: usize,

    /// Samples per burst
    #[arg(long, default_value_t = 64)]
    burst_len: usize,

    /// Seed for weights, simulated readings and training order
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

/// Readings scattered around a level that depends on which material is attached.
struct SimulatedSensor {
    rng: StdRng,
    max_input: u16,
    num_labels: usize,
    label: usize,
}

impl SimulatedSensor {
    fn level(&self) -> f32 {
        f32::from(self.max_input) * (self.label + 1) as f32 / (self.num_labels + 1) as f32
    }
}

impl SampleSource for SimulatedSensor {
    fn prepare(&mut self, label: usize, name: &str) -> Result<()> {
        log::info!("attach the sensor to material {label}: {name}");
        self.label = label;
        Ok(())
    }

    fn read_burst(&mut self, burst: &mut [u16]) -> Result<()> {
        let level = self.level();
        let spread = f32::from(self.max_input) / (4 * self.num_labels) as f32;
        for sample in burst.iter_mut() {
            let value = level + self.rng.gen_range(-spread..=spread);
            *sample = value.clamp(0.0, f32::from(self.max_input)) as u16;
        }
        Ok(())
    }
}

fn stop_condition(args: &Args) -> StopCondition {
    if let Some(n) = args.iterations {
        StopCondition::Iterations(n)
    } else if let Some(secs) = args.seconds {
        StopCondition::Duration(Duration::from_secs(secs))
    } else {
        StopCondition::Cost {
            threshold: args.cost.unwrap_or(0.02),
            max_iterations: 100_000,
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let spec = match &args.spec {
        Some(path) => NetworkSpec::load_json(path)?,
        None => NetworkSpec::new(16, 8, 1, 1023, ["air", "wood", "steel"]),
    };
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut sensor = SimulatedSensor {
        rng: StdRng::seed_from_u64(args.seed.wrapping_add(1)),
        max_input: spec.max_input,
        num_labels: spec.num_output_neurons,
        label: 0,
    };

    let set = TrainingSet::collect(&mut sensor, &spec.labels, args.sets, args.burst_len)?;
    let mut network = Network::new(spec.clone(), &mut rng)?;
    let config = TrainConfig::new(args.rate, stop_condition(args)).log_every(1000);
    let report = train_session(&mut network, &set, &config, &mut rng, &SystemClock::new())?;
    println!(
        "trained for {} iterations ({} ms), accuracy {:.1}%",
        report.iterations,
        report.elapsed_ms,
        report.accuracy * 100.0
    );

    let mut burst = vec![0u16; args.burst_len];
    for (label, name) in spec.labels.iter().enumerate() {
        sensor.prepare(label, name)?;
        sensor.read_burst(&mut burst)?;
        network.classify(&burst)?;
        println!("\n{}", network.report());
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .init();

    if let Err(e) = run(&args) {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
