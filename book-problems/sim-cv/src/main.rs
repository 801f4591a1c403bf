extern crate clap;
extern crate common;
extern crate tracing;

use clap::Parser;
use tracing::error;

use common::*;
use common::tracking::{TrackingSetup, TrackingData};

#[derive(Parser, Debug)]
#[command(author, version, about = "Simulated constant velocity target", long_about = None)]
struct SimConfig {
  #[command(flatten)]
  common: Config,

  /// Seed of the noise generator; equal seeds give equal runs.
  #[arg(long, default_value_t = 1)]
  seed: u64,

  #[arg(long, default_value_t = 50)]
  steps: usize,
}

fn main() {
  let config = SimConfig::parse();
  init_logging(config.common.verbose);

  let setup = TrackingSetup {
    rand_seed: config.seed,
    steps: config.steps,
    ..Default::default()
  };
  let data = match TrackingData::try_from(setup) {
    Ok(data) => data,
    Err(e) => {
      error!("sim-cv setup failed: {}", e);
      ::std::process::exit(1);
    },
  };
  run_main("sim-cv", &data, &config.common);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn seed_and_steps() {
    let config = SimConfig::parse_from(["sim-cv", "--seed", "7", "--steps", "2000",
                                         "--no-plot"]);
    assert_eq!(config.seed, 7);
    assert_eq!(config.steps, 2000);
    assert!(config.common.no_plot);
  }
}
