extern crate clap;
extern crate common;

use clap::Parser;

use common::*;
use common::aircraft::{AircraftSetup, AircraftData};

fn main() {
  let config = Config::parse();
  init_logging(config.verbose);

  let data: AircraftData = AircraftSetup::accelerating_alpha_beta_gamma().into();
  run_main("ch3-ex4", &data, &config);
}
