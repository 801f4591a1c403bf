extern crate clap;
extern crate common;

use clap::Parser;

use common::*;
use common::aircraft::{AircraftSetup, AircraftData};

fn main() {
  let config = Config::parse();
  init_logging(config.verbose);

  let data: AircraftData = AircraftSetup::default().into();
  run_main("ch3-ex2", &data, &config);
}
