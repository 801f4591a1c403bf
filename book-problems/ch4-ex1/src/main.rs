extern crate clap;
extern crate common;

use clap::Parser;

use common::*;
use common::building::{BuildingSetup, BuildingData};

fn main() {
  let config = Config::parse();
  init_logging(config.verbose);

  let data: BuildingData = BuildingSetup::default().into();
  run_main("ch4-ex1", &data, &config);
}
