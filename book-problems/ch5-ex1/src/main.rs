extern crate clap;
extern crate common;

use clap::Parser;

use common::*;
use common::temperature::{TemperatureSetup, TemperatureData};

fn main() {
  let config = Config::parse();
  init_logging(config.verbose);

  let data: TemperatureData = TemperatureSetup::default().into();
  run_main("ch5-ex1", &data, &config);
}
