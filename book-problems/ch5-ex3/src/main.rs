extern crate clap;
extern crate common;

use clap::Parser;

use common::*;
use common::temperature::{TemperatureSetup, TemperatureData};

fn main() {
  let config = Config::parse();
  init_logging(config.verbose);

  let data: TemperatureData = TemperatureSetup::heating_high_process_noise().into();
  run_main("ch5-ex3", &data, &config);
}
