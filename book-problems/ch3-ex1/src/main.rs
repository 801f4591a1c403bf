extern crate clap;
extern crate common;

use clap::Parser;

use common::*;
use common::gold_bar::{GoldBarSetup, GoldBarData};

fn main() {
  let config = Config::parse();
  init_logging(config.verbose);

  let data: GoldBarData = GoldBarSetup::default().into();
  run_main("ch3-ex1", &data, &config);
}
