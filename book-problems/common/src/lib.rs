//! Shared setup for the book examples: the embedded datasets, the
//! command line every example binary accepts, logging, and the
//! filter -> table -> charts driver.

extern crate clap;
extern crate ndarray as nd;
extern crate rand;
extern crate rand_isaac;
extern crate tracing;
extern crate tracing_subscriber;
extern crate kf_core;
extern crate kf_filters;
extern crate util;
extern crate plot_helper;

use clap::Parser;
use tracing::{error, info};

use std::path::PathBuf;

pub use kf_core::{Error, Result};
pub use util::{Cell, ModelTruth, StateSteps, Table};
pub use plot_helper::{Chart, PlotTarget, Style};

pub mod aircraft;
pub mod building;
pub mod gold_bar;
pub mod temperature;
pub mod tracking;

/// Options shared by every example binary.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
  /// Only write the PNG charts, don't open a gnuplot window.
  #[arg(long, default_value_t = false)]
  pub no_gui: bool,

  /// Skip the charts entirely and only print the table.
  #[arg(long, default_value_t = false)]
  pub no_plot: bool,

  /// Directory the PNG charts are written to.
  #[arg(long, value_name = "DIR", default_value = "graphs")]
  pub out_dir: PathBuf,

  /// Log every predict/update step (DEBUG level)
  #[arg(long, short, default_value_t = false)]
  pub verbose: bool,
}

/// One worked example of the book.
pub trait Example {
  fn title(&self) -> String;
  fn run(&self) -> Result<StateSteps>;
  fn table(&self, states: &StateSteps) -> Table;
  fn charts(&self, states: &StateSteps) -> Vec<Chart>;
}

/// Logs go to stderr so the printed table stays clean.
pub fn init_logging(verbose: bool) {
  let subscriber = tracing_subscriber::fmt()
    .with_writer(::std::io::stderr)
    .with_target(false)
    .with_level(true);

  if verbose {
    subscriber
      .with_max_level(tracing::Level::DEBUG)
      .init();
  } else {
    subscriber
      .with_max_level(tracing::Level::INFO)
      .init();
  }
}

/// Filters, prints the table and renders the charts of `example`.
pub fn report<E>(name: &str, example: &E, config: &Config) -> Result<StateSteps>
  where E: Example,
{
  info!("running {}", name);
  let states = example.run()?;

  println!("{}", example.title());
  println!();
  println!("{}", example.table(&states));

  if config.no_plot {
    return Ok(states);
  }

  let target = PlotTarget {
    out_dir: config.out_dir.clone(),
    name: name.to_string(),
    gui: !config.no_gui,
  };
  for chart in example.charts(&states).iter() {
    plot_helper::render(chart, &target)?;
  }

  Ok(states)
}

/// `report`, exiting with status 1 on failure.
pub fn run_main<E>(name: &str, example: &E, config: &Config)
  where E: Example,
{
  if let Err(e) = report(name, example, config) {
    error!("{} failed: {}", name, e);
    ::std::process::exit(1);
  }
}

/// An `(n, 1)` column holding `values`.
pub(crate) fn column(values: &[f64]) -> nd::Array2<f64> {
  nd::Array2::from_shape_fn((values.len(), 1), |(i, _)| values[i] )
}
