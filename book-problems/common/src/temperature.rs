//! Chapter 5: estimating the temperature of a liquid in a tank with a
//! one-dimensional Kalman filter that models process noise.
//!
//! Example 1 keeps the liquid at a constant temperature. Examples 2 and 3
//! heat it while the filter still assumes a constant temperature; only the
//! process noise differs, and the larger one lets the filter keep up.

use nd::{Array2, ArrayView2};

use kf_filters::kalman::scalar;
use kf_filters::Workspace;

use crate::{Cell, Chart, Example, ModelTruth, Result, StateSteps, Table};

pub const STEADY_TRUTH: [f64; 10] = [
  50.005, 49.994, 49.993, 50.001, 50.006, 49.998, 50.021, 50.005, 50.0, 49.997,
];
pub const STEADY_MEASUREMENTS: [f64; 10] = [
  49.986, 49.963, 50.09, 50.001, 50.018, 50.05, 49.938, 49.858, 49.965, 50.114,
];

pub const HEATING_TRUTH: [f64; 10] = [
  50.505, 50.994, 51.493, 52.001, 52.506, 52.998, 53.521, 54.005, 54.5, 54.997,
];
pub const HEATING_MEASUREMENTS: [f64; 10] = [
  50.486, 50.963, 51.597, 52.001, 52.518, 53.05, 53.438, 53.858, 54.465, 55.114,
];

/// Column order of the printed table; the book's examples differ.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TableLayout {
  /// `True Temp`, ..., `Variance`, `Gain`
  VarianceFirst,
  /// `True`, ..., `Gain`, `Variance`
  GainFirst,
}

#[derive(Copy, Clone, Debug)]
pub struct TemperatureSetup {
  pub title: &'static str,
  pub gain_title: &'static str,
  pub layout: TableLayout,
  pub initial_estimate: f64,
  pub initial_variance: f64,
  /// q
  pub process_variance: f64,
  /// r, thermometer accuracy of 0.1 degrees
  pub measurement_variance: f64,
  pub truth: &'static [f64],
  pub measurements: &'static [f64],
}

impl Default for TemperatureSetup {
  /// Example 1: liquid at a constant temperature.
  fn default() -> Self {
    TemperatureSetup {
      title: "1D Kalman Filter with Process Noise: Temperature Estimation",
      gain_title: "Kalman Gain over Time",
      layout: TableLayout::VarianceFirst,
      initial_estimate: 60.0,
      initial_variance: 100.0 * 100.0,
      process_variance: 0.0001,
      measurement_variance: 0.1 * 0.1,
      truth: &STEADY_TRUTH,
      measurements: &STEADY_MEASUREMENTS,
    }
  }
}

impl TemperatureSetup {
  /// Example 2: heating liquid, process noise too small for the real dynamics.
  pub fn heating_low_process_noise() -> Self {
    TemperatureSetup {
      title: "Example 7 – KF with Low Process Noise (q = 0.0001)",
      gain_title: "Kalman Gain Over Time – Example 7",
      layout: TableLayout::GainFirst,
      initial_estimate: 10.0,
      initial_variance: 10000.0,
      process_variance: 0.0001,
      measurement_variance: 0.01,
      truth: &HEATING_TRUTH,
      measurements: &HEATING_MEASUREMENTS,
    }
  }
  /// Example 3: heating liquid, larger process noise.
  pub fn heating_high_process_noise() -> Self {
    TemperatureSetup {
      title: "Example 8 – KF with Higher Process Noise (q = 0.15)",
      gain_title: "Kalman Gain Over Time – Example 8",
      process_variance: 0.15,
      ..TemperatureSetup::heating_low_process_noise()
    }
  }
}

impl From<TemperatureSetup> for TemperatureData {
  fn from(params: TemperatureSetup) -> TemperatureData {
    TemperatureData {
      params,
      truth: crate::column(params.truth),
      observations: crate::column(params.measurements),
    }
  }
}

#[derive(Clone, Debug)]
pub struct TemperatureData {
  pub params: TemperatureSetup,
  pub truth: Array2<f64>,
  pub observations: Array2<f64>,
}

impl ModelTruth<f64> for TemperatureData {
  fn truth(&self) -> ArrayView2<f64> { self.truth.view() }
  fn observations(&self) -> ArrayView2<f64> { self.observations.view() }
}

impl Example for TemperatureData {
  fn title(&self) -> String {
    self.params.title.to_string()
  }

  fn run(&self) -> Result<StateSteps> {
    let algo = scalar::Algo::new(self.params.process_variance,
                                 self.params.measurement_variance)?;
    let mut ws = scalar::Workspace::alloc(scalar::Init {
      initial_estimate: self.params.initial_estimate,
      initial_variance: self.params.initial_variance,
    })?;
    util::run_filter(&algo, &mut ws, self.observations.view())
  }

  fn table(&self, states: &StateSteps) -> Table {
    let variance_first = self.params.layout == TableLayout::VarianceFirst;
    let mut t = Table::new()
      .column("Time", 6, None)
      .column(if variance_first { "True Temp" } else { "True" }, 10, Some(3))
      .column("Measured", 10, Some(3))
      .column("Predicted", 12, Some(3))
      .column("Estimate", 10, Some(3));
    t = if variance_first {
      t.column("Variance", 10, Some(6)).column("Gain", 10, Some(6))
    } else {
      t.column("Gain", 10, Some(6)).column("Variance", 10, Some(6))
    };

    let variances = states.variance(0);
    for j in 0..states.steps() {
      let gain: Cell = states.gains[[j, 0, 0]].into();
      let variance: Cell = variances.map(|v| v[j] ).unwrap_or(::std::f64::NAN).into();
      let mut row: Vec<Cell> = vec![
        (j + 1).into(),
        self.truth[[j, 0]].into(),
        self.observations[[j, 0]].into(),
        states.predictions[[j, 0]].into(),
        states.estimates[[j, 0]].into(),
      ];
      if variance_first {
        row.push(variance);
        row.push(gain);
      } else {
        row.push(gain);
        row.push(variance);
      }
      t.push_row(row);
    }
    t
  }

  fn charts(&self, states: &StateSteps) -> Vec<Chart> {
    vec![
      plot_helper::estimate_chart(self, states, 0, true,
                                  Chart::new("temperature", &self.title(),
                                             "Time Step", "Temperature (°C)")),
      plot_helper::gain_chart(states, 0,
                              Chart::new("gain", self.params.gain_title,
                                         "Time Step", "Kalman Gain")),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn header(setup: TemperatureSetup) -> (String, String) {
    let data: TemperatureData = setup.into();
    let states = data.run().unwrap();
    let text = data.table(&states).to_string();
    let mut lines = text.lines();
    let head = lines.next().unwrap().split_whitespace().collect::<Vec<_>>().join(" ");
    let first = lines.nth(1).unwrap().to_string();
    (head, first)
  }

  #[test]
  fn steady_table_lists_variance_before_gain() {
    let (head, first) = header(TemperatureSetup::default());
    assert_eq!(head, "Time True Temp Measured Predicted Estimate Variance Gain");
    let cells: Vec<&str> = first.split_whitespace().collect();
    // K = p / (p + r) with p = 10000 + q, posterior variance about r
    assert_eq!(cells[5], "0.010000");
    assert_eq!(cells[6], "0.999999");
  }

  #[test]
  fn heating_tables_list_gain_before_variance() {
    for setup in [TemperatureSetup::heating_low_process_noise(),
                  TemperatureSetup::heating_high_process_noise()] {
      let (head, first) = header(setup);
      assert_eq!(head, "Time True Measured Predicted Estimate Gain Variance");
      let cells: Vec<&str> = first.split_whitespace().collect();
      assert_eq!(cells[5], "0.999999");
      assert_eq!(cells[6], "0.010000");
    }
  }

  #[test]
  fn heating_titles_name_the_book_example() {
    let low: TemperatureData = TemperatureSetup::heating_low_process_noise().into();
    let high: TemperatureData = TemperatureSetup::heating_high_process_noise().into();
    assert!(low.title().starts_with("Example 7 – "));
    assert!(high.title().starts_with("Example 8 – "));

    let states = high.run().unwrap();
    let charts = high.charts(&states);
    assert_eq!(charts[1].title, "Kalman Gain Over Time – Example 8");
    assert_eq!(charts[0].title, high.title());
  }
}
