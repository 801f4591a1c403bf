//! Chapter 4: estimating the height of a building with a one-dimensional
//! Kalman filter. The building doesn't move, so there is no process noise.

use nd::{Array2, ArrayView2};

use kf_filters::kalman::scalar;
use kf_filters::Workspace;

use crate::{Chart, Example, ModelTruth, Result, StateSteps, Table};

/// Altimeter readings in meters.
pub const MEASUREMENTS: [f64; 10] = [
  49.03, 48.44, 55.21, 49.98, 50.6, 52.61, 45.87, 42.64, 48.26, 55.84,
];

#[derive(Copy, Clone, Debug)]
pub struct BuildingSetup {
  pub true_height: f64,
  /// Estimated by eye.
  pub initial_estimate: f64,
  /// Human estimation error, 15 m standard deviation.
  pub initial_variance: f64,
  /// Altimeter error, 5 m standard deviation.
  pub measurement_variance: f64,
}
impl Default for BuildingSetup {
  fn default() -> Self {
    BuildingSetup {
      true_height: 50.0,
      initial_estimate: 60.0,
      initial_variance: 15.0 * 15.0,
      measurement_variance: 5.0 * 5.0,
    }
  }
}

impl From<BuildingSetup> for BuildingData {
  fn from(params: BuildingSetup) -> BuildingData {
    BuildingData {
      params,
      truth: Array2::from_elem((MEASUREMENTS.len(), 1), params.true_height),
      observations: crate::column(&MEASUREMENTS),
    }
  }
}

#[derive(Clone, Debug)]
pub struct BuildingData {
  pub params: BuildingSetup,
  pub truth: Array2<f64>,
  pub observations: Array2<f64>,
}

impl ModelTruth<f64> for BuildingData {
  fn truth(&self) -> ArrayView2<f64> { self.truth.view() }
  fn observations(&self) -> ArrayView2<f64> { self.observations.view() }
}

impl Example for BuildingData {
  fn title(&self) -> String {
    "1D Kalman Filter: Building Height Estimation".to_string()
  }

  fn run(&self) -> Result<StateSteps> {
    let algo = scalar::Algo::static_system(self.params.measurement_variance)?;
    let mut ws = scalar::Workspace::alloc(scalar::Init {
      initial_estimate: self.params.initial_estimate,
      initial_variance: self.params.initial_variance,
    })?;
    util::run_filter(&algo, &mut ws, self.observations.view())
  }

  fn table(&self, states: &StateSteps) -> Table {
    let mut t = Table::new()
      .column("Time Step", 10, None)
      .column("Measurement", 12, Some(2))
      .column("Prediction", 12, Some(2))
      .column("Estimate", 12, Some(2))
      .column("Variance", 10, Some(2))
      .column("Kalman Gain", 12, Some(2));
    let variances = states.variance(0);
    for j in 0..states.steps() {
      t.push_row(vec![
        (j + 1).into(),
        self.observations[[j, 0]].into(),
        states.predictions[[j, 0]].into(),
        states.estimates[[j, 0]].into(),
        variances.map(|v| v[j] ).unwrap_or(::std::f64::NAN).into(),
        states.gains[[j, 0, 0]].into(),
      ]);
    }
    t
  }

  fn charts(&self, states: &StateSteps) -> Vec<Chart> {
    vec![
      plot_helper::estimate_chart(self, states, 0, true,
                                  Chart::new("height", &self.title(),
                                             "Measurement Number", "Height (m)")),
      plot_helper::gain_chart(states, 0,
                              Chart::new("gain", "Kalman Gain Over Time",
                                         "Measurement Number", "Kalman Gain")),
    ]
  }
}
