//! Chapter 3, example 1: weighing a gold bar. The system is static, so the
//! alpha filter with `alpha_n = 1/n` just averages the measurements.

use nd::{arr1, Array2, ArrayView2};

use kf_filters::{gh, Workspace};

use crate::{Chart, Example, ModelTruth, Result, StateSteps, Style, Table};

/// Weighing scale readings in grams.
pub const MEASUREMENTS: [f64; 10] = [
  996.0, 994.0, 1021.0, 1000.0, 1002.0, 1010.0, 983.0, 971.0, 993.0, 1023.0,
];

#[derive(Copy, Clone, Debug)]
pub struct GoldBarSetup {
  pub initial_guess: f64,
  pub true_weight: f64,
}
impl Default for GoldBarSetup {
  fn default() -> Self {
    GoldBarSetup {
      initial_guess: 1000.0,
      true_weight: 1000.0,
    }
  }
}

impl From<GoldBarSetup> for GoldBarData {
  fn from(params: GoldBarSetup) -> GoldBarData {
    GoldBarData {
      params,
      truth: Array2::from_elem((MEASUREMENTS.len(), 1), params.true_weight),
      observations: crate::column(&MEASUREMENTS),
    }
  }
}

#[derive(Clone, Debug)]
pub struct GoldBarData {
  pub params: GoldBarSetup,
  pub truth: Array2<f64>,
  pub observations: Array2<f64>,
}

impl ModelTruth<f64> for GoldBarData {
  fn truth(&self) -> ArrayView2<f64> { self.truth.view() }
  fn observations(&self) -> ArrayView2<f64> { self.observations.view() }
}

impl Example for GoldBarData {
  fn title(&self) -> String {
    "Kalman Filter: Gold Bar Weighing".to_string()
  }

  fn run(&self) -> Result<StateSteps> {
    let x0 = arr1(&[self.params.initial_guess]);
    let mut ws = gh::Workspace::alloc(gh::Init { initial_state: x0.view(), })?;
    util::run_filter(&gh::Algo::averaging(), &mut ws, self.observations.view())
  }

  fn table(&self, states: &StateSteps) -> Table {
    let mut t = Table::new()
      .column("Time Step", 10, None)
      .column("Measured Value", 15, None)
      .column("Predicted Value", 17, Some(2))
      .column("Estimated Value", 17, Some(2))
      .column("True Value", 12, Some(1));
    for j in 0..states.steps() {
      t.push_row(vec![
        (j + 1).into(),
        self.observations[[j, 0]].into(),
        states.predictions[[j, 0]].into(),
        states.estimates[[j, 0]].into(),
        self.truth[[j, 0]].into(),
      ]);
    }
    t
  }

  fn charts(&self, states: &StateSteps) -> Vec<Chart> {
    vec![
      Chart::new("weight", &self.title(), "Measurement Index (n)", "Weight (grams)")
        .size(800, 500)
        .series("True Weight", Style::Truth, self.truth.column(0).iter().cloned())
        .series("Measurements", Style::Measured,
                self.observations.column(0).iter().cloned())
        .series("Kalman Estimate", Style::Estimated,
                states.estimate(0).iter().cloned()),
    ]
  }
}
