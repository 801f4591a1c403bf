//! One-dimensional Kalman filter for a static system, optionally with
//! process noise.

use nd::{Array1, Array2, ArrayView1, ArrayView2};

use kf_core::{check_finite, check_variance, check_dim, Result};
use crate::{Algorithm, EstimateWorkspace, Initializer, Workspace as WorkspaceT};

#[derive(Debug, Clone, Copy)]
pub struct Init {
  pub initial_estimate: f64,
  pub initial_variance: f64,
}
impl Initializer for Init { }

#[derive(Debug, Clone)]
pub struct Workspace {
  estimate: Array1<f64>,
  variance: Array2<f64>,

  prediction: Array1<f64>,
  variance_predict: Array2<f64>,
  gain: Array2<f64>,
}
impl WorkspaceT<Init> for Workspace {
  fn alloc(i: Init) -> Result<Workspace> {
    let x = check_finite("initial estimate", i.initial_estimate)?;
    let p = check_variance("initial variance", i.initial_variance)?;

    Ok(Workspace {
      estimate: Array1::from_elem(1, x),
      variance: Array2::from_elem((1, 1), p),
      prediction: Array1::from_elem(1, x),
      variance_predict: Array2::from_elem((1, 1), p),
      gain: Array2::zeros((1, 1)),
    })
  }
}
impl Workspace {
  pub fn estimate(&self) -> f64 { self.estimate[0] }
  pub fn variance(&self) -> f64 { self.variance[[0, 0]] }
  pub fn prediction(&self) -> f64 { self.prediction[0] }
  pub fn predicted_variance(&self) -> f64 { self.variance_predict[[0, 0]] }
  pub fn gain(&self) -> f64 { self.gain[[0, 0]] }
}
impl EstimateWorkspace for Workspace {
  fn prediction_view(&self) -> ArrayView1<f64> { self.prediction.view() }
  fn estimate_view(&self) -> ArrayView1<f64> { self.estimate.view() }
  fn gain_view(&self) -> ArrayView2<f64> { self.gain.view() }
  fn covariance_view(&self) -> Option<ArrayView2<f64>> { Some(self.variance.view()) }
  fn prediction_covariance_view(&self) -> Option<ArrayView2<f64>> {
    Some(self.variance_predict.view())
  }
}

#[derive(Debug, Clone, Copy)]
pub struct Algo {
  /// q
  process_variance: f64,
  /// r
  measurement_variance: f64,
}

impl Algo {
  pub fn new(process_variance: f64, measurement_variance: f64) -> Result<Algo> {
    Ok(Algo {
      process_variance: check_variance("process noise variance", process_variance)?,
      measurement_variance: check_variance("measurement variance",
                                           measurement_variance)?,
    })
  }
  /// No process noise: the true value never changes.
  pub fn static_system(measurement_variance: f64) -> Result<Algo> {
    Algo::new(0.0, measurement_variance)
  }

  pub fn process_variance(&self) -> f64 { self.process_variance }
  pub fn measurement_variance(&self) -> f64 { self.measurement_variance }
}

impl Algorithm<Workspace> for Algo {
  fn measurement_dim(&self) -> usize { 1 }

  fn predict(&self, _step: u64, ws: &mut Workspace) -> Result<()> {
    ws.prediction[0] = ws.estimate[0];
    ws.variance_predict[[0, 0]] = ws.variance[[0, 0]] + self.process_variance;
    Ok(())
  }

  fn update(&self, _step: u64, ws: &mut Workspace,
            z: ArrayView1<f64>) -> Result<()> {
    check_dim("measurement", 1, z.len())?;

    let x_pred = ws.prediction[0];
    let p_pred = ws.variance_predict[[0, 0]];
    let denom = p_pred + self.measurement_variance;
    // Both uncertainties zero: trust the measurement.
    let k = if denom > 0.0 { p_pred / denom } else { 1.0 };

    ws.estimate[0] = x_pred + k * (z[0] - x_pred);
    ws.variance[[0, 0]] = (1.0 - k) * p_pred;
    ws.gain[[0, 0]] = k;

    Ok(())
  }
}
