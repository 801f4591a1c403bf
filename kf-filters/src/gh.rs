//! Fixed-gain (g-h) filters.
//!
//! The alpha, alpha-beta and alpha-beta-gamma filters share one shape: the
//! state is propagated with a kinematic transition matrix and then corrected
//! by a gain vector times the measurement residual `z - x_pred`. Only the
//! first state component is measured.

use nd::{arr2, Array1, Array2, ArrayView1, ArrayView2};

use kf_core::{check_finite, check_interval, check_dim, Error, Operator, Result};
use crate::{Algorithm, EstimateWorkspace, Initializer, Workspace as WorkspaceT};

#[derive(Debug, Clone)]
pub struct Init<'a> {
  pub initial_state: ArrayView1<'a, f64>,
}
impl<'a> Initializer for Init<'a> { }

#[derive(Debug, Clone)]
pub struct Workspace {
  estimate: Array1<f64>,
  prediction: Array1<f64>,
  gain: Array2<f64>,
}
impl<'a> WorkspaceT<Init<'a>> for Workspace {
  fn alloc(i: Init<'a>) -> Result<Workspace> {
    let Init { initial_state, } = i;
    if initial_state.is_empty() {
      return Err(Error::Dimension {
        what: "initial state",
        expected: 1,
        found: 0,
      });
    }
    for &v in initial_state.iter() {
      check_finite("initial state", v)?;
    }

    let n = initial_state.len();
    Ok(Workspace {
      estimate: initial_state.to_owned(),
      prediction: initial_state.to_owned(),
      gain: Array2::zeros((n, 1)),
    })
  }
}
impl EstimateWorkspace for Workspace {
  fn prediction_view(&self) -> ArrayView1<f64> { self.prediction.view() }
  fn estimate_view(&self) -> ArrayView1<f64> { self.estimate.view() }
  fn gain_view(&self) -> ArrayView2<f64> { self.gain.view() }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GainSchedule {
  Fixed(Array1<f64>),
  /// `alpha_n = 1/n`: the estimate is the running mean of the measurements.
  Averaging,
}

#[derive(Debug, Clone)]
pub struct Algo {
  transition: Array2<f64>,
  gain: GainSchedule,
}

impl Algo {
  /// Static system with a constant `alpha`.
  pub fn alpha(alpha: f64) -> Result<Algo> {
    check_finite("alpha", alpha)?;
    Ok(Algo {
      transition: Array2::eye(1),
      gain: GainSchedule::Fixed(Array1::from_elem(1, alpha)),
    })
  }
  /// Static system, gain `1/n` for the `n`-th measurement.
  pub fn averaging() -> Algo {
    Algo {
      transition: Array2::eye(1),
      gain: GainSchedule::Averaging,
    }
  }
  /// Constant velocity model, state `[x, v]`.
  pub fn alpha_beta(alpha: f64, beta: f64, dt: f64) -> Result<Algo> {
    check_finite("alpha", alpha)?;
    check_finite("beta", beta)?;
    let dt = check_interval(dt)?;

    Ok(Algo {
      transition: arr2(&[
        [1.0, dt],
        [0.0, 1.0],
      ]),
      gain: GainSchedule::Fixed(Array1::from(vec![alpha, beta / dt])),
    })
  }
  /// Constant acceleration model, state `[x, v, a]`.
  pub fn alpha_beta_gamma(alpha: f64, beta: f64, gamma: f64,
                          dt: f64) -> Result<Algo> {
    check_finite("alpha", alpha)?;
    check_finite("beta", beta)?;
    check_finite("gamma", gamma)?;
    let dt = check_interval(dt)?;
    let half_dt2 = 0.5 * dt * dt;

    Ok(Algo {
      transition: arr2(&[
        [1.0, dt, half_dt2],
        [0.0, 1.0, dt],
        [0.0, 0.0, 1.0],
      ]),
      gain: GainSchedule::Fixed(Array1::from(vec![alpha, beta / dt,
                                                  gamma / half_dt2])),
    })
  }

  pub fn state_dim(&self) -> usize { self.transition.nrows() }
  pub fn gain_schedule(&self) -> &GainSchedule { &self.gain }

  fn gain_at(&self, step: u64) -> Array1<f64> {
    match self.gain {
      GainSchedule::Fixed(ref k) => k.clone(),
      GainSchedule::Averaging => Array1::from_elem(1, 1.0 / (step + 1) as f64),
    }
  }
}

impl Algorithm<Workspace> for Algo {
  fn measurement_dim(&self) -> usize { 1 }

  fn predict(&self, _step: u64, ws: &mut Workspace) -> Result<()> {
    check_dim("state", self.state_dim(), ws.estimate.len())?;
    self.transition.eval_at(ws.estimate.view(), ws.prediction.view_mut())
  }

  fn update(&self, step: u64, ws: &mut Workspace,
            z: ArrayView1<f64>) -> Result<()> {
    let residual = z[0] - ws.prediction[0];
    let k = self.gain_at(step);

    ws.estimate.assign(&ws.prediction);
    ws.estimate.scaled_add(residual, &k);
    ws.gain.column_mut(0).assign(&k);

    Ok(())
  }
}
