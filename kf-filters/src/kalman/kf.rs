//! The multivariate linear Kalman filter.
//!
//! Predict:  x = F x,  P = F P F^T + Q
//! Update:   S = H P H^T + R,  K = P H^T S^-1,  x = x + K (z - H x),
//!           P = (I - K H) P (I - K H)^T + K R K^T

use nd::{Array1, Array2, ArrayView1, ArrayView2};

use nla_factorize::cholesky_solve;

use kf_core::{check_dim, check_finite, Operator, Result};
use crate::utils::{check_covariance, symmetrize};
use crate::{Algorithm, EstimateWorkspace, Initializer, Workspace as WorkspaceT};

#[derive(Debug, Clone)]
pub struct Init<'a> {
  pub initial_mean: ArrayView1<'a, f64>,
  pub initial_covariance: ArrayView2<'a, f64>,
  pub measurement_dim: usize,
}
impl<'a> Initializer for Init<'a> { }

#[derive(Debug)]
pub struct Workspace {
  mean: Array1<f64>,
  covariance: Array2<f64>,

  estimator_predict: Array1<f64>,
  covariance_predict: Array2<f64>,

  /// d
  innovation: Array1<f64>,
  kalman_gain: Array2<f64>,
}
impl<'a> WorkspaceT<Init<'a>> for Workspace {
  fn alloc(i: Init<'a>) -> Result<Workspace> {
    let Init {
      initial_mean,
      initial_covariance,
      measurement_dim,
    } = i;

    let n = initial_mean.len();
    for &v in initial_mean.iter() {
      check_finite("initial mean", v)?;
    }
    check_covariance("initial covariance", initial_covariance, n)?;

    Ok(Workspace {
      mean: initial_mean.to_owned(),
      covariance: initial_covariance.to_owned(),

      estimator_predict: initial_mean.to_owned(),
      covariance_predict: initial_covariance.to_owned(),

      innovation: Array1::zeros(measurement_dim),
      kalman_gain: Array2::zeros((n, measurement_dim)),
    })
  }
}
impl Workspace {
  pub fn innovation(&self) -> ArrayView1<f64> { self.innovation.view() }
}
impl EstimateWorkspace for Workspace {
  fn prediction_view(&self) -> ArrayView1<f64> { self.estimator_predict.view() }
  fn estimate_view(&self) -> ArrayView1<f64> { self.mean.view() }
  fn gain_view(&self) -> ArrayView2<f64> { self.kalman_gain.view() }
  fn covariance_view(&self) -> Option<ArrayView2<f64>> { Some(self.covariance.view()) }
  fn prediction_covariance_view(&self) -> Option<ArrayView2<f64>> {
    Some(self.covariance_predict.view())
  }
}

#[derive(Debug, Clone)]
pub struct Algo {
  /// F
  transition: Array2<f64>,
  /// Q
  process_noise: Array2<f64>,
  /// H
  observation_operator: Array2<f64>,
  /// R
  measurement_noise: Array2<f64>,
}

impl Algo {
  pub fn new(transition: Array2<f64>,
             process_noise: Array2<f64>,
             observation_operator: Array2<f64>,
             measurement_noise: Array2<f64>) -> Result<Algo>
  {
    let n = transition.nrows();
    let m = observation_operator.nrows();

    check_dim("state transition columns", n, transition.ncols())?;
    for &v in transition.iter() {
      check_finite("state transition", v)?;
    }
    check_covariance("process noise", process_noise.view(), n)?;
    check_dim("observation operator columns", n, observation_operator.ncols())?;
    for &v in observation_operator.iter() {
      check_finite("observation operator", v)?;
    }
    check_covariance("measurement noise", measurement_noise.view(), m)?;

    Ok(Algo {
      transition,
      process_noise,
      observation_operator,
      measurement_noise,
    })
  }

  pub fn state_dim(&self) -> usize { self.transition.nrows() }
  pub fn transition(&self) -> ArrayView2<f64> { self.transition.view() }
  pub fn observation_operator(&self) -> ArrayView2<f64> { self.observation_operator.view() }
}

impl Algorithm<Workspace> for Algo {
  fn measurement_dim(&self) -> usize { self.observation_operator.nrows() }

  fn predict(&self, _step: u64, ws: &mut Workspace) -> Result<()> {
    check_dim("state", self.state_dim(), ws.mean.len())?;
    check_dim("gain columns", self.measurement_dim(), ws.kalman_gain.ncols())?;

    self.transition.eval_at(ws.mean.view(), ws.estimator_predict.view_mut())?;

    let f = &self.transition;
    ws.covariance_predict = f.dot(&ws.covariance).dot(&f.t()) + &self.process_noise;
    symmetrize(&mut ws.covariance_predict);

    Ok(())
  }

  fn update(&self, _step: u64, ws: &mut Workspace,
            z: ArrayView1<f64>) -> Result<()> {
    let h = &self.observation_operator;
    let n = self.state_dim();

    // d = z - H x
    h.eval_at(ws.estimator_predict.view(), ws.innovation.view_mut())?;
    ws.innovation.mapv_inplace(|v| -v );
    ws.innovation += &z;

    let hp = h.dot(&ws.covariance_predict);
    let s = hp.dot(&h.t()) + &self.measurement_noise;
    // S K^T = H P, both S and P symmetric.
    ws.kalman_gain = cholesky_solve(&s, &hp)?.reversed_axes();

    ws.mean.assign(&ws.estimator_predict);
    ws.mean += &ws.kalman_gain.dot(&ws.innovation);

    let i_kh = Array2::<f64>::eye(n) - ws.kalman_gain.dot(h);
    let krk = ws.kalman_gain
      .dot(&self.measurement_noise)
      .dot(&ws.kalman_gain.t());
    ws.covariance = i_kh.dot(&ws.covariance_predict).dot(&i_kh.t()) + krk;
    symmetrize(&mut ws.covariance);

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use nd::{arr1, arr2};
  use crate::kalman::scalar;

  fn constant_velocity(dt: f64, q: f64, r: f64) -> Algo {
    Algo::new(arr2(&[[1.0, dt], [0.0, 1.0]]),
              arr2(&[[0.25 * dt.powi(4), 0.5 * dt.powi(3)],
                     [0.5 * dt.powi(3), dt * dt]]) * q,
              arr2(&[[1.0, 0.0]]),
              arr2(&[[r]]))
      .unwrap()
  }

  #[test]
  fn one_dimensional_system_matches_scalar_filter() {
    let zs = [50.486, 50.963, 51.597, 52.001, 52.518, 53.05];
    let m0 = arr1(&[10.0]);
    let c0 = arr2(&[[10000.0]]);

    let algo = Algo::new(arr2(&[[1.0]]), arr2(&[[0.15]]),
                         arr2(&[[1.0]]), arr2(&[[0.01]])).unwrap();
    let mut ws = Workspace::alloc(Init {
      initial_mean: m0.view(),
      initial_covariance: c0.view(),
      measurement_dim: 1,
    }).unwrap();

    let scalar_algo = scalar::Algo::new(0.15, 0.01).unwrap();
    let mut scalar_ws = scalar::Workspace::alloc(scalar::Init {
      initial_estimate: 10.0,
      initial_variance: 10000.0,
    }).unwrap();

    for (i, &z) in zs.iter().enumerate() {
      let z = arr1(&[z]);
      algo.next_step(i as u64, &mut ws, z.view()).unwrap();
      scalar_algo.next_step(i as u64, &mut scalar_ws, z.view()).unwrap();

      assert!((ws.estimate_view()[0] - scalar_ws.estimate()).abs() < 1e-9);
      assert!((ws.gain_view()[[0, 0]] - scalar_ws.gain()).abs() < 1e-9);
      let p = ws.covariance_view().unwrap()[[0, 0]];
      assert!((p - scalar_ws.variance()).abs() < 1e-9);
    }
  }

  #[test]
  fn covariance_stays_symmetric_and_shrinks() {
    let algo = constant_velocity(1.0, 0.01, 4.0);
    let m0 = arr1(&[0.0, 0.0]);
    let c0 = arr2(&[[500.0, 0.0], [0.0, 500.0]]);
    let mut ws = Workspace::alloc(Init {
      initial_mean: m0.view(),
      initial_covariance: c0.view(),
      measurement_dim: 1,
    }).unwrap();

    for i in 0..50u64 {
      let z = arr1(&[2.0 * i as f64]);
      algo.next_step(i, &mut ws, z.view()).unwrap();

      let p = ws.covariance_view().unwrap();
      let pp = ws.prediction_covariance_view().unwrap();
      assert_eq!(p[[0, 1]], p[[1, 0]]);
      for k in 0..2 {
        assert!(p[[k, k]] >= 0.0);
        assert!(p[[k, k]] <= pp[[k, k]] + 1e-9);
      }
      assert!(p[[0, 0]] * p[[1, 1]] - p[[0, 1]] * p[[1, 0]] >= -1e-9);
    }

    // Noise-free ramp of slope 2: the velocity estimate settles on it.
    assert!((ws.estimate_view()[1] - 2.0).abs() < 0.05);
  }

  #[test]
  fn deterministic_for_fixed_inputs() {
    let run = || {
      let algo = constant_velocity(0.5, 0.2, 1.0);
      let m0 = arr1(&[1.0, -1.0]);
      let c0 = arr2(&[[10.0, 0.0], [0.0, 10.0]]);
      let mut ws = Workspace::alloc(Init {
        initial_mean: m0.view(),
        initial_covariance: c0.view(),
        measurement_dim: 1,
      }).unwrap();
      let mut out = Vec::new();
      for (i, &z) in [1.2, 0.4, -0.3, -1.1].iter().enumerate() {
        algo.next_step(i as u64, &mut ws, arr1(&[z]).view()).unwrap();
        out.push(ws.estimate_view().to_owned());
      }
      out
    };
    assert_eq!(run(), run());
  }

  #[test]
  fn zero_innovation_covariance_is_an_error() {
    let algo = Algo::new(arr2(&[[1.0]]), arr2(&[[0.0]]),
                         arr2(&[[1.0]]), arr2(&[[0.0]])).unwrap();
    let m0 = arr1(&[1.0]);
    let c0 = arr2(&[[0.0]]);
    let mut ws = Workspace::alloc(Init {
      initial_mean: m0.view(),
      initial_covariance: c0.view(),
      measurement_dim: 1,
    }).unwrap();
    match algo.next_step(0, &mut ws, arr1(&[2.0]).view()) {
      Err(kf_core::Error::NotPositiveDefinite) => { },
      other => panic!("unexpected {:?}", other),
    }
  }

  #[test]
  fn rejects_mismatched_shapes() {
    assert!(Algo::new(arr2(&[[1.0, 1.0], [0.0, 1.0]]), arr2(&[[1.0]]),
                      arr2(&[[1.0, 0.0]]), arr2(&[[1.0]])).is_err());
    assert!(Algo::new(arr2(&[[1.0]]), arr2(&[[-1.0]]),
                      arr2(&[[1.0]]), arr2(&[[1.0]])).is_err());

    let algo = constant_velocity(1.0, 1.0, 1.0);
    let m0 = arr1(&[0.0, 0.0]);
    let c0 = arr2(&[[1.0, 0.0], [0.0, 1.0]]);
    let mut ws = Workspace::alloc(Init {
      initial_mean: m0.view(),
      initial_covariance: c0.view(),
      measurement_dim: 1,
    }).unwrap();
    assert!(algo.next_step(0, &mut ws, arr1(&[1.0, 2.0]).view()).is_err());
  }

  #[test]
  fn rejects_non_psd_covariance() {
    let m0 = arr1(&[0.0, 0.0]);
    let c0 = arr2(&[[1.0, 10.0], [10.0, 1.0]]);
    let alloc = Workspace::alloc(Init {
      initial_mean: m0.view(),
      initial_covariance: c0.view(),
      measurement_dim: 1,
    });
    match alloc {
      Err(kf_core::Error::NotPositiveSemiDefinite(_)) => { },
      other => panic!("unexpected {:?}", other),
    }

    let c0 = arr2(&[[1.0, 0.5], [0.0, 1.0]]);
    assert!(Workspace::alloc(Init {
      initial_mean: m0.view(),
      initial_covariance: c0.view(),
      measurement_dim: 1,
    }).is_err());

    let f = Array2::<f64>::eye(2);
    let h = arr2(&[[1.0, 0.0]]);
    assert!(Algo::new(f.clone(), arr2(&[[1.0, 2.0], [2.0, 1.0]]),
                      h.clone(), arr2(&[[1.0]])).is_err());
    assert!(Algo::new(f, Array2::zeros((2, 2)), h, arr2(&[[1.0]])).is_ok());
  }
}
