
extern crate ndarray as nd;
extern crate kf_core;
extern crate kf_filters;
extern crate rand;
extern crate rand_distr;
extern crate pbr;
extern crate tracing;

use nd::{s, Array2, Array3, ArrayView1, ArrayView2, Axis};
use tracing::debug;

use kf_core::{check_dim, Algorithm, Error, Result};
use kf_filters::EstimateWorkspace;

use std::borrow::Cow;

pub mod data;
pub mod progress;
pub mod table;

pub use progress::ReportingIterator;
pub use table::{Cell, Table};

/// A dataset: the true state and what was measured, one row per step.
pub trait ModelTruth<E> {
  /// (steps, state components)
  fn truth(&self) -> ArrayView2<E>;
  /// (steps, measurement components)
  fn observations(&self) -> ArrayView2<E>;
}

/// Per-step history of a filter run. Row `j` is the book's step `n = j + 1`.
#[derive(Clone, Debug)]
pub struct StateSteps {
  pub predictions: Array2<f64>,
  pub estimates: Array2<f64>,
  pub gains: Array3<f64>,
  pub covariances: Option<Array3<f64>>,
}
impl StateSteps {
  pub fn new(steps: usize, n: usize, m: usize, with_covariance: bool) -> StateSteps {
    StateSteps {
      predictions: Array2::zeros((steps, n)),
      estimates: Array2::zeros((steps, n)),
      gains: Array3::zeros((steps, n, m)),
      covariances: if with_covariance {
        Some(Array3::zeros((steps, n, n)))
      } else {
        None
      },
    }
  }

  pub fn steps(&self) -> usize { self.estimates.nrows() }
  pub fn state_dim(&self) -> usize { self.estimates.ncols() }

  pub fn store_state<WS>(&mut self, step: usize, ws: &WS) -> Result<()>
    where WS: EstimateWorkspace,
  {
    check_dim("stored state", self.state_dim(), ws.state_dim())?;
    check_dim("stored gain", self.gains.dim().2, ws.measurement_dim())?;

    self.predictions
      .index_axis_mut(Axis(0), step)
      .assign(&ws.prediction_view());
    self.estimates
      .index_axis_mut(Axis(0), step)
      .assign(&ws.estimate_view());
    self.gains
      .index_axis_mut(Axis(0), step)
      .assign(&ws.gain_view());
    if let (Some(c), Some(cv)) = (self.covariances.as_mut(), ws.covariance_view()) {
      c.index_axis_mut(Axis(0), step)
        .assign(&cv);
    }

    Ok(())
  }

  /// Estimates of state component `i` over all steps.
  pub fn estimate(&self, i: usize) -> ArrayView1<f64> {
    self.estimates.column(i)
  }
  pub fn prediction(&self, i: usize) -> ArrayView1<f64> {
    self.predictions.column(i)
  }
  /// Gain from measurement component `j` into state component `i`.
  pub fn gain(&self, i: usize, j: usize) -> ArrayView1<f64> {
    self.gains.slice(s![.., i, j])
  }
  pub fn variance(&self, i: usize) -> Option<ArrayView1<f64>> {
    self.covariances
      .as_ref()
      .map(|c| c.slice(s![.., i, i]) )
  }
}

/// Runs `algo` over every row of `observations` in order.
pub fn run_filter<A, WS>(algo: &A, ws: &mut WS,
                         observations: ArrayView2<f64>) -> Result<StateSteps>
  where A: Algorithm<WS>,
        WS: EstimateWorkspace,
{
  drive(algo, ws, observations, observations.outer_iter().enumerate())
}

/// As `run_filter`, with a progress bar on stderr.
pub fn run_filter_reporting<A, WS>(algo: &A, ws: &mut WS,
                                   observations: ArrayView2<f64>,
                                   name: Cow<'static, str>) -> Result<StateSteps>
  where A: Algorithm<WS>,
        WS: EstimateWorkspace,
{
  let iter = ReportingIterator::new(observations.outer_iter(), name);
  drive(algo, ws, observations, iter.enumerate())
}

fn drive<'a, A, WS, I>(algo: &A, ws: &mut WS,
                       observations: ArrayView2<f64>,
                       iter: I) -> Result<StateSteps>
  where A: Algorithm<WS>,
        WS: EstimateWorkspace,
        I: Iterator<Item = (usize, ArrayView1<'a, f64>)>,
{
  let steps = observations.nrows();
  if steps == 0 {
    return Err(Error::EmptySequence);
  }

  let mut states = StateSteps::new(steps, ws.state_dim(),
                                   algo.measurement_dim(),
                                   ws.covariance_view().is_some());
  for (j, z) in iter {
    algo.next_step(j as u64, ws, z)?;
    states.store_state(j, ws)?;

    debug!(step = j + 1,
           measurement = ?z.as_slice(),
           prediction = ?ws.prediction_view().as_slice(),
           estimate = ?ws.estimate_view().as_slice(),
           "filter step");
  }

  Ok(states)
}

#[cfg(test)]
mod tests {
  use super::*;
  use nd::{arr1, arr2};
  use kf_filters::{gh, Workspace};
  use kf_filters::kalman::scalar;

  #[test]
  fn one_row_per_step_in_order() {
    let obs = arr2(&[[996.0], [994.0], [1021.0]]);
    let x0 = arr1(&[1000.0]);
    let mut ws = gh::Workspace::alloc(gh::Init { initial_state: x0.view(), }).unwrap();
    let states = run_filter(&gh::Algo::averaging(), &mut ws, obs.view()).unwrap();

    assert_eq!(states.steps(), 3);
    assert!(states.covariances.is_none());
    assert_eq!(states.prediction(0).to_vec()[..2], [1000.0, 996.0]);
    assert_eq!(states.estimate(0)[1], 995.0);
    assert_eq!(states.gain(0, 0)[2], 1.0 / 3.0);
  }

  #[test]
  fn records_variance_when_tracked() {
    let obs = arr2(&[[49.03], [48.44]]);
    let algo = scalar::Algo::static_system(25.0).unwrap();
    let mut ws = scalar::Workspace::alloc(scalar::Init {
      initial_estimate: 60.0,
      initial_variance: 225.0,
    }).unwrap();
    let states = run_filter(&algo, &mut ws, obs.view()).unwrap();
    let p = states.variance(0).unwrap();
    assert!((p[0] - 22.5).abs() < 1e-9);
    assert!(p[1] < p[0]);
  }

  #[test]
  fn empty_and_malformed_sequences_fail() {
    let obs = Array2::<f64>::zeros((0, 1));
    let x0 = arr1(&[0.0]);
    let mut ws = gh::Workspace::alloc(gh::Init { initial_state: x0.view(), }).unwrap();
    match run_filter(&gh::Algo::averaging(), &mut ws, obs.view()) {
      Err(Error::EmptySequence) => { },
      other => panic!("unexpected {:?}", other),
    }

    let obs = arr2(&[[1.0], [::std::f64::NAN]]);
    assert!(run_filter(&gh::Algo::averaging(), &mut ws, obs.view()).is_err());
  }

  #[test]
  fn reporting_run_matches_plain_run() {
    let obs = arr2(&[[50.486], [50.963], [51.597], [52.001]]);
    let algo = scalar::Algo::new(0.15, 0.01).unwrap();
    let init = scalar::Init { initial_estimate: 10.0, initial_variance: 10000.0, };

    let mut ws = scalar::Workspace::alloc(init).unwrap();
    let plain = run_filter(&algo, &mut ws, obs.view()).unwrap();
    let mut ws = scalar::Workspace::alloc(init).unwrap();
    let reported = run_filter_reporting(&algo, &mut ws, obs.view(), "heating".into())
      .unwrap();

    assert_eq!(plain.predictions, reported.predictions);
    assert_eq!(plain.estimates, reported.estimates);
    assert_eq!(plain.gains, reported.gains);
    assert_eq!(plain.covariances, reported.covariances);
  }
}
