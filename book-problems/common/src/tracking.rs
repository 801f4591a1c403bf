//! Simulated constant-velocity target tracked by the multivariate Kalman
//! filter. The truth is a random walk in velocity driven by white
//! acceleration noise, measured by a noisy position sensor.

use nd::{arr1, arr2, Array2, ArrayView2};
use rand::SeedableRng;
use rand_isaac::Isaac64Rng;

use kf_filters::kalman::kf;
use kf_filters::Workspace;
use util::data::generate_linear_truth_and_observation;

use crate::{Chart, Error, Example, ModelTruth, Result, StateSteps, Table};

/// Runs at least this long get a progress bar.
const REPORT_STEPS: usize = 1000;

#[derive(Copy, Clone, Debug)]
pub struct TrackingSetup {
  pub dt: f64,
  /// Standard deviation of the random acceleration, m/s^2.
  pub acceleration_sigma: f64,
  /// Standard deviation of a position measurement, m.
  pub measurement_sigma: f64,
  pub true_initial_position: f64,
  pub true_initial_velocity: f64,
  pub initial_position: f64,
  pub initial_velocity: f64,
  pub initial_variance: f64,
  pub rand_seed: u64,
  pub steps: usize,
}
impl Default for TrackingSetup {
  fn default() -> Self {
    TrackingSetup {
      dt: 1.0,
      acceleration_sigma: 0.2,
      measurement_sigma: 3.0,
      true_initial_position: 0.0,
      true_initial_velocity: 2.0,
      initial_position: 0.0,
      initial_velocity: 0.0,
      initial_variance: 500.0,
      rand_seed: 1,
      steps: 50,
    }
  }
}

impl TrackingSetup {
  pub fn transition(&self) -> Array2<f64> {
    arr2(&[
      [1.0, self.dt],
      [0.0, 1.0],
    ])
  }
  /// How a unit acceleration enters the state over one interval.
  pub fn noise_gain(&self) -> Array2<f64> {
    arr2(&[
      [0.5 * self.dt * self.dt],
      [self.dt],
    ])
  }
  /// Q = G G^T sigma_a^2
  pub fn process_noise(&self) -> Array2<f64> {
    let g = self.noise_gain();
    g.dot(&g.t()) * (self.acceleration_sigma * self.acceleration_sigma)
  }
  pub fn observation_operator(&self) -> Array2<f64> {
    arr2(&[[1.0, 0.0]])
  }
}

impl TryFrom<TrackingSetup> for TrackingData {
  type Error = Error;

  fn try_from(params: TrackingSetup) -> Result<TrackingData> {
    if params.steps == 0 {
      return Err(Error::EmptySequence);
    }
    let mut rand = Isaac64Rng::seed_from_u64(params.rand_seed);

    let data = generate_linear_truth_and_observation(
      params.transition().view(),
      params.noise_gain().view(),
      arr1(&[params.acceleration_sigma]).view(),
      params.observation_operator().view(),
      arr1(&[params.measurement_sigma]).view(),
      arr1(&[params.true_initial_position, params.true_initial_velocity]).view(),
      params.steps,
      &mut rand)?;

    Ok(TrackingData {
      params,
      truth: data.truth,
      observations: data.observations,
    })
  }
}

#[derive(Clone, Debug)]
pub struct TrackingData {
  pub params: TrackingSetup,
  /// `[position, velocity]` per step.
  pub truth: Array2<f64>,
  pub observations: Array2<f64>,
}

impl ModelTruth<f64> for TrackingData {
  fn truth(&self) -> ArrayView2<f64> { self.truth.view() }
  fn observations(&self) -> ArrayView2<f64> { self.observations.view() }
}

impl Example for TrackingData {
  fn title(&self) -> String {
    format!("Kalman Filter: Simulated Constant Velocity Target (seed {})",
            self.params.rand_seed)
  }

  fn run(&self) -> Result<StateSteps> {
    let p = &self.params;
    let r = p.measurement_sigma * p.measurement_sigma;
    let algo = kf::Algo::new(p.transition(), p.process_noise(),
                             p.observation_operator(), arr2(&[[r]]))?;

    let m0 = arr1(&[p.initial_position, p.initial_velocity]);
    let c0 = Array2::<f64>::eye(2) * p.initial_variance;
    let mut ws = kf::Workspace::alloc(kf::Init {
      initial_mean: m0.view(),
      initial_covariance: c0.view(),
      measurement_dim: 1,
    })?;

    if p.steps >= REPORT_STEPS {
      util::run_filter_reporting(&algo, &mut ws, self.observations.view(),
                                 "sim-cv".into())
    } else {
      util::run_filter(&algo, &mut ws, self.observations.view())
    }
  }

  fn table(&self, states: &StateSteps) -> Table {
    let mut t = Table::new()
      .column("Step", 6, None)
      .column("True Pos.", 12, Some(3))
      .column("Measured", 12, Some(3))
      .column("Estimate", 12, Some(3))
      .column("Std. Dev.", 10, Some(3))
      .column("True Vel.", 10, Some(3))
      .column("Est. Vel.", 10, Some(3))
      .column("Gain", 10, Some(4));
    let variances = states.variance(0);
    for j in 0..states.steps() {
      t.push_row(vec![
        (j + 1).into(),
        self.truth[[j, 0]].into(),
        self.observations[[j, 0]].into(),
        states.estimates[[j, 0]].into(),
        variances.map(|v| v[j].sqrt() ).unwrap_or(::std::f64::NAN).into(),
        self.truth[[j, 1]].into(),
        states.estimates[[j, 1]].into(),
        states.gains[[j, 0, 0]].into(),
      ]);
    }
    t
  }

  fn charts(&self, states: &StateSteps) -> Vec<Chart> {
    vec![
      plot_helper::estimate_chart(self, states, 0, true,
                                  Chart::new("position", "Simulated Target: Position",
                                             "Time Step", "Position (m)")),
      plot_helper::estimate_chart(self, states, 1, false,
                                  Chart::new("velocity", "Simulated Target: Velocity",
                                             "Time Step", "Velocity (m/s)")),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn process_noise_is_white_acceleration() {
    let q = TrackingSetup { dt: 2.0, acceleration_sigma: 0.5, ..Default::default() }
      .process_noise();
    assert_eq!(q, arr2(&[[1.0, 1.0], [1.0, 1.0]]));
  }

  #[test]
  fn zero_steps_is_rejected() {
    let setup = TrackingSetup { steps: 0, ..Default::default() };
    assert!(TrackingData::try_from(setup).is_err());
  }
}
