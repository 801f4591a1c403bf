use nd::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use rand_distr::StandardNormal;

use kf_core::{check_dim, check_variance, Operator, Result};

pub struct Data {
  /// (steps, n)
  pub truth: Array2<f64>,
  /// (steps, m)
  pub observations: Array2<f64>,
}

/// Simulates `x_{j+1} = F x_j + G w_j`, `z_j = H x_j + v_j` for `steps` steps
/// starting from `x_0 = initial`. `w` has independent components with standard
/// deviations `sigma`, `v` with standard deviations `gamma`. Row `j` of the
/// result holds the state after step `j + 1` and its measurement.
pub fn generate_linear_truth_and_observation<R>(transition: ArrayView2<f64>,
                                                noise_gain: ArrayView2<f64>,
                                                sigma: ArrayView1<f64>,
                                                obs_op: ArrayView2<f64>,
                                                gamma: ArrayView1<f64>,
                                                initial: ArrayView1<f64>,
                                                steps: usize,
                                                rand: &mut R) -> Result<Data>
  where R: Rng,
{
  let n = initial.len();
  check_dim("transition rows", n, transition.nrows())?;
  check_dim("noise gain rows", n, noise_gain.nrows())?;
  check_dim("process noise components", noise_gain.ncols(), sigma.len())?;
  check_dim("observation operator rows", obs_op.nrows(), gamma.len())?;
  for &s in sigma.iter() {
    check_variance("process noise deviation", s)?;
  }
  for &g in gamma.iter() {
    check_variance("measurement noise deviation", g)?;
  }

  let mut truth = Array2::zeros((steps, n));
  let mut observations = Array2::zeros((steps, obs_op.nrows()));

  let mut state = initial.to_owned();
  let mut next = Array1::zeros(n);
  for (mut t, mut z) in truth.axis_iter_mut(Axis(0))
    .zip(observations.axis_iter_mut(Axis(0)))
  {
    transition.eval_at(state.view(), next.view_mut())?;
    let w: Array1<f64> = sigma.mapv(|s| s * rand.sample::<f64, _>(StandardNormal) );
    next += &noise_gain.dot(&w);
    state.assign(&next);
    t.assign(&state);

    obs_op.eval_at(state.view(), z.view_mut())?;
    for (z, &g) in z.iter_mut().zip(gamma.iter()) {
      *z += g * rand.sample::<f64, _>(StandardNormal);
    }
  }

  Ok(Data {
    truth,
    observations,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use nd::{arr1, arr2};
  use rand::SeedableRng;
  use rand_isaac::Isaac64Rng;

  fn simulate(seed: u64, sigma: f64, gamma: f64) -> Data {
    let mut rand = Isaac64Rng::seed_from_u64(seed);
    let f = arr2(&[[1.0, 1.0], [0.0, 1.0]]);
    let g = arr2(&[[0.5], [1.0]]);
    let h = arr2(&[[1.0, 0.0]]);
    generate_linear_truth_and_observation(f.view(), g.view(), arr1(&[sigma]).view(),
                                          h.view(), arr1(&[gamma]).view(),
                                          arr1(&[0.0, 2.0]).view(), 20,
                                          &mut rand)
      .unwrap()
  }

  #[test]
  fn same_seed_same_data() {
    let a = simulate(7, 0.3, 2.0);
    let b = simulate(7, 0.3, 2.0);
    assert_eq!(a.truth, b.truth);
    assert_eq!(a.observations, b.observations);

    let c = simulate(8, 0.3, 2.0);
    assert!(a.observations != c.observations);
  }

  #[test]
  fn noise_free_system_is_kinematic() {
    let d = simulate(1, 0.0, 0.0);
    assert_eq!(d.truth.dim(), (20, 2));
    assert_eq!(d.observations.dim(), (20, 1));
    for j in 0..20 {
      assert_eq!(d.truth[[j, 0]], 2.0 * (j + 1) as f64);
      assert_eq!(d.truth[[j, 1]], 2.0);
      assert_eq!(d.observations[[j, 0]], d.truth[[j, 0]]);
    }
  }
}
