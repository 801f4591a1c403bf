use nd::{Array2, ArrayView2};

use nla_factorize::Cholesky;

use kf_core::{check_dim, check_finite, check_variance, Error, Result};

/// Replace `m` with `(m + m^T) / 2`.
pub fn symmetrize(m: &mut Array2<f64>) {
  let t = m.t().to_owned();
  *m += &t;
  m.mapv_inplace(|v| v * 0.5 );
}

/// `m` must be an `n x n` covariance: finite, symmetric and positive
/// semi-definite. Both checks are relative to the largest entry.
pub fn check_covariance(what: &'static str, m: ArrayView2<f64>, n: usize) -> Result<()> {
  check_dim(what, n, m.nrows())?;
  check_dim(what, n, m.ncols())?;
  for &v in m.iter() {
    check_finite(what, v)?;
  }
  for &v in m.diag().iter() {
    check_variance(what, v)?;
  }

  let scale = m.iter().fold(1.0f64, |acc, v| acc.max(v.abs()) );
  let tol = scale * 1e-9;
  for i in 0..n {
    for j in i + 1..n {
      if (m[[i, j]] - m[[j, i]]).abs() > tol {
        return Err(Error::NotSymmetric(what));
      }
    }
  }

  // Semi-definite iff a slightly shifted copy is definite.
  let shifted = &m + &(Array2::<f64>::eye(n) * tol);
  shifted.l_lstar()
    .map_err(|_| Error::NotPositiveSemiDefinite(what) )?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use nd::arr2;

  #[test]
  fn symmetrize_averages_off_diagonal() {
    let mut m = arr2(&[
      [2.0, 1.0],
      [3.0, 4.0],
    ]);
    symmetrize(&mut m);
    assert_eq!(m, arr2(&[[2.0, 2.0], [2.0, 4.0]]));
  }

  #[test]
  fn covariance_checks() {
    // rank one, as built from a single noise gain column
    let g = arr2(&[[0.5], [1.0]]);
    let q = g.dot(&g.t()) * 0.04;
    assert!(check_covariance("q", q.view(), 2).is_ok());
    assert!(check_covariance("zero", Array2::<f64>::zeros((2, 2)).view(), 2).is_ok());

    let indefinite = arr2(&[[1.0, 10.0], [10.0, 1.0]]);
    assert!(matches!(check_covariance("p", indefinite.view(), 2),
                     Err(Error::NotPositiveSemiDefinite("p"))));

    let skewed = arr2(&[[2.0, 1.0], [0.0, 2.0]]);
    assert!(matches!(check_covariance("p", skewed.view(), 2),
                     Err(Error::NotSymmetric("p"))));

    assert!(check_covariance("p", Array2::<f64>::eye(3).view(), 2).is_err());
  }
}
