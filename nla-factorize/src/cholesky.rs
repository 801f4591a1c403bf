use nd::{Array, ArrayBase, Data, DataMut, Ix2, ScalarOperand, ErrorKind, ShapeError};
use num_traits::{Float, Zero};

use crate::FactorizeError;

pub trait Cholesky {
  type LMatrix: Sized;
  /// Returns the upper triangular factor, R, of A = R^*R.
  fn l_lstar(self) -> Result<Self::LMatrix, FactorizeError>;
}

impl<S> Cholesky for ArrayBase<S, Ix2>
  where S: DataMut,
        S::Elem: Float + ScalarOperand,
{
  type LMatrix = ArrayBase<S, Ix2>;

  fn l_lstar(self) -> Result<Self::LMatrix, FactorizeError> {
    let (m, n) = self.dim();
    if m != n {
      return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
    }
    let mut r = self;

    for k in 0..m {
      let pivot = r[[k, k]];
      if !(pivot > S::Elem::zero()) {
        return Err(FactorizeError::NotPositiveDefinite { pivot: k, });
      }

      for j in k + 1..m {
        let t = {
          let t2 = r.slice(s![j, j..]);
          let t4 = r.slice(s![k, j..]);

          &t2 - &(&t4 * (r[[k, j]] / pivot))
        };

        r.slice_mut(s![j, j..])
          .assign(&t);
      }

      let t = pivot.sqrt().recip();
      r.slice_mut(s![k, k..])
        .mapv_inplace(|v| v * t );
    }

    for k in 0..m {
      r.slice_mut(s![k, ..k])
        .fill(S::Elem::zero());
    }

    Ok(r)
  }
}

/// Solves `A X = B` for symmetric positive definite `A` through `A = R^*R`.
pub fn cholesky_solve<S1, S2, E>(a: &ArrayBase<S1, Ix2>,
                                 b: &ArrayBase<S2, Ix2>)
  -> Result<Array<E, Ix2>, FactorizeError>
  where S1: Data<Elem = E>,
        S2: Data<Elem = E>,
        E: Float + ScalarOperand,
{
  let n = a.nrows();
  if b.nrows() != n {
    return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
  }

  let r = a.to_owned().l_lstar()?;
  let mut x = b.to_owned();

  // R^* y = b
  for i in 0..n {
    for k in 0..i {
      let rki = r[[k, i]];
      let xk = x.row(k).to_owned();
      x.row_mut(i).scaled_add(-rki, &xk);
    }
    let d = r[[i, i]];
    x.row_mut(i).mapv_inplace(|v| v / d );
  }
  // R x = y
  for i in (0..n).rev() {
    for k in i + 1..n {
      let rik = r[[i, k]];
      let xk = x.row(k).to_owned();
      x.row_mut(i).scaled_add(-rik, &xk);
    }
    let d = r[[i, i]];
    x.row_mut(i).mapv_inplace(|v| v / d );
  }

  Ok(x)
}

#[test]
fn cholesky_llstar() {
  use nd::arr2;

  let a = arr2(&[
    [4.0, 12.0, -16.0],
    [12.0, 37.0, -43.0],
    [-16.0, -43.0, 98.0],
  ]);

  let l = a.l_lstar().expect("cholesky factorization failed");

  let expected = arr2(&[
    [2.0, 6.0, -8.0],
    [0.0, 1.0, 5.0],
    [0.0, 0.0, 3.0],
  ]);
  assert_eq!(l, expected);
}

#[test]
fn cholesky_rejects_indefinite() {
  use nd::arr2;

  let a = arr2(&[
    [1.0, 2.0],
    [2.0, 1.0],
  ]);
  match a.l_lstar() {
    Err(FactorizeError::NotPositiveDefinite { pivot }) => assert_eq!(pivot, 1),
    other => panic!("expected failure, got {:?}", other),
  }
}

#[test]
fn cholesky_solve_recovers_rhs() {
  use nd::arr2;

  let a = arr2(&[
    [4.0, 12.0, -16.0],
    [12.0, 37.0, -43.0],
    [-16.0, -43.0, 98.0],
  ]);
  let b = arr2(&[
    [1.0, 0.0],
    [2.0, 1.0],
    [3.0, -1.0],
  ]);
  let x = cholesky_solve(&a, &b).unwrap();
  let back = a.dot(&x);
  for (got, want) in back.iter().zip(b.iter()) {
    assert!((got - want).abs() < 1e-9, "{} != {}", got, want);
  }
}
