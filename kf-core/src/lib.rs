
extern crate ndarray as nd;
extern crate num_traits;
extern crate nla_factorize;

use nd::prelude::*;
use nd::linalg::general_mat_vec_mul;
use nd::{Data, LinalgScalar};

use num_traits::{One, Zero};

pub use error::{Result, Error};
pub use error::{check_dim, check_finite, check_interval, check_variance};

pub mod error;

/// Marker for the values a filter workspace is allocated from.
pub trait Initializer { }

pub trait Workspace<I>: Sized
  where I: Initializer,
{
  fn alloc(init: I) -> Result<Self>;
}

/// One Predict -> Update recursion over a workspace `WS`.
pub trait Algorithm<WS> {
  fn measurement_dim(&self) -> usize;

  /// Project the current estimate forward one step. `step` is zero based.
  fn predict(&self, step: u64, ws: &mut WS) -> Result<()>;
  /// Correct the predicted state with measurement `z`.
  fn update(&self, step: u64, ws: &mut WS, z: ArrayView1<f64>) -> Result<()>;

  fn next_step(&self, step: u64, ws: &mut WS,
               z: ArrayView1<f64>) -> Result<()>
  {
    check_dim("measurement", self.measurement_dim(), z.len())?;
    for &v in z.iter() {
      check_finite("measurement", v)?;
    }

    self.predict(step, ws)?;
    self.update(step, ws, z)
  }
}

pub trait Operator<E, Dim>
  where Dim: nd::Dimension,
{
  fn operator_input_dim(&self) -> usize;
  fn operator_output_dim(&self) -> usize;
  fn eval_at(&self, x: ArrayView<E, Dim>,
             out: ArrayViewMut<E, Dim>) -> Result<()>;
}

impl<D, E> Operator<E, Ix1> for ArrayBase<D, Ix2>
  where D: Data<Elem = E>,
        E: LinalgScalar + One + Zero,
{
  fn operator_input_dim(&self) -> usize { self.ncols() }
  fn operator_output_dim(&self) -> usize { self.nrows() }
  fn eval_at(&self, x: ArrayView<E, Ix1>,
             mut out: ArrayViewMut<E, Ix1>) -> Result<()> {
    check_dim("operator input", self.operator_input_dim(), x.len())?;
    check_dim("operator output", self.operator_output_dim(), out.len())?;

    general_mat_vec_mul(One::one(),
                        self, &x, Zero::zero(),
                        &mut out);

    Ok(())
  }
}
