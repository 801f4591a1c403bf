
#[macro_use]
extern crate ndarray as nd;
extern crate num_traits;

use std::fmt;

use nd::ShapeError;

pub use cholesky::*;

pub mod cholesky;

#[derive(Debug, Clone)]
pub enum FactorizeError {
  Shape(ShapeError),
  /// Pivot `k` was not strictly positive.
  NotPositiveDefinite { pivot: usize },
}

impl fmt::Display for FactorizeError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      FactorizeError::Shape(e) => write!(f, "{}", e),
      FactorizeError::NotPositiveDefinite { pivot } => {
        write!(f, "matrix is not positive definite (pivot {})", pivot)
      },
    }
  }
}

impl ::std::error::Error for FactorizeError { }

impl From<ShapeError> for FactorizeError {
  fn from(v: ShapeError) -> FactorizeError {
    FactorizeError::Shape(v)
  }
}
