
use std::fmt;

use nd::ShapeError;
use nla_factorize::FactorizeError;

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub enum Error {
  /// A measurement, parameter or initial value is NaN or infinite.
  NonFinite {
    what: &'static str,
    value: f64,
  },
  NegativeVariance {
    what: &'static str,
    value: f64,
  },
  /// The time between two measurements must be positive.
  NonPositiveInterval(f64),
  Dimension {
    what: &'static str,
    expected: usize,
    found: usize,
  },
  /// The innovation covariance could not be Cholesky factored.
  NotPositiveDefinite,
  /// A covariance given as input differs from its transpose.
  NotSymmetric(&'static str),
  /// A covariance given as input has a negative eigenvalue.
  NotPositiveSemiDefinite(&'static str),
  Shape(ShapeError),
  Plot(String),
  EmptySequence,
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Error::NonFinite { what, value } => {
        write!(f, "{} must be finite, got {}", what, value)
      },
      Error::NegativeVariance { what, value } => {
        write!(f, "{} must be non-negative, got {}", what, value)
      },
      Error::NonPositiveInterval(dt) => {
        write!(f, "time interval must be positive, got {}", dt)
      },
      Error::Dimension { what, expected, found } => {
        write!(f, "{}: expected dimension {}, found {}", what, expected, found)
      },
      Error::NotPositiveDefinite => {
        write!(f, "innovation covariance is not positive definite")
      },
      Error::NotSymmetric(what) => write!(f, "{} must be symmetric", what),
      Error::NotPositiveSemiDefinite(what) => {
        write!(f, "{} must be positive semi-definite", what)
      },
      Error::Shape(e) => write!(f, "shape error: {}", e),
      Error::Plot(msg) => write!(f, "plotting failed: {}", msg),
      Error::EmptySequence => write!(f, "no measurements to filter"),
    }
  }
}

impl ::std::error::Error for Error {
  fn source(&self) -> Option<&(dyn ::std::error::Error + 'static)> {
    match self {
      Error::Shape(e) => Some(e),
      _ => None,
    }
  }
}

impl From<ShapeError> for Error {
  fn from(v: ShapeError) -> Error {
    Error::Shape(v)
  }
}

impl From<FactorizeError> for Error {
  fn from(v: FactorizeError) -> Error {
    match v {
      FactorizeError::Shape(e) => Error::Shape(e),
      FactorizeError::NotPositiveDefinite { .. } => Error::NotPositiveDefinite,
    }
  }
}

/// Reject NaN and infinities.
pub fn check_finite(what: &'static str, value: f64) -> Result<f64> {
  if value.is_finite() {
    Ok(value)
  } else {
    Err(Error::NonFinite { what, value, })
  }
}

pub fn check_variance(what: &'static str, value: f64) -> Result<f64> {
  let value = check_finite(what, value)?;
  if value < 0.0 {
    return Err(Error::NegativeVariance { what, value, });
  }

  Ok(value)
}

pub fn check_interval(dt: f64) -> Result<f64> {
  let dt = check_finite("time interval", dt)?;
  if dt <= 0.0 {
    return Err(Error::NonPositiveInterval(dt));
  }

  Ok(dt)
}

pub fn check_dim(what: &'static str, expected: usize, found: usize) -> Result<()> {
  if expected != found {
    Err(Error::Dimension { what, expected, found, })
  } else {
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn finite_values_pass_through() {
    assert_eq!(check_finite("z", 1.5).unwrap(), 1.5);
    assert_eq!(check_variance("r", 0.0).unwrap(), 0.0);
    assert_eq!(check_interval(5.0).unwrap(), 5.0);
  }

  #[test]
  fn rejects_malformed_numbers() {
    match check_finite("measurement", ::std::f64::NAN) {
      Err(Error::NonFinite { what, .. }) => assert_eq!(what, "measurement"),
      other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(check_variance("q", -0.5),
                     Err(Error::NegativeVariance { what: "q", .. })));
    assert!(matches!(check_interval(0.0), Err(Error::NonPositiveInterval(_))));
    assert!(check_variance("r", ::std::f64::INFINITY).is_err());
  }

  #[test]
  fn dimension_mismatch_is_reported() {
    let err = check_dim("measurement", 2, 3).unwrap_err();
    assert_eq!(err.to_string(), "measurement: expected dimension 2, found 3");
  }
}
