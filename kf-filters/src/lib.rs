//! Filters from the first chapters of "Kalman Filter from the Ground Up":
//! the fixed-gain alpha/alpha-beta/alpha-beta-gamma filters, the
//! one-dimensional Kalman filter with process noise and the general
//! multivariate linear Kalman filter.

extern crate ndarray as nd;
extern crate kf_core;
extern crate nla_factorize;

use nd::{ArrayView1, ArrayView2};

pub use kf_core::{Algorithm, Workspace, Initializer, Result, Error};

pub mod gh;
pub mod kalman;
pub mod utils;

/// Read access to what a filter produced on its latest step.
pub trait EstimateWorkspace {
  fn state_dim(&self) -> usize { self.estimate_view().len() }
  fn measurement_dim(&self) -> usize { self.gain_view().ncols() }

  /// The prior for the latest step, before its measurement was applied.
  fn prediction_view(&self) -> ArrayView1<f64>;
  fn estimate_view(&self) -> ArrayView1<f64>;
  /// `K` in `estimate = prediction + K * residual`, shaped (state, measurement).
  fn gain_view(&self) -> ArrayView2<f64>;
  /// Posterior covariance, for filters that track one.
  fn covariance_view(&self) -> Option<ArrayView2<f64>> { None }
  fn prediction_covariance_view(&self) -> Option<ArrayView2<f64>> { None }
}
