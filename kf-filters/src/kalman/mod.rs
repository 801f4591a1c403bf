//! Kalman filters proper: the one-dimensional filter of the early chapters
//! and the general multivariate linear filter.

pub mod kf;
pub mod scalar;
