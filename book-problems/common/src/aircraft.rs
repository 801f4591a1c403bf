//! Chapter 3, examples 2-4: tracking the range of an aircraft flying away
//! from a radar with the alpha-beta and alpha-beta-gamma filters.

use nd::{Array1, Array2, ArrayView2};

use kf_filters::{gh, Workspace};

use crate::{Cell, Chart, Example, ModelTruth, Result, StateSteps, Table};

/// Ranges in meters for the aircraft flying at a constant 40 m/s.
pub const CONSTANT_VELOCITY_MEASUREMENTS: [f64; 10] = [
  30171.0, 30353.0, 30756.0, 30799.0, 31018.0,
  31278.0, 31276.0, 31379.0, 31748.0, 32175.0,
];
/// Ranges in meters for the aircraft that starts accelerating after 20 s.
pub const ACCELERATING_MEASUREMENTS: [f64; 10] = [
  30221.0, 30453.0, 30906.0, 30999.0, 31368.0,
  31978.0, 32526.0, 33379.0, 34698.0, 36275.0,
];

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Motion {
  ConstantVelocity,
  /// Constant velocity until `onset` seconds, then constant acceleration.
  AccelerateAfter {
    onset: f64,
    acceleration: f64,
  },
}

impl Motion {
  /// `[range, velocity, acceleration]` at time `t`.
  pub fn true_state(&self, x0: f64, v0: f64, t: f64) -> [f64; 3] {
    match *self {
      Motion::AccelerateAfter { onset, acceleration } if t > onset => {
        let ta = t - onset;
        [x0 + v0 * onset + v0 * ta + 0.5 * acceleration * ta * ta,
         v0 + acceleration * ta,
         acceleration]
      },
      _ => [x0 + v0 * t, v0, 0.0],
    }
  }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Tracker {
  AlphaBeta {
    alpha: f64,
    beta: f64,
  },
  AlphaBetaGamma {
    alpha: f64,
    beta: f64,
    gamma: f64,
  },
}

impl Tracker {
  pub fn state_dim(&self) -> usize {
    match *self {
      Tracker::AlphaBeta { .. } => 2,
      Tracker::AlphaBetaGamma { .. } => 3,
    }
  }
  fn name(&self) -> &'static str {
    match *self {
      Tracker::AlphaBeta { .. } => "α–β",
      Tracker::AlphaBetaGamma { .. } => "α–β–γ",
    }
  }
}

#[derive(Copy, Clone, Debug)]
pub struct AircraftSetup {
  pub tracker: Tracker,
  pub motion: Motion,
  /// Track-to-track interval in seconds.
  pub dt: f64,
  pub initial_range: f64,
  pub initial_velocity: f64,
  /// Only used by the alpha-beta-gamma tracker.
  pub initial_acceleration: f64,
  pub true_initial_range: f64,
  pub true_initial_velocity: f64,
  pub measurements: &'static [f64],
}

impl Default for AircraftSetup {
  /// Example 2: constant velocity aircraft, alpha-beta filter.
  fn default() -> Self {
    AircraftSetup {
      tracker: Tracker::AlphaBeta { alpha: 0.2, beta: 0.1, },
      motion: Motion::ConstantVelocity,
      dt: 5.0,
      initial_range: 30000.0,
      initial_velocity: 40.0,
      initial_acceleration: 0.0,
      true_initial_range: 30000.0,
      true_initial_velocity: 40.0,
      measurements: &CONSTANT_VELOCITY_MEASUREMENTS,
    }
  }
}

impl AircraftSetup {
  /// Example 3: the alpha-beta filter lags behind an accelerating aircraft.
  pub fn accelerating_alpha_beta() -> Self {
    AircraftSetup {
      motion: Motion::AccelerateAfter { onset: 20.0, acceleration: 8.0, },
      initial_velocity: 50.0,
      true_initial_velocity: 50.0,
      measurements: &ACCELERATING_MEASUREMENTS,
      ..Default::default()
    }
  }
  /// Example 4: the alpha-beta-gamma filter on the same aircraft.
  pub fn accelerating_alpha_beta_gamma() -> Self {
    AircraftSetup {
      tracker: Tracker::AlphaBetaGamma { alpha: 0.5, beta: 0.4, gamma: 0.1, },
      ..AircraftSetup::accelerating_alpha_beta()
    }
  }

  fn algo(&self) -> Result<gh::Algo> {
    match self.tracker {
      Tracker::AlphaBeta { alpha, beta } => gh::Algo::alpha_beta(alpha, beta, self.dt),
      Tracker::AlphaBetaGamma { alpha, beta, gamma } => {
        gh::Algo::alpha_beta_gamma(alpha, beta, gamma, self.dt)
      },
    }
  }

  fn initial_state(&self) -> Array1<f64> {
    let x = vec![self.initial_range, self.initial_velocity, self.initial_acceleration];
    Array1::from(x[..self.tracker.state_dim()].to_vec())
  }
}

impl From<AircraftSetup> for AircraftData {
  fn from(params: AircraftSetup) -> AircraftData {
    let steps = params.measurements.len();
    let truth = Array2::from_shape_fn((steps, 3), |(j, k)| {
      let t = (j + 1) as f64 * params.dt;
      params.motion.true_state(params.true_initial_range,
                               params.true_initial_velocity, t)[k]
    });

    AircraftData {
      params,
      truth,
      observations: crate::column(params.measurements),
    }
  }
}

#[derive(Clone, Debug)]
pub struct AircraftData {
  pub params: AircraftSetup,
  /// `[range, velocity, acceleration]` per step.
  pub truth: Array2<f64>,
  pub observations: Array2<f64>,
}

impl ModelTruth<f64> for AircraftData {
  fn truth(&self) -> ArrayView2<f64> { self.truth.view() }
  fn observations(&self) -> ArrayView2<f64> { self.observations.view() }
}

impl AircraftData {
  fn accelerating(&self) -> bool {
    self.params.motion != Motion::ConstantVelocity
  }
}

impl Example for AircraftData {
  fn title(&self) -> String {
    let name = self.params.tracker.name();
    match (self.params.tracker, self.accelerating()) {
      (Tracker::AlphaBetaGamma { .. }, _) => format!("{} Filter: Range Tracking", name),
      (_, true) => format!("{} Filter Tracking of Accelerating Aircraft", name),
      (_, false) => format!("{} Filter Tracking of Constant Velocity Aircraft", name),
    }
  }

  fn run(&self) -> Result<StateSteps> {
    let algo = self.params.algo()?;
    let x0 = self.params.initial_state();
    let mut ws = gh::Workspace::alloc(gh::Init { initial_state: x0.view(), })?;
    util::run_filter(&algo, &mut ws, self.observations.view())
  }

  fn table(&self, states: &StateSteps) -> Table {
    let gamma = states.state_dim() == 3;
    let accelerating = self.accelerating();
    let vel_width = if gamma { 12 } else { 15 };

    let mut t = Table::new()
      .column("Time Step", 10, None)
      .column("Measured", 10, None)
      .column("Predicted", 12, Some(2))
      .column("Estimated", 12, Some(2));
    if accelerating {
      t = t.column("True", 10, Some(2));
    }
    t = t.column(if gamma { "Est. Vel." } else { "Est. Velocity" }, vel_width, Some(2));
    if accelerating {
      t = t.column(if gamma { "True Vel." } else { "True Velocity" }, vel_width, Some(2));
    }
    if gamma {
      t = t.column("Est. Acc.", 12, Some(2))
        .column("True Acc.", 10, Some(2));
    }

    for j in 0..states.steps() {
      let mut row: Vec<Cell> = vec![
        (j + 1).into(),
        self.observations[[j, 0]].into(),
        states.predictions[[j, 0]].into(),
        states.estimates[[j, 0]].into(),
      ];
      if accelerating {
        row.push(self.truth[[j, 0]].into());
      }
      row.push(states.estimates[[j, 1]].into());
      if accelerating {
        row.push(self.truth[[j, 1]].into());
      }
      if gamma {
        row.push(states.estimates[[j, 2]].into());
        row.push(self.truth[[j, 2]].into());
      }
      t.push_row(row);
    }
    t
  }

  fn charts(&self, states: &StateSteps) -> Vec<Chart> {
    let name = self.params.tracker.name();
    let mut charts = vec![
      plot_helper::estimate_chart(self, states, 0, true,
                                  Chart::new("range", &self.title(),
                                             "Time Step (n)", "Range (meters)")),
    ];
    if !self.accelerating() {
      return charts;
    }

    let title = match self.params.tracker {
      Tracker::AlphaBeta { .. } => {
        format!("{} Filter Velocity Tracking of Accelerating Aircraft", name)
      },
      Tracker::AlphaBetaGamma { .. } => format!("{} Filter: Velocity Tracking", name),
    };
    charts.push(plot_helper::estimate_chart(self, states, 1, false,
                                            Chart::new("velocity", &title,
                                                       "Time Step (n)",
                                                       "Velocity (m/s)")));
    if states.state_dim() == 3 {
      let title = format!("{} Filter: Acceleration Tracking", name);
      charts.push(plot_helper::estimate_chart(self, states, 2, false,
                                              Chart::new("acceleration", &title,
                                                         "Time Step (n)",
                                                         "Acceleration (m/s²)")));
    }

    charts
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn acceleration_starts_after_onset() {
    let m = Motion::AccelerateAfter { onset: 20.0, acceleration: 8.0, };
    assert_eq!(m.true_state(30000.0, 50.0, 20.0), [31000.0, 50.0, 0.0]);
    assert_eq!(m.true_state(30000.0, 50.0, 25.0), [31350.0, 90.0, 8.0]);
    assert_eq!(m.true_state(30000.0, 50.0, 50.0), [36100.0, 290.0, 8.0]);
  }

  #[test]
  fn constant_velocity_truth() {
    let data: AircraftData = AircraftSetup::default().into();
    assert_eq!(data.truth[[0, 0]], 30200.0);
    assert_eq!(data.truth[[9, 0]], 32000.0);
    assert_eq!(data.truth[[9, 1]], 40.0);
  }

  #[test]
  fn presets_pick_the_right_filter() {
    assert_eq!(AircraftSetup::default().initial_state().len(), 2);
    assert_eq!(AircraftSetup::accelerating_alpha_beta().initial_state().len(), 2);
    let s = AircraftSetup::accelerating_alpha_beta_gamma();
    assert_eq!(s.initial_state().to_vec(), vec![30000.0, 50.0, 0.0]);
    assert_eq!(s.measurements[0], 30221.0);
  }
}
