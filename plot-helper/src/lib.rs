extern crate util;
extern crate gnuplot;
extern crate ndarray as nd;
extern crate kf_core;
extern crate tracing;

use util::{StateSteps, ModelTruth};

use gnuplot::{Figure, PlotOption, DashType, AxesCommon};
use tracing::info;

use kf_core::{Error, Result};

use std::path::{Path, PathBuf};

/// How a series is drawn. Mirrors the usual book colours: dashed black truth,
/// red measurements, green predictions, blue estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
  Truth,
  Measured,
  Predicted,
  Estimated,
  Gain,
  /// One standard deviation around the estimate.
  Bound,
}

#[derive(Debug, Clone)]
pub struct Series {
  pub caption: String,
  pub style: Style,
  pub x: Vec<f64>,
  pub y: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Chart {
  /// Appended to the example name to form the file name.
  pub suffix: String,
  pub title: String,
  pub x_label: String,
  pub y_label: String,
  pub size: (u32, u32),
  pub series: Vec<Series>,
}

impl Chart {
  pub fn new(suffix: &str, title: &str, x_label: &str, y_label: &str) -> Chart {
    Chart {
      suffix: suffix.to_string(),
      title: title.to_string(),
      x_label: x_label.to_string(),
      y_label: y_label.to_string(),
      size: (1000, 600),
      series: Vec::new(),
    }
  }
  pub fn size(mut self, w: u32, h: u32) -> Chart {
    self.size = (w, h);
    self
  }
  pub fn series<I>(mut self, caption: &str, style: Style, y: I) -> Chart
    where I: IntoIterator<Item = f64>,
  {
    let y: Vec<f64> = y.into_iter().collect();
    self.series.push(Series {
      caption: caption.to_string(),
      style,
      x: steps(y.len()),
      y,
    });
    self
  }
}

/// Book step numbers `1..=n`.
pub fn steps(n: usize) -> Vec<f64> {
  (1..n + 1).map(|i| i as f64 ).collect()
}

/// Where charts go: always a PNG in `out_dir`, plus a window if `gui`.
#[derive(Debug, Clone)]
pub struct PlotTarget {
  pub out_dir: PathBuf,
  pub name: String,
  pub gui: bool,
}

impl PlotTarget {
  pub fn png_path(&self, chart: &Chart) -> PathBuf {
    self.out_dir.join(format!("{}-{}.png", self.name, chart.suffix))
  }
}

fn draw(fg: &mut Figure, chart: &Chart) {
  let axis = fg.axes2d();
  axis.set_title(&chart.title[..], &[]);
  axis.set_x_label(&chart.x_label[..], &[]);
  axis.set_y_label(&chart.y_label[..], &[]);
  axis.set_x_grid(true);
  axis.set_y_grid(true);

  for s in chart.series.iter() {
    let caption = PlotOption::Caption(&s.caption[..]);
    let x = s.x.iter();
    let y = s.y.iter();
    match s.style {
      Style::Truth => {
        axis.lines(x, y, &[caption,
                           PlotOption::Color("black".into()),
                           PlotOption::LineStyle(DashType::Dash)]);
      },
      Style::Measured => {
        axis.lines_points(x, y, &[caption,
                                  PlotOption::Color("red".into()),
                                  PlotOption::PointSymbol('O')]);
      },
      Style::Predicted => {
        axis.lines_points(x, y, &[caption,
                                  PlotOption::Color("dark-green".into()),
                                  PlotOption::PointSymbol('T')]);
      },
      Style::Estimated => {
        axis.lines_points(x, y, &[caption,
                                  PlotOption::Color("blue".into()),
                                  PlotOption::PointSymbol('S')]);
      },
      Style::Gain => {
        axis.lines_points(x, y, &[caption,
                                  PlotOption::Color("magenta".into()),
                                  PlotOption::PointSymbol('O')]);
      },
      Style::Bound => {
        axis.lines(x, y, &[caption,
                           PlotOption::Color("red".into()),
                           PlotOption::LineStyle(DashType::Dot)]);
      },
    }
  }
}

/// Writes `chart` as a PNG and, unless disabled, shows it in a window.
pub fn render(chart: &Chart, target: &PlotTarget) -> Result<PathBuf> {
  ensure_dir(&target.out_dir)?;
  let out_name = target.png_path(chart);

  let mut all = Figure::new();
  draw(&mut all, chart);
  all.save_to_png(&out_name, chart.size.0, chart.size.1)
    .map_err(|e| Error::Plot(e.to_string()) )?;
  info!("wrote {}", out_name.display());

  if target.gui {
    let mut all = Figure::new();
    draw(&mut all, chart);
    all.show()
      .map_err(|e| Error::Plot(e.to_string()) )?;
  }

  Ok(out_name)
}

fn ensure_dir(dir: &Path) -> Result<()> {
  ::std::fs::create_dir_all(dir)
    .map_err(|e| Error::Plot(format!("can't create {}: {}", dir.display(), e)) )
}

/// The standard comparison chart for state component `i`: truth, the
/// measurements (if `i` is measured directly), predictions, estimates and,
/// when the filter tracks a covariance, the one sigma band.
pub fn estimate_chart<T>(source: &T, states: &StateSteps, i: usize,
                         measured: bool, chart: Chart) -> Chart
  where T: ModelTruth<f64>,
{
  let truth = source.truth();
  let observations = source.observations();

  let mut chart = chart
    .series("True", Style::Truth, truth.column(i).iter().cloned());
  if measured {
    chart = chart.series("Measured", Style::Measured,
                         observations.column(0).iter().cloned());
  }
  chart = chart
    .series("Predicted", Style::Predicted, states.prediction(i).iter().cloned())
    .series("Estimated", Style::Estimated, states.estimate(i).iter().cloned());

  if let Some(var) = states.variance(i) {
    let est = states.estimate(i);
    let upper = est.iter().zip(var.iter()).map(|(m, v)| m + v.sqrt() );
    let lower = est.iter().zip(var.iter()).map(|(m, v)| m - v.sqrt() );
    chart = chart
      .series("Estimate + 1 sigma", Style::Bound, upper)
      .series("Estimate - 1 sigma", Style::Bound, lower);
  }

  chart
}

/// Gain applied to the residual for state component `i` at each step.
pub fn gain_chart(states: &StateSteps, i: usize, chart: Chart) -> Chart {
  chart.size(1000, 400)
    .series("Kalman Gain", Style::Gain, states.gain(i, 0).iter().cloned())
}

#[cfg(test)]
mod tests {
  use super::*;
  use nd::{arr2, Array2, ArrayView2};

  struct Fixed {
    truth: Array2<f64>,
    observations: Array2<f64>,
  }
  impl ModelTruth<f64> for Fixed {
    fn truth(&self) -> ArrayView2<f64> { self.truth.view() }
    fn observations(&self) -> ArrayView2<f64> { self.observations.view() }
  }

  #[test]
  fn estimate_chart_collects_series() {
    let src = Fixed {
      truth: arr2(&[[50.0], [50.0], [50.0]]),
      observations: arr2(&[[49.0], [51.0], [50.5]]),
    };
    let mut states = StateSteps::new(3, 1, 1, true);
    states.estimates.fill(50.0);
    states.covariances.as_mut().unwrap().fill(4.0);

    let chart = estimate_chart(&src, &states, 0, true,
                               Chart::new("height", "Height", "Step", "m"));
    let captions: Vec<&str> = chart.series.iter().map(|s| &s.caption[..] ).collect();
    assert_eq!(captions, vec!["True", "Measured", "Predicted", "Estimated",
                              "Estimate + 1 sigma", "Estimate - 1 sigma"]);
    assert_eq!(chart.series[0].x, vec![1.0, 2.0, 3.0]);
    assert_eq!(chart.series[4].y, vec![52.0, 52.0, 52.0]);
    assert_eq!(chart.series[5].y, vec![48.0, 48.0, 48.0]);
  }

  #[test]
  fn png_named_after_example_and_suffix() {
    let target = PlotTarget {
      out_dir: PathBuf::from("graphs"),
      name: "ch4-ex1".to_string(),
      gui: false,
    };
    let chart = Chart::new("gain", "Kalman Gain", "Step", "K");
    assert_eq!(target.png_path(&chart), PathBuf::from("graphs/ch4-ex1-gain.png"));
  }
}
