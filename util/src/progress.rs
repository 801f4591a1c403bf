
use std::borrow::Cow;
use std::iter::{ExactSizeIterator};
use std::io::{self, Stderr};
use std::time::Duration;

use pbr::ProgressBar;
use tracing::info;

/// Wraps a step iterator with a progress bar on stderr; logs once it is
/// exhausted.
pub struct ReportingIterator<I>
  where I: ExactSizeIterator,
{
  name: Cow<'static, str>,
  progress: ProgressBar<Stderr>,
  inner: I,
  finished: bool,
}
impl<I> ReportingIterator<I>
  where I: ExactSizeIterator,
{
  pub fn new(inner: I, name: Cow<'static, str>) -> ReportingIterator<I> {
    let mut p = ProgressBar::on(io::stderr(), inner.len() as _);
    p.show_speed = false;
    p.show_percent = true;
    p.show_counter = true;
    p.show_time_left = false;

    let fps = Duration::new(1, 0) / 30;
    p.set_max_refresh_rate(Some(fps));

    let msg = format!("{}: ", name);
    p.message(&msg[..]);
    ReportingIterator {
      name,
      progress: p,
      inner,
      finished: false,
    }
  }
}

impl<I> Iterator for ReportingIterator<I>
  where I: ExactSizeIterator,
{
  type Item = I::Item;
  fn next(&mut self) -> Option<Self::Item> {
    match self.inner.next() {
      Some(v) => {
        self.progress.inc();
        Some(v)
      },
      None => {
        if !self.finished {
          self.finished = true;
          let msg = format!("{} done", self.name);
          self.progress.finish_println("");
          info!("{}", msg);
        }

        None
      },
    }
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    self.inner.size_hint()
  }
}

impl<I> ExactSizeIterator for ReportingIterator<I>
  where I: ExactSizeIterator,
{ }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn yields_every_item_once() {
    let items: Vec<u32> = ReportingIterator::new(0..5u32, "count".into()).collect();
    assert_eq!(items, vec![0, 1, 2, 3, 4]);

    let mut it = ReportingIterator::new(0..1u32, "once".into());
    assert_eq!(it.len(), 1);
    assert_eq!(it.next(), Some(0));
    assert_eq!(it.next(), None);
    assert_eq!(it.next(), None);
  }
}
