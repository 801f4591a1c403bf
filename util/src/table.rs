//! Fixed-width console tables, one row per filter step.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
  Int(i64),
  /// Printed with the column's precision.
  Num(f64),
  Text(String),
}
impl From<usize> for Cell {
  fn from(v: usize) -> Cell { Cell::Int(v as i64) }
}
impl From<i64> for Cell {
  fn from(v: i64) -> Cell { Cell::Int(v) }
}
impl From<f64> for Cell {
  fn from(v: f64) -> Cell { Cell::Num(v) }
}
impl<'a> From<&'a str> for Cell {
  fn from(v: &'a str) -> Cell { Cell::Text(v.to_string()) }
}

#[derive(Debug, Clone)]
struct Column {
  header: String,
  width: usize,
  precision: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
  columns: Vec<Column>,
  rows: Vec<Vec<Cell>>,
}

impl Table {
  pub fn new() -> Table { Default::default() }

  /// Adds a left aligned column `width` characters wide. Numbers are
  /// printed with `precision` decimals, or as short as possible if `None`.
  pub fn column(mut self, header: &str, width: usize,
                precision: Option<usize>) -> Table {
    self.columns.push(Column {
      header: header.to_string(),
      width,
      precision,
    });
    self
  }

  pub fn push_row(&mut self, row: Vec<Cell>) {
    assert_eq!(row.len(), self.columns.len(), "row width does not match the columns");
    self.rows.push(row);
  }

  pub fn rows(&self) -> usize { self.rows.len() }

  fn rule_width(&self) -> usize {
    let widths: usize = self.columns.iter().map(|c| c.width ).sum();
    widths + self.columns.len().saturating_sub(1)
  }
}

fn write_cell(f: &mut fmt::Formatter, cell: &Cell, col: &Column) -> fmt::Result {
  let w = col.width;
  match (cell, col.precision) {
    (&Cell::Int(v), _) => write!(f, "{:<w$}", v, w = w),
    (&Cell::Num(v), Some(p)) => write!(f, "{:<w$.p$}", v, w = w, p = p),
    (&Cell::Num(v), None) => write!(f, "{:<w$}", v, w = w),
    (&Cell::Text(ref s), _) => write!(f, "{:<w$}", s, w = w),
  }
}

impl fmt::Display for Table {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    for (i, c) in self.columns.iter().enumerate() {
      if i != 0 { f.write_str(" ")?; }
      write!(f, "{:<w$}", c.header, w = c.width)?;
    }
    writeln!(f)?;
    writeln!(f, "{}", "-".repeat(self.rule_width()))?;

    for row in self.rows.iter() {
      for (i, (cell, col)) in row.iter().zip(self.columns.iter()).enumerate() {
        if i != 0 { f.write_str(" ")?; }
        write_cell(f, cell, col)?;
      }
      writeln!(f)?;
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn formats_like_the_book_tables() {
    let mut t = Table::new()
      .column("Step", 6, None)
      .column("Measured", 10, None)
      .column("Estimate", 10, Some(2));
    t.push_row(vec![1usize.into(), 996.0.into(), 996.0.into()]);
    t.push_row(vec![2usize.into(), 49.03.into(), 1003.6666.into()]);

    let out = t.to_string();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Step   Measured   Estimate  ");
    assert_eq!(lines[1], "-".repeat(28));
    assert_eq!(lines[2], "1      996        996.00    ");
    assert_eq!(lines[3], "2      49.03      1003.67   ");
    assert_eq!(t.rows(), 2);
  }

  #[test]
  #[should_panic]
  fn rejects_ragged_rows() {
    let mut t = Table::new().column("a", 3, None);
    t.push_row(vec!["x".into(), "y".into()]);
  }
}
