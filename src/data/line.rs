use crate::data::Point;

/// A line in general form `a*x + b*y + c = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
  a: f64,
  b: f64,
  c: f64,
}

impl Line {
  /// The line through two points. Horizontal and vertical lines get
  /// exact unit coefficients; two equal points yield the degenerate
  /// all-zero line.
  pub fn through(p1: &Point, p2: &Point) -> Line {
    if p1.y == p2.y {
      if p2.x > p1.x {
        Line { a: 0.0, b: 1.0, c: -p1.y }
      } else if p2.x == p1.x {
        Line { a: 0.0, b: 0.0, c: 0.0 }
      } else {
        Line { a: 0.0, b: -1.0, c: p1.y }
      }
    } else if p2.x == p1.x {
      if p2.y > p1.y {
        Line { a: -1.0, b: 0.0, c: p1.x }
      } else {
        Line { a: 1.0, b: 0.0, c: -p1.x }
      }
    } else {
      let a = p1.y - p2.y;
      let b = p2.x - p1.x;
      let c = -p1.x * a - p1.y * b;
      Line { a, b, c }
    }
  }

  pub fn a(&self) -> f64 {
    self.a
  }

  pub fn b(&self) -> f64 {
    self.b
  }

  pub fn c(&self) -> f64 {
    self.c
  }
}
