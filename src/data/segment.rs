use crate::data::{Line, Point, Vector};

/// A segment directed from `p1` to `p2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
  pub p1: Point,
  pub p2: Point,
}

impl Segment {
  pub const fn new(p1: Point, p2: Point) -> Segment {
    Segment { p1, p2 }
  }

  pub fn to_vector(&self) -> Vector {
    Vector::between(&self.p1, &self.p2)
  }

  pub fn to_line(&self) -> Line {
    Line::through(&self.p1, &self.p2)
  }
}
