use crate::data::{Point, Segment, Vector};

/// Which way does one direction turn relative to another?
///
/// `Left` means the perp-dot product is positive (counterclockwise in
/// the usual y-up plane).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
  Left,
  Right,
  Collinear,
}

use Orientation::*;

impl Orientation {
  /// Orientation of `v2` relative to `v1`.
  pub fn of(v1: &Vector, v2: &Vector) -> Orientation {
    let p = v1.perp_dot(v2);
    if p > 0.0 {
      Left
    } else if p < 0.0 {
      Right
    } else {
      Collinear
    }
  }

  /// Orientation of the turn `p0 -> p1 -> p2` at `p0`.
  pub fn turn(p0: &Point, p1: &Point, p2: &Point) -> Orientation {
    Orientation::of(&Vector::between(p0, p1), &Vector::between(p0, p2))
  }

  /// Which side of the directed segment the point lies on.
  pub fn side(p: &Point, s: &Segment) -> Orientation {
    Orientation::of(&s.to_vector(), &Vector::between(&s.p1, p))
  }

  pub fn reverse(self) -> Orientation {
    match self {
      Left => Right,
      Right => Left,
      Collinear => Collinear,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn turns() {
    let o = Point::new(0.0, 0.0);
    assert_eq!(
      Orientation::turn(&o, &Point::new(1.0, 0.0), &Point::new(1.0, 1.0)),
      Left
    );
    assert_eq!(
      Orientation::turn(&o, &Point::new(1.0, 0.0), &Point::new(1.0, -1.0)),
      Right
    );
    assert_eq!(
      Orientation::turn(&o, &Point::new(1.0, 1.0), &Point::new(2.0, 2.0)),
      Collinear
    );
  }

  #[test]
  fn side_of_segment() {
    let s = Segment::new(Point::new(0.0, 0.0), Point::new(2.0, 0.0));
    assert_eq!(Orientation::side(&Point::new(1.0, 1.0), &s), Left);
    assert_eq!(Orientation::side(&Point::new(1.0, -1.0), &s), Right);
    assert_eq!(Orientation::side(&Point::new(3.0, 0.0), &s), Collinear);
  }

  #[test]
  fn reverse() {
    assert_eq!(Left.reverse(), Right);
    assert_eq!(Right.reverse(), Left);
    assert_eq!(Collinear.reverse(), Collinear);
  }
}
