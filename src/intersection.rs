use std::cmp::Ordering;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::data::{Line, Point, Polygon, Segment, Vector};
use crate::orientation::Orientation;

/// Segments whose direction vectors have a perp-dot product below
/// this are treated as parallel.
const PARALLEL_EPS: f64 = 1e-8;

pub fn distance_sqr(p: &Point, q: &Point) -> f64 {
  let d = *q - *p;
  d.squared_magnitude()
}

pub fn distance_sqr_to_line(p: &Point, l: &Line) -> f64 {
  let (a, b) = (l.a(), l.b());
  let d = a * p.x + b * p.y + l.c();
  d * d / (a * a + b * b)
}

/// Squared distance from a point to a segment, counted only when the
/// foot of the perpendicular lies within the segment; `+inf`
/// otherwise.
pub fn distance_sqr_strict(p: &Point, s: &Segment) -> f64 {
  let to_p = Vector::between(&s.p1, p);
  let seg = s.to_vector();
  let d1 = to_p.dot(&seg);
  if d1 < 0.0 {
    return f64::INFINITY;
  }
  if d1 > seg.dot(&seg) {
    return f64::INFINITY;
  }
  distance_sqr_to_line(p, &s.to_line())
}

/// Squared distance from a point to a polygon's contour. A point
/// inside the contour still measures to the boundary.
pub fn distance_sqr_to_polygon(p: &Point, polygon: &Polygon) -> f64 {
  let mut min = f64::INFINITY;

  for vertex in polygon.vertices() {
    let d = distance_sqr(p, vertex);
    if d == 0.0 {
      return 0.0;
    }
    min = min.min(d);
  }

  for edge in polygon.edges() {
    let d = distance_sqr_strict(p, &edge);
    if d == 0.0 {
      return 0.0;
    }
    min = min.min(d);
  }

  min
}

///////////////////////////////////////////////////////////////////////////////
// Exact overlap test

fn crossing(p1: &Point, p2: &Point, p3: &Point, p4: &Point) -> bool {
  match Orientation::turn(p1, p2, p3) {
    Orientation::Collinear => true,
    o => Orientation::turn(p3, p4, p2) != o.reverse(),
  }
}

fn contained(p1: &Point, p2: &Point, p3: &Point, p4: &Point) -> bool {
  match Orientation::turn(p1, p2, p3) {
    Orientation::Collinear => true,
    o => Orientation::turn(p1, p2, p4) != o,
  }
}

/// Do two segments share at least one point? Collinear overlap and
/// endpoint touch count. Exact: dispatches on the lexicographic
/// relation of the four endpoints into a finite set of orientation
/// tests, with no division anywhere.
pub fn intersects(s1: &Segment, s2: &Segment) -> bool {
  let (a1, a2) = if s1.p1.lex_cmp(&s1.p2).is_lt() {
    (&s1.p1, &s1.p2)
  } else {
    (&s1.p2, &s1.p1)
  };
  let (b1, b2) = if s2.p1.lex_cmp(&s2.p2).is_lt() {
    (&s2.p1, &s2.p2)
  } else {
    (&s2.p2, &s2.p1)
  };

  if a2.lex_cmp(b1).is_lt() || b2.lex_cmp(a1).is_lt() {
    return false;
  }

  match a1.lex_cmp(b1) {
    Ordering::Less => match a2.lex_cmp(b1) {
      Ordering::Less => false,
      Ordering::Equal => true,
      Ordering::Greater => match a2.lex_cmp(b2) {
        Ordering::Less => crossing(a1, a2, b1, b2),
        Ordering::Equal => true,
        Ordering::Greater => contained(a1, a2, b1, b2),
      },
    },
    Ordering::Equal => true,
    Ordering::Greater => match b2.lex_cmp(a1) {
      Ordering::Less => false,
      Ordering::Equal => true,
      Ordering::Greater => match b2.lex_cmp(a2) {
        Ordering::Less => crossing(b1, b2, a1, a2),
        Ordering::Equal => true,
        Ordering::Greater => contained(b1, b2, a1, a2),
      },
    },
  }
}

/// Pairwise edge check, O(n·m).
pub fn polygons_intersect(p1: &Polygon, p2: &Polygon) -> bool {
  for e1 in p1.edges() {
    for e2 in p2.edges() {
      if intersects(&e1, &e2) {
        return true;
      }
    }
  }
  false
}

///////////////////////////////////////////////////////////////////////////////
// Parametric intersection

/// Shape of the intersection of two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
  Empty,
  Point(Point),
  Segment(Point, Point),
}

/// Find the intersection of two non-degenerate segments.
///
/// Based on <http://geomalgorithms.com/a05-_intersect-1.html>: solve
/// the two-parameter linear system with perp-dot products.
/// Near-parallel segments (`|det| < 1e-8`) are either collinear, in
/// which case the overlap interval decides between a point and a
/// subsegment, or disjoint.
pub fn intersect(s1: &Segment, s2: &Segment) -> Intersection {
  let u = s1.to_vector();
  let v = s2.to_vector();
  let w = s1.p1 - s2.p1;
  let d = u.perp_dot(&v);

  if d.abs() < PARALLEL_EPS {
    // parallel
    if u.perp_dot(&w) != 0.0 || v.perp_dot(&w) != 0.0 {
      return Intersection::Empty; // not collinear
    }

    // collinear: endpoints of s1 in the parameter space of s2
    let w2 = s1.p2 - s2.p1;
    let (mut t0, mut t1) = if v.x != 0.0 {
      (w.x / v.x, w2.x / v.x)
    } else {
      (w.y / v.y, w2.y / v.y)
    };
    if t0 > t1 {
      std::mem::swap(&mut t0, &mut t1);
    }
    if t0 > 1.0 || t1 < 0.0 {
      return Intersection::Empty;
    }
    let t0 = t0.max(0.0);
    let t1 = t1.min(1.0);
    if t0 == t1 {
      return Intersection::Point(s2.p1 + t0 * v);
    }
    return Intersection::Segment(s2.p1 + t0 * v, s2.p1 + t1 * v);
  }

  // skew: a single point if both parameters land in [0, 1]
  let s = v.perp_dot(&w) / d;
  if !(0.0..=1.0).contains(&s) {
    return Intersection::Empty;
  }
  let t = u.perp_dot(&w) / d;
  if !(0.0..=1.0).contains(&t) {
    return Intersection::Empty;
  }

  Intersection::Point(s1.p1 + s * u)
}

///////////////////////////////////////////////////////////////////////////////
// Point in polygon

/// Winding-number test; valid for self-intersecting contours.
pub fn point_in_polygon(p: &Point, polygon: &Polygon) -> bool {
  let vertices = polygon.vertices();
  let n = vertices.len();
  let mut wn = 0;

  for i in 0..n {
    let v = &vertices[i];
    let v1 = &vertices[(i + 1) % n];
    if v.y <= p.y {
      // upward crossing counts when p is left of the edge
      if v1.y > p.y && Orientation::turn(v, v1, p) == Orientation::Left {
        wn += 1;
      }
    } else if v1.y <= p.y && Orientation::turn(v, v1, p) == Orientation::Right {
      wn -= 1;
    }
  }

  wn != 0
}

///////////////////////////////////////////////////////////////////////////////
// Polar angle

/// Angle from the +x axis to the vector, in `[0, 2π)`; `-1.0` for the
/// zero vector. Axis-aligned vectors are resolved without `atan`.
pub fn polar_angle(v: &Vector) -> f64 {
  if v.x == 0.0 && v.y == 0.0 {
    return -1.0;
  }

  if v.x == 0.0 {
    return if v.y > 0.0 { FRAC_PI_2 } else { 3.0 * FRAC_PI_2 };
  }

  let theta = (v.y / v.x).atan();
  if v.x > 0.0 {
    // quadrants 1 and 4
    if v.y >= 0.0 {
      theta
    } else {
      2.0 * PI + theta
    }
  } else {
    // quadrants 2 and 3
    PI + theta
  }
}

///////////////////////////////////////////////////////////////////////////////
// Tests
