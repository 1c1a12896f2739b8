//! Boolean operations on two simple, hole-free polygons.
//!
//! Based on the algorithm of the PolyBoolean library:
//! M. V. Leonov and A. G. Nikitin, "An Efficient Algorithm for a
//! Closed Set of Boolean Operations on Polygonal Regions in the
//! Plane" (<http://www.complex-a5.ru/polyboolean/downloads/polybool_eng.pdf>).
//!
//! The algorithm does not prescribe how intersections are found;
//! brute force is used here. Unlike the paper, this implementation
//! supports neither degeneracies nor holes: operands touching by an
//! edge or a vertex are rejected, and a union that would enclose a
//! hole is rejected as out of range.

use log::trace;
use ordered_float::OrderedFloat;

use crate::data::{Point, Polygon, Segment, Vector};
use crate::intersection::{self, Intersection};
use crate::orientation::Orientation;
use crate::Error;

/// A Boolean operation over two polygons, producing zero or more
/// simple result polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
  /// Merge both operands into a single contour. Fails with
  /// [`Error::ResultHasHoles`] if the union is not one contour.
  Union,
  /// The common region; may be empty or several contours.
  Intersect,
  /// First minus second.
  Subtract,
  /// Symmetric difference, assembled from the two one-way
  /// subtractions (the paper's native xor rule can produce holes).
  Xor,
  /// Split the first operand by the second: the common region plus
  /// the remainder of the first.
  Partition,
}

impl BooleanOp {
  pub fn apply(self, p1: &Polygon, p2: &Polygon) -> Result<Vec<Polygon>, Error> {
    match self {
      BooleanOp::Union => unite(p1, p2),
      BooleanOp::Intersect => intersect(p1, p2),
      BooleanOp::Subtract => subtract(p1, p2),
      BooleanOp::Xor => xor(p1, p2),
      BooleanOp::Partition => partition(p1, p2),
    }
  }
}

///////////////////////////////////////////////////////////////////////////////
// Working structures

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
  Inside,
  Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
  Forward,
  Backward,
}

/// Does the incident edge lead to the previous or the next neighbour
/// of the cross vertex?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
  Prev,
  Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
  A,
  B,
}

impl Side {
  fn index(self) -> usize {
    match self {
      Side::A => 0,
      Side::B => 1,
    }
  }
}

/// A vertex of a cross polygon together with the edge leaving it.
#[derive(Debug, Clone)]
struct VertEdge {
  vertex: Point,
  /// Id of the shared cross-point record; set for cross vertices.
  star: Option<usize>,
  label: Label,
  mark: bool,
}

impl VertEdge {
  fn plain(vertex: Point) -> VertEdge {
    VertEdge { vertex, star: None, label: Label::Outside, mark: false }
  }

  fn cross(vertex: Point, star: usize) -> VertEdge {
    VertEdge { vertex, star: Some(star), label: Label::Outside, mark: false }
  }

  fn is_cross(&self) -> bool {
    self.star.is_some()
  }
}

/// Cross-vertex descriptor: one entry per edge incident to a cross
/// point, keyed by the polar angle of the outgoing direction.
#[derive(Debug, Clone)]
struct Xvd {
  side: Side,
  ve: usize,
  end: End,
  angle: f64,
}

/// Both cross polygons plus the arena of shared cross-point records
/// ("stars" of incident edges). The star lists are referenced by
/// index from both sides, which sidesteps the shared-ownership cycle
/// the pointer-based formulation has.
#[derive(Debug)]
struct CrossPolygons {
  xp: [Vec<VertEdge>; 2],
  stars: Vec<Vec<Xvd>>,
}

impl CrossPolygons {
  fn side(&self, side: Side) -> &[VertEdge] {
    &self.xp[side.index()]
  }

  fn side_mut(&mut self, side: Side) -> &mut [VertEdge] {
    &mut self.xp[side.index()]
  }

  fn has_cross_vertices(&self) -> bool {
    !self.stars.is_empty()
  }

  fn clear_marks(&mut self) {
    for xp in &mut self.xp {
      for ve in xp {
        ve.mark = false;
      }
    }
  }
}

fn prev_cyclic(i: usize, n: usize) -> usize {
  (i + n - 1) % n
}

fn next_cyclic(i: usize, n: usize) -> usize {
  (i + 1) % n
}

///////////////////////////////////////////////////////////////////////////////
// Pipeline

/// Find intersections between two polygons by brute force and build
/// the cross polygons: the original vertex rings with every
/// intersection vertex spliced in, ordered along each edge by
/// distance from the edge start.
///
/// Both polygons must be counterclockwise. Touching by edges or
/// vertices is not supported and reported as a domain error.
fn find_intersections(p1: &Polygon, p2: &Polygon) -> Result<CrossPolygons, Error> {
  let edges1: Vec<Segment> = p1.edges().collect();
  let edges2: Vec<Segment> = p2.edges().collect();

  // per-edge intersection vertices: (distance² from edge start, point, star id)
  let mut cuts1: Vec<Vec<(f64, Point, usize)>> = vec![Vec::new(); edges1.len()];
  let mut cuts2: Vec<Vec<(f64, Point, usize)>> = vec![Vec::new(); edges2.len()];
  let mut num_stars = 0;

  for (i, s1) in edges1.iter().enumerate() {
    for (j, s2) in edges2.iter().enumerate() {
      match intersection::intersect(s1, s2) {
        Intersection::Empty => {}
        Intersection::Point(p) => {
          let star = num_stars;
          num_stars += 1;
          cuts1[i].push((intersection::distance_sqr(&s1.p1, &p), p, star));
          cuts2[j].push((intersection::distance_sqr(&s2.p1, &p), p, star));
        }
        Intersection::Segment(..) => return Err(Error::TouchingEdges),
      }
    }
  }

  let xp1 = splice(&edges1, cuts1)?;
  let xp2 = splice(&edges2, cuts2)?;
  Ok(CrossPolygons { xp: [xp1, xp2], stars: vec![Vec::new(); num_stars] })
}

fn splice(edges: &[Segment], mut cuts: Vec<Vec<(f64, Point, usize)>>) -> Result<Vec<VertEdge>, Error> {
  let extra: usize = cuts.iter().map(Vec::len).sum();
  let mut xp = Vec::with_capacity(edges.len() + extra);

  for (edge, cut) in edges.iter().zip(cuts.iter_mut()) {
    xp.push(VertEdge::plain(edge.p1));
    cut.sort_by_key(|&(d, _, _)| OrderedFloat(d));
    let full = intersection::distance_sqr(&edge.p1, &edge.p2);
    for (k, &(d, p, star)) in cut.iter().enumerate() {
      // an intersection at an endpoint is a shared vertex, and two
      // intersections at one parameter coincide; both are
      // degeneracies the sweep cannot order
      if d == 0.0 || d == full || (k > 0 && d == cut[k - 1].0) {
        return Err(Error::DegenerateIntersection);
      }
      xp.push(VertEdge::cross(p, star));
    }
  }

  Ok(xp)
}

/// Register both edges of every cross vertex in its star list and
/// sort each list by polar angle, producing the angular order of all
/// edges incident to each cross point across both polygons.
fn fill_connectivity(cps: &mut CrossPolygons) {
  for side in [Side::A, Side::B] {
    let n = cps.side(side).len();
    for i in 0..n {
      let Some(star) = cps.side(side)[i].star else {
        continue;
      };
      let vertex = cps.side(side)[i].vertex;
      let prev = cps.side(side)[prev_cyclic(i, n)].vertex;
      let next = cps.side(side)[next_cyclic(i, n)].vertex;
      cps.stars[star].push(Xvd {
        side,
        ve: i,
        end: End::Prev,
        angle: intersection::polar_angle(&Vector::between(&vertex, &prev)),
      });
      cps.stars[star].push(Xvd {
        side,
        ve: i,
        end: End::Next,
        angle: intersection::polar_angle(&Vector::between(&vertex, &next)),
      });
    }
  }

  for star in &mut cps.stars {
    star.sort_by_key(|x| OrderedFloat(x.angle));
  }
}

/// The outgoing edge of the companion cross vertex (the other
/// polygon's vertex at the same cross point).
fn companion_edge(cps: &CrossPolygons, star: usize, side: Side, ve: usize) -> Segment {
  let x = cps.stars[star]
    .iter()
    .find(|x| !(x.side == side && x.ve == ve))
    .expect("cross point with a single polygon");
  let ring = cps.side(x.side);
  Segment::new(ring[x.ve].vertex, ring[next_cyclic(x.ve, ring.len())].vertex)
}

/// Label every edge of one cross polygon as inside or outside the
/// other polygon.
///
/// Walks the ring once starting at the first cross vertex: at a cross
/// vertex the outgoing edge is labeled by the side its far end lies
/// on relative to the companion's outgoing edge; a plain vertex
/// inherits the label of the last cross vertex.
fn label_edges(cps: &mut CrossPolygons, side: Side) {
  let n = cps.side(side).len();
  let first = (0..n)
    .find(|&i| cps.side(side)[i].is_cross())
    .expect("labeling a cross polygon without cross vertices");

  let mut labels = vec![Label::Outside; n];
  let mut last = Label::Outside;
  for k in 0..n {
    let i = (first + k) % n;
    if let Some(star) = cps.side(side)[i].star {
      let next = &cps.side(side)[next_cyclic(i, n)];
      let companion = companion_edge(cps, star, side, i);
      labels[i] = if Orientation::side(&next.vertex, &companion) == Orientation::Left {
        Label::Inside
      } else {
        Label::Outside
      };
      last = labels[i];
    } else {
      labels[i] = last;
    }
    trace!("label {:?}[{}] {:?} -> {:?}", side, i, cps.side(side)[i].vertex, labels[i]);
  }

  for (ve, label) in cps.side_mut(side).iter_mut().zip(labels) {
    ve.label = label;
  }
}

///////////////////////////////////////////////////////////////////////////////
// Contour collection

/// Does the rule accept this edge, and in which direction does the
/// walk continue over it? `on_start_side` tells whether the edge
/// belongs to the polygon the collection started on.
type EdgeRule = fn(&VertEdge, bool) -> Option<Direction>;

fn rule_unite(ve: &VertEdge, _on_start_side: bool) -> Option<Direction> {
  (ve.label == Label::Outside).then_some(Direction::Forward)
}

fn rule_intersect(ve: &VertEdge, _on_start_side: bool) -> Option<Direction> {
  (ve.label == Label::Inside).then_some(Direction::Forward)
}

fn rule_subtract(ve: &VertEdge, on_start_side: bool) -> Option<Direction> {
  if on_start_side && ve.label == Label::Outside {
    Some(Direction::Forward)
  } else if !on_start_side && ve.label == Label::Inside {
    Some(Direction::Backward)
  } else {
    None
  }
}

/// Select the next edge at a cross point.
///
/// Sweeps the star in angular order starting just past the arrival
/// edge and returns the first unmarked edge the rule accepts whose
/// end/direction combination actually leaves the point.
fn jump(
  cps: &CrossPolygons,
  side: Side,
  on_start_side: bool,
  ve: usize,
  dir: Direction,
  rule: EdgeRule,
) -> Option<(Side, bool, usize, Direction)> {
  let star_id = cps.side(side)[ve].star.expect("jump from a plain vertex");
  let star = &cps.stars[star_id];
  let len = star.len();

  let arrival_end = match dir {
    Direction::Forward => End::Prev,
    Direction::Backward => End::Next,
  };
  let arrival = star
    .iter()
    .position(|x| x.side == side && x.ve == ve && x.end == arrival_end)
    .expect("arrival edge not registered at its cross point");

  for step in 1..=len {
    let x = &star[(arrival + step) % len];
    let on_start_side_x = if x.side == side { on_start_side } else { !on_start_side };
    let ring = cps.side(x.side);
    let edge_ve = match x.end {
      End::Next => x.ve,
      End::Prev => prev_cyclic(x.ve, ring.len()),
    };
    let edge = &ring[edge_ve];
    if edge.mark {
      continue;
    }
    let Some(new_dir) = rule(edge, on_start_side_x) else {
      continue;
    };
    if (x.end == End::Next && new_dir == Direction::Forward)
      || (x.end == End::Prev && new_dir == Direction::Backward)
    {
      trace!("jump {:?}[{}] -> {:?}[{}] {:?}", side, ve, x.side, x.ve, new_dir);
      return Some((x.side, on_start_side_x, x.ve, new_dir));
    }
  }

  None
}

/// Walk one contour, marking traversed edges, jumping between the
/// cross polygons at cross vertices. The contour closes when the walk
/// reaches an already-marked edge.
fn collect_contour(
  cps: &mut CrossPolygons,
  start_side: Side,
  start: usize,
  start_dir: Direction,
  rule: EdgeRule,
) -> Result<Polygon, Error> {
  let mut vertices = Vec::new();
  let mut side = start_side;
  let mut on_start_side = true;
  let mut ve = start;
  let mut dir = start_dir;

  let mut edge = match dir {
    Direction::Forward => ve,
    Direction::Backward => prev_cyclic(ve, cps.side(side).len()),
  };

  loop {
    trace!("+ {:?}", cps.side(side)[ve].vertex);
    vertices.push(cps.side(side)[ve].vertex);
    cps.side_mut(side)[edge].mark = true;

    let n = cps.side(side).len();
    ve = match dir {
      Direction::Forward => next_cyclic(ve, n),
      Direction::Backward => prev_cyclic(ve, n),
    };

    if cps.side(side)[ve].is_cross() {
      match jump(cps, side, on_start_side, ve, dir, rule) {
        None => break,
        Some((s, a, v, d)) => {
          side = s;
          on_start_side = a;
          ve = v;
          dir = d;
          debug_assert_eq!(on_start_side, side == start_side);
        }
      }
    }

    let n = cps.side(side).len();
    edge = match dir {
      Direction::Forward => ve,
      Direction::Backward => prev_cyclic(ve, n),
    };
    if cps.side(side)[edge].mark {
      break;
    }
  }

  Polygon::new(vertices)
}

/// Collect every contour whose start the rule accepts, beginning each
/// walk on the given cross polygon.
fn collect_contours(
  cps: &mut CrossPolygons,
  start_side: Side,
  rule: EdgeRule,
  contours: &mut Vec<Polygon>,
) -> Result<(), Error> {
  for i in 0..cps.side(start_side).len() {
    let ve = &cps.side(start_side)[i];
    if ve.mark {
      continue;
    }
    let Some(dir) = rule(ve, true) else {
      continue;
    };
    let start = match dir {
      Direction::Forward => i,
      Direction::Backward => next_cyclic(i, cps.side(start_side).len()),
    };
    let contour = collect_contour(cps, start_side, start, dir, rule)?;
    contours.push(contour);
  }
  Ok(())
}

///////////////////////////////////////////////////////////////////////////////
// Preparation

/// How two polygons without edge crossings relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
  Disjoint,
  FirstInsideSecond,
  SecondInsideFirst,
}

enum Prepared {
  Crossed(CrossPolygons),
  Apart(Relation),
}

/// Preparations common to all operations: validate the operands,
/// normalize to counterclockwise, build the cross polygons and label
/// their edges. Operands without edge crossings skip the labeling
/// machinery and are classified by containment instead.
fn prepare(p1: &Polygon, p2: &Polygon) -> Result<(Polygon, Polygon, Prepared), Error> {
  if !(p1.is_simple() && p2.is_simple()) {
    return Err(Error::SelfIntersecting);
  }

  let a = p1.to_ccw();
  let b = p2.to_ccw();

  let mut cps = find_intersections(&a, &b)?;

  if !cps.has_cross_vertices() {
    let relation = if intersection::point_in_polygon(&a.vertices()[0], &b) {
      Relation::FirstInsideSecond
    } else if intersection::point_in_polygon(&b.vertices()[0], &a) {
      Relation::SecondInsideFirst
    } else {
      Relation::Disjoint
    };
    return Ok((a, b, Prepared::Apart(relation)));
  }

  fill_connectivity(&mut cps);
  label_edges(&mut cps, Side::A);
  label_edges(&mut cps, Side::B);

  Ok((a, b, Prepared::Crossed(cps)))
}

///////////////////////////////////////////////////////////////////////////////
// Operations

fn unite(p1: &Polygon, p2: &Polygon) -> Result<Vec<Polygon>, Error> {
  let (a, b, prepared) = prepare(p1, p2)?;

  let contours = match prepared {
    Prepared::Apart(Relation::Disjoint) => vec![a, b],
    Prepared::Apart(Relation::FirstInsideSecond) => vec![b],
    Prepared::Apart(Relation::SecondInsideFirst) => vec![a],
    Prepared::Crossed(mut cps) => {
      let mut contours = Vec::new();
      collect_contours(&mut cps, Side::A, rule_unite, &mut contours)?;
      collect_contours(&mut cps, Side::B, rule_unite, &mut contours)?;
      contours
    }
  };

  if contours.len() > 1 {
    return Err(Error::ResultHasHoles);
  }
  Ok(contours)
}

fn intersect(p1: &Polygon, p2: &Polygon) -> Result<Vec<Polygon>, Error> {
  let (a, b, prepared) = prepare(p1, p2)?;

  match prepared {
    Prepared::Apart(Relation::Disjoint) => Ok(vec![]),
    Prepared::Apart(Relation::FirstInsideSecond) => Ok(vec![a]),
    Prepared::Apart(Relation::SecondInsideFirst) => Ok(vec![b]),
    Prepared::Crossed(mut cps) => {
      let mut contours = Vec::new();
      collect_contours(&mut cps, Side::A, rule_intersect, &mut contours)?;
      collect_contours(&mut cps, Side::B, rule_intersect, &mut contours)?;
      Ok(contours)
    }
  }
}

fn subtract(p1: &Polygon, p2: &Polygon) -> Result<Vec<Polygon>, Error> {
  let (a, _b, prepared) = prepare(p1, p2)?;

  match prepared {
    Prepared::Apart(Relation::Disjoint) => Ok(vec![a]),
    Prepared::Apart(Relation::FirstInsideSecond) => Ok(vec![]),
    // carving the second operand out of the first would leave a hole
    Prepared::Apart(Relation::SecondInsideFirst) => Err(Error::ResultHasHoles),
    Prepared::Crossed(mut cps) => {
      let mut contours = Vec::new();
      collect_contours(&mut cps, Side::A, rule_subtract, &mut contours)?;
      Ok(contours)
    }
  }
}

fn xor(p1: &Polygon, p2: &Polygon) -> Result<Vec<Polygon>, Error> {
  let (a, b, prepared) = prepare(p1, p2)?;

  match prepared {
    Prepared::Apart(Relation::Disjoint) => Ok(vec![a, b]),
    Prepared::Apart(_) => Err(Error::ResultHasHoles),
    Prepared::Crossed(mut cps) => {
      // both one-way subtractions; their edge sets are disjoint, so
      // the marks need no clearing in between
      let mut contours = Vec::new();
      collect_contours(&mut cps, Side::A, rule_subtract, &mut contours)?;
      collect_contours(&mut cps, Side::B, rule_subtract, &mut contours)?;
      Ok(contours)
    }
  }
}

fn partition(p1: &Polygon, p2: &Polygon) -> Result<Vec<Polygon>, Error> {
  let (a, _b, prepared) = prepare(p1, p2)?;

  match prepared {
    Prepared::Apart(Relation::Disjoint) => Ok(vec![a]),
    Prepared::Apart(Relation::FirstInsideSecond) => Ok(vec![a]),
    Prepared::Apart(Relation::SecondInsideFirst) => Err(Error::ResultHasHoles),
    Prepared::Crossed(mut cps) => {
      // partition is (p1 & p2) plus (p1 - p2), both collected from p1
      let mut contours = Vec::new();
      collect_contours(&mut cps, Side::A, rule_intersect, &mut contours)?;
      cps.clear_marks();
      collect_contours(&mut cps, Side::A, rule_subtract, &mut contours)?;
      Ok(contours)
    }
  }
}

///////////////////////////////////////////////////////////////////////////////
// Tests

#[cfg(test)]
mod tests {
  use super::*;
  use claims::assert_ok;

  fn poly(pts: &[(f64, f64)]) -> Polygon {
    Polygon::new(pts.iter().map(|&(x, y)| Point::new(x, y)).collect()).unwrap()
  }

  /// Two unit-overlap squares used throughout.
  fn squares() -> (Polygon, Polygon) {
    (
      poly(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]),
      poly(&[(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)]),
    )
  }

  fn disjoint_squares() -> (Polygon, Polygon) {
    (
      poly(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
      poly(&[(2.0, 2.0), (3.0, 2.0), (3.0, 3.0), (2.0, 3.0)]),
    )
  }

  /// Contour equality modulo vertex rotation and direction.
  fn same_contour(a: &Polygon, b: &Polygon) -> bool {
    let av = a.vertices();
    let bv = b.vertices();
    let n = av.len();
    if n != bv.len() {
      return false;
    }
    let rotated = |s: usize| (0..n).all(|i| av[i] == bv[(s + i) % n]);
    let reflected = |s: usize| (0..n).all(|i| av[i] == bv[(s + n - i) % n]);
    (0..n).any(rotated) || (0..n).any(reflected)
  }

  fn same_contour_set(xs: &[Polygon], ys: &[Polygon]) -> bool {
    xs.len() == ys.len() && xs.iter().all(|x| ys.iter().any(|y| same_contour(x, y)))
  }

  fn total_area(polygons: &[Polygon]) -> f64 {
    polygons.iter().map(Polygon::area).sum()
  }

  #[test]
  fn union_of_overlapping_squares() {
    let (p, q) = squares();
    let r = assert_ok!(BooleanOp::Union.apply(&p, &q));
    assert_eq!(r.len(), 1);
    assert_eq!(r[0].vertex_count(), 8);
    assert_eq!(r[0].area(), 7.0);
  }

  #[test]
  fn intersection_of_overlapping_squares() {
    let (p, q) = squares();
    let r = assert_ok!(BooleanOp::Intersect.apply(&p, &q));
    assert_eq!(r.len(), 1);
    let unit = poly(&[(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)]);
    assert!(same_contour(&r[0], &unit));
    assert_eq!(r[0].area(), 1.0);
  }

  #[test]
  fn subtraction_of_overlapping_squares() {
    let (p, q) = squares();
    let r = assert_ok!(BooleanOp::Subtract.apply(&p, &q));
    assert_eq!(r.len(), 1);
    assert_eq!(r[0].vertex_count(), 6);
    assert_eq!(r[0].area(), 3.0);
  }

  #[test]
  fn xor_of_overlapping_squares() {
    let (p, q) = squares();
    let r = assert_ok!(BooleanOp::Xor.apply(&p, &q));
    assert_eq!(r.len(), 2);
    assert_eq!(total_area(&r), 6.0);
  }

  #[test]
  fn partition_of_overlapping_squares() {
    let (p, q) = squares();
    let r = assert_ok!(BooleanOp::Partition.apply(&p, &q));
    assert_eq!(r.len(), 2);
    assert_eq!(total_area(&r), 4.0);
    let unit = poly(&[(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)]);
    assert!(r.iter().any(|c| same_contour(c, &unit)));
  }

  #[test]
  fn disjoint_union_is_out_of_range() {
    let (p, q) = disjoint_squares();
    assert_eq!(BooleanOp::Union.apply(&p, &q), Err(Error::ResultHasHoles));
  }

  #[test]
  fn disjoint_intersection_is_empty() {
    let (p, q) = disjoint_squares();
    assert_eq!(assert_ok!(BooleanOp::Intersect.apply(&p, &q)), vec![]);
  }

  #[test]
  fn disjoint_subtraction_returns_minuend() {
    let (p, q) = disjoint_squares();
    let r = assert_ok!(BooleanOp::Subtract.apply(&p, &q));
    assert!(same_contour_set(&r, std::slice::from_ref(&p)));
  }

  #[test]
  fn disjoint_xor_returns_both() {
    let (p, q) = disjoint_squares();
    let r = assert_ok!(BooleanOp::Xor.apply(&p, &q));
    assert!(same_contour_set(&r, &[p, q]));
  }

  #[test]
  fn contained_operands() {
    let outer = poly(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    let inner = poly(&[(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]);

    let union = assert_ok!(BooleanOp::Union.apply(&outer, &inner));
    assert!(same_contour_set(&union, std::slice::from_ref(&outer)));

    let common = assert_ok!(BooleanOp::Intersect.apply(&outer, &inner));
    assert!(same_contour_set(&common, std::slice::from_ref(&inner)));

    assert_eq!(assert_ok!(BooleanOp::Subtract.apply(&inner, &outer)), vec![]);
    assert_eq!(
      BooleanOp::Subtract.apply(&outer, &inner),
      Err(Error::ResultHasHoles)
    );
    assert_eq!(BooleanOp::Xor.apply(&outer, &inner), Err(Error::ResultHasHoles));
  }

  #[test]
  fn operands_are_symmetric() {
    let (p, q) = squares();
    let pq = assert_ok!(BooleanOp::Intersect.apply(&p, &q));
    let qp = assert_ok!(BooleanOp::Intersect.apply(&q, &p));
    assert!(same_contour_set(&pq, &qp));

    let pq = assert_ok!(BooleanOp::Union.apply(&p, &q));
    let qp = assert_ok!(BooleanOp::Union.apply(&q, &p));
    assert!(same_contour_set(&pq, &qp));

    let pq = assert_ok!(BooleanOp::Xor.apply(&p, &q));
    let qp = assert_ok!(BooleanOp::Xor.apply(&q, &p));
    assert!(same_contour_set(&pq, &qp));
  }

  #[test]
  fn clockwise_operands_are_normalized() {
    let (p, q) = squares();
    let p_cw = Polygon::new(p.vertices().iter().rev().copied().collect()).unwrap();
    let q_cw = Polygon::new(q.vertices().iter().rev().copied().collect()).unwrap();
    let r = assert_ok!(BooleanOp::Intersect.apply(&p_cw, &q_cw));
    assert_eq!(r.len(), 1);
    assert_eq!(r[0].area(), 1.0);
  }

  #[test]
  fn self_intersecting_operand_is_rejected() {
    let bowtie = poly(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]);
    let (_, q) = squares();
    assert_eq!(
      BooleanOp::Union.apply(&bowtie, &q),
      Err(Error::SelfIntersecting)
    );
    assert_eq!(
      BooleanOp::Union.apply(&q, &bowtie),
      Err(Error::SelfIntersecting)
    );
  }

  #[test]
  fn touching_by_edge_is_rejected() {
    let p = poly(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
    let q = poly(&[(2.0, 0.5), (4.0, 0.5), (4.0, 1.5), (2.0, 1.5)]);
    assert_eq!(BooleanOp::Union.apply(&p, &q), Err(Error::TouchingEdges));
  }

  #[test]
  fn shared_vertex_is_rejected() {
    let p = poly(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
    let q = poly(&[(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0)]);
    let r = BooleanOp::Union.apply(&p, &q);
    assert!(r == Err(Error::DegenerateIntersection) || r == Err(Error::TouchingEdges));
  }

  #[test]
  fn union_area_adds_up() {
    let (p, q) = squares();
    let r = assert_ok!(BooleanOp::Union.apply(&p, &q));
    let i = assert_ok!(BooleanOp::Intersect.apply(&p, &q));
    assert_eq!(total_area(&r) + total_area(&i), p.area() + q.area());
  }

  #[test]
  fn triangle_overlap() {
    // two triangles crossing in a quadrilateral
    let t1 = poly(&[(0.0, 0.0), (4.0, 0.0), (2.0, 3.0)]);
    let t2 = poly(&[(0.0, 2.0), (2.0, -1.0), (4.0, 2.0)]);
    let common = assert_ok!(BooleanOp::Intersect.apply(&t1, &t2));
    assert!(!common.is_empty());
    let union = assert_ok!(BooleanOp::Union.apply(&t1, &t2));
    assert_eq!(union.len(), 1);
    assert!(
      (total_area(&union) + total_area(&common) - t1.area() - t2.area()).abs() < 1e-9
    );
  }
}
