//! Reversible records of atomic mutations to the polygon list.
//!
//! An action is created with whatever identifies its target (indices,
//! coordinates, a polygon to add); applying it may capture additional
//! data needed to restore the original state (a deleted polygon, a
//! removed vertex). Every apply/undo provides the strong exception
//! guarantee: on failure neither the polygon list nor the action's
//! captured data have changed. This falls out of doing all fallible
//! work (index validation, the Boolean computation) before the first
//! mutation; container moves cannot fail.
//!
//! Actions address polygons and vertices by index, never by
//! reference, because references do not survive mutations.
//!
//! The `done` flag records whether the state currently contains the
//! action's effect; `committed` records that the application layer
//! accepted it. A committed, not-done action sits in the undone
//! stack; a done-and-committed one in the log; a done, uncommitted
//! one is the pending step of a composite gesture.

use crate::algorithms::BooleanOp;
use crate::data::{Point, Polygon, Vector};
use crate::event::{Event, EventList, PresentationModel};
use crate::Error;

fn polygon_at(polygons: &[Polygon], idx: usize) -> Result<&Polygon, Error> {
  polygons.get(idx).ok_or(Error::IndexOutOfRange)
}

fn polygon_at_mut(polygons: &mut [Polygon], idx: usize) -> Result<&mut Polygon, Error> {
  polygons.get_mut(idx).ok_or(Error::IndexOutOfRange)
}

/// Payload of one atomic action.
#[derive(Debug)]
pub(crate) enum Kind {
  /// The polygon is moved into the list on apply and captured back on
  /// undo, so it is `None` exactly while the action is done.
  AddPolygon { polygon: Option<Polygon> },
  DeletePolygon { polygon: usize, taken: Option<Polygon> },
  MovePolygon { polygon: usize, vector: Vector },
  AddVertex { polygon: usize, vertex: usize, position: Point },
  DeleteVertex { polygon: usize, vertex: usize, taken: Option<Point> },
  MoveVertex { polygon: usize, vertex: usize, vector: Vector },
  /// A Boolean operation consumes its first operand, optionally the
  /// second, and appends the result polygons.
  Boolean {
    op: BooleanOp,
    first: usize,
    second: usize,
    preserve_second: bool,
    taken_first: Option<Polygon>,
    taken_second: Option<Polygon>,
    result_len: usize,
  },
}

impl Kind {
  /// The rewritable displacement of a drag action.
  pub(crate) fn vector_mut(&mut self) -> Option<&mut Vector> {
    match self {
      Kind::MovePolygon { vector, .. } | Kind::MoveVertex { vector, .. } => Some(vector),
      _ => None,
    }
  }

  fn apply(&mut self, polygons: &mut Vec<Polygon>) -> Result<EventList, Error> {
    match self {
      Kind::AddPolygon { polygon } => {
        let p = polygon.take().expect("add-polygon applied twice");
        let events = vec![Event::PolygonAdded { polygon: polygons.len() }];
        polygons.push(p);
        Ok(EventList::from(events))
      }

      Kind::DeletePolygon { polygon, taken } => {
        let idx = *polygon;
        if idx >= polygons.len() {
          return Err(Error::IndexOutOfRange);
        }
        *taken = Some(polygons.remove(idx));
        Ok(EventList::from(vec![Event::PolygonDeleted { polygon: idx }]))
      }

      Kind::MovePolygon { polygon, vector } => {
        polygon_at_mut(polygons, *polygon)?.translate(vector);
        Ok(EventList::default())
      }

      Kind::AddVertex { polygon, vertex, position } => {
        polygon_at_mut(polygons, *polygon)?.insert_vertex(*vertex, *position)?;
        Ok(EventList::from(vec![Event::VertexAdded {
          polygon: *polygon,
          vertex: *vertex,
        }]))
      }

      Kind::DeleteVertex { polygon, vertex, taken } => {
        let p = polygon_at_mut(polygons, *polygon)?;
        *taken = Some(p.remove_vertex(*vertex)?);
        Ok(EventList::from(vec![Event::VertexDeleted {
          polygon: *polygon,
          vertex: *vertex,
        }]))
      }

      Kind::MoveVertex { polygon, vertex, vector } => {
        *polygon_at_mut(polygons, *polygon)?.vertex_mut(*vertex)? += *vector;
        Ok(EventList::default())
      }

      Kind::Boolean {
        op,
        first,
        second,
        preserve_second,
        taken_first,
        taken_second,
        result_len,
      } => {
        let (i1, i2) = (*first, *second);
        debug_assert_ne!(i1, i2);
        let result = op.apply(polygon_at(polygons, i1)?, polygon_at(polygons, i2)?)?;

        let deleted = if *preserve_second { 1 } else { 2 };
        let n = polygons.len();
        let mut events = Vec::with_capacity(deleted + result.len());
        events.push(Event::PolygonDeleted { polygon: i1 });
        if !*preserve_second {
          events.push(Event::PolygonDeleted { polygon: i2 });
        }
        for k in 0..result.len() {
          events.push(Event::PolygonAdded { polygon: n - deleted + k });
        }

        *result_len = result.len();
        polygons.extend(result);

        if *preserve_second {
          *taken_first = Some(polygons.remove(i1));
        } else if i1 > i2 {
          // remove the higher index first so the lower stays valid
          *taken_first = Some(polygons.remove(i1));
          *taken_second = Some(polygons.remove(i2));
        } else {
          *taken_second = Some(polygons.remove(i2));
          *taken_first = Some(polygons.remove(i1));
        }

        Ok(EventList::from(events))
      }
    }
  }

  fn undo(&mut self, polygons: &mut Vec<Polygon>) -> Result<EventList, Error> {
    match self {
      Kind::AddPolygon { polygon } => {
        debug_assert!(!polygons.is_empty());
        let idx = polygons.len() - 1;
        *polygon = polygons.pop();
        Ok(EventList::from(vec![Event::PolygonDeleted { polygon: idx }]))
      }

      Kind::DeletePolygon { polygon, taken } => {
        let idx = *polygon;
        if idx > polygons.len() {
          return Err(Error::IndexOutOfRange);
        }
        polygons.insert(idx, taken.take().expect("delete-polygon not applied"));
        Ok(EventList::from(vec![Event::PolygonAdded { polygon: idx }]))
      }

      Kind::MovePolygon { polygon, vector } => {
        polygon_at_mut(polygons, *polygon)?.translate(&-*vector);
        Ok(EventList::default())
      }

      Kind::AddVertex { polygon, vertex, .. } => {
        polygon_at_mut(polygons, *polygon)?.remove_vertex(*vertex)?;
        Ok(EventList::from(vec![Event::VertexDeleted {
          polygon: *polygon,
          vertex: *vertex,
        }]))
      }

      Kind::DeleteVertex { polygon, vertex, taken } => {
        let p = polygon_at_mut(polygons, *polygon)?;
        let point = taken.expect("delete-vertex not applied");
        p.insert_vertex(*vertex, point)?;
        *taken = None;
        Ok(EventList::from(vec![Event::VertexAdded {
          polygon: *polygon,
          vertex: *vertex,
        }]))
      }

      Kind::MoveVertex { polygon, vertex, vector } => {
        *polygon_at_mut(polygons, *polygon)?.vertex_mut(*vertex)? -= *vector;
        Ok(EventList::default())
      }

      Kind::Boolean {
        first,
        second,
        preserve_second,
        taken_first,
        taken_second,
        result_len,
        ..
      } => {
        let (i1, i2) = (*first, *second);
        let r = *result_len;
        let n = polygons.len();
        debug_assert!(r <= n);

        let deleted = if *preserve_second { 1 } else { 2 };
        let mut events = Vec::with_capacity(r + deleted);
        for k in n - r..n {
          events.push(Event::PolygonDeleted { polygon: k });
        }
        events.push(Event::PolygonAdded { polygon: i1 });
        if !*preserve_second {
          events.push(Event::PolygonAdded { polygon: i2 });
        }

        // reinsert the originals, smaller index first so the second
        // insertion's index stays valid, then drop the results from
        // the tail
        let p1 = taken_first.take().expect("boolean not applied");
        if *preserve_second {
          polygons.insert(i1, p1);
        } else {
          let p2 = taken_second.take().expect("boolean not applied");
          if i1 < i2 {
            polygons.insert(i1, p1);
            polygons.insert(i2, p2);
          } else {
            polygons.insert(i2, p2);
            polygons.insert(i1, p1);
          }
        }
        polygons.truncate(polygons.len() - r);

        Ok(EventList::from(events))
      }
    }
  }
}

/// One reversible mutation of the polygon list.
#[derive(Debug)]
pub(crate) struct Action {
  pub(crate) kind: Kind,
  done: bool,
  committed: bool,
}

impl Action {
  pub(crate) fn new(kind: Kind) -> Action {
    Action { kind, done: false, committed: false }
  }

  pub(crate) fn done(&self) -> bool {
    self.done
  }

  pub(crate) fn committed(&self) -> bool {
    self.committed
  }

  pub(crate) fn commit(&mut self) {
    debug_assert!(self.done && !self.committed);
    self.committed = true;
  }

  pub(crate) fn uncommit(&mut self) {
    debug_assert!(self.done && self.committed);
    self.committed = false;
  }

  /// Apply the action to the state and report the changes.
  ///
  /// Strong exception guarantee: on error the state and the action
  /// are untouched. Notification happens after the state is
  /// consistent; the model must not fail.
  pub(crate) fn apply(
    &mut self,
    polygons: &mut Vec<Polygon>,
    model: &mut dyn PresentationModel,
  ) -> Result<(), Error> {
    debug_assert!(!self.done && !self.committed);
    let events = self.kind.apply(polygons)?;
    self.done = true;
    model.notify(&events);
    Ok(())
  }

  /// Remove the action's effect from the state. Same guarantees as
  /// [`Action::apply`].
  pub(crate) fn undo(
    &mut self,
    polygons: &mut Vec<Polygon>,
    model: &mut dyn PresentationModel,
  ) -> Result<(), Error> {
    debug_assert!(self.done && !self.committed);
    let events = self.kind.undo(polygons)?;
    self.done = false;
    model.notify(&events);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use claims::{assert_err, assert_ok};

  fn square(origin: (f64, f64), size: f64) -> Polygon {
    let (x, y) = origin;
    Polygon::new(vec![
      Point::new(x, y),
      Point::new(x + size, y),
      Point::new(x + size, y + size),
      Point::new(x, y + size),
    ])
    .unwrap()
  }

  struct Recorder(Vec<EventList>);

  impl PresentationModel for Recorder {
    fn notify(&mut self, events: &EventList) {
      self.0.push(events.clone());
    }
  }

  #[test]
  fn add_polygon_roundtrip() {
    let mut polygons = Vec::new();
    let mut rec = Recorder(Vec::new());
    let mut action = Action::new(Kind::AddPolygon { polygon: Some(square((0.0, 0.0), 1.0)) });

    assert_ok!(action.apply(&mut polygons, &mut rec));
    assert!(action.done());
    assert_eq!(polygons.len(), 1);
    assert_eq!(
      rec.0.last().unwrap(),
      &EventList::from(vec![Event::PolygonAdded { polygon: 0 }])
    );

    assert_ok!(action.undo(&mut polygons, &mut rec));
    assert!(!action.done());
    assert!(polygons.is_empty());
    assert_eq!(
      rec.0.last().unwrap(),
      &EventList::from(vec![Event::PolygonDeleted { polygon: 0 }])
    );
  }

  #[test]
  fn delete_polygon_restores_position() {
    let mut polygons = vec![square((0.0, 0.0), 1.0), square((5.0, 0.0), 1.0), square((9.0, 0.0), 1.0)];
    let mut action = Action::new(Kind::DeletePolygon { polygon: 1, taken: None });

    assert_ok!(action.apply(&mut polygons, &mut ()));
    assert_eq!(polygons.len(), 2);
    assert_eq!(polygons[1].vertices()[0], Point::new(9.0, 0.0));

    assert_ok!(action.undo(&mut polygons, &mut ()));
    assert_eq!(polygons.len(), 3);
    assert_eq!(polygons[1].vertices()[0], Point::new(5.0, 0.0));
  }

  #[test]
  fn delete_polygon_out_of_range_changes_nothing() {
    let mut polygons = vec![square((0.0, 0.0), 1.0)];
    let mut action = Action::new(Kind::DeletePolygon { polygon: 5, taken: None });
    assert_err!(action.apply(&mut polygons, &mut ()));
    assert!(!action.done());
    assert_eq!(polygons.len(), 1);
  }

  #[test]
  fn move_polygon_roundtrip() {
    let mut polygons = vec![square((0.0, 0.0), 1.0)];
    let mut action =
      Action::new(Kind::MovePolygon { polygon: 0, vector: Vector::new(2.0, 3.0) });

    assert_ok!(action.apply(&mut polygons, &mut ()));
    assert_eq!(polygons[0].vertices()[0], Point::new(2.0, 3.0));
    assert_ok!(action.undo(&mut polygons, &mut ()));
    assert_eq!(polygons[0].vertices()[0], Point::new(0.0, 0.0));
  }

  #[test]
  fn vertex_actions_roundtrip() {
    let mut polygons = vec![square((0.0, 0.0), 2.0)];

    let mut add = Action::new(Kind::AddVertex {
      polygon: 0,
      vertex: 1,
      position: Point::new(1.0, -0.5),
    });
    assert_ok!(add.apply(&mut polygons, &mut ()));
    assert_eq!(polygons[0].vertex_count(), 5);
    assert_eq!(polygons[0].vertices()[1], Point::new(1.0, -0.5));

    let mut mv = Action::new(Kind::MoveVertex {
      polygon: 0,
      vertex: 1,
      vector: Vector::new(0.0, -0.5),
    });
    assert_ok!(mv.apply(&mut polygons, &mut ()));
    assert_eq!(polygons[0].vertices()[1], Point::new(1.0, -1.0));
    assert_ok!(mv.undo(&mut polygons, &mut ()));

    let mut del = Action::new(Kind::DeleteVertex { polygon: 0, vertex: 1, taken: None });
    assert_ok!(del.apply(&mut polygons, &mut ()));
    assert_eq!(polygons[0].vertex_count(), 4);
    assert_ok!(del.undo(&mut polygons, &mut ()));
    assert_eq!(polygons[0].vertices()[1], Point::new(1.0, -0.5));

    assert_ok!(add.undo(&mut polygons, &mut ()));
    assert_eq!(polygons[0].vertex_count(), 4);
  }

  #[test]
  fn boolean_merge_roundtrip() {
    let before = vec![square((0.0, 0.0), 2.0), square((1.0, 1.0), 2.0), square((9.0, 9.0), 1.0)];
    let mut polygons = before.clone();
    let mut rec = Recorder(Vec::new());
    let mut action = Action::new(Kind::Boolean {
      op: BooleanOp::Union,
      first: 0,
      second: 1,
      preserve_second: false,
      taken_first: None,
      taken_second: None,
      result_len: 0,
    });

    assert_ok!(action.apply(&mut polygons, &mut rec));
    assert_eq!(polygons.len(), 2);
    assert_eq!(polygons[0].vertices()[0], Point::new(9.0, 9.0));
    assert_eq!(polygons[1].area(), 7.0);
    assert_eq!(
      rec.0.last().unwrap(),
      &EventList::from(vec![
        Event::PolygonDeleted { polygon: 0 },
        Event::PolygonDeleted { polygon: 1 },
        Event::PolygonAdded { polygon: 1 },
      ])
    );

    assert_ok!(action.undo(&mut polygons, &mut rec));
    assert_eq!(polygons, before);
    assert_eq!(
      rec.0.last().unwrap(),
      &EventList::from(vec![
        Event::PolygonDeleted { polygon: 1 },
        Event::PolygonAdded { polygon: 0 },
        Event::PolygonAdded { polygon: 1 },
      ])
    );
  }

  #[test]
  fn boolean_partition_preserves_second() {
    let before = vec![square((0.0, 0.0), 2.0), square((1.0, 1.0), 2.0)];
    let mut polygons = before.clone();
    let mut action = Action::new(Kind::Boolean {
      op: BooleanOp::Partition,
      first: 0,
      second: 1,
      preserve_second: true,
      taken_first: None,
      taken_second: None,
      result_len: 0,
    });

    assert_ok!(action.apply(&mut polygons, &mut ()));
    // the second operand survives, plus two partition pieces
    assert_eq!(polygons.len(), 3);
    assert_eq!(polygons[0].vertices()[0], Point::new(1.0, 1.0));

    assert_ok!(action.undo(&mut polygons, &mut ()));
    assert_eq!(polygons, before);
  }

  #[test]
  fn failed_boolean_leaves_state_untouched() {
    let before = vec![square((0.0, 0.0), 1.0), square((5.0, 5.0), 1.0)];
    let mut polygons = before.clone();
    let mut action = Action::new(Kind::Boolean {
      op: BooleanOp::Union,
      first: 0,
      second: 1,
      preserve_second: false,
      taken_first: None,
      taken_second: None,
      result_len: 0,
    });

    // disjoint union fails as out of range
    assert_eq!(action.apply(&mut polygons, &mut ()), Err(Error::ResultHasHoles));
    assert!(!action.done());
    assert_eq!(polygons, before);
  }
}
