//! The polygons document: application-layer logic plus the
//! presentation model.
//!
//! The document owns the domain state (the polygon list), the action
//! log and the undone stack, and the presentation state: the current
//! (selected) polygon and vertex. Most of its API is presentation
//! model API, because most calls work on the current object; the
//! controller's path is controller -> presentation model ->
//! application model.
//!
//! Every mutation goes through an [`Action`](crate::action), so the
//! whole history is replayable: the log holds done-and-committed
//! actions oldest first, the undone stack holds committed actions
//! whose effect has been taken back out of the state. While a
//! composite gesture is in progress the log's last entry may be done
//! but not yet committed; the gesture lock keeps every other entry
//! point out for the duration.

use log::debug;

use crate::action::{Action, Kind};
use crate::algorithms::BooleanOp;
use crate::data::{Point, Polygon};
use crate::event::{Event, EventList, PresentationModel};
use crate::gesture::{CreatePolygon, Drag, DragTarget};
use crate::intersection::polygons_intersect;
use crate::Error;

/// Interface of a pane displaying a status message. Consumed by the
/// controller; defined here so shells and controllers agree on it.
pub trait StatusPane {
  fn set_status(&mut self, message: &str);
  fn reset_status(&mut self);
}

/// Presentation state: the selection, and the external observer the
/// document forwards change notifications to.
pub(crate) struct Presentation {
  pub(crate) current_polygon: Option<usize>,
  pub(crate) current_vertex: Option<usize>,
  observer: Box<dyn PresentationModel>,
}

impl Presentation {
  /// Forward a pure view change (selection only, no domain events).
  fn view_changed(&mut self) {
    self.observer.notify(&EventList::default());
  }
}

impl PresentationModel for Presentation {
  /// Update the selection from the reported changes, then forward
  /// them to the external observer.
  fn notify(&mut self, events: &EventList) {
    // drop a selection pointing at a deleted object; deletion events
    // carry pre-mutation indices, as does the selection at this point
    if let Some(p) = self.current_polygon {
      if events.polygon_deleted(p) {
        self.current_polygon = None;
        self.current_vertex = None;
      } else if let Some(v) = self.current_vertex {
        if events.vertex_deleted(p, v) {
          self.current_vertex = None;
        }
      }
    }

    // a selection that survived keeps tracking the same objects
    // across the index shifts the mutation caused
    if let (Some(p), Some(v)) = (self.current_polygon, self.current_vertex) {
      for e in events.iter() {
        if let Event::VertexDeleted { polygon, vertex } = e {
          if *polygon == p && *vertex < v {
            self.current_vertex = Some(v - 1);
          }
        }
      }
    }
    if let Some(p) = self.current_polygon {
      let deleted_below = events
        .iter()
        .filter(|e| matches!(e, Event::PolygonDeleted { polygon } if *polygon < p))
        .count();
      let mut shifted = p - deleted_below;
      let mut added: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
          Event::PolygonAdded { polygon } => Some(*polygon),
          _ => None,
        })
        .collect();
      added.sort_unstable();
      for a in added {
        if a <= shifted {
          shifted += 1;
        }
      }
      self.current_polygon = Some(shifted);
    }

    // select what was just added
    if events.num_added_polygons() == 1 {
      self.current_polygon = events.first_added_polygon();
      self.current_vertex = None;
    } else if let Some((p, v)) = events.single_vertex_added() {
      self.current_polygon = Some(p);
      self.current_vertex = Some(v);
    }

    self.observer.notify(events);
  }
}

/// The polygons document.
pub struct Document {
  pub(crate) polygons: Vec<Polygon>,
  pub(crate) log: Vec<Action>,
  pub(crate) undone: Vec<Action>,
  /// Set while a composite gesture is in progress; checked by every
  /// other action-producing entry point.
  pub(crate) gesture_lock: bool,
  pub(crate) presentation: Presentation,
}

impl Document {
  /// An empty document reporting changes to `observer`.
  pub fn new(observer: Box<dyn PresentationModel>) -> Document {
    Document {
      polygons: Vec::new(),
      log: Vec::new(),
      undone: Vec::new(),
      gesture_lock: false,
      presentation: Presentation {
        current_polygon: None,
        current_vertex: None,
        observer,
      },
    }
  }

  //////////////////////////////////////////////////////////////////////////////
  // Queries

  pub fn polygons(&self) -> &[Polygon] {
    &self.polygons
  }

  pub fn current_polygon_index(&self) -> Option<usize> {
    self.presentation.current_polygon
  }

  /// Index of the current vertex within the current polygon.
  pub fn current_vertex_index(&self) -> Option<usize> {
    self.presentation.current_vertex
  }

  pub fn current_polygon(&self) -> Result<&Polygon, Error> {
    let idx = self.presentation.current_polygon.ok_or(Error::NoCurrentPolygon)?;
    Ok(&self.polygons[idx])
  }

  /// Is the active object a polygon, i.e. a polygon is selected but
  /// no vertex?
  pub fn active_object_is_polygon(&self) -> bool {
    self.presentation.current_polygon.is_some() && self.presentation.current_vertex.is_none()
  }

  /// Deleting the current vertex is possible only while the polygon
  /// keeps more than three vertices.
  pub fn can_delete_current_vertex(&self) -> bool {
    match (self.presentation.current_polygon, self.presentation.current_vertex) {
      (Some(p), Some(_)) => self.polygons[p].vertex_count() > 3,
      _ => false,
    }
  }

  pub fn can_undo(&self) -> bool {
    !self.gesture_lock && !self.log.is_empty()
  }

  pub fn can_redo(&self) -> bool {
    !self.gesture_lock && !self.undone.is_empty()
  }

  //////////////////////////////////////////////////////////////////////////////
  // Selection

  pub fn set_current_polygon(&mut self, idx: usize) -> Result<(), Error> {
    self.check_no_gesture()?;
    if idx >= self.polygons.len() {
      return Err(Error::IndexOutOfRange);
    }
    if self.presentation.current_polygon == Some(idx) {
      return Ok(());
    }
    self.presentation.current_polygon = Some(idx);
    self.presentation.current_vertex = None;
    self.presentation.view_changed();
    Ok(())
  }

  pub fn reset_current_polygon(&mut self) -> Result<(), Error> {
    self.check_no_gesture()?;
    if self.presentation.current_polygon.is_none() {
      return Ok(());
    }
    self.presentation.current_polygon = None;
    self.presentation.current_vertex = None;
    self.presentation.view_changed();
    Ok(())
  }

  pub fn set_current_vertex(&mut self, idx: usize) -> Result<(), Error> {
    self.check_no_gesture()?;
    let p = self.presentation.current_polygon.ok_or(Error::NoCurrentPolygon)?;
    if idx >= self.polygons[p].vertex_count() {
      return Err(Error::IndexOutOfRange);
    }
    if self.presentation.current_vertex == Some(idx) {
      return Ok(());
    }
    self.presentation.current_vertex = Some(idx);
    self.presentation.view_changed();
    Ok(())
  }

  pub fn reset_current_vertex(&mut self) -> Result<(), Error> {
    self.check_no_gesture()?;
    if self.presentation.current_vertex.is_none() {
      return Ok(());
    }
    self.presentation.current_vertex = None;
    self.presentation.view_changed();
    Ok(())
  }

  //////////////////////////////////////////////////////////////////////////////
  // One-shot actions

  /// Add a polygon to the document. It becomes current.
  pub fn add_polygon(&mut self, polygon: Polygon) -> Result<(), Error> {
    self.run_action(Action::new(Kind::AddPolygon { polygon: Some(polygon) }))
  }

  pub fn delete_current_polygon(&mut self) -> Result<(), Error> {
    self.start_action()?;
    let idx = self.presentation.current_polygon.ok_or(Error::NoCurrentPolygon)?;
    self.run_action(Action::new(Kind::DeletePolygon { polygon: idx, taken: None }))
  }

  pub fn delete_current_vertex(&mut self) -> Result<(), Error> {
    self.start_action()?;
    if !self.can_delete_current_vertex() {
      return Err(Error::CannotDeleteVertex);
    }
    let polygon = self.presentation.current_polygon.ok_or(Error::NoCurrentPolygon)?;
    let vertex = self.presentation.current_vertex.ok_or(Error::NoCurrentVertex)?;
    self.run_action(Action::new(Kind::DeleteVertex { polygon, vertex, taken: None }))
  }

  //////////////////////////////////////////////////////////////////////////////
  // Boolean operations
  //
  // Each one pairs the current polygon with the single other polygon
  // intersecting it; no intersection and several intersections are
  // both state errors.

  /// Merge (unite) the current polygon with the other intersecting
  /// polygon.
  pub fn merge_current_polygon_with_other(&mut self) -> Result<(), Error> {
    self.boolean_with_other(BooleanOp::Union, false)
  }

  /// Intersect the current polygon with the other intersecting
  /// polygon.
  pub fn intersect_current_polygon_with_other(&mut self) -> Result<(), Error> {
    self.boolean_with_other(BooleanOp::Intersect, false)
  }

  /// Subtract the current polygon from the other intersecting
  /// polygon.
  pub fn subtract_current_polygon_from_other(&mut self) -> Result<(), Error> {
    self.boolean_with_other(BooleanOp::Subtract, false)
  }

  /// Symmetric difference of the current polygon and the other
  /// intersecting polygon.
  pub fn xor_current_polygon_with_other(&mut self) -> Result<(), Error> {
    self.boolean_with_other(BooleanOp::Xor, false)
  }

  /// Partition the other intersecting polygon by the current polygon.
  /// The current polygon is preserved.
  pub fn partition_other_polygon_by_current(&mut self) -> Result<(), Error> {
    self.boolean_with_other(BooleanOp::Partition, true)
  }

  fn boolean_with_other(&mut self, op: BooleanOp, preserve_second: bool) -> Result<(), Error> {
    self.start_action()?;
    let second = self.presentation.current_polygon.ok_or(Error::NoCurrentPolygon)?;
    let first = self.intersecting_polygon_index()?;
    self.run_action(Action::new(Kind::Boolean {
      op,
      first,
      second,
      preserve_second,
      taken_first: None,
      taken_second: None,
      result_len: 0,
    }))
  }

  /// The single polygon whose contour intersects the current one.
  fn intersecting_polygon_index(&self) -> Result<usize, Error> {
    let cur = self.presentation.current_polygon.ok_or(Error::NoCurrentPolygon)?;
    let current = &self.polygons[cur];

    let mut found = None;
    for (i, polygon) in self.polygons.iter().enumerate() {
      if i == cur {
        continue;
      }
      if polygons_intersect(current, polygon) {
        if found.is_some() {
          return Err(Error::AmbiguousIntersection);
        }
        found = Some(i);
      }
    }
    found.ok_or(Error::NoIntersection)
  }

  //////////////////////////////////////////////////////////////////////////////
  // Undo / redo

  pub fn undo(&mut self) -> Result<(), Error> {
    self.check_no_gesture()?;
    if self.log.is_empty() {
      return Err(Error::NothingToUndo);
    }
    self.check_log_shape();

    debug!("undo");
    let mut action = self.log.pop().expect("log is not empty");
    action.uncommit();
    if let Err(e) = action.undo(&mut self.polygons, &mut self.presentation) {
      action.commit();
      self.log.push(action);
      return Err(e);
    }
    self.undone.push(action);
    Ok(())
  }

  pub fn redo(&mut self) -> Result<(), Error> {
    self.check_no_gesture()?;
    if self.undone.is_empty() {
      return Err(Error::NothingToRedo);
    }
    self.check_log_shape();

    debug!("redo");
    let mut action = self.undone.pop().expect("undone stack is not empty");
    if let Err(e) = action.apply(&mut self.polygons, &mut self.presentation) {
      self.undone.push(action);
      return Err(e);
    }
    action.commit();
    self.log.push(action);
    Ok(())
  }

  //////////////////////////////////////////////////////////////////////////////
  // Composite gestures

  /// Start assembling a new polygon vertex by vertex. Any selection
  /// is reset; the polygon under construction becomes current as
  /// soon as it has a vertex.
  pub fn start_create_polygon(&mut self) -> Result<CreatePolygon<'_>, Error> {
    self.start_action()?;
    if self.presentation.current_polygon.is_some() {
      self.presentation.current_polygon = None;
      self.presentation.current_vertex = None;
      self.presentation.view_changed();
    }
    Ok(CreatePolygon::start(self))
  }

  /// Start dragging the current polygon. The anchor is an arbitrary
  /// point whose position relative to the polygon stays invariant;
  /// [`Drag::step`] moves the anchor.
  pub fn start_polygon_drag(&mut self, anchor: Point) -> Result<Drag<'_>, Error> {
    self.start_action()?;
    let index = self.presentation.current_polygon.ok_or(Error::NoCurrentPolygon)?;
    Ok(Drag::start(self, anchor, DragTarget::Polygon { index }))
  }

  /// Start dragging the current vertex of the current polygon.
  pub fn start_vertex_drag(&mut self, anchor: Point) -> Result<Drag<'_>, Error> {
    self.start_action()?;
    let polygon = self.presentation.current_polygon.ok_or(Error::NoCurrentPolygon)?;
    let vertex = self.presentation.current_vertex.ok_or(Error::NoCurrentVertex)?;
    Ok(Drag::start(self, anchor, DragTarget::Vertex { polygon, vertex }))
  }

  /// Start inserting a vertex into the current polygon before the
  /// given vertex position; each [`Drag::step`] places it.
  pub fn start_add_vertex(&mut self, before_vertex: usize) -> Result<Drag<'_>, Error> {
    self.start_action()?;
    let polygon = self.presentation.current_polygon.ok_or(Error::NoCurrentPolygon)?;
    if before_vertex > self.polygons[polygon].vertex_count() {
      return Err(Error::IndexOutOfRange);
    }
    Ok(Drag::start(
      self,
      Point::default(),
      DragTarget::NewVertex { polygon, before: before_vertex },
    ))
  }

  //////////////////////////////////////////////////////////////////////////////
  // Persistence support

  /// Replace the document contents with loaded polygons. History and
  /// selection are cleared.
  pub fn load_polygons(&mut self, polygons: Vec<Polygon>) -> Result<(), Error> {
    self.check_no_gesture()?;
    self.polygons = polygons;
    self.log.clear();
    self.undone.clear();
    self.presentation.current_polygon = None;
    self.presentation.current_vertex = None;
    self.presentation.view_changed();
    Ok(())
  }

  //////////////////////////////////////////////////////////////////////////////
  // Internals

  pub(crate) fn check_no_gesture(&self) -> Result<(), Error> {
    if self.gesture_lock {
      return Err(Error::GestureInProgress);
    }
    Ok(())
  }

  /// The log must end with a committed action between gestures.
  fn check_log_shape(&self) {
    if let Some(last) = self.log.last() {
      debug_assert!(last.done() && last.committed());
    }
  }

  pub(crate) fn start_action(&self) -> Result<(), Error> {
    self.check_no_gesture()?;
    self.check_log_shape();
    Ok(())
  }

  /// Push, apply, commit; pop again if the application fails.
  fn run_action(&mut self, action: Action) -> Result<(), Error> {
    self.start_action()?;
    self.log.push(action);
    let applied = self
      .log
      .last_mut()
      .expect("just pushed")
      .apply(&mut self.polygons, &mut self.presentation);
    if let Err(e) = applied {
      self.log.pop();
      return Err(e);
    }
    self.commit_last_action();
    Ok(())
  }

  /// Committing a new action invalidates everything that was undone.
  pub(crate) fn commit_last_action(&mut self) {
    debug_assert!(!self.log.is_empty());
    self.undone.clear();
    self.log.last_mut().expect("log is not empty").commit();
  }
}

///////////////////////////////////////////////////////////////////////////////
// Tests
