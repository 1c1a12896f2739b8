//! Composite gestures: multi-step user actions.
//!
//! A composite gesture is assembled from several steps (clicks,
//! mouse movements) but reads as one atomic action to the user and to
//! the history: the gesture keeps a single pending action at the tail
//! of the log and rewrites it on every step by undoing it, updating
//! its parameters and re-applying it. Finishing the gesture commits
//! the pending action; cancelling undoes and discards it.
//!
//! A gesture object borrows the document and holds the gesture lock
//! for its whole life; the lock is released on every exit path,
//! including dropping the object mid-gesture. Errors split in two:
//! caller errors (wrong state, bad argument) leave the gesture
//! usable, anything else finalizes it with a best-effort rollback.

use log::error;

use crate::action::{Action, Kind};
use crate::data::{Point, Polygon, Vector};
use crate::document::Document;
use crate::Error;

///////////////////////////////////////////////////////////////////////////////
// Shared core

struct Gesture<'a> {
  doc: &'a mut Document,
  finished: bool,
  /// An uncommitted action of ours sits at the tail of the log.
  pending: bool,
}

impl<'a> Gesture<'a> {
  fn new(doc: &'a mut Document) -> Gesture<'a> {
    debug_assert!(!doc.gesture_lock);
    doc.gesture_lock = true;
    Gesture { doc, finished: false, pending: false }
  }

  fn check_active(&self) -> Result<(), Error> {
    if self.finished {
      return Err(Error::GestureFinished);
    }
    Ok(())
  }

  fn push_pending(&mut self, action: Action) {
    debug_assert!(!self.pending);
    self.doc.log.push(action);
    self.pending = true;
  }

  fn pop_pending(&mut self) {
    debug_assert!(self.pending);
    self.doc.log.pop();
    self.pending = false;
  }

  fn pending_action(&mut self) -> &mut Action {
    debug_assert!(self.pending);
    self.doc.log.last_mut().expect("pending action is in the log")
  }

  fn apply_pending(&mut self) -> Result<(), Error> {
    debug_assert!(self.pending);
    let doc = &mut *self.doc;
    doc
      .log
      .last_mut()
      .expect("pending action is in the log")
      .apply(&mut doc.polygons, &mut doc.presentation)
  }

  fn undo_pending(&mut self) -> Result<(), Error> {
    debug_assert!(self.pending);
    let doc = &mut *self.doc;
    doc
      .log
      .last_mut()
      .expect("pending action is in the log")
      .undo(&mut doc.polygons, &mut doc.presentation)
  }

  /// Common finish path. Nothing pending: plain release. Rejected by
  /// the accept hook: equivalent to cancel. Otherwise the pending
  /// action is committed.
  fn finish(&mut self, accept: bool) -> Result<bool, Error> {
    self.check_active()?;
    if !self.pending {
      self.finalize();
      return Ok(false);
    }
    if !accept {
      self.rollback();
      self.finalize();
      return Ok(false);
    }
    self.doc.commit_last_action();
    self.pending = false;
    self.finalize();
    Ok(true)
  }

  /// Idempotent and silent, to allow uniform cleanup after errors.
  fn cancel(&mut self) {
    if self.finished {
      return;
    }
    self.rollback();
    self.finalize();
  }

  /// Take the pending action back out of the state and drop it from
  /// the log, best effort: an undo failure means the state is
  /// already inconsistent, and keeping the half-dead action in the
  /// log would only spread the damage.
  fn rollback(&mut self) {
    if !self.pending {
      return;
    }
    if self.pending_action().done() {
      if let Err(e) = self.undo_pending() {
        error!("rollback of a pending gesture failed: {e}");
      }
    }
    self.pop_pending();
  }

  fn finalize(&mut self) {
    debug_assert!(!self.finished);
    self.doc.gesture_lock = false;
    self.finished = true;
  }

  /// Error policy: caller errors keep the gesture alive, anything
  /// else tears it down with best-effort rollback.
  fn absorb<T>(&mut self, result: Result<T, Error>) -> Result<T, Error> {
    if let Err(e) = &result {
      if !e.is_call_error() && !self.finished {
        self.rollback();
        self.finalize();
      }
    }
    result
  }
}

impl Drop for Gesture<'_> {
  fn drop(&mut self) {
    self.cancel();
  }
}

///////////////////////////////////////////////////////////////////////////////
// Creating a polygon

/// Incremental assembling of a new polygon, e.g. by drawing: each
/// click adds a vertex, mouse movement repositions the last one.
///
/// Internally the whole construction stays one pending add-polygon
/// action that is rewritten on every step.
pub struct CreatePolygon<'a> {
  gesture: Gesture<'a>,
}

impl<'a> CreatePolygon<'a> {
  pub(crate) fn start(doc: &'a mut Document) -> CreatePolygon<'a> {
    CreatePolygon { gesture: Gesture::new(doc) }
  }

  /// Add a vertex at the given position.
  pub fn add_vertex(&mut self, position: Point) -> Result<(), Error> {
    self.gesture.check_active()?;
    let result = self.add_vertex_inner(position);
    self.gesture.absorb(result)
  }

  fn add_vertex_inner(&mut self, position: Point) -> Result<(), Error> {
    if !self.gesture.pending {
      let polygon = Polygon::new(vec![position])?;
      self
        .gesture
        .push_pending(Action::new(Kind::AddPolygon { polygon: Some(polygon) }));
    } else {
      self.gesture.undo_pending()?;
      match &mut self.gesture.pending_action().kind {
        Kind::AddPolygon { polygon: Some(polygon) } => polygon.push_vertex(position),
        _ => unreachable!("pending action is not an add-polygon"),
      }
    }
    self.gesture.apply_pending()
  }

  /// Move the last added vertex to the given position.
  pub fn move_last_vertex(&mut self, position: Point) -> Result<(), Error> {
    if !self.has_vertex() {
      return Err(Error::NoPendingVertex);
    }
    self.gesture.check_active()?;
    let result = self.move_last_vertex_inner(position);
    self.gesture.absorb(result)
  }

  fn move_last_vertex_inner(&mut self, position: Point) -> Result<(), Error> {
    self.gesture.undo_pending()?;
    match &mut self.gesture.pending_action().kind {
      Kind::AddPolygon { polygon: Some(polygon) } => *polygon.last_vertex_mut() = position,
      _ => unreachable!("pending action is not an add-polygon"),
    }
    self.gesture.apply_pending()
  }

  /// Has at least one vertex been added?
  pub fn has_vertex(&self) -> bool {
    self.gesture.pending
  }

  /// Finish the gesture. Returns whether the polygon was accepted
  /// and committed to the history; with no vertices added there is
  /// nothing to commit and the result is `false`.
  pub fn finish(&mut self) -> Result<bool, Error> {
    self.gesture.finish(true)
  }

  /// Roll back and discard the construction. Idempotent; called
  /// automatically when the gesture is dropped.
  pub fn cancel(&mut self) {
    self.gesture.cancel();
  }

  pub fn is_finished(&self) -> bool {
    self.gesture.finished
  }

  /// The document under the gesture, for reading state mid-gesture.
  pub fn document(&self) -> &Document {
    self.gesture.doc
  }
}

///////////////////////////////////////////////////////////////////////////////
// Dragging

#[derive(Debug, Clone, Copy)]
pub(crate) enum DragTarget {
  /// Translate a whole polygon.
  Polygon { index: usize },
  /// Translate one vertex.
  Vertex { polygon: usize, vertex: usize },
  /// Insert a new vertex and place it; the usual flow is clicking an
  /// edge and dragging the fresh vertex into position.
  NewVertex { polygon: usize, before: usize },
}

/// A dragging gesture over the current polygon, the current vertex,
/// or a vertex being inserted.
///
/// For the translation targets each [`Drag::step`] rewrites the
/// pending move action to the vector from the anchor to the new
/// position; stepping back onto the anchor pops the pending action
/// entirely, so a drag that returns to its origin leaves no trace.
pub struct Drag<'a> {
  gesture: Gesture<'a>,
  anchor: Point,
  target: DragTarget,
}

impl<'a> Drag<'a> {
  pub(crate) fn start(doc: &'a mut Document, anchor: Point, target: DragTarget) -> Drag<'a> {
    Drag { gesture: Gesture::new(doc), anchor, target }
  }

  /// Drag to the given position.
  pub fn step(&mut self, position: Point) -> Result<(), Error> {
    self.gesture.check_active()?;
    let result = self.step_inner(position);
    self.gesture.absorb(result)
  }

  fn step_inner(&mut self, position: Point) -> Result<(), Error> {
    match self.target {
      DragTarget::Polygon { .. } | DragTarget::Vertex { .. } => {
        let vector = position - self.anchor;

        if !self.gesture.pending {
          if vector == Vector::ZERO {
            return Ok(());
          }
          let kind = match self.target {
            DragTarget::Polygon { index } => Kind::MovePolygon { polygon: index, vector },
            DragTarget::Vertex { polygon, vertex } => {
              Kind::MoveVertex { polygon, vertex, vector }
            }
            DragTarget::NewVertex { .. } => unreachable!(),
          };
          self.gesture.push_pending(Action::new(kind));
        } else {
          let current = self
            .gesture
            .pending_action()
            .kind
            .vector_mut()
            .expect("pending action is not a move");
          if *current == vector {
            return Ok(());
          }
          self.gesture.undo_pending()?;
          if vector == Vector::ZERO {
            self.gesture.pop_pending();
            return Ok(());
          }
          *self
            .gesture
            .pending_action()
            .kind
            .vector_mut()
            .expect("pending action is not a move") = vector;
        }
      }

      DragTarget::NewVertex { polygon, before } => {
        if !self.gesture.pending {
          self.gesture.push_pending(Action::new(Kind::AddVertex {
            polygon,
            vertex: before,
            position,
          }));
        } else {
          match &mut self.gesture.pending_action().kind {
            Kind::AddVertex { position: current, .. } => {
              if *current == position {
                return Ok(());
              }
            }
            _ => unreachable!("pending action is not an add-vertex"),
          }
          self.gesture.undo_pending()?;
          match &mut self.gesture.pending_action().kind {
            Kind::AddVertex { position: current, .. } => *current = position,
            _ => unreachable!("pending action is not an add-vertex"),
          }
        }
      }
    }

    self.gesture.apply_pending()
  }

  /// Finish the drag, committing the accumulated move if there is
  /// one.
  pub fn finish(&mut self) -> Result<bool, Error> {
    self.gesture.finish(true)
  }

  /// Roll back and discard the drag. Idempotent; called
  /// automatically when the gesture is dropped.
  pub fn cancel(&mut self) {
    self.gesture.cancel();
  }

  pub fn is_finished(&self) -> bool {
    self.gesture.finished
  }

  /// The document under the gesture, for reading state mid-gesture.
  pub fn document(&self) -> &Document {
    self.gesture.doc
  }
}

///////////////////////////////////////////////////////////////////////////////
// Tests
