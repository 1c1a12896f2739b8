/// An important change of domain state: addition or deletion of a
/// polygon or a vertex. Indices are positions in the polygon list;
/// deletion events carry the index the object had when the mutation
/// ran, addition events the index the object ends up at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
  PolygonAdded { polygon: usize },
  PolygonDeleted { polygon: usize },
  VertexAdded { polygon: usize, vertex: usize },
  VertexDeleted { polygon: usize, vertex: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventObject {
  Polygon,
  Vertex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
  Added,
  Deleted,
}

impl Event {
  pub fn object(&self) -> EventObject {
    match self {
      Event::PolygonAdded { .. } | Event::PolygonDeleted { .. } => EventObject::Polygon,
      Event::VertexAdded { .. } | Event::VertexDeleted { .. } => EventObject::Vertex,
    }
  }

  pub fn kind(&self) -> EventKind {
    match self {
      Event::PolygonAdded { .. } | Event::VertexAdded { .. } => EventKind::Added,
      Event::PolygonDeleted { .. } | Event::VertexDeleted { .. } => EventKind::Deleted,
    }
  }

  pub fn polygon_index(&self) -> usize {
    match *self {
      Event::PolygonAdded { polygon }
      | Event::PolygonDeleted { polygon }
      | Event::VertexAdded { polygon, .. }
      | Event::VertexDeleted { polygon, .. } => polygon,
    }
  }

  pub fn vertex_index(&self) -> Option<usize> {
    match *self {
      Event::VertexAdded { vertex, .. } | Event::VertexDeleted { vertex, .. } => Some(vertex),
      _ => None,
    }
  }
}

/// The events emitted by one action application or undo, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventList {
  events: Vec<Event>,
}

impl From<Vec<Event>> for EventList {
  fn from(events: Vec<Event>) -> EventList {
    EventList { events }
  }
}

impl EventList {
  pub fn is_empty(&self) -> bool {
    self.events.is_empty()
  }

  pub fn len(&self) -> usize {
    self.events.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Event> {
    self.events.iter()
  }

  pub fn num_added_polygons(&self) -> usize {
    self
      .events
      .iter()
      .filter(|e| matches!(e, Event::PolygonAdded { .. }))
      .count()
  }

  /// Was the given polygon deleted?
  pub fn polygon_deleted(&self, idx: usize) -> bool {
    self
      .events
      .iter()
      .any(|e| matches!(e, Event::PolygonDeleted { polygon } if *polygon == idx))
  }

  /// Is this exactly one deleted-vertex event with the given indices?
  pub fn vertex_deleted(&self, polygon_idx: usize, vertex_idx: usize) -> bool {
    matches!(
      self.events.as_slice(),
      [Event::VertexDeleted { polygon, vertex }]
        if *polygon == polygon_idx && *vertex == vertex_idx
    )
  }

  /// The indices of the added vertex, if the list is exactly one
  /// added-vertex event.
  pub fn single_vertex_added(&self) -> Option<(usize, usize)> {
    match self.events.as_slice() {
      [Event::VertexAdded { polygon, vertex }] => Some((*polygon, *vertex)),
      _ => None,
    }
  }

  /// Index from the first added-polygon event.
  pub fn first_added_polygon(&self) -> Option<usize> {
    self.events.iter().find_map(|e| match e {
      Event::PolygonAdded { polygon } => Some(*polygon),
      _ => None,
    })
  }
}

/// Hook implemented by the presentation layer to learn about domain
/// changes. Called after every successful action application or undo,
/// and with an empty list when only the selection changed.
///
/// Implementations must not fail; the document treats a panic here as
/// a broken invariant and lets it propagate.
pub trait PresentationModel {
  fn notify(&mut self, events: &EventList);
}

/// A model that ignores all notifications.
impl PresentationModel for () {
  fn notify(&mut self, _events: &EventList) {}
}
