mod editor {
  use polyedit::data::{Point, Polygon};
  use polyedit::{Document, Error, EventList, PresentationModel};

  use std::cell::RefCell;
  use std::rc::Rc;

  #[derive(Clone, Default)]
  struct CountingView(Rc<RefCell<usize>>);

  impl PresentationModel for CountingView {
    fn notify(&mut self, _events: &EventList) {
      *self.0.borrow_mut() += 1;
    }
  }

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

  #[test]
  fn draw_edit_merge_undo() -> Result<(), Error> {
    let view = CountingView::default();
    let mut doc = Document::new(Box::new(view.clone()));

    // draw a square
    {
      let mut create = doc.start_create_polygon()?;
      for (x, y) in [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)] {
        create.add_vertex(Point::new(x, y))?;
      }
      assert!(create.finish()?);
    }
    assert_eq!(doc.polygons().len(), 1);
    assert!(doc.polygons()[0].is_simple());

    // drop in a second, overlapping square and merge
    doc.add_polygon(square((1.0, 1.0), 2.0))?;
    doc.merge_current_polygon_with_other()?;
    assert_eq!(doc.polygons().len(), 1);
    assert_eq!(doc.polygons()[0].area(), 7.0);

    // the view heard about every change
    assert!(*view.0.borrow() > 0);

    // take it all back
    while doc.can_undo() {
      doc.undo()?;
    }
    assert!(doc.polygons().is_empty());

    // and replay
    while doc.can_redo() {
      doc.redo()?;
    }
    assert_eq!(doc.polygons().len(), 1);
    assert_eq!(doc.polygons()[0].area(), 7.0);
    Ok(())
  }

  #[test]
  fn drag_is_one_history_entry() -> Result<(), Error> {
    let mut doc = Document::new(Box::new(()));
    doc.add_polygon(square((0.0, 0.0), 2.0))?;

    {
      let mut drag = doc.start_polygon_drag(Point::new(0.0, 0.0))?;
      for i in 1..=10 {
        drag.step(Point::new(i as f64, 0.0))?;
      }
      assert!(drag.finish()?);
    }

    assert_eq!(doc.polygons()[0].vertices()[0], Point::new(10.0, 0.0));
    doc.undo()?;
    assert_eq!(doc.polygons()[0].vertices()[0], Point::new(0.0, 0.0));
    doc.redo()?;
    assert_eq!(doc.polygons()[0].vertices()[0], Point::new(10.0, 0.0));
    Ok(())
  }

  #[test]
  fn gesture_blocks_everything_else() -> Result<(), Error> {
    let mut doc = Document::new(Box::new(()));
    doc.add_polygon(square((0.0, 0.0), 2.0))?;
    let drag = doc.start_polygon_drag(Point::new(0.0, 0.0))?;
    assert!(!drag.document().can_undo());
    drop(drag);
    assert!(doc.can_undo());
    Ok(())
  }

  #[test]
  fn storage_roundtrip_through_document() -> Result<(), Error> {
    let mut doc = Document::new(Box::new(()));
    doc.add_polygon(square((0.0, 0.0), 2.0))?;
    doc.add_polygon(square((5.0, 5.0), 3.0))?;

    let mut buf = Vec::new();
    polyedit::storage::write_polygons(&mut buf, doc.polygons()).unwrap();
    let loaded = polyedit::storage::read_polygons(&mut buf.as_slice()).unwrap();

    let mut restored = Document::new(Box::new(()));
    restored.load_polygons(loaded)?;
    assert_eq!(restored.polygons(), doc.polygons());
    Ok(())
  }
}
