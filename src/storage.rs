//! Persistence logic: the sequential binary polygon format and the
//! point-table row layout used for database storage.
//!
//! The binary format is, in order: a `u32` polygon count, then for
//! each polygon a `u32` vertex count followed by that many `x`, `y`
//! pairs of IEEE-754 64-bit floats. Everything is little-endian.
//! There is no checksum and no version field; load order is
//! preserved.
//!
//! Database storage keeps one row per vertex in a single table keyed
//! by `(polygonIdx, vertexIdx)`; saving truncates and rewrites the
//! table, loading sorts by the key and groups consecutive rows with
//! equal polygon index back into polygons. The connection handling
//! itself belongs to the shell; this module only produces and
//! consumes the rows.

use std::io::{self, Read, Write};

use thiserror::Error;

use crate::data::{Point, Polygon};

#[derive(Debug, Error)]
pub enum StorageError {
  #[error("i/o error: {0}")]
  Io(#[from] io::Error),
  #[error("stored polygon has no vertices")]
  EmptyPolygon,
}

///////////////////////////////////////////////////////////////////////////////
// Binary format

fn write_u32<W: Write>(w: &mut W, value: u32) -> io::Result<()> {
  w.write_all(&value.to_le_bytes())
}

fn write_f64<W: Write>(w: &mut W, value: f64) -> io::Result<()> {
  w.write_all(&value.to_le_bytes())
}

fn read_u32<R: Read>(r: &mut R) -> io::Result<u32> {
  let mut buf = [0u8; 4];
  r.read_exact(&mut buf)?;
  Ok(u32::from_le_bytes(buf))
}

fn read_f64<R: Read>(r: &mut R) -> io::Result<f64> {
  let mut buf = [0u8; 8];
  r.read_exact(&mut buf)?;
  Ok(f64::from_le_bytes(buf))
}

pub fn write_polygons<W: Write>(w: &mut W, polygons: &[Polygon]) -> Result<(), StorageError> {
  write_u32(w, polygons.len() as u32)?;
  for polygon in polygons {
    write_u32(w, polygon.vertex_count() as u32)?;
    for vertex in polygon.vertices() {
      write_f64(w, vertex.x)?;
      write_f64(w, vertex.y)?;
    }
  }
  Ok(())
}

/// Read polygons in stored order. Vertex counts below three are
/// accepted, matching the writer's leniency; a zero count is not a
/// polygon.
pub fn read_polygons<R: Read>(r: &mut R) -> Result<Vec<Polygon>, StorageError> {
  let num_polygons = read_u32(r)?;
  let mut polygons = Vec::new();
  for _ in 0..num_polygons {
    let num_vertices = read_u32(r)?;
    let mut vertices = Vec::new();
    for _ in 0..num_vertices {
      let x = read_f64(r)?;
      let y = read_f64(r)?;
      vertices.push(Point::new(x, y));
    }
    polygons.push(Polygon::new(vertices).map_err(|_| StorageError::EmptyPolygon)?);
  }
  Ok(polygons)
}

///////////////////////////////////////////////////////////////////////////////
// Point-table rows

/// One vertex as stored in the `Points` table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRow {
  pub polygon: u32,
  pub vertex: u32,
  pub x: f64,
  pub y: f64,
}

pub const CREATE_POINTS_TABLE: &str = "CREATE TABLE Points(\
  polygonIdx INTEGER, vertexIdx INTEGER, x DOUBLE, y DOUBLE, \
  PRIMARY KEY(polygonIdx, vertexIdx))";

/// Decimal digits that round-trip an `f64` through text.
pub const FLOAT_DIGITS: usize = f64::DIGITS as usize + 2;

impl PointRow {
  /// The row as a SQL `VALUES` tuple, with enough digits to recover
  /// the original binary.
  pub fn to_values(&self) -> String {
    format!(
      "({}, {}, {:.prec$}, {:.prec$})",
      self.polygon,
      self.vertex,
      self.x,
      self.y,
      prec = FLOAT_DIGITS
    )
  }
}

/// Enumerate the polygons as table rows in `(polygon, vertex)` order.
pub fn rows(polygons: &[Polygon]) -> impl Iterator<Item = PointRow> + '_ {
  polygons.iter().enumerate().flat_map(|(p, polygon)| {
    polygon.vertices().iter().enumerate().map(move |(v, point)| PointRow {
      polygon: p as u32,
      vertex: v as u32,
      x: point.x,
      y: point.y,
    })
  })
}

/// Rebuild polygons from rows sorted by `(polygon, vertex)`,
/// grouping consecutive rows with equal polygon index.
pub fn from_rows<I>(rows: I) -> Result<Vec<Polygon>, StorageError>
where
  I: IntoIterator<Item = PointRow>,
{
  let mut polygons = Vec::new();
  let mut current: Option<(u32, Vec<Point>)> = None;

  for row in rows {
    match &mut current {
      Some((idx, vertices)) if *idx == row.polygon => {
        vertices.push(Point::new(row.x, row.y));
      }
      _ => {
        if let Some((_, vertices)) = current.take() {
          polygons.push(Polygon::new(vertices).map_err(|_| StorageError::EmptyPolygon)?);
        }
        current = Some((row.polygon, vec![Point::new(row.x, row.y)]));
      }
    }
  }
  if let Some((_, vertices)) = current {
    polygons.push(Polygon::new(vertices).map_err(|_| StorageError::EmptyPolygon)?);
  }

  Ok(polygons)
}

///////////////////////////////////////////////////////////////////////////////
// Tests
