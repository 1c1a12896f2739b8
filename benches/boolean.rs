use criterion::{criterion_group, criterion_main, Criterion};
use polyedit::algorithms::BooleanOp;
use polyedit::data::{Point, Polygon};

/// An axis-aligned square with each side subdivided into `k`
/// collinear pieces. `k` is kept odd so the subdivision points never
/// land on the crossings with the offset copy.
fn subdivided_square(origin: (f64, f64), size: f64, k: usize) -> Polygon {
  let (x, y) = origin;
  let corners = [
    (x, y),
    (x + size, y),
    (x + size, y + size),
    (x, y + size),
  ];
  let mut vertices = Vec::with_capacity(4 * k);
  for c in 0..4 {
    let (x0, y0) = corners[c];
    let (x1, y1) = corners[(c + 1) % 4];
    for i in 0..k {
      let t = i as f64 / k as f64;
      vertices.push(Point::new(x0 + t * (x1 - x0), y0 + t * (y1 - y0)));
    }
  }
  Polygon::new(vertices).unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
  for k in [1, 33] {
    let p = subdivided_square((0.0, 0.0), 2.0, k);
    let q = subdivided_square((1.0, 1.0), 2.0, k);
    c.bench_function(&format!("union {} vertices", 4 * k), |b| {
      b.iter(|| BooleanOp::Union.apply(&p, &q).unwrap())
    });
    c.bench_function(&format!("xor {} vertices", 4 * k), |b| {
      b.iter(|| BooleanOp::Xor.apply(&p, &q).unwrap())
    });
  }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
