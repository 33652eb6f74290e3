//! Parametric builders appending edges (pairs of columns) or triangles (triples of
//! columns, counter-clockwise seen from outside) to a point matrix.

use std::f64::consts::PI;

use crate::matrix::{generate_curve_coefs, CurveType, Matrix};

/// Appends one segment.
pub fn add_edge(edges: &mut Matrix, x0: f64, y0: f64, z0: f64, x1: f64, y1: f64, z1: f64) {
    edges.add_point(x0, y0, z0);
    edges.add_point(x1, y1, z1);
}

/// Appends one triangle.
pub fn add_polygon(
    polygons: &mut Matrix,
    x0: f64,
    y0: f64,
    z0: f64,
    x1: f64,
    y1: f64,
    z1: f64,
    x2: f64,
    y2: f64,
    z2: f64,
) {
    polygons.add_point(x0, y0, z0);
    polygons.add_point(x1, y1, z1);
    polygons.add_point(x2, y2, z2);
}

/// Triangle out of three columns of another point matrix.
fn add_polygon_from(polygons: &mut Matrix, points: &Matrix, a: usize, b: usize, c: usize) {
    for i in [a, b, c] {
        let p = points.point(i);
        polygons.add_point(p.x, p.y, p.z);
    }
}

/// Quad a-b-c-d (counter-clockwise) as two triangles.
fn add_quad(polygons: &mut Matrix, q: [[f64; 3]; 4]) {
    let [a, b, c, d] = q;
    add_polygon(polygons, a[0], a[1], a[2], b[0], b[1], b[2], c[0], c[1], c[2]);
    add_polygon(polygons, a[0], a[1], a[2], c[0], c[1], c[2], d[0], d[1], d[2]);
}

/// Wireframe box: 12 edges. (x, y, z) is the upper-left-front corner; the box
/// extends right by `width`, down by `height` and back by `depth`.
pub fn add_box_edges(edges: &mut Matrix, x: f64, y: f64, z: f64, width: f64, height: f64, depth: f64) {
    let x1 = x + width;
    let y1 = y - height;
    let z1 = z - depth;

    // front
    add_edge(edges, x, y, z, x1, y, z);
    add_edge(edges, x1, y, z, x1, y1, z);
    add_edge(edges, x1, y1, z, x, y1, z);
    add_edge(edges, x, y1, z, x, y, z);
    // back
    add_edge(edges, x, y, z1, x1, y, z1);
    add_edge(edges, x1, y, z1, x1, y1, z1);
    add_edge(edges, x1, y1, z1, x, y1, z1);
    add_edge(edges, x, y1, z1, x, y, z1);
    // connectors
    add_edge(edges, x, y, z, x, y, z1);
    add_edge(edges, x1, y, z, x1, y, z1);
    add_edge(edges, x1, y1, z, x1, y1, z1);
    add_edge(edges, x, y1, z, x, y1, z1);
}

/// Solid box: 6 faces, 12 triangles, same corner convention as `add_box_edges`.
pub fn add_box(polygons: &mut Matrix, x: f64, y: f64, z: f64, width: f64, height: f64, depth: f64) {
    let x0 = x;
    let y0 = y;
    let z0 = z;
    let x1 = x + width;
    let y1 = y - height;
    let z1 = z - depth;

    // front, back
    add_quad(polygons, [[x0, y0, z0], [x0, y1, z0], [x1, y1, z0], [x1, y0, z0]]);
    add_quad(polygons, [[x1, y0, z1], [x1, y1, z1], [x0, y1, z1], [x0, y0, z1]]);
    // right, left
    add_quad(polygons, [[x1, y0, z0], [x1, y1, z0], [x1, y1, z1], [x1, y0, z1]]);
    add_quad(polygons, [[x0, y0, z1], [x0, y1, z1], [x0, y1, z0], [x0, y0, z0]]);
    // top, bottom
    add_quad(polygons, [[x0, y0, z1], [x0, y0, z0], [x1, y0, z0], [x1, y0, z1]]);
    add_quad(polygons, [[x0, y1, z0], [x0, y1, z1], [x1, y1, z1], [x1, y1, z0]]);
}

/// Points on a sphere: `step` half circles rotated about the x axis, each sampled
/// at `step + 1` points from pole to pole.
pub fn generate_sphere(cx: f64, cy: f64, cz: f64, r: f64, step: usize) -> Matrix {
    let mut points = Matrix::points(step * (step + 1));
    for rotation in 0..step {
        let phi = 2.0 * PI * rotation as f64 / step as f64;
        for circle in 0..=step {
            let theta = PI * circle as f64 / step as f64;
            points.add_point(
                r * theta.cos() + cx,
                r * theta.sin() * phi.cos() + cy,
                r * theta.sin() * phi.sin() + cz,
            );
        }
    }
    return points;
}

/// Triangulated sphere. Triangles collapsing onto a pole are skipped.
pub fn add_sphere(polygons: &mut Matrix, cx: f64, cy: f64, cz: f64, r: f64, step: usize) {
    if step < 2 {
        return;
    }
    let points = generate_sphere(cx, cy, cz, r, step);
    let ring = step + 1;
    let total = points.lastcol();

    for lat in 0..step {
        for longt in 0..step {
            let p0 = lat * ring + longt;
            let p1 = p0 + 1;
            let p2 = (p1 + ring) % total;
            let p3 = (p0 + ring) % total;

            if longt != step - 1 {
                add_polygon_from(polygons, &points, p0, p1, p2);
            }
            if longt != 0 {
                add_polygon_from(polygons, &points, p0, p2, p3);
            }
        }
    }
}

/// Points on a torus: `step` circles of radius `r1` swept around a ring of radius `r2`
/// about the y axis.
pub fn generate_torus(cx: f64, cy: f64, cz: f64, r1: f64, r2: f64, step: usize) -> Matrix {
    let mut points = Matrix::points(step * step);
    for rotation in 0..step {
        let phi = 2.0 * PI * rotation as f64 / step as f64;
        for circle in 0..step {
            let theta = 2.0 * PI * circle as f64 / step as f64;
            let reach = r1 * theta.cos() + r2;
            points.add_point(phi.cos() * reach + cx, r1 * theta.sin() + cy, -phi.sin() * reach + cz);
        }
    }
    return points;
}

/// Triangulated torus.
pub fn add_torus(polygons: &mut Matrix, cx: f64, cy: f64, cz: f64, r1: f64, r2: f64, step: usize) {
    if step < 3 {
        return;
    }
    let points = generate_torus(cx, cy, cz, r1, r2, step);
    let total = points.lastcol();

    for lat in 0..step {
        for longt in 0..step {
            let p0 = lat * step + longt;
            let p1 = if longt == step - 1 { p0 - longt } else { p0 + 1 };
            let p2 = (p1 + step) % total;
            let p3 = (p0 + step) % total;

            add_polygon_from(polygons, &points, p0, p3, p2);
            add_polygon_from(polygons, &points, p0, p2, p1);
        }
    }
}

/// Circle in the plane z = cz, `step` segments.
pub fn add_circle(edges: &mut Matrix, cx: f64, cy: f64, cz: f64, r: f64, step: usize) {
    let step = step.max(1);
    let mut x0 = r + cx;
    let mut y0 = cy;
    for i in 1..=step {
        let t = 2.0 * PI * i as f64 / step as f64;
        let x1 = r * t.cos() + cx;
        let y1 = r * t.sin() + cy;
        add_edge(edges, x0, y0, cz, x1, y1, cz);
        x0 = x1;
        y0 = y1;
    }
}

/// Cubic curve sampled at `step + 1` parameter values in [0, 1], consecutive samples
/// joined by edges. Bezier: four control points. Hermite: endpoints `p0`, `p1` and
/// rates `p2`, `p3`.
pub fn add_curve(edges: &mut Matrix, p: [[f64; 2]; 4], step: usize, curve: CurveType) {
    let step = step.max(1);
    let xc = generate_curve_coefs(p[0][0], p[1][0], p[2][0], p[3][0], curve);
    let yc = generate_curve_coefs(p[0][1], p[1][1], p[2][1], p[3][1], curve);

    fn eval(c: &Matrix, t: f64) -> f64 {
        ((c.get(0, 0) * t + c.get(1, 0)) * t + c.get(2, 0)) * t + c.get(3, 0)
    }

    let mut x0 = eval(&xc, 0.0);
    let mut y0 = eval(&yc, 0.0);
    for i in 1..=step {
        let t = i as f64 / step as f64;
        let x1 = eval(&xc, t);
        let y1 = eval(&yc, t);
        add_edge(edges, x0, y0, 0.0, x1, y1, 0.0);
        x0 = x1;
        y0 = y1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn normal(m: &Matrix, i: usize) -> Vector3<f64> {
        let a = m.point(i);
        let b = m.point(i + 1);
        let c = m.point(i + 2);
        (b - a).cross(&(c - a))
    }

    fn centroid(m: &Matrix, i: usize) -> Vector3<f64> {
        (m.point(i) + m.point(i + 1) + m.point(i + 2)) / 3.0
    }

    #[test]
    fn box_edges_has_twelve_segments() {
        let mut e = Matrix::points(4);
        add_box_edges(&mut e, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        assert_eq!(e.lastcol(), 24);
    }

    #[test]
    fn box_faces_point_outward() {
        let mut p = Matrix::points(4);
        add_box(&mut p, 10.0, 20.0, 30.0, 4.0, 6.0, 8.0);
        assert_eq!(p.lastcol(), 36);
        let center = Vector3::new(12.0, 17.0, 26.0);
        for i in (0..p.lastcol()).step_by(3) {
            let n = normal(&p, i);
            assert!(n.norm() > 0.0);
            assert!(n.dot(&(centroid(&p, i) - center)) > 0.0, "triangle {} faces inward", i / 3);
        }
    }

    #[test]
    fn sphere_points_lie_on_surface() {
        let points = generate_sphere(1.0, 2.0, 3.0, 5.0, 10);
        assert_eq!(points.lastcol(), 110);
        let center = Vector3::new(1.0, 2.0, 3.0);
        for i in 0..points.lastcol() {
            assert!(((points.point(i) - center).norm() - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn sphere_skips_pole_triangles_and_faces_outward() {
        let step = 10;
        let mut p = Matrix::points(16);
        add_sphere(&mut p, 0.0, 0.0, 0.0, 50.0, step);
        // two triangles per cell minus one at each pole per half circle
        assert_eq!(p.lastcol(), 3 * (2 * step * step - 2 * step));
        for i in (0..p.lastcol()).step_by(3) {
            let n = normal(&p, i);
            assert!(n.norm() > 1e-9, "degenerate triangle {}", i / 3);
            assert!(n.dot(&centroid(&p, i)) > 0.0);
        }
    }

    #[test]
    fn torus_faces_point_away_from_tube_center() {
        let step = 12;
        let (r1, r2) = (5.0, 20.0);
        let mut p = Matrix::points(16);
        add_torus(&mut p, 0.0, 0.0, 0.0, r1, r2, step);
        assert_eq!(p.lastcol(), 3 * 2 * step * step);
        for i in (0..p.lastcol()).step_by(3) {
            let c = centroid(&p, i);
            let ring = Vector3::new(c.x, 0.0, c.z).normalize() * r2;
            assert!(normal(&p, i).dot(&(c - ring)) > 0.0);
        }
    }

    #[test]
    fn circle_closes_on_itself() {
        let mut e = Matrix::points(4);
        add_circle(&mut e, 5.0, 5.0, 0.0, 2.0, 8);
        assert_eq!(e.lastcol(), 16);
        let first = e.point(0);
        let last = e.point(e.lastcol() - 1);
        assert!((first - last).norm() < 1e-9);
    }

    #[test]
    fn curve_runs_between_endpoints() {
        let mut e = Matrix::points(4);
        add_curve(&mut e, [[0.0, 0.0], [10.0, 40.0], [30.0, 40.0], [40.0, 0.0]], 20, CurveType::Bezier);
        assert_eq!(e.lastcol(), 40);
        assert!((e.point(0) - Vector3::new(0.0, 0.0, 0.0)).norm() < 1e-9);
        assert!((e.point(39) - Vector3::new(40.0, 0.0, 0.0)).norm() < 1e-9);

        let mut h = Matrix::points(4);
        add_curve(&mut h, [[0.0, 0.0], [40.0, 0.0], [0.0, 100.0], [0.0, -100.0]], 10, CurveType::Hermite);
        assert!((h.point(h.lastcol() - 1) - Vector3::new(40.0, 0.0, 0.0)).norm() < 1e-9);
    }
}
