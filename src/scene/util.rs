use nalgebra as na;
use na::Vector3;

use crate::matrix::Matrix;

/// Non-normalized normal of the triangle starting at column `i`:
/// (p1 - p0) x (p2 - p0).
pub fn calculate_normal(polygons: &Matrix, i: usize) -> Vector3<f64> {
    let p0 = polygons.point(i);
    let a = polygons.point(i + 1) - p0;
    let b = polygons.point(i + 2) - p0;
    return a.cross(&b);
}

/// Unit vector along `v`, or zero for a zero vector.
pub fn normalize(v: Vector3<f64>) -> Vector3<f64> {
    let norm = v.norm();
    if norm == 0.0 {
        return Vector3::zeros();
    }
    return v / norm;
}

/// Vector from a `[x, y, z]` triple.
pub fn to_vector(v: [f64; 3]) -> Vector3<f64> {
    return Vector3::new(v[0], v[1], v[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_clockwise_triangle_faces_viewer() {
        let mut m = Matrix::points(3);
        m.add_point(0.0, 0.0, 0.0);
        m.add_point(1.0, 0.0, 0.0);
        m.add_point(0.0, 1.0, 0.0);
        assert_eq!(calculate_normal(&m, 0), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn zero_vector_normalizes_to_zero() {
        assert_eq!(normalize(Vector3::zeros()), Vector3::zeros());
        assert!((normalize(Vector3::new(3.0, 4.0, 0.0)).norm() - 1.0).abs() < 1e-12);
    }
}
