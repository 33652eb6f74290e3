use std::f64::consts::PI;

use nalgebra as na;
use na::{Matrix4, Vector3};

/// Selects the basis used by `generate_curve_coefs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveType {
    Hermite,
    Bezier,
}

/// Dense row-major matrix with a fixed row count and a growable column capacity.
/// `lastcol` is the number of columns currently holding points (or coefficients),
/// always <= `cols`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    lastcol: usize,
    data: Vec<f64>, // data[r * cols + c]
}

impl Matrix {
    /// Zeroed `rows` x `cols` matrix with no used columns.
    pub fn new(rows: usize, cols: usize) -> Matrix {
        return Matrix {
            rows,
            cols,
            lastcol: 0,
            data: vec![0.0; rows * cols],
        };
    }

    /// Empty 4-row point matrix, the container used for edge and polygon lists.
    pub fn points(capacity: usize) -> Matrix {
        return Matrix::new(4, capacity.max(1));
    }

    /// 4x4 identity.
    pub fn identity() -> Matrix {
        let mut m = Matrix::new(4, 4);
        m.ident();
        return m;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn lastcol(&self) -> usize {
        self.lastcol
    }

    /// Marks the first `lastcol` columns as used, capped to the capacity.
    pub fn set_lastcol(&mut self, lastcol: usize) {
        self.lastcol = lastcol.min(self.cols);
    }

    /// Forgets every stored point. Capacity is kept.
    pub fn clear(&mut self) {
        self.lastcol = 0;
    }

    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.data[r * self.cols + c]
    }

    pub fn set(&mut self, r: usize, c: usize, value: f64) {
        self.data[r * self.cols + c] = value;
    }

    /// Turns a square matrix into the identity. Also marks every column as used,
    /// so an identity can be fed to `mult` as a full 4x4 operand.
    pub fn ident(&mut self) {
        for r in 0..self.rows {
            for c in 0..self.cols {
                self.set(r, c, if r == c { 1.0 } else { 0.0 });
            }
        }
        self.lastcol = self.cols;
    }

    /// Reallocates to `newcols` columns keeping existing values. `lastcol` is untouched.
    pub fn grow(&mut self, newcols: usize) {
        let mut data = vec![0.0; self.rows * newcols];
        let keep = self.cols.min(newcols);
        for r in 0..self.rows {
            let src = r * self.cols;
            let dst = r * newcols;
            data[dst..dst + keep].copy_from_slice(&self.data[src..src + keep]);
        }
        self.data = data;
        self.cols = newcols;
        self.lastcol = self.lastcol.min(newcols);
    }

    /// Copies the whole `rows` x `cols` region of `other` into self.
    /// Dimensions are expected to match; only the overlapping region is copied otherwise.
    pub fn copy_from(&mut self, other: &Matrix) {
        debug_assert!(
            self.rows == other.rows && self.cols == other.cols,
            "copy between matrices of different shape"
        );
        if self.rows == other.rows && self.cols == other.cols {
            self.data.copy_from_slice(&other.data);
        } else {
            for r in 0..self.rows.min(other.rows) {
                for c in 0..self.cols.min(other.cols) {
                    self.set(r, c, other.get(r, c));
                }
            }
        }
        self.lastcol = other.lastcol.min(self.cols);
    }

    /// Multiplies every used value by `x`.
    pub fn scalar_mult(&mut self, x: f64) {
        for r in 0..self.rows {
            for c in 0..self.lastcol {
                let v = self.get(r, c);
                self.set(r, c, v * x);
            }
        }
    }

    /// a * b -> b. Each of `b`'s used columns is replaced by the 4x4 `a` applied to it.
    /// This is the only way geometry moves between coordinate frames.
    pub fn mult(a: &Matrix, b: &mut Matrix) {
        debug_assert!(a.rows == 4 && a.cols == 4, "transform must be 4x4");
        let mut tmp = [0.0; 4];
        for c in 0..b.lastcol {
            for r in 0..b.rows.min(4) {
                tmp[r] = b.get(r, c);
            }
            for r in 0..b.rows.min(4) {
                let value = a.get(r, 0) * tmp[0]
                    + a.get(r, 1) * tmp[1]
                    + a.get(r, 2) * tmp[2]
                    + a.get(r, 3) * tmp[3];
                b.set(r, c, value);
            }
        }
    }

    /// Appends a homogeneous point (x, y, z, 1), doubling the capacity when full.
    pub fn add_point(&mut self, x: f64, y: f64, z: f64) {
        if self.lastcol == self.cols {
            self.grow(self.cols * 2);
        }
        let c = self.lastcol;
        self.set(0, c, x);
        self.set(1, c, y);
        self.set(2, c, z);
        self.set(3, c, 1.0);
        self.lastcol += 1;
    }

    /// Spatial part of column `c`.
    pub fn point(&self, c: usize) -> Vector3<f64> {
        return Vector3::new(self.get(0, c), self.get(1, c), self.get(2, c));
    }

    /// Top-left 4x4 block as an nalgebra matrix.
    pub fn to_transform(&self) -> Matrix4<f64> {
        return Matrix4::from_fn(|r, c| self.get(r, c));
    }

    /// Builds a fully used 4x4 matrix from an nalgebra transform.
    pub fn from_transform(t: &Matrix4<f64>) -> Matrix {
        let mut m = Matrix::new(4, 4);
        for r in 0..4 {
            for c in 0..4 {
                m.set(r, c, t[(r, c)]);
            }
        }
        m.lastcol = 4;
        return m;
    }

    /// Renders the used columns, two decimals per entry.
    pub fn print(&self) -> String {
        let mut out = String::new();
        for r in 0..self.rows {
            for c in 0..self.lastcol {
                out.push_str(&format!("{:0.2} ", self.get(r, c)));
            }
            out.push('\n');
        }
        return out;
    }
}

/// Translation by (x, y, z).
pub fn make_translate(x: f64, y: f64, z: f64) -> Matrix {
    let mut t = Matrix::identity();
    t.set(0, 3, x);
    t.set(1, 3, y);
    t.set(2, 3, z);
    return t;
}

/// Axis-wise scale by (x, y, z).
pub fn make_scale(x: f64, y: f64, z: f64) -> Matrix {
    let mut t = Matrix::identity();
    t.set(0, 0, x);
    t.set(1, 1, y);
    t.set(2, 2, z);
    return t;
}

/// Rotation about the X axis, `theta` in radians.
pub fn make_rot_x(theta: f64) -> Matrix {
    let mut t = Matrix::identity();
    t.set(1, 1, theta.cos());
    t.set(1, 2, -theta.sin());
    t.set(2, 1, theta.sin());
    t.set(2, 2, theta.cos());
    return t;
}

/// Rotation about the Y axis, `theta` in radians.
pub fn make_rot_y(theta: f64) -> Matrix {
    let mut t = Matrix::identity();
    t.set(0, 0, theta.cos());
    t.set(2, 0, -theta.sin());
    t.set(0, 2, theta.sin());
    t.set(2, 2, theta.cos());
    return t;
}

/// Rotation about the Z axis, `theta` in radians.
pub fn make_rot_z(theta: f64) -> Matrix {
    let mut t = Matrix::identity();
    t.set(0, 0, theta.cos());
    t.set(0, 1, -theta.sin());
    t.set(1, 0, theta.sin());
    t.set(1, 1, theta.cos());
    return t;
}

pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

fn from_rows(rows: [[f64; 4]; 4]) -> Matrix {
    let mut m = Matrix::new(4, 4);
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            m.set(r, c, *value);
        }
    }
    m.lastcol = 4;
    return m;
}

/// Basis turning four Bezier control values into cubic coefficients.
pub fn make_bezier() -> Matrix {
    return from_rows([
        [-1.0, 3.0, -3.0, 1.0],
        [3.0, -6.0, 3.0, 0.0],
        [-3.0, 3.0, 0.0, 0.0],
        [1.0, 0.0, 0.0, 0.0],
    ]);
}

/// Basis turning (p0, p1, r0, r1) into cubic coefficients.
pub fn make_hermite() -> Matrix {
    return from_rows([
        [2.0, -2.0, 1.0, 1.0],
        [-3.0, 3.0, -2.0, -1.0],
        [0.0, 0.0, 1.0, 0.0],
        [1.0, 0.0, 0.0, 0.0],
    ]);
}

/// 4x1 matrix holding a, b, c, d of a*t^3 + b*t^2 + c*t + d.
/// For Hermite curves p0 and p1 are the endpoints and p2, p3 the rates of change;
/// for Bezier curves all four are control values.
pub fn generate_curve_coefs(p0: f64, p1: f64, p2: f64, p3: f64, curve: CurveType) -> Matrix {
    let mut coefs = Matrix::new(4, 1);
    coefs.set(0, 0, p0);
    coefs.set(1, 0, p1);
    coefs.set(2, 0, p2);
    coefs.set(3, 0, p3);
    coefs.lastcol = 1;

    let basis = match curve {
        CurveType::Hermite => make_hermite(),
        CurveType::Bezier => make_bezier(),
    };
    Matrix::mult(&basis, &mut coefs);
    return coefs;
}
