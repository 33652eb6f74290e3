pub mod buffer;
pub mod shader;
pub mod util;

use nalgebra as na;
use na::Vector3;

pub use buffer::{Color, Screen, BLACK, WHITE, XRES, YRES};
pub use shader::{get_lighting, Light, Lighting, Material};

use crate::matrix::Matrix;
use util::{calculate_normal, to_vector};

/// Screen-space vertex of a triangle being scan converted.
#[derive(Debug, Clone, Copy)]
struct ScenePoint {
    x: f64,
    y: f64,
    z: f64,
}

impl Screen {
    /// Draws a line between (x0, y0) and (x1, y1) via Bresenham's algorithm as presented in
    /// https://en.wikipedia.org/wiki/Bresenham%27s_line_algorithm
    /// Depth is interpolated linearly over the steps and every pixel goes through the depth test.
    /// Segments are clipped to the screen first, so the walk never leaves it.
    pub fn draw_line(&mut self, x0: i32, y0: i32, z0: f64, x1: i32, y1: i32, z1: f64, color: Color) {
        let Some([(x0, y0, z0), (x1, y1, z1)]) = self.clip_line((x0, y0, z0), (x1, y1, z1)) else {
            return;
        };
        let dx: i64 = (x1 - x0).abs();
        let sx: i64 = if x0 < x1 { 1 } else { -1 };
        let dy: i64 = -(y1 - y0).abs();
        let sy: i64 = if y0 < y1 { 1 } else { -1 };
        let steps = dx.max(-dy);
        let dz = if steps > 0 { (z1 - z0) / steps as f64 } else { 0.0 };

        let mut error: i64 = dx + dy;
        let (mut x, mut y, mut z) = (x0, y0, z0);
        loop {
            // Clipped coordinates are on screen and fit in i32.
            self.plot(x as i32, y as i32, z, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * error;
            if e2 >= dy {
                error += dy;
                x += sx;
            }
            if e2 <= dx {
                error += dx;
                y += sy;
            }
            z += dz;
        }
    }

    /// Liang-Barsky clip of a segment against the pixel grid, depth following the cut.
    /// Segments fully on screen come back unchanged; None when nothing is left.
    fn clip_line(&self, a: (i32, i32, f64), b: (i32, i32, f64)) -> Option<[(i64, i64, f64); 2]> {
        let (x_max, y_max) = (self.width as i64 - 1, self.height as i64 - 1);
        let (ax, ay, bx, by) = (a.0 as i64, a.1 as i64, b.0 as i64, b.1 as i64);
        let on_screen = |x: i64, y: i64| x >= 0 && x <= x_max && y >= 0 && y <= y_max;
        if on_screen(ax, ay) && on_screen(bx, by) {
            return Some([(ax, ay, a.2), (bx, by, b.2)]);
        }

        let (dx, dy) = ((bx - ax) as f64, (by - ay) as f64);
        let (mut t0, mut t1) = (0.0f64, 1.0f64);
        let bounds = [
            (-dx, ax as f64),
            (dx, (x_max - ax) as f64),
            (-dy, ay as f64),
            (dy, (y_max - ay) as f64),
        ];
        for (p, q) in bounds {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        let at = |t: f64| {
            let x = (ax as f64 + t * dx).round() as i64;
            let y = (ay as f64 + t * dy).round() as i64;
            (x.clamp(0, x_max), y.clamp(0, y_max), a.2 + t * (b.2 - a.2))
        };
        return Some([at(t0), at(t1)]);
    }

    /// Draws every segment (consecutive column pair) of an edge matrix.
    pub fn draw_lines(&mut self, edges: &Matrix, color: Color) {
        let mut i = 0;
        while i + 1 < edges.lastcol() {
            let a = edges.point(i);
            let b = edges.point(i + 1);
            self.draw_line(a.x as i32, a.y as i32, a.z, b.x as i32, b.y as i32, b.z, color);
            i += 2;
        }
    }

    /// Fills the triangle starting at column `i` one row at a time, bottom to top.
    /// The long edge runs bottom -> top, the short side bottom -> middle then middle -> top.
    pub fn scanline_convert(&mut self, polygons: &Matrix, i: usize, color: Color) {
        let mut v: Vec<ScenePoint> = (i..i + 3)
            .map(|c| {
                let p = polygons.point(c);
                ScenePoint { x: p.x, y: p.y, z: p.z }
            })
            .collect();
        v.sort_by(|a, b| a.y.total_cmp(&b.y));
        let (bot, mid, top) = (v[0], v[1], v[2]);

        let y_bot = bot.y as i64;
        let y_mid = mid.y as i64;
        let y_top = top.y as i64;

        let rows = |from: i64, to: i64| to.saturating_sub(from).saturating_add(1) as f64;
        let d0 = rows(y_bot, y_top);
        let d1 = rows(y_bot, y_mid);
        let d2 = rows(y_mid, y_top);

        // Only rows on screen are walked; the edges are advanced to the first of them.
        let first = y_bot.max(0);
        let last = y_top.min(self.height as i64 - 1);
        if first > last {
            return;
        }
        let skipped = first.saturating_sub(y_bot) as f64;

        let dx0 = (top.x - bot.x) / d0;
        let dz0 = (top.z - bot.z) / d0;
        let mut dx1 = (mid.x - bot.x) / d1;
        let mut dz1 = (mid.z - bot.z) / d1;

        let (mut x0, mut z0) = (bot.x + dx0 * skipped, bot.z + dz0 * skipped);
        let (mut x1, mut z1) = (bot.x + dx1 * skipped, bot.z + dz1 * skipped);
        let mut flipped = false;
        if first > y_mid {
            flipped = true;
            dx1 = (top.x - mid.x) / d2;
            dz1 = (top.z - mid.z) / d2;
            let past_mid = first.saturating_sub(y_mid) as f64;
            x1 = mid.x + dx1 * past_mid;
            z1 = mid.z + dz1 * past_mid;
        }

        let mut y = first;
        while y <= last {
            if !flipped && y >= y_mid {
                flipped = true;
                dx1 = (top.x - mid.x) / d2;
                dz1 = (top.z - mid.z) / d2;
                x1 = mid.x;
                z1 = mid.z;
            }
            self.draw_line(x0 as i32, y as i32, z0, x1 as i32, y as i32, z1, color);
            x0 += dx0;
            z0 += dz0;
            x1 += dx1;
            z1 += dz1;
            y += 1;
        }
    }

    /// Lights and fills every triangle of a polygon matrix. Triangles facing away from
    /// the view vector, degenerate ones included, are skipped.
    pub fn draw_polygons(&mut self, polygons: &Matrix, lighting: &Lighting, material: &Material) -> usize {
        let view: Vector3<f64> = to_vector(lighting.view);
        let mut drawn = 0;
        let mut i = 0;
        while i + 2 < polygons.lastcol() {
            let normal = calculate_normal(polygons, i);
            if normal.dot(&view) > 0.0 {
                let color = get_lighting(normal, lighting, material);
                self.scanline_convert(polygons, i, color);
                drawn += 1;
            }
            i += 3;
        }
        return drawn;
    }
}
