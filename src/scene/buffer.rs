use image::{ImageBuffer, Rgb, RgbImage};

/// Default image resolution.
pub const XRES: u32 = 500;
pub const YRES: u32 = 500;

/// rgb8 pixel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// Each channel limited to [0, 255].
    pub fn clamped(r: i32, g: i32, b: i32) -> Color {
        fn limit(v: i32) -> u8 {
            v.clamp(0, 255) as u8
        }
        return Color { r: limit(r), g: limit(g), b: limit(b) };
    }
}

/// Color buffer plus parallel depth buffer.
/// Geometry uses (0, 0) as the bottom left corner; the stored image has row 0 at the top.
#[derive(Debug, Clone)]
pub struct Screen {
    pub width: u32,
    pub height: u32,
    background: Color,
    z_buffer: Vec<f64>,   // f64::MIN means nothing drawn yet.
    render_data: Vec<u8>, // Flat rgb8, top row first.
}

impl Screen {
    pub fn new(width: u32, height: u32, background: Color) -> Screen {
        let n_pixels = (width * height) as usize;
        let mut screen = Screen {
            width,
            height,
            background,
            z_buffer: vec![f64::MIN; n_pixels],
            render_data: vec![0; 3 * n_pixels],
        };
        screen.clear();
        return screen;
    }

    /// Resets every pixel to the background color and the depth buffer to "infinitely far".
    pub fn clear(&mut self) {
        self.clear_screen();
        self.clear_zbuffer();
    }

    pub fn clear_screen(&mut self) {
        for pixel in self.render_data.chunks_exact_mut(3) {
            pixel[0] = self.background.r;
            pixel[1] = self.background.g;
            pixel[2] = self.background.b;
        }
    }

    pub fn clear_zbuffer(&mut self) {
        self.z_buffer.fill(f64::MIN);
    }

    /// Index of geometry coordinate (x, y) in the flipped image, None when off screen.
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let (x, row) = (x as i64, self.height as i64 - 1 - y as i64);
        if x < 0 || x >= self.width as i64 || row < 0 || row >= self.height as i64 {
            return None;
        }
        return Some(x as usize + row as usize * self.width as usize);
    }

    /// Depth-tested pixel write. `z` is truncated to three decimals; a write wins when it is
    /// at least as near as what is stored. Off-screen coordinates are ignored.
    pub fn plot(&mut self, x: i32, y: i32, z: f64, color: Color) {
        let z = (z * 1000.0).trunc() / 1000.0;
        if let Some(index) = self.index(x, y) {
            if self.z_buffer[index] <= z {
                self.z_buffer[index] = z;
                self.render_data[3 * index] = color.r;
                self.render_data[3 * index + 1] = color.g;
                self.render_data[3 * index + 2] = color.b;
            }
        }
    }

    /// Color at geometry coordinate (x, y).
    pub fn color_at(&self, x: i32, y: i32) -> Option<Color> {
        let index = self.index(x, y)?;
        let data = &self.render_data[3 * index..3 * index + 3];
        return Some(Color { r: data[0], g: data[1], b: data[2] });
    }

    /// Stored depth at geometry coordinate (x, y).
    pub fn depth_at(&self, x: i32, y: i32) -> Option<f64> {
        let index = self.index(x, y)?;
        return Some(self.z_buffer[index]);
    }

    /// Whether anything has been drawn at (x, y).
    pub fn is_drawn(&self, x: i32, y: i32) -> bool {
        matches!(self.depth_at(x, y), Some(z) if z > f64::MIN)
    }

    /// Rendered image as a slice of size 3 * (number of pixels), top row first.
    pub fn as_render_data(&self) -> &[u8] {
        &self.render_data[..]
    }

    pub fn to_image(&self) -> RgbImage {
        return ImageBuffer::<Rgb<u8>, Vec<u8>>::from_fn(self.width, self.height, |x, y| {
            let i = 3 * (x + y * self.width) as usize;
            Rgb([self.render_data[i], self.render_data[i + 1], self.render_data[i + 2]])
        });
    }

    /// Plain-text PPM (P3) encoding.
    pub fn to_ppm(&self) -> String {
        let mut out = format!("P3\n{} {}\n255\n", self.width, self.height);
        for row in self.render_data.chunks_exact(3 * self.width as usize) {
            for pixel in row.chunks_exact(3) {
                out.push_str(&format!("{} {} {} ", pixel[0], pixel[1], pixel[2]));
            }
            out.push('\n');
        }
        return out;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new(255, 0, 0);
    const BLUE: Color = Color::new(0, 0, 255);

    #[test]
    fn nearer_write_wins_and_farther_is_rejected() {
        let mut s = Screen::new(10, 10, WHITE);
        s.plot(3, 4, 1.0, RED);
        s.plot(3, 4, 5.0, BLUE);
        assert_eq!(s.color_at(3, 4), Some(BLUE));
        s.plot(3, 4, 1.0, RED);
        assert_eq!(s.color_at(3, 4), Some(BLUE));
        assert_eq!(s.depth_at(3, 4), Some(5.0));
    }

    #[test]
    fn equal_depth_overdraws() {
        let mut s = Screen::new(4, 4, WHITE);
        s.plot(1, 1, 2.0, RED);
        s.plot(1, 1, 2.0, BLUE);
        assert_eq!(s.color_at(1, 1), Some(BLUE));
    }

    #[test]
    fn depth_is_truncated_to_three_decimals() {
        let mut s = Screen::new(4, 4, WHITE);
        s.plot(0, 0, 1.23456, RED);
        assert_eq!(s.depth_at(0, 0), Some(1.234));
        // noise below a thousandth ties, so the later write wins
        s.plot(0, 0, 1.2341, BLUE);
        assert_eq!(s.color_at(0, 0), Some(BLUE));
    }

    #[test]
    fn off_screen_writes_are_ignored() {
        let mut s = Screen::new(4, 4, WHITE);
        s.plot(-1, 0, 0.0, RED);
        s.plot(0, 4, 0.0, RED);
        s.plot(4, 0, 0.0, RED);
        assert!(s.as_render_data().iter().all(|v| *v == 255));
    }

    #[test]
    fn origin_is_bottom_left_of_the_image() {
        let mut s = Screen::new(4, 3, WHITE);
        s.plot(0, 0, 0.0, RED);
        // last image row, first pixel
        let i = 3 * (2 * 4);
        assert_eq!(&s.as_render_data()[i..i + 3], &[255, 0, 0]);
        assert_eq!(s.to_image().get_pixel(0, 2), &Rgb([255, 0, 0]));
    }

    #[test]
    fn extreme_coordinates_are_ignored() {
        let mut s = Screen::new(4, 4, WHITE);
        s.plot(i32::MIN, i32::MIN, 1.0, RED);
        s.plot(i32::MAX, i32::MAX, 1.0, RED);
        s.plot(0, i32::MIN, 1.0, RED);
        assert!((0..4).all(|x| (0..4).all(|y| !s.is_drawn(x, y))));
    }

    #[test]
    fn clear_resets_colors_and_depth() {
        let mut s = Screen::new(4, 4, BLACK);
        s.plot(2, 2, 3.0, RED);
        s.clear();
        assert_eq!(s.color_at(2, 2), Some(BLACK));
        assert!(!s.is_drawn(2, 2));
    }

    #[test]
    fn color_clamping() {
        assert_eq!(Color::clamped(-20, 300, 128), Color::new(0, 255, 128));
    }

    #[test]
    fn ppm_header_and_size() {
        let s = Screen::new(2, 2, WHITE);
        let ppm = s.to_ppm();
        assert!(ppm.starts_with("P3\n2 2\n255\n"));
        assert_eq!(ppm.lines().count(), 5);
    }
}
