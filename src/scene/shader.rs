//! Per-polygon Phong-style lighting: ambient + diffuse + specular over every active light.

use nalgebra as na;
use na::Vector3;

use super::buffer::Color;
use super::util::{normalize, to_vector};

pub const SPECULAR_EXP: i32 = 4;

/// Point/directional light: a location (used as a direction towards the light) and a color.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Light {
    pub location: [f64; 3],
    pub color: [f64; 3],
}

/// Reflectance constants per channel (red, green, blue).
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Material {
    pub ambient: [f64; 3],
    pub diffuse: [f64; 3],
    pub specular: [f64; 3],
}

impl Default for Material {
    fn default() -> Self {
        Material {
            ambient: [0.1; 3],
            diffuse: [0.5; 3],
            specular: [0.5; 3],
        }
    }
}

/// Lighting environment shared by every shape of a frame.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Lighting {
    pub ambient: Color,
    pub lights: Vec<Light>,
    pub view: [f64; 3],
}

impl Default for Lighting {
    fn default() -> Self {
        Lighting {
            ambient: Color::new(50, 50, 50),
            lights: vec![Light {
                location: [0.5, 0.75, 1.0],
                color: [0.0, 255.0, 255.0],
            }],
            view: [0.0, 0.0, 1.0],
        }
    }
}

/// Channel-wise sums before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Intensity {
    r: i32,
    g: i32,
    b: i32,
}

impl std::ops::Add<Intensity> for Intensity {
    type Output = Intensity;

    fn add(self, rhs: Intensity) -> Intensity {
        return Intensity {
            r: self.r + rhs.r,
            g: self.g + rhs.g,
            b: self.b + rhs.b,
        };
    }
}

fn calculate_ambient(alight: Color, areflect: [f64; 3]) -> Intensity {
    return Intensity {
        r: (alight.r as f64 * areflect[0]) as i32,
        g: (alight.g as f64 * areflect[1]) as i32,
        b: (alight.b as f64 * areflect[2]) as i32,
    };
}

fn scaled(color: [f64; 3], reflect: [f64; 3], k: f64) -> Intensity {
    return Intensity {
        r: (color[0] * reflect[0] * k) as i32,
        g: (color[1] * reflect[1] * k) as i32,
        b: (color[2] * reflect[2] * k) as i32,
    };
}

fn calculate_diffuse(light: &Light, dreflect: [f64; 3], normal: Vector3<f64>) -> Intensity {
    let l = normalize(to_vector(light.location));
    let dot = normal.dot(&l).max(0.0);
    return scaled(light.color, dreflect, dot);
}

fn calculate_specular(light: &Light, sreflect: [f64; 3], view: Vector3<f64>, normal: Vector3<f64>) -> Intensity {
    let l = normalize(to_vector(light.location));
    let reflected = normal * (2.0 * normal.dot(&l)) - l;
    let k = reflected.dot(&view).max(0.0).powi(SPECULAR_EXP);
    return scaled(light.color, sreflect, k);
}

/// Color of a polygon with (not necessarily unit) `normal` under `lighting` and `material`.
pub fn get_lighting(normal: Vector3<f64>, lighting: &Lighting, material: &Material) -> Color {
    let normal = normalize(normal);
    let view = normalize(to_vector(lighting.view));

    let mut i = calculate_ambient(lighting.ambient, material.ambient);
    for light in &lighting.lights {
        i = i + calculate_diffuse(light, material.diffuse, normal);
        i = i + calculate_specular(light, material.specular, view, normal);
    }
    return Color::clamped(i.r, i.g, i.b);
}
