//! Data handed over by the script front-end: an ordered op list and a symbol table.
//! Both deserialize from JSON.

use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;

use crate::app::RenderConfig;
use crate::error::{RenderError, RenderResult};
use crate::matrix::CurveType;
use crate::scene::{Light, Material};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// One interpreter command.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    Push,
    Pop,
    Move {
        xyz: [f64; 3],
        #[serde(default)]
        knob: Option<String>,
    },
    Scale {
        xyz: [f64; 3],
        #[serde(default)]
        knob: Option<String>,
    },
    Rotate {
        axis: Axis,
        degrees: f64,
        #[serde(default)]
        knob: Option<String>,
    },
    Box {
        corner: [f64; 3],
        size: [f64; 3],
        #[serde(default)]
        constants: Option<String>,
        #[serde(default)]
        cs: Option<String>,
    },
    Sphere {
        center: [f64; 3],
        r: f64,
        #[serde(default)]
        constants: Option<String>,
        #[serde(default)]
        cs: Option<String>,
    },
    Torus {
        center: [f64; 3],
        r0: f64,
        r1: f64,
        #[serde(default)]
        constants: Option<String>,
        #[serde(default)]
        cs: Option<String>,
    },
    Mesh {
        file: PathBuf,
        #[serde(default)]
        constants: Option<String>,
        #[serde(default)]
        cs: Option<String>,
    },
    Line {
        p0: [f64; 3],
        p1: [f64; 3],
        #[serde(default)]
        cs: Option<String>,
    },
    Circle {
        center: [f64; 3],
        r: f64,
        #[serde(default)]
        cs: Option<String>,
    },
    Curve {
        kind: CurveType,
        points: [[f64; 2]; 4],
        #[serde(default)]
        cs: Option<String>,
    },
    /// Adds the named light to the active light list.
    Light { light: String },
    Ambient { color: [i32; 3] },
    /// Declares (or redefines) a named material.
    Constants { name: String, material: Material },
    SaveCoordSystem { name: String },
    Set { knob: String, value: f64 },
    SetKnobs { value: f64 },
    Frames { count: usize },
    Basename { name: String },
    Vary {
        knob: String,
        start_frame: usize,
        end_frame: usize,
        start_value: f64,
        end_value: f64,
    },
    Save { file: PathBuf },
    Display,
}

impl Op {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Op::Push => "push",
            Op::Pop => "pop",
            Op::Move { .. } => "move",
            Op::Scale { .. } => "scale",
            Op::Rotate { .. } => "rotate",
            Op::Box { .. } => "box",
            Op::Sphere { .. } => "sphere",
            Op::Torus { .. } => "torus",
            Op::Mesh { .. } => "mesh",
            Op::Line { .. } => "line",
            Op::Circle { .. } => "circle",
            Op::Curve { .. } => "curve",
            Op::Light { .. } => "light",
            Op::Ambient { .. } => "ambient",
            Op::Constants { .. } => "constants",
            Op::SaveCoordSystem { .. } => "save_coord_system",
            Op::Set { .. } => "set",
            Op::SetKnobs { .. } => "set_knobs",
            Op::Frames { .. } => "frames",
            Op::Basename { .. } => "basename",
            Op::Vary { .. } => "vary",
            Op::Save { .. } => "save",
            Op::Display => "display",
        }
    }
}

/// Named values, lights and materials.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct SymbolTable {
    pub values: HashMap<String, f64>,
    pub lights: HashMap<String, Light>,
    pub constants: HashMap<String, Material>,
}

impl SymbolTable {
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn set_value(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    pub fn light(&self, name: &str) -> RenderResult<Light> {
        self.lights
            .get(name)
            .copied()
            .ok_or_else(|| RenderError::symbol(format!("no light named '{name}'")))
    }

    pub fn material(&self, name: &str) -> RenderResult<Material> {
        self.constants
            .get(name)
            .copied()
            .ok_or_else(|| RenderError::symbol(format!("no constants named '{name}'")))
    }
}

/// Parsed script: what the front-end produces.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Script {
    pub ops: Vec<Op>,
    #[serde(default)]
    pub symbols: SymbolTable,
    /// Optional render settings carried by the script.
    #[serde(default)]
    pub config: Option<RenderConfig>,
}

impl Script {
    pub fn new(ops: Vec<Op>) -> Script {
        return Script { ops, ..Default::default() };
    }

    pub fn from_reader<R: Read>(reader: R) -> RenderResult<Script> {
        return serde_json::from_reader(reader).map_err(|e| RenderError::config(format!("invalid script: {e}")));
    }

    pub fn from_json(text: &str) -> RenderResult<Script> {
        return Script::from_reader(text.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_ops() {
        let script = Script::from_json(
            r#"{
                "ops": [
                    {"op": "push"},
                    {"op": "move", "xyz": [1, 2, 3], "knob": "k"},
                    {"op": "rotate", "axis": "y", "degrees": 45},
                    {"op": "sphere", "center": [0, 0, 0], "r": 10, "constants": "shiny"},
                    {"op": "curve", "kind": "bezier", "points": [[0,0],[1,1],[2,1],[3,0]]},
                    {"op": "vary", "knob": "k", "start_frame": 0, "end_frame": 9, "start_value": 0, "end_value": 1},
                    {"op": "display"}
                ],
                "symbols": {
                    "lights": {"sun": {"location": [0, 0, 1], "color": [255, 255, 255]}},
                    "constants": {"shiny": {"ambient": [0.2, 0.2, 0.2], "diffuse": [0.5, 0.5, 0.5], "specular": [0.9, 0.9, 0.9]}}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(script.ops.len(), 7);
        assert_eq!(
            script.ops[1],
            Op::Move { xyz: [1.0, 2.0, 3.0], knob: Some("k".to_string()) }
        );
        assert_eq!(script.ops[2], Op::Rotate { axis: Axis::Y, degrees: 45.0, knob: None });
        assert_eq!(script.ops[6].kind(), "display");
        assert!(script.symbols.light("sun").is_ok());
        assert_eq!(script.symbols.material("shiny").unwrap().specular, [0.9; 3]);
        assert!(script.config.is_none());
    }

    #[test]
    fn unknown_symbols_are_errors() {
        let symbols = SymbolTable::default();
        assert!(matches!(symbols.light("nope"), Err(RenderError::Symbol(_))));
        assert!(matches!(symbols.material("nope"), Err(RenderError::Symbol(_))));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(Script::from_json("{\"ops\": [{\"op\": \"warp\"}]}"), Err(RenderError::Config(_))));
    }
}
