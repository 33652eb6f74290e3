use std::collections::HashMap;

use crate::anim::{AnimConfig, KnobTable};
use crate::error::RenderResult;
use crate::matrix::{degrees_to_radians, make_rot_x, make_rot_y, make_rot_z, make_scale, make_translate, Matrix};
use crate::mesh::MeshCache;
use crate::output::OutputRequest;
use crate::scene::{Color, Lighting, Material, Screen};
use crate::script::{Axis, Op, SymbolTable};
use crate::shapes::{add_box, add_circle, add_curve, add_edge, add_sphere, add_torus};
use crate::stack::TransformStack;

use super::RenderConfig;

/// Everything a frame needs; read-only and shared between frames.
#[derive(Debug)]
pub struct FrameInputs {
    pub ops: Vec<Op>,
    pub symbols: SymbolTable,
    pub knobs: KnobTable,
    pub meshes: MeshCache,
    pub anim: AnimConfig,
    pub config: RenderConfig,
}

/// A finished frame and the output it asked for along the way.
#[derive(Debug)]
pub struct RenderedFrame {
    pub frame: usize,
    pub screen: Screen,
    pub requests: Vec<OutputRequest>,
}

/// Mutable state of one frame. Built fresh for every frame, so nothing carries over.
struct FrameContext<'a> {
    inputs: &'a FrameInputs,
    screen: Screen,
    stack: TransformStack,
    tmp: Matrix, // Scratch geometry, emptied after every shape.
    symbols: SymbolTable,
    lighting: Lighting,
    lights_declared: bool,
    coord_systems: HashMap<String, Matrix>,
    requests: Vec<OutputRequest>,
}

/// Replays the whole op list for `frame`.
#[tracing::instrument(skip(inputs), level = "info")]
pub fn render_frame(inputs: &FrameInputs, frame: usize) -> RenderResult<RenderedFrame> {
    let config = &inputs.config;
    let mut ctx = FrameContext {
        inputs,
        screen: Screen::new(config.width, config.height, config.background),
        stack: TransformStack::new(),
        tmp: Matrix::points(1000),
        symbols: inputs.symbols.clone(),
        lighting: config.lighting.clone(),
        lights_declared: false,
        coord_systems: HashMap::new(),
        requests: Vec::new(),
    };

    if inputs.anim.is_animated() {
        for (name, value) in inputs.knobs.knobs(frame) {
            ctx.symbols.set_value(name, value);
        }
    }

    for op in &inputs.ops {
        tracing::debug!(op = op.kind(), "exec");
        ctx.exec(op)?;
    }

    return Ok(RenderedFrame {
        frame,
        screen: ctx.screen,
        requests: ctx.requests,
    });
}

impl<'a> FrameContext<'a> {
    fn exec(&mut self, op: &Op) -> RenderResult<()> {
        let step = self.inputs.config.step;
        match op {
            Op::Push => self.stack.push(),
            Op::Pop => {
                self.stack.pop()?;
                tracing::trace!(stack = %self.stack.print(), "popped");
            }
            Op::Move { xyz, knob } => {
                let k = self.knob_value(knob);
                self.stack.apply(make_translate(xyz[0] * k, xyz[1] * k, xyz[2] * k));
            }
            Op::Scale { xyz, knob } => {
                let k = self.knob_value(knob);
                self.stack.apply(make_scale(xyz[0] * k, xyz[1] * k, xyz[2] * k));
            }
            Op::Rotate { axis, degrees, knob } => {
                let theta = degrees_to_radians(degrees * self.knob_value(knob));
                let rotation = match axis {
                    Axis::X => make_rot_x(theta),
                    Axis::Y => make_rot_y(theta),
                    Axis::Z => make_rot_z(theta),
                };
                self.stack.apply(rotation);
            }
            Op::Box { corner, size, constants, cs } => {
                add_box(&mut self.tmp, corner[0], corner[1], corner[2], size[0], size[1], size[2]);
                self.draw_solid(constants, cs)?;
            }
            Op::Sphere { center, r, constants, cs } => {
                add_sphere(&mut self.tmp, center[0], center[1], center[2], *r, step);
                self.draw_solid(constants, cs)?;
            }
            Op::Torus { center, r0, r1, constants, cs } => {
                add_torus(&mut self.tmp, center[0], center[1], center[2], *r0, *r1, step);
                self.draw_solid(constants, cs)?;
            }
            Op::Mesh { file, constants, cs } => {
                if let Some(mesh) = self.inputs.meshes.get(file) {
                    for c in 0..mesh.lastcol() {
                        let p = mesh.point(c);
                        self.tmp.add_point(p.x, p.y, p.z);
                    }
                }
                self.draw_solid(constants, cs)?;
            }
            Op::Line { p0, p1, cs } => {
                add_edge(&mut self.tmp, p0[0], p0[1], p0[2], p1[0], p1[1], p1[2]);
                self.draw_wire(cs)?;
            }
            Op::Circle { center, r, cs } => {
                add_circle(&mut self.tmp, center[0], center[1], center[2], *r, step);
                self.draw_wire(cs)?;
            }
            Op::Curve { kind, points, cs } => {
                add_curve(&mut self.tmp, *points, step, *kind);
                self.draw_wire(cs)?;
            }
            Op::Light { light } => {
                let light = self.symbols.light(light)?;
                if !self.lights_declared {
                    self.lighting.lights.clear();
                    self.lights_declared = true;
                }
                self.lighting.lights.push(light);
            }
            Op::Ambient { color } => {
                self.lighting.ambient = Color::clamped(color[0], color[1], color[2]);
            }
            Op::Constants { name, material } => {
                self.symbols.constants.insert(name.clone(), *material);
            }
            Op::SaveCoordSystem { name } => {
                self.coord_systems.insert(name.clone(), self.stack.peek().clone());
            }
            Op::Set { knob, value } => self.symbols.set_value(knob, *value),
            Op::SetKnobs { value } => {
                for v in self.symbols.values.values_mut() {
                    *v = *value;
                }
            }
            Op::Save { file } => self.requests.push(OutputRequest::Save {
                path: file.clone(),
                screen: self.screen.clone(),
            }),
            Op::Display => self.requests.push(OutputRequest::Display { screen: self.screen.clone() }),
            // Consumed by the first and second passes.
            Op::Frames { .. } | Op::Basename { .. } | Op::Vary { .. } => (),
        }
        return Ok(());
    }

    /// Current value of a knob scaling a transform; 1.0 when none is referenced.
    /// A knob nobody set also counts as 1.0.
    fn knob_value(&self, knob: &Option<String>) -> f64 {
        let Some(name) = knob else {
            return 1.0;
        };
        match self.symbols.value(name) {
            Some(value) => value,
            None => {
                tracing::warn!(knob = %name, "knob has no value in this frame, using 1.0");
                1.0
            }
        }
    }

    /// Frame geometry is generated in: a saved coordinate system or the stack top.
    fn coord_system(&self, cs: &Option<String>) -> Matrix {
        if let Some(name) = cs {
            if let Some(saved) = self.coord_systems.get(name) {
                return saved.clone();
            }
            tracing::warn!(cs = %name, "unknown coordinate system, using the current one");
        }
        return self.stack.peek().clone();
    }

    /// Transforms, lights and fills the scratch polygons, then empties the scratch matrix.
    fn draw_solid(&mut self, constants: &Option<String>, cs: &Option<String>) -> RenderResult<()> {
        let material: Material = match constants {
            Some(name) => self.symbols.material(name)?,
            None => self.inputs.config.material,
        };
        let frame = self.coord_system(cs);
        Matrix::mult(&frame, &mut self.tmp);
        let drawn = self.screen.draw_polygons(&self.tmp, &self.lighting, &material);
        tracing::trace!(triangles = self.tmp.lastcol() / 3, drawn, "solid");
        self.tmp.clear();
        return Ok(());
    }

    /// Transforms and draws the scratch edges in the flat line color.
    fn draw_wire(&mut self, cs: &Option<String>) -> RenderResult<()> {
        let frame = self.coord_system(cs);
        Matrix::mult(&frame, &mut self.tmp);
        self.screen.draw_lines(&self.tmp, self.inputs.config.line_color);
        self.tmp.clear();
        return Ok(());
    }
}
