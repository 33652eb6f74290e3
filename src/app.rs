pub mod frame;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use threadpool::ThreadPool;

use crate::anim::{first_pass, KnobTable};
use crate::error::{RenderError, RenderResult};
use crate::mesh::MeshCache;
use crate::output::{deliver, frame_file_name, FrameSink};
use crate::scene::{Color, Lighting, Material, BLACK, WHITE, XRES, YRES};
use crate::script::Script;

pub use frame::{render_frame, FrameInputs, RenderedFrame};

/// Settings of one run. Replaces what would otherwise be process-wide globals.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Angular step count for spheres, tori, circles and curves.
    pub step: usize,
    pub background: Color,
    pub line_color: Color,
    pub output_dir: PathBuf,
    /// Minimum zero padding of frame numbers in file names.
    pub frame_digits: usize,
    pub animation_delay_ms: u32,
    /// Worker threads rendering frames. 1 renders in place.
    pub jobs: usize,
    pub lighting: Lighting,
    /// Material of shapes without a constants override.
    pub material: Material,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: XRES,
            height: YRES,
            step: 20,
            background: WHITE,
            line_color: BLACK,
            output_dir: PathBuf::from("anim"),
            frame_digits: 3,
            animation_delay_ms: 30,
            jobs: 1,
            lighting: Lighting::default(),
            material: Material::default(),
        }
    }
}

/// What a finished run did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: usize,
    pub basename: String,
    pub animated: bool,
}

/// Runs the first and second passes, renders every frame and hands the results to `sink`.
/// Animated runs emit one file per frame and finish with an animation request.
pub fn run(script: &Script, config: &RenderConfig, sink: &mut dyn FrameSink) -> RenderResult<RunSummary> {
    let anim = first_pass(&script.ops)?;
    let knobs = KnobTable::second_pass(&script.ops, anim.frames)?;
    let meshes = MeshCache::load(&script.ops)?;
    tracing::info!(frames = anim.frames, ops = script.ops.len(), meshes = meshes.len(), "starting run");

    let inputs = Arc::new(FrameInputs {
        ops: script.ops.clone(),
        symbols: script.symbols.clone(),
        knobs,
        meshes,
        anim: anim.clone(),
        config: config.clone(),
    });

    let mut emit = |rendered: RenderedFrame| -> RenderResult<()> {
        deliver(sink, rendered.requests)?;
        if anim.is_animated() {
            let name = frame_file_name(&anim.basename, rendered.frame, anim.frames, config.frame_digits);
            sink.emit_frame(&rendered.screen, &name)?;
        }
        return Ok(());
    };

    if config.jobs > 1 && anim.frames > 1 {
        render_parallel(&inputs, config.jobs, render_frame, &mut emit)?;
    } else {
        for frame in 0..anim.frames {
            emit(render_frame(&inputs, frame)?)?;
        }
    }

    if anim.is_animated() {
        sink.make_animation(&anim.basename)?;
    }

    return Ok(RunSummary {
        frames: anim.frames,
        basename: anim.basename.clone(),
        animated: anim.is_animated(),
    });
}

/// Renders frames on a thread pool; results are handed to `emit` strictly in frame order.
/// A failed frame is reported once every frame before it has been emitted, as in a
/// sequential run.
fn render_parallel(
    inputs: &Arc<FrameInputs>,
    jobs: usize,
    render: fn(&FrameInputs, usize) -> RenderResult<RenderedFrame>,
    emit: &mut dyn FnMut(RenderedFrame) -> RenderResult<()>,
) -> RenderResult<()> {
    let frames = inputs.anim.frames;
    let pool = ThreadPool::new(jobs);
    let (tx, rx) = mpsc::channel::<(usize, RenderResult<RenderedFrame>)>();

    for frame in 0..frames {
        let tx = tx.clone();
        let inputs = Arc::clone(inputs);
        pool.execute(move || {
            let result = render(&inputs, frame);
            // The receiver is gone only when an earlier frame already failed.
            let _ = tx.send((frame, result));
        });
    }
    drop(tx);

    let mut pending: BTreeMap<usize, RenderResult<RenderedFrame>> = BTreeMap::new();
    let mut next = 0;
    while next < frames {
        let (frame, result) = rx
            .recv()
            .map_err(|_| RenderError::output("a frame worker stopped without a result"))?;
        pending.insert(frame, result);
        while let Some(result) = pending.remove(&next) {
            emit(result?)?;
            next += 1;
        }
    }
    return Ok(());
}
