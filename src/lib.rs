//! Software renderer driven by a stack-based scene interpreter: an op list is replayed once
//! per frame into a z-buffered image, with knobs interpolated across animation frames.

pub mod anim;
pub mod app;
pub mod error;
pub mod matrix;
pub mod mesh;
pub mod output;
pub mod scene;
pub mod script;
pub mod shapes;
pub mod stack;

pub use app::{run, RenderConfig, RunSummary};
pub use error::{RenderError, RenderResult};
pub use matrix::Matrix;
pub use output::{FileSink, FrameSink, RecordingSink};
pub use scene::{Color, Screen};
pub use script::{Op, Script, SymbolTable};
pub use stack::TransformStack;
