//! Everything leaving the renderer: saved images, per-frame files, the animation and
//! the live window.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use show_image::{create_window, event, ImageInfo, ImageView, WindowOptions};

use crate::error::{RenderError, RenderResult};
use crate::scene::Screen;

/// Output produced while replaying a frame, delivered in program order once the frame is done.
#[derive(Debug, Clone)]
pub enum OutputRequest {
    Save { path: PathBuf, screen: Screen },
    Display { screen: Screen },
}

/// Consumer of rendered screens.
pub trait FrameSink {
    /// `save` command: write the screen to `path`, format chosen by extension.
    fn save(&mut self, screen: &Screen, path: &Path) -> RenderResult<()>;
    /// `display` command: show the screen live.
    fn display(&mut self, screen: &Screen) -> RenderResult<()>;
    /// One finished animation frame under its sequential file name.
    fn emit_frame(&mut self, screen: &Screen, file_name: &str) -> RenderResult<()>;
    /// All frames are out, assemble them.
    fn make_animation(&mut self, basename: &str) -> RenderResult<()>;
}

/// Zero padded sequential frame name. The width never drops below what `frames` needs,
/// so names sort in frame order.
pub fn frame_file_name(basename: &str, frame: usize, frames: usize, min_digits: usize) -> String {
    let needed = frames.saturating_sub(1).to_string().len();
    let width = min_digits.max(needed);
    return format!("{basename}{frame:0width$}.png");
}

/// Writes to disk and shows `display` requests in a window.
pub struct FileSink {
    pub output_dir: PathBuf,
    pub delay_ms: u32,
    pub show_window: bool,
}

impl FileSink {
    pub fn new(output_dir: impl Into<PathBuf>, delay_ms: u32, show_window: bool) -> FileSink {
        return FileSink {
            output_dir: output_dir.into(),
            delay_ms,
            show_window,
        };
    }

    /// Frames emitted for `basename`, in name order.
    fn frame_paths(&self, basename: &str) -> RenderResult<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.output_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                let is_png = path.extension().map_or(false, |ext| ext == "png");
                let matches = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .map_or(false, |name| name.starts_with(basename));
                is_png && matches
            })
            .collect();
        paths.sort();
        return Ok(paths);
    }
}

/// Plain-text PPM, or any format `image` knows by extension.
pub fn save_extension(screen: &Screen, path: &Path) -> RenderResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let is_ppm = path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("ppm"));
    if is_ppm {
        let mut f = BufWriter::new(File::create(path)?);
        f.write_all(screen.to_ppm().as_bytes())?;
        f.flush()?;
    } else {
        screen.to_image().save(path)?;
    }
    return Ok(());
}

/// Helper, defining exit event to be an Escape key press.
fn is_exit_event(window_event: event::WindowEvent) -> bool {
    if let event::WindowEvent::KeyboardInput(event) = window_event {
        if event.input.key_code == Some(event::VirtualKeyCode::Escape) && event.input.state.is_released() {
            return true;
        }
    }
    return false;
}

/// Shows the screen and blocks until Escape is released or the window goes away.
pub fn display(screen: &Screen) -> RenderResult<()> {
    let window_options = WindowOptions {
        size: Some([screen.width, screen.height]),
        ..Default::default()
    };
    let window = create_window("mdl_renderer", window_options).map_err(|e| RenderError::output(e.to_string()))?;
    let image_data = ImageView::new(ImageInfo::rgb8(screen.width, screen.height), screen.as_render_data());
    window
        .set_image("image", image_data)
        .map_err(|e| RenderError::output(e.to_string()))?;

    let event_channel = window.event_channel().map_err(|e| RenderError::output(e.to_string()))?;
    for window_event in event_channel.iter() {
        if is_exit_event(window_event) {
            break;
        }
    }
    return Ok(());
}

impl FrameSink for FileSink {
    fn save(&mut self, screen: &Screen, path: &Path) -> RenderResult<()> {
        tracing::info!(path = %path.display(), "saving image");
        return save_extension(screen, path);
    }

    fn display(&mut self, screen: &Screen) -> RenderResult<()> {
        if !self.show_window {
            tracing::warn!("display requested but windows are disabled, skipping");
            return Ok(());
        }
        return display(screen);
    }

    fn emit_frame(&mut self, screen: &Screen, file_name: &str) -> RenderResult<()> {
        let path = self.output_dir.join(file_name);
        tracing::debug!(path = %path.display(), "frame written");
        return save_extension(screen, &path);
    }

    fn make_animation(&mut self, basename: &str) -> RenderResult<()> {
        let paths = self.frame_paths(basename)?;
        let target = self.output_dir.join(format!("{basename}.gif"));
        tracing::info!(frames = paths.len(), path = %target.display(), "making animation");

        let mut encoder = GifEncoder::new(BufWriter::new(File::create(&target)?));
        encoder.set_repeat(Repeat::Infinite)?;
        for path in paths {
            let rgba = image::open(&path)?.to_rgba8();
            encoder.encode_frame(Frame::from_parts(rgba, 0, 0, Delay::from_numer_denom_ms(self.delay_ms, 1)))?;
        }
        return Ok(());
    }
}

/// Keeps everything in memory. Handy for tests and embedding.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub saved: Vec<(PathBuf, Screen)>,
    pub displayed: Vec<Screen>,
    pub frames: Vec<(String, Screen)>,
    pub animations: Vec<String>,
}

impl FrameSink for RecordingSink {
    fn save(&mut self, screen: &Screen, path: &Path) -> RenderResult<()> {
        self.saved.push((path.to_path_buf(), screen.clone()));
        return Ok(());
    }

    fn display(&mut self, screen: &Screen) -> RenderResult<()> {
        self.displayed.push(screen.clone());
        return Ok(());
    }

    fn emit_frame(&mut self, screen: &Screen, file_name: &str) -> RenderResult<()> {
        self.frames.push((file_name.to_string(), screen.clone()));
        return Ok(());
    }

    fn make_animation(&mut self, basename: &str) -> RenderResult<()> {
        self.animations.push(basename.to_string());
        return Ok(());
    }
}

/// Forwards a frame's requests to the sink in the order they were made.
pub fn deliver(sink: &mut dyn FrameSink, requests: Vec<OutputRequest>) -> RenderResult<()> {
    for request in requests {
        match request {
            OutputRequest::Save { path, screen } => sink.save(&screen, &path)?,
            OutputRequest::Display { screen } => sink.display(&screen)?,
        }
    }
    return Ok(());
}
