//! Frame count / basename discovery and per-frame knob values.

use std::collections::HashMap;

use crate::error::{RenderError, RenderResult};
use crate::script::Op;

pub const DEFAULT_BASENAME: &str = "default";

/// Result of the first pass over the op list.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimConfig {
    pub frames: usize,
    pub basename: String,
}

impl AnimConfig {
    /// More than one frame: knobs apply and every frame is emitted.
    pub fn is_animated(&self) -> bool {
        self.frames > 1
    }
}

/// Looks for `frames`, `basename` and `vary`.
/// A `vary` without `frames` is fatal; `frames` without `basename` falls back to a default name.
pub fn first_pass(ops: &[Op]) -> RenderResult<AnimConfig> {
    let mut frames: Option<usize> = None;
    let mut basename: Option<String> = None;
    let mut vary_found = false;

    for op in ops {
        match op {
            Op::Frames { count } => {
                tracing::info!(frames = count, "frame count declared");
                frames = Some(*count);
            }
            Op::Basename { name } => {
                tracing::info!(basename = %name, "basename declared");
                basename = Some(name.clone());
            }
            Op::Vary { .. } => vary_found = true,
            _ => (),
        }
    }

    if vary_found && frames.is_none() {
        return Err(RenderError::config("vary used without a frames command"));
    }
    if frames == Some(0) {
        return Err(RenderError::config("frame count must be at least 1"));
    }

    let basename = match (frames, basename) {
        (_, Some(name)) => name,
        (Some(_), None) => {
            tracing::warn!(basename = DEFAULT_BASENAME, "no basename given, using default");
            DEFAULT_BASENAME.to_string()
        }
        (None, None) => DEFAULT_BASENAME.to_string(),
    };

    return Ok(AnimConfig { frames: frames.unwrap_or(1), basename });
}

/// Knob values for every frame, built once before rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnobTable {
    frames: Vec<HashMap<String, f64>>,
}

impl KnobTable {
    /// Interpolates every `vary` over its inclusive frame range. When ranges of the same knob
    /// overlap, the one declared last wins.
    pub fn second_pass(ops: &[Op], frames: usize) -> RenderResult<KnobTable> {
        let mut table = KnobTable { frames: vec![HashMap::new(); frames] };

        for op in ops {
            if let Op::Vary { knob, start_frame, end_frame, start_value, end_value } = op {
                let (f0, f1) = (*start_frame, *end_frame);
                if f0 > f1 {
                    return Err(RenderError::config(format!("vary '{knob}': start frame {f0} after end frame {f1}")));
                }
                if f1 >= frames {
                    return Err(RenderError::config(format!(
                        "vary '{knob}': end frame {f1} outside of {frames} frames"
                    )));
                }
                tracing::info!(knob = %knob, f0, f1, start_value, end_value, "vary");

                for frame in f0..=f1 {
                    let value = interpolate(f0, f1, *start_value, *end_value, frame);
                    table.frames[frame].insert(knob.clone(), value);
                }
            }
        }

        return Ok(table);
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Knobs set in `frame`, empty for frames without any.
    pub fn knobs(&self, frame: usize) -> impl Iterator<Item = (&str, f64)> {
        self.frames
            .get(frame)
            .into_iter()
            .flat_map(|knobs| knobs.iter().map(|(name, value)| (name.as_str(), *value)))
    }

    pub fn get(&self, frame: usize, name: &str) -> Option<f64> {
        self.frames.get(frame)?.get(name).copied()
    }
}

/// Value at `frame` on the line from (f0, v0) to (f1, v1). Endpoints are exact.
pub fn interpolate(f0: usize, f1: usize, v0: f64, v1: f64, frame: usize) -> f64 {
    if frame == f0 || f0 == f1 {
        return v0;
    }
    if frame == f1 {
        return v1;
    }
    let t = (frame - f0) as f64 / (f1 - f0) as f64;
    return v0 + t * (v1 - v0);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vary(knob: &str, f0: usize, f1: usize, v0: f64, v1: f64) -> Op {
        Op::Vary {
            knob: knob.to_string(),
            start_frame: f0,
            end_frame: f1,
            start_value: v0,
            end_value: v1,
        }
    }

    #[test]
    fn defaults_to_single_frame() {
        let cfg = first_pass(&[Op::Push, Op::Pop]).unwrap();
        assert_eq!(cfg.frames, 1);
        assert!(!cfg.is_animated());
    }

    #[test]
    fn vary_without_frames_is_fatal() {
        let err = first_pass(&[vary("k", 0, 1, 0.0, 1.0)]).unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
    }

    #[test]
    fn frames_without_basename_uses_default() {
        let cfg = first_pass(&[Op::Frames { count: 10 }]).unwrap();
        assert_eq!(cfg.frames, 10);
        assert_eq!(cfg.basename, DEFAULT_BASENAME);
        assert!(cfg.is_animated());
    }

    #[test]
    fn basename_is_picked_up() {
        let ops = [Op::Basename { name: "spin".into() }, Op::Frames { count: 3 }];
        assert_eq!(first_pass(&ops).unwrap().basename, "spin");
    }

    #[test]
    fn interpolation_matches_endpoints_and_line() {
        assert_eq!(interpolate(3, 7, 0.1, 0.3, 3), 0.1);
        assert_eq!(interpolate(3, 7, 0.1, 0.3, 7), 0.3);
        assert!((interpolate(0, 10, 0.0, 5.0, 4) - 2.0).abs() < 1e-12);
        assert!((interpolate(2, 6, 10.0, -10.0, 5) - (-5.0)).abs() < 1e-12);
        assert_eq!(interpolate(4, 4, 2.5, 9.0, 4), 2.5);
    }

    #[test]
    fn knob_table_covers_declared_range_only() {
        let ops = [Op::Frames { count: 5 }, vary("k", 1, 3, 0.0, 1.0)];
        let table = KnobTable::second_pass(&ops, 5).unwrap();
        assert_eq!(table.frame_count(), 5);
        assert_eq!(table.get(0, "k"), None);
        assert_eq!(table.get(1, "k"), Some(0.0));
        assert_eq!(table.get(2, "k"), Some(0.5));
        assert_eq!(table.get(3, "k"), Some(1.0));
        assert_eq!(table.get(4, "k"), None);
        assert_eq!(table.knobs(2).count(), 1);
        assert_eq!(table.knobs(99).count(), 0);
    }

    #[test]
    fn later_vary_wins_on_overlap() {
        let ops = [vary("k", 0, 4, 0.0, 4.0), vary("k", 2, 3, 100.0, 200.0)];
        let table = KnobTable::second_pass(&ops, 5).unwrap();
        assert_eq!(table.get(1, "k"), Some(1.0));
        assert_eq!(table.get(2, "k"), Some(100.0));
        assert_eq!(table.get(3, "k"), Some(200.0));
        assert_eq!(table.get(4, "k"), Some(4.0));
    }

    #[test]
    fn out_of_range_vary_is_rejected() {
        assert!(KnobTable::second_pass(&[vary("k", 0, 5, 0.0, 1.0)], 5).is_err());
        assert!(KnobTable::second_pass(&[vary("k", 3, 1, 0.0, 1.0)], 5).is_err());
    }
}
