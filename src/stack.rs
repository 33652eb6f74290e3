use crate::error::{RenderError, RenderResult};
use crate::matrix::Matrix;

const STACK_SIZE: usize = 2;

/// Stack of coordinate frames. The top is the composite transform applied to newly
/// generated geometry; there is always at least one frame.
#[derive(Debug, Clone)]
pub struct TransformStack {
    frames: Vec<Matrix>,
}

impl TransformStack {
    /// Fresh stack holding a single identity frame.
    pub fn new() -> TransformStack {
        let mut frames = Vec::with_capacity(STACK_SIZE);
        frames.push(Matrix::identity());
        return TransformStack { frames };
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Current top frame.
    pub fn peek(&self) -> &Matrix {
        // `frames` is never empty, see `pop`.
        &self.frames[self.frames.len() - 1]
    }

    pub fn peek_mut(&mut self) -> &mut Matrix {
        let top = self.frames.len() - 1;
        &mut self.frames[top]
    }

    /// Enters a child frame: duplicates the top.
    pub fn push(&mut self) {
        let copy = self.peek().clone();
        self.frames.push(copy);
    }

    /// Returns to the parent frame. Popping the last frame is refused.
    pub fn pop(&mut self) -> RenderResult<()> {
        if self.frames.len() == 1 {
            return Err(RenderError::stack("pop with only the root frame left"));
        }
        self.frames.pop();
        return Ok(());
    }

    /// top * transform -> top, so later geometry is generated in the composite frame.
    pub fn apply(&mut self, mut transform: Matrix) {
        Matrix::mult(self.peek(), &mut transform);
        self.peek_mut().copy_from(&transform);
    }

    /// Every frame, top first.
    pub fn print(&self) -> String {
        let mut out = String::new();
        for frame in self.frames.iter().rev() {
            out.push_str(&frame.print());
            out.push('\n');
        }
        return out;
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{make_rot_y, make_scale, make_translate};

    #[test]
    fn starts_with_identity() {
        let s = TransformStack::new();
        assert_eq!(s.depth(), 1);
        assert_eq!(s.peek(), &Matrix::identity());
    }

    #[test]
    fn balanced_push_pop_restores_identity() {
        let mut s = TransformStack::new();
        for i in 0..5 {
            s.push();
            s.apply(make_translate(i as f64, 1.0, 2.0));
            s.apply(make_rot_y(0.3));
        }
        for _ in 0..5 {
            s.pop().unwrap();
        }
        assert_eq!(s.depth(), 1);
        assert_eq!(s.peek(), &Matrix::identity());
    }

    #[test]
    fn push_duplicates_top() {
        let mut s = TransformStack::new();
        s.apply(make_scale(2.0, 2.0, 2.0));
        s.push();
        assert_eq!(s.depth(), 2);
        assert_eq!(s.frames[0], s.frames[1]);
    }

    #[test]
    fn apply_right_multiplies() {
        let mut s = TransformStack::new();
        s.apply(make_translate(10.0, 0.0, 0.0));
        s.apply(make_scale(2.0, 2.0, 2.0));

        let mut p = Matrix::points(1);
        p.add_point(1.0, 1.0, 1.0);
        Matrix::mult(s.peek(), &mut p);
        // scale first, then translate
        assert_eq!(p.point(0).x, 12.0);
        assert_eq!(p.point(0).y, 2.0);
    }

    #[test]
    fn pop_of_root_frame_is_an_error() {
        let mut s = TransformStack::new();
        assert!(matches!(s.pop(), Err(RenderError::Stack(_))));
        assert_eq!(s.depth(), 1);
    }
}
